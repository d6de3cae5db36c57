//! Tests for PNG encoding.
//!
//! Every encoded image is decoded again with the `image` crate, so these
//! check real PNG validity rather than just the signature.

use renderer::png::{create_png, create_png_auto, create_png_indexed};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Decode PNG bytes into raw RGBA.
fn decode_rgba(png: &[u8]) -> (u32, u32, Vec<u8>) {
    let img = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .expect("decodable PNG")
        .to_rgba8();
    (img.width(), img.height(), img.into_raw())
}

/// Color type byte from the IHDR chunk.
fn color_type(png: &[u8]) -> u8 {
    // signature(8) + length(4) + "IHDR"(4) + width(4) + height(4) + depth(1)
    png[25]
}

// ============================================================================
// Basic encoding
// ============================================================================

#[test]
fn test_indexed_roundtrip_preserves_pixels() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 255, 0, 255, // green
        255, 0, 0, 255, // red
    ];

    let png = create_png_auto(&pixels, 2, 2).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(color_type(&png), 3);

    let (w, h, decoded) = decode_rgba(&png);
    assert_eq!((w, h), (2, 2));
    assert_eq!(decoded, pixels.to_vec());
}

#[test]
fn test_transparency_survives_indexed_encoding() {
    let pixels = [
        255, 0, 0, 255, // opaque
        0, 0, 0, 0, // transparent
        0, 255, 0, 128, // half
        0, 0, 255, 255, // opaque
    ];

    let png = create_png_auto(&pixels, 2, 2).unwrap();
    let (_, _, decoded) = decode_rgba(&png);
    let alphas: Vec<u8> = decoded.chunks_exact(4).map(|p| p[3]).collect();
    assert_eq!(alphas, vec![255, 0, 128, 255]);
}

#[test]
fn test_rgba_encoding() {
    let pixels = [
        255, 0, 0, 255, //
        0, 255, 0, 255, //
        0, 0, 255, 255, //
        255, 255, 0, 0, //
        10, 20, 30, 40, //
        50, 60, 70, 80, //
    ];

    let png = create_png(&pixels, 3, 2).unwrap();
    assert_eq!(color_type(&png), 6);
    let (w, h, decoded) = decode_rgba(&png);
    assert_eq!((w, h), (3, 2));
    assert_eq!(decoded, pixels.to_vec());
}

// ============================================================================
// Format selection
// ============================================================================

#[test]
fn test_rgba_fallback_with_many_colors() {
    let pixels: Vec<u8> = (0..300u32)
        .flat_map(|i| [(i % 256) as u8, ((i / 2) % 256) as u8, ((i / 3) % 256) as u8, 255])
        .collect();

    let png = create_png_auto(&pixels, 300, 1).unwrap();
    assert_eq!(color_type(&png), 6);
    let (_, _, decoded) = decode_rgba(&png);
    assert_eq!(decoded, pixels);
}

#[test]
fn test_indexed_is_smaller_for_quantized_data() {
    let mut pixels = Vec::with_capacity(64 * 64 * 4);
    for y in 0..64u32 {
        for x in 0..64u32 {
            let band = ((x + y) / 8) as u8;
            pixels.extend_from_slice(&[band * 16, 128, 255 - band * 16, 255]);
        }
    }

    let indexed = create_png_auto(&pixels, 64, 64).unwrap();
    let rgba = create_png(&pixels, 64, 64).unwrap();
    assert!(
        indexed.len() < rgba.len(),
        "indexed PNG ({} bytes) should be smaller than RGBA ({} bytes)",
        indexed.len(),
        rgba.len()
    );
}

#[test]
fn test_encoding_is_deterministic() {
    let pixels: Vec<u8> = (0..32 * 32u32)
        .flat_map(|i| [(i % 7) as u8 * 30, (i % 5) as u8 * 40, 0, if i % 3 == 0 { 0 } else { 255 }])
        .collect();

    let a = create_png_auto(&pixels, 32, 32).unwrap();
    let b = create_png_auto(&pixels, 32, 32).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Invalid input
// ============================================================================

#[test]
fn test_buffer_size_mismatch_is_processing_error() {
    let err = create_png_auto(&[0u8; 12], 2, 2).unwrap_err();
    assert_eq!(err.category(), "ProcessingError");
}

#[test]
fn test_indexed_rejects_empty_palette() {
    assert!(create_png_indexed(1, 1, &[], &[0]).is_err());
}
