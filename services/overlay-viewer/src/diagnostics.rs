//! Debug information about the working directory and the data directory.

use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Snapshot of what the viewer can see on disk.
#[derive(Debug, Clone)]
pub struct DataDirReport {
    pub working_dir: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub exists: bool,
    /// Files under `data_dir`, relative to it, sorted
    pub files: Vec<PathBuf>,
}

impl DataDirReport {
    /// Inspect `data_dir`. A missing directory is reported, not an error.
    pub fn inspect(data_dir: &Path) -> Self {
        let exists = data_dir.is_dir();
        let mut files: Vec<PathBuf> = if exists {
            WalkDir::new(data_dir)
                .max_depth(2)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| e.path().strip_prefix(data_dir).ok().map(Path::to_path_buf))
                .collect()
        } else {
            Vec::new()
        };
        files.sort();

        Self {
            working_dir: std::env::current_dir().ok(),
            data_dir: data_dir.to_path_buf(),
            exists,
            files,
        }
    }
}

impl fmt::Display for DataDirReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.working_dir {
            Some(cwd) => writeln!(f, "Current working directory: {}", cwd.display())?,
            None => writeln!(f, "Current working directory: <unavailable>")?,
        }
        if !self.exists {
            return write!(f, "Data directory '{}' does not exist", self.data_dir.display());
        }
        write!(f, "Data directory contents ({}):", self.data_dir.display())?;
        if self.files.is_empty() {
            write!(f, " <empty>")?;
        }
        for file in &self.files {
            write!(f, "\n  {}", file.display())?;
        }
        Ok(())
    }
}
