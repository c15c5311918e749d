//! "Save blob as file" collaborators

use std::path::{Path, PathBuf};

use crate::ExportError;

/// Persists a produced document under the given file name
pub trait FileSaver {
    /// Returns where the document ended up
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes documents into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved export document");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_saver_creates_dir() {
        let temp = tempfile::tempdir().unwrap();
        let mut saver = DirectorySaver::new(temp.path().join("exports"));

        let path = saver.save("students.xlsx", b"data").unwrap();
        assert_eq!(path, temp.path().join("exports").join("students.xlsx"));
        assert_eq!(std::fs::read(path).unwrap(), b"data");
    }
}
