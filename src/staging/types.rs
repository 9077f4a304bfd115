use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["hwp", "hwpx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Disk(PathBuf),
    /// Content handed over directly by a drop that carried no path.
    Memory(Arc<[u8]>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub size: u64,
    pub source: FileSource,
}

impl StagedFile {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
            .to_string_lossy()
            .to_string();

        Ok(Self {
            name,
            size: metadata.len(),
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Checks the text after the last `.` against [`ACCEPTED_EXTENSIONS`], ignoring case.
    pub fn has_accepted_extension(&self) -> bool {
        match self.name.rfind('.') {
            Some(idx) => {
                let ext = self.name[idx + 1..].to_lowercase();
                ACCEPTED_EXTENSIONS.contains(&ext.as_str())
            }
            None => false,
        }
    }

    /// Two staged files are the same document when name and size both match.
    pub fn same_file(&self, other: &StagedFile) -> bool {
        self.name == other.name && self.size == other.size
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Disk(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Why a candidate file was not staged. The display text is the warning shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("\"{name}\" is not a supported format")]
    UnsupportedExtension { name: String },

    #[error("\"{name}\" has already been added")]
    Duplicate { name: String },
}
