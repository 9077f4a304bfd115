use crate::staging::{Rejection, StagedFile};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct Intake {
    pub files: Vec<StagedFile>,
    pub rejected: Vec<Rejection>,
    pub unreadable: Vec<String>,
}

impl Intake {
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        let mut intake = Self::default();
        for path in paths {
            intake.push_path(path);
        }
        intake
    }

    pub fn from_dropped(dropped: Vec<egui::DroppedFile>) -> Self {
        let mut intake = Self::default();
        for file in dropped {
            if let Some(path) = file.path {
                intake.push_path(path);
            } else if let Some(bytes) = file.bytes {
                intake.files.push(StagedFile::from_bytes(file.name, bytes));
            } else {
                debug!(name = %file.name, "dropped file carried neither path nor bytes");
            }
        }
        intake
    }

    fn push_path(&mut self, path: PathBuf) {
        // Folders count as an unsupported format, like any other non-HWP drop.
        if path.is_dir() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            self.rejected.push(Rejection::UnsupportedExtension { name });
            return;
        }

        match StagedFile::from_path(&path) {
            Ok(file) => self.files.push(file),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot stage file");
                self.unreadable
                    .push(format!("Could not read \"{}\": {}", path.display(), err));
            }
        }
    }
}
