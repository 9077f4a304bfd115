use super::types::{Rejection, StagedFile};
use crate::utils::file_size::FileSizeUtils;
use tracing::debug;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub added: usize,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub index: usize,
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Default, Clone)]
pub struct FileStaging {
    files: Vec<StagedFile>,
}

impl FileStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every acceptable candidate; unsupported or duplicate ones are reported, not added.
    pub fn add_files<I>(&mut self, candidates: I) -> AddOutcome
    where
        I: IntoIterator<Item = StagedFile>,
    {
        let mut outcome = AddOutcome::default();

        for file in candidates {
            if !file.has_accepted_extension() {
                debug!(name = %file.name, "rejected unsupported file");
                outcome
                    .rejected
                    .push(Rejection::UnsupportedExtension { name: file.name });
                continue;
            }

            if self.files.iter().any(|f| f.same_file(&file)) {
                debug!(name = %file.name, size = file.size, "rejected duplicate file");
                outcome.rejected.push(Rejection::Duplicate { name: file.name });
                continue;
            }

            self.files.push(file);
            outcome.added += 1;
        }

        outcome
    }

    pub fn remove_file(&mut self, index: usize) -> Option<StagedFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The list container is only shown while something is staged.
    pub fn is_visible(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn rows(&self) -> Vec<FileRow> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, file)| FileRow {
                index,
                name: file.name.clone(),
                size_label: FileSizeUtils::format_size(file.size),
            })
            .collect()
    }
}
