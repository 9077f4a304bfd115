mod file_list;
mod types;

pub use file_list::{AddOutcome, FileRow, FileStaging};
pub use types::{FileSource, Rejection, StagedFile, ACCEPTED_EXTENSIONS};
