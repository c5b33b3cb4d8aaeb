mod file;
mod metadata;
mod rejection;
mod role;
mod verdict;

pub use file::{DocumentType, FileCandidate, FileContent, FileType, FileTypeDetector, ImageType};
pub use metadata::FileMetadata;
pub use rejection::{Rejection, RejectionCategory};
pub use role::{Role, RoleLimits};
pub use verdict::{BatchVerdict, ValidationVerdict};
