pub mod batch;
pub mod content;
pub mod filename;
pub mod metadata;
pub mod pdf;
pub mod roles;
pub mod signatures;
pub mod validator;

pub use batch::BatchValidator;
pub use content::{ContentThreatScanner, ScanOutcome, TextDecoding};
pub use filename::{FilenameCheck, FilenameSafetyChecker, FilenameSanitizer, FilenameViolation};
pub use metadata::FileMetadataGenerator;
pub use roles::RoleLimitPolicy;
pub use signatures::MagicByteRegistry;
pub use validator::FileValidator;
