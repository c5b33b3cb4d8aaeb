use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Role;

/// Why a file or batch was turned away.
///
/// The rendered messages are matched on by upload forms and route handlers,
/// so their wording must not drift.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("No file provided")]
    MissingName,
    #[error("File is empty")]
    EmptyFile,
    #[error("File size exceeds maximum allowed size of {limit_mb}MB")]
    FileTooLarge { limit_mb: u64 },
    #[error("Filename is too long (max {max} characters)")]
    FilenameTooLong { max: usize },
    #[error("Filename contains null bytes")]
    NullByteFilename,
    #[error("Filename contains path traversal sequence")]
    PathTraversal,
    #[error("Filename contains dangerous characters")]
    DangerousCharacters,
    #[error("File has suspicious double extension")]
    DoubleExtension,
    #[error("File extension is suspiciously long")]
    LongExtension,
    #[error("File type {mime_type} is not allowed")]
    UnsupportedType { mime_type: String },
    #[error("MIME type mismatch: .{extension} files cannot be declared as {mime_type}")]
    MimeMismatch { extension: String, mime_type: String },
    #[error("File signature does not match declared type")]
    SignatureMismatch,
    #[error("Unable to verify file signature")]
    SignatureUnverifiable,
    #[error("File contains potentially dangerous content")]
    DangerousContent,
    #[error("PDF contains potentially dangerous JavaScript")]
    PdfJavaScript,
    #[error("PDF contains launch actions")]
    PdfLaunchAction,
    #[error("File size exceeds limit for {role} accounts")]
    RoleSizeExceeded { role: Role },
    #[error("File type {mime_type} is not allowed for {role} accounts")]
    RoleTypeNotAllowed { role: Role, mime_type: String },
    #[error("File validation failed")]
    ValidationFailed,
    #[error("At least one file is required")]
    NoFiles,
    #[error("Maximum {max} files allowed")]
    TooManyFiles { max: usize },
    #[error("Total file size cannot exceed {limit_mb}MB")]
    BatchTooLarge { limit_mb: u64 },
    #[error("One or more files failed security validation")]
    BatchMemberFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCategory {
    Structural,
    TypeMismatch,
    Content,
    Policy,
    Infrastructure,
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::MissingName => "FILE_MISSING",
            Rejection::EmptyFile => "FILE_EMPTY",
            Rejection::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Rejection::FilenameTooLong { .. } => "FILENAME_TOO_LONG",
            Rejection::NullByteFilename => "NULL_BYTE_INJECTION",
            Rejection::PathTraversal => "PATH_TRAVERSAL",
            Rejection::DangerousCharacters => "DANGEROUS_CHARACTERS",
            Rejection::DoubleExtension => "DOUBLE_EXTENSION",
            Rejection::LongExtension => "EXTENSION_TOO_LONG",
            Rejection::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            Rejection::MimeMismatch { .. } => "MIME_MISMATCH",
            Rejection::SignatureMismatch => "SIGNATURE_MISMATCH",
            Rejection::SignatureUnverifiable => "SIGNATURE_UNVERIFIABLE",
            Rejection::DangerousContent => "DANGEROUS_CONTENT",
            Rejection::PdfJavaScript => "PDF_JAVASCRIPT",
            Rejection::PdfLaunchAction => "PDF_LAUNCH_ACTION",
            Rejection::RoleSizeExceeded { .. } => "ROLE_SIZE_EXCEEDED",
            Rejection::RoleTypeNotAllowed { .. } => "ROLE_TYPE_NOT_ALLOWED",
            Rejection::ValidationFailed => "VALIDATION_FAILED",
            Rejection::NoFiles => "NO_FILES",
            Rejection::TooManyFiles { .. } => "TOO_MANY_FILES",
            Rejection::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Rejection::BatchMemberFailed => "BATCH_MEMBER_FAILED",
        }
    }

    pub fn category(&self) -> RejectionCategory {
        match self {
            Rejection::MissingName
            | Rejection::EmptyFile
            | Rejection::FileTooLarge { .. }
            | Rejection::FilenameTooLong { .. }
            | Rejection::NullByteFilename
            | Rejection::PathTraversal
            | Rejection::DangerousCharacters
            | Rejection::DoubleExtension
            | Rejection::LongExtension => RejectionCategory::Structural,

            Rejection::UnsupportedType { .. }
            | Rejection::MimeMismatch { .. }
            | Rejection::SignatureMismatch => RejectionCategory::TypeMismatch,

            Rejection::DangerousContent | Rejection::PdfJavaScript | Rejection::PdfLaunchAction => {
                RejectionCategory::Content
            }

            Rejection::RoleSizeExceeded { .. }
            | Rejection::RoleTypeNotAllowed { .. }
            | Rejection::NoFiles
            | Rejection::TooManyFiles { .. }
            | Rejection::BatchTooLarge { .. }
            | Rejection::BatchMemberFailed => RejectionCategory::Policy,

            Rejection::SignatureUnverifiable | Rejection::ValidationFailed => {
                RejectionCategory::Infrastructure
            }
        }
    }
}
