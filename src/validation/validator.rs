use chrono::Utc;
use tracing::{debug, info, warn};

use super::content::{ContentThreatScanner, ScanOutcome};
use super::filename::{extension_of, has_double_extension, FilenameSafetyChecker, FilenameViolation};
use super::metadata::FileMetadataGenerator;
use super::pdf::inspect_pdf;
use super::roles::RoleLimitPolicy;
use super::signatures::{mime_for_extension, normalize_mime, MagicByteRegistry, SIGNATURE_HEAD_LEN};
use crate::config::MB;
use crate::{FileCandidate, FileMetadata, Rejection, Role, ValidationConfig, ValidationVerdict};

const PDF_MIME: &str = "application/pdf";

/// Runs the per-file pipeline. Every outcome, including I/O failures, comes
/// back as a [`ValidationVerdict`]; nothing is raised to the caller.
#[derive(Debug, Clone, Default)]
pub struct FileValidator {
    config: ValidationConfig,
    metadata: FileMetadataGenerator,
}

impl FileValidator {
    pub fn new(config: ValidationConfig) -> Self {
        let metadata = FileMetadataGenerator::new(config.hash_algorithm);
        Self { config, metadata }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    #[tracing::instrument(skip(self, file), fields(file = %file.name))]
    pub async fn validate_file(&self, file: &FileCandidate) -> ValidationVerdict {
        self.run(file, &self.config.allowed_types).await
    }

    /// Single-file entry point: rejects names the coarse safety check flags
    /// before running the full pipeline.
    #[tracing::instrument(skip(self, file), fields(file = %file.name))]
    pub async fn validate_single_file(&self, file: &FileCandidate) -> ValidationVerdict {
        let check = FilenameSafetyChecker::check(&file.name);
        if let Some(violation) = check.violation {
            let rejection = match violation {
                FilenameViolation::PathTraversal => Rejection::PathTraversal,
                FilenameViolation::NullByteInjection => Rejection::NullByteFilename,
                FilenameViolation::FilenameTooLong => Rejection::FilenameTooLong {
                    max: self.config.max_filename_length,
                },
                FilenameViolation::DangerousCharacters => Rejection::DangerousCharacters,
            };
            return reject(rejection, Vec::new());
        }
        self.run(file, &self.config.allowed_types).await
    }

    /// Applies the role's size ceiling and type list, then the generic pipeline.
    #[tracing::instrument(skip(self, file), fields(file = %file.name))]
    pub async fn validate_file_with_auth(
        &self,
        file: &FileCandidate,
        user_id: &str,
        role: Option<&str>,
    ) -> ValidationVerdict {
        let role = Role::parse(role);
        let limits = RoleLimitPolicy::limits_for(role);
        debug!(user_id, %role, "applying role limits");

        if file.size > limits.max_file_size {
            return reject(Rejection::RoleSizeExceeded { role }, Vec::new());
        }

        let mime_type = normalize_mime(&file.declared_mime_type);
        if !limits.allowed_types.iter().any(|t| *t == mime_type) {
            return reject(Rejection::RoleTypeNotAllowed { role, mime_type }, Vec::new());
        }

        self.run(file, &limits.allowed_types).await
    }

    async fn run(&self, file: &FileCandidate, allowed_types: &[String]) -> ValidationVerdict {
        let mut warnings = Vec::new();
        match self.inspect(file, allowed_types, &mut warnings).await {
            Ok(metadata) => {
                info!(upload_id = %metadata.upload_id, hash = %metadata.hash, "file accepted");
                ValidationVerdict::accepted(metadata, warnings)
            }
            Err(rejection) => reject(rejection, warnings),
        }
    }

    async fn inspect(
        &self,
        file: &FileCandidate,
        allowed_types: &[String],
        warnings: &mut Vec<String>,
    ) -> Result<FileMetadata, Rejection> {
        self.check_structure(file)?;
        self.check_filename_shape(&file.name)?;

        let mime_type = normalize_mime(&file.declared_mime_type);
        check_declared_type(&file.name, &mime_type, allowed_types)?;

        let head = file.read_head(SIGNATURE_HEAD_LEN).await.map_err(|e| {
            warn!(error = %e, "failed to read file head");
            Rejection::SignatureUnverifiable
        })?;
        check_signature(&mime_type, &head, warnings)?;
        debug!("signature verified");

        let bytes = file.read_all().await.map_err(|e| {
            warn!(error = %e, "failed to read file content");
            Rejection::ValidationFailed
        })?;

        if let ScanOutcome::Threat(pattern) = ContentThreatScanner::scan(&bytes) {
            debug!(pattern, "dangerous content found");
            return Err(Rejection::DangerousContent);
        }

        if mime_type == PDF_MIME {
            let report = inspect_pdf(&bytes, &self.config)?;
            warnings.extend(report.warnings);
        }

        Ok(self.metadata.generate_from_bytes(file, &bytes, Utc::now()))
    }

    fn check_structure(&self, file: &FileCandidate) -> Result<(), Rejection> {
        if file.name.is_empty() {
            return Err(Rejection::MissingName);
        }
        if file.size == 0 {
            return Err(Rejection::EmptyFile);
        }
        if file.size > self.config.max_file_size {
            return Err(Rejection::FileTooLarge {
                limit_mb: self.config.max_file_size / MB,
            });
        }
        if file.name.chars().count() > self.config.max_filename_length {
            return Err(Rejection::FilenameTooLong {
                max: self.config.max_filename_length,
            });
        }
        Ok(())
    }

    fn check_filename_shape(&self, name: &str) -> Result<(), Rejection> {
        if name.contains('\0') {
            return Err(Rejection::NullByteFilename);
        }
        if has_double_extension(name) {
            return Err(Rejection::DoubleExtension);
        }
        if extension_of(name).chars().count() > self.config.max_extension_length {
            return Err(Rejection::LongExtension);
        }
        Ok(())
    }
}

fn check_declared_type(name: &str, mime_type: &str, allowed_types: &[String]) -> Result<(), Rejection> {
    if !allowed_types.iter().any(|t| normalize_mime(t) == mime_type) {
        return Err(Rejection::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }

    let extension = extension_of(name);
    if !extension.is_empty() && mime_for_extension(extension) != Some(mime_type) {
        return Err(Rejection::MimeMismatch {
            extension: extension.to_ascii_lowercase(),
            mime_type: mime_type.to_string(),
        });
    }
    Ok(())
}

fn check_signature(mime_type: &str, head: &[u8], warnings: &mut Vec<String>) -> Result<(), Rejection> {
    match MagicByteRegistry::matches(mime_type, head) {
        Some(true) => Ok(()),
        Some(false) => Err(Rejection::SignatureMismatch),
        None => {
            if let Some(kind) = MagicByteRegistry::executable_kind(head) {
                debug!(kind, "executable header behind unregistered type");
                return Err(Rejection::SignatureMismatch);
            }
            warnings.push(format!("No file signature registered for {}", mime_type));
            Ok(())
        }
    }
}

/// Callers run inside a span that already carries the file name.
fn reject(rejection: Rejection, warnings: Vec<String>) -> ValidationVerdict {
    warn!(code = rejection.code(), reason = %rejection, "file rejected");
    ValidationVerdict::rejected(rejection, warnings)
}
