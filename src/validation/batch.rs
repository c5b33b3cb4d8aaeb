use tracing::{info, warn};

use super::validator::FileValidator;
use crate::config::MB;
use crate::{BatchVerdict, FileCandidate, Rejection, ValidationConfig, ValidationVerdict};

/// Cross-file policy in front of [`FileValidator`].
#[derive(Debug, Clone, Default)]
pub struct BatchValidator {
    validator: FileValidator,
}

impl BatchValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            validator: FileValidator::new(config),
        }
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }

    #[tracing::instrument(skip(self, files), fields(count = files.len()))]
    pub async fn validate_files(&self, files: &[FileCandidate]) -> BatchVerdict {
        if let Err(rejection) = self.check_policy(files) {
            return rejected(rejection);
        }

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            results.push(self.validator.validate_file(file).await);
        }
        summarize(results)
    }

    /// Same batch policy, with every file going through the role-aware path.
    #[tracing::instrument(skip(self, files), fields(count = files.len()))]
    pub async fn validate_files_with_auth(
        &self,
        files: &[FileCandidate],
        user_id: &str,
        role: Option<&str>,
    ) -> BatchVerdict {
        if let Err(rejection) = self.check_policy(files) {
            return rejected(rejection);
        }

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            results.push(self.validator.validate_file_with_auth(file, user_id, role).await);
        }
        summarize(results)
    }

    fn check_policy(&self, files: &[FileCandidate]) -> Result<(), Rejection> {
        let config = self.validator.config();

        if files.is_empty() {
            return Err(Rejection::NoFiles);
        }
        if files.len() > config.max_files {
            return Err(Rejection::TooManyFiles { max: config.max_files });
        }

        let total: u64 = files.iter().map(|f| f.size).fold(0u64, |acc, s| acc.saturating_add(s));
        if total > config.max_total_size {
            return Err(Rejection::BatchTooLarge {
                limit_mb: config.max_total_size / MB,
            });
        }
        Ok(())
    }
}

fn rejected(rejection: Rejection) -> BatchVerdict {
    warn!(code = rejection.code(), reason = %rejection, "batch rejected");
    BatchVerdict::rejected(rejection, Vec::new())
}

fn summarize(results: Vec<ValidationVerdict>) -> BatchVerdict {
    let verdict = BatchVerdict::from_results(results);
    if verdict.is_valid {
        info!(count = verdict.results.len(), "batch accepted");
    } else {
        warn!(
            failed = verdict.results.iter().filter(|r| !r.is_secure).count(),
            "batch contains rejected files"
        );
    }
    verdict
}
