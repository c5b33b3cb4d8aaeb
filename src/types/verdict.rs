use serde::Serialize;

use super::{FileMetadata, Rejection};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationVerdict {
    pub is_secure: bool,
    pub error: Option<String>,
    pub warnings: Vec<String>,
    pub metadata: Option<FileMetadata>,
    #[serde(skip)]
    pub rejection: Option<Rejection>,
}

impl ValidationVerdict {
    pub fn accepted(metadata: FileMetadata, warnings: Vec<String>) -> Self {
        Self {
            is_secure: true,
            error: None,
            warnings,
            metadata: Some(metadata),
            rejection: None,
        }
    }

    pub fn rejected(rejection: Rejection, warnings: Vec<String>) -> Self {
        Self {
            is_secure: false,
            error: Some(rejection.to_string()),
            warnings,
            metadata: None,
            rejection: Some(rejection),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchVerdict {
    pub is_valid: bool,
    pub error: Option<String>,
    pub results: Vec<ValidationVerdict>,
    #[serde(skip)]
    pub rejection: Option<Rejection>,
}

impl BatchVerdict {
    pub fn rejected(rejection: Rejection, results: Vec<ValidationVerdict>) -> Self {
        Self {
            is_valid: false,
            error: Some(rejection.to_string()),
            results,
            rejection: Some(rejection),
        }
    }

    /// Valid only when every member verdict is secure.
    pub fn from_results(results: Vec<ValidationVerdict>) -> Self {
        if results.iter().all(|r| r.is_secure) {
            Self {
                is_valid: true,
                error: None,
                results,
                rejection: None,
            }
        } else {
            Self::rejected(Rejection::BatchMemberFailed, results)
        }
    }
}
