use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FileType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub original_name: String,
    pub sanitized_name: String,
    pub mime_type: String,
    pub extension: String,
    pub size: u64,
    pub hash: String,
    pub upload_id: String,
    pub detected_type: FileType,
    pub created_at: DateTime<Utc>,
}
