use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Cfi,
    SchoolAdmin,
    Default,
}

impl Role {
    /// Unknown or missing roles fall back to `Role::Default`.
    pub fn parse(role: Option<&str>) -> Self {
        match role.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("student") => Role::Student,
            Some("cfi") => Role::Cfi,
            Some("school_admin") => Role::SchoolAdmin,
            _ => Role::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Cfi => "cfi",
            Role::SchoolAdmin => "school_admin",
            Role::Default => "default",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLimits {
    pub max_file_size: u64,
    pub max_files_per_hour: u32,
    pub allowed_types: Vec<String>,
}
