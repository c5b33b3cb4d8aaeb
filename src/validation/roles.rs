use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::config::MB;
use crate::{Role, RoleLimits};

fn limits(max_file_size: u64, max_files_per_hour: u32, allowed_types: &[&str]) -> RoleLimits {
    RoleLimits {
        max_file_size,
        max_files_per_hour,
        allowed_types: allowed_types.iter().map(|t| t.to_string()).collect(),
    }
}

const BASE_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];
const ELEVATED_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png", "image/webp"];

lazy_static! {
    static ref ROLE_LIMITS: HashMap<Role, RoleLimits> = {
        let mut m = HashMap::new();
        m.insert(Role::Student, limits(5 * MB, 10, BASE_TYPES));
        m.insert(Role::Cfi, limits(20 * MB, 50, ELEVATED_TYPES));
        m.insert(Role::SchoolAdmin, limits(50 * MB, 200, ELEVATED_TYPES));
        m.insert(Role::Default, limits(10 * MB, 20, BASE_TYPES));
        m
    };
}

pub struct RoleLimitPolicy;

impl RoleLimitPolicy {
    pub fn limits_for(role: Role) -> &'static RoleLimits {
        ROLE_LIMITS
            .get(&role)
            .unwrap_or_else(|| &ROLE_LIMITS[&Role::Default])
    }

    /// Same as [`Self::limits_for`] for a raw role string; unknown roles get the defaults.
    pub fn limits_for_str(role: Option<&str>) -> &'static RoleLimits {
        Self::limits_for(Role::parse(role))
    }
}
