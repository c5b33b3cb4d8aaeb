pub mod config;
pub mod error;
pub mod ratelimit;
pub mod validation;

mod types;

pub use config::{GuardConfig, HashAlgorithm, RateLimitConfig, ValidationConfig};
pub use error::{GuardError, Result};
pub use ratelimit::{
    Clock, ManualClock, MemoryRateLimitStore, RateLimitDecision, RateLimitStore, RateLimiter,
    RateWindowRecord, SystemClock,
};
pub use types::*;
pub use validation::{
    BatchValidator, ContentThreatScanner, FileMetadataGenerator, FileValidator,
    FilenameSafetyChecker, FilenameSanitizer, MagicByteRegistry, RoleLimitPolicy,
};
