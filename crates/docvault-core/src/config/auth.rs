//! Authentication and password policy configuration.

use serde::{Deserialize, Serialize};

/// Password policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum password length for new accounts.
    #[serde(default = "default_password_min_length")]
    pub password_min_length: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_min_length: default_password_min_length(),
        }
    }
}

fn default_password_min_length() -> u32 {
    8
}
