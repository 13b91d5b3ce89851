//! Change notification configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the real-time change broadcaster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffer size of the broadcast channel. Slow subscribers that fall
    /// more than this many messages behind start losing messages.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    256
}
