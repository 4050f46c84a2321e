//! View configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::ViewError;

pub const DEFAULT_NOTICE_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_MIXIN_COUNT: i64 = 10;
pub const DEFAULT_HEALTHY_CONNECTIONS: u64 = 8;
pub const DEFAULT_ALIAS_MIN_INPUT: usize = 2;
pub const DEFAULT_ADDRESS_PREVIEW_CHARS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// How long the transfer success notice stays up.
    #[serde(with = "duration_secs")]
    pub notice_timeout: Duration,
    /// Upper bound (inclusive) for the transfer mixin count.
    pub max_mixin_count: i64,
    /// Outbound connection count at which the connection counter is styled healthy.
    pub healthy_connections: u64,
    /// Minimum input length before alias suggestions are offered.
    pub alias_min_input: usize,
    /// Characters kept from each end of an address in short labels.
    pub address_preview_chars: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            notice_timeout: DEFAULT_NOTICE_TIMEOUT,
            max_mixin_count: DEFAULT_MAX_MIXIN_COUNT,
            healthy_connections: DEFAULT_HEALTHY_CONNECTIONS,
            alias_min_input: DEFAULT_ALIAS_MIN_INPUT,
            address_preview_chars: DEFAULT_ADDRESS_PREVIEW_CHARS,
        }
    }
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON config file. Missing keys fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ViewError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn with_notice_timeout(mut self, timeout: Duration) -> Self {
        self.notice_timeout = timeout;
        self
    }

    pub fn with_max_mixin_count(mut self, max: i64) -> Self {
        self.max_mixin_count = max;
        self
    }

    pub fn with_healthy_connections(mut self, count: u64) -> Self {
        self.healthy_connections = count;
        self
    }

    pub fn with_alias_min_input(mut self, len: usize) -> Self {
        self.alias_min_input = len;
        self
    }

    pub fn with_address_preview_chars(mut self, chars: usize) -> Self {
        self.address_preview_chars = chars;
        self
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
