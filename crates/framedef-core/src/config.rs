//! Engine tuning.

use serde::{Deserialize, Serialize};

/// Hash chain counts for each namespace.
///
/// Chain counts only affect lookup speed; any positive value is correct.
///
/// # Example
///
/// ```
/// use framedef_core::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "state_chains": 101 }"#).unwrap();
/// assert_eq!(config.state_chains, 101);
/// assert_eq!(config.thing_chains, EngineConfig::default().thing_chains);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Buckets in the state name and id indexes.
    pub state_chains: usize,
    /// Buckets in the thing type indexes.
    pub thing_chains: usize,
    /// Buckets in the sound indexes.
    pub sound_chains: usize,
    /// Buckets in the string indexes.
    pub string_chains: usize,
    /// Buckets in the sprite name index.
    pub sprite_chains: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_chains: 2003,
            thing_chains: 307,
            sound_chains: 257,
            string_chains: 67,
            sprite_chains: 257,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_roundtrip() {
        let config = EngineConfig {
            state_chains: 7,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn empty_document_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
