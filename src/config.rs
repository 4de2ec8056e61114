//! Deployment configuration.
//!
//! `GenerationConfig` must be bit-identical on every participant. Nothing at
//! runtime checks that; the config fingerprint is logged at startup so two
//! deployments can be compared by eye.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::error::{ArenaError, ArenaResult};
use crate::logging::TracingConfig;

/// Static generator parameters (the original arena shipped 20x20, cell 2.0)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub width: u32,
    pub height: u32,
    pub cell_size: f32,
    pub extra_branches: u32,
    pub branch_length: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            cell_size: 2.0,
            extra_branches: 10,
            branch_length: 4,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> ArenaResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ArenaError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ArenaError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.branch_length > i32::MAX as u32 / 2 {
            return Err(ArenaError::InvalidConfig(format!(
                "branch_length {} is too large",
                self.branch_length
            )));
        }
        Ok(())
    }

    pub fn width_cells(&self) -> usize {
        self.width as usize
    }

    pub fn height_cells(&self) -> usize {
        self.height as usize
    }

    /// Stable hash of every field, for comparing deployments in logs
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Sha3_256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.cell_size.to_bits().to_le_bytes());
        hasher.update(self.extra_branches.to_le_bytes());
        hasher.update(self.branch_length.to_le_bytes());
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(head)
    }
}

/// Which side of the replicated seed this process is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Authority,
    Client,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub role: Role,
    /// Participant ordinal; the authority is always 0
    pub ordinal: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            role: Role::Authority,
            ordinal: 0,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ArenaResult<()> {
        match (self.role, self.ordinal) {
            (Role::Authority, 0) => Ok(()),
            (Role::Authority, n) => Err(ArenaError::InvalidConfig(format!(
                "authority must use ordinal 0, got {n}"
            ))),
            (Role::Client, 0) => Err(ArenaError::InvalidConfig(
                "ordinal 0 is reserved for the authority".into(),
            )),
            (Role::Client, _) => Ok(()),
        }
    }
}

/// Top-level file layout of `config/arena.ron`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub generation: GenerationConfig,
    pub session: SessionConfig,
    pub tracing: TracingConfig,
}

impl ArenaConfig {
    pub fn from_ron_str(source: &str) -> ArenaResult<Self> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ArenaResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// `None` when the file does not exist; a present but broken file is an error
    pub fn try_load(path: impl AsRef<Path>) -> ArenaResult<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Missing file means defaults; a present but broken file is still an error
    pub fn load_or_default(path: impl AsRef<Path>) -> ArenaResult<Self> {
        let path = path.as_ref();
        match Self::try_load(path)? {
            Some(config) => Ok(config),
            None => {
                warn!("Config file not found: {:?}, using defaults", path);
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> ArenaResult<()> {
        self.generation.validate()?;
        self.session.validate()
    }

    pub fn to_ron(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_original_arena() {
        let config = GenerationConfig::default();
        assert_eq!(config.width, 20);
        assert_eq!(config.height, 20);
        assert_eq!(config.cell_size, 2.0);
        assert_eq!(config.extra_branches, 10);
        assert_eq!(config.branch_length, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = GenerationConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ArenaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        for cell_size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = GenerationConfig {
                cell_size,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "cell_size {cell_size} accepted");
        }
    }

    #[test]
    fn test_fingerprint_tracks_every_field() {
        let base = GenerationConfig::default();
        let changed = [
            GenerationConfig { width: 21, ..base.clone() },
            GenerationConfig { height: 19, ..base.clone() },
            GenerationConfig { cell_size: 2.5, ..base.clone() },
            GenerationConfig { extra_branches: 0, ..base.clone() },
            GenerationConfig { branch_length: 5, ..base.clone() },
        ];
        for other in changed {
            assert_ne!(base.fingerprint(), other.fingerprint(), "{other:?}");
        }
        assert_eq!(base.fingerprint(), GenerationConfig::default().fingerprint());
    }

    #[test]
    fn test_session_ordinal_rules() {
        assert!(SessionConfig::default().validate().is_ok());
        let bad_authority = SessionConfig {
            role: Role::Authority,
            ordinal: 3,
        };
        assert!(bad_authority.validate().is_err());
        let bad_client = SessionConfig {
            role: Role::Client,
            ordinal: 0,
        };
        assert!(bad_client.validate().is_err());
        let client = SessionConfig {
            role: Role::Client,
            ordinal: 1,
        };
        assert!(client.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config = ArenaConfig::from_ron_str("(generation: (width: 8, height: 6, cell_size: 1.0, extra_branches: 2, branch_length: 3))")
            .unwrap();
        assert_eq!(config.generation.width, 8);
        assert_eq!(config.generation.height, 6);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = ArenaConfig::default();
        let restored = ArenaConfig::from_ron_str(&config.to_ron()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_invalid_ron_is_parse_error() {
        let result = ArenaConfig::from_ron_str("(generation: (width: ");
        assert!(matches!(result, Err(ArenaError::Parse(_))));
    }
}
