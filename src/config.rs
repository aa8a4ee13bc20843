use crate::military::formation::Formation;
use crate::military::squad::Behavior;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Defaults applied to every newly created squad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadConfig {
    pub max_size: usize,
    pub spacing_x: i32,
    pub spacing_y: i32,
    pub formation: Formation,
    pub behavior: Behavior,
    pub action_interval_seconds: f64,
}

impl Default for SquadConfig {
    fn default() -> SquadConfig {
        SquadConfig {
            max_size: 8,
            spacing_x: 1,
            spacing_y: 0,
            formation: Formation::CenteredLine,
            behavior: Behavior::Follow,
            action_interval_seconds: 3.0,
        }
    }
}

/// Extents and agent defaults for the sandbox host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    /// World units per second.
    pub agent_speed: f32,
    /// How long a squad move pins an agent's idle posture.
    pub idle_posture_seconds: f64,
    /// Largest distance at which a cursor selects an agent.
    pub selection_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> WorldConfig {
        WorldConfig {
            width: 256,
            height: 256,
            agent_speed: 4.0,
            idle_posture_seconds: 10.0,
            selection_radius: 3.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub squad: SquadConfig,
    pub world: WorldConfig,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn load<P>(path: P) -> Result<Settings, ConfigError>
    where
        P: AsRef<Path>,
    {
        let contents = fs::read_to_string(path)?;

        Settings::from_json(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.squad.max_size == 0 {
            return Err(ConfigError::Invalid("squad.max_size must be at least 1".to_owned()));
        }

        if !(self.squad.action_interval_seconds > 0.0) {
            return Err(ConfigError::Invalid("squad.action_interval_seconds must be positive".to_owned()));
        }

        if self.world.width == 0 || self.world.height == 0 {
            return Err(ConfigError::Invalid("world extents must be non-zero".to_owned()));
        }

        if !(self.world.agent_speed > 0.0) {
            return Err(ConfigError::Invalid("world.agent_speed must be positive".to_owned()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.squad.max_size, 8);
        assert_eq!(settings.squad.formation, Formation::CenteredLine);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = Settings::from_json(r#"{ "squad": { "max_size": 3, "formation": "Circle" } }"#).unwrap();

        assert_eq!(settings.squad.max_size, 3);
        assert_eq!(settings.squad.formation, Formation::Circle);
        assert_eq!(settings.squad.spacing_x, 1);
        assert_eq!(settings.world.width, 256);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = Settings::from_json(r#"{ "squad": { "max_size": 0 } }"#).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Settings::from_json("{ squad"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "world": {{ "width": 64, "height": 32 }} }}"#).unwrap();

        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.world.width, 64);
        assert_eq!(settings.world.height, 32);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(Settings::load(dir.path().join("missing.json")), Err(ConfigError::Io(_))));
    }
}
