use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use motherboard_defense_core::CellCoord;
use serde::Deserialize;

/// Settings for a headless session, loaded from a TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    pub(crate) width: u32,
    pub(crate) length: u32,
    pub(crate) spawn: [i32; 2],
    pub(crate) step_millis: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 12,
            length: 18,
            spawn: [4, 0],
            step_millis: 125,
        }
    }
}

impl SessionConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse session config toml contents")?;
        if config.step_millis == 0 {
            bail!("step_millis must be positive");
        }
        Ok(config)
    }

    pub(crate) fn spawn(&self) -> CellCoord {
        CellCoord::new(self.spawn[0], self.spawn[1])
    }

    pub(crate) fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_millis)
    }
}
