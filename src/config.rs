//! CLI configuration file.
//!
//! ```json
//! { "durations": { "approval": 120, "human_task": 30 }, "fallbackMinutes": 5 }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use stepwise_config::NodeType;
use stepwise_workflow::DurationTable;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
  /// Per-type duration overrides in minutes, keyed by wire name.
  #[serde(default)]
  pub durations: BTreeMap<String, f64>,
  #[serde(default)]
  pub fallback_minutes: Option<f64>,
}

impl Config {
  /// Default location: `<config dir>/stepwise/config.json`.
  pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stepwise").join("config.json"))
  }

  /// Load from an explicit path, or from the default location if a file
  /// exists there. A missing explicit file is an error.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    match explicit {
      Some(path) => Self::from_file(path),
      None => match Self::default_path() {
        Some(path) if path.is_file() => Self::from_file(&path),
        _ => Ok(Self::default()),
      },
    }
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
      .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    config.duration_table()?;
    Ok(config)
  }

  /// Default duration table with this config's overrides applied.
  pub fn duration_table(&self) -> Result<DurationTable> {
    let mut table = DurationTable::default();

    if let Some(minutes) = self.fallback_minutes {
      check_minutes("fallbackMinutes", minutes)?;
      table.set_fallback(minutes);
    }

    for (name, minutes) in &self.durations {
      let Some(node_type) = NodeType::from_wire(name) else {
        bail!("unknown node type in durations: '{}'", name);
      };
      check_minutes(name, *minutes)?;
      table.set(node_type, *minutes);
    }

    Ok(table)
  }
}

fn check_minutes(name: &str, minutes: f64) -> Result<()> {
  if !minutes.is_finite() || minutes < 0.0 {
    bail!("duration for '{}' must be a non-negative number, got {}", name, minutes);
  }
  Ok(())
}
