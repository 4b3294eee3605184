use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::card::Theme;
use crate::score::ScoreWeights;

/// Optional settings loaded from a TOML file.
///
/// Example:
/// ```toml
/// fonts = ["/usr/share/fonts/TTF/Inter-Regular.ttf"]
/// theme = "light"
///
/// [weights]
/// commits_per_point = 10.0
/// pr = 0.6
/// star = 0.15
/// contributed_to = 1.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Font files tried before the system search list.
    pub fonts: Vec<PathBuf>,
    pub theme: Option<Theme>,
    pub weights: ScoreWeights,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Err(errors) = validate_weights(&config.weights) {
            bail!(
                "Invalid scoring weights in {}:\n  - {}",
                path.display(),
                errors.join("\n  - ")
            );
        }

        Ok(config)
    }
}

/// Check that every weight is usable. Returns all problems found.
pub fn validate_weights(weights: &ScoreWeights) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let named = [
        ("commits_per_point", weights.commits_per_point),
        ("pr", weights.pr),
        ("star", weights.star),
        ("contributed_to", weights.contributed_to),
    ];
    for (name, value) in named {
        if !value.is_finite() {
            errors.push(format!("{name} must be a finite number, got {value}"));
        } else if value < 0.0 {
            errors.push(format!("{name} must not be negative, got {value}"));
        }
    }

    if weights.commits_per_point == 0.0 {
        errors.push("commits_per_point must be greater than zero".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
