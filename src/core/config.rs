//! Tunable parameters and asset-slot mapping for a game.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A parameter value as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view; text values that parse as numbers count too.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

/// Description of one tunable slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl ParamSpec {
    /// Clamp `value` into range and snap it to the slider step.
    pub fn sanitize(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.step > 0.0 {
            let steps = ((clamped - self.min) / self.step).round();
            (self.min + steps * self.step).min(self.max)
        } else {
            clamped
        }
    }
}

/// A slot a user sprite can replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSlot {
    pub id: &'static str,
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Per-game overrides: parameters plus sprite paths by slot id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
    #[serde(default)]
    pub assets: BTreeMap<String, PathBuf>,
}

impl GameConfig {
    pub fn with_param(mut self, id: &str, value: f64) -> Self {
        self.params.insert(id.to_string(), ParamValue::Number(value));
        self
    }

    /// Value of `spec` in this config, sanitized, or the spec default.
    pub fn resolve(&self, spec: &ParamSpec) -> f64 {
        self.params
            .get(spec.id)
            .and_then(ParamValue::as_f64)
            .map(|v| spec.sanitize(v))
            .unwrap_or(spec.default)
    }
}

/// Look up `id` in `specs` and resolve it against `config`.
pub fn param(config: &GameConfig, specs: &[ParamSpec], id: &str) -> f64 {
    specs
        .iter()
        .find(|s| s.id == id)
        .map(|s| config.resolve(s))
        .unwrap_or(0.0)
}

/// Whole config file: one `GameConfig` per game id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcadeConfig {
    #[serde(default)]
    pub games: BTreeMap<String, GameConfig>,
}

impl ArcadeConfig {
    pub const FILENAME: &'static str = "config.json";

    /// Load from the arcade directory, falling back to defaults.
    pub fn load() -> Self {
        crate::utils::persistence::load_json_or_default(Self::FILENAME)
    }

    pub fn save(&self) -> std::io::Result<()> {
        crate::utils::persistence::save_json(Self::FILENAME, self)
    }

    pub fn game(&self, id: &str) -> GameConfig {
        self.games.get(id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEED: ParamSpec = ParamSpec {
        id: "carSpeed",
        name: "Car Speed",
        min: 1.0,
        max: 6.0,
        step: 0.5,
        default: 3.0,
    };

    #[test]
    fn test_missing_param_uses_default() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.resolve(&SPEED), 3.0);
    }

    #[test]
    fn test_param_clamped_and_snapped() {
        assert_eq!(GameConfig::default().with_param("carSpeed", 99.0).resolve(&SPEED), 6.0);
        assert_eq!(GameConfig::default().with_param("carSpeed", 0.0).resolve(&SPEED), 1.0);
        assert_eq!(GameConfig::default().with_param("carSpeed", 2.3).resolve(&SPEED), 2.5);
    }

    #[test]
    fn test_text_params_parse() {
        let mut cfg = GameConfig::default();
        cfg.params
            .insert("carSpeed".into(), ParamValue::Text(" 4 ".into()));
        assert_eq!(cfg.resolve(&SPEED), 4.0);
        cfg.params
            .insert("carSpeed".into(), ParamValue::Text("fast".into()));
        assert_eq!(cfg.resolve(&SPEED), 3.0);
    }

    #[test]
    fn test_config_json_shape() {
        let json = r#"{
            "games": {
                "crossy-road": {
                    "params": { "carSpeed": 4.5, "difficulty": "2" },
                    "assets": { "player": "/tmp/frog.txt" }
                }
            }
        }"#;
        let cfg: ArcadeConfig = serde_json::from_str(json).expect("valid config");
        let game = cfg.game("crossy-road");
        assert_eq!(game.params.get("carSpeed"), Some(&ParamValue::Number(4.5)));
        assert_eq!(game.params.get("difficulty").and_then(ParamValue::as_f64), Some(2.0));
        assert_eq!(game.assets.get("player"), Some(&PathBuf::from("/tmp/frog.txt")));
        assert_eq!(cfg.game("unknown"), GameConfig::default());
    }

    #[test]
    fn test_param_lookup_by_id() {
        let specs = [SPEED];
        let cfg = GameConfig::default().with_param("carSpeed", 5.0);
        assert_eq!(param(&cfg, &specs, "carSpeed"), 5.0);
        assert_eq!(param(&cfg, &specs, "nope"), 0.0);
    }
}
