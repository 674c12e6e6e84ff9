//! Stitching configuration, loadable from JSON.
//!
//! Every field has a default, so a config file only lists what it changes:
//!
//! ```json
//! { "pause": { "normal_base_secs": 2.5 }, "fades": { "fade_chunk_tails": true } }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    assemble::FadeConfig,
    error::{Result, StitchError},
    pause::PauseConfig,
};

/// Longest single pause value a config may set, in seconds.
const MAX_PAUSE_SECS: f64 = 60.0;
/// Longest fade window a config may set, in seconds.
const MAX_FADE_SECS: f64 = 1.0;

fn check_secs(name: &str, secs: f64, max: f64) -> Result<()> {
    if secs.is_finite() && (0.0..=max).contains(&secs) {
        Ok(())
    } else {
        Err(StitchError::InvalidConfig(format!(
            "{name} = {secs} (expected 0 to {max} seconds)"
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    pub pause: PauseConfig,
    pub fades: FadeConfig,
    /// Speak a closing "." when the text does not end in `.`, `!` or `?`.
    pub terminal_period: bool,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            pause: PauseConfig::default(),
            fades: FadeConfig::default(),
            terminal_period: true,
        }
    }
}

impl StitchConfig {
    /// Reject pause and fade lengths that are negative, non-finite or too
    /// long to allocate as silence.
    pub fn validate(&self) -> Result<()> {
        let pause = &self.pause;
        check_secs("pause.fast_base_secs", pause.fast_base_secs, MAX_PAUSE_SECS)?;
        check_secs("pause.normal_base_secs", pause.normal_base_secs, MAX_PAUSE_SECS)?;
        check_secs("pause.long_pair_bonus_secs", pause.long_pair_bonus_secs, MAX_PAUSE_SECS)?;

        let fades = &self.fades;
        check_secs("fades.silence_fade_secs", fades.silence_fade_secs, MAX_FADE_SECS)?;
        check_secs("fades.lead_in_fade_secs", fades.lead_in_fade_secs, MAX_FADE_SECS)?;
        check_secs("fades.tail_fade_secs", fades.tail_fade_secs, MAX_FADE_SECS)?;
        Ok(())
    }

    /// Parse and [`validate`](Self::validate) a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| StitchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(StitchConfig::from_json_str("{}").unwrap(), StitchConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let cfg = StitchConfig::from_json_str(
            r#"{ "pause": { "normal_base_secs": 2.5 }, "fades": { "fade_chunk_tails": true } }"#,
        )
        .unwrap();
        assert_eq!(cfg.pause.normal_base_secs, 2.5);
        assert_eq!(cfg.pause.fast_base_secs, 1.8);
        assert!(cfg.fades.fade_chunk_tails);
        assert_eq!(cfg.fades.lead_in_fade_secs, 0.008);
        assert!(cfg.terminal_period);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            StitchConfig::from_json_str("{ nope"),
            Err(StitchError::Config(_))
        ));
    }

    #[test]
    fn test_huge_pause_rejected_at_load() {
        for json in [
            r#"{ "pause": { "normal_base_secs": 1e300 } }"#,
            r#"{ "pause": { "normal_base_secs": 1e6 } }"#,
            r#"{ "pause": { "fast_base_secs": -1.0 } }"#,
            r#"{ "fades": { "silence_fade_secs": 5.0 } }"#,
        ] {
            assert!(
                matches!(StitchConfig::from_json_str(json), Err(StitchError::InvalidConfig(_))),
                "accepted {json}"
            );
        }
    }

    #[test]
    fn test_validate_non_finite() {
        let mut cfg = StitchConfig::default();
        cfg.pause.long_pair_bonus_secs = f64::INFINITY;
        assert!(matches!(cfg.validate(), Err(StitchError::InvalidConfig(_))));

        let mut cfg = StitchConfig::default();
        cfg.fades.tail_fade_secs = f64::NAN;
        assert!(matches!(cfg.validate(), Err(StitchError::InvalidConfig(_))));

        assert!(StitchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_stitcher_rejects_invalid_config() {
        let mut cfg = StitchConfig::default();
        cfg.pause.normal_base_secs = 1e300;
        assert!(matches!(
            crate::Stitcher::with_config(cfg),
            Err(StitchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stitch.json");
        fs::write(&path, r#"{ "terminal_period": false }"#).unwrap();
        assert!(!StitchConfig::from_json_file(&path).unwrap().terminal_period);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            StitchConfig::from_json_file(&missing),
            Err(StitchError::Io { .. })
        ));
    }
}
