use anyhow::Context;
use clap::Args;
use garapon_core::GameConfig;
use std::path::{Path, PathBuf};

/// Command line values that take precedence over the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Animation frames before the drum stops by itself
    #[arg(long)]
    pub patience: Option<u32>,

    /// Milliseconds per animation frame
    #[arg(long)]
    pub frame_ms: Option<u64>,

    /// Seed for the shuffle generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Colour rotation, 1 to 10
    #[arg(long)]
    pub palette: Option<u8>,
}

impl Overrides {
    pub fn apply(&self, config: &mut GameConfig) {
        if let Some(patience) = self.patience {
            config.patience = patience;
        }
        if let Some(frame_ms) = self.frame_ms {
            config.frame_interval_ms = frame_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.palette.is_some() {
            config.palette = self.palette;
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("garapon").join("config.json"))
}

/// Load the configuration file (explicit path, else the default location if
/// present, else built-in defaults) and apply command line overrides.
pub fn resolve(explicit: Option<&Path>, overrides: &Overrides) -> anyhow::Result<GameConfig> {
    resolve_from(explicit, default_config_path(), overrides)
}

fn resolve_from(
    explicit: Option<&Path>,
    fallback: Option<PathBuf>,
    overrides: &Overrides,
) -> anyhow::Result<GameConfig> {
    let mut config = match explicit {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => match fallback.filter(|p| p.exists()) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                GameConfig::load(&path)
                    .with_context(|| format!("cannot load config {}", path.display()))?
            }
            None => GameConfig::default(),
        },
    };

    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// The effective configuration as printed by `--dump-config`.
pub fn render(config: &GameConfig) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_flag_overrides_file() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), r#"{ "patience": 5, "frame_interval_ms": 40 }"#);
        let overrides = Overrides {
            patience: Some(9),
            seed: Some(42),
            ..Default::default()
        };

        let config = resolve_from(Some(path.as_path()), None, &overrides).unwrap();
        assert_eq!(config.patience, 9);
        assert_eq!(config.seed, Some(42));
        // Unset flags leave the file's values alone.
        assert_eq!(config.frame_interval_ms, 40);
        assert_eq!(config.palette, None);
    }

    #[test]
    fn test_every_flag_applies() {
        let mut config = GameConfig::default();
        Overrides {
            patience: Some(3),
            frame_ms: Some(7),
            seed: Some(1),
            palette: Some(4),
        }
        .apply(&mut config);

        assert_eq!(config.patience, 3);
        assert_eq!(config.frame_interval_ms, 7);
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.palette, Some(4));
    }

    #[test]
    fn test_invalid_override_rejected_after_merge() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), r#"{ "palette": 3 }"#);

        let overrides = Overrides {
            palette: Some(11),
            ..Default::default()
        };
        assert!(resolve_from(Some(path.as_path()), None, &overrides).is_err());

        let overrides = Overrides {
            frame_ms: Some(0),
            ..Default::default()
        };
        assert!(resolve_from(None, None, &overrides).is_err());
    }

    #[test]
    fn test_missing_explicit_path_reports_context() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        let err = resolve_from(Some(missing.as_path()), None, &Overrides::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("cannot load config"));
    }

    #[test]
    fn test_fallback_used_only_when_present() {
        let dir = tempdir().unwrap();
        let absent = dir.path().join("garapon").join("config.json");
        let config = resolve_from(None, Some(absent), &Overrides::default()).unwrap();
        assert_eq!(config, GameConfig::default());

        let present = write_config(dir.path(), r#"{ "closing_frames": 12 }"#);
        let config = resolve_from(None, Some(present), &Overrides::default()).unwrap();
        assert_eq!(config.closing_frames, 12);
    }

    #[test]
    fn test_explicit_path_wins_over_fallback() {
        let dir = tempdir().unwrap();
        let fallback = write_config(dir.path(), r#"{ "patience": 20 }"#);
        let explicit = dir.path().join("explicit.json");
        std::fs::write(&explicit, r#"{ "patience": 30 }"#).unwrap();

        let config = resolve_from(Some(explicit.as_path()), Some(fallback), &Overrides::default()).unwrap();
        assert_eq!(config.patience, 30);
    }

    #[test]
    fn test_dump_reloads_as_same_config() {
        let mut config = GameConfig::default();
        config.seed = Some(2020);
        config.palette = Some(7);

        let dumped = render(&config).unwrap();
        assert!(dumped.contains("\"patience\": 108"));
        let reloaded: GameConfig = serde_json::from_str(&dumped).unwrap();
        assert_eq!(reloaded, config);
    }
}
