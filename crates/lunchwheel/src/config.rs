use crate::gui::theme::Palette;
use crate::gui::wheel::motion::TuningError;
use crate::gui::wheel::{LABEL_FONT_SIZE, LABEL_OFFSET, Label, SpinTuning, WHEEL_RADIUS};
use directories::ProjectDirs;
use nearby::location::LocationSource;
use nearby::places::{ApiKey, Category, DEFAULT_BASE_URL, DEFAULT_RADIUS_METERS};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub palette: Palette,
    pub radius: f64,
    pub label_offset: f64,
    pub font_size: f64,
    pub start_hidden: bool,
    /// Options placed on the wheel before any search result arrives.
    pub items: Vec<Label>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            radius: WHEEL_RADIUS,
            label_offset: LABEL_OFFSET,
            font_size: LABEL_FONT_SIZE,
            start_hidden: false,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub enabled: bool,
    pub api_key: Option<ApiKey>,
    pub base_url: String,
    pub radius: u32,
    pub category: Category,
    pub limit: Option<usize>,
    pub photos: bool,
    pub location: LocationSource,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            radius: DEFAULT_RADIUS_METERS,
            category: Category::default(),
            limit: None,
            photos: true,
            location: LocationSource::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub spin: SpinTuning,
    #[serde(default)]
    pub places: PlacesConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spin.validate()?;
        if self.wheel.radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "wheel.radius must be positive, got {}",
                self.wheel.radius
            )));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid spin tuning: {0}")]
    Tuning(#[from] TuningError),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "lunchwheel", "lunchwheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn build(builder: Builder) -> Result<Config, ConfigError> {
    let cfg: Config = builder
        .add_source(
            config::Environment::with_prefix("LUNCHWHEEL")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;
    build(config::Config::builder().add_source(config::File::from(config_path).required(false)))
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        build(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
    }

    #[test]
    fn test_default_file_matches_defaults() {
        let cfg = parse(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();

        assert_eq!(cfg.wheel.palette, defaults.wheel.palette);
        assert_eq!(cfg.wheel.radius, defaults.wheel.radius);
        assert_eq!(cfg.spin, defaults.spin);
        assert_eq!(cfg.places.radius, 500);
        assert_eq!(cfg.places.category, Category::Restaurant);
        assert_eq!(cfg.places.location, LocationSource::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.spin, SpinTuning::default());
        assert!(cfg.wheel.items.is_empty());
        assert!(cfg.places.api_key.is_none());
    }

    #[test]
    fn test_sections_override_defaults() {
        let cfg = parse(
            r##"
            [wheel]
            palette = ["#101010", "#202020"]
            items = ["Tacos", "Ramen"]

            [spin]
            stop_threshold = 0.5

            [places]
            api_key = "abc"
            category = "cafe"
            limit = 8
            location = { source = "fixed", lat = 45.0, lng = 7.5 }
            "##,
        )
        .unwrap();

        assert_eq!(cfg.wheel.palette.len(), 2);
        assert_eq!(cfg.wheel.items, vec![Label::new("Tacos"), Label::new("Ramen")]);
        assert_eq!(cfg.spin.stop_threshold, 0.5);
        assert_eq!(cfg.spin.decay_min, 0.85);
        assert_eq!(cfg.places.api_key, Some(ApiKey::new("abc")));
        assert_eq!(cfg.places.category, Category::Cafe);
        assert_eq!(cfg.places.limit, Some(8));
        assert_eq!(
            cfg.places.location,
            LocationSource::Fixed { lat: 45.0, lng: 7.5 }
        );
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let err = parse("[spin]\ndecay_max = 1.2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Tuning(TuningError::DecayRange(_, _))));
    }

    #[test]
    fn test_empty_palette_is_rejected() {
        assert!(parse("[wheel]\npalette = []\n").is_err());
    }
}
