use directories::ProjectDirs;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use crate::lookup::DEFAULT_LOOKUP_URL;
use crate::reward::{RewardAssets, FALLBACK_IMAGE};
use crate::widget::WidgetOptions;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Set shown at start-up.
    pub grade: String,
    /// Character loaded at start-up.
    pub kanji: char,
    pub hint_after_misses: u32,
    pub show_outline: bool,
    pub stroke_color: String,
    pub outline_color: String,
    pub lookup_url: String,
    pub offline: bool,
    pub assets_dir: PathBuf,
    pub fallback_image: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grade: "小1".to_string(),
            kanji: '永',
            hint_after_misses: 1,
            show_outline: true,
            stroke_color: "#BC002D".to_string(),
            outline_color: "#F8F8F8".to_string(),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            offline: false,
            assets_dir: PathBuf::from("assets"),
            fallback_image: FALLBACK_IMAGE.to_string(),
        }
    }
}

impl Config {
    /// Widget options, falling back to the default colour for unparsable values.
    pub fn widget_options(&self) -> WidgetOptions {
        let defaults = WidgetOptions::default();
        WidgetOptions {
            stroke_color: parse_color(&self.stroke_color, defaults.stroke_color),
            outline_color: parse_color(&self.outline_color, defaults.outline_color),
            show_outline: self.show_outline,
            hint_after_misses: self.hint_after_misses,
        }
    }

    pub fn reward_assets(&self) -> RewardAssets {
        RewardAssets::new(&self.assets_dir).with_fallback(&self.fallback_image)
    }
}

fn parse_color(value: &str, fallback: Color) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        warn!("ignoring invalid colour {value:?}");
        fallback
    })
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "hitsujun") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("hitsujun_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|e| {
            warn!("ignoring unreadable config {}: {e}", self.path.display());
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
