use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use crate::document::{DEFAULT_CACHE_SIZE, Zoom};
use crate::theme::{ThemeId, set_theme};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "claimview";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_theme")]
    pub theme: String,

    /// Zoom a document opens at
    #[serde(default = "default_zoom")]
    pub default_zoom: f32,

    /// Rendered pages kept in memory per document
    #[serde(default = "default_page_cache_size")]
    pub page_cache_size: usize,

    /// Capture the mouse for clicks on links and toolbar
    #[serde(default = "default_true")]
    pub mouse: bool,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_theme() -> String {
    ThemeId::OceanicNext.name().to_string()
}

fn default_zoom() -> f32 {
    Zoom::DEFAULT_FACTOR
}

fn default_page_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            theme: default_theme(),
            default_zoom: default_zoom(),
            page_cache_size: default_page_cache_size(),
            mouse: true,
        }
    }
}

impl Settings {
    /// Parse and sanitize settings. Out-of-range values are pulled back in.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut settings: Settings = serde_yaml::from_str(content)?;
        settings.sanitize();
        Ok(settings)
    }

    fn sanitize(&mut self) {
        let zoom = Zoom::clamp_factor(self.default_zoom);
        if zoom != self.default_zoom {
            warn!(
                "default_zoom {} out of range, using {zoom}",
                self.default_zoom
            );
            self.default_zoom = zoom;
        }
        if self.page_cache_size == 0 {
            warn!("page_cache_size must be positive, using {DEFAULT_CACHE_SIZE}");
            self.page_cache_size = DEFAULT_CACHE_SIZE;
        }
        if ThemeId::from_name(&self.theme).is_none() {
            warn!("Unknown theme {:?}, using {}", self.theme, default_theme());
            self.theme = default_theme();
        }
    }

    pub fn theme_id(&self) -> ThemeId {
        ThemeId::from_name(&self.theme).unwrap_or(ThemeId::OceanicNext)
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from `path_override` or the default location, creating the
/// default file if there is none, and apply the theme.
pub fn load_settings(path_override: Option<&Path>) {
    let path = match path_override {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };
    let Some(path) = path else {
        warn!("Could not determine config directory, using default settings");
        apply_theme();
        return;
    };

    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        save_settings_to_file(&Settings::default(), &path);
    }
    apply_theme();
}

fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match Settings::from_yaml(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {path:?}");
                replace_settings(settings);
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    match fs::write(path, generate_settings_yaml(settings)) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let mut content = String::from(SETTINGS_HEADER);
    content.push_str(&format!("version: {}\n", settings.version));
    content.push_str(&format!("theme: \"{}\"\n", settings.theme));
    content.push_str(&format!("default_zoom: {}\n", settings.default_zoom));
    content.push_str(&format!("page_cache_size: {}\n", settings.page_cache_size));
    content.push_str(&format!("mouse: {}\n", settings.mouse));
    content
}

const SETTINGS_HEADER: &str = r#"# claimview settings
#
# theme:            "Oceanic Next" or "Catppuccin Mocha"
# default_zoom:     0.5 - 3.0, zoom a document opens at (1.0 fits the page)
# page_cache_size:  rendered pages kept in memory
# mouse:            click links, section headers and page arrows

"#;

// Public API for accessing settings

pub fn replace_settings(settings: Settings) {
    if let Ok(mut global) = SETTINGS.write() {
        *global = settings;
    }
}

pub fn current_settings() -> Settings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}

pub fn get_default_zoom() -> f32 {
    SETTINGS
        .read()
        .map(|s| s.default_zoom)
        .unwrap_or_else(|_| default_zoom())
}

pub fn get_page_cache_size() -> usize {
    SETTINGS
        .read()
        .map(|s| s.page_cache_size)
        .unwrap_or(DEFAULT_CACHE_SIZE)
}

pub fn is_mouse_enabled() -> bool {
    SETTINGS.read().map(|s| s.mouse).unwrap_or(true)
}

fn apply_theme() {
    let id = SETTINGS
        .read()
        .map(|s| s.theme_id())
        .unwrap_or(ThemeId::OceanicNext);
    set_theme(id);
}
