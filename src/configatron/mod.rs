use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    pathfinder::default_themes_dir,
    themes::{resolve_themes, ThemeConfig},
    VcThemeResult,
};

/// Represents configuration settings for VCTheme, deserialized from `vctheme.config.json`.
///
/// Fields are deserialized using `serde`, with custom default functions specified for each.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ConfigurationJson {
    /// Folder holding the Vencord theme files.
    /// Renamed in JSON as `themesDir`; the OS profile folder is used when absent.
    #[serde(rename = "themesDir", default = "none_by_default")]
    pub themes_dir: Option<String>,

    /// Folder the log files are written to.
    /// Renamed in JSON as `logsDir` and defaults to `logs`.
    #[serde(rename = "logsDir", default = "default_logs_dir")]
    pub logs_dir: String,

    /// Milliseconds between two redraws of the terminal interface.
    /// Renamed in JSON as `tickRate` and defaults to `250`.
    #[serde(rename = "tickRate", default = "default_tick_rate")]
    pub tick_rate: u64,

    /// Milliseconds the file observer waits before reporting a change.
    /// Renamed in JSON as `watchDebounce` and defaults to `300`.
    #[serde(rename = "watchDebounce", default = "default_watch_debounce")]
    pub watch_debounce: u64,

    /// Extra themes, or overrides of the built-in ones.
    #[serde(default = "empty_vector_by_default")]
    pub themes: Vec<ThemeConfig>,
}

impl Default for ConfigurationJson {
    fn default() -> Self {
        Self {
            themes_dir: none_by_default(),
            logs_dir: default_logs_dir(),
            tick_rate: default_tick_rate(),
            watch_debounce: default_watch_debounce(),
            themes: empty_vector_by_default(),
        }
    }
}

fn none_by_default() -> Option<String> {
    info!("Setting default themes dir: OS profile folder");

    None
}

fn default_logs_dir() -> String {
    info!("Setting default logs dir to 'logs'");

    "logs".to_string()
}

fn default_tick_rate() -> u64 {
    info!("Setting default tick rate to 250ms");

    250
}

fn default_watch_debounce() -> u64 {
    info!("Setting default watch debounce to 300ms");

    300
}

/// Returns an empty `Vec<ThemeConfig>` as the default, used for the `themes` field.
fn empty_vector_by_default() -> Vec<ThemeConfig> {
    info!("Setting default empty vector for configured themes");

    vec![]
}

fn ensure_positive_interval(field: &str, millis: u64) -> VcThemeResult<()> {
    if millis > 0 {
        return Ok(());
    }

    Err(VcThemeError::raise_critical_runtime_error(
        ErrorKind::ConfigFileParsingError,
        &format!("`{}` must be greater than zero milliseconds.", field),
        ErrorAction::Fix,
    ))
}

/// Resolved VCTheme settings, with every default applied and the theme table merged.
#[derive(Clone, PartialEq, Debug)]
pub struct Configatron {
    themes_dir: PathBuf,
    logs_dir: PathBuf,
    tick_rate: u64,
    watch_debounce: u64,
    themes: Vec<ThemeConfig>,
}

impl Default for Configatron {
    fn default() -> Self {
        Self {
            themes_dir: default_themes_dir(),
            logs_dir: PathBuf::from(default_logs_dir()),
            tick_rate: default_tick_rate(),
            watch_debounce: default_watch_debounce(),
            themes: resolve_themes(&empty_vector_by_default()),
        }
    }
}

impl Configatron {
    /// Constructs a new `Configatron` instance from already parsed settings.
    ///
    /// # Parameters
    ///
    /// * `themes_dir` - Folder of the theme files, `None` for the OS profile folder.
    /// * `logs_dir` - Folder of the log files.
    /// * `tick_rate` - Interface redraw interval in milliseconds.
    /// * `watch_debounce` - Observer debounce in milliseconds.
    /// * `themes` - Configured themes, merged over the built-in ones.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigFileParsingError` when either interval is zero.
    pub fn new(
        themes_dir: Option<String>,
        logs_dir: String,
        tick_rate: u64,
        watch_debounce: u64,
        themes: Vec<ThemeConfig>,
    ) -> VcThemeResult<Self> {
        info!(
            "Initializing VCTheme configurations with themes_dir: {:?}, logs_dir: {}, tick_rate: {}, \
            watch_debounce: {}, configured themes: {}",
            themes_dir,
            logs_dir,
            tick_rate,
            watch_debounce,
            themes.len()
        );

        ensure_positive_interval("tickRate", tick_rate)?;
        ensure_positive_interval("watchDebounce", watch_debounce)?;

        Ok(Self {
            themes_dir: themes_dir
                .map(PathBuf::from)
                .unwrap_or_else(default_themes_dir),
            logs_dir: PathBuf::from(logs_dir),
            tick_rate,
            watch_debounce,
            themes: resolve_themes(&themes),
        })
    }

    pub fn from_json(config_json: ConfigurationJson) -> VcThemeResult<Self> {
        Self::new(
            config_json.themes_dir,
            config_json.logs_dir,
            config_json.tick_rate,
            config_json.watch_debounce,
            config_json.themes,
        )
    }

    pub fn get_themes_dir(&self) -> PathBuf {
        self.themes_dir.clone()
    }

    pub fn get_logs_dir(&self) -> PathBuf {
        self.logs_dir.clone()
    }

    pub fn get_tick_rate(&self) -> u64 {
        self.tick_rate
    }

    pub fn get_watch_debounce(&self) -> u64 {
        self.watch_debounce
    }

    pub fn get_themes(&self) -> &[ThemeConfig] {
        &self.themes
    }
}
