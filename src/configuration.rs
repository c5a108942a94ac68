use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub const CONFIG_FILE_NAME: &str = "extpack.toml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizerKind {
    /// Shell out to `ffmpeg -vf scale=W:H`
    #[default]
    Ffmpeg,
    /// Resize in-process with the `image` crate
    Native,
}

impl fmt::Display for ResizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResizerKind::Ffmpeg => "ffmpeg",
            ResizerKind::Native => "native",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IconSettings {
    /// Manifest file, relative to the project root
    pub manifest: PathBuf,
    /// Generated icon, relative to the project root
    pub output: PathBuf,
    pub size: u32,
    /// Title given to every activity bar container
    pub title: String,
    pub resizer: ResizerKind,
    pub ffmpeg: String,
    pub timeout_secs: u64,
}

impl IconSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IconSettings {
    fn default() -> Self {
        IconSettings {
            manifest: PathBuf::from("package.json"),
            output: PathBuf::from("assets/icon.png"),
            size: 128,
            title: "CHOAM".to_string(),
            resizer: ResizerKind::default(),
            ffmpeg: "ffmpeg".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetRename {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl AssetRename {
    fn new(source: &str, target: &str) -> Self {
        AssetRename {
            source: PathBuf::from(source),
            target: PathBuf::from(target),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetSettings {
    pub directory: PathBuf,
    pub renames: Vec<AssetRename>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        AssetSettings {
            directory: PathBuf::from("assets"),
            renames: vec![
                AssetRename::new("choam_logo.png", "choam_logo_128x128px.png"),
                AssetRename::new("robot_icon.png", "robot_icon_128x128px.png"),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub icon: IconSettings,
    pub assets: AssetSettings,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: 1,
            icon: IconSettings::default(),
            assets: AssetSettings::default(),
        }
    }
}

/// An explicit `--config` path wins over `extpack.toml` in the project root.
pub fn get_config_path(root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => root.join(CONFIG_FILE_NAME),
    }
}

pub fn create_default_config(path: &Path) -> Result<(), Error> {
    let config_data = toml::to_string_pretty(&Config::default())
        .or(Err(Error::msg("Failed to serialize the default configuration to TOML")))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, config_data)?;
    info!(path = %path.display(), "wrote default configuration");

    Ok(())
}

/// Loads the configuration. A missing root config silently falls back to the
/// defaults; a missing explicit config is an error.
#[instrument(skip(root))]
pub fn initialize_configuration(root: &Path, explicit: Option<&Path>) -> Result<Config, Error> {
    let config_path = get_config_path(root, explicit);

    if explicit.is_none() && !config_path.exists() {
        debug!(path = %config_path.display(), "no configuration file; using defaults");
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| {
        Error::msg(format!(
            "Failed to read the configuration file {}: {}",
            config_path.display(),
            e
        ))
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| {
        Error::msg(format!(
            "Failed to parse the configuration file {} as TOML: {}",
            config_path.display(),
            e
        ))
    })?;

    if config.icon.size == 0 {
        return Err(Error::msg("icon.size must be greater than zero"));
    }

    debug!(
        path = %config_path.display(),
        resizer = %config.icon.resizer,
        renames = config.assets.renames.len(),
        "loaded configuration"
    );

    Ok(config)
}
