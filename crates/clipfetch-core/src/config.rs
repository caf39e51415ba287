use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration loaded from `~/.config/clipfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipfetchConfig {
    /// Transcoder executable; looked up on `PATH` when not absolute.
    pub ffmpeg_bin: PathBuf,
    /// Directory the output file is written to (None = working directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Output file name. Every job writes here unless `unique_outputs` is set.
    pub output_name: String,
    /// Give each job its own `<stem>-<index>.<ext>` file instead of sharing `output_name`.
    #[serde(default)]
    pub unique_outputs: bool,
}

impl Default for ClipfetchConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            output_dir: None,
            output_name: "clip.mp4".to_string(),
            unique_outputs: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("clipfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClipfetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ClipfetchConfig> {
    if !path.exists() {
        let default_cfg = ClipfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ClipfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
