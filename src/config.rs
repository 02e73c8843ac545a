use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    /// Dataset file, directory of fragments, or glob pattern.
    #[serde(default)]
    pub(crate) dataset: Option<String>,
    /// Target frequency applied when the CLI passes none.
    #[serde(default)]
    pub(crate) resample: Option<String>,
    #[serde(default)]
    pub(crate) age_granularity: Option<String>,
    /// Last year allowed into excess-mortality baselines.
    #[serde(default)]
    pub(crate) baseline_cutoff: Option<i32>,
    #[serde(default)]
    pub(crate) log_level: Option<String>,
}

impl Config {
    pub(crate) fn load() -> Self {
        Self::load_internal(false)
    }

    #[cfg(test)]
    pub(crate) fn load_quiet() -> Self {
        Self::load_internal(true)
    }

    fn load_internal(quiet: bool) -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        if !quiet {
                            eprintln!("Loaded config from {}", path.display());
                        }
                        return config;
                    }
                    Err(e) => {
                        if !quiet {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/epirisk/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("epirisk").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("epirisk").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.epirisk.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".epirisk.toml"));
        }

        paths
    }
}
