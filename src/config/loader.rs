use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "academy";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the user configuration, falling back to defaults when there is none.
pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> color_eyre::Result<AppConfig> {
    if !path.exists() {
        debug!(?path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    debug!(?path, "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_from(Path::new("/nonexistent/academy/config.toml")).unwrap();
        assert_eq!(config.theme.name, "Catppuccin Mocha");
    }

    #[test]
    fn test_reads_theme_and_bindings() {
        let path = std::env::temp_dir().join(format!("academy-config-{}.toml", std::process::id()));
        fs::write(
            &path,
            "[theme]\nname = \"Catppuccin Latte\"\n\n[keybindings.global]\nclose_all = \"ctrl+w\"\n",
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.theme.name, "Catppuccin Latte");
        assert_eq!(config.keybindings.global.close_all.display(), "ctrl+w");
        assert_eq!(config.keybindings.global.quit.display(), "q");
    }

    #[test]
    fn test_invalid_key_is_an_error() {
        let path = std::env::temp_dir().join(format!("academy-bad-{}.toml", std::process::id()));
        fs::write(&path, "[keybindings.global]\nquit = \"hyper+q\"\n").unwrap();

        let result = load_from(&path);
        fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }
}
