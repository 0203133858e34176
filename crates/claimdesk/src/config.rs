use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_token_path")]
    pub token_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: claimdesk_home().join("config.yml"),
            base_url: default_base_url(),
            token_path: default_token_path(),
        }
    }
}

fn claimdesk_home() -> PathBuf {
    match std::env::var("CLAIMDESK_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .expect("should have home")
            .join(".claimdesk"),
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_token_path() -> String {
    claimdesk_home().join("token").to_string_lossy().to_string()
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => claimdesk_home().join("config.yml"),
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => {
                info!("open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_str(&contents)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("created default config at {:?}", cfg.path);
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_open_creates_default_then_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let cfg = Config::open(Some(&path)).unwrap();
        assert_eq!(cfg.base_url, "http://localhost:8000");
        assert!(path.exists());

        let reloaded = Config::open(Some(&path)).unwrap();
        assert_eq!(reloaded.base_url, cfg.base_url);
        assert_eq!(reloaded.token_path, cfg.token_path);
    }

    #[test]
    fn test_open_reads_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "base_url: https://claims.example.com\ntoken_path: /tmp/claimdesk-token\n",
        )
        .unwrap();

        let cfg = Config::open(Some(&path)).unwrap();
        assert_eq!(cfg.base_url, "https://claims.example.com");
        assert_eq!(cfg.token_path, "/tmp/claimdesk-token");
    }
}
