use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    /// Maximum distance in meters between a punch and its store.
    /// Unset disables the geofence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_radius_m: Option<f64>,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            bind: default_bind(),
            log_level: default_log_level(),
            log_json: false,
            gps_radius_m: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        let base = if cfg!(target_os = "windows") {
            dirs::config_dir()
        } else {
            dirs::home_dir()
        };

        match base {
            Some(dir) if cfg!(target_os = "windows") => dir.join("rpresence"),
            Some(dir) => dir.join(".rpresence"),
            None => PathBuf::from(".").join(".rpresence"),
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rpresence.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rpresence.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;

        if let Some(r) = cfg.gps_radius_m
            && !(r.is_finite() && r > 0.0)
        {
            return Err(AppError::Config(format!(
                "gps_radius_m must be a positive number, got {}",
                r
            )));
        }

        Ok(cfg)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let cfg = Config::from_yaml("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.bind, "127.0.0.1:8000");
        assert_eq!(cfg.log_level, "info");
        assert!(!cfg.log_json);
        assert!(cfg.gps_radius_m.is_none());
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let err = Config::from_yaml("database: x.sqlite\ngps_radius_m: 0\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn radius_is_parsed() {
        let cfg = Config::from_yaml("database: x.sqlite\ngps_radius_m: 150.5\n").unwrap();
        assert_eq!(cfg.gps_radius_m, Some(150.5));
    }
}
