pub mod create;
pub mod del;
pub mod derive;
pub mod log;
pub mod read;
pub mod today;
pub mod update;
pub mod validate;
pub mod visibility;

use crate::config::Config;

/// Settings the write pipelines read from the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub gps_radius_m: Option<f64>,
}

impl From<&Config> for WriteOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            gps_radius_m: cfg.gps_radius_m,
        }
    }
}
