//! Runtime configuration resolved from command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use crate::api::Endpoints;

pub const APP_DIR: &str = "widget-board";
pub const DATA_FILE: &str = "widgets.json";

#[derive(Clone, Debug)]
pub struct Config {
    /// Where the widget list lives
    pub data_file: PathBuf,
    pub endpoints: Endpoints,
    /// Seed a "Your location" widget when the board starts empty
    pub geolocate: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            endpoints: Endpoints::default(),
            geolocate: true,
            log_file: None,
        }
    }
}

impl Config {
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.endpoints.timeout = Duration::from_secs(secs);
        self
    }
}

/// `<data dir>/widget-board/widgets.json`, or the working directory when the
/// platform has no data dir
pub fn default_data_file() -> PathBuf {
    dirs_next::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_default()
        .join(DATA_FILE)
}
