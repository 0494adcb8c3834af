use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Json,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory for the JSON backend, platform data dir when unset
    pub data_dir: Option<String>,
}

impl StoreConfig {
    pub fn new() -> Self {
        let data_dir = env::var("INTONGUES_DATA_DIR").ok();

        Self {
            backend: StoreBackend::default(),
            data_dir,
        }
    }
}
