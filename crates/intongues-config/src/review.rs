use intongues_types::ReviewMode;
use serde::{Deserialize, Serialize};

fn default_deck() -> String {
    "core:any".to_string()
}

fn default_auto_play() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ReviewConfig {
    /// Deck opened when none is given
    #[serde(default = "default_deck")]
    pub default_deck: String,
    pub default_mode: ReviewMode,
    /// Play pronunciation automatically when the spoken side is shown
    #[serde(default = "default_auto_play")]
    pub auto_play_audio: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            default_deck: default_deck(),
            default_mode: ReviewMode::default(),
            auto_play_audio: default_auto_play(),
        }
    }
}
