use serde::{Deserialize, Serialize};

fn default_starting_ease() -> f64 {
    2.5
}

fn default_min_ease() -> f64 {
    1.3
}

fn default_again_delay_minutes() -> i64 {
    10
}

fn default_hard_multiplier() -> f64 {
    1.2
}

fn default_easy_bonus() -> f64 {
    1.3
}

fn default_recognition_factor() -> f64 {
    0.8
}

fn default_max_interval_days() -> f64 {
    36_500.0
}

fn default_history_limit() -> usize {
    50
}

fn default_familiar_after_days() -> f64 {
    7.0
}

fn default_known_after_days() -> f64 {
    21.0
}

/// Parameters of the SM-2 style scheduler
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SrsConfig {
    #[serde(default = "default_starting_ease")]
    pub starting_ease: f64,
    #[serde(default = "default_min_ease")]
    pub min_ease: f64,
    /// Relearning delay after an `again` response
    #[serde(default = "default_again_delay_minutes")]
    pub again_delay_minutes: i64,
    #[serde(default = "default_hard_multiplier")]
    pub hard_multiplier: f64,
    #[serde(default = "default_easy_bonus")]
    pub easy_bonus: f64,
    /// Scale applied to successful intervals in recognition mode
    #[serde(default = "default_recognition_factor")]
    pub recognition_factor: f64,
    /// Upper bound on any scheduled interval
    #[serde(default = "default_max_interval_days")]
    pub max_interval_days: f64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_familiar_after_days")]
    pub familiar_after_days: f64,
    #[serde(default = "default_known_after_days")]
    pub known_after_days: f64,
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            starting_ease: default_starting_ease(),
            min_ease: default_min_ease(),
            again_delay_minutes: default_again_delay_minutes(),
            hard_multiplier: default_hard_multiplier(),
            easy_bonus: default_easy_bonus(),
            recognition_factor: default_recognition_factor(),
            max_interval_days: default_max_interval_days(),
            history_limit: default_history_limit(),
            familiar_after_days: default_familiar_after_days(),
            known_after_days: default_known_after_days(),
        }
    }
}
