use chrono::{DateTime, TimeDelta, Utc};
use intongues_config::srs::SrsConfig;
use intongues_types::{ReviewMode, ReviewQuality, ReviewRecord, SrsState, VocabEntry, VocabStatus};

const EASE_PENALTY_AGAIN: f64 = 0.2;
const EASE_PENALTY_HARD: f64 = 0.15;
const EASE_BONUS_EASY: f64 = 0.15;

const FIRST_INTERVAL_DAYS: f64 = 1.0;
const SECOND_INTERVAL_DAYS: f64 = 6.0;
const FIRST_EASY_INTERVAL_DAYS: f64 = 4.0;

/// SM-2 style scheduler
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SrsConfig,
}

impl Scheduler {
    pub fn new(config: SrsConfig) -> Self {
        Self { config }
    }

    pub fn initial_state(&self, now: DateTime<Utc>) -> SrsState {
        SrsState {
            due: now,
            interval_days: 0.0,
            ease: self.config.starting_ease,
            repetitions: 0,
            lapses: 0,
            last_reviewed: None,
            history: Vec::new(),
        }
    }

    /// Apply one review response to the entry's schedule and status
    pub fn review(
        &self,
        entry: &mut VocabEntry,
        quality: ReviewQuality,
        mode: ReviewMode,
        now: DateTime<Utc>,
    ) {
        let mut state = entry.srs.take().unwrap_or_else(|| self.initial_state(now));
        let previous = state.interval_days;

        match quality {
            ReviewQuality::Again => {
                state.repetitions = 0;
                state.lapses += 1;
                state.ease = (state.ease - EASE_PENALTY_AGAIN).max(self.config.min_ease);
                state.interval_days = 0.0;
                state.due = offset(now, self.config.again_delay_minutes.saturating_mul(60));
            }
            ReviewQuality::Hard => {
                state.repetitions += 1;
                let interval = previous * self.config.hard_multiplier;
                state.ease = (state.ease - EASE_PENALTY_HARD).max(self.config.min_ease);
                self.schedule(&mut state, interval, mode, now);
            }
            ReviewQuality::Good => {
                state.repetitions += 1;
                let interval = match state.repetitions {
                    1 => FIRST_INTERVAL_DAYS,
                    2 => SECOND_INTERVAL_DAYS,
                    _ => previous * state.ease,
                };
                self.schedule(&mut state, interval, mode, now);
            }
            ReviewQuality::Easy => {
                state.repetitions += 1;
                let interval = match state.repetitions {
                    1 => FIRST_EASY_INTERVAL_DAYS,
                    2 => SECOND_INTERVAL_DAYS * self.config.easy_bonus,
                    _ => previous * state.ease * self.config.easy_bonus,
                };
                state.ease += EASE_BONUS_EASY;
                self.schedule(&mut state, interval, mode, now);
            }
        }

        entry.status = match quality {
            ReviewQuality::Again => VocabStatus::Unknown,
            _ => entry.status.max(self.status_for_interval(state.interval_days)),
        };

        state.last_reviewed = Some(now);
        state.history.push(ReviewRecord { at: now, quality, mode });
        if state.history.len() > self.config.history_limit {
            let overflow = state.history.len() - self.config.history_limit;
            state.history.drain(..overflow);
        }

        tracing::debug!(
            "Scheduled '{}' after {}: interval {:.2}d, ease {:.2}, status {}",
            entry.normalised,
            quality,
            state.interval_days,
            state.ease,
            entry.status
        );

        entry.srs = Some(state);
        entry.updated_at = now;
    }

    fn schedule(&self, state: &mut SrsState, interval: f64, mode: ReviewMode, now: DateTime<Utc>) {
        let scaled = match mode {
            ReviewMode::Recall => interval,
            ReviewMode::Recognition => interval * self.config.recognition_factor,
        };
        state.interval_days = scaled
            .min(self.config.max_interval_days)
            .max(FIRST_INTERVAL_DAYS);
        state.due = offset(now, (state.interval_days * 86_400.0).round() as i64);
    }

    pub fn status_for_interval(&self, interval_days: f64) -> VocabStatus {
        if interval_days < self.config.familiar_after_days {
            VocabStatus::Recognised
        } else if interval_days < self.config.known_after_days {
            VocabStatus::Familiar
        } else {
            VocabStatus::Known
        }
    }
}

/// `now` shifted by `seconds`, saturating at the latest representable instant
fn offset(now: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
