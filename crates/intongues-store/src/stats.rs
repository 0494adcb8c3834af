use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use intongues_types::{Collection, ReviewQuality};
use serde::{Deserialize, Serialize};

use crate::document::{CollectionPath, DocumentStore};
use crate::error::StoreError;

/// Review answers of one language on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReviewStats {
    pub language: String,
    pub day: NaiveDate,
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
    pub total: u32,
}

impl DailyReviewStats {
    pub fn empty(language: &str, day: NaiveDate) -> Self {
        Self {
            language: language.to_string(),
            day,
            again: 0,
            hard: 0,
            good: 0,
            easy: 0,
            total: 0,
        }
    }

    fn add(&mut self, quality: ReviewQuality) {
        match quality {
            ReviewQuality::Again => self.again += 1,
            ReviewQuality::Hard => self.hard += 1,
            ReviewQuality::Good => self.good += 1,
            ReviewQuality::Easy => self.easy += 1,
        }
        self.total += 1;
    }
}

#[derive(Clone)]
pub struct ReviewStatsStore {
    docs: Arc<dyn DocumentStore>,
}

impl ReviewStatsStore {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    fn path(user_id: &str) -> CollectionPath {
        CollectionPath::new(user_id, Collection::ReviewStats)
    }

    fn doc_id(language: &str, day: NaiveDate) -> String {
        format!("{language}:{}", day.format("%Y-%m-%d"))
    }

    pub async fn load(
        &self,
        user_id: &str,
        language: &str,
        day: NaiveDate,
    ) -> Result<DailyReviewStats, StoreError> {
        let doc = self
            .docs
            .get(&Self::path(user_id), &Self::doc_id(language, day))
            .await?;

        match doc {
            Some(doc) => Ok(serde_json::from_value(doc)?),
            None => Ok(DailyReviewStats::empty(language, day)),
        }
    }

    /// Count one answer towards the day it was given
    pub async fn record(
        &self,
        user_id: &str,
        language: &str,
        quality: ReviewQuality,
        at: DateTime<Utc>,
    ) -> Result<DailyReviewStats, StoreError> {
        let day = at.date_naive();
        let mut stats = self.load(user_id, language, day).await?;
        stats.add(quality);

        self.docs
            .set(
                &Self::path(user_id),
                &Self::doc_id(language, day),
                serde_json::to_value(&stats)?,
            )
            .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn answers_accumulate_per_day() {
        let stats = ReviewStatsStore::new(Arc::new(MemoryStore::new()));
        let morning = Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap();

        stats.record("u", "es", ReviewQuality::Good, morning).await.unwrap();
        stats.record("u", "es", ReviewQuality::Again, morning).await.unwrap();
        let today = stats
            .record("u", "es", ReviewQuality::Good, morning + Duration::hours(3))
            .await
            .unwrap();

        assert_eq!(today.good, 2);
        assert_eq!(today.again, 1);
        assert_eq!(today.total, 3);

        let tomorrow = stats
            .load("u", "es", morning.date_naive() + Duration::days(1))
            .await
            .unwrap();
        assert_eq!(tomorrow.total, 0);

        let french = stats.load("u", "fr", morning.date_naive()).await.unwrap();
        assert_eq!(french, DailyReviewStats::empty("fr", morning.date_naive()));
    }
}
