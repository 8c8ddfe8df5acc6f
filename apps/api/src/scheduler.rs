//! Daily generation job.
//!
//! A background task sleeps until the configured local hour, generates one
//! article with no topic (so the rotation picks one), and goes back to sleep.
//! Failures are logged; the loop never exits.

use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::article::generator::{generate_article, GenerateRequest};
use crate::state::AppState;

/// The first `hour:00` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Generates today's article. Returns whether it succeeded.
pub async fn run_daily_generation(state: &AppState) -> bool {
    info!("Starting scheduled article generation...");
    let today = Utc::now().date_naive();
    match generate_article(
        state.writer.as_ref(),
        &state.store,
        GenerateRequest::default(),
        today,
    )
    .await
    {
        Ok(generated) => {
            info!(prefix = %generated.prefix, "Scheduled article generation complete");
            true
        }
        Err(e) => {
            error!("Scheduled article generation failed: {e}");
            false
        }
    }
}

pub fn spawn_daily_job(state: AppState, hour: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Local::now().naive_local();
            let next = next_run_after(now, hour);
            let wait = (next - now).to_std().unwrap_or_default();
            info!("Next scheduled article generation at {next}");
            tokio::time::sleep(wait).await;
            run_daily_generation(&state).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::article::generator::test_support::{CannedWriter, SAMPLE_ARTICLE};
    use crate::article::store::ArticleStore;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        assert_eq!(next_run_after(at(1, 5, 59), 6), at(1, 6, 0));
    }

    #[test]
    fn test_next_run_tomorrow_once_hour_has_passed() {
        assert_eq!(next_run_after(at(1, 6, 0), 6), at(2, 6, 0));
        assert_eq!(next_run_after(at(1, 23, 30), 6), at(2, 6, 0));
    }

    #[tokio::test]
    async fn test_run_daily_generation_stores_article() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            store: ArticleStore::new(dir.path()),
            writer: Arc::new(CannedWriter::new(SAMPLE_ARTICLE)),
        };

        assert!(run_daily_generation(&state).await);
        assert_eq!(state.store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_daily_generation_survives_failure() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            store: ArticleStore::new(dir.path()),
            writer: Arc::new(CannedWriter::failing()),
        };

        assert!(!run_daily_generation(&state).await);
    }
}
