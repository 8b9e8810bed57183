use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::limiter::rate_limiter::FixedWindowLimiterStore;

/// Periodically drops rate-limit records whose window has elapsed.
pub async fn start_rate_limit_sweep(store: FixedWindowLimiterStore, every: Duration) {
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let purged = store.purge_expired();
        if purged > 0 {
            tracing::debug!(
                "Purged {} expired rate-limit records, {} still tracked",
                purged,
                store.tracked_clients()
            );
        }
    }
}
