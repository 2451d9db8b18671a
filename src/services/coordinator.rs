// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Periodic refresh of gift card data.
//!
//! Runs the fetch chain on a fixed interval and keeps the last good
//! snapshot. A failed cycle is logged and the previous snapshot stays
//! published until a later cycle succeeds.

use crate::error::Result;
use crate::models::GiftcardSnapshot;
use crate::services::belonio::BelonioClient;
use crate::services::metrics;
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Shortest allowed refresh interval; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Drives a [`BelonioClient`] on a schedule.
pub struct RefreshCoordinator {
    client: BelonioClient,
    interval: Duration,
    snapshot: Option<GiftcardSnapshot>,
}

impl RefreshCoordinator {
    /// Intervals shorter than one second are raised to one second.
    pub fn new(client: BelonioClient, interval: Duration) -> Self {
        Self {
            client,
            interval: interval.max(MIN_INTERVAL),
            snapshot: None,
        }
    }

    /// Last successfully published snapshot.
    pub fn snapshot(&self) -> Option<&GiftcardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Run one refresh cycle.
    ///
    /// Returns the published snapshot, which is the previous one if the
    /// API returned no data this time, or `None` if nothing was ever fetched.
    pub async fn refresh(&mut self) -> Result<Option<&GiftcardSnapshot>> {
        if let Err(e) = self.run_fetch_chain().await {
            tracing::warn!(
                error = %e,
                transient = e.is_transient(),
                "Refresh cycle failed, keeping previous snapshot"
            );
            return Err(e);
        }

        if let Some(giftcards) = self.client.giftcards() {
            let snapshot =
                metrics::snapshot(giftcards, self.client.most_recent_giftcard(), Utc::now());
            tracing::info!(
                count = snapshot.count,
                total_remaining = snapshot.total_remaining,
                most_recent = snapshot.most_recent.as_ref().map(|c| c.giftcard_id.as_str()),
                "Gift card snapshot updated"
            );
            self.snapshot = Some(snapshot);
        }

        Ok(self.snapshot.as_ref())
    }

    async fn run_fetch_chain(&mut self) -> Result<()> {
        self.client.fetch_giftcards().await?;
        self.client.fetch_most_recent_giftcard().await
    }

    /// Refresh immediately, then on every interval tick until `shutdown`
    /// resolves. `on_update` sees each snapshot published by a good cycle.
    pub async fn run<F, U>(&mut self, shutdown: F, mut on_update: U)
    where
        F: Future<Output = ()>,
        U: FnMut(&GiftcardSnapshot),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(interval_secs = self.interval.as_secs(), "Refresh loop started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping refresh loop");
                    break;
                }
                _ = ticker.tick() => {
                    if let Ok(Some(snapshot)) = self.refresh().await {
                        on_update(snapshot);
                    }
                }
            }
        }
    }
}
