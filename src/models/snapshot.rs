//! Gift card metrics published after each refresh cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Giftcard;

/// Metrics derived from one successful refresh.
#[derive(Debug, Clone, Serialize)]
pub struct GiftcardSnapshot {
    // ─── All Cards ───────────────────────────────────────────────
    /// Every card from the last search
    pub giftcards: Vec<Giftcard>,
    /// Number of cards
    pub count: usize,
    /// Sum of remaining balances
    pub total_remaining: f64,

    // ─── Most Recent Card ────────────────────────────────────────
    /// Full detail record of the card with the latest valuta
    pub most_recent: Option<Giftcard>,
    /// Remaining balance of the most recent card
    pub most_recent_remaining: Option<f64>,
    /// Issued amount of the most recent card
    pub most_recent_original: Option<f64>,
    /// Barcode link of the most recent card, display mode fixed up
    pub barcode_url: Option<String>,

    /// When the snapshot was taken
    pub refreshed_at: DateTime<Utc>,
}
