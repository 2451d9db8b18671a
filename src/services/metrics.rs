// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregate metrics over fetched gift cards.

use chrono::{DateTime, Utc};

use crate::models::{Giftcard, GiftcardSnapshot};

/// Barcode display mode the API links to by default.
const BARCODE_MODE_DEFAULT: &str = "&rt=1";
/// Display mode that renders a scannable barcode.
const BARCODE_MODE_SCANNABLE: &str = "&rt=7";

/// Card with the greatest valuta. Ties go to the earliest card.
pub fn most_recent(giftcards: &[Giftcard]) -> Option<&Giftcard> {
    giftcards.iter().fold(None, |best, card| match best {
        Some(current) if current.cmp_valuta(card).is_ge() => Some(current),
        _ => Some(card),
    })
}

/// Sum of remaining balances; 0.0 for no cards.
pub fn total_remaining(giftcards: &[Giftcard]) -> f64 {
    giftcards.iter().map(Giftcard::remaining).sum()
}

/// Rewrite a trailing `&rt=1` to `&rt=7`. Other links pass through.
pub fn barcode_url(link: &str) -> String {
    match link.strip_suffix(BARCODE_MODE_DEFAULT) {
        Some(base) => format!("{}{}", base, BARCODE_MODE_SCANNABLE),
        None => link.to_string(),
    }
}

/// Build the published metrics from the client's current state.
pub fn snapshot(
    giftcards: &[Giftcard],
    most_recent: Option<&Giftcard>,
    refreshed_at: DateTime<Utc>,
) -> GiftcardSnapshot {
    GiftcardSnapshot {
        giftcards: giftcards.to_vec(),
        count: giftcards.len(),
        total_remaining: total_remaining(giftcards),
        most_recent: most_recent.cloned(),
        most_recent_remaining: most_recent.map(Giftcard::remaining),
        most_recent_original: most_recent.and_then(Giftcard::original_amount),
        barcode_url: most_recent
            .and_then(|card| card.properties.e_voucher_link.as_deref())
            .map(barcode_url),
        refreshed_at,
    }
}
