// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the Belonio API.

pub mod giftcard;
pub mod profile;
pub mod snapshot;

pub use giftcard::{Giftcard, GiftcardPage, GiftcardProperties, Money};
pub use profile::{Employer, Employment, UserProfile};
pub use snapshot::GiftcardSnapshot;
