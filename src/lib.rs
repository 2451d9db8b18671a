// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Belonio-Tracker: keep an eye on Belonio gift card balances
//!
//! This crate logs in to the Belonio gift card service, polls the card list
//! and the most recent card, and derives count and balance metrics from them.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
