// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API client and refresh logic.

pub mod belonio;
pub mod coordinator;
pub mod metrics;

pub use belonio::{ApiResponse, BelonioClient, ClientOptions, Credentials};
pub use coordinator::RefreshCoordinator;
