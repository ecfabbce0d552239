// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - upstream clients and view logic.

pub mod dashboard;
pub mod intra;
pub mod oauth;

pub use dashboard::{EventStatus, Page};
pub use intra::{IntraClient, IntraError, PagingPolicy};
pub use oauth::OAuthClient;
