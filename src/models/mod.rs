// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod event;
pub mod token;
pub mod user;

pub use event::{Event, EventKind, EventUser};
pub use token::Token;
pub use user::{ImageVersions, User, UserImage};
