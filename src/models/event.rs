// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! 42 event and event registration models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::User;

/// Event category as reported by the 42 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EventKind {
    Event,
    Workshop,
    Conference,
    Hackathon,
    MeetUp,
    Association,
    Extern,
    Partnership,
    /// Any kind this build does not know about.
    #[serde(other)]
    Other,
}

/// A campus event snapshot. Never cached server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Event {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    /// HTML description
    pub description: Option<String>,
    pub location: Option<String>,
    pub kind: EventKind,
    pub max_people: Option<u32>,
    #[serde(default)]
    pub nbr_subscribers: u32,
    pub begin_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// Campuses hosting the event. The list endpoint cannot filter on this,
    /// so campus matching happens locally.
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number[]"))]
    pub campus_ids: Vec<u64>,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number[]"))]
    pub cursus_ids: Vec<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Whether the event is held on the given campus.
    pub fn is_on_campus(&self, campus_id: u64) -> bool {
        self.campus_ids.contains(&campus_id)
    }
}

/// One registration of a user to an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventUser {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub event_id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub user: User,
}
