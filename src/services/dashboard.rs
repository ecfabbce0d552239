// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard view logic over in-memory event and attendee lists.
//!
//! Everything here is pure: status, upcoming filter, search, pagination and
//! the attendee roster CSV.

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Event, EventUser};

/// Dashboard page size.
pub const DASHBOARD_PAGE_SIZE: u32 = 30;

/// Where an event stands relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EventStatus {
    Ended,
    Upcoming,
    Ongoing,
}

impl EventStatus {
    pub fn at(event: &Event, now: DateTime<Utc>) -> Self {
        if event.end_at < now {
            EventStatus::Ended
        } else if event.begin_at > now {
            EventStatus::Upcoming
        } else {
            EventStatus::Ongoing
        }
    }
}

/// One page of a larger list.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    /// Number of items across all pages
    pub total: u32,
    pub total_pages: u32,
}

/// Events that have not started yet, soonest first.
pub fn upcoming(events: Vec<Event>, now: DateTime<Utc>) -> Vec<Event> {
    let mut upcoming: Vec<Event> = events.into_iter().filter(|e| e.begin_at > now).collect();
    upcoming.sort_by_key(|e| e.begin_at);
    upcoming
}

/// Case-insensitive free-text search on name, description and location.
pub fn search_events(events: Vec<Event>, query: &str) -> Vec<Event> {
    let Some(needle) = normalize_query(query) else {
        return events;
    };

    events
        .into_iter()
        .filter(|e| {
            contains(&e.name, &needle)
                || e.description.as_deref().is_some_and(|d| contains(d, &needle))
                || e.location.as_deref().is_some_and(|l| contains(l, &needle))
        })
        .collect()
}

/// Case-insensitive free-text search on login, display name and names.
pub fn search_participants(participants: Vec<EventUser>, query: &str) -> Vec<EventUser> {
    let Some(needle) = normalize_query(query) else {
        return participants;
    };

    participants
        .into_iter()
        .filter(|p| {
            let user = &p.user;
            contains(&user.login, &needle)
                || [&user.displayname, &user.first_name, &user.last_name]
                    .into_iter()
                    .any(|field| field.as_deref().is_some_and(|v| contains(v, &needle)))
        })
        .collect()
}

/// Slice out 1-indexed page `page`. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> Page<T> {
    let total = items.len();
    let per_page_usize = per_page.max(1) as usize;
    let total_pages = total.div_ceil(per_page_usize);

    let start = (page.max(1) as usize - 1).saturating_mul(per_page_usize);
    let items = if start < total {
        items
            .into_iter()
            .skip(start)
            .take(per_page_usize)
            .collect()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        per_page,
        total: total as u32,
        total_pages: total_pages as u32,
    }
}

/// Attendee roster as CSV: a header line plus one line per attendee, every
/// field quoted.
pub fn roster_csv(participants: &[EventUser]) -> String {
    let mut lines = Vec::with_capacity(participants.len() + 1);
    lines.push("Login,Last name,First name,Email".to_string());

    for participant in participants {
        let user = &participant.user;
        let row = [
            Some(user.login.as_str()),
            user.last_name.as_deref(),
            user.first_name.as_deref(),
            user.email.as_deref(),
        ]
        .iter()
        .map(|cell| quote_csv(cell.unwrap_or("")))
        .collect::<Vec<_>>()
        .join(",");
        lines.push(row);
    }

    lines.join("\n")
}

fn quote_csv(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
