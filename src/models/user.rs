//! 42 user profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A 42 user, both as the session identity (`/v2/me`) and as an event
/// participant. Most profile fields are optional upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Unique handle
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub usual_full_name: Option<String>,
    #[serde(default)]
    pub usual_first_name: Option<String>,
    #[serde(default)]
    pub displayname: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub image: UserImage,
    #[serde(rename = "staff?", alias = "staff", default)]
    pub staff: Option<bool>,
    #[serde(rename = "alumni?", alias = "alumni", default)]
    pub alumni: Option<bool>,
    #[serde(rename = "active?", alias = "active", default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub correction_point: Option<i64>,
    #[serde(default)]
    pub pool_month: Option<String>,
    #[serde(default)]
    pub pool_year: Option<String>,
    /// Current workstation, when logged in on campus
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub wallet: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub alumnized_at: Option<DateTime<Utc>>,
}

/// Profile picture with its resized variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserImage {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub versions: ImageVersions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImageVersions {
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub micro: Option<String>,
}
