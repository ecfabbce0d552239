//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup. A `.env` file is honored for local
//! development.

use std::collections::HashSet;
use std::env;
use std::str::FromStr;

/// Default upstream base URL (42 intranet API).
pub const DEFAULT_API_BASE_URL: &str = "https://api.intra.42.fr";

/// Who may read an event's attendee list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantsAccess {
    /// Session required, and the session's login must be a configured admin.
    Admin,
    /// Anyone, falling back to an application token without a session.
    Public,
}

impl FromStr for ParticipantsAccess {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "public" => Ok(Self::Public),
            _ => Err(ConfigError::Invalid {
                name: "PARTICIPANTS_ACCESS",
                value: s.to_string(),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// 42 OAuth client ID (public)
    pub client_id: String,
    /// OAuth redirect URI registered with the 42 application
    pub redirect_uri: String,
    /// Upstream API base URL, without trailing slash
    pub api_base_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Production mode: `Secure` cookies and HSTS
    pub production: bool,
    /// Logins allowed to read attendee lists under the admin policy
    pub admin_logins: HashSet<String>,
    /// Attendee list access policy
    pub participants_access: ParticipantsAccess,

    // --- Secrets ---
    /// 42 OAuth client secret
    pub client_secret: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            redirect_uri: "http://localhost:3000/auth/callback".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            production: false,
            admin_logins: HashSet::from(["admin".to_string()]),
            participants_access: ParticipantsAccess::Admin,
            client_secret: "test_secret".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let participants_access = match env::var("PARTICIPANTS_ACCESS") {
            Ok(raw) => raw.parse()?,
            Err(_) => ParticipantsAccess::Admin,
        };

        Ok(Self {
            client_id: env::var("FORTYTWO_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("FORTYTWO_CLIENT_ID"))?,
            redirect_uri: env::var("FORTYTWO_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:3000/auth/callback".to_string()),
            api_base_url: env::var("FORTYTWO_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            production: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            admin_logins: parse_logins(&env::var("ADMIN_LOGINS").unwrap_or_default()),
            participants_access,

            client_secret: env::var("FORTYTWO_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FORTYTWO_CLIENT_SECRET"))?,
        })
    }

    /// Whether `login` may read attendee lists under the admin policy.
    pub fn is_admin(&self, login: &str) -> bool {
        self.admin_logins.contains(login)
    }
}

/// Parse a comma-separated login list, ignoring blanks.
fn parse_logins(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
