//! Configuration
//! Mission: Load runtime settings from the environment with sane defaults

/// Development fallback; a real deployment sets JWT_SECRET.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-here-change-in-production";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// Re-run the enrollment rules on update instead of trusting the caller.
    pub strict_updates: bool,
    /// SQLite path; unset means the in-memory store.
    pub database_path: Option<String>,
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());

        let token_ttl_minutes = std::env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(30);

        let strict_updates = env_flag("STRICT_UPDATES", false);

        let database_path = std::env::var("DATABASE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let seed_sample_data = env_flag("SEED_SAMPLE_DATA", false);

        Self {
            port,
            jwt_secret,
            token_ttl_minutes,
            strict_updates,
            database_path,
            seed_sample_data,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(default)
}
