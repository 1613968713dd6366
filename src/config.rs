use anyhow::Result;
use chrono::{FixedOffset, Offset, Utc};
use std::env;

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub domain: String,
    pub api_key: String,
    pub sender: String,
    pub api_base: String,
}

impl MailConfig {
    /// Mail goes out only when both the domain and key are set.
    pub fn is_enabled(&self) -> bool {
        !self.domain.is_empty() && !self.api_key.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    /// Offset of the depot's local day from UTC.
    pub utc_offset_minutes: i32,
    pub mail: MailConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/fleet".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "your-super-secret-jwt-key-change-this-in-production-12345".to_string()
            }),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("CLIENT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            utc_offset_minutes: env::var("UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|minutes: &i32| minutes.abs() < 24 * 60)
                .unwrap_or(0),
            mail: MailConfig {
                domain: env::var("MAIL_DOMAIN").unwrap_or_default(),
                api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
                sender: env::var("MAIL_SENDER")
                    .unwrap_or_else(|_| "Fleet <info@localhost>".to_string()),
                api_base: env::var("MAIL_API_BASE")
                    .unwrap_or_else(|_| "https://api.mailgun.net/v3".to_string()),
            },
        })
    }

    /// Configuration for tests: UTC day boundaries and no outbound mail.
    pub fn test_config() -> Self {
        Config {
            database_url: "postgres://@localhost:5432/fleet_test".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            utc_offset_minutes: 0,
            mail: MailConfig {
                domain: String::new(),
                api_key: String::new(),
                sender: "Fleet <info@localhost>".to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
            },
        }
    }

    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
