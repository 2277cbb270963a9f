use std::env;

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "noreply@pentest-intake.local";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string. Submissions are kept in memory when unset.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub notify: NotifyConfig,
}

/// Notification sink settings. A `None` sink is logged instead of sent.
#[derive(Debug, Clone, Default)]
pub struct NotifyConfig {
    pub slack_webhook_url: Option<String>,
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub recipients: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let email = var("SMTP_HOST").and_then(|smtp_host| {
            let recipients: Vec<String> = var("NOTIFY_EMAIL_TO")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect();
            if recipients.is_empty() {
                return None;
            }
            Some(EmailConfig {
                smtp_host,
                smtp_port: var("SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                from_address: var("SMTP_FROM")
                    .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
                smtp_user: var("SMTP_USER"),
                smtp_password: var("SMTP_PASSWORD"),
                recipients,
            })
        });

        Self {
            database_url: var("DATABASE_URL"),
            database_max_connections: var("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            host: var("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("BACKEND_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            notify: NotifyConfig {
                slack_webhook_url: var("SLACK_WEBHOOK_URL"),
                email,
            },
        }
    }
}
