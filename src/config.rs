use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub upload_dir: String,
    /// Emails granted the admin role at registration time.
    pub admin_emails: Vec<String>,
    pub allow_seed: bool,
}

impl AppConfig {
    /// Loads configuration from the environment. `DATABASE_URL` and `JWT_SECRET`
    /// are required; startup fails rather than falling back to insecure defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET is not set; refusing to start with a default secret")?,
            ttl_hours: parse_ttl_hours(std::env::var("JWT_TTL_HOURS").ok())?,
        };
        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into());
        let admin_emails = std::env::var("ADMIN_EMAILS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let allow_seed = std::env::var("ALLOW_SEED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt,
            upload_dir,
            admin_emails,
            allow_seed,
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == email)
    }
}

/// Unset means the 24h default; anything set must be a positive hour count.
/// A typo in `JWT_TTL_HOURS` fails startup instead of silently issuing
/// tokens with a lifetime nobody asked for.
fn parse_ttl_hours(raw: Option<String>) -> anyhow::Result<i64> {
    match raw {
        None => Ok(24),
        Some(v) => {
            let hours = v
                .parse::<i64>()
                .with_context(|| format!("JWT_TTL_HOURS is not a number: {:?}", v))?;
            anyhow::ensure!(hours > 0, "JWT_TTL_HOURS must be positive, got {}", hours);
            Ok(hours)
        }
    }
}
