use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

pub const MIN_SECRET_LENGTH: usize = 32;
pub const MAX_SESSION_TTL_DAYS: i64 = 365;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl AppEnvironment {
    /// Reads `APP_ENV`, defaulting to development.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))
    }
}

/// Digest used to sign media host API requests.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default)]
    pub cookie_domain: Option<String>,

    /// Defaults to `true` in production.
    #[serde(default)]
    pub cookie_secure: Option<bool>,

    #[serde(default = "default_cookie_same_site")]
    pub cookie_same_site: String,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default = "default_login_burst")]
    pub login_burst: u32,

    #[serde(default = "default_login_refill_per_minute")]
    pub login_refill_per_minute: u32,

    #[serde(default = "default_upload_max_bytes")]
    pub upload_max_bytes: usize,

    #[serde(default = "default_cloudinary_base_url")]
    pub cloudinary_base_url: String,

    #[serde(default)]
    pub cloudinary_cloud_name: String,

    #[serde(default)]
    pub cloudinary_api_key: String,

    #[serde(default)]
    pub cloudinary_api_secret: String,

    /// Must match the signature algorithm configured on the Cloudinary account.
    #[serde(default)]
    pub cloudinary_signature_algorithm: SignatureAlgorithm,

    #[serde(default)]
    pub admin_identifier: Option<String>,

    #[serde(default)]
    pub admin_secret: Option<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Associates-API".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:4000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}
fn default_session_ttl_days() -> i64 {
    7
}
fn default_cookie_name() -> String {
    "access_token".to_string()
}
fn default_cookie_same_site() -> String {
    "lax".to_string()
}
fn default_login_burst() -> u32 {
    5
}
fn default_login_refill_per_minute() -> u32 {
    5
}
fn default_upload_max_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_cloudinary_base_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let env_name = AppEnvironment::from_env()?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Fall back to the unprefixed names used by older deployments
        config.database_url = fill_or_env(config.database_url, "DATABASE_URL")?;
        config.jwt_secret = fill_or_env(config.jwt_secret, "JWT_SECRET")?;
        config.cloudinary_cloud_name = fill_or_env(config.cloudinary_cloud_name, "CLOUDINARY_CLOUD_NAME")
            .unwrap_or_default();
        config.cloudinary_api_key = fill_or_env(config.cloudinary_api_key, "CLOUDINARY_API_KEY")
            .unwrap_or_default();
        config.cloudinary_api_secret = fill_or_env(config.cloudinary_api_secret, "CLOUDINARY_API_SECRET")
            .unwrap_or_default();

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty".to_string());
        }
        if self.jwt_secret.len() < MIN_SECRET_LENGTH {
            errors.push(format!("JWT_SECRET must be at least {} characters", MIN_SECRET_LENGTH));
        }
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&self.session_ttl_days) {
            errors.push(format!("SESSION_TTL_DAYS must be between 1 and {}", MAX_SESSION_TTL_DAYS));
        }
        if self.cookie_name.trim().is_empty() {
            errors.push("COOKIE_NAME cannot be empty".to_string());
        }
        match self.cookie_same_site.to_lowercase().as_str() {
            "lax" | "strict" => {}
            "none" if !self.cookie_secure() => {
                errors.push("COOKIE_SAME_SITE=none requires a secure cookie".to_string());
            }
            "none" => {}
            other => errors.push(format!("Invalid COOKIE_SAME_SITE value: {}", other)),
        }
        if self.login_burst == 0 || self.login_refill_per_minute == 0 {
            errors.push("Login rate limit values must be positive".to_string());
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or_else(|| self.is_production())
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn media_configured(&self) -> bool {
        ![
            &self.cloudinary_cloud_name,
            &self.cloudinary_api_key,
            &self.cloudinary_api_secret,
        ]
        .iter()
        .any(|value| value.trim().is_empty())
    }

    /// Bootstrap admin credential, when both halves are configured.
    pub fn admin_credential(&self) -> Option<(&str, &str)> {
        match (self.admin_identifier.as_deref(), self.admin_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: 1,
            database_url: String::new(),
            cors_allowed_origins: default_cors_origins(),
            jwt_secret: String::new(),
            session_ttl_days: default_session_ttl_days(),
            cookie_name: default_cookie_name(),
            cookie_domain: None,
            cookie_secure: None,
            cookie_same_site: default_cookie_same_site(),
            trust_x_forwarded_for: false,
            login_burst: default_login_burst(),
            login_refill_per_minute: default_login_refill_per_minute(),
            upload_max_bytes: default_upload_max_bytes(),
            cloudinary_base_url: default_cloudinary_base_url(),
            cloudinary_cloud_name: String::new(),
            cloudinary_api_key: String::new(),
            cloudinary_api_secret: String::new(),
            cloudinary_signature_algorithm: SignatureAlgorithm::default(),
            admin_identifier: None,
            admin_secret: None,
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < MIN_SECRET_LENGTH {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("session_ttl_days", &self.session_ttl_days)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_secure", &self.cookie_secure())
            .field("cookie_same_site", &self.cookie_same_site)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("login_burst", &self.login_burst)
            .field("login_refill_per_minute", &self.login_refill_per_minute)
            .field("upload_max_bytes", &self.upload_max_bytes)
            .field("cloudinary_cloud_name", &self.cloudinary_cloud_name)
            .field("cloudinary_api_secret", &self.cloudinary_api_secret.redact())
            .field("cloudinary_signature_algorithm", &self.cloudinary_signature_algorithm)
            .field("admin_identifier", &self.admin_identifier)
            .field("admin_secret", &self.admin_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let jwt_secret = Zeroizing::new(config.jwt_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/associates".into(),
            jwt_secret: "a".repeat(MIN_SECRET_LENGTH),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_short_signing_secret() {
        let config = AppConfig {
            jwt_secret: "short".into(),
            ..valid_config()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("JWT_SECRET"));
    }

    #[test]
    fn rejects_out_of_range_session_ttl() {
        for ttl in [0, -1, MAX_SESSION_TTL_DAYS + 1, i64::MAX / 2] {
            let config = AppConfig {
                session_ttl_days: ttl,
                ..valid_config()
            };
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("SESSION_TTL_DAYS"), "ttl {ttl} should be rejected");
        }

        let config = AppConfig {
            session_ttl_days: MAX_SESSION_TTL_DAYS,
            ..valid_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn signature_algorithm_defaults_to_sha1() {
        assert_eq!(AppConfig::default().cloudinary_signature_algorithm, SignatureAlgorithm::Sha1);

        let parsed: SignatureAlgorithm = serde_json::from_value(serde_json::json!("sha256")).unwrap();
        assert_eq!(parsed, SignatureAlgorithm::Sha256);
        assert!(serde_json::from_value::<SignatureAlgorithm>(serde_json::json!("md5")).is_err());
    }

    #[test]
    fn rejects_wildcard_cors_in_production() {
        let config = AppConfig {
            env: AppEnvironment::Production,
            cors_allowed_origins: vec!["*".into()],
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn same_site_none_needs_secure_cookie() {
        let config = AppConfig {
            cookie_same_site: "none".into(),
            cookie_secure: Some(false),
            ..valid_config()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            cookie_secure: Some(true),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn splits_comma_separated_origins() {
        let config = AppConfig {
            cors_allowed_origins: vec!["https://a.example, https://b.example".into(), " ".into()],
            ..valid_config()
        };
        assert_eq!(config.cors_origins(), vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig {
            admin_secret: Some("hunter2".into()),
            ..valid_config()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(&config.jwt_secret));
        assert!(!rendered.contains("hunter2"));
    }
}
