use config::{Config, ConfigError, Environment, File, Map};
use serde::{Deserialize, Deserializer};
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

#[derive(Debug, Clone, PartialEq)]
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
    /// Resolves `APP_ENV`. An unset value means production, so development
    /// conveniences stay opt-in.
    pub fn resolve(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(AppEnvironment::Production),
            Some(name) => AppEnvironment::from_str(name)
                .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", name))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Taken from `APP_ENV` via [`AppEnvironment::resolve`], never deserialized.
    #[serde(skip, default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub resend_api_key: Option<String>,

    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default)]
    pub contact_recipient: String,

    #[serde(default = "default_source_label")]
    pub source_label: String,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u32,

    #[serde(default = "default_rate_limit_window", deserialize_with = "deserialize_duration")]
    pub rate_limit_window: Duration,

    #[serde(default = "default_rate_limit_sweep_interval", deserialize_with = "deserialize_duration")]
    pub rate_limit_sweep_interval: Duration,

    #[serde(default = "default_rate_limit_max_clients")]
    pub rate_limit_max_clients: usize,

    #[serde(default)]
    pub trust_forwarded_for: bool,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Production
}
fn default_name() -> String {
    "Contact-API".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec![
        "https://utkarshjaiswal.vercel.app".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}
fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}
fn default_from_email() -> String {
    "onboarding@resend.dev".to_string()
}
fn default_source_label() -> String {
    "utkarshjaiswal.vercel.app".to_string()
}
fn default_rate_limit_max_requests() -> u32 {
    5
}
fn default_rate_limit_window() -> Duration {
    Duration::from_secs(15 * 60)
}
fn default_rate_limit_sweep_interval() -> Duration {
    Duration::from_secs(60)
}
fn default_rate_limit_max_clients() -> usize {
    10_000
}

/// Accepts either a bare number of seconds or a humantime string such as `15m`.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(u64),
        Human(String),
    }

    match RawDuration::deserialize(deserializer)? {
        RawDuration::Seconds(secs) => Ok(Duration::from_secs(secs)),
        RawDuration::Human(s) => humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom),
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_vars(env::vars().collect())
    }

    /// Loads configuration from the given variables instead of the process
    /// environment. Config files are still read when present.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let env_name = AppEnvironment::resolve(vars.get("APP_ENV").map(String::as_str))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true)
                    .source(Some(vars.clone())),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Unprefixed names, used only when the prefixed ones are absent
        let unprefixed = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let is_unset = |key: &str| unprefixed(key).is_none();

        if config.resend_api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            config.resend_api_key = unprefixed("RESEND_API_KEY");
        }
        if is_unset("APP_PORT") {
            if let Some(port) = unprefixed("PORT").and_then(|p| p.parse().ok()) {
                config.port = port;
            }
        }
        if is_unset("APP_CONTACT_RECIPIENT") {
            if let Some(recipient) = unprefixed("YOUR_EMAIL") {
                config.contact_recipient = recipient;
            }
        }
        if is_unset("APP_FROM_EMAIL") {
            if let Some(from) = unprefixed("FROM_EMAIL") {
                config.from_email = from;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.contact_recipient.trim().is_empty() {
            errors.push("APP_CONTACT_RECIPIENT (or YOUR_EMAIL) cannot be empty");
        }
        if self.from_email.trim().is_empty() {
            errors.push("APP_FROM_EMAIL (or FROM_EMAIL) cannot be empty");
        }
        if self.rate_limit_max_requests == 0 {
            errors.push("APP_RATE_LIMIT_MAX_REQUESTS must be greater than zero");
        }
        if self.rate_limit_window.is_zero() {
            errors.push("APP_RATE_LIMIT_WINDOW must be greater than zero");
        }
        if self.rate_limit_sweep_interval.is_zero() {
            errors.push("APP_RATE_LIMIT_SWEEP_INTERVAL must be greater than zero");
        }
        if self.rate_limit_max_clients == 0 {
            errors.push("APP_RATE_LIMIT_MAX_CLIENTS must be greater than zero");
        }
        if self.cors_origins().iter().any(|o| o != "*" && !o.starts_with("http://") && !o.starts_with("https://")) {
            errors.push("CORS origins must start with http:// or https://");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
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

    /// Provider error detail is only surfaced when `APP_ENV=development`.
    pub fn expose_error_details(&self) -> bool {
        self.env == AppEnvironment::Development
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Configuration used by tests and local tooling; never reads the environment.
    pub fn for_testing(contact_recipient: &str) -> Self {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Contact-API-Test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            worker_count: 1,
            cors_allowed_origins: default_cors_origins(),
            resend_api_key: None,
            resend_base_url: default_resend_base_url(),
            from_email: default_from_email(),
            contact_recipient: contact_recipient.to_string(),
            source_label: default_source_label(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window: default_rate_limit_window(),
            rate_limit_sweep_interval: default_rate_limit_sweep_interval(),
            rate_limit_max_clients: default_rate_limit_max_clients(),
            trust_forwarded_for: false,
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

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self.as_deref() {
            None => "[MISSING]",
            Some(s) if s.trim().is_empty() => "[MISSING]",
            Some(_) => "[REDACTED]",
        }
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
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("resend_api_key", &self.resend_api_key.redact())
            .field("resend_base_url", &self.resend_base_url)
            .field("from_email", &self.from_email)
            .field("contact_recipient", &self.contact_recipient)
            .field("source_label", &self.source_label)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window", &humantime::format_duration(self.rate_limit_window).to_string())
            .field("rate_limit_sweep_interval", &humantime::format_duration(self.rate_limit_sweep_interval).to_string())
            .field("rate_limit_max_clients", &self.rate_limit_max_clients)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}
