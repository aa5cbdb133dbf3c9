use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub project_id: String,
    /// Service-account key JSON supplied inline
    #[serde(default)]
    pub service_account_json: Option<String>,
    /// Path to a service-account key file
    #[serde(default)]
    pub service_account_file: Option<String>,
    /// Base URL of the FCM HTTP v1 API
    #[serde(default = "default_fcm_endpoint")]
    pub fcm_endpoint: String,
    /// Reuse access tokens until shortly before they expire
    #[serde(default)]
    pub cache_tokens: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Attach the `data` block (type / senderUid) to outbound messages
    #[serde(default = "default_include_data")]
    pub include_data: bool,
    #[serde(default)]
    pub upstream_status: UpstreamStatusPolicy,
}

/// HTTP status returned to the caller when FCM rejects a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamStatusPolicy {
    /// Always answer 500
    #[default]
    Internal,
    /// Answer with the status FCM returned
    Forward,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4321
}

fn default_body_limit() -> usize {
    100 * 1024 // 100 KiB
}

fn default_fcm_endpoint() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_include_data() -> bool {
    true
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "fcm-relay-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4321)?
            .set_default("firebase.fcm_endpoint", default_fcm_endpoint())?
            .set_default("relay.include_data", true)?
            .set_default("relay.upstream_status", "internal")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // RELAY_SERVER__PORT, RELAY_FIREBASE__PROJECT_ID, etc.
            .add_source(
                Environment::with_prefix("RELAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            // Variable names used by existing deployments
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("firebase.project_id", env::var("PROJECT_ID").ok())?
            .set_override_option(
                "firebase.service_account_json",
                env::var("FIREBASE_SERVICE_ACCOUNT").ok(),
            )?
            .set_override_option(
                "firebase.service_account_file",
                env::var("GOOGLE_APPLICATION_CREDENTIALS").ok(),
            )?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            include_data: default_include_data(),
            upstream_status: UpstreamStatusPolicy::default(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 4321);
        assert_eq!(server.body_limit_bytes, 102400);

        let relay = RelayConfig::default();
        assert!(relay.include_data);
        assert_eq!(relay.upstream_status, UpstreamStatusPolicy::Internal);
    }

    #[test]
    fn test_upstream_policy_deserialize() {
        let policy: UpstreamStatusPolicy = serde_json::from_str("\"forward\"").unwrap();
        assert_eq!(policy, UpstreamStatusPolicy::Forward);

        let policy: UpstreamStatusPolicy = serde_json::from_str("\"internal\"").unwrap();
        assert_eq!(policy, UpstreamStatusPolicy::Internal);

        assert!(serde_json::from_str::<UpstreamStatusPolicy>("\"retry\"").is_err());
    }

    // Single test so the process environment is not mutated concurrently
    #[test]
    fn test_env_overrides() {
        let vars = [
            ("RELAY_SERVER__PORT", "9000"),
            ("PORT", "8080"),
            ("RELAY_FIREBASE__PROJECT_ID", "relay-proj"),
            ("PROJECT_ID", "legacy-proj"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/keys/sa.json"),
            ("RELAY_SERVER__CORS_ORIGINS", "https://a.example,https://b.example"),
            ("RELAY_RELAY__UPSTREAM_STATUS", "forward"),
        ];
        env::remove_var("FIREBASE_SERVICE_ACCOUNT");
        env::remove_var("RELAY_FIREBASE__SERVICE_ACCOUNT_JSON");
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = Settings::new();

        for (key, _) in vars {
            env::remove_var(key);
        }

        let settings = result.unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server_addr(), "0.0.0.0:8080");
        assert_eq!(settings.firebase.project_id, "legacy-proj");
        assert_eq!(
            settings.firebase.service_account_file.as_deref(),
            Some("/keys/sa.json")
        );
        assert!(settings.firebase.service_account_json.is_none());
        assert_eq!(
            settings.server.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(settings.relay.upstream_status, UpstreamStatusPolicy::Forward);
        assert!(settings.relay.include_data);
    }

    #[test]
    fn test_firebase_config_from_json() {
        let firebase: FirebaseConfig = serde_json::from_value(serde_json::json!({
            "project_id": "demo-project",
            "service_account_file": "/etc/keys/sa.json"
        }))
        .unwrap();

        assert_eq!(firebase.project_id, "demo-project");
        assert_eq!(firebase.fcm_endpoint, "https://fcm.googleapis.com");
        assert!(firebase.service_account_json.is_none());
        assert!(!firebase.cache_tokens);
    }
}
