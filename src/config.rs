use secrecy::SecretString;
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub model_api_key: SecretString,
    pub model_name: String,
    pub model_api_base: Option<String>,
    pub model_timeout_secs: u64,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub document_char_budget: usize,
    pub context_json_char_budget: usize,
    pub max_upload_bytes: usize,
    pub upload_temp_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "promptform-local".to_string()),
            model_api_key: SecretString::from(env::var("MODEL_API_KEY").unwrap_or_default()),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            model_api_base: env::var("MODEL_API_BASE").ok().filter(|s| !s.is_empty()),
            model_timeout_secs: env::var("MODEL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(45),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            document_char_budget: env::var("DOCUMENT_CHAR_BUDGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60_000),
            context_json_char_budget: env::var("CONTEXT_JSON_CHAR_BUDGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20_000),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            upload_temp_dir: env::var("UPLOAD_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
        }
    }

    /// Validate configuration the server cannot run without.
    /// Panics if required settings are missing or nonsensical.
    pub fn validate(&self) {
        use secrecy::ExposeSecret;

        if self.model_api_key.expose_secret().trim().is_empty() {
            panic!(
                "FATAL: MODEL_API_KEY is not set! The server cannot reach the generative model without it."
            );
        }

        if self.model_timeout_secs == 0 {
            panic!("FATAL: MODEL_TIMEOUT_SECS must be greater than zero.");
        }

        if self.document_char_budget == 0 || self.context_json_char_budget == 0 {
            panic!("FATAL: character budgets must be greater than zero.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "promptform-test".to_string(),
            model_api_key: SecretString::from("test_api_key".to_string()),
            model_name: "gpt-4o-mini".to_string(),
            model_api_base: None,
            model_timeout_secs: 5,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            document_char_budget: 60_000,
            context_json_char_budget: 20_000,
            max_upload_bytes: 10 * 1024 * 1024,
            upload_temp_dir: std::env::temp_dir(),
        }
    }
}
