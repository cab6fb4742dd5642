use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Content roots
    pub server_root: String,
    pub data_root: String,
    pub static_root: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Write API
    pub api_key: String,

    // CORS
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        let server_root =
            env::var("SERVER_ROOT").unwrap_or_else(|_| "/srv/www/ontoserve".to_string());
        let data_root = env::var("DATA_ROOT").unwrap_or_else(|_| format!("{server_root}/data"));
        let static_root =
            env::var("STATIC_ROOT").unwrap_or_else(|_| format!("{server_root}/static"));
        let cors_origins = env::var("CORS_ORIGIN_PATTERNS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .collect();

        Self {
            server_root,
            data_root,
            static_root,
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            api_key: required_env("API_KEY"),
            cors_origins,
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
