use rand::distributions::Alphanumeric;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub mongo_db: String,
    pub secret_key: String,
    pub app_host: String,
    pub app_port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mongo_uri =
            std::env::var("MONGO_URI").map_err(|_| anyhow::anyhow!("MONGO_URI is not set"))?;
        let mongo_db = std::env::var("MONGO_DB").unwrap_or_else(|_| "userhub".into());
        let secret_key = std::env::var("SECRET_KEY").unwrap_or_else(|_| generate_secret_key());
        let app_host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let app_port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        Ok(Self {
            mongo_uri,
            mongo_db,
            secret_key,
            app_host,
            app_port,
        })
    }
}

/// Fallback for a missing SECRET_KEY. No tokens are issued yet, so a fresh
/// key per boot invalidates nothing.
fn generate_secret_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(43)
        .map(char::from)
        .collect()
}
