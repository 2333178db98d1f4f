use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_gateway_anon_key")]
    pub gateway_anon_key: String,
    #[serde(default = "default_gateway_jwt_secret")]
    pub gateway_jwt_secret: String,
}

fn default_port() -> u16 { 3000 }
fn default_gateway_url() -> String { "http://localhost:54321".into() }
fn default_gateway_anon_key() -> String { "local-anon-key".into() }
fn default_gateway_jwt_secret() -> String { "development-secret-change-in-production".into() }

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("RANTROOM").separator("__"))
            .build()?;
        Ok(config.try_deserialize().unwrap_or_else(|_| Self {
            port: default_port(),
            gateway_url: default_gateway_url(),
            gateway_anon_key: default_gateway_anon_key(),
            gateway_jwt_secret: default_gateway_jwt_secret(),
        }))
    }
}
