use crate::{InMemoryStorage, RotatingBloomSeries};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddRequest {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

pub struct AppState {
    pub series: RotatingBloomSeries<InMemoryStorage>,
}

#[derive(Builder, Clone)]
#[builder(pattern = "owned")]
pub struct ServerConfig {
    #[builder(default = "\"127.0.0.1\".to_string()")]
    pub server_host: String,
    #[builder(default = "3000")]
    pub server_port: u16,
    #[builder(default = "\"rotblf\".to_string()")]
    pub bloom_base_key: String,
    #[builder(default = "100_000")]
    pub bloom_capacity: usize,
    #[builder(default = "0.01")]
    pub bloom_false_positive_rate: f64,
    #[builder(default = "Duration::from_secs(60)")]
    pub bloom_resolution: Duration,
    #[builder(default = "Duration::from_secs(600)")]
    pub bloom_retention_limit: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| "Invalid SERVER_PORT")?,
            bloom_base_key: std::env::var("BLOOM_BASE_KEY")
                .unwrap_or_else(|_| "rotblf".to_string()),
            bloom_capacity: std::env::var("BLOOM_CAPACITY")
                .unwrap_or_else(|_| "100000".to_string())
                .parse()
                .map_err(|_| "Invalid BLOOM_CAPACITY")?,
            bloom_false_positive_rate: std::env::var("BLOOM_FALSE_POSITIVE_RATE")
                .unwrap_or_else(|_| "0.01".to_string())
                .parse()
                .map_err(|_| "Invalid BLOOM_FALSE_POSITIVE_RATE")?,
            bloom_resolution: Duration::from_secs(
                std::env::var("BLOOM_RESOLUTION_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .map_err(|_| "Invalid BLOOM_RESOLUTION_SECS")?,
            ),
            bloom_retention_limit: Duration::from_secs(
                std::env::var("BLOOM_RETENTION_SECS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .map_err(|_| "Invalid BLOOM_RETENTION_SECS")?,
            ),
        })
    }
}
