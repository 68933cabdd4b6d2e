use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_IP_ENDPOINT: &str = "http://ip-api.com/json/";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Formats as `lat,lng`, the shape the places endpoint expects.
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Location lookup failed: {0}")]
    Lookup(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum LocationSource {
    Fixed {
        lat: f64,
        lng: f64,
    },
    Ip {
        #[serde(default = "default_ip_endpoint")]
        endpoint: String,
    },
}

fn default_ip_endpoint() -> String {
    DEFAULT_IP_ENDPOINT.to_string()
}

impl Default for LocationSource {
    fn default() -> Self {
        Self::Ip {
            endpoint: default_ip_endpoint(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    status: Option<String>,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLookup {
    fn into_coordinates(self) -> Result<Coordinates, LocationError> {
        if let Some(status) = self.status.as_deref()
            && status != "success"
        {
            return Err(LocationError::Lookup(
                self.message.unwrap_or_else(|| status.to_string()),
            ));
        }
        self.lat
            .zip(self.lon)
            .map(|(lat, lng)| Coordinates::new(lat, lng))
            .ok_or_else(|| LocationError::Lookup("response has no coordinates".to_string()))
    }
}

static IP_LOCATION: OnceLock<RwLock<Option<Coordinates>>> = OnceLock::new();

fn ip_cache() -> &'static RwLock<Option<Coordinates>> {
    IP_LOCATION.get_or_init(|| RwLock::new(None))
}

/// Drops the cached IP location so the next resolve asks the endpoint again.
pub fn forget_cached_location() {
    *ip_cache().write() = None;
}

impl LocationSource {
    pub async fn resolve(&self, client: &Client) -> Result<Coordinates, LocationError> {
        match self {
            Self::Fixed { lat, lng } => Ok(Coordinates::new(*lat, *lng)),
            Self::Ip { endpoint } => {
                if let Some(cached) = *ip_cache().read() {
                    return Ok(cached);
                }
                let coords = client
                    .get(endpoint)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<IpLookup>()
                    .await?
                    .into_coordinates()?;
                log::debug!("Resolved location {} from {}", coords, endpoint);
                *ip_cache().write() = Some(coords);
                Ok(coords)
            }
        }
    }
}
