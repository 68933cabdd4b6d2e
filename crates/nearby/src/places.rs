use crate::location::Coordinates;
use derive_more::{AsRef, Deref, Display, From, Into};
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_RADIUS_METERS: u32 = 500;
pub const PHOTO_MAX_WIDTH: u32 = 256;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ApiKey(String);

crate::impl_string_newtype!(ApiKey);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PlaceName(String);

crate::impl_string_newtype!(PlaceName);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PhotoReference(String);

crate::impl_string_newtype!(PhotoReference);

/// Place type filter passed as the `type` parameter.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    #[default]
    Restaurant,
    Cafe,
    Bar,
    Bakery,
    MealTakeaway,
    MealDelivery,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub location: Coordinates,
    pub radius: u32,
    pub category: Category,
}

impl NearbyQuery {
    pub fn new(location: Coordinates) -> Self {
        Self {
            location,
            radius: DEFAULT_RADIUS_METERS,
            category: Category::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub name: PlaceName,
    pub photos: Vec<PhotoReference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Deserialize)]
struct PhotoEntry {
    photo_reference: PhotoReference,
}

#[derive(Debug, Deserialize)]
struct PlaceEntry {
    name: PlaceName,
    #[serde(default)]
    photos: Vec<PhotoEntry>,
}

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    status: SearchStatus,
    #[serde(default)]
    results: Vec<PlaceEntry>,
    error_message: Option<String>,
}

impl NearbySearchResponse {
    pub fn into_places(self) -> Result<Vec<Place>, PlacesError> {
        match self.status {
            SearchStatus::Ok | SearchStatus::ZeroResults => Ok(self
                .results
                .into_iter()
                .map(|entry| Place {
                    name: entry.name,
                    photos: entry
                        .photos
                        .into_iter()
                        .map(|p| p.photo_reference)
                        .collect(),
                })
                .collect()),
            status => Err(PlacesError::Status {
                status,
                message: self.error_message.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Places request failed: {0}")]
    Http(reqwest::Error),
    #[error("Places search returned {status:?}: {message}")]
    Status {
        status: SearchStatus,
        message: String,
    },
}

#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

/// Request URLs carry the API key, so they never reach the error text.
impl From<reqwest::Error> for PlacesError {
    fn from(e: reqwest::Error) -> Self {
        PlacesError::Http(e.without_url())
    }
}

impl PlacesClient {
    pub fn new(api_key: ApiKey) -> Result<Self, PlacesError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: ApiKey,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn nearby_request(&self, query: &NearbyQuery) -> Result<Request, PlacesError> {
        Ok(self
            .client
            .get(self.url("/nearbysearch/json"))
            .query(&[
                ("location", query.location.to_string()),
                ("radius", query.radius.to_string()),
                ("type", query.category.to_string()),
                ("key", self.api_key.to_string()),
            ])
            .build()?)
    }

    pub async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<Place>, PlacesError> {
        let request = self.nearby_request(query)?;
        log::debug!(
            "Searching {} within {}m of {}",
            query.category,
            query.radius,
            query.location
        );

        let places = self
            .client
            .execute(request)
            .await?
            .error_for_status()?
            .json::<NearbySearchResponse>()
            .await?
            .into_places()?;

        log::info!("Found {} places nearby", places.len());
        Ok(places)
    }

    pub fn photo_request(&self, reference: &PhotoReference) -> Result<Request, PlacesError> {
        Ok(self
            .client
            .get(self.url("/photo"))
            .query(&[
                ("maxwidth", PHOTO_MAX_WIDTH.to_string()),
                ("photo_reference", reference.to_string()),
                ("key", self.api_key.to_string()),
            ])
            .build()?)
    }

    pub async fn photo(&self, reference: &PhotoReference) -> Result<Vec<u8>, PlacesError> {
        let request = self.photo_request(reference)?;
        let bytes = self
            .client
            .execute(request)
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PlacesClient {
        PlacesClient::with_base_url("https://places.test/api/", ApiKey::new("secret")).unwrap()
    }

    #[test]
    fn test_category_parsing() {
        let cases = vec![
            ("restaurant", Category::Restaurant),
            ("Restaurant", Category::Restaurant),
            ("meal_takeaway", Category::MealTakeaway),
            ("CAFE", Category::Cafe),
        ];

        for (input, expected) in cases {
            assert_eq!(input.parse::<Category>().unwrap(), expected);
        }
        assert_eq!(Category::MealDelivery.to_string(), "meal_delivery");
        assert!("laundromat".parse::<Category>().is_err());
    }

    #[test]
    fn test_nearby_request_query() {
        let query = NearbyQuery {
            location: Coordinates::new(40.5, -3.25),
            radius: 750,
            category: Category::Bar,
        };
        let request = client().nearby_request(&query).unwrap();
        let url = request.url();

        assert_eq!(url.path(), "/api/nearbysearch/json");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("location".to_string(), "40.5,-3.25".to_string()),
                ("radius".to_string(), "750".to_string()),
                ("type".to_string(), "bar".to_string()),
                ("key".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_query_uses_restaurants_within_500m() {
        let query = NearbyQuery::new(Coordinates::new(0.0, 0.0));
        assert_eq!(query.radius, 500);
        assert_eq!(query.category, Category::Restaurant);
    }

    #[test]
    fn test_response_into_places() {
        let json = r#"{
            "status": "OK",
            "results": [
                {"name": "Trattoria", "photos": [{"photo_reference": "abc", "width": 400}]},
                {"name": "Noodle Bar"}
            ]
        }"#;
        let response: NearbySearchResponse = serde_json::from_str(json).unwrap();
        let places = response.into_places().unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name.as_str(), "Trattoria");
        assert_eq!(places[0].photos, vec![PhotoReference::new("abc")]);
        assert!(places[1].photos.is_empty());
    }

    #[test]
    fn test_zero_results_is_empty_not_error() {
        let response: NearbySearchResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(response.into_places().unwrap().is_empty());
    }

    #[test]
    fn test_denied_status_carries_message() {
        let json = r#"{"status": "REQUEST_DENIED", "results": [], "error_message": "bad key"}"#;
        let response: NearbySearchResponse = serde_json::from_str(json).unwrap();
        match response.into_places() {
            Err(PlacesError::Status { status, message }) => {
                assert_eq!(status, SearchStatus::RequestDenied);
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_status_is_tolerated_by_parser() {
        let response: NearbySearchResponse =
            serde_json::from_str(r#"{"status": "SOMETHING_NEW"}"#).unwrap();
        assert!(matches!(
            response.into_places(),
            Err(PlacesError::Status {
                status: SearchStatus::Unrecognized,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_failed_search_does_not_leak_key() {
        let places =
            PlacesClient::with_base_url("http://127.0.0.1:9", ApiKey::new("TOPSECRETKEY")).unwrap();
        let query = NearbyQuery::new(Coordinates::new(1.0, 2.0));

        let err = places.nearby_search(&query).await.unwrap_err();
        assert!(matches!(err, PlacesError::Http(_)));
        let shown = format!("{} {:?}", err, err);
        assert!(!shown.contains("TOPSECRETKEY"), "key leaked: {}", shown);

        let err = places
            .photo(&PhotoReference::new("ref-1"))
            .await
            .unwrap_err();
        assert!(!format!("{} {:?}", err, err).contains("TOPSECRETKEY"));
    }

    #[test]
    fn test_photo_request_query() {
        let request = client()
            .photo_request(&PhotoReference::new("ref-1"))
            .unwrap();
        assert_eq!(request.url().path(), "/api/photo");
        assert!(
            request
                .url()
                .query()
                .unwrap()
                .contains("photo_reference=ref-1")
        );
    }
}
