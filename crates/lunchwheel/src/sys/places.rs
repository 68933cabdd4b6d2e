use crate::config::PlacesConfig;
use crate::events::{AppEvent, LoadedItem, PlacesBatch};
use async_channel::Sender;
use nearby::location::LocationError;
use nearby::photo::PhotoCache;
use nearby::places::{NearbyQuery, Place, PlacesClient, PlacesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no places API key configured (set places.api_key)")]
    MissingApiKey,
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Places(#[from] PlacesError),
}

/// Searches nearby places and hands them to the GUI. Failures are logged only.
pub async fn load_places(cfg: PlacesConfig, generation: u64, tx: Sender<AppEvent>) {
    if !cfg.enabled {
        log::debug!("Places search disabled");
        return;
    }

    match fetch_items(&cfg).await {
        Ok(items) => {
            let batch = PlacesBatch { generation, items };
            if tx.send(AppEvent::ItemsLoaded(batch)).await.is_err() {
                log::warn!("GUI went away before places arrived");
            }
        }
        Err(e) => log::error!("Failed to load nearby places: {}", e),
    }
}

async fn fetch_items(cfg: &PlacesConfig) -> Result<Vec<LoadedItem>, LoadError> {
    let key = cfg.api_key.clone().ok_or(LoadError::MissingApiKey)?;
    let client = PlacesClient::with_base_url(cfg.base_url.as_str(), key)?;
    let location = cfg.location.resolve(client.http()).await?;

    let query = NearbyQuery {
        location,
        radius: cfg.radius,
        category: cfg.category,
    };
    let places = limit_places(client.nearby_search(&query).await?, cfg.limit);

    let cache = if cfg.photos {
        PhotoCache::from_project_dirs()
            .map_err(|e| log::warn!("Photos disabled: {}", e))
            .ok()
    } else {
        None
    };

    let mut items = Vec::with_capacity(places.len());
    for place in places {
        let icon = match (&cache, place.photos.first()) {
            (Some(cache), Some(reference)) => cache
                .fetch(&client, reference)
                .await
                .map_err(|e| log::warn!("No photo for {}: {}", place.name, e))
                .ok(),
            _ => None,
        };
        items.push(LoadedItem {
            label: place.name.into(),
            icon,
        });
    }
    Ok(items)
}

fn limit_places(mut places: Vec<Place>, limit: Option<usize>) -> Vec<Place> {
    if let Some(limit) = limit {
        places.truncate(limit);
    }
    places
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearby::places::PlaceName;

    fn places(names: &[&str]) -> Vec<Place> {
        names
            .iter()
            .map(|n| Place {
                name: PlaceName::new(*n),
                photos: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_limit_places() {
        assert_eq!(limit_places(places(&["a", "b", "c"]), Some(2)).len(), 2);
        assert_eq!(limit_places(places(&["a", "b", "c"]), None).len(), 3);
        assert_eq!(limit_places(places(&["a"]), Some(5)).len(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let cfg = PlacesConfig::default();
        assert!(matches!(
            fetch_items(&cfg).await,
            Err(LoadError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_disabled_search_sends_nothing() {
        let (tx, rx) = async_channel::bounded(1);
        let cfg = PlacesConfig {
            enabled: false,
            ..PlacesConfig::default()
        };
        load_places(cfg, 0, tx).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let (tx, rx) = async_channel::bounded(1);
        load_places(PlacesConfig::default(), 0, tx).await;
        assert!(rx.try_recv().is_err());
    }
}
