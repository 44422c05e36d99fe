use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::json;

use super::{check_status, transport_error, Directions, LineGeometry, RouteGeometry};
use crate::{config::ProviderConfig, entities::Coordinates, error::Error};

const SHARE_FACTOR: f64 = 0.6;
const WEIGHT_FACTOR: f64 = 1.4;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Properties,
    #[serde(default)]
    geometry: LineGeometry,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    summary: Summary,
}

#[derive(Debug, Default, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

impl From<Feature> for RouteGeometry {
    fn from(feature: Feature) -> Self {
        Self {
            distance_meters: feature.properties.summary.distance,
            duration_seconds: feature.properties.summary.duration,
            coordinates: feature.geometry.into_coordinates(),
        }
    }
}

/// Directions from the OpenRouteService GeoJSON endpoint.
#[derive(Clone, Debug)]
pub struct OpenRouteService {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenRouteService {
    /// Returns `None` when no API key is configured.
    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Option<Self> {
        let api_key = config.ors_api_key.clone()?;

        Some(Self {
            client,
            api_base: config.ors_api_base.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Directions for OpenRouteService {
    #[tracing::instrument(skip(self))]
    async fn find_routes(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: &str,
        alternatives: u32,
    ) -> Result<Vec<RouteGeometry>, Error> {
        let context = "Directions failed";
        let url = format!("{}/v2/directions/{}/geojson", self.api_base, profile);

        let body = json!({
            "coordinates": [
                [origin.lng, origin.lat],
                [destination.lng, destination.lat],
            ],
            "radiuses": [-1, -1],
            "alternative_routes": {
                "target_count": alternatives,
                "share_factor": SHARE_FACTOR,
                "weight_factor": WEIGHT_FACTOR,
            },
        });

        let res = self
            .client
            .post(url)
            .header(AUTHORIZATION, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(context, e))?;

        let collection: FeatureCollection = check_status(res, context)
            .await?
            .json()
            .await
            .map_err(|e| transport_error(context, e))?;

        Ok(collection.features.into_iter().map(Into::into).collect())
    }
}

#[test]
fn parses_feature_collection() {
    let collection: FeatureCollection = serde_json::from_str(
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"summary": {"distance": 5310.4, "duration": 702.1}},
                    "geometry": {"type": "LineString", "coordinates": [[77.2, 28.6], [77.21, 28.61]]}
                },
                {
                    "type": "Feature",
                    "properties": {"summary": {}},
                    "geometry": {"type": "LineString", "coordinates": []}
                }
            ]
        }"#,
    )
    .unwrap();

    let routes: Vec<RouteGeometry> = collection.features.into_iter().map(Into::into).collect();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].distance_meters, 5310.4);
    assert_eq!(routes[0].coordinates[1], Coordinates::new(28.61, 77.21));
    assert_eq!(routes[1].duration_seconds, 0.0);
    assert!(routes[1].coordinates.is_empty());
}
