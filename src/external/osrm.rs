use async_trait::async_trait;
use serde::Deserialize;

use super::{check_status, transport_error, Directions, LineGeometry, RouteGeometry};
use crate::{config::ProviderConfig, entities::Coordinates, error::Error};

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    geometry: LineGeometry,
}

impl From<OsrmRoute> for RouteGeometry {
    fn from(route: OsrmRoute) -> Self {
        Self {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            coordinates: route.geometry.into_coordinates(),
        }
    }
}

/// Directions from an OSRM server. OSRM always routes with its driving
/// profile, the requested profile is ignored.
#[derive(Clone, Debug)]
pub struct Osrm {
    client: reqwest::Client,
    api_base: String,
}

impl Osrm {
    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_base: config.osrm_api_base.clone(),
        }
    }
}

#[async_trait]
impl Directions for Osrm {
    #[tracing::instrument(skip(self))]
    async fn find_routes(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        _profile: &str,
        _alternatives: u32,
    ) -> Result<Vec<RouteGeometry>, Error> {
        let context = "Directions (OSRM) failed";
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.api_base, origin.lng, origin.lat, destination.lng, destination.lat
        );

        let res = self
            .client
            .get(url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "true"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(context, e))?;

        let data: RouteResponse = check_status(res, context)
            .await?
            .json()
            .await
            .map_err(|e| transport_error(context, e))?;

        Ok(data.routes.into_iter().map(Into::into).collect())
    }
}

#[test]
fn parses_osrm_routes() {
    let data: RouteResponse = serde_json::from_str(
        r#"{
            "code": "Ok",
            "routes": [
                {"distance": 1200.5, "duration": 180.0, "geometry": {"type": "LineString", "coordinates": [[13.38, 52.51], [13.39, 52.52]]}}
            ]
        }"#,
    )
    .unwrap();

    let routes: Vec<RouteGeometry> = data.routes.into_iter().map(Into::into).collect();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].duration_seconds, 180.0);
    assert_eq!(routes[0].coordinates[0], Coordinates::new(52.51, 13.38));

    let empty: RouteResponse = serde_json::from_str(r#"{"code": "NoRoute"}"#).unwrap();
    assert!(empty.routes.is_empty());
}
