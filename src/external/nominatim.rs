use async_trait::async_trait;
use reqwest::header::{REFERER, USER_AGENT};
use serde::Deserialize;

use super::{check_status, transport_error, Geocoder};
use crate::{
    config::ProviderConfig,
    entities::{Coordinates, Place},
    error::{upstream_error, Error},
};

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Geocoder backed by the Nominatim search API.
#[derive(Clone, Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    api_base: String,
    user_agent: String,
    referer: String,
}

impl Nominatim {
    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_base: config.nominatim_api_base.clone(),
            user_agent: config.user_agent.clone(),
            referer: config.referer.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for Nominatim {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Place>, Error> {
        let context = format!("Geocoding failed for \"{}\"", query);
        let url = format!("{}/search", self.api_base);

        let res = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(REFERER, &self.referer)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .query(&[("addressdetails", "0")])
            .send()
            .await
            .map_err(|e| transport_error(&context, e))?;

        let hits: Vec<SearchHit> = check_status(res, &context)
            .await?
            .json()
            .await
            .map_err(|e| transport_error(&context, e))?;

        let hit = match hits.into_iter().next() {
            Some(hit) => hit,
            None => return Ok(None),
        };

        let lat = parse_degrees(&hit.lat, &context)?;
        let lng = parse_degrees(&hit.lon, &context)?;

        Ok(Some(Place {
            coordinates: Coordinates::new(lat, lng),
            label: hit.display_name,
        }))
    }
}

fn parse_degrees(value: &str, context: &str) -> Result<f64, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| upstream_error(500, format!("{}: invalid coordinate {:?}", context, value)))
}

#[test]
fn parses_nominatim_hits() {
    let hits: Vec<SearchHit> = serde_json::from_str(
        r#"[{"place_id": 1, "lat": "28.6304", "lon": "77.2177", "display_name": "Connaught Place, New Delhi"}]"#,
    )
    .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(parse_degrees(&hits[0].lat, "ctx").unwrap(), 28.6304);
    assert_eq!(parse_degrees(&hits[0].lon, "ctx").unwrap(), 77.2177);
    assert!(parse_degrees("north", "ctx").is_err());
}
