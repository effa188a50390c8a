use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::domain::Coordinate;
use crate::config::GeocoderConfig;

/// Resolves a free-text address to a single coordinate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("could not geocode address: {address}")]
    NotFound { address: String },
    #[error("geocoding service failed: {0}")]
    Upstream(String),
}

/// Nominatim (OpenStreetMap) search client. Takes the first match as-is.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    config: GeocoderConfig,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, config: GeocoderConfig) -> Self {
        Self { client, config }
    }

    pub(crate) fn query_for(&self, address: &str) -> String {
        match &self.config.region_qualifier {
            Some(region) => format!("{}, {}", address.trim(), region),
            None => address.trim().to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let query = self.query_for(address);
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        debug!(%query, "querying geocoder");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|err| GeocodeError::Upstream(err.to_string()))?
            .error_for_status()
            .map_err(|err| GeocodeError::Upstream(err.to_string()))?;

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|err| GeocodeError::Upstream(format!("malformed response: {err}")))?;

        first_match(address, places)
    }
}

fn first_match(address: &str, places: Vec<NominatimPlace>) -> Result<Coordinate, GeocodeError> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound {
            address: address.to_string(),
        })?;

    let latitude = place
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::Upstream(format!("invalid latitude '{}'", place.lat)))?;
    let longitude = place
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::Upstream(format!("invalid longitude '{}'", place.lon)))?;

    Ok(Coordinate::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_parses_string_coordinates() {
        let places: Vec<NominatimPlace> = serde_json::from_str(
            r#"[{"lat":"40.7608","lon":"-111.8910","display_name":"Salt Lake City"},
                {"lat":"0","lon":"0"}]"#,
        )
        .expect("valid payload");

        let coordinate = first_match("50 S Main St", places).expect("match");
        assert_eq!(coordinate, Coordinate::new(40.7608, -111.8910));
    }

    #[test]
    fn empty_result_is_not_found() {
        let err = first_match("nowhere", Vec::new()).expect_err("no match");
        assert!(matches!(err, GeocodeError::NotFound { ref address } if address == "nowhere"));
    }

    #[test]
    fn unparsable_coordinate_is_upstream_error() {
        let places = vec![NominatimPlace {
            lat: "north".to_string(),
            lon: "-111.0".to_string(),
        }];
        let err = first_match("x", places).expect_err("bad latitude");
        assert!(matches!(err, GeocodeError::Upstream(_)));
    }

    #[test]
    fn query_appends_region_qualifier() {
        let geocoder = NominatimGeocoder::new(Client::new(), GeocoderConfig::default());
        assert_eq!(
            geocoder.query_for(" 50 S Main St "),
            "50 S Main St, Salt Lake City, Utah"
        );

        let unscoped = NominatimGeocoder::new(
            Client::new(),
            GeocoderConfig {
                region_qualifier: None,
                ..GeocoderConfig::default()
            },
        );
        assert_eq!(unscoped.query_for("50 S Main St"), "50 S Main St");
    }
}
