use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::ProviderError;
use crate::analysis::domain::Coordinate;

/// Point-in-polygon query against an ArcGIS feature or map service layer.
///
/// Parcel, flood hazard and wetlands layers are all published this way, so
/// the three providers share one client and differ only in how they read
/// the returned attributes.
#[derive(Debug, Clone)]
pub struct ArcGisFeatureClient {
    client: Client,
    layer_url: String,
}

/// First feature intersecting the queried point.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArcGisFeature {
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<ArcGisGeometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArcGisGeometry {
    #[serde(default)]
    pub rings: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    features: Vec<ArcGisFeature>,
    #[serde(default)]
    error: Option<QueryError>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl ArcGisFeatureClient {
    pub fn new(client: Client, layer_url: impl Into<String>) -> Self {
        Self {
            client,
            layer_url: layer_url.into(),
        }
    }

    pub async fn feature_at(
        &self,
        coordinate: Coordinate,
        with_geometry: bool,
    ) -> Result<Option<ArcGisFeature>, ProviderError> {
        let url = format!("{}/query", self.layer_url.trim_end_matches('/'));
        let geometry = format!("{},{}", coordinate.longitude, coordinate.latitude);
        let return_geometry = if with_geometry { "true" } else { "false" };

        let text = self
            .client
            .get(&url)
            .query(&[
                ("geometry", geometry.as_str()),
                ("geometryType", "esriGeometryPoint"),
                ("inSR", "4326"),
                ("outSR", "4326"),
                ("spatialRel", "esriSpatialRelIntersects"),
                ("outFields", "*"),
                ("returnGeometry", return_geometry),
                ("resultRecordCount", "1"),
                ("f", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_first_feature(&text)
    }
}

/// ArcGIS reports query failures inside a 200 response body.
pub(crate) fn parse_first_feature(body: &str) -> Result<Option<ArcGisFeature>, ProviderError> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(|err| ProviderError::Decode(err.to_string()))?;

    if let Some(error) = response.error {
        let message = error.message.unwrap_or_else(|| "unknown error".to_string());
        return Err(match error.code {
            Some(code) => ProviderError::Transport(format!("arcgis error {code}: {message}")),
            None => ProviderError::Transport(format!("arcgis error: {message}")),
        });
    }

    Ok(response.features.into_iter().next())
}

impl ArcGisFeature {
    /// Case-insensitive attribute lookup across candidate field names,
    /// rendered as text. Null and blank values count as missing.
    pub fn text(&self, candidates: &[&str]) -> Option<String> {
        candidates.iter().find_map(|candidate| {
            self.attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(candidate))
                .and_then(|(_, value)| match value {
                    Value::String(text) if !text.trim().is_empty() => {
                        Some(text.trim().to_string())
                    }
                    Value::Number(number) => Some(number.to_string()),
                    _ => None,
                })
        })
    }

    pub fn number(&self, candidates: &[&str]) -> Option<f64> {
        self.text(candidates)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }

    /// Outer ring as coordinates, dropping the repeated closing vertex.
    pub fn outer_ring(&self) -> Vec<Coordinate> {
        let Some(ring) = self
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.rings.first())
        else {
            return Vec::new();
        };

        let mut points: Vec<Coordinate> = ring
            .iter()
            .map(|[x, y]| Coordinate::new(*y, *x))
            .collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_attributes_and_ring() {
        let body = r#"{
            "features": [{
                "attributes": {"PARCEL_ID": "16-06-401-001", "parcel_acres": 0.27, "ZONING": null},
                "geometry": {"rings": [[[-111.891, 40.760], [-111.890, 40.760], [-111.890, 40.761], [-111.891, 40.760]]]}
            }]
        }"#;

        let feature = parse_first_feature(body)
            .expect("valid body")
            .expect("one feature");
        assert_eq!(
            feature.text(&["PARCEL_ID"]).as_deref(),
            Some("16-06-401-001")
        );
        assert_eq!(feature.number(&["PARCEL_ACRES"]), Some(0.27));
        assert_eq!(feature.text(&["ZONING"]), None);

        let ring = feature.outer_ring();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring[0], Coordinate::new(40.760, -111.891));
    }

    #[test]
    fn empty_feature_list_is_none() {
        let parsed = parse_first_feature(r#"{"features": []}"#).expect("valid body");
        assert!(parsed.is_none());
    }

    #[test]
    fn error_body_is_transport_failure() {
        let err = parse_first_feature(r#"{"error": {"code": 400, "message": "Invalid query"}}"#)
            .expect_err("error payload");
        assert!(err.to_string().contains("Invalid query"));
    }
}
