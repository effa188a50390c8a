use async_trait::async_trait;

use super::arcgis::{ArcGisFeature, ArcGisFeatureClient};
use super::{ProviderError, SiteDataProvider};
use crate::analysis::domain::{Coordinate, FloodInfo};

const ZONE_FIELDS: &[&str] = &["FLD_ZONE", "ZONE", "FLOOD_ZONE"];
const SUBTYPE_FIELDS: &[&str] = &["ZONE_SUBTY", "ZONE_SUBTYPE"];

/// FEMA National Flood Hazard Layer style flood zone lookup.
#[derive(Debug, Clone)]
pub struct ArcGisFloodProvider {
    layer: Option<ArcGisFeatureClient>,
}

impl ArcGisFloodProvider {
    pub fn new(layer: Option<ArcGisFeatureClient>) -> Self {
        Self { layer }
    }
}

#[async_trait]
impl SiteDataProvider for ArcGisFloodProvider {
    type Output = FloodInfo;

    fn name(&self) -> &'static str {
        "flood"
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<FloodInfo, ProviderError> {
        let layer = self.layer.as_ref().ok_or(ProviderError::NotConfigured)?;
        let feature = layer
            .feature_at(coordinate, false)
            .await?
            .ok_or(ProviderError::NoData)?;
        flood_info(&feature).ok_or(ProviderError::NoData)
    }
}

/// Zones A* and V* are the 1% annual chance (100-year) floodplain; shaded X
/// marks the 0.2% annual chance (500-year) floodplain.
pub(crate) fn flood_info(feature: &ArcGisFeature) -> Option<FloodInfo> {
    let zone = feature.text(ZONE_FIELDS)?.to_ascii_uppercase();
    let subtype = feature
        .text(SUBTYPE_FIELDS)
        .unwrap_or_default()
        .to_ascii_uppercase();

    let in_100_year_floodplain = zone.starts_with('A') || zone.starts_with('V');
    let in_500_year_floodplain =
        in_100_year_floodplain || (zone.starts_with('X') && subtype.contains("0.2 PCT"));

    Some(FloodInfo {
        zone,
        in_100_year_floodplain,
        in_500_year_floodplain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(attributes: serde_json::Value) -> ArcGisFeature {
        ArcGisFeature {
            attributes: attributes.as_object().cloned().unwrap_or_default(),
            geometry: None,
        }
    }

    #[test]
    fn special_flood_hazard_area_is_100_year() {
        let info = flood_info(&feature(json!({"FLD_ZONE": "AE"}))).expect("zone");
        assert!(info.in_100_year_floodplain);
        assert!(info.in_500_year_floodplain);
    }

    #[test]
    fn shaded_x_is_500_year_only() {
        let info = flood_info(&feature(json!({
            "FLD_ZONE": "X",
            "ZONE_SUBTY": "0.2 PCT ANNUAL CHANCE FLOOD HAZARD"
        })))
        .expect("zone");
        assert!(!info.in_100_year_floodplain);
        assert!(info.in_500_year_floodplain);
    }

    #[test]
    fn minimal_risk_x_is_outside_floodplains() {
        let info = flood_info(&feature(json!({
            "FLD_ZONE": "X",
            "ZONE_SUBTY": "AREA OF MINIMAL FLOOD HAZARD"
        })))
        .expect("zone");
        assert!(!info.in_100_year_floodplain);
        assert!(!info.in_500_year_floodplain);
        assert!(flood_info(&feature(json!({}))).is_none());
    }
}
