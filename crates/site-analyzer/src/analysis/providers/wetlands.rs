use async_trait::async_trait;

use super::arcgis::ArcGisFeatureClient;
use super::{ProviderError, SiteDataProvider};
use crate::analysis::domain::{Coordinate, WetlandsInfo};

const TYPE_FIELDS: &[&str] = &["WETLAND_TYPE", "ATTRIBUTE", "WETLAND_TY"];

/// National Wetlands Inventory style lookup: a mapped polygon under the
/// point means wetlands are present.
#[derive(Debug, Clone)]
pub struct ArcGisWetlandsProvider {
    layer: Option<ArcGisFeatureClient>,
}

impl ArcGisWetlandsProvider {
    pub fn new(layer: Option<ArcGisFeatureClient>) -> Self {
        Self { layer }
    }
}

#[async_trait]
impl SiteDataProvider for ArcGisWetlandsProvider {
    type Output = WetlandsInfo;

    fn name(&self) -> &'static str {
        "wetlands"
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<WetlandsInfo, ProviderError> {
        let layer = self.layer.as_ref().ok_or(ProviderError::NotConfigured)?;
        let info = match layer.feature_at(coordinate, false).await? {
            Some(feature) => WetlandsInfo {
                present: true,
                classification: feature.text(TYPE_FIELDS),
            },
            None => WetlandsInfo {
                present: false,
                classification: None,
            },
        };
        Ok(info)
    }
}
