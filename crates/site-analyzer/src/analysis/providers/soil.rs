use async_trait::async_trait;

use super::{ProviderError, SiteDataProvider};
use crate::analysis::domain::{Coordinate, SoilInfo};

/// Fixed soil survey values used until a soil data service is wired in.
#[derive(Debug, Clone)]
pub struct StaticSoilProvider {
    survey: SoilInfo,
}

impl StaticSoilProvider {
    pub fn new(survey: SoilInfo) -> Self {
        Self { survey }
    }
}

impl Default for StaticSoilProvider {
    fn default() -> Self {
        Self::new(SoilInfo {
            soil_type: "Silty loam".to_string(),
            drainage: "Well drained".to_string(),
            bearing_capacity_psf: Some(2000),
        })
    }
}

#[async_trait]
impl SiteDataProvider for StaticSoilProvider {
    type Output = SoilInfo;

    fn name(&self) -> &'static str {
        "soil"
    }

    async fn fetch(&self, _coordinate: Coordinate) -> Result<SoilInfo, ProviderError> {
        Ok(self.survey.clone())
    }
}
