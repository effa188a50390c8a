//! Independent site data sources.
//!
//! Every optional provider implements [`SiteDataProvider`] and reports
//! failure as a [`ProviderError`]; the aggregator turns those into
//! `ProviderResult::Unavailable`. Elevation is handled separately by
//! [`ElevationSampler`], which never fails outward.

pub mod arcgis;
pub mod elevation;
pub mod flood;
pub mod imagery;
pub mod parcel;
pub mod soil;
pub mod wetlands;

use async_trait::async_trait;

use super::domain::Coordinate;

pub use arcgis::{ArcGisFeature, ArcGisFeatureClient};
pub use elevation::{ElevationSampler, ElevationService, ElevationSurvey, OpenElevationClient};
pub use flood::ArcGisFloodProvider;
pub use imagery::{
    decimate_boundary, GoogleStaticMapService, MapImage, MapOverlay, StaticMapImagery,
    StaticMapRequest, StaticMapService,
};
pub use parcel::{ArcGisParcelService, ParcelGis, ParcelProvider, ParcelRecord};
pub use soil::StaticSoilProvider;
pub use wetlands::ArcGisWetlandsProvider;

/// One category of optional site data fetched for a coordinate.
#[async_trait]
pub trait SiteDataProvider: Send + Sync {
    type Output: Send;

    /// Short label used in logs.
    fn name(&self) -> &'static str;

    async fn fetch(&self, coordinate: Coordinate) -> Result<Self::Output, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider not configured")]
    NotConfigured,
    #[error("no data for location")]
    NoData,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("unable to decode response: {0}")]
    Decode(String),
    #[error("timed out")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout
        } else if let Some(status) = value.status() {
            Self::Status(status.as_u16())
        } else if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}
