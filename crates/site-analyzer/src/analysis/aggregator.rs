use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::domain::{
    Coordinate, FloodInfo, ParcelInfo, ProviderResult, RawSiteData, SatelliteImage, SoilInfo,
    WetlandsInfo,
};
use super::providers::{ElevationSampler, ProviderError, SiteDataProvider};

pub type DynProvider<T> = Arc<dyn SiteDataProvider<Output = T>>;

/// The five optional data sources, bundled for construction.
#[derive(Clone)]
pub struct SiteProviders {
    pub parcel: DynProvider<ParcelInfo>,
    pub flood: DynProvider<FloodInfo>,
    pub wetlands: DynProvider<WetlandsInfo>,
    pub soil: DynProvider<SoilInfo>,
    pub imagery: DynProvider<SatelliteImage>,
}

/// Fans out to every provider for one coordinate and waits for all of them.
///
/// Optional providers that fail, time out or panic are recorded as
/// `Unavailable`; their siblings are never cancelled.
#[derive(Clone)]
pub struct SiteDataAggregator {
    elevation: ElevationSampler,
    providers: SiteProviders,
    call_timeout: Duration,
}

impl SiteDataAggregator {
    pub fn new(elevation: ElevationSampler, providers: SiteProviders, call_timeout: Duration) -> Self {
        Self {
            elevation,
            providers,
            call_timeout,
        }
    }

    pub async fn aggregate(&self, coordinate: Coordinate) -> RawSiteData {
        let providers = &self.providers;
        let (survey, parcel, flood, wetlands, soil, satellite_image) = tokio::join!(
            self.elevation.survey(coordinate),
            settle(providers.parcel.as_ref(), coordinate, self.call_timeout),
            settle(providers.flood.as_ref(), coordinate, self.call_timeout),
            settle(providers.wetlands.as_ref(), coordinate, self.call_timeout),
            settle(providers.soil.as_ref(), coordinate, self.call_timeout),
            settle(providers.imagery.as_ref(), coordinate, self.call_timeout),
        );

        let available = [
            parcel.is_available(),
            flood.is_available(),
            wetlands.is_available(),
            soil.is_available(),
            satellite_image.is_available(),
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count();
        info!(
            available,
            elevation_source = %survey.source.label(),
            "site data aggregated"
        );

        RawSiteData {
            coordinate,
            elevation: survey.summary,
            elevation_source: survey.source,
            parcel,
            flood,
            wetlands,
            soil,
            satellite_image,
        }
    }
}

async fn settle<T>(
    provider: &dyn SiteDataProvider<Output = T>,
    coordinate: Coordinate,
    call_timeout: Duration,
) -> ProviderResult<T>
where
    T: Send,
{
    let name = provider.name();
    let call = AssertUnwindSafe(timeout(call_timeout, provider.fetch(coordinate))).catch_unwind();

    match call.await {
        Ok(Ok(Ok(value))) => {
            debug!(provider = name, "provider succeeded");
            ProviderResult::Success(value)
        }
        Ok(Ok(Err(ProviderError::NotConfigured))) => {
            debug!(provider = name, "provider not configured");
            ProviderResult::Unavailable
        }
        Ok(Ok(Err(err))) => {
            warn!(provider = name, error = %err, "provider unavailable");
            ProviderResult::Unavailable
        }
        Ok(Err(_)) => {
            warn!(
                provider = name,
                timeout_ms = call_timeout.as_millis() as u64,
                "provider timed out"
            );
            ProviderResult::Unavailable
        }
        Err(_) => {
            warn!(provider = name, "provider panicked");
            ProviderResult::Unavailable
        }
    }
}
