use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use site_analyzer::analysis::providers::{
    ArcGisFloodProvider, ArcGisParcelService, ArcGisWetlandsProvider, ElevationSampler,
    ElevationService, GoogleStaticMapService, ParcelGis, ParcelProvider, ProviderError,
    StaticMapImagery, StaticSoilProvider,
};
use site_analyzer::analysis::report::{HtmlReportRenderer, ReportAssembler};
use site_analyzer::analysis::{
    Coordinate, GeocodeError, Geocoder, SiteAnalysisService, SiteDataAggregator, SiteProviders,
};
use site_analyzer::config::{ElevationConfig, ImageryConfig, ProviderConfig};
use site_analyzer::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Live pipeline: one shared HTTP client carrying the call timeout and
/// user agent for every outbound request.
pub(crate) fn build_site_service(config: &ProviderConfig) -> Result<SiteAnalysisService, AppError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()?;

    Ok(SiteAnalysisService::from_config(client, config))
}

pub(crate) const DEMO_ADDRESS: &str = "400 S State St";
const DEMO_COORDINATE: Coordinate = Coordinate::new(40.7608, -111.8910);
const DEMO_READINGS: [f64; 5] = [1300.0, 1302.0, 1305.0, 1299.0, 1301.0];

struct FixtureGeocoder;

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Coordinate, GeocodeError> {
        Ok(DEMO_COORDINATE)
    }
}

#[derive(Default)]
struct FixtureElevation {
    calls: AtomicUsize,
}

#[async_trait]
impl ElevationService for FixtureElevation {
    async fn lookup(&self, _coordinate: Coordinate) -> Result<f64, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(DEMO_READINGS[call % DEMO_READINGS.len()])
    }
}

/// Pipeline that never leaves the process: a fixed geocode, recorded
/// elevation readings and GIS adapters with no layers configured.
pub(crate) fn offline_site_service() -> SiteAnalysisService {
    let timeout = Duration::from_secs(1);
    let imagery = ImageryConfig::default();

    let parcels: Arc<dyn ParcelGis> = Arc::new(ArcGisParcelService::new(None));
    let maps = Arc::new(GoogleStaticMapService::new(
        reqwest::Client::new(),
        imagery.base_url.clone(),
        None,
    ));
    let providers = SiteProviders {
        parcel: Arc::new(ParcelProvider::new(parcels.clone())),
        flood: Arc::new(ArcGisFloodProvider::new(None)),
        wetlands: Arc::new(ArcGisWetlandsProvider::new(None)),
        soil: Arc::new(StaticSoilProvider::default()),
        imagery: Arc::new(StaticMapImagery::new(parcels, maps, &imagery)),
    };
    let elevation = ElevationSampler::new(
        Arc::new(FixtureElevation::default()),
        &ElevationConfig::default(),
        timeout,
    );

    SiteAnalysisService::new(
        Arc::new(FixtureGeocoder),
        SiteDataAggregator::new(elevation, providers, timeout),
        ReportAssembler::new(Arc::new(HtmlReportRenderer)),
        Some("Salt Lake City, Utah".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_pipeline_reproduces_the_reference_site() {
        let report = offline_site_service()
            .analyze(DEMO_ADDRESS)
            .await
            .expect("offline analysis succeeds");

        assert_eq!(report.coordinate, DEMO_COORDINATE);
        assert_eq!(report.elevation.min, 1299.0);
        assert_eq!(report.elevation.max, 1305.0);
        assert_eq!(report.slope_analysis.classification_label, "Gentle (5-15%)");
        assert_eq!(report.risk.score.value(), 2);
    }

    #[test]
    fn live_service_builds_from_default_config() {
        assert!(build_site_service(&ProviderConfig::default()).is_ok());
    }
}
