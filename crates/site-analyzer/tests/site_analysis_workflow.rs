use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use site_analyzer::analysis::analyzer::SlopeClass;
use site_analyzer::analysis::providers::{
    ArcGisFloodProvider, ArcGisParcelService, ArcGisWetlandsProvider, ElevationSampler,
    ElevationService, GoogleStaticMapService, ParcelGis, ParcelProvider, ProviderError,
    StaticMapImagery, StaticSoilProvider,
};
use site_analyzer::analysis::report::{HtmlReportRenderer, ReportAssembler, UNAVAILABLE};
use site_analyzer::analysis::{
    Coordinate, ElevationSource, GeocodeError, Geocoder, SiteAnalysisService, SiteDataAggregator,
    SiteProviders,
};
use site_analyzer::config::{ElevationConfig, ImageryConfig};

struct DowntownGeocoder;

#[async_trait]
impl Geocoder for DowntownGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Coordinate, GeocodeError> {
        Ok(Coordinate::new(40.7608, -111.8910))
    }
}

struct SurveyedElevation {
    calls: AtomicUsize,
}

#[async_trait]
impl ElevationService for SurveyedElevation {
    async fn lookup(&self, _coordinate: Coordinate) -> Result<f64, ProviderError> {
        const READINGS: [f64; 5] = [1300.0, 1302.0, 1305.0, 1299.0, 1301.0];
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(READINGS[call % READINGS.len()])
    }
}

/// Real adapters with nothing configured, so only soil and elevation answer.
fn unconfigured_service() -> SiteAnalysisService {
    let client = reqwest::Client::new();
    let timeout = Duration::from_secs(2);

    let parcels: Arc<dyn ParcelGis> = Arc::new(ArcGisParcelService::new(None));
    let imagery_config = ImageryConfig::default();
    let maps = Arc::new(GoogleStaticMapService::new(
        client,
        imagery_config.base_url.clone(),
        None,
    ));

    let providers = SiteProviders {
        parcel: Arc::new(ParcelProvider::new(parcels.clone())),
        flood: Arc::new(ArcGisFloodProvider::new(None)),
        wetlands: Arc::new(ArcGisWetlandsProvider::new(None)),
        soil: Arc::new(StaticSoilProvider::default()),
        imagery: Arc::new(StaticMapImagery::new(parcels, maps, &imagery_config)),
    };
    let elevation = ElevationSampler::new(
        Arc::new(SurveyedElevation {
            calls: AtomicUsize::new(0),
        }),
        &ElevationConfig::default(),
        timeout,
    );

    SiteAnalysisService::new(
        Arc::new(DowntownGeocoder),
        SiteDataAggregator::new(elevation, providers, timeout),
        ReportAssembler::new(Arc::new(HtmlReportRenderer)),
        Some("Salt Lake City, Utah".to_string()),
    )
}

#[tokio::test]
async fn unconfigured_layers_degrade_to_placeholders() {
    let report = unconfigured_service()
        .analyze("50 W Broadway")
        .await
        .expect("analysis completes");

    assert_eq!(
        report.elevation.source,
        ElevationSource::Grid {
            collected: 25,
            requested: 25
        }
    );
    assert_eq!(report.slope_analysis.classification, SlopeClass::Gentle);

    assert_eq!(report.parcel.parcel_id, UNAVAILABLE);
    assert_eq!(report.flood.zone, UNAVAILABLE);
    assert_eq!(report.wetlands.classification, UNAVAILABLE);
    assert!(!report.satellite_image.available);

    assert!(report.soil.available);
    assert_eq!(report.soil.soil_type, "Silty loam");
    assert_eq!(report.soil.bearing_capacity_psf, Some(2000));

    // Well-drained soil adds nothing on top of the gentle slope.
    assert_eq!(report.risk.score.value(), 2);
    assert_eq!(report.risk.level, "Low");
    assert!(report.report_document.is_some());
}

#[tokio::test]
async fn report_serializes_for_the_api() {
    let report = unconfigured_service()
        .analyze("50 W Broadway")
        .await
        .expect("analysis completes");

    let value = serde_json::to_value(&report).expect("report serializes");

    assert_eq!(value["address"], "50 W Broadway");
    assert_eq!(value["coordinate"]["latitude"], 40.7608);
    assert_eq!(value["elevation"]["source"]["kind"], "grid");
    assert_eq!(value["slope_analysis"]["buildability"], "good");
    assert_eq!(value["utilities"]["total_high"], 30_000.0);
    assert_eq!(value["report_document"]["encoding"], "base64");
    assert!(value["generated_at"].is_string());
}
