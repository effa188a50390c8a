use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::analysis::aggregator::{SiteDataAggregator, SiteProviders};
use crate::analysis::domain::{
    Coordinate, FloodInfo, ParcelInfo, SatelliteImage, SoilInfo, WetlandsInfo,
};
use crate::analysis::geocoder::{GeocodeError, Geocoder};
use crate::analysis::providers::{
    ElevationSampler, ElevationService, ProviderError, SiteDataProvider,
};
use crate::analysis::report::{
    DocumentRenderer, HtmlReportRenderer, RenderError, RenderedDocument, ReportAssembler,
    SiteReport,
};
use crate::analysis::SiteAnalysisService;
use crate::config::ElevationConfig;

pub(super) const SLC: Coordinate = Coordinate::new(40.7608, -111.8910);
pub(super) const REFERENCE_READINGS: [f64; 5] = [1300.0, 1302.0, 1305.0, 1299.0, 1301.0];
pub(super) const CALL_TIMEOUT: Duration = Duration::from_millis(200);

pub(super) struct FixedGeocoder(pub Coordinate);

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Coordinate, GeocodeError> {
        Ok(self.0)
    }
}

pub(super) struct MissingGeocoder;

#[async_trait]
impl Geocoder for MissingGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        Err(GeocodeError::NotFound {
            address: address.to_string(),
        })
    }
}

pub(super) struct BrokenGeocoder;

#[async_trait]
impl Geocoder for BrokenGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Coordinate, GeocodeError> {
        Err(GeocodeError::Upstream("connection reset".to_string()))
    }
}

/// Hands out the readings in order, wrapping around.
pub(super) struct CyclingElevation {
    readings: Vec<f64>,
    next: AtomicUsize,
}

impl CyclingElevation {
    pub(super) fn new(readings: &[f64]) -> Self {
        Self {
            readings: readings.to_vec(),
            next: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ElevationService for CyclingElevation {
    async fn lookup(&self, _coordinate: Coordinate) -> Result<f64, ProviderError> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(self.readings[index % self.readings.len()])
    }
}

pub(super) struct DownElevation;

#[async_trait]
impl ElevationService for DownElevation {
    async fn lookup(&self, _coordinate: Coordinate) -> Result<f64, ProviderError> {
        Err(ProviderError::Status(503))
    }
}

#[derive(Clone)]
pub(super) enum Behavior<T> {
    Succeed(T),
    Fail,
    Panic,
    Stall,
}

pub(super) struct FakeProvider<T> {
    name: &'static str,
    behavior: Behavior<T>,
}

impl<T> FakeProvider<T> {
    pub(super) fn arc(name: &'static str, behavior: Behavior<T>) -> Arc<Self> {
        Arc::new(Self { name, behavior })
    }
}

#[async_trait]
impl<T> SiteDataProvider for FakeProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _coordinate: Coordinate) -> Result<T, ProviderError> {
        match &self.behavior {
            Behavior::Succeed(value) => Ok(value.clone()),
            Behavior::Fail => Err(ProviderError::Transport("connection refused".to_string())),
            Behavior::Panic => panic!("{} provider exploded", self.name),
            Behavior::Stall => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(ProviderError::NoData)
            }
        }
    }
}

pub(super) fn parcel() -> ParcelInfo {
    ParcelInfo {
        parcel_id: "16-06-401-001".to_string(),
        acreage: Some(0.31),
        zoning: Some("R-1-7000".to_string()),
        boundary: vec![
            Coordinate::new(40.7609, -111.8912),
            Coordinate::new(40.7609, -111.8908),
            Coordinate::new(40.7607, -111.8908),
            Coordinate::new(40.7607, -111.8912),
        ],
    }
}

pub(super) fn flood() -> FloodInfo {
    FloodInfo {
        zone: "X".to_string(),
        in_100_year_floodplain: false,
        in_500_year_floodplain: false,
    }
}

pub(super) fn soil() -> SoilInfo {
    SoilInfo {
        soil_type: "Silty loam".to_string(),
        drainage: "Well drained".to_string(),
        bearing_capacity_psf: Some(2000),
    }
}

pub(super) fn unavailable_providers() -> SiteProviders {
    SiteProviders {
        parcel: FakeProvider::<ParcelInfo>::arc("parcel", Behavior::Fail),
        flood: FakeProvider::<FloodInfo>::arc("flood", Behavior::Fail),
        wetlands: FakeProvider::<WetlandsInfo>::arc("wetlands", Behavior::Fail),
        soil: FakeProvider::<SoilInfo>::arc("soil", Behavior::Fail),
        imagery: FakeProvider::<SatelliteImage>::arc("satellite_imagery", Behavior::Fail),
    }
}

pub(super) fn sampler(service: Arc<dyn ElevationService>) -> ElevationSampler {
    ElevationSampler::new(service, &ElevationConfig::default(), CALL_TIMEOUT)
}

pub(super) fn aggregator(
    elevation: Arc<dyn ElevationService>,
    providers: SiteProviders,
) -> SiteDataAggregator {
    SiteDataAggregator::new(sampler(elevation), providers, CALL_TIMEOUT)
}

pub(super) fn reference_aggregator(providers: SiteProviders) -> SiteDataAggregator {
    aggregator(Arc::new(CyclingElevation::new(&REFERENCE_READINGS)), providers)
}

pub(super) struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(
        &self,
        _report: &SiteReport,
        _image: Option<&SatelliteImage>,
    ) -> Result<RenderedDocument, RenderError> {
        Err(RenderError::Format("layout overflow".to_string()))
    }
}

pub(super) fn service_with(
    geocoder: Arc<dyn Geocoder>,
    aggregator: SiteDataAggregator,
) -> SiteAnalysisService {
    SiteAnalysisService::new(
        geocoder,
        aggregator,
        ReportAssembler::new(Arc::new(HtmlReportRenderer)),
        Some("Salt Lake City, Utah".to_string()),
    )
}

pub(super) fn reference_service() -> SiteAnalysisService {
    service_with(
        Arc::new(FixedGeocoder(SLC)),
        reference_aggregator(unavailable_providers()),
    )
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
