use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{info, warn};

use super::aggregator::{SiteDataAggregator, SiteProviders};
use super::analyzer::{
    assess_access, assess_utilities, classify_slope, estimate_earthwork, score_risk,
};
use super::geocoder::{GeocodeError, Geocoder, NominatimGeocoder};
use super::providers::{
    ArcGisFeatureClient, ArcGisFloodProvider, ArcGisParcelService, ArcGisWetlandsProvider,
    ElevationSampler, GoogleStaticMapService, OpenElevationClient, ParcelGis, ParcelProvider,
    StaticMapImagery, StaticSoilProvider,
};
use super::report::{
    HtmlReportRenderer, RenderError, ReportAssembler, SiteAssessments, SiteReport,
};
use crate::config::ProviderConfig;

/// Runs the whole pipeline for one address: geocode, aggregate, analyze and
/// assemble.
pub struct SiteAnalysisService {
    geocoder: Arc<dyn Geocoder>,
    aggregator: SiteDataAggregator,
    assembler: ReportAssembler,
    region: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("address must not be blank")]
    InvalidAddress,
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AnalysisError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::InvalidAddress => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::Geocode(GeocodeError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AnalysisError::Geocode(GeocodeError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            AnalysisError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl SiteAnalysisService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        aggregator: SiteDataAggregator,
        assembler: ReportAssembler,
        region: Option<String>,
    ) -> Self {
        Self {
            geocoder,
            aggregator,
            assembler,
            region,
        }
    }

    /// Wire the live adapters. Layers without a configured URL, and imagery
    /// without an API key, report `Unavailable` on every request.
    pub fn from_config(client: reqwest::Client, config: &ProviderConfig) -> Self {
        let layer = |url: &Option<String>| {
            url.as_ref()
                .map(|url| ArcGisFeatureClient::new(client.clone(), url.clone()))
        };

        let parcels: Arc<dyn ParcelGis> =
            Arc::new(ArcGisParcelService::new(layer(&config.parcel_service_url)));
        let maps = Arc::new(GoogleStaticMapService::new(
            client.clone(),
            config.imagery.base_url.clone(),
            config.imagery.api_key.clone(),
        ));

        let providers = SiteProviders {
            parcel: Arc::new(ParcelProvider::new(parcels.clone())),
            flood: Arc::new(ArcGisFloodProvider::new(layer(&config.flood_service_url))),
            wetlands: Arc::new(ArcGisWetlandsProvider::new(layer(
                &config.wetlands_service_url,
            ))),
            soil: Arc::new(StaticSoilProvider::default()),
            imagery: Arc::new(StaticMapImagery::new(parcels, maps, &config.imagery)),
        };

        let elevation = ElevationSampler::new(
            Arc::new(OpenElevationClient::new(
                client.clone(),
                config.elevation.base_url.clone(),
            )),
            &config.elevation,
            config.timeout,
        );

        Self::new(
            Arc::new(NominatimGeocoder::new(client, config.geocoder.clone())),
            SiteDataAggregator::new(elevation, providers, config.timeout),
            ReportAssembler::new(Arc::new(HtmlReportRenderer)),
            config.geocoder.region_qualifier.clone(),
        )
    }

    pub async fn analyze(&self, address: &str) -> Result<SiteReport, AnalysisError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AnalysisError::InvalidAddress);
        }

        info!(%address, "starting site analysis");
        let coordinate = self.geocoder.geocode(address).await.inspect_err(|err| {
            warn!(%address, error = %err, "geocoding failed");
        })?;
        info!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "address geocoded"
        );

        let raw = self.aggregator.aggregate(coordinate).await;

        let slope = classify_slope(&raw.elevation);
        let assessments = SiteAssessments {
            earthwork: estimate_earthwork(&raw.elevation),
            utilities: assess_utilities(&raw.parcel),
            access: assess_access(coordinate, self.region.as_deref()),
            risk: score_risk(&slope, &raw.flood, &raw.wetlands, &raw.soil, &raw.elevation),
            slope,
        };
        info!(
            classification = assessments.slope.classification_label,
            risk_score = assessments.risk.score.value(),
            "site analyzed"
        );

        let report = self.assembler.assemble(address, raw, assessments)?;
        info!(%address, "site report assembled");
        Ok(report)
    }
}
