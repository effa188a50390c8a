use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::render::{DocumentRenderer, RenderError};
use super::views::{
    ElevationSection, EncodedDocument, FloodSection, ImagerySection, ParcelSection, SoilSection,
    WetlandsSection,
};
use crate::analysis::analyzer::{
    AccessAssessment, EarthworkEstimate, RiskAssessment, SlopeAssessment, UtilityAssessment,
};
use crate::analysis::domain::{Coordinate, RawSiteData, SatelliteImage};

/// Analyzer outputs for one site.
#[derive(Debug, Clone)]
pub struct SiteAssessments {
    pub slope: SlopeAssessment,
    pub earthwork: EarthworkEstimate,
    pub utilities: UtilityAssessment,
    pub access: AccessAssessment,
    pub risk: RiskAssessment,
}

/// Final analysis result returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub address: String,
    pub coordinate: Coordinate,
    pub generated_at: DateTime<Utc>,
    pub elevation: ElevationSection,
    pub parcel: ParcelSection,
    pub flood: FloodSection,
    pub wetlands: WetlandsSection,
    pub soil: SoilSection,
    pub satellite_image: ImagerySection,
    pub slope_analysis: SlopeAssessment,
    pub earthwork: EarthworkEstimate,
    pub utilities: UtilityAssessment,
    pub access: AccessAssessment,
    pub risk: RiskAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_document: Option<EncodedDocument>,
}

/// Merge raw data and assessments, replacing every unavailable provider
/// value with its placeholder. The image bytes are handed back separately
/// for the renderer.
pub fn merge(
    address: &str,
    raw: RawSiteData,
    assessments: SiteAssessments,
    generated_at: DateTime<Utc>,
) -> (SiteReport, Option<SatelliteImage>) {
    let SiteAssessments {
        slope,
        earthwork,
        utilities,
        access,
        risk,
    } = assessments;

    let report = SiteReport {
        address: address.trim().to_string(),
        coordinate: raw.coordinate,
        generated_at,
        elevation: ElevationSection::new(&raw.elevation, raw.elevation_source),
        parcel: ParcelSection::from(&raw.parcel),
        flood: FloodSection::from(&raw.flood),
        wetlands: WetlandsSection::from(&raw.wetlands),
        soil: SoilSection::from(&raw.soil),
        satellite_image: ImagerySection::from(&raw.satellite_image),
        slope_analysis: slope,
        earthwork,
        utilities,
        access,
        risk,
        report_document: None,
    };

    (report, raw.satellite_image.into_option())
}

/// Builds the [`SiteReport`] and attaches the rendered document.
#[derive(Clone)]
pub struct ReportAssembler {
    renderer: Arc<dyn DocumentRenderer>,
}

impl ReportAssembler {
    pub fn new(renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { renderer }
    }

    pub fn assemble(
        &self,
        address: &str,
        raw: RawSiteData,
        assessments: SiteAssessments,
    ) -> Result<SiteReport, RenderError> {
        let (mut report, image) = merge(address, raw, assessments, Utc::now());
        let document = self.renderer.render(&report, image.as_ref())?;
        report.report_document = Some(document.encode());
        Ok(report)
    }
}
