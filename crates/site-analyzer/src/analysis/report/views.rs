use serde::Serialize;

use crate::analysis::domain::{
    ElevationSource, ElevationSummary, FloodInfo, ImageOverlay, ParcelInfo, ProviderResult,
    SatelliteImage, SoilInfo, WetlandsInfo,
};

/// Shown wherever a provider could not supply a value.
pub const UNAVAILABLE: &str = "Data unavailable";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationSection {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sample_count: usize,
    pub samples: Vec<f64>,
    pub source: ElevationSource,
    pub source_label: String,
}

impl ElevationSection {
    pub fn new(summary: &ElevationSummary, source: ElevationSource) -> Self {
        Self {
            min: summary.min,
            max: summary.max,
            avg: summary.avg,
            sample_count: summary.samples.len(),
            samples: summary.samples.clone(),
            source,
            source_label: source.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelSection {
    pub available: bool,
    pub parcel_id: String,
    pub acreage: Option<f64>,
    pub zoning: String,
    pub boundary_vertices: usize,
}

impl From<&ProviderResult<ParcelInfo>> for ParcelSection {
    fn from(value: &ProviderResult<ParcelInfo>) -> Self {
        match value.as_option() {
            Some(parcel) => Self {
                available: true,
                parcel_id: parcel.parcel_id.clone(),
                acreage: parcel.acreage,
                zoning: parcel
                    .zoning
                    .clone()
                    .unwrap_or_else(|| "Not recorded".to_string()),
                boundary_vertices: parcel.boundary.len(),
            },
            None => Self {
                available: false,
                parcel_id: UNAVAILABLE.to_string(),
                acreage: None,
                zoning: UNAVAILABLE.to_string(),
                boundary_vertices: 0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodSection {
    pub available: bool,
    pub zone: String,
    pub in_100_year_floodplain: Option<bool>,
    pub in_500_year_floodplain: Option<bool>,
    pub summary: String,
}

impl From<&ProviderResult<FloodInfo>> for FloodSection {
    fn from(value: &ProviderResult<FloodInfo>) -> Self {
        match value.as_option() {
            Some(flood) => {
                let summary = if flood.in_100_year_floodplain {
                    "Inside the 100-year floodplain"
                } else if flood.in_500_year_floodplain {
                    "Inside the 500-year floodplain"
                } else {
                    "Outside mapped floodplains"
                };
                Self {
                    available: true,
                    zone: flood.zone.clone(),
                    in_100_year_floodplain: Some(flood.in_100_year_floodplain),
                    in_500_year_floodplain: Some(flood.in_500_year_floodplain),
                    summary: summary.to_string(),
                }
            }
            None => Self {
                available: false,
                zone: UNAVAILABLE.to_string(),
                in_100_year_floodplain: None,
                in_500_year_floodplain: None,
                summary: UNAVAILABLE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WetlandsSection {
    pub available: bool,
    pub present: Option<bool>,
    pub classification: String,
    pub summary: String,
}

impl From<&ProviderResult<WetlandsInfo>> for WetlandsSection {
    fn from(value: &ProviderResult<WetlandsInfo>) -> Self {
        match value.as_option() {
            Some(wetlands) => Self {
                available: true,
                present: Some(wetlands.present),
                classification: wetlands
                    .classification
                    .clone()
                    .unwrap_or_else(|| "Not classified".to_string()),
                summary: if wetlands.present {
                    "Mapped wetlands present on or adjacent to the site".to_string()
                } else {
                    "No mapped wetlands".to_string()
                },
            },
            None => Self {
                available: false,
                present: None,
                classification: UNAVAILABLE.to_string(),
                summary: UNAVAILABLE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilSection {
    pub available: bool,
    pub soil_type: String,
    pub drainage: String,
    pub bearing_capacity_psf: Option<u32>,
}

impl From<&ProviderResult<SoilInfo>> for SoilSection {
    fn from(value: &ProviderResult<SoilInfo>) -> Self {
        match value.as_option() {
            Some(soil) => Self {
                available: true,
                soil_type: soil.soil_type.clone(),
                drainage: soil.drainage.clone(),
                bearing_capacity_psf: soil.bearing_capacity_psf,
            },
            None => Self {
                available: false,
                soil_type: UNAVAILABLE.to_string(),
                drainage: UNAVAILABLE.to_string(),
                bearing_capacity_psf: None,
            },
        }
    }
}

/// Image metadata; the bytes themselves travel inside the rendered document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagerySection {
    pub available: bool,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<ImageOverlay>,
    pub byte_length: usize,
}

impl From<&ProviderResult<SatelliteImage>> for ImagerySection {
    fn from(value: &ProviderResult<SatelliteImage>) -> Self {
        match value.as_option() {
            Some(image) => Self {
                available: true,
                content_type: image.content_type.clone(),
                overlay: Some(image.overlay.clone()),
                byte_length: image.bytes.len(),
            },
            None => Self {
                available: false,
                content_type: UNAVAILABLE.to_string(),
                overlay: None,
                byte_length: 0,
            },
        }
    }
}

/// Rendered document carried in the JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedDocument {
    pub content_type: String,
    pub encoding: &'static str,
    pub data: String,
}
