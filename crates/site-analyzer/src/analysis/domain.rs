use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.latitude + d_lat, self.longitude + d_lng)
    }
}

/// Min/max/average over the elevation readings gathered for a site.
///
/// Always built from at least one finite reading, and `min <= avg <= max`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub samples: Vec<f64>,
}

impl ElevationSummary {
    /// Summarize readings in meters. Non-finite readings are discarded;
    /// returns `None` when nothing usable remains.
    pub fn from_samples(samples: Vec<f64>) -> Option<Self> {
        let samples: Vec<f64> = samples.into_iter().filter(|v| v.is_finite()).collect();
        if samples.is_empty() {
            return None;
        }

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;

        Some(Self {
            min,
            max,
            // Summation error can push the mean a hair outside the bounds.
            avg: mean.clamp(min, max),
            samples,
        })
    }

    /// One reading. Callers must pass a finite value.
    pub fn single(elevation_m: f64) -> Self {
        debug_assert!(elevation_m.is_finite(), "elevation must be finite");
        Self {
            min: elevation_m,
            max: elevation_m,
            avg: elevation_m,
            samples: vec![elevation_m],
        }
    }

    pub fn range_meters(&self) -> f64 {
        self.max - self.min
    }
}

/// Where the elevation summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ElevationSource {
    Grid { collected: usize, requested: usize },
    SinglePoint,
    Synthetic,
}

impl ElevationSource {
    pub fn label(self) -> String {
        match self {
            Self::Grid {
                collected,
                requested,
            } => format!("Grid sampling ({collected}/{requested} points)"),
            Self::SinglePoint => "Single-point fallback".to_string(),
            Self::Synthetic => "Synthetic default (elevation service unavailable)".to_string(),
        }
    }
}

/// Outcome of an optional provider call once it has settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ProviderResult<T> {
    Success(T),
    Unavailable,
}

impl<T> ProviderResult<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Unavailable => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Unavailable => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for ProviderResult<T> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(value) => Self::Success(value),
            Err(_) => Self::Unavailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelInfo {
    pub parcel_id: String,
    pub acreage: Option<f64>,
    pub zoning: Option<String>,
    pub boundary: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodInfo {
    pub zone: String,
    pub in_100_year_floodplain: bool,
    pub in_500_year_floodplain: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WetlandsInfo {
    pub present: bool,
    pub classification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilInfo {
    pub soil_type: String,
    pub drainage: String,
    pub bearing_capacity_psf: Option<u32>,
}

/// What the imagery provider drew on top of the returned map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ImageOverlay {
    ParcelBoundary { vertices: usize },
    CenterMarker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub overlay: ImageOverlay,
}

/// Everything gathered for one coordinate, before any analysis.
#[derive(Debug, Clone)]
pub struct RawSiteData {
    pub coordinate: Coordinate,
    pub elevation: ElevationSummary,
    pub elevation_source: ElevationSource,
    pub parcel: ProviderResult<ParcelInfo>,
    pub flood: ProviderResult<FloodInfo>,
    pub wetlands: ProviderResult<WetlandsInfo>,
    pub soil: ProviderResult<SoilInfo>,
    pub satellite_image: ProviderResult<SatelliteImage>,
}
