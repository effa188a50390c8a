//! Address-driven site feasibility analysis.
//!
//! An address is geocoded, every site data source is queried concurrently,
//! the results are run through the analyzers and a report is assembled with
//! a rendered document attached. Only geocoding failures and render
//! failures abort an analysis; every other source degrades to a placeholder.

pub mod aggregator;
pub mod analyzer;
pub mod domain;
pub mod geocoder;
pub mod providers;
pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregator::{DynProvider, SiteDataAggregator, SiteProviders};
pub use domain::{
    Coordinate, ElevationSource, ElevationSummary, FloodInfo, ImageOverlay, ParcelInfo,
    ProviderResult, RawSiteData, SatelliteImage, SoilInfo, WetlandsInfo,
};
pub use geocoder::{GeocodeError, Geocoder, NominatimGeocoder};
pub use providers::{ProviderError, SiteDataProvider};
pub use report::{HtmlReportRenderer, ReportAssembler, SiteReport};
pub use router::analysis_router;
pub use service::{AnalysisError, SiteAnalysisService};
