//! Report assembly: placeholder substitution and document rendering.

mod assembler;
mod render;
mod views;

pub use assembler::{merge, ReportAssembler, SiteAssessments, SiteReport};
pub use render::{DocumentRenderer, HtmlReportRenderer, RenderError, RenderedDocument};
pub use views::{
    ElevationSection, EncodedDocument, FloodSection, ImagerySection, ParcelSection, SoilSection,
    WetlandsSection, UNAVAILABLE,
};
