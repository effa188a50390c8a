use std::fmt::{self, Write as _};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::assembler::SiteReport;
use super::views::{EncodedDocument, UNAVAILABLE};
use crate::analysis::domain::SatelliteImage;

/// Turns a report into a serialized document.
pub trait DocumentRenderer: Send + Sync {
    fn render(
        &self,
        report: &SiteReport,
        image: Option<&SatelliteImage>,
    ) -> Result<RenderedDocument, RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn encode(&self) -> EncodedDocument {
        EncodedDocument {
            content_type: self.content_type.clone(),
            encoding: "base64",
            data: STANDARD.encode(&self.bytes),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to render report: {0}")]
    Format(String),
}

impl From<fmt::Error> for RenderError {
    fn from(value: fmt::Error) -> Self {
        Self::Format(value.to_string())
    }
}

const DISCLAIMER: &str = "Generated by Site Analyzer - For preliminary planning purposes only. \
This report should be verified with professional site surveys.";

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;color:#222;margin:0}\
.page{padding:0.8in 1in;min-height:9in;page-break-after:always;position:relative}\
.page:last-child{page-break-after:auto}\
h1{font-size:20pt;margin:0 0 12pt}h2{font-size:14pt;margin:18pt 0 6pt}\
td{padding:2pt 10pt 2pt 0;vertical-align:top}\
.unavailable{color:#888;font-style:italic}\
footer{position:absolute;bottom:0.4in;font-size:8pt;color:#666}\
img{max-width:100%}";

/// Paginated, print-ready HTML with the satellite image inlined.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReportRenderer;

impl DocumentRenderer for HtmlReportRenderer {
    fn render(
        &self,
        report: &SiteReport,
        image: Option<&SatelliteImage>,
    ) -> Result<RenderedDocument, RenderError> {
        let mut html = String::new();
        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(
            html,
            "<html><head><meta charset=\"utf-8\"><title>Site Analysis Report - {}</title><style>{}</style></head><body>",
            escape_html(&report.address),
            STYLE
        )?;

        summary_page(&mut html, report)?;
        terrain_page(&mut html, report)?;
        environment_page(&mut html, report)?;
        utilities_page(&mut html, report, image)?;

        writeln!(html, "</body></html>")?;

        Ok(RenderedDocument {
            content_type: mime::TEXT_HTML_UTF_8.to_string(),
            bytes: html.into_bytes(),
        })
    }
}

fn summary_page(html: &mut String, report: &SiteReport) -> fmt::Result {
    open_page(html, "Site Analysis Report")?;
    writeln!(html, "<table>")?;
    row(html, "Location", &report.address)?;
    row(
        html,
        "Coordinates",
        &format!(
            "{:.6}, {:.6}",
            report.coordinate.latitude, report.coordinate.longitude
        ),
    )?;
    row(
        html,
        "Generated",
        &report.generated_at.format("%B %d, %Y %H:%M UTC").to_string(),
    )?;
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Overall Risk</h2><table>")?;
    row(
        html,
        "Risk score",
        &format!("{} / 10 ({})", report.risk.score.value(), report.risk.level),
    )?;
    for component in &report.risk.components {
        row(
            html,
            component.factor.label(),
            &format!("{} pts - {}", component.points, component.notes),
        )?;
    }
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Access Assessment</h2>")?;
    writeln!(html, "<p>{}</p>", escape_html(&report.access.summary))?;
    close_page(html)
}

fn terrain_page(html: &mut String, report: &SiteReport) -> fmt::Result {
    let elevation = &report.elevation;
    let slope = &report.slope_analysis;
    let earthwork = &report.earthwork;

    open_page(html, "Terrain")?;
    writeln!(html, "<h2>Elevation Analysis</h2><table>")?;
    row(html, "Minimum Elevation", &format!("{:.1} meters", elevation.min))?;
    row(html, "Maximum Elevation", &format!("{:.1} meters", elevation.max))?;
    row(html, "Average Elevation", &format!("{:.1} meters", elevation.avg))?;
    row(
        html,
        "Elevation Change",
        &format!(
            "{:.1} meters ({:.1} feet)",
            slope.elevation_change_meters, slope.elevation_change_feet
        ),
    )?;
    row(html, "Data Source", &elevation.source_label)?;
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Slope Analysis</h2><table>")?;
    row(html, "Classification", slope.classification_label)?;
    row(html, "Buildability", slope.buildability_label)?;
    row(html, "Risk Level", slope.risk_level.label())?;
    row(
        html,
        "Grading Cost Factor",
        &format!("{:.1}x", slope.grading_cost_factor),
    )?;
    row(html, "Recommendation", slope.recommendation)?;
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Earthwork Estimate</h2><table>")?;
    row(
        html,
        "Estimated Volume",
        &format!("{:.0} cubic yards", earthwork.volume_cubic_yards),
    )?;
    row(html, "Grading", &currency(earthwork.grading_cost))?;
    row(html, "Hauling", &currency(earthwork.hauling_cost))?;
    row(html, "Compaction", &currency(earthwork.compaction_cost))?;
    row(
        html,
        "Total Range",
        &format!(
            "{} - {}",
            currency(earthwork.total_low),
            currency(earthwork.total_high)
        ),
    )?;
    writeln!(html, "</table>")?;
    close_page(html)
}

fn environment_page(html: &mut String, report: &SiteReport) -> fmt::Result {
    open_page(html, "Environmental & Parcel")?;

    writeln!(html, "<h2>Flood Zone</h2><table>")?;
    row(html, "FEMA Zone", &report.flood.zone)?;
    row(html, "Assessment", &report.flood.summary)?;
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Wetlands</h2><table>")?;
    row(html, "Status", &report.wetlands.summary)?;
    row(html, "Classification", &report.wetlands.classification)?;
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Soils</h2><table>")?;
    row(html, "Soil Type", &report.soil.soil_type)?;
    row(html, "Drainage", &report.soil.drainage)?;
    let bearing = report
        .soil
        .bearing_capacity_psf
        .map(|psf| format!("{psf} psf"))
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    row(html, "Bearing Capacity", &bearing)?;
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Parcel</h2><table>")?;
    row(html, "Parcel ID", &report.parcel.parcel_id)?;
    let acreage = report
        .parcel
        .acreage
        .map(|acres| format!("{acres:.2} acres"))
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    row(html, "Area", &acreage)?;
    row(html, "Zoning", &report.parcel.zoning)?;
    writeln!(html, "</table>")?;
    close_page(html)
}

fn utilities_page(
    html: &mut String,
    report: &SiteReport,
    image: Option<&SatelliteImage>,
) -> fmt::Result {
    open_page(html, "Utilities & Imagery")?;

    writeln!(html, "<h2>Utility Hookups</h2><table>")?;
    for utility in &report.utilities.utilities {
        row(
            html,
            utility.label,
            &format!(
                "{} - {} | {}",
                currency(utility.cost_low),
                currency(utility.cost_high),
                utility.availability
            ),
        )?;
    }
    row(
        html,
        "Total",
        &format!(
            "{} - {}",
            currency(report.utilities.total_low),
            currency(report.utilities.total_high)
        ),
    )?;
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Satellite Imagery</h2>")?;
    match image {
        Some(image) => writeln!(
            html,
            "<img alt=\"Satellite view of the site\" src=\"data:{};base64,{}\">",
            escape_html(&image.content_type),
            STANDARD.encode(&image.bytes)
        )?,
        None => writeln!(html, "<p class=\"unavailable\">{UNAVAILABLE}</p>")?,
    }
    close_page(html)
}

fn open_page(html: &mut String, title: &str) -> fmt::Result {
    writeln!(
        html,
        "<section class=\"page\"><h1>{}</h1>",
        escape_html(title)
    )
}

fn close_page(html: &mut String) -> fmt::Result {
    writeln!(html, "<footer>{}</footer></section>", escape_html(DISCLAIMER))
}

fn row(html: &mut String, label: &str, value: &str) -> fmt::Result {
    if value == UNAVAILABLE {
        writeln!(
            html,
            "<tr><td>{}</td><td class=\"unavailable\">{}</td></tr>",
            escape_html(label),
            UNAVAILABLE
        )
    } else {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(label),
            escape_html(value)
        )
    }
}

/// Whole dollars with thousands separators.
pub(crate) fn currency(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
