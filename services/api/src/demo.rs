use crate::infra::{build_site_service, offline_site_service, DEMO_ADDRESS};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::Args;
use site_analyzer::analysis::{SiteAnalysisService, SiteReport};
use site_analyzer::config::AppConfig;
use site_analyzer::error::AppError;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Street address to analyze
    pub(crate) address: String,
    /// Write the rendered report document to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the rendered report document to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_site_service(&config.providers)?;
    analyze_and_print(&service, &args.address, args.output, args.json).await
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Site analysis demo (offline fixtures)");
    let service = offline_site_service();
    analyze_and_print(&service, DEMO_ADDRESS, args.output, args.json).await
}

async fn analyze_and_print(
    service: &SiteAnalysisService,
    address: &str,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), AppError> {
    let report = service.analyze(address).await?;

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{}", body),
            Err(err) => println!("Report payload unavailable: {}", err),
        }
    } else {
        render_site_report(&report);
    }

    if let Some(path) = output {
        write_document(&report, &path)?;
        println!("\nReport document written to {}", path.display());
    }

    Ok(())
}

fn write_document(report: &SiteReport, path: &Path) -> Result<(), AppError> {
    let Some(document) = &report.report_document else {
        return Ok(());
    };
    let bytes = STANDARD.decode(&document.data).map_err(|err| {
        AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub(crate) fn render_site_report(report: &SiteReport) {
    println!("Site report for {}", report.address);
    println!(
        "Coordinates: {:.6}, {:.6} | generated {}",
        report.coordinate.latitude,
        report.coordinate.longitude,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    let elevation = &report.elevation;
    let slope = &report.slope_analysis;
    println!("\nTerrain");
    println!(
        "- Elevation {:.1} to {:.1} m (avg {:.1}) from {}",
        elevation.min, elevation.max, elevation.avg, elevation.source_label
    );
    println!(
        "- Change {:.2} m / {:.2} ft | {} | {}",
        slope.elevation_change_meters,
        slope.elevation_change_feet,
        slope.classification_label,
        slope.buildability_label
    );
    println!(
        "- Grading factor {:.1}x | {}",
        slope.grading_cost_factor, slope.recommendation
    );
    println!(
        "- Earthwork ${:.0} to ${:.0} ({:.0} cy)",
        report.earthwork.total_low, report.earthwork.total_high, report.earthwork.volume_cubic_yards
    );

    println!("\nEnvironment & parcel");
    println!("- Flood: {} ({})", report.flood.zone, report.flood.summary);
    println!("- Wetlands: {}", report.wetlands.summary);
    println!(
        "- Soil: {} | {}",
        report.soil.soil_type, report.soil.drainage
    );
    println!(
        "- Parcel: {} | zoning {}",
        report.parcel.parcel_id, report.parcel.zoning
    );
    println!(
        "- Imagery: {}",
        if report.satellite_image.available {
            "attached"
        } else {
            "unavailable"
        }
    );

    println!("\nUtilities");
    for utility in &report.utilities.utilities {
        println!(
            "- {}: ${:.0} to ${:.0}",
            utility.label, utility.cost_low, utility.cost_high
        );
    }
    println!(
        "- Total: ${:.0} to ${:.0}",
        report.utilities.total_low, report.utilities.total_high
    );

    println!("\nAccess: {}", report.access.summary);
    println!(
        "Risk score: {}/10 ({})",
        report.risk.score.value(),
        report.risk.level
    );
    for component in &report.risk.components {
        println!(
            "  - {}: {} ({})",
            component.factor.label(),
            component.points,
            component.notes
        );
    }
}
