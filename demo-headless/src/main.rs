use std::fs;

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use culvert_core::sizing::TableSize;
use culvert_core::{
    calculate_culvert, climate_factor_presets, parse_readings, ClimateFactorConfig,
    CulvertSizingResult, DebrisAssessmentInput, MitigationStrategy, PipeShape, PlanningHorizon,
    SizingMethod, SizingRequest,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MethodArg {
    California,
    Hydraulic,
    Comparison,
}

impl From<MethodArg> for SizingMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::California => SizingMethod::California,
            MethodArg::Hydraulic => SizingMethod::Hydraulic,
            MethodArg::Comparison => SizingMethod::Comparison,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShapeArg {
    Circular,
    PipeArch,
    Box,
}

impl From<ShapeArg> for PipeShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Circular => PipeShape::Circular,
            ShapeArg::PipeArch => PipeShape::PipeArch,
            ShapeArg::Box => PipeShape::Box,
        }
    }
}

/// Forestry road culvert sizing from stream channel measurements
#[derive(Parser, Debug)]
#[command(name = "culvert-calc")]
#[command(about = "Size a forestry road culvert from field measurements", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// Channel top width readings in m (comma separated; blanks ignored)
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    top_widths: Vec<String>,

    /// Channel bottom width readings in m (estimated as 0.7 x top width if omitted)
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    bottom_widths: Vec<String>,

    /// Bankfull depth readings in m
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    depths: Vec<String>,

    /// Channel slope in percent
    #[arg(short, long)]
    slope_percent: Option<f64>,

    /// Sizing method
    #[arg(short, long, value_enum, default_value_t = MethodArg::California)]
    method: MethodArg,

    /// Culvert barrel shape
    #[arg(long, value_enum, default_value_t = ShapeArg::Circular)]
    shape: ShapeArg,

    /// Manning n of the stream channel
    #[arg(long, default_value_t = 0.035)]
    stream_n: f64,

    /// Manning n of the culvert barrel
    #[arg(long, default_value_t = 0.024)]
    pipe_n: f64,

    /// Allowed headwater over barrel rise
    #[arg(long, default_value_t = 1.5)]
    max_hw_d: f64,

    /// Climate planning horizon (present_2030, mid_2050, late_2080_coastal, late_2080_interior)
    #[arg(short, long)]
    climate: Option<String>,

    /// Site-specific climate multiplier (overrides the horizon preset, must be >= 1.0)
    #[arg(long)]
    climate_multiplier: Option<f64>,

    /// Debris red flag: evidence of past debris flows
    #[arg(long)]
    debris_flow_evidence: bool,

    /// Debris red flag: large woody debris upstream
    #[arg(long)]
    large_woody_debris: bool,

    /// Debris red flag: unstable banks
    #[arg(long)]
    unstable_banks: bool,

    /// Debris red flag: steep upstream gradient
    #[arg(long)]
    steep_upstream_gradient: bool,

    /// Debris red flag: recent harvesting, fire or landslides
    #[arg(long)]
    recent_disturbance: bool,

    /// Manage debris by scheduled cleanout instead of upsizing
    #[arg(long)]
    cleanout: bool,

    /// Crossing must pass fish
    #[arg(short, long)]
    fish_passage: bool,

    /// Read the whole request from a JSON file instead of the flags above
    #[arg(short, long)]
    request: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// List the climate presets and exit
    #[arg(long)]
    list_presets: bool,
}

impl Args {
    fn any_debris_flag(&self) -> bool {
        self.debris_flow_evidence
            || self.large_woody_debris
            || self.unstable_banks
            || self.steep_upstream_gradient
            || self.recent_disturbance
            || self.cleanout
    }

    fn to_request(&self) -> anyhow::Result<SizingRequest> {
        if let Some(path) = &self.request {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Cannot read request file '{path}'"))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("Malformed request file '{path}'"));
        }

        let mut request = SizingRequest::new(
            parse_readings(&self.top_widths),
            parse_readings(&self.depths),
        )
        .with_method(self.method.into())
        .with_shape(self.shape.into())
        .with_roughness(self.stream_n, self.pipe_n)
        .with_max_headwater_ratio(self.max_hw_d)
        .with_fish_passage(self.fish_passage);

        if !self.bottom_widths.is_empty() {
            request = request.with_bottom_widths(parse_readings(&self.bottom_widths));
        }
        if let Some(percent) = self.slope_percent {
            request = request.with_slope(percent / 100.0);
        }

        if self.climate.is_some() || self.climate_multiplier.is_some() {
            let horizon = match &self.climate {
                Some(key) => PlanningHorizon::from_key(key)
                    .ok_or_else(|| anyhow!("Unknown climate horizon '{key}'"))?,
                None => PlanningHorizon::default(),
            };
            let config = match self.climate_multiplier {
                Some(multiplier) => ClimateFactorConfig::with_multiplier(horizon, multiplier)
                    .context("Invalid climate multiplier")?,
                None => ClimateFactorConfig::from_preset(horizon),
            };
            request = request.with_climate(config);
        }

        if self.any_debris_flag() {
            request = request.with_debris(DebrisAssessmentInput {
                debris_flow_evidence: self.debris_flow_evidence,
                large_woody_debris: self.large_woody_debris,
                unstable_banks: self.unstable_banks,
                steep_upstream_gradient: self.steep_upstream_gradient,
                recent_disturbance: self.recent_disturbance,
                mitigation: if self.cleanout {
                    MitigationStrategy::Cleanout
                } else {
                    MitigationStrategy::Upsize
                },
            });
        }

        Ok(request)
    }
}

fn print_presets() {
    println!("=== Climate Presets ===\n");
    let presets = climate_factor_presets();
    for horizon in PlanningHorizon::ALL {
        if let Some(preset) = presets.get(&horizon) {
            println!(
                "{:<20} x{:.2}  {} - {}",
                horizon.key(),
                preset.factor,
                preset.label,
                preset.description
            );
        }
    }
}

fn print_report(result: &CulvertSizingResult) {
    println!("=== Culvert Sizing ===\n");

    let geometry = &result.geometry;
    println!(
        "Channel: top {}, bottom {}{}, depth {}",
        geometry.average_top_width,
        geometry.average_bottom_width,
        if geometry.bottom_width_estimated {
            " (estimated)"
        } else {
            ""
        },
        geometry.average_depth
    );
    println!("Bankfull area: {}", geometry.cross_sectional_area);

    println!("\n--- California Method ---");
    let table_size = match result.table_lookup.size {
        TableSize::Size(mm) => mm.to_string(),
        TableSize::BridgeRequired => "bridge required".to_string(),
    };
    println!("Table lookup: {} ({})", table_size, result.table_lookup.note);
    let coarse = &result.coarse_table;
    println!(
        "Coarse table: {} (width band {} mm, depth band {} mm)",
        coarse.size, coarse.width_band_mm, coarse.depth_band_mm
    );
    println!(
        "Required area: {} -> {}",
        result.california.base_area, result.california.base_size
    );
    for stage in &result.california.stages {
        println!(
            "  {:?} x{:.2}: {} -> {}",
            stage.kind, stage.multiplier, stage.area_after, stage.size
        );
    }
    if let Some(debris) = &result.debris {
        println!(
            "Debris hazard: {} ({} red flags). {}",
            debris.hazard_class.label(),
            debris.red_flag_count,
            debris.mitigation_strategy.guidance()
        );
    }

    if let Some(check) = &result.hydraulic {
        println!("\n--- Hydraulic Check ---");
        println!(
            "Slope {:.2}%: bankfull {}, design {}",
            check.slope * 100.0,
            check.channel.bankfull_discharge,
            check.channel.design_discharge
        );
        println!(
            "Hydraulic size: {} (capacity {}, HW/D {:.2})",
            check.sizing.size, check.sizing.capacity, check.sizing.headwater_ratio
        );
    }

    println!("\n--- Recommendation ---");
    println!(
        "{} ({:?} governs)",
        result.final_size, result.governing_method
    );
    if let Some(fish) = &result.fish_passage {
        println!("Fish passage: {}", fish.note);
    }
    if result.requires_engineering_review {
        println!("ENGINEERING REVIEW REQUIRED");
    }
    for warning in &result.warnings {
        println!("WARNING: {warning}");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list_presets {
        print_presets();
        return Ok(());
    }

    let request = args.to_request()?;
    debug!("Sizing request: {:?}", request);

    let result = calculate_culvert(&request).context("Cannot size culvert")?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Cannot serialize result")?;
        println!("{json}");
    } else {
        print_report(&result);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["culvert-calc", "-t", "2.0,2.1", "-d", "0.4"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_build_request() {
        let request = args(&["-s", "3", "-m", "comparison", "--cleanout"]).to_request().unwrap();
        assert_eq!(request.top_widths, vec![2.0, 2.1]);
        assert_eq!(request.slope, Some(0.03));
        assert_eq!(request.method, SizingMethod::Comparison);
        let debris = request.debris.unwrap();
        assert_eq!(debris.mitigation, MitigationStrategy::Cleanout);
    }

    #[test]
    fn test_errors_carry_context() {
        let error = args(&["--climate", "someday"]).to_request().unwrap_err();
        assert!(error.to_string().contains("someday"));

        let error = args(&["--climate-multiplier", "0.5"]).to_request().unwrap_err();
        assert_eq!(error.to_string(), "Invalid climate multiplier");
        assert!(error.root_cause().to_string().contains("multiplier"));

        let error = args(&["-r", "/nonexistent/request.json"]).to_request().unwrap_err();
        assert!(error.to_string().contains("Cannot read request file"));
    }
}
