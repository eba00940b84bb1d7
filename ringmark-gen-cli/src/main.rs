use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use ringmark::codeset::{self, BitWidth, CodeSource};
use ringmark::config::{Sheet, TargetConfig};
use ringmark::layout::LayoutMode;
use ringmark::{necklace, Engine, Prepared};

mod render_pdf;
mod render_png;
mod render_svg;

/// Rotation-invariant coded target generator
#[derive(Parser)]
#[command(name = "ringmark-gen", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List supported ring widths and their code counts
    List,
    /// Print the canonical codes for one ring width
    Codes {
        /// Number of bits in the coded ring
        #[arg(long)]
        bits: u32,
        /// Only print the first N codes
        #[arg(long)]
        count: Option<usize>,
    },
    /// Print the page plan as JSON
    Plan {
        #[command(flatten)]
        target: TargetArgs,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Write the combined PDF and individual marker files
    Generate {
        #[command(flatten)]
        target: TargetArgs,
        /// Combined PDF path
        #[arg(long, default_value = "coded_markers.pdf")]
        output_pdf: PathBuf,
        /// Directory for individual marker files
        #[arg(long, default_value = "targets")]
        output_dir: PathBuf,
        /// Format of the individual marker files
        #[arg(long, value_enum, default_value_t = MarkerFormat::Svg)]
        marker_format: MarkerFormat,
        /// Resolution of PNG marker files
        #[arg(long, default_value = "300", value_parser = clap::value_parser!(u32).range(1..))]
        dpi: u32,
        /// Do not write the combined PDF
        #[arg(long)]
        skip_pdf: bool,
        /// Do not write individual marker files
        #[arg(long, alias = "skip-svgs")]
        skip_markers: bool,
    },
    /// Check every code set against the canonical-code rules
    Verify,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MarkerFormat {
    Svg,
    Png,
}

impl MarkerFormat {
    fn extension(self) -> &'static str {
        match self {
            MarkerFormat::Svg => "svg",
            MarkerFormat::Png => "png",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MarkerFormat::Svg => "SVG",
            MarkerFormat::Png => "PNG",
        }
    }
}

/// Target options. Flags override values from `--config`.
#[derive(Args)]
struct TargetArgs {
    /// TOML file with target settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Center dot radius in mm
    #[arg(long)]
    dot_radius: Option<f64>,
    /// Number of bits in the coded ring (4-16)
    #[arg(long)]
    bits: Option<u32>,
    /// Number of markers to generate
    #[arg(long)]
    markers: Option<usize>,
    /// Number of the first marker
    #[arg(long)]
    start: Option<u32>,
    /// Page margin in mm
    #[arg(long)]
    margin: Option<f64>,
    /// Gap between marker bounding circles in mm
    #[arg(long)]
    padding: Option<f64>,
    /// Calibration dot radius in mm
    #[arg(long)]
    cal_dot_radius: Option<f64>,
    /// Center distance of the calibration dots in mm
    #[arg(long)]
    cal_spacing: Option<f64>,
    /// Text printed under the calibration dots
    #[arg(long)]
    cal_label: Option<String>,
    /// Sheet: avery-6450, letter, a4, a3 or custom
    #[arg(long)]
    sheet: Option<Sheet>,
    /// Page width in mm (custom sheet)
    #[arg(long)]
    page_width: Option<f64>,
    /// Page height in mm (custom sheet)
    #[arg(long)]
    page_height: Option<f64>,
}

impl TargetArgs {
    fn resolve(self) -> Result<TargetConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                TargetConfig::from_toml_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => TargetConfig::default(),
        };

        if let Some(v) = self.dot_radius {
            config.dot_radius = v;
        }
        if let Some(v) = self.bits {
            config.bits = v;
        }
        if let Some(v) = self.markers {
            config.markers = v;
        }
        if let Some(v) = self.start {
            config.start_number = v;
        }
        if let Some(v) = self.margin {
            config.margin = v;
        }
        if let Some(v) = self.padding {
            config.padding = v;
        }
        if let Some(v) = self.cal_dot_radius {
            config.cal_dot_radius = v;
        }
        if let Some(v) = self.cal_spacing {
            config.cal_spacing = v;
        }
        if let Some(v) = self.cal_label {
            config.cal_label = v;
        }
        if let Some(v) = self.sheet {
            config.sheet = v;
        }
        if self.page_width.is_some() {
            config.page_width = self.page_width;
        }
        if self.page_height.is_some() {
            config.page_height = self.page_height;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let env = env_logger::Env::default().default_filter_or(level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let engine = Engine::new();

    match cli.command {
        Command::List => cmd_list(&engine),
        Command::Codes { bits, count } => cmd_codes(&engine, bits, count),
        Command::Plan { target, pretty } => cmd_plan(&engine, target, pretty),
        Command::Generate {
            target,
            output_pdf,
            output_dir,
            marker_format,
            dpi,
            skip_pdf,
            skip_markers,
        } => {
            let config = target.resolve()?;
            let prepared = engine.prepare(&config)?;
            if !skip_pdf {
                cmd_generate_pdf(&prepared, &output_pdf)?;
            }
            if !skip_markers {
                cmd_generate_markers(&prepared, &output_dir, marker_format, dpi)?;
            }
            Ok(())
        }
        Command::Verify => cmd_verify(&engine),
    }
}

fn cmd_list(engine: &Engine) -> Result<()> {
    println!("{:>5} {:>7}  {}", "Bits", "Codes", "Source");
    println!("{}", "-".repeat(24));
    for bits in BitWidth::all() {
        let set = engine.code_set_for(bits.get())?;
        println!("{:>5} {:>7}  {}", bits.get(), set.len(), set.source);
    }
    Ok(())
}

fn cmd_codes(engine: &Engine, bits: u32, count: Option<usize>) -> Result<()> {
    let set = engine.code_set_for(bits)?;
    let shown = count.unwrap_or(set.len()).min(set.len());
    let width = bits as usize;
    println!("{} bits, {} codes ({})", bits, set.len(), set.source);
    for (i, code) in set.codes.iter().take(shown).enumerate() {
        println!("{:>5} {:>6} {:0width$b}", i, code, code, width = width);
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct PlanReport<'a> {
    config: &'a TargetConfig,
    geometry: &'a ringmark::geometry::MarkerGeometry,
    layout: String,
    plan: &'a ringmark::layout::PagePlan,
    advisories: Vec<String>,
}

fn cmd_plan(engine: &Engine, target: TargetArgs, pretty: bool) -> Result<()> {
    let config = target.resolve()?;
    let prepared = engine.prepare(&config)?;
    let report = PlanReport {
        config: &prepared.config,
        geometry: &prepared.geometry,
        layout: layout_name(&prepared.mode),
        plan: &prepared.plan,
        advisories: prepared.advisories.iter().map(|a| a.to_string()).collect(),
    };
    let json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("serializing plan")?;
    println!("{json}");
    Ok(())
}

fn layout_name(mode: &LayoutMode) -> String {
    match mode {
        LayoutMode::FixedGrid(grid) => grid.name.clone(),
        LayoutMode::Grid(spec) => format!("grid {}", render_pdf::describe_page(spec.page)),
    }
}

fn cmd_generate_pdf(prepared: &Prepared, path: &Path) -> Result<()> {
    let path_str = path.to_string_lossy();
    match &prepared.mode {
        LayoutMode::FixedGrid(grid) => {
            render_pdf::write_sheet_pdf(prepared, &grid.name, &path_str)?;
            println!("Generated {} PDF: {}", grid.name, path.display());
        }
        LayoutMode::Grid(_) => {
            render_pdf::write_sheet_pdf(prepared, "Coded markers", &path_str)?;
            println!("Generated combined PDF: {}", path.display());
        }
    }
    Ok(())
}

fn cmd_generate_markers(
    prepared: &Prepared,
    output_dir: &Path,
    format: MarkerFormat,
    dpi: u32,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory '{}'", output_dir.display()))?;

    for marker in &prepared.assignments {
        let filename = format!("target_{}.{}", marker.number, format.extension());
        let path = output_dir.join(filename);
        match format {
            MarkerFormat::Svg => {
                render_svg::write_marker_svg(&prepared.geometry, marker.code, marker.number, &path)?
            }
            MarkerFormat::Png => {
                render_png::write_marker_png(&prepared.geometry, marker.code, dpi, &path)?
            }
        }
        log::debug!("wrote {}", path.display());
    }

    println!(
        "Generated {} individual {} files in: {}/",
        prepared.assignments.len(),
        format.label(),
        output_dir.display()
    );
    Ok(())
}

/// Rebuild every width and compare against the cached sets.
fn cmd_verify(engine: &Engine) -> Result<()> {
    let mut failures = 0;
    for bits in BitWidth::all() {
        let set = engine.code_set_for(bits.get())?;
        let generated = codeset::generate(bits);
        match verify_set(bits, &set.codes, set.source, &generated) {
            Ok(()) => println!(
                "PASS: {:>2} bits, {} codes ({})",
                bits.get(),
                set.len(),
                set.source
            ),
            Err(msg) => {
                failures += 1;
                println!("FAIL: {:>2} bits: {}", bits.get(), msg);
            }
        }
    }
    anyhow::ensure!(failures == 0, "{} bit width(s) failed verification", failures);
    Ok(())
}

fn verify_set(
    bits: BitWidth,
    codes: &[u32],
    source: CodeSource,
    generated: &[u32],
) -> Result<(), String> {
    let n = bits.get();
    if codes.is_empty() {
        return Err("empty code set".to_string());
    }
    for pair in codes.windows(2) {
        if pair[0] >= pair[1] {
            return Err(format!("codes not strictly ascending at {}", pair[1]));
        }
    }
    for &code in codes {
        if necklace::is_degenerate(code, n) {
            return Err(format!("degenerate code {code}"));
        }
        if !necklace::is_canonical(code, n) {
            return Err(format!(
                "code {code} is not canonical (expected {})",
                necklace::canonical(code, n)
            ));
        }
    }
    let expected = match source {
        CodeSource::Standard => generated.get(..codes.len()),
        CodeSource::Generated => Some(generated),
    };
    match expected {
        Some(expected) if expected == codes => Ok(()),
        _ => Err(format!(
            "{} codes differ from the {} regenerated codes",
            codes.len(),
            generated.len()
        )),
    }
}
