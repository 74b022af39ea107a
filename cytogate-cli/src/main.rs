use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cytogate_events::{EventCache, EventSource, FileEventSource, ScaleKind};
use cytogate_gates::{
    FilePopulationCache, Gate, GateCatalogue, JsonGateCatalogue, MemoryPopulationCache,
    Population, PopulationCache, PopulationFilter,
};
use cytogate_plots::helpers::density_options_from_statistics;
use cytogate_plots::options::BasePlotOptions;
use cytogate_plots::{DensityPlot, DensityPlotOptions, InstrumentMode, Plot, RenderConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

type SampleFilter = PopulationFilter<FileEventSource, Box<dyn PopulationCache>>;

/// Cytogate - polygon gating and density plots for cytometry samples
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(name = "cytogate")]
#[command(about = "Gate cytometry samples and render density plots of the retained events")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the number of events each sample retains through a gate template
    Filter(PopulationArgs),
    /// Render a density plot of each sample's retained events to PNG
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct PopulationArgs {
    /// Directory holding `<sample>.csv` or `<sample>.json` event files
    #[arg(long, value_name = "DIR")]
    events: PathBuf,

    /// Gate catalogue JSON (template id -> ordered gates)
    #[arg(long, value_name = "FILE")]
    gates: PathBuf,

    /// Gate template applied to every sample
    #[arg(long, value_name = "ID")]
    template: String,

    /// Sample id(s) to process
    #[arg(long = "sample", value_name = "ID", required = true, num_args = 1..)]
    samples: Vec<String>,

    /// Directory for cached populations (in-memory only if not specified)
    #[arg(long, value_name = "DIR")]
    cache: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    population: PopulationArgs,

    /// Channel index on the x axis
    #[arg(long)]
    x: usize,

    /// Channel index on the y axis
    #[arg(long)]
    y: usize,

    /// X axis scale (linear or log)
    #[arg(long, default_value = "linear")]
    x_scale: ScaleKind,

    /// Y axis scale (linear or log)
    #[arg(long, default_value = "linear")]
    y_scale: ScaleKind,

    /// Plot width in pixels
    #[arg(long, default_value = "400")]
    width: u32,

    /// Plot height in pixels
    #[arg(long, default_value = "400")]
    height: u32,

    /// Draw cytof zero margins
    #[arg(long)]
    cytof: bool,

    /// Output directory for PNG files
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    out: PathBuf,
}

impl RenderArgs {
    fn instrument_mode(&self) -> InstrumentMode {
        if self.cytof {
            InstrumentMode::Cytof
        } else {
            InstrumentMode::Standard
        }
    }
}

/// Build the population filter and load the template's gates
fn setup(args: &PopulationArgs) -> Result<(SampleFilter, Vec<Gate>)> {
    let catalogue = JsonGateCatalogue::from_path(&args.gates)
        .with_context(|| format!("Failed to read gate catalogue {}", args.gates.display()))?;
    let gates = catalogue
        .gates_for_template(&args.template)
        .with_context(|| format!("Unknown gate template '{}'", args.template))?;
    info!("Template '{}': {} gate(s)", args.template, gates.len());

    let cache: Box<dyn PopulationCache> = match &args.cache {
        Some(dir) => {
            debug!("Population cache at {}", dir.display());
            Box::new(FilePopulationCache::new(dir))
        }
        None => Box::new(MemoryPopulationCache::new()),
    };
    let source = FileEventSource::new(&args.events, Arc::new(EventCache::new()));
    Ok((PopulationFilter::new(source, cache), gates))
}

/// `<sample>-<population fingerprint>-<render fingerprint>.png`
fn output_file_name(population: &Population, options: &DensityPlotOptions) -> String {
    format!(
        "{}-{}-{}.png",
        population.key.sample_id,
        population.key.fingerprint(),
        options.fingerprint()
    )
}

fn run_filter(args: &PopulationArgs) -> Result<bool> {
    let (filter, gates) = setup(args)?;

    let results: Vec<(&String, Result<Population>)> = args
        .samples
        .par_iter()
        .map(|sample| {
            let population = filter
                .population(sample, &gates)
                .with_context(|| format!("Failed to filter sample '{}'", sample));
            (sample, population)
        })
        .collect();

    let mut failed = false;
    for (sample, result) in results {
        match result {
            Ok(population) => println!(
                "{}\t{} events{}",
                sample,
                population.retained.len(),
                if population.from_cache { "\t(cached)" } else { "" }
            ),
            Err(e) => {
                eprintln!("{}: {:#}", sample, e);
                failed = true;
            }
        }
    }
    Ok(!failed)
}

fn render_sample(
    filter: &SampleFilter,
    gates: &[Gate],
    sample: &str,
    args: &RenderArgs,
) -> Result<PathBuf> {
    let population = filter.population(sample, gates)?;
    let loaded = filter.source().load(sample)?;
    population
        .retained
        .check_bounds(loaded.matrix.n_events())
        .context("Cached population does not match the sample's events")?;
    let points =
        loaded
            .matrix
            .xy_pairs(args.x, args.y, Some(population.retained.as_slice()))?;

    let options = density_options_from_statistics(
        &loaded.statistics,
        args.x,
        args.y,
        args.x_scale,
        args.y_scale,
    )?
    .base(
        BasePlotOptions::new()
            .width(args.width)
            .height(args.height)
            .title(sample)
            .build()?,
    )
    .instrument_mode(args.instrument_mode())
    .build()?;

    let pixels = DensityPlot::new().render(points, &options, &mut RenderConfig::default())?;
    let path = args.out.join(output_file_name(&population, &options));
    pixels.save_png(&path)?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

fn run_render(args: &RenderArgs) -> Result<bool> {
    let (filter, gates) = setup(&args.population)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let samples = &args.population.samples;
    let progress = ProgressBar::new(samples.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let results: Vec<(&String, Result<PathBuf>)> = samples
        .par_iter()
        .map(|sample| {
            let result = render_sample(&filter, &gates, sample, args)
                .with_context(|| format!("Failed to render sample '{}'", sample));
            progress.inc(1);
            (sample, result)
        })
        .collect();
    progress.finish_and_clear();

    let mut failed = false;
    for (sample, result) in results {
        match result {
            Ok(path) => println!("{}\t{}", sample, path.display()),
            Err(e) => {
                eprintln!("{}: {:#}", sample, e);
                failed = true;
            }
        }
    }
    Ok(!failed)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let start_time = Instant::now();
    let succeeded = match &cli.command {
        Command::Filter(args) => run_filter(args)?,
        Command::Render(args) => run_render(args)?,
    };
    info!("Finished in {:.2}s", start_time.elapsed().as_secs_f64());

    // Exit with error code if any sample failed
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
