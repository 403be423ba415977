use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use worldgen::{
    Cell, GeneratorConfig, Highlight, World, WorldGenError, generate_world, seeded_source,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First seed; run `n` uses `seed + n`
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 20)]
    count: u32,
    /// TOML generator config. Its seed is ignored.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reroll the dimensions of every run from its seed
    #[arg(long)]
    random_dimensions: bool,
    /// Render the last generated world
    #[arg(long)]
    show: bool,
    /// Write the last generated world's tile template as JSON
    #[arg(long)]
    export: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Default)]
struct Totals {
    worlds: u32,
    placement_failures: u32,
    connected_floors: usize,
    disconnected_floors: usize,
    direct_lines: u32,
    abandoned_legs: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let base = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            GeneratorConfig::from_toml_str(&source)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };

    info!(seed = args.seed, count = args.count, "starting soak run");
    let mut totals = Totals::default();
    let mut last_world = None;

    for run in 0..args.count {
        let seed = args.seed.wrapping_add(u64::from(run));
        let mut config = GeneratorConfig { seed, run_connectivity_check: true, ..base.clone() };
        if args.random_dimensions {
            config = config.with_random_dimensions(&mut seeded_source(seed));
        }

        let world = match generate_world(config.clone()) {
            Ok(world) => world,
            Err(error @ WorldGenError::PlacementExhausted { .. }) => {
                warn!(seed, %error, "placement exhausted, skipping seed");
                totals.placement_failures += 1;
                continue;
            }
            Err(error) => {
                return Err(error).with_context(|| format!("Generation failed for seed {seed}"));
            }
        };

        record(&mut totals, &world);
        print_summary(seed, &config, &world);
        last_world = Some(world);
    }

    println!("Soak complete.");
    println!("Worlds: {} ({} placement failures)", totals.worlds, totals.placement_failures);
    println!(
        "Floors: {} connected, {} disconnected",
        totals.connected_floors, totals.disconnected_floors
    );
    println!(
        "Carve fallbacks: {} direct lines, {} abandoned legs",
        totals.direct_lines, totals.abandoned_legs
    );

    if let Some(world) = &last_world {
        if args.show {
            print!("{}", render_world(world));
        }
        if let Some(path) = &args.export {
            let template = world.template().context("Failed to build tile template")?;
            let json = serde_json::to_string_pretty(&template)
                .context("Failed to serialize tile template")?;
            fs::write(path, json)
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;
            println!("Exported last world to {}", path.display());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn record(totals: &mut Totals, world: &World) {
    totals.worlds += 1;
    totals.direct_lines += world.diagnostics.direct_lines;
    totals.abandoned_legs += world.diagnostics.abandoned_legs;
    if let Some(report) = &world.report {
        totals.connected_floors += report.connected_count();
        totals.disconnected_floors += report.disconnected_floors().len();
    }
}

fn print_summary(seed: u64, config: &GeneratorConfig, world: &World) {
    let (connected, floors) = world
        .report
        .as_ref()
        .map_or((0, 0), |report| (report.connected_count(), report.floors.len()));
    println!(
        "seed {seed:>6}  {}x{}x{}  {connected}/{floors} floors connected  legs {} retries {} \
         fallbacks {}  hash {:016x}",
        config.dim_x,
        config.dim_y,
        config.floor_count(),
        world.diagnostics.legs,
        world.diagnostics.retries,
        world.diagnostics.fallback_count(),
        world.fingerprint(),
    );
}

fn render_world(world: &World) -> String {
    let mut out = String::new();
    for z in world.grid.floors() {
        out.push_str(&format!("\nFloor {z}\n"));
        let Ok(rows) = world.grid.floor_rows(z) else {
            continue;
        };
        for row in rows {
            for cell in row {
                out.push_str(&render_cell(*cell));
            }
            out.push('\n');
        }
    }
    out
}

fn render_cell(cell: Cell) -> String {
    let symbol = cell.kind.symbol();
    let Some(highlight) = cell.highlight else {
        return symbol.to_string();
    };
    let colour = match highlight {
        Highlight::Entry => "1;32",
        Highlight::Exit => "1;31",
        Highlight::Ascent => "1;33",
        Highlight::Descent => "1;35",
        Highlight::Corridor => "34",
        Highlight::Route => "1;36",
    };
    format!("\x1b[{colour}m{symbol}\x1b[0m")
}
