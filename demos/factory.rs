//! Headless factory run.
//!
//! Run: cargo run --bin factory -- --seconds 30 --draw-every 125
//!
//! Set `RUST_LOG=debug` to follow every selection and event.

use std::path::PathBuf;

use clap::Parser;
use robofab_demos::{Stats, render, robot_lines};
use robofab_sim::{Factory, FactoryConfig, Layout};

#[derive(Parser)]
#[command(author, version, about = "Run the robot factory without a window", long_about = None)]
struct Args {
    /// Floor plan file (`.` floor, `#` wall, `P` producer, `C` consumer, `R` robot).
    /// Defaults to the built-in 15x11 demo floor.
    #[arg(short, long)]
    layout: Option<PathBuf>,
    /// JSON configuration file. Missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Simulated seconds to run.
    #[arg(short, long, default_value_t = 60)]
    seconds: u64,
    /// Tick length in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u32,
    /// Print the floor every N ticks; 0 prints only the final state.
    #[arg(long, default_value_t = 0)]
    draw_every: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let layout = match &args.layout {
        Some(path) => std::fs::read_to_string(path)?.parse()?,
        None => Layout::demo(),
    };
    let config: FactoryConfig = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => FactoryConfig::default(),
    };
    if args.tick_ms == 0 {
        return Err("--tick-ms must be > 0".into());
    }

    let mut factory = Factory::from_layout(&layout, config)?;
    let stats = Stats::new();
    let totals = stats.totals();
    factory.observe(Box::new(stats));

    if let Some(first) = factory.robots().first() {
        let origin = first.pos();
        let mut roster = factory.structures_by_distance(origin);
        let mut steps = 1;
        while roster.resume() {
            steps += 1;
        }
        let sorted = roster.sink_mut().take().unwrap_or_default();
        println!("machines nearest to {origin} ({steps} sort steps):");
        for t in sorted {
            if let Some(s) = factory.structure(t.id) {
                println!("  {} {} at {}", s.kind(), t.id, t.pos);
            }
        }
    }

    let ticks = args.seconds * 1000 / u64::from(args.tick_ms);
    for tick in 1..=ticks {
        factory.update(args.tick_ms);
        if args.draw_every > 0 && tick % args.draw_every == 0 {
            println!("\n-- {:.1}s --", factory.elapsed_ms() as f64 / 1000.0);
            println!("{}", render(&factory));
            for line in robot_lines(&factory) {
                println!("{line}");
            }
        }
    }

    println!("\n-- final, {:.1}s --", factory.elapsed_ms() as f64 / 1000.0);
    println!("{}", render(&factory));
    for line in robot_lines(&factory) {
        println!("{line}");
    }
    let t = totals.borrow();
    log::info!(
        "{} ticks: {} targets adopted, {} machines served, {} freed, {} re-picks",
        t.ticks,
        t.adopted,
        t.served,
        t.freed,
        t.released
    );
    Ok(())
}
