use anyhow::{Context, Result};
use clap::Parser;
use queue_sim::{AgentView, SceneConfig, Simulation};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Runs a dwell-queue scene headless until every agent has left.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON scene description. The reference scene is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the agent speed draws.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop after this many ticks even if agents remain.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: usize,

    /// Log progress every this many ticks.
    #[arg(long, default_value_t = 1000)]
    report_every: usize,

    /// Write every tick's agents to stdout as JSON lines.
    #[arg(long)]
    emit: bool,
}

#[derive(Serialize)]
struct Frame {
    frame: usize,
    elapsed: f64,
    agents: Vec<AgentView>,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = Cli::parse();
    log::debug!("{args:#?}");

    let config = match &args.config {
        Some(file) => SceneConfig::from_file(file)
            .with_context(|| format!("failed to load scene from {file:?}"))?,
        None => SceneConfig::reference(),
    };

    let mut sim = config.build().context("failed to build simulation")?;
    sim.spawn_seeded(&config.spawn_attributes(), args.seed)
        .context("failed to spawn agents")?;
    log::info!(
        "simulating {} agents along a path of length {:.1}",
        sim.agents().len(),
        sim.path().length()
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    drive(&mut sim, &args, &mut out)?;
    out.flush().context("failed to flush output")?;

    if sim.is_finished() {
        log::info!(
            "all agents left after {} ticks ({} time units)",
            sim.frame(),
            sim.elapsed()
        );
    } else {
        log::warn!(
            "{} agents still in the scene after {} ticks",
            sim.agents().len(),
            sim.frame()
        );
    }
    Ok(())
}

fn drive(sim: &mut Simulation, args: &Cli, out: &mut impl Write) -> Result<()> {
    while !sim.is_finished() && sim.frame() < args.max_ticks {
        sim.step();

        if args.emit {
            let frame = Frame {
                frame: sim.frame(),
                elapsed: sim.elapsed(),
                agents: sim.views().collect(),
            };
            serde_json::to_writer(&mut *out, &frame).context("failed to write frame")?;
            writeln!(out).context("failed to write frame")?;
        }

        if args.report_every > 0 && sim.frame() % args.report_every == 0 {
            let waiting = sim.agents().iter().filter(|a| a.waiting()).count();
            log::info!(
                "tick {}: {} agents live, {} dwelling",
                sim.frame(),
                sim.agents().len(),
                waiting
            );
        }
    }
    Ok(())
}
