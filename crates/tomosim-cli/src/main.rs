//! tomosim CLI - parallel-beam tomography emulator
//!
//! Loads a scene, casts the full `N^4` probe set through it, and writes
//! the resulting loss tensor as text or JSON.

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tomosim_scan::{DetectorGrid, Execution, LossTensor, SceneConfig};

mod cli;
mod logger;

use cli::{Cli, Commands, OutputFormat, SceneArgs};
use logger::init_logger;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.into());

    match cli.command {
        Some(Commands::Run {
            scene,
            probe_model,
            serial,
            format,
            output,
        }) => {
            let mut config = load_scene(&scene)?;
            if let Some(model) = probe_model {
                config.probe_model = model.into();
            }
            let execution = if serial {
                Execution::Serial
            } else {
                Execution::Parallel
            };
            let losses = run_scene(&config, execution)?;
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    write_tensor(&losses, format, BufWriter::new(file))?;
                    info!("wrote {} losses to {}", losses.len(), path.display());
                }
                None => write_tensor(&losses, format, std::io::stdout().lock())?,
            }
        }
        Some(Commands::Info { scene }) => {
            show_info(&load_scene(&scene)?)?;
        }
        None => {
            // Default to the built-in scene printed as text
            let losses = run_scene(&SceneConfig::default(), Execution::Parallel)?;
            write_tensor(&losses, OutputFormat::Text, std::io::stdout().lock())?;
        }
    }

    Ok(())
}

fn load_scene(args: &SceneArgs) -> Result<SceneConfig> {
    let mut config = match &args.scene {
        Some(path) => read_scene(path)?,
        None => SceneConfig::default(),
    };
    if let Some(n) = args.resolution {
        config.resolution = n;
    }
    Ok(config)
}

fn read_scene(path: &Path) -> Result<SceneConfig> {
    SceneConfig::load(path).with_context(|| format!("failed to load scene {}", path.display()))
}

fn run_scene(config: &SceneConfig, execution: Execution) -> Result<LossTensor> {
    let simulator = config.build()?.with_execution(execution);
    info!(
        "scanning {} shapes on a {n}x{n} grid ({} probes)",
        simulator.shapes().len(),
        simulator.grid().segment_count(),
        n = config.resolution,
    );

    let start = std::time::Instant::now();
    let losses = simulator.compute_losses();
    info!(
        "done in {:.3}s: {} of {} probes attenuated, max loss {:.6}",
        start.elapsed().as_secs_f64(),
        losses.nonzero_count(),
        losses.len(),
        losses.max()
    );
    Ok(losses)
}

fn write_tensor(losses: &LossTensor, format: OutputFormat, mut out: impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", losses.len())?;
            for value in losses.as_slice() {
                writeln!(out, "{value}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, losses)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn show_info(config: &SceneConfig) -> Result<()> {
    let n = config.resolution;
    let bytes = DetectorGrid::estimated_tensor_bytes(n)
        .with_context(|| format!("resolution {n} is too large"))?;

    println!("Resolution:     {n}x{n} per plane");
    println!("Plane points:   {}", n.saturating_mul(n));
    println!("Probes:         {}", bytes / std::mem::size_of::<f64>());
    println!("Tensor memory:  {:.2} MiB", bytes as f64 / (1024.0 * 1024.0));
    println!("Probe model:    {:?}", config.probe_model);
    println!("Shapes:         {}", config.shapes.len());
    for (i, shape) in config.shapes.iter().enumerate() {
        println!("  [{i}] {shape:?}");
    }
    Ok(())
}
