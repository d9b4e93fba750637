#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for Motherboard Defense: fixture path queries,
//! layout transfer strings and scripted headless sessions.

mod config;
mod layout_transfer;
mod session;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use motherboard_defense_core::{CellCoord, WELCOME_BANNER};
use motherboard_defense_grid::GridEngine;

use crate::{config::SessionConfig, layout_transfer::ObstacleLayout, session::Session};

#[derive(Parser, Debug)]
#[command(name = "motherboard-defense", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Finds the shortest route through a row-encoded grid fixture.
    Path {
        /// Fixture file with one row of `0`/`1` characters per line.
        fixture: PathBuf,
        /// Source cell as `X,Y`; defaults to `0,0`.
        #[arg(long, value_parser = parse_cell)]
        from: Option<CellCoord>,
        /// Goal cell as `X,Y`; repeatable. Defaults to the last cell.
        #[arg(long = "to", value_parser = parse_cell)]
        goals: Vec<CellCoord>,
    },
    /// Runs a scripted session without a display.
    Simulate {
        /// TOML file with grid extents, spawn and step duration.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of ticks to advance after the placements.
        #[arg(long, default_value_t = 0)]
        ticks: u32,
        /// Obstacle to place as `X,Y`; repeatable.
        #[arg(long = "place", value_parser = parse_cell)]
        placements: Vec<CellCoord>,
        /// Obstacle to remove as `X,Y`; repeatable, applied after placements.
        #[arg(long = "remove", value_parser = parse_cell)]
        removals: Vec<CellCoord>,
    },
    /// Converts between fixtures and layout transfer strings.
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },
}

#[derive(Subcommand, Debug)]
enum LayoutAction {
    /// Prints the transfer string for a fixture file.
    Encode { fixture: PathBuf },
    /// Prints the fixture encoded by a transfer string.
    Decode { layout: String },
}

/// Entry point for the Motherboard Defense command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        CliCommand::Path {
            fixture,
            from,
            goals,
        } => run_path(fixture, from, goals),
        CliCommand::Simulate {
            config,
            ticks,
            placements,
            removals,
        } => run_simulation(config, ticks, &placements, &removals),
        CliCommand::Layout { action } => run_layout(action),
    }
}

fn load_fixture(path: &Path) -> Result<GridEngine> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))?;
    GridEngine::from_text(&contents)
        .with_context(|| format!("failed to parse fixture at {}", path.display()))
}

fn run_path(fixture: PathBuf, from: Option<CellCoord>, goals: Vec<CellCoord>) -> Result<()> {
    let grid = load_fixture(&fixture)?;
    let source = from.unwrap_or(CellCoord::new(0, 0));
    let goals = if goals.is_empty() {
        vec![bottom_right(&grid)?]
    } else {
        goals
    };

    match grid
        .find_path(source, &goals)
        .with_context(|| format!("cannot search from {source}"))?
    {
        Some(path) => {
            print!("{}", grid.render_with_path(&path)?);
            println!("{} cells, {} steps", path.len(), path.len() - 1);
        }
        None => println!("no path"),
    }
    Ok(())
}

fn run_simulation(
    config: Option<PathBuf>,
    ticks: u32,
    placements: &[CellCoord],
    removals: &[CellCoord],
) -> Result<()> {
    let config = match config {
        Some(path) => SessionConfig::load(&path)?,
        None => SessionConfig::default(),
    };
    println!("{WELCOME_BANNER}");

    let mut session = Session::new(&config)?;

    for &cell in placements {
        match session.place(cell) {
            Ok(()) => info!("placed obstacle at {cell}"),
            Err(reason) => warn!("obstacle at {cell} rejected: {reason:?}"),
        }
    }
    for &cell in removals {
        match session.remove(cell) {
            Ok(()) => info!("removed obstacle at {cell}"),
            Err(reason) => warn!("removal at {cell} rejected: {reason:?}"),
        }
    }

    let step = config.step_duration();
    for _ in 0..ticks {
        session.tick(step);
    }

    let agent = session.agent();
    print!("{}", session.render()?);
    println!(
        "agent at {} after {ticks} ticks ({} laps)",
        agent.cell,
        session.laps()
    );
    Ok(())
}

fn run_layout(action: LayoutAction) -> Result<()> {
    match action {
        LayoutAction::Encode { fixture } => {
            let grid = load_fixture(&fixture)?;
            println!("{}", ObstacleLayout::capture(&grid).encode()?);
        }
        LayoutAction::Decode { layout } => {
            let grid = ObstacleLayout::decode(&layout)
                .and_then(|layout| layout.restore())
                .context("failed to decode layout string")?;
            print!("{grid}");
        }
    }
    Ok(())
}

fn bottom_right(grid: &GridEngine) -> Result<CellCoord> {
    let x = grid.width().checked_sub(1).context("grid has no columns")?;
    let y = grid.length().checked_sub(1).context("grid has no rows")?;
    let (x, y) = (i32::try_from(x)?, i32::try_from(y)?);
    Ok(CellCoord::new(x, y))
}

fn parse_cell(value: &str) -> Result<CellCoord> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y but found `{value}`"))?;
    let x = x.trim().parse().with_context(|| format!("invalid x in `{value}`"))?;
    let y = y.trim().parse().with_context(|| format!("invalid y in `{value}`"))?;
    Ok(CellCoord::new(x, y))
}
