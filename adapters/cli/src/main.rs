#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Iso Tactics battles in the terminal.

mod autoplay;
mod config;
mod keys;
mod scene;
mod terminal;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use iso_tactics_core::Event;
use iso_tactics_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use iso_tactics_system_hud::Hud;
use iso_tactics_world::{self as world, World};
use tracing_subscriber::EnvFilter;

use crate::{config::SettingsLayer, terminal::TerminalBackend};

const WINDOW_TITLE: &str = "Isometric Hazard Run";
const CLEAR_COLOR: Color = Color::new(0.08, 0.08, 0.1, 1.0);

/// Turn-based tactics on a procedurally generated isometric arena.
#[derive(Debug, Parser)]
#[command(name = "iso-tactics", version)]
struct Args {
    /// TOML file providing level settings; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in tiles (odd, at least 5).
    #[arg(long)]
    width: Option<i32>,

    /// Board height in tiles (odd, at least 5).
    #[arg(long)]
    height: Option<i32>,

    /// Tile edge length in pixels.
    #[arg(long)]
    tile_size: Option<i32>,

    /// Share of floor tiles turned into hazards.
    #[arg(long)]
    hazard: Option<f32>,

    /// Level seed; providing one locks it across regenerations.
    #[arg(long)]
    seed: Option<u64>,

    /// Plays the given number of turns with random moves, then prints the board.
    #[arg(long, value_name = "TURNS")]
    autoplay: Option<u32>,
}

impl Args {
    fn settings_layer(&self) -> SettingsLayer {
        SettingsLayer {
            width: self.width,
            height: self.height,
            tile_size: self.tile_size,
            hazard: self.hazard,
            seed: self.seed,
        }
    }
}

/// Entry point for the Iso Tactics command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let file = match &args.config {
        Some(path) => config::load(path)?,
        None => SettingsLayer::default(),
    };
    let settings = config::resolve(&file, &args.settings_layer(), rand::random());
    tracing::info!(?settings, "starting Iso Tactics");

    let mut world = World::new(settings).context("failed to generate the opening level")?;
    let hud = Hud;

    if let Some(turns) = args.autoplay {
        let events = autoplay::run(&mut world, turns);
        let mut stdout = io::stdout().lock();
        for event in &events {
            writeln!(stdout, "{}", describe(event)).context("failed to write to stdout")?;
        }
        let board = terminal::render(&scene::build(&world, &hud));
        write!(stdout, "{board}").context("failed to write to stdout")?;
        return Ok(());
    }

    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene::build(&world, &hud));
    let backend = TerminalBackend::new(io::stdin().lock(), io::stdout());
    backend.run(presentation, move |input: FrameInput, frame: &mut Scene| {
        let mut events = Vec::new();
        for command in input.commands {
            world::apply(&mut world, command, &mut events);
        }
        for event in &events {
            tracing::debug!(event = %describe(event), "world event");
        }
        *frame = scene::build(&world, &hud);
    })
}

/// One-line log description of a world event.
fn describe(event: &Event) -> String {
    match event {
        Event::LevelGenerated {
            seed,
            columns,
            rows,
        } => format!("level {columns}x{rows} generated from seed {seed}"),
        Event::UnitMoved { unit, from, to } => format!(
            "{unit} moved ({},{}) -> ({},{})",
            from.column(),
            from.row(),
            to.column(),
            to.row()
        ),
        Event::EnemyMoved { unit, from, to } => format!(
            "{unit} advanced ({},{}) -> ({},{})",
            from.column(),
            from.row(),
            to.column(),
            to.row()
        ),
        Event::EnemyHeld { unit, .. } => format!("{unit} held position"),
        Event::TurnAdvanced { turn } => format!("turn {turn} begins"),
        Event::SeedLockChanged { seed, locked } => {
            format!("seed {seed} {}", if *locked { "locked" } else { "unlocked" })
        }
        other => format!("{other:?}"),
    }
}
