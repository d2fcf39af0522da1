//! Line-oriented terminal backend that prints the isometric board as text.

use std::{
    fmt::Write as _,
    io::{BufRead, Write},
};

use anyhow::{Context, Result as AnyResult};
use iso_tactics_core::{Faction, GridPosition};
use iso_tactics_rendering::{
    FrameInput, HighlightKind, Presentation, RenderingBackend, Scene, UnitPresentation,
};

use crate::keys::{self, KeyAction};

const CONTROLS: &str =
    "keys: wasd move | f/space/enter confirm | q/e cycle | v weapon | r restart | n new level | +/- size (new level) | l seed lock | x quit";

/// Reachable tiles filled at least this opaquely are drawn as close by.
const NEAR_FILL_ALPHA: f32 = 0.27;

/// Rendering backend reading key lines from `input` and drawing to `output`.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    input: R,
    output: W,
}

impl<R, W> TerminalBackend<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R, W> RenderingBackend for TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let mut scene = presentation.scene;
        writeln!(self.output, "== {} ==", presentation.window_title)
            .context("failed to write to terminal")?;

        loop {
            write!(self.output, "{}{CONTROLS}\n> ", render(&scene))
                .context("failed to write to terminal")?;
            self.output.flush().context("failed to flush terminal")?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read from terminal")?;
            if read == 0 {
                tracing::info!("input closed; leaving");
                return Ok(());
            }

            // Each key is decoded against the scene left by the previous one.
            for key in keys::presses(&line) {
                match keys::decode(key, &scene) {
                    Some(KeyAction::Command(command)) => update_scene(
                        FrameInput {
                            commands: vec![command],
                        },
                        &mut scene,
                    ),
                    Some(KeyAction::Quit) => return Ok(()),
                    None => {}
                }
            }
        }
    }
}

/// Maps pixel-space points of the projection onto the character grid.
///
/// One column of text is half a diamond wide and one line half a diamond
/// tall, so neighbouring tiles keep the isometric stagger.
#[derive(Clone, Copy, Debug)]
struct TextLayout {
    left: f32,
    top: f32,
    step_x: f32,
    step_y: f32,
}

impl TextLayout {
    fn new(scene: &Scene) -> Self {
        let (left, top) = scene
            .tiles
            .iter()
            .fold((f32::INFINITY, f32::INFINITY), |(left, top), tile| {
                (left.min(tile.center.x), top.min(tile.center.y))
            });
        Self {
            left,
            top,
            step_x: scene.board.iso_tile_width / 2.0,
            step_y: scene.board.iso_tile_height / 2.0,
        }
    }

    /// Character column and line of the glyph drawn for a diamond centre.
    fn slot(&self, x: f32, y: f32) -> (usize, usize) {
        let column = ((x - self.left) / self.step_x).round().max(0.0) as usize;
        let line = ((y - self.top) / self.step_y).round().max(0.0) as usize;
        (column * 2 + 1, line)
    }
}

/// Character buffer the board is drawn into.
struct Canvas {
    lines: Vec<Vec<char>>,
}

impl Canvas {
    fn new(columns: u32, rows: u32) -> Self {
        let diagonals = (columns + rows).saturating_sub(1) as usize;
        Self {
            lines: vec![vec![' '; diagonals * 2 + 1]; diagonals],
        }
    }

    fn put(&mut self, column: usize, line: usize, glyph: char) {
        if let Some(slot) = self
            .lines
            .get_mut(line)
            .and_then(|line| line.get_mut(column))
        {
            *slot = glyph;
        }
    }

    fn write_to(&self, text: &mut String) {
        for line in &self.lines {
            let line: String = line.iter().collect();
            let _ = writeln!(text, "{}", line.trim_end());
        }
    }
}

/// Draws the scene as text: banner and HUD, the board, then the roster.
///
/// Tiles are placed by their projected centres; the cursor is bracketed and
/// the selected unit is marked with angle brackets.
pub(crate) fn render(scene: &Scene) -> String {
    let mut text = String::new();

    for line in scene.banner.iter().flatten() {
        let _ = writeln!(text, "  {line}");
    }
    for line in &scene.hud_lines {
        let _ = writeln!(text, "{line}");
    }

    if !scene.tiles.is_empty() {
        let layout = TextLayout::new(scene);
        let mut canvas = Canvas::new(scene.board.columns, scene.board.rows);

        for tile in &scene.tiles {
            let (column, line) = layout.slot(tile.center.x, tile.center.y);
            let (open, close) = match scene.top_highlight(tile.cell) {
                Some(HighlightKind::Cursor) => ('[', ']'),
                Some(HighlightKind::SelectedUnit) => ('<', '>'),
                _ => (' ', ' '),
            };
            canvas.put(column - 1, line, open);
            canvas.put(column, line, terrain_glyph(scene, tile.cell));
            canvas.put(column + 1, line, close);
        }
        for unit in &scene.units {
            let (column, line) = layout.slot(unit.ground.x, unit.ground.y - layout.step_y);
            canvas.put(column, line, unit_glyph(unit));
        }

        canvas.write_to(&mut text);
    }

    for line in &scene.roster {
        let _ = writeln!(text, "{line}");
    }
    text
}

fn terrain_glyph(scene: &Scene, cell: GridPosition) -> char {
    let reachable = scene.highlights.iter().find(|highlight| {
        highlight.cell == cell && matches!(highlight.kind, HighlightKind::Reachable { .. })
    });
    match reachable {
        Some(highlight) if highlight.kind.style().fill.alpha >= NEAR_FILL_ALPHA => '+',
        Some(_) => ':',
        None => scene.tile(cell).map_or(' ', |tile| tile.tile.symbol()),
    }
}

fn unit_glyph(unit: &UnitPresentation) -> char {
    match (unit.faction, unit.exhausted) {
        (Faction::Player, false) => '@',
        (Faction::Player, true) => 'o',
        (Faction::Enemy, _) => '&',
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use iso_tactics_core::{Command, Direction, Level, LevelSettings, UnitId, WeaponId};
    use iso_tactics_rendering::{to_vec2, Color, Loadout, TileHighlight};

    use super::*;

    fn level() -> Level {
        Level::from_layout(&["#####", "#SPG#", "#####"], 48).expect("valid layout")
    }

    fn scene() -> Scene {
        Scene::from_level(&level(), LevelSettings::default())
    }

    fn presentation(scene: Scene) -> Presentation {
        Presentation::new("test", Color::new(0.0, 0.0, 0.0, 1.0), scene)
    }

    #[test]
    fn render_draws_the_board_isometrically() {
        let level = level();
        let mut scene = Scene::from_level(&level, LevelSettings::default());
        let unit_cell = GridPosition::new(2, 1);
        scene.units.push(UnitPresentation::new(
            UnitId::new("player-1"),
            Faction::Player,
            unit_cell,
            to_vec2(level.projection().cell_ground(unit_cell)),
            false,
        ));
        scene
            .highlights
            .push(TileHighlight::new(GridPosition::new(1, 1), HighlightKind::Cursor));
        scene.hud_lines.push("status".to_owned());

        let text = render(&scene);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "status",
                "     #",
                "   #   #",
                " #  [S]  #",
                "   #   @   #",
                "     #   G   #",
                "       #   #",
                "         #",
            ]
        );
    }

    #[test]
    fn reachable_tiles_fade_with_distance() {
        let mut scene = scene();
        for (cell, distance) in [(GridPosition::new(2, 1), 1), (GridPosition::new(3, 1), 4)] {
            scene.highlights.push(TileHighlight::new(
                cell,
                HighlightKind::Reachable {
                    distance,
                    max_distance: 4,
                },
            ));
        }

        assert_eq!(terrain_glyph(&scene, GridPosition::new(2, 1)), '+');
        assert_eq!(terrain_glyph(&scene, GridPosition::new(3, 1)), ':');
        assert_eq!(terrain_glyph(&scene, GridPosition::new(1, 1)), 'S');
    }

    #[test]
    fn run_feeds_decoded_keys_until_quit() {
        let input = "dd\n\nx\nw\n".as_bytes();
        let mut output = Vec::new();
        let backend = TerminalBackend::new(input, &mut output);
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);

        backend
            .run(
                presentation(scene()),
                move |input: FrameInput, _scene: &mut Scene| sink.borrow_mut().push(input.commands),
            )
            .expect("terminal session succeeds");

        let east = Command::MoveCursor {
            direction: Direction::East,
        };
        assert_eq!(
            *received.borrow(),
            vec![vec![east.clone()], vec![east], vec![Command::Confirm]],
            "the quit key and everything after it are not applied"
        );
    }

    #[test]
    fn repeated_keys_on_one_line_build_on_each_other() {
        let mut scene = scene();
        scene.loadout = Some(Loadout {
            unit: UnitId::new("player-1"),
            weapon: WeaponId::new("player-lance"),
        });
        let input = "++vv\n".as_bytes();
        let mut output = Vec::new();
        let backend = TerminalBackend::new(input, &mut output);
        let widths = Rc::new(RefCell::new(Vec::new()));
        let weapons = Rc::new(RefCell::new(Vec::new()));
        let (width_sink, weapon_sink) = (Rc::clone(&widths), Rc::clone(&weapons));

        backend
            .run(presentation(scene), move |input: FrameInput, scene: &mut Scene| {
                for command in input.commands {
                    match command {
                        Command::ApplySettings { settings } => {
                            width_sink.borrow_mut().push(settings.width());
                            scene.settings = settings;
                        }
                        Command::EquipWeapon { unit, weapon } => {
                            weapon_sink.borrow_mut().push(weapon.clone());
                            scene.loadout = Some(Loadout { unit, weapon });
                        }
                        _ => {}
                    }
                }
            })
            .expect("terminal session succeeds");

        assert_eq!(*widths.borrow(), vec![27, 29]);
        assert_eq!(
            *weapons.borrow(),
            vec![WeaponId::new("enemy-pistol"), WeaponId::new("player-lance")]
        );
    }
}
