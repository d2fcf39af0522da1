#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Iso Tactics adapters.
//!
//! Backends receive a [`Presentation`] describing the isometric board in pixel
//! space and drive the simulation through the closure passed to
//! [`RenderingBackend::run`]. The contract never touches the world directly.

use anyhow::Result as AnyResult;
use glam::Vec2;
use iso_tactics_core::{
    Command, Faction, GridPosition, IsoProjection, Level, LevelSettings, PixelPoint, TileType,
    UnitId, WeaponId,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Logical commands decoded from the raw input of this frame, in order.
    pub commands: Vec<Command>,
}

/// Fill and outline pair used to draw a highlighted diamond.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightStyle {
    /// Translucent fill of the diamond.
    pub fill: Color,
    /// Outline traced around the diamond.
    pub outline: Color,
}

const SELECTED_STYLE: HighlightStyle = HighlightStyle {
    fill: Color::new(0.6, 0.85, 1.0, 0.4),
    outline: Color::new(0.9, 0.95, 1.0, 0.95),
};

/// Reason a tile is highlighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// Tile on which the player may deploy.
    PlayerSpawn,
    /// Tile on which the enemy squad deploys.
    EnemySpawn,
    /// Tile inside the selected unit's movement range.
    Reachable {
        /// Steps needed to reach the tile.
        distance: u32,
        /// Step budget of the preview.
        max_distance: u32,
    },
    /// Tile under the selected unit.
    SelectedUnit,
    /// Tile under the board cursor.
    Cursor,
}

impl HighlightKind {
    /// Colors used to draw the highlight.
    ///
    /// Reachable tiles fade as they approach the edge of the budget; the origin
    /// of a preview is drawn like the selected unit.
    #[must_use]
    pub fn style(self) -> HighlightStyle {
        match self {
            Self::PlayerSpawn => HighlightStyle {
                fill: Color::new(0.25, 0.55, 0.95, 0.15),
                outline: Color::new(0.5, 0.85, 1.0, 0.6),
            },
            Self::EnemySpawn => HighlightStyle {
                fill: Color::new(0.85, 0.35, 0.35, 0.18),
                outline: Color::new(0.95, 0.55, 0.45, 0.75),
            },
            Self::Reachable { distance: 0, .. } | Self::SelectedUnit => SELECTED_STYLE,
            Self::Reachable {
                distance,
                max_distance,
            } => {
                let intensity = if max_distance == 0 {
                    1.0
                } else {
                    1.0 - distance as f32 / max_distance as f32
                };
                HighlightStyle {
                    fill: Color::new(0.25, 0.85, 0.45, 0.22 + 0.12 * intensity),
                    outline: Color::new(0.35, 0.95, 0.45, 0.7),
                }
            }
            Self::Cursor => HighlightStyle {
                fill: Color::new(0.2, 0.6, 0.95, 0.35),
                outline: Color::new(0.85, 0.95, 1.0, 0.9),
            },
        }
    }
}

/// Highlight drawn over a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileHighlight {
    /// Highlighted cell.
    pub cell: GridPosition,
    /// Why the cell is highlighted.
    pub kind: HighlightKind,
}

impl TileHighlight {
    /// Creates a new highlight descriptor.
    #[must_use]
    pub const fn new(cell: GridPosition, kind: HighlightKind) -> Self {
        Self { cell, kind }
    }
}

/// Describes the isometric board geometry shared by every tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of columns contained in the board.
    pub columns: u32,
    /// Number of rows contained in the board.
    pub rows: u32,
    /// Width of a tile diamond in pixels.
    pub iso_tile_width: f32,
    /// Height of a tile diamond in pixels.
    pub iso_tile_height: f32,
}

impl BoardPresentation {
    /// Captures the geometry of the provided projection.
    #[must_use]
    pub fn from_projection(columns: u32, rows: u32, projection: &IsoProjection) -> Self {
        Self {
            columns,
            rows,
            iso_tile_width: projection.iso_tile_width(),
            iso_tile_height: projection.iso_tile_height(),
        }
    }
}

/// Immutable snapshot describing one board tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Cell the tile occupies.
    pub cell: GridPosition,
    /// Kind of terrain on the tile.
    pub tile: TileType,
    /// Centre of the tile diamond in pixels.
    pub center: Vec2,
}

impl TilePresentation {
    /// Creates a tile descriptor.
    #[must_use]
    pub const fn new(cell: GridPosition, tile: TileType, center: Vec2) -> Self {
        Self { cell, tile, center }
    }
}

/// Immutable snapshot describing a deployed unit.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitPresentation {
    /// Identifier of the unit.
    pub id: UnitId,
    /// Side the unit fights for.
    pub faction: Faction,
    /// Cell the unit stands on.
    pub cell: GridPosition,
    /// Point where the unit touches the ground, in pixels.
    pub ground: Vec2,
    /// Whether the unit already moved this turn; backends draw it dimmed.
    pub exhausted: bool,
}

impl UnitPresentation {
    /// Creates a unit descriptor.
    #[must_use]
    pub fn new(
        id: UnitId,
        faction: Faction,
        cell: GridPosition,
        ground: Vec2,
        exhausted: bool,
    ) -> Self {
        Self {
            id,
            faction,
            cell,
            ground,
            exhausted,
        }
    }
}

/// Weapon currently carried by the unit the HUD describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loadout {
    /// Unit the loadout belongs to.
    pub unit: UnitId,
    /// Weapon the unit carries.
    pub weapon: WeaponId,
}

/// Scene description combining the board, its highlights and inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Settings that produced the displayed level.
    pub settings: LevelSettings,
    /// Geometry of the isometric board.
    pub board: BoardPresentation,
    /// Tiles in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Highlights drawn over the tiles, bottom to top.
    pub highlights: Vec<TileHighlight>,
    /// Units drawn over the highlights.
    pub units: Vec<UnitPresentation>,
    /// Text lines drawn in the HUD band.
    pub hud_lines: Vec<String>,
    /// Modal briefing drawn above everything else, if present.
    pub banner: Option<Vec<String>>,
    /// Squad overview rows drawn beside the board.
    pub roster: Vec<String>,
    /// Loadout the weapon menu edits, if any unit is available.
    pub loadout: Option<Loadout>,
}

impl Scene {
    /// Creates a scene holding the level's tiles and nothing else.
    #[must_use]
    pub fn from_level(level: &Level, settings: LevelSettings) -> Self {
        let projection = level.projection();
        let tiles = level
            .cells()
            .map(|(cell, tile)| TilePresentation::new(cell, tile, to_vec2(projection.cell_center(cell))))
            .collect();

        Self {
            settings,
            board: BoardPresentation::from_projection(level.columns(), level.rows(), projection),
            tiles,
            highlights: Vec::new(),
            units: Vec::new(),
            hud_lines: Vec::new(),
            banner: None,
            roster: Vec::new(),
            loadout: None,
        }
    }

    /// Tile descriptor for the cell, if it lies on the board.
    #[must_use]
    pub fn tile(&self, cell: GridPosition) -> Option<&TilePresentation> {
        if cell.column() < 0 || cell.row() < 0 {
            return None;
        }
        let (column, row) = (cell.column() as u32, cell.row() as u32);
        if column >= self.board.columns || row >= self.board.rows {
            return None;
        }
        self.tiles.get((row * self.board.columns + column) as usize)
    }

    /// Topmost highlight drawn over the cell.
    #[must_use]
    pub fn top_highlight(&self, cell: GridPosition) -> Option<HighlightKind> {
        self.highlights
            .iter()
            .rev()
            .find(|highlight| highlight.cell == cell)
            .map(|highlight| highlight.kind)
    }

    /// Unit drawn on the cell, if any.
    #[must_use]
    pub fn unit(&self, cell: GridPosition) -> Option<&UnitPresentation> {
        self.units.iter().find(|unit| unit.cell == cell)
    }
}

/// Converts a projected point into a rendering vector.
#[must_use]
pub fn to_vec2(point: PixelPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Iso Tactics scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the commands decoded for
    /// the frame and rebuilds the scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}
