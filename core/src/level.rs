//! Immutable board description and its isometric projection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GridPosition;

const ISO_HEIGHT_RATIO: f32 = 0.6;
const HUD_HEIGHT: f32 = 64.0;
const TOP_PADDING_TILES: f32 = 3.0;
const WALL_HEIGHT_TILES: f32 = 2.2;
const BOTTOM_PADDING_TILES: f32 = 6.0;
const HORIZONTAL_MARGIN_TILES: f32 = 2.0;

/// Kinds of terrain that may occupy a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Open ground.
    Floor,
    /// Impassable terrain.
    Wall,
    /// Cell where the guaranteed path begins.
    Start,
    /// Cell where the guaranteed path ends.
    Exit,
    /// Walkable cell marked as dangerous.
    Hazard,
    /// Walkable cell where player units may be deployed.
    PlayerSpawn,
    /// Walkable cell where enemy units are deployed.
    EnemySpawn,
}

impl TileType {
    /// Reports whether units are prevented from entering the tile.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Display colour associated with the tile.
    #[must_use]
    pub const fn color(self) -> TileColor {
        match self {
            Self::Floor => TileColor::new(0.18, 0.18, 0.2),
            Self::Wall => TileColor::new(0.09, 0.09, 0.1),
            Self::Start => TileColor::new(0.24, 0.32, 0.54),
            Self::Exit => TileColor::new(0.36, 0.75, 0.34),
            Self::Hazard => TileColor::new(0.83, 0.27, 0.27),
            Self::PlayerSpawn => TileColor::new(0.38, 0.58, 0.82),
            Self::EnemySpawn => TileColor::new(0.72, 0.32, 0.32),
        }
    }

    /// Single character used by text layouts.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::Start => 'S',
            Self::Exit => 'G',
            Self::Hazard => 'X',
            Self::PlayerSpawn => 'P',
            Self::EnemySpawn => 'E',
        }
    }

    /// Parses a layout character, treating unknown symbols as floor.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            '#' => Self::Wall,
            'S' => Self::Start,
            'G' => Self::Exit,
            'X' => Self::Hazard,
            'P' => Self::PlayerSpawn,
            'E' => Self::EnemySpawn,
            _ => Self::Floor,
        }
    }
}

/// Opaque RGB colour expressed with channels in the range 0.0..=1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileColor {
    red: f32,
    green: f32,
    blue: f32,
}

impl TileColor {
    /// Creates a colour from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Red channel intensity.
    #[must_use]
    pub const fn red(&self) -> f32 {
        self.red
    }

    /// Green channel intensity.
    #[must_use]
    pub const fn green(&self) -> f32 {
        self.green
    }

    /// Blue channel intensity.
    #[must_use]
    pub const fn blue(&self) -> f32 {
        self.blue
    }
}

/// Structural problems detected while assembling a [`Level`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The layout contains no cells.
    #[error("level layout is empty")]
    EmptyLayout,
    /// A layout row differs in length from the first row.
    #[error("layout row {row} has {actual} cells but {expected} were expected")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// The tile vector does not match the declared dimensions.
    #[error("expected {expected} tiles but received {actual}")]
    DimensionMismatch {
        /// Number of tiles implied by the dimensions.
        expected: usize,
        /// Number of tiles provided.
        actual: usize,
    },
    /// No start tile exists.
    #[error("level has no start tile")]
    MissingStart,
    /// No exit tile exists.
    #[error("level has no exit tile")]
    MissingExit,
    /// More than one start tile exists.
    #[error("level has more than one start tile")]
    DuplicateStart,
    /// More than one exit tile exists.
    #[error("level has more than one exit tile")]
    DuplicateExit,
}

/// Screen-space coordinate produced by the isometric projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
}

/// Maps board cells onto isometric screen coordinates.
///
/// The board is drawn as a diamond: moving one column steps right and down,
/// moving one row steps left and down. Origins leave room for a HUD band,
/// padding, and the extruded wall blocks above the first row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoProjection {
    iso_tile_width: f32,
    iso_tile_height: f32,
    origin_x: f32,
    origin_y: f32,
    pixel_width: u32,
    pixel_height: u32,
}

impl IsoProjection {
    /// Computes the projection for a board of the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tile_size: u32) -> Self {
        let iso_tile_width = tile_size as f32;
        let iso_tile_height = iso_tile_width * ISO_HEIGHT_RATIO;
        let half_width = iso_tile_width / 2.0;
        let half_height = iso_tile_height / 2.0;

        let last_column = columns.saturating_sub(1) as f32;
        let last_row = rows.saturating_sub(1) as f32;
        let min_center_x = -last_row * half_width;
        let max_center_x = last_column * half_width;
        let horizontal_margin = iso_tile_width * HORIZONTAL_MARGIN_TILES;
        let origin_x = horizontal_margin - min_center_x;
        let width_span = (max_center_x - min_center_x) + iso_tile_width;

        let origin_y = HUD_HEIGHT
            + iso_tile_height * TOP_PADDING_TILES
            + iso_tile_height * WALL_HEIGHT_TILES;
        let board_depth = (last_column + last_row) * half_height + iso_tile_height;

        Self {
            iso_tile_width,
            iso_tile_height,
            origin_x,
            origin_y,
            pixel_width: (width_span + horizontal_margin * 2.0).ceil() as u32,
            pixel_height: (origin_y + board_depth + iso_tile_height * BOTTOM_PADDING_TILES).ceil()
                as u32,
        }
    }

    /// Width of a single diamond in pixels.
    #[must_use]
    pub const fn iso_tile_width(&self) -> f32 {
        self.iso_tile_width
    }

    /// Height of a single diamond in pixels.
    #[must_use]
    pub const fn iso_tile_height(&self) -> f32 {
        self.iso_tile_height
    }

    /// Total canvas width required to draw the board.
    #[must_use]
    pub const fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    /// Total canvas height required to draw the board.
    #[must_use]
    pub const fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    /// Centre of the diamond occupied by the provided cell.
    #[must_use]
    pub fn cell_center(&self, position: GridPosition) -> PixelPoint {
        let column = position.column() as f32;
        let row = position.row() as f32;
        PixelPoint {
            x: self.origin_x + (column - row) * self.iso_tile_width / 2.0,
            y: self.origin_y + (column + row) * self.iso_tile_height / 2.0,
        }
    }

    /// Point where a unit standing on the cell touches the ground.
    #[must_use]
    pub fn cell_ground(&self, position: GridPosition) -> PixelPoint {
        let center = self.cell_center(position);
        PixelPoint {
            x: center.x,
            y: center.y + self.iso_tile_height / 2.0,
        }
    }
}

/// Immutable board produced by the level generator.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    columns: u32,
    rows: u32,
    tiles: Vec<TileType>,
    start: GridPosition,
    exit: GridPosition,
    player_spawns: Vec<GridPosition>,
    enemy_spawns: Vec<GridPosition>,
    tile_size: u32,
    projection: IsoProjection,
}

impl Level {
    /// Assembles a level from a row-major tile vector.
    ///
    /// Spawn tiles are collected in row-major scan order.
    pub fn from_tiles(
        columns: u32,
        rows: u32,
        tiles: Vec<TileType>,
        tile_size: u32,
    ) -> Result<Self, LevelError> {
        if columns == 0 || rows == 0 {
            return Err(LevelError::EmptyLayout);
        }

        let expected = columns as usize * rows as usize;
        if tiles.len() != expected {
            return Err(LevelError::DimensionMismatch {
                expected,
                actual: tiles.len(),
            });
        }

        let mut start = None;
        let mut exit = None;
        let mut player_spawns = Vec::new();
        let mut enemy_spawns = Vec::new();

        for (index, tile) in tiles.iter().enumerate() {
            let position = GridPosition::new(
                (index % columns as usize) as i32,
                (index / columns as usize) as i32,
            );
            match tile {
                TileType::Start => {
                    if start.replace(position).is_some() {
                        return Err(LevelError::DuplicateStart);
                    }
                }
                TileType::Exit => {
                    if exit.replace(position).is_some() {
                        return Err(LevelError::DuplicateExit);
                    }
                }
                TileType::PlayerSpawn => player_spawns.push(position),
                TileType::EnemySpawn => enemy_spawns.push(position),
                TileType::Floor | TileType::Wall | TileType::Hazard => {}
            }
        }

        let start = start.ok_or(LevelError::MissingStart)?;
        let exit = exit.ok_or(LevelError::MissingExit)?;

        Ok(Self {
            columns,
            rows,
            tiles,
            start,
            exit,
            player_spawns,
            enemy_spawns,
            tile_size,
            projection: IsoProjection::new(columns, rows, tile_size),
        })
    }

    /// Parses a level from text rows using [`TileType::symbol`] characters.
    pub fn from_layout<S>(layout: &[S], tile_size: u32) -> Result<Self, LevelError>
    where
        S: AsRef<str>,
    {
        let Some(first) = layout.first() else {
            return Err(LevelError::EmptyLayout);
        };
        let expected = first.as_ref().chars().count();
        let mut tiles = Vec::with_capacity(expected * layout.len());

        for (row, line) in layout.iter().enumerate() {
            let actual = line.as_ref().chars().count();
            if actual != expected {
                return Err(LevelError::RaggedRow {
                    row,
                    expected,
                    actual,
                });
            }
            tiles.extend(line.as_ref().chars().map(TileType::from_symbol));
        }

        Self::from_tiles(expected as u32, layout.len() as u32, tiles, tile_size)
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile before projection.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Cell where the guaranteed path begins.
    #[must_use]
    pub const fn start(&self) -> GridPosition {
        self.start
    }

    /// Cell where the guaranteed path ends.
    #[must_use]
    pub const fn exit(&self) -> GridPosition {
        self.exit
    }

    /// Player spawn tiles in row-major order.
    #[must_use]
    pub fn player_spawn_tiles(&self) -> &[GridPosition] {
        &self.player_spawns
    }

    /// Enemy spawn tiles in row-major order.
    #[must_use]
    pub fn enemy_spawn_tiles(&self) -> &[GridPosition] {
        &self.enemy_spawns
    }

    /// Isometric projection matching the board dimensions.
    #[must_use]
    pub const fn projection(&self) -> &IsoProjection {
        &self.projection
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub fn contains(&self, position: GridPosition) -> bool {
        self.index(position).is_some()
    }

    /// Tile at the provided cell; cells outside the board read as walls.
    #[must_use]
    pub fn tile_at(&self, position: GridPosition) -> TileType {
        self.index(position)
            .map_or(TileType::Wall, |index| self.tiles[index])
    }

    /// Reports whether units may stand on the cell.
    #[must_use]
    pub fn is_walkable(&self, position: GridPosition) -> bool {
        !self.tile_at(position).blocks_movement()
    }

    /// Iterator over every cell paired with its tile in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (GridPosition, TileType)> + '_ {
        let columns = self.columns as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            (
                GridPosition::new((index % columns) as i32, (index / columns) as i32),
                *tile,
            )
        })
    }

    /// Text rows using [`TileType::symbol`] characters.
    #[must_use]
    pub fn to_layout(&self) -> Vec<String> {
        self.tiles
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect()
    }

    fn index(&self, position: GridPosition) -> Option<usize> {
        let column = u32::try_from(position.column()).ok()?;
        let row = u32::try_from(position.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(row as usize * self.columns as usize + column as usize)
    }
}
