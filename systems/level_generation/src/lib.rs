#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded procedural generator for battle arenas.
//!
//! Every level is enclosed by a wall border and contains a walkway: a
//! monotone path carved from the start cell to the exit cell before any
//! obstacle is placed. Obstacle clusters, pillars and hazards are only ever
//! written onto cells outside the walkway, so the exit stays reachable no
//! matter what the random stream produces. The same seed and dimensions always
//! yield the same level.

use iso_tactics_core::{GridPosition, Level, LevelError, LevelSettings, TileType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

const MIN_DIMENSION: u32 = 5;
const MAX_DIMENSION: u32 = 255;
const SPAWN_SPAN: i32 = 2;
const CLUSTER_EXTENT: std::ops::RangeInclusive<i32> = 2..=4;
const MIN_CLUSTERS: i32 = 3;
const CELLS_PER_CLUSTER: i32 = 150;
const MIN_PILLARS: i32 = 5;
const CELLS_PER_PILLAR: i32 = 120;

/// Configuration problems reported by the generator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The guided path and spawn blocks require odd board dimensions.
    #[error("level dimensions must be odd, received {width}x{height}")]
    EvenDimensions {
        /// Requested board width.
        width: u32,
        /// Requested board height.
        height: u32,
    },
    /// The board has no room for an interior.
    #[error("level dimensions must be at least 5, received {width}x{height}")]
    TooSmall {
        /// Requested board width.
        width: u32,
        /// Requested board height.
        height: u32,
    },
    /// The board exceeds the largest supported arena.
    #[error("level dimensions must be at most 255, received {width}x{height}")]
    TooLarge {
        /// Requested board width.
        width: u32,
        /// Requested board height.
        height: u32,
    },
    /// The generated tiles failed structural validation.
    #[error("generated level is malformed: {0}")]
    Level(#[from] LevelError),
}

/// Validated generation request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelGenerator {
    width: u32,
    height: u32,
    tile_size: u32,
    hazard_chance: f32,
    seed: u64,
}

impl LevelGenerator {
    /// Validates the requested dimensions.
    pub fn new(
        width: u32,
        height: u32,
        tile_size: u32,
        hazard_chance: f32,
        seed: u64,
    ) -> Result<Self, GenerationError> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(GenerationError::EvenDimensions { width, height });
        }
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(GenerationError::TooSmall { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GenerationError::TooLarge { width, height });
        }

        Ok(Self {
            width,
            height,
            tile_size,
            hazard_chance,
            seed,
        })
    }

    /// Builds a generator from self-correcting level settings.
    pub fn from_settings(settings: &LevelSettings) -> Result<Self, GenerationError> {
        Self::new(
            settings.width(),
            settings.height(),
            settings.tile_size(),
            settings.hazard_density(),
            settings.seed(),
        )
    }

    /// Seed driving the random stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Produces the level described by this request.
    pub fn generate(&self) -> Result<Level, GenerationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut canvas = Canvas::enclosed(self.width as i32, self.height as i32);

        let start = GridPosition::new(1, (canvas.height / 2).max(1));
        let exit = GridPosition::new(canvas.width - 2, rng.gen_range(1..canvas.height - 1));

        canvas.carve_guided_path(&mut rng, start, exit);
        canvas.scatter_clusters(&mut rng);
        canvas.scatter_pillars(&mut rng);
        canvas.sprinkle_hazards(&mut rng, self.hazard_chance);
        canvas.stamp_spawn_block(start, SpawnSide::AfterAnchor, TileType::PlayerSpawn);
        canvas.stamp_spawn_block(exit, SpawnSide::BeforeAnchor, TileType::EnemySpawn);
        canvas.set(start, TileType::Start);
        canvas.set(exit, TileType::Exit);

        let level = Level::from_tiles(self.width, self.height, canvas.tiles, self.tile_size)?;

        tracing::debug!(
            seed = self.seed,
            columns = self.width,
            rows = self.height,
            player_spawns = level.player_spawn_tiles().len(),
            enemy_spawns = level.enemy_spawn_tiles().len(),
            "generated level"
        );

        Ok(level)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpawnSide {
    AfterAnchor,
    BeforeAnchor,
}

/// Mutable tile buffer plus the walkway mask protecting the guided path.
#[derive(Debug)]
struct Canvas {
    width: i32,
    height: i32,
    tiles: Vec<TileType>,
    walkway: Vec<bool>,
}

impl Canvas {
    fn enclosed(width: i32, height: i32) -> Self {
        let cell_count = (width * height) as usize;
        let mut canvas = Self {
            width,
            height,
            tiles: vec![TileType::Floor; cell_count],
            walkway: vec![false; cell_count],
        };

        for row in 0..height {
            for column in 0..width {
                let cell = GridPosition::new(column, row);
                if !canvas.is_interior(cell) {
                    canvas.set(cell, TileType::Wall);
                }
            }
        }

        canvas
    }

    fn carve_guided_path(&mut self, rng: &mut ChaCha8Rng, start: GridPosition, exit: GridPosition) {
        let mut current = start;
        self.mark_walkway(current);

        while current != exit {
            let coin = rng.gen_bool(0.5);
            let horizontal = if current.column() == exit.column() {
                false
            } else if current.row() == exit.row() {
                true
            } else {
                coin
            };

            current = if horizontal {
                GridPosition::new(
                    current.column() + (exit.column() - current.column()).signum(),
                    current.row(),
                )
            } else {
                GridPosition::new(
                    current.column(),
                    current.row() + (exit.row() - current.row()).signum(),
                )
            };

            if !self.is_interior(current) {
                break;
            }
            self.mark_walkway(current);
        }
    }

    fn scatter_clusters(&mut self, rng: &mut ChaCha8Rng) {
        let count = MIN_CLUSTERS.max(self.width * self.height / CELLS_PER_CLUSTER);

        for _ in 0..count {
            let cluster_width = rng.gen_range(CLUSTER_EXTENT).min(self.width - 2);
            let cluster_height = rng.gen_range(CLUSTER_EXTENT).min(self.height - 2);
            let left = rng.gen_range(1..=self.width - 1 - cluster_width);
            let top = rng.gen_range(1..=self.height - 1 - cluster_height);

            for row in top..top + cluster_height {
                for column in left..left + cluster_width {
                    self.wall_unless_walkway(GridPosition::new(column, row));
                }
            }
        }
    }

    fn scatter_pillars(&mut self, rng: &mut ChaCha8Rng) {
        let count = MIN_PILLARS.max(self.width * self.height / CELLS_PER_PILLAR);

        for _ in 0..count {
            let column = rng.gen_range(1..self.width - 1);
            let row = rng.gen_range(1..self.height - 1);
            self.wall_unless_walkway(GridPosition::new(column, row));
        }
    }

    fn sprinkle_hazards(&mut self, rng: &mut ChaCha8Rng, hazard_chance: f32) {
        for row in 1..self.height - 1 {
            for column in 1..self.width - 1 {
                let cell = GridPosition::new(column, row);
                if self.is_walkway(cell) || self.get(cell) != TileType::Floor {
                    continue;
                }
                if rng.gen::<f32>() < hazard_chance {
                    self.set(cell, TileType::Hazard);
                }
            }
        }
    }

    fn stamp_spawn_block(&mut self, anchor: GridPosition, side: SpawnSide, tile: TileType) {
        let desired_column = match side {
            SpawnSide::AfterAnchor => anchor.column() + 1,
            SpawnSide::BeforeAnchor => anchor.column() - SPAWN_SPAN,
        };
        let left = clamp_interior(desired_column, self.width);
        let top = clamp_interior(anchor.row() - 1, self.height);

        for row in top..top + SPAWN_SPAN {
            for column in left..left + SPAWN_SPAN {
                self.set(GridPosition::new(column, row), tile);
            }
        }
    }

    fn wall_unless_walkway(&mut self, cell: GridPosition) {
        if !self.is_walkway(cell) {
            self.set(cell, TileType::Wall);
        }
    }

    fn mark_walkway(&mut self, cell: GridPosition) {
        let index = self.index(cell);
        self.walkway[index] = true;
        self.tiles[index] = TileType::Floor;
    }

    fn is_walkway(&self, cell: GridPosition) -> bool {
        self.walkway[self.index(cell)]
    }

    fn get(&self, cell: GridPosition) -> TileType {
        self.tiles[self.index(cell)]
    }

    fn set(&mut self, cell: GridPosition, tile: TileType) {
        let index = self.index(cell);
        self.tiles[index] = tile;
    }

    fn is_interior(&self, cell: GridPosition) -> bool {
        cell.column() > 0
            && cell.row() > 0
            && cell.column() < self.width - 1
            && cell.row() < self.height - 1
    }

    fn index(&self, cell: GridPosition) -> usize {
        (cell.row() * self.width + cell.column()) as usize
    }
}

/// Shifts a spawn block inward so all of it stays inside the border.
fn clamp_interior(desired: i32, extent: i32) -> i32 {
    desired.min(extent - SPAWN_SPAN - 1).max(1)
}
