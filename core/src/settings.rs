//! Self-correcting level configuration.

const MIN_DIMENSION: u32 = 5;
const MAX_DIMENSION: u32 = 255;
const MIN_TILE_SIZE: u32 = 16;
const MAX_TILE_SIZE: u32 = 128;
const MAX_HAZARD_DENSITY: f32 = 0.6;

const DEFAULT_WIDTH: i32 = 25;
const DEFAULT_HEIGHT: i32 = 19;
const DEFAULT_TILE_SIZE: i32 = 48;
const DEFAULT_HAZARD_DENSITY: f32 = 0.08;

/// Parameters that drive level generation.
///
/// Every constructor and mutator normalises its inputs: dimensions stay
/// within 5..=255 and are always odd, the tile size stays within 16..=128 and hazard
/// density within 0.0..=0.6. A locked seed survives level regeneration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelSettings {
    width: u32,
    height: u32,
    tile_size: u32,
    hazard_density: f32,
    seed: u64,
    seed_locked: bool,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            DEFAULT_TILE_SIZE,
            DEFAULT_HAZARD_DENSITY,
        )
    }
}

impl LevelSettings {
    /// Creates settings with an unlocked zero seed, correcting out-of-range values.
    #[must_use]
    pub fn new(width: i32, height: i32, tile_size: i32, hazard_density: f32) -> Self {
        Self {
            width: ensure_odd(width),
            height: ensure_odd(height),
            tile_size: clamp_tile_size(tile_size),
            hazard_density: clamp_hazard(hazard_density),
            seed: 0,
            seed_locked: false,
        }
    }

    /// Board width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Board height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tile size in pixels before projection.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Probability that an eligible floor cell becomes a hazard.
    #[must_use]
    pub const fn hazard_density(&self) -> f32 {
        self.hazard_density
    }

    /// Seed used for the next generated level.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Reports whether regeneration must reuse the current seed.
    #[must_use]
    pub const fn seed_locked(&self) -> bool {
        self.seed_locked
    }

    /// Adjusts the width, keeping it odd and within the supported range.
    #[must_use]
    pub fn with_width_delta(self, delta: i32) -> Self {
        Self {
            width: ensure_odd(widen(self.width).saturating_add(delta)),
            ..self
        }
    }

    /// Adjusts the height, keeping it odd and within the supported range.
    #[must_use]
    pub fn with_height_delta(self, delta: i32) -> Self {
        Self {
            height: ensure_odd(widen(self.height).saturating_add(delta)),
            ..self
        }
    }

    /// Adjusts the tile size within its supported range.
    #[must_use]
    pub fn with_tile_size_delta(self, delta: i32) -> Self {
        Self {
            tile_size: clamp_tile_size(widen(self.tile_size).saturating_add(delta)),
            ..self
        }
    }

    /// Adjusts the hazard density within its supported range.
    #[must_use]
    pub fn with_hazard_delta(self, delta: f32) -> Self {
        Self {
            hazard_density: clamp_hazard(self.hazard_density + delta),
            ..self
        }
    }

    /// Uses an explicit seed and locks it against regeneration.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed,
            seed_locked: true,
            ..self
        }
    }

    /// Uses a freshly drawn seed and unlocks it.
    #[must_use]
    pub fn with_random_seed(self, seed: u64) -> Self {
        Self {
            seed,
            seed_locked: false,
            ..self
        }
    }

    /// Sets whether regeneration must reuse the current seed.
    #[must_use]
    pub fn with_seed_lock(self, seed_locked: bool) -> Self {
        Self {
            seed_locked,
            ..self
        }
    }
}

fn widen(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn ensure_odd(value: i32) -> u32 {
    let value = u32::try_from(value)
        .unwrap_or(0)
        .clamp(MIN_DIMENSION, MAX_DIMENSION);
    if value % 2 == 0 {
        value.saturating_add(1)
    } else {
        value
    }
}

fn clamp_tile_size(value: i32) -> u32 {
    u32::try_from(value)
        .unwrap_or(0)
        .clamp(MIN_TILE_SIZE, MAX_TILE_SIZE)
}

fn clamp_hazard(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_HAZARD_DENSITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_arena() {
        let settings = LevelSettings::default();

        assert_eq!(settings.width(), 25);
        assert_eq!(settings.height(), 19);
        assert_eq!(settings.tile_size(), 48);
        assert!((settings.hazard_density() - 0.08).abs() < f32::EPSILON);
        assert!(!settings.seed_locked());
    }

    #[test]
    fn even_dimensions_round_up_to_odd() {
        let settings = LevelSettings::new(10, 8, 48, 0.1);

        assert_eq!(settings.width(), 11);
        assert_eq!(settings.height(), 9);
    }

    #[test]
    fn tiny_dimensions_rise_to_minimum() {
        let settings = LevelSettings::new(-4, 2, 48, 0.1);

        assert_eq!(settings.width(), 5);
        assert_eq!(settings.height(), 5);
        assert_eq!(settings.with_width_delta(-2).width(), 5);
    }

    #[test]
    fn huge_dimensions_fall_to_maximum() {
        let settings = LevelSettings::new(65_537, i32::MAX, 48, 0.1);

        assert_eq!(settings.width(), 255);
        assert_eq!(settings.height(), 255);
        assert_eq!(settings.with_width_delta(2).width(), 255);
        assert_eq!(settings.with_height_delta(-2).height(), 253);
    }

    #[test]
    fn tile_size_and_hazard_are_clamped() {
        let settings = LevelSettings::new(9, 9, 4, 3.0);

        assert_eq!(settings.tile_size(), 16);
        assert!((settings.hazard_density() - 0.6).abs() < f32::EPSILON);
        assert_eq!(settings.with_tile_size_delta(500).tile_size(), 128);
        assert_eq!(settings.with_hazard_delta(-5.0).hazard_density(), 0.0);
        assert_eq!(
            LevelSettings::new(9, 9, 48, f32::NAN).hazard_density(),
            0.0
        );
    }

    #[test]
    fn width_delta_keeps_dimensions_odd() {
        let settings = LevelSettings::new(9, 9, 48, 0.0);

        assert_eq!(settings.with_width_delta(2).width(), 11);
        assert_eq!(settings.with_width_delta(1).width(), 11);
        assert_eq!(settings.with_height_delta(-2).height(), 7);
    }

    #[test]
    fn explicit_seed_locks_and_random_seed_unlocks() {
        let locked = LevelSettings::default().with_seed(42);
        assert_eq!(locked.seed(), 42);
        assert!(locked.seed_locked());

        let unlocked = locked.with_random_seed(7);
        assert_eq!(unlocked.seed(), 7);
        assert!(!unlocked.seed_locked());

        assert!(unlocked.with_seed_lock(true).seed_locked());
    }
}
