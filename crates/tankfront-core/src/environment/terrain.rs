//! Procedural terrain: decorative tiles and damageable obstacles.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Edge length of the tile grid.
pub const TILE_SIZE: f32 = 100.0;
/// Maximum tile displacement from its grid corner on each axis.
pub const TILE_JITTER: f32 = 20.0;
/// Movement modifier near an obstacle.
pub const OBSTACLE_MOVEMENT_MODIFIER: f32 = 0.4;
/// Obstacles closer than this slow movement.
pub const OBSTACLE_SLOW_RADIUS: f32 = 40.0;
/// Tiles closer than this apply the terrain modifier.
pub const TILE_RADIUS: f32 = 30.0;
/// Projectiles closer than this to an obstacle are absorbed.
pub const OBSTACLE_HIT_RADIUS: f32 = 20.0;
/// Damage an obstacle takes per absorbed projectile.
pub const OBSTACLE_HIT_DAMAGE: f32 = 20.0;
/// Starting obstacle health.
pub const OBSTACLE_HEALTH: f32 = 100.0;

/// Terrain type of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Forest.
    Forest,
    /// Desert.
    Desert,
    /// Snowfield.
    Snow,
    /// Ruined city.
    City,
}

impl TerrainKind {
    /// Movement modifier applied near a tile of this terrain.
    #[must_use]
    pub const fn tile_modifier(self) -> f32 {
        match self {
            Self::Forest => 0.7,
            Self::Desert => 0.8,
            Self::Snow => 0.6,
            Self::City => 0.9,
        }
    }

    /// Obstacle kinds that appear on this terrain.
    #[must_use]
    pub const fn obstacle_kinds(self) -> [ObstacleKind; 3] {
        match self {
            Self::Forest => [ObstacleKind::Tree, ObstacleKind::Rock, ObstacleKind::Bush],
            Self::Desert => [ObstacleKind::Cactus, ObstacleKind::Dune, ObstacleKind::Rock],
            Self::Snow => [ObstacleKind::Ice, ObstacleKind::Rock, ObstacleKind::Snowdrift],
            Self::City => [ObstacleKind::Rubble, ObstacleKind::Barrier, ObstacleKind::Wall],
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forest => write!(f, "forest"),
            Self::Desert => write!(f, "desert"),
            Self::Snow => write!(f, "snow"),
            Self::City => write!(f, "city"),
        }
    }
}

/// Obstacle variety, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ObstacleKind {
    Tree,
    Rock,
    Bush,
    Cactus,
    Dune,
    Ice,
    Snowdrift,
    Rubble,
    Barrier,
    Wall,
}

/// A decorative ground tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Tile center.
    pub position: Vec2,
    /// Visual variant, 0 to 2.
    pub variant: u8,
}

/// A damageable obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Obstacle variety.
    pub kind: ObstacleKind,
    /// Obstacle center.
    pub position: Vec2,
    /// Remaining health; removed at zero.
    pub health: f32,
}

impl Obstacle {
    /// Creates a full-health obstacle.
    #[must_use]
    pub const fn new(kind: ObstacleKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            health: OBSTACLE_HEALTH,
        }
    }
}

/// Terrain state of the active level.
///
/// Tiles are fixed at construction. Obstacles only ever disappear, when
/// projectiles wear them down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    kind: TerrainKind,
    tiles: Vec<Tile>,
    obstacles: Vec<Obstacle>,
}

impl Terrain {
    /// Generates terrain for a world of `world_size`.
    ///
    /// Each grid cell gets a jittered tile with probability one half, then
    /// 10 to 29 obstacles are scattered uniformly.
    pub fn generate<R: Rng>(kind: TerrainKind, world_size: Vec2, rng: &mut R) -> Self {
        // Float-to-int of a small positive grid size.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (cols, rows) = (
            (world_size.x / TILE_SIZE).ceil() as u32,
            (world_size.y / TILE_SIZE).ceil() as u32,
        );

        let mut tiles = Vec::new();
        for i in 0..cols {
            for j in 0..rows {
                if rng.gen_bool(0.5) {
                    #[allow(clippy::cast_precision_loss)]
                    let corner = Vec2::new(i as f32, j as f32) * TILE_SIZE;
                    let jitter = Vec2::new(
                        rng.gen_range(-TILE_JITTER..TILE_JITTER),
                        rng.gen_range(-TILE_JITTER..TILE_JITTER),
                    );
                    tiles.push(Tile {
                        position: corner + jitter,
                        variant: rng.gen_range(0..3),
                    });
                }
            }
        }

        let kinds = kind.obstacle_kinds();
        let count = rng.gen_range(10..30);
        let obstacles = (0..count)
            .map(|_| {
                let obstacle_kind = kinds.choose(rng).copied().unwrap_or(ObstacleKind::Rock);
                let position = Vec2::new(
                    rng.gen_range(0.0..world_size.x),
                    rng.gen_range(0.0..world_size.y),
                );
                Obstacle::new(obstacle_kind, position)
            })
            .collect();

        Self {
            kind,
            tiles,
            obstacles,
        }
    }

    /// Builds terrain from explicit features.
    #[must_use]
    pub const fn with_features(kind: TerrainKind, tiles: Vec<Tile>, obstacles: Vec<Obstacle>) -> Self {
        Self {
            kind,
            tiles,
            obstacles,
        }
    }

    /// Movement multiplier at `position`.
    ///
    /// An obstacle closer than 40 units wins over any tile; otherwise a tile
    /// closer than 30 units applies the terrain's modifier, and open ground
    /// is 1.0.
    #[must_use]
    pub fn movement_modifier(&self, position: Vec2) -> f32 {
        if self
            .obstacles
            .iter()
            .any(|o| o.position.distance(position) < OBSTACLE_SLOW_RADIUS)
        {
            return OBSTACLE_MOVEMENT_MODIFIER;
        }
        if self
            .tiles
            .iter()
            .any(|t| t.position.distance(position) < TILE_RADIUS)
        {
            return self.kind.tile_modifier();
        }
        1.0
    }

    /// Tests a projectile at `position` against the obstacles.
    ///
    /// The first obstacle closer than 20 units takes 20 damage and is removed
    /// once its health reaches zero. Returns true if an obstacle was hit.
    pub fn handle_projectile_collision(&mut self, position: Vec2) -> bool {
        let Some(index) = self
            .obstacles
            .iter()
            .position(|o| o.position.distance(position) < OBSTACLE_HIT_RADIUS)
        else {
            return false;
        };

        self.obstacles[index].health -= OBSTACLE_HIT_DAMAGE;
        if self.obstacles[index].health <= 0.0 {
            let removed = self.obstacles.remove(index);
            debug!(kind = ?removed.kind, position = ?removed.position, "obstacle destroyed");
        }
        true
    }

    /// Terrain type.
    #[must_use]
    pub const fn kind(&self) -> TerrainKind {
        self.kind
    }

    /// Decorative tiles.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Remaining obstacles.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}
