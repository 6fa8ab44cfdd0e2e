//! Bounded arena the simulated agents live in.
//!
//! The layout (bounds and walls) is immutable and shared by every body.
//! Entities (enemies, NPCs, loot) are owned by [`World`] and mutated only by
//! the driver between agent updates.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use agent_core::env::MovementController;
use agent_core::{Sighting, Vec2};
use rand::Rng;

/// Axis-aligned blocked rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub min: Vec2,
    pub max: Vec2,
}

impl Wall {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Static geometry: a square of `half_extent` around the origin plus walls.
#[derive(Clone, Debug)]
pub struct Layout {
    pub half_extent: f32,
    pub walls: Vec<Wall>,
    /// Cell size used for exploration bookkeeping.
    pub cell: f32,
}

impl Layout {
    pub fn is_open(&self, p: Vec2) -> bool {
        p.x.abs() <= self.half_extent
            && p.y.abs() <= self.half_extent
            && !self.walls.iter().any(|w| w.contains(p))
    }

    pub fn cell_of(&self, p: Vec2) -> (i32, i32) {
        (
            (p.x / self.cell).floor() as i32,
            (p.y / self.cell).floor() as i32,
        )
    }

    pub fn cell_center(&self, cell: (i32, i32)) -> Vec2 {
        Vec2::new(
            (cell.0 as f32 + 0.5) * self.cell,
            (cell.1 as f32 + 0.5) * self.cell,
        )
    }

    /// Number of cells whose center is open ground.
    pub fn open_cells(&self) -> usize {
        let span = (self.half_extent / self.cell).ceil() as i32;
        (-span..span)
            .flat_map(|x| (-span..span).map(move |y| (x, y)))
            .filter(|c| self.is_open(self.cell_center(*c)))
            .count()
    }

    /// A uniformly random open point.
    pub fn random_open_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let h = self.half_extent;
        loop {
            let p = Vec2::new(rng.gen_range(-h..h), rng.gen_range(-h..h));
            if self.is_open(p) {
                return p;
            }
        }
    }
}

/// An agent's body. Moves that would end inside a wall or outside the arena
/// are refused, which is what makes pushing into walls observable.
#[derive(Debug)]
pub struct ArenaBody {
    layout: Arc<Layout>,
    position: RwLock<Vec2>,
    speed: f32,
}

impl ArenaBody {
    pub fn new(layout: Arc<Layout>, position: Vec2, speed: f32) -> Self {
        Self {
            layout,
            position: RwLock::new(position),
            speed,
        }
    }

    /// Places the body at `position` regardless of walls.
    pub fn teleport(&self, position: Vec2) {
        *self.position.write().unwrap_or_else(PoisonError::into_inner) = position;
    }
}

impl MovementController for ArenaBody {
    fn position(&self) -> Vec2 {
        *self.position.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply_move(&self, direction: Vec2) {
        let mut position = self.position.write().unwrap_or_else(PoisonError::into_inner);
        let target = *position + direction.normalized() * self.speed;
        if self.layout.is_open(target) {
            *position = target;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub position: Vec2,
    pub health: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Npc {
    pub position: Vec2,
    pub role: NpcRole,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum NpcRole {
    Healer,
    Merchant,
    Villager,
}

/// Tunables for the arena population.
#[derive(Clone, Debug)]
pub struct WorldSettings {
    pub half_extent: f32,
    pub enemies: usize,
    pub npcs: usize,
    pub loot: usize,
    pub sight_range: f32,
    pub enemy_health: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            half_extent: 20.0,
            enemies: 6,
            npcs: 4,
            loot: 10,
            sight_range: 8.0,
            enemy_health: 30.0,
        }
    }
}

/// Arena layout plus everything living in it except the agents.
#[derive(Debug)]
pub struct World {
    pub layout: Arc<Layout>,
    pub settings: WorldSettings,
    pub enemies: Vec<Enemy>,
    pub npcs: Vec<Npc>,
    pub loot: Vec<Vec2>,
    pub portal: Vec2,
}

impl World {
    pub fn generate<R: Rng + ?Sized>(settings: WorldSettings, rng: &mut R) -> Self {
        let h = settings.half_extent;
        // Two partitions with gaps, so straight-line travel hits walls.
        let walls = vec![
            Wall::new(Vec2::new(-h * 0.6, -0.5), Vec2::new(h * 0.2, 0.5)),
            Wall::new(Vec2::new(h * 0.4, -h * 0.7), Vec2::new(h * 0.4 + 1.0, h * 0.3)),
        ];
        let layout = Arc::new(Layout {
            half_extent: h,
            walls,
            cell: 4.0,
        });

        let enemies = (0..settings.enemies)
            .map(|_| Enemy {
                position: layout.random_open_point(rng),
                health: settings.enemy_health,
            })
            .collect();
        let roles = [NpcRole::Healer, NpcRole::Merchant, NpcRole::Villager];
        let npcs = (0..settings.npcs)
            .map(|i| Npc {
                position: layout.random_open_point(rng),
                role: roles[i % roles.len()],
            })
            .collect();
        let loot = (0..settings.loot)
            .map(|_| layout.random_open_point(rng))
            .collect();
        let portal = layout.random_open_point(rng);

        Self {
            layout,
            settings,
            enemies,
            npcs,
            loot,
            portal,
        }
    }

    pub fn enemies_near(&self, from: Vec2) -> Vec<Sighting> {
        self.enemies
            .iter()
            .filter(|e| e.position.distance(from) <= self.settings.sight_range)
            .map(|e| Sighting::new(e.position, "enemy"))
            .collect()
    }

    pub fn npcs_near(&self, from: Vec2) -> Vec<Sighting> {
        self.npcs
            .iter()
            .filter(|n| n.position.distance(from) <= self.settings.sight_range)
            .map(|n| Sighting::new(n.position, n.role.as_ref()))
            .collect()
    }

    pub fn loot_near(&self, from: Vec2) -> Vec<Sighting> {
        self.loot
            .iter()
            .filter(|p| p.distance(from) <= self.settings.sight_range)
            .map(|p| Sighting::new(*p, "supplies"))
            .collect()
    }

    pub fn portal_visible(&self, from: Vec2) -> bool {
        self.portal.distance(from) <= self.settings.sight_range
    }

    /// Index of the closest enemy within `range`.
    pub fn enemy_within(&self, from: Vec2, range: f32) -> Option<usize> {
        self.enemies
            .iter()
            .enumerate()
            .map(|(i, e)| (i, e.position.distance(from)))
            .filter(|(_, d)| *d <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    pub fn npc_within(&self, from: Vec2, range: f32) -> Option<&Npc> {
        self.npcs
            .iter()
            .filter(|n| n.position.distance(from) <= range)
            .min_by(|a, b| a.position.distance(from).total_cmp(&b.position.distance(from)))
    }

    /// Removes and returns the loot closest to `from` within `range`.
    pub fn take_loot(&mut self, from: Vec2, range: f32) -> Option<Vec2> {
        let index = self
            .loot
            .iter()
            .enumerate()
            .filter(|(_, p)| p.distance(from) <= range)
            .min_by(|a, b| a.1.distance(from).total_cmp(&b.1.distance(from)))
            .map(|(i, _)| i)?;
        Some(self.loot.swap_remove(index))
    }

    /// Deals `damage` to enemy `index`. A killed enemy respawns elsewhere and
    /// true is returned.
    pub fn strike<R: Rng + ?Sized>(&mut self, index: usize, damage: f32, rng: &mut R) -> bool {
        let respawn = self.layout.random_open_point(rng);
        let max_health = self.settings.enemy_health;
        let Some(enemy) = self.enemies.get_mut(index) else {
            return false;
        };
        enemy.health -= damage;
        if enemy.health > 0.0 {
            return false;
        }
        enemy.position = respawn;
        enemy.health = max_health;
        true
    }

    /// Tops loot back up to the configured amount.
    pub fn restock<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while self.loot.len() < self.settings.loot {
            let p = self.layout.random_open_point(rng);
            self.loot.push(p);
        }
    }
}

/// Cells an agent has stood in.
#[derive(Clone, Debug, Default)]
pub struct VisitedCells {
    cells: HashSet<(i32, i32)>,
}

impl VisitedCells {
    pub fn visit(&mut self, cell: (i32, i32)) -> bool {
        self.cells.insert(cell)
    }

    pub fn contains(&self, cell: (i32, i32)) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Center of the nearest open cell not visited yet.
    pub fn nearest_unvisited(&self, layout: &Layout, from: Vec2) -> Option<Vec2> {
        let span = (layout.half_extent / layout.cell).ceil() as i32;
        (-span..span)
            .flat_map(|x| (-span..span).map(move |y| (x, y)))
            .filter(|c| !self.cells.contains(c))
            .map(|c| layout.cell_center(c))
            .filter(|p| layout.is_open(*p))
            .min_by(|a, b| a.distance(from).total_cmp(&b.distance(from)))
    }
}
