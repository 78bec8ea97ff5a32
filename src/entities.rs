//! Entity model — pure data, no behaviour.
//!
//! An entity is shared state (position, radius, colour, life) plus a
//! `Behavior` variant holding whatever the kind needs on top of that.

use glam::Vec2;

use crate::error::{ArenaError, Result};

// ── Construction constants ────────────────────────────────────────────────────

pub const DEFAULT_RADIUS: f32 = 20.0;
pub const PROJECTILE_RADIUS: f32 = 7.0;

pub const PLAYER_COLOR: Color = Color(0x0000ff);
pub const ENEMY_COLOR: Color = Color(0xff0000);
pub const PROJECTILE_COLOR: Color = Color(0xffffff);

/// 24-bit `0xRRGGBB` colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

// ── Tags & variant state ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
}

/// Alive → Dead is the only transition; Dead is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Life {
    Alive,
    Dead,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Radians.
    pub facing: f32,
    /// Set while the fire input is held, so one press fires once.
    pub trigger_held: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileState {
    /// Radians.
    pub heading: f32,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    Player(PlayerState),
    /// Pure reactive pursuit, no memory of its own.
    Enemy,
    Projectile(ProjectileState),
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub pos: Vec2,
    radius: f32,
    color: Color,
    life: Life,
    pub behavior: Behavior,
}

impl Entity {
    pub fn player(pos: Vec2) -> Self {
        Self {
            pos,
            radius: DEFAULT_RADIUS,
            color: PLAYER_COLOR,
            life: Life::Alive,
            behavior: Behavior::Player(PlayerState {
                facing: 0.0,
                trigger_held: false,
            }),
        }
    }

    pub fn enemy(pos: Vec2) -> Self {
        Self {
            pos,
            radius: DEFAULT_RADIUS,
            color: ENEMY_COLOR,
            life: Life::Alive,
            behavior: Behavior::Enemy,
        }
    }

    pub fn projectile(pos: Vec2, heading: f32, speed: f32) -> Self {
        Self {
            pos,
            radius: PROJECTILE_RADIUS,
            color: PROJECTILE_COLOR,
            life: Life::Alive,
            behavior: Behavior::Projectile(ProjectileState { heading, speed }),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.behavior {
            Behavior::Player(_) => EntityKind::Player,
            Behavior::Enemy => EntityKind::Enemy,
            Behavior::Projectile(_) => EntityKind::Projectile,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn life(&self) -> Life {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life == Life::Alive
    }

    /// Facing angle, for players only.
    pub fn facing(&self) -> Option<f32> {
        match &self.behavior {
            Behavior::Player(p) => Some(p.facing),
            _ => None,
        }
    }

    pub(crate) fn kill(&mut self) {
        self.life = Life::Dead;
    }
}

// ── Roster ────────────────────────────────────────────────────────────────────

/// Every simulated entity for the current frame, in iteration order.
///
/// Holds at most one player; `push` refuses a second.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    entities: Vec<Entity>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// One player and one enemy, player first.
    pub fn starting(player: Vec2, enemy: Vec2) -> Self {
        Self {
            entities: vec![Entity::player(player), Entity::enemy(enemy)],
        }
    }

    pub fn push(&mut self, entity: Entity) -> Result<()> {
        if entity.kind() == EntityKind::Player && self.player().is_some() {
            return Err(ArenaError::DuplicatePlayer);
        }
        self.entities.push(entity);
        Ok(())
    }

    /// First entity tagged Player.
    pub fn player(&self) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.kind() == EntityKind::Player)
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player().map(|p| p.pos)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    /// Drop every dead entity, returning how many went.
    pub fn compact(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(Entity::is_alive);
        before - self.entities.len()
    }

    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }
}
