//! Per-variant behaviour and collision rules.
//!
//! Behaviour functions mutate only the entity they are given. Anything that
//! affects the rest of the roster (new projectiles) comes back as an
//! `Intent` for the simulation loop to apply once the update pass is over.

use std::f32::consts::PI;

use glam::Vec2;

use crate::config::Config;
use crate::entities::{Behavior, Entity, EntityKind, PlayerState};
use crate::error::{ArenaError, Result};
use crate::host::{InputSource, Key};

/// A change to the roster requested during the update pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    Spawn(Entity),
}

// ── Update dispatch ──────────────────────────────────────────────────────────

/// Advance one entity by one frame.
///
/// `player_pos` is the roster's player position at the moment this entity is
/// updated; only enemies need it, and an enemy without a player is an error.
pub fn update(
    entity: &mut Entity,
    player_pos: Option<Vec2>,
    input: &impl InputSource,
    config: &Config,
) -> Result<Vec<Intent>> {
    if !entity.is_alive() {
        return Ok(Vec::new());
    }
    match entity.kind() {
        EntityKind::Player => Ok(update_player(entity, input, config)),
        EntityKind::Enemy => {
            let target = player_pos.ok_or(ArenaError::PlayerMissing)?;
            update_enemy(entity, target, config);
            Ok(Vec::new())
        }
        EntityKind::Projectile => {
            update_projectile(entity);
            Ok(Vec::new())
        }
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Facing angle toward `pointer`, measured from the fixed aim origin.
pub fn facing_toward(origin: Vec2, pointer: Vec2) -> f32 {
    (origin.y - pointer.y).atan2(origin.x - pointer.x) + PI
}

/// Move per held key (diagonals are not normalised), re-aim, and fire on
/// the rising edge of the trigger.
pub fn update_player(entity: &mut Entity, input: &impl InputSource, config: &Config) -> Vec<Intent> {
    let Behavior::Player(PlayerState {
        facing,
        trigger_held,
    }) = &mut entity.behavior
    else {
        return Vec::new();
    };

    let step = config.player_step;
    let pos = &mut entity.pos;
    if input.key_held(Key::Up) {
        pos.y -= step;
    }
    if input.key_held(Key::Down) {
        pos.y += step;
    }
    if input.key_held(Key::Left) {
        pos.x -= step;
    }
    if input.key_held(Key::Right) {
        pos.x += step;
    }

    *facing = facing_toward(config.aim_origin, input.pointer());

    let mut intents = Vec::new();
    if input.trigger_held() {
        if !*trigger_held {
            *trigger_held = true;
            log::debug!("Player fired at ({:.1}, {:.1}) heading {:.3}", pos.x, pos.y, facing);
            intents.push(Intent::Spawn(Entity::projectile(
                *pos,
                *facing,
                config.projectile_speed,
            )));
        }
    } else {
        *trigger_held = false;
    }
    intents
}

// ── Enemy ────────────────────────────────────────────────────────────────────

/// Whether `from` is close enough to `target` to start chasing it.
/// The boundary is inclusive.
pub fn in_aggro_range(from: Vec2, target: Vec2, aggro_radius: f32) -> bool {
    from.distance_squared(target) <= aggro_radius * aggro_radius
}

/// Close in on the player along the direct bearing while within aggro range.
/// The step never carries the enemy past the target.
pub fn update_enemy(entity: &mut Entity, target: Vec2, config: &Config) {
    if !in_aggro_range(entity.pos, target, config.aggro_radius) {
        return;
    }
    let delta = target - entity.pos;
    let bearing = delta.y.atan2(delta.x);
    let step = config.enemy_speed.min(delta.length());
    entity.pos += Vec2::from_angle(bearing) * step;
}

// ── Projectile ───────────────────────────────────────────────────────────────

pub fn update_projectile(entity: &mut Entity) {
    if let Behavior::Projectile(p) = &entity.behavior {
        let velocity = Vec2::from_angle(p.heading) * p.speed;
        entity.pos += velocity;
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Kind pairs that react to touching, in either order.
pub fn interacts(a: EntityKind, b: EntityKind) -> bool {
    use EntityKind::*;
    matches!(
        (a, b),
        (Player, Enemy) | (Enemy, Player) | (Projectile, Enemy) | (Enemy, Projectile)
    )
}

/// Circles touch or overlap.
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    let reach = a.radius() + b.radius();
    a.pos.distance_squared(b.pos) <= reach * reach
}

/// Apply a hit from an entity of kind `other`. Returns true if the receiver
/// died from it.
pub fn on_hit(receiver: &mut Entity, other: EntityKind) -> bool {
    let lethal = matches!(
        (receiver.kind(), other),
        (EntityKind::Player, EntityKind::Enemy)
            | (EntityKind::Enemy, EntityKind::Projectile)
            | (EntityKind::Projectile, EntityKind::Enemy)
    );
    if lethal && receiver.is_alive() {
        receiver.kill();
        return true;
    }
    false
}

/// Test every pair once, in roster order, and deliver hits to both sides.
///
/// A pair only counts if both entities are still alive when it is reached,
/// so one projectile takes out at most one enemy and a dead enemy hits no one.
/// Returns the number of pairs resolved.
pub fn resolve_collisions(entities: &mut [Entity]) -> usize {
    let mut resolved = 0;
    for i in 0..entities.len() {
        let (head, tail) = entities.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !a.is_alive() {
                break;
            }
            if !b.is_alive() || !interacts(a.kind(), b.kind()) || !overlaps(a, b) {
                continue;
            }
            let (kind_a, kind_b) = (a.kind(), b.kind());
            on_hit(a, kind_b);
            on_hit(b, kind_a);
            resolved += 1;
        }
    }
    resolved
}
