//! The simulation loop: owns the roster and runs one frame at a time.
//!
//! Frame order is fixed: update every entity, apply spawn intents, resolve
//! collisions, cull stray projectiles, then drop the dead. Nothing outside
//! this module mutates the roster.

use crate::compute::{self, Intent};
use crate::config::Config;
use crate::entities::{Entity, EntityKind, Roster};
use crate::error::{ArenaError, Result};
use crate::host::{Canvas, InputSource, Platform};
use crate::render;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// No live player remains; the roster is frozen.
    GameOver,
}

/// What happened during one `step`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub spawned: usize,
    pub hits: usize,
    pub culled: usize,
    pub removed: usize,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    roster: Roster,
    config: Config,
    frame: u64,
}

impl Simulation {
    /// Player at `player_spawn` and a single enemy at `enemy_spawn`.
    pub fn new(config: Config) -> Self {
        let roster = Roster::starting(config.player_spawn, config.enemy_spawn);
        Self::with_roster(roster, config)
    }

    pub fn with_roster(roster: Roster, config: Config) -> Self {
        Self {
            roster,
            config,
            frame: 0,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn status(&self) -> GameStatus {
        match self.roster.player() {
            Some(p) if p.is_alive() => GameStatus::Playing,
            _ => GameStatus::GameOver,
        }
    }

    /// Advance by one frame.
    ///
    /// Fails with `PlayerMissing`, leaving the roster untouched, when an
    /// enemy has no player to chase.
    pub fn step(&mut self, input: &impl InputSource) -> Result<FrameReport> {
        let enemy_alive = self
            .roster
            .iter()
            .any(|e| e.kind() == EntityKind::Enemy && e.is_alive());
        if enemy_alive && self.roster.player().is_none() {
            return Err(ArenaError::PlayerMissing);
        }
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };

        // 1. Update pass over the entities present at the start of the frame.
        let mut intents = Vec::new();
        let count = self.roster.len();
        for i in 0..count {
            let needs_target = self.roster.get(i).map(Entity::kind) == Some(EntityKind::Enemy);
            let target = if needs_target {
                self.roster.player_position()
            } else {
                None
            };
            let entity = &mut self.roster.entities_mut()[i];
            intents.extend(compute::update(entity, target, input, &self.config)?);
        }

        // 2. Apply intents; new arrivals wait until next frame to move.
        for intent in intents {
            match intent {
                Intent::Spawn(entity) => {
                    self.roster.push(entity)?;
                    report.spawned += 1;
                }
            }
        }

        // 3. Collisions.
        report.hits = compute::resolve_collisions(self.roster.entities_mut());
        for e in self.roster.iter().filter(|e| !e.is_alive()) {
            log::info!(
                "Frame {}: {:?} destroyed at ({:.1}, {:.1})",
                self.frame,
                e.kind(),
                e.pos.x,
                e.pos.y
            );
        }

        // 4. Projectiles that left the arena.
        report.culled = self.cull_projectiles();

        // 5. Compaction.
        report.removed = self.roster.compact();
        if report.removed > 0 && self.status() == GameStatus::GameOver {
            log::info!("Frame {}: player down, game over", self.frame);
        }

        Ok(report)
    }

    fn cull_projectiles(&mut self) -> usize {
        let Some(margin) = self.config.projectile_cull_margin else {
            return 0;
        };
        let world = self.config.world;
        let mut culled = 0;
        for e in self.roster.entities_mut() {
            if e.kind() != EntityKind::Projectile || !e.is_alive() {
                continue;
            }
            let outside = e.pos.x < -margin
                || e.pos.y < -margin
                || e.pos.x > world.x + margin
                || e.pos.y > world.y + margin;
            if outside {
                e.kill();
                culled += 1;
            }
        }
        if culled > 0 {
            log::info!("Frame {}: culled {} projectile(s)", self.frame, culled);
        }
        culled
    }

    /// Clear the canvas and draw the current roster.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.clear();
        render::render(&self.roster, &self.config, canvas);
    }
}

/// Drive frames until the platform asks to stop. Once the player is gone the
/// roster stops updating but keeps being drawn.
///
/// Returns the number of frames presented.
pub fn run<P: Platform>(sim: &mut Simulation, platform: &mut P) -> Result<u64> {
    let mut presented = 0;
    while platform.process_messages()? {
        if sim.status() == GameStatus::Playing {
            sim.step(platform.input())?;
        }
        sim.draw(platform.canvas());
        platform.present(sim.status())?;
        presented += 1;
    }
    log::info!("Host closed after {} frame(s)", presented);
    Ok(presented)
}
