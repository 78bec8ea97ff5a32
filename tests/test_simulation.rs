use std::collections::VecDeque;

use arena_pursuit::entities::*;
use arena_pursuit::host::{Canvas, FrameInput, Platform};
use arena_pursuit::simulation::run;
use arena_pursuit::{ArenaError, Config, FrameReport, GameStatus, Result, Simulation};

use glam::Vec2;

const EPS: f32 = 1e-3;

fn idle() -> FrameInput {
    FrameInput::idle().with_pointer(700.0, 360.0)
}

fn leaky_config() -> Config {
    Config {
        projectile_cull_margin: None,
        ..Config::default()
    }
}

fn roster_of(entities: Vec<Entity>) -> Roster {
    let mut r = Roster::new();
    for e in entities {
        r.push(e).unwrap();
    }
    r
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn default_start_is_player_and_far_enemy() {
    let sim = Simulation::new(Config::default());
    let r = sim.roster();
    assert_eq!(r.len(), 2);
    assert_eq!(r.player_position(), Some(Vec2::new(640.0, 360.0)));
    assert_eq!(r.get(1).map(|e| e.pos), Some(Vec2::new(100.0, 100.0)));
    assert_eq!(sim.status(), GameStatus::Playing);
    assert_eq!(sim.frame(), 0);
}

#[test]
fn idle_frame_moves_nothing_when_enemy_out_of_range() {
    let mut sim = Simulation::new(Config::default());
    let report = sim.step(&idle()).unwrap();

    assert_eq!(
        report,
        FrameReport {
            frame: 1,
            ..FrameReport::default()
        }
    );
    let r = sim.roster();
    assert_eq!(r.get(0).unwrap().pos, Vec2::new(640.0, 360.0));
    assert_eq!(r.get(1).unwrap().pos, Vec2::new(100.0, 100.0));
}

#[test]
fn projectile_travels_ten_units_in_two_frames() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::projectile(Vec2::ZERO, 0.0, 5.0),
    ]);
    let mut sim = Simulation::with_roster(roster, leaky_config());
    sim.step(&idle()).unwrap();
    sim.step(&idle()).unwrap();
    let b = sim.roster().get(1).unwrap();
    assert!((b.pos - Vec2::new(10.0, 0.0)).length() < EPS);
}

#[test]
fn enemy_in_range_pursues_each_frame() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::enemy(Vec2::new(540.0, 360.0)),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    for frame in 1..=10 {
        sim.step(&idle()).unwrap();
        let e = sim.roster().get(1).unwrap();
        let expected = Vec2::new(540.0 + 1.5 * frame as f32, 360.0);
        assert!((e.pos - expected).length() < EPS, "frame {}", frame);
    }
}

#[test]
fn enemy_chases_player_position_after_player_moved() {
    // Player is updated first, so the enemy sees this frame's position
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::enemy(Vec2::new(640.0, 200.0)),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    let input = FrameInput {
        left: true,
        ..idle()
    };
    sim.step(&input).unwrap();
    let player = sim.roster().get(0).unwrap().pos;
    let enemy = sim.roster().get(1).unwrap().pos;
    assert_eq!(player, Vec2::new(638.0, 360.0));
    let delta = Vec2::new(638.0, 360.0) - Vec2::new(640.0, 200.0);
    let expected = Vec2::new(640.0, 200.0) + delta.normalize() * 1.5;
    assert!((enemy - expected).length() < EPS);
}

#[test]
fn projectile_and_enemy_removed_same_frame() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::enemy(Vec2::new(100.0, 100.0)),
        Entity::projectile(Vec2::new(80.0, 100.0), 0.0, 5.0),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    let report = sim.step(&idle()).unwrap();

    assert_eq!(report.hits, 1);
    assert_eq!(report.removed, 2);
    let r = sim.roster();
    assert_eq!(r.len(), 1);
    assert_eq!(r.count(EntityKind::Enemy), 0);
    assert_eq!(r.count(EntityKind::Projectile), 0);
    assert_eq!(sim.status(), GameStatus::Playing);
}

#[test]
fn enemy_touching_player_ends_game() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::enemy(Vec2::new(670.0, 360.0)),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    let report = sim.step(&idle()).unwrap();

    assert_eq!(report.hits, 1);
    assert_eq!(report.removed, 1);
    assert!(sim.roster().player().is_none());
    assert_eq!(sim.roster().count(EntityKind::Enemy), 1);
    assert_eq!(sim.status(), GameStatus::GameOver);
}

#[test]
fn stepping_without_player_is_an_error() {
    let roster = roster_of(vec![Entity::enemy(Vec2::new(100.0, 100.0))]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    assert_eq!(sim.status(), GameStatus::GameOver);
    let err = sim.step(&idle()).unwrap_err();
    assert!(matches!(err, ArenaError::PlayerMissing));
}

#[test]
fn failed_step_leaves_roster_untouched() {
    let roster = roster_of(vec![
        Entity::projectile(Vec2::new(10.0, 10.0), 0.0, 5.0),
        Entity::enemy(Vec2::new(100.0, 100.0)),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    assert!(matches!(sim.step(&idle()), Err(ArenaError::PlayerMissing)));
    assert_eq!(sim.frame(), 0);
    let shot = sim.roster().get(0).unwrap();
    assert!((shot.pos - Vec2::new(10.0, 10.0)).length() < EPS);
}

#[test]
fn projectiles_alone_need_no_player() {
    let roster = roster_of(vec![Entity::projectile(Vec2::new(10.0, 10.0), 0.0, 5.0)]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    assert!(sim.step(&idle()).is_ok());
}

// ── Firing through the loop ───────────────────────────────────────────────────

#[test]
fn spawned_projectile_not_updated_in_its_own_frame() {
    let mut sim = Simulation::new(Config::default());
    let report = sim.step(&idle().with_trigger(true)).unwrap();

    assert_eq!(report.spawned, 1);
    let bullet = sim.roster().get(2).unwrap();
    assert_eq!(bullet.kind(), EntityKind::Projectile);
    assert_eq!(bullet.pos, Vec2::new(640.0, 360.0));

    // Next frame it moves along the facing
    sim.step(&idle().with_trigger(true)).unwrap();
    let bullet = sim.roster().get(2).unwrap();
    assert!((bullet.pos - Vec2::new(645.0, 360.0)).length() < EPS);
}

#[test]
fn held_trigger_over_many_frames_spawns_once() {
    let mut sim = Simulation::new(Config::default());
    let held = idle().with_trigger(true);
    let spawned: usize = (0..8).map(|_| sim.step(&held).unwrap().spawned).sum();
    assert_eq!(spawned, 1);
    assert_eq!(sim.roster().count(EntityKind::Projectile), 1);

    sim.step(&idle()).unwrap();
    sim.step(&held).unwrap();
    assert_eq!(sim.roster().count(EntityKind::Projectile), 2);
}

#[test]
fn shot_at_enemy_kills_it() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::enemy(Vec2::new(1000.0, 360.0)),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());

    // Pointer right of the aim origin: fire along +x
    sim.step(&idle().with_trigger(true)).unwrap();
    let mut frames = 1;
    while sim.roster().count(EntityKind::Enemy) > 0 && frames < 200 {
        sim.step(&idle()).unwrap();
        frames += 1;
    }
    assert_eq!(sim.roster().count(EntityKind::Enemy), 0);
    assert_eq!(sim.roster().count(EntityKind::Projectile), 0);
    assert_eq!(sim.status(), GameStatus::Playing);
}

// ── Projectile culling ────────────────────────────────────────────────────────

#[test]
fn projectile_leaving_arena_is_culled() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::projectile(Vec2::new(1340.0, 360.0), 0.0, 5.0),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    let report = sim.step(&idle()).unwrap();
    assert_eq!(report.culled, 1);
    assert_eq!(report.removed, 1);
    assert_eq!(sim.roster().count(EntityKind::Projectile), 0);
}

#[test]
fn projectile_inside_margin_survives() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::projectile(Vec2::new(1300.0, 360.0), 0.0, 5.0),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    let report = sim.step(&idle()).unwrap();
    assert_eq!(report.culled, 0);
    assert_eq!(sim.roster().count(EntityKind::Projectile), 1);
}

#[test]
fn without_cull_margin_projectiles_live_forever() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::projectile(Vec2::new(640.0, 360.0), 0.0, 5.0),
    ]);
    let mut sim = Simulation::with_roster(roster, leaky_config());
    for _ in 0..1000 {
        sim.step(&idle()).unwrap();
    }
    let b = sim.roster().get(1).unwrap();
    assert!(b.pos.x > 5000.0);
    assert_eq!(sim.frame(), 1000);
}

// ── Frame driver ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingCanvas {
    clears: usize,
    circles: Vec<(f32, f32, f32, Color)>,
    lines: usize,
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.clears += 1;
        self.circles.clear();
        self.lines = 0;
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.circles.push((x, y, radius, color));
    }

    fn line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _color: Color, _thickness: f32) {
        self.lines += 1;
    }
}

/// Replays a fixed script of inputs, then reports shutdown.
struct ScriptedPlatform {
    script: VecDeque<FrameInput>,
    current: FrameInput,
    canvas: RecordingCanvas,
    presented: Vec<GameStatus>,
}

impl ScriptedPlatform {
    fn new(script: Vec<FrameInput>) -> Self {
        Self {
            script: script.into(),
            current: FrameInput::idle(),
            canvas: RecordingCanvas::default(),
            presented: Vec::new(),
        }
    }
}

impl Platform for ScriptedPlatform {
    type Input = FrameInput;
    type Canvas = RecordingCanvas;

    fn process_messages(&mut self) -> Result<bool> {
        match self.script.pop_front() {
            Some(input) => {
                self.current = input;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn input(&self) -> &FrameInput {
        &self.current
    }

    fn canvas(&mut self) -> &mut RecordingCanvas {
        &mut self.canvas
    }

    fn present(&mut self, status: GameStatus) -> Result<()> {
        self.presented.push(status);
        Ok(())
    }
}

#[test]
fn run_presents_one_frame_per_message_pump() {
    let mut sim = Simulation::new(Config::default());
    let mut platform = ScriptedPlatform::new(vec![idle(); 5]);
    let frames = run(&mut sim, &mut platform).unwrap();

    assert_eq!(frames, 5);
    assert_eq!(sim.frame(), 5);
    assert_eq!(platform.canvas.clears, 5);
    assert_eq!(platform.presented, vec![GameStatus::Playing; 5]);
    // Last frame drew player and enemy plus the aim line
    assert_eq!(platform.canvas.circles.len(), 2);
    assert_eq!(platform.canvas.lines, 1);
}

#[test]
fn run_stops_immediately_when_host_closes() {
    let mut sim = Simulation::new(Config::default());
    let mut platform = ScriptedPlatform::new(Vec::new());
    assert_eq!(run(&mut sim, &mut platform).unwrap(), 0);
    assert_eq!(sim.frame(), 0);
}

#[test]
fn run_freezes_roster_after_game_over() {
    let roster = roster_of(vec![
        Entity::player(Vec2::new(640.0, 360.0)),
        Entity::enemy(Vec2::new(670.0, 360.0)),
    ]);
    let mut sim = Simulation::with_roster(roster, Config::default());
    let mut platform = ScriptedPlatform::new(vec![idle(); 4]);
    let frames = run(&mut sim, &mut platform).unwrap();

    assert_eq!(frames, 4);
    // Only the first frame simulated; the rest just redraw
    assert_eq!(sim.frame(), 1);
    assert_eq!(
        platform.presented,
        vec![GameStatus::GameOver; 4]
    );
    assert_eq!(platform.canvas.circles.len(), 1);
    assert_eq!(platform.canvas.lines, 0);
}
