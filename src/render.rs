//! Render pass: translates the roster into canvas calls. No game logic here.

use glam::Vec2;

use crate::config::Config;
use crate::entities::{Color, Roster};
use crate::host::Canvas;

pub const AIM_COLOR: Color = Color(0xffffff);
pub const AIM_THICKNESS: f32 = 5.0;

/// Draw every live entity in roster order. The player also gets an aim line
/// along its facing.
pub fn render(roster: &Roster, config: &Config, canvas: &mut impl Canvas) {
    for entity in roster.iter().filter(|e| e.is_alive()) {
        let pos = entity.pos;
        canvas.fill_circle(pos.x, pos.y, entity.radius(), entity.color());

        if let Some(facing) = entity.facing() {
            let tip = pos + Vec2::from_angle(facing) * config.aim_length;
            canvas.line(pos.x, pos.y, tip.x, tip.y, AIM_COLOR, AIM_THICKNESS);
        }
    }
}
