/// Hard-difficulty event timeline: every 1200 ticks one half of the
/// playfield is flagged for 300 ticks, then swept by a 120-bullet barrage
/// from its top and bottom edges.

use log::debug;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bullet, BulletKind, Difficulty, GameState, Side};
use crate::events::FrameEvent;
use crate::patterns::hostile_bullet;

pub const ATTACK_PERIOD: u32 = 1200;
pub const WARNING_TICKS: u32 = 300;
pub const BARRAGE_SIZE: usize = 120;
/// Spawn distance outside the top and bottom edges.
const EDGE_OFFSET: f32 = 20.0;

pub fn update(state: &mut GameState, rng: &mut impl Rng) {
    if state.difficulty != Difficulty::Hard {
        return;
    }
    let timeline = &mut state.hard_mode;
    timeline.timer += 1;

    if timeline.timer % ATTACK_PERIOD == 0 {
        let side = if rng.gen_bool(0.5) { Side::Left } else { Side::Right };
        timeline.warning_active = true;
        timeline.warning_timer = 0;
        timeline.warning_side = Some(side);
        debug!("hard-mode warning on {side:?}");
        state.events.push(FrameEvent::HardWarning { side });
    }

    if timeline.warning_active {
        timeline.warning_timer += 1;
        if timeline.warning_timer >= WARNING_TICKS {
            timeline.warning_active = false;
            if let Some(side) = timeline.warning_side {
                let barrage = barrage(side, &state.config, rng);
                state.hard_bullets.extend(barrage);
                debug!("hard-mode barrage on {side:?}");
                state.events.push(FrameEvent::HardBarrage { side });
            }
        }
    }
}

/// Half of the bullets drop from above the top edge, half rise from below
/// the bottom edge, all within the flagged half.
pub fn barrage(side: Side, config: &GameConfig, rng: &mut impl Rng) -> Vec<Bullet> {
    let half = config.playfield_width / 2.0;
    let x0 = match side {
        Side::Left => 0.0,
        Side::Right => half,
    };
    (0..BARRAGE_SIZE)
        .map(|i| {
            let x = x0 + rng.gen::<f32>() * half;
            let dx = rng.gen::<f32>() * 2.0 - 1.0;
            let speed = 2.0 + rng.gen::<f32>() * 3.0;
            let (y, dy) = if i < BARRAGE_SIZE / 2 {
                (-EDGE_OFFSET, speed)
            } else {
                (config.playfield_height + EDGE_OFFSET, -speed)
            };
            Bullet { kind: BulletKind::Hard, ..hostile_bullet(x, y, dx, dy) }
        })
        .collect()
}
