/// Grenades: throw, flight, fuse, detonation.
///
/// A throw costs one grenade from the inventory and launches three at once
/// toward fixed points of the playfield. Each flies for 30 ticks, sits for a
/// 42-tick fuse, then detonates exactly once.

use log::debug;

use crate::boss::{grenade_damage, hit_boss, hit_magatama};
use crate::bullets;
use crate::entities::{Explosion, ExplosionKind, GameState, Grenade};
use crate::events::FrameEvent;

pub const TRAVEL_TICKS: u32 = 30;
pub const FUSE_TICKS: u32 = 42;
/// Score for each enemy a blast wipes out, regardless of kind.
pub const BLAST_ENEMY_SCORE: u32 = 100;
const GRENADE_SPIN: f32 = 8.0;

/// Landing points relative to the playfield size.
pub fn targets(width: f32, height: f32) -> [(f32, f32); 3] {
    [
        (width / 2.0 + 100.0, height / 3.0),
        (width / 2.0 - 100.0, height / 3.0),
        (width / 2.0, height / 2.0 + 100.0),
    ]
}

/// Launch a volley from the player's centre. Returns `false` when the throw
/// was refused: the inventory is empty, or a boss is present and only the
/// last grenade is left.
pub fn throw_grenades(state: &mut GameState) -> bool {
    if state.grenade_count == 0 {
        return false;
    }
    if state.boss_present() && state.grenade_count <= 1 {
        return false;
    }
    state.grenade_count -= 1;

    let (px, py) = state.player.center();
    let travel = TRAVEL_TICKS as f32;
    for (tx, ty) in targets(state.config.playfield_width, state.config.playfield_height) {
        state.grenades.spawn(Grenade {
            x: px,
            y: py,
            start_x: px,
            start_y: py,
            target_x: tx,
            target_y: ty,
            timer: 0,
            move_time: TRAVEL_TICKS,
            dx: (tx - px) / travel,
            dy: (ty - py) / travel,
            arrived: false,
            arrival_timer: 0,
            fuse: FUSE_TICKS,
            rotation: 0.0,
        });
    }
    debug!("grenades thrown, {} left", state.grenade_count);
    state.events.push(FrameEvent::GrenadesThrown { remaining: state.grenade_count });
    true
}

pub fn update_grenades(state: &mut GameState) {
    let mut detonations = Vec::new();
    state.grenades.update(|g| {
        g.timer += 1;
        g.rotation += GRENADE_SPIN;
        if g.timer <= g.move_time {
            g.x += g.dx;
            g.y += g.dy;
        } else if !g.arrived {
            g.arrived = true;
            g.x = g.target_x;
            g.y = g.target_y;
        } else {
            g.arrival_timer += 1;
        }

        if g.arrived && g.arrival_timer >= g.fuse {
            detonations.push((g.target_x, g.target_y));
            return false;
        }
        true
    });

    for target in detonations {
        detonate(state, target);
    }
}

/// Blast damage. Boss branches no-op when the boss is already gone or dying.
pub fn detonate(state: &mut GameState, target: (f32, f32)) {
    if let Some(boss) = state.boss.as_mut() {
        if !boss.is_dying() {
            hit_boss(boss, grenade_damage(boss.max_hp));
            let (cx, cy) = boss.rect().center();
            state.explosions.spawn(Explosion::new(cx, cy, 8.0, ExplosionKind::Special));
        }
    }

    if let Some(twin) = state.twin_boss.as_mut() {
        if !twin.dying {
            for unit in twin.units.iter_mut().filter(|u| !u.dying) {
                hit_magatama(unit, grenade_damage(unit.max_hp));
                let (cx, cy) = unit.rect().center();
                state.explosions.spawn(Explosion::new(cx, cy, 6.0, ExplosionKind::Special));
            }
        }
    }

    for mut enemy in state.enemies.drain() {
        bullets::release(&mut enemy.bullets, &mut state.independent_bullets);
        state.score += BLAST_ENEMY_SCORE;
        state.events.push(FrameEvent::EnemyDestroyed { kind: enemy.kind, score: BLAST_ENEMY_SCORE });
    }

    state
        .explosions
        .spawn(Explosion::new(target.0, target.1, 5.0, ExplosionKind::Grenade));
    state.events.push(FrameEvent::GrenadeDetonated);
}
