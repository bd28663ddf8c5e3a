/// Enemy, boss and apple spawn scheduling.
///
/// Nothing hostile spawns while a boss is on the field. Otherwise the boss
/// appears once enough enemies have been destroyed this cycle, and in
/// between one enemy arrives every 120 ticks. Apples run on their own clock.

use log::debug;
use rand::Rng;

use crate::boss::{new_boss, new_twin_boss};
use crate::entities::{Apple, Enemy, EnemyKind, GameState};
use crate::events::FrameEvent;
use crate::pool::Pool;

pub const ENEMY_SPAWN_INTERVAL: u32 = 120;
pub const FIRST_BOSS_THRESHOLD: u32 = 15;
pub const LATER_BOSS_THRESHOLD: u32 = 30;
pub const APPLE_SIZE: f32 = 25.0;

pub fn boss_threshold(bosses_defeated: u32) -> u32 {
    if bosses_defeated == 0 {
        FIRST_BOSS_THRESHOLD
    } else {
        LATER_BOSS_THRESHOLD
    }
}

/// Width, height, fall speed and hp.
pub fn enemy_stats(kind: EnemyKind) -> (f32, f32, f32, i32) {
    match kind {
        EnemyKind::Normal => (25.0, 25.0, 2.0, 1),
        EnemyKind::Large => (40.0, 40.0, 1.0, 3),
        EnemyKind::Enhanced => (35.0, 25.0, 1.5, 2),
    }
}

/// Enemy entering from just above the top edge at `x`.
pub fn new_enemy(kind: EnemyKind, x: f32) -> Enemy {
    let (width, height, speed, hp) = enemy_stats(kind);
    Enemy {
        x,
        y: -height,
        width,
        height,
        speed,
        hp,
        kind,
        bullets: Pool::new(),
        shoot_timer: 0,
        rotation: 0.0,
    }
}

/// After the first boss half of all spawns are enhanced; before that every
/// third spawn is large.
pub fn choose_enemy_kind(bosses_defeated: u32, spawn_count: u32, rng: &mut impl Rng) -> EnemyKind {
    if bosses_defeated > 0 && rng.gen_bool(0.5) {
        EnemyKind::Enhanced
    } else if spawn_count % 3 == 0 {
        EnemyKind::Large
    } else {
        EnemyKind::Normal
    }
}

/// The second boss of a session is always the twin boss.
pub fn spawn_boss(state: &mut GameState) {
    if state.bosses_defeated == 1 {
        state.twin_boss = Some(new_twin_boss(&state.config));
        debug!("twin boss spawned");
        state.events.push(FrameEvent::BossSpawned { twin: true });
    } else {
        state.boss = Some(new_boss(&state.config));
        debug!("boss spawned (cycle {})", state.bosses_defeated + 1);
        state.events.push(FrameEvent::BossSpawned { twin: false });
    }
}

pub fn update(state: &mut GameState, rng: &mut impl Rng) {
    if state.boss_present() {
        return;
    }

    if state.defeated_enemies >= boss_threshold(state.bosses_defeated) {
        spawn_boss(state);
        return;
    }

    state.enemy_spawn_timer += 1;
    if state.enemy_spawn_timer >= ENEMY_SPAWN_INTERVAL {
        state.enemy_spawn_timer = 0;
        state.enemies_spawned += 1;
        let kind = choose_enemy_kind(state.bosses_defeated, state.enemies_spawned, rng);
        let (width, ..) = enemy_stats(kind);
        let x = rng.gen_range(0.0..(state.config.playfield_width - width));
        state.enemies.spawn(new_enemy(kind, x));
    }
}

/// Drop an apple from above the playfield every `apple_interval` ticks,
/// bosses or not.
pub fn update_apples(state: &mut GameState, rng: &mut impl Rng) {
    state.apple_timer += 1;
    if state.apple_timer < state.config.apple_interval {
        return;
    }
    state.apple_timer = 0;
    let x = rng.gen_range(0.0..(state.config.playfield_width - APPLE_SIZE));
    state.apples.spawn(Apple { x, y: -APPLE_SIZE, width: APPLE_SIZE, height: APPLE_SIZE });
}
