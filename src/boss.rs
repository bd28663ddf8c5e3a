/// Boss state machines.
///
/// Single boss: `Active → Dying → removed`. The dying phase fires one
/// explosion every 30 ticks and is removed right after the fifth.
///
/// Twin boss: two magatama sub-bosses. When one falls the survivor enrages
/// (once), flies to the top centre and switches to the rage pattern cycle.
/// When both are down the pair hands its bullets off, plays a 60-tick
/// explosion sequence and is removed.

use log::debug;
use rand::Rng;

use crate::bullets;
use crate::config::GameConfig;
use crate::entities::{
    Boss, BossPhase, Explosion, ExplosionKind, GameState, MagatamaBoss, Side, TwinBoss,
};
use crate::events::FrameEvent;
use crate::patterns;
use crate::pool::Pool;

pub const BOSS_SIZE: f32 = 80.0;
pub const BOSS_HP: i32 = 20;
pub const MAGATAMA_SIZE: f32 = 60.0;
pub const MAGATAMA_HP: i32 = 30;
pub const BOSS_SCORE: u32 = 5000;
pub const BOSS_GRENADE_REWARD: u32 = 2;

const DEATH_PULSE_INTERVAL: u32 = 30;
const DEATH_PULSES: u32 = 5;
const TWIN_DEATH_TICKS: u32 = 60;
const TWIN_PULSE_INTERVAL: u32 = 15;
const RAGE_SPEED: f32 = 2.0;
const RAGE_TARGET_Y: f32 = 30.0;
/// Distance at which a travelling sub-boss counts as arrived.
const RAGE_ARRIVAL: f32 = 2.0;

// ── Construction ──────────────────────────────────────────────────────────────

pub fn new_boss(config: &GameConfig) -> Boss {
    Boss {
        x: config.playfield_width / 2.0 - BOSS_SIZE / 2.0,
        y: 50.0,
        width: BOSS_SIZE,
        height: BOSS_SIZE,
        speed: 1.0,
        hp: BOSS_HP,
        max_hp: BOSS_HP,
        bullets: Pool::new(),
        shoot_timer: 0,
        rotation: 0.0,
        phase: BossPhase::Active,
    }
}

fn new_magatama(x: f32, y: f32, side: Side) -> MagatamaBoss {
    MagatamaBoss {
        x,
        y,
        width: MAGATAMA_SIZE,
        height: MAGATAMA_SIZE,
        hp: MAGATAMA_HP,
        max_hp: MAGATAMA_HP,
        bullets: Pool::new(),
        shoot_timer: 0,
        dying: false,
        rage: false,
        side,
        target_x: x,
        target_y: RAGE_TARGET_Y,
        moving_to_rage: false,
        move_speed: RAGE_SPEED,
    }
}

pub fn new_twin_boss(config: &GameConfig) -> TwinBoss {
    let w = config.playfield_width;
    TwinBoss {
        units: [
            new_magatama(w * 0.7, 80.0, Side::Right),
            new_magatama(w * 0.3, 80.0, Side::Left),
        ],
        dying: false,
        death_timer: 0,
        bullets_saved: false,
    }
}

// ── Damage ────────────────────────────────────────────────────────────────────

/// Grenade damage: a fifth of max hp, rounded down.
pub fn grenade_damage(max_hp: i32) -> i32 {
    max_hp / 5
}

/// Damage an active boss, flooring hp at zero; reaching zero starts the
/// dying sequence. Dying bosses ignore further hits.
pub fn hit_boss(boss: &mut Boss, amount: i32) {
    if boss.is_dying() {
        return;
    }
    boss.hp = (boss.hp - amount).max(0);
    if boss.hp == 0 {
        debug!("boss down, starting death sequence");
        boss.phase = BossPhase::Dying { timer: 0, explosions: 0 };
    }
}

/// Damage a live sub-boss; at zero it is dying immediately.
pub fn hit_magatama(unit: &mut MagatamaBoss, amount: i32) {
    if unit.dying {
        return;
    }
    unit.hp = (unit.hp - amount).max(0);
    if unit.hp == 0 {
        debug!("magatama {:?} down", unit.side);
        unit.dying = true;
    }
}

/// Rewards shared by both boss kinds, applied on removal.
fn award_defeat(state: &mut GameState) {
    state.score += BOSS_SCORE;
    state.grenade_count += BOSS_GRENADE_REWARD;
    state.bosses_defeated += 1;
    state.defeated_enemies = 0;
    debug!("boss defeated (total {})", state.bosses_defeated);
    state.events.push(FrameEvent::BossDefeated { bosses_defeated: state.bosses_defeated });
}

// ── Single boss ───────────────────────────────────────────────────────────────

pub fn update_boss(state: &mut GameState, rng: &mut impl Rng) {
    let target = state.player.center();
    let difficulty = state.difficulty;
    let config = &state.config;
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    match boss.phase {
        BossPhase::Active => {
            boss.x += boss.speed;
            if boss.x <= 0.0 || boss.x >= config.playfield_width - boss.width {
                boss.speed = -boss.speed;
            }
            boss.shoot_timer += 1;
            boss.rotation += patterns::boss_rotation_step(difficulty, boss.shoot_timer);
            let volley = patterns::boss_volley(boss, difficulty, target);
            boss.bullets.extend(volley);
        }
        BossPhase::Dying { timer, explosions } => {
            let timer = timer + 1;
            let mut explosions = explosions;
            if timer % DEATH_PULSE_INTERVAL == 0 && explosions < DEATH_PULSES {
                explosions += 1;
                let ex = boss.x + rng.gen::<f32>() * boss.width;
                let ey = boss.y + rng.gen::<f32>() * boss.height;
                state
                    .explosions
                    .spawn(Explosion::new(ex, ey, 2.0 + explosions as f32, ExplosionKind::Normal));
            }
            boss.phase = BossPhase::Dying { timer, explosions };

            if explosions >= DEATH_PULSES {
                if let Some(mut boss) = state.boss.take() {
                    bullets::release(&mut boss.bullets, &mut state.independent_bullets);
                }
                award_defeat(state);
                return;
            }
        }
    }

    bullets::advance(&mut boss.bullets, config);
}

// ── Twin boss ─────────────────────────────────────────────────────────────────

fn enter_rage(unit: &mut MagatamaBoss, config: &GameConfig, events: &mut Vec<FrameEvent>) {
    unit.rage = true;
    unit.moving_to_rage = true;
    unit.target_x = config.playfield_width / 2.0;
    unit.target_y = RAGE_TARGET_Y;
    debug!("magatama {:?} enraged", unit.side);
    events.push(FrameEvent::RageTriggered { side: unit.side });
}

fn update_magatama(unit: &mut MagatamaBoss, target: (f32, f32), config: &GameConfig) {
    if unit.dying {
        return;
    }
    unit.shoot_timer += 1;

    if unit.rage && unit.moving_to_rage {
        let dx = unit.target_x - unit.x;
        let dy = unit.target_y - unit.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > RAGE_ARRIVAL {
            unit.x += dx / distance * unit.move_speed;
            unit.y += dy / distance * unit.move_speed;
        } else {
            unit.moving_to_rage = false;
        }
    }

    if !unit.moving_to_rage {
        let arena = (config.playfield_width, config.playfield_height);
        let volley = patterns::magatama_volley(unit, target, arena);
        unit.bullets.extend(volley);
    }
}

pub fn update_twin_boss(state: &mut GameState, rng: &mut impl Rng) {
    let target = state.player.center();
    let config = &state.config;
    let Some(twin) = state.twin_boss.as_mut() else {
        return;
    };

    if !twin.dying {
        for unit in twin.units.iter_mut() {
            update_magatama(unit, target, config);
        }

        let [a, b] = &mut twin.units;
        if a.dying && !b.dying && !b.rage {
            enter_rage(b, config, &mut state.events);
        } else if b.dying && !a.dying && !a.rage {
            enter_rage(a, config, &mut state.events);
        }

        if twin.units.iter().all(|u| u.dying) {
            debug!("twin boss down, starting death sequence");
            twin.dying = true;
            twin.death_timer = 0;
        }
    } else {
        twin.death_timer += 1;

        if !twin.bullets_saved {
            for unit in twin.units.iter_mut() {
                bullets::release(&mut unit.bullets, &mut state.independent_bullets);
            }
            twin.bullets_saved = true;
        }

        if twin.death_timer % TWIN_PULSE_INTERVAL == 1 && twin.death_timer < TWIN_DEATH_TICKS {
            let ex = config.playfield_width / 2.0 + (rng.gen::<f32>() * 80.0 - 40.0);
            let ey = 100.0 + (rng.gen::<f32>() * 40.0 - 20.0);
            state.explosions.spawn(Explosion::new(ex, ey, 3.0, ExplosionKind::Normal));
        }

        if twin.death_timer >= TWIN_DEATH_TICKS {
            state.twin_boss = None;
            award_defeat(state);
            return;
        }
    }

    if !twin.dying {
        for unit in twin.units.iter_mut() {
            bullets::advance(&mut unit.bullets, config);
        }
    }
}
