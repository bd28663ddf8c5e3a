/// Attack pattern engine.
///
/// Every shooter owns a shoot timer that only ever counts up. A pattern fires
/// on the ticks where `timer % interval == 0`, so a change of interval takes
/// effect at the next multiple of the *new* interval and never resets phase.
/// The functions here are pure: given the shooter's current state they
/// return the bullets to spawn this tick (usually none).

use std::f32::consts::PI;

use crate::entities::{Boss, Bullet, BulletKind, Difficulty, Enemy, EnemyKind, MagatamaBoss};

pub const HOSTILE_BULLET_SIZE: f32 = 6.0;
pub const ROTATING_BULLET_SIZE: f32 = 10.0;
/// Degrees per tick a spinning bullet turns.
pub const BULLET_SPIN: f32 = 8.0;
/// Degrees per tick an enhanced enemy turns.
pub const ENHANCED_SPIN: f32 = 5.0;
/// Offset added to the hard boss circle before each burst, so successive
/// bursts land in the previous burst's gaps.
pub const HARD_BOSS_ROTATION_STEP: f32 = 5.625;

const RAGE_VOLLEY_INTERVAL: u32 = 30;
const RAGE_PATTERN_PERIOD: u32 = 180;
const RAGE_STREAM_INTERVAL: u32 = 5;
const RAGE_STREAM_CYCLE: u32 = 360;

fn deg(d: f32) -> f32 {
    d * PI / 180.0
}

fn fires(timer: u32, interval: u32) -> bool {
    interval != 0 && timer % interval == 0
}

// ── Bullet constructors ───────────────────────────────────────────────────────

pub fn hostile_bullet(x: f32, y: f32, dx: f32, dy: f32) -> Bullet {
    Bullet {
        x,
        y,
        dx,
        dy,
        width: HOSTILE_BULLET_SIZE,
        height: HOSTILE_BULLET_SIZE,
        rotating: false,
        rotation: 0.0,
        kind: BulletKind::Enemy,
    }
}

pub fn spinning_bullet(x: f32, y: f32, dx: f32, dy: f32, rotation: f32) -> Bullet {
    Bullet {
        width: ROTATING_BULLET_SIZE,
        height: ROTATING_BULLET_SIZE,
        rotating: true,
        rotation,
        ..hostile_bullet(x, y, dx, dy)
    }
}

fn polar(x: f32, y: f32, angle: f32, speed: f32) -> Bullet {
    hostile_bullet(x, y, speed * angle.cos(), speed * angle.sin())
}

/// `count` bullets evenly spaced around a full circle, starting at `offset`
/// radians.
fn ring(x: f32, y: f32, count: u32, speed: f32, offset: f32) -> Vec<Bullet> {
    let step = 2.0 * PI / count as f32;
    (0..count)
        .map(|i| polar(x, y, offset + i as f32 * step, speed))
        .collect()
}

/// `count` bullets centred on `base`, `spread` radians apart.
fn fan(x: f32, y: f32, base: f32, count: u32, spread: f32, speed: f32) -> Vec<Bullet> {
    let mid = (count as f32 - 1.0) / 2.0;
    (0..count)
        .map(|i| polar(x, y, base + (i as f32 - mid) * spread, speed))
        .collect()
}

// ── Enemies ───────────────────────────────────────────────────────────────────

pub fn enemy_interval(kind: EnemyKind, difficulty: Difficulty) -> u32 {
    match (kind, difficulty) {
        (EnemyKind::Normal, Difficulty::Easy) => 300,
        (EnemyKind::Normal, Difficulty::Normal) => 180,
        (EnemyKind::Normal, Difficulty::Hard) => 80,
        (EnemyKind::Large, Difficulty::Easy) => 180,
        (EnemyKind::Large, Difficulty::Normal) => 120,
        (EnemyKind::Large, Difficulty::Hard) => 60,
        (EnemyKind::Enhanced, _) => 90,
    }
}

/// Bullets an enemy fires on its current `shoot_timer`.
pub fn enemy_volley(enemy: &Enemy, difficulty: Difficulty, target: (f32, f32)) -> Vec<Bullet> {
    if !fires(enemy.shoot_timer, enemy_interval(enemy.kind, difficulty)) {
        return Vec::new();
    }
    let cx = enemy.x + enemy.width / 2.0;
    let aim = (target.1 - enemy.y).atan2(target.0 - cx);
    match enemy.kind {
        EnemyKind::Normal => vec![polar(cx, enemy.y + enemy.height, aim, 3.0)],
        EnemyKind::Large => ring(cx, enemy.y + enemy.height / 2.0, 16, 2.0, 0.0),
        EnemyKind::Enhanced => {
            let cy = enemy.y + enemy.height / 2.0;
            (0..3)
                .map(|j| {
                    let a = aim + (j as f32 - 1.0) * 0.3;
                    spinning_bullet(cx, cy, 2.5 * a.cos(), 2.5 * a.sin(), enemy.rotation)
                })
                .collect()
        }
    }
}

// ── Single boss ───────────────────────────────────────────────────────────────

pub fn boss_interval(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 120,
        Difficulty::Normal => 90,
        Difficulty::Hard => 60,
    }
}

/// Rotation the boss must add to its offset before firing this tick.
pub fn boss_rotation_step(difficulty: Difficulty, timer: u32) -> f32 {
    if difficulty == Difficulty::Hard && fires(timer, boss_interval(difficulty)) {
        HARD_BOSS_ROTATION_STEP
    } else {
        0.0
    }
}

/// Bullets the boss fires on its current `shoot_timer`. On hard the caller
/// has already applied [`boss_rotation_step`].
pub fn boss_volley(boss: &Boss, difficulty: Difficulty, target: (f32, f32)) -> Vec<Bullet> {
    if !fires(boss.shoot_timer, boss_interval(difficulty)) {
        return Vec::new();
    }
    let cx = boss.x + boss.width / 2.0;
    let cy = boss.y + boss.height / 2.0;
    match difficulty {
        Difficulty::Easy => {
            let aim = (target.1 - boss.y).atan2(target.0 - cx);
            fan(cx, boss.y + boss.height, aim, 3, deg(20.0), 3.0)
        }
        Difficulty::Normal => ring(cx, cy, 16, 2.0, 0.0),
        Difficulty::Hard => ring(cx, cy, 32, 2.0, deg(boss.rotation)),
    }
}

// ── Twin boss ─────────────────────────────────────────────────────────────────

/// Which of the four rage patterns is current for `timer`.
pub fn rage_pattern_index(timer: u32) -> u32 {
    (timer / RAGE_PATTERN_PERIOD) % 4
}

/// Whether the fast aimed stream is live: first half of every 360-tick cycle.
pub fn rage_stream_active(timer: u32) -> bool {
    timer % RAGE_STREAM_CYCLE < RAGE_STREAM_CYCLE / 2
}

/// Bullets a sub-boss fires this tick. `arena` is the playfield size; the
/// caller skips sub-bosses that are dying or still travelling to their rage
/// position.
pub fn magatama_volley(unit: &MagatamaBoss, target: (f32, f32), arena: (f32, f32)) -> Vec<Bullet> {
    let timer = unit.shoot_timer;
    let cx = unit.x + unit.width / 2.0;
    let cy = unit.y + unit.height / 2.0;
    let aim = (target.1 - unit.y).atan2(target.0 - cx);

    if !unit.rage {
        if fires(timer, 90) {
            return fan(cx, cy, aim, 3, 0.2, 2.5);
        }
        return Vec::new();
    }

    let mut out = Vec::new();
    if fires(timer, RAGE_VOLLEY_INTERVAL) {
        match rage_pattern_index(timer) {
            0 => {
                let toward_center = (arena.1 / 2.0 - unit.y).atan2(arena.0 / 2.0 - cx);
                out.extend(fan(cx, cy, toward_center, 5, deg(22.5), 3.0));
            }
            1 => out.extend(ring(cx, cy, 8, 3.5, 0.0)),
            2 => {
                let spiral = ((timer * 15) % 360) as f32;
                out.extend((0..3).map(|i| polar(cx, cy, deg(spiral + i as f32 * 120.0), 2.5)));
            }
            _ => out.extend(fan(cx, cy, aim, 7, deg(15.0), 4.0)),
        }
    }
    if fires(timer, RAGE_STREAM_INTERVAL) && rage_stream_active(timer) {
        out.push(polar(cx, cy, aim, 8.0));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    fn enemy(kind: EnemyKind, timer: u32) -> Enemy {
        Enemy {
            x: 100.0,
            y: 100.0,
            width: 25.0,
            height: 25.0,
            speed: 2.0,
            hp: 1,
            kind,
            bullets: Pool::new(),
            shoot_timer: timer,
            rotation: 0.0,
        }
    }

    fn unit(timer: u32, rage: bool) -> MagatamaBoss {
        MagatamaBoss {
            x: 230.0,
            y: 30.0,
            width: 60.0,
            height: 60.0,
            hp: 30,
            max_hp: 30,
            bullets: Pool::new(),
            shoot_timer: timer,
            dying: false,
            rage,
            side: crate::entities::Side::Right,
            target_x: 260.0,
            target_y: 30.0,
            moving_to_rage: false,
            move_speed: 2.0,
        }
    }

    #[test]
    fn enemy_intervals_scale_with_difficulty() {
        assert_eq!(enemy_interval(EnemyKind::Normal, Difficulty::Easy), 300);
        assert_eq!(enemy_interval(EnemyKind::Normal, Difficulty::Hard), 80);
        assert_eq!(enemy_interval(EnemyKind::Large, Difficulty::Normal), 120);
        assert_eq!(enemy_interval(EnemyKind::Enhanced, Difficulty::Easy), 90);
    }

    #[test]
    fn normal_enemy_fires_only_on_multiples() {
        let target = (112.5, 400.0);
        assert!(enemy_volley(&enemy(EnemyKind::Normal, 179), Difficulty::Normal, target).is_empty());
        let shot = enemy_volley(&enemy(EnemyKind::Normal, 180), Difficulty::Normal, target);
        assert_eq!(shot.len(), 1);
        // Straight down at speed 3.
        assert!(shot[0].dx.abs() < 1e-4);
        assert!((shot[0].dy - 3.0).abs() < 1e-4);
        assert_eq!(shot[0].y, 125.0);
    }

    #[test]
    fn large_enemy_fires_sixteen_way_ring() {
        let shot = enemy_volley(&enemy(EnemyKind::Large, 60), Difficulty::Hard, (0.0, 0.0));
        assert_eq!(shot.len(), 16);
        for b in &shot {
            assert!(((b.dx * b.dx + b.dy * b.dy).sqrt() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn enhanced_enemy_fires_spinning_triplet() {
        let mut e = enemy(EnemyKind::Enhanced, 90);
        e.rotation = 450.0;
        let shot = enemy_volley(&e, Difficulty::Easy, (500.0, 500.0));
        assert_eq!(shot.len(), 3);
        assert!(shot.iter().all(|b| b.rotating && b.rotation == 450.0));
        assert!(shot.iter().all(|b| b.width == ROTATING_BULLET_SIZE));
    }

    #[test]
    fn hard_boss_rotates_before_each_burst() {
        assert_eq!(boss_rotation_step(Difficulty::Hard, 60), HARD_BOSS_ROTATION_STEP);
        assert_eq!(boss_rotation_step(Difficulty::Hard, 61), 0.0);
        assert_eq!(boss_rotation_step(Difficulty::Normal, 90), 0.0);
    }

    #[test]
    fn rage_cycle_walks_four_patterns() {
        assert_eq!(rage_pattern_index(0), 0);
        assert_eq!(rage_pattern_index(180), 1);
        assert_eq!(rage_pattern_index(360), 2);
        assert_eq!(rage_pattern_index(540), 3);
        assert_eq!(rage_pattern_index(720), 0);
    }

    #[test]
    fn calm_sub_boss_fires_triplet_every_ninety() {
        assert_eq!(magatama_volley(&unit(90, false), (260.0, 500.0), (520.0, 600.0)).len(), 3);
        assert!(magatama_volley(&unit(30, false), (260.0, 500.0), (520.0, 600.0)).is_empty());
    }

    #[test]
    fn rage_volley_includes_stream_in_first_half() {
        // Tick 30: pattern 0 (five bullets) plus one stream bullet.
        assert_eq!(magatama_volley(&unit(30, true), (260.0, 500.0), (520.0, 600.0)).len(), 6);
        // Tick 35: stream only.
        assert_eq!(magatama_volley(&unit(35, true), (260.0, 500.0), (520.0, 600.0)).len(), 1);
        // Tick 215: second half of the cycle, no volley and no stream.
        assert!(magatama_volley(&unit(215, true), (260.0, 500.0), (520.0, 600.0)).is_empty());
        // Tick 210: pattern 1 ring, stream off.
        assert_eq!(magatama_volley(&unit(210, true), (260.0, 500.0), (520.0, 600.0)).len(), 8);
    }
}
