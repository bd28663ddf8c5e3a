/// Player controller: movement, fire gating, invincibility and damage.

use crate::config::GameConfig;
use crate::entities::{Bullet, BulletKind, Player, PowerUpKind, SessionParams, ShipType};
use crate::input::Controls;

pub const PLAYER_WIDTH: f32 = 30.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const MAX_LIVES: u32 = 10;
pub const SPEED_BOOST: f32 = 1.5;
pub const APPLE_HEAL: u32 = 3;

pub const HEAVY_FIRE_INTERVAL_MS: u64 = 500;
pub const SPREAD_FIRE_INTERVAL_MS: u64 = 200;
/// Degrees between neighbouring bullets of the spread fan.
pub const SPREAD_FAN_STEP: f32 = 15.0;
const MAX_FAN: u32 = 10;
const PLAYER_BULLET_SPEED: f32 = 8.0;
const FAN_SIDE_SPEED: f32 = 3.0;

pub fn new_player(session: &SessionParams, config: &GameConfig) -> Player {
    Player {
        x: config.playfield_width / 2.0,
        y: config.playfield_height - 80.0,
        width: PLAYER_WIDTH,
        height: PLAYER_HEIGHT,
        speed: config.base_player_speed,
        base_speed: config.base_player_speed,
        ship: session.ship,
        lives: session.starting_lives(),
        invincible: false,
        invincible_timer: 0,
        last_shot_ms: None,
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Digital and analog input both push the ship; the result is clamped to
/// the playfield.
pub fn apply_movement(player: &mut Player, controls: &Controls, config: &GameConfig) {
    let vx = (controls.digital_x + controls.stick_x) * player.speed;
    let vy = (controls.digital_y + controls.stick_y) * player.speed;
    player.x = (player.x + vx).clamp(0.0, config.playfield_width - player.width);
    player.y = (player.y + vy).clamp(0.0, config.playfield_height - player.height);
}

// ── Firing ────────────────────────────────────────────────────────────────────

fn player_bullet(x: f32, y: f32, dx: f32, dy: f32) -> Bullet {
    Bullet {
        x,
        y,
        dx,
        dy,
        width: 4.0,
        height: 8.0,
        rotating: false,
        rotation: 0.0,
        kind: BulletKind::Player,
    }
}

fn special_bullet(x: f32, y: f32) -> Bullet {
    Bullet {
        width: 6.0,
        height: 6.0,
        kind: BulletKind::Special,
        ..player_bullet(x, y, 0.0, -PLAYER_BULLET_SPEED)
    }
}

fn gate_open(last: Option<u64>, now_ms: u64, interval: u64) -> bool {
    last.map_or(true, |t| now_ms.saturating_sub(t) >= interval)
}

/// Bullets produced by holding fire at `now_ms`. The caller routes
/// [`BulletKind::Special`] bullets to the special pool and the rest to the
/// player pool.
pub fn try_fire(player: &mut Player, fire_held: bool, now_ms: u64) -> Vec<Bullet> {
    if !fire_held {
        return Vec::new();
    }
    let cx = player.x + player.width / 2.0;
    let y = player.y;

    match player.ship {
        ShipType::Rapid => vec![player_bullet(cx, y, 0.0, -PLAYER_BULLET_SPEED)],
        ShipType::Heavy => {
            if !gate_open(player.last_shot_ms, now_ms, HEAVY_FIRE_INTERVAL_MS) {
                return Vec::new();
            }
            player.last_shot_ms = Some(now_ms);
            vec![special_bullet(cx, y)]
        }
        ShipType::Spread => {
            if !gate_open(player.last_shot_ms, now_ms, SPREAD_FIRE_INTERVAL_MS) {
                return Vec::new();
            }
            player.last_shot_ms = Some(now_ms);
            let count = player.lives.min(MAX_FAN);
            if count <= 1 {
                return vec![player_bullet(cx, y, 0.0, -PLAYER_BULLET_SPEED)];
            }
            let mid = (count as f32 - 1.0) / 2.0;
            (0..count)
                .map(|i| {
                    let a = ((i as f32 - mid) * SPREAD_FAN_STEP).to_radians();
                    player_bullet(cx, y, FAN_SIDE_SPEED * a.sin(), -PLAYER_BULLET_SPEED * a.cos())
                })
                .collect()
        }
    }
}

// ── Per-tick state ────────────────────────────────────────────────────────────

pub fn tick(player: &mut Player) {
    if player.invincible {
        player.invincible_timer = player.invincible_timer.saturating_sub(1);
        if player.invincible_timer == 0 {
            player.invincible = false;
        }
    }
}

/// Apply one hit. Returns `true` when the hit landed and left the player
/// with no lives. Hits during invincibility are ignored.
pub fn take_damage(player: &mut Player, config: &GameConfig) -> bool {
    if player.invincible {
        return false;
    }
    player.invincible = true;
    player.invincible_timer = config.invincibility_ticks;
    player.lives = player.lives.saturating_sub(1);
    player.lives == 0
}

/// Blink phase during invincibility; the front end skips hidden frames.
pub fn visible(player: &Player) -> bool {
    !(player.invincible && (player.invincible_timer / 5) % 2 == 0)
}

pub fn heal(player: &mut Player, amount: u32) {
    player.lives = (player.lives + amount).min(MAX_LIVES);
}

pub fn apply_powerup(player: &mut Player, kind: PowerUpKind) {
    match kind {
        // Re-applies the same multiplier; never stacks.
        PowerUpKind::Speed => player.speed = (player.base_speed * SPEED_BOOST).floor(),
        PowerUpKind::Hp => heal(player, 1),
    }
}
