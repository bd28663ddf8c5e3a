/// Collision resolver, run once per tick after every population has moved.
///
/// Pairs are checked in a fixed order:
/// 1. player bullets × enemies
/// 2. player and special bullets × boss
/// 3. player and special bullets × twin sub-bosses
/// 4. hostile bullets and enhanced-enemy bodies × player (skipped while invincible)
/// 5. powerups × player
/// 6. apples × player
///
/// Pools are scanned from the back so removing the current element never
/// shifts one that is still to be visited. A bullet stops at its first hit,
/// and each player pool lands at most one hit per tick on the boss side.

use log::debug;
use rand::Rng;

use crate::boss::{hit_boss, hit_magatama};
use crate::bullets;
use crate::entities::{
    Bullet, BulletKind, EnemyKind, Explosion, ExplosionKind, GameState, GameStatus, PowerUp,
    PowerUpKind,
};
use crate::events::FrameEvent;
use crate::geometry::Rect;
use crate::player::{self, APPLE_HEAL};
use crate::pool::Pool;

pub const POWERUP_SIZE: f32 = 20.0;
pub const POWERUP_DROP_CHANCE: f64 = 0.5;

pub fn enemy_score(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Large => 500,
        EnemyKind::Enhanced => 300,
        EnemyKind::Normal => 100,
    }
}

/// Boss damage per bullet kind.
pub fn bullet_damage(kind: BulletKind) -> i32 {
    match kind {
        BulletKind::Special => 3,
        _ => 1,
    }
}

fn hit_spark(bullet: &Bullet) -> Explosion {
    match bullet.kind {
        BulletKind::Special => Explosion::new(bullet.x, bullet.y, 1.0, ExplosionKind::Special),
        _ => Explosion::new(bullet.x, bullet.y, 0.5, ExplosionKind::Normal),
    }
}

pub fn resolve(state: &mut GameState, rng: &mut impl Rng) {
    player_bullets_vs_enemies(state, rng);
    for pool in [PlayerPool::Normal, PlayerPool::Special] {
        player_bullets_vs_boss(state, pool);
        player_bullets_vs_twin(state, pool);
    }
    hostiles_vs_player(state);
    pickups_vs_player(state);
}

// ── Player fire ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum PlayerPool {
    Normal,
    Special,
}

fn player_pool(state: &mut GameState, pool: PlayerPool) -> &mut Pool<Bullet> {
    match pool {
        PlayerPool::Normal => &mut state.player_bullets,
        PlayerPool::Special => &mut state.special_bullets,
    }
}

fn player_bullets_vs_enemies(state: &mut GameState, rng: &mut impl Rng) {
    for bi in (0..state.player_bullets.len()).rev() {
        let Some(hitbox) = state.player_bullets.get(bi).map(Bullet::hitbox) else {
            continue;
        };
        let Some(ei) = (0..state.enemies.len())
            .rev()
            .find(|&ei| state.enemies.get(ei).map_or(false, |e| hitbox.overlaps(&e.rect())))
        else {
            continue;
        };

        state.player_bullets.remove(bi);
        let killed = match state.enemies.get_mut(ei) {
            Some(enemy) => {
                enemy.hp -= 1;
                enemy.hp <= 0
            }
            None => false,
        };
        if killed {
            destroy_enemy(state, ei, rng);
        }
    }
}

/// Remove a shot-down enemy: explosion, bullet hand-off, score, counter and
/// a possible powerup drop at its last position.
fn destroy_enemy(state: &mut GameState, index: usize, rng: &mut impl Rng) {
    let mut enemy = state.enemies.remove(index);
    let (cx, cy) = enemy.rect().center();
    state.explosions.spawn(Explosion::new(cx, cy, 1.0, ExplosionKind::Normal));
    bullets::release(&mut enemy.bullets, &mut state.independent_bullets);

    let score = enemy_score(enemy.kind);
    state.score += score;
    state.defeated_enemies += 1;
    state.events.push(FrameEvent::EnemyDestroyed { kind: enemy.kind, score });

    if rng.gen_bool(POWERUP_DROP_CHANCE) {
        let kind = if rng.gen_bool(0.5) { PowerUpKind::Speed } else { PowerUpKind::Hp };
        state.powerups.spawn(PowerUp {
            x: cx - POWERUP_SIZE / 2.0,
            y: cy - POWERUP_SIZE / 2.0,
            width: POWERUP_SIZE,
            height: POWERUP_SIZE,
            kind,
        });
    }
}

fn player_bullets_vs_boss(state: &mut GameState, pool: PlayerPool) {
    let Some(rect) = state.boss.as_ref().filter(|b| !b.is_dying()).map(|b| b.rect()) else {
        return;
    };
    let bullets = player_pool(state, pool);
    let Some(bi) = (0..bullets.len())
        .rev()
        .find(|&i| bullets.get(i).map_or(false, |b| b.hitbox().overlaps(&rect)))
    else {
        return;
    };
    let bullet = bullets.remove(bi);
    if let Some(boss) = state.boss.as_mut() {
        hit_boss(boss, bullet_damage(bullet.kind));
    }
    state.explosions.spawn(hit_spark(&bullet));
}

/// The first bullet (from the back) touching a live sub-boss lands; the rest
/// of the pool waits for the next tick.
fn player_bullets_vs_twin(state: &mut GameState, pool: PlayerPool) {
    if !state.twin_boss.as_ref().map_or(false, |t| !t.dying) {
        return;
    }
    for bi in (0..player_pool(state, pool).len()).rev() {
        let Some(bullet) = player_pool(state, pool).get(bi).cloned() else {
            continue;
        };
        let hitbox = bullet.hitbox();
        let Some(twin) = state.twin_boss.as_mut() else {
            return;
        };
        let Some(unit) = twin
            .units
            .iter_mut()
            .find(|u| !u.dying && hitbox.overlaps(&u.rect()))
        else {
            continue;
        };
        hit_magatama(unit, bullet_damage(bullet.kind));
        player_pool(state, pool).remove(bi);
        state.explosions.spawn(hit_spark(&bullet));
        return;
    }
}

// ── Hostile fire ──────────────────────────────────────────────────────────────

/// Remove the first bullet (from the back) that overlaps `target`.
fn take_first_hit(bullets: &mut Pool<Bullet>, target: &Rect) -> bool {
    match (0..bullets.len())
        .rev()
        .find(|&i| bullets.get(i).map_or(false, |b| b.hitbox().overlaps(target)))
    {
        Some(i) => {
            bullets.remove(i);
            true
        }
        None => false,
    }
}

/// Whether anything hostile touches the player this tick. Every bullet
/// source gives up at most one colliding bullet; sub-bosses that are down,
/// or a twin boss in its death sequence, are skipped.
fn hostile_hit(state: &mut GameState, target: &Rect) -> bool {
    let mut hit = false;
    for enemy in state.enemies.iter_mut() {
        hit |= take_first_hit(&mut enemy.bullets, target);
    }
    if let Some(boss) = state.boss.as_mut() {
        hit |= take_first_hit(&mut boss.bullets, target);
    }
    if let Some(twin) = state.twin_boss.as_mut().filter(|t| !t.dying) {
        for unit in twin.units.iter_mut().filter(|u| !u.dying) {
            hit |= take_first_hit(&mut unit.bullets, target);
        }
    }
    hit |= take_first_hit(&mut state.independent_bullets, target);
    hit |= take_first_hit(&mut state.hard_bullets, target);
    hit || state
        .enemies
        .iter()
        .any(|e| e.kind == EnemyKind::Enhanced && e.rect().overlaps(target))
}

/// One life at most per tick, however many sources collided.
fn hostiles_vs_player(state: &mut GameState) {
    if state.player.invincible {
        return;
    }
    let target = state.player.rect();
    if !hostile_hit(state, &target) {
        return;
    }
    let dead = player::take_damage(&mut state.player, &state.config);
    state.events.push(FrameEvent::PlayerDamaged { lives: state.player.lives });
    if dead {
        debug!("player out of lives at score {}", state.score);
        state.status = GameStatus::GameOver;
    }
}

// ── Pickups ───────────────────────────────────────────────────────────────────

fn pickups_vs_player(state: &mut GameState) {
    let target = state.player.rect();

    for pi in (0..state.powerups.len()).rev() {
        if state.powerups.get(pi).map_or(false, |p| p.rect().overlaps(&target)) {
            let powerup = state.powerups.remove(pi);
            player::apply_powerup(&mut state.player, powerup.kind);
            state.events.push(FrameEvent::PowerUpCollected { kind: powerup.kind });
        }
    }

    for ai in (0..state.apples.len()).rev() {
        if state.apples.get(ai).map_or(false, |a| a.rect().overlaps(&target)) {
            state.apples.remove(ai);
            player::heal(&mut state.player, APPLE_HEAL);
            state.events.push(FrameEvent::AppleCollected { lives: state.player.lives });
        }
    }
}
