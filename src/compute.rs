/// Per-tick orchestration.
///
/// `tick` mutates the session's `GameState` in place. Every source of
/// randomness comes through the injected `rng`, so a seeded RNG and a fixed
/// input script replay a session exactly.

use log::{debug, trace};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    BulletKind, EnemyKind, GameState, GameStatus, HardModeTimeline, SessionParams,
};
use crate::events::SceneTransition;
use crate::input::{EdgeTracker, InputSnapshot};
use crate::pool::Pool;
use crate::{boss, bullets, collision, grenade, hard_mode, patterns, player, spawner};

pub const STARTING_GRENADES: u32 = 2;
pub const POWERUP_FALL_SPEED: f32 = 2.2;
pub const APPLE_FALL_SPEED: f32 = 2.5;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh session state. `high_score` carries the best score of earlier
/// sessions in this process.
pub fn init_state(session: SessionParams, config: GameConfig, high_score: u32) -> GameState {
    let player = player::new_player(&session, &config);
    GameState {
        ship: session.ship,
        difficulty: session.difficulty,
        status: GameStatus::Playing,
        player,
        player_bullets: Pool::new(),
        special_bullets: Pool::new(),
        independent_bullets: Pool::new(),
        hard_bullets: Pool::new(),
        enemies: Pool::new(),
        boss: None,
        twin_boss: None,
        explosions: Pool::new(),
        powerups: Pool::new(),
        apples: Pool::new(),
        grenades: Pool::new(),
        hard_mode: HardModeTimeline::default(),
        score: 0,
        high_score,
        defeated_enemies: 0,
        bosses_defeated: 0,
        grenade_count: STARTING_GRENADES,
        enemy_spawn_timer: 0,
        enemies_spawned: 0,
        apple_timer: 0,
        start_countdown: config.start_countdown,
        frame: 0,
        edges: EdgeTracker::default(),
        events: Vec::new(),
        config,
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one tick. Returns a transition when the game
/// scene should end: the player ran out of lives, or asked for the menu.
pub fn tick(
    state: &mut GameState,
    input: &InputSnapshot,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Option<SceneTransition> {
    state.events.clear();
    if state.status == GameStatus::GameOver {
        return None;
    }
    let controls = state.edges.resolve(input);

    // ── 1. Start countdown ───────────────────────────────────────────────────
    if state.start_countdown > 0 {
        state.start_countdown -= 1;
        return None;
    }
    state.frame += 1;

    // ── 2. Player input ──────────────────────────────────────────────────────
    player::apply_movement(&mut state.player, &controls, &state.config);
    for bullet in player::try_fire(&mut state.player, controls.fire, now_ms) {
        match bullet.kind {
            BulletKind::Special => state.special_bullets.spawn(bullet),
            _ => state.player_bullets.spawn(bullet),
        }
    }

    if controls.summon_pressed {
        if state.boss_present() {
            grenade::throw_grenades(state);
        } else {
            debug!("boss summoned by input");
            spawner::spawn_boss(state);
        }
    }
    if controls.grenade_pressed {
        grenade::throw_grenades(state);
    }
    if controls.menu_pressed {
        debug!("returning to player select");
        return Some(SceneTransition::PlayerSelect {
            ship: state.ship,
            difficulty: state.difficulty,
        });
    }
    player::tick(&mut state.player);

    // ── 3. Populations ───────────────────────────────────────────────────────
    bullets::advance(&mut state.player_bullets, &state.config);
    bullets::advance(&mut state.special_bullets, &state.config);
    bullets::advance(&mut state.independent_bullets, &state.config);
    bullets::advance(&mut state.hard_bullets, &state.config);
    update_enemies(state);
    boss::update_boss(state, rng);
    boss::update_twin_boss(state, rng);
    state.explosions.update(|e| {
        e.timer += 1;
        e.timer < e.max_timer
    });
    update_pickups(state);
    spawner::update_apples(state, rng);
    grenade::update_grenades(state);
    hard_mode::update(state, rng);

    // ── 4. Collisions & spawning ─────────────────────────────────────────────
    collision::resolve(state, rng);
    spawner::update(state, rng);

    state.high_score = state.high_score.max(state.score);
    trace!(
        "tick {}: score={} lives={} enemies={} independent={} hard={}",
        state.frame,
        state.score,
        state.player.lives,
        state.enemies.len(),
        state.independent_bullets.len(),
        state.hard_bullets.len(),
    );

    (state.status == GameStatus::GameOver).then_some(SceneTransition::GameOver { score: state.score })
}

/// Fall, shoot and cull regular enemies. An enemy that drops out of the
/// bottom leaves its bullets behind in the independent pool.
fn update_enemies(state: &mut GameState) {
    let target = state.player.center();
    let difficulty = state.difficulty;
    let config = &state.config;
    let independent = &mut state.independent_bullets;

    state.enemies.update(|enemy| {
        enemy.y += enemy.speed;
        enemy.shoot_timer += 1;
        if enemy.kind == EnemyKind::Enhanced {
            enemy.rotation += patterns::ENHANCED_SPIN;
        }
        let volley = patterns::enemy_volley(enemy, difficulty, target);
        enemy.bullets.extend(volley);
        bullets::advance(&mut enemy.bullets, config);

        if enemy.y > config.playfield_height {
            bullets::release(&mut enemy.bullets, independent);
            return false;
        }
        true
    });
}

fn update_pickups(state: &mut GameState) {
    let h = state.config.playfield_height;
    state.powerups.update(|p| {
        p.y += POWERUP_FALL_SPEED;
        p.y <= h
    });
    state.apples.update(|a| {
        a.y += APPLE_FALL_SPEED;
        a.y <= h
    });
}
