use danmaku_shooter::boss::*;
use danmaku_shooter::collision;
use danmaku_shooter::compute::init_state;
use danmaku_shooter::config::GameConfig;
use danmaku_shooter::entities::*;
use danmaku_shooter::events::FrameEvent;
use danmaku_shooter::grenade;
use danmaku_shooter::patterns::hostile_bullet;
use danmaku_shooter::player;
use danmaku_shooter::spawner::new_enemy;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    let config = GameConfig { start_countdown: 0, ..GameConfig::default() };
    init_state(SessionParams { ship: ShipType::Rapid, difficulty: Difficulty::Normal }, config, 0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn player_shot(x: f32, y: f32) -> Bullet {
    Bullet {
        x,
        y,
        dx: 0.0,
        dy: -8.0,
        width: 4.0,
        height: 8.0,
        rotating: false,
        rotation: 0.0,
        kind: BulletKind::Player,
    }
}

fn special_shot(x: f32, y: f32) -> Bullet {
    Bullet { width: 6.0, height: 6.0, kind: BulletKind::Special, ..player_shot(x, y) }
}

fn enemy_at(kind: EnemyKind, x: f32, y: f32) -> Enemy {
    let mut e = new_enemy(kind, x);
    e.y = y;
    e
}

// ── Player fire × enemies ─────────────────────────────────────────────────────

#[test]
fn enemy_kill_awards_score_and_counter() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.enemies.spawn(enemy_at(EnemyKind::Normal, 100.0, 100.0));
    s.player_bullets.spawn(player_shot(112.0, 110.0));

    collision::resolve(&mut s, &mut rng);

    assert!(s.enemies.is_empty());
    assert!(s.player_bullets.is_empty());
    assert_eq!(s.score, 100);
    assert_eq!(s.defeated_enemies, 1);
    assert!(s
        .events
        .contains(&FrameEvent::EnemyDestroyed { kind: EnemyKind::Normal, score: 100 }));
    assert_eq!(s.explosions.len(), 1);
    // Any drop sits centred on the kill point.
    for p in &s.powerups {
        assert_eq!((p.x, p.y), (102.5, 102.5));
    }
}

#[test]
fn enemy_scores_by_kind() {
    assert_eq!(collision::enemy_score(EnemyKind::Normal), 100);
    assert_eq!(collision::enemy_score(EnemyKind::Enhanced), 300);
    assert_eq!(collision::enemy_score(EnemyKind::Large), 500);
}

#[test]
fn large_enemy_takes_three_hits() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.enemies.spawn(enemy_at(EnemyKind::Large, 100.0, 100.0));

    for expected_hp in [2, 1] {
        s.player_bullets.spawn(player_shot(120.0, 110.0));
        collision::resolve(&mut s, &mut rng);
        assert_eq!(s.enemies.get(0).map(|e| e.hp), Some(expected_hp));
    }
    s.player_bullets.spawn(player_shot(120.0, 110.0));
    collision::resolve(&mut s, &mut rng);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 500);
}

#[test]
fn each_bullet_hits_at_most_one_enemy() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    // Two overlapping enemies, one bullet.
    s.enemies.spawn(enemy_at(EnemyKind::Normal, 100.0, 100.0));
    s.enemies.spawn(enemy_at(EnemyKind::Normal, 105.0, 100.0));
    s.player_bullets.spawn(player_shot(112.0, 110.0));

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.defeated_enemies, 1);
}

#[test]
fn touching_edges_do_not_collide() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.enemies.spawn(enemy_at(EnemyKind::Normal, 100.0, 100.0));
    // Hitbox spans x 125..129: touches the enemy's right edge only.
    s.player_bullets.spawn(player_shot(127.0, 110.0));

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.player_bullets.len(), 1);
}

#[test]
fn killed_enemy_bullets_move_to_independent_pool() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut enemy = enemy_at(EnemyKind::Normal, 100.0, 100.0);
    enemy.bullets.spawn(hostile_bullet(50.0, 300.0, 0.0, 3.0));
    enemy.bullets.spawn(hostile_bullet(60.0, 300.0, 0.0, 3.0));
    s.enemies.spawn(enemy);
    s.player_bullets.spawn(player_shot(112.0, 110.0));

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.independent_bullets.len(), 2);
    assert!(s.independent_bullets.iter().all(|b| b.kind == BulletKind::Independent));
}

// ── Player fire × bosses ──────────────────────────────────────────────────────

#[test]
fn boss_damage_per_bullet_kind() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.boss = Some(new_boss(&s.config));
    let (cx, cy) = s.boss.as_ref().map(|b| b.rect().center()).unwrap_or_default();

    s.player_bullets.spawn(player_shot(cx, cy));
    s.special_bullets.spawn(special_shot(cx + 10.0, cy));
    collision::resolve(&mut s, &mut rng);

    assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(BOSS_HP - 4));
    assert!(s.player_bullets.is_empty());
    assert!(s.special_bullets.is_empty());
    let kinds: Vec<_> = s.explosions.iter().map(|e| (e.kind, e.size)).collect();
    assert_eq!(kinds, vec![(ExplosionKind::Normal, 0.5), (ExplosionKind::Special, 1.0)]);
}

#[test]
fn dying_boss_ignores_hits() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut boss = new_boss(&s.config);
    hit_boss(&mut boss, BOSS_HP);
    assert!(boss.is_dying());
    let (cx, cy) = boss.rect().center();
    s.boss = Some(boss);

    s.player_bullets.spawn(player_shot(cx, cy));
    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player_bullets.len(), 1);
    assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(0));
}

#[test]
fn each_pool_lands_one_boss_hit_per_tick() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.boss = Some(new_boss(&s.config));
    let (cx, cy) = s.boss.as_ref().map(|b| b.rect().center()).unwrap_or_default();
    for i in 0..5 {
        s.player_bullets.spawn(player_shot(cx - 20.0 + i as f32 * 10.0, cy));
    }
    for i in 0..2 {
        s.special_bullets.spawn(special_shot(cx - 10.0 + i as f32 * 20.0, cy));
    }

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(BOSS_HP - 4));
    assert_eq!(s.player_bullets.len(), 4);
    assert_eq!(s.special_bullets.len(), 1);
    assert_eq!(s.explosions.len(), 2);

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(BOSS_HP - 8));
    assert_eq!(s.player_bullets.len(), 3);
    assert!(s.special_bullets.is_empty());
}

#[test]
fn overkill_floors_boss_hp_at_zero() {
    let mut boss = new_boss(&GameConfig::default());
    boss.hp = 2;
    hit_boss(&mut boss, 3);
    assert_eq!(boss.hp, 0);
    assert!(boss.is_dying());

    let mut twin = new_twin_boss(&GameConfig::default());
    twin.units[0].hp = 1;
    hit_magatama(&mut twin.units[0], 3);
    assert_eq!(twin.units[0].hp, 0);
    assert!(twin.units[0].dying);
}

#[test]
fn boss_death_sequence_timing() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut boss = new_boss(&s.config);
    boss.hp = 1;
    boss.bullets.spawn(hostile_bullet(100.0, 300.0, 0.0, 0.0));
    let (cx, cy) = boss.rect().center();
    s.boss = Some(boss);

    // Tick T: the killing blow.
    s.player_bullets.spawn(player_shot(cx, cy));
    collision::resolve(&mut s, &mut rng);
    assert!(s.boss.as_ref().map_or(false, |b| b.is_dying()));
    s.explosions.clear();

    let mut pulses = Vec::new();
    for t in 1..=150u32 {
        let before = s.explosions.len();
        update_boss(&mut s, &mut rng);
        if s.explosions.len() > before {
            pulses.push(t);
        }
        if t < 150 {
            assert!(s.boss.is_some(), "removed early at T+{t}");
        }
    }
    assert_eq!(pulses, vec![30, 60, 90, 120, 150]);
    let sizes: Vec<f32> = s.explosions.iter().map(|e| e.size).collect();
    assert_eq!(sizes, vec![3.0, 4.0, 5.0, 6.0, 7.0]);

    assert!(s.boss.is_none());
    assert_eq!(s.score, BOSS_SCORE);
    assert_eq!(s.grenade_count, 4);
    assert_eq!(s.bosses_defeated, 1);
    assert_eq!(s.defeated_enemies, 0);
    assert_eq!(s.independent_bullets.len(), 1);
    assert!(s.events.contains(&FrameEvent::BossDefeated { bosses_defeated: 1 }));
}

#[test]
fn boss_patrol_bounces_off_edges() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut boss = new_boss(&s.config);
    boss.x = 439.5;
    s.boss = Some(boss);

    update_boss(&mut s, &mut rng);
    let boss = s.boss.as_ref().map(|b| (b.x, b.speed));
    assert_eq!(boss, Some((440.5, -1.0)));
}

// ── Twin boss ─────────────────────────────────────────────────────────────────

fn twin_state() -> GameState {
    let mut s = make_state();
    s.bosses_defeated = 1;
    s.twin_boss = Some(new_twin_boss(&s.config));
    s
}

fn twin(s: &GameState) -> &TwinBoss {
    s.twin_boss.as_ref().expect("twin boss present")
}

#[test]
fn sibling_death_triggers_rage_once() {
    let mut s = twin_state();
    let mut rng = seeded_rng();
    if let Some(t) = s.twin_boss.as_mut() {
        hit_magatama(&mut t.units[0], MAGATAMA_HP);
    }

    update_twin_boss(&mut s, &mut rng);
    let survivor = &twin(&s).units[1];
    assert!(survivor.rage && survivor.moving_to_rage);
    assert_eq!((survivor.target_x, survivor.target_y), (260.0, 30.0));
    assert!(s.events.contains(&FrameEvent::RageTriggered { side: Side::Left }));

    s.events.clear();
    for _ in 0..10 {
        update_twin_boss(&mut s, &mut rng);
    }
    assert!(!s.events.iter().any(|e| matches!(e, FrameEvent::RageTriggered { .. })));
}

#[test]
fn enraged_unit_stops_near_target() {
    let mut s = twin_state();
    let mut rng = seeded_rng();
    if let Some(t) = s.twin_boss.as_mut() {
        hit_magatama(&mut t.units[1], MAGATAMA_HP);
    }
    for _ in 0..300 {
        update_twin_boss(&mut s, &mut rng);
    }
    let unit = &twin(&s).units[0];
    assert!(unit.rage);
    assert!(!unit.moving_to_rage);
    let (dx, dy) = (unit.target_x - unit.x, unit.target_y - unit.y);
    assert!((dx * dx + dy * dy).sqrt() <= 2.0);
}

#[test]
fn twin_bullet_hand_off_happens_once() {
    let mut s = twin_state();
    let mut rng = seeded_rng();
    if let Some(t) = s.twin_boss.as_mut() {
        t.units[0].bullets.spawn(hostile_bullet(100.0, 300.0, 0.0, 0.0));
        hit_magatama(&mut t.units[0], MAGATAMA_HP);
    }
    update_twin_boss(&mut s, &mut rng);
    // A fallen unit keeps its bullets until the pair is down.
    assert_eq!(twin(&s).units[0].bullets.len(), 1);
    assert!(s.independent_bullets.is_empty());

    if let Some(t) = s.twin_boss.as_mut() {
        t.units[1].bullets.spawn(hostile_bullet(200.0, 300.0, 0.0, 0.0));
        hit_magatama(&mut t.units[1], MAGATAMA_HP);
    }
    update_twin_boss(&mut s, &mut rng);
    assert!(twin(&s).dying);
    let owned: usize = twin(&s).units.iter().map(|u| u.bullets.len()).sum();

    update_twin_boss(&mut s, &mut rng);
    assert!(twin(&s).bullets_saved);
    assert_eq!(s.independent_bullets.len(), owned);
    assert!(twin(&s).units.iter().all(|u| u.bullets.is_empty()));

    for _ in 0..30 {
        update_twin_boss(&mut s, &mut rng);
    }
    assert_eq!(s.independent_bullets.len(), owned);
}

#[test]
fn twin_death_sequence_and_rewards() {
    let mut s = twin_state();
    let mut rng = seeded_rng();
    if let Some(t) = s.twin_boss.as_mut() {
        for unit in t.units.iter_mut() {
            hit_magatama(unit, MAGATAMA_HP);
        }
    }
    update_twin_boss(&mut s, &mut rng);
    assert!(twin(&s).dying);

    for _ in 0..59 {
        update_twin_boss(&mut s, &mut rng);
    }
    assert!(s.twin_boss.is_some());
    // Pulses on death ticks 1, 16, 31 and 46.
    assert_eq!(s.explosions.len(), 4);
    assert!(s.explosions.iter().all(|e| e.size == 3.0));

    update_twin_boss(&mut s, &mut rng);
    assert!(s.twin_boss.is_none());
    assert_eq!(s.score, BOSS_SCORE);
    assert_eq!(s.grenade_count, 4);
    assert_eq!(s.bosses_defeated, 2);
}

#[test]
fn bullets_hit_only_live_sub_bosses() {
    let mut s = twin_state();
    let mut rng = seeded_rng();
    let (dead_c, live_c) = {
        let t = twin(&s);
        (t.units[0].rect().center(), t.units[1].rect().center())
    };
    if let Some(t) = s.twin_boss.as_mut() {
        hit_magatama(&mut t.units[0], MAGATAMA_HP);
    }
    s.player_bullets.spawn(player_shot(dead_c.0, dead_c.1));
    s.special_bullets.spawn(special_shot(live_c.0, live_c.1));

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player_bullets.len(), 1);
    assert!(s.special_bullets.is_empty());
    assert_eq!(twin(&s).units[1].hp, MAGATAMA_HP - 3);
}

#[test]
fn each_pool_lands_one_sub_boss_hit_per_tick() {
    let mut s = twin_state();
    let mut rng = seeded_rng();
    let (cx, cy) = twin(&s).units[0].rect().center();
    for i in 0..6 {
        s.player_bullets.spawn(player_shot(cx - 15.0 + i as f32 * 6.0, cy));
    }

    collision::resolve(&mut s, &mut rng);
    assert_eq!(twin(&s).units[0].hp, MAGATAMA_HP - 1);
    assert_eq!(s.player_bullets.len(), 5);
}

// ── Hostile fire × player ─────────────────────────────────────────────────────

#[test]
fn one_hit_per_tick_then_invincible() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let (cx, cy) = s.player.center();
    for _ in 0..2 {
        let mut b = hostile_bullet(cx, cy, 0.0, 0.0);
        b.kind = BulletKind::Independent;
        s.independent_bullets.spawn(b);
    }

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, 2);
    assert!(s.player.invincible);
    assert_eq!(s.independent_bullets.len(), 1);
    assert!(s.events.contains(&FrameEvent::PlayerDamaged { lives: 2 }));

    // Invincible: the remaining bullet passes through.
    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, 2);
    assert_eq!(s.independent_bullets.len(), 1);
}

#[test]
fn fallen_sub_boss_bullets_are_harmless() {
    let mut s = twin_state();
    let mut rng = seeded_rng();
    let (cx, cy) = s.player.center();
    if let Some(t) = s.twin_boss.as_mut() {
        t.units[0].bullets.spawn(hostile_bullet(cx, cy, 0.0, 0.0));
        hit_magatama(&mut t.units[0], MAGATAMA_HP);
    }

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, 3);
    assert_eq!(twin(&s).units[0].bullets.len(), 1);
}

#[test]
fn twin_bullets_are_harmless_during_its_death_sequence() {
    let mut s = twin_state();
    let mut rng = seeded_rng();
    let (cx, cy) = s.player.center();
    if let Some(t) = s.twin_boss.as_mut() {
        t.dying = true;
        t.units[1].bullets.spawn(hostile_bullet(cx, cy, 0.0, 0.0));
    }

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, 3);
}

#[test]
fn each_source_gives_up_one_colliding_bullet() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let (cx, cy) = s.player.center();
    let mut enemy = enemy_at(EnemyKind::Normal, 0.0, 0.0);
    enemy.bullets.spawn(hostile_bullet(cx, cy, 0.0, 0.0));
    s.enemies.spawn(enemy);
    let mut boss = new_boss(&s.config);
    boss.bullets.spawn(hostile_bullet(cx, cy, 0.0, 0.0));
    boss.bullets.spawn(hostile_bullet(cx, cy, 0.0, 0.0));
    s.boss = Some(boss);
    let mut independent = hostile_bullet(cx, cy, 0.0, 0.0);
    independent.kind = BulletKind::Independent;
    s.independent_bullets.spawn(independent);
    let mut hard = hostile_bullet(cx, cy, 0.0, 0.0);
    hard.kind = BulletKind::Hard;
    s.hard_bullets.spawn(hard);

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, 2);
    let damaged = s.events.iter().filter(|e| matches!(e, FrameEvent::PlayerDamaged { .. })).count();
    assert_eq!(damaged, 1);
    assert!(s.enemies.get(0).map_or(false, |e| e.bullets.is_empty()));
    assert_eq!(s.boss.as_ref().map(|b| b.bullets.len()), Some(1));
    assert!(s.independent_bullets.is_empty());
    assert!(s.hard_bullets.is_empty());
}

#[test]
fn enhanced_enemy_body_hurts_on_contact() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.enemies.spawn(enemy_at(EnemyKind::Normal, s.player.x, s.player.y));
    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, 3);

    s.enemies.spawn(enemy_at(EnemyKind::Enhanced, s.player.x, s.player.y));
    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, 2);
    // The body is not consumed.
    assert_eq!(s.enemies.len(), 2);
}

#[test]
fn hard_bullets_hurt_the_player() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let (cx, cy) = s.player.center();
    let mut b = hostile_bullet(cx, cy, 0.0, 2.0);
    b.kind = BulletKind::Hard;
    s.hard_bullets.spawn(b);
    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, 2);
    assert!(s.hard_bullets.is_empty());
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[test]
fn apple_heals_three_capped_at_ten() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.player.lives = 9;
    let (cx, cy) = s.player.center();
    s.apples.spawn(Apple { x: cx - 12.5, y: cy - 12.5, width: 25.0, height: 25.0 });

    collision::resolve(&mut s, &mut rng);
    assert_eq!(s.player.lives, player::MAX_LIVES);
    assert!(s.apples.is_empty());
    assert!(s.events.contains(&FrameEvent::AppleCollected { lives: 10 }));
}

#[test]
fn speed_powerup_does_not_stack() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let (cx, cy) = s.player.center();
    for _ in 0..2 {
        s.powerups.spawn(PowerUp {
            x: cx - 10.0,
            y: cy - 10.0,
            width: 20.0,
            height: 20.0,
            kind: PowerUpKind::Speed,
        });
        collision::resolve(&mut s, &mut rng);
        assert_eq!(s.player.speed, 7.0);
    }
    assert!(s.powerups.is_empty());
}

// ── Grenades ──────────────────────────────────────────────────────────────────

#[test]
fn grenade_detonation_with_live_boss() {
    let mut s = make_state();
    s.boss = Some(new_boss(&s.config));
    s.enemies.spawn(enemy_at(EnemyKind::Large, 100.0, 100.0));
    s.enemies.spawn(enemy_at(EnemyKind::Normal, 200.0, 100.0));

    grenade::detonate(&mut s, (260.0, 200.0));

    let boss = s.boss.as_ref().map(|b| (b.hp, b.is_dying()));
    assert_eq!(boss, Some((16, false)));
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 200);
    assert_eq!(s.defeated_enemies, 0);
    assert!(s.explosions.iter().any(|e| e.kind == ExplosionKind::Grenade && e.size == 5.0));
}

#[test]
fn grenade_detonation_without_boss_is_safe() {
    let mut s = make_state();
    grenade::detonate(&mut s, (260.0, 200.0));
    assert!(s.boss.is_none());
    assert_eq!(s.explosions.len(), 1);
}

#[test]
fn grenade_can_finish_a_boss() {
    let mut s = make_state();
    let mut boss = new_boss(&s.config);
    boss.hp = 4;
    s.boss = Some(boss);
    grenade::detonate(&mut s, (260.0, 200.0));
    assert!(s.boss.as_ref().map_or(false, |b| b.is_dying()));
}

#[test]
fn grenade_damages_both_sub_bosses() {
    let mut s = make_state();
    s.twin_boss = Some(new_twin_boss(&s.config));
    grenade::detonate(&mut s, (260.0, 200.0));
    assert!(twin(&s).units.iter().all(|u| u.hp == MAGATAMA_HP - 6));
}

#[test]
fn thrown_grenades_detonate_once_after_fuse() {
    let mut s = make_state();
    assert!(grenade::throw_grenades(&mut s));
    assert_eq!(s.grenades.len(), 3);

    for _ in 0..72 {
        grenade::update_grenades(&mut s);
    }
    assert_eq!(s.grenades.len(), 3);
    assert!(s.grenades.iter().all(|g| g.arrived));
    assert!(s.grenades.iter().all(|g| (g.x, g.y) == (g.target_x, g.target_y)));

    grenade::update_grenades(&mut s);
    assert!(s.grenades.is_empty());
    let blasts = s.events.iter().filter(|e| **e == FrameEvent::GrenadeDetonated).count();
    assert_eq!(blasts, 3);
}

#[test]
fn throw_rules() {
    let mut s = make_state();
    s.grenade_count = 0;
    assert!(!grenade::throw_grenades(&mut s));

    s.grenade_count = 1;
    s.boss = Some(new_boss(&s.config));
    assert!(!grenade::throw_grenades(&mut s));
    assert_eq!(s.grenade_count, 1);

    s.grenade_count = 2;
    assert!(grenade::throw_grenades(&mut s));
    assert_eq!(s.grenade_count, 1);

    s.boss = None;
    assert!(grenade::throw_grenades(&mut s));
    assert_eq!(s.grenade_count, 0);
}
