/// Render model: everything the presentation layer needs for one frame,
/// derived read-only from `GameState`.
///
/// Coordinates are playfield units with the origin at the top-left. Each
/// drawable carries its bounding box (`x`, `y`, `width`, `height`); round
/// shapes are inscribed in theirs. Drawables are listed back to front.

use crate::entities::{
    Bullet, BulletKind, Difficulty, EnemyKind, Explosion, ExplosionKind, GameState, ShipType, Side,
};
use crate::player;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const RED: Rgb = Rgb(0xff, 0x00, 0x00);
    pub const BLUE: Rgb = Rgb(0x00, 0x00, 0xff);
    pub const GREEN: Rgb = Rgb(0x00, 0xff, 0x00);
    pub const ORANGE: Rgb = Rgb(0xff, 0xa5, 0x00);
    pub const YELLOW: Rgb = Rgb(0xff, 0xff, 0x00);
    pub const DARK_RED: Rgb = Rgb(0x80, 0x00, 0x00);
    pub const PURPLE: Rgb = Rgb(0x80, 0x00, 0x80);
    pub const OLIVE: Rgb = Rgb(0x32, 0x50, 0x32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Rect,
    Circle,
    /// Square drawn at `rotation` degrees.
    RotatedSquare,
    /// Player ship silhouette.
    Ship,
    Heart,
    /// Translucent fill over a screen region.
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drawable {
    pub shape: Shape,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub color: Rgb,
}

impl Drawable {
    fn new(shape: Shape, x: f32, y: f32, width: f32, height: f32, color: Rgb) -> Self {
        Self { shape, x, y, width, height, rotation: 0.0, color }
    }

    fn circle(cx: f32, cy: f32, radius: f32, color: Rgb) -> Self {
        Self::new(Shape::Circle, cx - radius, cy - radius, radius * 2.0, radius * 2.0, color)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub grenades: u32,
    pub lives: u32,
    pub difficulty: Difficulty,
    pub ship: ShipType,
    /// Whole seconds left on the start countdown, if still running.
    pub countdown_secs: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderModel {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub drawables: Vec<Drawable>,
    /// Life icons in the side panel, right of the playfield.
    pub hearts: Vec<Drawable>,
    pub warning: Option<Drawable>,
    pub title_visible: bool,
    pub hud: Hud,
}

pub const HEARTS_PER_ROW: u32 = 5;
pub const HEART_SPACING: f32 = 25.0;
const HEART_FIRST_ROW_Y: f32 = 170.0;
const HEART_SIZE: f32 = 20.0;
const HEART_PANEL_OFFSET: f32 = 40.0;

pub fn ship_color(ship: ShipType) -> Rgb {
    match ship {
        ShipType::Rapid => Rgb::BLUE,
        ShipType::Heavy => Rgb::YELLOW,
        ShipType::Spread => Rgb::GREEN,
    }
}

fn enemy_color(kind: EnemyKind) -> Rgb {
    match kind {
        EnemyKind::Normal => Rgb::RED,
        EnemyKind::Large => Rgb::DARK_RED,
        EnemyKind::Enhanced => Rgb::BLUE,
    }
}

/// Heart icons, `HEARTS_PER_ROW` to a row, each centred on its slot.
pub fn hearts(lives: u32, playfield_width: f32) -> Vec<Drawable> {
    (0..lives)
        .map(|i| {
            let col = (i % HEARTS_PER_ROW) as f32;
            let row = (i / HEARTS_PER_ROW) as f32;
            let cx = playfield_width + HEART_PANEL_OFFSET + col * HEART_SPACING;
            let cy = HEART_FIRST_ROW_Y + row * HEART_SPACING;
            Drawable::new(
                Shape::Heart,
                cx - HEART_SIZE / 2.0,
                cy - HEART_SIZE / 2.0,
                HEART_SIZE,
                HEART_SIZE,
                Rgb::RED,
            )
        })
        .collect()
}

fn push_bullet(out: &mut Vec<Drawable>, bullet: &Bullet) {
    let hb = bullet.hitbox();
    let drawable = match bullet.kind {
        BulletKind::Player => Drawable::new(Shape::Rect, hb.x, hb.y, hb.w, hb.h, Rgb::BLUE),
        BulletKind::Special => Drawable::circle(bullet.x, bullet.y, bullet.width / 2.0, Rgb::YELLOW),
        _ if bullet.rotating => Drawable {
            rotation: bullet.rotation,
            ..Drawable::new(Shape::RotatedSquare, hb.x, hb.y, hb.w, hb.h, Rgb::WHITE)
        },
        _ => Drawable::circle(bullet.x, bullet.y, 3.0, Rgb::WHITE),
    };
    out.push(drawable);
}

/// Two-layer bar: red background, green remaining-hp fill.
fn push_hp_bar(out: &mut Vec<Drawable>, x: f32, y: f32, width: f32, height: f32, hp: i32, max_hp: i32) {
    let ratio = if max_hp > 0 { (hp.max(0) as f32 / max_hp as f32).min(1.0) } else { 0.0 };
    out.push(Drawable::new(Shape::Rect, x, y, width, height, Rgb::RED));
    out.push(Drawable::new(Shape::Rect, x, y, width * ratio, height, Rgb::GREEN));
}

/// Concentric rings, outermost first, growing with the explosion's age.
fn push_explosion(out: &mut Vec<Drawable>, e: &Explosion) {
    let t = e.timer as f32;
    let (colors, growth, step): (&[Rgb], f32, f32) = match e.kind {
        ExplosionKind::Special => (&[Rgb::RED, Rgb::ORANGE, Rgb::YELLOW, Rgb::WHITE], 8.0, 5.0),
        ExplosionKind::Grenade => (&[Rgb::WHITE, Rgb::YELLOW, Rgb::YELLOW, Rgb::RED], 2.0, 2.0),
        ExplosionKind::Normal => (&[Rgb::RED, Rgb::ORANGE, Rgb::YELLOW], 3.0, 5.0),
    };
    let base = t * growth * e.size;
    for (i, &color) in colors.iter().enumerate() {
        let radius = (base - i as f32 * step).max(1.0);
        out.push(Drawable::circle(e.x, e.y, radius, color));
    }
}

pub fn build(state: &GameState) -> RenderModel {
    let config = &state.config;
    let mut d = Vec::new();

    if player::visible(&state.player) {
        let p = &state.player;
        d.push(Drawable::new(Shape::Ship, p.x, p.y, p.width, p.height, ship_color(p.ship)));
    }

    for pool in [
        &state.player_bullets,
        &state.special_bullets,
        &state.independent_bullets,
        &state.hard_bullets,
    ] {
        for bullet in pool {
            push_bullet(&mut d, bullet);
        }
    }

    for enemy in &state.enemies {
        d.push(Drawable {
            rotation: enemy.rotation,
            ..Drawable::new(Shape::Rect, enemy.x, enemy.y, enemy.width, enemy.height, enemy_color(enemy.kind))
        });
        for bullet in &enemy.bullets {
            push_bullet(&mut d, bullet);
        }
    }

    if let Some(boss) = &state.boss {
        // A dying boss is represented only by its explosions and bullets.
        if !boss.is_dying() {
            d.push(Drawable::new(Shape::Rect, boss.x, boss.y, boss.width, boss.height, Rgb::PURPLE));
            push_hp_bar(&mut d, boss.x, boss.y - 15.0, boss.width, 8.0, boss.hp, boss.max_hp);
        }
        for bullet in &boss.bullets {
            push_bullet(&mut d, bullet);
        }
    }

    if let Some(twin) = state.twin_boss.as_ref().filter(|t| !t.dying) {
        for unit in &twin.units {
            // A fallen unit's bullets are still live until the hand-off.
            for bullet in &unit.bullets {
                push_bullet(&mut d, bullet);
            }
            if unit.dying {
                continue;
            }
            let (cx, cy) = unit.rect().center();
            d.push(Drawable::circle(cx, cy, 20.0, Rgb::PURPLE));
            let nub_x = match unit.side {
                Side::Left => cx - 15.0,
                Side::Right => cx + 15.0,
            };
            d.push(Drawable::circle(nub_x, cy - 15.0, 8.0, Rgb::PURPLE));
            push_hp_bar(&mut d, unit.x, unit.y - 10.0, unit.width, 6.0, unit.hp, unit.max_hp);
        }
    }

    for explosion in &state.explosions {
        push_explosion(&mut d, explosion);
    }
    for powerup in &state.powerups {
        let (cx, cy) = powerup.rect().center();
        d.push(Drawable::circle(cx, cy, 10.0, Rgb::ORANGE));
        d.push(Drawable::circle(cx, cy, 3.0, Rgb::WHITE));
    }
    for apple in &state.apples {
        let (cx, cy) = apple.rect().center();
        d.push(Drawable::circle(cx, cy, 12.0, Rgb::RED));
        d.push(Drawable::circle(cx + 2.0, cy - 10.0, 3.0, Rgb::GREEN));
    }
    for grenade in &state.grenades {
        d.push(Drawable {
            rotation: grenade.rotation,
            ..Drawable::new(Shape::Circle, grenade.x - 12.5, grenade.y - 15.0, 25.0, 30.0, Rgb::OLIVE)
        });
    }

    let timeline = &state.hard_mode;
    let warning = match timeline.warning_side {
        Some(side) if state.difficulty == Difficulty::Hard && timeline.warning_active => {
            let half = config.playfield_width / 2.0;
            let x = match side {
                Side::Left => 0.0,
                Side::Right => half,
            };
            Some(Drawable::new(Shape::Overlay, x, 0.0, half, config.playfield_height, Rgb::RED))
        }
        _ => None,
    };

    let rate = config.tick_rate.max(1);
    let countdown_secs =
        (state.start_countdown > 0).then(|| (state.start_countdown + rate - 1) / rate);

    RenderModel {
        playfield_width: config.playfield_width,
        playfield_height: config.playfield_height,
        drawables: d,
        hearts: hearts(state.player.lives, config.playfield_width),
        warning,
        title_visible: state.start_countdown > 0,
        hud: Hud {
            score: state.score,
            high_score: state.high_score.max(state.score),
            grenades: state.grenade_count,
            lives: state.player.lives,
            difficulty: state.difficulty,
            ship: state.ship,
            countdown_secs,
        },
    }
}
