/// All game entity types: plain records, no simulation logic.

use crate::config::GameConfig;
use crate::events::FrameEvent;
use crate::geometry::Rect;
use crate::input::EdgeTracker;
use crate::pool::Pool;

// ── Session tags ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }
}

/// Player ship. Each ship has its own fire behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShipType {
    /// Single forward bullet every tick the trigger is held.
    Rapid,
    /// One wide special bullet per 500 ms; hits bosses for triple damage.
    Heavy,
    /// Fan of `min(lives, 10)` bullets every 200 ms.
    Spread,
}

impl ShipType {
    pub const ALL: [ShipType; 3] = [ShipType::Rapid, ShipType::Heavy, ShipType::Spread];

    pub fn number(self) -> u8 {
        match self {
            ShipType::Rapid => 1,
            ShipType::Heavy => 2,
            ShipType::Spread => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<ShipType> {
        match n {
            1 => Some(ShipType::Rapid),
            2 => Some(ShipType::Heavy),
            3 => Some(ShipType::Spread),
            _ => None,
        }
    }
}

/// Fixed for the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionParams {
    pub ship: ShipType,
    pub difficulty: Difficulty,
}

impl SessionParams {
    pub fn starting_lives(&self) -> u32 {
        match (self.difficulty, self.ship) {
            (Difficulty::Easy, _) => 5,
            (Difficulty::Hard, ShipType::Spread) => 4,
            (Difficulty::Hard, _) => 6,
            (Difficulty::Normal, ShipType::Spread) => 1,
            (Difficulty::Normal, _) => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletKind {
    Player,
    Special,
    /// Still owned by the enemy or boss that fired it.
    Enemy,
    /// Outlived its owner; tracked in the ownerless pool.
    Independent,
    Hard,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub width: f32,
    pub height: f32,
    pub rotating: bool,
    /// Visual rotation in degrees; the hitbox ignores it.
    pub rotation: f32,
    pub kind: BulletKind,
}

impl Bullet {
    /// Player-side bullets are anchored at their top-centre, hostile ones at
    /// their centre.
    pub fn hitbox(&self) -> Rect {
        match self.kind {
            BulletKind::Player | BulletKind::Special => {
                Rect::new(self.x - self.width / 2.0, self.y, self.width, self.height)
            }
            _ => Rect::new(
                self.x - self.width / 2.0,
                self.y - self.height / 2.0,
                self.width,
                self.height,
            ),
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub base_speed: f32,
    pub ship: ShipType,
    pub lives: u32,
    pub invincible: bool,
    pub invincible_timer: u32,
    /// Timestamp (ms) of the last gated shot; `None` before the first one.
    pub last_shot_ms: Option<u64>,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.rect().center()
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Normal,
    Large,
    Enhanced,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub hp: i32,
    pub kind: EnemyKind,
    pub bullets: Pool<Bullet>,
    pub shoot_timer: u32,
    /// Degrees; only enhanced enemies spin.
    pub rotation: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Bosses ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossPhase {
    Active,
    /// Scripted removal: one explosion pulse every 30 ticks, five in total.
    Dying { timer: u32, explosions: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Signed patrol velocity along x.
    pub speed: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub bullets: Pool<Bullet>,
    pub shoot_timer: u32,
    /// Accumulated burst offset (degrees) for the hard-difficulty circle.
    pub rotation: f32,
    pub phase: BossPhase,
}

impl Boss {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.phase, BossPhase::Dying { .. })
    }
}

/// One half of the twin boss.
#[derive(Clone, Debug, PartialEq)]
pub struct MagatamaBoss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub bullets: Pool<Bullet>,
    pub shoot_timer: u32,
    pub dying: bool,
    pub rage: bool,
    pub side: Side,
    pub target_x: f32,
    pub target_y: f32,
    pub moving_to_rage: bool,
    pub move_speed: f32,
}

impl MagatamaBoss {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TwinBoss {
    /// Index 0 spawns on the right, index 1 on the left.
    pub units: [MagatamaBoss; 2],
    pub dying: bool,
    pub death_timer: u32,
    pub bullets_saved: bool,
}

// ── Effects & pickups ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionKind {
    Normal,
    Special,
    Grenade,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub timer: u32,
    pub max_timer: u32,
    pub size: f32,
    pub kind: ExplosionKind,
}

impl Explosion {
    /// Normal explosions last 20 ticks, special and grenade ones 40.
    pub fn new(x: f32, y: f32, size: f32, kind: ExplosionKind) -> Self {
        let max_timer = match kind {
            ExplosionKind::Normal => 20,
            ExplosionKind::Special | ExplosionKind::Grenade => 40,
        };
        Self { x, y, timer: 0, max_timer, size, kind }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Speed,
    Hp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Apple {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Apple {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Grenade {
    pub x: f32,
    pub y: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub timer: u32,
    pub move_time: u32,
    pub dx: f32,
    pub dy: f32,
    pub arrived: bool,
    pub arrival_timer: u32,
    pub fuse: u32,
    pub rotation: f32,
}

// ── Hard-mode timeline ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HardModeTimeline {
    pub timer: u32,
    pub warning_timer: u32,
    pub warning_side: Option<Side>,
    pub warning_active: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state. Created at session start, mutated only by
/// [`crate::compute::tick`], discarded on scene transition.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub config: GameConfig,
    pub ship: ShipType,
    pub difficulty: Difficulty,
    pub status: GameStatus,

    pub player: Player,
    pub player_bullets: Pool<Bullet>,
    pub special_bullets: Pool<Bullet>,
    pub independent_bullets: Pool<Bullet>,
    pub hard_bullets: Pool<Bullet>,
    pub enemies: Pool<Enemy>,
    pub boss: Option<Boss>,
    pub twin_boss: Option<TwinBoss>,
    pub explosions: Pool<Explosion>,
    pub powerups: Pool<PowerUp>,
    pub apples: Pool<Apple>,
    pub grenades: Pool<Grenade>,
    pub hard_mode: HardModeTimeline,

    pub score: u32,
    /// Best score seen this process, updated live during play.
    pub high_score: u32,
    /// Enemies destroyed since the last boss; reset on each boss defeat.
    pub defeated_enemies: u32,
    pub bosses_defeated: u32,
    pub grenade_count: u32,
    pub enemy_spawn_timer: u32,
    /// Running count of regular enemy spawns.
    pub enemies_spawned: u32,
    pub apple_timer: u32,
    /// Ticks of title banner remaining before play starts.
    pub start_countdown: u32,
    pub frame: u64,
    /// Held state of one-shot buttons from the previous tick.
    pub edges: EdgeTracker,

    /// Side-channel events raised during the latest tick.
    pub events: Vec<FrameEvent>,
}

impl GameState {
    pub fn boss_present(&self) -> bool {
        self.boss.is_some() || self.twin_boss.is_some()
    }
}
