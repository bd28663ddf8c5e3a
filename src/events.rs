/// Side-channel output of a tick.

use crate::entities::{Difficulty, EnemyKind, PowerUpKind, ShipType, Side};

/// Something that happened inside a tick. The core never acts on these
/// itself; the front end may log them, play sounds, and so on.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    EnemyDestroyed { kind: EnemyKind, score: u32 },
    PlayerDamaged { lives: u32 },
    PowerUpCollected { kind: PowerUpKind },
    AppleCollected { lives: u32 },
    BossSpawned { twin: bool },
    RageTriggered { side: Side },
    BossDefeated { bosses_defeated: u32 },
    GrenadesThrown { remaining: u32 },
    GrenadeDetonated,
    HardWarning { side: Side },
    HardBarrage { side: Side },
}

/// Request to leave the game scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneTransition {
    GameOver { score: u32 },
    /// Back to player/difficulty select, pre-selecting the current session.
    PlayerSelect { ship: ShipType, difficulty: Difficulty },
}
