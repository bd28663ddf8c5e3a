/// Bullet motion, culling and ownership hand-off.

use crate::config::GameConfig;
use crate::entities::{Bullet, BulletKind};
use crate::patterns::BULLET_SPIN;
use crate::pool::Pool;

/// Hard-mode bullets enter from off screen and are kept this far outside.
pub const HARD_BULLET_MARGIN: f32 = 50.0;

/// Whether a bullet is still inside the region its kind is allowed in.
pub fn in_bounds(bullet: &Bullet, config: &GameConfig) -> bool {
    let (w, h) = (config.playfield_width, config.playfield_height);
    let (x, y) = (bullet.x, bullet.y);
    match bullet.kind {
        BulletKind::Player => !(y < 0.0 || x < 0.0 || x > w),
        BulletKind::Special => y >= 0.0,
        BulletKind::Enemy | BulletKind::Independent => !(x < 0.0 || x > w || y < 0.0 || y > h),
        BulletKind::Hard => {
            let m = HARD_BULLET_MARGIN;
            !(x < -m || x > w + m || y < -m || y > h + m)
        }
    }
}

/// Move every bullet one tick, spin rotating ones and drop those that left
/// their bounds.
pub fn advance(pool: &mut Pool<Bullet>, config: &GameConfig) {
    pool.update(|b| {
        b.x += b.dx;
        b.y += b.dy;
        if b.rotating {
            b.rotation += BULLET_SPIN;
        }
        in_bounds(b, config)
    });
}

/// Hand every bullet of a dying owner to the ownerless pool.
pub fn release(owned: &mut Pool<Bullet>, independent: &mut Pool<Bullet>) {
    independent.extend(owned.drain().map(|mut b| {
        b.kind = BulletKind::Independent;
        b
    }));
}
