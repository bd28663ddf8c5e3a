/// Per-tick input snapshot and its reduction to simulation controls.
///
/// The front end reports what is *held* this tick. [`EdgeTracker`] turns the
/// held state of one-shot buttons into press edges so that grenade, summon
/// and menu actions fire once per press rather than once per tick held.

/// Analog deflection below this magnitude is treated as centred.
pub const STICK_DEAD_ZONE: f32 = 0.1;

// ── Standard gamepad button indices ───────────────────────────────────────────

pub const BUTTON_FIRE: usize = 0;
pub const BUTTON_SUMMON: usize = 1;
pub const BUTTON_GRENADE: usize = 2;
pub const BUTTON_MENU: usize = 7;
pub const BUTTON_DPAD_UP: usize = 12;
pub const BUTTON_DPAD_DOWN: usize = 13;
pub const BUTTON_DPAD_LEFT: usize = 14;
pub const BUTTON_DPAD_RIGHT: usize = 15;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GamepadState {
    pub axis_x: f32,
    pub axis_y: f32,
    pub buttons: Vec<bool>,
}

impl GamepadState {
    /// Unknown indices read as released.
    pub fn pressed(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Stick deflection clamped to `[-1, 1]` with the dead zone applied.
    pub fn stick(&self) -> (f32, f32) {
        (sanitize_axis(self.axis_x), sanitize_axis(self.axis_y))
    }
}

/// Raw held state for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub grenade: bool,
    pub summon: bool,
    pub menu: bool,
    pub gamepad: Option<GamepadState>,
}

/// What the simulation acts on after digital/analog merging and edge
/// detection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    /// Digital direction, each component in {-1, 0, 1}.
    pub digital_x: f32,
    pub digital_y: f32,
    /// Analog stick after sanitising; zero inside the dead zone.
    pub stick_x: f32,
    pub stick_y: f32,
    pub fire: bool,
    pub grenade_pressed: bool,
    pub summon_pressed: bool,
    pub menu_pressed: bool,
}

fn sanitize_axis(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let v = value.clamp(-1.0, 1.0);
    if v.abs() > STICK_DEAD_ZONE {
        v
    } else {
        0.0
    }
}

fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Previous-tick held state of the edge-triggered buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTracker {
    grenade: bool,
    summon: bool,
    menu: bool,
}

impl EdgeTracker {
    pub fn resolve(&mut self, snap: &InputSnapshot) -> Controls {
        let pad = snap.gamepad.as_ref();
        let pad_pressed = |index| pad.map_or(false, |p| p.pressed(index));

        let up = snap.up || pad_pressed(BUTTON_DPAD_UP);
        let down = snap.down || pad_pressed(BUTTON_DPAD_DOWN);
        let left = snap.left || pad_pressed(BUTTON_DPAD_LEFT);
        let right = snap.right || pad_pressed(BUTTON_DPAD_RIGHT);
        let (stick_x, stick_y) = pad.map_or((0.0, 0.0), GamepadState::stick);

        let grenade = snap.grenade || pad_pressed(BUTTON_GRENADE);
        let summon = snap.summon || pad_pressed(BUTTON_SUMMON);
        let menu = snap.menu || pad_pressed(BUTTON_MENU);

        let controls = Controls {
            digital_x: axis(left, right),
            digital_y: axis(up, down),
            stick_x,
            stick_y,
            fire: snap.fire || pad_pressed(BUTTON_FIRE),
            grenade_pressed: grenade && !self.grenade,
            summon_pressed: summon && !self.summon,
            menu_pressed: menu && !self.menu,
        };

        self.grenade = grenade;
        self.summon = summon;
        self.menu = menu;
        controls
    }
}
