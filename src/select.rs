/// Player/difficulty select menu model.
///
/// Pure state; the front end maps keys or pad buttons to [`MenuAction`]s and
/// draws whatever the menu reports.

use crate::entities::{Difficulty, SessionParams, ShipType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectFocus {
    Ship,
    Difficulty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Next,
    Previous,
    /// Focus the ship selector.
    Up,
    /// Focus the difficulty selector.
    Down,
    ToggleFocus,
    Confirm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectMenu {
    pub ship: ShipType,
    pub difficulty: Difficulty,
    pub focus: SelectFocus,
}

impl Default for SelectMenu {
    fn default() -> Self {
        Self { ship: ShipType::Rapid, difficulty: Difficulty::Normal, focus: SelectFocus::Ship }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, direction: i32) -> T {
    let len = all.len() as i32;
    let index = all.iter().position(|&v| v == current).unwrap_or(0) as i32;
    all[(index + direction).rem_euclid(len) as usize]
}

impl SelectMenu {
    /// Menu reopened after a session, pre-selecting what was just played.
    pub fn with_session(session: SessionParams) -> Self {
        Self { ship: session.ship, difficulty: session.difficulty, ..Self::default() }
    }

    pub fn session(&self) -> SessionParams {
        SessionParams { ship: self.ship, difficulty: self.difficulty }
    }

    /// Step the focused selector by `direction`, wrapping at both ends.
    pub fn change_selection(&mut self, direction: i32) {
        match self.focus {
            SelectFocus::Ship => self.ship = cycle(&ShipType::ALL, self.ship, direction),
            SelectFocus::Difficulty => {
                self.difficulty = cycle(&Difficulty::ALL, self.difficulty, direction)
            }
        }
    }

    /// Returns the chosen session on `Confirm`.
    pub fn apply(&mut self, action: MenuAction) -> Option<SessionParams> {
        match action {
            MenuAction::Next => self.change_selection(1),
            MenuAction::Previous => self.change_selection(-1),
            MenuAction::Up => self.focus = SelectFocus::Ship,
            MenuAction::Down => self.focus = SelectFocus::Difficulty,
            MenuAction::ToggleFocus => {
                self.focus = match self.focus {
                    SelectFocus::Ship => SelectFocus::Difficulty,
                    SelectFocus::Difficulty => SelectFocus::Ship,
                }
            }
            MenuAction::Confirm => return Some(self.session()),
        }
        None
    }
}
