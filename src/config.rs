//! Typed runtime configuration: key bindings and tunable scalars.
//!
//! Settings persistence is out of scope; binaries start from
//! `Config::default()` and layer CLI overrides on top.

use minifb::Key;

/// What happens when the escape key goes down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EscapeBehaviour {
    #[default]
    Quit,
    UnlockMouse,
}

#[derive(Clone, Copy, Debug)]
pub struct Keymap {
    pub forward: Key,
    pub back: Key,
    pub left: Key,
    pub right: Key,
    pub turn_left: Key,
    pub turn_right: Key,
    pub run: Key,
    pub fire: Key,
    pub toggle_map: Key,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            forward: Key::W,
            back: Key::S,
            left: Key::A,
            right: Key::D,
            turn_left: Key::Left,
            turn_right: Key::Right,
            run: Key::LeftShift,
            fire: Key::LeftCtrl,
            toggle_map: Key::M,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub mouse_sensitivity: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Radians per second for keyboard turning.
    pub turn_speed: f32,
    pub escape_behaviour: EscapeBehaviour,
    pub keymap: Keymap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.0,
            walk_speed: 1.5,
            run_speed: 4.0,
            turn_speed: 2.5,
            escape_behaviour: EscapeBehaviour::default(),
            keymap: Keymap::default(),
        }
    }
}
