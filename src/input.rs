use fnv::FnvHashMap;
use winit::event::VirtualKeyCode;

use crate::viewport::Direction;

/// Something the user asked the session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Export,
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    IncreaseBudget,
    DecreaseBudget,
    /// Recompute the frame without changing anything.
    Redraw,
}

pub struct Keymap {
    bindings: FnvHashMap<VirtualKeyCode, Command>,
}

impl Keymap {
    pub fn new() -> Self {
        Self {
            bindings: FnvHashMap::default(),
        }
    }

    pub fn bind(mut self, key: VirtualKeyCode, command: Command) -> Self {
        self.bindings.insert(key, command);
        self
    }

    pub fn command(&self, key: VirtualKeyCode) -> Option<Command> {
        self.bindings.get(&key).copied()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
            .bind(VirtualKeyCode::Return, Command::Export)
            .bind(VirtualKeyCode::NumpadEnter, Command::Export)
            .bind(VirtualKeyCode::W, Command::Pan(Direction::Up))
            .bind(VirtualKeyCode::A, Command::Pan(Direction::Left))
            .bind(VirtualKeyCode::S, Command::Pan(Direction::Down))
            .bind(VirtualKeyCode::D, Command::Pan(Direction::Right))
            .bind(VirtualKeyCode::Up, Command::ZoomIn)
            .bind(VirtualKeyCode::Down, Command::ZoomOut)
            .bind(VirtualKeyCode::Left, Command::DecreaseBudget)
            .bind(VirtualKeyCode::Right, Command::IncreaseBudget)
    }
}
