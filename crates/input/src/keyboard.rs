use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Keys the scene knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Space,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    F,
    N,
    M,
    U,
    J,
    I,
    K,
}

impl Key {
    pub const ALL: [Key; 17] = [
        Key::Space,
        Key::Left,
        Key::Right,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::R,
        Key::F,
        Key::N,
        Key::M,
        Key::U,
        Key::J,
        Key::I,
        Key::K,
    ];

    /// Lowercase name used by input scripts.
    pub fn name(self) -> &'static str {
        match self {
            Key::Space => "space",
            Key::Left => "left",
            Key::Right => "right",
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::Q => "q",
            Key::E => "e",
            Key::R => "r",
            Key::F => "f",
            Key::N => "n",
            Key::M => "m",
            Key::U => "u",
            Key::J => "j",
            Key::I => "i",
            Key::K => "k",
        }
    }

    pub fn from_name(name: &str) -> Option<Key> {
        let name = name.trim().to_ascii_lowercase();
        Key::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Read side of the input collaborator, polled by the scene each frame.
pub trait InputSource {
    /// Key is held down this frame.
    fn push_key(&self, key: Key) -> bool;

    /// Key went down this frame.
    fn trigger_key(&self, key: Key) -> bool;
}

/// Current and previous frame key sets.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    current: BTreeSet<Key>,
    previous: BTreeSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame: what is held now becomes last frame's state.
    pub fn begin_frame(&mut self) {
        self.previous.clone_from(&self.current);
    }

    pub fn press(&mut self, key: Key) {
        self.current.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.current.remove(&key);
    }

    /// Replace the held set wholesale (used by scripted input).
    pub fn set_held(&mut self, keys: impl IntoIterator<Item = Key>) {
        self.current = keys.into_iter().collect();
    }

    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        self.current.iter().copied()
    }
}

impl InputSource for KeyboardState {
    fn push_key(&self, key: Key) -> bool {
        self.current.contains(&key)
    }

    fn trigger_key(&self, key: Key) -> bool {
        self.current.contains(&key) && !self.previous.contains(&key)
    }
}
