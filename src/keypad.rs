pub const KEY_COUNT: usize = 16;

/// Key-down status of the 16 chip-8 keys, indexed by key code.
///
/// Written by whoever drives the emulator, once per step; the engine only reads it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    /// Replace the state of all keys at once.
    pub fn set_all(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    pub fn set_key(&mut self, key: u8, state: bool) {
        self.keys[(key & 0xF) as usize] = state;
    }

    /// Only the low nibble of `key` is considered.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// The lowest-numbered key currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&state| state).map(|key| key as u8)
    }

    pub(crate) fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}
