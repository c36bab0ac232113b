use thiserror::Error;

use rc8_engine::KEY_COUNT;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeymapError {
    #[error("key '{0}' is not bound to any chip-8 key")]
    Unbound(char),
}

/// Makes the key binding tables less verbose
macro_rules! map_keys {
    ($key:expr, $($host:pat => $chip8:expr,)*) => {
        match $key {
            $($host => Some($chip8),)*
            _ => None,
        }
    };
}

/// Host keyboard layouts
pub enum Keymap {
    /// 1234/QWER/ASDF/ZXCV mapped onto the COSMAC VIP hex keypad
    Chip8,
}

impl Keymap {
    /// Translate a host key into a chip-8 key code
    pub fn translate(&self, key: char) -> Option<u8> {
        match self {
            Keymap::Chip8 => map_keys!(key.to_ascii_lowercase(),
                '1' => 0x01,
                '2' => 0x02,
                '3' => 0x03,
                '4' => 0x0C,
                'q' => 0x04,
                'w' => 0x05,
                'e' => 0x06,
                'r' => 0x0D,
                'a' => 0x07,
                's' => 0x08,
                'd' => 0x09,
                'f' => 0x0E,
                'z' => 0x0A,
                'x' => 0x00,
                'c' => 0x0B,
                'v' => 0x0F,
            ),
        }
    }

    /// Key state with every host key in `keys` held down
    pub fn held_keys(&self, keys: &str) -> Result<[bool; KEY_COUNT], KeymapError> {
        let mut state = [false; KEY_COUNT];
        for key in keys.chars() {
            let code = self.translate(key).ok_or(KeymapError::Unbound(key))?;
            state[code as usize] = true;
        }
        Ok(state)
    }
}
