//! A CHIP-8 execution engine.
//!
//! The [`Emulator`] owns the whole machine (memory, registers, stack, timers,
//! display and keypad) and advances it one instruction per [`Emulator::step`].
//! Everything around it (windowing, keyboard capture, pacing) is left to
//! whoever drives the loop:
//!
//! ```
//! use rc8_engine::Emulator;
//!
//! let rom: [u8; 4] = [0x60, 0x05, 0x12, 0x02];
//! let mut emu = Emulator::load_rom(&rom[..]).unwrap();
//!
//! emu.set_keys([false; 16]);
//! emu.step().unwrap();
//! if let Some(frame) = emu.take_frame() {
//!     // render frame.pixels()
//!     let _ = frame;
//! }
//! assert_eq!(emu.v(0), 5);
//! ```

mod config;
mod display;
mod emulator;
mod error;
mod instruction;
mod keypad;

pub use config::Quirks;
pub use display::{Display, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use emulator::{Emulator, State, ADDR_START, FONT_START, MAX_ROM_SIZE, MEM_SIZE};
pub use error::Error;
pub use instruction::Instruction;
pub use keypad::{Keypad, KEY_COUNT};
