use std::io::Read;

use log::{debug, error, trace};
use nanorand::{BufferedRng, Rng, WyRand};

use crate::{
    config::Quirks,
    display::Display,
    error::Error,
    instruction::Instruction,
    keypad::{Keypad, KEY_COUNT},
};

// memory size
pub const MEM_SIZE: usize = 4096;

// start of the font sprites
pub const FONT_START: usize = 0x050;

// built-in sprites
const FONT_DATA: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

// bytes per font glyph
const FONT_GLYPH_SIZE: u16 = 5;

// subroutine stack depth
const STACK_SIZE: usize = 16;

// start of the area for user programs
pub const ADDR_START: usize = 0x200;

// rom size
pub const MAX_ROM_SIZE: usize = MEM_SIZE - ADDR_START;

/// Execution state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Normal fetch-decode-execute.
    Running,
    /// Parked on an FX0A instruction until a key goes down.
    AwaitingKey { register: usize },
    /// A fatal error happened; only `initialize` gets out of here.
    Halted,
}

#[allow(non_snake_case)]
pub struct Emulator {
    // program counter
    PC: u16,

    // full memory
    memory: [u8; MEM_SIZE],

    // data registers: V0 - VF
    V: [u8; 16],

    // address register
    I: u16,

    // subroutine stack and its pointer
    stack: [u16; STACK_SIZE],
    SP: usize,

    // delay timer
    DT: u8,

    // sound timer
    ST: u8,

    display: Display,

    // set by the engine, cleared by the renderer
    redraw: bool,

    keypad: Keypad,

    state: State,

    quirks: Quirks,

    // random number generator
    rng: BufferedRng<WyRand, 8>,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    /// A freshly initialized machine with no program loaded.
    pub fn new() -> Self {
        let mut emu = Emulator {
            PC: ADDR_START as u16,
            memory: [0u8; MEM_SIZE],
            V: [0u8; 16],
            I: 0,
            stack: [0u16; STACK_SIZE],
            SP: 0,
            DT: 0,
            ST: 0,
            display: Display::default(),
            redraw: false,
            keypad: Keypad::default(),
            state: State::Running,
            quirks: Quirks::default(),
            rng: BufferedRng::new(WyRand::new()),
        };
        emu.initialize();
        emu
    }

    /// Use a fixed seed for CXNN, making runs reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = BufferedRng::new(WyRand::new_seed(seed));
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Build an emulator and load a rom from any reader.
    pub fn load_rom<T>(rom: T) -> Result<Self, Error>
    where
        T: Read,
    {
        // read one byte past the limit so oversized roms are detected
        let mut program = Vec::with_capacity(MAX_ROM_SIZE);
        rom.take(MAX_ROM_SIZE as u64 + 1)
            .read_to_end(&mut program)?;

        let mut emu = Emulator::new();
        emu.load_program(&program)?;
        Ok(emu)
    }

    /// Put the machine back in its power-on state.
    ///
    /// Memory, registers, stack, timers, display and keys are zeroed, the
    /// font is written at `FONT_START` and PC points to `ADDR_START`.
    /// Quirks and the random source are kept.
    pub fn initialize(&mut self) {
        self.PC = ADDR_START as u16;
        self.memory = [0u8; MEM_SIZE];
        self.V = [0u8; 16];
        self.I = 0;
        self.stack = [0u16; STACK_SIZE];
        self.SP = 0;
        self.DT = 0;
        self.ST = 0;
        self.display.clear();
        self.redraw = false;
        self.keypad.release_all();
        self.state = State::Running;

        let font_area = &mut self.memory[FONT_START..FONT_START + FONT_DATA.len()];
        font_area.copy_from_slice(&FONT_DATA[..]);

        debug!("emulator initialized");
    }

    /// Copy a program image into memory at `ADDR_START`.
    ///
    /// Oversized programs are rejected and memory is left untouched.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        if program.len() > MAX_ROM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_ROM_SIZE,
            });
        }

        self.memory[ADDR_START..ADDR_START + program.len()].copy_from_slice(program);
        debug!("loaded {} byte program at {:#05X}", program.len(), ADDR_START);
        Ok(())
    }

    /// Replace the state of all 16 keys; meant to be called before each step.
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keypad.set_all(keys);
    }

    pub fn set_key(&mut self, key: u8, state: bool) {
        self.keypad.set_key(key, state);
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Whether the display changed since the renderer last cleared the flag.
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    pub fn clear_redraw(&mut self) {
        self.redraw = false;
    }

    /// Hand out the pending frame, if any, clearing the redraw flag.
    pub fn take_frame(&mut self) -> Option<&Display> {
        if self.redraw {
            self.redraw = false;
            Some(&self.display)
        } else {
            None
        }
    }

    pub fn pc(&self) -> u16 {
        self.PC
    }

    pub fn i(&self) -> u16 {
        self.I
    }

    pub fn v(&self, register: usize) -> u8 {
        self.V[register & 0xF]
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.V
    }

    pub fn sp(&self) -> usize {
        self.SP
    }

    pub fn delay_timer(&self) -> u8 {
        self.DT
    }

    pub fn sound_timer(&self) -> u8 {
        self.ST
    }

    /// Whether a tone should be playing right now.
    pub fn sound_active(&self) -> bool {
        self.ST > 0
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_awaiting_key(&self) -> bool {
        matches!(self.state, State::AwaitingKey { .. })
    }

    pub fn is_halted(&self) -> bool {
        self.state == State::Halted
    }

    /// Run a single fetch-decode-execute cycle, then update the timers.
    ///
    /// Any error halts the engine; further calls return `Error::Halted`.
    pub fn step(&mut self) -> Result<(), Error> {
        let result = match self.state {
            State::Halted => return Err(Error::Halted),
            State::AwaitingKey { register } => {
                self.poll_key(register);
                Ok(())
            }
            State::Running => self.fetch().and_then(|opcode| self.execute(opcode)),
        };

        match result {
            Ok(()) => {
                if self.state == State::Running || self.quirks.timers_while_waiting {
                    self.decrease_timers();
                }
                Ok(())
            }
            Err(err) => {
                error!("emulator halted: {}", err);
                self.state = State::Halted;
                Err(err)
            }
        }
    }

    fn decrease_timers(&mut self) {
        self.ST = self.ST.saturating_sub(1);
        self.DT = self.DT.saturating_sub(1);
    }

    /// Read the big-endian opcode at PC.
    fn fetch(&self) -> Result<u16, Error> {
        let pc = self.PC as usize;
        if pc + 1 >= MEM_SIZE {
            return Err(Error::OutOfBoundsFetch { pc: self.PC });
        }

        Ok(u16::from_be_bytes([self.memory[pc], self.memory[pc + 1]]))
    }

    /// Bounds-checked range of `len` bytes starting at `start`.
    ///
    /// An empty range touches no memory, so any `start` is accepted.
    fn mem_range(&self, start: usize, len: usize) -> Result<std::ops::Range<usize>, Error> {
        if len == 0 {
            return Ok(0..0);
        }
        if start + len > MEM_SIZE {
            return Err(Error::MemoryOutOfBounds {
                address: start + len - 1,
                pc: self.PC,
            });
        }
        Ok(start..start + len)
    }

    #[inline(always)]
    fn next(&mut self) {
        self.PC += 2;
    }

    #[inline(always)]
    fn skip_if(&mut self, condition: bool) {
        self.PC += if condition { 4 } else { 2 };
    }

    fn poll_key(&mut self, register: usize) {
        if let Some(key) = self.keypad.first_pressed() {
            self.V[register] = key;
            self.next();
            if self.state != State::Running {
                debug!("key {:X} pressed, resuming", key);
                self.state = State::Running;
            }
        } else if self.state == State::Running {
            debug!("waiting for key press into V{:X}", register);
            self.state = State::AwaitingKey { register };
        }
    }

    fn execute(&mut self, opcode: u16) -> Result<(), Error> {
        let instruction = Instruction::decode(opcode).ok_or(Error::UnsupportedOpcode {
            opcode,
            pc: self.PC,
        })?;
        trace!("{:#05X}: {:04X}  {}", self.PC, opcode, instruction);

        match instruction {
            Instruction::ClearScreen => {
                self.display.clear();
                self.redraw = true;
                self.next();
            }
            Instruction::Return => {
                if self.SP == 0 {
                    return Err(Error::StackUnderflow { pc: self.PC });
                }
                self.SP -= 1;
                self.PC = self.stack[self.SP];
                self.next();
            }
            Instruction::Jump { addr } => {
                self.PC = addr;
            }
            Instruction::Call { addr } => {
                if self.SP == STACK_SIZE {
                    return Err(Error::StackOverflow { pc: self.PC });
                }
                self.stack[self.SP] = self.PC;
                self.SP += 1;
                self.PC = addr;
            }
            Instruction::SkipEqualByte { x, nn } => self.skip_if(self.V[x] == nn),
            Instruction::SkipNotEqualByte { x, nn } => self.skip_if(self.V[x] != nn),
            Instruction::SkipEqualRegister { x, y } => self.skip_if(self.V[x] == self.V[y]),
            Instruction::LoadByte { x, nn } => {
                self.V[x] = nn;
                self.next();
            }
            // no carry flag here
            Instruction::AddByte { x, nn } => {
                self.V[x] = self.V[x].wrapping_add(nn);
                self.next();
            }
            Instruction::Move { x, y } => {
                self.V[x] = self.V[y];
                self.next();
            }
            Instruction::Or { x, y } => {
                self.V[x] |= self.V[y];
                self.next();
            }
            Instruction::And { x, y } => {
                self.V[x] &= self.V[y];
                self.next();
            }
            Instruction::Xor { x, y } => {
                self.V[x] ^= self.V[y];
                self.next();
            }
            // for the flag operations the result is written after VF, so
            // when X is F the result wins
            Instruction::AddRegister { x, y } => {
                let (result, carry) = self.V[x].overflowing_add(self.V[y]);
                self.V[0xF] = carry as u8;
                self.V[x] = result;
                self.next();
            }
            Instruction::SubRegister { x, y } => {
                let (vx, vy) = (self.V[x], self.V[y]);
                self.V[0xF] = (vx > vy) as u8;
                self.V[x] = vx.wrapping_sub(vy);
                self.next();
            }
            Instruction::ShiftRight { x, .. } => {
                let vx = self.V[x];
                self.V[0xF] = vx & 0x1;
                self.V[x] = vx >> 1;
                self.next();
            }
            Instruction::SubReverse { x, y } => {
                let (vx, vy) = (self.V[x], self.V[y]);
                self.V[0xF] = (vx <= vy) as u8;
                self.V[x] = vy.wrapping_sub(vx);
                self.next();
            }
            Instruction::ShiftLeft { x, .. } => {
                let vx = self.V[x];
                self.V[0xF] = if self.quirks.normalize_shift_flag {
                    vx >> 7
                } else {
                    vx & 0x80
                };
                self.V[x] = vx << 1;
                self.next();
            }
            Instruction::SkipNotEqualRegister { x, y } => self.skip_if(self.V[x] != self.V[y]),
            Instruction::LoadIndex { addr } => {
                self.I = addr;
                self.next();
            }
            // an out of range target is caught by the next fetch
            Instruction::JumpOffset { addr } => {
                self.PC = addr + self.V[0x0] as u16;
            }
            Instruction::Random { x, nn } => {
                let mut n = [0u8; 1];
                self.rng.fill(&mut n);
                self.V[x] = n[0] & nn;
                self.next();
            }
            Instruction::Draw { x, y, n } => {
                let (px, py) = (self.V[x] as usize, self.V[y] as usize);
                let rows = self.mem_range(self.I as usize, n as usize)?;

                self.V[0xF] = 0;
                let collision = self.display.draw_sprite(px, py, &self.memory[rows]);
                self.V[0xF] = collision as u8;
                self.redraw = true;
                self.next();
            }
            Instruction::SkipKeyPressed { x } => self.skip_if(self.keypad.is_pressed(self.V[x])),
            Instruction::SkipKeyNotPressed { x } => {
                self.skip_if(!self.keypad.is_pressed(self.V[x]))
            }
            Instruction::LoadDelay { x } => {
                self.V[x] = self.DT;
                self.next();
            }
            Instruction::WaitKey { x } => self.poll_key(x),
            Instruction::SetDelay { x } => {
                self.DT = self.V[x];
                self.next();
            }
            Instruction::SetSound { x } => {
                self.ST = self.V[x];
                self.next();
            }
            Instruction::AddIndex { x } => {
                self.I = self.I.wrapping_add(self.V[x] as u16);
                self.next();
            }
            Instruction::LoadFont { x } => {
                self.I = FONT_START as u16 + self.V[x] as u16 * FONT_GLYPH_SIZE;
                self.next();
            }
            Instruction::StoreBcd { x } => {
                let range = self.mem_range(self.I as usize, 3)?;
                let value = self.V[x];
                self.memory[range].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
                self.next();
            }
            // at the end, I will point to the byte after the last one copied
            Instruction::StoreRegisters { x } => {
                let range = self.mem_range(self.I as usize, x + 1)?;
                self.memory[range].copy_from_slice(&self.V[0..=x]);
                self.I = self.I.wrapping_add(x as u16 + 1);
                self.next();
            }
            Instruction::LoadRegisters { x } => {
                let range = self.mem_range(self.I as usize, x + 1)?;
                self.V[0..=x].copy_from_slice(&self.memory[range]);
                self.I = self.I.wrapping_add(x as u16 + 1);
                self.next();
            }
        }

        Ok(())
    }
}
