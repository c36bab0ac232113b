use std::fmt;

#[inline(always)]
fn x(opcode: u16) -> usize {
    ((opcode >> 8) & 0xF) as usize
}

#[inline(always)]
fn y(opcode: u16) -> usize {
    ((opcode >> 4) & 0xF) as usize
}

#[inline(always)]
fn n(opcode: u16) -> u8 {
    (opcode & 0xF) as u8
}

#[inline(always)]
fn nn(opcode: u16) -> u8 {
    (opcode & 0xFF) as u8
}

#[inline(always)]
fn nnn(opcode: u16) -> u16 {
    opcode & 0xFFF
}

/// A decoded chip-8 instruction.
///
/// `x` and `y` are register indexes (0x0 - 0xF), `nn` is an immediate byte
/// and `addr` a 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { addr: u16 },
    /// 2NNN
    Call { addr: u16 },
    /// 3XNN
    SkipEqualByte { x: usize, nn: u8 },
    /// 4XNN
    SkipNotEqualByte { x: usize, nn: u8 },
    /// 5XY0
    SkipEqualRegister { x: usize, y: usize },
    /// 6XNN
    LoadByte { x: usize, nn: u8 },
    /// 7XNN
    AddByte { x: usize, nn: u8 },
    /// 8XY0
    Move { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4
    AddRegister { x: usize, y: usize },
    /// 8XY5
    SubRegister { x: usize, y: usize },
    /// 8XY6
    ShiftRight { x: usize, y: usize },
    /// 8XY7
    SubReverse { x: usize, y: usize },
    /// 8XYE
    ShiftLeft { x: usize, y: usize },
    /// 9XY0
    SkipNotEqualRegister { x: usize, y: usize },
    /// ANNN
    LoadIndex { addr: u16 },
    /// BNNN
    JumpOffset { addr: u16 },
    /// CXNN
    Random { x: usize, nn: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E
    SkipKeyPressed { x: usize },
    /// EXA1
    SkipKeyNotPressed { x: usize },
    /// FX07
    LoadDelay { x: usize },
    /// FX0A
    WaitKey { x: usize },
    /// FX15
    SetDelay { x: usize },
    /// FX18
    SetSound { x: usize },
    /// FX1E
    AddIndex { x: usize },
    /// FX29
    LoadFont { x: usize },
    /// FX33
    StoreBcd { x: usize },
    /// FX55
    StoreRegisters { x: usize },
    /// FX65
    LoadRegisters { x: usize },
}

impl Instruction {
    /// Decode a raw opcode, or `None` if it is not part of the base instruction set.
    ///
    /// Families 0x5 and 0x9 only have one instruction each, so their low
    /// nibble is not checked.
    pub fn decode(opcode: u16) -> Option<Self> {
        let instruction = match opcode >> 12 {
            0x0 => match nn(opcode) {
                0xE0 if nnn(opcode) == 0x0E0 => Instruction::ClearScreen,
                0xEE if nnn(opcode) == 0x0EE => Instruction::Return,
                _ => return None,
            },
            0x1 => Instruction::Jump { addr: nnn(opcode) },
            0x2 => Instruction::Call { addr: nnn(opcode) },
            0x3 => Instruction::SkipEqualByte {
                x: x(opcode),
                nn: nn(opcode),
            },
            0x4 => Instruction::SkipNotEqualByte {
                x: x(opcode),
                nn: nn(opcode),
            },
            0x5 => Instruction::SkipEqualRegister {
                x: x(opcode),
                y: y(opcode),
            },
            0x6 => Instruction::LoadByte {
                x: x(opcode),
                nn: nn(opcode),
            },
            0x7 => Instruction::AddByte {
                x: x(opcode),
                nn: nn(opcode),
            },
            0x8 => {
                let (x, y) = (x(opcode), y(opcode));
                match n(opcode) {
                    0x0 => Instruction::Move { x, y },
                    0x1 => Instruction::Or { x, y },
                    0x2 => Instruction::And { x, y },
                    0x3 => Instruction::Xor { x, y },
                    0x4 => Instruction::AddRegister { x, y },
                    0x5 => Instruction::SubRegister { x, y },
                    0x6 => Instruction::ShiftRight { x, y },
                    0x7 => Instruction::SubReverse { x, y },
                    0xE => Instruction::ShiftLeft { x, y },
                    _ => return None,
                }
            }
            0x9 => Instruction::SkipNotEqualRegister {
                x: x(opcode),
                y: y(opcode),
            },
            0xA => Instruction::LoadIndex { addr: nnn(opcode) },
            0xB => Instruction::JumpOffset { addr: nnn(opcode) },
            0xC => Instruction::Random {
                x: x(opcode),
                nn: nn(opcode),
            },
            0xD => Instruction::Draw {
                x: x(opcode),
                y: y(opcode),
                n: n(opcode),
            },
            0xE => {
                let x = x(opcode);
                match nn(opcode) {
                    0x9E => Instruction::SkipKeyPressed { x },
                    0xA1 => Instruction::SkipKeyNotPressed { x },
                    _ => return None,
                }
            }
            0xF => {
                let x = x(opcode);
                match nn(opcode) {
                    0x07 => Instruction::LoadDelay { x },
                    0x0A => Instruction::WaitKey { x },
                    0x15 => Instruction::SetDelay { x },
                    0x18 => Instruction::SetSound { x },
                    0x1E => Instruction::AddIndex { x },
                    0x29 => Instruction::LoadFont { x },
                    0x33 => Instruction::StoreBcd { x },
                    0x55 => Instruction::StoreRegisters { x },
                    0x65 => Instruction::LoadRegisters { x },
                    _ => return None,
                }
            }
            _ => unreachable!("opcode >> 12 is a single nibble"),
        };

        Some(instruction)
    }
}

/// Disassembly, using the usual Cowgod mnemonics.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::ClearScreen => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump { addr } => write!(f, "JP {:#05X}", addr),
            Instruction::Call { addr } => write!(f, "CALL {:#05X}", addr),
            Instruction::SkipEqualByte { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            Instruction::SkipNotEqualByte { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            Instruction::SkipEqualRegister { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::LoadByte { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Instruction::AddByte { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Instruction::Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddRegister { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::SubRegister { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight { x, .. } => write!(f, "SHR V{:X}", x),
            Instruction::SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft { x, .. } => write!(f, "SHL V{:X}", x),
            Instruction::SkipNotEqualRegister { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::LoadIndex { addr } => write!(f, "LD I, {:#05X}", addr),
            Instruction::JumpOffset { addr } => write!(f, "JP V0, {:#05X}", addr),
            Instruction::Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            Instruction::LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::LoadFont { x } => write!(f, "LD F, V{:X}", x),
            Instruction::StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
