use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// Apart from `ProgramTooLarge` and `Io`, which reject a load and leave the
/// machine as it was, every variant is fatal: the emulator halts and stays
/// halted until it is reset.
#[derive(Error, Debug)]
pub enum Error {
    #[error("program has {size} bytes, but only {max} fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("cannot fetch instruction at address {pc:#05X}: past the end of memory")]
    OutOfBoundsFetch { pc: u16 },

    #[error("unsupported instruction at address {pc:#05X}: {opcode:04X}")]
    UnsupportedOpcode { opcode: u16, pc: u16 },

    #[error("stack overflow on subroutine call at address {pc:#05X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow on return at address {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("memory access at {address:#06X} out of bounds (instruction at {pc:#05X})")]
    MemoryOutOfBounds { address: usize, pc: u16 },

    #[error("emulator is halted")]
    Halted,

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}
