/// Behaviour switches for the places where interpreters disagree.
///
/// The defaults reproduce the classic behaviour this engine was written
/// against, quirks included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8XYE normally leaves the raw masked MSB (`0x00` or `0x80`) in VF.
    /// When set, VF gets `0` or `1` instead, like the other flag opcodes.
    pub normalize_shift_flag: bool,

    /// Keep decrementing the timers while FX0A is waiting for a key.
    pub timers_while_waiting: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            normalize_shift_flag: false,
            timers_while_waiting: true,
        }
    }
}
