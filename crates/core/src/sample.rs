use crate::regs::POINTS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One complex sample: two signed 16-bit halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub re: i16,
    pub im: i16,
}

impl Sample {
    pub const fn new(re: i16, im: i16) -> Self {
        Self { re, im }
    }

    /// Pack into the accelerator's wire format: imaginary half in the high
    /// 16 bits, real half in the low 16 bits.
    pub fn pack(self) -> u32 {
        ((self.im as u16 as u32) << 16) | (self.re as u16 as u32)
    }

    /// Unpack from the wire format, truncating each half to 16 bits.
    pub fn unpack(word: u32) -> Self {
        Self {
            re: (word & 0xFFFF) as u16 as i16,
            im: ((word >> 16) & 0xFFFF) as u16 as i16,
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + j{}", self.re, self.im)
    }
}

/// The bring-up test input: a constant fill of (1, 0) across all 64 slots.
/// The RTL testbench uses the same vector, so the expected output is known.
pub fn test_pattern() -> [Sample; POINTS] {
    [Sample::new(1, 0); POINTS]
}

/// Diagnostic line for output sample `index`, e.g. `FFT[07] = 64 + j0`.
pub fn report_line(index: usize, sample: Sample) -> String {
    format!("FFT[{:02}] = {}", index, sample)
}
