//! Register map of the 64-point FFT accelerator block.
//!
//! The block occupies a single aperture: a write-only control word, a
//! read-only status word, then two 64-word sample buffers. All offsets are
//! byte offsets from [`FFT_BASE`].

use bitflags::bitflags;

/// Base address of the accelerator aperture on the SoC bus.
pub const FFT_BASE: u32 = 0x0300_0000;

/// Control register offset (write-only).
pub const CTRL: u32 = 0x00;
/// Status register offset (read-only).
pub const STATUS: u32 = 0x04;
/// First input-buffer word offset.
pub const IN_BUF: u32 = 0x08;
/// First output-buffer word offset.
pub const OUT_BUF: u32 = 0x108;

/// Number of complex points per transform. Fixed in hardware.
pub const POINTS: usize = 64;

/// CTRL command: start a transform over the input buffer.
pub const CTRL_START: u32 = 0x1;
/// CTRL command: clear the DONE/IRQ flag, re-arming the block.
pub const CTRL_CLEAR_DONE: u32 = 0x2;

bitflags! {
    /// STATUS register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u32 {
        /// Transform finished; output buffer is valid.
        const DONE = 1 << 0;
    }
}

/// Offset of input-buffer word `i`.
pub fn in_word(i: usize) -> u32 {
    debug_assert!(i < POINTS);
    IN_BUF + 4 * i as u32
}

/// Offset of output-buffer word `i`.
pub fn out_word(i: usize) -> u32 {
    debug_assert!(i < POINTS);
    OUT_BUF + 4 * i as u32
}
