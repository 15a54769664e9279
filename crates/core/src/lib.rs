pub mod regs;
pub mod sample;
pub mod sequencer;
pub mod sim;

mod tests;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Unmapped or wrong-direction register access at offset {0:#x}")]
    UnmappedRegister(u32),
    #[error("Device never asserted DONE after {polls} status polls")]
    DoneTimeout { polls: u32 },
}

pub type DeviceResult<T> = Result<T, DeviceError>;

/// Trait representing the accelerator's word-wide register interface.
///
/// Offsets are byte offsets relative to the device base address, and every
/// access moves exactly one 32-bit word; the hardware exposes one packed
/// sample per word. Implementors decide what backs the registers: the
/// simulator keeps them in plain buffers, on-target code maps them onto
/// volatile MMIO.
pub trait FftDevice {
    fn read_word(&mut self, offset: u32) -> DeviceResult<u32>;
    fn write_word(&mut self, offset: u32, value: u32) -> DeviceResult<()>;
}
