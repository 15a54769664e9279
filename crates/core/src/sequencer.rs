//! The device sequencer: the fixed load / start / wait / read / acknowledge
//! order the accelerator expects for one transform.

use crate::regs::{in_word, out_word, Status, CTRL, CTRL_CLEAR_DONE, CTRL_START, POINTS, STATUS};
use crate::sample::Sample;
use crate::{DeviceError, DeviceResult, FftDevice};
use fftbench_config::RunLimits;

/// Poll-loop tuning.
///
/// The original bring-up code spun on STATUS forever; a dead device hung the
/// board with no diagnostic. Here the loop carries an explicit poll budget
/// and reports [`DeviceError::DoneTimeout`] when it runs out.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Maximum number of STATUS reads before giving up.
    pub max_polls: u32,
    /// Spin-loop iterations between consecutive STATUS reads.
    pub spin_per_poll: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_polls: 100_000,
            spin_per_poll: 1_000,
        }
    }
}

impl From<&RunLimits> for PollConfig {
    fn from(limits: &RunLimits) -> Self {
        Self {
            max_polls: limits.max_polls,
            spin_per_poll: limits.spin_per_poll,
        }
    }
}

/// Drives one transform through an [`FftDevice`].
pub struct Sequencer<'d, D: FftDevice> {
    dev: &'d mut D,
    cfg: PollConfig,
}

impl<'d, D: FftDevice> Sequencer<'d, D> {
    pub fn new(dev: &'d mut D, cfg: PollConfig) -> Self {
        Self { dev, cfg }
    }

    /// Pack and write all 64 input samples, in index order, to consecutive
    /// input-buffer words.
    pub fn load(&mut self, input: &[Sample; POINTS]) -> DeviceResult<()> {
        for (i, s) in input.iter().enumerate() {
            self.dev.write_word(in_word(i), s.pack())?;
        }
        tracing::debug!(points = POINTS, "Input buffer loaded");
        Ok(())
    }

    /// Kick off the transform.
    pub fn start(&mut self) -> DeviceResult<()> {
        self.dev.write_word(CTRL, CTRL_START)
    }

    /// Poll STATUS until DONE, spinning between reads. Returns the number of
    /// polls it took; `DoneTimeout` once the budget is exhausted.
    pub fn wait_done(&mut self) -> DeviceResult<u32> {
        for poll in 1..=self.cfg.max_polls {
            let status = Status::from_bits_truncate(self.dev.read_word(STATUS)?);
            if status.contains(Status::DONE) {
                tracing::debug!(polls = poll, "DONE asserted");
                return Ok(poll);
            }
            spin(self.cfg.spin_per_poll);
        }
        Err(DeviceError::DoneTimeout {
            polls: self.cfg.max_polls,
        })
    }

    /// Read back and unpack all 64 output words, in index order.
    pub fn read_output(&mut self) -> DeviceResult<[Sample; POINTS]> {
        let mut out = [Sample::default(); POINTS];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Sample::unpack(self.dev.read_word(out_word(i))?);
        }
        Ok(out)
    }

    /// Acknowledge completion, re-arming the block for the next run.
    pub fn clear_done(&mut self) -> DeviceResult<()> {
        self.dev.write_word(CTRL, CTRL_CLEAR_DONE)
    }

    /// One full transform: load, start, wait for DONE, read back, clear the
    /// flag. The DONE check always happens before any output word is read,
    /// and CTRL=2 is written exactly once, after the full readback.
    pub fn run(&mut self, input: &[Sample; POINTS]) -> DeviceResult<[Sample; POINTS]> {
        tracing::info!("Loading {} samples", POINTS);
        self.load(input)?;
        tracing::info!("Starting transform");
        self.start()?;
        let polls = self.wait_done()?;
        tracing::info!(polls, "Transform complete, reading back");
        let out = self.read_output()?;
        self.clear_done()?;
        Ok(out)
    }
}

/// Calibrated busy-wait between polls. Not a timer; just backs off the bus.
fn spin(iterations: u32) {
    for _ in 0..iterations {
        std::hint::spin_loop();
    }
}
