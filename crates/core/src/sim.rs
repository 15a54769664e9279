//! Simulated FFT accelerator.
//!
//! Mock peripheral standing in for the real block during host-side runs and
//! tests. It enforces the register-map access directions, models completion
//! latency as a number of status polls, and keeps a log of every bus access
//! so tests can check the driver's sequencing.

use crate::regs::{
    Status, CTRL, CTRL_CLEAR_DONE, CTRL_START, IN_BUF, OUT_BUF, POINTS, STATUS,
};
use crate::{DeviceError, DeviceResult, FftDevice};
use fftbench_config::SimOptions;

/// One observed register access, in program order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    CtrlWrite(u32),
    StatusRead,
    InputWrite(usize, u32),
    OutputRead(usize),
}

#[derive(Debug)]
pub struct SimFftDevice {
    in_buf: [u32; POINTS],
    out_buf: [u32; POINTS],
    /// Words forced into the output buffer after the echo, index/value pairs.
    preload: Vec<(usize, u32)>,
    running: bool,
    done: bool,
    /// Number of status reads before DONE asserts, once a transform started.
    done_after_polls: u32,
    polls_seen: u32,
    log: Vec<Access>,
}

impl Default for SimFftDevice {
    fn default() -> Self {
        Self {
            in_buf: [0; POINTS],
            out_buf: [0; POINTS],
            preload: Vec::new(),
            running: false,
            done: false,
            done_after_polls: 0,
            polls_seen: 0,
            log: Vec::new(),
        }
    }
}

impl SimFftDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(opts: &SimOptions) -> anyhow::Result<Self> {
        let mut dev = Self {
            done_after_polls: opts.done_after_polls,
            ..Self::default()
        };
        for p in &opts.preload {
            if p.index >= POINTS {
                anyhow::bail!("Preload index {} outside 0..{}", p.index, POINTS);
            }
            dev.preload.push((p.index, p.word));
        }
        Ok(dev)
    }

    /// Delay DONE until `polls` status reads have been observed.
    pub fn set_done_after_polls(&mut self, polls: u32) {
        self.done_after_polls = polls;
    }

    /// Force `word` into output slot `index` on the next transform, after the
    /// echo. Lets tests inject known vectors without a real FFT model.
    pub fn preload_output(&mut self, index: usize, word: u32) {
        assert!(index < POINTS);
        self.preload.push((index, word));
    }

    pub fn log(&self) -> &[Access] {
        &self.log
    }

    /// CTRL=1: latch the input and "compute". There is no FFT model here;
    /// the output is the input echoed back, with preloads applied on top.
    fn start(&mut self) {
        self.out_buf = self.in_buf;
        for &(i, w) in &self.preload {
            self.out_buf[i] = w;
        }
        self.running = true;
        self.done = false;
        self.polls_seen = 0;
    }

    fn clear_done(&mut self) {
        self.running = false;
        self.done = false;
        self.polls_seen = 0;
    }

    fn read_status(&mut self) -> u32 {
        if self.running && !self.done {
            self.polls_seen += 1;
            if self.polls_seen > self.done_after_polls {
                self.done = true;
            }
        }
        if self.done {
            Status::DONE.bits()
        } else {
            Status::empty().bits()
        }
    }
}

impl FftDevice for SimFftDevice {
    fn read_word(&mut self, offset: u32) -> DeviceResult<u32> {
        match offset {
            STATUS => {
                self.log.push(Access::StatusRead);
                Ok(self.read_status())
            }
            o if (OUT_BUF..OUT_BUF + 4 * POINTS as u32).contains(&o) && o % 4 == 0 => {
                let i = ((o - OUT_BUF) / 4) as usize;
                self.log.push(Access::OutputRead(i));
                Ok(self.out_buf[i])
            }
            // CTRL is write-only and the input buffer is not readable back.
            _ => Err(DeviceError::UnmappedRegister(offset)),
        }
    }

    fn write_word(&mut self, offset: u32, value: u32) -> DeviceResult<()> {
        match offset {
            CTRL => {
                self.log.push(Access::CtrlWrite(value));
                match value {
                    CTRL_START => self.start(),
                    CTRL_CLEAR_DONE => self.clear_done(),
                    _ => tracing::warn!(value, "Unknown CTRL command ignored"),
                }
                Ok(())
            }
            o if (IN_BUF..IN_BUF + 4 * POINTS as u32).contains(&o) && o % 4 == 0 => {
                let i = ((o - IN_BUF) / 4) as usize;
                self.log.push(Access::InputWrite(i, value));
                self.in_buf[i] = value;
                Ok(())
            }
            // STATUS and the output buffer are read-only.
            _ => Err(DeviceError::UnmappedRegister(offset)),
        }
    }
}

// The output buffer must start past the end of the input buffer.
const _: () = assert!(OUT_BUF >= IN_BUF + 4 * POINTS as u32);
