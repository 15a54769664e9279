#![no_std]
#![no_main]

use core::sync::atomic::{fence, Ordering};
use panic_halt as _;
use riscv_rt::entry;

#[cfg(feature = "report")]
use core::fmt::Write;

/// Base of the FFT accelerator aperture.
const FFT_BASE: *mut u32 = 0x0300_0000 as *mut u32;

const POINTS: usize = 64;

const CTRL_START: u32 = 0x1;
const CTRL_CLEAR_DONE: u32 = 0x2;
const STATUS_DONE: u32 = 0x1;

// Word indices within the aperture: CTRL at +0x00, STATUS at +0x04,
// input buffer at +0x08, output buffer at +0x108.
const CTRL_WORD: usize = 0;
const STATUS_WORD: usize = 1;
const IN_WORD0: usize = 2;
const OUT_WORD0: usize = 66;

/// Poll budget before the driver declares the device dead. The original
/// bring-up code waited forever; a bounded wait at least lets us report.
const MAX_POLLS: u32 = 100_000;
const SPIN_PER_POLL: u32 = 1_000;

/// Register-level view of the accelerator.
struct Fft {
    base: *mut u32,
}

impl Fft {
    /// # Safety
    /// `base` must point at the accelerator's register aperture.
    const unsafe fn new(base: *mut u32) -> Self {
        Self { base }
    }

    fn start(&mut self) {
        unsafe { self.base.add(CTRL_WORD).write_volatile(CTRL_START) }
    }

    fn clear_done(&mut self) {
        unsafe { self.base.add(CTRL_WORD).write_volatile(CTRL_CLEAR_DONE) }
    }

    fn read_status(&self) -> u32 {
        unsafe { self.base.add(STATUS_WORD).read_volatile() }
    }

    fn write_input(&mut self, i: usize, word: u32) {
        debug_assert!(i < POINTS);
        unsafe { self.base.add(IN_WORD0 + i).write_volatile(word) }
    }

    fn read_output(&self, i: usize) -> u32 {
        debug_assert!(i < POINTS);
        unsafe { self.base.add(OUT_WORD0 + i).read_volatile() }
    }
}

/// im in the high half, re in the low half.
fn pack(re: i16, im: i16) -> u32 {
    ((im as u16 as u32) << 16) | (re as u16 as u32)
}

fn unpack(word: u32) -> (i16, i16) {
    let re = (word & 0xFFFF) as u16 as i16;
    let im = ((word >> 16) & 0xFFFF) as u16 as i16;
    (re, im)
}

/// Calibrated busy-wait between status polls; keeps polling pressure off the
/// bus. Not a real timer.
fn spin(iterations: u32) {
    for _ in 0..iterations {
        core::hint::spin_loop();
    }
}

fn wait_done(fft: &Fft) -> bool {
    for _ in 0..MAX_POLLS {
        if fft.read_status() & STATUS_DONE != 0 {
            return true;
        }
        spin(SPIN_PER_POLL);
    }
    false
}

#[cfg(feature = "report")]
mod uart {
    /// Minimal TX-only view of the debug UART.
    pub struct Uart {
        tx: *mut u8,
    }

    pub const UART_BASE: *mut u8 = 0x0200_0000 as *mut u8;

    impl Uart {
        /// # Safety
        /// `base` must point at the UART TX register.
        pub const unsafe fn new(base: *mut u8) -> Self {
            Self { tx: base }
        }

        fn send(&mut self, byte: u8) {
            unsafe { self.tx.write_volatile(byte) }
        }
    }

    impl core::fmt::Write for Uart {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            for b in s.bytes() {
                self.send(b);
            }
            Ok(())
        }
    }
}

#[entry]
fn main() -> ! {
    let mut fft = unsafe { Fft::new(FFT_BASE) };

    // Constant test vector: (1, 0) in every slot. Matches the RTL bench.
    let input_re = [1i16; POINTS];
    let input_im = [0i16; POINTS];
    let mut output_re = [0i16; POINTS];
    let mut output_im = [0i16; POINTS];

    for i in 0..POINTS {
        fft.write_input(i, pack(input_re[i], input_im[i]));
    }

    // Input words must be visible to the device before the start command.
    fence(Ordering::Release);
    fft.start();

    let done = wait_done(&fft);

    if done {
        fence(Ordering::Acquire);
        for i in 0..POINTS {
            let (re, im) = unpack(fft.read_output(i));
            output_re[i] = re;
            output_im[i] = im;
        }
        fft.clear_done();
    }

    #[cfg(feature = "report")]
    {
        let mut uart = unsafe { uart::Uart::new(uart::UART_BASE) };
        if done {
            for i in 0..POINTS {
                let _ = writeln!(uart, "FFT[{:02}] = {} + j{}", i, output_re[i], output_im[i]);
            }
        } else {
            let _ = writeln!(uart, "FFT: no DONE after {} polls", MAX_POLLS);
        }
    }

    #[cfg(not(feature = "report"))]
    let _ = (&output_re, &output_im);

    // One transform per boot; park here.
    loop {}
}
