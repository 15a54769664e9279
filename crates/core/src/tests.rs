#[cfg(test)]
mod tests {
    use crate::regs::{CTRL_CLEAR_DONE, CTRL_START, POINTS};
    use crate::sample::{report_line, test_pattern, Sample};
    use crate::sequencer::{PollConfig, Sequencer};
    use crate::sim::{Access, SimFftDevice};
    use crate::{DeviceError, FftDevice};

    fn fast_poll() -> PollConfig {
        PollConfig {
            max_polls: 100,
            spin_per_poll: 0,
        }
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let cases = [
            (0i16, 0i16),
            (1, 0),
            (0, 1),
            (1, 2),
            (-1, 0),
            (0, -1),
            (-1, -1),
            (1234, -4321),
            (i16::MAX, i16::MIN),
            (i16::MIN, i16::MAX),
        ];
        for (re, im) in cases {
            let s = Sample::new(re, im);
            assert_eq!(Sample::unpack(s.pack()), s, "({}, {})", re, im);
        }
    }

    #[test]
    fn test_pack_layout() {
        // im in the high half, re in the low half
        assert_eq!(Sample::new(1, 2).pack(), 0x0002_0001);
        assert_eq!(Sample::new(-1, 0).pack(), 0x0000_FFFF);
        assert_eq!(Sample::unpack(0x0002_0001), Sample::new(1, 2));
    }

    #[test]
    fn test_test_pattern_is_constant_fill() {
        let pattern = test_pattern();
        assert_eq!(pattern.len(), POINTS);
        for s in pattern {
            assert_eq!(s, Sample::new(1, 0));
        }
    }

    #[test]
    fn test_echo_device_roundtrip() {
        let mut dev = SimFftDevice::new();
        let input = test_pattern();

        let mut seq = Sequencer::new(&mut dev, fast_poll());
        let output = seq.run(&input).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn test_load_writes_all_words_in_order() {
        let mut dev = SimFftDevice::new();
        let input = test_pattern();

        Sequencer::new(&mut dev, fast_poll()).load(&input).unwrap();

        let writes: Vec<_> = dev
            .log()
            .iter()
            .filter_map(|a| match a {
                Access::InputWrite(i, w) => Some((*i, *w)),
                _ => None,
            })
            .collect();
        assert_eq!(writes.len(), POINTS);
        for (slot, (i, w)) in writes.iter().enumerate() {
            assert_eq!(*i, slot);
            assert_eq!(*w, input[slot].pack());
        }
        // Nothing but input writes during the load phase
        assert_eq!(dev.log().len(), POINTS);
    }

    #[test]
    fn test_status_polled_before_output_read() {
        let mut dev = SimFftDevice::new();
        dev.set_done_after_polls(3);

        let mut seq = Sequencer::new(&mut dev, fast_poll());
        seq.run(&test_pattern()).unwrap();

        let first_status = dev
            .log()
            .iter()
            .position(|a| matches!(a, Access::StatusRead))
            .expect("No status read issued");
        let first_output = dev
            .log()
            .iter()
            .position(|a| matches!(a, Access::OutputRead(_)))
            .expect("No output read issued");
        assert!(first_status < first_output);

        // Every status read that precedes the readback saw the poll through:
        // the last one before the first output read is the 4th (DONE=1).
        let status_reads_before = dev.log()[..first_output]
            .iter()
            .filter(|a| matches!(a, Access::StatusRead))
            .count();
        assert_eq!(status_reads_before, 4);
    }

    #[test]
    fn test_clear_done_once_after_full_readback() {
        let mut dev = SimFftDevice::new();

        let mut seq = Sequencer::new(&mut dev, fast_poll());
        seq.run(&test_pattern()).unwrap();

        let log = dev.log();
        let clears: Vec<usize> = log
            .iter()
            .enumerate()
            .filter_map(|(pos, a)| match a {
                Access::CtrlWrite(CTRL_CLEAR_DONE) => Some(pos),
                _ => None,
            })
            .collect();
        assert_eq!(clears.len(), 1);

        let output_reads = log
            .iter()
            .filter(|a| matches!(a, Access::OutputRead(_)))
            .count();
        assert_eq!(output_reads, POINTS);

        let last_output = log
            .iter()
            .rposition(|a| matches!(a, Access::OutputRead(_)))
            .unwrap();
        assert!(clears[0] > last_output);
        // Nothing after the acknowledge
        assert_eq!(clears[0], log.len() - 1);
    }

    #[test]
    fn test_start_command_encoding() {
        let mut dev = SimFftDevice::new();
        Sequencer::new(&mut dev, fast_poll()).start().unwrap();
        assert_eq!(dev.log(), &[Access::CtrlWrite(CTRL_START)]);
    }

    #[test]
    fn test_done_after_fifth_poll_with_preload() {
        // Scenario from the RTL bench: DONE stays low for 5 polls, output
        // word 0 holds 0x00020001.
        let mut dev = SimFftDevice::new();
        dev.set_done_after_polls(5);
        dev.preload_output(0, 0x0002_0001);

        let mut seq = Sequencer::new(&mut dev, fast_poll());
        let output = seq.run(&test_pattern()).unwrap();

        assert_eq!(output[0], Sample::new(1, 2));
        // The rest is the echo of the constant fill
        assert_eq!(output[1], Sample::new(1, 0));

        let polls = dev
            .log()
            .iter()
            .filter(|a| matches!(a, Access::StatusRead))
            .count();
        assert_eq!(polls, 6);
    }

    #[test]
    fn test_wait_done_times_out() {
        let mut dev = SimFftDevice::new();
        dev.set_done_after_polls(u32::MAX);

        let cfg = PollConfig {
            max_polls: 8,
            spin_per_poll: 0,
        };
        let mut seq = Sequencer::new(&mut dev, cfg);
        let err = seq.run(&test_pattern()).unwrap_err();
        assert!(matches!(err, DeviceError::DoneTimeout { polls: 8 }));

        // The readback never happened
        assert!(!dev
            .log()
            .iter()
            .any(|a| matches!(a, Access::OutputRead(_))));
    }

    #[test]
    fn test_sim_rejects_wrong_direction_access() {
        use crate::regs::{CTRL, OUT_BUF, STATUS};

        let mut dev = SimFftDevice::new();
        assert!(matches!(
            dev.read_word(CTRL),
            Err(DeviceError::UnmappedRegister(_))
        ));
        assert!(matches!(
            dev.write_word(STATUS, 1),
            Err(DeviceError::UnmappedRegister(_))
        ));
        assert!(matches!(
            dev.write_word(OUT_BUF, 0xDEAD),
            Err(DeviceError::UnmappedRegister(_))
        ));
        assert!(matches!(
            dev.read_word(0xFFFF_0000),
            Err(DeviceError::UnmappedRegister(0xFFFF_0000))
        ));
    }

    #[test]
    fn test_clear_done_rearms_device() {
        let mut dev = SimFftDevice::new();

        let mut seq = Sequencer::new(&mut dev, fast_poll());
        let first = seq.run(&test_pattern()).unwrap();
        let second = seq.run(&test_pattern()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_line_format() {
        assert_eq!(report_line(0, Sample::new(1, 2)), "FFT[00] = 1 + j2");
        assert_eq!(report_line(7, Sample::new(64, 0)), "FFT[07] = 64 + j0");
        assert_eq!(report_line(63, Sample::new(-3, -12)), "FFT[63] = -3 + j-12");
    }

    #[test]
    fn test_sim_from_options() {
        let opts = fftbench_config::SimOptions {
            done_after_polls: 2,
            preload: vec![fftbench_config::PreloadWord {
                index: 5,
                word: 0xFFFF_0001,
            }],
        };
        let mut dev = SimFftDevice::from_options(&opts).unwrap();
        let out = Sequencer::new(&mut dev, fast_poll())
            .run(&test_pattern())
            .unwrap();
        assert_eq!(out[5], Sample::new(1, -1));

        let bad = fftbench_config::SimOptions {
            done_after_polls: 0,
            preload: vec![fftbench_config::PreloadWord {
                index: 64,
                word: 0,
            }],
        };
        assert!(SimFftDevice::from_options(&bad).is_err());
    }
}
