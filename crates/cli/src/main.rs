use clap::Parser;
use fftbench_config::{BenchAssertion, BenchScript, RunLimits, SimOptions, StopReason};
use fftbench_core::regs::POINTS;
use fftbench_core::sample::{report_line, test_pattern, Sample};
use fftbench_core::sequencer::{PollConfig, Sequencer};
use fftbench_core::sim::SimFftDevice;
use fftbench_core::DeviceError;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "fftbench - FFT accelerator bring-up bench", long_about = None)]
struct Args {
    /// Path to a bench script (YAML)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Maximum number of status polls before reporting a timeout
    #[arg(long, default_value = "100000")]
    max_polls: u32,

    /// Spin-loop iterations between status polls
    #[arg(long, default_value = "1000")]
    spin: u32,

    /// Status polls the simulated device absorbs before asserting DONE
    #[arg(long, default_value = "0")]
    done_after_polls: u32,

    /// Print one "FFT[NN] = R + jI" line per output sample
    #[arg(short, long)]
    report: bool,

    /// Enable verbose execution tracing
    #[arg(short, long)]
    trace: bool,

    /// Directory to write result.json into
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    info!("Starting fftbench");

    let (device_opts, limits, report, assertions) = match &args.script {
        Some(path) => {
            info!("Loading bench script: {:?}", path);
            let script = BenchScript::from_file(path)?;
            (
                script.device,
                script.limits,
                script.report || args.report,
                script.assertions,
            )
        }
        None => (
            SimOptions {
                done_after_polls: args.done_after_polls,
                preload: Vec::new(),
            },
            RunLimits {
                max_polls: args.max_polls,
                spin_per_poll: args.spin,
            },
            args.report,
            Vec::new(),
        ),
    };

    let mut dev = SimFftDevice::from_options(&device_opts)?;
    let cfg = PollConfig::from(&limits);

    info!("Running one transform against the simulated device");
    let mut seq = Sequencer::new(&mut dev, cfg);
    let (stop_reason, samples) = match seq.run(&test_pattern()) {
        Ok(out) => (StopReason::Done, Some(out)),
        Err(DeviceError::DoneTimeout { polls }) => {
            info!("Device never asserted DONE within {} polls", polls);
            (StopReason::Timeout, None)
        }
        Err(e) => return Err(e.into()),
    };

    if report {
        if let Some(out) = &samples {
            for (i, s) in out.iter().enumerate() {
                println!("{}", report_line(i, *s));
            }
        }
    }

    let failures = check_assertions(&assertions, stop_reason, samples.as_ref());

    if let Some(dir) = &args.output_dir {
        write_result(dir, &args, stop_reason, samples.as_ref(), &failures)?;
    }

    for f in &failures {
        tracing::error!("Assertion failed: {}", f);
    }
    if !failures.is_empty() {
        anyhow::bail!("{} assertion(s) failed", failures.len());
    }
    if assertions.is_empty() && stop_reason == StopReason::Timeout {
        anyhow::bail!("Timed out waiting for DONE");
    }

    info!("Run finished: {:?}", stop_reason);
    Ok(())
}

fn check_assertions(
    assertions: &[BenchAssertion],
    stop_reason: StopReason,
    samples: Option<&[Sample; POINTS]>,
) -> Vec<String> {
    let mut failures = Vec::new();
    for a in assertions {
        match a {
            BenchAssertion::Sample(expect) => match samples {
                Some(out) => {
                    let got = out[expect.index];
                    if got != Sample::new(expect.re, expect.im) {
                        failures.push(format!(
                            "sample[{}]: expected {} + j{}, got {}",
                            expect.index, expect.re, expect.im, got
                        ));
                    }
                }
                None => failures.push(format!(
                    "sample[{}]: no output (run timed out)",
                    expect.index
                )),
            },
            BenchAssertion::ExpectedStopReason(expect) => {
                if expect.expected_stop_reason != stop_reason {
                    failures.push(format!(
                        "stop reason: expected {:?}, got {:?}",
                        expect.expected_stop_reason, stop_reason
                    ));
                }
            }
        }
    }
    failures
}

fn write_result(
    dir: &PathBuf,
    args: &Args,
    stop_reason: StopReason,
    samples: Option<&[Sample; POINTS]>,
    failures: &[String],
) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;

    let script_hash = match &args.script {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            let digest = Sha256::digest(&bytes);
            Some(digest.iter().map(|b| format!("{:02x}", b)).collect::<String>())
        }
        None => None,
    };

    let samples_json = samples.map(|out| {
        out.iter()
            .enumerate()
            .map(|(i, s)| serde_json::json!({"index": i, "re": s.re, "im": s.im}))
            .collect::<Vec<_>>()
    });

    let result = serde_json::json!({
        "status": if failures.is_empty() { "pass" } else { "fail" },
        "stop_reason": stop_reason,
        "script": args.script.as_ref().map(|p| p.display().to_string()),
        "script_hash": script_hash,
        "samples": samples_json,
        "failures": failures,
    });

    let path = dir.join("result.json");
    std::fs::write(&path, serde_json::to_string_pretty(&result)?)?;
    info!("Wrote {:?}", path);
    Ok(())
}
