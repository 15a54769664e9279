use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Points per transform; fixed by the accelerator hardware.
pub const POINTS: usize = 64;

fn default_spin_per_poll() -> u32 {
    1_000
}

/// Behavior knobs for the simulated accelerator.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SimOptions {
    /// Status polls the device absorbs before asserting DONE.
    #[serde(default)]
    pub done_after_polls: u32,
    /// Output words forced after the echo, for known test vectors.
    #[serde(default)]
    pub preload: Vec<PreloadWord>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PreloadWord {
    pub index: usize,
    pub word: u32,
}

/// Poll-loop limits for one run.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RunLimits {
    pub max_polls: u32,
    #[serde(default = "default_spin_per_poll")]
    pub spin_per_poll: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Done,
    Timeout,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SampleAssertion {
    pub index: usize,
    pub re: i16,
    pub im: i16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct StopReasonAssertion {
    pub expected_stop_reason: StopReason,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum BenchAssertion {
    Sample(SampleAssertion),
    ExpectedStopReason(StopReasonAssertion),
}

/// One bench run: device behavior, poll limits, and pass criteria.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BenchScript {
    pub schema_version: String,
    #[serde(default)]
    pub device: SimOptions,
    pub limits: RunLimits,
    /// Emit the per-sample diagnostic lines.
    #[serde(default)]
    pub report: bool,
    #[serde(default)]
    pub assertions: Vec<BenchAssertion>,
}

impl BenchScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open bench script at {:?}", path.as_ref()))?;
        let script: Self =
            serde_yaml::from_reader(f).context("Failed to parse bench script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        if self.limits.max_polls == 0 {
            anyhow::bail!("Limit 'max_polls' must be greater than zero");
        }

        for p in &self.device.preload {
            if p.index >= POINTS {
                anyhow::bail!(
                    "Preload index {} out of range (device has {} points)",
                    p.index,
                    POINTS
                );
            }
        }

        for a in &self.assertions {
            if let BenchAssertion::Sample(s) = a {
                if s.index >= POINTS {
                    anyhow::bail!(
                        "Assertion index {} out of range (device has {} points)",
                        s.index,
                        POINTS
                    );
                }
            }
        }

        Ok(())
    }
}
