use std::f64::consts::TAU;

use chrono::{DateTime, Duration, Utc};
use num_complex::Complex64;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg64Mcg;
use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

use super::config::{ChannelConfig, ChannelControl};
use super::error::ChannelError;
use super::report::{ImpairmentReport, ProcessedBlock};
use crate::config::{ConfigError, Scenario};
use crate::link::{HorizonPolicy, ImpairmentModeConfig, ImpairmentSample, LinkBudgetModel};
use crate::tracker::{PointingSnapshot, Tracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ChannelState {
    Idle,
    Streaming,
    /// The cursor passed the window end; every further block fails.
    Exhausted,
}

/// Simulated time as an anchor instant plus samples counted since it.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    anchor: DateTime<Utc>,
    samples_since_anchor: u64,
    sample_rate_hz: f64,
}

impl Cursor {
    fn now(&self) -> DateTime<Utc> {
        let ns = self.samples_since_anchor as f64 / self.sample_rate_hz * 1e9;
        self.anchor + Duration::nanoseconds(ns.round() as i64)
    }

    fn reanchor(&mut self, sample_rate_hz: f64) {
        self.anchor = self.now();
        self.samples_since_anchor = 0;
        self.sample_rate_hz = sample_rate_hz;
    }
}

/// Per-block view of the live tunables.
#[derive(Debug, Clone, Copy)]
struct BlockParams {
    sample_rate_hz: f64,
    update_interval: u64,
    pointing: PointingSnapshot,
}

/// Applies the tracked link impairments to a stream of complex baseband samples.
///
/// Simulated time starts at the window start and advances only with the
/// number of samples processed.
pub struct ChannelModel {
    tracker: Tracker,
    budget: LinkBudgetModel,
    control: ChannelControl,
    report: bool,
    rng: Pcg64Mcg,
    state: ChannelState,
    cursor: Cursor,
    samples_until_update: u64,
    current: Option<ImpairmentSample>,
    phase: f64,
    samples_processed: u64,
}

impl ChannelModel {
    pub fn new(
        tracker: Tracker,
        mode: &ImpairmentModeConfig,
        config: &ChannelConfig,
    ) -> Result<Self, ChannelError> {
        config.validate()?;
        let budget = LinkBudgetModel::for_tracker(&tracker, mode)?;
        let control = ChannelControl::new(config.sample_rate_hz)?;
        let rng = match config.noise_seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_entropy(),
        };
        let cursor = Cursor {
            anchor: tracker.window().start,
            samples_since_anchor: 0,
            sample_rate_hz: config.sample_rate_hz,
        };

        log::debug!(
            "channel at {} Hz, impairments {:?}",
            config.sample_rate_hz,
            mode
        );

        Ok(Self {
            tracker,
            budget,
            control,
            report: config.report,
            rng,
            state: ChannelState::Idle,
            cursor,
            samples_until_update: 0,
            current: None,
            phase: 0.0,
            samples_processed: 0,
        })
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ChannelError> {
        let tracker = Tracker::new(&scenario.tracker)?;
        Self::new(tracker, &scenario.impairments, &scenario.channel)
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn budget(&self) -> &LinkBudgetModel {
        &self.budget
    }

    pub fn control(&self) -> ChannelControl {
        self.control.clone()
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Simulated instant of the next input sample.
    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor.now()
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    /// Impairments currently applied, once streaming has started.
    pub fn current(&self) -> Option<&ImpairmentSample> {
        self.current.as_ref()
    }

    /// Rewinds to the window start. The noise generator is not reseeded.
    pub fn reset(&mut self) {
        self.state = ChannelState::Idle;
        self.cursor = Cursor {
            anchor: self.tracker.window().start,
            samples_since_anchor: 0,
            sample_rate_hz: self.control.sample_rate_hz(),
        };
        self.samples_until_update = 0;
        self.current = None;
        self.phase = 0.0;
        self.samples_processed = 0;
    }

    pub fn process(&mut self, input: &[Complex64]) -> Result<ProcessedBlock, ChannelError> {
        let mut samples = vec![Complex64::new(0.0, 0.0); input.len()];
        let reports = self.process_into(input, &mut samples)?;
        Ok(ProcessedBlock { samples, reports })
    }

    /// Like [`ChannelModel::process`], writing into a caller-owned buffer of equal length.
    pub fn process_into(
        &mut self,
        input: &[Complex64],
        output: &mut [Complex64],
    ) -> Result<Vec<ImpairmentReport>, ChannelError> {
        if input.len() != output.len() {
            return Err(ConfigError::Invalid(format!(
                "output buffer holds {} samples, input has {}",
                output.len(),
                input.len()
            ))
            .into());
        }

        let params = self.begin_block()?;
        let identity = self.budget.mode().is_identity();
        let mut reports = Vec::new();
        let mut offset = 0;

        while offset < input.len() {
            if self.samples_until_update == 0 || self.current.is_none() {
                let sample = self.evaluate(&params)?;
                if self.report {
                    reports.push(ImpairmentReport {
                        sample_offset: offset,
                        sample,
                    });
                }
                self.samples_until_update = params.update_interval;
            }

            let remaining = (input.len() - offset) as u64;
            let chunk = self.samples_until_update.min(remaining) as usize;
            let range = offset..offset + chunk;

            if identity {
                output[range.clone()].copy_from_slice(&input[range]);
            } else if let Some(sample) = self.current {
                self.apply(&sample, params.sample_rate_hz, &input[range.clone()], &mut output[range]);
            }

            offset += chunk;
            self.samples_until_update -= chunk as u64;
            self.cursor.samples_since_anchor += chunk as u64;
            self.samples_processed += chunk as u64;
        }

        Ok(reports)
    }

    fn begin_block(&mut self) -> Result<BlockParams, ChannelError> {
        let window = self.tracker.window();
        let sample_rate_hz = self.control.sample_rate_hz();

        match self.state {
            ChannelState::Exhausted => {
                return Err(ChannelError::WindowExhausted {
                    cursor: self.cursor.now(),
                    end: window.end,
                });
            }
            ChannelState::Idle => {
                self.cursor = Cursor {
                    anchor: window.start,
                    samples_since_anchor: 0,
                    sample_rate_hz,
                };
                self.state = ChannelState::Streaming;
                log::info!("streaming {} from {}", self.tracker.name(), window.start);
            }
            ChannelState::Streaming => {
                if sample_rate_hz != self.cursor.sample_rate_hz {
                    log::debug!(
                        "sample rate {} -> {} Hz at {}",
                        self.cursor.sample_rate_hz,
                        sample_rate_hz,
                        self.cursor.now()
                    );
                    self.cursor.reanchor(sample_rate_hz);
                    self.samples_until_update = 0;
                }
            }
        }

        let now = self.cursor.now();
        if now > window.end {
            self.state = ChannelState::Exhausted;
            log::warn!("{} window exhausted at {}", self.tracker.name(), now);
            return Err(ChannelError::WindowExhausted {
                cursor: now,
                end: window.end,
            });
        }

        let samples_per_update = sample_rate_hz * self.tracker.resolution_us() as f64 / 1e6;
        Ok(BlockParams {
            sample_rate_hz,
            update_interval: (samples_per_update.round() as u64).max(1),
            pointing: self.tracker.pointing_snapshot(),
        })
    }

    fn evaluate(&mut self, params: &BlockParams) -> Result<ImpairmentSample, ChannelError> {
        let end = self.tracker.window().end;
        let at = self.cursor.now().min(end);
        let point = self.tracker.state_with_pointing(at, &params.pointing)?;
        let sample = self.budget.evaluate(&point);

        let was_available = self.current.map(|s| s.available);
        if was_available != Some(sample.available) {
            if sample.available {
                log::warn!(
                    "AOS {} at {} (elevation {:.2} deg)",
                    self.tracker.name(),
                    at,
                    sample.elevation_deg
                );
            } else if was_available.is_some() {
                log::warn!("LOS {} at {}", self.tracker.name(), at);
            } else {
                log::warn!("{} below the horizon at {}", self.tracker.name(), at);
            }
        }

        self.current = Some(sample);
        Ok(sample)
    }

    fn apply(
        &mut self,
        sample: &ImpairmentSample,
        sample_rate_hz: f64,
        input: &[Complex64],
        output: &mut [Complex64],
    ) {
        if !sample.available {
            match self.budget.mode().below_horizon {
                HorizonPolicy::Mute => output.fill(Complex64::new(0.0, 0.0)),
                HorizonPolicy::PassThrough => output.copy_from_slice(input),
            }
            return;
        }

        let step = TAU * sample.frequency_offset_hz / sample_rate_hz;
        let noise_std = match sample.cn_db {
            Some(cn_db) => (sample.power_gain() / 10f64.powf(cn_db / 10.0) / 2.0).sqrt(),
            None => 0.0,
        };

        for (out, x) in output.iter_mut().zip(input) {
            let mut y = x * sample.amplitude_gain;
            if step != 0.0 || self.phase != 0.0 {
                y *= Complex64::from_polar(1.0, self.phase);
                self.phase = (self.phase + step).rem_euclid(TAU);
            }
            if noise_std > 0.0 {
                let re: f64 = StandardNormal.sample(&mut self.rng);
                let im: f64 = StandardNormal.sample(&mut self.rng);
                y += Complex64::new(re, im) * noise_std;
            }
            *out = y;
        }
    }
}
