use std::thread;

use approx::assert_abs_diff_eq;
use chrono::Duration;
use leo_channel::channel::{ChannelConfig, ChannelError, ChannelModel, ChannelState};
use leo_channel::config::Scenario;
use leo_channel::link::{HorizonPolicy, ImpairmentModeConfig};
use leo_channel::tracker::Tracker;
use num_complex::Complex64;

const ISS_DOWNLINK: &str = include_str!("../demos/iss_downlink.yaml");

fn scenario() -> Scenario {
    Scenario::from_str(ISS_DOWNLINK).unwrap()
}

fn channel(mode: ImpairmentModeConfig, sample_rate_hz: f64, noise_seed: Option<u64>) -> ChannelModel {
    let scenario = scenario();
    let tracker = Tracker::new(&scenario.tracker).unwrap();
    let config = ChannelConfig {
        sample_rate_hz,
        noise_seed,
        report: true,
    };
    ChannelModel::new(tracker, &mode, &config).unwrap()
}

fn doppler_only() -> ImpairmentModeConfig {
    ImpairmentModeConfig {
        doppler: true,
        ..ImpairmentModeConfig::disabled()
    }
}

fn tone(len: usize) -> Vec<Complex64> {
    (0..len)
        .map(|n| Complex64::from_polar(1.0, 0.01 * n as f64))
        .collect()
}

#[test]
fn output_length_matches_input() {
    let mut model = channel(ImpairmentModeConfig::default(), 1000.0, Some(1));
    for len in [0, 1, 999, 10_000, 12_345] {
        let block = model.process(&tone(len)).unwrap();
        assert_eq!(block.samples.len(), len);
    }
}

#[test]
fn disabled_impairments_are_identity() {
    let mut model = channel(ImpairmentModeConfig::disabled(), 1000.0, None);
    let input = tone(25_000);
    let block = model.process(&input).unwrap();
    assert_eq!(block.samples, input);
}

#[test]
fn reports_follow_update_interval() {
    let mut model = channel(ImpairmentModeConfig::default(), 1000.0, None);
    let start = model.tracker().window().start;
    let block = model.process(&tone(25_000)).unwrap();

    let offsets: Vec<_> = block.reports.iter().map(|r| r.sample_offset).collect();
    assert_eq!(offsets, vec![0, 10_000, 20_000]);
    for (i, report) in block.reports.iter().enumerate() {
        assert_eq!(report.sample.timestamp, start + Duration::seconds(10 * i as i64));
    }
    assert_eq!(model.cursor(), start + Duration::seconds(25));
    assert_eq!(model.state(), ChannelState::Streaming);
}

#[test]
fn amplitude_follows_path_loss() {
    let mode = ImpairmentModeConfig {
        free_space_path_loss: true,
        ..ImpairmentModeConfig::disabled()
    };
    let mut model = channel(mode, 1000.0, None);
    let block = model.process(&tone(2000)).unwrap();
    let report = &block.reports[0];
    assert!(report.sample.path_loss_db > 140.0);

    let expected = 10f64.powf(-report.sample.path_loss_db / 20.0);
    assert_abs_diff_eq!(report.sample.amplitude_gain, expected, epsilon = 1e-18);
    for y in &block.samples {
        assert_abs_diff_eq!(y.norm(), expected, epsilon = expected * 1e-9);
    }
}

#[test]
fn phase_is_continuous_across_blocks() {
    let mut model = channel(doppler_only(), 1000.0, None);
    let ones = vec![Complex64::new(1.0, 0.0); 1000];
    let first = model.process(&ones).unwrap();
    let second = model.process(&ones).unwrap();
    assert!(second.reports.is_empty());

    let offset_hz = first.reports[0].sample.frequency_offset_hz;
    assert!(offset_hz.abs() > 1000.0);
    let step = Complex64::from_polar(1.0, std::f64::consts::TAU * offset_hz / 1000.0);

    let last = first.samples[999];
    let next = second.samples[0];
    let rotation = next * last.conj();
    assert_abs_diff_eq!(rotation.re, step.re, epsilon = 1e-9);
    assert_abs_diff_eq!(rotation.im, step.im, epsilon = 1e-9);
}

#[test]
fn block_partition_does_not_change_output() {
    let input = tone(40_000);

    let mut whole = channel(scenario().impairments, 1000.0, Some(42));
    let expected = whole.process(&input).unwrap().samples;

    let mut split = channel(scenario().impairments, 1000.0, Some(42));
    let mut actual = Vec::with_capacity(input.len());
    let mut rest = input.as_slice();
    for size in [1, 7, 9_992, 10_000, 3, 20_000].iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at((*size).min(rest.len()));
        actual.extend(split.process(head).unwrap().samples);
        rest = tail;
    }

    assert_eq!(actual, expected);
}

#[test]
fn noise_is_reproducible_with_seed() {
    let input = tone(5000);
    let mut a = channel(scenario().impairments, 1000.0, Some(9));
    let mut b = channel(scenario().impairments, 1000.0, Some(9));
    let mut c = channel(scenario().impairments, 1000.0, Some(10));

    let out_a = a.process(&input).unwrap();
    let out_b = b.process(&input).unwrap();
    let out_c = c.process(&input).unwrap();
    assert!(out_a.reports[0].sample.cn_db.is_some());
    assert_eq!(out_a.samples, out_b.samples);
    assert_ne!(out_a.samples, out_c.samples);
}

#[test]
fn window_exhaustion_is_terminal() {
    let mut model = channel(ImpairmentModeConfig::default(), 1.0, None);
    // 610 s window at 1 Hz: the sample at the end instant is still inside.
    let block = model.process(&tone(611)).unwrap();
    assert_eq!(block.samples.len(), 611);

    assert!(matches!(
        model.process(&tone(1)),
        Err(ChannelError::WindowExhausted { .. })
    ));
    assert_eq!(model.state(), ChannelState::Exhausted);
    assert!(matches!(
        model.process(&tone(1)),
        Err(ChannelError::WindowExhausted { .. })
    ));

    model.reset();
    assert_eq!(model.state(), ChannelState::Idle);
    assert!(model.process(&tone(10)).is_ok());
}

#[test]
fn below_horizon_policy() {
    let mut scenario = scenario();
    scenario.tracker.ground_station.site.min_elevation_deg = 80.0;
    let input = tone(3000);

    for (policy, muted) in [(HorizonPolicy::Mute, true), (HorizonPolicy::PassThrough, false)] {
        let tracker = Tracker::new(&scenario.tracker).unwrap();
        let mode = ImpairmentModeConfig {
            below_horizon: policy,
            ..scenario.impairments
        };
        let config = ChannelConfig {
            sample_rate_hz: 1000.0,
            ..scenario.channel
        };
        let mut model = ChannelModel::new(tracker, &mode, &config).unwrap();
        let block = model.process(&input).unwrap();

        assert!(!block.reports[0].sample.available);
        if muted {
            assert!(block.samples.iter().all(|y| *y == Complex64::new(0.0, 0.0)));
        } else {
            assert_eq!(block.samples, input);
        }
    }
}

#[test]
fn sample_rate_change_keeps_time_continuous() {
    let mut model = channel(ImpairmentModeConfig::default(), 1000.0, None);
    let start = model.tracker().window().start;
    model.process(&tone(1000)).unwrap();

    model.control().set_sample_rate(2000.0).unwrap();
    let block = model.process(&tone(2000)).unwrap();
    assert_eq!(model.cursor(), start + Duration::seconds(2));
    // The new rate forces a fresh evaluation at the block start.
    assert_eq!(block.reports[0].sample_offset, 0);
    assert_eq!(block.reports[0].sample.timestamp, start + Duration::seconds(1));
}

#[test]
fn mismatched_output_buffer_is_rejected() {
    let mut model = channel(ImpairmentModeConfig::default(), 1000.0, None);
    let mut output = vec![Complex64::new(0.0, 0.0); 10];
    assert!(matches!(
        model.process_into(&tone(11), &mut output),
        Err(ChannelError::Config(_))
    ));
    assert_eq!(model.samples_processed(), 0);
}

#[test]
fn pointing_error_updates_from_another_thread() {
    let mut model = channel(ImpairmentModeConfig::default(), 1000.0, None);
    let pointing = model.tracker().ground_antenna().pointing_error_handle();
    let control = model.control();

    let tuner = thread::spawn(move || {
        for i in 0..2000 {
            pointing.set((i % 10) as f64).unwrap();
            control
                .set_sample_rate(if i % 2 == 0 { 1000.0 } else { 2000.0 })
                .unwrap();
        }
    });

    let input = tone(500);
    for _ in 0..100 {
        let block = model.process(&input).unwrap();
        assert_eq!(block.samples.len(), input.len());
        assert!(block.samples.iter().all(|y| y.re.is_finite() && y.im.is_finite()));
    }
    tuner.join().unwrap();

    let loss = model
        .tracker()
        .state_at(model.tracker().window().start)
        .unwrap()
        .tracker_pointing_loss_db;
    assert!(loss > 0.0);
}

#[test]
fn reports_can_be_switched_off() {
    let scenario = scenario();
    let tracker = Tracker::new(&scenario.tracker).unwrap();
    let mode = ImpairmentModeConfig {
        free_space_path_loss: true,
        ..ImpairmentModeConfig::disabled()
    };
    let config = ChannelConfig {
        sample_rate_hz: 1000.0,
        noise_seed: None,
        report: false,
    };
    let mut model = ChannelModel::new(tracker, &mode, &config).unwrap();

    let input = tone(25_000);
    let block = model.process(&input).unwrap();
    assert!(block.reports.is_empty());
    assert_eq!(block.samples.len(), input.len());

    let applied = model.current().unwrap().amplitude_gain;
    assert!(applied > 0.0 && applied < 1e-6);
    assert_abs_diff_eq!(block.samples[24_999].norm(), applied, epsilon = applied * 1e-9);
}
