use approx::assert_abs_diff_eq;
use chrono::Duration;
use leo_channel::config::Scenario;
use leo_channel::link::{free_space_path_loss_db, ImpairmentSample, LinkBudgetModel};
use leo_channel::tracker::{Tracker, TrackerError};

const ISS_DOWNLINK: &str = include_str!("../demos/iss_downlink.yaml");

fn tracker() -> (Scenario, Tracker) {
    let scenario = Scenario::from_str(ISS_DOWNLINK).unwrap();
    let tracker = Tracker::new(&scenario.tracker).unwrap();
    (scenario, tracker)
}

#[test]
fn iss_is_visible_for_the_whole_window() {
    let (_, tracker) = tracker();
    let points: Vec<_> = tracker.track().collect::<Result<_, _>>().unwrap();
    assert_eq!(points.len(), 62);
    assert!(points.iter().all(|p| p.geometry.visible));

    let peak = points
        .iter()
        .map(|p| p.geometry.elevation_deg)
        .fold(f64::MIN, f64::max);
    assert!(peak > 45.0 && peak < 65.0, "peak elevation {peak}");
    assert!(points.iter().all(|p| p.geometry.range_km > 400.0 && p.geometry.range_km < 2600.0));
}

#[test]
fn range_closes_then_opens() {
    let (_, tracker) = tracker();
    let window = tracker.window();
    let rising = tracker.state_at(window.start).unwrap();
    let setting = tracker.state_at(window.end).unwrap();
    assert!(rising.geometry.range_rate_km_s < 0.0);
    assert!(setting.geometry.range_rate_km_s > 0.0);
}

#[test]
fn single_pass_spans_the_window() {
    let (_, tracker) = tracker();
    let passes = tracker.passes(Duration::seconds(60)).unwrap();
    assert_eq!(passes.len(), 1);

    let pass = &passes[0];
    assert_eq!(pass.norad_id, 25544);
    assert_eq!(pass.aos, tracker.window().start);
    assert_eq!(pass.los, tracker.window().end);
    assert!(pass.tca > pass.aos && pass.tca < pass.los);
    assert_eq!(pass.duration_seconds, 610);
}

#[test]
fn queries_outside_window_fail() {
    let (_, tracker) = tracker();
    let after = tracker.window().end + Duration::seconds(1);
    assert!(matches!(
        tracker.state_at(after),
        Err(TrackerError::OutOfWindow { .. })
    ));
}

#[test]
fn path_loss_follows_free_space_formula() {
    // 800 km at 435 MHz.
    assert_abs_diff_eq!(free_space_path_loss_db(800.0, 435e6), 143.28, epsilon = 0.01);
    // Doubling the range costs 6 dB.
    let near = free_space_path_loss_db(500.0, 435e6);
    let far = free_space_path_loss_db(1000.0, 435e6);
    assert_abs_diff_eq!(far - near, 6.0206, epsilon = 1e-4);
}

#[test]
fn budget_is_worst_at_the_horizon() {
    let (scenario, tracker) = tracker();
    let model = LinkBudgetModel::for_tracker(&tracker, &scenario.impairments).unwrap();
    let samples: Vec<_> = tracker
        .track()
        .map(|p| model.evaluate(&p.unwrap()))
        .collect();

    let first = samples.first().unwrap();
    let best = samples
        .iter()
        .max_by(|a, b| a.elevation_deg.total_cmp(&b.elevation_deg))
        .unwrap();
    assert!(first.total_loss_db > best.total_loss_db);
    assert!(first.gas_attenuation_db > best.gas_attenuation_db);
    assert!(first.cn_db.unwrap() < best.cn_db.unwrap());
    assert!(samples.iter().all(|s| s.available && s.amplitude_gain > 0.0));
    assert!(first.doppler_hz > 0.0 && samples.last().unwrap().doppler_hz < 0.0);
}

#[test]
fn csv_rows_match_header() {
    let (scenario, tracker) = tracker();
    let model = LinkBudgetModel::for_tracker(&tracker, &scenario.impairments).unwrap();
    let point = tracker.state_at(tracker.window().start).unwrap();
    let row = model.evaluate(&point).to_csv_row();
    let columns = ImpairmentSample::csv_header().split(',').count();
    assert_eq!(columns, 15);
    assert_eq!(row.split(',').count(), columns);
}
