use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::error::TrackerError;
use super::tracker::Tracker;
use crate::config::ConfigError;
use crate::station::TopocentricGeometry;

const FINE_STEP: Duration = Duration::seconds(1);

/// A visibility interval of the satellite above the station's minimum elevation.
#[derive(Debug, Clone, Serialize)]
pub struct Pass {
    pub satellite: String,
    pub norad_id: u64,
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub tca: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub aos_azimuth_deg: f64,
    pub los_azimuth_deg: f64,
    pub duration_seconds: i64,
}

struct OpenPass {
    aos: DateTime<Utc>,
    aos_azimuth_deg: f64,
    tca: DateTime<Utc>,
    max_elevation_deg: f64,
}

impl OpenPass {
    fn observe(&mut self, timestamp: DateTime<Utc>, geometry: &TopocentricGeometry) {
        if geometry.elevation_deg > self.max_elevation_deg {
            self.max_elevation_deg = geometry.elevation_deg;
            self.tca = timestamp;
        }
    }

    fn close(self, tracker: &Tracker, los: DateTime<Utc>, los_azimuth_deg: f64) -> Pass {
        let elements = tracker.propagator().elements();
        Pass {
            satellite: tracker.name().to_string(),
            norad_id: elements.norad_id(),
            aos: self.aos,
            los,
            tca: self.tca,
            max_elevation_deg: round2(self.max_elevation_deg),
            aos_azimuth_deg: round2(self.aos_azimuth_deg),
            los_azimuth_deg: round2(los_azimuth_deg),
            duration_seconds: (los - self.aos).num_seconds(),
        }
    }
}

/// Coarse scan of the window with bisection on each horizon crossing.
///
/// A pass already in progress at the window start opens at the start; one
/// still in progress at the end closes at the end.
pub fn find_passes(tracker: &Tracker, step: Duration) -> Result<Vec<Pass>, TrackerError> {
    if step <= Duration::zero() {
        return Err(ConfigError::OutOfRange {
            parameter: "pass step",
            value: step.num_milliseconds() as f64 / 1000.0,
            expected: "> 0 s",
        }
        .into());
    }

    let window = tracker.window();
    let mut passes = Vec::new();
    let mut open: Option<OpenPass> = None;
    let mut previous: Option<DateTime<Utc>> = None;
    let mut cursor = window.start;

    loop {
        let geometry = tracker.geometry_at(cursor)?;

        open = match open.take() {
            None if geometry.visible => {
                let (aos, aos_azimuth_deg) = match previous {
                    Some(before) => refine_crossing(tracker, before, cursor, true)?,
                    None => (cursor, geometry.azimuth_deg),
                };
                let mut pass = OpenPass {
                    aos,
                    aos_azimuth_deg,
                    tca: cursor,
                    max_elevation_deg: geometry.elevation_deg,
                };
                pass.observe(cursor, &geometry);
                Some(pass)
            }
            None => None,
            Some(mut pass) if geometry.visible => {
                pass.observe(cursor, &geometry);
                Some(pass)
            }
            Some(pass) => {
                let before = previous.unwrap_or(window.start);
                let (los, los_azimuth_deg) = refine_crossing(tracker, before, cursor, false)?;
                passes.push(pass.close(tracker, los, los_azimuth_deg));
                None
            }
        };

        if cursor >= window.end {
            break;
        }
        previous = Some(cursor);
        cursor = (cursor + step).min(window.end);
    }

    if let Some(pass) = open {
        let geometry = tracker.geometry_at(window.end)?;
        passes.push(pass.close(tracker, window.end, geometry.azimuth_deg));
    }

    Ok(passes)
}

/// Binary search for the horizon crossing between `before` and `after`.
///
/// Returns the first visible instant when rising and the last visible one when setting.
fn refine_crossing(
    tracker: &Tracker,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
) -> Result<(DateTime<Utc>, f64), TrackerError> {
    let mut low = before;
    let mut high = after;

    while high - low > FINE_STEP {
        let mid = low + (high - low) / 2;
        let visible = tracker.geometry_at(mid)?.visible;
        if visible == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    let crossing = if rising { high } else { low };
    let geometry = tracker.geometry_at(crossing)?;
    Ok((crossing, geometry.azimuth_deg))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
