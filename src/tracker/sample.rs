use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::station::TopocentricGeometry;

/// One step of the pass: geometry plus the antenna gains along the line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub geometry: TopocentricGeometry,
    pub satellite_antenna_gain_dbi: f64,
    pub tracker_antenna_gain_dbi: f64,
    pub satellite_pointing_loss_db: f64,
    pub tracker_pointing_loss_db: f64,
}

/// Pointing errors of both ends, captured once so a block sees consistent values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointingSnapshot {
    pub satellite_deg: f64,
    pub ground_deg: f64,
}
