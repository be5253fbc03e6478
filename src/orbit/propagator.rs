use chrono::{DateTime, Utc};
use serde::Serialize;

use super::elements::OrbitalElementSet;
use super::error::OrbitError;
use super::frames::{gmst_rad, teme_to_ecef_position, teme_to_ecef_velocity};

/// Satellite position and velocity at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVector {
    pub timestamp: DateTime<Utc>,
    pub position_teme_km: [f64; 3],
    pub velocity_teme_km_s: [f64; 3],
    pub position_ecef_km: [f64; 3],
    pub velocity_ecef_km_s: [f64; 3],
}

/// SGP4 propagator bound to one element set.
pub struct Propagator {
    elements: OrbitalElementSet,
    constants: sgp4::Constants,
}

impl Propagator {
    pub fn new(elements: OrbitalElementSet) -> Result<Self, OrbitError> {
        let constants = sgp4::Constants::from_elements(elements.elements())?;
        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn elements(&self) -> &OrbitalElementSet {
        &self.elements
    }

    pub fn propagate(&self, timestamp: DateTime<Utc>) -> Result<StateVector, OrbitError> {
        let propagation_error = |message: String| OrbitError::Propagation {
            timestamp: timestamp.to_rfc3339(),
            message,
        };

        let minutes = self
            .elements
            .elements()
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .map_err(|e| propagation_error(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| propagation_error(e.to_string()))?;

        let finite = prediction
            .position
            .iter()
            .chain(prediction.velocity.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(propagation_error("non-finite state".into()));
        }

        let gmst = gmst_rad(&timestamp);
        Ok(StateVector {
            timestamp,
            position_teme_km: prediction.position,
            velocity_teme_km_s: prediction.velocity,
            position_ecef_km: teme_to_ecef_position(prediction.position, gmst),
            velocity_ecef_km_s: teme_to_ecef_velocity(
                prediction.position,
                prediction.velocity,
                gmst,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn iss() -> Propagator {
        let set = OrbitalElementSet::from_lines(
            Some("ISS".into()),
            "1 25544U 98067A   18268.52547184  .00016717  00000-0  10270-3 0  9019",
            "2 25544  51.6373 238.6885 0003885 206.9748 153.1203 15.53729445 14114",
        )
        .unwrap();
        Propagator::new(set).unwrap()
    }

    #[test]
    fn propagation_is_deterministic() {
        let prop = iss();
        let t = Utc.with_ymd_and_hms(2018, 9, 25, 15, 50, 0).unwrap();
        let a = prop.propagate(t).unwrap();
        let b = prop.propagate(t).unwrap();
        assert_eq!(a, b);
        for i in 0..3 {
            assert_eq!(a.position_ecef_km[i].to_bits(), b.position_ecef_km[i].to_bits());
        }
    }

    #[test]
    fn iss_altitude_is_leo() {
        let prop = iss();
        let t = Utc.with_ymd_and_hms(2018, 9, 25, 15, 50, 0).unwrap();
        let s = prop.propagate(t).unwrap();
        let r = s.position_ecef_km.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!(r > 6378.0 + 350.0 && r < 6378.0 + 450.0, "radius {}", r);
        let v = s.velocity_teme_km_s.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!(v > 7.4 && v < 7.9, "speed {}", v);
    }
}
