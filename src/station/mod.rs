mod geodetic;
mod observe;

pub use geodetic::{GeodeticPoint, WGS84_A_KM, WGS84_E2};
pub use observe::{ecef_to_enu, GroundStation, StationConfig, TopocentricGeometry};
