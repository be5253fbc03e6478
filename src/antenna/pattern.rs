use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Depth of the pattern floor below peak gain.
pub const PATTERN_FLOOR_DB: f64 = 40.0;

/// Gain curve of one antenna family.
///
/// Angles are in degrees off boresight; losses are positive dB below peak.
pub trait AntennaPattern: fmt::Debug + Send + Sync {
    fn peak_gain_dbi(&self) -> f64;

    fn beamwidth_deg(&self) -> f64;

    fn rolloff_db(&self, off_boresight_deg: f64) -> f64;

    fn min_gain_dbi(&self) -> f64 {
        self.peak_gain_dbi() - PATTERN_FLOOR_DB
    }

    /// Gain at `psi` degrees off boresight, saturated at the pattern floor.
    fn gain_dbi(&self, psi: f64) -> f64 {
        if !psi.is_finite() {
            return self.min_gain_dbi();
        }
        let rolloff = self.rolloff_db(psi.abs().min(180.0));
        let rolloff = if rolloff.is_nan() { f64::INFINITY } else { rolloff.max(0.0) };
        (self.peak_gain_dbi() - rolloff).max(self.min_gain_dbi())
    }
}

/// Main-lobe `sinc^2` roll-off parameterized by half-power beamwidth.
///
/// Past the first null the lobe is treated as exhausted and the loss is infinite.
pub fn sinc_rolloff_db(psi_deg: f64, beamwidth_deg: f64) -> f64 {
    if psi_deg <= 0.0 {
        return 0.0;
    }
    let x = (2.0 * psi_deg * 79.76 / beamwidth_deg).to_radians();
    if x >= std::f64::consts::PI {
        return f64::INFINITY;
    }
    let sinc = x.sin() / x;
    -10.0 * (sinc * sinc).log10()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Isotropic;

impl AntennaPattern for Isotropic {
    fn peak_gain_dbi(&self) -> f64 {
        0.0
    }

    fn beamwidth_deg(&self) -> f64 {
        360.0
    }

    fn rolloff_db(&self, _off_boresight_deg: f64) -> f64 {
        0.0
    }

    fn min_gain_dbi(&self) -> f64 {
        0.0
    }
}

/// Half-wave dipole, boresight broadside to the element.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dipole;

impl AntennaPattern for Dipole {
    fn peak_gain_dbi(&self) -> f64 {
        2.15
    }

    fn beamwidth_deg(&self) -> f64 {
        78.0
    }

    fn rolloff_db(&self, off_boresight_deg: f64) -> f64 {
        let psi = off_boresight_deg.to_radians();
        let cos_psi = psi.cos().abs();
        if cos_psi < 1e-9 {
            return f64::INFINITY;
        }
        let field = (FRAC_PI_2 * psi.sin()).cos() / cos_psi;
        -20.0 * field.abs().log10()
    }
}

/// Quarter-wave monopole over a ground plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct Monopole;

impl AntennaPattern for Monopole {
    fn peak_gain_dbi(&self) -> f64 {
        2.15
    }

    fn beamwidth_deg(&self) -> f64 {
        156.2
    }

    fn rolloff_db(&self, off_boresight_deg: f64) -> f64 {
        sinc_rolloff_db(off_boresight_deg, self.beamwidth_deg())
    }
}

/// Quadrifilar helix with a cardioid pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadrifilarHelix;

impl AntennaPattern for QuadrifilarHelix {
    fn peak_gain_dbi(&self) -> f64 {
        4.0
    }

    fn beamwidth_deg(&self) -> f64 {
        150.0
    }

    fn rolloff_db(&self, off_boresight_deg: f64) -> f64 {
        let c = 1.0 + off_boresight_deg.to_radians().cos();
        if c <= 0.0 {
            return f64::INFINITY;
        }
        -1.5 * (-4.0 + 10.0 * (1.256 * c).log10())
    }
}

/// User-supplied peak gain and beamwidth with a parabolic main lobe.
#[derive(Debug, Clone, Copy)]
pub struct Custom {
    pub gain_dbi: f64,
    pub beamwidth_deg: f64,
}

impl AntennaPattern for Custom {
    fn peak_gain_dbi(&self) -> f64 {
        self.gain_dbi
    }

    fn beamwidth_deg(&self) -> f64 {
        self.beamwidth_deg
    }

    fn rolloff_db(&self, off_boresight_deg: f64) -> f64 {
        let ratio = off_boresight_deg / self.beamwidth_deg;
        12.0 * ratio * ratio
    }
}
