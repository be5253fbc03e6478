use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

use super::directional::{Helix, ParabolicReflector, Yagi};
use super::pattern::{AntennaPattern, Custom, Dipole, Isotropic, Monopole, QuadrifilarHelix};
use crate::config::{ensure, ConfigError};

pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Polarization {
    #[default]
    Rhcp,
    Lhcp,
    LinearVertical,
    LinearHorizontal,
}

/// Where the antenna's main lobe points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Boresight {
    /// Steered at the other end of the link.
    #[default]
    Tracking,
    Nadir,
    Zenith,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum AntennaKind {
    Isotropic,
    Dipole,
    Monopole,
    Yagi {
        boom_length_m: f64,
    },
    Helix {
        turns: u32,
        turn_spacing_m: f64,
        circumference_m: f64,
    },
    QuadrifilarHelix,
    ParabolicReflector {
        diameter_m: f64,
        #[serde(default = "default_aperture_efficiency")]
        aperture_efficiency_pct: f64,
    },
    Custom {
        gain_dbi: f64,
        beamwidth_deg: f64,
    },
}

fn default_aperture_efficiency() -> f64 {
    55.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntennaConfig {
    #[serde(flatten)]
    pub kind: AntennaKind,
    #[serde(default)]
    pub polarization: Polarization,
    #[serde(default)]
    pub boresight: Boresight,
    #[serde(default)]
    pub pointing_error_deg: f64,
}

impl AntennaConfig {
    pub fn new(kind: AntennaKind) -> Self {
        Self {
            kind,
            polarization: Polarization::default(),
            boresight: Boresight::default(),
            pointing_error_deg: 0.0,
        }
    }
}

/// Shared, lock-free pointing error cell in degrees.
#[derive(Clone)]
pub struct PointingError(Arc<AtomicU64>);

impl PointingError {
    pub fn new(deg: f64) -> Result<Self, ConfigError> {
        validate_pointing_error(deg)?;
        Ok(Self(Arc::new(AtomicU64::new(deg.to_bits()))))
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, deg: f64) -> Result<(), ConfigError> {
        validate_pointing_error(deg)?;
        self.0.store(deg.to_bits(), Ordering::Release);
        Ok(())
    }
}

impl fmt::Debug for PointingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointingError({})", self.get())
    }
}

fn validate_pointing_error(deg: f64) -> Result<(), ConfigError> {
    ensure("pointing_error_deg", deg, "[0, 90]", |v| (0.0..=90.0).contains(&v))
}

/// An antenna pattern with its polarization, mounting and live pointing error.
///
/// Clones share the pointing error cell.
#[derive(Debug, Clone)]
pub struct Antenna {
    kind: AntennaKind,
    pattern: Arc<dyn AntennaPattern>,
    frequency_hz: f64,
    polarization: Polarization,
    boresight: Boresight,
    pointing_error: PointingError,
}

impl Antenna {
    pub fn build(config: &AntennaConfig, frequency_hz: f64) -> Result<Self, ConfigError> {
        ensure("frequency_hz", frequency_hz, "> 0", |v| v > 0.0)?;
        let wavelength_m = SPEED_OF_LIGHT_M_S / frequency_hz;

        let pattern: Arc<dyn AntennaPattern> = match config.kind {
            AntennaKind::Isotropic => Arc::new(Isotropic),
            AntennaKind::Dipole => Arc::new(Dipole),
            AntennaKind::Monopole => Arc::new(Monopole),
            AntennaKind::Yagi { boom_length_m } => Arc::new(Yagi::new(boom_length_m, wavelength_m)?),
            AntennaKind::Helix {
                turns,
                turn_spacing_m,
                circumference_m,
            } => Arc::new(Helix::new(turns, turn_spacing_m, circumference_m, wavelength_m)?),
            AntennaKind::QuadrifilarHelix => Arc::new(QuadrifilarHelix),
            AntennaKind::ParabolicReflector {
                diameter_m,
                aperture_efficiency_pct,
            } => Arc::new(ParabolicReflector::new(
                diameter_m,
                aperture_efficiency_pct,
                frequency_hz,
            )?),
            AntennaKind::Custom {
                gain_dbi,
                beamwidth_deg,
            } => {
                ensure("gain_dbi", gain_dbi, "finite", |_| true)?;
                ensure("beamwidth_deg", beamwidth_deg, "(0, 360]", |v| {
                    v > 0.0 && v <= 360.0
                })?;
                Arc::new(Custom {
                    gain_dbi,
                    beamwidth_deg,
                })
            }
        };

        log::debug!(
            "{} antenna at {:.3} MHz: peak gain {:.2} dBi, beamwidth {:.2} deg",
            config.kind.family(),
            frequency_hz / 1e6,
            pattern.peak_gain_dbi(),
            pattern.beamwidth_deg()
        );

        Ok(Self {
            kind: config.kind.clone(),
            pattern,
            frequency_hz,
            polarization: config.polarization,
            boresight: config.boresight,
            pointing_error: PointingError::new(config.pointing_error_deg)?,
        })
    }

    pub fn kind(&self) -> &AntennaKind {
        &self.kind
    }

    pub fn pattern(&self) -> &dyn AntennaPattern {
        self.pattern.as_ref()
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn wavelength_m(&self) -> f64 {
        SPEED_OF_LIGHT_M_S / self.frequency_hz
    }

    pub fn polarization(&self) -> Polarization {
        self.polarization
    }

    pub fn boresight(&self) -> Boresight {
        self.boresight
    }

    pub fn peak_gain_dbi(&self) -> f64 {
        self.pattern.peak_gain_dbi()
    }

    pub fn beamwidth_deg(&self) -> f64 {
        self.pattern.beamwidth_deg()
    }

    pub fn pointing_error_deg(&self) -> f64 {
        self.pointing_error.get()
    }

    /// Last write wins; takes effect at the next evaluation.
    pub fn set_pointing_error(&self, deg: f64) -> Result<(), ConfigError> {
        self.pointing_error.set(deg)
    }

    pub fn pointing_error_handle(&self) -> PointingError {
        self.pointing_error.clone()
    }

    /// Gain with the misalignment `|off_boresight| + pointing_error`, capped at 180 degrees.
    pub fn gain_db(&self, off_boresight_deg: f64, pointing_error_deg: f64) -> f64 {
        let psi = (off_boresight_deg.abs() + pointing_error_deg).clamp(0.0, 180.0);
        self.pattern.gain_dbi(psi)
    }

    /// Gain using the live pointing error.
    pub fn gain_at(&self, off_boresight_deg: f64) -> f64 {
        self.gain_db(off_boresight_deg, self.pointing_error_deg())
    }

    pub fn pointing_loss_db(&self, off_boresight_deg: f64, pointing_error_deg: f64) -> f64 {
        self.peak_gain_dbi() - self.gain_db(off_boresight_deg, pointing_error_deg)
    }
}

impl AntennaKind {
    pub fn family(&self) -> &'static str {
        match self {
            AntennaKind::Isotropic => "isotropic",
            AntennaKind::Dipole => "dipole",
            AntennaKind::Monopole => "monopole",
            AntennaKind::Yagi { .. } => "yagi",
            AntennaKind::Helix { .. } => "helix",
            AntennaKind::QuadrifilarHelix => "quadrifilar_helix",
            AntennaKind::ParabolicReflector { .. } => "parabolic_reflector",
            AntennaKind::Custom { .. } => "custom",
        }
    }
}
