use super::pattern::{sinc_rolloff_db, AntennaPattern};
use crate::config::{ensure, ConfigError};

/// ARRL optimum Yagi table: (boom length in wavelengths, elements, gain dBi).
const YAGI_PERFORMANCE: [(f64, u32, f64); 20] = [
    (0.35, 3, 9.65),
    (0.55, 4, 10.86),
    (0.80, 5, 11.85),
    (1.15, 6, 12.45),
    (1.45, 7, 13.45),
    (1.80, 8, 14.05),
    (2.10, 9, 14.40),
    (2.45, 10, 15.25),
    (2.80, 11, 15.95),
    (3.15, 12, 16.30),
    (3.55, 13, 16.95),
    (4.00, 14, 17.45),
    (4.40, 15, 18.15),
    (4.75, 16, 18.65),
    (5.20, 17, 19.35),
    (5.55, 18, 19.85),
    (6.00, 19, 20.25),
    (6.50, 20, 20.75),
    (7.00, 21, 21.35),
    (7.50, 22, 21.65),
];

#[derive(Debug, Clone, Copy)]
pub struct Yagi {
    boom_length_wavelengths: f64,
    elements: u32,
    gain_dbi: f64,
}

impl Yagi {
    pub fn new(boom_length_m: f64, wavelength_m: f64) -> Result<Self, ConfigError> {
        ensure("boom_length_m", boom_length_m, "> 0", |v| v > 0.0)?;
        let boom = boom_length_m / wavelength_m;
        let (min, max) = (YAGI_PERFORMANCE[0].0, YAGI_PERFORMANCE[YAGI_PERFORMANCE.len() - 1].0);
        ensure(
            "yagi boom length (wavelengths)",
            boom,
            "[0.35, 7.5]",
            |v| (min..=max).contains(&v),
        )?;

        let (_, elements, gain_dbi) = YAGI_PERFORMANCE
            .iter()
            .rev()
            .find(|(length, _, _)| *length <= boom)
            .copied()
            .unwrap_or(YAGI_PERFORMANCE[0]);

        Ok(Self {
            boom_length_wavelengths: boom,
            elements,
            gain_dbi,
        })
    }

    pub fn boom_length_wavelengths(&self) -> f64 {
        self.boom_length_wavelengths
    }

    /// Optimum director/reflector count for the boom length.
    pub fn elements(&self) -> u32 {
        self.elements
    }
}

impl AntennaPattern for Yagi {
    fn peak_gain_dbi(&self) -> f64 {
        self.gain_dbi
    }

    fn beamwidth_deg(&self) -> f64 {
        (40000.0 / 10f64.powf(self.gain_dbi / 10.0)).sqrt()
    }

    fn rolloff_db(&self, off_boresight_deg: f64) -> f64 {
        sinc_rolloff_db(off_boresight_deg, self.beamwidth_deg())
    }
}

/// Axial-mode helix.
#[derive(Debug, Clone, Copy)]
pub struct Helix {
    turns: u32,
    turn_spacing_wavelengths: f64,
    circumference_wavelengths: f64,
}

impl Helix {
    pub fn new(
        turns: u32,
        turn_spacing_m: f64,
        circumference_m: f64,
        wavelength_m: f64,
    ) -> Result<Self, ConfigError> {
        ensure("turns", turns as f64, ">= 1", |v| v >= 1.0)?;
        ensure("turn_spacing_m", turn_spacing_m, "> 0", |v| v > 0.0)?;
        ensure("circumference_m", circumference_m, "> 0", |v| v > 0.0)?;

        let helix = Self {
            turns,
            turn_spacing_wavelengths: turn_spacing_m / wavelength_m,
            circumference_wavelengths: circumference_m / wavelength_m,
        };
        if !(0.75..=1.33).contains(&helix.circumference_wavelengths) {
            log::warn!(
                "helix circumference {:.2} wavelengths is outside the axial-mode range",
                helix.circumference_wavelengths
            );
        }
        Ok(helix)
    }

    fn electrical_length(&self) -> f64 {
        self.turns as f64 * self.turn_spacing_wavelengths
    }
}

impl AntennaPattern for Helix {
    fn peak_gain_dbi(&self) -> f64 {
        let c = self.circumference_wavelengths;
        10.0 * (15.0 * c * c * self.electrical_length()).log10()
    }

    fn beamwidth_deg(&self) -> f64 {
        115.0 / (self.circumference_wavelengths * self.electrical_length().sqrt())
    }

    fn rolloff_db(&self, off_boresight_deg: f64) -> f64 {
        sinc_rolloff_db(off_boresight_deg, self.beamwidth_deg())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParabolicReflector {
    diameter_m: f64,
    frequency_ghz: f64,
    aperture_efficiency_pct: f64,
}

impl ParabolicReflector {
    pub fn new(
        diameter_m: f64,
        aperture_efficiency_pct: f64,
        frequency_hz: f64,
    ) -> Result<Self, ConfigError> {
        ensure("diameter_m", diameter_m, "> 0", |v| v > 0.0)?;
        ensure(
            "aperture_efficiency_pct",
            aperture_efficiency_pct,
            "(0, 100]",
            |v| v > 0.0 && v <= 100.0,
        )?;
        Ok(Self {
            diameter_m,
            frequency_ghz: frequency_hz / 1e9,
            aperture_efficiency_pct,
        })
    }
}

impl AntennaPattern for ParabolicReflector {
    fn peak_gain_dbi(&self) -> f64 {
        20.4 + 20.0 * self.diameter_m.log10()
            + 20.0 * self.frequency_ghz.log10()
            + 10.0 * (self.aperture_efficiency_pct / 100.0).log10()
    }

    fn beamwidth_deg(&self) -> f64 {
        21.0 / (self.diameter_m * self.frequency_ghz)
    }

    fn rolloff_db(&self, off_boresight_deg: f64) -> f64 {
        sinc_rolloff_db(off_boresight_deg, self.beamwidth_deg())
    }
}
