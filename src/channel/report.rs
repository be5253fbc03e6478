use num_complex::Complex64;
use serde::Serialize;

use crate::link::ImpairmentSample;

/// Impairments in force from `sample_offset` within the block until the next report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpairmentReport {
    pub sample_offset: usize,
    #[serde(flatten)]
    pub sample: ImpairmentSample,
}

impl ImpairmentReport {
    pub fn csv_header() -> String {
        format!("sample_offset,{}", ImpairmentSample::csv_header())
    }

    pub fn to_csv_row(&self) -> String {
        format!("{},{}", self.sample_offset, self.sample.to_csv_row())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessedBlock {
    pub samples: Vec<Complex64>,
    pub reports: Vec<ImpairmentReport>,
}
