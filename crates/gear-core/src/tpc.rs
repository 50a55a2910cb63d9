//! TPC (time projection chamber) tracking geometry.

use crate::GearParameters;

/// Pad-row layout of a disk readout plane with fixed-size pads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPadSizeDiskLayout {
    /// Inner radius of the pad plane (mm).
    pub r_min: f64,
    /// Outer radius of the pad plane (mm).
    pub r_max: f64,
    /// Radial pad height (mm).
    pub pad_height: f64,
    /// Pad width along phi (mm).
    pub pad_width: f64,
    /// Upper bound on the number of pad rows.
    pub max_row: u32,
    /// Gap between neighbouring pads (mm).
    pub pad_gap: f64,
}

impl FixedPadSizeDiskLayout {
    /// Number of pad rows that fit radially, capped at `max_row`.
    pub fn n_rows(&self) -> u32 {
        if self.pad_height <= 0.0 || self.r_max <= self.r_min {
            return 0;
        }
        let fit = ((self.r_max - self.r_min) / self.pad_height).floor();
        if fit >= self.max_row as f64 { self.max_row } else { fit as u32 }
    }
}

/// Tracking-chamber parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TpcParameters {
    /// Maximum drift length (mm).
    pub max_drift_length: f64,
    /// Drift velocity (mm/ns).
    pub drift_velocity: f64,
    /// Readout frequency (MHz).
    pub readout_frequency: f64,
    /// Readout pad layout.
    pub pad_layout: FixedPadSizeDiskLayout,
    /// Free-form extras.
    pub params: GearParameters,
}

impl TpcParameters {
    pub fn new(
        max_drift_length: f64,
        drift_velocity: f64,
        readout_frequency: f64,
        pad_layout: FixedPadSizeDiskLayout,
    ) -> Self {
        Self {
            max_drift_length,
            drift_velocity,
            readout_frequency,
            pad_layout,
            params: GearParameters::new(),
        }
    }
}
