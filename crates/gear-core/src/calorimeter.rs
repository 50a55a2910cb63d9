//! Calorimeter geometry: barrel and endcap layouts with a layer stack.

use std::fmt;
use std::str::FromStr;

use crate::{Error, GearParameters};

/// The four well-known calorimeter regions held by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalorimeterRegion {
    EcalBarrel,
    EcalEndcap,
    HcalBarrel,
    HcalEndcap,
}

impl CalorimeterRegion {
    /// All regions in their canonical order.
    pub const ALL: [CalorimeterRegion; 4] = [
        CalorimeterRegion::EcalBarrel,
        CalorimeterRegion::EcalEndcap,
        CalorimeterRegion::HcalBarrel,
        CalorimeterRegion::HcalEndcap,
    ];

    /// Detector name used for this region.
    pub fn name(self) -> &'static str {
        match self {
            CalorimeterRegion::EcalBarrel => "EcalBarrel",
            CalorimeterRegion::EcalEndcap => "EcalEndcap",
            CalorimeterRegion::HcalBarrel => "HcalBarrel",
            CalorimeterRegion::HcalEndcap => "HcalEndcap",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CalorimeterRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalorimeterRegion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalorimeterRegion::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| Error::UnknownParameter(format!("calorimeter region '{s}'")))
    }
}

/// Envelope of a calorimeter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalorimeterLayout {
    /// Cylindrical barrel: inner radius and half-length in z.
    Barrel { inner_r: f64, outer_z: f64 },
    /// Disk endcap: radial span and the z position of its front face.
    Endcap { inner_r: f64, outer_r: f64, inner_z: f64 },
}

impl CalorimeterLayout {
    pub fn is_barrel(&self) -> bool {
        matches!(self, CalorimeterLayout::Barrel { .. })
    }
}

/// One sampling layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Total layer thickness (mm).
    pub thickness: f64,
    /// Absorber thickness within the layer (mm).
    pub absorber_thickness: f64,
    /// First cell dimension (mm).
    pub cell_size0: f64,
    /// Second cell dimension (mm).
    pub cell_size1: f64,
}

/// Calorimeter parameters for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct CalorimeterParameters {
    pub layout: CalorimeterLayout,
    /// Rotational symmetry order (number of staves/modules in phi).
    pub symmetry_order: u32,
    /// Azimuthal angle of the first module (rad).
    pub phi0: f64,
    /// Layer stack, innermost first.
    pub layers: Vec<Layer>,
    /// Free-form extras.
    pub params: GearParameters,
}

impl CalorimeterParameters {
    /// Barrel calorimeter with no layers yet.
    pub fn barrel(inner_r: f64, outer_z: f64, symmetry_order: u32, phi0: f64) -> Self {
        Self::with_layout(CalorimeterLayout::Barrel { inner_r, outer_z }, symmetry_order, phi0)
    }

    /// Endcap calorimeter with no layers yet.
    pub fn endcap(inner_r: f64, outer_r: f64, inner_z: f64, symmetry_order: u32, phi0: f64) -> Self {
        Self::with_layout(
            CalorimeterLayout::Endcap { inner_r, outer_r, inner_z },
            symmetry_order,
            phi0,
        )
    }

    pub fn with_layout(layout: CalorimeterLayout, symmetry_order: u32, phi0: f64) -> Self {
        Self { layout, symmetry_order, phi0, layers: Vec::new(), params: GearParameters::new() }
    }

    /// Append `repeat` copies of `layer` to the stack.
    pub fn add_layer(&mut self, layer: Layer, repeat: usize) {
        self.layers.extend(std::iter::repeat_n(layer, repeat));
    }

    pub fn total_thickness(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }

    /// `[r_min, r_max, z_min, z_max]` of the active volume.
    pub fn extent(&self) -> [f64; 4] {
        let thickness = self.total_thickness();
        match self.layout {
            CalorimeterLayout::Barrel { inner_r, outer_z } => {
                [inner_r, inner_r + thickness, -outer_z, outer_z]
            }
            CalorimeterLayout::Endcap { inner_r, outer_r, inner_z } => {
                [inner_r, outer_r, inner_z, inner_z + thickness]
            }
        }
    }
}
