//! # gear-core
//!
//! Detector parameter records for GEAR geometry descriptions and the
//! [`GearMgr`] store that holds them.
//!
//! The store owns at most one record per well-known slot (the TPC and the
//! four calorimeter regions) plus any number of named [`GearParameters`]
//! records for user-defined detectors. Serialization lives in `gear-xml`.

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod calorimeter;
pub mod error;
pub mod manager;
pub mod parameters;
pub mod tpc;

pub use calorimeter::{CalorimeterLayout, CalorimeterParameters, CalorimeterRegion, Layer};
pub use error::{Error, Result};
pub use manager::GearMgr;
pub use parameters::GearParameters;
pub use tpc::{FixedPadSizeDiskLayout, TpcParameters};
