//! Built-in handlers, one per parameter kind.

mod calorimeter;
mod gear_parameters;
mod tpc;

pub use calorimeter::CalorimeterParametersXml;
pub use gear_parameters::{GearParametersXml, parameters_from_xml, parameters_to_xml};
pub use tpc::TpcParametersXml;
