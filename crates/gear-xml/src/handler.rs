//! Per-kind conversion between parameter records and `<detector>` elements.
//!
//! A handler is looked up by the detector's `geartype` tag (see
//! [`HandlerRegistry`](crate::HandlerRegistry)); neither the writer nor the
//! reader inspects record types themselves.

use gear_core::GearMgr;

use crate::error::RecordError;
use crate::tree::Element;

/// Type tag of TPC parameter records.
pub const TPC_PARAMETERS: &str = "TPCParameters";
/// Type tag of calorimeter parameter records.
pub const CALORIMETER_PARAMETERS: &str = "CalorimeterParameters";
/// Type tag of generic parameter records.
pub const GEAR_PARAMETERS: &str = "GearParameters";

/// Conversion capability for one kind of parameter record.
///
/// The field-to-XML mapping each implementation owns is part of the file
/// format and must stay stable across releases.
pub trait XmlHandler: Send + Sync {
    /// Type tag written to and matched against the `geartype` attribute.
    fn geartype(&self) -> &str;

    /// Build the element for the record stored under `name`.
    ///
    /// Returns `Ok(None)` when the store has no such record. Must not set
    /// the `name` or `geartype` attributes; the writer owns those.
    fn to_xml(&self, mgr: &GearMgr, name: &str) -> Result<Option<Element>, RecordError>;

    /// Build a record from `node` and store it under `name`.
    ///
    /// Unknown attributes and child elements are ignored; a missing or
    /// unparseable required field is an error.
    fn from_xml(
        &self,
        node: &roxmltree::Node,
        name: &str,
        mgr: &mut GearMgr,
    ) -> Result<(), RecordError>;
}
