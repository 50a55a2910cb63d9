//! `TpcParameters` ⇄ `<detector geartype="TPCParameters">`.
//!
//! ```xml
//! <detector name="TPC" geartype="TPCParameters">
//!   <maxDriftLength value="2500"/>
//!   <driftVelocity value="0"/>
//!   <readoutFrequency value="10"/>
//!   <PadRowLayout2D type="FixedPadSizeDiskLayout" rMin="386" rMax="1626"
//!                   padHeight="6.2" padWidth="2.2" maxRow="200" padGap="0"/>
//!   <parameter name="tpcRPhiResMax" type="double" value="0.16"/>
//! </detector>
//! ```

use gear_core::{FixedPadSizeDiskLayout, GearMgr, TpcParameters};

use super::gear_parameters::{parameters_from_xml, parameters_to_xml};
use crate::error::RecordError;
use crate::handler::{TPC_PARAMETERS, XmlHandler};
use crate::tree::{Element, parse_attribute, require_child, required_attribute};

const MAX_DRIFT_LENGTH: &str = "maxDriftLength";
const DRIFT_VELOCITY: &str = "driftVelocity";
const READOUT_FREQUENCY: &str = "readoutFrequency";
const PAD_LAYOUT: &str = "PadRowLayout2D";
const FIXED_PAD_SIZE_DISK: &str = "FixedPadSizeDiskLayout";

/// Handler for the TPC slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct TpcParametersXml;

impl XmlHandler for TpcParametersXml {
    fn geartype(&self) -> &str {
        TPC_PARAMETERS
    }

    fn to_xml(&self, mgr: &GearMgr, _name: &str) -> Result<Option<Element>, RecordError> {
        let Some(tpc) = mgr.tpc_parameters() else {
            return Ok(None);
        };

        let pad = &tpc.pad_layout;
        let layout = Element::new(PAD_LAYOUT)
            .with_attribute("type", FIXED_PAD_SIZE_DISK)
            .with_attribute("rMin", pad.r_min)
            .with_attribute("rMax", pad.r_max)
            .with_attribute("padHeight", pad.pad_height)
            .with_attribute("padWidth", pad.pad_width)
            .with_attribute("maxRow", pad.max_row)
            .with_attribute("padGap", pad.pad_gap);

        Ok(Some(
            Element::new("detector")
                .with_child(value_element(MAX_DRIFT_LENGTH, tpc.max_drift_length))
                .with_child(value_element(DRIFT_VELOCITY, tpc.drift_velocity))
                .with_child(value_element(READOUT_FREQUENCY, tpc.readout_frequency))
                .with_child(layout)
                .with_children(parameters_to_xml(&tpc.params)),
        ))
    }

    fn from_xml(
        &self,
        node: &roxmltree::Node,
        name: &str,
        mgr: &mut GearMgr,
    ) -> Result<(), RecordError> {
        let layout_node = require_child(node, PAD_LAYOUT)?;
        let layout_type = required_attribute(&layout_node, "type")?;
        if layout_type != FIXED_PAD_SIZE_DISK {
            return Err(RecordError::UnsupportedValue {
                element: PAD_LAYOUT.to_string(),
                attribute: "type".to_string(),
                value: layout_type.to_string(),
            });
        }

        let pad_layout = FixedPadSizeDiskLayout {
            r_min: parse_attribute(&layout_node, "rMin", "number")?,
            r_max: parse_attribute(&layout_node, "rMax", "number")?,
            pad_height: parse_attribute(&layout_node, "padHeight", "number")?,
            pad_width: parse_attribute(&layout_node, "padWidth", "number")?,
            max_row: parse_attribute(&layout_node, "maxRow", "non-negative integer")?,
            pad_gap: parse_attribute(&layout_node, "padGap", "number")?,
        };

        let tpc = TpcParameters {
            max_drift_length: read_value(node, MAX_DRIFT_LENGTH)?,
            drift_velocity: read_value(node, DRIFT_VELOCITY)?,
            readout_frequency: read_value(node, READOUT_FREQUENCY)?,
            pad_layout,
            params: parameters_from_xml(node)?,
        };

        log::debug!("TPC \"{name}\": {} pad rows", tpc.pad_layout.n_rows());
        if mgr.set_tpc_parameters(tpc).is_some() {
            log::warn!("duplicate TPC detector \"{name}\": replacing earlier TPCParameters");
        }
        Ok(())
    }
}

fn value_element(tag: &str, value: f64) -> Element {
    Element::new(tag).with_attribute("value", value)
}

fn read_value(node: &roxmltree::Node, tag: &str) -> Result<f64, RecordError> {
    parse_attribute(&require_child(node, tag)?, "value", "number")
}
