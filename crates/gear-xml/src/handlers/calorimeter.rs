//! `CalorimeterParameters` ⇄ `<detector geartype="CalorimeterParameters">`.
//!
//! ```xml
//! <detector name="EcalBarrel" geartype="CalorimeterParameters">
//!   <layout type="Barrel" symmetry="8" phi0="0"/>
//!   <dimensions inner_r="1698.85" outer_z="2750"/>
//!   <layer repeat="30" thickness="3.9" absorberThickness="2.1" cellSize0="10" cellSize1="10"/>
//! </detector>
//! ```
//!
//! Endcaps use `<dimensions inner_r=".." outer_r=".." inner_z=".."/>`.

use gear_core::{CalorimeterLayout, CalorimeterParameters, CalorimeterRegion, GearMgr, Layer};

use super::gear_parameters::{parameters_from_xml, parameters_to_xml};
use crate::error::RecordError;
use crate::handler::{CALORIMETER_PARAMETERS, XmlHandler};
use crate::tree::{Element, parse_attribute, parse_value, require_child, required_attribute};

const LAYOUT: &str = "layout";
const DIMENSIONS: &str = "dimensions";
const LAYER: &str = "layer";
const BARREL: &str = "Barrel";
const ENDCAP: &str = "Endcap";

/// Upper bound on the expanded layer stack of one calorimeter.
const MAX_LAYERS: usize = 100_000;

/// Handler for the four calorimeter slots; the detector name selects the region.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalorimeterParametersXml;

fn region(name: &str) -> Result<CalorimeterRegion, RecordError> {
    name.parse().map_err(|_| RecordError::UnknownRegion(name.to_string()))
}

impl XmlHandler for CalorimeterParametersXml {
    fn geartype(&self) -> &str {
        CALORIMETER_PARAMETERS
    }

    fn to_xml(&self, mgr: &GearMgr, name: &str) -> Result<Option<Element>, RecordError> {
        let Some(cal) = mgr.calorimeter_parameters(region(name)?) else {
            return Ok(None);
        };
        // Anything longer could not be read back.
        if cal.layers.len() > MAX_LAYERS {
            return Err(RecordError::UnsupportedValue {
                element: LAYER.to_string(),
                attribute: "repeat".to_string(),
                value: format!("{} (stack limited to {MAX_LAYERS} layers)", cal.layers.len()),
            });
        }

        let (layout_type, dimensions) = match cal.layout {
            CalorimeterLayout::Barrel { inner_r, outer_z } => (
                BARREL,
                Element::new(DIMENSIONS)
                    .with_attribute("inner_r", inner_r)
                    .with_attribute("outer_z", outer_z),
            ),
            CalorimeterLayout::Endcap { inner_r, outer_r, inner_z } => (
                ENDCAP,
                Element::new(DIMENSIONS)
                    .with_attribute("inner_r", inner_r)
                    .with_attribute("outer_r", outer_r)
                    .with_attribute("inner_z", inner_z),
            ),
        };

        let layout = Element::new(LAYOUT)
            .with_attribute("type", layout_type)
            .with_attribute("symmetry", cal.symmetry_order)
            .with_attribute("phi0", cal.phi0);

        Ok(Some(
            Element::new("detector")
                .with_child(layout)
                .with_child(dimensions)
                .with_children(layer_elements(&cal.layers))
                .with_children(parameters_to_xml(&cal.params)),
        ))
    }

    fn from_xml(
        &self,
        node: &roxmltree::Node,
        name: &str,
        mgr: &mut GearMgr,
    ) -> Result<(), RecordError> {
        let region = region(name)?;

        let layout_node = require_child(node, LAYOUT)?;
        let dims = require_child(node, DIMENSIONS)?;
        let layout = match required_attribute(&layout_node, "type")? {
            BARREL => CalorimeterLayout::Barrel {
                inner_r: parse_attribute(&dims, "inner_r", "number")?,
                outer_z: parse_attribute(&dims, "outer_z", "number")?,
            },
            ENDCAP => CalorimeterLayout::Endcap {
                inner_r: parse_attribute(&dims, "inner_r", "number")?,
                outer_r: parse_attribute(&dims, "outer_r", "number")?,
                inner_z: parse_attribute(&dims, "inner_z", "number")?,
            },
            other => {
                return Err(RecordError::UnsupportedValue {
                    element: LAYOUT.to_string(),
                    attribute: "type".to_string(),
                    value: other.to_string(),
                });
            }
        };

        let mut cal = CalorimeterParameters::with_layout(
            layout,
            parse_attribute(&layout_node, "symmetry", "non-negative integer")?,
            parse_attribute(&layout_node, "phi0", "number")?,
        );

        for layer_node in node.children().filter(|n| n.has_tag_name(LAYER)) {
            let repeat: usize = match layer_node.attribute("repeat") {
                Some(raw) => parse_value(&layer_node, "repeat", raw, "non-negative integer")?,
                None => 1,
            };
            if cal.layers.len().saturating_add(repeat) > MAX_LAYERS {
                return Err(RecordError::UnsupportedValue {
                    element: LAYER.to_string(),
                    attribute: "repeat".to_string(),
                    value: format!("{repeat} (stack limited to {MAX_LAYERS} layers)"),
                });
            }
            let layer = Layer {
                thickness: parse_attribute(&layer_node, "thickness", "number")?,
                absorber_thickness: parse_attribute(&layer_node, "absorberThickness", "number")?,
                cell_size0: parse_attribute(&layer_node, "cellSize0", "number")?,
                cell_size1: parse_attribute(&layer_node, "cellSize1", "number")?,
            };
            cal.add_layer(layer, repeat);
        }

        cal.params = parameters_from_xml(node)?;

        log::debug!("{region}: {} layers", cal.layers.len());
        if mgr.set_calorimeter_parameters(region, cal).is_some() {
            log::warn!("duplicate detector \"{name}\": replacing earlier CalorimeterParameters");
        }
        Ok(())
    }
}

/// Consecutive identical layers collapse into one element with `repeat`.
fn layer_elements(layers: &[Layer]) -> Vec<Element> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < layers.len() {
        let layer = layers[i];
        let run = layers[i..].iter().take_while(|l| **l == layer).count().max(1);
        out.push(
            Element::new(LAYER)
                .with_attribute("repeat", run)
                .with_attribute("thickness", layer.thickness)
                .with_attribute("absorberThickness", layer.absorber_thickness)
                .with_attribute("cellSize0", layer.cell_size0)
                .with_attribute("cellSize1", layer.cell_size1),
        );
        i += run;
    }
    out
}
