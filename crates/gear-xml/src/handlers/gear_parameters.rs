//! `GearParameters` ⇄ `<parameter>` elements.
//!
//! ```xml
//! <parameter name="nLayers" type="int" value="5"/>
//! <parameter name="radii" type="DoubleVec">15.5 26 38</parameter>
//! ```

use std::str::FromStr;

use gear_core::{GearMgr, GearParameters};

use crate::error::RecordError;
use crate::handler::{GEAR_PARAMETERS, XmlHandler};
use crate::tree::{Element, parse_value, required_attribute};

const PARAMETER: &str = "parameter";

const INT: &str = "int";
const DOUBLE: &str = "double";
const STRING: &str = "string";
const INT_VEC: &str = "IntVec";
const DOUBLE_VEC: &str = "DoubleVec";
const STRING_VEC: &str = "StringVec";

/// Handler for user-defined detectors described only by generic parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct GearParametersXml;

impl XmlHandler for GearParametersXml {
    fn geartype(&self) -> &str {
        GEAR_PARAMETERS
    }

    fn to_xml(&self, mgr: &GearMgr, name: &str) -> Result<Option<Element>, RecordError> {
        Ok(mgr
            .gear_parameters(name)
            .map(|p| Element::new("detector").with_children(parameters_to_xml(p))))
    }

    fn from_xml(
        &self,
        node: &roxmltree::Node,
        name: &str,
        mgr: &mut GearMgr,
    ) -> Result<(), RecordError> {
        let params = parameters_from_xml(node)?;
        if mgr.set_gear_parameters(name, params).is_some() {
            log::warn!("duplicate detector \"{name}\": replacing earlier GearParameters");
        }
        Ok(())
    }
}

/// One `<parameter>` element per value, grouped by kind, keys sorted.
pub fn parameters_to_xml(params: &GearParameters) -> Vec<Element> {
    let mut out = Vec::new();

    out.extend(params.int_entries().map(|(key, v)| scalar(key, INT, v)));
    out.extend(params.double_entries().map(|(key, v)| scalar(key, DOUBLE, v)));
    out.extend(params.string_entries().map(|(key, v)| scalar(key, STRING, v)));
    out.extend(params.int_vec_entries().map(|(key, v)| vector(key, INT_VEC, v)));
    out.extend(params.double_vec_entries().map(|(key, v)| vector(key, DOUBLE_VEC, v)));
    out.extend(params.string_vec_entries().map(|(key, v)| vector(key, STRING_VEC, v)));

    out
}

fn scalar(key: &str, kind: &str, value: impl std::fmt::Display) -> Element {
    Element::new(PARAMETER)
        .with_attribute("name", key)
        .with_attribute("type", kind)
        .with_attribute("value", value)
}

fn vector<T: ToString>(key: &str, kind: &str, values: &[T]) -> Element {
    let elem = Element::new(PARAMETER).with_attribute("name", key).with_attribute("type", kind);
    if values.is_empty() {
        return elem;
    }
    let text: Vec<String> = values.iter().map(ToString::to_string).collect();
    elem.with_text(text.join(" "))
}

/// Collect every `<parameter>` child of `node`. Other children are ignored.
pub fn parameters_from_xml(node: &roxmltree::Node) -> Result<GearParameters, RecordError> {
    let mut params = GearParameters::new();

    for p in node.children().filter(|n| n.has_tag_name(PARAMETER)) {
        let key = required_attribute(&p, "name")?;
        let kind = required_attribute(&p, "type")?;

        match kind {
            INT => params.set_int_val(key, parse_scalar(&p, "integer")?),
            DOUBLE => params.set_double_val(key, parse_scalar(&p, "number")?),
            STRING => {
                let value = match p.attribute("value") {
                    Some(v) => v.to_string(),
                    None => p.text().map(str::trim).unwrap_or_default().to_string(),
                };
                params.set_string_val(key, value);
            }
            INT_VEC => params.set_int_vals(key, parse_vector(&p, "integer list")?),
            DOUBLE_VEC => params.set_double_vals(key, parse_vector(&p, "number list")?),
            STRING_VEC => {
                let values: Vec<String> = vector_text(&p).split_whitespace().map(String::from).collect();
                // split_whitespace never yields empty or blank tokens
                params.set_string_vals(key, values).map_err(|e| RecordError::InvalidValue {
                    element: PARAMETER.to_string(),
                    attribute: "text".to_string(),
                    value: e.to_string(),
                    expected: "string list",
                })?;
            }
            other => {
                return Err(RecordError::UnsupportedValue {
                    element: PARAMETER.to_string(),
                    attribute: "type".to_string(),
                    value: other.to_string(),
                });
            }
        }
    }

    Ok(params)
}

// Scalars: `value` attribute, falling back to element text.
fn parse_scalar<T: FromStr>(p: &roxmltree::Node, expected: &'static str) -> Result<T, RecordError> {
    match p.attribute("value") {
        Some(raw) => parse_value(p, "value", raw, expected),
        None => match p.text() {
            Some(text) if !text.trim().is_empty() => parse_value(p, "text", text, expected),
            _ => Err(RecordError::MissingAttribute {
                element: PARAMETER.to_string(),
                attribute: "value".to_string(),
            }),
        },
    }
}

// Vectors: element text, falling back to the `value` attribute.
fn vector_text<'a>(p: &roxmltree::Node<'a, '_>) -> &'a str {
    match p.text() {
        Some(text) if !text.trim().is_empty() => text,
        _ => p.attribute("value").unwrap_or_default(),
    }
}

fn parse_vector<T: FromStr>(p: &roxmltree::Node, expected: &'static str) -> Result<Vec<T>, RecordError> {
    vector_text(p)
        .split_whitespace()
        .map(|tok| parse_value(p, "text", tok, expected))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::XmlConfig;
    use crate::tree::Document;

    fn parse_detector(xml: &str) -> Result<GearParameters, RecordError> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        parameters_from_xml(&doc.root_element())
    }

    fn sample() -> GearParameters {
        let mut p = GearParameters::new();
        p.set_int_val("nLayers", 5);
        p.set_double_val("cos_theta", 0.975);
        p.set_string_val("material", "  silicon  ");
        p.set_int_vals("ladders", vec![10, 11, 12]);
        p.set_double_vals("radii", vec![15.5, 26.0, 1e-12]);
        p.set_double_vals("empty", vec![]);
        p.set_string_vals("names", vec!["L1".into(), "L2".into()]).unwrap();
        p
    }

    #[test]
    fn to_xml_layout() {
        let elems = parameters_to_xml(&sample());
        assert_eq!(elems.len(), 7);
        assert_eq!(elems[0].attribute("name"), Some("nLayers"));
        assert_eq!(elems[0].attribute("type"), Some("int"));
        assert_eq!(elems[0].attribute("value"), Some("5"));

        let radii = elems.iter().find(|e| e.attribute("name") == Some("radii")).unwrap();
        assert_eq!(radii.attribute("type"), Some("DoubleVec"));
        assert_eq!(radii.attribute("value"), None);
    }

    #[test]
    fn write_then_read_preserves_values() {
        let original = sample();
        let doc = Document::new(Element::new("detector").with_children(parameters_to_xml(&original)));
        let text = doc.to_xml_string(&XmlConfig::default());

        assert_eq!(parse_detector(&text).unwrap(), original);
    }

    #[test]
    fn value_sources_and_whitespace() {
        let p = parse_detector(
            r#"<detector>
                 <parameter name="a" type="int"> 42 </parameter>
                 <parameter name="b" type="double" value="2500."/>
                 <parameter name="c" type="IntVec" value="1 2 3"/>
                 <parameter name="d" type="StringVec">
                     Si   W
                 </parameter>
                 <parameter name="e" type="string"> text form </parameter>
                 <comment>ignored</comment>
               </detector>"#,
        )
        .unwrap();

        assert_eq!(p.int_val("a").unwrap(), 42);
        assert_eq!(p.double_val("b").unwrap(), 2500.0);
        assert_eq!(p.int_vals("c").unwrap(), [1, 2, 3]);
        assert_eq!(p.string_vals("d").unwrap(), ["Si", "W"]);
        assert_eq!(p.string_val("e").unwrap(), "text form");
    }

    #[test]
    fn bad_number_is_invalid_value() {
        let err = parse_detector(r#"<d><parameter name="n" type="int" value="five"/></d>"#).unwrap_err();
        assert!(matches!(err, RecordError::InvalidValue { ref value, .. } if value == "five"));

        let err = parse_detector(r#"<d><parameter name="v" type="DoubleVec">1.0 x 3</parameter></d>"#)
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidValue { ref value, .. } if value == "x"));
    }

    #[test]
    fn missing_fields() {
        let err = parse_detector(r#"<d><parameter type="int" value="1"/></d>"#).unwrap_err();
        assert!(matches!(err, RecordError::MissingAttribute { ref attribute, .. } if attribute == "name"));

        let err = parse_detector(r#"<d><parameter name="n" type="double"/></d>"#).unwrap_err();
        assert!(matches!(err, RecordError::MissingAttribute { ref attribute, .. } if attribute == "value"));
    }

    #[test]
    fn unknown_type_rejected() {
        let err = parse_detector(r#"<d><parameter name="n" type="Matrix" value="1"/></d>"#).unwrap_err();
        assert!(matches!(err, RecordError::UnsupportedValue { ref value, .. } if value == "Matrix"));
    }

    #[test]
    fn handler_uses_store_key() {
        let mut mgr = GearMgr::new();
        assert!(GearParametersXml.to_xml(&mgr, "VXD").unwrap().is_none());

        mgr.set_gear_parameters("VXD", sample());
        let elem = GearParametersXml.to_xml(&mgr, "VXD").unwrap().unwrap();
        assert_eq!(elem.attribute("name"), None);
        assert_eq!(elem.attribute("geartype"), None);

        let text = Document::new(elem).to_xml_string(&XmlConfig::default());
        let doc = roxmltree::Document::parse(&text).unwrap();
        let mut loaded = GearMgr::new();
        GearParametersXml.from_xml(&doc.root_element(), "VXD", &mut loaded).unwrap();
        assert_eq!(loaded, mgr);
    }
}
