//! Writer/reader configuration.

use serde::{Deserialize, Serialize};

/// Comment placed at the top of every written document.
pub const DEFAULT_COMMENT: &str = "Gear XML file automatically created with gear-xml create_xml_file";

/// Options for [`create_document`](crate::create_document) and
/// [`load_document_with`](crate::load_document_with).
///
/// Deserializes from any serde format with missing fields defaulted, so it
/// can sit inside an application's own config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XmlConfig {
    /// Spaces per nesting level in written files (0 = single line).
    pub indent: usize,
    /// Descriptive comment placed first inside the root element.
    pub comment: String,
    /// Accept a `<!DOCTYPE>` declaration when reading.
    pub allow_dtd: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self { indent: 2, comment: DEFAULT_COMMENT.to_string(), allow_dtd: true }
    }
}
