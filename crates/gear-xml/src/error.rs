//! Error types for reading and writing GEAR XML files.

use std::path::PathBuf;

use thiserror::Error;

/// A detector element that a handler could not convert.
///
/// Carries no file context; the document reader and writer qualify it with
/// the file path and detector name as [`XmlError::MalformedRecord`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Required child element is absent.
    #[error("missing <{element}> element")]
    MissingElement {
        /// Tag name.
        element: String,
    },

    /// Required attribute is absent.
    #[error("<{element}> has no attribute \"{attribute}\"")]
    MissingAttribute {
        /// Tag name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Value present but not parseable as the declared type.
    #[error("<{element}> {attribute}=\"{value}\" is not a valid {expected}")]
    InvalidValue {
        /// Tag name.
        element: String,
        /// Attribute name, or `text` for element content.
        attribute: String,
        /// Raw value.
        value: String,
        /// Expected type.
        expected: &'static str,
    },

    /// Value parsed but is not one the handler supports.
    #[error("<{element}> has unsupported {attribute} \"{value}\"")]
    UnsupportedValue {
        /// Tag name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Raw value.
        value: String,
    },

    /// Detector name does not denote a calorimeter region.
    #[error("\"{0}\" is not a calorimeter region")]
    UnknownRegion(String),
}

/// Errors from creating or loading a GEAR XML file.
#[derive(Error, Debug)]
pub enum XmlError {
    /// No parameter store was supplied to the writer.
    #[error("cannot write GEAR XML: parameter store does not exist")]
    StoreUnavailable,

    /// I/O error reading or writing the file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configured comment contains characters XML cannot represent.
    #[error("cannot write GEAR XML file {}: comment contains non-XML characters", path.display())]
    InvalidComment {
        /// File path.
        path: PathBuf,
    },

    /// Document is not well-formed XML.
    #[error("parse error in file [{}, row: {row}, col: {col}] : {description}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// 1-based row reported by the parser.
        row: u32,
        /// 1-based column reported by the parser.
        col: u32,
        /// Parser message.
        description: String,
    },

    /// Document has no root element.
    #[error("parse error: no root tag found in {}", path.display())]
    MissingRoot {
        /// File path.
        path: PathBuf,
    },

    /// Root element has no `<detectors>` child.
    #[error("parse error: no detectors tag found in {}", path.display())]
    MissingDetectors {
        /// File path.
        path: PathBuf,
    },

    /// A detector's `geartype` has no registered handler.
    #[error("parse error: unknown geartype \"{geartype}\" in file {}", path.display())]
    UnknownGearType {
        /// Offending type tag.
        geartype: String,
        /// File path.
        path: PathBuf,
    },

    /// A detector element carries no `name` attribute.
    #[error("parse error: detector #{index} has no name attribute in file {}", path.display())]
    UnnamedDetector {
        /// Zero-based position among the `<detector>` elements.
        index: usize,
        /// File path.
        path: PathBuf,
    },

    /// A handler rejected a detector record.
    #[error("malformed detector \"{name}\" in file {}: {source}", path.display())]
    MalformedRecord {
        /// File path.
        path: PathBuf,
        /// Detector name.
        name: String,
        /// Handler failure.
        #[source]
        source: RecordError,
    },
}

/// Result alias for GEAR XML operations.
pub type Result<T> = std::result::Result<T, XmlError>;
