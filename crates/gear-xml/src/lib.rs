//! # gear-xml
//!
//! XML persistence for GEAR detector parameters.
//!
//! A [`GearMgr`](gear_core::GearMgr) is written as one `<gear>` document with a
//! `<detector>` element per record, each tagged with a `geartype`. Reading
//! dispatches every detector to the [`XmlHandler`] registered for its tag in
//! a [`HandlerRegistry`], so new parameter kinds plug in without touching the
//! document reader or writer.
//!
//! ## Example
//!
//! ```no_run
//! use gear_core::GearMgr;
//!
//! let mgr = GearMgr::new();
//! gear_xml::create_xml_file(Some(&mgr), "gear_ild.xml").unwrap();
//!
//! let loaded = gear_xml::load_document("gear_ild.xml").unwrap();
//! assert_eq!(loaded, mgr);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod tree;

pub use config::XmlConfig;
pub use document::{
    GearXml, create_document, create_xml_file, create_xml_file_with, load_document,
    load_document_with, parse_document_str,
};
pub use error::{RecordError, Result, XmlError};
pub use handler::{CALORIMETER_PARAMETERS, GEAR_PARAMETERS, TPC_PARAMETERS, XmlHandler};
pub use registry::HandlerRegistry;
pub use tree::{Document, Element, XmlNode};
