//! GEAR XML documents: writing a [`GearMgr`] out and loading one back.
//!
//! ```xml
//! <gear>
//!   <!-- descriptive comment -->
//!   <detectors>
//!     <detector name="TPC" geartype="TPCParameters"> .. </detector>
//!     <detector name="EcalBarrel" geartype="CalorimeterParameters"> .. </detector>
//!     <detector name="VXD" geartype="GearParameters"> .. </detector>
//!   </detectors>
//! </gear>
//! ```
//!
//! Both directions dispatch through a [`HandlerRegistry`] on the `geartype`
//! tag. On read, a detector without `geartype` is skipped with a warning but
//! a `geartype` with no registered handler fails the whole load: the first is
//! an entry that opted out of typing, the second a file this build cannot
//! understand.

use std::path::{Path, PathBuf};

use gear_core::{CalorimeterRegion, GearMgr};

use crate::config::XmlConfig;
use crate::error::{Result, XmlError};
use crate::handler::{CALORIMETER_PARAMETERS, GEAR_PARAMETERS, TPC_PARAMETERS};
use crate::registry::HandlerRegistry;
use crate::tree::{Document, Element, child_element, is_xml_text};


/// Root element tag.
pub const ROOT_TAG: &str = "gear";
/// Container element tag.
pub const DETECTORS_TAG: &str = "detectors";
/// Per-record element tag.
pub const DETECTOR_TAG: &str = "detector";
/// Attribute carrying the record's instance name.
pub const NAME_ATTR: &str = "name";
/// Attribute carrying the record's type tag.
pub const GEARTYPE_ATTR: &str = "geartype";

/// Instance name of the TPC slot.
pub const TPC_NAME: &str = "TPC";

/// Source name used in errors for in-memory documents.
const IN_MEMORY: &str = "<memory>";

/// Well-known slots in write order: TPC, then the calorimeter regions.
fn well_known_detectors() -> impl Iterator<Item = (&'static str, &'static str)> {
    std::iter::once((TPC_NAME, TPC_PARAMETERS))
        .chain(CalorimeterRegion::ALL.into_iter().map(|r| (r.name(), CALORIMETER_PARAMETERS)))
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Build the document for `mgr` without touching the filesystem.
pub fn create_document(
    mgr: &GearMgr,
    registry: &HandlerRegistry,
    config: &XmlConfig,
) -> Result<Document> {
    build_document(mgr, registry, config, Path::new(IN_MEMORY))
}

fn build_document(
    mgr: &GearMgr,
    registry: &HandlerRegistry,
    config: &XmlConfig,
    path: &Path,
) -> Result<Document> {
    let mut slots: Vec<(&str, &str)> = well_known_detectors().collect();
    slots.extend(mgr.gear_parameter_keys().map(|key| (key, GEAR_PARAMETERS)));

    let mut detectors = Vec::new();
    for (name, geartype) in slots {
        let handler = registry.resolve(geartype).ok_or_else(|| XmlError::UnknownGearType {
            geartype: geartype.to_string(),
            path: path.to_path_buf(),
        })?;

        let body = handler.to_xml(mgr, name).map_err(|source| XmlError::MalformedRecord {
            path: path.to_path_buf(),
            name: name.to_string(),
            source,
        })?;

        // An empty slot is simply left out of the file.
        let Some(body) = body else {
            continue;
        };

        let detector = Element::new(DETECTOR_TAG)
            .with_attribute(NAME_ATTR, name)
            .with_attribute(GEARTYPE_ATTR, geartype)
            .with_content_of(body);
        // Keys and string values may hold characters XML cannot carry.
        detector.check_chars().map_err(|source| XmlError::MalformedRecord {
            path: path.to_path_buf(),
            name: name.to_string(),
            source,
        })?;

        log::debug!("writing detector \"{name}\" ({geartype})");
        detectors.push(detector);
    }

    if !is_xml_text(&config.comment) {
        return Err(XmlError::InvalidComment { path: path.to_path_buf() });
    }
    let root = Element::new(ROOT_TAG)
        .with_comment(config.comment.as_str())
        .with_child(Element::new(DETECTORS_TAG).with_children(detectors));
    Ok(Document::new(root))
}

/// Write `mgr` to `path` with the global registry and default config.
///
/// `None` fails with [`XmlError::StoreUnavailable`] before any I/O.
pub fn create_xml_file(mgr: Option<&GearMgr>, path: impl AsRef<Path>) -> Result<()> {
    create_xml_file_with(mgr, path, HandlerRegistry::global(), &XmlConfig::default())
}

/// [`create_xml_file`] with an explicit registry and config.
pub fn create_xml_file_with(
    mgr: Option<&GearMgr>,
    path: impl AsRef<Path>,
    registry: &HandlerRegistry,
    config: &XmlConfig,
) -> Result<()> {
    let mgr = mgr.ok_or(XmlError::StoreUnavailable)?;
    let path = path.as_ref();

    let doc = build_document(mgr, registry, config, path)?;
    doc.save(path, config)?;

    let n = doc.root().child_elements().flat_map(Element::child_elements).count();
    log::info!("wrote {n} detectors to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Load `path` with the global registry and default config.
pub fn load_document(path: impl AsRef<Path>) -> Result<GearMgr> {
    load_document_with(path, HandlerRegistry::global(), &XmlConfig::default())
}

/// [`load_document`] with an explicit registry and config.
pub fn load_document_with(
    path: impl AsRef<Path>,
    registry: &HandlerRegistry,
    config: &XmlConfig,
) -> Result<GearMgr> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|source| XmlError::Io { path: path.to_path_buf(), source })?;

    let mgr = parse_document_str(&text, path, registry, config)?;
    log::info!("loaded GEAR parameters from {}", path.display());
    Ok(mgr)
}

/// Parse an in-memory document. `source` names it in error messages.
pub fn parse_document_str(
    text: &str,
    source: &Path,
    registry: &HandlerRegistry,
    config: &XmlConfig,
) -> Result<GearMgr> {
    let opts = roxmltree::ParsingOptions { allow_dtd: config.allow_dtd, ..Default::default() };
    let doc = roxmltree::Document::parse_with_options(text, opts).map_err(|e| match e {
        roxmltree::Error::NoRootNode => XmlError::MissingRoot { path: source.to_path_buf() },
        e => {
            let pos = e.pos();
            XmlError::Parse {
                path: source.to_path_buf(),
                row: pos.row,
                col: pos.col,
                description: e.to_string(),
            }
        }
    })?;

    let root = doc.root_element();
    if !root.has_tag_name(ROOT_TAG) {
        log::debug!("root element is <{}>, expected <{ROOT_TAG}>", root.tag_name().name());
    }

    let detectors = child_element(&root, DETECTORS_TAG)
        .ok_or_else(|| XmlError::MissingDetectors { path: source.to_path_buf() })?;

    let mut mgr = GearMgr::new();
    for (index, det) in detectors.children().filter(|n| n.has_tag_name(DETECTOR_TAG)).enumerate() {
        let name = det
            .attribute(NAME_ATTR)
            .ok_or_else(|| XmlError::UnnamedDetector { index, path: source.to_path_buf() })?;

        let Some(geartype) = det.attribute(GEARTYPE_ATTR) else {
            log::warn!(
                "ignoring detector \"{name}\" with missing attribute \"{GEARTYPE_ATTR}\" in {}",
                source.display()
            );
            continue;
        };

        let handler = registry.resolve(geartype).ok_or_else(|| XmlError::UnknownGearType {
            geartype: geartype.to_string(),
            path: source.to_path_buf(),
        })?;

        log::debug!("reading detector \"{name}\" ({geartype})");
        handler.from_xml(&det, name, &mut mgr).map_err(|e| XmlError::MalformedRecord {
            path: source.to_path_buf(),
            name: name.to_string(),
            source: e,
        })?;
    }

    Ok(mgr)
}

/// A GEAR XML file bound to its path, loaded at most once.
#[derive(Debug)]
pub struct GearXml {
    path: PathBuf,
    config: XmlConfig,
    mgr: Option<GearMgr>,
}

impl GearXml {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), config: XmlConfig::default(), mgr: None }
    }

    pub fn with_config(mut self, config: XmlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parameter store described by the file.
    ///
    /// The first call reads the file with the global registry; later calls
    /// return the same store without reading it again.
    pub fn create_gear_mgr(&mut self) -> Result<&GearMgr> {
        let mgr = match self.mgr.take() {
            Some(mgr) => mgr,
            None => load_document_with(&self.path, HandlerRegistry::global(), &self.config)?,
        };
        Ok(self.mgr.insert(mgr))
    }

    /// Take ownership of the store, loading it first if needed.
    pub fn into_gear_mgr(self) -> Result<GearMgr> {
        match self.mgr {
            Some(mgr) => Ok(mgr),
            None => load_document_with(&self.path, HandlerRegistry::global(), &self.config),
        }
    }
}
