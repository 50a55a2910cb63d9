#![no_main]

use std::path::Path;

use gear_xml::{HandlerRegistry, XmlConfig, parse_document_str};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The reader takes UTF-8 text; anything else is rejected before parsing.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let registry = HandlerRegistry::global();
    let config = XmlConfig::default();
    let Ok(mgr) = parse_document_str(text, Path::new("fuzz.xml"), registry, &config) else {
        return;
    };

    // Written output must be a fixed point: write, re-read, write again.
    let first = gear_xml::create_document(&mgr, registry, &config)
        .expect("write loaded store")
        .to_xml_string(&config);
    let reread = parse_document_str(&first, Path::new("fuzz.xml"), registry, &config)
        .expect("re-read written store");
    let second = gear_xml::create_document(&reread, registry, &config)
        .expect("write re-read store")
        .to_xml_string(&config);
    assert_eq!(first, second);
});
