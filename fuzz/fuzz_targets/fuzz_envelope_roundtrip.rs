#![no_main]

use afm_check::registry::{FieldPath, RegistryConfig, XmlDocument, build_request};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, String)| {
    let (password, afm) = input;
    // Control characters are not representable in XML 1.0 text.
    if password.chars().chain(afm.chars()).any(char::is_control) {
        return;
    }
    let cfg = RegistryConfig::new("user", password);
    let xml = build_request(&cfg, &afm).expect("envelope generation failed");
    let doc = XmlDocument::parse(&xml).expect("generated envelope must parse");

    let called_for = FieldPath::new()
        .or(&["env:Body", "ns2:rgWsPublic2AfmMethod", "ns2:INPUT_REC", "ns3:afm_called_for"])
        .text(&doc.root);
    let expected = afm.trim();
    assert_eq!(called_for.as_deref(), (!expected.is_empty()).then_some(expected));
});
