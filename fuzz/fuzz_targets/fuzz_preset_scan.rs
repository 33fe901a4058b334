#![no_main]

use libfuzzer_sys::fuzz_target;
use patchscope_preset::{program_string_attribute, ParameterAddressTable, PresetAttributes};

fuzz_target!(|data: &[u8]| {
    let attributes = PresetAttributes::from_bytes(data);

    for (name, _) in attributes.iter() {
        assert!(!name.is_empty());
    }

    let table = ParameterAddressTable::builtin();
    let mapped = table.resolve(&attributes);
    assert!(mapped.len() <= attributes.len());
    assert!(mapped.len() + table.unmapped(&attributes).len() == attributes.len());

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = program_string_attribute(text, "programname");
    }
});
