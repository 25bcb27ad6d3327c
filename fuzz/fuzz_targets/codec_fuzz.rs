#![no_main]
use blockdiff::codec::{base40, screencode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic; odd lengths are errors.
    match base40::decode(data) {
        Ok(text) => {
            assert_eq!(text.len(), data.len() / 2 * 3);
            // Every decoded text re-encodes; words above the largest encodable
            // one wrap, so only the length is guaranteed.
            let bytes = base40::encode(&text).unwrap();
            assert_eq!(bytes.len(), data.len());
        }
        Err(_) => assert!(data.len() % 2 == 1),
    }

    let text = String::from_utf8_lossy(data);
    if let Ok(bytes) = base40::encode(&text) {
        assert_eq!(base40::decode(&bytes).unwrap().chars().count(), text.chars().count());
    }

    let shown = screencode::decode(data);
    assert_eq!(shown.chars().count(), data.len());
});
