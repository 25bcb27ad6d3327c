#![no_main]
use blockdiff::diff::{DiffOptions, Overlays, diff_all};
use blockdiff::dump::dump;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let opts = DiffOptions {
        line_length: usize::from(data[0] % 64) + 1,
        offset_width: usize::from(data[1] % 16) + 1,
        overlays: Overlays::from_bits_truncate(data[2]),
    };
    let body = &data[3..];
    let (left, right) = body.split_at(body.len() / 2);

    let out = diff_all(left, right, opts).unwrap();
    if left == right {
        assert!(out.is_empty());
    }

    let half = left.len() / 2;
    let _ = dump(left, half, Some(left.len()), &opts, std::io::sink()).unwrap();
});
