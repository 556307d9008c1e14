#![no_main]

use libfuzzer_sys::fuzz_target;
use logcentral_coalescer::Blob;
use logcentral_coalescer::format::{FormatAdapter, GzipAdapter, TextAdapter};

fuzz_target!(|data: &[u8]| {
    // 손상된 입력은 Decode 에러가 되어야 하고 패닉이면 안 된다
    if let Ok(items) = GzipAdapter::default().stream_in(Blob::new("fuzz.gz", data.to_vec())) {
        for item in items {
            if item.is_err() {
                break;
            }
        }
    }

    if let Ok(items) = TextAdapter.stream_in(Blob::new("fuzz.log", data.to_vec())) {
        for item in items {
            if item.is_err() {
                break;
            }
        }
    }
});
