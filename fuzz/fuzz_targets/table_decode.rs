#![no_main]

use libfuzzer_sys::fuzz_target;
use logcentral_coalescer::Blob;
use logcentral_coalescer::format::{FormatAdapter, TableAdapter};

fuzz_target!(|data: &[u8]| {
    let Ok(chunks) = TableAdapter.stream_in(Blob::new("fuzz.parquet", data.to_vec())) else {
        return;
    };
    for chunk in chunks {
        match chunk {
            Ok(chunk) => {
                let _ = TableAdapter::sizer(&chunk);
            }
            Err(_) => break,
        }
    }
});
