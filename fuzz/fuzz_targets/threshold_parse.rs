#![no_main]

use libfuzzer_sys::fuzz_target;
use logcentral_core::types::ThresholdValue;
use logcentral_ism::Threshold;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    // 패닉 없이 Ok 또는 Err을 반환해야 한다
    if let Ok(threshold) = Threshold::parse_str("warm_age", raw) {
        // 설정된 임계값은 항상 조건을 만든다
        assert_eq!(threshold.is_set(), threshold.condition().is_some());
    }

    let value: ThresholdValue = match raw.parse() {
        Ok(value) => value,
        Err(never) => match never {},
    };
    let _ = Threshold::parse("retain_age", &value);
});
