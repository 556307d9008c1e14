#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use logcentral_ism::IsmPolicyBuilder;

#[derive(Debug, Arbitrary)]
struct PolicyInput {
    warm_age: String,
    cold_age: String,
    retain_age: String,
    rollover_age: String,
    rollover_size: String,
    days: Option<u64>,
}

fuzz_target!(|input: PolicyInput| {
    let mut builder = IsmPolicyBuilder::new()
        .warm_age(input.warm_age)
        .cold_age(input.cold_age)
        .retain_age(input.retain_age)
        .rollover_age(input.rollover_age)
        .rollover_size(input.rollover_size)
        .index_pattern("fuzz-*");
    if let Some(days) = input.days {
        builder = builder.retain_age(days);
    }

    if let Ok(doc) = builder.build() {
        let states = doc.states();
        // hot에서 시작하고, 최대 4개 상태
        assert_eq!(states[0].name, "hot");
        assert!(states.len() <= 4);
        // 마지막 상태만 전환이 없다
        for state in &states[..states.len() - 1] {
            assert_eq!(state.transitions.len(), 1);
        }
        let _ = doc.to_json_pretty();
    }
});
