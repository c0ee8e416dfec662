//! Fuzz target: distributor state JSON deserialization
//!
//! Feeds arbitrary bytes to serde_json to detect panics, stack overflows,
//! or unexpected behavior when restoring persisted distributor state.
//! Any state that deserializes is also re-audited and re-serialized.
//!
//! Run: cargo +nightly fuzz run fuzz_state_deserialize -- -max_len=4096

#![no_main]
use libfuzzer_sys::fuzz_target;
use prorata_core::{DividendDistributor, DividendToken};

fuzz_target!(|data: &[u8]| {
    // Attempt JSON deserialization — must not panic
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(dist) = serde_json::from_str::<DividendDistributor>(s) {
            // restored state must be queryable and re-serializable
            let _ = dist.audit();
            let _ = dist.accumulated_entitlement("PRTa");
            let _ = serde_json::to_string(&dist);
        }
        let _: Result<DividendToken, _> = serde_json::from_str(s);
    }

    // Raw bytes — must not panic
    let _: Result<DividendDistributor, _> = serde_json::from_slice(data);
});
