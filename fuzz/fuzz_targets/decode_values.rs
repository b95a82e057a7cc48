#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use berstream::{BitString, Integer, Oid, Time};
use berstream::{real, string, Tag};

fuzz_target!(|data: &[u8]| {
    let content = Bytes::copy_from_slice(data);

    if let Ok(int) = Integer::from_content(content.clone(), 0u64) {
        let _ = int.to_string();
        if let Some(value) = int.to_i64() {
            assert_eq!(int.to_string(), value.to_string());
        }
    }
    if let Ok(oid) = Oid::from_content(content.clone(), 0u64) {
        assert!(oid.to_vec().len() >= 2);
    }
    if let Ok(bits) = BitString::from_content(content, 0u64) {
        assert!(bits.unused() < 8);
        assert!(bits.octet_len() > 0 || bits.unused() == 0);
    }
    let _ = real::from_content(data, 0u64);
    let _ = Time::from_utc_time(data, 0u64);
    let _ = Time::from_generalized_time(data, 0u64);
    for number in 0..31 {
        let _ = string::decode(Tag::universal(number), data, 0u64);
    }
});
