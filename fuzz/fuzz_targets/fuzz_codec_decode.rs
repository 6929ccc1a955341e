#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic.
    let Ok(records) = svrp_codec::decode(data) else {
        return;
    };

    // Whatever decodes re-encodes in the given order and decodes to the same
    // records.
    let encoded = svrp_codec::encode_records(&records).expect("decoded records re-encode");
    let again = svrp_codec::decode(&encoded).expect("re-encoded proof decodes");
    assert_eq!(again, records);
});
