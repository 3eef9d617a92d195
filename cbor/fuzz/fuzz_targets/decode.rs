#![no_main]

use cbor_object::{Decoder, DecoderConfig, Normalize, encode::emit};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoder = Decoder::new().with_config(DecoderConfig::with_max_depth(128));
    if let Ok((item, len)) = decoder.decode_slice(data) {
        _ = format!("{item}");
        _ = item.normalize();
        assert_eq!(emit(&item), &data[..len]);
    }
});
