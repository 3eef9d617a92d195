#![cfg(test)]

use cbor_object::{Decoder, DecoderConfig, Normalize, encode::emit};
use std::io::Read;

#[test]
fn test_all() {
    let decoder = Decoder::new().with_config(DecoderConfig::with_max_depth(128));
    match std::fs::read_dir("./corpus/decode") {
        Err(e) => {
            eprintln!(
                "Failed to open dir: {e}, curr dir: {}",
                std::env::current_dir().unwrap().to_string_lossy()
            );
        }
        Ok(dir) => {
            for entry in dir.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let Ok(mut file) = std::fs::File::open(&path) else {
                    continue;
                };
                let mut buffer = Vec::new();
                if file.read_to_end(&mut buffer).is_err() {
                    continue;
                }
                if let Ok((item, len)) = decoder.decode_slice(&buffer) {
                    _ = format!("{item}");
                    _ = item.normalize();
                    assert_eq!(emit(&item), &buffer[..len], "{}", path.display());
                }
            }
        }
    }
}
