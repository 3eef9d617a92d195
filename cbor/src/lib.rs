/*!
A CBOR (RFC 8949) codec built around an explicit data-item tree.

[`decode`](decode::decode) turns bytes into a [`DataItem`]; [`emit`](encode::emit)
turns it back. Items remember the exact header they were read from, so
re-encoding a decoded item reproduces its input byte for byte, including
non-shortest lengths and indefinite-length framing.

Tags (major type 6) and simple values (major type 7) are resolved through
registries of pluggable handlers. [`TagRegistry::default`] and
[`SimpleRegistry::default`] carry the RFC 8949 set; anything unregistered
is kept verbatim.
*/
#![no_std]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

use alloc::{boxed::Box, string::String, vec::Vec};
use tracing::*;

pub mod config;
pub mod cursor;
pub mod decode;
pub mod encode;
pub mod error;
pub mod item;
pub mod length;
pub mod normalize;
pub mod num;
pub mod simple;
pub mod tag;

pub use config::DecoderConfig;
pub use decode::Decoder;
pub use error::Error;
pub use item::DataItem;
pub use normalize::{Normalize, Normalized};
pub use simple::SimpleRegistry;
pub use tag::TagRegistry;
