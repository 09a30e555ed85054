//! Capability inspector
//!
//! Reads platform and device properties through the provider's two-call
//! query protocol and decodes them according to a per-key table.

pub mod decode;
pub mod key;
mod platform;
mod query;

pub use decode::{
    BitFlagSet, PropertyValue, decode, decode_array, decode_bit_flags, decode_scalar,
    decode_string, format,
};
pub use key::{Decoding, FlagTable, PropertyKey, Scope, Width};
pub use platform::PlatformInfo;
pub use query::Inspector;
