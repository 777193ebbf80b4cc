//! Foundational types shared by the manifest tooling: byte spans, source line lookup, and
//! diagnostics.

pub mod errors;
pub mod source;
pub mod span;
