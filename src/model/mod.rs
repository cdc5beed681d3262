//! Core data model types for mtree

mod digest;

pub use digest::Digest;
