//! Per-connection session plumbing.

pub mod adapter;
pub mod session;

#[cfg(test)]
pub(crate) mod memory;
