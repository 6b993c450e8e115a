//! Response payloads.

pub mod response;
