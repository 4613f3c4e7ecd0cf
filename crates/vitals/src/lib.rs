//! Top-level facade crate for vitals.
//!
//! Re-exports the core registry/health types and the server library so users can depend on a single crate.

pub mod core {
    pub use vitals_core::*;
}

pub mod server {
    pub use vitals_server::*;
}
