pub mod compute;
pub mod config;
pub mod cpu_ref;
pub mod diagnostics;
pub mod error;
pub mod gpu;
pub mod offscreen;
pub mod readback;
pub mod surface;
pub mod triangle;
