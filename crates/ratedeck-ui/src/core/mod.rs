//! Core, DOM-free primitives for the Web UI.
pub mod bootstrap;
pub mod rates;
pub mod toast;
