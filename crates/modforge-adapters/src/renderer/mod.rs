//! Template renderer adapters.

pub mod builtin;
mod simple;

pub use simple::SimpleRenderer;
