pub mod config;
pub mod consts;
pub mod error;
pub mod optimizer;
pub mod progress;
pub mod puzzle;
pub mod scorer;
pub mod snapshot;
// cmd and reports are modules of the binary crate (main.rs).
