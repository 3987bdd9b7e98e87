//! Domain types shared between the server and client crates.

pub mod pipe;
pub mod version;

pub use pipe::{Pipe, PipeWithVersions};
pub use version::Version;
