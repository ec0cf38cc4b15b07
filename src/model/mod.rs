//! The in-memory action-path model (component C) the discovery, resolution,
//! and materialisation layers share.

pub mod action_path;

pub use action_path::{ActionPathEntry, ActionPathSet};
