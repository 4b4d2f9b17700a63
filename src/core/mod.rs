//! Core module
//!
//! Catalog synchronization pipeline: wire codec, image materialization,
//! snapshot cache, refresh orchestration, and palette resolution.

pub mod cache;
pub mod catalog;
pub mod image;
pub mod palette;
pub mod refresh;
pub mod registry;
