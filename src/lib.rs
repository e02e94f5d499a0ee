//! Periodic host utilization sampler.
//!
//! Reads cumulative CPU and memory counters from `/proc`, derives
//! delta-based percentages each tick and hands them to a renderer.

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod logging;
pub mod shutdown;
pub mod system;
pub mod ui;
