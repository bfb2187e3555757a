#![forbid(unsafe_code)]

//! Core: cell addressing, per-page occupancy, and grid configuration.
//!
//! # Role in homegrid
//! `homegrid-core` is the bookkeeping layer. It knows nothing about items,
//! size classes, or drag interactions; it only answers "is this rectangle
//! free on that page" and records claims.
//!
//! # Primary responsibilities
//! - **geometry**: [`Cell`], [`Region`], [`Footprint`], [`PagePosition`], [`Layout`].
//! - **occupancy**: [`Occupancy`], a lazily grown arena of per-page bitsets.
//! - **config**: [`GridConfig`] with environment overrides and clamping.
//! - **logging**: `tracing` macros that compile to nothing without the feature.
//!
//! # How it fits in the system
//! `homegrid-layout` builds the auto-layout placer and the drag relocation
//! engine on top of [`Occupancy`]; both rebuild occupancy from scratch on
//! every call.

pub mod config;
pub mod geometry;
pub mod logging;
pub mod occupancy;

pub use config::{GridConfig, GridConfigError, MIN_PAGE_LIMIT, page_limit};
pub use geometry::{Cell, Footprint, GRID_COLS, Layout, PagePosition, Region};
pub use occupancy::{Occupancy, PageMask};

// Re-export logging macros at crate root for ergonomic use.
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
