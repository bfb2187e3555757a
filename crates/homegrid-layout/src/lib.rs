#![forbid(unsafe_code)]

//! Paginated home-screen placement and drag reflow.
//!
//! # Role in homegrid
//! `homegrid-layout` turns an ordered list of page-builder items into a
//! deterministic multi-page arrangement on a 4-column grid, and evolves that
//! arrangement when the user drags an entry somewhere else.
//!
//! # Pipeline
//! 1. [`expand_items`]: drop hidden and docked items, resolve footprints
//!    ([`resolve`]), and expand social-icon groups into virtual 1x1 entries.
//! 2. [`PlacementRequest::place`]: honor valid stored positions, fall back
//!    for stale ones, auto-place the rest in reading order.
//! 3. [`relocate`]: move one entry exactly to a drop target and push
//!    colliding entries forward, returning the minimal patch set.
//! 4. [`DragSession`] and [`PageNavigator`]: the interactive drag lifecycle
//!    and edge-hover page flipping built on top.
//!
//! # Example
//!
//! ```
//! use homegrid_layout::{DragEvent, DragSession, GridConfig, GridItem, PagePosition, PlacementRequest, SlotKey};
//!
//! let items: Vec<GridItem> = ["a", "b", "c"].into_iter().map(GridItem::link).collect();
//! let config = GridConfig::default();
//! let placement = PlacementRequest::new(&items).place(&config);
//!
//! let mut session = DragSession::new(placement.arrangement, config);
//! session.apply_event(&DragEvent::Begin { key: SlotKey::item("a") }).unwrap();
//! session
//!     .apply_event(&DragEvent::Drop { target: PagePosition::new(0, 0, 1) })
//!     .unwrap();
//!
//! let b = session.arrangement().layout_of(&SlotKey::item("b")).unwrap();
//! assert_eq!((b.row, b.col), (0, 2));
//! ```

pub mod arrangement;
pub mod expand;
pub mod item;
pub mod navigator;
pub mod placer;
pub mod relocate;
pub mod session;
pub mod size_class;

pub use arrangement::{
    Arrangement, ArrangementIssue, ArrangementIssueCode, ArrangementReport, PlacedItem,
};
pub use expand::{PlacementCandidate, expand_items};
pub use item::{
    ContentAttributes, GridItem, ItemId, ItemKind, SlotKey, SocialIconGroup, SocialIconId,
    apply_layouts,
};
pub use navigator::{EdgeZone, NavigatorConfig, PageFlip, PageNavigator};
pub use placer::{Placement, PlacementFallback, PlacementRequest, place_candidates};
pub use relocate::{Move, RelocateError, RelocationOutcome, clamp_target, relocate};
pub use session::{
    DragEffect, DragEvent, DragNoopReason, DragSession, DragSessionError, DragState,
    DragTransition,
};
pub use size_class::{LayoutVariant, SizeClass, resolve};

pub use homegrid_core::{
    Cell, Footprint, GRID_COLS, GridConfig, GridConfigError, Layout, PagePosition, Region,
};
