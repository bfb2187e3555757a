#![forbid(unsafe_code)]

//! Interactive drag lifecycle over a committed arrangement.
//!
//! ```text
//! Idle -> Dragging -> Idle
//!           |  \-- Drop:   relocate once, commit, emit moves
//!           \----- Cancel: discard preview, arrangement untouched
//! ```
//!
//! Hover events compute a preview relocation that is never committed; a
//! repeated hover over the same (clamped) target is a no-op. Every applied
//! event yields a [`DragTransition`] with a monotonically increasing id.

use std::fmt;

use homegrid_core::{GridConfig, Layout, PagePosition, debug};
use serde::{Deserialize, Serialize};

use crate::arrangement::Arrangement;
use crate::item::SlotKey;
use crate::relocate::{Move, RelocateError, RelocationOutcome, clamp_target, relocate};

/// Drag lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Dragging {
        source: SlotKey,
        /// Layout of the dragged entry when the drag began.
        origin: Layout,
        /// Last previewed target, already clamped.
        hover: Option<PagePosition>,
    },
}

/// Input to [`DragSession::apply_event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DragEvent {
    Begin { key: SlotKey },
    Hover { target: PagePosition },
    Drop { target: PagePosition },
    Cancel,
}

/// Why an event was accepted without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    DragAlreadyInProgress,
    SameHoverTarget,
}

/// What one transition did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Started {
        key: SlotKey,
        origin: Layout,
    },
    Previewed {
        target: PagePosition,
        /// Entries other than the dragged one that the preview moved.
        displaced: usize,
    },
    Dropped {
        target: PagePosition,
        moves: Vec<Move>,
    },
    Cancelled {
        key: SlotKey,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

/// Errors from [`DragSession::apply_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSessionError {
    /// `Begin` named an entry that is not in the arrangement.
    UnknownItem { key: SlotKey },
    Relocate(RelocateError),
}

impl fmt::Display for DragSessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem { key } => write!(f, "cannot drag {key}: not in the arrangement"),
            Self::Relocate(error) => write!(f, "relocation failed: {error}"),
        }
    }
}

impl std::error::Error for DragSessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Relocate(error) = self {
            return Some(error);
        }
        None
    }
}

impl From<RelocateError> for DragSessionError {
    fn from(error: RelocateError) -> Self {
        Self::Relocate(error)
    }
}

/// Committed arrangement plus the in-flight drag, if any.
#[derive(Debug, Clone)]
pub struct DragSession {
    config: GridConfig,
    arrangement: Arrangement,
    preview: Option<RelocationOutcome>,
    state: DragState,
    transition_counter: u64,
}

impl DragSession {
    #[must_use]
    pub fn new(arrangement: Arrangement, config: GridConfig) -> Self {
        Self {
            config: config.validated(),
            arrangement,
            preview: None,
            state: DragState::Idle,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Last committed arrangement.
    #[must_use]
    pub const fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Preview for the current hover target, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&RelocationOutcome> {
        self.preview.as_ref()
    }

    /// What a renderer should show: the preview while hovering, otherwise
    /// the committed arrangement.
    #[must_use]
    pub fn displayed(&self) -> &Arrangement {
        self.preview
            .as_ref()
            .map_or(&self.arrangement, |preview| &preview.arrangement)
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Page count of the displayed arrangement.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.displayed().page_count()
    }

    /// Swap in a freshly placed arrangement, cancelling any drag in flight.
    pub fn replace_arrangement(&mut self, arrangement: Arrangement) -> Option<DragTransition> {
        let cancelled = self.force_cancel();
        self.arrangement = arrangement;
        cancelled
    }

    /// Drop back to Idle without committing, returning the transition if a
    /// drag was active.
    pub fn force_cancel(&mut self) -> Option<DragTransition> {
        let DragState::Dragging { source, .. } = &self.state else {
            return None;
        };
        let effect = DragEffect::Cancelled {
            key: source.clone(),
        };
        Some(self.finish(DragState::Idle, effect))
    }

    /// Apply one lifecycle event.
    pub fn apply_event(&mut self, event: &DragEvent) -> Result<DragTransition, DragSessionError> {
        let effect = match (&self.state, event) {
            (DragState::Idle, DragEvent::Begin { key }) => {
                let origin =
                    self.arrangement
                        .layout_of(key)
                        .ok_or_else(|| DragSessionError::UnknownItem {
                            key: key.clone(),
                        })?;
                let to = DragState::Dragging {
                    source: key.clone(),
                    origin,
                    hover: None,
                };
                let effect = DragEffect::Started {
                    key: key.clone(),
                    origin,
                };
                return Ok(self.finish(to, effect));
            }
            (DragState::Idle, _) => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            (DragState::Dragging { .. }, DragEvent::Begin { .. }) => DragEffect::Noop {
                reason: DragNoopReason::DragAlreadyInProgress,
            },
            (
                DragState::Dragging {
                    source,
                    origin,
                    hover,
                },
                DragEvent::Hover { target },
            ) => {
                let clamped =
                    clamp_target(&self.arrangement, *target, origin.footprint(), &self.config);
                if *hover == Some(clamped) {
                    DragEffect::Noop {
                        reason: DragNoopReason::SameHoverTarget,
                    }
                } else {
                    let source = source.clone();
                    let origin = *origin;
                    let preview = relocate(&self.arrangement, &source, clamped, &self.config)?;
                    let displaced = preview.displaced(&source);
                    self.preview = Some(preview);
                    let to = DragState::Dragging {
                        source,
                        origin,
                        hover: Some(clamped),
                    };
                    return Ok(self.finish(to, DragEffect::Previewed {
                        target: clamped,
                        displaced,
                    }));
                }
            }
            (DragState::Dragging { source, .. }, DragEvent::Drop { target }) => {
                let outcome = relocate(&self.arrangement, source, *target, &self.config)?;
                debug!(
                    key = %source,
                    moves = outcome.moves.len(),
                    pages = outcome.arrangement.page_count(),
                    "drop committed"
                );
                let effect = DragEffect::Dropped {
                    target: outcome.target,
                    moves: outcome.moves,
                };
                self.arrangement = outcome.arrangement;
                return Ok(self.finish(DragState::Idle, effect));
            }
            (DragState::Dragging { source, .. }, DragEvent::Cancel) => {
                let effect = DragEffect::Cancelled {
                    key: source.clone(),
                };
                return Ok(self.finish(DragState::Idle, effect));
            }
        };

        // Noop: state unchanged.
        let to = self.state.clone();
        Ok(self.finish(to, effect))
    }

    fn finish(&mut self, to: DragState, effect: DragEffect) -> DragTransition {
        if matches!(to, DragState::Idle) {
            self.preview = None;
        }
        let from = std::mem::replace(&mut self.state, to.clone());
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effect,
        }
    }
}
