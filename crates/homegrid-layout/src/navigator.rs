#![forbid(unsafe_code)]

//! Visible-page tracking and edge-hover page flipping during a drag.
//!
//! While a drag is in progress, holding the pointer within
//! [`NavigatorConfig::edge_margin`] of the left or right viewport edge for
//! [`NavigatorConfig::flip_delay`] moves the visible page by one. The hover
//! timer restarts after every flip, so holding the pointer at the edge keeps
//! flipping once per delay.
//!
//! The reachable range is `0..=page_count`: one page past the last populated
//! page is reachable so an item can be dropped onto a page that only comes
//! into existence on drop.
//!
//! # Timing Defaults
//!
//! | Setting | Default | Range |
//! |---------|---------|-------|
//! | `edge_margin` | 40px | 8-200px |
//! | `flip_delay` | 600ms | 150-2000ms |
//!
//! # Environment Variables
//!
//! | Variable | Type | Default |
//! |----------|------|---------|
//! | `HOMEGRID_EDGE_MARGIN_PX` | f32 | 40 |
//! | `HOMEGRID_PAGE_FLIP_DELAY_MS` | u64 | 600 |

use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use homegrid_core::trace;

/// Default width of each edge zone.
pub const DEFAULT_EDGE_MARGIN_PX: f32 = 40.0;

/// Minimum allowed edge zone width.
pub const MIN_EDGE_MARGIN_PX: f32 = 8.0;

/// Maximum allowed edge zone width.
pub const MAX_EDGE_MARGIN_PX: f32 = 200.0;

/// Default hover time before a page flip.
pub const DEFAULT_PAGE_FLIP_DELAY_MS: u64 = 600;

/// Minimum allowed flip delay.
pub const MIN_PAGE_FLIP_DELAY_MS: u64 = 150;

/// Maximum allowed flip delay.
pub const MAX_PAGE_FLIP_DELAY_MS: u64 = 2000;

/// Environment override for the edge margin.
pub const ENV_EDGE_MARGIN_PX: &str = "HOMEGRID_EDGE_MARGIN_PX";

/// Environment override for the flip delay.
pub const ENV_PAGE_FLIP_DELAY_MS: &str = "HOMEGRID_PAGE_FLIP_DELAY_MS";

/// Edge-hover tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorConfig {
    /// Width in pixels of each edge zone.
    pub edge_margin: f32,
    /// Continuous hover time required before a flip.
    pub flip_delay: Duration,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            edge_margin: DEFAULT_EDGE_MARGIN_PX,
            flip_delay: Duration::from_millis(DEFAULT_PAGE_FLIP_DELAY_MS),
        }
    }
}

impl NavigatorConfig {
    #[must_use]
    pub fn with_edge_margin(mut self, px: f32) -> Self {
        self.edge_margin = px;
        self
    }

    #[must_use]
    pub fn with_flip_delay(mut self, delay: Duration) -> Self {
        self.flip_delay = delay;
        self
    }

    /// Load config from environment variables.
    ///
    /// Unparseable values are ignored; parsed values are clamped.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var(ENV_EDGE_MARGIN_PX)
            && let Ok(px) = val.trim().parse::<f32>()
        {
            config.edge_margin = px;
        }

        if let Ok(val) = std::env::var(ENV_PAGE_FLIP_DELAY_MS)
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.flip_delay = Duration::from_millis(ms);
        }

        config.validated()
    }

    /// Clamp values to safe ranges. A non-finite margin falls back to the
    /// default.
    ///
    /// ```
    /// use homegrid_layout::navigator::NavigatorConfig;
    /// use web_time::Duration;
    ///
    /// let config = NavigatorConfig::default()
    ///     .with_flip_delay(Duration::from_millis(10))
    ///     .validated();
    /// assert_eq!(config.flip_delay.as_millis(), 150);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.edge_margin = if self.edge_margin.is_finite() {
            self.edge_margin.clamp(MIN_EDGE_MARGIN_PX, MAX_EDGE_MARGIN_PX)
        } else {
            DEFAULT_EDGE_MARGIN_PX
        };
        let delay_ms = u64::try_from(self.flip_delay.as_millis()).unwrap_or(u64::MAX);
        self.flip_delay = Duration::from_millis(
            delay_ms.clamp(MIN_PAGE_FLIP_DELAY_MS, MAX_PAGE_FLIP_DELAY_MS),
        );
        self
    }
}

/// Which viewport edge the pointer is parked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeZone {
    Left,
    Right,
}

/// A visible-page change emitted by the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFlip {
    pub from: usize,
    pub to: usize,
    pub zone: EdgeZone,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HoverState {
    Outside,
    Armed { zone: EdgeZone, since: Instant },
}

/// Visible page index plus the edge-hover debounce.
#[derive(Debug, Clone)]
pub struct PageNavigator {
    config: NavigatorConfig,
    current: usize,
    hover: HoverState,
}

impl Default for PageNavigator {
    fn default() -> Self {
        Self::new(NavigatorConfig::default())
    }
}

impl PageNavigator {
    #[must_use]
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config: config.validated(),
            current: 0,
            hover: HoverState::Outside,
        }
    }

    #[must_use]
    pub const fn config(&self) -> NavigatorConfig {
        self.config
    }

    /// Currently visible page.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current
    }

    /// Jump to `page`, clamped to `0..=page_count`. Returns the page shown.
    pub fn set_current_page(&mut self, page: usize, page_count: usize) -> usize {
        self.current = page.min(page_count);
        self.current
    }

    /// Re-clamp after the arrangement changed size.
    pub fn clamp_to(&mut self, page_count: usize) {
        self.current = self.current.min(page_count);
    }

    /// Whether the pointer is parked in an edge zone.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self.hover, HoverState::Armed { .. })
    }

    /// Which edge zone, if any, `x` falls in.
    ///
    /// The left zone wins when the viewport is narrow enough for the zones to
    /// overlap.
    #[must_use]
    pub fn edge_zone(&self, x: f32, viewport_width: f32) -> Option<EdgeZone> {
        if !x.is_finite() || !viewport_width.is_finite() || viewport_width <= 0.0 {
            return None;
        }
        if x < self.config.edge_margin {
            Some(EdgeZone::Left)
        } else if x > viewport_width - self.config.edge_margin {
            Some(EdgeZone::Right)
        } else {
            None
        }
    }

    /// Feed a pointer position during a drag.
    ///
    /// Entering an edge zone arms the timer; staying in the same zone past
    /// the flip delay flips one page. Moving to the other zone restarts the
    /// timer and leaving both disarms.
    pub fn pointer_moved(
        &mut self,
        x: f32,
        viewport_width: f32,
        page_count: usize,
        now: Instant,
    ) -> Option<PageFlip> {
        match (self.edge_zone(x, viewport_width), self.hover) {
            (None, _) => {
                self.hover = HoverState::Outside;
                None
            }
            (Some(zone), HoverState::Armed { zone: armed, .. }) if zone == armed => {
                self.tick(page_count, now)
            }
            (Some(zone), _) => {
                self.hover = HoverState::Armed { zone, since: now };
                None
            }
        }
    }

    /// Advance the hover timer without pointer movement.
    ///
    /// A held pointer produces no move events, so callers poll this on a
    /// frame or timer tick.
    pub fn tick(&mut self, page_count: usize, now: Instant) -> Option<PageFlip> {
        let HoverState::Armed { zone, since } = self.hover else {
            return None;
        };
        if now.saturating_duration_since(since) < self.config.flip_delay {
            return None;
        }

        let from = self.current;
        let to = match zone {
            EdgeZone::Left => from.checked_sub(1),
            EdgeZone::Right => (from < page_count).then_some(from + 1),
        }?;

        self.current = to;
        self.hover = HoverState::Armed { zone, since: now };
        trace!(from, to, "page flip");
        Some(PageFlip { from, to, zone })
    }

    /// Disarm the edge timer; the visible page is kept.
    pub fn drag_ended(&mut self) {
        self.hover = HoverState::Outside;
    }
}
