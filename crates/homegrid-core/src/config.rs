#![forbid(unsafe_code)]

//! Grid configuration.
//!
//! # Defaults
//!
//! | Setting | Default | Range | Description |
//! |---------|---------|-------|-------------|
//! | `max_rows_per_page` | 6 | 3-16 | Rows on every page |
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `HOMEGRID_MAX_ROWS_PER_PAGE` | u16 | 6 | Rows on every page |
//!
//! The lower bound is the tallest footprint an item can have, so a fresh page
//! can always hold any single item. The upper bound keeps one page's
//! occupancy inside a 64-bit mask.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::GRID_COLS;

/// Default number of rows per page.
pub const DEFAULT_MAX_ROWS_PER_PAGE: u16 = 6;

/// Minimum allowed rows per page (tallest item footprint).
pub const MIN_ROWS_PER_PAGE: u16 = 3;

/// Maximum allowed rows per page (`GRID_COLS * rows <= 64`).
pub const MAX_ROWS_PER_PAGE_LIMIT: u16 = 64 / GRID_COLS;

/// Page indices below this are addressable however few entries exist.
pub const MIN_PAGE_LIMIT: usize = 1024;

/// Environment variable overriding [`GridConfig::max_rows_per_page`].
pub const ENV_MAX_ROWS_PER_PAGE: &str = "HOMEGRID_MAX_ROWS_PER_PAGE";

/// Dimensions of the paginated grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Rows on every page.
    pub max_rows_per_page: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_rows_per_page: DEFAULT_MAX_ROWS_PER_PAGE,
        }
    }
}

impl GridConfig {
    /// Strict constructor that rejects out-of-range row counts.
    pub fn new(max_rows_per_page: u16) -> Result<Self, GridConfigError> {
        if !(MIN_ROWS_PER_PAGE..=MAX_ROWS_PER_PAGE_LIMIT).contains(&max_rows_per_page) {
            return Err(GridConfigError::RowsOutOfRange {
                rows: max_rows_per_page,
                min: MIN_ROWS_PER_PAGE,
                max: MAX_ROWS_PER_PAGE_LIMIT,
            });
        }
        Ok(Self { max_rows_per_page })
    }

    /// Set the row count (clamped by [`validated`](Self::validated)).
    #[must_use]
    pub fn with_max_rows_per_page(mut self, rows: u16) -> Self {
        self.max_rows_per_page = rows;
        self
    }

    /// Number of columns on every page.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u16 {
        GRID_COLS
    }

    /// Number of cells on every page.
    #[inline]
    #[must_use]
    pub const fn cells_per_page(&self) -> u32 {
        GRID_COLS as u32 * self.max_rows_per_page as u32
    }

    /// Load config from environment variables.
    ///
    /// Reads `HOMEGRID_MAX_ROWS_PER_PAGE`. Unparseable values are ignored and
    /// parsed values are clamped to the valid range.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var(ENV_MAX_ROWS_PER_PAGE)
            && let Ok(rows) = val.trim().parse::<u16>()
        {
            config.max_rows_per_page = rows;
        }

        config.validated()
    }

    /// Clamp values to safe ranges.
    ///
    /// ```
    /// use homegrid_core::config::GridConfig;
    ///
    /// let config = GridConfig::default().with_max_rows_per_page(1).validated();
    /// assert_eq!(config.max_rows_per_page, 3);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.max_rows_per_page = self
            .max_rows_per_page
            .clamp(MIN_ROWS_PER_PAGE, MAX_ROWS_PER_PAGE_LIMIT);
        self
    }
}

/// Exclusive upper bound on page indices for a grid holding `entries`
/// entries.
///
/// Stored positions at or past the limit are not honored and drops are
/// clamped below it, so every page index a drop can produce survives a
/// fresh placement of the same entries.
///
/// ```
/// use homegrid_core::config::{MIN_PAGE_LIMIT, page_limit};
///
/// assert_eq!(page_limit(3), MIN_PAGE_LIMIT);
/// assert_eq!(page_limit(5000), 5000);
/// ```
#[must_use]
pub const fn page_limit(entries: usize) -> usize {
    if entries > MIN_PAGE_LIMIT {
        entries
    } else {
        MIN_PAGE_LIMIT
    }
}

/// Errors from strict configuration construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridConfigError {
    RowsOutOfRange { rows: u16, min: u16, max: u16 },
}

impl fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowsOutOfRange { rows, min, max } => {
                write!(f, "rows per page must be in {min}..={max} (got {rows})")
            }
        }
    }
}

impl std::error::Error for GridConfigError {}
