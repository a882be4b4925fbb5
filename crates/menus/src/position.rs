//! Grid coordinates for chest-style inventories.

use crate::error::MenuError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Columns in every row.
pub const COLUMNS: usize = 9;
/// Largest supported row count.
pub const MAX_ROWS: usize = 6;
/// Largest supported inventory size.
pub const MAX_SIZE: usize = COLUMNS * MAX_ROWS;

/// An immutable `(row, column)` cell in a menu grid.
///
/// Ordering is row-major, so sorted positions follow slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InventoryPosition {
    row: usize,
    column: usize,
}

const fn p(row: usize, column: usize) -> InventoryPosition {
    InventoryPosition::of(row, column)
}

impl InventoryPosition {
    /// The interior of a full chest, row by row, one cell away from every edge.
    #[rustfmt::skip]
    pub const MIDDLE_POSITIONS: [InventoryPosition; 28] = [
        p(1, 1), p(1, 2), p(1, 3), p(1, 4), p(1, 5), p(1, 6), p(1, 7),
        p(2, 1), p(2, 2), p(2, 3), p(2, 4), p(2, 5), p(2, 6), p(2, 7),
        p(3, 1), p(3, 2), p(3, 3), p(3, 4), p(3, 5), p(3, 6), p(3, 7),
        p(4, 1), p(4, 2), p(4, 3), p(4, 4), p(4, 5), p(4, 6), p(4, 7),
    ];

    /// The left column followed by the right column of a full chest.
    #[rustfmt::skip]
    pub const SIDE_POSITIONS: [InventoryPosition; 12] = [
        p(0, 0), p(1, 0), p(2, 0), p(3, 0), p(4, 0), p(5, 0),
        p(0, 8), p(1, 8), p(2, 8), p(3, 8), p(4, 8), p(5, 8),
    ];

    /// Construct a position.
    ///
    /// # Panics
    ///
    /// Panics if `row >= 6` or `column >= 9`. Use [`InventoryPosition::try_of`]
    /// for untrusted input.
    pub const fn of(row: usize, column: usize) -> Self {
        assert!(row < MAX_ROWS, "row must be within 0..=5");
        assert!(column < COLUMNS, "column must be within 0..=8");
        Self { row, column }
    }

    /// Construct a position, rejecting out-of-grid coordinates.
    pub fn try_of(row: usize, column: usize) -> Result<Self, MenuError> {
        if row < MAX_ROWS && column < COLUMNS {
            Ok(Self { row, column })
        } else {
            Err(MenuError::PositionOutOfBounds { row, column })
        }
    }

    /// Position of a slot in a chest of up to six rows.
    pub fn from_slot(slot: usize) -> Option<Self> {
        (slot < MAX_SIZE).then(|| Self::from_any_slot(slot))
    }

    /// Position of any slot index, without a row bound.
    ///
    /// Raw slots past the chest (the viewer's own inventory in a combined view)
    /// map to rows beyond 5.
    pub const fn from_any_slot(slot: usize) -> Self {
        Self {
            row: slot / COLUMNS,
            column: slot % COLUMNS,
        }
    }

    /// Every cell of `row`, left to right.
    pub fn row_of(row: usize) -> Vec<Self> {
        (0..COLUMNS).map(|column| Self::of(row, column)).collect()
    }

    /// Every cell of `column`, top to bottom, across the full six rows.
    pub fn column_of(column: usize) -> Vec<Self> {
        (0..MAX_ROWS).map(|row| Self::of(row, column)).collect()
    }

    /// Row index.
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Column index.
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Flat slot index, `row * 9 + column`.
    pub const fn effective_slot(&self) -> usize {
        self.row * COLUMNS + self.column
    }
}

impl fmt::Display for InventoryPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) slot {}",
            self.row,
            self.column,
            self.effective_slot()
        )
    }
}

/// Common chest sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventorySize(usize);

impl InventorySize {
    /// Double chest, six rows.
    pub const FULL: Self = Self(54);
    /// Single chest, three rows.
    pub const HALF: Self = Self(27);

    /// Size for `rows` rows.
    pub fn of(rows: usize) -> Result<Self, MenuError> {
        if (1..=MAX_ROWS).contains(&rows) {
            Ok(Self(rows * COLUMNS))
        } else {
            Err(MenuError::InvalidRows(rows))
        }
    }

    /// Slot count.
    pub const fn slots(self) -> usize {
        self.0
    }

    /// Row count.
    pub const fn rows(self) -> usize {
        self.0 / COLUMNS
    }
}

impl From<InventorySize> for usize {
    fn from(size: InventorySize) -> Self {
        size.0
    }
}
