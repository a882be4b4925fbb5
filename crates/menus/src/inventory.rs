//! The content grid behind a menu.

use crate::error::MenuError;
use crate::host::InventorySnapshot;
use crate::position::{InventoryPosition, COLUMNS, MAX_ROWS};
use std::collections::{BTreeMap, BTreeSet};
use yggdrasil_core::ItemStack;

/// Who reserved a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClaimKind {
    /// A registered menu button (including info/close/return).
    Button,
    /// A cell drawn by a paginated, page, or list layout.
    Layout,
}

/// A `rows x 9` grid of display slots.
///
/// Cells reserved by buttons are protected from [`set`](Self::set) and the
/// bulk operations; [`force_set`](Self::force_set) ignores reservations.
/// Coordinates outside the grid are silently dropped. Every changed cell is
/// remembered until the owner collects it with [`take_dirty`](Self::take_dirty).
#[derive(Debug, Clone)]
pub struct MenuInventory {
    title: String,
    rows: usize,
    cells: Vec<Option<ItemStack>>,
    claims: BTreeMap<InventoryPosition, ClaimKind>,
    dirty: BTreeSet<usize>,
    retitled: bool,
}

impl MenuInventory {
    /// Empty grid with `rows` rows.
    pub fn new(rows: usize, title: impl Into<String>) -> Result<Self, MenuError> {
        if !(1..=MAX_ROWS).contains(&rows) {
            return Err(MenuError::InvalidRows(rows));
        }
        let size = rows * COLUMNS;
        Ok(Self {
            title: title.into(),
            rows,
            cells: vec![None; size],
            claims: BTreeMap::new(),
            dirty: (0..size).collect(),
            retitled: false,
        })
    }

    /// Empty grid with `size` slots; `size` must be a multiple of 9 in 9..=54.
    pub fn with_size(size: usize, title: impl Into<String>) -> Result<Self, MenuError> {
        if size == 0 || size % COLUMNS != 0 || size > MAX_ROWS * COLUMNS {
            return Err(MenuError::InvalidSize(size));
        }
        Self::new(size / COLUMNS, title)
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the window title. Hosts see it on the next flush.
    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title != self.title {
            self.title = title;
            self.retitled = true;
        }
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Slot count.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Whether `position` lies inside this grid.
    pub fn contains(&self, position: InventoryPosition) -> bool {
        position.row() < self.rows
    }

    /// Item at `position`.
    pub fn get(&self, position: InventoryPosition) -> Option<&ItemStack> {
        self.slot(position.effective_slot())
    }

    /// Item at a flat slot index.
    pub fn slot(&self, slot: usize) -> Option<&ItemStack> {
        self.cells.get(slot).and_then(Option::as_ref)
    }

    /// Whether the cell shows an item.
    pub fn is_slot_taken(&self, position: InventoryPosition) -> bool {
        self.get(position).is_some()
    }

    /// Whether a visible button reserved the cell.
    pub fn is_slot_taken_by_button(&self, position: InventoryPosition) -> bool {
        self.claims.contains_key(&position)
    }

    /// Write unless the cell is reserved. Returns whether the write happened.
    pub fn set(&mut self, position: InventoryPosition, item: impl Into<ItemStack>) -> bool {
        if self.is_slot_taken_by_button(position) {
            return false;
        }
        self.write(position, Some(item.into()))
    }

    /// [`set`](Self::set) with raw coordinates; out-of-grid writes are dropped.
    pub fn set_at(&mut self, row: usize, column: usize, item: impl Into<ItemStack>) -> bool {
        match self.position_at(row, column) {
            Some(position) => self.set(position, item),
            None => false,
        }
    }

    /// Write regardless of reservations.
    pub fn force_set(&mut self, position: InventoryPosition, item: impl Into<ItemStack>) -> bool {
        self.write(position, Some(item.into()))
    }

    /// [`force_set`](Self::force_set) with raw coordinates.
    pub fn force_set_at(&mut self, row: usize, column: usize, item: impl Into<ItemStack>) -> bool {
        match self.position_at(row, column) {
            Some(position) => self.force_set(position, item),
            None => false,
        }
    }

    /// Empty a cell regardless of reservations.
    pub fn clear_slot(&mut self, position: InventoryPosition) -> bool {
        self.write(position, None)
    }

    /// Empty every cell regardless of reservations.
    pub fn clear(&mut self) {
        for slot in 0..self.cells.len() {
            self.write(InventoryPosition::from_any_slot(slot), None);
        }
    }

    /// Set every unreserved cell.
    pub fn fill(&mut self, item: impl Into<ItemStack>) {
        let item = item.into();
        for slot in 0..self.cells.len() {
            self.set(InventoryPosition::from_any_slot(slot), item.clone());
        }
    }

    /// Set every unreserved cell of `row`.
    pub fn set_row(&mut self, row: usize, item: impl Into<ItemStack>) {
        let item = item.into();
        for column in 0..COLUMNS {
            self.set_at(row, column, item.clone());
        }
    }

    /// Set every unreserved cell of `column`.
    pub fn set_column(&mut self, column: usize, item: impl Into<ItemStack>) {
        let item = item.into();
        for row in 0..self.rows {
            self.set_at(row, column, item.clone());
        }
    }

    /// Set the outer ring of unreserved cells.
    pub fn set_border(&mut self, item: impl Into<ItemStack>) {
        let last = self.rows.saturating_sub(1);
        self.set_rectangle(0, 0, last, COLUMNS - 1, item);
    }

    /// Set the outline of the rectangle spanning both corners (inclusive).
    ///
    /// Corners may be given in any order. Cells beyond the grid are skipped.
    pub fn set_rectangle(
        &mut self,
        from_row: usize,
        from_column: usize,
        to_row: usize,
        to_column: usize,
        item: impl Into<ItemStack>,
    ) {
        let item = item.into();
        let (top, bottom) = (from_row.min(to_row), from_row.max(to_row));
        let (left, right) = (from_column.min(to_column), from_column.max(to_column));
        for row in top..=bottom {
            for column in left..=right {
                let edge = row == top || row == bottom || column == left || column == right;
                if edge {
                    self.set_at(row, column, item.clone());
                }
            }
        }
    }

    /// Put `item` into the first empty, unreserved cell.
    pub fn add_item(&mut self, item: impl Into<ItemStack>) -> Option<InventoryPosition> {
        let position = (0..self.cells.len())
            .map(InventoryPosition::from_any_slot)
            .find(|pos| !self.is_slot_taken(*pos) && !self.is_slot_taken_by_button(*pos))?;
        self.write(position, Some(item.into()));
        Some(position)
    }

    /// Reserve a cell.
    pub fn claim(&mut self, position: InventoryPosition, kind: ClaimKind) {
        if !self.contains(position) {
            return;
        }
        // Button claims outrank layout claims.
        let entry = self.claims.entry(position).or_insert(kind);
        *entry = (*entry).min(kind);
    }

    /// Drop a layout reservation; button reservations stay.
    pub fn release_layout(&mut self, position: InventoryPosition) -> bool {
        if self.claims.get(&position) == Some(&ClaimKind::Layout) {
            self.claims.remove(&position);
            true
        } else {
            false
        }
    }

    /// Reservation on a cell, if any.
    pub fn claim_of(&self, position: InventoryPosition) -> Option<ClaimKind> {
        self.claims.get(&position).copied()
    }

    /// Drop every reservation.
    pub fn release_all(&mut self) {
        self.claims.clear();
    }

    /// Full copy of the grid.
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            title: self.title.clone(),
            rows: self.rows,
            slots: self.cells.clone(),
        }
    }

    /// Slots changed since the last call, in slot order.
    pub fn take_dirty(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    /// Whether the title changed since the last call.
    pub fn take_retitled(&mut self) -> bool {
        std::mem::take(&mut self.retitled)
    }

    /// Forget pending changes (after a full snapshot went out).
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
        self.retitled = false;
    }

    /// Take over a rebuilt grid, recording only the cells that differ.
    ///
    /// A grid with a different row count cannot be patched in place, so it is
    /// marked retitled to force a full reopen.
    pub(crate) fn absorb(&mut self, next: MenuInventory) {
        if next.rows != self.rows {
            *self = next;
            self.retitled = true;
            return;
        }
        self.set_title(next.title);
        self.claims = next.claims;
        for (slot, item) in next.cells.into_iter().enumerate() {
            if self.cells[slot] != item {
                self.cells[slot] = item;
                self.dirty.insert(slot);
            }
        }
    }

    fn position_at(&self, row: usize, column: usize) -> Option<InventoryPosition> {
        if row < self.rows && column < COLUMNS {
            Some(InventoryPosition::of(row, column))
        } else {
            None
        }
    }

    fn write(&mut self, position: InventoryPosition, item: Option<ItemStack>) -> bool {
        if !self.contains(position) {
            return false;
        }
        let item = item.filter(|item| !item.is_air());
        let slot = position.effective_slot();
        if self.cells[slot] != item {
            self.cells[slot] = item;
            self.dirty.insert(slot);
        }
        true
    }
}
