//! Splitting a value list into fixed-size pages.

use crate::error::MenuError;
use std::collections::BTreeMap;

/// Number of pages needed for `len` values at `cell_size` per page. Never zero.
pub fn page_count_for(len: usize, cell_size: usize) -> usize {
    len.div_ceil(cell_size.max(1)).max(1)
}

/// A value list plus its derived page map and a current-page pointer.
///
/// Pages are 0-indexed here; menus present them 1-indexed. Mutations of the
/// value list leave the page map stale until [`recalculate`](Self::recalculate).
#[derive(Debug, Clone)]
pub struct MenuPaginator<T> {
    cell_size: usize,
    values: Vec<T>,
    pages: BTreeMap<usize, Vec<T>>,
    current: usize,
}

impl<T: Clone> MenuPaginator<T> {
    /// Paginate `values` at `cell_size` values per page (at least 1).
    pub fn new(cell_size: usize, values: impl IntoIterator<Item = T>) -> Self {
        let cell_size = cell_size.max(1);
        let values: Vec<T> = values.into_iter().collect();
        let pages = Self::fill_pages(cell_size, &values);
        Self {
            cell_size,
            values,
            pages,
            current: 0,
        }
    }

    fn fill_pages(cell_size: usize, values: &[T]) -> BTreeMap<usize, Vec<T>> {
        let mut pages: BTreeMap<usize, Vec<T>> = values
            .chunks(cell_size)
            .enumerate()
            .map(|(index, chunk)| (index, chunk.to_vec()))
            .collect();
        pages.entry(0).or_default();
        pages
    }

    /// Rebuild the page map from the value list and pull the pointer back
    /// onto a page that still has values (or page 0).
    pub fn recalculate(&mut self) {
        self.pages = Self::fill_pages(self.cell_size, &self.values);
        self.settle();
    }

    fn settle(&mut self) {
        while self.current > 0
            && self
                .pages
                .get(&self.current)
                .map_or(true, |page| page.is_empty())
        {
            self.current -= 1;
        }
    }

    /// Values per page.
    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    /// Change values per page and recalculate.
    pub fn set_cell_size(&mut self, cell_size: usize) {
        self.cell_size = cell_size.max(1);
        self.recalculate();
    }

    /// Backing values in order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Replace every value. Pages stay stale until recalculated.
    pub fn set_values(&mut self, values: impl IntoIterator<Item = T>) {
        self.values = values.into_iter().collect();
    }

    /// Append a value. Pages stay stale until recalculated.
    pub fn add_value(&mut self, value: T) {
        self.values.push(value);
    }

    /// Remove the first value equal to `value`. Pages stay stale until recalculated.
    pub fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.values.iter().position(|candidate| candidate == value) {
            Some(index) => {
                self.values.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove the value at `index` in the backing list.
    pub fn remove_index(&mut self, index: usize) -> Option<T> {
        (index < self.values.len()).then(|| self.values.remove(index))
    }

    /// Every page by index.
    pub fn pages(&self) -> &BTreeMap<usize, Vec<T>> {
        &self.pages
    }

    /// Values on page `index`.
    pub fn page(&self, index: usize) -> Option<&[T]> {
        self.pages.get(&index).map(Vec::as_slice)
    }

    /// Number of pages (at least 1).
    pub fn page_count(&self) -> usize {
        self.pages.len().max(1)
    }

    /// Current 0-based page.
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Values on the current page.
    pub fn current_values(&self) -> &[T] {
        self.page(self.current).unwrap_or(&[])
    }

    /// Move the pointer to 0-based `index`.
    pub fn set_current(&mut self, index: usize) -> Result<(), MenuError> {
        if index >= self.page_count() {
            return Err(MenuError::InvalidPage {
                page: index + 1,
                total: self.page_count(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Index into the backing list of the `offset`th value on the current page.
    pub fn value_index(&self, offset: usize) -> Option<usize> {
        (offset < self.current_values().len()).then(|| self.current * self.cell_size + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let paginator = MenuPaginator::new(9, 0..9);
        assert_eq!(paginator.page_count(), 1);
        let paginator = MenuPaginator::new(9, 0..18);
        assert_eq!(paginator.page_count(), 2);
        assert_eq!(paginator.page(1).map(<[_]>::len), Some(9));
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let paginator = MenuPaginator::<u8>::new(9, Vec::new());
        assert_eq!(paginator.page_count(), 1);
        assert_eq!(paginator.page(0), Some(&[][..]));
    }

    #[test]
    fn draining_last_page_settles_pointer() {
        let mut paginator = MenuPaginator::new(2, 0..5);
        paginator.set_current(2).expect("page 3 exists");
        assert!(paginator.remove_value(&4));
        assert_eq!(paginator.page_count(), 3, "stale until recalculated");
        paginator.recalculate();
        assert_eq!(paginator.current_page(), 1);
        assert_eq!(paginator.current_values(), &[2, 3]);
    }

    #[test]
    fn set_current_rejects_missing_pages() {
        let mut paginator = MenuPaginator::new(4, 0..5);
        assert_eq!(
            paginator.set_current(2),
            Err(MenuError::InvalidPage { page: 3, total: 2 })
        );
        assert_eq!(paginator.value_index(0), Some(0));
        paginator.set_current(1).expect("second page");
        assert_eq!(paginator.value_index(0), Some(4));
        assert_eq!(paginator.value_index(1), None);
    }
}
