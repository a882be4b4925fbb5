//! Weighted random selection.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fmt;

/// A bag of values drawn with probability proportional to their weight.
///
/// Entries keep insertion order. Draws walk a cumulative weight table, so a
/// draw costs `O(log n)`.
pub struct WeightedRandomBag<E> {
    entries: Vec<(f64, E)>,
    cumulative: Vec<f64>,
    total: f64,
    rng: StdRng,
}

impl<E> WeightedRandomBag<E> {
    /// Empty bag seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Empty bag with a fixed seed (reproducible draws).
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Empty bag drawing from `rng`.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            entries: Vec::new(),
            cumulative: Vec::new(),
            total: 0.0,
            rng,
        }
    }

    /// Add `value` with `weight`. Non-positive (and NaN) weights are ignored.
    pub fn add(&mut self, weight: f64, value: E) -> &mut Self {
        if !(weight > 0.0) {
            return self;
        }
        self.total += weight;
        self.cumulative.push(self.total);
        self.entries.push((weight, value));
        self
    }

    /// Add every `(value, weight)` pair.
    pub fn extend_weighted<I>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (E, f64)>,
    {
        for (value, weight) in pairs {
            self.add(weight, value);
        }
        self
    }

    /// Draw a value, or `None` when the bag is empty.
    pub fn pick(&mut self) -> Option<&E> {
        if self.entries.is_empty() {
            return None;
        }
        let roll = self.rng.gen::<f64>() * self.total;
        let index = self
            .cumulative
            .partition_point(|bound| *bound <= roll)
            .min(self.entries.len() - 1);
        self.entries.get(index).map(|(_, value)| value)
    }

    /// Draw among the entries accepted by `filter`, weighted among themselves.
    pub fn pick_matching<F>(&mut self, mut filter: F) -> Option<&E>
    where
        F: FnMut(f64, &E) -> bool,
    {
        let candidates: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (weight, value))| filter(*weight, value))
            .map(|(index, _)| index)
            .collect();
        let total: f64 = candidates.iter().map(|&index| self.entries[index].0).sum();
        if candidates.is_empty() || total <= 0.0 {
            return None;
        }

        let mut roll = self.rng.gen::<f64>() * total;
        for &index in &candidates {
            let weight = self.entries[index].0;
            if roll < weight {
                return Some(&self.entries[index].1);
            }
            roll -= weight;
        }
        // Floating point drift can leave a sliver past the last bound.
        candidates.last().map(|&index| &self.entries[index].1)
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Whether nothing has been added (or every add was ignored).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `(weight, value)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (f64, &E)> {
        self.entries.iter().map(|(weight, value)| (*weight, value))
    }

    /// Values grouped by identical weight, in order of first appearance.
    pub fn grouped_by_weight(&self) -> Vec<(f64, Vec<&E>)> {
        let mut groups: Vec<(f64, Vec<&E>)> = Vec::new();
        for (weight, value) in &self.entries {
            match groups.iter_mut().find(|(w, _)| w == weight) {
                Some((_, values)) => values.push(value),
                None => groups.push((*weight, vec![value])),
            }
        }
        groups
    }

    /// Chance of drawing the entry at `index`, in `0.0..=1.0`.
    pub fn chance_of(&self, index: usize) -> Option<f64> {
        self.entries
            .get(index)
            .map(|(weight, _)| weight / self.total)
    }
}

impl<E: PartialEq> WeightedRandomBag<E> {
    /// Whether `value` was added.
    pub fn contains(&self, value: &E) -> bool {
        self.entries.iter().any(|(_, v)| v == value)
    }
}

impl<E: fmt::Display> WeightedRandomBag<E> {
    /// `value:weight` pairs joined by commas, grouped by weight.
    pub fn to_raw_odds(&self) -> String {
        self.grouped_by_weight()
            .into_iter()
            .flat_map(|(weight, values)| {
                values
                    .into_iter()
                    .map(move |value| format!("{value}:{weight}"))
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<E> Default for WeightedRandomBag<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug> fmt::Debug for WeightedRandomBag<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedRandomBag")
            .field("entries", &self.entries)
            .field("total", &self.total)
            .finish()
    }
}
