use super::{checked_total, StrategyKind, Weighted};
use crate::error::Result;

/// Binary-tree strategy.
///
/// The tree is stored implicitly in a vector, 1-based: node `i` has children
/// `2i` and `2i + 1`, and the leaves start at `leaves` (a power of two). Each
/// leaf holds one slot weight, each internal node the sum of its subtree, so
/// the root holds the live total.
///
/// Lookups descend from the root comparing against the left subtree sum;
/// removals update the path from one or two leaves to the root. Both are
/// O(log n), which makes this the strategy of choice for large populations.
#[derive(Debug, Clone, Default)]
pub struct WeightedHeap {
    initial: Vec<u64>,
    tree: Vec<u64>,
    leaves: usize,
    len: usize,
}

impl WeightedHeap {
    /// An empty tree; call `initialize` before sampling.
    pub fn new() -> Self {
        Self::default()
    }

    fn leaf(&self, slot: usize) -> u64 {
        self.tree[self.leaves + slot]
    }

    /// Overwrite one leaf and refresh its ancestors.
    fn set_leaf(&mut self, slot: usize, weight: u64) {
        let mut node = self.leaves + slot;
        self.tree[node] = weight;
        node /= 2;
        while node > 0 {
            self.tree[node] = self.tree[2 * node] + self.tree[2 * node + 1];
            node /= 2;
        }
    }

    fn build(&mut self) {
        self.tree.clear();
        self.tree.resize(2 * self.leaves, 0);
        self.tree[self.leaves..self.leaves + self.initial.len()].copy_from_slice(&self.initial);
        for node in (1..self.leaves).rev() {
            self.tree[node] = self.tree[2 * node] + self.tree[2 * node + 1];
        }
        self.len = self.initial.len();
    }
}

impl Weighted for WeightedHeap {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Heap
    }

    fn initialize(&mut self, weights: &[u64]) -> Result<()> {
        // Subtree sums are bounded by the total, so the build cannot overflow
        // once this succeeds.
        checked_total(weights)?;
        self.initial.clear();
        self.initial.extend_from_slice(weights);
        self.leaves = weights.len().next_power_of_two();
        self.build();
        Ok(())
    }

    fn len(&self) -> usize {
        self.len
    }

    fn total_weight(&self) -> u64 {
        self.tree.get(1).copied().unwrap_or(0)
    }

    #[inline]
    fn sample(&self, value: u64) -> Option<usize> {
        if value >= self.total_weight() {
            return None;
        }
        let mut value = value;
        let mut node = 1;
        while node < self.leaves {
            let left = 2 * node;
            if value < self.tree[left] {
                node = left;
            } else {
                value -= self.tree[left];
                node = left + 1;
            }
        }
        Some(node - self.leaves)
    }

    fn swap_remove(&mut self, slot: usize) -> u64 {
        assert!(
            slot < self.len,
            "swap_remove index (is {slot}) should be < len (is {})",
            self.len
        );
        let last = self.len - 1;
        let removed = self.leaf(slot);
        if slot != last {
            self.set_leaf(slot, self.leaf(last));
        }
        self.set_leaf(last, 0);
        self.len = last;
        removed
    }

    fn reset(&mut self) {
        if self.len != self.initial.len() {
            self.build();
        }
    }
}
