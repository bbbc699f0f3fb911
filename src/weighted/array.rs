use super::{checked_total, StrategyKind, Weighted};
use crate::error::Result;

/// Linear-scan strategy.
///
/// Keeps the weights in slot order and accumulates them on every lookup.
/// Cheapest to build and to shrink; best for small populations.
#[derive(Debug, Clone, Default)]
pub struct WeightedArray {
    initial: Vec<u64>,
    initial_total: u64,
    weights: Vec<u64>,
    total: u64,
}

impl WeightedArray {
    /// An empty strategy; call `initialize` before sampling.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Weighted for WeightedArray {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Array
    }

    fn initialize(&mut self, weights: &[u64]) -> Result<()> {
        let total = checked_total(weights)?;
        self.initial.clear();
        self.initial.extend_from_slice(weights);
        self.initial_total = total;
        self.reset();
        Ok(())
    }

    fn len(&self) -> usize {
        self.weights.len()
    }

    fn total_weight(&self) -> u64 {
        self.total
    }

    #[inline]
    fn sample(&self, value: u64) -> Option<usize> {
        if value >= self.total {
            return None;
        }
        // The running sum stays below `total`, which fits in a u64.
        let mut upper = 0u64;
        for (slot, &weight) in self.weights.iter().enumerate() {
            upper += weight;
            if value < upper {
                return Some(slot);
            }
        }
        None
    }

    fn swap_remove(&mut self, slot: usize) -> u64 {
        let removed = self.weights.swap_remove(slot);
        self.total -= removed;
        removed
    }

    fn reset(&mut self) {
        self.weights.clone_from(&self.initial);
        self.total = self.initial_total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_in_slot_order() {
        let mut s = WeightedArray::new();
        s.initialize(&[2, 0, 1]).expect("init");
        assert_eq!(s.sample(0), Some(0));
        assert_eq!(s.sample(1), Some(0));
        assert_eq!(s.sample(2), Some(2));
        assert_eq!(s.sample(3), None);
    }

    #[test]
    fn swap_remove_moves_last_slot_forward() {
        let mut s = WeightedArray::new();
        s.initialize(&[2, 3, 5]).expect("init");
        assert_eq!(s.swap_remove(0), 2);
        // Slot 0 now holds the weight that used to be last.
        assert_eq!(s.total_weight(), 8);
        assert_eq!(s.sample(4), Some(0));
        assert_eq!(s.sample(5), Some(1));
    }
}
