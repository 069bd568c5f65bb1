use std::collections::HashMap;

/// How often each position hash occurred since the game started.
#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, hash: u64) -> u32 {
        let next = self.get(hash).saturating_add(1);
        self.counts.insert(hash, next);
        next
    }

    pub(crate) fn decrement(&mut self, hash: u64) {
        match self.get(hash) {
            0 | 1 => {
                self.counts.remove(&hash);
            }
            count => {
                self.counts.insert(hash, count - 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_round_trip() {
        let mut table = RepetitionTable::new();
        assert_eq!(table.increment(7), 1);
        assert_eq!(table.increment(7), 2);
        table.decrement(7);
        assert_eq!(table.get(7), 1);
        table.decrement(7);
        table.decrement(7);
        assert_eq!(table.get(7), 0);
    }
}
