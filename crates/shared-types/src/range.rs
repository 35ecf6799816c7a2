//! Half-open block ranges.

use std::fmt;

use crate::entities::BlockIndex;
use crate::errors::ConfigError;

/// Blocks `start..end`. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    start: BlockIndex,
    end: BlockIndex,
}

impl BlockRange {
    /// Build a range, rejecting empty and inverted bounds.
    pub fn new(start: BlockIndex, end: BlockIndex) -> Result<Self, ConfigError> {
        if end <= start {
            return Err(ConfigError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> BlockIndex {
        self.start
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> BlockIndex {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::ops::Range<BlockIndex> {
        self.start..self.end
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let range = BlockRange::new(100, 105).unwrap();
        assert_eq!(range.len(), 5);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![100, 101, 102, 103, 104]);
    }

    #[test]
    fn test_empty_range_rejected() {
        assert_eq!(
            BlockRange::new(7, 7),
            Err(ConfigError::EmptyRange { start: 7, end: 7 })
        );
        assert!(BlockRange::new(8, 7).is_err());
    }
}
