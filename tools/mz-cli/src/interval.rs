//! # Block Interval Flags
//!
//! `--from` and `--to` as the user types them, resolved into a half-open
//! `BlockRange` once the chain height is known.
//!
//! | `--from` | `--to`    | Range                         |
//! |----------|-----------|-------------------------------|
//! | `m<N>`   | ignored   | `[height - N, height)`        |
//! | `<F>`    | omitted   | `[F, height)`                 |
//! | `<F>`    | `p<N>`    | `[F, F + N)`                  |
//! | `<F>`    | `<T>`     | `[F, T)`, `T` must exceed `F` |

use shared_types::{BlockIndex, BlockRange, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lower {
    Absolute(BlockIndex),
    BeforeHeight(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Upper {
    Height,
    Plus(u32),
    Absolute(BlockIndex),
}

/// Parsed interval flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInterval {
    from: Lower,
    to: Upper,
    raw_from: String,
    raw_to: String,
}

fn positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|v| *v > 0)
}

impl BlockInterval {
    pub fn parse(from: &str, to: Option<&str>) -> Result<Self, ConfigError> {
        let raw_to = to.unwrap_or_default();
        let invalid = || ConfigError::InvalidInterval {
            from: from.to_string(),
            to: raw_to.to_string(),
        };

        let parsed_from = match from.strip_prefix('m') {
            Some(digits) => Lower::BeforeHeight(positive(digits).ok_or_else(invalid)?),
            None if from.is_empty() => return Err(invalid()),
            None => Lower::Absolute(from.parse().map_err(|_| invalid())?),
        };

        let parsed_to = if raw_to.is_empty() {
            Upper::Height
        } else if let Some(digits) = raw_to.strip_prefix('p') {
            Upper::Plus(positive(digits).ok_or_else(invalid)?)
        } else {
            Upper::Absolute(raw_to.parse().map_err(|_| invalid())?)
        };

        // Absolute bounds can be checked before asking the chain.
        if let (Lower::Absolute(f), Upper::Absolute(t)) = (parsed_from, parsed_to) {
            if t <= f {
                return Err(invalid());
            }
        }

        Ok(Self {
            from: parsed_from,
            to: parsed_to,
            raw_from: from.to_string(),
            raw_to: raw_to.to_string(),
        })
    }

    /// Whether resolving needs the current chain height.
    pub fn needs_height(&self) -> bool {
        matches!(self.from, Lower::BeforeHeight(_)) || self.to == Upper::Height
    }

    /// Resolve against `height`, the number of blocks the node reports.
    pub fn resolve_with_height(&self, height: BlockIndex) -> Result<BlockRange, ConfigError> {
        let (start, end) = match (self.from, self.to) {
            (Lower::BeforeHeight(n), _) => {
                if n >= height {
                    return Err(ConfigError::Invalid(format!(
                        "latest block is less than from value, from:{} to:{}",
                        self.raw_from, height
                    )));
                }
                (height - n, height)
            }
            (Lower::Absolute(f), Upper::Height) => {
                if height <= f {
                    return Err(ConfigError::Invalid(format!(
                        "latest block is less than from value, from:{} to:{}",
                        f, height
                    )));
                }
                (f, height)
            }
            (Lower::Absolute(f), Upper::Plus(n)) => {
                let end = f.checked_add(n).ok_or_else(|| self.invalid())?;
                (f, end)
            }
            (Lower::Absolute(f), Upper::Absolute(t)) => (f, t),
        };
        BlockRange::new(start, end).map_err(|_| self.invalid())
    }

    /// Resolve without a height. Only valid when `needs_height` is false.
    pub fn resolve_static(&self) -> Option<BlockRange> {
        if self.needs_height() {
            return None;
        }
        self.resolve_with_height(0).ok()
    }

    fn invalid(&self) -> ConfigError {
        ConfigError::InvalidInterval {
            from: self.raw_from.clone(),
            to: self.raw_to.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(from: &str, to: Option<&str>, height: u32) -> Result<(u32, u32), ConfigError> {
        BlockInterval::parse(from, to)?
            .resolve_with_height(height)
            .map(|r| (r.start(), r.end()))
    }

    #[test]
    fn test_relative_from() {
        assert_eq!(range("m100", None, 1_000).unwrap(), (900, 1_000));
        // `to` is ignored for a relative `from`.
        assert_eq!(range("m100", Some("p5"), 1_000).unwrap(), (900, 1_000));
        assert!(range("m1000", None, 1_000).is_err());
        assert!(BlockInterval::parse("m0", None).is_err());
        assert!(BlockInterval::parse("m", None).is_err());
        assert!(BlockInterval::parse("m-3", None).is_err());
    }

    #[test]
    fn test_absolute_from() {
        assert_eq!(range("101000", Some("p1000"), 0).unwrap(), (101_000, 102_000));
        assert_eq!(range("10", Some("20"), 0).unwrap(), (10, 20));
        assert_eq!(range("10", None, 25).unwrap(), (10, 25));
        assert_eq!(range("0", Some("p1"), 0).unwrap(), (0, 1));
    }

    #[test]
    fn test_rejected_intervals() {
        let err = BlockInterval::parse("20", Some("10")).unwrap_err();
        assert_eq!(err.to_string(), "invalid block interval from:20 to:10");

        assert!(BlockInterval::parse("10", Some("10")).is_err());
        assert!(BlockInterval::parse("", None).is_err());
        assert!(BlockInterval::parse("abc", None).is_err());
        assert!(BlockInterval::parse("10", Some("p0")).is_err());
        assert!(BlockInterval::parse("10", Some("x5")).is_err());
        assert!(range("30", None, 30).is_err());
        assert!(range(&u32::MAX.to_string(), Some("p1"), 0).is_err());
    }

    #[test]
    fn test_needs_height() {
        assert!(BlockInterval::parse("m5", None).unwrap().needs_height());
        assert!(BlockInterval::parse("5", None).unwrap().needs_height());
        let fixed = BlockInterval::parse("5", Some("p2")).unwrap();
        assert!(!fixed.needs_height());
        let r = fixed.resolve_static().unwrap();
        assert_eq!((r.start(), r.end()), (5, 7));
    }
}
