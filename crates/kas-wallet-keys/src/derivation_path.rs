//! Derivation paths and child-number handling.
//!
//! A `ChildNumber` is a single step in a derivation path: an index below
//! 2^31 plus a hardened flag, packed into the u32 wire representation used
//! by extended-key serialization. A `DerivationPath` is an ordered sequence
//! of steps, printable and parseable in the conventional apostrophe
//! notation (`m/44'/111111'/0'/0/5`).

use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

/// A single derivation step: index plus hardened flag, stored in the packed
/// u32 form (hardened indices have the top bit set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildNumber(u32);

impl ChildNumber {
    /// Offset marking hardened child numbers (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// Build a child number from an index and hardened flag.
    ///
    /// Fails with `IndexOutOfRange` if `index` already has the hardened bit
    /// set (>= 2^31).
    pub fn new(index: u32, hardened: bool) -> Result<Self, KeyError> {
        if index >= Self::HARDENED_OFFSET {
            return Err(KeyError::IndexOutOfRange(index));
        }
        let raw = if hardened {
            index | Self::HARDENED_OFFSET
        } else {
            index
        };
        Ok(ChildNumber(raw))
    }

    /// Rebuild from the packed u32 wire form.
    pub fn from_raw(raw: u32) -> Self {
        ChildNumber(raw)
    }

    /// The packed u32 wire form, hardened bit included.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// The index without the hardened bit.
    pub fn index(self) -> u32 {
        self.0 & !Self::HARDENED_OFFSET
    }

    /// Whether this step is hardened.
    pub fn is_hardened(self) -> bool {
        self.0 & Self::HARDENED_OFFSET != 0
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

/// An ordered sequence of derivation steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// Build a path from its steps.
    pub fn new(children: Vec<ChildNumber>) -> Self {
        DerivationPath(children)
    }

    /// Iterate over the steps in derivation order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChildNumber> {
        self.0.iter()
    }

    /// Append a step.
    pub fn push(&mut self, child: ChildNumber) {
        self.0.push(child);
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path is empty (the master key itself).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any step is hardened.
    pub fn has_hardened(&self) -> bool {
        self.0.iter().any(|c| c.is_hardened())
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(children: Vec<ChildNumber>) -> Self {
        DerivationPath(children)
    }
}

impl FromStr for DerivationPath {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, KeyError> {
        let mut parts = s.split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => {
                return Err(KeyError::InvalidPath(format!(
                    "path must start with m: {s}"
                )))
            }
        }

        let mut children = Vec::new();
        for part in parts {
            let (digits, hardened) = match part
                .strip_suffix('\'')
                .or_else(|| part.strip_suffix('h'))
                .or_else(|| part.strip_suffix('H'))
            {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            let index: u32 = digits.parse().map_err(|_| {
                KeyError::InvalidPath(format!("invalid segment: {part}"))
            })?;
            children.push(ChildNumber::new(index, hardened)?);
        }
        Ok(DerivationPath(children))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child in &self.0 {
            write!(f, "/{child}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_number_packing() {
        let plain = ChildNumber::new(5, false).unwrap();
        assert_eq!(plain.raw(), 5);
        assert_eq!(plain.index(), 5);
        assert!(!plain.is_hardened());

        let hardened = ChildNumber::new(5, true).unwrap();
        assert_eq!(hardened.raw(), 5 | ChildNumber::HARDENED_OFFSET);
        assert_eq!(hardened.index(), 5);
        assert!(hardened.is_hardened());
    }

    #[test]
    fn test_child_number_range() {
        assert!(ChildNumber::new(ChildNumber::HARDENED_OFFSET - 1, true).is_ok());
        assert!(matches!(
            ChildNumber::new(ChildNumber::HARDENED_OFFSET, false),
            Err(KeyError::IndexOutOfRange(_))
        ));
        assert!(matches!(
            ChildNumber::new(u32::MAX, true),
            Err(KeyError::IndexOutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_display_roundtrip() {
        let path: DerivationPath = "m/44'/111111'/0'/0/5".parse().unwrap();
        assert_eq!(path.len(), 5);
        assert!(path.has_hardened());
        assert_eq!(path.to_string(), "m/44'/111111'/0'/0/5");

        let master: DerivationPath = "m".parse().unwrap();
        assert!(master.is_empty());
        assert_eq!(master.to_string(), "m");
    }

    #[test]
    fn test_parse_h_suffix() {
        let path: DerivationPath = "m/44h/1H/2".parse().unwrap();
        let expected = DerivationPath::new(vec![
            ChildNumber::new(44, true).unwrap(),
            ChildNumber::new(1, true).unwrap(),
            ChildNumber::new(2, false).unwrap(),
        ]);
        assert_eq!(path, expected);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("44'/0".parse::<DerivationPath>().is_err());
        assert!("m//1".parse::<DerivationPath>().is_err());
        assert!("m/abc".parse::<DerivationPath>().is_err());
        assert!("m/-1".parse::<DerivationPath>().is_err());
        // Index with the hardened bit already set.
        assert!(matches!(
            "m/2147483648".parse::<DerivationPath>(),
            Err(KeyError::IndexOutOfRange(_))
        ));
    }
}
