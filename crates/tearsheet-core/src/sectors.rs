//! Sector-grouped ticker lists.
//!
//! A comparison sheet is driven by one comma separated argument that mixes
//! sector names and tickers, e.g. `Semis,NVDA,AMD,Software,MSFT`. Any item
//! containing a lowercase letter starts a new sector; every other item is a
//! ticker in the current sector.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{error::DataError, types::Symbol};

/// A named group of tickers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorGroup {
    /// Sector name, `None` for tickers listed before the first sector.
    pub name: Option<String>,
    /// Tickers in listing order.
    pub symbols: Vec<Symbol>,
}

/// Ordered sector groups parsed from a comparison argument.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorList {
    groups: Vec<SectorGroup>,
}

impl SectorList {
    /// Creates a sector list from explicit groups.
    #[must_use]
    pub const fn new(groups: Vec<SectorGroup>) -> Self {
        Self { groups }
    }

    /// Returns the groups in listing order.
    #[must_use]
    pub fn groups(&self) -> &[SectorGroup] {
        &self.groups
    }

    /// Returns every ticker in listing order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.groups.iter().flat_map(|g| g.symbols.iter())
    }

    /// Returns the number of tickers across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.symbols.len()).sum()
    }

    /// Returns true if no ticker was listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromStr for SectorList {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut groups: Vec<SectorGroup> = Vec::new();

        for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            if item.chars().any(char::is_lowercase) {
                groups.push(SectorGroup {
                    name: Some(item.to_string()),
                    symbols: Vec::new(),
                });
                continue;
            }

            match groups.last_mut() {
                Some(group) => group.symbols.push(Symbol::new(item)),
                None => groups.push(SectorGroup {
                    name: None,
                    symbols: vec![Symbol::new(item)],
                }),
            }
        }

        let list = Self { groups };
        if list.is_empty() {
            return Err(DataError::InvalidParameter(format!(
                "no tickers found in company list: {s:?}"
            )));
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sectors_and_tickers() {
        let list: SectorList = "Semis,NVDA,AMD,Software,MSFT".parse().unwrap();
        assert_eq!(list.groups().len(), 2);
        assert_eq!(list.groups()[0].name.as_deref(), Some("Semis"));
        assert_eq!(
            list.groups()[0].symbols,
            vec![Symbol::new("NVDA"), Symbol::new("AMD")]
        );
        assert_eq!(list.groups()[1].symbols, vec![Symbol::new("MSFT")]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_leading_tickers_form_unnamed_group() {
        let list: SectorList = "AVGO, Semis ,NVDA".parse().unwrap();
        assert_eq!(list.groups()[0].name, None);
        assert_eq!(list.groups()[0].symbols, vec![Symbol::new("AVGO")]);
        let symbols: Vec<&str> = list.symbols().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["AVGO", "NVDA"]);
    }

    #[test]
    fn test_sector_only_list_is_rejected() {
        assert!("Semis,Software".parse::<SectorList>().is_err());
        assert!("".parse::<SectorList>().is_err());
    }
}
