//! Configured unit roster.

use super::error::FamilyCostError;

pub const DEFAULT_UNITS: [&str; 6] = [
    "Car",
    "Ris-Sharif-1",
    "Ris-Sharif-2",
    "Ris-Roman-1",
    "Ris-Roman-2",
    "Auto",
];

/// Ordered, duplicate-free list of unit names.
///
/// Records reference units only by name, so the roster is the sole
/// authority on which entries are attributable to a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRoster {
    names: Vec<String>,
}

impl UnitRoster {
    pub fn new<I, S>(names: I) -> Result<Self, FamilyCostError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(FamilyCostError::InvalidEntry {
                    reason: "unit name must not be empty".into(),
                });
            }
            if out.contains(&name) {
                return Err(FamilyCostError::InvalidEntry {
                    reason: format!("duplicate unit name {name:?}"),
                });
            }
            out.push(name);
        }
        if out.is_empty() {
            return Err(FamilyCostError::InvalidEntry {
                reason: "at least one unit is required".into(),
            });
        }
        Ok(Self { names: out })
    }

    /// Parse a comma separated list, e.g. `Car, Auto`.
    pub fn parse(list: &str) -> Result<Self, FamilyCostError> {
        Self::new(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for UnitRoster {
    fn default() -> Self {
        Self {
            names: DEFAULT_UNITS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
