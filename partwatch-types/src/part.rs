//! Part catalog types - the authoritative set of parts for a machine.

/// Identifier of a part within a machine.
pub type PartId = i64;

/// Identifier of a monitored machine.
pub type MachineId = i64;

/// Identifier of a company in the machine directory.
pub type CompanyId = i64;

/// A physical sub-component of a machine, positioned on its 2D layout board.
///
/// Parts are fetched wholesale from the catalog endpoint when a machine is
/// selected and stay fixed until the next catalog refresh. `x` and `y` are
/// percentages of the board's width and height.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Part {
    /// The number embedded in the part name, if any.
    ///
    /// Part names follow a "Station 12" / "P07" convention; chart views
    /// order parts by this number rather than lexicographically, so that
    /// "P2" sorts before "P10".
    pub fn name_ordinal(&self) -> Option<u64> {
        let digits: String = self.name.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

/// Sort parts by the number embedded in their name, then by name.
///
/// Parts without a numeric component sort first among themselves.
pub fn sort_by_name_ordinal(parts: &mut [Part]) {
    parts.sort_by(|a, b| {
        let na = a.name_ordinal().unwrap_or(0);
        let nb = b.name_ordinal().unwrap_or(0);
        na.cmp(&nb).then_with(|| a.name.cmp(&b.name))
    });
}

/// A monitored machine, as listed in the company machine directory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
}
