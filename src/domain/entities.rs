//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an organizational unit within a loaded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub i64);

impl UnitId {
    /// Parent reference meaning "no parent".
    pub const ROOT_SENTINEL: UnitId = UnitId(0);
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UnitId {
    fn from(value: i64) -> Self {
        UnitId(value)
    }
}

/// Organizational unit as supplied by the unit repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    /// Display name, also the search key
    pub name: String,
    /// Hierarchical depth marker, e.g. "I", "II.a", "Eselon III"
    #[serde(default)]
    pub level: String,
    /// Parent reference; `None` or `0` means root
    #[serde(default)]
    pub parent_id: Option<UnitId>,
}

impl Unit {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        level: impl Into<String>,
        parent_id: Option<i64>,
    ) -> Self {
        Self {
            id: UnitId(id),
            name: name.into(),
            level: level.into(),
            parent_id: parent_id.map(UnitId),
        }
    }

    /// Declared parent, with the `0` sentinel folded into `None`.
    ///
    /// Does not check that the parent exists; see `UnitArena::parent_of`.
    pub fn parent(&self) -> Option<UnitId> {
        self.parent_id.filter(|p| *p != UnitId::ROOT_SENTINEL)
    }

    pub fn depth(&self) -> Depth {
        Depth::from_level(&self.level)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Eselon depth, shallowest (`I`) to deepest (`IV`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Depth {
    I = 1,
    II = 2,
    III = 3,
    IV = 4,
}

impl Depth {
    /// Markers in match priority: most specific first, so "IV" is not read as "I".
    const MARKERS: [(&'static str, Depth); 4] = [
        ("IV", Depth::IV),
        ("III", Depth::III),
        ("II", Depth::II),
        ("I", Depth::I),
    ];

    /// Derive the depth from a free-form level descriptor.
    ///
    /// Unrecognized descriptors default to the shallowest depth.
    pub fn from_level(level: &str) -> Self {
        let level = level.to_uppercase();
        Self::MARKERS
            .iter()
            .find(|(marker, _)| level.contains(marker))
            .map(|(_, depth)| *depth)
            .unwrap_or(Depth::I)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Depth::I => "I",
            Depth::II => "II",
            Depth::III => "III",
            Depth::IV => "IV",
        };
        write!(f, "{}", s)
    }
}

/// Flat list of units as returned by a single repository fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub units: Vec<Unit>,
}

impl From<Vec<Unit>> for UnitSnapshot {
    fn from(units: Vec<Unit>) -> Self {
        Self { units }
    }
}
