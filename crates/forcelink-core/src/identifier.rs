//! Element identifiers backed by a global string interner.
//!
//! Host collections hand out string ids for nodes and edges; the layout keeps
//! them as [`Id`] so that lookups, dedup keys and sets are cheap `Copy` values.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by every [`Id`].
///
/// # Thread Safety
///
/// Access goes through a `Mutex`, so ids can be created from any thread.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier of a host element (node or edge).
///
/// # Examples
///
/// ```
/// use forcelink_core::identifier::Id;
///
/// let a = Id::new("a");
/// let b: Id = "a".into();
///
/// assert_eq!(a, b);
/// assert_eq!(a, "a");
/// assert_eq!(a.to_string(), "a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from its string form, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the unordered pair key of two ids.
    ///
    /// `Id::pair_key(a, b) == Id::pair_key(b, a)` for every `a` and `b`; the
    /// layout uses it to merge parallel and anti-parallel edges.
    ///
    /// ```
    /// use forcelink_core::identifier::Id;
    ///
    /// let (a, b) = (Id::new("a"), Id::new("b"));
    /// assert_eq!(Id::pair_key(a, b), Id::pair_key(b, a));
    /// ```
    pub fn pair_key(first: Id, second: Id) -> (Id, Id) {
        if first.0 <= second.0 {
            (first, second)
        } else {
            (second, first)
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        f.write_str(str_value)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}
