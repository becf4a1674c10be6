use indexmap::IndexMap;
use rustc_hash::FxHasher;
use smol_str::SmolStr;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasherDefault;

use crate::value::Value;

pub type FxBuildHasher = BuildHasherDefault<FxHasher>;
pub type FastMap<K, V> = HashMap<K, V, FxBuildHasher>;
pub type FastHashSet<T> = HashSet<T, FxBuildHasher>;

/// Ordered field name → value mapping. Insertion order is field order.
pub type FieldMap = IndexMap<SmolStr, Value, FxBuildHasher>;

// ─── Iterators ──────────────────────────────────────────────────────────────

/// Lazy iterator over a record's values in field order. `Clone` restarts it.
pub type Values<'a> = indexmap::map::Values<'a, SmolStr, Value>;

/// Lazy iterator over `(field name, value)` pairs in field order.
pub type Pairs<'a> = indexmap::map::Iter<'a, SmolStr, Value>;

// ─── Key ────────────────────────────────────────────────────────────────────

/// Address of a field: a position or a name.
///
/// String and symbol spellings of a name both end up as [`Key::Name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Position(i64),
    Name(SmolStr),
}

impl Key {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(n) => Some(n.as_str()),
            Key::Position(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Position(i) => write!(f, "{}", i),
            Key::Name(n) => f.write_str(n),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Position(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Position(i as i64)
    }
}

/// Positions past `i64::MAX` saturate, which is always out of range.
impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Position(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(SmolStr::new(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(SmolStr::from(s))
    }
}

impl From<SmolStr> for Key {
    fn from(s: SmolStr) -> Self {
        Key::Name(s)
    }
}

impl From<&SmolStr> for Key {
    fn from(s: &SmolStr) -> Self {
        Key::Name(s.clone())
    }
}

/// Map a possibly negative position onto `0..size`.
///
/// `-1` is the last slot. Returns `None` when the position falls outside.
#[inline]
pub fn resolve_position(index: i64, size: usize) -> Option<usize> {
    let size = size as i64;
    let idx = if index < 0 { index + size } else { index };
    (0..size).contains(&idx).then_some(idx as usize)
}

// ─── Token ──────────────────────────────────────────────────────────────────

/// One argument of a record definition.
///
/// A leading [`Token::Str`] names the type; every other token is a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Str(SmolStr),
    Sym(SmolStr),
}

impl Token {
    pub fn str(s: impl Into<SmolStr>) -> Self {
        Token::Str(s.into())
    }

    pub fn sym(s: impl Into<SmolStr>) -> Self {
        Token::Sym(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Token::Str(s) | Token::Sym(s) => s.as_str(),
        }
    }

    pub fn into_name(self) -> SmolStr {
        match self {
            Token::Str(s) | Token::Sym(s) => s,
        }
    }
}

/// Bare string slices are field names.
impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Sym(SmolStr::new(s))
    }
}

impl From<SmolStr> for Token {
    fn from(s: SmolStr) -> Self {
        Token::Sym(s)
    }
}

/// Build a token list for [`crate::RecordSpec::new`].
///
/// `tokens!["Point"; x, y]` names the type, `tokens![x, y]` leaves it anonymous.
#[macro_export]
macro_rules! tokens {
    ($name:literal; $($field:ident),* $(,)?) => {
        vec![
            $crate::Token::str($name),
            $( $crate::Token::sym(stringify!($field)) ),*
        ]
    };
    ($($field:ident),* $(,)?) => {
        vec![ $( $crate::Token::sym(stringify!($field)) ),* ]
    };
}
