//! Symbol table mapping name strings to small integer identifiers.
//!
//! Every keyword and user-defined device name seen while lexing a definition
//! file is interned here exactly once. Identifiers are handed out in
//! first-seen order, so the keyword set interned at lexer construction always
//! occupies the lowest ids.

use std::fmt;

use lasso::Rodeo;

/// An interned name.
///
/// Cheap to copy and compare; resolve it back to text through the [`Names`]
/// table that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(u32);

impl Name {
    /// Returns the raw index of this name.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// SAFETY: `Name` wraps a `u32`; `try_from_usize` rejects anything that does
// not fit, and `into_usize` is the exact inverse.
unsafe impl lasso::Key for Name {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Name)
    }
}

/// The symbol table for one simulation session.
pub struct Names {
    rodeo: Rodeo<Name>,
}

impl Names {
    /// Create an empty symbol table.
    pub fn new() -> Self {
        Self {
            rodeo: Rodeo::new(),
        }
    }

    /// Return the id for `name` without interning it.
    pub fn query(&self, name: &str) -> Option<Name> {
        self.rodeo.get(name)
    }

    /// Intern a single string, returning its id.
    pub fn lookup_one(&mut self, name: &str) -> Name {
        self.rodeo.get_or_intern(name)
    }

    /// Intern every string in `names`, returning ids in the same order.
    pub fn lookup<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<Name> {
        names
            .iter()
            .map(|name| self.lookup_one(name.as_ref()))
            .collect()
    }

    /// Resolve an id back to its string.
    pub fn get_name_string(&self, id: Name) -> Option<&str> {
        self.rodeo.try_resolve(&id)
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Names {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Names {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Names").field("len", &self.len()).finish()
    }
}
