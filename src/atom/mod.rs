//! Atom interning: short symbolic message tags resolved to cheap integer ids.
//!
//! An [`Atom`] is how payloads carry tags like `"go"` or `"gogogo"` without
//! repeatedly allocating and comparing strings on the hot path. The table
//! behind it is a process-wide singleton (spec.md §5): lazily created,
//! thread-safe, and never torn down mid-process (interned atoms are cheap
//! and there are only ever as many as the program's own symbol vocabulary).

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// An interned symbol, cheap to copy and compare.
///
/// Two atoms compare equal iff they were interned from equal strings,
/// regardless of which [`AtomTable`] interned them (the table is a
/// process-wide singleton in practice, see [`intern`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom(u32);

impl Atom {
    /// Resolve this atom back to its text via the process-wide table.
    pub fn as_str(&self) -> &'static str {
        table().resolve(*self)
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intern `text` into the process-wide atom table and return its id.
///
/// # Example
/// ```rust
/// use haven_actors::atom::intern;
///
/// let a = intern("go");
/// let b = intern("go");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "go");
/// ```
pub fn intern(text: &str) -> Atom {
    table().intern(text)
}

fn table() -> &'static AtomTable {
    static TABLE: OnceLock<AtomTable> = OnceLock::new();
    TABLE.get_or_init(AtomTable::new)
}

/// Symbol table mapping interned text to stable integer ids.
///
/// Lookups are lock-free reads through [`DashMap`]; a new entry takes the
/// shard lock only for the duration of the insert. Entries are never
/// removed: the set of distinct atoms a program uses is bounded by its own
/// source code, so leaking the table for the life of the process is the
/// simplest correct design (mirrors the "global singletons" guidance in
/// spec.md §5 and §9).
pub struct AtomTable {
    by_text: DashMap<String, Atom>,
    by_id: DashMap<u32, &'static str>,
    next_id: AtomicU32,
}

impl AtomTable {
    fn new() -> Self {
        Self {
            by_text: DashMap::new(),
            by_id: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Intern `text`, returning the existing atom if already interned.
    pub fn intern(&self, text: &str) -> Atom {
        if let Some(existing) = self.by_text.get(text) {
            return *existing;
        }
        // Leak the string once so `resolve` can hand back `&'static str`
        // without an extra allocation on every lookup.
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let atom = Atom(id);
        self.by_id.insert(id, leaked);
        self.by_text.insert(leaked.to_owned(), atom);
        atom
    }

    /// Resolve an atom id back to its interned text.
    ///
    /// Panics only if handed an `Atom` from a different process or a
    /// corrupted wire frame, which decode already rejects as
    /// [`crate::system::RuntimeError::DecodeError`] before it reaches here.
    fn resolve(&self, atom: Atom) -> &'static str {
        #[allow(clippy::expect_used)]
        self.by_id
            .get(&atom.0)
            .map(|entry| *entry)
            .expect("atom id not present in table")
    }

    /// Number of distinct atoms interned so far.
    pub fn len(&self) -> usize {
        self.by_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
