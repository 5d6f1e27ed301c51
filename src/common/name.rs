// Copyright (c) 2016-2021 Fabian Schuiki

//! A name table that internalizes all names presented to it and allows for
//! them to be referred to by a lightweight tag. This structure is heavily
//! inspired by the interner used in the Rust compiler.

use once_cell::unsync::Lazy;
use std::borrow::Borrow;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// A name is a lightweight 32 bit tag that refers to a string in a name
/// table. During parsing, encountered strings are inserted into the name
/// table and only the corresponding tag is kept in the token. Names which
/// have their most significant bit set represent case sensitive names, such
/// as for extended identifiers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(pub u32);

impl Name {
    /// Check if the name is case sensitive.
    pub fn is_case_sensitive(&self) -> bool {
        self.0 >> 31 == 1
    }

    /// Return the string representation of this name.
    pub fn as_str(self) -> RcStr {
        get_name_table().get(self)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self, self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.as_str(), f)
    }
}

/// A reference-counted string that acts like a regular str slice, hiding the
/// fact that it is wrapped in Rc<>.
#[derive(Clone, PartialEq, PartialOrd)]
pub struct RcStr(Rc<String>);

impl RcStr {
    /// Create a new ref-counted string which is a copy of `value`.
    pub fn new(value: &str) -> RcStr {
        RcStr(Rc::new(value.to_string()))
    }

    /// Create a new ref-counted string that contains `value`, without
    /// allocating any new storage.
    pub fn from(value: String) -> RcStr {
        RcStr(Rc::new(value))
    }
}

impl Eq for RcStr {}

impl Ord for RcStr {
    fn cmp(&self, other: &RcStr) -> Ordering {
        self[..].cmp(&other[..])
    }
}

impl Hash for RcStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self[..].hash(state)
    }
}

impl fmt::Debug for RcStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self[..].fmt(f)
    }
}

impl fmt::Display for RcStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self[..].fmt(f)
    }
}

impl Borrow<str> for RcStr {
    fn borrow(&self) -> &str {
        &self.0[..]
    }
}

impl Deref for RcStr {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0[..]
    }
}

/// A lookup table of names. Internalizes strings either in a case sensitive
/// or case insensitive way.
pub struct NameTable {
    map: RefCell<HashMap<(bool, RcStr), Name>>,
    names: RefCell<Vec<(RcStr, bool)>>,
}

impl NameTable {
    /// Create a new empty name table.
    pub fn new() -> NameTable {
        NameTable {
            map: RefCell::new(HashMap::new()),
            names: RefCell::new(vec![(RcStr::new(""), true)]),
        }
    }

    /// Obtain a name for a string, internalizing it if necessary.
    pub fn intern(&self, value: &str, case_sensitive: bool) -> Name {
        let value = if case_sensitive {
            RcStr::new(value)
        } else {
            RcStr::from(value.to_lowercase())
        };
        if let Some(&id) = self.map.borrow().get(&(case_sensitive, value.clone())) {
            return id;
        }
        let mut names = self.names.borrow_mut();
        let id = Name(names.len() as u32);
        names.push((value.clone(), case_sensitive));
        self.map.borrow_mut().insert((case_sensitive, value), id);
        id
    }

    /// Obtain the string a name refers to.
    pub fn get(&self, idx: Name) -> RcStr {
        self.names.borrow()[idx.0 as usize].0.clone()
    }

    /// Try to find the name a string was interned as.
    pub fn find<Q: ?Sized>(&self, value: &Q) -> Option<Name>
    where
        RcStr: Borrow<Q>,
        Q: Eq + Hash + ToOwned<Owned = String>,
    {
        let value = RcStr::from(value.to_owned());
        self.map.borrow().get(&(true, value)).cloned()
    }
}

thread_local! {
    static NAME_TABLE: Lazy<Rc<NameTable>> = Lazy::new(|| Rc::new(NameTable::new()));
}

/// Obtain the thread-local name table.
pub fn get_name_table() -> Rc<NameTable> {
    NAME_TABLE.with(|nt| Rc::clone(&**nt))
}
