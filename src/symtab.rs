use std::collections::HashMap;
use std::fmt::Display;

use serde::Serialize;

use crate::error::SpannedError;
use crate::types::Type;

/// A storage location, distinct from any source-level name. Variable slots
/// and temporaries are minted from the same counter, so the two can never
/// collide in the emitted trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot(u32);

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub ty: Type,
    pub slot: Slot,
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("identifier '{0}' is already declared")]
    Redeclaration(String),
}

pub type SymbolError = SpannedError<ErrorKind>;

/// Name resolution for one translation unit. Entries are added by
/// declarations and never removed; the language has no scopes or shadowing.
#[derive(Default)]
pub struct SymbolTable {
    entries: HashMap<String, Entry>,
    next_slot: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh slot. Also used by the parser for temporaries.
    pub fn alloc_slot(&mut self) -> Slot {
        let slot = Slot(self.next_slot);
        self.next_slot += 1;
        slot
    }

    pub fn declare(&mut self, name: &str, ty: Type) -> Result<Slot, ErrorKind> {
        if self.entries.contains_key(name) {
            return Err(ErrorKind::Redeclaration(name.to_string()));
        }

        let slot = self.alloc_slot();
        self.entries.insert(name.to_string(), Entry { ty, slot });

        Ok(slot)
    }

    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_and_lookup() {
        let mut table = SymbolTable::new();
        let slot = table.declare("a", Type::Int).unwrap();

        let entry = table.lookup("a").unwrap();
        assert_eq!(entry.slot, slot);
        assert_eq!(entry.ty, Type::Int);
        assert!(table.lookup("b").is_none());
    }

    #[test]
    fn redeclaration_fails_regardless_of_type() {
        let mut table = SymbolTable::new();
        table.declare("a", Type::Int).unwrap();

        assert!(matches!(
            table.declare("a", Type::Int),
            Err(ErrorKind::Redeclaration(_))
        ));
        assert!(matches!(
            table.declare("a", Type::Float),
            Err(ErrorKind::Redeclaration(_))
        ));
    }

    #[test]
    fn slots_are_unique_across_names_and_temps() {
        let mut table = SymbolTable::new();
        let a = table.declare("a", Type::Int).unwrap();
        let tmp = table.alloc_slot();
        let b = table.declare("b", Type::Long).unwrap();

        assert_ne!(a, tmp);
        assert_ne!(tmp, b);
        assert_ne!(a, b);
        assert_eq!(format!("{a} {tmp} {b}"), "t0 t1 t2");
    }
}
