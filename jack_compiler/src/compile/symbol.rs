use std::collections::BTreeMap;

use smol_str::SmolStr;

use super::ir::Segment;
use crate::parsing::Type;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    pub ty: Type,
    pub storage: StorageClass,
    /// Position within the storage class, in declaration order.
    pub index: u16,
}

/// Where a variable lives at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// Per-object variable, declared at class level.
    Field,
    /// Per-class variable, declared at class level.
    Static,
    /// Subroutine parameter.
    Argument,
    /// Subroutine local variable.
    Local,
}

impl StorageClass {
    /// Memory segment the variable is addressed through.
    ///
    /// Fields are reached via the `this` segment, which the subroutine
    /// prologue points at the current object.
    #[inline]
    pub fn segment(self) -> Segment {
        match self {
            Self::Field => Segment::This,
            Self::Static => Segment::Static,
            Self::Argument => Segment::Argument,
            Self::Local => Segment::Local,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            Self::Field => 0,
            Self::Static => 1,
            Self::Argument => 2,
            Self::Local => 3,
        }
    }
}

/// Returned when a name is declared twice in one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolExists;

/// Mapping of names to variables for one scope.
///
/// Each storage class has its own counter, so indices are
/// contiguous from zero within a storage class.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<SmolStr, Symbol>,
    counts: [u16; 4],
}

impl SymbolTable {
    /// Declare a new variable and assign it the next index of its storage class.
    pub fn define(&mut self, name: impl Into<SmolStr>, ty: Type, storage: StorageClass) -> Result<&Symbol, SymbolExists> {
        let name = name.into();
        if self.symbols.contains_key(&name) {
            return Err(SymbolExists);
        }

        let counter = &mut self.counts[storage.slot()];
        let index = *counter;
        *counter += 1;

        let symbol = self.symbols.entry(name.clone()).or_insert(Symbol {
            name,
            ty,
            storage,
            index,
        });
        Ok(symbol)
    }

    #[inline]
    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    #[inline]
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Number of variables declared with the given storage class.
    #[inline]
    pub fn count(&self, storage: StorageClass) -> u16 {
        self.counts[storage.slot()]
    }

    /// Remove all symbols and restart every counter at zero.
    pub fn reset(&mut self) {
        self.symbols.clear();
        self.counts = Default::default();
    }
}

/// The two scopes visible inside a subroutine.
#[derive(Debug, Clone, Copy)]
pub struct Scopes<'s> {
    pub class: &'s SymbolTable,
    pub subroutine: &'s SymbolTable,
}

impl<'s> Scopes<'s> {
    /// Lookup a variable by name.
    ///
    /// The subroutine scope is searched first, so arguments and locals
    /// shadow fields and statics of the same name.
    pub fn lookup(&self, name: &str) -> Option<&'s Symbol> {
        self.subroutine
            .get_symbol(name)
            .or_else(|| self.class.get_symbol(name))
    }
}
