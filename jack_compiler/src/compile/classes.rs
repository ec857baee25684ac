use std::collections::BTreeMap;

use smol_str::SmolStr;

/// How a class became known to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOrigin {
    /// Part of the runtime library. Never compiled.
    Builtin,
    /// Announced ahead of compilation, usually by the driver
    /// when it finds the source file.
    Declared,
    /// Compiled during this run.
    Compiled,
}

/// Run-wide registry of class names that may be called directly,
/// as in `Class.function()`.
///
/// Survives across the files of one run so calls to sibling
/// classes can be told apart from calls on variables.
#[derive(Debug, Default, Clone)]
pub struct KnownClasses {
    classes: BTreeMap<SmolStr, ClassOrigin>,
}

impl KnownClasses {
    pub fn with_builtins<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            classes: names
                .into_iter()
                .map(|name| (name.into(), ClassOrigin::Builtin))
                .collect(),
        }
    }

    /// Register a class that will be compiled, or is compiled elsewhere.
    ///
    /// Doesn't change the origin of a class that's already known.
    pub fn declare(&mut self, name: impl Into<SmolStr>) {
        self.classes.entry(name.into()).or_insert(ClassOrigin::Declared);
    }

    /// Record that a class was compiled in this run.
    ///
    /// Runtime library classes keep their origin.
    pub fn insert_compiled(&mut self, name: impl Into<SmolStr>) {
        let origin = self.classes.entry(name.into()).or_insert(ClassOrigin::Compiled);
        if *origin != ClassOrigin::Builtin {
            *origin = ClassOrigin::Compiled;
        }
    }

    /// Forget a class, as if it was never declared.
    pub fn remove(&mut self, name: &str) -> Option<ClassOrigin> {
        self.classes.remove(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    #[inline]
    pub fn origin(&self, name: &str) -> Option<ClassOrigin> {
        self.classes.get(name).copied()
    }
}
