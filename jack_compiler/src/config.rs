//! Compiler configuration.
use std::{fs, path::Path};

use serde::Deserialize;
use smol_str::SmolStr;

use crate::error::CompileResult;

/// Classes of the runtime library. They can be called,
/// but are never compiled.
pub const BUILTIN_CLASSES: &[&str] = &[
    "Math", "Memory", "Screen", "Output", "Keyboard", "String", "Array", "Sys",
];

/// Options that can be loaded from a YAML file.
///
/// ```yaml
/// builtin_classes: [Math, Memory, Screen, Output, Keyboard, String, Array, Sys]
/// allow_unresolved_calls: false
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConf {
    /// Class names callable without being compiled in the run.
    pub builtin_classes: Vec<SmolStr>,
    /// When `Name.f()` names neither a variable nor a known class,
    /// emit `call Name.f` instead of failing.
    pub allow_unresolved_calls: bool,
}

impl Default for CompilerConf {
    fn default() -> Self {
        Self {
            builtin_classes: BUILTIN_CLASSES.iter().copied().map(SmolStr::new).collect(),
            allow_unresolved_calls: false,
        }
    }
}

impl CompilerConf {
    pub fn from_yaml(text: &str) -> CompileResult<Self> {
        let conf: Self = serde_yaml::from_str(text)?;
        log::debug!("loaded compiler configuration: {:#?}", conf);
        Ok(conf)
    }

    pub fn from_file(filepath: impl AsRef<Path>) -> CompileResult<Self> {
        let text = fs::read_to_string(filepath)?;
        Self::from_yaml(&text)
    }
}
