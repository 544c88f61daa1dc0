//! Data model for extracted documentation — shared by both front-ends.

use std::collections::HashMap;

/// One documentation-bearing Lua module.
///
/// The name is derived from the file path relative to the input root:
/// `shells/zsh/config.lua` → `shells.zsh.config`. A directory's `init.lua`
/// is represented by the directory name itself.
#[derive(Debug, Default)]
pub struct Module {
    pub name: String,
    /// Path relative to the input root, as scanned.
    pub path: String,
    /// Classes keyed by name. A later `@class` with the same name wins.
    pub classes: HashMap<String, ClassDef>,
    /// Documented functions/variables, in source order.
    pub blocks: Vec<DocBlock>,
}

/// A named record type usable as a parameter/return type.
#[derive(Debug, Default)]
pub struct ClassDef {
    pub name: String,
    pub summary: Vec<String>,
    pub fields: Vec<Field>,
}

/// Documentation attached to one function or top-level variable.
///
/// `func_name` is None only for trailing documentation with no following
/// declaration; such blocks stay in the model but are never rendered.
#[derive(Debug, Default)]
pub struct DocBlock {
    pub summary: Vec<String>,
    pub params: Vec<Param>,
    pub returns: Vec<Return>,
    /// For blocks that document a returned table inline.
    pub fields: Vec<Field>,
    pub usage: Vec<String>,
    pub func_name: Option<String>,
}

impl DocBlock {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.params.is_empty()
            && self.returns.is_empty()
            && self.fields.is_empty()
            && self.usage.is_empty()
    }
}

/// `@param <name> <type> <description>`
#[derive(Debug)]
pub struct Param {
    pub name: String,
    /// Raw type expression; may contain generics and union pipes.
    pub ty: String,
    pub desc: String,
}

/// `@return <type> <description>`
#[derive(Debug)]
pub struct Return {
    pub ty: String,
    pub desc: String,
}

/// `@field <name[?]> <type> <description>`
///
/// A trailing `?` on the name marks the field optional. The marker is
/// stripped at render time and replaced by an explicit annotation.
#[derive(Debug)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub desc: String,
}

/// Manifest entry for one written snippet file.
#[derive(Debug, Clone)]
pub struct GeneratedSnippet {
    /// e.g. "shells.zsh.config"
    pub id: String,
    /// File name inside the output directory, e.g. "shells.zsh.config.md"
    pub file: String,
    /// Owning module name.
    pub module: String,
    /// Function name.
    pub func: String,
}
