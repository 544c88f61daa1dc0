//! lua2md — extract LDoc-style comments from Lua modules and emit Markdown.
//!
//! Parses `---` doc comments with `@class`/`@field`/`@param`/`@return`/
//! `@usage` tags — or reshapes the lua-language-server documentation
//! export — and generates Markdown reference snippets for a VitePress site.
//!
//! Handwritten docs pull the generated snippets in with a file-inclusion
//! directive: `<!--@include: ./_generated/shells.zsh.config.md-->`.

pub mod generate;
pub mod model;
pub mod parser;
pub mod render;

pub use generate::{generate_docs, write_module_pages};
pub use model::GeneratedSnippet;
