//! Lua `---` doc-comment parser — line-by-line state machine.
//!
//! Recognizes the tag vocabulary `@class`, `@field`, `@param`, `@return`,
//! `@usage`. Anything else inside a doc comment degrades to summary prose;
//! the scanner never fails on content it cannot parse.

use crate::model::*;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Component, Path};
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

/// A type expression that may contain generics and union pipes:
/// `table<string, string>`, `string|string[]`.
const TYPE_EXPR: &str = r"(?:\S+<[^>]+>|\S+(?:\|(?:\S+<[^>]+>|\S+))*)";

static RE_DOC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---\s?(.*)").unwrap());

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@class\s+(\S+)").unwrap());

static RE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^@field\s+(\w+\??)\s+({TYPE_EXPR})\s*(.*)")).unwrap());

static RE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^@param\s+(\w+)\s+({TYPE_EXPR})\s*(.*)")).unwrap());

static RE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^@return\s+({TYPE_EXPR})\s*(.*)")).unwrap());

static RE_USAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@usage\s*(.*)").unwrap());

static RE_FUNC_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^function\s+([\w.:]+)\s*\(").unwrap());

// -- Scanner state ------------------------------------------------------------

/// Current mode, updated line by line.
///
/// `Usage` is `Block` with the usage sub-mode armed: every doc line that
/// matches no tag is appended verbatim to the usage lines instead of the
/// summary. Any recognized tag disarms it; `@usage` re-arms it.
enum Mode {
    Idle,
    Class(ClassDef),
    Block(DocBlock),
    Usage(DocBlock),
}

struct Scanner {
    classes: std::collections::HashMap<String, ClassDef>,
    blocks: Vec<DocBlock>,
    mode: Mode,
}

impl Scanner {
    fn new() -> Self {
        Scanner {
            classes: Default::default(),
            blocks: Vec::new(),
            mode: Mode::Idle,
        }
    }

    fn process_line(&mut self, line: &str) {
        let stripped = line.trim();

        if let Some(caps) = RE_DOC.captures(stripped) {
            let content = caps.get(1).map_or("", |m| m.as_str());
            self.doc_line(content);
            return;
        }

        // Non-documentation line: an open class commits first, then the open
        // block ends. A function declaration names the block; the block is
        // pushed either way.
        self.commit_class();
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Block(mut block) | Mode::Usage(mut block) => {
                if let Some(caps) = RE_FUNC_DECL.captures(stripped) {
                    block.func_name = Some(declared_name(&caps[1]));
                }
                self.blocks.push(block);
            }
            other => self.mode = other,
        }
    }

    fn doc_line(&mut self, content: &str) {
        // @class closes any open block (preserving documentation that
        // preceded an undocumented class declaration) and opens a ClassDef.
        if let Some(caps) = RE_CLASS.captures(content) {
            if let Mode::Block(block) | Mode::Usage(block) =
                std::mem::replace(&mut self.mode, Mode::Idle)
            {
                self.blocks.push(block);
            }
            self.mode = Mode::Class(ClassDef {
                name: caps[1].to_string(),
                ..Default::default()
            });
            return;
        }

        // Fields accumulate on an open class. The first non-field content
        // line commits the class, then falls through so the same line is
        // reconsidered as block content below.
        if let Mode::Class(class) = &mut self.mode {
            if let Some(caps) = RE_FIELD.captures(content) {
                class.fields.push(Field {
                    name: caps[1].to_string(),
                    ty: caps[2].to_string(),
                    desc: caps[3].to_string(),
                });
                return;
            }
            self.commit_class();
        }

        let (mut block, in_usage) = match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Block(b) => (b, false),
            Mode::Usage(b) => (b, true),
            _ => (DocBlock::default(), false),
        };

        if let Some(caps) = RE_PARAM.captures(content) {
            block.params.push(Param {
                name: caps[1].to_string(),
                ty: caps[2].to_string(),
                desc: caps[3].to_string(),
            });
            self.mode = Mode::Block(block);
        } else if let Some(caps) = RE_RETURN.captures(content) {
            block.returns.push(Return {
                ty: caps[1].to_string(),
                desc: caps[2].to_string(),
            });
            self.mode = Mode::Block(block);
        } else if let Some(caps) = RE_FIELD.captures(content) {
            // No class open: the field documents a table returned by the
            // current function.
            block.fields.push(Field {
                name: caps[1].to_string(),
                ty: caps[2].to_string(),
                desc: caps[3].to_string(),
            });
            self.mode = Mode::Block(block);
        } else if let Some(caps) = RE_USAGE.captures(content) {
            let seed = caps.get(1).map_or("", |m| m.as_str());
            if !seed.is_empty() {
                block.usage.push(seed.to_string());
            }
            self.mode = Mode::Usage(block);
        } else if in_usage {
            block.usage.push(content.to_string());
            self.mode = Mode::Usage(block);
        } else {
            block.summary.push(content.to_string());
            self.mode = Mode::Block(block);
        }
    }

    fn commit_class(&mut self) {
        if matches!(self.mode, Mode::Class(_)) {
            if let Mode::Class(class) = std::mem::replace(&mut self.mode, Mode::Idle) {
                self.classes.insert(class.name.clone(), class);
            }
        }
    }

    /// End of input: a still-open class commits, a dangling open block is
    /// dropped.
    fn finish(mut self, name: String, path: String) -> Option<Module> {
        self.commit_class();
        if self.blocks.is_empty() && self.classes.is_empty() {
            return None;
        }
        Some(Module {
            name,
            path,
            classes: self.classes,
            blocks: self.blocks,
        })
    }
}

// -- Public API ---------------------------------------------------------------

/// Walk `root` for `.lua` files and parse each into a Module.
///
/// Paths come back in alphabetical order, so repeated runs over unchanged
/// input produce identical output. Unreadable files are skipped with a
/// warning, never a failure.
pub fn discover(root: &Path) -> Result<Vec<Module>> {
    let pattern = format!("{}/**/*.lua", root.display());
    let mut modules = Vec::new();

    for entry in glob::glob(&pattern).with_context(|| format!("invalid pattern: {pattern}"))? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                eprintln!("warning: skipping unreadable path: {e}");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("warning: skipping {}: {e}", path.display());
                continue;
            }
        };
        if let Some(module) = parse_file(&path, root, &content) {
            modules.push(module);
        }
    }

    Ok(modules)
}

/// Parse one file's content into a Module. None when nothing is documented.
pub fn parse_file(path: &Path, root: &Path, content: &str) -> Option<Module> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut scanner = Scanner::new();
    for line in content.lines() {
        scanner.process_line(line);
    }
    scanner.finish(module_name(rel), rel.display().to_string())
}

/// Derive a module name from a root-relative path.
/// `shells/zsh/config.lua` → `shells.zsh.config`, `fs/init.lua` → `fs`.
pub(crate) fn module_name(rel: &Path) -> String {
    let mut parts: Vec<String> = rel
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.last().is_some_and(|p| p == "init") {
        parts.pop();
    }
    parts.join(".")
}

/// Strip the leading module segment and any receiver segment from a declared
/// function path. `M.config` → `config`, `Buffer:write` → `write`.
fn declared_name(raw: &str) -> String {
    let name = raw.split_once('.').map_or(raw, |(_, rest)| rest);
    let name = name.split_once(':').map_or(name, |(_, rest)| rest);
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Module {
        parse_file(Path::new("test.lua"), Path::new("."), input).expect("documented module")
    }

    #[test]
    fn class_fields_then_function() {
        let input = r#"--- @class Foo
--- @field alpha string first field
--- @field beta? number second field
--- Configure the thing.
--- @param opts Foo the options
--- @return boolean ok
function M.bar(opts)
end
"#;
        let module = parse(input);
        let class = module.classes.get("Foo").expect("class Foo");
        assert_eq!(class.fields.len(), 2);
        assert_eq!(class.fields[0].name, "alpha");
        assert_eq!(class.fields[1].name, "beta?");
        assert_eq!(module.blocks.len(), 1);
        let block = &module.blocks[0];
        assert_eq!(block.func_name.as_deref(), Some("bar"));
        assert_eq!(block.summary, vec!["Configure the thing."]);
        assert_eq!(block.params.len(), 1);
        assert_eq!(block.params[0].ty, "Foo");
        assert_eq!(block.returns.len(), 1);
        assert_eq!(block.returns[0].ty, "boolean");
    }

    #[test]
    fn class_closed_by_prose_falls_through_to_summary() {
        let input = r#"--- @class Opts
--- @field a string a
--- This line closes the class and starts a block.
function M.go()
end
"#;
        let module = parse(input);
        assert!(module.classes.contains_key("Opts"));
        assert_eq!(module.blocks.len(), 1);
        assert_eq!(
            module.blocks[0].summary,
            vec!["This line closes the class and starts a block."]
        );
        assert_eq!(module.blocks[0].func_name.as_deref(), Some("go"));
    }

    #[test]
    fn receiver_and_module_path_stripped() {
        let module = parse("--- Doc\nfunction shells.zsh.config(x)\nend\n");
        assert_eq!(module.blocks[0].func_name.as_deref(), Some("zsh.config"));

        let module = parse("--- Doc\nfunction Buffer:write(data)\nend\n");
        assert_eq!(module.blocks[0].func_name.as_deref(), Some("write"));
    }

    #[test]
    fn usage_arms_and_disarms() {
        let input = r#"--- Summary line.
--- @usage local x = require("test")
--- x.run()
--- @param n number count
--- trailing prose goes to summary again
function M.run(n)
end
"#;
        let module = parse(input);
        let block = &module.blocks[0];
        assert_eq!(block.usage, vec!["local x = require(\"test\")", "x.run()"]);
        assert_eq!(block.params.len(), 1);
        assert_eq!(
            block.summary,
            vec!["Summary line.", "trailing prose goes to summary again"]
        );
    }

    #[test]
    fn usage_without_seed_collects_following_lines() {
        let input = "--- @usage\n--- x.go()\nfunction M.go()\nend\n";
        let module = parse(input);
        assert_eq!(module.blocks[0].usage, vec!["x.go()"]);
    }

    #[test]
    fn dangling_block_kept_without_name() {
        let input = "--- Documented but never declared.\nlocal x = 1\n";
        let module = parse(input);
        assert_eq!(module.blocks.len(), 1);
        assert!(module.blocks[0].func_name.is_none());
    }

    #[test]
    fn trailing_doc_at_eof_dropped() {
        let input = "--- Real block.\nfunction M.a()\nend\n--- dangling at eof\n";
        let module = parse(input);
        assert_eq!(module.blocks.len(), 1);
        assert_eq!(module.blocks[0].func_name.as_deref(), Some("a"));
    }

    #[test]
    fn malformed_tag_degrades_to_summary() {
        let input = "--- @param\n--- @field toofew\nfunction M.f()\nend\n";
        let module = parse(input);
        assert_eq!(module.blocks[0].summary, vec!["@param", "@field toofew"]);
        assert!(module.blocks[0].params.is_empty());
    }

    #[test]
    fn type_expressions_with_generics_and_unions() {
        let input = r#"--- Doc
--- @param map table<string, string> key map
--- @param mode string|nil optional mode
--- @return string[]|nil items
function M.f(map, mode)
end
"#;
        let module = parse(input);
        let block = &module.blocks[0];
        assert_eq!(block.params[0].ty, "table<string, string>");
        assert_eq!(block.params[0].desc, "key map");
        assert_eq!(block.params[1].ty, "string|nil");
        assert_eq!(block.returns[0].ty, "string[]|nil");
        assert_eq!(block.returns[0].desc, "items");
    }

    #[test]
    fn duplicate_class_last_wins() {
        let input = r#"--- @class Foo
--- @field old string old shape
--- filler
--- @class Foo
--- @field new string new shape
--- filler
function M.f()
end
"#;
        let module = parse(input);
        let class = module.classes.get("Foo").unwrap();
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.fields[0].name, "new");
    }

    #[test]
    fn undocumented_file_yields_nothing() {
        assert!(parse_file(
            Path::new("plain.lua"),
            Path::new("."),
            "local M = {}\nreturn M\n"
        )
        .is_none());
    }

    #[test]
    fn module_name_nested_and_init() {
        assert_eq!(
            module_name(Path::new("shells/zsh/config.lua")),
            "shells.zsh.config"
        );
        assert_eq!(module_name(Path::new("fs/init.lua")), "fs");
        assert_eq!(module_name(Path::new("top.lua")), "top");
    }
}
