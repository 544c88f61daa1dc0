//! lua-language-server documentation export reshaper.
//!
//! Runs `lua-language-server --doc` against the input root, reads the
//! `doc.json` it deposits, and regroups the heterogeneous entries into the
//! same Module records the comment scanner produces. Class entries become
//! ClassDefs, function-typed fields and variables become doc blocks, and a
//! class whose name equals its own module's file stem is treated as the
//! module table itself and never rendered as a nested type.

use crate::model::*;
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};
use std::process::Command;
use std::sync::LazyLock;

/// Collapses a newline plus leading whitespace into a single space.
static RE_FOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*").unwrap());

// -- Export schema ------------------------------------------------------------

/// One entry of the doc.json array. Entries are heterogeneous; every field
/// defaults so unknown shapes deserialize to something harmless.
#[derive(Debug, Deserialize)]
pub struct ExportEntry {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub defines: Vec<ExportDefine>,
    #[serde(default)]
    pub fields: Vec<ExportField>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub rawdesc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportDefine {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub extends: Option<ExportExtends>,
}

#[derive(Debug, Deserialize)]
pub struct ExportExtends {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub args: Vec<ExportArg>,
    #[serde(default)]
    pub returns: Vec<ExportReturn>,
}

#[derive(Debug, Deserialize)]
pub struct ExportField {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub rawdesc: Option<String>,
    #[serde(default)]
    pub extends: Option<ExportExtends>,
}

#[derive(Debug, Deserialize)]
pub struct ExportArg {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub rawdesc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportReturn {
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub rawdesc: Option<String>,
}

// -- Public API ---------------------------------------------------------------

/// Run the export against `root` and reshape it into Modules.
///
/// The tool writes into a scoped temporary directory that is removed on
/// every exit path. A non-zero exit or a missing doc.json is fatal.
pub fn load_modules(root: &Path) -> Result<Vec<Module>> {
    let workdir = tempfile::tempdir().context("failed to create export working directory")?;

    let status = Command::new("lua-language-server")
        .arg("--doc")
        .arg(root)
        .arg("--doc_out_path")
        .arg(workdir.path())
        .status()
        .context("failed to launch lua-language-server")?;
    if !status.success() {
        bail!("lua-language-server exited with {status}");
    }

    let doc_path = workdir.path().join("doc.json");
    let raw = fs::read_to_string(&doc_path)
        .with_context(|| format!("export produced no {}", doc_path.display()))?;
    let entries: Vec<ExportEntry> =
        serde_json::from_str(&raw).context("malformed doc.json export")?;

    Ok(reshape(entries, root))
}

/// Regroup export entries into Modules. Pure; module order is sorted by name
/// so output is stable across runs.
pub fn reshape(entries: Vec<ExportEntry>, root: &Path) -> Vec<Module> {
    let mut modules: BTreeMap<String, Module> = BTreeMap::new();

    for entry in &entries {
        let Some(file) = entry.defines.iter().find_map(|d| d.file.as_deref()) else {
            continue;
        };
        let Some((key, stem)) = module_key(file, root) else {
            continue;
        };

        let module = modules.entry(key.clone()).or_insert_with(|| Module {
            name: key.clone(),
            path: file.to_string(),
            ..Default::default()
        });

        match entry.kind.as_str() {
            "variable" => {
                // A variable whose sole definition extends a function is a
                // documented module function.
                if let [define] = entry.defines.as_slice() {
                    if let Some(extends) = &define.extends {
                        if extends.kind == "function" {
                            let display = entry.name.rsplit('.').next().unwrap_or(&entry.name);
                            module.blocks.push(function_block(
                                display,
                                extends,
                                entry.rawdesc.as_deref().or(entry.desc.as_deref()),
                            ));
                        }
                    }
                }
            }
            "type" => {
                // Module-self entries describe the module's own table; their
                // function fields are still documented, but the table itself
                // never renders as a parameter/return class.
                let module_self = entry.name == stem;
                let mut fields = Vec::new();

                for field in &entry.fields {
                    let desc = field.rawdesc.as_deref().or(field.desc.as_deref());
                    match &field.extends {
                        Some(extends) if extends.kind == "function" => {
                            module.blocks.push(function_block(&field.name, extends, desc));
                        }
                        _ => {
                            let view = field.view.as_deref().unwrap_or("any");
                            let (ty, optional) = match view.strip_suffix('?') {
                                Some(base) => (base, true),
                                None => (view, false),
                            };
                            let name = if optional {
                                format!("{}?", field.name)
                            } else {
                                field.name.clone()
                            };
                            fields.push(Field {
                                name,
                                ty: ty.to_string(),
                                desc: fold(desc),
                            });
                        }
                    }
                }

                if !module_self && !fields.is_empty() {
                    let summary = match entry.rawdesc.as_deref().or(entry.desc.as_deref()) {
                        Some(d) => vec![fold(Some(d))],
                        None => Vec::new(),
                    };
                    module.classes.insert(
                        entry.name.clone(),
                        ClassDef {
                            name: entry.name.clone(),
                            summary,
                            fields,
                        },
                    );
                }
            }
            _ => {}
        }
    }

    modules
        .into_values()
        .filter(|m| !m.blocks.is_empty() || !m.classes.is_empty())
        .collect()
}

// -- Reshaping helpers --------------------------------------------------------

fn function_block(name: &str, extends: &ExportExtends, desc: Option<&str>) -> DocBlock {
    let params = extends
        .args
        .iter()
        .filter(|a| a.name.as_deref() != Some("self"))
        .map(|a| Param {
            name: a
                .name
                .clone()
                .or_else(|| a.view.clone())
                .unwrap_or_default(),
            ty: a.view.clone().unwrap_or_else(|| "any".to_string()),
            desc: fold(a.rawdesc.as_deref().or(a.desc.as_deref())),
        })
        .collect();

    let returns = extends
        .returns
        .iter()
        .map(|r| Return {
            ty: r.view.clone().unwrap_or_else(|| "any".to_string()),
            desc: fold(r.rawdesc.as_deref().or(r.desc.as_deref())),
        })
        .collect();

    DocBlock {
        summary: match desc {
            Some(d) => vec![fold(Some(d))],
            None => Vec::new(),
        },
        params,
        returns,
        fields: Vec::new(),
        usage: Vec::new(),
        func_name: Some(name.to_string()),
    }
}

/// Collapse an embedded-newline description to a single line.
fn fold(desc: Option<&str>) -> String {
    match desc {
        Some(d) => RE_FOLD.replace_all(d.trim(), " ").into_owned(),
        None => String::new(),
    }
}

/// Derive (module key, file stem) from an exported file path.
/// Returns None for non-Lua sources.
fn module_key(file: &str, root: &Path) -> Option<(String, String)> {
    let path = file.strip_prefix("file://").unwrap_or(file);
    let path = Path::new(path);
    if path.extension().and_then(|e| e.to_str()) != Some("lua") {
        return None;
    }
    let stem = path.file_stem()?.to_string_lossy().into_owned();
    let rel = path.strip_prefix(root).unwrap_or(path);
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
    Some((parts.join("."), stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(raw: serde_json::Value) -> Vec<ExportEntry> {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn module_self_entry_excluded_from_classes() {
        let input = entries(serde_json::json!([
            {
                "name": "core",
                "type": "type",
                "defines": [{ "file": "core.lua" }],
                "fields": [
                    {
                        "name": "init",
                        "extends": { "type": "function", "args": [], "returns": [] }
                    },
                    { "name": "version", "view": "string", "rawdesc": "core version" }
                ]
            }
        ]));

        let modules = reshape(input, Path::new("."));
        assert_eq!(modules.len(), 1);
        let module = &modules[0];
        assert_eq!(module.name, "core");
        assert!(module.classes.is_empty());
        assert_eq!(module.blocks.len(), 1);
        assert_eq!(module.blocks[0].func_name.as_deref(), Some("init"));
    }

    #[test]
    fn class_entry_with_optional_field() {
        let input = entries(serde_json::json!([
            {
                "name": "zsh.Options",
                "type": "type",
                "defines": [{ "file": "shells/zsh/config.lua" }],
                "fields": [
                    { "name": "shell", "view": "string?", "rawdesc": "preferred shell" },
                    { "name": "rc", "view": "string", "rawdesc": "rc file path" }
                ]
            }
        ]));

        let modules = reshape(input, Path::new("."));
        let module = &modules[0];
        assert_eq!(module.name, "shells.zsh.config");
        let class = module.classes.get("zsh.Options").unwrap();
        assert_eq!(class.fields[0].name, "shell?");
        assert_eq!(class.fields[0].ty, "string");
        assert_eq!(class.fields[1].name, "rc");
    }

    #[test]
    fn function_variable_strips_path_and_self() {
        let input = entries(serde_json::json!([
            {
                "name": "zsh.config",
                "type": "variable",
                "defines": [{
                    "file": "shells/zsh/config.lua",
                    "extends": {
                        "type": "function",
                        "args": [
                            { "name": "self", "view": "zsh" },
                            { "name": "opts", "view": "zsh.Options", "rawdesc": "the options" }
                        ],
                        "returns": [
                            { "view": "boolean" },
                            { "view": "string", "rawdesc": "error message" }
                        ]
                    }
                }],
                "rawdesc": "Apply the zsh\n    configuration."
            }
        ]));

        let modules = reshape(input, Path::new("."));
        let block = &modules[0].blocks[0];
        assert_eq!(block.func_name.as_deref(), Some("config"));
        assert_eq!(block.summary, vec!["Apply the zsh configuration."]);
        assert_eq!(block.params.len(), 1);
        assert_eq!(block.params[0].name, "opts");
        assert_eq!(block.returns.len(), 2);
        assert_eq!(block.returns[1].desc, "error message");
    }

    #[test]
    fn variable_with_multiple_defines_ignored() {
        let input = entries(serde_json::json!([
            {
                "name": "ambiguous",
                "type": "variable",
                "defines": [
                    { "file": "a.lua", "extends": { "type": "function" } },
                    { "file": "a.lua", "extends": { "type": "function" } }
                ]
            }
        ]));
        assert!(reshape(input, Path::new(".")).is_empty());
    }

    #[test]
    fn non_lua_and_fileless_entries_skipped() {
        let input = entries(serde_json::json!([
            { "name": "builtin", "type": "type", "defines": [{}] },
            {
                "name": "meta",
                "type": "type",
                "defines": [{ "file": "meta/3rd/love.d.ts" }],
                "fields": [{ "name": "x", "view": "string" }]
            }
        ]));
        assert!(reshape(input, Path::new(".")).is_empty());
    }

    #[test]
    fn fold_collapses_indented_continuations() {
        assert_eq!(fold(Some("first\n    second\n\tthird")), "first second third");
        assert_eq!(fold(None), "");
    }

    #[test]
    fn module_key_uri_prefix_and_init() {
        let (key, stem) = module_key("file://lib/fs/init.lua", Path::new("lib")).unwrap();
        assert_eq!(key, "fs");
        assert_eq!(stem, "init");

        let (key, stem) = module_key("core.lua", Path::new(".")).unwrap();
        assert_eq!(key, "core");
        assert_eq!(stem, "core");
    }
}
