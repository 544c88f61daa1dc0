//! Writer — renders modules to files and reports a manifest.

use crate::model::{GeneratedSnippet, Module};
use crate::parser::scan;
use crate::render::markdown;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Scan `root` and write one snippet file per documented function.
///
/// This is the entry point documentation build steps call: it returns the
/// manifest of written snippets so callers can wire them into navigation.
/// Finding nothing documented is an error, never silent empty output.
pub fn generate_docs(root: &Path, out_dir: &Path) -> Result<Vec<GeneratedSnippet>> {
    let modules = scan::discover(root)?;
    if modules.is_empty() {
        bail!("no documented Lua modules found under {}", root.display());
    }
    if !modules
        .iter()
        .any(|m| m.blocks.iter().any(|b| b.func_name.is_some()))
    {
        bail!("no documented functions found under {}", root.display());
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;

    let mut snippets = Vec::new();
    for module in &modules {
        for block in &module.blocks {
            let Some(func) = &block.func_name else {
                continue;
            };
            let id = format!("{}.{}", module.name, func);
            let file = format!("{id}.md");
            let out_path = out_dir.join(&file);
            fs::write(&out_path, markdown::render_block(block, module))
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            snippets.push(GeneratedSnippet {
                id,
                file,
                module: module.name.clone(),
                func: func.clone(),
            });
        }
    }

    Ok(snippets)
}

/// Write one page per module that documents at least one function.
/// Returns the written file names.
pub fn write_module_pages(modules: &[Module], out_dir: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;

    let mut written = Vec::new();
    for module in modules {
        if !module.blocks.iter().any(|b| b.func_name.is_some()) {
            continue;
        }
        let file = format!("{}.md", module.name);
        let out_path = out_dir.join(&file);
        fs::write(&out_path, markdown::render_module_page(module))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        written.push(file);
    }

    Ok(written)
}
