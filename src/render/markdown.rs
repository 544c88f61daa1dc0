//! Snippet and page renderers.
//!
//! `render_block` emits one function's documentation as an includable
//! snippet (no page title); `render_module_page` emits a whole module page.
//! Both are pure functions of the model — identical input, identical output.

use crate::model::{DocBlock, Module};
use crate::render::{escape_cell, push_field_table};

/// Render a single function's doc block as an includable snippet.
pub fn render_block(block: &DocBlock, module: &Module) -> String {
    let mut out: Vec<String> = Vec::new();

    if let Some(name) = &block.func_name {
        out.push(format!("### `{}({})`", name, param_names(block)));
        out.push(String::new());
    }

    push_block_body(&mut out, block, module);
    out.join("\n")
}

/// Render a whole module as one page, one `##` section per function.
pub fn render_module_page(module: &Module) -> String {
    let mut out: Vec<String> = Vec::new();
    out.push(format!("# {}", module.name));
    out.push(String::new());

    for block in &module.blocks {
        let Some(name) = &block.func_name else {
            continue;
        };
        out.push(format!("## {}({})", name, param_names(block)));
        out.push(String::new());
        push_block_body(&mut out, block, module);
    }

    out.join("\n")
}

fn param_names(block: &DocBlock) -> String {
    block
        .params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_block_body(out: &mut Vec<String>, block: &DocBlock, module: &Module) {
    let summary = block.summary.join(" ").trim().to_string();
    if !summary.is_empty() {
        out.push(summary);
        out.push(String::new());
    }

    for param in &block.params {
        // A parameter typed as a documented class expands into its field
        // table instead of the generic one-row parameter table.
        if let Some(class) = module.classes.get(&param.ty) {
            out.push(format!(
                "**`{}`** `{}` — {}",
                param.name,
                escape_cell(&param.ty),
                escape_cell(&param.desc)
            ));
            out.push(String::new());
            push_field_table(out, &class.fields);
            out.push(String::new());
        } else {
            out.push("**Parameters:**".to_string());
            out.push(String::new());
            out.push("| Name | Type | Description |".to_string());
            out.push("|------|------|-------------|".to_string());
            out.push(format!(
                "| `{}` | `{}` | {} |",
                param.name,
                escape_cell(&param.ty),
                escape_cell(&param.desc)
            ));
            out.push(String::new());
        }
    }

    if !block.returns.is_empty() {
        out.push("**Returns:** ".to_string());
        out.push(String::new());
        for ret in &block.returns {
            let desc = if ret.desc.is_empty() {
                String::new()
            } else {
                format!(" — {}", ret.desc)
            };
            if let Some(class) = module.classes.get(&ret.ty) {
                out.push(format!("- `{}`{}", escape_cell(&ret.ty), desc));
                out.push(String::new());
                push_field_table(out, &class.fields);
                out.push(String::new());
            } else {
                out.push(format!("- `{}`{}", escape_cell(&ret.ty), desc));
            }
        }
        out.push(String::new());
    }

    if !block.fields.is_empty() {
        out.push("**Fields:**".to_string());
        out.push(String::new());
        push_field_table(out, &block.fields);
        out.push(String::new());
    }

    if !block.usage.is_empty() {
        out.push("**Usage:**".to_string());
        out.push(String::new());
        out.push("```lua".to_string());
        out.extend(block.usage.iter().cloned());
        out.push("```".to_string());
        out.push(String::new());
    }
}
