//! lua2md — generate Markdown reference docs from annotated Lua modules.
//!
//! Two front-ends feed one rendering model:
//!
//! - **comment scanner** (default): reads `---` doc comments directly
//! - **`--luals`**: reshapes the lua-language-server documentation export
//!
//! Without `-o`, rendered units stream to stdout separated by `---` rules.

use anyhow::{bail, Result};
use clap::Parser;
use lua2md::parser::{luals, scan};
use lua2md::render::markdown;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lua2md",
    about = "Generate Markdown reference docs from annotated Lua modules"
)]
struct Cli {
    /// Root directory containing Lua sources
    root: PathBuf,

    /// Output directory. If omitted, rendered docs stream to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Consume the lua-language-server documentation export instead of
    /// scanning doc comments directly
    #[arg(long)]
    luals: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.luals {
        luals_mode(&cli)
    } else {
        scan_mode(&cli)
    }
}

/// Front-end A: scan doc comments.
fn scan_mode(cli: &Cli) -> Result<()> {
    let Some(out_dir) = &cli.output else {
        let modules = scan::discover(&cli.root)?;
        if modules.is_empty() {
            bail!("no documented Lua modules found under {}", cli.root.display());
        }
        let mut printed = false;
        for module in &modules {
            for block in &module.blocks {
                if block.func_name.is_none() {
                    continue;
                }
                print!("{}", markdown::render_block(block, module));
                print!("\n---\n\n");
                printed = true;
            }
        }
        if !printed {
            bail!("no documented functions found under {}", cli.root.display());
        }
        return Ok(());
    };

    let snippets = lua2md::generate_docs(&cli.root, out_dir)?;
    for snippet in &snippets {
        eprintln!("  wrote {}", out_dir.join(&snippet.file).display());
    }
    Ok(())
}

/// Front-end B: reshape the lua-language-server export.
///
/// The export runs and is validated before any output path is touched, so a
/// tool failure leaves no partial output directory behind.
fn luals_mode(cli: &Cli) -> Result<()> {
    let modules = luals::load_modules(&cli.root)?;
    if modules.is_empty() {
        bail!("no documented Lua modules found under {}", cli.root.display());
    }

    let Some(out_dir) = &cli.output else {
        let mut printed = false;
        for module in &modules {
            if !module.blocks.iter().any(|b| b.func_name.is_some()) {
                continue;
            }
            print!("{}", markdown::render_module_page(module));
            print!("\n---\n\n");
            printed = true;
        }
        if !printed {
            bail!("no documented functions found under {}", cli.root.display());
        }
        return Ok(());
    };

    let written = lua2md::write_module_pages(&modules, out_dir)?;
    if written.is_empty() {
        bail!("no documented functions found under {}", cli.root.display());
    }
    for file in &written {
        eprintln!("  wrote {}", out_dir.join(file).display());
    }
    Ok(())
}
