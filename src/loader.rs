//! Recipe file discovery and the line-based text formats
//!
//! Recipe definitions live in `.txt` files under a directory tree, as
//! repeating blocks:
//!
//! ```text
//! <amount> <produced item name>
//! <N>
//! <amount> <material item name>      (N times)
//! ```
//!
//! Blank lines between blocks are ignored. Files concatenate logically, so
//! recipes for one item may be spread across files.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::error::ParseError;
use crate::models::{Recipe, RecipeIndex, Stack};

/// Find every `.txt` file under `dir`, recursively. Paths are sorted so the
/// index is built in the same order on every run.
pub fn find_recipe_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    files
}

/// Parse one file's worth of recipe blocks into `index`.
///
/// Any malformed block aborts the whole parse; a partially built index is
/// never returned to the caller.
pub fn parse_recipe_blocks(text: &str, index: &mut RecipeIndex) -> Result<(), ParseError> {
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }
        let header = Stack::parse(line)?;

        let count_line = lines.next().unwrap_or("").trim();
        let declared: usize = count_line
            .parse()
            .map_err(|_| ParseError::InvalidCount(count_line.to_string()))?;

        let mut recipe = Recipe::new(header.amount);
        for found in 0..declared {
            let material_line = lines.next().ok_or_else(|| ParseError::TruncatedBlock {
                item: header.item.clone(),
                declared,
                found,
            })?;
            recipe.add_material(Stack::parse(material_line)?);
        }
        index.add(header.item, recipe);
    }
    Ok(())
}

/// Build the recipe index from every `.txt` file under `dir`.
pub fn load_recipes(dir: &Path) -> Result<RecipeIndex> {
    let mut index = RecipeIndex::default();
    for path in find_recipe_files(dir) {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_recipe_blocks(&text, &mut index)
            .with_context(|| format!("malformed recipe file {}", path.display()))?;
    }
    index.sort_recipes();
    Ok(index)
}

/// Parse target-quantity lines. Duplicate items across lines sum their
/// amounts.
pub fn parse_targets(text: &str) -> Result<BTreeMap<String, i64>, ParseError> {
    let mut targets = BTreeMap::new();
    for line in text.lines() {
        let stack = Stack::parse(line)?;
        *targets.entry(stack.item).or_insert(0) += stack.amount;
    }
    Ok(targets)
}

/// Write one `<amount> <item>` line per raw resource, in the mapping's
/// iteration order.
pub fn write_results<W: Write>(
    writer: &mut W,
    results: &BTreeMap<String, i64>,
) -> std::io::Result<()> {
    for (item, amount) in results {
        writeln!(writer, "{} {}", amount, item)?;
    }
    Ok(())
}
