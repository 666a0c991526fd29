//! Value types for material stacks and recipes

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::ParseError;

/// An item identifier paired with a quantity.
///
/// Item names are opaque strings and may contain internal spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    pub item: String,
    pub amount: i64,
}

impl Stack {
    /// Parse a `"<amount> <item name>"` line. Everything after the first
    /// token belongs to the item name; internal runs of whitespace are
    /// collapsed to single spaces.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut tokens = input.split_whitespace();
        let first = tokens.next().ok_or(ParseError::EmptyLine)?;
        let amount: i64 = first
            .parse()
            .map_err(|_| ParseError::InvalidAmount(first.to_string()))?;
        let item = tokens.collect::<Vec<_>>().join(" ");
        if item.is_empty() {
            return Err(ParseError::MissingItem(first.to_string()));
        }
        Ok(Self { item, amount })
    }
}

/// A rule producing `batch_amount` units of one item from a fixed list of
/// material stacks.
///
/// Materials keep declaration order, and a repeated item stays a separate
/// entry rather than being merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub batch_amount: i64,
    pub materials: Vec<Stack>,
    pub total_materials: i64,
}

impl Recipe {
    pub fn new(batch_amount: i64) -> Self {
        Self {
            batch_amount,
            materials: Vec::new(),
            total_materials: 0,
        }
    }

    pub fn add_material(&mut self, material: Stack) {
        self.total_materials += material.amount;
        self.materials.push(material);
    }

    /// Ranking for alternative recipes of one item: larger batches first,
    /// then fewer material lines, then lower total material cost. Remaining
    /// ties keep input order (the sort is stable).
    pub fn priority(&self, other: &Self) -> Ordering {
        other
            .batch_amount
            .cmp(&self.batch_amount)
            .then(self.materials.len().cmp(&other.materials.len()))
            .then(self.total_materials.cmp(&other.total_materials))
    }
}

/// Per-item lists of alternative recipes, best-ranked first.
///
/// An item with no entry (or an empty list) is raw: expansion cannot reduce
/// it further.
#[derive(Debug, Default)]
pub struct RecipeIndex {
    recipes: HashMap<String, Vec<Recipe>>,
}

impl RecipeIndex {
    pub fn add(&mut self, item: impl Into<String>, recipe: Recipe) {
        self.recipes.entry(item.into()).or_default().push(recipe);
    }

    /// Sort every item's list by [`Recipe::priority`]. Call once after all
    /// definitions are loaded; lookups assume sorted lists.
    pub fn sort_recipes(&mut self) {
        for list in self.recipes.values_mut() {
            list.sort_by(|a, b| a.priority(b));
        }
    }

    pub fn recipes_for(&self, item: &str) -> Option<&[Recipe]> {
        self.recipes
            .get(item)
            .filter(|list| !list.is_empty())
            .map(Vec::as_slice)
    }

    /// Total number of recipes across all items.
    pub fn len(&self) -> usize {
        self.recipes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.values().all(Vec::is_empty)
    }
}
