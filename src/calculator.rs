//! Resource-expansion engine
//!
//! Repeatedly substitutes producible items with the materials of their
//! best-ranked recipes until only raw items remain.

use std::collections::BTreeMap;

use crate::error::ExpandError;
use crate::models::RecipeIndex;

/// Substitution budget before a run is assumed to be cyclic.
pub const DEFAULT_MAX_PASSES: usize = 10_000;

/// Reduce `targets` to raw resource quantities.
///
/// Each pass snapshots the mapping, picks the first item that still has a
/// recipe, replaces it with the materials needed to cover its quantity, and
/// restarts. The fixpoint is reached when a pass changes nothing, which
/// leaves only items the index knows no recipe for.
///
/// Covering is greedy: recipes are tried best-ranked first, each applied as
/// many whole times as the remaining quantity allows. A recipe is never
/// applied partially; whatever remainder no recipe fits exactly is covered
/// by one extra full application of the lowest-ranked recipe, deliberately
/// over-producing instead of leaving a fraction.
///
/// A cyclic recipe graph never converges; after `max_passes` substitutions
/// the run fails with [`ExpandError::NonTerminating`].
pub fn expand(
    index: &RecipeIndex,
    targets: BTreeMap<String, i64>,
    max_passes: usize,
) -> Result<BTreeMap<String, i64>, ExpandError> {
    let mut required = targets;
    let mut passes = 0usize;

    loop {
        let snapshot = required.clone();
        let producible = snapshot.iter().find_map(|(item, amount)| {
            index
                .recipes_for(item)
                .map(|recipes| (item, *amount, recipes))
        });
        let Some((item, amount, recipes)) = producible else {
            // Every remaining item is raw.
            break;
        };

        if passes >= max_passes {
            return Err(ExpandError::NonTerminating { passes });
        }
        passes += 1;

        let mut remaining = amount;
        let mut expansion: BTreeMap<String, i64> = BTreeMap::new();

        for recipe in recipes {
            if remaining <= 0 {
                break;
            }
            // A non-positive batch size can never cover anything.
            if recipe.batch_amount <= 0 {
                continue;
            }
            let applications = remaining / recipe.batch_amount;
            if applications > 0 {
                remaining -= applications * recipe.batch_amount;
                for material in &recipe.materials {
                    *expansion.entry(material.item.clone()).or_insert(0) +=
                        material.amount * applications;
                }
            }
        }

        // Leftover that no batch size fits exactly: round up with one extra
        // application of the lowest-ranked recipe.
        if remaining > 0 {
            if let Some(last) = recipes.last() {
                for material in &last.materials {
                    *expansion.entry(material.item.clone()).or_insert(0) += material.amount;
                }
            }
        }

        required.remove(item);
        for (material, amount) in expansion {
            *required.entry(material).or_insert(0) += amount;
        }

        // A substitution that reproduces the snapshot exactly would loop
        // forever without making progress.
        if required == snapshot {
            break;
        }
    }

    Ok(required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Recipe, Stack};

    fn recipe(batch: i64, materials: &[(&str, i64)]) -> Recipe {
        let mut r = Recipe::new(batch);
        for (item, amount) in materials {
            r.add_material(Stack {
                item: item.to_string(),
                amount: *amount,
            });
        }
        r
    }

    fn targets(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries
            .iter()
            .map(|(item, amount)| (item.to_string(), *amount))
            .collect()
    }

    fn expand_ok(index: &RecipeIndex, t: &[(&str, i64)]) -> BTreeMap<String, i64> {
        expand(index, targets(t), DEFAULT_MAX_PASSES).unwrap()
    }

    #[test]
    fn raw_targets_pass_through_unchanged() {
        let index = RecipeIndex::default();
        let result = expand_ok(&index, &[("Log", 7), ("Stone", 3)]);
        assert_eq!(result, targets(&[("Log", 7), ("Stone", 3)]));
    }

    #[test]
    fn exact_coverage_uses_whole_applications_only() {
        let mut index = RecipeIndex::default();
        index.add("Plank", recipe(4, &[("Log", 1)]));
        index.sort_recipes();

        // 8 planks = exactly 2 batches.
        let result = expand_ok(&index, &[("Plank", 8)]);
        assert_eq!(result, targets(&[("Log", 2)]));
    }

    #[test]
    fn leftover_rounds_up_with_one_extra_batch() {
        let mut index = RecipeIndex::default();
        index.add("Plank", recipe(4, &[("Log", 1)]));
        index.sort_recipes();

        // 10 planks: 2 batches cover 8, the remainder of 2 costs a third
        // full batch.
        let result = expand_ok(&index, &[("Plank", 10)]);
        assert_eq!(result, targets(&[("Log", 3)]));
    }

    #[test]
    fn larger_batches_are_consumed_before_smaller_ones() {
        let mut index = RecipeIndex::default();
        index.add("Gear", recipe(1, &[("Ore", 1)]));
        index.add("Gear", recipe(10, &[("Ore", 2)]));
        index.sort_recipes();

        // 25 gears: 2x batch-10 (4 ore) then 5x batch-1 (5 ore). The
        // reverse preference would cost 25 ore.
        let result = expand_ok(&index, &[("Gear", 25)]);
        assert_eq!(result, targets(&[("Ore", 9)]));
    }

    #[test]
    fn remainder_smaller_than_every_batch_uses_last_recipe() {
        let mut index = RecipeIndex::default();
        index.add("Panel", recipe(4, &[("Glass", 1)]));
        index.add("Panel", recipe(3, &[("Board", 1)]));
        index.sort_recipes();

        // 2 panels fit no batch; the lowest-ranked (batch-3) recipe covers
        // the whole leftover once.
        let result = expand_ok(&index, &[("Panel", 2)]);
        assert_eq!(result, targets(&[("Board", 1)]));
    }

    #[test]
    fn shared_intermediate_merges_before_its_own_expansion() {
        let mut index = RecipeIndex::default();
        index.add("Chair", recipe(1, &[("Plank", 2)]));
        index.add("Table", recipe(1, &[("Plank", 3)]));
        index.add("Plank", recipe(1, &[("Log", 1)]));
        index.sort_recipes();

        // Both paths contribute planks before planks themselves expand.
        let result = expand_ok(&index, &[("Chair", 1), ("Table", 1)]);
        assert_eq!(result, targets(&[("Log", 5)]));
    }

    #[test]
    fn multi_level_expansion_reaches_raw_items() {
        let mut index = RecipeIndex::default();
        index.add("Circuit", recipe(1, &[("Wire", 3), ("Board", 1)]));
        index.add("Wire", recipe(2, &[("Copper", 1)]));
        index.sort_recipes();

        // 3 wires: one batch covers 2, the remainder costs another batch.
        let result = expand_ok(&index, &[("Circuit", 1)]);
        assert_eq!(result, targets(&[("Board", 1), ("Copper", 2)]));
    }

    #[test]
    fn zero_quantity_target_is_dropped_without_materials() {
        let mut index = RecipeIndex::default();
        index.add("Plank", recipe(4, &[("Log", 1)]));
        index.sort_recipes();

        let result = expand_ok(&index, &[("Plank", 0)]);
        assert!(result.is_empty());
    }

    #[test]
    fn negative_quantity_target_is_dropped_without_materials() {
        let mut index = RecipeIndex::default();
        index.add("Plank", recipe(4, &[("Log", 1)]));
        index.sort_recipes();

        let result = expand_ok(&index, &[("Plank", -3), ("Log", 1)]);
        assert_eq!(result, targets(&[("Log", 1)]));
    }

    #[test]
    fn expansion_is_deterministic() {
        let mut index = RecipeIndex::default();
        index.add("Chair", recipe(1, &[("Plank", 2), ("Nail", 4)]));
        index.add("Plank", recipe(4, &[("Log", 1)]));
        index.add("Nail", recipe(10, &[("Iron Ingot", 1)]));
        index.sort_recipes();

        let first = expand_ok(&index, &[("Chair", 3)]);
        let second = expand_ok(&index, &[("Chair", 3)]);
        let pairs: Vec<_> = first.iter().collect();
        let again: Vec<_> = second.iter().collect();
        assert_eq!(pairs, again);
    }

    #[test]
    fn cyclic_recipes_fail_instead_of_spinning() {
        let mut index = RecipeIndex::default();
        index.add("A", recipe(1, &[("B", 1)]));
        index.add("B", recipe(1, &[("A", 1)]));
        index.sort_recipes();

        let err = expand(&index, targets(&[("A", 1)]), 50).unwrap_err();
        assert_eq!(err, ExpandError::NonTerminating { passes: 50 });
    }

    #[test]
    fn self_recipe_reaching_a_stable_mapping_terminates() {
        let mut index = RecipeIndex::default();
        index.add("Ouroboros", recipe(1, &[("Ouroboros", 1)]));
        index.sort_recipes();

        // The substitution reproduces the mapping exactly, which is a
        // fixpoint even though the item is not raw.
        let result = expand_ok(&index, &[("Ouroboros", 2)]);
        assert_eq!(result, targets(&[("Ouroboros", 2)]));
    }
}
