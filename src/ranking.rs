use std::collections::HashSet;

use crate::dataset::Dataset;
use crate::model::Recipe;

/// How many ranked recipes a lookup returns.
pub const TOP_RECIPES: usize = 5;

/// Per-request match metadata for one recipe. Computed fresh on every call;
/// the dataset itself is never touched.
#[derive(Debug, Clone)]
pub struct RecipeMatch<'a> {
    pub recipe: &'a Recipe,
    /// Ingredients shared between the recipe and the user's set.
    pub matches: usize,
    /// The recipe's ingredient set equals the user's set, no extras either way.
    pub exact: bool,
    /// Recipe ingredients the user does not have.
    pub difference: usize,
}

impl RecipeMatch<'_> {
    pub fn match_info(&self) -> String {
        format!(
            "{} of {} ingredients",
            self.matches,
            self.recipe.ingredients.len()
        )
    }
}

/// Score every recipe against the user's ingredient set and return the best
/// `limit` in rank order.
///
/// Sort precedence: exact matches first, then match count descending, then
/// fewest unmatched recipe ingredients. Full ties keep dataset order, so
/// identical input always produces identical output.
pub fn rank<'a>(
    dataset: &'a Dataset,
    user_ingredients: &HashSet<String>,
    limit: usize,
) -> Vec<RecipeMatch<'a>> {
    let mut scored: Vec<RecipeMatch<'a>> = dataset
        .recipes()
        .iter()
        .map(|recipe| score(recipe, user_ingredients))
        .collect();

    // Vec::sort_by is stable, which is what keeps tie order deterministic.
    scored.sort_by(|a, b| {
        b.exact
            .cmp(&a.exact)
            .then(b.matches.cmp(&a.matches))
            .then(a.difference.cmp(&b.difference))
    });
    scored.truncate(limit);

    scored
}

fn score<'a>(recipe: &'a Recipe, user_ingredients: &HashSet<String>) -> RecipeMatch<'a> {
    let matches = recipe
        .ingredients
        .keys()
        .filter(|name| user_ingredients.contains(name.as_str()))
        .count();

    // Equal intersection and equal sizes means equal sets.
    let exact = matches == user_ingredients.len() && recipe.ingredients.len() == matches;

    RecipeMatch {
        recipe,
        matches,
        exact,
        difference: recipe.ingredients.len() - matches,
    }
}
