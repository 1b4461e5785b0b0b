use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::model::{NutritionFacts, NutritionInfo};

/// Label of the table row preceding the per-100g calorie figure on the
/// source pages.
const PER_100G_LABEL: &str = "100 г блюда";

/// Pull nutrition facts out of a recipe page.
///
/// Source pages mark nutrition with schema.org microdata: a container with
/// `itemprop="nutrition"` holding one `<strong>` per scalar field. Every
/// field is optional on its own; a page without the container yields
/// `Unavailable`.
pub fn parse_nutrition(document: &Html) -> NutritionInfo {
    let block_selector = Selector::parse("[itemprop='nutrition']").unwrap();
    let Some(block) = document.select(&block_selector).next() else {
        debug!("No nutrition block in document");
        return NutritionInfo::Unavailable;
    };

    NutritionInfo::Found(NutritionFacts {
        calories: itemprop_text(block, "calories"),
        proteins: itemprop_text(block, "proteinContent"),
        fats: itemprop_text(block, "fatContent"),
        carbs: itemprop_text(block, "carbohydrateContent"),
        calories_per_100g: per_100g_calories(block),
    })
}

fn itemprop_text(block: ElementRef, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!("strong[itemprop='{prop}']")).unwrap();
    block.select(&selector).next().map(element_text)
}

/// The per-100g figure sits in the table row after the one labelled
/// `100 г блюда`: find the label, walk up to its `<tr>`, then read the first
/// `<strong>` of the next row.
fn per_100g_calories(block: ElementRef) -> Option<String> {
    let strong_selector = Selector::parse("strong").unwrap();

    let label = block
        .select(&strong_selector)
        .find(|el| element_text(*el) == PER_100G_LABEL)?;
    let row = label
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")?;
    let next_row = row
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")?;

    next_row.select(&strong_selector).next().map(element_text)
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<Vec<_>>().join(" ").trim().to_string()
}
