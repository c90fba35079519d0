use crate::error::Result;
use crate::extractors::{
    has_class, next_element, own_text, own_text_nodes, select_all, select_first, Extractor,
    ParsingContext,
};
use crate::model::{Durations, RawIngredient, RawRecipeRecord, Tags};
use crate::text::{clean_html, clean_text};
use log::{debug, warn};
use scraper::ElementRef;
use serde_json::{Map, Value};

/// Extracts recipe records from chefkoch.de recipe pages
pub struct ChefkochExtractor;

fn text_of(root: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(root, css).and_then(|element| clean_text(&element.html()))
}

fn own_text_of(root: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(root, css).and_then(|element| clean_text(&own_text(element)))
}

fn attr_of(root: ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    select_first(root, css)
        .and_then(|element| element.value().attr(attr))
        .map(String::from)
}

impl ChefkochExtractor {
    fn extract_ingredients(root: ElementRef<'_>) -> Vec<RawIngredient> {
        let mut ingredients = Vec::new();
        let mut section: Option<String> = None;

        for row in select_all(root, ".ingredients tr") {
            if let Some(header) = select_first(row, "th") {
                // a header row names the section of the rows below it
                match clean_text(&header.html()) {
                    None => section = None,
                    Some(text) => {
                        let text = text.trim_matches(':');
                        if !text.is_empty() {
                            section = Some(text.to_string());
                        }
                    }
                }
                continue;
            }

            ingredients.push(RawIngredient {
                section: section.clone(),
                amount: text_of(row, "td:first-child"),
                name: text_of(row, "td:last-child"),
                url: attr_of(row, "td:last-child .bi-recipe-ingredient-link", "href"),
            });
        }

        ingredients
    }

    /// Text of the box that follows the "Zubereitung" heading and its meta line
    fn extract_preparation(root: ElementRef<'_>) -> Vec<String> {
        let mut steps = Vec::new();

        for heading in select_all(root, "h2") {
            if !heading.text().any(|text| text.contains("Zubereitung")) {
                continue;
            }
            let Some(meta) = next_element(heading).filter(|e| has_class(*e, "ds-recipe-meta"))
            else {
                continue;
            };
            let Some(body) = next_element(meta).filter(|e| has_class(*e, "ds-box")) else {
                continue;
            };

            for node in body.descendants() {
                let Some(text) = node.value().as_text() else {
                    continue;
                };
                if node.parent().map_or(true, |parent| parent.id() == body.id()) {
                    continue;
                }
                let text = text.trim();
                if !text.is_empty() {
                    steps.push(text.to_string());
                }
            }
        }

        steps
    }

    fn extract_durations(root: ElementRef<'_>) -> Map<String, Value> {
        let mut durations = Map::new();
        for element in select_all(root, ".ds-box > .ds-recipe-meta > *") {
            for line in own_text_nodes(element) {
                // "Arbeitszeit ca. 20 Min." -> label and duration
                if let Some((label, duration)) = line.trim().split_once(' ') {
                    durations.insert(label.to_string(), Value::from(duration));
                }
            }
        }
        durations
    }

    fn extract_tags(root: ElementRef<'_>) -> Vec<String> {
        select_all(root, ".recipe-tags .ds-tag")
            .into_iter()
            .filter_map(|tag| clean_text(&tag.html()))
            .collect()
    }
}

impl Extractor for ChefkochExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<RawRecipeRecord> {
        debug!("Extracting recipe from {}", context.url);
        let root = context.document.root_element();

        let record = RawRecipeRecord {
            url: context.url.clone(),
            url_fingerprint: None,
            name: own_text_of(root, "h1"),
            image_url: attr_of(root, r#"meta[property="og:image"]"#, "content"),
            description: select_first(root, ".recipe-text").and_then(|e| clean_html(&e.html())),
            preparation_time: own_text_of(root, ".recipe-preptime"),
            difficulty: own_text_of(root, ".recipe-difficulty"),
            date: own_text_of(root, ".recipe-date"),
            rating_avg: text_of(root, ".ds-rating-avg strong"),
            rating_count: text_of(root, ".ds-rating-count > span > span:not(.rds-only)"),
            comment_count: text_of(root, ".rds-comment-ctn-btn strong"),
            author_name: attr_of(root, ".recipe-author .bi-profile", "data-vars-bi-username")
                .and_then(|name| clean_text(&name)),
            author_url: attr_of(root, ".recipe-author .bi-profile", "href"),
            portions: attr_of(root, ".recipe-servings input[name=portionen]", "value"),
            ingredients: Self::extract_ingredients(root),
            preparation: Self::extract_preparation(root),
            durations: Some(Durations::Labeled(Self::extract_durations(root))),
            tags: Some(Tags::Items(Self::extract_tags(root))),
        };

        if record.name.is_none() && record.ingredients.is_empty() {
            warn!("No recipe title or ingredients found on {}", context.url);
        }

        debug!(
            "Recipe {:?}: {} ingredients, {} steps",
            record.name,
            record.ingredients.len(),
            record.preparation.len()
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_rows_carry_over() {
        let context = ParsingContext::new(
            "https://www.chefkoch.de/rezepte/5/Test.html",
            r#"<html><body>
            <table class="ingredients">
              <tr><th>Für den Teig:</th></tr>
              <tr><td>200 g</td><td>Mehl</td></tr>
              <tr><td>1</td><td><a class="bi-recipe-ingredient-link" href="/zutat/ei">Ei</a></td></tr>
              <tr><th>:</th></tr>
              <tr><td></td><td>Salz</td></tr>
            </table>
            </body></html>"#,
        );
        let ingredients = ChefkochExtractor::extract_ingredients(context.document.root_element());

        assert_eq!(ingredients.len(), 3);
        assert_eq!(ingredients[0].section.as_deref(), Some("Für den Teig"));
        assert_eq!(ingredients[0].amount.as_deref(), Some("200 g"));
        assert_eq!(ingredients[1].name.as_deref(), Some("Ei"));
        assert_eq!(ingredients[1].url.as_deref(), Some("/zutat/ei"));
        // an empty header keeps the previous section
        assert_eq!(ingredients[2].section.as_deref(), Some("Für den Teig"));
        assert_eq!(ingredients[2].amount.as_deref(), Some(""));
    }

    #[test]
    fn test_page_without_recipe_still_yields_record() {
        let context = ParsingContext::new(
            "https://www.chefkoch.de/rezepte/1/x.html",
            "<html><body><p>Rezept nicht gefunden</p></body></html>",
        );
        let record = ChefkochExtractor.parse(&context).unwrap();
        assert_eq!(record.url, "https://www.chefkoch.de/rezepte/1/x.html");
        assert_eq!(record.name, None);
        assert!(record.ingredients.is_empty());
        assert!(record.preparation.is_empty());
    }
}
