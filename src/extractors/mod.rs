use crate::error::Result;
use crate::model::RawRecipeRecord;
use scraper::{ElementRef, Html, Selector};

mod chefkoch;

pub use chefkoch::ChefkochExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<RawRecipeRecord>;
}

/// First element matching `css` below `root`
pub(crate) fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let first = root.select(&selector).next();
    first
}

/// All elements matching `css` below `root`
pub(crate) fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Text nodes directly inside an element, ignoring its child elements
pub(crate) fn own_text_nodes(element: ElementRef<'_>) -> Vec<String> {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|text| String::from(&**text)))
        .collect()
}

pub(crate) fn own_text(element: ElementRef<'_>) -> String {
    own_text_nodes(element).concat()
}

/// The element sibling immediately following `element`
pub(crate) fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

pub(crate) fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
