use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use selectors::Element;

use crate::error::ScrapeError;

/// One rule of the field table: the visible label marker that introduces a
/// value block, and the record field it feeds (used in error reports).
#[derive(Clone, Copy, Debug)]
pub(super) struct Label {
    pub marker: &'static str,
    pub field: &'static str,
}

pub(super) const NAME: Label = Label {
    marker: "Card Name:",
    field: "name",
};
pub(super) const MANA_COST: Label = Label {
    marker: "Mana Cost:",
    field: "mana_cost",
};
pub(super) const CONVERTED_COST: Label = Label {
    marker: "Converted Mana Cost:",
    field: "converted_cost",
};
pub(super) const TYPES: Label = Label {
    marker: "Types:",
    field: "types",
};
pub(super) const POWER_TOUGHNESS: Label = Label {
    marker: "P/T:",
    field: "power_toughness",
};
pub(super) const LOYALTY: Label = Label {
    marker: "Loyalty:",
    field: "loyalty",
};
pub(super) const COLOR_INDICATOR: Label = Label {
    marker: "Color Indicator:",
    field: "color_indicator",
};
pub(super) const RARITY: Label = Label {
    marker: "Rarity:",
    field: "rarity",
};

/// Finds the value container of a labeled row: the first `div.label` whose
/// trimmed text equals the marker, then its next sibling element.
pub(super) fn labeled_value<'a>(doc: &'a Html, marker: &str) -> Option<ElementRef<'a>> {
    let label_selector = Selector::parse("div.label").unwrap();
    doc.select(&label_selector)
        .find(|label| element_text(*label) == marker)
        .and_then(|label| label.next_sibling_element())
}

pub(super) fn required_text(doc: &Html, label: Label) -> Result<String, ScrapeError> {
    optional_text(doc, label).ok_or(ScrapeError::MalformedPage { field: label.field })
}

pub(super) fn optional_text(doc: &Html, label: Label) -> Option<String> {
    labeled_value(doc, label.marker).map(element_text)
}

pub(super) fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// The marker of a row element, read from its `div.label` child.
pub(super) fn row_label(row: ElementRef) -> Option<String> {
    let label_selector = Selector::parse("div.label").unwrap();
    row.select(&label_selector).next().map(element_text)
}

pub(super) fn row_value(row: ElementRef) -> Option<ElementRef> {
    let value_selector = Selector::parse("div.value").unwrap();
    row.select(&value_selector).next()
}

/// Ordered symbol tokens of a mana-cost value block, one per embedded
/// symbol image.
pub(super) fn symbol_tokens(value: ElementRef) -> Vec<String> {
    let img_selector = Selector::parse("img").unwrap();
    value
        .select(&img_selector)
        .filter_map(|img| img.value().attr("src").and_then(symbol_name))
        .collect()
}

/// The symbol name carried by an image reference, e.g. "W" out of
/// `Image.ashx?size=medium&name=W&type=symbol`.
pub(super) fn symbol_name(src: &str) -> Option<String> {
    let name_re = Regex::new(r"[?&]name=([^&]+)").unwrap();
    name_re.captures(src).map(|caps| caps[1].to_string())
}
