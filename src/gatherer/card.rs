use std::ops::Deref;
use std::str::FromStr;

use ego_tree::NodeRef;
use itertools::Itertools;
use scraper::{ElementRef, Html, Node, Selector};
use selectors::Element;
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::error::ScrapeError;
use crate::gatherer::extractors::{
    element_text, labeled_value, optional_text, required_text, row_label, row_value, symbol_name,
    symbol_tokens, COLOR_INDICATOR, CONVERTED_COST, LOYALTY, MANA_COST, NAME, POWER_TOUGHNESS,
    RARITY, TYPES,
};
use crate::gatherer::urls;

const COLORLESS: &str = "colorless";
const MULTIPART_MARKER: &str = "This is one part of the multi-part card";

/// One extracted card printing. Built once per page and never updated in place.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub source_url: String,
    pub multiverse_id: u64,
    pub image_url: String,
    pub name: String,
    pub mana_cost: Option<Vec<String>>,
    pub converted_cost: u32,
    pub types: String,
    pub oracle_text: String,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub color_indicator: Option<ColorIndicator>,
    pub rarity: String,
    pub colors: Vec<String>,
}

/// Explicit color annotation on the page; authoritative over the mana cost.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, EnumString)]
pub enum ColorIndicator {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl ColorIndicator {
    fn code(self) -> char {
        match self {
            ColorIndicator::White => 'W',
            ColorIndicator::Blue => 'U',
            ColorIndicator::Black => 'B',
            ColorIndicator::Red => 'R',
            ColorIndicator::Green => 'G',
        }
    }
}

/// Assembles the full record for one card-detail page. Any missing required
/// block fails the whole extraction; no partial record is ever returned.
pub(super) fn extract_card(url: &str, markup: &str) -> Result<CardRecord, ScrapeError> {
    let multiverse_id = urls::multiverse_id(url)?;
    log::trace!("extracting card {multiverse_id} from {url}");
    let doc = Html::parse_document(markup);

    let name = required_text(&doc, NAME)?;
    let mana_cost = mana_cost(&doc, &name);
    let converted_cost = converted_cost(&doc)?;
    let (power, toughness) = power_toughness(&doc)?;
    let color_indicator = color_indicator(&doc)?;
    let colors = resolve_colors(color_indicator, mana_cost.as_deref());

    Ok(CardRecord {
        source_url: url.to_string(),
        multiverse_id,
        image_url: urls::image_url(multiverse_id),
        name,
        mana_cost,
        converted_cost,
        types: required_text(&doc, TYPES)?,
        oracle_text: oracle_text(&doc),
        power,
        toughness,
        loyalty: optional_text(&doc, LOYALTY),
        color_indicator,
        rarity: required_text(&doc, RARITY)?,
        colors,
    })
}

/// Double-faced cards summarize both faces on one page, but only the front
/// carries a cost. The cost must come from the name block matching the
/// primary displayed name, never from another block elsewhere on the page.
/// Multi-part halves render one cost block each, extracted directly.
fn mana_cost(doc: &Html, primary_name: &str) -> Option<Vec<String>> {
    if is_multipart(doc) {
        log::trace!("multi-part page, taking the lone cost block");
        return labeled_value(doc, MANA_COST.marker)
            .map(symbol_tokens)
            .filter(|tokens| !tokens.is_empty());
    }

    let label_selector = Selector::parse("div.label").unwrap();
    let name_label = doc.select(&label_selector).find(|label| {
        element_text(*label) == NAME.marker
            && label
                .next_sibling_element()
                .map_or(false, |value| element_text(value) == primary_name)
    })?;

    cost_following(name_label.parent_element()?)
}

/// The cost row adjacent to a matched name row, if any. The walk stops at the
/// next name row so a back face never picks up the front face's cost.
fn cost_following(name_row: ElementRef) -> Option<Vec<String>> {
    let mut next = name_row.next_sibling_element();
    while let Some(row) = next {
        match row_label(row) {
            Some(label) if label == MANA_COST.marker => {
                return row_value(row)
                    .map(symbol_tokens)
                    .filter(|tokens| !tokens.is_empty());
            }
            Some(label) if label == NAME.marker => return None,
            _ => next = row.next_sibling_element(),
        }
    }
    None
}

fn is_multipart(doc: &Html) -> bool {
    doc.root_element()
        .text()
        .any(|chunk| chunk.contains(MULTIPART_MARKER))
}

fn converted_cost(doc: &Html) -> Result<u32, ScrapeError> {
    match optional_text(doc, CONVERTED_COST) {
        Some(raw) => raw.parse().map_err(|_| ScrapeError::MalformedPage {
            field: CONVERTED_COST.field,
        }),
        None => Ok(0),
    }
}

/// Rules paragraphs in document order, joined by newlines. Symbol images
/// render as `{name}`, so "{T}: Add {R}." survives the markup strip.
fn oracle_text(doc: &Html) -> String {
    let block_selector = Selector::parse("div.cardtextbox").unwrap();
    doc.select(&block_selector)
        .map(|block| {
            let mut text = String::new();
            collect_visible(*block, &mut text);
            text.trim().to_string()
        })
        .join("\n")
}

fn collect_visible(node: NodeRef<Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text.deref()),
        Node::Element(element) if element.name() == "img" => {
            if let Some(symbol) = element.attr("src").and_then(symbol_name) {
                out.push('{');
                out.push_str(&symbol);
                out.push('}');
            }
        }
        _ => {
            for child in node.children() {
                collect_visible(child, out);
            }
        }
    }
}

fn power_toughness(doc: &Html) -> Result<(Option<String>, Option<String>), ScrapeError> {
    let raw = match optional_text(doc, POWER_TOUGHNESS) {
        Some(raw) => raw,
        None => return Ok((None, None)),
    };
    let (power, toughness) = raw.split_once('/').ok_or(ScrapeError::MalformedPage {
        field: POWER_TOUGHNESS.field,
    })?;
    Ok((
        Some(power.trim().to_string()),
        Some(toughness.trim().to_string()),
    ))
}

fn color_indicator(doc: &Html) -> Result<Option<ColorIndicator>, ScrapeError> {
    optional_text(doc, COLOR_INDICATOR)
        .map(|raw| {
            ColorIndicator::from_str(&raw)
                .map_err(|_| ScrapeError::UnknownColorIndicator { value: raw })
        })
        .transpose()
}

/// Indicator first; otherwise scan the cost tokens for color letters; a card
/// with neither signal is colorless. The letter scan is a substring match
/// inside each token, so special symbol names containing one of u/b/r/g/w
/// also register.
fn resolve_colors(indicator: Option<ColorIndicator>, mana_cost: Option<&[String]>) -> Vec<String> {
    if let Some(indicator) = indicator {
        return vec![indicator.code().to_string()];
    }

    let from_cost: Vec<String> = mana_cost
        .into_iter()
        .flatten()
        .flat_map(|token| token.chars())
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| matches!(c, 'W' | 'U' | 'B' | 'R' | 'G'))
        .unique()
        .map(String::from)
        .collect();

    if from_cost.is_empty() {
        vec![COLORLESS.to_string()]
    } else {
        from_cost
    }
}
