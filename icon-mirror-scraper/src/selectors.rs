//! Extraction rules for listing and detail pages.
//!
//! Each rule is a CSS selector from [`Selectors`]. They are compiled once per
//! run; extraction works on the page text and returns owned values so no
//! parsed document is ever held across an await point.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::StructureError;
use crate::settings::Selectors;

/// One result row from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub name: String,
    pub detail_path: String,
}

/// [`Selectors`] compiled for use with `scraper`.
#[derive(Debug)]
pub struct CompiledSelectors {
    results_table: Selector,
    row: Selector,
    row_link: Selector,
    last_page_link: Selector,
    item_image: Selector,
}

impl CompiledSelectors {
    pub fn compile(selectors: &Selectors) -> Result<Self, StructureError> {
        Ok(Self {
            results_table: compile_rule("results_table", &selectors.results_table)?,
            row: compile_rule("row", &selectors.row)?,
            row_link: compile_rule("row_link", &selectors.row_link)?,
            last_page_link: compile_rule("last_page_link", &selectors.last_page_link)?,
            item_image: compile_rule("item_image", &selectors.item_image)?,
        })
    }

    /// Target of the pager's "last page" anchor.
    pub fn last_page_href(&self, html: &str, page_url: &Url) -> Result<String, StructureError> {
        let doc = Html::parse_document(html);
        doc.select(&self.last_page_link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
            .ok_or_else(|| StructureError::MissingLastPageLink {
                url: page_url.to_string(),
            })
    }

    /// Every row of the results table, in document order.
    pub fn listing_rows(
        &self,
        html: &str,
        page_url: &Url,
    ) -> Result<Vec<ListingRow>, StructureError> {
        let doc = Html::parse_document(html);
        let table = doc.select(&self.results_table).next().ok_or_else(|| {
            StructureError::MissingResultsTable {
                url: page_url.to_string(),
                document: html.to_string(),
            }
        })?;

        table
            .select(&self.row)
            .enumerate()
            .map(|(index, row)| {
                self.row_entry(row).ok_or_else(|| StructureError::MissingRowLink {
                    url: page_url.to_string(),
                    row: index,
                })
            })
            .collect()
    }

    fn row_entry(&self, row: ElementRef<'_>) -> Option<ListingRow> {
        let link = row.select(&self.row_link).next()?;
        let detail_path = link.value().attr("href")?.to_string();
        let name = link.text().collect::<String>().trim().to_string();
        Some(ListingRow { name, detail_path })
    }

    /// Absolute URL of the item icon on a detail page.
    pub fn image_url(&self, html: &str, page_url: &Url) -> Result<Url, StructureError> {
        let doc = Html::parse_document(html);
        let missing = || StructureError::MissingImage {
            url: page_url.to_string(),
        };

        let src = doc
            .select(&self.item_image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .ok_or_else(missing)?;

        page_url.join(src).map_err(|_| missing())
    }
}

fn compile_rule(rule: &'static str, selector: &str) -> Result<Selector, StructureError> {
    Selector::parse(selector).map_err(|e| StructureError::InvalidSelector {
        rule,
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

/// Parse the `page` query parameter out of a pager link.
///
/// Only the leading digits are used, so `page=042` and `page=42abc` both
/// give 42.
pub fn page_number_from_href(href: &str, page_url: &Url) -> Result<u32, StructureError> {
    let bad = || StructureError::BadPageNumber {
        href: href.to_string(),
    };

    let target = page_url.join(href).map_err(|_| bad())?;
    let value = target
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(bad)?;

    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u32>().map_err(|_| bad())
}

#[cfg(test)]
#[path = "tests/selectors_tests.rs"]
mod tests;
