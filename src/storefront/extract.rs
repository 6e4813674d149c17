//! Fragment extractors for a parsed product page.
//!
//! Each extractor pulls one independent fragment; a selector miss returns
//! `None` (or an empty list) and never blocks the other fragments.

use kuchiki::traits::TendrilSink;
use log::debug;
use regex::Regex;
use scraper::Html;
use serde::Serialize;
use std::sync::LazyLock;

use crate::dom;
use crate::storefront::types::{
    AGE_RATING, DESCRIPTION, METACRITIC, POPULAR_TAGS, REVIEW_ROWS, REVIEW_SUMMARY, SYSREQ_BLOCK,
    SYSREQ_CONTENTS,
};

/// `"Very Positive (1,658) - 94% of the 1,658 user reviews..."` →
/// label, count, percent.
static REVIEW_BREAKDOWN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?) \(([\d,]+)\) - (\d+)% of .*$")
        .expect("REVIEW_BREAKDOWN_RE: hardcoded regex is valid")
});

static LOCALE_QUALIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)English Reviews\s*")
        .expect("LOCALE_QUALIFIER_RE: hardcoded regex is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RE: hardcoded regex is valid"));

/// Three or more consecutive `<br>` tags.
static BR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<br\s*/?>\s*){3,}").expect("BR_RUN_RE: hardcoded regex is valid")
});

/// `<br>` runs trailing a closed list or paragraph.
static BR_AFTER_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(</(?:ul|p)>)\s*(?:<br\s*/?>\s*)+")
        .expect("BR_AFTER_CLOSE_RE: hardcoded regex is valid")
});

/// Everything the extractors pulled from one product page.
///
/// Fields are independent: any of them may be absent without affecting the
/// others, and the merger injects only what is present.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedData {
    /// Human-readable review summary, already reformatted.
    pub reviews: Option<String>,
    /// Popular tag labels, "show more" placeholder filtered out.
    pub tags: Vec<String>,
    /// Age-rating block markup, verbatim (restructured later by the merger).
    pub age_rating: Option<String>,
    /// Metascore block markup, verbatim.
    pub metacritic: Option<String>,
    /// System requirements markup, per-platform headings synthesized.
    pub sys_reqs: Option<String>,
    /// Long-form description markup, cleaned up for embedding.
    pub description: Option<String>,
}

impl ExtractedData {
    /// Whether nothing at all was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_none()
            && self.tags.is_empty()
            && self.age_rating.is_none()
            && self.metacritic.is_none()
            && self.sys_reqs.is_none()
            && self.description.is_none()
    }
}

/// Run every extractor over a parsed product page.
#[must_use]
pub fn extract_all(page: &Html) -> ExtractedData {
    let data = ExtractedData {
        reviews: extract_reviews(page),
        tags: extract_tags(page),
        age_rating: extract_age_rating(page),
        metacritic: extract_metacritic(page),
        sys_reqs: extract_sys_reqs(page),
        description: extract_description(page),
    };
    debug!(
        "Extracted fragments: reviews={}, tags={}, age_rating={}, metacritic={}, sys_reqs={}, description={}",
        data.reviews.is_some(),
        data.tags.len(),
        data.age_rating.is_some(),
        data.metacritic.is_some(),
        data.sys_reqs.is_some(),
        data.description.is_some()
    );
    data
}

/// Review summary: prefer the "All Reviews" row, fall back to "Recent
/// Reviews".
#[must_use]
pub fn extract_reviews(page: &Html) -> Option<String> {
    let rows: Vec<_> = page.select(&REVIEW_ROWS).collect();
    let row = rows
        .iter()
        .find(|row| row.text().collect::<String>().contains("All Reviews"))
        .or_else(|| {
            rows.iter()
                .find(|row| row.text().collect::<String>().contains("Recent Reviews"))
        })?;

    let summary = row.select(&REVIEW_SUMMARY).next()?;
    let text = summary.text().collect::<String>();
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = LOCALE_QUALIFIER_RE.replace(text.trim(), "");

    Some(format_review_summary(text.trim()))
}

/// Compact the storefront's review breakdown sentence.
///
/// `"Very Positive (1,658) - 94% of the 1,658 user reviews for this game
/// are positive."` becomes `"Very Positive (94% OF 1,658)"`. Text that does
/// not match the breakdown shape is kept verbatim.
#[must_use]
pub fn format_review_summary(text: &str) -> String {
    match REVIEW_BREAKDOWN_RE.captures(text) {
        Some(caps) => format!("{} ({}% OF {})", &caps[1], &caps[3], &caps[2]),
        None => text.to_string(),
    }
}

/// Popular tag labels. The storefront renders its "show more" affordance as
/// a bare `+` tag, which must be filtered, not treated as a tag.
#[must_use]
pub fn extract_tags(page: &Html) -> Vec<String> {
    page.select(&POPULAR_TAGS)
        .map(|tag| tag.text().collect::<String>().trim().to_string())
        .filter(|tag| !tag.is_empty() && tag != "+")
        .collect()
}

/// Age-rating block, outer markup verbatim.
#[must_use]
pub fn extract_age_rating(page: &Html) -> Option<String> {
    page.select(&AGE_RATING).next().map(|el| el.html())
}

/// Metascore block, outer markup verbatim; `None` when the product has no
/// critic score.
#[must_use]
pub fn extract_metacritic(page: &Html) -> Option<String> {
    page.select(&METACRITIC).next().map(|el| el.html())
}

/// System requirements.
///
/// When the container holds per-platform sub-blocks, each is emitted behind
/// a synthesized heading naming its platform, in document order. Sub-blocks
/// with an unrecognized platform attribute keep their content but get no
/// heading. Without sub-blocks the raw container markup is passed through.
#[must_use]
pub fn extract_sys_reqs(page: &Html) -> Option<String> {
    let container = page.select(&SYSREQ_CONTENTS).next()?;
    let blocks: Vec<_> = container.select(&SYSREQ_BLOCK).collect();
    if blocks.is_empty() {
        return Some(container.inner_html());
    }

    let mut html = String::new();
    for block in blocks {
        if let Some(title) = platform_heading(block.value().attr("data-os")) {
            html.push_str(&format!("<h5 class=\"sysreq-os-title\">{title}</h5>"));
        }
        html.push_str(&block.html());
    }
    Some(html)
}

fn platform_heading(os: Option<&str>) -> Option<&'static str> {
    match os {
        Some("win") => Some("Windows System Requirements"),
        Some("mac") => Some("macOS System Requirements"),
        Some("linux") => Some("Linux / SteamOS System Requirements"),
        _ => None,
    }
}

/// Long-form description, cleaned up for embedding into the host page.
#[must_use]
pub fn extract_description(page: &Html) -> Option<String> {
    let block = page.select(&DESCRIPTION).next()?;
    Some(clean_description_markup(&block.inner_html()))
}

/// Presentation cleanup for description markup.
///
/// Drops the redundant "About This Game" heading and the storefront's
/// image-caption wrapper spans (they reference storefront-hosted images),
/// collapses runs of 3+ `<br>` to exactly 2, and removes `<br>` runs
/// trailing a list/paragraph close tag. Remaining inline markup is left
/// untouched.
#[must_use]
pub fn clean_description_markup(html: &str) -> String {
    // DOM pass first: the caption wrappers nest, which regex can't match
    // reliably.
    let document = kuchiki::parse_html().one(format!("<div>{html}</div>"));
    let Ok(wrapper) = document.select_first("body > div") else {
        return html.to_string();
    };

    if let Ok(headings) = wrapper.as_node().select("h2") {
        // Collect before detaching; removal invalidates the iterator.
        let headings: Vec<_> = headings.collect();
        for heading in headings {
            if heading.text_contents().trim().eq_ignore_ascii_case("About This Game") {
                heading.as_node().detach();
            }
        }
    }

    if let Ok(captions) = wrapper.as_node().select("span.bb_img_ctn") {
        let captions: Vec<_> = captions.collect();
        for caption in captions {
            caption.as_node().detach();
        }
    }

    let cleaned = dom::serialize_children(wrapper.as_node()).unwrap_or_else(|_| html.to_string());

    let cleaned = BR_RUN_RE.replace_all(&cleaned, "<br><br>");
    let cleaned = BR_AFTER_CLOSE_RE.replace_all(&cleaned, "$1");
    cleaned.trim().to_string()
}
