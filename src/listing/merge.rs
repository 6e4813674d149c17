//! Splices extracted storefront fragments into a listing entry.
//!
//! Every injected block carries a fixed marker class, probed immediately
//! before insertion, so merging the same data twice is a no-op — the host
//! page may be re-processed at any time. Each fragment has its own anchor
//! heuristics with fallbacks; a missing anchor never blocks the others.

use kuchiki::NodeRef;
use log::debug;
use serde::Serialize;

use crate::dom;
use crate::listing::entry::ListingEntry;
use crate::listing::style;
use crate::storefront::extract::ExtractedData;

const REVIEWS_MARKER: &str = "steam-reviews";
const RATING_MARKER: &str = "steam-rating-block";
const TAGS_MARKER: &str = "steam-tags";
const DESCRIPTION_MARKER: &str = "steam-description";
const SYSREQ_MARKER: &str = "steam-sys-reqs";

const TAG_LINE_LABEL: &str = "Genres/Tags:";
const COMPANY_LABELS: &[&str] = &["Company:", "Companies:"];

const STAR_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="11" fill="currentColor" class="bi bi-star-fill" viewBox="0 0 16 16" style="margin-right: 1px;"><path d="M3.612 15.443c-.386.198-.824-.149-.746-.592l.83-4.73L.173 6.765c-.329-.314-.158-.888.283-.95l4.898-.696L7.538.792c.197-.39.73-.39.927 0l2.184 4.327 4.898.696c.441.062.612.636.282.95l-3.522 3.356.83 4.73c.078.443-.36.79-.746.592L8 13.187l-4.389 2.256z"></path></svg>"#;

/// Which fragments a merge actually injected.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MergeReport {
    pub reviews: bool,
    pub rating: bool,
    pub tags_added: usize,
    pub description: bool,
    pub sys_reqs: bool,
}

impl MergeReport {
    /// Whether nothing was injected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.reviews
            && !self.rating
            && self.tags_added == 0
            && !self.description
            && !self.sys_reqs
    }
}

/// Splice everything present in `data` into the entry, exactly once.
pub fn merge_entry(
    entry: &ListingEntry,
    data: &ExtractedData,
    product_url: &str,
    max_tags: usize,
) -> MergeReport {
    let document = document_of(entry.root());
    let mut report = MergeReport::default();

    if let (Some(meta), Some(text)) = (entry.meta_block(), data.reviews.as_deref()) {
        report.reviews = inject_review_badge(&meta, text, product_url);
    }

    if let Some(content) = entry.content_root() {
        report.rating = inject_rating_block(
            &document,
            &content,
            data.age_rating.as_deref(),
            data.metacritic.as_deref(),
        );
        report.tags_added = inject_tags(&content, &data.tags, max_tags);

        let (description, sys_reqs) = inject_disclosures(
            &document,
            &content,
            data.description.as_deref(),
            data.sys_reqs.as_deref(),
        );
        report.description = description;
        report.sys_reqs = sys_reqs;
    }

    debug!("Merged '{}': {report:?}", entry.title());
    report
}

/// Root of the tree a node lives in.
fn document_of(node: &NodeRef) -> NodeRef {
    let mut root = node.clone();
    while let Some(parent) = root.parent() {
        root = parent;
    }
    root
}

fn has_marker(root: &NodeRef, marker: &str) -> bool {
    root.select_first(&format!(".{marker}")).is_ok()
}

// =============================================================================
// Review badge
// =============================================================================

/// Star badge with the review summary and a storefront link, appended to the
/// date/byline metadata block.
fn inject_review_badge(meta: &NodeRef, text: &str, product_url: &str) -> bool {
    if has_marker(meta, REVIEWS_MARKER) {
        return false;
    }

    let badge = format!(
        "<span class=\"{REVIEWS_MARKER}\">{STAR_SVG} {} <a class=\"steam-store-link\" \
         href=\"{}\" target=\"_blank\">Steam</a></span>",
        html_escape::encode_text(text),
        html_escape::encode_double_quoted_attribute(product_url),
    );
    dom::append_fragment(meta, &badge);
    true
}

// =============================================================================
// Age rating + metacritic
// =============================================================================

/// Compact side-by-side block after the entry's first paragraph.
fn inject_rating_block(
    document: &NodeRef,
    content: &NodeRef,
    age_rating: Option<&str>,
    metacritic: Option<&str>,
) -> bool {
    if age_rating.is_none() && metacritic.is_none() {
        return false;
    }
    if has_marker(content, RATING_MARKER) {
        return false;
    }
    let Ok(first_p) = content.select_first("p") else {
        return false;
    };

    let Some(wrapper) =
        dom::parse_single_element(&format!("<div class=\"{RATING_MARKER}\"></div>"))
    else {
        return false;
    };

    if let Some(rating) = age_rating.and_then(restructure_age_rating) {
        wrapper.append(rating);
    }
    if let Some(metacritic) = metacritic {
        for node in dom::parse_fragment(metacritic) {
            wrapper.append(node);
        }
    }
    if wrapper.first_child().is_none() {
        return false;
    }

    first_p.as_node().insert_after(wrapper.clone());

    // The post body often follows the cover paragraph with an `&nbsp;`
    // spacer; keeping it would leave a visible gap under the new block.
    if let Some(sibling) = dom::next_element_sibling(&wrapper) {
        if dom::element_name(&sibling).as_deref() == Some("p") {
            let text = sibling.text_contents();
            if text.trim().is_empty() || text.contains('\u{a0}') {
                sibling.detach();
            }
        }
    }

    style::ensure_rating_style(document);
    true
}

/// Regroup the raw rating markup: icon first, then the agency label with the
/// descriptor text nested beneath it, then a trailing line break.
fn restructure_age_rating(markup: &str) -> Option<NodeRef> {
    let holder = dom::parse_single_element(&format!("<div>{markup}</div>"))?;
    let rating = holder.select_first(".shared_game_rating").ok()?;
    let rating = rating.as_node().clone();

    let icon = rating
        .select_first(".game_rating_icon")
        .ok()
        .map(|n| n.as_node().clone());
    let agency = rating
        .select_first(".game_rating_agency")
        .ok()
        .map(|n| n.as_node().clone());
    let descriptors = rating
        .select_first(".game_rating_descriptors")
        .ok()
        .map(|n| n.as_node().clone());

    // Collect before detaching; removal invalidates the child iterator.
    let children: Vec<NodeRef> = rating.children().collect();
    for child in children {
        child.detach();
    }

    let details = dom::parse_single_element("<div class=\"game_rating_details\"></div>")?;
    if let Some(icon) = icon {
        details.append(icon);
    }
    rating.append(details);

    if let Some(agency) = agency {
        if let Some(descriptors) = descriptors {
            agency.append(descriptors);
        }
        rating.append(agency);
    }

    if let Some(br) = dom::parse_single_element("<br>") {
        rating.append(br);
    }

    let container = dom::parse_single_element("<div class=\"steam-age-rating\"></div>")?;
    container.append(rating);
    Some(container)
}

// =============================================================================
// Tags
// =============================================================================

/// Extend (or synthesize) the entry's "Genres/Tags:" line.
///
/// Returns the number of tags injected. The combined existing + injected
/// count never exceeds `max_tags`, and no injected tag duplicates an
/// existing one case-insensitively.
fn inject_tags(content: &NodeRef, tags: &[String], max_tags: usize) -> usize {
    if tags.is_empty() || has_marker(content, TAGS_MARKER) {
        return 0;
    }

    if let Some(text_node) = dom::find_text_node(content, |t| t.contains(TAG_LINE_LABEL)) {
        let Some(line) = text_node.parent() else {
            return 0;
        };
        return extend_tag_line(&line, tags, max_tags);
    }

    // No tag line at all: synthesize one before the company line, when the
    // post has one to anchor on.
    if let Some(company_text) = dom::find_text_node(content, |t| {
        COMPANY_LABELS.iter().any(|label| t.contains(label))
    }) {
        let Some(block) = top_level_container(content, &company_text) else {
            return 0;
        };
        let fresh: Vec<&String> = tags.iter().take(max_tags).collect();
        let line = format!(
            "<p><strong>{TAG_LINE_LABEL}</strong> <span class=\"{TAGS_MARKER}\">{}</span></p>",
            joined_tags(&fresh),
        );
        for node in dom::parse_fragment(&line) {
            block.insert_before(node);
        }
        return fresh.len();
    }

    0
}

fn extend_tag_line(line: &NodeRef, tags: &[String], max_tags: usize) -> usize {
    let existing = line
        .select("a[href*=\"/tag/\"]")
        .map(Iterator::count)
        .unwrap_or(0);
    let remaining_slots = max_tags.saturating_sub(existing);

    let line_text = line.text_contents().to_lowercase();
    let fresh: Vec<&String> = tags
        .iter()
        .filter(|tag| !line_text.contains(&tag.to_lowercase()))
        .take(remaining_slots)
        .collect();
    if fresh.is_empty() {
        return 0;
    }

    let span_html = format!(
        "<span class=\"{TAGS_MARKER}\">, {}</span>",
        joined_tags(&fresh)
    );
    let Some(span) = dom::parse_single_element(&span_html) else {
        return 0;
    };

    // The company segment usually follows the tags on the same line,
    // separated by a <br>; new tags belong before that break.
    let company = line.children().find(|child| {
        let text = child.text_contents();
        COMPANY_LABELS.iter().any(|label| text.contains(label))
    });

    match company {
        Some(company_node) => {
            let preceding_br = company_node
                .previous_sibling()
                .filter(|prev| dom::element_name(prev).as_deref() == Some("br"));
            match preceding_br {
                Some(br) => br.insert_before(span),
                None => company_node.insert_before(span),
            }
        }
        None => line.append(span),
    }

    fresh.len()
}

fn joined_tags(tags: &[&String]) -> String {
    tags.iter()
        .map(|tag| html_escape::encode_text(tag.as_str()).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The top-level child of `content` containing `node`.
fn top_level_container(content: &NodeRef, node: &NodeRef) -> Option<NodeRef> {
    let mut current = node.clone();
    loop {
        let parent = current.parent()?;
        if &parent == content {
            return Some(current);
        }
        current = parent;
    }
}

// =============================================================================
// Disclosure blocks (description, system requirements)
// =============================================================================

/// Inject the description and system-requirements disclosures.
///
/// The description reuses an existing "Game Description" disclosure when the
/// host page already has one (the host copy wins; it then anchors the
/// requirements block). Returns (description injected, sys reqs injected).
fn inject_disclosures(
    document: &NodeRef,
    content: &NodeRef,
    description: Option<&str>,
    sys_reqs: Option<&str>,
) -> (bool, bool) {
    let existing_description = content.select(".su-spoiler").ok().and_then(|spoilers| {
        spoilers
            .map(|spoiler| spoiler.as_node().clone())
            .find(|spoiler| spoiler.text_contents().contains("Game Description"))
    });

    let mut description_injected = false;
    let mut anchor = existing_description;

    if anchor.is_none() {
        if let Some(body) = description {
            if !has_marker(content, DESCRIPTION_MARKER) {
                let spoiler = build_spoiler("Game Description", body, DESCRIPTION_MARKER);
                place_disclosure(content, &spoiler);
                anchor = Some(spoiler);
                description_injected = true;
            }
        }
    }

    let mut sys_reqs_injected = false;
    if let Some(body) = sys_reqs {
        if !has_marker(content, SYSREQ_MARKER) {
            let spoiler = build_spoiler("System Requirements", body, SYSREQ_MARKER);
            match &anchor {
                // Keep the two blocks adjacent when both exist.
                Some(description_block) => description_block.insert_after(spoiler),
                None => place_disclosure(content, &spoiler),
            }
            style::ensure_sysreq_style(document);
            sys_reqs_injected = true;
        }
    }

    if description_injected || sys_reqs_injected {
        style::ensure_spoiler_assets(document);
    }

    (description_injected, sys_reqs_injected)
}

/// Collapsible disclosure in the host page's own markup dialect, closed by
/// default.
fn build_spoiler(title: &str, body_html: &str, marker_class: &str) -> NodeRef {
    let html = format!(
        "<div class=\"su-spoiler su-spoiler-style-fancy su-spoiler-icon-plus su-spoiler-closed\" \
         data-scroll-offset=\"0\">\
         <div class=\"su-spoiler-title\" tabindex=\"0\" role=\"button\">\
         <span class=\"su-spoiler-icon\"></span>{}</div>\
         <div class=\"su-spoiler-content su-u-clearfix su-u-trim {marker_class}\">{body_html}</div>\
         </div>",
        html_escape::encode_text(title),
    );
    dom::parse_single_element(&html).unwrap_or_else(|| NodeRef::new_text(""))
}

/// Place a new disclosure into the content tree.
///
/// Tried in order: after the feature list following a "Repack Features"
/// heading; after the image paragraph following a "Screenshots" heading;
/// before a "Download Mirrors"/"Selective Download" heading; appended to
/// the content.
fn place_disclosure(content: &NodeRef, spoiler: &NodeRef) {
    if let Some(heading) = heading_block(content, "Repack Features") {
        let mut next = dom::next_element_sibling(&heading);
        while let Some(sibling) = next {
            let name = dom::element_name(&sibling);
            if name.as_deref() == Some("ul") {
                sibling.insert_after(spoiler.clone());
                return;
            }
            // Another section started without a feature list in between.
            if matches!(name.as_deref(), Some("h3") | Some("div"))
                && sibling.text_contents().trim().len() > 5
            {
                break;
            }
            next = dom::next_element_sibling(&sibling);
        }
    }

    if let Some(heading) = heading_block(content, "Screenshots") {
        if let Some(sibling) = dom::next_element_sibling(&heading) {
            sibling.insert_after(spoiler.clone());
            return;
        }
    }

    let mirrors = dom::find_element_with_text(content, &["h3", "strong", "p"], |text| {
        text.contains("Download Mirrors") || text.contains("Selective Download")
    });
    if let Some(found) = mirrors {
        let target = if dom::element_name(&found).as_deref() == Some("strong") {
            dom::closest(&found, "p").unwrap_or(found)
        } else {
            found
        };
        target.insert_before(spoiler.clone());
        return;
    }

    content.append(spoiler.clone());
}

/// Find a section heading (h3 or bolded paragraph) by its text; bolded
/// headings resolve to their enclosing paragraph so sibling walks work.
fn heading_block(content: &NodeRef, label: &str) -> Option<NodeRef> {
    let found =
        dom::find_element_with_text(content, &["h3", "strong"], |text| text.contains(label))?;
    if dom::element_name(&found).as_deref() == Some("strong") {
        return Some(dom::closest(&found, "p").unwrap_or(found));
    }
    Some(found)
}
