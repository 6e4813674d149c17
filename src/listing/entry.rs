//! Listing entries and search-term derivation.
//!
//! One entry is one `<article>` post on the host page. All host-page regions
//! are located by structural/textual heuristics, never a guaranteed schema,
//! so every accessor is optional-returning.

use kuchiki::NodeRef;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::dom;

/// Title substrings marking posts that are not individual game listings.
const NON_GAME_TITLE_MARKERS: &[&str] = &["updates digest", "upcoming repacks"];

/// Separators that introduce edition suffixes, DLC counts and subtitles in
/// display titles. First occurrence wins.
const TITLE_SEPARATORS: &[&str] = &[" - ", " \u{2013} ", " + ", ":", ", "];

/// Repacker branding stripped from display titles before matching.
static BRANDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)fitgirl repacks|fitgirl|repack")
        .expect("BRANDING_RE: hardcoded regex is valid")
});

static SPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("SPACE_RUN_RE: hardcoded regex is valid"));

/// One post on the host page.
#[derive(Clone)]
pub struct ListingEntry {
    root: NodeRef,
    title: String,
    permalink: Option<String>,
}

impl ListingEntry {
    /// Discover all listing entries in a parsed document.
    ///
    /// An entry is an `<article>` with a locatable title region; anything
    /// else on the page is ignored.
    #[must_use]
    pub fn scan(document: &NodeRef) -> Vec<ListingEntry> {
        let Ok(articles) = document.select("article") else {
            return Vec::new();
        };

        let entries: Vec<ListingEntry> = articles
            .filter_map(|article| {
                let root = article.as_node().clone();
                let heading = root.select_first(".entry-title").ok()?;
                let title = heading.text_contents().trim().to_string();
                let permalink = heading
                    .as_node()
                    .select_first("a")
                    .ok()
                    .and_then(|link| link.attributes.borrow().get("href").map(String::from));
                Some(ListingEntry {
                    root,
                    title,
                    permalink,
                })
            })
            .collect();

        debug!("Found {} listing entries", entries.len());
        entries
    }

    /// Display title text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The `<article>` node.
    #[must_use]
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Whether this post is a known non-game digest rather than a listing.
    #[must_use]
    pub fn is_non_game(&self) -> bool {
        let title = self.title.to_lowercase();
        NON_GAME_TITLE_MARKERS
            .iter()
            .any(|marker| title.contains(marker))
    }

    /// A storefront product link already present in the entry, if any.
    #[must_use]
    pub fn existing_store_link(&self, store_url: &str) -> Option<String> {
        let prefixes = [
            format!("{store_url}/app/"),
            "https://store.steampowered.com/app/".to_string(),
            "http://store.steampowered.com/app/".to_string(),
        ];

        let links = self.root.select("a").ok()?;
        for link in links {
            let attributes = link.attributes.borrow();
            if let Some(href) = attributes.get("href") {
                if prefixes.iter().any(|prefix| href.starts_with(prefix)) {
                    return Some(href.to_string());
                }
            }
        }
        None
    }

    /// Primary search term.
    ///
    /// Prefers the permalink slug (hyphens to spaces) — slugs are more
    /// stable and compact than display titles — and falls back to the
    /// display title cut at its first separator. `None` when neither yields
    /// anything usable; the caller skips the entry.
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        if let Some(slug) = self.permalink_slug() {
            let term = slug.replace('-', " ").trim().to_string();
            if !term.is_empty() {
                return Some(term);
            }
        }

        let term = cut_at_separators(&self.title).trim().to_string();
        if term.is_empty() { None } else { Some(term) }
    }

    /// Title used only to fuzzy-confirm a search match, never displayed.
    #[must_use]
    pub fn validation_title(&self) -> String {
        let stripped = BRANDING_RE.replace_all(&self.title, "");
        let cut = cut_at_separators(&stripped);
        SPACE_RUN_RE.replace_all(cut.trim(), " ").to_string()
    }

    /// Content region of the entry.
    #[must_use]
    pub fn content_root(&self) -> Option<NodeRef> {
        self.root
            .select_first(".entry-content")
            .ok()
            .map(|content| content.as_node().clone())
    }

    /// The date/byline metadata block. The header typically holds two
    /// `.entry-meta` blocks (categories above the title, date/author below);
    /// only the one with date or byline children is wanted.
    #[must_use]
    pub fn meta_block(&self) -> Option<NodeRef> {
        let metas = self.root.select(".entry-header .entry-meta").ok()?;
        for meta in metas {
            let node = meta.as_node();
            if node.select_first(".entry-date").is_ok() || node.select_first(".byline").is_ok() {
                return Some(node.clone());
            }
        }
        None
    }

    /// Re-point the entry's title link and primary cover-image link at a
    /// storefront URL, creating the anchors when missing. Runs before the
    /// product fetch so navigation works even if that fetch later fails.
    pub fn repoint_links(&self, url: &str) {
        if let Ok(heading) = self.root.select_first(".entry-title") {
            point_or_wrap(heading.as_node(), url);
        }

        if let Some(content) = self.content_root() {
            if let Ok(img) = content.select_first("img") {
                let img = img.as_node().clone();
                match img.parent().filter(|p| dom::element_name(p).as_deref() == Some("a")) {
                    Some(anchor) => set_link(&anchor, url),
                    None => {
                        if let Some(anchor) = dom::parse_single_element(&store_anchor(url, "")) {
                            img.insert_before(anchor.clone());
                            anchor.append(img);
                        }
                    }
                }
            }
        }
    }

    fn permalink_slug(&self) -> Option<String> {
        let permalink = self.permalink.as_deref()?;
        let parsed = Url::parse(permalink).ok()?;
        let path = parsed.path();
        if path.contains("index.php") {
            return None;
        }
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .next_back()
            .map(String::from)
    }
}

/// Truncate a display title at its first separator occurrence.
fn cut_at_separators(title: &str) -> &str {
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.find(sep))
        .min()
        .unwrap_or(title.len());
    &title[..cut]
}

fn store_anchor(url: &str, inner: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" title=\"View on Steam\">{inner}</a>",
        html_escape::encode_double_quoted_attribute(url)
    )
}

fn set_link(anchor: &NodeRef, url: &str) {
    if let Some(element) = anchor.as_element() {
        let mut attributes = element.attributes.borrow_mut();
        attributes.insert("href", url.to_string());
        attributes.insert("target", "_blank".to_string());
    }
}

/// Point the heading's existing anchor at `url`, or wrap the heading's
/// children into a new one.
fn point_or_wrap(heading: &NodeRef, url: &str) {
    if let Ok(anchor) = heading.select_first("a") {
        set_link(anchor.as_node(), url);
        return;
    }

    let Some(anchor) = dom::parse_single_element(&store_anchor(url, "")) else {
        return;
    };
    // Collect before moving; reparenting invalidates the sibling iterator.
    let children: Vec<NodeRef> = heading.children().collect();
    for child in children {
        anchor.append(child);
    }
    heading.append(anchor);
}
