//! Page-level presentation fragments.
//!
//! Injected blocks need a handful of style rules (and the disclosure blocks
//! a toggle script) that belong to the page, not to any single entry. Each
//! fragment is appended to `<head>` at most once per document, guarded by a
//! fixed element id — the merger may run for any number of entries.

use kuchiki::NodeRef;
use log::debug;

use crate::dom;

const RATING_STYLE_ID: &str = "steam-rating-style";
const SYSREQ_STYLE_ID: &str = "steam-sysreq-style";
const SPOILER_STYLE_ID: &str = "steam-spoiler-style";
const SPOILER_SCRIPT_ID: &str = "steam-spoiler-toggle";

const RATING_CSS: &str = "
.steam-rating-block { display: flex; gap: 10px; align-items: flex-start; }
.steam-age-rating { margin-top: 10px; border: 1px solid; padding: 5px; display: inline-block; }
.shared_game_rating { display: flex; gap: 10px; font-family: Arial, sans-serif; color: #acb2b8; }
.game_rating_icon img { width: 50px; }
.game_rating_descriptors { font-size: 11px; }
.descriptorText { margin: 0px; }
";

const SYSREQ_CSS: &str = "
.steam-sys-reqs br { display: none; }
.steam-sys-reqs strong { color: #66c0f4; font-weight: normal; }
.sysreq-os-title {
    font-weight: bold;
    border-bottom: 1px solid #333;
    padding-bottom: 3px;
    margin-bottom: 5px;
    margin-top: 15px;
    color: #66c0f4;
}
.steam-sys-reqs .game_area_sys_req {
    display: block !important;
    margin-bottom: 15px;
    border-bottom: 1px solid rgba(255,255,255,0.1);
    padding-bottom: 10px;
}
.steam-sys-reqs .game_area_sys_req_leftCol,
.steam-sys-reqs .game_area_sys_req_rightCol {
    float: left;
    width: 48%;
    margin-right: 2%;
}
.steam-sys-reqs ul { list-style: none; padding: 0; margin: 0; }
.steam-sys-reqs ul.bb_ul { padding-left: 0; }
.steam-sys-reqs li {
    margin-bottom: 4px;
    line-height: 1.4;
    color: #acb2b8;
    font-size: 12px;
}
.steam-sys-reqs::after, .steam-sys-reqs .game_area_sys_req::after {
    content: \"\"; display: table; clear: both;
}
@media(max-width: 600px) {
    .steam-sys-reqs .game_area_sys_req_leftCol,
    .steam-sys-reqs .game_area_sys_req_rightCol {
        float: none; width: 100%; margin-bottom: 10px;
    }
}
";

const SPOILER_CSS: &str = "
.su-spoiler-closed > .su-spoiler-content { display: none; }
.su-spoiler-title { cursor: pointer; }
";

/// Flips a disclosure between its two states. Binary open/closed only.
const SPOILER_JS: &str = "
document.addEventListener('click', function (event) {
    var title = event.target.closest('.su-spoiler-title');
    if (!title || !title.parentElement) { return; }
    title.parentElement.classList.toggle('su-spoiler-closed');
});
";

/// Install the age-rating/metacritic style rules.
pub fn ensure_rating_style(document: &NodeRef) {
    ensure_head_fragment(
        document,
        RATING_STYLE_ID,
        &style_element(RATING_STYLE_ID, RATING_CSS),
    );
}

/// Install the system-requirements style rules.
pub fn ensure_sysreq_style(document: &NodeRef) {
    ensure_head_fragment(
        document,
        SYSREQ_STYLE_ID,
        &style_element(SYSREQ_STYLE_ID, SYSREQ_CSS),
    );
}

/// Install the disclosure style rules and the toggle script.
pub fn ensure_spoiler_assets(document: &NodeRef) {
    ensure_head_fragment(
        document,
        SPOILER_STYLE_ID,
        &style_element(SPOILER_STYLE_ID, SPOILER_CSS),
    );
    ensure_head_fragment(
        document,
        SPOILER_SCRIPT_ID,
        &format!("<script id=\"{SPOILER_SCRIPT_ID}\">{SPOILER_JS}</script>"),
    );
}

fn style_element(id: &str, css: &str) -> String {
    format!("<style id=\"{id}\" type=\"text/css\">{css}</style>")
}

/// Append a fragment to `<head>` unless an element with its id exists.
fn ensure_head_fragment(document: &NodeRef, id: &str, html: &str) {
    if document.select_first(&format!("#{id}")).is_ok() {
        return;
    }

    // A parsed document always has a head; fall back to the root for bare
    // subtrees used in tests.
    let target = document
        .select_first("head")
        .map(|head| head.as_node().clone())
        .unwrap_or_else(|()| document.clone());

    dom::append_fragment(&target, html);
    debug!("Installed page fragment #{id}");
}
