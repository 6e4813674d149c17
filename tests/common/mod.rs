//! Fixture builders for the steamgraft test suite.

/// Wrap body markup in a full host-page document.
#[allow(dead_code)]
pub fn host_page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Repack listings</title>
</head>
<body class="blog">
    <div id="content">
    {body}
    </div>
</body>
</html>"#
    )
}

/// One listing entry in the host page's markup dialect.
#[allow(dead_code)]
pub fn listing_entry(title: &str, slug: &str, extra_content: &str) -> String {
    format!(
        r#"<article class="post type-post">
  <header class="entry-header">
    <div class="entry-meta"><span class="cat-links">Lossless Repack</span></div>
    <h1 class="entry-title"><a href="https://repacks.example/{slug}/">{title}</a></h1>
    <div class="entry-meta">
      <span class="entry-date">7 August 2026</span>
      <span class="byline">by uploader</span>
    </div>
  </header>
  <div class="entry-content">
    <p><a href="https://repacks.example/covers/{slug}.jpg"><img src="https://repacks.example/covers/{slug}.jpg"></a></p>
    <p>&nbsp;</p>
    <p>Genres/Tags: <a href="https://repacks.example/tag/action/">Action</a>, <a href="https://repacks.example/tag/adventure/">Adventure</a><br>
    Companies: Team Example<br>
    Languages: ENG/MULTI12</p>
    <p><strong>Repack Features</strong></p>
    <ul>
      <li>100% Lossless &amp; MD5 Perfect</li>
      <li>Significantly smaller archive size</li>
    </ul>
    <h3>Download Mirrors</h3>
    <p>mirror list here</p>
    {extra_content}
  </div>
</article>"#
    )
}

/// A storefront search response with the given result rows.
#[allow(dead_code)]
pub fn search_results_page(rows: &[(&str, &str)]) -> String {
    let rows_html: String = rows
        .iter()
        .map(|(href, title)| {
            format!(
                r#"<a href="{href}" class="search_result_row ds_collapse_flag">
                     <div class="col search_name ellipsis"><span class="title">{title}</span></div>
                   </a>"#
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html><html><head><title>Search</title></head><body>
<div id="search_resultsRows">{rows_html}</div>
</body></html>"#
    )
}

/// Knobs for a synthetic storefront product page. Every section is optional,
/// mirroring how the live pages vary.
#[allow(dead_code)]
pub struct ProductPageFixture {
    pub all_reviews: Option<String>,
    pub recent_reviews: Option<String>,
    pub tags: Vec<String>,
    pub age_rating: bool,
    pub metacritic: bool,
    pub sys_reqs: Option<String>,
    pub description: Option<String>,
}

#[allow(dead_code)]
impl Default for ProductPageFixture {
    fn default() -> Self {
        Self {
            all_reviews: Some(
                "Very Positive (1,658) - 94% of the 1,658 user reviews for this game are positive."
                    .to_string(),
            ),
            recent_reviews: Some(
                "Very Positive (102) - 91% of the 102 user reviews in the last 30 days are positive."
                    .to_string(),
            ),
            tags: vec![
                "Metroidvania".to_string(),
                "Souls-like".to_string(),
                "Platformer".to_string(),
                "+".to_string(),
            ],
            age_rating: true,
            metacritic: true,
            sys_reqs: Some(default_sys_reqs()),
            description: Some(
                "<h2>About This Game</h2><p>Forge your own path!</p><br><br><br><br><ul><li>Explore caverns</li></ul><br><br><p>Evolve with powerful new skills.</p>"
                    .to_string(),
            ),
        }
    }
}

#[allow(dead_code)]
pub fn default_sys_reqs() -> String {
    r#"<div class="game_area_sys_req sysreq_content" data-os="win">
         <div class="game_area_sys_req_leftCol"><ul class="bb_ul"><li><strong>OS:</strong> Windows 10</li></ul></div>
       </div>
       <div class="game_area_sys_req sysreq_content" data-os="mac">
         <div class="game_area_sys_req_leftCol"><ul class="bb_ul"><li><strong>OS:</strong> macOS 12</li></ul></div>
       </div>
       <div class="game_area_sys_req sysreq_content" data-os="linux">
         <div class="game_area_sys_req_leftCol"><ul class="bb_ul"><li><strong>OS:</strong> Ubuntu 22.04</li></ul></div>
       </div>"#
        .to_string()
}

#[allow(dead_code)]
impl ProductPageFixture {
    pub fn html(&self) -> String {
        let mut glance = String::new();

        let mut review_rows = String::new();
        if let Some(recent) = &self.recent_reviews {
            review_rows.push_str(&format!(
                r#"<div class="user_reviews_summary_row">
                     <div class="subtitle column">Recent Reviews:</div>
                     <div class="summary column"><span class="game_review_summary positive">{recent}</span></div>
                   </div>"#
            ));
        }
        if let Some(all) = &self.all_reviews {
            review_rows.push_str(&format!(
                r#"<div class="user_reviews_summary_row">
                     <div class="subtitle column all">All Reviews:</div>
                     <div class="summary column"><span class="game_review_summary positive">{all}</span></div>
                   </div>"#
            ));
        }
        glance.push_str(&format!(r#"<div id="userReviews">{review_rows}</div>"#));

        if !self.tags.is_empty() {
            let tags_html: String = self
                .tags
                .iter()
                .map(|tag| format!(r#"<a href="https://store.example/tags/en/{tag}/" class="app_tag">{tag}</a>"#))
                .collect();
            glance.push_str(&format!(
                r#"<div class="glance_tags popular_tags" data-appid="367520">{tags_html}</div>"#
            ));
        }

        let metacritic = if self.metacritic {
            r#"<div id="game_area_metascore">
                 <div class="score high">84</div>
                 <div class="logo"></div>
                 <div class="wordmark"><div class="metacritic">metacritic</div></div>
               </div>"#
        } else {
            ""
        };

        let age_rating = if self.age_rating {
            r#"<div class="shared_game_rating">
                 <div class="game_rating_icon"><img src="https://store.example/ratings/pegi18.png"></div>
                 <div class="game_rating_agency">Age rating for: PEGI</div>
                 <div><div class="game_rating_descriptors"><p class="descriptorText">Violence, Bad Language</p></div></div>
               </div>"#
        } else {
            ""
        };

        let description = self
            .description
            .as_ref()
            .map(|body| {
                format!(r#"<div id="game_area_description" class="game_area_description">{body}</div>"#)
            })
            .unwrap_or_default();

        let sys_reqs = self
            .sys_reqs
            .as_ref()
            .map(|blocks| format!(r#"<div class="sysreq_contents">{blocks}</div>"#))
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html><html><head><title>Example Game on Steam</title></head><body>
<div class="page_content">
  <div class="glance_ctn">{glance}</div>
  {metacritic}
  {age_rating}
  {description}
  {sys_reqs}
</div>
</body></html>"#
        )
    }
}
