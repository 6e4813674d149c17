//! Search resolver behavior against a mock storefront.

mod common;

use mockito::Matcher;
use steamgraft::storefront::search::resolve_store_url;
use steamgraft::{AugmentConfig, StorefrontClient};

fn client_for(server: &mockito::ServerGuard) -> StorefrontClient {
    let config = AugmentConfig::builder()
        .store_url(server.url())
        .build()
        .expect("mock server URL is valid");
    StorefrontClient::new(&config).expect("client builds")
}

async fn search_mock(server: &mut mockito::ServerGuard, term: &str, body: String) -> mockito::Mock {
    server
        .mock("GET", "/search/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("term".into(), term.into()),
            Matcher::UrlEncoded("category1".into(), "998".into()),
        ]))
        .with_status(200)
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn accepts_first_validated_result() {
    let mut server = mockito::Server::new_async().await;
    let product = format!("{}/app/367520/Hollow_Knight/?snr=1_4_4__12", server.url());
    let mock = search_mock(
        &mut server,
        "hollow knight",
        common::search_results_page(&[(&product, "Hollow Knight: Voidheart Edition")]),
    ).await;

    let client = client_for(&server);
    let resolved = resolve_store_url(&client, "hollow knight", "Hollow Knight").await;

    mock.assert_async().await;
    assert_eq!(
        resolved.as_deref(),
        Some(format!("{}/app/367520/Hollow_Knight/", server.url()).as_str()),
        "tracking params must be stripped from the accepted URL"
    );
}

#[tokio::test]
async fn exhausted_retries_issue_one_request_per_word() {
    let mut server = mockito::Server::new_async().await;
    let empty = common::search_results_page(&[]);
    let m3 = search_mock(&mut server, "alpha beta gamma", empty.clone()).await;
    let m2 = search_mock(&mut server, "alpha beta", empty.clone()).await;
    let m1 = search_mock(&mut server, "alpha", empty).await;

    let client = client_for(&server);
    let resolved = resolve_store_url(&client, "alpha beta gamma", "Alpha Beta Gamma").await;

    assert!(resolved.is_none());
    // Strictly shrinking: exactly one request per word count, no more.
    m3.assert_async().await;
    m2.assert_async().await;
    m1.assert_async().await;
}

#[tokio::test]
async fn narrowed_term_matches_after_two_retries() {
    let mut server = mockito::Server::new_async().await;
    let empty = common::search_results_page(&[]);
    let product = format!("{}/app/1030300/Silksong/?snr=1_4_4__12", server.url());

    let full =
        search_mock(&mut server, "shovel knight silksong deluxe bundle", empty.clone()).await;
    let four = search_mock(&mut server, "shovel knight silksong deluxe", empty).await;
    let three = search_mock(
        &mut server,
        "shovel knight silksong",
        common::search_results_page(&[(&product, "Shovel Knight Silksong")]),
    ).await;

    let client = client_for(&server);
    let resolved = resolve_store_url(
        &client,
        "shovel knight silksong deluxe bundle",
        "Shovel Knight Silksong",
    )
    .await;

    full.assert_async().await;
    four.assert_async().await;
    three.assert_async().await;
    assert_eq!(
        resolved.as_deref(),
        Some(format!("{}/app/1030300/Silksong/", server.url()).as_str())
    );
}

#[tokio::test]
async fn placeholder_slug_is_treated_as_a_miss() {
    let mut server = mockito::Server::new_async().await;
    let delisted = format!("{}/app/999999/_/?snr=1_4_4__12", server.url());
    let product = format!("{}/app/367520/Hollow_Knight/", server.url());

    let first = search_mock(
        &mut server,
        "hollow knight",
        common::search_results_page(&[(&delisted, "Hollow Knight")]),
    ).await;
    let second = search_mock(
        &mut server,
        "hollow",
        common::search_results_page(&[(&product, "Hollow Knight")]),
    ).await;

    let client = client_for(&server);
    let resolved = resolve_store_url(&client, "hollow knight", "Hollow Knight").await;

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(resolved.as_deref(), Some(product.as_str()));
}

#[tokio::test]
async fn validation_mismatch_shrinks_the_term() {
    let mut server = mockito::Server::new_async().await;
    let wrong = format!("{}/app/1/Wrong_Game/", server.url());
    let right = format!("{}/app/2/Hollow_Knight/", server.url());

    let first = search_mock(
        &mut server,
        "hollow knight voidheart",
        common::search_results_page(&[(&wrong, "A Completely Different Game")]),
    ).await;
    let second = search_mock(
        &mut server,
        "hollow knight",
        common::search_results_page(&[(&right, "Hollow Knight: Voidheart Edition")]),
    ).await;

    let client = client_for(&server);
    let resolved = resolve_store_url(&client, "hollow knight voidheart", "Hollow Knight").await;

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(resolved.as_deref(), Some(right.as_str()));
}

#[tokio::test]
async fn empty_validation_title_accepts_the_first_row() {
    let mut server = mockito::Server::new_async().await;
    let product = format!("{}/app/42/Anything/", server.url());
    let mock = search_mock(
        &mut server,
        "some obscure slug",
        common::search_results_page(&[(&product, "Entirely Unrelated Title")]),
    ).await;

    let client = client_for(&server);
    let resolved = resolve_store_url(&client, "some obscure slug", "").await;

    mock.assert_async().await;
    assert_eq!(resolved.as_deref(), Some(product.as_str()));
}

#[tokio::test]
async fn transport_failure_is_terminal() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let resolved = resolve_store_url(&client, "alpha beta gamma", "Alpha").await;

    // One request, no retry on transport failure.
    mock.assert_async().await;
    assert!(resolved.is_none());
}
