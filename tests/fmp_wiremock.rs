use anyhow::Result;
use cardlens::market::{FmpPriceSource, StockPriceSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn price_comes_from_the_quote_short_endpoint() -> Result<()> {
    let server = MockServer::start().await;
    let provider = FmpPriceSource::new("demo").with_base_url(server.uri());

    let body = r#"[{"symbol": "AAPL", "price": 150.12, "volume": 42076700}]"#;

    Mock::given(method("GET"))
        .and(path("/quote-short/AAPL"))
        .and(query_param("apikey", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let price = provider.fetch_price("aapl").await?;
    assert_eq!(price, Some(150.12));

    Ok(())
}

#[tokio::test]
async fn empty_response_means_no_quote() -> Result<()> {
    let server = MockServer::start().await;
    let provider = FmpPriceSource::new("demo").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/quote-short/UNKNOWN"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&server)
        .await;

    let price = provider.fetch_price("UNKNOWN").await?;
    assert_eq!(price, None);

    Ok(())
}

#[tokio::test]
async fn error_status_means_no_quote() -> Result<()> {
    let server = MockServer::start().await;
    let provider = FmpPriceSource::new("demo").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/quote-short/MISSING"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let price = provider.fetch_price("MISSING").await?;
    assert_eq!(price, None);

    Ok(())
}

#[tokio::test]
async fn null_price_stays_null() -> Result<()> {
    let server = MockServer::start().await;
    let provider = FmpPriceSource::new("demo").with_base_url(server.uri());

    let body = r#"[{"symbol": "HALTED", "price": null}]"#;

    Mock::given(method("GET"))
        .and(path("/quote-short/HALTED"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let price = provider.fetch_price("HALTED").await?;
    assert_eq!(price, None);

    Ok(())
}
