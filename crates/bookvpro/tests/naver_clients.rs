use std::time::Duration;

use bookvpro::config::{OpenApiCredentials, SearchAdCredentials};
use bookvpro::integrations::naver::{
    build_http_client, NaverSearchScraper, OpenBookSearchClient, SearchAdClient,
};
use bookvpro::integrations::{BookCatalog, KeywordVolumeSource, ResultPageSource, SearchError};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).expect("client builds")
}

#[tokio::test]
async fn scraper_fetches_book_vertical_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .and(query_param("where", "book"))
        .and(query_param("query", "총 균 쇠"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<div>도서 판매처 8</div>"))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = NaverSearchScraper::new(client(), server.uri());
    let page = scraper
        .fetch_result_page("총 균 쇠")
        .await
        .expect("page fetched");

    assert!(page.contains("판매처 8"));
}

#[tokio::test]
async fn scraper_reports_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let scraper = NaverSearchScraper::new(client(), server.uri());
    let err = scraper
        .fetch_result_page("blocked")
        .await
        .expect_err("403 surfaces");

    assert!(matches!(err, SearchError::Status { status: 403 }));
}

#[tokio::test]
async fn search_ad_sends_signed_request_and_sums_volume() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/keywordstool"))
        .and(query_param("hintKeywords", "데미안"))
        .and(query_param("showDetail", "1"))
        .and(header("X-API-KEY", "api-key"))
        .and(header("X-Customer", "1234567"))
        .and(header_exists("X-Timestamp"))
        .and(header_exists("X-Signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "keywordList": [
                { "relKeyword": "데미안", "monthlyPcQcCnt": 2100, "monthlyMobileQcCnt": 9400 },
                { "relKeyword": "데미안줄거리", "monthlyPcQcCnt": 300, "monthlyMobileQcCnt": 1200 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchAdClient::new(
        client(),
        SearchAdCredentials {
            base_url: server.uri(),
            api_key: "api-key".to_string(),
            secret_key: "secret".to_string(),
            customer_id: "1234567".to_string(),
        },
    );

    let volume = client.monthly_volume(" 데미안 ").await.expect("lookup");
    assert_eq!(volume, Some(11_500));
}

#[tokio::test]
async fn search_ad_skips_blank_keywords_without_calling_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = SearchAdClient::new(
        client(),
        SearchAdCredentials {
            base_url: server.uri(),
            api_key: "api-key".to_string(),
            secret_key: "secret".to_string(),
            customer_id: "1".to_string(),
        },
    );

    assert_eq!(client.monthly_volume("   ").await.expect("no lookup"), None);
}

#[tokio::test]
async fn open_search_strips_highlighting() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search/book.json"))
        .and(query_param("query", "어린 왕자"))
        .and(query_param("display", "5"))
        .and(header("X-Naver-Client-Id", "client-id"))
        .and(header("X-Naver-Client-Secret", "client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total": 412,
            "items": [{
                "title": "<b>어린 왕자</b> (양장본)",
                "link": "https://search.shopping.naver.com/book/catalog/1",
                "author": "앙투안 드 생텍쥐페리",
                "publisher": "열린책들",
                "isbn": "9788932917245",
                "discount": "9000"
            }]
        })))
        .mount(&server)
        .await;

    let client = OpenBookSearchClient::new(
        client(),
        OpenApiCredentials {
            base_url: server.uri(),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
        },
    );

    let page = client.search_books("어린 왕자", 5).await.expect("search");
    assert_eq!(page.total, 412);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "어린 왕자 (양장본)");
    assert_eq!(page.items[0].discount, Some(9000));
}
