//! End-to-end crawl tests against a mock site

use krisha_scout::config::Config;
use krisha_scout::crawler::{
    build_http_client, HttpFetcher, NoopSession, NoopSolver, Orchestrator, PacingController,
    RunScope,
};
use krisha_scout::districts::{find_district, City};
use krisha_scout::output::read_jsonl;
use krisha_scout::ScoutError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.request_timeout_secs = 5;
    config.pacing.listing_delay_min_secs = 0.0;
    config.pacing.listing_delay_max_secs = 0.01;
    config.pacing.page_delay_min_secs = 0.0;
    config.pacing.page_delay_max_secs = 0.01;
    config.pacing.rest_after_min = 100;
    config.pacing.rest_after_max = 100;
    config.pacing.rest_min_secs = 0;
    config.pacing.rest_max_secs = 0;
    config.output.flush_every = 2;
    config
}

fn list_page(ids: &[u64], with_next: bool) -> String {
    let mut html = String::from("<html><body>");
    for id in ids {
        html.push_str(&format!(r#"<a href="/a/show/{id}">объявление {id}</a>"#));
    }
    if with_next {
        html.push_str(
            r#"<nav class="paginator"><a class="paginator__btn--next" href="?page=2">дальше</a></nav>"#,
        );
    }
    html.push_str("</body></html>");
    html
}

fn detail_page(id: u64, rooms: u32, price: &str) -> String {
    format!(
        r#"<html>
<head><title>{rooms}-комнатная квартира, 60 м², 3/9 этаж — Krisha.kz</title></head>
<body>
<h1>{rooms}-комнатная квартира, 60 м², 3/9 этаж</h1>
<div class="offer__price">{price}</div>
<div>Город</div>
<div>Алматы, Бостандыкский р-н, ул. Тимирязева 42</div>
<p>Продается светлая квартира с хорошим ремонтом в тихом районе. Рядом школа,
детский сад и парк. Дом кирпичный, год постройки 2015, закрытый двор.
Квартира очень теплая, этаж удобный, соседи спокойные.</p>
<a href="tel:+7701123{id:04}">Позвонить</a>
</body></html>"#
    )
}

async fn mount_site(server: &MockServer, ids: &[u64]) {
    Mock::given(method("GET"))
        .and(path("/prodazha/kvartiry/almaty/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(list_page(ids, false)))
        .mount(server)
        .await;

    for &id in ids {
        Mock::given(method("GET"))
            .and(path(format!("/a/show/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(detail_page(id, 2, "54 999 000 〒")),
            )
            .mount(server)
            .await;
    }
}

fn build_orchestrator(
    config: Config,
    scope: RunScope,
) -> Orchestrator<HttpFetcher, NoopSolver, NoopSession> {
    let fetcher = HttpFetcher::new(build_http_client(config.site.request_timeout_secs).unwrap());
    let pacing = PacingController::with_seed(config.pacing.clone(), 7);
    Orchestrator::with_pacing(
        fetcher,
        NoopSolver,
        NoopSession,
        config,
        scope,
        Arc::new(AtomicBool::new(false)),
        pacing,
    )
}

#[tokio::test]
async fn test_crawl_saves_all_listings() {
    let server = MockServer::start().await;
    mount_site(&server, &[101, 102, 103]).await;

    let dir = TempDir::new().unwrap();
    let config = fast_config(&server.uri());
    let scope = RunScope {
        cities: vec![City::Almaty],
        districts: vec![],
        pages: 1,
        max_listings: 0,
        output_dir: dir.path().to_path_buf(),
    };

    let summary = build_orchestrator(config, scope).run().await.unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.saved, 3);
    assert_eq!(summary.skipped, 0);

    let records = read_jsonl(&dir.path().join("krisha_almaty_all.jsonl")).unwrap();
    assert_eq!(records.len(), 3);

    let first = &records[0];
    assert_eq!(first.listing_id, Some(101));
    assert_eq!(first.rooms, Some(2));
    assert_eq!(first.price_kzt, Some(54_999_000));
    assert_eq!(first.district.as_deref(), Some("almaty-bostandykskij"));
    assert_eq!(first.phone_status, "revealed");
    assert!(first.phones.as_deref().unwrap().starts_with("+7701123"));

    let csv = std::fs::read(dir.path().join("krisha_almaty_all.csv")).unwrap();
    assert!(csv.starts_with(&[0xEF, 0xBB, 0xBF]));
}

#[tokio::test]
async fn test_listing_cap_stops_early() {
    let server = MockServer::start().await;
    mount_site(&server, &[201, 202, 203, 204]).await;

    let dir = TempDir::new().unwrap();
    let config = fast_config(&server.uri());
    let scope = RunScope {
        cities: vec![City::Almaty],
        districts: vec![],
        pages: 1,
        max_listings: 2,
        output_dir: dir.path().to_path_buf(),
    };

    let summary = build_orchestrator(config, scope).run().await.unwrap();

    assert_eq!(summary.saved, 2);

    let records = read_jsonl(&dir.path().join("krisha_almaty_all.jsonl")).unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_duplicate_links_processed_once() {
    let server = MockServer::start().await;

    // List page repeats the same listing three times
    let mut html = String::from("<html><body>");
    for _ in 0..3 {
        html.push_str(r#"<a href="/a/show/301">объявление</a>"#);
    }
    html.push_str(r#"<a href="/a/show/302?from=list">другое</a></body></html>"#);

    Mock::given(method("GET"))
        .and(path("/prodazha/kvartiry/almaty/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;
    for id in [301u64, 302] {
        Mock::given(method("GET"))
            .and(path(format!("/a/show/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(detail_page(id, 3, "30 000 000 〒")),
            )
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = fast_config(&server.uri());
    let scope = RunScope {
        cities: vec![City::Almaty],
        districts: vec![],
        pages: 1,
        max_listings: 0,
        output_dir: dir.path().to_path_buf(),
    };

    let summary = build_orchestrator(config, scope).run().await.unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.saved, 2);
}

#[tokio::test]
async fn test_out_of_district_leakage_skipped_and_counted() {
    let server = MockServer::start().await;

    // District-scoped list page leaks a listing that the detail page
    // places in a different district
    Mock::given(method("GET"))
        .and(path("/prodazha/kvartiry/almaty-medeuskij/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/a/show/501">объявление</a>"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a/show/501"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page(501, 2, "41 000 000 〒")),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = fast_config(&server.uri());
    let scope = RunScope {
        cities: vec![City::Almaty],
        districts: vec![find_district(City::Almaty, "medeuskij").unwrap()],
        pages: 1,
        max_listings: 0,
        output_dir: dir.path().to_path_buf(),
    };

    let summary = build_orchestrator(config, scope).run().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.saved, 0);
    assert_eq!(summary.skipped, 1);
    assert!(!dir
        .path()
        .join("krisha_almaty_almaty-medeuskij.jsonl")
        .exists());
}

#[tokio::test]
async fn test_final_flush_failure_is_an_error() {
    let server = MockServer::start().await;
    mount_site(&server, &[401]).await;

    let dir = TempDir::new().unwrap();
    // Block the CSV target so every flush fails
    std::fs::create_dir(dir.path().join("krisha_almaty_all.csv")).unwrap();

    let mut config = fast_config(&server.uri());
    config.output.flush_every = 100;
    let scope = RunScope {
        cities: vec![City::Almaty],
        districts: vec![],
        pages: 1,
        max_listings: 0,
        output_dir: dir.path().to_path_buf(),
    };

    let err = build_orchestrator(config, scope).run().await.unwrap_err();
    assert!(matches!(err, ScoutError::Sink(_)));
    assert!(!dir.path().join("krisha_almaty_all.jsonl").exists());
}

#[tokio::test]
async fn test_empty_list_page_yields_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prodazha/kvartiry/almaty/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>ничего</body></html>"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = fast_config(&server.uri());
    let scope = RunScope {
        cities: vec![City::Almaty],
        districts: vec![],
        pages: 1,
        max_listings: 0,
        output_dir: dir.path().to_path_buf(),
    };

    let summary = build_orchestrator(config, scope).run().await.unwrap();
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.saved, 0);
    assert!(!dir.path().join("krisha_almaty_all.jsonl").exists());
}
