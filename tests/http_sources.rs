use std::fs;

use daily_series_collector::{
    CollectorSet, Config, Orchestrator,
    collector::catalog::SOURCES,
    config::{EndpointConfig, RedditConfig, SeriesLayout, TwitterConfig},
    report::SourceStatus,
    sources::{
        adapter::{FetchError, SeriesCollector, SourceKind},
        json_series::JsonSeriesCollector,
        reddit::RedditCollector,
        twitter::TwitterCollector,
    },
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

fn reddit_config(base_url: String) -> RedditConfig {
    RedditConfig {
        data_path: "unused/".into(),
        subreddit: "Bitcoin".into(),
        limit: 2,
        user_agent: "collector-tests/1.0".into(),
        base_url,
    }
}

#[tokio::test]
async fn json_series_fetches_date_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/bpi/historical/close.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bpi": { "2018-03-01": 10385.9138, "2018-03-02": 10951.0025 },
            "disclaimer": "test"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let collector = JsonSeriesCollector::new(
        SourceKind::BtcPrice,
        EndpointConfig {
            url: format!("{}/v1/bpi/historical/close.json", server.uri()),
            layout: SeriesLayout::DateMap,
            pointer: "/bpi".into(),
            value_pointer: None,
            latest: None,
            column: "Close Price".into(),
        },
    );

    let table = collector.fetch(SourceKind::BtcPrice).await.unwrap();

    assert_eq!(table.headers(), &["Date", "Close Price"]);
    assert_eq!(table.rows()[0], vec!["2018-03-01", "10385.9138"]);
    assert_eq!(table.rows()[1], vec!["2018-03-02", "10951.0025"]);
}

#[tokio::test]
async fn json_series_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let collector = JsonSeriesCollector::new(
        SourceKind::Volume,
        EndpointConfig {
            url: format!("{}/charts/volume", server.uri()),
            layout: SeriesLayout::Points,
            pointer: "/values".into(),
            value_pointer: None,
            latest: None,
            column: "Volume".into(),
        },
    );

    let err = collector.fetch(SourceKind::Volume).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503 }));
}

#[tokio::test]
async fn reddit_sends_user_agent_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/Bitcoin/comments.json"))
        .and(query_param("limit", "2"))
        .and(header("user-agent", "collector-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "children": [
                { "data": { "author": "a", "body": "first", "score": 3, "created_utc": 1519862400.0 } }
            ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let collector = RedditCollector::new(reddit_config(server.uri()));
    let table = collector.fetch(SourceKind::RawComments).await.unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0], vec!["2018-03-01", "a", "first", "3"]);
}

#[tokio::test]
async fn twitter_uses_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "bitcoin"))
        .and(query_param("tweet.fields", "created_at"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "id": "1", "text": "gm", "created_at": "2018-03-01T08:00:00.000Z" } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let collector = TwitterCollector::new(TwitterConfig {
        bearer_token: "secret-token".into(),
        base_url: server.uri(),
        ..TwitterConfig::default()
    });

    let table = collector.fetch(SourceKind::RawTweets).await.unwrap();
    assert_eq!(table.rows()[0], vec!["2018-03-01T08:00:00.000Z", "1", "gm"]);
}

#[tokio::test]
async fn configured_run_collects_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bpi.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bpi": { "2018-03-03": 11500.5 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/Bitcoin/comments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "children": [
                { "data": { "author": "b", "body": "hello", "score": 1, "created_utc": 1520035200.0 } }
            ] }
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().display();
    let config = Config::parse(&format!(
        r#"
        [Collector]
        in_path_btc = "{root}/"
        in_path_gtrends = "{root}/"
        in_path_comm = "{root}/"

        [Reddit]
        data_path = "{root}/"
        base_url = "{uri}"

        [Endpoints.btc_price]
        url = "{uri}/bpi.json"
        layout = "date_map"
        pointer = "/bpi"
        column = "Close Price"
        "#,
        uri = server.uri()
    ))
    .unwrap();

    let price_path = SOURCES[0].path(&config);
    fs::write(&price_path, "Date,Close Price\n2018-03-02,10951.0025\n").unwrap();

    let orchestrator = Orchestrator::new(config.clone(), CollectorSet::from_config(&config));
    let report = orchestrator.run_with_report().await;

    assert_eq!(
        fs::read_to_string(&price_path).unwrap(),
        "Date,Close Price\n2018-03-02,10951.0025\n2018-03-03,11500.5\n"
    );
    assert_eq!(
        fs::read_to_string(SOURCES[8].path(&config)).unwrap(),
        "Date,author,body,score\n2018-03-03,b,hello,1\n"
    );

    // Twitter has no token and the other series have no endpoint.
    assert_eq!(report.failed(), 7);
    assert!(matches!(
        report.status_of(SourceKind::BtcPrice),
        Some(SourceStatus::Collected { rows: 1 })
    ));
    assert!(report.aborted.is_none());
}

async fn serve_bpi(server: &MockServer, days: serde_json::Value) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/bpi.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bpi": days })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn daily_runs_append_only_the_newest_day() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().display();
    let config = Config::parse(&format!(
        r#"
        [Collector]
        in_path_btc = "{root}/"
        in_path_gtrends = "{root}/"
        in_path_comm = "{root}/"

        [Reddit]
        data_path = "{root}/"
        base_url = "{uri}"

        [Endpoints.btc_price]
        url = "{uri}/bpi.json"
        layout = "date_map"
        pointer = "/bpi"
        column = "Close Price"
        latest = 1
        "#,
        uri = server.uri()
    ))
    .unwrap();

    let price_path = SOURCES[0].path(&config);
    fs::write(&price_path, "Date,Close Price\n2018-03-01,10300\n").unwrap();
    let orchestrator = Orchestrator::new(config.clone(), CollectorSet::from_config(&config));

    serve_bpi(&server, json!({ "2018-03-01": 10300, "2018-03-02": 10900 })).await;
    assert!(orchestrator.run().await);

    serve_bpi(
        &server,
        json!({ "2018-03-01": 10300, "2018-03-02": 10900, "2018-03-03": 11500 }),
    )
    .await;
    assert!(orchestrator.run().await);

    assert_eq!(
        fs::read_to_string(&price_path).unwrap(),
        "Date,Close Price\n2018-03-01,10300\n2018-03-02,10900\n2018-03-03,11500\n"
    );
}
