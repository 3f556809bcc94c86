//! Sources and the Upstash store against a local fake upstream.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use folio_core::model::ContributionCalendar;
use folio_gateway::app_state::{AppState, Components, ContributionSource};
use folio_gateway::config::{GatewayConfig, UpstreamSection, YoutubeSection};
use folio_gateway::counter::{CounterStore, MemoryCounterStore, UpstashCounterStore};
use folio_gateway::fallback::Source;
use folio_gateway::handlers;
use folio_gateway::providers::{
    build_http_client, CalendarQuery, ContributionsApiSource, GithubGraphQlSource, SummaryQuery,
    VideoQuery, WakatimeSource, YoutubeSource,
};

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    query: String,
    authorization: Option<String>,
    body: String,
}

/// Answers every request with one canned reply and records what it got.
#[derive(Clone)]
struct FakeUpstream {
    status: StatusCode,
    reply: Arc<String>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakeUpstream {
    fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn only_request(&self) -> Seen {
        let seen = self.requests();
        assert_eq!(seen.len(), 1, "expected exactly one upstream request");
        seen[0].clone()
    }
}

async fn answer(
    State(fake): State<FakeUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    fake.seen.lock().unwrap().push(Seen {
        method,
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (fake.status, fake.reply.as_str().to_string())
}

async fn fake_upstream(status: StatusCode, reply: impl Into<String>) -> (String, FakeUpstream) {
    let fake = FakeUpstream {
        status,
        reply: Arc::new(reply.into()),
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new().fallback(answer).with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), fake)
}

/// An address nothing listens on.
async fn dead_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn http() -> reqwest::Client {
    build_http_client(&UpstreamSection::default()).unwrap()
}

fn graphql_ok() -> String {
    json!({
        "data": { "user": { "contributionsCollection": { "contributionCalendar": {
            "totalContributions": 5,
            "weeks": [{ "contributionDays": [
                { "date": "2024-01-01", "contributionCount": 2, "contributionLevel": "FIRST_QUARTILE" },
                { "date": "2024-01-02", "contributionCount": 3, "contributionLevel": "FOURTH_QUARTILE" }
            ]}]
        }}}}
    })
    .to_string()
}

fn contrib_api_ok() -> String {
    json!({
        "total": { "2023": 9 },
        "contributions": [{ "date": "2023-06-01", "count": 9, "level": 7 }]
    })
    .to_string()
}

#[tokio::test]
async fn github_without_token_is_skipped_before_any_request() {
    let (base, fake) = fake_upstream(StatusCode::OK, graphql_ok()).await;
    let source = GithubGraphQlSource::new(http(), format!("{base}/graphql"), "octocat".into(), None);

    let err = source.fetch(&CalendarQuery { year: 2024 }).await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "NOT_CONFIGURED");
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn github_posts_bearer_graphql_for_the_year() {
    let (base, fake) = fake_upstream(StatusCode::OK, graphql_ok()).await;
    let source = GithubGraphQlSource::new(
        http(),
        format!("{base}/graphql"),
        "octocat".into(),
        Some("ghp_test".into()),
    );

    let calendar = source.fetch(&CalendarQuery { year: 2024 }).await.unwrap();
    assert_eq!(calendar.total_for(2024), 5);
    assert_eq!(calendar.contributions.len(), 2);
    assert_eq!(calendar.contributions[1].level, 4);

    let req = fake.only_request();
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "/graphql");
    assert_eq!(req.authorization.as_deref(), Some("Bearer ghp_test"));

    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body["variables"]["username"], "octocat");
    assert_eq!(body["variables"]["from"], "2024-01-01T00:00:00Z");
    assert_eq!(body["variables"]["to"], "2024-12-31T23:59:59Z");
    assert!(body["query"].as_str().unwrap().contains("contributionCalendar"));
}

#[tokio::test]
async fn non_2xx_and_garbage_are_upstream_failures() {
    for (status, reply) in [
        (StatusCode::INTERNAL_SERVER_ERROR, graphql_ok()),
        (StatusCode::OK, "<html>rate limited</html>".to_string()),
    ] {
        let (base, _fake) = fake_upstream(status, reply).await;
        let source = GithubGraphQlSource::new(
            http(),
            format!("{base}/graphql"),
            "octocat".into(),
            Some("ghp_test".into()),
        );
        let err = source.fetch(&CalendarQuery { year: 2024 }).await.unwrap_err();
        assert_eq!(err.client_code().as_str(), "UPSTREAM", "status {status}");
    }
}

#[tokio::test]
async fn unreachable_upstream_is_an_upstream_failure() {
    let addr = dead_address().await;
    let source = ContributionsApiSource::new(http(), format!("http://{addr}/v4"), "octocat".into());

    let err = source.fetch(&CalendarQuery { year: 2023 }).await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "UPSTREAM");
}

#[tokio::test]
async fn contributions_api_gets_user_path_with_year() {
    let (base, fake) = fake_upstream(StatusCode::OK, contrib_api_ok()).await;
    let source = ContributionsApiSource::new(http(), format!("{base}/v4/"), "octocat".into());

    let calendar = source.fetch(&CalendarQuery { year: 2023 }).await.unwrap();
    assert_eq!(calendar.total_for(2023), 9);
    assert_eq!(calendar.contributions[0].level, 4);

    let req = fake.only_request();
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.path, "/v4/octocat");
    assert_eq!(req.query, "y=2023");
    assert_eq!(req.authorization, None);
}

#[tokio::test]
async fn failing_primary_falls_through_to_secondary_over_http() {
    let (gh_base, gh) = fake_upstream(StatusCode::BAD_GATEWAY, "{}").await;
    let (api_base, api) = fake_upstream(StatusCode::OK, contrib_api_ok()).await;

    let components = Components {
        counter: Arc::new(MemoryCounterStore::new()),
        contributions: vec![
            Arc::new(GithubGraphQlSource::new(
                http(),
                format!("{gh_base}/graphql"),
                "octocat".into(),
                Some("ghp_test".into()),
            )) as ContributionSource,
            Arc::new(ContributionsApiSource::new(http(), format!("{api_base}/v4"), "octocat".into()))
                as ContributionSource,
        ],
        coding: Vec::new(),
        video: Vec::new(),
    };
    let app = AppState::assemble(GatewayConfig::default(), components);

    let resolved = app.contributions().resolve(&CalendarQuery { year: 2023 }).await;
    assert_eq!(resolved.source, "contributions_api");
    assert_eq!(resolved.value.total_for(2023), 9);
    assert_eq!(gh.requests().len(), 1);
    assert_eq!(api.requests().len(), 1);

    let resp = handlers::github_contributions(State(app), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn both_calendar_sources_down_serve_empty_year() {
    let (gh_base, _gh) = fake_upstream(StatusCode::INTERNAL_SERVER_ERROR, "").await;
    let (api_base, _api) = fake_upstream(StatusCode::OK, "not json").await;

    let components = Components {
        counter: Arc::new(MemoryCounterStore::new()),
        contributions: vec![
            Arc::new(GithubGraphQlSource::new(
                http(),
                format!("{gh_base}/graphql"),
                "octocat".into(),
                Some("ghp_test".into()),
            )) as ContributionSource,
            Arc::new(ContributionsApiSource::new(http(), format!("{api_base}/v4"), "octocat".into()))
                as ContributionSource,
        ],
        coding: Vec::new(),
        video: Vec::new(),
    };
    let app = AppState::assemble(GatewayConfig::default(), components);

    let resolved = app.contributions().resolve(&CalendarQuery { year: 2022 }).await;
    assert!(resolved.is_default());
    assert_eq!(resolved.value, ContributionCalendar::empty(2022));
}

#[tokio::test]
async fn wakatime_sends_basic_auth_and_window() {
    let reply = json!({ "data": [{
        "grand_total": { "total_seconds": 1500.0 },
        "languages": [
            { "name": "Rust", "percent": 80.1, "total_seconds": 1201.5 },
            { "name": "Go", "percent": 19.9, "total_seconds": 298.5 }
        ]
    }]});
    let (base, fake) = fake_upstream(StatusCode::OK, reply.to_string()).await;
    let source = WakatimeSource::new(http(), format!("{base}/api/v1"), 7, Some("waka_key".into()));

    let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let summary = source.fetch(&SummaryQuery { today }).await.unwrap();
    assert!(summary.is_active);
    assert_eq!(summary.hours, "25 min");

    let req = fake.only_request();
    assert_eq!(req.path, "/api/v1/users/current/summaries");
    assert_eq!(req.query, "start=2025-02-24&end=2025-03-03");
    let expected = format!("Basic {}", STANDARD.encode("waka_key"));
    assert_eq!(req.authorization.as_deref(), Some(expected.as_str()));
}

#[tokio::test]
async fn wakatime_without_key_is_skipped() {
    let (base, fake) = fake_upstream(StatusCode::OK, "{}").await;
    let source = WakatimeSource::new(http(), base, 7, None);

    let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let err = source.fetch(&SummaryQuery { today }).await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "NOT_CONFIGURED");
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn youtube_queries_playlist_items() {
    let reply = json!({ "items": [{ "snippet": {
        "publishedAt": "2025-03-10T11:00:00Z",
        "title": "Sunset timelapse",
        "description": "",
        "channelTitle": "Nature",
        "thumbnails": { "medium": { "url": "https://i.ytimg.com/vi/abc/mqdefault.jpg" } },
        "resourceId": { "videoId": "abc" }
    }}]});
    let (base, fake) = fake_upstream(StatusCode::OK, reply.to_string()).await;

    let cfg = YoutubeSection {
        api_url: format!("{base}/youtube/v3"),
        ..YoutubeSection::default()
    };
    let source = YoutubeSource::new(http(), &cfg, Some("yt_key".into()), Some("PL123".into()));

    let now: DateTime<Utc> = "2025-03-10T12:00:00Z".parse().unwrap();
    let video = source.fetch(&VideoQuery { now }).await.unwrap();
    // one hour old: wins without a keyword match
    assert_eq!(video.title, "Sunset timelapse");
    assert_eq!(video.link, "https://www.youtube.com/watch?v=abc");

    let req = fake.only_request();
    assert_eq!(req.path, "/youtube/v3/playlistItems");
    assert_eq!(req.query, "part=snippet&playlistId=PL123&maxResults=50&key=yt_key");
}

#[tokio::test]
async fn youtube_without_playlist_is_skipped() {
    let (base, fake) = fake_upstream(StatusCode::OK, "{}").await;
    let cfg = YoutubeSection {
        api_url: base,
        ..YoutubeSection::default()
    };
    let source = YoutubeSource::new(http(), &cfg, Some("yt_key".into()), None);

    let err = source.fetch(&VideoQuery { now: Utc::now() }).await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "NOT_CONFIGURED");
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn upstash_incr_posts_command_with_bearer() {
    let (base, fake) = fake_upstream(StatusCode::OK, r#"{"result":42}"#).await;
    let store = UpstashCounterStore::new(
        http(),
        format!("{base}/"),
        "up_token".into(),
        "portfolio:visitor_count".into(),
    );

    assert_eq!(store.increment().await.unwrap(), 42);

    let req = fake.only_request();
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "/");
    assert_eq!(req.authorization.as_deref(), Some("Bearer up_token"));
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body, json!(["INCR", "portfolio:visitor_count"]));
}

#[tokio::test]
async fn upstash_get_reads_string_result() {
    let (base, fake) = fake_upstream(StatusCode::OK, r#"{"result":"41"}"#).await;
    let store = UpstashCounterStore::new(http(), base, "up_token".into(), "visits".into());

    assert_eq!(store.read().await.unwrap(), 41);
    let body: serde_json::Value = serde_json::from_str(&fake.only_request().body).unwrap();
    assert_eq!(body, json!(["GET", "visits"]));
}

#[tokio::test]
async fn upstash_failures_are_store_errors() {
    for (status, reply) in [
        (StatusCode::UNAUTHORIZED, r#"{"error":"WRONGPASS"}"#),
        (StatusCode::OK, r#"{"error":"ERR value is not an integer"}"#),
        (StatusCode::OK, "garbage"),
    ] {
        let (base, _fake) = fake_upstream(status, reply).await;
        let store = UpstashCounterStore::new(http(), base, "up_token".into(), "visits".into());
        let err = store.increment().await.unwrap_err();
        assert_eq!(err.client_code().as_str(), "STORE", "{reply}");
    }
}

#[tokio::test]
async fn unreachable_upstash_reads_as_zero_through_the_handler() {
    let addr = dead_address().await;
    let store = UpstashCounterStore::new(http(), format!("http://{addr}"), "t".into(), "visits".into());

    let components = Components {
        counter: Arc::new(store),
        contributions: Vec::new(),
        coding: Vec::new(),
        video: Vec::new(),
    };
    let app = AppState::assemble(GatewayConfig::default(), components);

    let resp = handlers::visitor_count(State(app.clone()), Method::GET, HeaderMap::new()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "count": 0 }));
    assert_eq!(
        app.metrics()
            .counter_ops
            .get(&[("op", "read"), ("outcome", "STORE")]),
        1
    );
}
