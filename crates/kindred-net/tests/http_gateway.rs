//! HTTP gateway tests against a mock server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kindred_net::{HttpGateway, RemoteError, RemoteGateway};
use kindred_shared::constants::DEFAULT_AVATAR_URL;
use kindred_shared::types::SessionContext;

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(SessionContext::new(server.uri(), "t0k")).unwrap()
}

#[tokio::test]
async fn fetch_matches_sends_bearer_and_normalizes_mixed_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/matches"))
        .and(header("Authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                { "username": "ana", "avatar": "http://a/1.png", "compatibility": 0.8 },
                "luis"
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let matches = gateway(&server).fetch_my_matches().await.unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].compatibility, Some(0.8));
    assert_eq!(matches[1].username, "luis");
    assert_eq!(matches[1].avatar_url, DEFAULT_AVATAR_URL);
}

#[tokio::test]
async fn missing_credential_short_circuits_before_any_request() {
    let server = MockServer::start().await;
    // No mock mounted: a request would 404 and fail differently.
    let gw = HttpGateway::new(SessionContext::anonymous(server.uri())).unwrap();

    let err = gw.fetch_my_matches().await.unwrap_err();
    assert!(matches!(err, RemoteError::MissingCredential));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn status_codes_map_onto_the_error_taxonomy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/interest"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/me/match"))
        .and(body_json(json!({ "target": "ana" })))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me/lv2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gw = gateway(&server);
    assert!(matches!(
        gw.fetch_my_interests().await.unwrap_err(),
        RemoteError::Auth
    ));
    assert!(matches!(
        gw.create_match("ana").await.unwrap_err(),
        RemoteError::Conflict
    ));
    let err = gw.fetch_suggested().await.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn search_posts_term_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/other/search"))
        .and(body_json(json!({ "term": "sof" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{ "username": "sofia", "first_name": "Sofía" }]
        })))
        .mount(&server)
        .await;

    let results = gateway(&server).search_users("sof").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].username, "sofia");
}

#[tokio::test]
async fn trending_decodes_rankings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pagerank"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rankings": [{ "name": "jazz", "score": 0.0421 }]
        })))
        .mount(&server)
        .await;

    let trending = gateway(&server).fetch_trending().await.unwrap();
    assert_eq!(trending[0].name, "jazz");
    assert!((trending[0].score - 0.0421).abs() < 1e-9);
}
