//! End-to-end tests of the graph client over HTTP
//!
//! Uses wiremock as the graph host; the client is wired with `connect`.

use goplay_domain::{GraphConfig, GraphError, Params};
use goplay_infra::connect;
use serde_json::json;
use wiremock::matchers::{body_string, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> GraphConfig {
    GraphConfig::new("1234", "s3cret").with_test_mode(true).with_base_url(server.uri())
}

async fn mount_token(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(body_string(
            "client_id=1234&client_secret=s3cret&grant_type=publisher_credentials&method=get",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "access_token": token } })),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn players_listing_fetches_token_then_calls_endpoint() {
    let server = MockServer::start().await;
    mount_token(&server, "T1", 1).await;
    Mock::given(method("POST"))
        .and(path("/1234/players"))
        .and(body_string("access_token=T1&method=get"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "email": "a@b.c" }] })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = connect(&config(&server)).unwrap();
    let players = client.publisher().resource("players");

    let first = players.clone().get(Params::new()).await.unwrap();
    let second = players.clone().get(Params::new()).await.unwrap();

    assert_eq!(first.data(), &json!([{ "email": "a@b.c" }]));
    assert_eq!(first, second);
}

#[tokio::test]
async fn expired_token_is_replaced_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "access_token": "T1" } })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_token(&server, "T2", 1).await;
    Mock::given(method("POST"))
        .and(path("/1234/players"))
        .and(body_string_contains("access_token=T1"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": { "code": 190, "message": "bad token" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1234/players"))
        .and(body_string_contains("access_token=T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [1, 2] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&config(&server)).unwrap();
    let result = client.publisher().resource("players").get(Params::new()).await.unwrap();

    assert_eq!(result.data(), &json!([1, 2]));
    assert_eq!(client.failure_count().await.unwrap(), 0);
}

#[tokio::test]
async fn paging_link_is_followed_against_the_configured_host() {
    let server = MockServer::start().await;
    mount_token(&server, "T1", 1).await;
    Mock::given(method("POST"))
        .and(path("/1234/players"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1 }],
            "paging": { "next": "https://graph.goplay.com/x/players?after=10&access_token=T1" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/x/players"))
        .and(body_string("after=10&access_token=T1&method=get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": 2 }] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&config(&server)).unwrap();
    let first = client.publisher().resource("players").get(Params::new()).await.unwrap();
    let second = client.next(&first).await.unwrap().unwrap();

    assert_eq!(second.data(), &json!([{ "id": 2 }]));
}

#[tokio::test]
async fn form_encoded_error_body_is_a_failure() {
    let server = MockServer::start().await;
    mount_token(&server, "T1", 1).await;
    Mock::given(method("POST"))
        .and(path("/1234/playersclub/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("error%5Bcode%5D=100&error%5Bmessage%5D=Unknown+account"),
        )
        .mount(&server)
        .await;

    let client = connect(&config(&server)).unwrap();
    let err = client
        .publisher()
        .resource("playersclub")
        .delete_at("42", Params::new())
        .await
        .unwrap_err();

    let api = err.as_api().unwrap();
    assert_eq!(api.code, 100);
    assert_eq!(
        api.message,
        format!(
            "Error in request to {}/1234/playersclub/42?access_token=T1&method=delete: Unknown account",
            server.uri()
        )
    );
}

#[tokio::test]
async fn html_error_page_is_a_parse_error() {
    let server = MockServer::start().await;
    mount_token(&server, "T1", 1).await;
    Mock::given(method("POST"))
        .and(path("/1234/players"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = connect(&config(&server)).unwrap();
    let result = client.publisher().resource("players").get(Params::new()).await;

    assert!(matches!(result, Err(GraphError::Parse { .. })));
}

#[test]
fn connect_rejects_blank_credentials() {
    let result = connect(&GraphConfig::new("1234", ""));
    assert!(matches!(result, Err(GraphError::Config(_))));
}
