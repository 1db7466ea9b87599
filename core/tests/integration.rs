//! End-to-end dispatch tests against the live mock server.
//!
//! Each test starts its own server instance on a random port (servers are
//! cheap, and separate instances keep the seeded state independent), then
//! exercises one dispatch behavior over real HTTP.

use apitest_core::{logging, ApiClient, ApiError, ApiRequest, Method};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct UserDto {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorDto {
    error: String,
}

/// Start the mock server on a random port and return its `host:port`.
fn start_server() -> String {
    logging::init_console_logger();

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr.to_string()
}

#[test]
fn dispatch_returns_typed_user() {
    let client = ApiClient::with_scheme(&start_server(), "http");
    let req = ApiRequest::get("/users/1").expect_status(&[200]);

    let resp = client.dispatch::<UserDto>(&req).unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.typed,
        UserDto {
            id: 1,
            name: "Ann".to_string()
        }
    );
    assert_eq!(resp.json["name"], "Ann");
    assert!(resp.text.contains("Ann"));
}

#[test]
fn status_mismatch_fails_before_deserialization() {
    let client = ApiClient::with_scheme(&start_server(), "http");
    let req = ApiRequest::get("/users/999").expect_status(&[200]);

    // The 404 body does not match UserDto; reaching UnexpectedStatus (not
    // Deserialization) shows the status check ran first.
    let err = client.dispatch::<UserDto>(&req).unwrap_err();
    match err {
        ApiError::UnexpectedStatus {
            status, expected, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(expected, vec![200]);
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[test]
fn expected_error_status_deserializes_error_shape() {
    let client = ApiClient::with_scheme(&start_server(), "http");
    let req = ApiRequest::get("/users/999").expect_status(&[404]);

    let resp = client.dispatch::<ErrorDto>(&req).unwrap();

    assert_eq!(resp.status, 404);
    assert_eq!(resp.typed.error, "user not found");
}

#[test]
fn descriptor_header_overrides_default_over_the_wire() {
    let client =
        ApiClient::with_scheme(&start_server(), "http").default_header("X-Env", "test");
    let req = ApiRequest::get("/echo").header("X-Env", "prod");

    let resp = client.dispatch::<Value>(&req).unwrap();

    assert_eq!(resp.json["headers"]["x-env"], "prod");
}

#[test]
fn default_header_sent_when_not_overridden() {
    let client =
        ApiClient::with_scheme(&start_server(), "http").default_header("X-Env", "test");
    let req = ApiRequest::get("/echo");

    let resp = client.dispatch::<Value>(&req).unwrap();

    assert_eq!(resp.json["headers"]["x-env"], "test");
}

#[test]
fn cookies_merge_with_descriptor_precedence() {
    let client = ApiClient::with_scheme(&start_server(), "http")
        .default_cookie("session", "abc")
        .default_cookie("lang", "en");
    let req = ApiRequest::get("/echo")
        .cookie("session", "xyz")
        .cookie("theme", "dark");

    let resp = client.dispatch::<Value>(&req).unwrap();

    assert_eq!(resp.json["cookies"]["session"], "xyz");
    assert_eq!(resp.json["cookies"]["lang"], "en");
    assert_eq!(resp.json["cookies"]["theme"], "dark");
}

#[test]
fn query_params_pass_through() {
    let client = ApiClient::with_scheme(&start_server(), "http");
    let req = ApiRequest::get("/echo").param("verbose", "1").param("page", "2");

    let resp = client.dispatch::<Value>(&req).unwrap();

    assert_eq!(resp.json["params"]["verbose"], "1");
    assert_eq!(resp.json["params"]["page"], "2");
}

#[test]
fn post_json_body_creates_user() {
    let client = ApiClient::with_scheme(&start_server(), "http");
    let req = ApiRequest::post("/users")
        .body(json!({"name": "Bo"}))
        .expect_status(&[201]);

    let resp = client.dispatch::<UserDto>(&req).unwrap();

    assert_eq!(resp.status, 201);
    assert_eq!(resp.typed.name, "Bo");
    assert_eq!(resp.typed.id, 2);
}

#[test]
fn json_body_carries_content_type_over_the_wire() {
    let client = ApiClient::with_scheme(&start_server(), "http");
    let req = ApiRequest::new(Method::Post, "/echo").body(json!({"probe": true}));

    let resp = client.dispatch::<Value>(&req).unwrap();

    assert_eq!(resp.json["headers"]["content-type"], "application/json");
}

#[test]
fn shape_mismatch_is_deserialization_error() {
    let client = ApiClient::with_scheme(&start_server(), "http");
    let req = ApiRequest::get("/users/1");

    // The body is a single object, not an array.
    let err = client.dispatch::<Vec<UserDto>>(&req).unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)));
}

#[test]
fn transport_failure_propagates() {
    // Bind then drop to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::with_scheme(&addr.to_string(), "http");
    let err = client.dispatch::<Value>(&ApiRequest::get("/")).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
