//! Integration tests for the blocking HttpClient
//!
//! Every test runs against a local mockito server; nothing leaves the machine.

use funimationlater::api::{HttpClient, JsonParser, Query, RequestInfo};
use funimationlater::error::{FunimationError, Result};
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const SHOW_XML: &str = "<show><id>42</id><title>Cowboy Bebop</title></show>";

#[test]
fn test_get_relative_path_returns_parsed_body() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/episodes/42")
        .with_status(200)
        .with_header("content-type", "application/xml")
        .with_body(SHOW_XML)
        .create();

    let mut client = HttpClient::new(server.url()).expect("client");
    let value = client.get("episodes/42", None).expect("get");

    mock.assert();
    assert_eq!(value, json!({"show": {"id": "42", "title": "Cowboy Bebop"}}));

    let latest = client.recent_requests().latest().expect("recorded");
    assert_eq!(latest.url, format!("{}/episodes/42", server.url()));
    assert_eq!(latest.method, reqwest::Method::GET);
}

#[test]
fn test_get_with_query_and_error_status() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/shows")
        .match_query(Matcher::UrlEncoded("a".into(), "b c".into()))
        .with_status(500)
        .with_header("x-reason", "maintenance")
        .with_body("boom")
        .create();

    let mut client = HttpClient::new(server.url()).expect("client");
    let mut query = BTreeMap::new();
    query.insert("a", "b c");
    let err = client.get("/shows", Some(Query::from(query))).unwrap_err();

    mock.assert();
    match err {
        FunimationError::DetailedHttpError { url, status, message, headers, body } => {
            assert!(url.ends_with("/shows?a=b+c"), "url was {url}");
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
            assert_eq!(headers["x-reason"], "maintenance");
            assert_eq!(body, "boom");
        }
        other => panic!("expected DetailedHttpError, got {other:?}"),
    }
}

#[test]
fn test_error_status_survives_unreadable_body() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/shows")
        .with_status(502)
        .with_header("content-encoding", "gzip")
        .with_body("definitely not gzip")
        .create();

    let mut client = HttpClient::new(server.url()).expect("client");
    let err = client.get("/shows", None).unwrap_err();

    mock.assert();
    match err {
        FunimationError::DetailedHttpError { status, body, .. } => {
            assert_eq!(status, 502);
            assert!(body.is_empty(), "body was {body:?}");
        }
        other => panic!("expected DetailedHttpError, got {other:?}"),
    }
}

#[test]
fn test_empty_query_appends_nothing() {
    let mut server = Server::new();
    let mock = server.mock("GET", "/shows").with_body(SHOW_XML).create();

    let mut client = HttpClient::new(server.url()).expect("client");
    client.get("/shows", Some(Query::from(""))).expect("get");

    mock.assert();
    assert_eq!(client.recent_requests().latest().unwrap().url, format!("{}/shows", server.url()));
}

#[test]
fn test_default_and_added_headers_are_sent() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/shows")
        .match_header("accept-encoding", "gzip, deflate")
        .match_header("user-agent", Matcher::Regex("^Rust:FunimationLater:v".into()))
        .match_header("x-test", "1")
        .with_body(SHOW_XML)
        .create();

    let mut client = HttpClient::new(server.url()).expect("client");
    client.add_headers([("X-Test", "1")]).expect("headers");
    client.get("/shows", None).expect("get");

    mock.assert();
}

#[test]
fn test_post_sends_form_body() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/auth/login/")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body("username=me%40example.com&password=p+w%26d")
        .with_body("<authentication><token>t</token></authentication>")
        .create();

    let mut client = HttpClient::new(server.url()).expect("client");
    let value = client
        .post("/auth/login/", &[("username", "me@example.com"), ("password", "p w&d")])
        .expect("post");

    mock.assert();
    assert_eq!(value["authentication"]["token"], "t");
    assert_eq!(client.recent_requests().latest().unwrap().method, reqwest::Method::POST);
}

#[test]
fn test_unparseable_body_is_unknown_response() {
    let mut server = Server::new();
    let _mock = server.mock("GET", "/shows").with_status(200).with_body("<shows><show>").create();

    let mut client = HttpClient::new(server.url()).expect("client");
    let err = client.get("/shows", None).unwrap_err();
    assert!(matches!(err, FunimationError::UnknownResponse { .. }), "got {err:?}");
}

#[test]
fn test_error_document_in_200_is_unknown_response() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/detail/")
        .with_status(200)
        .with_body("<error>Invalid show</error>")
        .create();

    let mut client = HttpClient::new(server.url()).expect("client");
    let err = client.get("detail/", None).unwrap_err();
    assert!(err.to_string().contains("Invalid show"));
}

#[test]
fn test_history_keeps_five_newest_including_failures() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/item/\d+$".into()))
        .with_body(SHOW_XML)
        .create();
    let _mock = server.mock("GET", "/missing").with_status(404).create();

    let mut client = HttpClient::new(server.url()).expect("client");
    for n in 1..=6 {
        client.get(&format!("/item/{n}"), None).expect("get");
        assert!(client.recent_requests().len() <= 5);
    }
    let err = client.get("/missing", None).unwrap_err();
    assert_eq!(err.status_code(), Some(404));

    let paths: Vec<String> = client
        .recent_requests()
        .iter()
        .map(|r: &RequestInfo| r.url.trim_start_matches(&server.url()).to_string())
        .collect();
    assert_eq!(paths, vec!["/missing", "/item/6", "/item/5", "/item/4", "/item/3"]);
}

#[test]
fn test_absolute_uri_bypasses_host() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/cdn/manifest")
        .match_query(Matcher::UrlEncoded("v".into(), "2".into()))
        .with_body(SHOW_XML)
        .create();

    let mut client = HttpClient::new("https://api.example.invalid").expect("client");
    let uri = format!("{}/cdn/manifest", server.url());
    client.get(&uri, Some(Query::from([("v", "2")]))).expect("get");

    mock.assert();
}

#[test]
fn test_json_parser_client() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/mobile/shows.json")
        .with_body(r#"{"items": [{"id": 1, "title": "Bebop"}]}"#)
        .create();

    let mut client = HttpClient::with_parser(server.url(), JsonParser).expect("client");
    let value = client.get("mobile/shows.json", None).expect("get");
    assert_eq!(value["items"][0]["title"], "Bebop");
}

#[test]
fn test_closure_parser_sees_request() {
    let mut server = Server::new();
    let _mock = server.mock("GET", "/raw").with_body("hello").create();

    let parser = |body: &[u8], request: &RequestInfo| -> Result<Value> {
        Ok(json!({"body": String::from_utf8_lossy(body), "method": request.method.as_str()}))
    };
    let mut client = HttpClient::with_parser(server.url(), parser).expect("client");
    let value = client.get("/raw", None).expect("get");
    assert_eq!(value, json!({"body": "hello", "method": "GET"}));
}

#[test]
fn test_connection_failure_is_network_error_and_recorded() {
    // Nothing listens on port 1
    let mut client = HttpClient::new("http://127.0.0.1:1").expect("client");
    let err = client.get("/shows", None).unwrap_err();

    assert!(matches!(err, FunimationError::Network(_)), "got {err:?}");
    assert_eq!(client.recent_requests().len(), 1);
}
