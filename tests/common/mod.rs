// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use belonio_tracker::services::{BelonioClient, ClientOptions, Credentials};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Access token issued by the mock auth endpoint.
#[allow(dead_code)]
pub const ACCESS_TOKEN: &str = "test-access-token";

/// Client options pointing both hosts at the mock server, with short timeouts.
#[allow(dead_code)]
pub fn test_options(server: &MockServer) -> ClientOptions {
    ClientOptions {
        api_host: server.uri(),
        auth_host: server.uri(),
        retry_budget: 3,
        token_retries: 3,
        request_timeout: Duration::from_millis(200),
        token_timeout: Duration::from_millis(200),
    }
}

/// Create a client talking to the mock server.
#[allow(dead_code)]
pub fn test_client(options: ClientOptions) -> BelonioClient {
    BelonioClient::new(
        reqwest::Client::new(),
        Credentials::new("jane@example.com", "hunter2"),
        options,
    )
}

/// Mount a token endpoint that always grants [`ACCESS_TOKEN`].
#[allow(dead_code)]
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 300,
        })))
        .mount(server)
        .await;
}

/// Profile with one past and one active employment.
#[allow(dead_code)]
pub fn profile_json() -> Value {
    json!({
        "firstName": "Jane",
        "employments": {
            "e1": {
                "publicId": "emp-old",
                "validTill": "2022-12-31",
                "employer": { "name": "Old GmbH" },
            },
            "e2": {
                "publicId": "emp-active",
                "validTill": null,
                "employer": { "name": "Acme AG" },
            },
        }
    })
}

/// Mount the profile endpoint. The real API serves it as text/plain.
#[allow(dead_code)]
pub async fn mount_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/profiles/self"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(profile_json().to_string(), "text/plain; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Search result with two cards, the second one being more recent.
#[allow(dead_code)]
pub fn search_json() -> Value {
    json!({
        "content": [
            { "giftcardId": "1", "valuta": 100, "remainingAmount": { "amount": "5.00" } },
            { "giftcardId": "2", "valuta": 200, "remainingAmount": { "amount": "3.00" } },
        ],
        "totalElements": 2,
    })
}

#[allow(dead_code)]
pub async fn mount_search(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/giftcards/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Detail record of card "2".
#[allow(dead_code)]
pub fn detail_json() -> Value {
    json!({
        "giftcardId": "2",
        "valuta": 200,
        "remainingAmount": { "amount": "3.00", "currency": "EUR" },
        "amount": { "amount": "30.00", "currency": "EUR" },
        "properties": { "eVoucherLink": "https://codes.example/barcode?code=XYZ&rt=1" },
    })
}

#[allow(dead_code)]
pub async fn mount_detail(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/giftcards/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json()))
        .mount(server)
        .await;
}

/// Mount every endpoint of a healthy account.
#[allow(dead_code)]
pub async fn mount_account(server: &MockServer) {
    mount_token(server).await;
    mount_profile(server).await;
    mount_search(server, search_json()).await;
    mount_detail(server).await;
}

/// Number of requests the server has received for `request_path`.
#[allow(dead_code)]
pub async fn hits(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}

/// A local URL nothing is listening on.
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener); // release the port so that requests fail with ECONNREFUSED
    format!("http://{}", addr)
}
