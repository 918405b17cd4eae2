use std::time::Duration;

use httpmock::{
    Method::{GET, HEAD, POST, PUT},
    MockServer,
};
use reqwest::{Method, StatusCode};
use restricted_http::{Config, Error, RestrictedClient};

fn client(ceiling: usize, timeout: Duration) -> RestrictedClient {
    RestrictedClient::new(Config::new(ceiling, timeout)).unwrap()
}

#[tokio::test]
async fn post() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/burgers")
                .header("content-type", "application/json")
                .body(r#"{"name":"cheese"}"#);
            then.status(201).body("created");
        })
        .await;

    let client = client(1, Duration::from_secs(5));
    let response = client
        .post(
            server.url("/burgers").as_str(),
            "application/json",
            r#"{"name":"cheese"}"#,
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.text().await.unwrap(), "created");
    mock.assert_async().await;
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn post_form() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/orders")
                .header("content-type", "application/x-www-form-urlencoded")
                .body("name=burger&size=large");
            then.status(200);
        })
        .await;

    let client = client(1, Duration::from_secs(5));
    let form = [("name", "burger"), ("size", "large")];
    let response = client
        .post_form(server.url("/orders").as_str(), &form)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn head() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(HEAD).path("/menu");
            then.status(204);
        })
        .await;

    let client = client(1, Duration::from_secs(5));
    let response = client.head(server.url("/menu").as_str()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    mock.assert_async().await;
}

#[tokio::test]
async fn execute() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/menu/1").body("fries");
            then.status(200);
        })
        .await;

    let client = client(1, Duration::from_secs(5));
    let request = client
        .request(Method::PUT, server.url("/menu/1").as_str())
        .body("fries")
        .build()
        .unwrap();
    assert_eq!(client.in_flight(), 0);
    let response = client.execute(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn error_status_is_a_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/closed");
            then.status(503);
        })
        .await;

    let client = client(1, Duration::from_secs(5));
    let response = client.get(server.url("/closed").as_str()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn timeout_releases() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_secs(2));
        })
        .await;

    let client = client(1, Duration::from_millis(100));
    let err = client.get(server.url("/slow").as_str()).await.unwrap_err();
    match err {
        Error::Transport(err) => assert!(err.is_timeout()),
        Error::MaxConcurrencyReached => panic!("unexpected rejection"),
    }
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn connection_error_releases() {
    // Reserve a port, then free it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = client(1, Duration::from_secs(5));
    let err = client.get(format!("http://{address}/")).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn rejected_verbs_send_nothing() {
    let server = MockServer::start_async().await;
    let slow = server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500));
        })
        .await;
    let other = server
        .mock_async(|when, then| {
            when.path("/other");
            then.status(200);
        })
        .await;

    let client = client(1, Duration::from_secs(5));
    let slow_url = server.url("/slow");
    let other_url = server.url("/other");
    let form = [("a", "b")];
    // Polled in order, so the first request takes the only slot
    let (first, post, form, head) = futures::join!(
        client.get(slow_url.as_str()),
        client.post(other_url.as_str(), "text/plain", "body"),
        client.post_form(other_url.as_str(), &form),
        client.head(other_url.as_str()),
    );
    assert_eq!(first.unwrap().status(), StatusCode::OK);
    assert!(post.unwrap_err().is_max_concurrency_reached());
    assert!(form.unwrap_err().is_max_concurrency_reached());
    assert!(head.unwrap_err().is_max_concurrency_reached());
    slow.assert_hits_async(1).await;
    other.assert_hits_async(0).await;
}

#[tokio::test]
async fn close_idle_connections_mid_flight() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(300));
        })
        .await;

    let client = client(2, Duration::from_secs(5));
    let url = server.url("/slow");
    let (response, ()) = futures::join!(client.get(url.as_str()), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(client.in_flight(), 1);
        client.close_idle_connections();
        assert_eq!(client.in_flight(), 1);
    });
    assert_eq!(response.unwrap().status(), StatusCode::OK);
    assert_eq!(client.in_flight(), 0);

    // The fresh pool serves later requests
    let response = client.get(url.as_str()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.in_flight(), 0);
}
