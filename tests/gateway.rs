mod common;

use common::{token_ok, MockWeCom};
use serde_json::Value;

#[tokio::test]
async fn test_build_authenticated_url_fetches_token_and_encodes() {
    let mock = MockWeCom::start().await;
    mock.state.push_token(token_ok("tok/with+reserved=chars", 7200));
    let client = mock.client();

    let url = client
        .gateway()
        .build_authenticated_url("/cgi-bin/media/upload", &[("type", "file"), ("note", "a b&c")])
        .await
        .unwrap();

    assert_eq!(mock.state.token_calls(), 1);
    assert!(url.starts_with(&format!("{}/cgi-bin/media/upload?", mock.base_url)));
    assert!(url.contains("access_token=tok%2Fwith%2Breserved%3Dchars"), "{url}");
    assert!(url.contains("&type=file&note=a+b%26c"), "{url}");

    // Second build reuses the cached token.
    client
        .gateway()
        .build_authenticated_url("/cgi-bin/message/send", &[])
        .await
        .unwrap();
    assert_eq!(mock.state.token_calls(), 1);
}

#[tokio::test]
async fn test_get_is_a_single_plain_round_trip() {
    let mock = MockWeCom::start().await;
    let client = mock.client();

    let url = format!("{}/cgi-bin/gettoken?corpid=a&corpsecret=b", mock.base_url);
    let resp = client.gateway().get(&url).await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["access_token"], "T");

    assert_eq!(mock.state.token_calls(), 1);
    let query = mock.state.token_requests.lock().unwrap()[0].clone();
    assert_eq!(query["corpid"], "a");
    // A plain GET never touches the token cache.
    assert!(client.credentials().is_expired().await);
}

#[tokio::test]
async fn test_post_sends_body_with_content_type() {
    let mock = MockWeCom::start().await;
    let client = mock.client();

    let url = format!("{}/cgi-bin/message/send?access_token=manual", mock.base_url);
    let resp = client
        .gateway()
        .post(&url, "application/json", br#"{"msgtype":"text"}"#.to_vec())
        .await
        .unwrap();
    assert!(resp.status().is_success());

    assert_eq!(mock.state.token_calls(), 0);
    assert_eq!(mock.state.send_calls(), 1);
    let req = mock.state.last_send();
    assert_eq!(req.query["access_token"], "manual");
    assert_eq!(req.content_type, "application/json");
    assert_eq!(req.json()["msgtype"], "text");
}

#[tokio::test]
async fn test_get_unreachable_host_is_transport_error() {
    let mock = MockWeCom::start().await;
    let client = mock.client();

    let err = client.gateway().get("http://127.0.0.1:9/x").await.unwrap_err();
    assert!(matches!(err, wemessage::WeComError::Transport(_)), "got {err}");
}
