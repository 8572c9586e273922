#![allow(clippy::unwrap_used)]
// Integration tests for `ModemClient` against a wiremock device.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netgear_lte::{
    FailoverMode, MessageText, ModemClient, ModemError, Password, PhoneNumber, SmsId,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ModemClient) {
    let server = MockServer::start().await;
    let client = ModemClient::builder(server.address().to_string())
        .password(Password::new("secret").unwrap())
        .build()
        .unwrap();
    (server, client)
}

fn status_document(ids: &[u64]) -> Value {
    let msgs = ids
        .iter()
        .map(|id| {
            json!({
                "id": id.to_string(),
                "rxTime": "11/03/18 08:18:11 PM",
                "text": format!("message {id}"),
                "sender": "555-1",
                "read": false
            })
        })
        .collect::<Vec<_>>();

    json!({
        "general": {"FSN": "4NF1234", "model": "LB2120", "IMEI": "35000"},
        "session": {"secToken": "tok-1"},
        "webd": {"adminPassword": "secret"},
        "wwan": {
            "dataUsage": {"generic": {"dataTransferred": 2048}},
            "connection": "Connected",
            "connectionText": "4G LTE",
            "connectionType": "IPv4AndIPv6",
            "currentNWserviceType": "LteService",
            "currentPSserviceType": "LTE",
            "registerNetworkDisplay": "Carrier",
            "roaming": false
        },
        "wwanadv": {
            "radioQuality": 61,
            "rxLevel": -79,
            "txLevel": 2,
            "curBand": "LTE B3",
            "cellId": 1234
        },
        "failover": {"backhaul": "LTE", "wanConnected": false},
        "sms": {"msgs": msgs}
    })
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/Forms/config"))
        .and(body_string_contains("session.password=secret"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, document: Value) {
    Mock::given(method("GET"))
        .and(path("/model.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .mount(server)
        .await;
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_and_send_sms() {
    let (server, client) = setup().await;
    mount_status(&server, status_document(&[])).await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/Forms/smsSendMsg"))
        .and(body_string_contains("sms.sendMsg.receiver=555-1"))
        .and(body_string_contains("action=send"))
        .and(body_string_contains("token=tok-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.login(None).await.unwrap();
    let status = client
        .send_sms(
            PhoneNumber::new("555-1").unwrap(),
            MessageText::new("hello").unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(status, Some(200));
}

#[tokio::test]
async fn test_login_without_token_fails_after_two_attempts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/model.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"general": {}})))
        .expect(2)
        .mount(&server)
        .await;

    let result = client.login(None).await;
    assert!(
        matches!(result, Err(ModemError::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_logged_out_client_sends_nothing() {
    let (server, client) = setup().await;
    client.logout().await;

    assert_eq!(client.router_restart().await.unwrap(), None);
    assert!(client.information().await.unwrap().is_none());

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "unexpected requests: {requests:?}");
}

#[tokio::test]
async fn test_timeout_is_retried_once_then_aggregated() {
    let server = MockServer::start().await;
    let client = ModemClient::builder(server.address().to_string())
        .password(Password::new("secret").unwrap())
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    mount_status(&server, status_document(&[])).await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/Forms/config"))
        .and(body_string_contains("failover.mode=WAN"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    client.login(None).await.unwrap();
    let err = client
        .set_failover_mode(FailoverMode::Wire)
        .await
        .unwrap_err();

    match err {
        ModemError::Operation { operation, source } => {
            assert_eq!(operation, "set_failover_mode");
            assert!(matches!(*source, ModemError::Timeout { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ── Status tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_information_parses_snapshot() {
    let (server, client) = setup().await;
    mount_status(&server, status_document(&[3, 1])).await;
    mount_login(&server).await;

    client.login(None).await.unwrap();
    let info = client.information().await.unwrap().unwrap();

    assert_eq!(info.serial_number, "4NF1234");
    assert_eq!(info.usage, 2048);
    assert_eq!(info.upstream.as_deref(), Some("LTE"));
    assert!(info.mobile_connected);
    assert_eq!(info.rx_level, -79);
    assert_eq!(
        info.sms.iter().map(|sms| sms.id.value()).collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert_eq!(
        info.item("general.imei").and_then(|it| it.as_str()),
        Some("35000")
    );
    assert!(info.item("webd.adminpassword").is_none());
    assert!(info.item("session.sectoken").is_none());
}

#[tokio::test]
async fn test_new_sms_reaches_listener_once() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    client
        .add_sms_listener(move |sms| {
            sink.lock().unwrap().push(sms.id.value());
            Ok(())
        })
        .await;

    mount_status(&server, status_document(&[5])).await;
    client.login(None).await.unwrap();
    client.information().await.unwrap();
    assert!(seen.lock().unwrap().is_empty());

    server.reset().await;
    mount_login(&server).await;
    mount_status(&server, status_document(&[5, 7])).await;
    client.information().await.unwrap();
    client.information().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![7]);
    assert_eq!(client.max_sms_id().await, Some(SmsId::new(7)));
}
