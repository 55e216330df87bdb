use cirrus_client::{ClientError, Endpoints, GoogleClient};
use cirrus_core::domain::operation::{Operation, OperationRef};
use cirrus_waiter::{
    PollConfig, WaitError, wait_for_operation, wait_global, wait_region, wait_zone,
};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn client(server: &mockito::Server) -> GoogleClient {
    GoogleClient::with_endpoints(Endpoints::single(server.url())).with_token("test-token")
}

fn quick() -> PollConfig {
    PollConfig::new(Duration::from_secs(5)).with_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn test_zone_operation_done() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/projects/proj/zones/us-central1-a/operations/op-1")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(r#"{"name": "op-1", "status": "DONE", "zone": "https://www.googleapis.com/compute/beta/projects/proj/zones/us-central1-a"}"#)
        .create_async()
        .await;

    let op_ref = OperationRef::zone("proj", "us-central1-a", "op-1");
    let op = wait_for_operation(&client(&server), &op_ref, "instance to create", quick(), None)
        .await
        .unwrap();

    assert_eq!(op.name, "op-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_region_operation_with_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/projects/proj/regions/us-east1/operations/op-2")
        .with_status(200)
        .with_body(
            r#"{
                "name": "op-2",
                "status": "DONE",
                "error": {"errors": [
                    {"code": "QUOTA_EXCEEDED", "message": "quota exceeded"},
                    {"code": "RATE_LIMITED", "message": "retry later"}
                ]}
            }"#,
        )
        .create_async()
        .await;

    let op_ref = OperationRef::region("proj", "us-east1", "op-2");
    let err = wait_for_operation(&client(&server), &op_ref, "address to create", quick(), None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "quota exceeded\nretry later\n");
}

#[tokio::test]
async fn test_global_operation_not_found_is_lookup_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/projects/proj/global/operations/gone")
        .with_status(404)
        .with_body(r#"{"error": {"code": 404}}"#)
        .expect(1)
        .create_async()
        .await;

    let op_ref = OperationRef::global("proj", "gone");
    let err = wait_for_operation(&client(&server), &op_ref, "network to delete", quick(), None)
        .await
        .unwrap_err();

    let source = err
        .lookup_error()
        .and_then(|e| e.downcast_ref::<ClientError>())
        .expect("client error");
    assert!(source.is_not_found());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancelled_before_first_check() {
    let server = mockito::Server::new_async().await;
    let token = CancellationToken::new();
    token.cancel();

    let op_ref = OperationRef::global("proj", "op-3");
    let config = quick().with_delay(Duration::from_secs(1));
    let err = wait_for_operation(&client(&server), &op_ref, "route to create", config, Some(token))
        .await
        .unwrap_err();

    assert!(matches!(err, WaitError::Cancelled { .. }));
}

fn started(name: &str) -> Operation {
    Operation {
        name: name.to_string(),
        status: "PENDING".to_string(),
        ..Default::default()
    }
}

fn done_body(name: &str) -> String {
    format!(r#"{{"name": "{}", "status": "DONE"}}"#, name)
}

#[tokio::test]
async fn test_scope_waits_check_once_after_initial_delay() {
    let mut server = mockito::Server::new_async().await;
    let zone = server
        .mock("GET", "/projects/proj/zones/us-central1-a/operations/op-z")
        .with_status(200)
        .with_body(done_body("op-z"))
        .expect(1)
        .create_async()
        .await;
    let region = server
        .mock("GET", "/projects/proj/regions/us-east1/operations/op-r")
        .with_status(200)
        .with_body(done_body("op-r"))
        .expect(1)
        .create_async()
        .await;
    let global = server
        .mock("GET", "/projects/proj/global/operations/op-g")
        .with_status(200)
        .with_body(done_body("op-g"))
        .expect(1)
        .create_async()
        .await;

    let client = client(&server);
    let timeout = Duration::from_secs(30);
    let (op_z, op_r, op_g) = (started("op-z"), started("op-r"), started("op-g"));

    let begin = Instant::now();
    let (z, r, g) = tokio::join!(
        wait_zone(&client, "proj", "us-central1-a", &op_z, "instance to create", timeout),
        wait_region(&client, "proj", "us-east1", &op_r, "address to create", timeout),
        wait_global(&client, "proj", &op_g, "network to create", timeout),
    );

    assert_eq!(z.unwrap().name, "op-z");
    assert_eq!(r.unwrap().name, "op-r");
    assert_eq!(g.unwrap().name, "op-g");
    assert!(begin.elapsed() >= Duration::from_secs(10));
    zone.assert_async().await;
    region.assert_async().await;
    global.assert_async().await;
}

#[tokio::test]
async fn test_timeout_shorter_than_initial_delay_never_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/projects/proj/regions/us-east1/operations/op-r")
        .with_status(200)
        .with_body(done_body("op-r"))
        .expect(0)
        .create_async()
        .await;

    let begin = Instant::now();
    let err = wait_region(
        &client(&server),
        "proj",
        "us-east1",
        &started("op-r"),
        "address to create",
        Duration::from_secs(3),
    )
    .await
    .unwrap_err();

    assert!(err.is_timeout());
    assert!(err.to_string().starts_with("Error waiting for address to create"));
    let elapsed = begin.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(10));
    mock.assert_async().await;
}
