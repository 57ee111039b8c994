//! End-to-end load tests: mock interpreter, real classifier, bundled fallback.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ecomap_core::{Category, MountGuard};
use ecomap_overpass::{
    load_fallback, FallbackReason, FallbackSource, OverpassClient, PointLoader, PointSource,
};

fn loader(server: &MockServer) -> PointLoader<OverpassClient> {
    let client = OverpassClient::new(
        &format!("{}/api/interpreter", server.uri()),
        5,
        "ecomap-test/0.1",
        0,
        0,
    )
    .expect("failed to build test OverpassClient");
    PointLoader::new(client, FallbackSource::Bundled, "MY", "Malaysia")
}

async fn mount_response(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn bundled_len() -> usize {
    load_fallback(&FallbackSource::Bundled).unwrap().points.len()
}

#[tokio::test]
async fn live_response_is_classified() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 3.1, "lon": 101.6,
                 "tags": {"amenity": "hospital", "name": "General Hospital"}},
                {"type": "node", "id": 2, "lat": 3.0, "lon": 101.5,
                 "tags": {"amenity": "recycling", "recycling:batteries": "yes"}},
                {"type": "node", "id": 3, "lat": 3.0, "lon": 101.5,
                 "tags": {"shop": "bakery"}}
            ]
        })),
    )
    .await;

    let loaded = loader(&server).load(&MountGuard::new()).await.unwrap();
    assert_eq!(loaded.source, PointSource::Live);
    let categories: Vec<Category> = loaded.points.iter().map(|p| p.category).collect();
    assert_eq!(categories, vec![Category::Hospital, Category::Ewaste]);
}

#[tokio::test]
async fn server_error_substitutes_fallback() {
    let server = MockServer::start().await;
    mount_response(&server, ResponseTemplate::new(500)).await;

    let loaded = loader(&server).load(&MountGuard::new()).await.unwrap();
    assert_eq!(
        loaded.source,
        PointSource::Fallback {
            reason: FallbackReason::RemoteUnavailable
        }
    );
    assert_eq!(loaded.points.len(), bundled_len());
}

#[tokio::test]
async fn malformed_body_substitutes_fallback() {
    let server = MockServer::start().await;
    mount_response(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let loaded = loader(&server).load(&MountGuard::new()).await.unwrap();
    assert_eq!(
        loaded.source,
        PointSource::Fallback {
            reason: FallbackReason::MalformedResponse
        }
    );
}

#[tokio::test]
async fn empty_elements_substitutes_fallback() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"elements": []})),
    )
    .await;

    let loaded = loader(&server).load(&MountGuard::new()).await.unwrap();
    assert_eq!(
        loaded.source,
        PointSource::Fallback {
            reason: FallbackReason::NoUsableRecords
        }
    );
    assert_eq!(loaded.points.len(), bundled_len());
}

#[tokio::test]
async fn unmounted_view_receives_nothing() {
    let server = MockServer::start().await;
    mount_response(&server, ResponseTemplate::new(500)).await;

    let mount = MountGuard::new();
    mount.unmount();
    assert!(loader(&server).load(&mount).await.is_none());
}

#[tokio::test]
async fn connection_refused_substitutes_fallback() {
    // Reserve a local port, then release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    };
    let client = OverpassClient::new(
        &format!("http://127.0.0.1:{port}/api/interpreter"),
        5,
        "ecomap-test/0.1",
        1,
        0,
    )
    .expect("failed to build test OverpassClient");
    let loader = PointLoader::new(client, FallbackSource::Bundled, "MY", "Malaysia");

    let loaded = loader.load(&MountGuard::new()).await.unwrap();
    assert_eq!(
        loaded.source,
        PointSource::Fallback {
            reason: FallbackReason::RemoteUnavailable
        }
    );
    assert_eq!(loaded.points.len(), bundled_len());
}
