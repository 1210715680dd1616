//! End-to-end feed update flows with the network resolvers.
//!
//! The ledger and the gateway are wiremock servers; the stamping library is
//! a [`RecordingWriter`].

use serde_json::json;
use stampkit_lib::config::{ENV_BATCH_ID, ENV_GATEWAY_URL, ENV_PRIVATE_KEY, ENV_RPC_URL};
use stampkit_lib::resolvers::{
    BatchDepthResolver, FeedIndexResolver, GatewayConfig, RpcConfig, CURRENT_INDEX_HEADER,
};
use stampkit_lib::test_utils::{
    test_batch_id, test_reference, test_reserve_key, RecordingWriter, KNOWN_ADDRESS, KNOWN_KEY,
    MY_BLOG_ADDRESS, MY_BLOG_KEY,
};
use stampkit_lib::{
    BatchDepth, Config, FeedIndex, FeedTopic, FeedUpdateOrchestrator, FeedUpdateParams,
    PrivateKey, Provenance, StampkitError, DEFAULT_BATCH_DEPTH,
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const UNREACHABLE: &str = "http://127.0.0.1:1";

fn orchestrator(
    rpc_url: &str,
    gateway_url: &str,
) -> FeedUpdateOrchestrator<BatchDepthResolver, FeedIndexResolver> {
    FeedUpdateOrchestrator::new(
        BatchDepthResolver::new(RpcConfig::new(rpc_url).with_timeout(1)).unwrap(),
        FeedIndexResolver::new(GatewayConfig::new(gateway_url).with_timeout(2)).unwrap(),
        gateway_url,
    )
}

fn zero_topic_path(owner: &str) -> String {
    format!("/feeds/{}/{}", owner, FeedTopic::default())
}

#[tokio::test]
async fn test_first_update_signed_by_reserve_key() {
    let gateway = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(zero_topic_path(KNOWN_ADDRESS)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&gateway)
        .await;

    let params = FeedUpdateParams::new(test_reserve_key(), test_reference(), test_batch_id())
        .with_depth(BatchDepth(20));
    let writer = RecordingWriter::new();
    let plan = orchestrator(UNREACHABLE, &gateway.uri())
        .execute(params, &writer)
        .await
        .unwrap();

    let request = &writer.requests()[0];
    assert_eq!(request.signer_key, test_reserve_key());
    assert_eq!(request.reserve_key, test_reserve_key());
    assert_eq!(request.index, FeedIndex(0));
    assert_eq!(request.depth, BatchDepth(20));
    assert!(!request.uses_project_key());
    assert_eq!(plan.depth_source, Provenance::Explicit);
    assert_eq!(plan.index_source, Provenance::Resolved);
    assert!(plan.warnings().is_empty());
}

#[tokio::test]
async fn test_project_update_continues_existing_feed() {
    let gateway = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(zero_topic_path(MY_BLOG_ADDRESS)))
        .respond_with(
            ResponseTemplate::new(200).insert_header(CURRENT_INDEX_HEADER, "0000000000000004"),
        )
        .expect(1)
        .mount(&gateway)
        .await;

    let rpc = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": format!("0x{}16", "00".repeat(31)),
        })))
        .expect(1)
        .mount(&rpc)
        .await;

    let params = FeedUpdateParams::new(test_reserve_key(), test_reference(), test_batch_id())
        .with_project("My Blog");
    let writer = RecordingWriter::new();
    let plan = orchestrator(&rpc.uri(), &gateway.uri())
        .execute(params, &writer)
        .await
        .unwrap();

    let request = &writer.requests()[0];
    assert_eq!(request.signer_key, PrivateKey::from_hex(MY_BLOG_KEY).unwrap());
    assert_eq!(request.reserve_key.to_hex(), KNOWN_KEY);
    assert_eq!(request.index, FeedIndex(5));
    assert_eq!(request.depth, BatchDepth(22));
    assert_eq!(plan.depth_source, Provenance::Resolved);

    let handoff = request.to_handoff_json();
    assert_eq!(handoff["owner"], MY_BLOG_ADDRESS);
    assert_eq!(handoff["project"], "my-blog");
    assert_eq!(handoff["signerKey"], MY_BLOG_KEY);
}

#[tokio::test]
async fn test_malformed_batch_id_rejected_before_network() {
    let gateway = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&gateway)
        .await;

    let uri = gateway.uri();
    let vars = [
        (ENV_PRIVATE_KEY, KNOWN_KEY),
        (ENV_BATCH_ID, "xyz"),
        (ENV_GATEWAY_URL, uri.as_str()),
        (ENV_RPC_URL, UNREACHABLE),
    ];
    let config = Config::from_lookup(|name| {
        vars.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    })
    .unwrap();

    let reference = test_reference().to_string();
    let err = config.feed_params(&reference).unwrap_err();
    assert!(matches!(err, StampkitError::InvalidBatchId(_)));
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_unreachable_ledger_falls_back_with_warning() {
    let gateway = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&gateway)
        .await;

    let params = FeedUpdateParams::new(test_reserve_key(), test_reference(), test_batch_id());
    let plan = orchestrator(UNREACHABLE, &gateway.uri())
        .plan(params)
        .await
        .unwrap();

    assert_eq!(plan.request.depth, DEFAULT_BATCH_DEPTH);
    assert!(plan.depth_source.is_fallback());
    assert!(!plan.index_source.is_fallback());

    let warnings = plan.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("default depth 20"));
}

#[tokio::test]
async fn test_everything_unreachable_still_produces_a_request() {
    let params = FeedUpdateParams::new(test_reserve_key(), test_reference(), test_batch_id())
        .with_project("my-docs");
    let writer = RecordingWriter::new();
    let plan = orchestrator(UNREACHABLE, UNREACHABLE)
        .execute(params, &writer)
        .await
        .unwrap();

    assert_eq!(plan.request.index, FeedIndex(0));
    assert_eq!(plan.request.depth, DEFAULT_BATCH_DEPTH);
    assert_eq!(
        hex::encode(plan.request.owner()),
        "ad63b91900cf55c824d0464e634d2217c8df2085"
    );
    assert_eq!(plan.warnings().len(), 2);
    assert_eq!(writer.requests().len(), 1);
}
