//! MCP server integration tests.
//!
//! Verifies tool registration, parameter validation (garde), engine
//! validation errors, response serialization, and MCP protocol round-trips.

use std::sync::Arc;

use rmcp::model::{CallToolRequestParams, CallToolResult};
use rmcp::service::{RoleClient, RunningService};
use rmcp::ServiceExt;
use serde_json::{json, Value};

use optopsy_payoff::engine::config::AnalysisConfig;
use optopsy_payoff::server::PayoffServer;

mod common;
use common::{legs_json, EXPIRY, UNDERLYING};

// ─── Test Helpers ────────────────────────────────────────────────────────────

fn make_test_server() -> PayoffServer {
    PayoffServer::new(Arc::new(AnalysisConfig::default()))
}

/// Serve `server` over an in-memory duplex pipe and connect a client to it.
async fn connect(server: PayoffServer) -> RunningService<RoleClient, ()> {
    let (server_tx, server_rx) = tokio::io::duplex(65536);
    let (client_tx, client_rx) = tokio::io::duplex(65536);

    // Server reads from client_rx, writes to server_tx
    // Client reads from server_rx, writes to client_tx
    tokio::spawn(async move {
        let running = server.serve((client_rx, server_tx)).await.unwrap();
        let _ = running.waiting().await;
    });

    ().serve((server_rx, client_tx)).await.unwrap()
}

async fn call(
    client: &RunningService<RoleClient, ()>,
    name: &'static str,
    arguments: Option<Value>,
) -> CallToolResult {
    client
        .peer()
        .call_tool(CallToolRequestParams {
            meta: None,
            name: name.into(),
            arguments: arguments.map(|a| serde_json::from_value(a).unwrap()),
            task: None,
        })
        .await
        .unwrap()
}

fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.clone())
        .unwrap()
}

fn json_of(result: &CallToolResult) -> Value {
    assert!(
        !result.is_error.unwrap_or(false),
        "tool returned an error: {}",
        text_of(result)
    );
    serde_json::from_str(&text_of(result)).unwrap()
}

fn assert_validation_error(result: &CallToolResult, needle: &str) {
    assert!(result.is_error.unwrap_or(false));
    let text = text_of(result);
    assert!(
        text.contains("Validation error"),
        "Expected validation error, got: {text}"
    );
    assert!(text.contains(needle), "Expected {needle:?} in: {text}");
}

fn butterfly_args() -> Value {
    json!({
        "legs": legs_json(&[(90.0, "C"), (100.0, "C"), (110.0, "C")]),
        "quantities": [1, -2, 1],
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Category 1: Server Initialization
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn server_info_has_correct_metadata() {
    use rmcp::ServerHandler;

    let server = make_test_server();
    let info = server.get_info();

    assert_eq!(info.server_info.name, "optopsy-payoff");
    assert_eq!(info.server_info.version, "0.1.0");
    assert!(info.capabilities.tools.is_some());
    let instructions = info.instructions.unwrap();
    assert!(instructions.contains("analyze_position"));
    assert!(instructions.contains("quantities"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tool_router_lists_all_four_tools() {
    let client = connect(make_test_server()).await;

    let tools = client.list_all_tools().await.unwrap();
    let tool_names: Vec<String> = tools.iter().map(|t| t.name.to_string()).collect();

    assert_eq!(tools.len(), 4, "Expected 4 tools, got: {tool_names:?}");
    for expected in [
        "analyze_position",
        "classify_position",
        "payoff_at_price",
        "list_strategies",
    ] {
        assert!(
            tool_names.contains(&expected.to_string()),
            "Missing tool: {expected}"
        );
    }

    client.cancel().await.unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Category 2: No-Param Tools
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_strategies_returns_all_16() {
    let client = connect(make_test_server()).await;

    let resp = json_of(&call(&client, "list_strategies", None).await);

    assert_eq!(resp["total"], 16);
    let categories = resp["categories"].as_object().unwrap();
    assert_eq!(categories.len(), 5);
    assert_eq!(categories["Butterflies"], 4);
    assert!(!resp["suggested_next_steps"].as_array().unwrap().is_empty());

    client.cancel().await.unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Category 3: Parameter Validation (garde)
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_rejects_empty_legs() {
    let client = connect(make_test_server()).await;

    let result = call(
        &client,
        "analyze_position",
        Some(json!({ "legs": [], "quantities": [] })),
    )
    .await;
    assert_validation_error(&result, "legs");

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_rejects_negative_underlying_price() {
    let client = connect(make_test_server()).await;

    let mut args = butterfly_args();
    args["underlying_price"] = json!(-5.0);
    let result = call(&client, "analyze_position", Some(args)).await;
    assert_validation_error(&result, "underlying_price");

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_rejects_out_of_range_override() {
    let client = connect(make_test_server()).await;

    let mut args = butterfly_args();
    args["overrides"] = json!({ "samples": 1 });
    let result = call(&client, "analyze_position", Some(args)).await;
    assert_validation_error(&result, "samples");

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn payoff_at_price_rejects_negative_price() {
    let client = connect(make_test_server()).await;

    let result = call(
        &client,
        "payoff_at_price",
        Some(json!({
            "legs": legs_json(&[(100.0, "C")]),
            "quantities": [1],
            "price": -1.0,
        })),
    )
    .await;
    assert_validation_error(&result, "price");

    client.cancel().await.unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Category 4: Engine Validation Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_names_leg_index_for_bad_strike() {
    let client = connect(make_test_server()).await;

    let result = call(
        &client,
        "analyze_position",
        Some(json!({
            "legs": [
                { "strike": 100, "option_type": "C", "premium": 5.0,
                  "underlying": UNDERLYING, "expiry": EXPIRY },
                { "strike": "abc", "option_type": "C", "premium": 2.6,
                  "underlying": UNDERLYING, "expiry": EXPIRY },
            ],
            "quantities": [1, -1],
        })),
    )
    .await;
    assert_validation_error(&result, "leg[1].strike");

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_names_leg_and_field_for_non_scalar_values() {
    let client = connect(make_test_server()).await;

    let result = call(
        &client,
        "analyze_position",
        Some(json!({
            "legs": [
                { "strike": true, "option_type": "C", "premium": [5.0],
                  "underlying": UNDERLYING, "expiry": EXPIRY },
            ],
            "quantities": [{ "qty": 1 }],
        })),
    )
    .await;
    assert_validation_error(&result, "leg[0].strike: is not numeric");
    let text = text_of(&result);
    assert!(text.contains("leg[0].premium"), "{text}");
    assert!(text.contains("leg[0].quantity"), "{text}");

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_rejects_misaligned_quantities() {
    let client = connect(make_test_server()).await;

    let result = call(
        &client,
        "analyze_position",
        Some(json!({
            "legs": legs_json(&[(100.0, "C"), (100.0, "P")]),
            "quantities": [1],
        })),
    )
    .await;
    assert_validation_error(&result, "1 position quantities for 2 legs");

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn classify_rejects_zero_quantity_and_unknown_type() {
    let client = connect(make_test_server()).await;

    let result = call(
        &client,
        "classify_position",
        Some(json!({
            "legs": [
                { "strike": 100, "option_type": "X", "premium": 5.0,
                  "underlying": UNDERLYING, "expiry": EXPIRY },
            ],
            "quantities": [0],
        })),
    )
    .await;
    assert_validation_error(&result, "leg[0].quantity");
    assert!(text_of(&result).contains("leg[0].option_type"));

    client.cancel().await.unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Category 5: MCP Protocol Round-Trip
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn mcp_roundtrip_analyze_butterfly() {
    let client = connect(make_test_server()).await;

    let resp = json_of(&call(&client, "analyze_position", Some(butterfly_args())).await);

    assert_eq!(resp["strategy"]["name"], "Long Call Butterfly");
    assert_eq!(resp["strategy"]["pattern"], "long_call_butterfly");
    assert_eq!(resp["strategy"]["kind"], "Canonical");
    assert_eq!(resp["break_evens"], json!([93.0, 107.0]));
    assert_eq!(resp["curve"].as_array().unwrap().len(), 300);
    assert!((resp["price_range"]["min"].as_f64().unwrap() - 89.0).abs() < 1e-9);
    assert_eq!(resp["metrics"]["max_profit"], 7.0);
    assert!(resp["current_payoff"].is_null());
    assert!(resp["warnings"].as_array().unwrap().is_empty());
    assert_eq!(resp["context"]["underlying"], UNDERLYING);
    assert!(resp["summary"].as_str().unwrap().contains("Long Call Butterfly"));

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_accepts_text_fields_and_last_price_alias() {
    let client = connect(make_test_server()).await;

    let resp = json_of(
        &call(
            &client,
            "analyze_position",
            Some(json!({
                "legs": [
                    { "identifier": "SPY240315C00100000", "strike": "100", "option_type": "Call",
                      "last_price": "5.00", "underlying": UNDERLYING, "expiry": EXPIRY },
                    { "identifier": "SPY240315P00100000", "strike": "100", "option_type": "Put",
                      "last_price": 4.0, "underlying": UNDERLYING, "expiry": EXPIRY },
                ],
                "quantities": ["1", "1"],
                "underlying_price": 100.0,
            })),
        )
        .await,
    );

    assert_eq!(resp["strategy"]["name"], "Long Straddle");
    assert_eq!(resp["break_evens"], json!([91.0, 109.0]));
    assert_eq!(resp["current_payoff"], -9.0);

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_mixed_expiry_returns_warning() {
    let client = connect(make_test_server()).await;

    let mut legs = legs_json(&[(100.0, "C"), (100.0, "P")]);
    legs[1]["expiry"] = json!("2024-04-19");
    let resp = json_of(
        &call(
            &client,
            "analyze_position",
            Some(json!({ "legs": legs, "quantities": [1, 1] })),
        )
        .await,
    );

    assert_eq!(
        resp["strategy"]["name"],
        "Unclassifiable: mixed underlying/expiry"
    );
    assert_eq!(resp["strategy"]["kind"], "MixedContext");
    let warnings = resp["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("2024-04-19"));
    // payoff is still produced
    assert_eq!(resp["break_evens"], json!([91.0, 109.0]));

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_applies_sample_override() {
    let client = connect(make_test_server()).await;

    let mut args = butterfly_args();
    args["overrides"] = json!({ "samples": 50 });
    let resp = json_of(&call(&client, "analyze_position", Some(args)).await);

    assert_eq!(resp["curve"].as_array().unwrap().len(), 50);
    assert_eq!(resp["price_range"]["samples"], 50);
    assert_eq!(resp["break_evens"], json!([93.0, 107.0]));

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn classify_returns_catalog_details() {
    let client = connect(make_test_server()).await;

    let resp = json_of(
        &call(
            &client,
            "classify_position",
            Some(json!({
                "legs": legs_json(&[(100.0, "C"), (90.0, "C")]),
                "quantities": [1, -1],
            })),
        )
        .await,
    );

    assert_eq!(
        resp["strategy"]["name"],
        "Short Call Vertical Spread (Credit Spread)"
    );
    assert_eq!(resp["category"], "Verticals");
    assert!(resp["description"].is_string());
    // legs come back in strike order
    assert_eq!(resp["legs"][0]["strike"], 90.0);

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn classify_honors_strike_epsilon_override() {
    let client = connect(make_test_server()).await;

    let legs = json!([
        { "strike": 100.0, "option_type": "C", "premium": 5.0,
          "underlying": UNDERLYING, "expiry": EXPIRY },
        { "strike": 100.05, "option_type": "P", "premium": 4.0,
          "underlying": UNDERLYING, "expiry": EXPIRY },
    ]);

    let strict = json_of(
        &call(
            &client,
            "classify_position",
            Some(json!({ "legs": legs.clone(), "quantities": [1, 1] })),
        )
        .await,
    );
    assert_eq!(strict["strategy"]["name"], "Custom Strategy");

    let loose = json_of(
        &call(
            &client,
            "classify_position",
            Some(json!({
                "legs": legs,
                "quantities": [1, 1],
                "overrides": { "strike_epsilon": 0.1 },
            })),
        )
        .await,
    );
    assert_eq!(loose["strategy"]["name"], "Long Straddle");

    client.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn payoff_at_price_splits_by_leg() {
    let client = connect(make_test_server()).await;

    let resp = json_of(
        &call(
            &client,
            "payoff_at_price",
            Some(json!({
                "legs": legs_json(&[(100.0, "C"), (100.0, "P")]),
                "quantities": [1, 1],
                "price": 120.0,
            })),
        )
        .await,
    );

    // call: 20 - 5, put: 0 - 4
    assert_eq!(resp["payoff"], 11.0);
    let per_leg = resp["per_leg"].as_array().unwrap();
    assert_eq!(per_leg.len(), 2);
    assert_eq!(per_leg[0]["option_type"], "Call");
    assert_eq!(per_leg[0]["payoff"], 15.0);
    assert_eq!(per_leg[1]["payoff"], -4.0);

    client.cancel().await.unwrap();
}
