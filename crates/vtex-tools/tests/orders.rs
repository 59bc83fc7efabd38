use axum::extract::Request;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Router;
use oms_core::{Credentials, ExecutionContext};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tooling::{Tool, ToolError, ToolInput};
use vtex_tools::build_registry;

#[derive(Debug, Clone)]
struct Seen {
    path: String,
    query: Option<String>,
    headers: HeaderMap,
}

/// In-process stand-in for the OMS API: always answers with `status`/`body`.
struct StubOms {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl StubOms {
    async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let seen: Arc<Mutex<Vec<Seen>>> = Arc::default();
        let body = body.into();
        let recorder = seen.clone();

        let app = Router::new().fallback(move |req: Request| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                recorder.lock().unwrap().push(Seen {
                    path: req.uri().path().to_string(),
                    query: req.uri().query().map(str::to_string),
                    headers: req.headers().clone(),
                });
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            seen,
        }
    }

    fn ctx(&self) -> ExecutionContext {
        ExecutionContext::new(
            self.base_url.clone(),
            Credentials::new("vtexappkey-store-XYZ", "app-token-123"),
        )
    }

    fn last(&self) -> Seen {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

fn order_summary(order_id: &str) -> Value {
    json!({
        "orderId": order_id,
        "creationDate": "2024-03-01T10:00:00.0000000+00:00",
        "clientName": "Taylor Swift",
        "items": null,
        "totalValue": 12990,
        "paymentNames": "Visa",
        "status": "invoiced",
        "statusDescription": "Faturado",
        "marketPlaceOrderId": null,
        "sequence": "502556",
        "salesChannel": "1",
        "affiliateId": "",
        "origin": "Marketplace",
        "workflowInErrorState": false,
        "workflowInRetry": false,
        "lastMessageUnread": null,
        "ShippingEstimatedDate": "2024-03-05T10:00:00.0000000+00:00",
        "ShippingEstimatedDateMax": null,
        "ShippingEstimatedDateMin": null,
        "orderIsComplete": true,
        "listId": null,
        "listType": null,
        "authorizedDate": "2024-03-01T10:05:00.0000000+00:00",
        "callCenterOperatorName": null,
        "totalItems": 1,
        "currencyCode": "BRL",
        "hostname": "mystore",
        "invoiceOutput": ["NF-1"],
        "invoiceInput": null,
        "lastChange": "2024-03-02T10:00:00.0000000+00:00",
        "isAllDelivered": false,
        "isAnyDelivered": false,
        "giftCardProviders": null,
        "orderFormId": "f2b1c3",
        "paymentApprovedDate": "2024-03-01T10:06:00.0000000+00:00",
        "readyForHandlingDate": null,
        "deliveryDates": null,
        "customFieldsValues": null,
        "customFields": [],
        "unexpectedUpstreamField": "dropped"
    })
}

fn list_input(arguments: Value) -> ToolInput {
    ToolInput::from_value("LIST_ORDERS", arguments).unwrap()
}

#[tokio::test]
async fn should_send_only_page_when_only_page_given() {
    let oms = StubOms::start(StatusCode::OK, r#"{"list": []}"#).await;
    let registry = build_registry().unwrap();

    registry
        .execute_tool(list_input(json!({"page": 2})), &oms.ctx())
        .await
        .unwrap();

    let seen = oms.last();
    assert_eq!(seen.path, "/api/oms/pvt/orders");
    assert_eq!(seen.query.as_deref(), Some("page=2"));
}

#[tokio::test]
async fn should_send_false_invoice_filter() {
    let oms = StubOms::start(StatusCode::OK, r#"{"list": []}"#).await;
    let registry = build_registry().unwrap();

    registry
        .execute_tool(list_input(json!({"f_hasInputInvoice": false})), &oms.ctx())
        .await
        .unwrap();

    assert_eq!(oms.last().query.as_deref(), Some("f_hasInputInvoice=false"));
}

#[tokio::test]
async fn should_forward_vtex_credentials() {
    let oms = StubOms::start(StatusCode::OK, r#"{"list": []}"#).await;
    let registry = build_registry().unwrap();

    registry
        .execute_tool(list_input(json!({})), &oms.ctx())
        .await
        .unwrap();

    let seen = oms.last();
    assert_eq!(seen.query, None);
    assert_eq!(seen.headers["x-vtex-api-appkey"], "vtexappkey-store-XYZ");
    assert_eq!(seen.headers["x-vtex-api-apptoken"], "app-token-123");
    assert_eq!(seen.headers["accept"], "application/json");
    assert_eq!(seen.headers["content-type"], "application/json");
}

#[tokio::test]
async fn should_pass_list_and_paging_through() {
    let paging = json!({"total": 42, "pages": 3, "currentPage": 1, "perPage": 15});
    let body = json!({
        "list": [order_summary("v1-01"), order_summary("v1-02")],
        "paging": paging,
        "stats": {"stats": {}}
    });
    let oms = StubOms::start(StatusCode::OK, body.to_string()).await;
    let registry = build_registry().unwrap();

    let output = registry
        .execute_tool(
            list_input(json!({"orderBy": "creationDate,desc", "per_page": 15})),
            &oms.ctx(),
        )
        .await
        .unwrap();

    assert_eq!(output["list"].as_array().unwrap().len(), 2);
    assert_eq!(output["paging"], paging);
    assert_eq!(output["list"][1]["orderId"], "v1-02");
    assert_eq!(output["list"][0]["invoiceOutput"], json!(["NF-1"]));
    assert!(output["list"][0].get("unexpectedUpstreamField").is_none());
    assert!(output.get("stats").is_none());
    assert_eq!(
        oms.last().query.as_deref(),
        Some("orderBy=creationDate%2Cdesc&per_page=15")
    );
}

#[tokio::test]
async fn should_default_missing_list_to_empty() {
    let oms = StubOms::start(
        StatusCode::OK,
        r#"{"paging": {"total": 0, "pages": 0, "currentPage": 1, "perPage": 15}}"#,
    )
    .await;
    let registry = build_registry().unwrap();

    let output = registry
        .execute_tool(list_input(json!({})), &oms.ctx())
        .await
        .unwrap();

    assert_eq!(output["list"], json!([]));
    assert_eq!(output["paging"]["total"], 0);
}

#[tokio::test]
async fn should_leave_paging_absent_when_upstream_omits_it() {
    let oms = StubOms::start(StatusCode::OK, "{}").await;
    let registry = build_registry().unwrap();

    let output = registry
        .execute_tool(list_input(json!({})), &oms.ctx())
        .await
        .unwrap();

    assert_eq!(output, json!({"list": []}));
}

#[tokio::test]
async fn should_surface_upstream_status() {
    let oms = StubOms::start(StatusCode::NOT_FOUND, r#"{"list": "ignored"}"#).await;
    let registry = build_registry().unwrap();

    let err = registry
        .execute_tool(list_input(json!({})), &oms.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Upstream { status: 404, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn should_surface_decode_error_for_unparsable_body() {
    let oms = StubOms::start(StatusCode::OK, "{\"list\": [").await;
    let registry = build_registry().unwrap();

    let err = registry
        .execute_tool(list_input(json!({})), &oms.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Decode(_)));
}

#[tokio::test]
async fn should_reject_order_missing_required_field() {
    let mut broken = order_summary("v1-01");
    broken.as_object_mut().unwrap().remove("status");
    let oms = StubOms::start(StatusCode::OK, json!({ "list": [broken] }).to_string()).await;
    let registry = build_registry().unwrap();

    let err = registry
        .execute_tool(list_input(json!({})), &oms.ctx())
        .await
        .unwrap_err();

    match err {
        ToolError::Validation { path, .. } => assert_eq!(path, "/list/0/status"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn should_reject_wrong_input_type_before_calling_upstream() {
    let oms = StubOms::start(StatusCode::OK, "{}").await;
    let registry = build_registry().unwrap();

    let err = registry
        .execute_tool(list_input(json!({"f_isInstore": "yes"})), &oms.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Validation { ref path, .. } if path == "/f_isInstore"));
    assert_eq!(oms.calls(), 0);
}

#[tokio::test]
async fn should_fetch_single_order_by_id() {
    let body = json!({
        "orderId": "v212333lux-02",
        "status": "handling",
        "value": 5000,
        "creationDate": "2024-03-01T10:00:00.0000000+00:00",
        "items": [{"id": "25", "quantity": 1}]
    });
    let oms = StubOms::start(StatusCode::OK, body.to_string()).await;
    let registry = build_registry().unwrap();
    let input = ToolInput::new("GET_ORDER")
        .with_argument("orderId", "v212333lux-02")
        .unwrap();

    let output = registry.execute_tool(input, &oms.ctx()).await.unwrap();

    let seen = oms.last();
    assert_eq!(seen.path, "/api/oms/pvt/orders/v212333lux-02");
    assert_eq!(seen.query, None);
    assert_eq!(output["orderId"], "v212333lux-02");
    assert_eq!(output["items"][0]["quantity"], 1);
    assert_eq!(output["totals"], json!([]));
}

#[tokio::test]
async fn should_require_order_id_for_get_order() {
    let oms = StubOms::start(StatusCode::OK, "{}").await;
    let registry = build_registry().unwrap();

    let err = registry
        .execute_tool(ToolInput::new("GET_ORDER"), &oms.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Validation { ref path, .. } if path == "/orderId"));
    assert_eq!(oms.calls(), 0);
}

#[tokio::test]
async fn should_reject_dot_segment_order_id_without_calling_upstream() {
    let oms = StubOms::start(StatusCode::OK, json!({ "list": [] }).to_string()).await;
    let registry = build_registry().unwrap();

    for order_id in ["..", "."] {
        let input = ToolInput::new("GET_ORDER")
            .with_argument("orderId", order_id)
            .unwrap();

        let err = registry.execute_tool(input, &oms.ctx()).await.unwrap_err();

        match err {
            ToolError::Validation { path, message } => {
                assert_eq!(path, "/orderId");
                assert!(!message.contains("required"), "message: {}", message);
            }
            other => panic!("unexpected error for {:?}: {:?}", order_id, other),
        }
    }
    assert_eq!(oms.calls(), 0);
}

#[tokio::test]
async fn should_reject_explicit_null_filter() {
    let oms = StubOms::start(StatusCode::OK, "{}").await;
    let registry = build_registry().unwrap();

    let err = registry
        .execute_tool(list_input(json!({"page": null})), &oms.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Validation { ref path, .. } if path == "/page"));
    assert_eq!(oms.calls(), 0);
}

#[tokio::test]
async fn should_reject_null_paging_from_upstream() {
    let oms = StubOms::start(StatusCode::OK, r#"{"list": [], "paging": null}"#).await;
    let registry = build_registry().unwrap();

    let err = registry
        .execute_tool(list_input(json!({})), &oms.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Validation { ref path, .. } if path == "/paging"));
}

#[test]
fn should_look_up_tools_by_id() {
    let registry = build_registry().unwrap();

    let tool = registry.get("LIST_ORDERS").unwrap();
    assert!(Arc::ptr_eq(&tool, &registry.list()[0]));
    assert_eq!(tool.id(), "LIST_ORDERS");

    let err = registry.get("UNKNOWN").err().unwrap();
    assert_eq!(err, ToolError::NotFound("UNKNOWN".to_string()));
}
