//! Quote (draft order) flows through the HTTP surface.

#![allow(clippy::unwrap_used)]

use mockito::Matcher;
use print_quote_integration_tests::{
    GRAPHQL_PATH, TestApp, TestOptions, data_url, draft_order_json, operation,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_submit_quote_with_inline_memory_file() {
    let mut app = TestApp::spawn_with(TestOptions {
        skip_shopify_files: true,
        ..TestOptions::default()
    })
    .await;
    let create = app
        .shopify
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::AllOf(vec![
            operation("DraftOrderCreate"),
            Matcher::Regex(r#""email":"maker@example.com""#.to_string()),
            Matcher::Regex(r#""key":"Material","value":"PLA""#.to_string()),
            Matcher::Regex(r#""key":"File Storage","value":"memory""#.to_string()),
            Matcher::Regex(r#""key":"File ID","value":"file_\d+_[a-z0-9]{9}""#.to_string()),
        ]))
        .with_status(200)
        .with_body(format!(
            r#"{{"data":{{"draftOrderCreate":{{"draftOrder":{},"userErrors":[]}}}}}}"#,
            draft_order_json(
                7,
                &[
                    ("Status", "Pending Quote"),
                    ("File ID", "file_1700000000000_abcdefghi"),
                ]
            )
        ))
        .create_async()
        .await;

    let resp = app
        .client
        .post(app.url("/api/submit-quote"))
        .json(&json!({
            "email": "maker@example.com",
            "material": "PLA",
            "quantity": 2,
            "fileData": data_url("model/stl", b"solid part"),
            "fileName": "part.stl",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    create.assert_async().await;
    assert_eq!(body["success"], true);
    assert_eq!(body["draftOrderId"], "gid://shopify/DraftOrder/7");
    assert!(body["quoteId"].as_str().unwrap().starts_with("Q-"));
}

#[tokio::test]
async fn test_submit_quote_rejects_bad_email() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/submit-quote"))
        .json(&json!({ "email": "nobody" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_with_counts_and_filter() {
    let mut app = TestApp::spawn().await;
    app.shopify
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::AllOf(vec![
            operation("GetDraftOrders"),
            Matcher::Regex(r#""first":50"#.to_string()),
        ]))
        .with_status(200)
        .with_body(format!(
            r#"{{"data":{{"draftOrders":{{"nodes":[{},{}],"pageInfo":{{"hasNextPage":true}}}}}}}}"#,
            draft_order_json(1, &[("Status", "Quoted"), ("Quoted Amount", "12.00")]),
            draft_order_json(2, &[]),
        ))
        .create_async()
        .await;

    let body: Value = app
        .client
        .get(app.url("/api/get-draft-orders"))
        .query(&[("status", "Pending Quote")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 2);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["quoted"], 1);
    assert_eq!(body["hasNextPage"], true);
    let orders = body["draftOrders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], "gid://shopify/DraftOrder/2");
    assert_eq!(orders[0]["quote"]["status"], "Pending Quote");
}

#[tokio::test]
async fn test_detail_missing_is_404() {
    let mut app = TestApp::spawn().await;
    app.shopify
        .mock("POST", GRAPHQL_PATH)
        .match_body(operation("GetDraftOrder"))
        .with_status(200)
        .with_body(r#"{"data":{"draftOrder":null}}"#)
        .create_async()
        .await;

    let resp = app
        .client
        .get(app.url("/api/draft-order"))
        .query(&[("id", "gid://shopify/DraftOrder/404")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .client
        .get(app.url("/api/get-draft-order-simple"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_quote_prices_order() {
    let mut app = TestApp::spawn().await;
    app.shopify
        .mock("POST", GRAPHQL_PATH)
        .match_body(operation("GetDraftOrder"))
        .with_status(200)
        .with_body(format!(
            r#"{{"data":{{"draftOrder":{}}}}}"#,
            draft_order_json(3, &[("Status", "Pending Quote"), ("Color", "Red")])
        ))
        .create_async()
        .await;
    let update = app
        .shopify
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::AllOf(vec![
            operation("DraftOrderUpdate"),
            Matcher::Regex(r#""originalUnitPrice":"19.99""#.to_string()),
            Matcher::Regex(r#""key":"Color","value":"Red""#.to_string()),
            Matcher::Regex(r#""key":"Support Email","value":"staff@example.com""#.to_string()),
        ]))
        .with_status(200)
        .with_body(format!(
            r#"{{"data":{{"draftOrderUpdate":{{"draftOrder":{},"userErrors":[]}}}}}}"#,
            draft_order_json(3, &[("Status", "Quoted")])
        ))
        .create_async()
        .await;

    let resp = app
        .client
        .post(app.url("/api/update-quote"))
        .json(&json!({
            "draftOrderId": "gid://shopify/DraftOrder/3",
            "amount": "19.99",
            "senderEmail": "staff@example.com",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    update.assert_async().await;

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["draftOrderName"], "#D3");
}

#[tokio::test]
async fn test_update_quote_requires_amount() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/update-quote"))
        .json(&json!({ "draftOrderId": "gid://shopify/DraftOrder/3" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_complete_and_invoice() {
    let mut app = TestApp::spawn().await;
    app.shopify
        .mock("POST", GRAPHQL_PATH)
        .match_body(operation("DraftOrderDelete"))
        .with_status(200)
        .with_body(
            r#"{"data":{"draftOrderDelete":{"deletedId":"gid://shopify/DraftOrder/4","userErrors":[]}}}"#,
        )
        .create_async()
        .await;
    app.shopify
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::AllOf(vec![
            operation("DraftOrderComplete"),
            Matcher::Regex(r#""paymentPending":true"#.to_string()),
        ]))
        .with_status(200)
        .with_body(
            r##"{"data":{"draftOrderComplete":{"draftOrder":{"id":"gid://shopify/DraftOrder/5",
                "name":"#D5","status":"COMPLETED","invoiceUrl":null,
                "totalPriceSet":{"shopMoney":{"amount":"19.99","currencyCode":"USD"}},
                "order":{"id":"gid://shopify/Order/500","name":"#1001"}},"userErrors":[]}}}"##,
        )
        .create_async()
        .await;
    app.shopify
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::AllOf(vec![
            operation("DraftOrderInvoiceSend"),
            Matcher::Regex(r#""to":"maker@example.com""#.to_string()),
        ]))
        .with_status(200)
        .with_body(format!(
            r#"{{"data":{{"draftOrderInvoiceSend":{{"draftOrder":{},"userErrors":[]}}}}}}"#,
            draft_order_json(6, &[("Status", "Quoted")])
        ))
        .create_async()
        .await;

    let deleted: Value = app
        .client
        .delete(app.url("/api/delete-draft-order"))
        .json(&json!({ "draftOrderId": "gid://shopify/DraftOrder/4" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted["deletedId"], "gid://shopify/DraftOrder/4");

    let completed: Value = app
        .client
        .post(app.url("/api/complete-draft-order"))
        .json(&json!({ "draftOrderId": "gid://shopify/DraftOrder/5" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(completed["draftOrder"]["orderName"], "#1001");

    let invoiced: Value = app
        .client
        .post(app.url("/api/send-invoice-email"))
        .json(&json!({
            "draftOrderId": "gid://shopify/DraftOrder/6",
            "to": "maker@example.com",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(invoiced["success"], true);
    assert_eq!(
        invoiced["invoiceUrl"],
        "https://print-quote-test.myshopify.com/invoices/6"
    );
}

#[tokio::test]
async fn test_shopify_rate_limit_is_429() {
    let mut app = TestApp::spawn().await;
    app.shopify
        .mock("POST", GRAPHQL_PATH)
        .with_status(429)
        .with_header("Retry-After", "2")
        .create_async()
        .await;

    let resp = app
        .client
        .get(app.url("/api/draft-orders"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
