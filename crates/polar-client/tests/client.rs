use polar_client::{PolarClient, PolarConfig, PolarMode};
use polar_core::{BillingError, BillingProvider, CheckoutRequest};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "polar_oat_test";

async fn client_for(server: &MockServer) -> PolarClient {
    let config = PolarConfig::new(TOKEN, "whsec_test", PolarMode::Sandbox)
        .with_api_base_url(server.uri());
    PolarClient::new(config).unwrap()
}

#[tokio::test]
async fn lists_unarchived_products_with_bearer_token() {
    let server = MockServer::start().await;
    let product_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/v1/products/"))
        .and(query_param("is_archived", "false"))
        .and(header("authorization", "Bearer polar_oat_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": product_id,
                "name": "Pro Plan",
                "description": "Everything",
                "is_recurring": true,
                "is_archived": false,
                "organization_id": Uuid::new_v4(),
                "prices": [{
                    "id": Uuid::new_v4(),
                    "amount_type": "fixed",
                    "price_amount": 1500,
                    "price_currency": "usd",
                    "recurring_interval": "month"
                }]
            }],
            "pagination": { "total_count": 1, "max_page": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = client_for(&server).await.list_products(false).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, product_id);
    assert_eq!(products[0].name, "Pro Plan");
    assert_eq!(
        products[0].primary_price().map(|p| p.display()),
        Some("$15.00 / month".to_string())
    );
}

#[tokio::test]
async fn creates_checkout_with_success_url() {
    let server = MockServer::start().await;
    let product_id = Uuid::new_v4();
    let checkout_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/v1/checkouts/"))
        .and(body_json(json!({
            "products": [product_id],
            "success_url": "https://example.com/thanks"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": checkout_id,
            "url": "https://sandbox.polar.sh/checkout/polar_c_abc",
            "status": "open",
            "expires_at": "2030-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CheckoutRequest::new(vec![product_id])
        .with_success_url(Some("https://example.com/thanks"));
    let session = client_for(&server)
        .await
        .create_checkout(&request)
        .await
        .unwrap();

    assert_eq!(session.id, checkout_id);
    assert_eq!(session.url, "https://sandbox.polar.sh/checkout/polar_c_abc");
    assert!(session.is_active());
}

#[tokio::test]
async fn empty_checkout_is_rejected_locally() {
    let server = MockServer::start().await;

    let err = client_for(&server)
        .await
        .create_checkout(&CheckoutRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, BillingError::InvalidRequest(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn resolves_portal_session_by_email() {
    let server = MockServer::start().await;
    let customer_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/v1/customers/"))
        .and(query_param("email", "buyer@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": customer_id, "email": "buyer@example.com", "name": null }],
            "pagination": { "total_count": 1, "max_page": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/customer-sessions/"))
        .and(body_json(json!({ "customer_id": customer_id })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": Uuid::new_v4(),
            "token": "polar_cst_abc",
            "customer_id": customer_id,
            "customer_portal_url": "https://sandbox.polar.sh/acme/portal?customer_session_token=polar_cst_abc",
            "expires_at": "2030-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .await
        .portal_session_for_email("buyer@example.com")
        .await
        .unwrap();

    assert_eq!(session.customer_id, customer_id);
    assert!(session
        .customer_portal_url
        .ends_with("customer_session_token=polar_cst_abc"));
}

#[tokio::test]
async fn unknown_email_is_customer_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "pagination": { "total_count": 0, "max_page": 0 }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .portal_session_for_email("nobody@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, BillingError::CustomerNotFound { .. }));
}

#[tokio::test]
async fn api_errors_become_provider_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/products/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Unauthorized",
            "detail": "Invalid access token"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .list_products(false)
        .await
        .unwrap_err();

    match err {
        BillingError::ProviderError {
            provider,
            status,
            message,
        } => {
            assert_eq!(provider, "polar");
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized: Invalid access token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
