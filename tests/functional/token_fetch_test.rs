//! Functional tests for token fetching through the gateway selector

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{status, FixedCredentials, MockTransport, NoCredentials, GW, GW0, GW1, NEGOTIATE};
use knox_jwt::config::GatewayConfig;
use knox_jwt::transport::GatewayResponse;
use knox_jwt::{AppError, TokenFetcher};

const TOKEN_URL: &str = "https://knox-gateway.gethue.com:8443/dl-name/kt-kerberos/knoxtoken/api/v1/token?knox.token.include.groups=true";

#[tokio::test]
async fn test_fetch_jwt_from_single_gateway() {
    let transport = MockTransport::always(200, r#"{"access_token":"test_jwt_token"}"#);
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(GW).unwrap(),
        transport.clone(),
        Arc::new(FixedCredentials),
    );

    let token = fetcher.fetch_jwt().await.unwrap();

    assert_eq!(token, "test_jwt_token");
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, TOKEN_URL);
    assert_eq!(requests[0].authorization.as_deref(), Some(NEGOTIATE));
    assert!(!requests[0].verify_tls);
}

#[tokio::test]
async fn test_fetch_uses_failover_gateway() {
    let transport = MockTransport::with_responses(vec![
        status(404),
        status(200),
        Ok(GatewayResponse::new(200, r#"{"access_token":"from_gw1"}"#)),
    ]);
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(&format!("{},{}", GW0, GW1)).unwrap(),
        transport.clone(),
        Arc::new(FixedCredentials),
    );

    let token = fetcher.fetch_token().await.unwrap();

    assert_eq!(token.access_token(), "from_gw1");
    assert_eq!(
        transport.urls(),
        vec![
            GW0.to_string(),
            GW1.to_string(),
            format!("{}knoxtoken/api/v1/token?knox.token.include.groups=true", GW1),
        ]
    );
}

#[tokio::test]
async fn test_no_gateway_is_user_facing_and_skips_token_request() {
    let transport = MockTransport::always(404, "");
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(&format!("{},{}", GW0, GW1)).unwrap(),
        transport.clone(),
        Arc::new(FixedCredentials),
    );

    let err = fetcher.fetch_jwt().await.unwrap_err();

    assert!(matches!(err, AppError::NoHealthyGateway(_)));
    assert!(err.is_user_facing());
    assert_eq!(transport.urls(), vec![GW0.to_string(), GW1.to_string()]);
}

#[tokio::test]
async fn test_missing_credentials_fail_before_token_request() {
    let transport = MockTransport::always(200, r#"{"access_token":"unused"}"#);
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(GW).unwrap(),
        transport.clone(),
        Arc::new(NoCredentials),
    );

    let err = fetcher.fetch_jwt().await.unwrap_err();

    assert!(matches!(err, AppError::Credentials(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_rejected_token_request() {
    let transport = MockTransport::always(401, "Unauthorized");
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(GW).unwrap(),
        transport,
        Arc::new(FixedCredentials),
    );

    let err = fetcher.fetch_jwt().await.unwrap_err();

    match err {
        AppError::TokenEndpoint { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorized");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_token_response() {
    let transport = MockTransport::always(200, r#"{"token":"wrong_field"}"#);
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(GW).unwrap(),
        transport,
        Arc::new(FixedCredentials),
    );

    let err = fetcher.fetch_jwt().await.unwrap_err();

    assert!(matches!(err, AppError::InvalidTokenResponse(_)));
    assert!(!err.is_user_facing());
}

#[tokio::test]
async fn test_tls_verification_can_be_enabled() {
    let transport = MockTransport::with_responses(vec![
        status(200),
        Ok(GatewayResponse::new(200, r#"{"access_token":"verified"}"#)),
    ]);
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(&format!("{},{}", GW0, GW1)).unwrap(),
        transport.clone(),
        Arc::new(FixedCredentials),
    )
    .with_tls_verification(true);

    fetcher.fetch_jwt().await.unwrap();

    assert!(transport.requests().iter().all(|r| r.verify_tls));
}

#[tokio::test]
async fn test_fetch_token_from_reads_current_gateways() {
    let transport = MockTransport::always(200, r#"{"access_token":"current_config"}"#);
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(GW0).unwrap(),
        transport.clone(),
        Arc::new(FixedCredentials),
    );

    let updated = GatewayConfig::parse(GW1).unwrap();
    let token = fetcher.fetch_token_from(&updated).await.unwrap();

    assert_eq!(token.access_token(), "current_config");
    assert_eq!(
        transport.urls(),
        vec![format!("{}knoxtoken/api/v1/token?knox.token.include.groups=true", GW1)]
    );
}

#[tokio::test]
async fn test_fetch_token_from_whitespace_separated_gateways() {
    let transport = MockTransport::with_responses(vec![
        status(404),
        status(200),
        Ok(GatewayResponse::new(200, r#"{"access_token":"from_gw1"}"#)),
    ]);
    let fetcher = TokenFetcher::new(
        GatewayConfig::parse(GW).unwrap(),
        transport.clone(),
        Arc::new(FixedCredentials),
    );

    let gateways = GatewayConfig::parse(&format!("{} {}", GW0, GW1)).unwrap();
    let token = fetcher.fetch_token_from(&gateways).await.unwrap();

    assert_eq!(token.access_token(), "from_gw1");
    assert_eq!(&transport.urls()[..2], &[GW0.to_string(), GW1.to_string()]);
}
