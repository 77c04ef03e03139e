//! Integration tests for the token resolution chain.
//!
//! The chain is: site token (EMS) -> brand-scope token -> per-storefront
//! affiliate-scope token. These tests verify caching, invalidation on
//! site-token change, and scope discipline against a mocked marketing API.

use vitrine_client::store::keys;
use vitrine_client::{ClientError, SelectionStore as _};
use vitrine_core::{CompanyId, SiteToken, TokenScope};
use vitrine_integration_tests::test_context;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn site_token(value: &str) -> SiteToken {
    SiteToken::new(value).expect("site token")
}

// =============================================================================
// Brand token
// =============================================================================

#[tokio::test]
async fn brand_token_is_resolved_once_for_unchanged_site_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/marketing/site-token"))
        .and(query_param("EMS", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "empresa_id": 496,
            "nome_empresa": "Marca X",
            "access": "tok-brand"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (ctx, _store) = test_context(&server.uri(), Some("abc123"));
    let token = site_token("abc123");

    let first = ctx.tokens().resolve_brand_token(&token).await.expect("brand token");
    let second = ctx.tokens().resolve_brand_token(&token).await.expect("brand token");

    assert_eq!(first.as_str(), "tok-brand");
    assert_eq!(first.scope(), TokenScope::Brand);
    assert_eq!(second.as_str(), "tok-brand");
}

#[tokio::test]
async fn brand_token_persists_in_store() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/marketing/site-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "tok-brand"
        })))
        .mount(&server)
        .await;

    let (ctx, store) = test_context(&server.uri(), Some("abc123"));
    ctx.tokens()
        .resolve_brand_token(&site_token("abc123"))
        .await
        .expect("brand token");

    assert_eq!(store.get(keys::BRAND_TOKEN), Some("tok-brand".to_string()));
    assert_eq!(
        store.get(keys::BRAND_TOKEN_SOURCE),
        Some("abc123".to_string())
    );
}

#[tokio::test]
async fn brand_grant_without_access_is_token_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/marketing/site-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "empresa_id": 496
        })))
        .mount(&server)
        .await;

    let (ctx, store) = test_context(&server.uri(), Some("abc123"));
    let result = ctx.tokens().resolve_brand_token(&site_token("abc123")).await;

    assert!(matches!(result, Err(ClientError::TokenNotFound)));
    assert_eq!(store.get(keys::BRAND_TOKEN), None);
}

#[tokio::test]
async fn http_failure_propagates_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/marketing/site-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("ems desconhecido"))
        .mount(&server)
        .await;

    let (ctx, _store) = test_context(&server.uri(), Some("abc123"));
    let result = ctx.tokens().resolve_brand_token(&site_token("abc123")).await;

    match result {
        Err(ClientError::Http { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "ems desconhecido");
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

// =============================================================================
// Affiliate token
// =============================================================================

#[tokio::test]
async fn affiliate_token_requires_brand_token() {
    let server = MockServer::start().await;

    // No brand token was ever resolved; the chain must fail before any
    // network traffic.
    Mock::given(method("GET"))
        .and(path("/v1/marketing/afiliados/496/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "tok-afiliado"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let (ctx, _store) = test_context(&server.uri(), None);
    let result = ctx.tokens().resolve_affiliate_token(CompanyId::new(496)).await;

    assert!(matches!(result, Err(ClientError::MissingScopeToken)));
}

#[tokio::test]
async fn affiliate_token_is_cached_per_storefront() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/marketing/site-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "tok-brand"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/marketing/afiliados/496/token"))
        .and(header("X-Access-Token", "tok-brand"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "tok-496"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/marketing/afiliados/497/token"))
        .and(header("X-Access-Token", "tok-brand"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "tok-497"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (ctx, _store) = test_context(&server.uri(), Some("abc123"));
    ctx.tokens()
        .resolve_brand_token(&site_token("abc123"))
        .await
        .expect("brand token");

    // Each storefront resolves its own token once; repeats come from cache
    // and tokens are never shared across storefronts.
    let a1 = ctx.tokens().resolve_affiliate_token(CompanyId::new(496)).await.expect("token");
    let b1 = ctx.tokens().resolve_affiliate_token(CompanyId::new(497)).await.expect("token");
    let a2 = ctx.tokens().resolve_affiliate_token(CompanyId::new(496)).await.expect("token");

    assert_eq!(a1.as_str(), "tok-496");
    assert_eq!(b1.as_str(), "tok-497");
    assert_eq!(a2.as_str(), "tok-496");
    assert_eq!(a1.scope(), TokenScope::Affiliate);
}

// =============================================================================
// Invalidation on site-token change
// =============================================================================

#[tokio::test]
async fn site_token_change_restarts_the_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/marketing/site-token"))
        .and(query_param("EMS", "first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "tok-brand-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/marketing/site-token"))
        .and(query_param("EMS", "second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "tok-brand-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/marketing/afiliados/496/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "tok-afiliado"
        })))
        .mount(&server)
        .await;

    let (ctx, store) = test_context(&server.uri(), Some("first"));

    ctx.tokens()
        .resolve_brand_token(&site_token("first"))
        .await
        .expect("brand token");
    ctx.tokens()
        .resolve_affiliate_token(CompanyId::new(496))
        .await
        .expect("affiliate token");
    assert!(store.get(&keys::affiliate_token(CompanyId::new(496))).is_some());

    // A different site token invalidates the brand token and every cached
    // affiliate token before resolving fresh.
    let renewed = ctx
        .tokens()
        .resolve_brand_token(&site_token("second"))
        .await
        .expect("brand token");

    assert_eq!(renewed.as_str(), "tok-brand-2");
    assert_eq!(store.get(keys::BRAND_TOKEN), Some("tok-brand-2".to_string()));
    assert_eq!(
        store.get(keys::BRAND_TOKEN_SOURCE),
        Some("second".to_string())
    );
    assert_eq!(store.get(&keys::affiliate_token(CompanyId::new(496))), None);
}
