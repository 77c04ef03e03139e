//! Integration tests for the storefront directory and selection repair.

use vitrine_client::store::keys;
use vitrine_client::{ClientError, SelectionStore as _};
use vitrine_core::{AdReferenceId, CompanyId, ScopedAccessToken};
use vitrine_integration_tests::test_context;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn brand() -> ScopedAccessToken {
    ScopedAccessToken::brand("tok-brand")
}

async fn mount_directory(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/marcas"))
        .and(header("X-Access-Token", "tok-brand"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn directory_load_normalizes_brand_fields() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        serde_json::json!([
            {
                "empresa_id": 496,
                "nome_empresa": "Organização Ltda",
                "nome_marca": "Marca X",
                "logo_marca": "brand/logo.png",
                "anuncio_id": 555,
                "status": true
            },
            {
                "empresa_id": 497,
                "nome_empresa": "Filial Sul",
                "logo_empresa": "org/logo.png"
            }
        ]),
    )
    .await;

    let (ctx, _store) = test_context(&server.uri(), None);
    let records = ctx.directory().load(&brand()).await.expect("directory");

    assert_eq!(records.len(), 2);
    let first = records.first().expect("record");
    assert_eq!(first.display_name, "Marca X");
    assert_eq!(first.logo_path.as_deref(), Some("brand/logo.png"));
    assert_eq!(first.ad_reference_id, Some(AdReferenceId::new(555)));

    let second = records.get(1).expect("record");
    assert_eq!(second.display_name, "Filial Sul");
    assert_eq!(second.logo_path.as_deref(), Some("org/logo.png"));

    assert_eq!(
        ctx.directory().ad_reference_for(CompanyId::new(496)),
        Some(AdReferenceId::new(555))
    );
}

#[tokio::test]
async fn stale_selection_is_repaired_to_first_storefront() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        serde_json::json!([
            {"empresa_id": 7, "nome_empresa": "Loja 7"},
            {"empresa_id": 8, "nome_empresa": "Loja 8"}
        ]),
    )
    .await;

    let (ctx, store) = test_context(&server.uri(), None);
    // Selection persisted by an earlier session, no longer in the directory.
    store.set(keys::SELECTED_COMPANY_ID, "42");

    ctx.directory().load(&brand()).await.expect("directory");

    assert_eq!(ctx.directory().selected_company_id(), Some(CompanyId::new(7)));
    assert_eq!(store.get(keys::SELECTED_COMPANY_ID), Some("7".to_string()));
}

#[tokio::test]
async fn valid_selection_survives_a_reload() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        serde_json::json!([
            {"empresa_id": 7, "nome_empresa": "Loja 7"},
            {"empresa_id": 8, "nome_empresa": "Loja 8"}
        ]),
    )
    .await;

    let (ctx, store) = test_context(&server.uri(), None);
    store.set(keys::SELECTED_COMPANY_ID, "8");

    ctx.directory().load(&brand()).await.expect("directory");

    assert_eq!(ctx.directory().selected_company_id(), Some(CompanyId::new(8)));
}

#[tokio::test]
async fn empty_directory_is_valid_and_leaves_selection_unset() {
    let server = MockServer::start().await;
    mount_directory(&server, serde_json::json!([])).await;

    let (ctx, _store) = test_context(&server.uri(), None);
    let records = ctx.directory().load(&brand()).await.expect("directory");

    assert!(records.is_empty());
    assert_eq!(ctx.directory().selected_company_id(), None);
}

#[tokio::test]
async fn failed_load_keeps_previous_directory() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/marcas"))
        .and(header("X-Access-Token", "tok-brand"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"empresa_id": 7, "nome_empresa": "Loja 7"}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/marcas"))
        .respond_with(ResponseTemplate::new(500).set_body_string("erro"))
        .mount(&server)
        .await;

    let (ctx, _store) = test_context(&server.uri(), None);
    ctx.directory().load(&brand()).await.expect("directory");

    let result = ctx.directory().load(&brand()).await;
    assert!(matches!(result, Err(ClientError::Http { status: 500, .. })));

    // The previous contents are still served.
    assert!(ctx.directory().get_by_company_id(CompanyId::new(7)).is_some());
    assert_eq!(ctx.directory().selected_company_id(), Some(CompanyId::new(7)));
}
