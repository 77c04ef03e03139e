//! Normalized data types exposed by the client.
//!
//! The marketing API's responses are loosely typed (fields drift between
//! near-duplicate versions, ids arrive as strings or numbers). Everything in
//! this module is the normalized shape produced by the parsing step at the
//! gateway boundary (`wire` module); missing fields are defaulted or rejected
//! there, deterministically, so `Option` here means "genuinely optional".

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vitrine_core::{AdReferenceId, ChannelId, CompanyId, ModelSiteId, Phone, ProductId, ScopedAccessToken};

// =============================================================================
// Storefront Directory
// =============================================================================

/// One selectable storefront under the resolved brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontRecord {
    /// Unique key within one brand-scope response.
    pub company_id: CompanyId,
    /// Brand display name, falling back to the organization name.
    pub display_name: String,
    /// Brand logo path, falling back to the organization logo.
    pub logo_path: Option<String>,
    /// Site-model identifier used by the page-metadata endpoint.
    pub affiliate_model_site_id: Option<String>,
    pub model_site_id: Option<ModelSiteId>,
    pub active: Option<bool>,
    /// Advertisement linked to leads captured for this storefront.
    pub ad_reference_id: Option<AdReferenceId>,
}

// =============================================================================
// Page metadata
// =============================================================================

/// Descriptor of the storefront's site model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiteDescriptor {
    pub id: Option<String>,
    pub model_site_id: Option<ModelSiteId>,
    pub link: Option<String>,
    pub model_kind: Option<String>,
}

/// A contact channel advertised by the storefront (WhatsApp, phone, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactChannel {
    pub channel_id: Option<ChannelId>,
    /// Channel name ("WhatsApp", "Instagram", ...).
    pub name: Option<String>,
    /// The storefront's handle on the channel (number, profile, ...).
    pub handle: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub public: bool,
}

/// Per-storefront page bundle, replaced wholesale on every acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub site: SiteDescriptor,
    /// Template parameters; keys are unique, later duplicates win.
    pub params: BTreeMap<String, String>,
    /// Contact channels in the order the API returned them.
    pub contact_channels: Vec<ContactChannel>,
    /// Affiliate-scope token authoritative for catalog and lead calls.
    pub access_token: ScopedAccessToken,
    /// Authoritative company id, which may differ from the route-supplied one.
    pub company_id: Option<CompanyId>,
    pub ad_reference_id: Option<AdReferenceId>,
    pub company_logo: Option<String>,
}

impl PageMetadata {
    /// Convenience lookup into the parameter map.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// True when the boolean-ish parameter is present and `"true"`.
    #[must_use]
    pub fn param_flag(&self, key: &str) -> bool {
        self.param(key).is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// One sellable item in a storefront's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique within one catalog fetch after deduplication.
    pub id: ProductId,
    pub name: String,
    /// Price as the decimal string the API sent.
    pub price: String,
    pub cover_image_path: Option<String>,
    pub company_id: Option<CompanyId>,
}

impl CatalogItem {
    /// Price parsed as a decimal, when the API sent a parseable value.
    #[must_use]
    pub fn price_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(self.price.trim()).ok()
    }
}

/// Result of one catalog acquisition: metadata plus the filtered,
/// deduplicated item list.
#[derive(Debug, Clone)]
pub struct StorefrontContext {
    pub page: PageMetadata,
    pub items: Vec<CatalogItem>,
}

// =============================================================================
// Product enrichment
// =============================================================================

/// Detail-level product information for the product modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub id: ProductId,
    pub name: String,
    /// May contain embedded markup; rendering is the caller's concern.
    pub description: Option<String>,
    pub price: Option<String>,
    /// Media paths/URLs in API order.
    pub media: Vec<String>,
}

/// One installment-plan row for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentPlan {
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    /// Per-installment amount as the decimal string the API sent.
    pub amount: String,
}

impl InstallmentPlan {
    /// Amount parsed as a decimal, when the API sent a parseable value.
    #[must_use]
    pub fn amount_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }
}

// =============================================================================
// Lead submission
// =============================================================================

/// Legal person kind, on the wire as `"F"` (física) / `"J"` (jurídica).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonType {
    #[serde(rename = "F")]
    Individual,
    #[serde(rename = "J")]
    Organization,
}

/// Declared gender, on the wire as `"M"` / `"F"` / `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

/// A product reference inside an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityProduct {
    pub id: ProductId,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
}

/// Outbound lead record. Never stored; one-shot submission.
///
/// Field names serialize to the marketing API's Portuguese keys. Optional
/// fields are omitted from the JSON body entirely when unset - the API
/// treats `null` and absent differently for `anuncio_id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpportunityPayload {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "cpf_cnpj", skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(rename = "email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "tipo_pessoa", skip_serializing_if = "Option::is_none")]
    pub person_type: Option<PersonType>,
    #[serde(rename = "sexo", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(rename = "telefones", skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<Phone>,
    #[serde(rename = "produtos", skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<OpportunityProduct>,
    #[serde(rename = "anuncio_id", skip_serializing_if = "Option::is_none")]
    pub ad_reference_id: Option<AdReferenceId>,
    /// Flow tag ("whatsapp-modal", "financiamento", ...).
    #[serde(rename = "origem", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl OpportunityPayload {
    /// Minimal individual-contact payload.
    #[must_use]
    pub fn contact(full_name: impl Into<String>, phone: Phone) -> Self {
        Self {
            full_name: Some(full_name.into()),
            person_type: Some(PersonType::Individual),
            phones: vec![phone],
            ..Self::default()
        }
    }

    /// Attach a product reference. Non-positive ids are rejected upstream of
    /// the API, so they are silently skipped here.
    #[must_use]
    pub fn with_product(mut self, id: ProductId, quantity: u32) -> Self {
        if id.as_i64() > 0 {
            self.products.push(OpportunityProduct { id, quantity });
        }
        self
    }

    /// Attach the ad reference when one exists.
    #[must_use]
    pub fn with_ad_reference(mut self, ad_reference_id: Option<AdReferenceId>) -> Self {
        self.ad_reference_id = ad_reference_id;
        self
    }

    /// Tag the originating flow.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_price_decimal() {
        let item = CatalogItem {
            id: ProductId::new(1),
            name: "Consórcio Imóvel".to_string(),
            price: " 1999.90 ".to_string(),
            cover_image_path: None,
            company_id: None,
        };
        assert_eq!(item.price_decimal(), Decimal::from_str("1999.90").ok());

        let bad = CatalogItem { price: "n/a".to_string(), ..item };
        assert!(bad.price_decimal().is_none());
    }

    #[test]
    fn test_payload_omits_unset_optionals() {
        let payload = OpportunityPayload::contact("Maria", Phone { ddd: 81, numero: 999_990_000 });
        let json = serde_json::to_value(&payload).expect("json");

        assert_eq!(json["nome"], "Maria");
        assert_eq!(json["tipo_pessoa"], "F");
        let object = json.as_object().expect("object");
        assert!(!object.contains_key("anuncio_id"));
        assert!(!object.contains_key("produtos"));
        assert!(!object.contains_key("descricao"));
        assert!(!object.contains_key("origem"));
    }

    #[test]
    fn test_payload_includes_ad_reference_verbatim() {
        let payload = OpportunityPayload::default()
            .with_ad_reference(Some(AdReferenceId::new(555)));
        let json = serde_json::to_value(&payload).expect("json");
        assert_eq!(json["anuncio_id"], 555);
    }

    #[test]
    fn test_payload_skips_invalid_product_id() {
        let payload = OpportunityPayload::default()
            .with_product(ProductId::new(0), 1)
            .with_product(ProductId::new(-3), 1)
            .with_product(ProductId::new(12), 2);
        assert_eq!(payload.products.len(), 1);
        let json = serde_json::to_value(&payload).expect("json");
        assert_eq!(json["produtos"][0]["id"], 12);
        assert_eq!(json["produtos"][0]["quantidade"], 2);
    }

    #[test]
    fn test_param_flag() {
        let mut params = BTreeMap::new();
        params.insert("is_show_price".to_string(), "true".to_string());
        params.insert("is_consorcio".to_string(), "false".to_string());
        let page = PageMetadata {
            site: SiteDescriptor::default(),
            params,
            contact_channels: vec![],
            access_token: ScopedAccessToken::affiliate("t"),
            company_id: None,
            ad_reference_id: None,
            company_logo: None,
        };
        assert!(page.param_flag("is_show_price"));
        assert!(!page.param_flag("is_consorcio"));
        assert!(!page.param_flag("missing"));
    }
}
