//! Raw marketing-API response shapes and their normalization.
//!
//! The API's JSON drifts between near-duplicate versions: ids arrive as
//! strings or numbers, prices as strings or numbers, media entries as bare
//! paths or `{url}` objects, and most fields go missing without warning.
//! Everything is deserialized permissively here and converted into the
//! normalized types exactly once, at this boundary.

use serde::Deserialize;
use vitrine_core::{AdReferenceId, ChannelId, CompanyId, ModelSiteId, ProductId, ScopedAccessToken};

use crate::error::ClientError;
use crate::types::{
    CatalogItem, ContactChannel, InstallmentPlan, PageMetadata, ProductInfo, SiteDescriptor,
    StorefrontRecord,
};

// =============================================================================
// Permissive scalars
// =============================================================================

/// A value the API sends interchangeably as a JSON number or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Number(i64),
    Float(f64),
    Text(String),
}

impl NumberOrString {
    /// Interpret as an integer id; unparseable strings become `None`.
    fn as_id(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret as a decimal string.
    fn as_decimal_string(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// =============================================================================
// Token grants
// =============================================================================

/// Brand-token endpoint response: `?EMS=<siteToken>`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawBrandGrant {
    #[serde(default)]
    pub empresa_id: Option<NumberOrString>,
    #[serde(default)]
    pub nome_empresa: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
}

impl RawBrandGrant {
    /// The granted brand token, or [`ClientError::TokenNotFound`] when the
    /// response carries no usable token field.
    pub fn into_token(self) -> Result<ScopedAccessToken, ClientError> {
        non_blank(self.access)
            .map(ScopedAccessToken::brand)
            .ok_or(ClientError::TokenNotFound)
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.empresa_id.as_ref().and_then(NumberOrString::as_id).map(CompanyId::new)
    }

    /// The granting brand's display name, when the response carries one.
    pub fn brand_name(&self) -> Option<&str> {
        self.nome_empresa
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Affiliate-token endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct RawAccessGrant {
    #[serde(default)]
    pub access: Option<String>,
}

impl RawAccessGrant {
    pub fn into_token(self) -> Result<ScopedAccessToken, ClientError> {
        non_blank(self.access)
            .map(ScopedAccessToken::affiliate)
            .ok_or(ClientError::TokenNotFound)
    }
}

// =============================================================================
// Storefront directory
// =============================================================================

/// Directory entry as the API sends it; brand-level fields are optional and
/// fall back to the organization-level ones during normalization.
#[derive(Debug, Deserialize)]
pub(crate) struct RawStorefront {
    pub empresa_id: i64,
    #[serde(default)]
    pub nome_empresa: Option<String>,
    #[serde(default)]
    pub logo_empresa: Option<String>,
    #[serde(default)]
    pub nome_marca: Option<String>,
    #[serde(default)]
    pub logo_marca: Option<String>,
    #[serde(default)]
    pub logomarca_url: Option<String>,
    #[serde(default)]
    pub empresa_modelo_site_id: Option<String>,
    #[serde(default)]
    pub modelo_site_id: Option<i64>,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub anuncio_id: Option<i64>,
}

impl From<RawStorefront> for StorefrontRecord {
    fn from(raw: RawStorefront) -> Self {
        let organization_name = non_blank(raw.nome_empresa).unwrap_or_default();
        let display_name = non_blank(raw.nome_marca).unwrap_or(organization_name);
        let logo_path = non_blank(raw.logo_marca)
            .or_else(|| non_blank(raw.logomarca_url))
            .or_else(|| non_blank(raw.logo_empresa));

        Self {
            company_id: CompanyId::new(raw.empresa_id),
            display_name,
            logo_path,
            affiliate_model_site_id: non_blank(raw.empresa_modelo_site_id),
            model_site_id: raw.modelo_site_id.map(ModelSiteId::new),
            active: raw.status,
            ad_reference_id: raw.anuncio_id.map(AdReferenceId::new),
        }
    }
}

// =============================================================================
// Page metadata
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSite {
    #[serde(default)]
    pub id: Option<NumberOrString>,
    #[serde(default)]
    pub modelo_site_id: Option<i64>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tipo_modelo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParam {
    pub chave: String,
    #[serde(default)]
    pub valor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawChannelInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawContactChannel {
    #[serde(default)]
    pub canal_id: Option<i64>,
    #[serde(default)]
    pub identificador: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub canal: Option<RawChannelInfo>,
}

impl From<RawContactChannel> for ContactChannel {
    fn from(raw: RawContactChannel) -> Self {
        let channel = raw.canal.unwrap_or_default();
        Self {
            channel_id: raw.canal_id.or(channel.id).map(ChannelId::new),
            name: non_blank(channel.nome),
            handle: non_blank(raw.identificador),
            url: non_blank(channel.url),
            icon: non_blank(channel.icon),
            color: non_blank(channel.color),
            public: raw.is_public.unwrap_or(false),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPageMeta {
    #[serde(default)]
    pub canais_contato: Option<Vec<RawContactChannel>>,
    #[serde(default)]
    pub empresa_id: Option<NumberOrString>,
    #[serde(default)]
    pub anuncio_id: Option<i64>,
    #[serde(default)]
    pub empresa_logo: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
}

/// `detalhes-pagina-vendas` response.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPageDetails {
    #[serde(default)]
    pub site: Option<RawSite>,
    #[serde(default)]
    pub params: Option<Vec<RawParam>>,
    #[serde(default)]
    pub meta: Option<RawPageMeta>,
}

impl TryFrom<RawPageDetails> for PageMetadata {
    type Error = ClientError;

    /// Normalize a page-details response.
    ///
    /// The resolved access token is the one field the rest of the chain
    /// cannot proceed without; a response missing it is rejected outright
    /// rather than letting an empty credential propagate.
    fn try_from(raw: RawPageDetails) -> Result<Self, Self::Error> {
        let meta = raw.meta.unwrap_or_default();
        let access_token = non_blank(meta.access)
            .map(ScopedAccessToken::affiliate)
            .ok_or(ClientError::TokenNotFound)?;

        let site = raw.site.unwrap_or_default();
        let params = raw
            .params
            .unwrap_or_default()
            .into_iter()
            .map(|p| (p.chave, p.valor.unwrap_or_default()))
            .collect();

        Ok(Self {
            site: SiteDescriptor {
                id: site.id.as_ref().map(NumberOrString::as_decimal_string),
                model_site_id: site.modelo_site_id.map(ModelSiteId::new),
                link: non_blank(site.link),
                model_kind: non_blank(site.tipo_modelo),
            },
            params,
            contact_channels: meta
                .canais_contato
                .unwrap_or_default()
                .into_iter()
                .map(ContactChannel::from)
                .collect(),
            access_token,
            company_id: meta.empresa_id.as_ref().and_then(NumberOrString::as_id).map(CompanyId::new),
            ad_reference_id: meta.anuncio_id.map(AdReferenceId::new),
            company_logo: non_blank(meta.empresa_logo),
        })
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Catalog entry; `empresa_id` arrives as a string or a number depending on
/// the API version.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCatalogItem {
    pub id: i64,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub preco: Option<NumberOrString>,
    #[serde(default)]
    pub capa: Option<String>,
    #[serde(default)]
    pub empresa_id: Option<NumberOrString>,
}

impl From<RawCatalogItem> for CatalogItem {
    fn from(raw: RawCatalogItem) -> Self {
        Self {
            id: ProductId::new(raw.id),
            name: non_blank(raw.nome).unwrap_or_default(),
            price: raw
                .preco
                .as_ref()
                .map(NumberOrString::as_decimal_string)
                .unwrap_or_default(),
            cover_image_path: non_blank(raw.capa),
            company_id: raw.empresa_id.as_ref().and_then(NumberOrString::as_id).map(CompanyId::new),
        }
    }
}

// =============================================================================
// Product enrichment
// =============================================================================

/// Media entries arrive either as bare path strings or `{url}` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawMedia {
    Path(String),
    Object {
        url: String,
        #[serde(default)]
        #[allow(dead_code)]
        filename: Option<String>,
    },
}

impl RawMedia {
    fn into_url(self) -> Option<String> {
        let url = match self {
            Self::Path(path) => path,
            Self::Object { url, .. } => url,
        };
        non_blank(Some(url))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProductInfo {
    pub id: i64,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub preco: Option<NumberOrString>,
    #[serde(default)]
    pub midias: Option<Vec<RawMedia>>,
}

impl From<RawProductInfo> for ProductInfo {
    fn from(raw: RawProductInfo) -> Self {
        Self {
            id: ProductId::new(raw.id),
            name: non_blank(raw.nome).unwrap_or_default(),
            description: non_blank(raw.descricao),
            price: raw.preco.as_ref().map(NumberOrString::as_decimal_string),
            media: raw
                .midias
                .unwrap_or_default()
                .into_iter()
                .filter_map(RawMedia::into_url)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawInstallment {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    pub quantidade: u32,
    pub valor: NumberOrString,
}

impl From<RawInstallment> for InstallmentPlan {
    fn from(raw: RawInstallment) -> Self {
        Self {
            // The API occasionally omits the plan name; the UI label is
            // generic in that case.
            name: non_blank(raw.nome).unwrap_or_else(|| "Parcelamento".to_string()),
            description: non_blank(raw.descricao),
            quantity: raw.quantidade,
            amount: raw.valor.as_decimal_string(),
        }
    }
}
