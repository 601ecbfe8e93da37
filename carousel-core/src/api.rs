//! External collaborator interfaces.
//!
//! The remote persistence API and the font-catalog service live outside this
//! system; only their seams are defined here. Implementations are injected
//! by the host application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{CoreResult, Slide};

/// Payload for creating or updating a named carousel document remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselDraft {
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ordered slide payloads.
    pub slides: Vec<Slide>,
    /// Optional PNG thumbnail of the first slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_png: Option<Vec<u8>>,
}

/// Create/update/delete API for named carousel documents.
#[async_trait]
pub trait CarouselApi: Send + Sync {
    /// Create a carousel and return its remote identifier.
    async fn create(&self, draft: &CarouselDraft) -> CoreResult<String>;

    /// Update an existing carousel.
    async fn update(&self, id: &str, draft: &CarouselDraft) -> CoreResult<()>;

    /// Delete a carousel.
    async fn delete(&self, id: &str) -> CoreResult<()>;
}

/// A loadable font resource reference returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontResource {
    /// Family name to request at render time.
    pub family: String,
    /// Where the font bytes can be loaded from.
    pub source: String,
}

/// Font-catalog service: list/upload/refresh by family name.
#[async_trait]
pub trait FontCatalog: Send + Sync {
    /// List the families currently available.
    async fn list(&self) -> CoreResult<Vec<FontResource>>;

    /// Upload font bytes under a family name, returning its resource.
    async fn upload(&self, family: &str, bytes: Vec<u8>) -> CoreResult<FontResource>;

    /// Re-read the backing catalog.
    async fn refresh(&self) -> CoreResult<()>;
}
