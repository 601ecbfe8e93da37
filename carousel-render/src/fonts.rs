//! Font management for capture.
//!
//! Capture samples pixels only after fonts are resolvable, so the library
//! fronts a shared `fontdb` database handed to the rasterizer. It also
//! implements the core [`FontCatalog`] collaborator interface for the
//! editor's font picker.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use carousel_core::{CoreError, CoreResult, FontCatalog, FontResource};
use usvg::fontdb;

/// Shared font database with catalog-style management.
#[derive(Debug, Clone)]
pub struct FontLibrary {
    db: Arc<Mutex<Arc<fontdb::Database>>>,
}

impl FontLibrary {
    /// An empty library. Text renders with fallback metrics until fonts
    /// are installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            db: Arc::new(Mutex::new(Arc::new(fontdb::Database::new()))),
        }
    }

    /// A library preloaded with the system fonts.
    #[must_use]
    pub fn with_system_fonts() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        Self {
            db: Arc::new(Mutex::new(Arc::new(db))),
        }
    }

    /// Install font bytes (TTF/OTF) into the database.
    pub fn install(&self, bytes: Vec<u8>) {
        let mut guard = self.db.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::make_mut(&mut guard).load_font_data(bytes);
    }

    /// Family names currently resolvable.
    #[must_use]
    pub fn families(&self) -> Vec<String> {
        let guard = self.db.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut families: Vec<String> = guard
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Snapshot of the database for the rasterizer.
    #[must_use]
    pub fn database(&self) -> Arc<fontdb::Database> {
        self.db
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FontCatalog for FontLibrary {
    async fn list(&self) -> CoreResult<Vec<FontResource>> {
        Ok(self
            .families()
            .into_iter()
            .map(|family| FontResource {
                source: format!("local:{family}"),
                family,
            })
            .collect())
    }

    async fn upload(&self, family: &str, bytes: Vec<u8>) -> CoreResult<FontResource> {
        if bytes.is_empty() {
            return Err(CoreError::FontCatalog(format!(
                "Empty font payload for family {family:?}"
            )));
        }
        self.install(bytes);
        Ok(FontResource {
            family: family.to_string(),
            source: format!("local:{family}"),
        })
    }

    async fn refresh(&self) -> CoreResult<()> {
        let mut guard = self.db.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::make_mut(&mut guard).load_system_fonts();
        Ok(())
    }
}
