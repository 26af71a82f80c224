//! Font provisioning.
//!
//! Custom typefaces ship as embedded font data and must be registered with
//! the drawing environment before any text is measured or drawn. System
//! fonts are resolved by name through a static table.
//!
//! ```text
//! ensure_fonts_ready(names)
//!   ├─ custom + unregistered ──► FontSource::load ──► parse ──► FontRegistry::insert
//!   ├─ custom + registered   ──► (nothing)
//!   └─ system / unknown      ──► static table / name passthrough
//!   ...all registrations settle...
//!   └─► FontsReady (database snapshot + resolved families)
//! ```
//!
//! [`FontsReady`] can only be obtained from [`FontProvisioner::ensure_fonts_ready`],
//! and every surface that draws text takes one, so text cannot be drawn with a
//! custom face before its registration has settled.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use usvg::fontdb;

use crate::error::{RenderError, RenderResult};
use crate::metrics::MetricClass;

/// Standard PDF face used when a font has no embedded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFace {
    /// Helvetica (sans).
    Helvetica,
    /// Times Roman (serif).
    TimesRoman,
    /// Courier (monospace).
    Courier,
}

/// Custom fonts shipped as embedded data: short id → display family.
const CUSTOM_FONTS: &[(&str, &str)] = &[
    ("andika", "Andika"),
    ("comic-neue", "Comic Neue"),
    ("fredoka", "Fredoka"),
    ("patrick-hand", "Patrick Hand"),
    ("schoolbell", "Schoolbell"),
    ("short-stack", "Short Stack"),
];

/// System/web-safe fonts: short name → display family, PDF face.
const SYSTEM_FONTS: &[(&str, &str, BuiltinFace)] = &[
    ("arial", "Arial", BuiltinFace::Helvetica),
    ("helvetica", "Helvetica", BuiltinFace::Helvetica),
    ("verdana", "Verdana", BuiltinFace::Helvetica),
    ("times", "Times New Roman", BuiltinFace::TimesRoman),
    ("georgia", "Georgia", BuiltinFace::TimesRoman),
    ("courier", "Courier New", BuiltinFace::Courier),
];

/// How a requested font name is classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontClass {
    /// Embedded font needing registration.
    Custom {
        /// Short id used to find the font data.
        id: String,
        /// Display family.
        family: String,
    },
    /// Resolved by name through the static table.
    System {
        /// Display family.
        family: String,
        /// PDF face.
        face: BuiltinFace,
    },
    /// Neither: passed through unmapped for the environment to resolve.
    Unknown(String),
}

/// Static name tables for custom and system fonts.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog;

impl FontCatalog {
    /// Classify a font name (case-insensitive, trimmed).
    #[must_use]
    pub fn classify(&self, name: &str) -> FontClass {
        let key = normalize(name);
        if let Some((id, family)) = CUSTOM_FONTS.iter().find(|(id, _)| *id == key) {
            return FontClass::Custom {
                id: (*id).to_string(),
                family: (*family).to_string(),
            };
        }
        if let Some((_, family, face)) = SYSTEM_FONTS
            .iter()
            .find(|(short, family, _)| *short == key || normalize(family) == key)
        {
            return FontClass::System {
                family: (*family).to_string(),
                face: *face,
            };
        }
        FontClass::Unknown(name.trim().to_string())
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Where embedded font data comes from.
#[async_trait]
pub trait FontSource: Send + Sync {
    /// Load the raw font data for a custom font id.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not available.
    async fn load(&self, id: &str) -> RenderResult<Vec<u8>>;
}

/// Loads `<root>/<id>.ttf` (or `.otf`) from disk.
#[derive(Debug, Clone)]
pub struct DirectoryFontSource {
    root: PathBuf,
}

impl DirectoryFontSource {
    /// Create a source rooted at a directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FontSource for DirectoryFontSource {
    async fn load(&self, id: &str) -> RenderResult<Vec<u8>> {
        let ttf = self.root.join(format!("{id}.ttf"));
        match tokio::fs::read(&ttf).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(tokio::fs::read(self.root.join(format!("{id}.otf"))).await?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory font data keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryFontSource {
    fonts: HashMap<String, Vec<u8>>,
}

impl MemoryFontSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add font data under an id.
    #[must_use]
    pub fn with_font(mut self, id: impl Into<String>, data: Vec<u8>) -> Self {
        self.fonts.insert(id.into(), data);
        self
    }
}

#[async_trait]
impl FontSource for MemoryFontSource {
    async fn load(&self, id: &str) -> RenderResult<Vec<u8>> {
        self.fonts
            .get(id)
            .cloned()
            .ok_or_else(|| RenderError::Resource(format!("no embedded data for font '{id}'")))
    }
}

/// A font that has been registered with the drawing environment.
#[derive(Debug, Clone)]
pub struct RegisteredFont {
    /// Family name read from the font data.
    pub family: String,
    /// Raw font data, embedded into PDF output.
    pub data: Arc<Vec<u8>>,
}

/// Process-wide, append-only set of registered fonts.
///
/// Cloning shares the same set. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    inner: Arc<RwLock<HashMap<String, RegisteredFont>>>,
}

impl FontRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a font name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&normalize(name))
    }

    /// Registered entry for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<RegisteredFont> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize(name))
            .cloned()
    }

    /// Register a font once. Returns `false` if it was already present.
    pub fn insert(&self, name: &str, font: RegisteredFont) -> bool {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let key = normalize(name);
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, font);
        true
    }

    /// Number of registered fonts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<RegisteredFont> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

/// A requested font resolved against the provisioned environment.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    /// The name the caller asked for.
    pub requested: String,
    /// Family to name in SVG output.
    pub family: String,
    /// Embedded data, when the font is a registered custom font.
    pub data: Option<Arc<Vec<u8>>>,
    /// PDF face to use without embedded data.
    pub builtin: BuiltinFace,
}

impl ResolvedFont {
    fn fallback(requested: &str) -> Self {
        Self {
            requested: requested.to_string(),
            family: requested.trim().to_string(),
            data: None,
            builtin: BuiltinFace::Helvetica,
        }
    }

    /// Width table for this font.
    #[must_use]
    pub fn metric_class(&self) -> MetricClass {
        match self.builtin {
            BuiltinFace::Courier => MetricClass::Monospace,
            _ if self.data.is_some() => MetricClass::Proportional,
            _ => MetricClass::for_family(&self.family),
        }
    }
}

/// Proof that provisioning settled, with everything needed to draw text.
#[derive(Debug, Clone)]
pub struct FontsReady {
    resolved: HashMap<String, ResolvedFont>,
    database: Arc<fontdb::Database>,
}

impl FontsReady {
    /// Resolve a font name. Names that were never requested resolve to
    /// the unmapped name with the default PDF face.
    #[must_use]
    pub fn resolve(&self, name: &str) -> ResolvedFont {
        self.resolved
            .get(&normalize(name))
            .cloned()
            .unwrap_or_else(|| ResolvedFont::fallback(name))
    }

    /// Font database for SVG rasterization.
    #[must_use]
    pub fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.database)
    }

    /// Names that were requested in the provisioning call.
    pub fn requested(&self) -> impl Iterator<Item = &str> {
        self.resolved.values().map(|f| f.requested.as_str())
    }
}

/// Provisions fonts into the drawing environment.
pub struct FontProvisioner {
    catalog: FontCatalog,
    source: Arc<dyn FontSource>,
    registry: FontRegistry,
    base: Arc<fontdb::Database>,
}

impl FontProvisioner {
    /// Create a provisioner with system fonts loaded into the base database.
    #[must_use]
    pub fn new(source: Arc<dyn FontSource>, registry: FontRegistry) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!("Font database loaded with {} system faces", db.len());
        Self::with_database(source, registry, db)
    }

    /// Create a provisioner over an explicit base database.
    #[must_use]
    pub fn with_database(
        source: Arc<dyn FontSource>,
        registry: FontRegistry,
        database: fontdb::Database,
    ) -> Self {
        Self {
            catalog: FontCatalog,
            source,
            registry,
            base: Arc::new(database),
        }
    }

    /// The shared registered-font set.
    #[must_use]
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// Ensure every named font is usable, then report readiness.
    ///
    /// Registration failures are logged and never abort the batch; the
    /// failing name resolves to itself and the environment's default face.
    /// Returns only after every registration has settled.
    pub async fn ensure_fonts_ready<I, S>(&self, names: I) -> FontsReady
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let requested: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty() && seen.insert(normalize(n)))
            .collect();

        let pending: Vec<(String, String)> = requested
            .iter()
            .filter(|name| !self.registry.contains(name))
            .filter_map(|name| match self.catalog.classify(name) {
                FontClass::Custom { id, .. } => Some((name.clone(), id)),
                _ => None,
            })
            .collect();

        let results =
            futures::future::join_all(pending.iter().map(|(name, id)| self.register(name, id)))
                .await;
        for ((name, _), result) in pending.iter().zip(results) {
            match result {
                Ok(family) => tracing::debug!("Registered font '{name}' as family '{family}'"),
                Err(e) => tracing::warn!("Font '{name}' unavailable, using fallback: {e}"),
            }
        }

        self.snapshot(&requested)
    }

    async fn register(&self, name: &str, id: &str) -> RenderResult<String> {
        let data = self.source.load(id).await.map_err(|e| RenderError::Font {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let family = parse_family(name, &data)?;
        self.registry.insert(
            name,
            RegisteredFont {
                family: family.clone(),
                data: Arc::new(data),
            },
        );
        Ok(family)
    }

    fn snapshot(&self, requested: &[String]) -> FontsReady {
        let mut database = (*self.base).clone();
        for font in self.registry.snapshot() {
            database.load_font_data(font.data.as_ref().clone());
        }

        let resolved = requested
            .iter()
            .map(|name| (normalize(name), self.resolve(name)))
            .collect();

        tracing::trace!("Fonts ready: {} faces available", database.len());
        FontsReady {
            resolved,
            database: Arc::new(database),
        }
    }

    fn resolve(&self, name: &str) -> ResolvedFont {
        match self.catalog.classify(name) {
            FontClass::Custom { .. } => match self.registry.get(name) {
                Some(font) => ResolvedFont {
                    requested: name.to_string(),
                    family: font.family,
                    data: Some(font.data),
                    builtin: BuiltinFace::Helvetica,
                },
                None => ResolvedFont::fallback(name),
            },
            FontClass::System { family, face } => ResolvedFont {
                requested: name.to_string(),
                family,
                data: None,
                builtin: face,
            },
            FontClass::Unknown(_) => ResolvedFont::fallback(name),
        }
    }
}

/// Parse font data and return its first family name.
fn parse_family(name: &str, data: &[u8]) -> RenderResult<String> {
    let mut scratch = fontdb::Database::new();
    let ids = scratch.load_font_source(fontdb::Source::Binary(Arc::new(data.to_vec())));
    ids.first()
        .and_then(|id| scratch.face(*id))
        .and_then(|face| face.families.first().map(|(family, _)| family.clone()))
        .ok_or_else(|| RenderError::Font {
            name: name.to_string(),
            reason: "data is not a readable font".to_string(),
        })
}
