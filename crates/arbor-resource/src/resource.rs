use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use arbor_catalog::{CatalogDocument, FieldValue};
use arbor_store::PropertySet;
use arbor_types::{PropertyValue, ResourcePath};

/// Shared handle to a resource within one request.
///
/// The session cache hands out clones of the same `ResourceRef` for
/// repeated lookups of a path, so handle identity (`Arc::ptr_eq`) is the
/// in-request identity of the resource.
pub type ResourceRef = Arc<RwLock<Resource>>;

/// Container vs leaf distinction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// May hold child resources (folders, web sites).
    Container,
    /// Holds content only (files, pages, users).
    Leaf,
}

/// A named content attachment on a resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHandler {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl ContentHandler {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data,
        }
    }
}

/// A path-addressed, typed entity with persisted properties.
///
/// `children` holds descendants materialized in memory before a recursive
/// add; a resource loaded from storage has an empty `children` list and its
/// actual children are reached through the session cache on demand.
#[derive(Clone, Debug)]
pub struct Resource {
    path: ResourcePath,
    kind: ResourceKind,
    metadata: PropertySet,
    handlers: Vec<ContentHandler>,
    children: Vec<ResourceRef>,
}

impl Resource {
    /// Create a resource from its parts.
    pub fn new(path: ResourcePath, kind: ResourceKind, metadata: PropertySet) -> Self {
        Self {
            path,
            kind,
            metadata,
            handlers: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Wrap into the shared handle the session works with.
    pub fn into_ref(self) -> ResourceRef {
        Arc::new(RwLock::new(self))
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind == ResourceKind::Container
    }

    /// The final path segment, or `None` for the root resource.
    pub fn name(&self) -> Option<&str> {
        self.path.name()
    }

    pub fn metadata(&self) -> &PropertySet {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut PropertySet {
        &mut self.metadata
    }

    /// The display title for `language`, falling back to the name.
    pub fn title(&self, language: &str) -> String {
        self.metadata
            .get_localized("title", language)
            .map(str::to_string)
            .unwrap_or_else(|| self.name().unwrap_or("/").to_string())
    }

    /// Attach a content handler.
    pub fn attach(&mut self, handler: ContentHandler) {
        self.handlers.push(handler);
    }

    pub fn handlers(&self) -> &[ContentHandler] {
        &self.handlers
    }

    /// Total bytes across attached content handlers.
    pub fn content_size(&self) -> u64 {
        self.handlers.iter().map(|h| h.data.len() as u64).sum()
    }

    /// Attach a materialized child (for composing a new subtree before add).
    pub fn add_child(&mut self, child: ResourceRef) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[ResourceRef] {
        &self.children
    }

    /// Detach and return the materialized children.
    pub fn take_children(&mut self) -> Vec<ResourceRef> {
        std::mem::take(&mut self.children)
    }

    /// Derive the catalog document indexed for this resource.
    ///
    /// Field values are recomputed from current state at every commit, so
    /// the index never holds fields older than the resource's last commit.
    pub fn catalog_values(&self) -> CatalogDocument {
        let mut doc = CatalogDocument::new(self.path.clone())
            .with_field("abspath", FieldValue::Keyword(self.path.to_string()))
            .with_field(
                "format",
                FieldValue::Keyword(self.metadata.format().as_str().to_string()),
            )
            .with_field("is_container", FieldValue::Flag(self.is_container()));

        if let Some(name) = self.name() {
            doc = doc.with_field("name", FieldValue::Keyword(name.to_string()));
        }
        if let Some(parent) = self.path.parent() {
            doc = doc.with_field("parent_path", FieldValue::Keyword(parent.to_string()));
        }

        doc = match self.metadata.get("title") {
            Some(PropertyValue::Localized(map)) => doc.with_field(
                "title",
                FieldValue::Keywords(map.values().cloned().collect()),
            ),
            Some(PropertyValue::Str(s)) => {
                doc.with_field("title", FieldValue::Text(s.clone()))
            }
            _ => doc,
        };

        if let Some(description) = self.metadata.get_localized("description", "en") {
            doc = doc.with_field("text", FieldValue::Text(description.to_string()));
        }

        if let Some(vhosts) = self.metadata.get("vhosts").and_then(PropertyValue::as_tokens) {
            doc = doc.with_field("vhosts", FieldValue::Keywords(vhosts.to_vec()));
        }

        let size = match self.kind {
            ResourceKind::Leaf => self.content_size() as i64,
            ResourceKind::Container => self.children.len() as i64,
        };
        doc.with_field("size", FieldValue::Integer(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::TypeTag;
    use std::collections::BTreeMap;

    fn webpage(path: &str) -> Resource {
        Resource::new(
            ResourcePath::parse(path).unwrap(),
            ResourceKind::Leaf,
            PropertySet::new(TypeTag::from("webpage")),
        )
    }

    #[test]
    fn title_falls_back_to_name() {
        let page = webpage("/site/intro");
        assert_eq!(page.title("en"), "intro");
    }

    #[test]
    fn title_uses_localized_property() {
        let mut page = webpage("/site/intro");
        let mut map = BTreeMap::new();
        map.insert("en".to_string(), "Introduction".to_string());
        page.metadata_mut()
            .set("title", PropertyValue::Localized(map));
        assert_eq!(page.title("en"), "Introduction");
    }

    #[test]
    fn content_size_sums_handlers() {
        let mut page = webpage("/site/intro");
        page.attach(ContentHandler::new("body", "text/html", vec![0u8; 10]));
        page.attach(ContentHandler::new("att", "image/png", vec![0u8; 5]));
        assert_eq!(page.content_size(), 15);
    }

    #[test]
    fn catalog_values_core_fields() {
        let mut page = webpage("/site/intro");
        page.metadata_mut().set("title", "Intro");
        let doc = page.catalog_values();
        assert_eq!(
            doc.field("abspath"),
            Some(&FieldValue::Keyword("/site/intro".into()))
        );
        assert_eq!(
            doc.field("parent_path"),
            Some(&FieldValue::Keyword("/site".into()))
        );
        assert_eq!(doc.field("name"), Some(&FieldValue::Keyword("intro".into())));
        assert_eq!(doc.field("is_container"), Some(&FieldValue::Flag(false)));
        assert_eq!(doc.field("title"), Some(&FieldValue::Text("Intro".into())));
    }

    #[test]
    fn catalog_values_root_has_no_parent() {
        let root = Resource::new(
            ResourcePath::root(),
            ResourceKind::Container,
            PropertySet::new(TypeTag::from("folder")),
        );
        let doc = root.catalog_values();
        assert!(doc.field("parent_path").is_none());
        assert!(doc.field("name").is_none());
    }

    #[test]
    fn catalog_values_vhosts_tokens() {
        let mut site = Resource::new(
            ResourcePath::parse("/site").unwrap(),
            ResourceKind::Container,
            PropertySet::new(TypeTag::from("website")),
        );
        site.metadata_mut().set(
            "vhosts",
            PropertyValue::Tokens(vec!["example.com".to_string()]),
        );
        let doc = site.catalog_values();
        assert_eq!(
            doc.field("vhosts"),
            Some(&FieldValue::Keywords(vec!["example.com".into()]))
        );
    }
}
