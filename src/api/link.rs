use axum::http::Method;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A single hypermedia link.
///
/// Serialized as `{"href": ..., "method"?: ..., "title"?: ...}`. The relation is
/// the key under which the link is stored in a [`LinkSet`], so it is not part
/// of the serialized object. `method` is omitted when it is `GET`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub relation: String,
    pub href: String,
    pub method: Method,
    pub title: Option<String>,
}

impl Link {
    pub fn new(relation: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            href: href.into(),
            method: Method::GET,
            title: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_method = self.method != Method::GET;
        let len = 1 + usize::from(has_method) + usize::from(self.title.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("href", &self.href)?;
        if has_method {
            map.serialize_entry("method", self.method.as_str())?;
        }
        if let Some(title) = &self.title {
            map.serialize_entry("title", title)?;
        }
        map.end()
    }
}

/// Relation name → link, in insertion order.
///
/// Inserting a link whose relation already exists replaces the previous link
/// and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkSet(IndexMap<String, Link>);

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, link: Link) -> &mut Self {
        self.0.insert(link.relation.clone(), link);
        self
    }

    pub fn with(mut self, link: Link) -> Self {
        self.insert(link);
        self
    }

    pub fn get(&self, relation: &str) -> Option<&Link> {
        self.0.get(relation)
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.0.contains_key(relation)
    }

    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds every link from `other`, overriding relations already present.
    pub fn merge(&mut self, other: LinkSet) {
        for (_, link) in other.0 {
            self.insert(link);
        }
    }
}

impl FromIterator<Link> for LinkSet {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        let mut set = LinkSet::new();
        for link in iter {
            set.insert(link);
        }
        set
    }
}
