//! Serde shapes of the graph document as written on disk.
//!
//! Every field is optional here so the store can report which required
//! field is missing instead of surfacing a generic deserializer error.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawGraph {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub authentication: Option<RawAuthentication>,
    #[serde(default, deserialize_with = "ordered_patterns")]
    pub common_patterns: Vec<(String, Vec<String>)>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMetadata {
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawNode {
    pub id: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub elements: Option<Vec<RawElement>>,
    pub route: Option<String>,
    pub requires_auth: Option<bool>,
    pub products: Option<Vec<RawProduct>>,
    pub user_flow: Option<RawUserFlow>,
    pub appears_on: Option<Vec<String>>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawElement {
    #[serde(rename = "type", default)]
    pub element_type: String,
    #[serde(default)]
    pub description: String,
    pub selector: Option<String>,
    pub placeholder: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProduct {
    #[serde(default)]
    pub name: String,
    pub price: Option<RawScalar>,
    #[serde(default)]
    pub category: String,
}

/// Prices show up both as numbers and as preformatted strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawScalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for RawScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawScalar::Text(s) => write!(f, "{}", s),
            RawScalar::Integer(n) => write!(f, "{}", n),
            RawScalar::Float(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawUserFlow {
    #[serde(default)]
    pub entry_point: bool,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEdge {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAuthentication {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub public_pages: Vec<String>,
    #[serde(default)]
    pub protected_pages: Vec<String>,
    pub default_credentials: Option<RawCredentials>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCredentials {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

/// Read `commonPatterns` keeping the document's key order, which neither
/// `serde_json::Map` nor a `HashMap` would preserve.
fn ordered_patterns<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<String>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PatternVisitor;

    impl<'de> Visitor<'de> for PatternVisitor {
        type Value = Vec<(String, Vec<String>)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of pattern name to a list of steps")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut patterns = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, steps)) = access.next_entry::<String, Vec<String>>()? {
                patterns.push((name, steps));
            }
            Ok(patterns)
        }
    }

    deserializer.deserialize_any(PatternVisitor)
}
