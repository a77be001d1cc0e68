//! # GraphEdge — Aresta Tipada Entre Nós
//!
//! Uma [`GraphEdge`] conecta dois nós por referência ([`NodeRef`]) e carrega
//! um mapa de propriedades. O peso, quando existe, fica na propriedade
//! `weight`.
//!
//! ## Tipos de Aresta ([`EdgeType`])
//!
//! | Tipo | De → Para | Builder |
//! |------|-----------|---------|
//! | `MENTIONS_KEYWORD` | Post → Keyword | social |
//! | `MENTIONS_ENTITY` | Post/MarketData/Policy → Entity | todos |
//! | `HAS_TOPIC` | Post → Topic | social |
//! | `HAS_SENTIMENT` | Post → SentimentTag | social |
//! | `AUTHORED_BY` | Post → User | social |
//! | `IN_SUBREDDIT` | Post → Subreddit | social |
//! | `CO_OCCURS` | Keyword → Keyword | social |
//! | `IN_STATE` | MarketData → State | mercado |
//! | `HAS_SEGMENT` | MarketData → Segment | mercado |
//! | `APPLIES_TO_STATE` | Policy → State | política |
//! | `HAS_TYPE` | Policy → PolicyType | política |
//! | `HAS_KEYPOINT` | Policy → KeyPoint | política |
//! | `POLICY_RELATION` | Entity → Entity | política |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::{NodeRef, Properties};

/// Enumeração fixa dos tipos de aresta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    MentionsKeyword,
    MentionsEntity,
    HasTopic,
    HasSentiment,
    AuthoredBy,
    InSubreddit,
    CoOccurs,
    InState,
    HasSegment,
    AppliesToState,
    HasType,
    HasKeypoint,
    PolicyRelation,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::MentionsKeyword => "MENTIONS_KEYWORD",
            EdgeType::MentionsEntity => "MENTIONS_ENTITY",
            EdgeType::HasTopic => "HAS_TOPIC",
            EdgeType::HasSentiment => "HAS_SENTIMENT",
            EdgeType::AuthoredBy => "AUTHORED_BY",
            EdgeType::InSubreddit => "IN_SUBREDDIT",
            EdgeType::CoOccurs => "CO_OCCURS",
            EdgeType::InState => "IN_STATE",
            EdgeType::HasSegment => "HAS_SEGMENT",
            EdgeType::AppliesToState => "APPLIES_TO_STATE",
            EdgeType::HasType => "HAS_TYPE",
            EdgeType::HasKeypoint => "HAS_KEYPOINT",
            EdgeType::PolicyRelation => "POLICY_RELATION",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aresta direcionada entre dois nós.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub from: NodeRef,
    pub to: NodeRef,
    pub properties: Properties,
}

impl GraphEdge {
    pub fn new(edge_type: EdgeType, from: NodeRef, to: NodeRef) -> Self {
        Self {
            edge_type,
            from,
            to,
            properties: Properties::new(),
        }
    }

    /// Builder: adiciona uma propriedade.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Builder: adiciona a propriedade só se o valor existir (e não for `null`).
    pub fn with_optional<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        let value: Option<Value> = value.map(Into::into);
        if let Some(value) = value.filter(|v| !v.is_null()) {
            self.properties.insert(key.to_string(), value);
        }
        self
    }

    /// Atalho para `with_property("weight", w)`.
    pub fn with_weight(self, weight: f64) -> Self {
        self.with_property("weight", weight)
    }

    pub fn weight(&self) -> Option<f64> {
        self.properties.get("weight").and_then(Value::as_f64)
    }

    /// `true` se a aresta toca o nó (em qualquer ponta).
    pub fn touches(&self, node: &NodeRef) -> bool {
        &self.from == node || &self.to == node
    }
}
