//! # GraphNode — Nó Tipado do Grafo
//!
//! Um [`GraphNode`] é identificado por **tipo + id**. A combinação forma a
//! chave composta `"Tipo:id"` usada pelo [`Graph`](super::Graph): dois nós
//! com a mesma chave são, por definição, o mesmo nó.
//!
//! ## Tipos de Nó ([`NodeType`])
//!
//! | Tipo | Origem | Exemplo de id |
//! |------|--------|---------------|
//! | `Post` | social | `t3_abc123` |
//! | `Keyword` | social | SHA-256 de `"lottery|en"` |
//! | `Entity` | todos | `kb:Q42` ou SHA-256 |
//! | `Topic` | social | `gaming` |
//! | `SentimentTag` | social | `excited` |
//! | `User` | social | `some_user` |
//! | `Subreddit` | social | `lottery` |
//! | `MarketData` | mercado | `stat-2024-03-tx` |
//! | `State` | mercado/política | `TX` |
//! | `Segment` | mercado | `scratch tickets` |
//! | `Policy` | política | `bill-1234` |
//! | `PolicyType` | política | `legislation` |
//! | `KeyPoint` | política | SHA-256 namespaced |
//!
//! As propriedades são um mapa JSON (`serde_json::Map`) de primitivos e listas.
//! Depois da inserção no grafo elas não mudam mais (first-writer-wins).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mapa de propriedades de nós e arestas.
pub type Properties = serde_json::Map<String, Value>;

/// Enumeração fixa dos tipos de nó.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    Post,
    Keyword,
    Entity,
    Topic,
    SentimentTag,
    User,
    Subreddit,
    MarketData,
    State,
    Segment,
    Policy,
    PolicyType,
    KeyPoint,
}

impl NodeType {
    /// Nome usado na chave composta e na exportação.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Post => "Post",
            NodeType::Keyword => "Keyword",
            NodeType::Entity => "Entity",
            NodeType::Topic => "Topic",
            NodeType::SentimentTag => "SentimentTag",
            NodeType::User => "User",
            NodeType::Subreddit => "Subreddit",
            NodeType::MarketData => "MarketData",
            NodeType::State => "State",
            NodeType::Segment => "Segment",
            NodeType::Policy => "Policy",
            NodeType::PolicyType => "PolicyType",
            NodeType::KeyPoint => "KeyPoint",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Referência leve a um nó: tipo + id.
///
/// Arestas guardam referências em vez de cópias dos nós: a resolução
/// acontece pela chave composta no [`Graph`](super::Graph).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub id: String,
}

impl NodeRef {
    pub fn new(node_type: NodeType, id: impl Into<String>) -> Self {
        Self {
            node_type,
            id: id.into(),
        }
    }

    /// Chave composta `"Tipo:id"`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.node_type, self.id)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node_type, self.id)
    }
}

/// Nó do grafo de conhecimento.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub id: String,
    pub properties: Properties,
}

impl GraphNode {
    /// Cria um nó sem propriedades.
    pub fn new(node_type: NodeType, id: impl Into<String>) -> Self {
        Self {
            node_type,
            id: id.into(),
            properties: Properties::new(),
        }
    }

    /// Builder: adiciona uma propriedade.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Builder: adiciona a propriedade só se o valor existir.
    ///
    /// Strings vazias (após trim) contam como ausentes.
    pub fn with_optional<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.into();
            let blank = matches!(&value, Value::String(s) if s.trim().is_empty());
            if !value.is_null() && !blank {
                self.properties.insert(key.to_string(), value);
            }
        }
        self
    }

    pub fn key(&self) -> String {
        format!("{}:{}", self.node_type, self.id)
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.node_type, self.id.clone())
    }

    /// `true` se nenhuma propriedade tem valor (mapa vazio ou só `null`).
    pub fn has_empty_properties(&self) -> bool {
        self.properties.values().all(Value::is_null)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_format() {
        let node = GraphNode::new(NodeType::SentimentTag, "excited");
        assert_eq!(node.key(), "SentimentTag:excited");
        assert_eq!(node.node_ref().key(), node.key());
        assert_eq!(NodeRef::new(NodeType::State, "TX").to_string(), "State:TX");
    }

    #[test]
    fn optional_properties_skip_absent_and_blank() {
        let node = GraphNode::new(NodeType::Post, "p1")
            .with_optional("title", Some("Hello"))
            .with_optional("summary", Some("   "))
            .with_optional::<f64>("score", None)
            .with_optional("nothing", Some(Value::Null));
        assert_eq!(node.properties.len(), 1);
        assert_eq!(node.property_str("title"), Some("Hello"));
    }

    #[test]
    fn empty_property_detection() {
        assert!(GraphNode::new(NodeType::Topic, "t").has_empty_properties());
        let nulls = GraphNode::new(NodeType::Topic, "t").with_property("label", Value::Null);
        assert!(nulls.has_empty_properties());
        let filled = GraphNode::new(NodeType::Topic, "t").with_property("label", "T");
        assert!(!filled.has_empty_properties());
    }

    #[test]
    fn node_ref_serializes_with_type_field() {
        let json = serde_json::to_value(NodeRef::new(NodeType::Keyword, "abc")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Keyword", "id": "abc"}));
    }
}
