//! # Módulo Core — Identidade, Ontologia e Modelo de Grafo
//!
//! Tipos e funções compartilhados pelos três builders:
//!
//! - [`canonical`]: normalização de texto e IDs determinísticos
//! - [`ontology`]: canonicalização de predicados de relação
//! - [`timestamp`]: parsing tolerante de datas
//! - [`GraphNode`], [`GraphEdge`], [`Graph`]: o modelo de grafo em memória
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use semantic_graph::core::{canonical, Graph, GraphNode, NodeType};
//!
//! let mut graph = Graph::new();
//! let id = canonical::keyword_id("Lottery", "en");
//! graph.add_node(GraphNode::new(NodeType::Keyword, id.clone()).with_property("text", "lottery"));
//! graph.add_node(GraphNode::new(NodeType::Keyword, canonical::keyword_id(" LOTTERY ", "EN")));
//!
//! // Mesmo conteúdo normalizado → mesma chave → um único nó
//! assert_eq!(graph.node_count(), 1);
//! ```

pub mod canonical;
pub mod ontology;
pub mod timestamp;

/// Nó tipado ([`GraphNode`], [`NodeType`], [`NodeRef`]).
pub mod node;

/// Aresta tipada ([`GraphEdge`], [`EdgeType`]).
pub mod edge;

/// Contêiner [`Graph`].
pub mod graph;

pub use edge::{EdgeType, GraphEdge};
pub use graph::{Graph, SCHEMA_VERSION};
pub use node::{GraphNode, NodeRef, NodeType, Properties};
pub use ontology::RelationAnnotation;
