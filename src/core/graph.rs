//! # Graph — Contêiner de Nós e Arestas
//!
//! O [`Graph`] é o resultado de toda construção: um mapa de nós indexado pela
//! chave composta `"Tipo:id"` e uma sequência de arestas na ordem em que
//! foram emitidas.
//!
//! ## Armazenamento
//!
//! - **Nós**: `BTreeMap<String, GraphNode>`: ordem de chaves estável, o que
//!   deixa a exportação determinística sem custo extra
//! - **Arestas**: `Vec<GraphEdge>`: ordem de construção preservada
//!
//! ## Deduplicação na Inserção
//!
//! [`Graph::add_node`] segue a regra **first-writer-wins**: se a chave já
//! existe, o nó novo é descartado e as propriedades originais permanecem.
//! Os campos são públicos; quem insere direto em `nodes` assume a
//! responsabilidade, e o [`validator`](crate::export::validate_graph) aponta
//! as inconsistências.

use std::collections::{BTreeMap, HashSet};

use super::edge::{EdgeType, GraphEdge};
use super::node::{GraphNode, NodeRef, NodeType};

/// Versão do esquema de grafo produzido por este crate.
pub const SCHEMA_VERSION: &str = "v1";

#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    /// Nós indexados por chave composta.
    pub nodes: BTreeMap<String, GraphNode>,
    /// Arestas na ordem de emissão.
    pub edges: Vec<GraphEdge>,
    pub schema_version: String,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Insere um nó se a chave ainda não existe e retorna sua referência.
    ///
    /// Quando a chave já existe, o nó existente é mantido intacto.
    pub fn add_node(&mut self, node: GraphNode) -> NodeRef {
        let node_ref = node.node_ref();
        let key = node_ref.key();
        if !self.nodes.contains_key(&key) {
            tracing::debug!(key = %key, "grafo: nó armazenado");
            self.nodes.insert(key, node);
        }
        node_ref
    }

    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }

    pub fn get_node(&self, node: &NodeRef) -> Option<&GraphNode> {
        self.nodes.get(&node.key())
    }

    pub fn contains(&self, node: &NodeRef) -> bool {
        self.nodes.contains_key(&node.key())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values().filter(move |n| n.node_type == node_type)
    }

    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }

    /// Vizinhos distintos de um nó, em qualquer direção, na ordem das arestas.
    pub fn neighbors(&self, node: &NodeRef) -> Vec<&NodeRef> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for edge in &self.edges {
            let other = if &edge.from == node {
                &edge.to
            } else if &edge.to == node {
                &edge.from
            } else {
                continue;
            };
            if seen.insert(other) {
                out.push(other);
            }
        }
        out
    }

    /// Incorpora outro grafo: nós novos entram (first-writer-wins), arestas são anexadas.
    pub fn merge(&mut self, other: Graph) {
        for (key, node) in other.nodes {
            self.nodes.entry(key).or_insert(node);
        }
        self.edges.extend(other.edges);
    }
}
