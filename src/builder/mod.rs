//! # Builders — Registros → Grafos
//!
//! Três builders independentes, um por família de registro:
//!
//! | Builder | Entrada | Nós principais |
//! |---------|---------|----------------|
//! | [`social`] | [`SocialPost`] | Post, Keyword, Entity, Topic, SentimentTag, User, Subreddit |
//! | [`market`] | [`MarketRecord`] | MarketData, State, Segment, Entity |
//! | [`policy`] | [`PolicyRecord`] | Policy, State, PolicyType, KeyPoint, Entity |
//!
//! Todos compartilham as mesmas regras de identidade ([`crate::core::canonical`]):
//! a mesma entidade mencionada num post e numa política gera o mesmo ID, o que
//! permite unir os grafos com [`Graph::merge`].
//!
//! Os builders são funções puras da entrada (mais o relógio, quando o
//! decaimento usa "agora" como referência) e podem rodar em paralelo;
//! [`build_all`] faz exatamente isso com `rayon::join`.

pub mod market;
pub mod policy;
pub mod social;
pub mod weighting;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::BuildConfig;
use crate::core::canonical::{entity_id, entity_type_label, non_blank};
use crate::core::{EdgeType, Graph, GraphEdge, GraphNode, NodeRef, NodeType};
use crate::records::{EntityMention, MarketRecord, PolicyRecord, SocialPost};

pub use market::build_market_graph;
pub use policy::build_policy_graph;
pub use social::{build_social_graph, SocialGraphBuilder};
pub use weighting::{decay, KeywordStats, TimeDecay};

/// Nó `Entity` para uma menção; `None` se a menção não identifica nada.
pub(crate) fn entity_node(mention: &EntityMention) -> Option<GraphNode> {
    if !mention.is_resolvable() {
        return None;
    }
    Some(
        GraphNode::new(NodeType::Entity, entity_id(mention))
            .with_optional("name", Some(mention.display_name()))
            .with_property("entity_type", entity_type_label(mention.entity_type.as_deref()))
            .with_optional("kb_id", non_blank(mention.kb_id.as_deref())),
    )
}

/// Aresta `MENTIONS_ENTITY` com os metadados da menção.
pub(crate) fn mention_edge(from: NodeRef, entity: NodeRef, mention: &EntityMention) -> GraphEdge {
    GraphEdge::new(EdgeType::MentionsEntity, from, entity)
        .with_weight(1.0)
        .with_property("entity_type", entity_type_label(mention.entity_type.as_deref()))
        .with_optional("span", mention.span.map(|(start, end)| json!([start, end])))
        .with_optional("confidence", mention.confidence)
}

/// Nó `State` com código em maiúsculas.
pub(crate) fn state_node(code: Option<&str>) -> Option<GraphNode> {
    let code = non_blank(code)?.to_uppercase();
    Some(GraphNode::new(NodeType::State, code.clone()).with_property("code", code))
}

/// Entrada combinada dos três builders.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphInputs {
    pub posts: Vec<SocialPost>,
    pub market: Vec<MarketRecord>,
    pub policies: Vec<PolicyRecord>,
}

/// Os três grafos construídos a partir de um [`GraphInputs`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSet {
    pub social: Graph,
    pub market: Graph,
    pub policy: Graph,
}

impl GraphSet {
    /// Une os três grafos num só. Nós compartilhados (entidades, estados)
    /// aparecem uma vez.
    pub fn merged(self) -> Graph {
        let mut graph = self.social;
        graph.merge(self.market);
        graph.merge(self.policy);
        graph
    }
}

/// Constrói os três grafos em paralelo.
///
/// ```rust
/// use semantic_graph::builder::{build_all, GraphInputs};
/// use semantic_graph::config::BuildConfig;
///
/// let inputs: GraphInputs = serde_json::from_str(r#"{
///     "posts": [{"id": "p1", "keywords": ["lottery"]}],
///     "market": [{"stat_id": "m1", "state": "ca"}]
/// }"#).unwrap();
/// let set = build_all(&inputs, &BuildConfig::default());
/// assert_eq!(set.social.node_count(), 2);
/// assert_eq!(set.market.node_count(), 2);
/// assert!(set.policy.is_empty());
/// ```
pub fn build_all(inputs: &GraphInputs, config: &BuildConfig) -> GraphSet {
    let started = Instant::now();
    let (social, (market, policy)) = rayon::join(
        || build_social_graph(&inputs.posts, config),
        || {
            rayon::join(
                || build_market_graph(&inputs.market),
                || build_policy_graph(&inputs.policies),
            )
        },
    );
    tracing::info!(
        social_nodes = social.node_count(),
        market_nodes = market.node_count(),
        policy_nodes = policy.node_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Grafos construídos"
    );
    GraphSet { social, market, policy }
}
