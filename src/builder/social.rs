//! # Builder Social — Posts → Grafo com Pesos por Corpus
//!
//! Converte uma sequência de [`SocialPost`]s num [`Graph`]. É o único builder
//! com pesos dependentes do corpus, o que força **duas passadas**:
//!
//! ```text
//! Passada 1 (nós + frequências)
//!   para cada post:
//!     ├── nó Post (trecho do texto + sentimento)
//!     ├── keywords: cap → dedup normalizado → nós Keyword + contagem de ocorrências
//!     ├── KeywordStats.observe_post(...)       ← df por keyword, total de posts
//!     └── nós Entity, Topic, SentimentTag, User, Subreddit
//!
//! Pesos: TF-IDF (precisa do corpus completo) × decaimento temporal
//!
//! Passada 2 (arestas)
//!   para cada post:
//!     ├── MENTIONS_KEYWORD (peso = tf-idf × decay)
//!     ├── MENTIONS_ENTITY, HAS_TOPIC, HAS_SENTIMENT, AUTHORED_BY, IN_SUBREDDIT
//!     └── CO_OCCURS entre pares de keywords (post inteiro ou janela deslizante)
//! ```
//!
//! ## Tolerância a Falhas
//!
//! Nenhum post derruba a construção. Post sem `id` e sem `uri` é ignorado
//! com `warn!`; menções vazias, tags vazias e datas ilegíveis simplesmente
//! não geram os nós/arestas correspondentes.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::config::BuildConfig;
use crate::core::canonical::{excerpt, keyword_id, non_blank, normalize_text};
use crate::core::timestamp::format_timestamp;
use crate::core::{EdgeType, Graph, GraphEdge, GraphNode, NodeRef, NodeType};
use crate::nlu::KeywordExtractor;
use crate::records::{EntityMention, SocialPost};

use super::weighting::{term_frequency, KeywordStats, TimeDecay};
use super::{entity_node, mention_edge};

/// Keyword retida de um post, com o número de ocorrências na lista original.
#[derive(Debug)]
struct KeywordSlot {
    node: NodeRef,
    occurrences: usize,
}

/// Tudo que a passada 1 descobriu sobre um post e a passada 2 precisa.
struct PostPlan<'p> {
    post: &'p SocialPost,
    node: NodeRef,
    timestamp: Option<DateTime<Utc>>,
    keywords: Vec<KeywordSlot>,
    entities: Vec<(NodeRef, &'p EntityMention)>,
    topic: Option<NodeRef>,
    sentiments: Vec<NodeRef>,
    user: Option<NodeRef>,
    subreddit: Option<NodeRef>,
}

/// Builder do grafo social.
///
/// ## Exemplo
///
/// ```rust
/// use semantic_graph::builder::SocialGraphBuilder;
/// use semantic_graph::config::BuildConfig;
/// use semantic_graph::core::NodeType;
/// use semantic_graph::records::SocialPost;
///
/// let posts = vec![
///     SocialPost { id: "p1".into(), keywords: vec!["Lottery".into(), "jackpot".into()], ..Default::default() },
///     SocialPost { id: "p2".into(), keywords: vec!["lottery".into()], ..Default::default() },
/// ];
/// let config = BuildConfig::default();
/// let graph = SocialGraphBuilder::new(&config).build(&posts);
/// assert_eq!(graph.nodes_of_type(NodeType::Keyword).count(), 2);
/// ```
pub struct SocialGraphBuilder<'c> {
    config: &'c BuildConfig,
    extractor: Option<KeywordExtractor>,
}

impl<'c> SocialGraphBuilder<'c> {
    pub fn new(config: &'c BuildConfig) -> Self {
        let extractor = config.extract_missing_keywords.then(KeywordExtractor::new);
        Self { config, extractor }
    }

    /// Constrói o grafo. Não modifica a entrada e nunca falha.
    pub fn build(&self, posts: &[SocialPost]) -> Graph {
        let span = tracing::info_span!("social_graph_build", posts = posts.len());
        let _guard = span.enter();
        let started = Instant::now();

        let mut graph = Graph::new();
        let mut stats = KeywordStats::new();

        // ─── Passada 1: nós + frequências ────────────────────────
        let plans: Vec<PostPlan> = posts
            .iter()
            .enumerate()
            .filter_map(|(index, post)| self.plan_post(index, post, &mut graph, &mut stats))
            .collect();

        // ─── Políticas de peso ───────────────────────────────────
        let decay = TimeDecay::new(self.config.effective_tau(), self.config.reference_time);
        let window = self.config.effective_window();
        tracing::debug!(
            total_posts = stats.total_posts(),
            tfidf = self.config.enable_tfidf,
            decay = decay.is_some(),
            window = ?window,
            "Passada 1 concluída"
        );

        // ─── Passada 2: arestas ──────────────────────────────────
        for plan in &plans {
            self.emit_edges(plan, &stats, decay.as_ref(), window, &mut graph);
        }

        tracing::info!(
            posts = plans.len(),
            skipped = posts.len() - plans.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Grafo social construído"
        );
        graph
    }

    /// Passada 1 para um post: cria nós e registra frequências.
    fn plan_post<'p>(
        &self,
        index: usize,
        post: &'p SocialPost,
        graph: &mut Graph,
        stats: &mut KeywordStats,
    ) -> Option<PostPlan<'p>> {
        let Some(post_id) = post.node_id() else {
            tracing::warn!(index, "Post sem id nem uri ignorado");
            return None;
        };

        let timestamp = post.timestamp();
        let language = non_blank(post.language.as_deref())
            .unwrap_or_else(|| self.config.effective_language())
            .to_lowercase();

        // Keywords: cap + dedup normalizado, ordem preservada
        let mut keywords = Vec::new();
        for (surface, normalized, occurrences) in self.collect_keywords(post) {
            let node = graph.add_node(
                GraphNode::new(NodeType::Keyword, keyword_id(&normalized, &language))
                    .with_property("text", normalized)
                    .with_property("label", surface)
                    .with_property("language", language.clone()),
            );
            keywords.push(KeywordSlot { node, occurrences });
        }
        stats.observe_post(keywords.iter().map(|k| k.node.id.as_str()));

        let entities = post
            .entities
            .iter()
            .filter_map(|mention| match entity_node(mention) {
                Some(node) => Some((graph.add_node(node), mention)),
                None => {
                    tracing::debug!(post = %post_id, "Menção de entidade vazia ignorada");
                    None
                }
            })
            .collect();

        let topic_label = non_blank(post.topic.as_deref());
        let topic = topic_label.map(|label| {
            graph.add_node(
                GraphNode::new(NodeType::Topic, normalize_text(label)).with_property("label", label),
            )
        });

        let mut sentiments: Vec<NodeRef> = Vec::new();
        for tag in post.sentiment_tags.iter().filter_map(|t| non_blank(Some(t.as_str()))) {
            let node = graph.add_node(
                GraphNode::new(NodeType::SentimentTag, normalize_text(tag)).with_property("label", tag),
            );
            if !sentiments.contains(&node) {
                sentiments.push(node);
            }
        }

        let username = non_blank(post.username.as_deref());
        let user = username.map(|name| {
            graph.add_node(
                GraphNode::new(NodeType::User, normalize_text(name))
                    .with_property("username", name)
                    .with_optional("platform", non_blank(Some(post.platform.as_str()))),
            )
        });

        let subreddit_name = non_blank(post.subreddit.as_deref())
            .map(|s| s.trim_start_matches("r/"))
            .filter(|s| !s.is_empty());
        let subreddit = subreddit_name.map(|name| {
            graph.add_node(
                GraphNode::new(NodeType::Subreddit, normalize_text(name)).with_property("name", name),
            )
        });

        let node = graph.add_node(
            GraphNode::new(NodeType::Post, post_id)
                .with_optional("uri", non_blank(Some(&post.uri)))
                .with_optional("platform", non_blank(Some(post.platform.as_str())))
                .with_optional("text", Some(excerpt(&post.text, self.config.effective_excerpt_chars())))
                .with_optional("timestamp", timestamp.as_ref().map(format_timestamp))
                .with_optional("sentiment", non_blank(post.sentiment.as_deref()))
                .with_optional("sentiment_tags", non_empty_list(&post.sentiment_tags))
                .with_optional("sentiment_phrases", non_empty_list(&post.sentiment_phrases))
                .with_optional("emotion_words", non_empty_list(&post.emotion_words))
                .with_optional("topic", topic_label)
                .with_optional("username", username)
                .with_optional("subreddit", subreddit_name)
                .with_property("language", language.clone())
                .with_property("keyword_count", keywords.len()),
        );

        Some(PostPlan {
            post,
            node,
            timestamp,
            keywords,
            entities,
            topic,
            sentiments,
            user,
            subreddit,
        })
    }

    /// Lista de keywords do post: `(superfície, normalizada, ocorrências)`.
    ///
    /// O cap limita keywords **distintas**; ocorrências repetidas de uma
    /// keyword retida continuam sendo contadas.
    fn collect_keywords(&self, post: &SocialPost) -> Vec<(String, String, usize)> {
        let cap = self.config.effective_max_keywords();
        let extracted;
        let raw: &[String] = match &self.extractor {
            Some(extractor) if post.keywords.is_empty() => {
                extracted = extractor.extract(&post.text, cap);
                &extracted
            }
            _ => &post.keywords,
        };

        let mut slots: Vec<(String, String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for keyword in raw {
            let normalized = normalize_text(keyword);
            if normalized.is_empty() {
                continue;
            }
            if let Some(&pos) = positions.get(&normalized) {
                slots[pos].2 += 1;
            } else if slots.len() < cap {
                positions.insert(normalized.clone(), slots.len());
                slots.push((keyword.trim().to_string(), normalized, 1));
            }
        }
        slots
    }

    /// Passada 2 para um post: emite todas as arestas.
    fn emit_edges(
        &self,
        plan: &PostPlan,
        stats: &KeywordStats,
        decay: Option<&TimeDecay>,
        window: Option<usize>,
        graph: &mut Graph,
    ) {
        let distinct = plan.keywords.len();

        for slot in &plan.keywords {
            let mut edge = GraphEdge::new(EdgeType::MentionsKeyword, plan.node.clone(), slot.node.clone())
                .with_property("occurrences", slot.occurrences);
            let mut weight = 1.0;
            if self.config.enable_tfidf {
                let tf = term_frequency(slot.occurrences, distinct);
                let idf = stats.idf(&slot.node.id);
                weight = tf * idf;
                edge = edge.with_property("tf", tf).with_property("idf", idf);
            }
            if let Some(policy) = decay {
                let factor = policy.factor(plan.timestamp);
                weight *= factor;
                edge = edge.with_property("decay", factor);
            }
            graph.add_edge(edge.with_weight(weight));
        }

        for (entity, mention) in &plan.entities {
            graph.add_edge(mention_edge(plan.node.clone(), entity.clone(), mention));
        }

        if let Some(topic) = &plan.topic {
            graph.add_edge(GraphEdge::new(EdgeType::HasTopic, plan.node.clone(), topic.clone()).with_weight(1.0));
        }

        for tag in &plan.sentiments {
            graph.add_edge(
                GraphEdge::new(EdgeType::HasSentiment, plan.node.clone(), tag.clone())
                    .with_weight(1.0)
                    .with_optional("orientation", non_blank(plan.post.sentiment.as_deref())),
            );
        }

        if let Some(user) = &plan.user {
            graph.add_edge(GraphEdge::new(EdgeType::AuthoredBy, plan.node.clone(), user.clone()).with_weight(1.0));
        }

        if let Some(subreddit) = &plan.subreddit {
            graph.add_edge(
                GraphEdge::new(EdgeType::InSubreddit, plan.node.clone(), subreddit.clone()).with_weight(1.0),
            );
        }

        // CO_OCCURS: O(k²) no número de keywords retidas
        let window_value = match window {
            Some(w) => json!(w),
            None => json!("post"),
        };
        for i in 0..distinct {
            for j in (i + 1)..distinct {
                if window.is_some_and(|w| j - i > w) {
                    break;
                }
                graph.add_edge(
                    GraphEdge::new(EdgeType::CoOccurs, plan.keywords[i].node.clone(), plan.keywords[j].node.clone())
                        .with_weight(1.0)
                        .with_property("window", window_value.clone())
                        .with_property("post_id", plan.node.id.clone()),
                );
            }
        }
    }
}

fn non_empty_list(items: &[String]) -> Option<Value> {
    let items: Vec<&str> = items.iter().filter_map(|s| non_blank(Some(s.as_str()))).collect();
    (!items.is_empty()).then(|| json!(items))
}

/// Atalho para `SocialGraphBuilder::new(config).build(posts)`.
pub fn build_social_graph(posts: &[SocialPost], config: &BuildConfig) -> Graph {
    SocialGraphBuilder::new(config).build(posts)
}
