//! # Registros Normalizados — Contratos de Entrada
//!
//! Os três formatos que os builders consomem. Eles chegam já normalizados
//! por camadas externas (adapters de documentos), normalmente como JSON;
//! todas as structs derivam `Deserialize` com `#[serde(default)]` para que
//! campos ausentes não impeçam a construção do grafo.
//!
//! | Registro | Builder | Nó principal |
//! |----------|---------|--------------|
//! | [`SocialPost`] | [`build_social_graph`](crate::builder::build_social_graph) | `Post` |
//! | [`MarketRecord`] | [`build_market_graph`](crate::builder::build_market_graph) | `MarketData` |
//! | [`PolicyRecord`] | [`build_policy_graph`](crate::builder::build_policy_graph) | `Policy` |
//!
//! Datas são texto livre; veja [`parse_timestamp`](crate::core::timestamp::parse_timestamp).

pub mod adapter;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::timestamp::parse_optional;

pub use adapter::{decode_raw_posts, RawPost};

/// Menção a uma entidade dentro de um registro.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityMention {
    /// Texto como apareceu no documento.
    pub text: String,
    pub canonical_name: Option<String>,
    /// Tipo declarado (`person`, `org`, `gpe`...).
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    /// Identificador numa base de conhecimento externa: autoritativo.
    pub kb_id: Option<String>,
    /// Posição `[início, fim]` no texto de origem.
    pub span: Option<(usize, usize)>,
    pub confidence: Option<f64>,
}

impl EntityMention {
    /// Nome de exibição: nome canônico se houver, senão o texto.
    pub fn display_name(&self) -> &str {
        self.canonical_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.text.trim())
    }

    /// Uma menção sem texto, sem nome canônico e sem `kb_id` não identifica nada.
    pub fn is_resolvable(&self) -> bool {
        !self.display_name().is_empty()
            || self.kb_id.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Tripla de relação extraída de um documento de política.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationTriple {
    pub subject: String,
    pub object: String,
    pub predicate: Option<String>,
    pub evidence: Option<String>,
    pub confidence: Option<f64>,
    pub date: Option<String>,
}

/// Post de rede social normalizado.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialPost {
    pub id: String,
    pub uri: String,
    pub platform: String,
    pub text: String,
    pub username: Option<String>,
    pub subreddit: Option<String>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    /// Orientação de sentimento (`positive`, `negative`, `neutral`...).
    pub sentiment: Option<String>,
    pub sentiment_tags: Vec<String>,
    pub sentiment_phrases: Vec<String>,
    pub emotion_words: Vec<String>,
    pub topic: Option<String>,
    pub entities: Vec<EntityMention>,
    pub keywords: Vec<String>,
    /// Idioma das keywords; `None` usa o padrão da configuração.
    pub language: Option<String>,
}

impl SocialPost {
    /// Identificador do post: `id`, ou `uri` como fallback.
    pub fn node_id(&self) -> Option<&str> {
        [self.id.trim(), self.uri.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
    }

    /// Data de publicação; cai para a data de criação se ausente ou ilegível.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_optional(self.published_at.as_deref())
            .or_else(|| parse_optional(self.created_at.as_deref()))
    }
}

/// Ponto de dado de mercado normalizado.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketRecord {
    pub stat_id: String,
    /// Código da unidade federativa / região.
    pub state: Option<String>,
    /// Segmento ou categoria (`scratch tickets`, `draw games`...).
    pub segment: Option<String>,
    pub date: Option<String>,
    pub volume: Option<f64>,
    pub revenue: Option<f64>,
    pub jackpot: Option<f64>,
    pub unit_price: Option<f64>,
    pub source: Option<String>,
    pub title: Option<String>,
    pub entities: Vec<EntityMention>,
}

/// Documento de política normalizado.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyRecord {
    pub doc_id: String,
    pub title: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    pub published_at: Option<String>,
    pub effective_at: Option<String>,
    pub policy_type: Option<String>,
    /// Pontos-chave em ordem de relevância.
    pub key_points: Vec<String>,
    pub summary: Option<String>,
    pub source: Option<String>,
    pub entities: Vec<EntityMention>,
    pub relations: Vec<RelationTriple>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_default() {
        let post: SocialPost = serde_json::from_value(json!({"id": "p1"})).unwrap();
        assert_eq!(post.id, "p1");
        assert!(post.keywords.is_empty());
        assert_eq!(post.timestamp(), None);
    }

    #[test]
    fn node_id_falls_back_to_uri() {
        let post = SocialPost {
            uri: " https://x.test/1 ".into(),
            ..Default::default()
        };
        assert_eq!(post.node_id(), Some("https://x.test/1"));
        assert_eq!(SocialPost::default().node_id(), None);
    }

    #[test]
    fn timestamp_falls_back_to_created_at() {
        let post = SocialPost {
            published_at: Some("not a date".into()),
            created_at: Some("2024-03-01".into()),
            ..Default::default()
        };
        assert!(post.timestamp().is_some());
    }

    #[test]
    fn entity_mention_reads_type_and_span() {
        let mention: EntityMention = serde_json::from_value(json!({
            "text": "Acme", "type": "ORG", "span": [3, 7], "confidence": 0.8
        }))
        .unwrap();
        assert_eq!(mention.entity_type.as_deref(), Some("ORG"));
        assert_eq!(mention.span, Some((3, 7)));
        assert!(mention.is_resolvable());
    }

    #[test]
    fn blank_mentions_are_not_resolvable() {
        let blank = EntityMention {
            text: "  ".into(),
            ..Default::default()
        };
        assert!(!blank.is_resolvable());
        let kb_only = EntityMention {
            kb_id: Some("Q1".into()),
            ..Default::default()
        };
        assert!(kb_only.is_resolvable());
    }
}
