//! # Adapters de Posts Brutos
//!
//! Documentos sociais chegam em formatos diferentes conforme a origem. Em vez
//! de um registro dinâmico de adapters por plataforma, usamos um **enum
//! fechado** com tag: o campo `source` do JSON escolhe a variante.
//!
//! | `source` | Variante | Forma |
//! |----------|----------|-------|
//! | `reddit` | [`RawPost::Reddit`] | título + selftext, `created_utc` em epoch |
//! | `sentiment` | [`RawPost::Sentiment`] | texto genérico com análise de sentimento |
//!
//! ```rust
//! use semantic_graph::records::RawPost;
//!
//! let raw: RawPost = serde_json::from_str(
//!     r#"{"source": "reddit", "id": "t3_1", "title": "Big jackpot", "subreddit": "r/Lottery"}"#,
//! ).unwrap();
//! let post = raw.into_post();
//! assert_eq!(post.platform, "reddit");
//! assert_eq!(post.text, "Big jackpot");
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{EntityMention, SocialPost};

const REDDIT_BASE_URL: &str = "https://www.reddit.com";

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawPost {
    Reddit(RedditPost),
    Sentiment(SentimentPost),
}

/// Post no formato da API do Reddit, com enriquecimentos opcionais.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RedditPost {
    pub id: String,
    pub permalink: Option<String>,
    pub url: Option<String>,
    pub title: String,
    pub selftext: String,
    pub author: Option<String>,
    pub subreddit: Option<String>,
    /// Epoch em segundos (o Reddit envia como float).
    pub created_utc: Option<f64>,
    pub sentiment: Option<String>,
    pub sentiment_tags: Vec<String>,
    pub topic: Option<String>,
    pub keywords: Vec<String>,
    pub entities: Vec<EntityMention>,
    pub language: Option<String>,
}

/// Documento genérico já passado por análise de sentimento.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SentimentPost {
    pub id: String,
    pub url: String,
    pub platform: Option<String>,
    pub text: String,
    pub author: Option<String>,
    pub orientation: Option<String>,
    pub tags: Vec<String>,
    pub phrases: Vec<String>,
    pub emotion_words: Vec<String>,
    pub topic: Option<String>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub keywords: Vec<String>,
    pub entities: Vec<EntityMention>,
    pub language: Option<String>,
}

impl RawPost {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converte para o formato normalizado consumido pelo builder social.
    pub fn into_post(self) -> SocialPost {
        match self {
            RawPost::Reddit(p) => {
                let text = [p.title.trim(), p.selftext.trim()]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                let uri = match p.permalink.as_deref().map(str::trim) {
                    Some(link) if link.starts_with('/') => format!("{}{}", REDDIT_BASE_URL, link),
                    Some(link) if !link.is_empty() => link.to_string(),
                    _ => p.url.unwrap_or_default(),
                };
                let subreddit = p
                    .subreddit
                    .map(|s| s.trim().trim_start_matches("r/").to_string())
                    .filter(|s| !s.is_empty());
                SocialPost {
                    id: p.id,
                    uri,
                    platform: "reddit".to_string(),
                    text,
                    username: p.author.filter(|a| a != "[deleted]"),
                    subreddit,
                    published_at: None,
                    created_at: p
                        .created_utc
                        .filter(|secs| secs.is_finite())
                        .map(|secs| (secs.trunc() as i64).to_string()),
                    sentiment: p.sentiment,
                    sentiment_tags: p.sentiment_tags,
                    sentiment_phrases: Vec::new(),
                    emotion_words: Vec::new(),
                    topic: p.topic,
                    entities: p.entities,
                    keywords: p.keywords,
                    language: p.language,
                }
            }
            RawPost::Sentiment(p) => SocialPost {
                id: p.id,
                uri: p.url,
                platform: p.platform.unwrap_or_else(|| "web".to_string()),
                text: p.text,
                username: p.author,
                subreddit: None,
                published_at: p.published_at,
                created_at: p.created_at,
                sentiment: p.orientation,
                sentiment_tags: p.tags,
                sentiment_phrases: p.phrases,
                emotion_words: p.emotion_words,
                topic: p.topic,
                entities: p.entities,
                keywords: p.keywords,
                language: p.language,
            },
        }
    }
}

/// Decodifica uma lista JSON de posts brutos.
///
/// Só falha se o payload não for uma lista JSON. Itens que não decodificam
/// (tag desconhecida, tipos errados) são descartados com `warn!`.
pub fn decode_raw_posts(json: &str) -> Result<Vec<SocialPost>> {
    let items: Vec<Value> =
        serde_json::from_str(json).context("Payload de posts não é uma lista JSON")?;
    let total = items.len();
    let posts: Vec<SocialPost> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<RawPost>(item) {
            Ok(raw) => Some(raw.into_post()),
            Err(e) => {
                tracing::warn!(index, error = %e, "Post bruto ignorado");
                None
            }
        })
        .collect();
    tracing::debug!(total, decoded = posts.len(), "Posts brutos decodificados");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reddit_post_is_normalized() {
        let raw = RawPost::from_json(
            r#"{
                "source": "reddit",
                "id": "t3_abc",
                "permalink": "/r/lottery/comments/abc/",
                "title": "Jackpot hits $1B",
                "selftext": "Who is buying tickets?",
                "author": "someone",
                "subreddit": "r/Lottery",
                "created_utc": 1709294400.0,
                "keywords": ["jackpot"]
            }"#,
        )
        .unwrap();
        let post = raw.into_post();
        assert_eq!(post.uri, "https://www.reddit.com/r/lottery/comments/abc/");
        assert_eq!(post.text, "Jackpot hits $1B\n\nWho is buying tickets?");
        assert_eq!(post.subreddit.as_deref(), Some("Lottery"));
        assert_eq!(post.username.as_deref(), Some("someone"));
        assert_eq!(post.created_at.as_deref(), Some("1709294400"));
        assert!(post.timestamp().is_some());
    }

    #[test]
    fn deleted_reddit_author_is_dropped() {
        let post = RawPost::from_json(r#"{"source": "reddit", "id": "1", "author": "[deleted]"}"#)
            .unwrap()
            .into_post();
        assert_eq!(post.username, None);
    }

    #[test]
    fn sentiment_post_maps_fields() {
        let post = RawPost::from_json(
            r#"{
                "source": "sentiment",
                "id": "s1",
                "url": "https://news.test/a",
                "text": "Great news",
                "orientation": "positive",
                "tags": ["hopeful"],
                "emotion_words": ["great"],
                "published_at": "2024-03-01T12:00:00Z"
            }"#,
        )
        .unwrap()
        .into_post();
        assert_eq!(post.platform, "web");
        assert_eq!(post.sentiment.as_deref(), Some("positive"));
        assert_eq!(post.sentiment_tags, vec!["hopeful"]);
        assert_eq!(post.uri, "https://news.test/a");
    }

    #[test]
    fn unknown_source_is_a_decode_error() {
        let err = RawPost::from_json(r#"{"source": "myspace", "id": "1"}"#).unwrap_err();
        assert!(matches!(err, crate::GraphError::Decode(_)));
    }

    #[test]
    fn decode_skips_bad_items() {
        let posts = decode_raw_posts(
            r#"[
                {"source": "reddit", "id": "a"},
                {"source": "fax", "id": "b"},
                {"source": "sentiment", "id": "c", "text": "hi"}
            ]"#,
        )
        .unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn decode_rejects_non_list_payload() {
        assert!(decode_raw_posts(r#"{"source": "reddit"}"#).is_err());
    }
}
