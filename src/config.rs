//! # Configuração de Construção
//!
//! Todos os parâmetros são passados explicitamente: não há variáveis de
//! ambiente nem arquivos de configuração lidos pelo crate. A struct deriva
//! `Deserialize` para que o chamador possa carregá-la de onde preferir.
//!
//! | Campo | Padrão | Efeito |
//! |-------|--------|--------|
//! | `cooccurrence_window` | `None` (post inteiro) | janela deslizante para `CO_OCCURS` |
//! | `enable_tfidf` | `true` | peso TF-IDF em `MENTIONS_KEYWORD` |
//! | `decay_tau_days` | `None` (desligado) | constante de decaimento temporal |
//! | `reference_time` | `None` (agora) | instante de referência do decaimento |
//! | `max_keywords` | `10` | keywords distintas por post |
//! | `excerpt_chars` | `500` | tamanho do trecho de texto no nó `Post` |
//! | `default_language` | `"en"` | idioma das keywords sem idioma declarado |
//! | `extract_missing_keywords` | `false` | extrai keywords do texto quando a lista vem vazia |
//!
//! Os builders **nunca falham** por configuração: valores inválidos são
//! registrados com `warn!` e neutralizados. Use [`BuildConfig::validate`]
//! para rejeitá-los antes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

pub const DEFAULT_MAX_KEYWORDS: usize = 10;
pub const DEFAULT_EXCERPT_CHARS: usize = 500;
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub cooccurrence_window: Option<usize>,
    pub enable_tfidf: bool,
    pub decay_tau_days: Option<f64>,
    pub reference_time: Option<DateTime<Utc>>,
    pub max_keywords: usize,
    pub excerpt_chars: usize,
    pub default_language: String,
    pub extract_missing_keywords: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cooccurrence_window: None,
            enable_tfidf: true,
            decay_tau_days: None,
            reference_time: None,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            default_language: DEFAULT_LANGUAGE.to_string(),
            extract_missing_keywords: false,
        }
    }
}

impl BuildConfig {
    /// Verifica os parâmetros e retorna o primeiro problema encontrado.
    pub fn validate(&self) -> Result<()> {
        if let Some(tau) = self.decay_tau_days {
            if !tau.is_finite() || tau <= 0.0 {
                return Err(GraphError::InvalidConfig(format!(
                    "decay_tau_days deve ser positivo e finito (recebido {})",
                    tau
                )));
            }
        }
        if self.cooccurrence_window == Some(0) {
            return Err(GraphError::InvalidConfig(
                "cooccurrence_window deve ser >= 1 (use None para o post inteiro)".into(),
            ));
        }
        if self.max_keywords == 0 {
            return Err(GraphError::InvalidConfig("max_keywords deve ser >= 1".into()));
        }
        if self.excerpt_chars == 0 {
            return Err(GraphError::InvalidConfig("excerpt_chars deve ser >= 1".into()));
        }
        Ok(())
    }

    /// Janela efetiva: `Some(0)` é tratado como post inteiro.
    pub fn effective_window(&self) -> Option<usize> {
        match self.cooccurrence_window {
            Some(0) => {
                tracing::warn!("cooccurrence_window = 0 ignorado, usando post inteiro");
                None
            }
            other => other,
        }
    }

    /// Tau efetivo: valores não positivos ou não finitos desligam o decaimento.
    pub fn effective_tau(&self) -> Option<f64> {
        match self.decay_tau_days {
            Some(tau) if tau.is_finite() && tau > 0.0 => Some(tau),
            Some(tau) => {
                tracing::warn!(tau, "decay_tau_days inválido, decaimento desligado");
                None
            }
            None => None,
        }
    }

    pub fn effective_max_keywords(&self) -> usize {
        if self.max_keywords == 0 {
            DEFAULT_MAX_KEYWORDS
        } else {
            self.max_keywords
        }
    }

    pub fn effective_excerpt_chars(&self) -> usize {
        if self.excerpt_chars == 0 {
            DEFAULT_EXCERPT_CHARS
        } else {
            self.excerpt_chars
        }
    }

    pub fn effective_language(&self) -> &str {
        let lang = self.default_language.trim();
        if lang.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            lang
        }
    }
}
