//! # NLU — Heurísticas de Texto
//!
//! Extração leve de keywords a partir de texto livre, usada como fallback
//! pelo builder social. Nenhum modelo é carregado: só regex e listas de
//! palavras, de modo que a construção do grafo continua pura e síncrona.

pub mod extractor;

pub use extractor::KeywordExtractor;
