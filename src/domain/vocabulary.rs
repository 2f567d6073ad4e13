// ============================================================
// Layer 3 — Character Vocabulary
// ============================================================
// Poetry is modelled one character at a time. A sequence starts
// with a begin marker and finishes with an end marker:
//
//   G 床 前 明 月 光 ， 疑 是 地 上 霜 。 E
//
// Ids are assigned in order: begin marker = 0, end marker = 1,
// then each distinct character of the alphabet as first seen.

use anyhow::{ensure, Result};
use std::collections::HashMap;

use crate::domain::traits::Vocabulary;

pub const DEFAULT_BEGIN: char = 'G';
pub const DEFAULT_END:   char = 'E';

#[derive(Debug, Clone)]
pub struct CharVocabulary {
    symbols: Vec<char>,
    ids:     HashMap<char, usize>,
}

impl CharVocabulary {
    /// Build from an alphabet using the default `G` / `E` markers.
    pub fn new(alphabet: &str) -> Result<Self> {
        Self::with_markers(alphabet, DEFAULT_BEGIN, DEFAULT_END)
    }

    pub fn with_markers(alphabet: &str, begin: char, end: char) -> Result<Self> {
        ensure!(begin != end, "begin and end markers must differ");

        let mut vocab = Self { symbols: Vec::new(), ids: HashMap::new() };
        for c in [begin, end].into_iter().chain(alphabet.chars()) {
            if !vocab.ids.contains_key(&c) {
                vocab.ids.insert(c, vocab.symbols.len());
                vocab.symbols.push(c);
            }
        }
        Ok(vocab)
    }

    pub fn begin_id(&self) -> usize {
        0
    }

    pub fn end_id(&self) -> usize {
        1
    }
}

impl Vocabulary for CharVocabulary {
    fn vocab_size(&self) -> usize {
        self.symbols.len()
    }

    fn id_of(&self, symbol: char) -> Option<usize> {
        self.ids.get(&symbol).copied()
    }

    fn symbol_of(&self, id: usize) -> Option<char> {
        self.symbols.get(id).copied()
    }
}
