pub mod deck;
pub mod error;
pub mod preprocess;
pub mod srs;
pub mod tokenizer;
pub mod vocab_map;

pub use deck::DeckId;
pub use error::CoreError;
pub use preprocess::normalise;
pub use srs::Scheduler;
pub use tokenizer::{Highlight, Highlighter, Token, TokenKind, new_words, vocab_coverage};
pub use vocab_map::VocabMap;
