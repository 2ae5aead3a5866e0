// Word statistics: tokenizing, counting and relative frequency scoring.

pub mod counter;
pub mod exclusion;
pub mod frequency;
pub mod tokenizer;
pub mod traits;
