pub use types::{
    Code, Sym, TrieIndex, CODE_MAX, TERM, TRIE_INDEX_ERROR, TRIE_INDEX_MAX,
};
pub use types::{TrieDeserializable, TrieSerializable};

pub use alpha_range::AlphaRange;
pub use trie::Trie;

mod alpha_range;
mod darray;
mod tail;
pub mod trie;
pub mod types;

#[cfg(test)]
mod darray_test;
#[cfg(test)]
mod testutils;
#[cfg(test)]
mod trie_test;
