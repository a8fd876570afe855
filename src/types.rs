//! Scalar aliases and the little-endian serialization traits shared by
//! every on-disk format in this crate.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// A single input symbol. `0` is reserved as the key terminator ([`TERM`])
/// and is never a legitimate interior symbol.
pub type Sym = u16;

/// A dense, compressed code produced by [`crate::AlphaRange::get_code`].
/// Doubles as an index offset into the double array's cell vector, so it
/// must stay non-negative for any symbol actually admitted by the
/// alphabet.
pub type Code = i32;

/// Index into the double-array cell vector.
pub type TrieIndex = i32;

/// The key terminator symbol, appended once to every stored key.
pub const TERM: Sym = 0;

/// Sentinel returned by [`crate::AlphaRange::get_code`] for a symbol that
/// is not admitted by any registered range.
pub const CODE_MAX: Code = 0x7fff_ffff;

/// Generic "no valid index" / "operation failed" sentinel, matching the
/// original source's `TRIE_INDEX_ERROR`.
pub const TRIE_INDEX_ERROR: TrieIndex = 0;

/// Largest index the double array is permitted to grow to.
pub const TRIE_INDEX_MAX: TrieIndex = 0x7fff_ffff;

/// Magic value written to the header cell and the tail-pool signature
/// cell, checked on load.
pub const SIGNATURE: TrieIndex = 0xdead_beafu32 as i32;

/// Reserved state index: head/sentinel of the free-cell doubly-linked
/// list.
pub const FREE: TrieIndex = 1;

/// Reserved state index: the trie root.
pub const ROOT: TrieIndex = 2;

/// First index available for allocation once the three reserved slots
/// exist.
pub const BEGIN: TrieIndex = 3;

/// A type that can be written to the crate's little-endian binary
/// formats. Implemented for the tail-pool payload type `T` so that
/// [`crate::Trie::save`]/[`crate::Trie::serialize`] can write it without
/// the crate mandating a particular wire encoding for user payloads.
pub trait TrieSerializable {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    fn serialized_size(&self) -> usize {
        let mut buf = Vec::new();
        self.serialize(&mut buf)
            .expect("serializing into a Vec cannot fail");
        buf.len()
    }
}

/// Counterpart to [`TrieSerializable`] for the load path.
pub trait TrieDeserializable {
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self>
    where
        Self: Sized;
}

macro_rules! impl_trie_serde_int {
    ($t:ty, $write:ident, $read:ident, $size:expr) => {
        impl TrieSerializable for $t {
            fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
                writer.$write::<LittleEndian>(*self)
            }

            fn serialized_size(&self) -> usize {
                $size
            }
        }

        impl TrieDeserializable for $t {
            fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
                reader.$read::<LittleEndian>()
            }
        }
    };
}

impl_trie_serde_int!(i32, write_i32, read_i32, 4);
impl_trie_serde_int!(u32, write_u32, read_u32, 4);
impl_trie_serde_int!(i64, write_i64, read_i64, 8);
impl_trie_serde_int!(u64, write_u64, read_u64, 8);
