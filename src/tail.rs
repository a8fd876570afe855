//! `TailPool<T>`: the append-only pool of `(payload, suffix)` records
//! referenced by negative `base` values in the double array (`spec.md`
//! §4.3).

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::types::{Sym, TrieDeserializable, TrieIndex, TrieSerializable, SIGNATURE};

#[derive(Debug, Clone)]
struct TailBlock<T> {
    data: T,
    /// `None` means the key ended exactly at the trunk transition into
    /// this tail; `Some` never holds a trailing `TERM`.
    suffix: Option<Vec<Sym>>,
}

/// Append-only pool of tail records. A split (see `trie.rs`) mutates an
/// existing block's suffix in place but never reorders blocks, so
/// trunk pointers into the pool stay valid across the pool's lifetime.
#[derive(Debug, Clone, Default)]
pub struct TailPool<T> {
    blocks: Vec<TailBlock<T>>,
}

impl<T> TailPool<T> {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append a new record and return its pool index.
    pub fn push(&mut self, data: T, suffix: Option<Vec<Sym>>) -> TrieIndex {
        self.blocks.push(TailBlock { data, suffix });
        (self.blocks.len() - 1) as TrieIndex
    }

    pub fn get_data(&self, idx: TrieIndex) -> Option<&T> {
        if idx < 0 {
            return None;
        }
        self.blocks.get(idx as usize).map(|b| &b.data)
    }

    pub fn set_data(&mut self, idx: TrieIndex, data: T) {
        if idx < 0 {
            return;
        }
        if let Some(b) = self.blocks.get_mut(idx as usize) {
            b.data = data;
        }
    }

    /// The stored suffix, or an empty slice if the block has none (the
    /// distinction between "no suffix" and "empty suffix" never matters
    /// to a caller, since `insert_branch` never stores `Some(vec![])`).
    pub fn get_suffix(&self, idx: TrieIndex) -> Option<&[Sym]> {
        if idx < 0 {
            return None;
        }
        self.blocks
            .get(idx as usize)
            .map(|b| b.suffix.as_deref().unwrap_or(&[]))
    }

    pub fn set_suffix(&mut self, idx: TrieIndex, suffix: Option<Vec<Sym>>) {
        if idx < 0 {
            return;
        }
        if let Some(b) = self.blocks.get_mut(idx as usize) {
            b.suffix = suffix;
        }
    }
}

impl<T: TrieSerializable> TailPool<T> {
    pub fn serialized_size(&self) -> usize {
        8 + self
            .blocks
            .iter()
            .map(|b| b.data.serialized_size() + 4 + b.suffix.as_ref().map_or(0, |s| s.len() * 2))
            .sum::<usize>()
    }

    /// `spec.md` §6.2 items 3 and 4.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i32::<LittleEndian>(SIGNATURE)?;
        writer.write_i32::<LittleEndian>(self.blocks.len() as i32)?;
        for block in &self.blocks {
            block.data.serialize(writer)?;
            let len = block.suffix.as_ref().map_or(0, |s| s.len());
            writer.write_i32::<LittleEndian>(len as i32)?;
            if let Some(suffix) = &block.suffix {
                for &sym in suffix {
                    writer.write_u16::<LittleEndian>(sym)?;
                }
            }
        }
        Ok(())
    }
}

impl<T: TrieDeserializable> TailPool<T> {
    pub fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let signature = reader.read_i32::<LittleEndian>()?;
        if signature != SIGNATURE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "tail pool signature mismatch",
            ));
        }
        let count = reader.read_i32::<LittleEndian>()?;
        if count == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "tail pool declares zero blocks",
            ));
        }
        if count < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "tail pool declares a negative block count",
            ));
        }

        let mut blocks = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let data = T::deserialize(reader)?;
            let len = reader.read_i32::<LittleEndian>()?;
            if len < 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "tail suffix length is negative",
                ));
            }
            let suffix = if len == 0 {
                None
            } else {
                let mut v = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    v.push(reader.read_u16::<LittleEndian>()?);
                }
                Some(v)
            };
            blocks.push(TailBlock { data, suffix });
        }

        Ok(Self { blocks })
    }
}
