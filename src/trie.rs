//! `Trie<T>`: the public façade tying [`AlphaRange`], [`DoubleArray`] and
//! [`TailPool`] together into a store/retrieve key-value structure
//! (`spec.md` §4.2.8–§4.2.10).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::alpha_range::AlphaRange;
use crate::darray::DoubleArray;
use crate::tail::TailPool;
use crate::types::{Code, Sym, TrieDeserializable, TrieIndex, TrieSerializable, CODE_MAX, TERM};

/// A double-array trie with tail-suffix compression, mapping sequences
/// of [`Sym`] to a payload `T`.
#[derive(Debug, Clone)]
pub struct Trie<T> {
    alpha: AlphaRange,
    da: DoubleArray,
    tail: TailPool<T>,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self {
            alpha: AlphaRange::new(),
            da: DoubleArray::new(),
            tail: TailPool::new(),
        }
    }
}

impl<T> Trie<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `[begin, end]` into the alphabet. Must be called before any
    /// key containing those symbols is stored; widening the alphabet
    /// after keys exist does not retroactively touch already-built
    /// trunk codes (`spec.md` §4.1 Non-goals).
    pub fn add_code_range(&mut self, begin: Sym, end: Sym) {
        self.alpha.add_range(begin, end);
    }

    /// Ratio of occupied to total double-array cells (`spec.md` §4.2.11).
    pub fn rate(&self) -> f64 {
        self.da.rate()
    }

    /// Always returns `false`: deletion is out of scope for this crate
    /// (`spec.md` Non-goals).
    pub fn remove(&mut self, _key: &[Sym]) -> bool {
        false
    }

    fn encode(&self, key: &[Sym]) -> Option<Vec<Code>> {
        let mut codes = Vec::with_capacity(key.len() + 1);
        for &sym in key {
            let code = self.alpha.get_code(sym);
            if code == CODE_MAX {
                return None;
            }
            codes.push(code);
        }
        codes.push(0); // TERM always encodes to code 0
        Some(codes)
    }

    /// Insert `key` with `data`. Returns `false` if `key` is already
    /// present, contains a symbol outside the registered alphabet, or
    /// the double array could not be extended further.
    pub fn store(&mut self, key: &[Sym], data: T) -> bool {
        if key.is_empty() {
            return false;
        }
        let Some(codes) = self.encode(key) else {
            return false;
        };

        let mut s = self.da.get_root();
        let mut consumed = 0usize;
        while consumed < codes.len() {
            match self.da.walk(s, codes[consumed]) {
                Some(next) => {
                    s = next;
                    consumed += 1;
                    if !self.da.is_trunk(s) {
                        let remaining = &key[consumed.min(key.len())..];
                        return self.branch_in_tail(s, remaining, data);
                    }
                }
                None => break,
            }
        }

        if consumed == codes.len() {
            // Every code, including the trailing TERM, already walked
            // through pure trunk states. Unreachable for a well-formed
            // trie (a TERM transition always lands on a tail leaf), kept
            // as a defensive duplicate report rather than a panic.
            return false;
        }

        self.insert_branch(s, &key[consumed.min(key.len())..], data)
    }

    /// `spec.md` §4.2.9: `s` has no branch yet for the symbol that broke
    /// the trunk walk. Thread exactly one new trunk transition and park
    /// everything after it as a fresh tail record.
    fn insert_branch(&mut self, s: TrieIndex, remaining_key: &[Sym], data: T) -> bool {
        let max_code = self.alpha.get_max_code();
        let first_sym = remaining_key.first().copied().unwrap_or(TERM);
        let code = self.alpha.get_code(first_sym);
        let Some(next) = self.da.insert_state(s, code, max_code) else {
            return false;
        };

        let suffix = if remaining_key.len() > 1 {
            Some(remaining_key[1..].to_vec())
        } else {
            None
        };
        let tail_idx = self.tail.push(data, suffix);
        self.da.set_tail_index(next, tail_idx);
        true
    }

    /// `spec.md` §4.2.8: the trunk walk landed on an existing tail leaf
    /// `sep`. Walk the old suffix and the new key's remaining symbols in
    /// lockstep, materializing one new trunk state per shared symbol,
    /// then split into two leaves at the first point of divergence.
    fn branch_in_tail(&mut self, sep: TrieIndex, remaining_key: &[Sym], data: T) -> bool {
        let old_tail = match self.da.get_tail_index(sep) {
            Some(idx) => idx,
            None => return false,
        };
        let old_suffix: Vec<Sym> = self.tail.get_suffix(old_tail).unwrap_or(&[]).to_vec();
        let max_code = self.alpha.get_max_code();

        // Find the shared-prefix length first, without mutating anything:
        // an exact-duplicate key must leave the existing tail record
        // untouched (spec.md §9), so the trunk can't start growing until
        // we know this isn't one.
        let mut i = 0usize;
        loop {
            let old_c = sym_at(&old_suffix, i);
            let new_c = sym_at(remaining_key, i);
            if old_c != new_c {
                break;
            }
            if old_c == TERM {
                return false; // identical key already stored
            }
            i += 1;
        }

        let mut s = sep;
        for &sym in &old_suffix[..i] {
            let code = self.alpha.get_code(sym);
            let Some(next) = self.da.insert_state(s, code, max_code) else {
                return false;
            };
            s = next;
        }

        let old_c = sym_at(&old_suffix, i);
        let new_c = sym_at(remaining_key, i);

        let old_code = self.alpha.get_code(old_c);
        let Some(old_next) = self.da.insert_state(s, old_code, max_code) else {
            return false;
        };
        self.tail.set_suffix(old_tail, suffix_after(&old_suffix, i));
        self.da.set_tail_index(old_next, old_tail);

        let new_code = self.alpha.get_code(new_c);
        let Some(new_next) = self.da.insert_state(s, new_code, max_code) else {
            return false;
        };
        let new_tail = self.tail.push(data, suffix_after(remaining_key, i));
        self.da.set_tail_index(new_next, new_tail);

        true
    }

    /// `spec.md` §4.2.10.
    pub fn retrieve(&self, key: &[Sym]) -> Option<&T> {
        if key.is_empty() {
            return None;
        }
        let codes = self.encode(key)?;

        let mut s = self.da.get_root();
        let mut consumed = 0usize;
        while consumed < codes.len() {
            let next = self.da.walk(s, codes[consumed])?;
            s = next;
            consumed += 1;
            if !self.da.is_trunk(s) {
                let tail_idx = self.da.get_tail_index(s)?;
                let remaining = &key[consumed.min(key.len())..];
                let suffix = self.tail.get_suffix(tail_idx)?;
                return if remaining == suffix {
                    self.tail.get_data(tail_idx)
                } else {
                    None
                };
            }
        }
        None
    }
}

/// The symbol at `pos`, or [`TERM`] once `pos` runs past the end — the
/// "suffix plus an implicit trailing terminator" convention shared by
/// every tail comparison.
fn sym_at(raw: &[Sym], pos: usize) -> Sym {
    raw.get(pos).copied().unwrap_or(TERM)
}

/// Whatever in `raw` follows position `pos`, in the same raw-without-
/// trailing-TERM convention [`TailPool`] stores suffixes in. `None` when
/// nothing but the implicit terminator remains.
fn suffix_after(raw: &[Sym], pos: usize) -> Option<Vec<Sym>> {
    if pos + 1 > raw.len() {
        return None;
    }
    let rest = &raw[pos + 1..];
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_vec())
    }
}

impl<T: TrieSerializable> Trie<T> {
    pub fn serialized_size(&self) -> usize {
        self.alpha.serialized_size() + self.da.serialized_size() + self.tail.serialized_size()
    }

    /// `spec.md` §6: alpha-range block, then cell-array block, then
    /// tail-pool block, concatenated with no additional framing.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.alpha.serialize(writer)?;
        self.da.serialize(writer)?;
        self.tail.serialize(writer)?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.serialize(&mut writer)?;
        writer.flush()
    }
}

impl<T: TrieDeserializable> Trie<T> {
    pub fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let alpha = AlphaRange::deserialize(reader)?;
        let da = DoubleArray::deserialize(reader)?;
        let tail = TailPool::deserialize(reader)?;
        Ok(Self { alpha, da, tail })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::from_reader(&mut reader)
    }
}
