//! `DoubleArray`: the `base`/`check` cell array with an embedded
//! free-cell doubly-linked list (`spec.md` §4.2).
//!
//! Operates purely in *code* space — every public method here takes an
//! already-compressed [`Code`], never a raw [`crate::Sym`]. `Trie<T>` is
//! the only caller that crosses that boundary (via `AlphaRange::get_code`).

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::types::{Code, TrieIndex, BEGIN, FREE, ROOT, SIGNATURE, TRIE_INDEX_ERROR, TRIE_INDEX_MAX};

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    base: TrieIndex,
    check: TrieIndex,
}

/// The double-array trunk.
#[derive(Debug, Clone)]
pub struct DoubleArray {
    cells: Vec<Cell>,
}

impl Default for DoubleArray {
    fn default() -> Self {
        Self {
            cells: vec![
                // header: SIGNATURE, current length
                Cell {
                    base: SIGNATURE,
                    check: BEGIN,
                },
                // FREE: empty list, both links point at the sentinel itself
                Cell { base: -1, check: -1 },
                // ROOT: no children yet
                Cell {
                    base: BEGIN,
                    check: 0,
                },
            ],
        }
    }
}

impl DoubleArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_root(&self) -> TrieIndex {
        ROOT
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get_base(&self, s: TrieIndex) -> Option<TrieIndex> {
        if s < 0 {
            return None;
        }
        self.cells.get(s as usize).map(|c| c.base)
    }

    pub fn set_base(&mut self, s: TrieIndex, val: TrieIndex) {
        if s < 0 {
            return;
        }
        if let Some(c) = self.cells.get_mut(s as usize) {
            c.base = val;
        }
    }

    pub fn get_check(&self, s: TrieIndex) -> Option<TrieIndex> {
        if s < 0 {
            return None;
        }
        self.cells.get(s as usize).map(|c| c.check)
    }

    pub fn set_check(&mut self, s: TrieIndex, val: TrieIndex) {
        if s < 0 {
            return;
        }
        if let Some(c) = self.cells.get_mut(s as usize) {
            c.check = val;
        }
    }

    /// Whether `s` is an internal trunk state (`base(s) > 0`) as opposed
    /// to a leaf pointing into the tail pool.
    pub fn is_trunk(&self, s: TrieIndex) -> bool {
        matches!(self.get_base(s), Some(b) if b > 0)
    }

    /// `-base(s)` as a tail-pool index. Caller must already know `s` is
    /// not a trunk state.
    pub fn get_tail_index(&self, s: TrieIndex) -> Option<TrieIndex> {
        self.get_base(s).map(|b| -b)
    }

    pub fn set_tail_index(&mut self, s: TrieIndex, tail_index: TrieIndex) {
        self.set_base(s, -tail_index);
    }

    /// `spec.md` §4.2.3.
    pub fn walk(&self, s: TrieIndex, code: Code) -> Option<TrieIndex> {
        let base = self.get_base(s)?;
        let t = i64::from(base) + i64::from(code);
        if t < 0 || t >= self.cells.len() as i64 {
            return None;
        }
        let t = t as TrieIndex;
        if self.get_check(t) == Some(s) {
            Some(t)
        } else {
            None
        }
    }

    /// `spec.md` §4.2.4. Guards against `base(s) > len()` (open question
    /// in `spec.md` §9: the original does not clamp this).
    pub fn get_codes(&self, s: TrieIndex, max_code: Code) -> Vec<Code> {
        let mut out = Vec::new();
        let Some(base) = self.get_base(s) else {
            return out;
        };
        let n = self.cells.len() as i64;
        let limit = std::cmp::min(i64::from(max_code), n - i64::from(base));
        if limit < 0 {
            return out;
        }
        let mut c: i64 = 0;
        while c <= limit {
            let idx = i64::from(base) + c;
            if idx >= 0 && idx < n && self.get_check(idx as TrieIndex) == Some(s) {
                out.push(c as Code);
            }
            c += 1;
        }
        out
    }

    /// `spec.md` §4.2.1 `prepare_cell`.
    pub fn prepare_cell(&mut self, cell: TrieIndex) {
        if self.get_check(cell).unwrap_or(0) >= 0 {
            return;
        }
        let prev = -self.get_base(cell).unwrap_or(TRIE_INDEX_ERROR);
        let next = -self.get_check(cell).unwrap_or(TRIE_INDEX_ERROR);
        self.set_check(prev, -next);
        self.set_base(next, -prev);
    }

    /// `spec.md` §4.2.1 `free_cell`. `hint` should be the index last
    /// returned by a prior call (or [`FREE`] for a fresh search) so that
    /// ascending-index frees are amortized O(1).
    pub fn free_cell(&mut self, cell: TrieIndex, hint: TrieIndex) -> TrieIndex {
        let mut s = hint;
        loop {
            s = -self.get_check(s).unwrap_or(TRIE_INDEX_ERROR);
            if s == FREE || s >= cell {
                break;
            }
        }
        let prev = -self.get_base(s).unwrap_or(TRIE_INDEX_ERROR);
        self.set_check(prev, -cell);
        self.set_base(cell, -prev);
        self.set_check(cell, -s);
        self.set_base(s, -cell);
        cell
    }

    /// `spec.md` §4.2.2.
    pub fn extend_to(&mut self, target: TrieIndex) -> bool {
        if target <= 0 || target >= TRIE_INDEX_MAX {
            return false;
        }
        if (target as usize) < self.cells.len() {
            return true;
        }

        let new_begin = self.cells.len() as TrieIndex;
        self.cells.resize(target as usize + 1, Cell::default());

        let mut i = new_begin;
        while i < target {
            self.set_check(i, -(i + 1));
            self.set_base(i + 1, -i);
            i += 1;
        }

        let free_tail = -self.get_base(FREE).unwrap_or(TRIE_INDEX_ERROR);
        self.set_check(free_tail, -new_begin);
        self.set_base(new_begin, -free_tail);
        self.set_check(target, -FREE);
        self.set_base(FREE, -target);

        self.cells[0].check = self.cells.len() as TrieIndex;
        true
    }

    fn is_valid_base(&mut self, codes: &[Code], base: TrieIndex) -> bool {
        for &c in codes {
            let next = i64::from(base) + i64::from(c);
            if next < 0 || next > i64::from(TRIE_INDEX_MAX) {
                return false;
            }
            let next = next as TrieIndex;
            if !self.extend_to(next) {
                return false;
            }
            if self.get_check(next).unwrap_or(TRIE_INDEX_ERROR) >= 0 {
                return false;
            }
        }
        true
    }

    /// `spec.md` §4.2.5. `codes` must be non-empty and ascending.
    pub fn find_free_base(&mut self, codes: &[Code]) -> Option<TrieIndex> {
        let first_code = *codes.first()?;
        let last_code = *codes.last()?;

        let mut s = -self.get_check(FREE).unwrap_or(TRIE_INDEX_ERROR);
        while s != FREE && s < BEGIN + first_code {
            s = -self.get_check(s).unwrap_or(TRIE_INDEX_ERROR);
        }
        if s == FREE {
            s = BEGIN + first_code;
            loop {
                if !self.extend_to(s) {
                    return None;
                }
                if self.get_check(s).unwrap_or(TRIE_INDEX_ERROR) < 0 {
                    break;
                }
                s += 1;
            }
        }

        loop {
            let base = s - first_code;
            if self.is_valid_base(codes, base) {
                return Some(base);
            }
            let next = -self.get_check(s).unwrap_or(TRIE_INDEX_ERROR);
            if next == FREE {
                let target = std::cmp::max(base + last_code, self.cells.len() as TrieIndex);
                if !self.extend_to(target) {
                    return None;
                }
                s = -self.get_check(s).unwrap_or(TRIE_INDEX_ERROR);
            } else {
                s = next;
            }
        }
    }

    /// `spec.md` §4.2.7. `codes` is the full ascending code list
    /// including `new_code`.
    fn relocate_base(
        &mut self,
        s: TrieIndex,
        new_base: TrieIndex,
        codes: &[Code],
        new_code: Code,
        max_code: Code,
    ) {
        let old_base = self.get_base(s).unwrap_or(TRIE_INDEX_ERROR);
        let mut last_free = FREE;

        for &c in codes {
            let new_next = new_base + c;
            if c == new_code {
                self.prepare_cell(new_next);
                self.set_check(new_next, s);
                continue;
            }

            let old_next = old_base + c;
            let old_next_base = self.get_base(old_next).unwrap_or(TRIE_INDEX_ERROR);

            self.prepare_cell(new_next);
            self.set_base(new_next, old_next_base);
            self.set_check(new_next, s);

            if old_next_base > 0 {
                let n = self.cells.len() as i64;
                let max_extent = std::cmp::max(i64::from(max_code), n - i64::from(old_next_base));
                let mut g: i64 = 0;
                while g < max_extent {
                    let cell = i64::from(old_next_base) + g;
                    if cell >= 0 && cell < n && self.get_check(cell as TrieIndex) == Some(old_next) {
                        self.set_check(cell as TrieIndex, new_next);
                    }
                    g += 1;
                }
            }

            last_free = self.free_cell(old_next, last_free);
        }

        self.set_base(s, new_base);
    }

    /// `spec.md` §4.2.6. Returns `None` only when the array cannot be
    /// extended further (`ExtendExhausted`).
    pub fn insert_state(&mut self, s: TrieIndex, code: Code, max_code: Code) -> Option<TrieIndex> {
        let base = self.get_base(s)?;

        if base > 0 {
            let next_i64 = i64::from(base) + i64::from(code);
            let in_range = next_i64 >= 0 && next_i64 <= i64::from(TRIE_INDEX_MAX);
            let next = if in_range { Some(next_i64 as TrieIndex) } else { None };

            let usable = match next {
                Some(next) => self.extend_to(next) && self.get_check(next).unwrap_or(0) < 0,
                None => false,
            };

            if usable {
                let next = next.unwrap();
                self.prepare_cell(next);
                self.set_check(next, s);
                return Some(next);
            }

            let mut codes = self.get_codes(s, max_code);
            let pos = codes.partition_point(|&c| c < code);
            codes.insert(pos, code);
            let new_base = self.find_free_base(&codes)?;
            self.relocate_base(s, new_base, &codes, code, max_code);
            Some(new_base + code)
        } else {
            let codes = [code];
            let new_base = self.find_free_base(&codes)?;
            self.set_base(s, new_base);
            let next = new_base + code;
            self.prepare_cell(next);
            self.set_check(next, s);
            Some(next)
        }
    }

    /// `spec.md` §4.2.11.
    pub fn rate(&self) -> f64 {
        if self.cells.len() <= BEGIN as usize {
            return 0.0;
        }
        let mut valid = 0usize;
        for cell in &self.cells[BEGIN as usize..] {
            if cell.check > 0 {
                valid += 1;
            }
        }
        valid as f64 / self.cells.len() as f64
    }

    pub fn serialized_size(&self) -> usize {
        self.cells.len() * 8
    }

    /// `spec.md` §6.2 item 2.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for cell in &self.cells {
            writer.write_i32::<LittleEndian>(cell.base)?;
            writer.write_i32::<LittleEndian>(cell.check)?;
        }
        Ok(())
    }

    pub fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let base0 = reader.read_i32::<LittleEndian>()?;
        let check0 = reader.read_i32::<LittleEndian>()?;
        if base0 != SIGNATURE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "double array signature mismatch",
            ));
        }
        let n = check0;
        if n < BEGIN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "double array cell count smaller than the reserved slots",
            ));
        }

        let mut cells = Vec::with_capacity(n as usize);
        cells.push(Cell {
            base: base0,
            check: check0,
        });
        for _ in 1..n {
            let base = reader.read_i32::<LittleEndian>()?;
            let check = reader.read_i32::<LittleEndian>()?;
            cells.push(Cell { base, check });
        }

        Ok(Self { cells })
    }
}
