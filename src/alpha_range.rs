//! `AlphaRange`: the admitted-symbol alphabet, stored as a sorted,
//! coalesced list of disjoint closed intervals over [`Sym`], and
//! compressed into a dense `[1, MaxCode]` code space.
//!
//! Coalescing (merging touching or overlapping intervals) is delegated to
//! [`rangemap::RangeInclusiveSet`], which keeps the invariant from
//! `spec.md` §3.1 — sorted, disjoint, non-adjacent — by construction
//! rather than by hand-rolled interval-splicing logic.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rangemap::RangeInclusiveSet;

use crate::types::{Code, Sym, CODE_MAX, TERM};

/// Number of bytes occupied by one `(begin, end)` pair on disk.
const RANGE_PAIR_SIZE: usize = 4;

/// The admitted-symbol alphabet and its dense code mapping (`spec.md`
/// §4.1).
#[derive(Debug, Clone, Default)]
pub struct AlphaRange {
    ranges: RangeInclusiveSet<Sym>,
    max_code: Code,
}

impl AlphaRange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit every symbol in `[begin, end]`. A no-op when `begin > end`.
    /// Touching or overlapping ranges are coalesced automatically.
    pub fn add_range(&mut self, begin: Sym, end: Sym) {
        if begin > end {
            return;
        }
        self.ranges.insert(begin..=end);
        self.recompute_max_code();
    }

    fn recompute_max_code(&mut self) {
        let mut total: i64 = 0;
        for r in self.ranges.iter() {
            total += i64::from(*r.end()) - i64::from(*r.start()) + 1;
        }
        self.max_code = total as Code;
    }

    /// Map a symbol to its dense code. Returns `0` for [`TERM`], and
    /// [`CODE_MAX`] for a symbol admitted by no registered range.
    pub fn get_code(&self, sym: Sym) -> Code {
        if sym == TERM {
            return 0;
        }

        let mut code: i64 = 1;
        for r in self.ranges.iter() {
            if *r.start() <= sym && sym <= *r.end() {
                return (code + i64::from(sym - *r.start())) as Code;
            }
            code += i64::from(*r.end()) - i64::from(*r.start()) + 1;
        }
        CODE_MAX
    }

    /// The size of the dense code space admitted so far.
    pub fn get_max_code(&self) -> Code {
        self.max_code
    }

    /// Number of disjoint intervals currently registered. Exposed for
    /// tests asserting the coalescence invariant.
    pub fn range_count(&self) -> usize {
        self.ranges.iter().count()
    }

    /// Iterate the registered intervals in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = (Sym, Sym)> + '_ {
        self.ranges.iter().map(|r| (*r.start(), *r.end()))
    }

    pub fn serialized_size(&self) -> usize {
        4 + self.range_count() * RANGE_PAIR_SIZE
    }

    /// Write the `spec.md` §6.1 binary form: a little-endian `u32` total
    /// size (inclusive of itself) followed by packed `(begin, end)`
    /// pairs.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.serialized_size() as u32)?;
        for (begin, end) in self.ranges() {
            writer.write_u16::<LittleEndian>(begin)?;
            writer.write_u16::<LittleEndian>(end)?;
        }
        Ok(())
    }

    /// Read the `spec.md` §6.1 binary form. Pairs are re-inserted through
    /// [`Self::add_range`], so invariants hold even against adversarial
    /// input (overlapping/unsorted pairs in the stream just get
    /// coalesced).
    pub fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let total_size = reader.read_u32::<LittleEndian>()?;
        if (total_size as usize) < 4 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "alpha range total_size smaller than its own header",
            ));
        }
        let remaining = total_size as usize - 4;
        if remaining % RANGE_PAIR_SIZE != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "alpha range byte count is not a whole number of pairs",
            ));
        }
        let pair_count = remaining / RANGE_PAIR_SIZE;

        let mut out = Self::default();
        for _ in 0..pair_count {
            let begin = reader.read_u16::<LittleEndian>()?;
            let end = reader.read_u16::<LittleEndian>()?;
            out.add_range(begin, end);
        }
        Ok(out)
    }
}
