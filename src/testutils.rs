use crate::Sym;

/// Encode an ASCII string as a key, one [`Sym`] per byte. Good enough for
/// every test fixture in this crate; nothing here exercises the wider
/// `Sym` range.
pub fn key(s: &str) -> Vec<Sym> {
    s.bytes().map(Sym::from).collect()
}
