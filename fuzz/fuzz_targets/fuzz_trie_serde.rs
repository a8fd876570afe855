#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;
use std::io::Cursor;
use std::ops::RangeInclusive;
use tailtrie::{Sym, Trie, TERM};

#[derive(Arbitrary, Debug)]
struct Input {
    range: RangeInclusive<Sym>,
    data: HashMap<Vec<Sym>, i32>,
}

fuzz_target!(|input: Input| {
    if input.range.contains(&TERM) {
        return;
    }
    if input.range.clone().count() > 4096 {
        return;
    }

    let mut trie = Trie::<i32>::new();
    trie.add_code_range(*input.range.start(), *input.range.end());

    for (key, value) in &input.data {
        if key.iter().any(|&s| s == TERM || !input.range.contains(&s)) {
            return;
        }
        trie.store(key, *value);
    }

    let mut buf = Vec::new();
    trie.serialize(&mut buf).unwrap();

    let mut cursor = Cursor::new(&buf);
    let reloaded = Trie::<i32>::from_reader(&mut cursor).unwrap();

    let mut reserialized = Vec::new();
    reloaded.serialize(&mut reserialized).unwrap();
    assert_eq!(buf, reserialized);
});
