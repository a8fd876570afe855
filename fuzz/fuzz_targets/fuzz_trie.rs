#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;
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
        // keep the alphabet (and so the array) small enough to fuzz quickly
        return;
    }

    let mut trie = Trie::<i32>::new();
    trie.add_code_range(*input.range.start(), *input.range.end());

    for (key, value) in &input.data {
        if key.is_empty() || key.iter().any(|&s| s == TERM || !input.range.contains(&s)) {
            return;
        }
        trie.store(key, *value);
    }

    assert!(!trie.store(&[], 0));
    assert_eq!(trie.retrieve(&[]), None);

    for (key, value) in &input.data {
        let Some(got) = trie.retrieve(key) else {
            panic!("key missing from the trie after being stored: {key:?}");
        };
        assert_eq!(*got, *value);
    }
});
