#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use tailtrie::Trie;

fuzz_target!(|data: &[u8]| {
    let mut buf = Cursor::new(data);
    let _ = Trie::<i32>::from_reader(&mut buf);
});
