use crate::testutils::key;
use crate::Trie;

fn ascii_trie<T>() -> Trie<T> {
    let mut trie = Trie::new();
    trie.add_code_range(b'a' as u16, b'z' as u16);
    trie
}

#[test]
fn store_then_retrieve_a_single_key() {
    let mut trie = ascii_trie();
    assert!(trie.store(&key("cat"), 1));
    assert_eq!(trie.retrieve(&key("cat")), Some(&1));
}

#[test]
fn missing_key_retrieves_nothing() {
    let mut trie = ascii_trie();
    trie.store(&key("cat"), 1);
    assert_eq!(trie.retrieve(&key("dog")), None);
    assert_eq!(trie.retrieve(&key("ca")), None);
}

#[test]
fn storing_the_same_key_twice_rejects_the_second_insert() {
    let mut trie = ascii_trie();
    assert!(trie.store(&key("cat"), 1));
    assert!(!trie.store(&key("cat"), 2));
    assert_eq!(trie.retrieve(&key("cat")), Some(&1));
}

#[test]
fn symbol_outside_the_alphabet_is_rejected() {
    let mut trie = ascii_trie();
    assert!(!trie.store(&key("cat1"), 1));
}

#[test]
fn duplicate_reinsert_through_a_shared_prefix_leaves_the_original_tail_intact() {
    let mut trie = ascii_trie();
    assert!(trie.store(&key("cat"), 1));
    // "cat" shares its "a" and "t" with itself; re-inserting it walks
    // through that shared prefix before discovering the exact match, and
    // must not disturb the tail record it walked through on the way.
    assert!(!trie.store(&key("cat"), 2));
    assert_eq!(trie.retrieve(&key("cat")), Some(&1));
}

#[test]
fn empty_key_is_rejected_by_store_and_retrieve() {
    let mut trie = ascii_trie();
    assert!(!trie.store(&[], 1));
    assert_eq!(trie.retrieve(&[]), None);

    // An empty key must not be retrievable even once other keys exist.
    trie.store(&key("cat"), 1);
    assert_eq!(trie.retrieve(&[]), None);
}

#[test]
fn single_long_key_lands_entirely_in_one_tail_record() {
    let mut trie = ascii_trie();
    assert!(trie.store(&key("abcdef"), 99));
    assert_eq!(trie.retrieve(&key("abcdef")), Some(&99));
    assert_eq!(trie.retrieve(&key("abcde")), None);
    assert_eq!(trie.retrieve(&key("abcdefg")), None);
}

#[test]
fn sibling_keys_sharing_a_prefix_split_the_tail() {
    let mut trie = ascii_trie();
    assert!(trie.store(&key("cat"), 1));
    assert!(trie.store(&key("car"), 2));
    assert!(trie.store(&key("cab"), 3));

    assert_eq!(trie.retrieve(&key("cat")), Some(&1));
    assert_eq!(trie.retrieve(&key("car")), Some(&2));
    assert_eq!(trie.retrieve(&key("cab")), Some(&3));
    assert_eq!(trie.retrieve(&key("ca")), None);
}

#[test]
fn a_key_that_is_a_prefix_of_another_splits_on_the_term_symbol() {
    let mut trie = ascii_trie();
    assert!(trie.store(&key("a"), 1));
    assert!(trie.store(&key("ab"), 2));

    assert_eq!(trie.retrieve(&key("a")), Some(&1));
    assert_eq!(trie.retrieve(&key("ab")), Some(&2));
    assert_eq!(trie.retrieve(&key("abc")), None);
}

#[test]
fn storing_the_shorter_key_after_the_longer_one_also_splits_correctly() {
    let mut trie = ascii_trie();
    assert!(trie.store(&key("ab"), 2));
    assert!(trie.store(&key("a"), 1));

    assert_eq!(trie.retrieve(&key("a")), Some(&1));
    assert_eq!(trie.retrieve(&key("ab")), Some(&2));
}

#[test]
fn divergent_keys_sharing_a_long_common_prefix_split_deep_in_the_tail() {
    let mut trie = ascii_trie();
    assert!(trie.store(&key("abcde"), 1));
    assert!(trie.store(&key("abcxyz"), 2));

    assert_eq!(trie.retrieve(&key("abcde")), Some(&1));
    assert_eq!(trie.retrieve(&key("abcxyz")), Some(&2));
    assert_eq!(trie.retrieve(&key("abc")), None);
    assert_eq!(trie.retrieve(&key("abcd")), None);
}

#[test]
fn rate_reflects_growth_of_the_double_array() {
    let mut trie = ascii_trie();
    let empty_rate = trie.rate();
    trie.store(&key("cat"), 1);
    trie.store(&key("car"), 2);
    assert!(trie.rate() >= empty_rate);
}

#[test]
fn remove_is_a_non_goal_and_always_reports_false() {
    let mut trie = ascii_trie();
    trie.store(&key("cat"), 1);
    assert!(!trie.remove(&key("cat")));
    assert_eq!(trie.retrieve(&key("cat")), Some(&1));
}

#[test]
fn serialize_then_from_reader_round_trips_a_populated_trie() {
    let mut trie = ascii_trie::<i64>();
    trie.store(&key("cat"), 1);
    trie.store(&key("car"), 2);
    trie.store(&key("cab"), 3);
    trie.store(&key("abcde"), 4);

    let mut buf = Vec::new();
    trie.serialize(&mut buf).unwrap();
    assert_eq!(buf.len(), trie.serialized_size());

    let loaded: Trie<i64> = Trie::from_reader(&mut buf.as_slice()).unwrap();
    assert_eq!(loaded.retrieve(&key("cat")), Some(&1));
    assert_eq!(loaded.retrieve(&key("car")), Some(&2));
    assert_eq!(loaded.retrieve(&key("cab")), Some(&3));
    assert_eq!(loaded.retrieve(&key("abcde")), Some(&4));
    assert_eq!(loaded.retrieve(&key("ca")), None);
}

#[test]
fn save_then_load_round_trips_through_a_real_file() {
    let mut trie = ascii_trie::<i32>();
    trie.store(&key("hello"), 11);
    trie.store(&key("help"), 22);

    let path = std::env::temp_dir().join(format!(
        "tailtrie-test-{}-{}.trie",
        std::process::id(),
        "save_then_load_round_trips_through_a_real_file"
    ));
    trie.save(&path).unwrap();
    let loaded: Trie<i32> = Trie::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.retrieve(&key("hello")), Some(&11));
    assert_eq!(loaded.retrieve(&key("help")), Some(&22));
}
