use text_lsh::{set_verbose, Lsh, LshConfig, Payload};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Doc {
    id: u64,
}

impl Payload for Doc {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

fn corpus(keys: &[&str]) -> Vec<(String, Doc)> {
    keys.iter()
        .enumerate()
        .map(|(index, key)| (key.to_string(), Doc { id: index as u64 + 1 }))
        .collect()
}

/// Three-entry corpus used by the recall scenarios: id 1 is the query key
/// itself, id 3 shares most of its shingles, id 2 only the tail.
fn world_index() -> Lsh<Doc> {
    Lsh::build(
        LshConfig::new(12, 6, 3),
        corpus(&["hello world", "goodbye world", "helloo world"]),
    )
}

fn hit_ids(hits: &[text_lsh::SearchHit<'_, Doc>]) -> Vec<u64> {
    hits.iter().map(|hit| hit.payload.id).collect()
}

#[test]
fn exact_recall_returns_the_indexed_key_first() {
    let index = world_index();
    let hits = index.find("hello world", 0.5);

    assert!(!hits.is_empty());
    assert_eq!(hits[0].payload.id, 1);
    assert_eq!(hits[0].key, "hello world");
    assert!((hits[0].score - 1.0).abs() < 1e-9);

    // "helloo world" shares nearly every query shingle while "goodbye
    // world" shares only the tail, so whenever both survive the bucket
    // filter the closer key must rank higher.
    let ids = hit_ids(&hits);
    if let (Some(close), Some(far)) = (
        ids.iter().position(|&id| id == 3),
        ids.iter().position(|&id| id == 2),
    ) {
        assert!(close < far);
    }
}

#[test]
fn high_threshold_rejects_dissimilar_keys() {
    let index = world_index();
    let hits = index.find("hello world", 0.99);

    let ids = hit_ids(&hits);
    assert!(ids.contains(&1));
    assert!(!ids.contains(&2), "goodbye world must not reach 0.99");
    assert!(hits.iter().all(|hit| hit.score >= 0.99));
}

#[test]
fn query_shorter_than_shingle_width_finds_nothing() {
    let index = world_index();
    assert!(index.find("hi", 0.0).is_empty());
    assert!(index.find("", 0.0).is_empty());
}

#[test]
fn repeated_queries_return_identical_results() {
    // The permutation table is fixed after build, so the same query must
    // hash, match, and sort the same way every time.
    let index = world_index();
    let first: Vec<(u64, f64)> = index
        .find("hello world", 0.0)
        .iter()
        .map(|hit| (hit.payload.id, hit.score))
        .collect();
    let second: Vec<(u64, f64)> = index
        .find("hello world", 0.0)
        .iter()
        .map(|hit| (hit.payload.id, hit.score))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn scores_are_sorted_non_increasing() {
    let index = world_index();
    let hits = index.find("hello world", 0.0);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn every_corpus_key_finds_itself_with_full_score() {
    let keys = ["hello world", "goodbye world", "helloo world"];
    let index = Lsh::build(LshConfig::new(12, 6, 3), corpus(&keys));

    for (position, key) in keys.iter().enumerate() {
        let hits = index.find(key, 0.0);
        let own = hits
            .iter()
            .find(|hit| hit.payload.id == position as u64 + 1)
            .unwrap_or_else(|| panic!("{key} must find itself"));
        assert!((own.score - 1.0).abs() < 1e-9);
    }
}

#[test]
fn raising_the_threshold_never_adds_results() {
    let index = world_index();
    let loose = hit_ids(&index.find("hello world", 0.3));
    let strict = hit_ids(&index.find("hello world", 0.7));

    for id in &strict {
        assert!(loose.contains(id), "id {id} appears only under the stricter threshold");
    }
    assert!(strict.len() <= loose.len());
}

#[test]
fn disjoint_keys_are_never_candidates_for_each_other() {
    // No shared shingle means disjoint presence vectors, which cannot
    // produce a common band under any permutation.
    let index = Lsh::build(LshConfig::new(12, 6, 3), corpus(&["abcdefgh", "stuvwxyz"]));

    let hits = index.find("abcdefgh", 0.0);
    let ids = hit_ids(&hits);
    assert!(ids.contains(&1));
    assert!(!ids.contains(&2));
}

#[test]
fn single_entry_corpus_round_trips() {
    let index = Lsh::build(LshConfig::new(12, 6, 3), corpus(&["lonely entry"]));
    assert_eq!(index.len(), 1);

    let hits = index.find("lonely entry", 0.0);
    assert_eq!(hit_ids(&hits), vec![1]);
    assert!((hits[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn signature_length_equal_to_band_count_still_works() {
    // r = 1 degenerates to classic one-value-per-permutation MinHash.
    let config = LshConfig::new(8, 8, 3);
    let index = Lsh::build(config, corpus(&["hello world", "goodbye world"]));

    for entry in index.entries() {
        assert_eq!(entry.signature.len(), 8);
    }
    let hits = index.find("hello world", 0.0);
    assert_eq!(hits[0].payload.id, 1);
    assert!((hits[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn parallel_build_produces_a_searchable_index() {
    let keys = [
        "the quick brown fox",
        "jumps over the lazy dog",
        "pack my box with five dozen liquor jugs",
        "sphinx of black quartz judge my vow",
        "how vexingly quick daft zebras jump",
        "the five boxing wizards jump quickly",
    ];
    let config = LshConfig::new(16, 4, 3).with_parallel(true);
    let index = Lsh::build(config, corpus(&keys));
    assert_eq!(index.len(), keys.len());

    for (position, key) in keys.iter().enumerate() {
        let hits = index.find(key, 0.0);
        assert!(hits.iter().any(|hit| hit.payload.id == position as u64 + 1
            && (hit.score - 1.0).abs() < 1e-9));
    }
}

#[test]
fn verbose_toggle_does_not_disturb_results() {
    set_verbose(true);
    let index = world_index();
    let hits = index.find("hello world", 0.5);
    set_verbose(false);

    assert_eq!(hits[0].payload.id, 1);
}

#[test]
#[should_panic(expected = "lsh: signature_length 10 is not divisible by num_bands 3")]
fn indivisible_signature_length_aborts_the_build() {
    Lsh::build(LshConfig::new(10, 3, 2), corpus(&["hello world", "goodbye world"]));
}
