//! Property-based tests for search, scoring, difficulty and rank.

use proptest::prelude::*;
use std::collections::HashSet;

use wordgrid::game::scoring::calculate_rank;
use wordgrid::game::{difficulty, search, word_value, Board, Dictionary};

const WORDS: [&str; 24] = [
    "ate", "eat", "tea", "sat", "set", "tar", "rat", "art", "tan", "ant", "net", "ten", "rest",
    "star", "rats", "tars", "rate", "tear", "near", "earn", "stare", "tears", "rates", "antes",
];

const LETTERS: [char; 7] = ['a', 'e', 's', 't', 'r', 'n', 'x'];

fn dictionary() -> Dictionary {
    Dictionary::from_words(WORDS)
}

/// Strategy: a board up to 5x5 over a small alphabet.
fn board_strategy() -> impl Strategy<Value = Board> {
    (1usize..=5, 1usize..=5).prop_flat_map(|(w, h)| {
        prop::collection::vec(prop::sample::select(LETTERS.to_vec()), w * h).prop_map(
            move |cells| {
                let letters: String = cells.into_iter().collect();
                Board::new(w, h, &letters).unwrap()
            },
        )
    })
}

proptest! {
    // 1. Every found word is a dictionary word of 3+ letters spelled by its path
    #[test]
    fn found_words_are_dictionary_words(board in board_strategy()) {
        let dict = dictionary();
        let result = search(&board, &dict);
        for found in result.iter() {
            prop_assert!(found.word.len() >= 3);
            prop_assert!(dict.contains(&found.word), "{} not in dictionary", found.word);
            prop_assert_eq!(board.spell(&found.path), found.word.clone());
        }
    }

    // 2. No word is credited twice in one scan
    #[test]
    fn words_found_at_most_once(board in board_strategy()) {
        let result = search(&board, &dictionary());
        let unique: HashSet<&str> = result.iter().map(|w| w.word.as_str()).collect();
        prop_assert_eq!(unique.len(), result.len());
    }

    // 3. Paths move between neighbours and never reuse a cell
    #[test]
    fn paths_are_adjacent_and_simple(board in board_strategy()) {
        let result = search(&board, &dictionary());
        for found in result.iter() {
            for pair in found.path.windows(2) {
                prop_assert!(pair[0].is_adjacent(&pair[1]), "{:?}", found.path);
            }
            let cells: HashSet<_> = found.path.iter().collect();
            prop_assert_eq!(cells.len(), found.path.len());
        }
    }

    // 4. Total score is the sum of word values
    #[test]
    fn total_score_is_sum(board in board_strategy()) {
        let result = search(&board, &dictionary());
        let sum: u32 = result.iter().map(|w| word_value(&w.word)).sum();
        prop_assert_eq!(result.total_score, sum);
    }

    // 5. Scans are repeatable: claims never leak between scans
    #[test]
    fn scans_are_repeatable(board in board_strategy()) {
        let dict = dictionary();
        prop_assert_eq!(search(&board, &dict), search(&board, &dict));
    }

    // 6. Difficulty stays within bounds for every lowercase word
    #[test]
    fn difficulty_bounded(word in "[a-z]{1,30}") {
        let d = difficulty(&word);
        prop_assert!((0.0..=100.0).contains(&d), "{} rated {}", word, d);
    }

    // 7. Anything that isn't a lowercase word gets the neutral rating
    #[test]
    fn difficulty_neutral_for_invalid(word in "[a-z]{0,5}[A-Z0-9 ]{1,3}[a-z]{0,5}") {
        prop_assert_eq!(difficulty(&word), 50.0);
    }

    // 8. Finding more words never lowers the rank
    #[test]
    fn rank_monotonic(
        base in prop::collection::vec(any::<bool>(), WORDS.len()),
        extra in prop::collection::vec(any::<bool>(), WORDS.len()),
    ) {
        let b: Vec<&str> = (0..WORDS.len()).filter(|&i| base[i]).map(|i| WORDS[i]).collect();
        let a: Vec<&str> = (0..WORDS.len())
            .filter(|&i| base[i] || extra[i])
            .map(|i| WORDS[i])
            .collect();
        let rank_a = calculate_rank(&a, WORDS, difficulty);
        let rank_b = calculate_rank(&b, WORDS, difficulty);
        prop_assert!(rank_a >= rank_b, "superset rank {} < subset rank {}", rank_a, rank_b);
    }

    // 9. Word value depends only on length
    #[test]
    fn word_value_by_length(len in 0usize..40) {
        let a = "a".repeat(len);
        let z = "z".repeat(len);
        prop_assert_eq!(word_value(&a), word_value(&z));
        if !(3..=25).contains(&len) {
            prop_assert_eq!(word_value(&a), 0);
        }
    }
}
