use notepad_core::search::{find_all, find_next, find_prev};
use notepad_core::{
    Command, CommandExecutor, CommandResult, EditCommand, SearchCommand, SearchEngine,
    SearchMatch, SearchOptions, SearchStatus, Status,
};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

fn opts(case_sensitive: bool, whole_word: bool) -> SearchOptions {
    SearchOptions {
        case_sensitive,
        whole_word,
    }
}

fn executor_with(text: &str) -> CommandExecutor {
    let mut executor = CommandExecutor::new();
    executor
        .execute(Command::Edit(EditCommand::SetText {
            text: text.to_string(),
        }))
        .unwrap();
    executor
        .execute(Command::Edit(EditCommand::Commit))
        .unwrap();
    executor
}

fn search(executor: &mut CommandExecutor, term: &str) -> CommandResult {
    executor
        .execute(Command::Search(SearchCommand::Search {
            term: term.to_string(),
        }))
        .unwrap()
}

#[test]
fn test_empty_term_has_no_matches() {
    assert_eq!(find_all("anything", "", SearchOptions::default()).unwrap(), vec![]);

    let mut executor = executor_with("anything");
    assert_eq!(search(&mut executor, ""), CommandResult::SearchReady);
    assert_eq!(executor.search_status(), SearchStatus::Ready);
}

#[test]
fn test_matches_are_non_overlapping_in_order() {
    let mut engine = SearchEngine::new();
    engine.search("ababab", "ab");
    assert_eq!(
        engine.matches(),
        &[
            SearchMatch::new(0, 2),
            SearchMatch::new(2, 4),
            SearchMatch::new(4, 6)
        ]
    );
    assert_eq!(engine.current_index(), Some(0));

    assert_eq!(
        find_all("aaaa", "aa", SearchOptions::default()).unwrap(),
        vec![SearchMatch::new(0, 2), SearchMatch::new(2, 4)]
    );
}

#[test]
fn test_replace_all() {
    let mut executor = executor_with("ababab");
    search(&mut executor, "ab");

    let result = executor
        .execute(Command::Search(SearchCommand::ReplaceAll {
            replacement: "X".to_string(),
        }))
        .unwrap();
    assert_eq!(result, CommandResult::ReplaceResult { replaced: 3 });
    assert_eq!(executor.content(), "XXX");
    assert_eq!(executor.status(), &Status::Replaced { count: 3 });
    assert_eq!(executor.search_status(), SearchStatus::NotFound);
}

#[test]
fn test_find_next_wraps() {
    let mut executor = executor_with("ababab");
    search(&mut executor, "ab");

    let mut seen = Vec::new();
    for _ in 0..3 {
        let result = executor
            .execute(Command::Search(SearchCommand::FindNext))
            .unwrap();
        let CommandResult::SearchMatch { start, .. } = result else {
            panic!("expected CommandResult::SearchMatch");
        };
        seen.push(start);
    }
    // Search selected index 0; three more steps visit 1, 2 and wrap to 0.
    assert_eq!(seen, vec![2, 4, 0]);
    assert_eq!(executor.search().current_index(), Some(0));
}

#[test]
fn test_four_find_next_calls_from_stale_matches_return_to_first() {
    let mut engine = SearchEngine::new();
    engine.search("ababab", "ab");
    // An edit drops the cached matches but keeps the term.
    engine.invalidate();

    // The first call re-scans and selects index 0; three more wrap back to it.
    for _ in 0..4 {
        engine.find_next("ababab");
    }
    assert_eq!(engine.current_index(), Some(0));
}

#[test]
fn test_find_previous_wraps() {
    let mut executor = executor_with("ababab");
    search(&mut executor, "ab");

    let result = executor
        .execute(Command::Search(SearchCommand::FindPrevious))
        .unwrap();
    assert_eq!(result, CommandResult::SearchMatch { start: 4, end: 6 });
    assert_eq!(
        executor.search_status(),
        SearchStatus::Matches {
            current: 3,
            total: 3
        }
    );
}

#[test]
fn test_search_is_case_insensitive_by_default() {
    let mut executor = executor_with("Hello hello HELLO");
    search(&mut executor, "hello");
    assert_eq!(executor.search().matches().len(), 3);

    executor
        .execute(Command::Search(SearchCommand::SetOptions {
            options: opts(true, false),
        }))
        .unwrap();
    assert_eq!(executor.search().matches(), &[SearchMatch::new(6, 11)]);
}

#[test]
fn test_term_is_literal() {
    let mut executor = executor_with("a.c abc (x)");
    search(&mut executor, "a.c");
    assert_eq!(executor.search().matches(), &[SearchMatch::new(0, 3)]);

    search(&mut executor, "(x)");
    assert_eq!(executor.search().matches(), &[SearchMatch::new(8, 11)]);
}

#[test]
fn test_whole_word_option() {
    let text = "cat concat cat_ cat";
    assert_eq!(
        find_all(text, "cat", opts(false, true)).unwrap(),
        vec![SearchMatch::new(0, 3), SearchMatch::new(16, 19)]
    );
}

#[test]
fn test_char_offsets_with_multibyte_text() {
    let text = "日本語 テキスト 日本";
    assert_eq!(
        find_all(text, "日本", SearchOptions::default()).unwrap(),
        vec![SearchMatch::new(0, 2), SearchMatch::new(9, 11)]
    );
    assert_eq!(
        find_next(text, "日本", SearchOptions::default(), 1).unwrap(),
        Some(SearchMatch::new(9, 11))
    );
    assert_eq!(
        find_prev(text, "日本", SearchOptions::default(), 9).unwrap(),
        Some(SearchMatch::new(0, 2))
    );
}

#[test]
fn test_not_found_status() {
    let mut executor = executor_with("abc");
    assert_eq!(search(&mut executor, "zzz"), CommandResult::SearchNotFound);
    assert_eq!(executor.status(), &Status::NotFound);

    let result = executor
        .execute(Command::Search(SearchCommand::FindNext))
        .unwrap();
    assert_eq!(result, CommandResult::SearchNotFound);
}

#[test]
fn test_replace_one_rescans_and_selects_next() {
    let mut executor = executor_with("one two one");
    search(&mut executor, "one");

    let result = executor
        .execute(Command::Search(SearchCommand::ReplaceOne {
            replacement: "1".to_string(),
        }))
        .unwrap();
    assert_eq!(result, CommandResult::ReplaceResult { replaced: 1 });
    assert_eq!(executor.content(), "1 two one");
    assert_eq!(executor.current_match(), Some(SearchMatch::new(6, 9)));
    assert!(executor.has_pending_commit());
}

#[test]
fn test_replace_without_match_is_noop() {
    let mut executor = executor_with("abc");
    search(&mut executor, "zzz");

    let result = executor
        .execute(Command::Search(SearchCommand::ReplaceAll {
            replacement: "y".to_string(),
        }))
        .unwrap();
    assert_eq!(result, CommandResult::NoOp);
    assert_eq!(executor.content(), "abc");
}

#[test]
fn test_replace_all_is_one_undo_step() {
    let mut executor = executor_with("ababab");
    search(&mut executor, "ab");
    executor
        .execute(Command::Search(SearchCommand::ReplaceAll {
            replacement: "X".to_string(),
        }))
        .unwrap();

    let result = executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
    assert_eq!(result, CommandResult::Text("ababab".to_string()));
}

#[test]
fn test_edit_reruns_search_after_debounce() {
    let start = Instant::now();
    let mut executor = CommandExecutor::new();
    executor
        .execute_at(
            Command::Edit(EditCommand::SetText {
                text: "ab".to_string(),
            }),
            start,
        )
        .unwrap();
    executor
        .execute_at(
            Command::Search(SearchCommand::Search {
                term: "ab".to_string(),
            }),
            start,
        )
        .unwrap();
    assert_eq!(executor.search().matches().len(), 1);

    executor
        .execute_at(
            Command::Edit(EditCommand::SetText {
                text: "ab ab".to_string(),
            }),
            start + Duration::from_millis(10),
        )
        .unwrap();
    assert!(executor.search().matches().is_empty());
    assert!(executor.search().is_stale());
    assert_eq!(executor.search_status(), SearchStatus::Ready);

    executor.tick(start + Duration::from_millis(400));
    assert_eq!(executor.search().matches().len(), 2);
    assert_eq!(
        executor.status(),
        &Status::Matches {
            current: 1,
            total: 2
        }
    );
}

#[test]
fn test_replace_all_inside_search_debounce_uses_current_text() {
    let start = Instant::now();
    let mut executor = CommandExecutor::new();
    executor
        .execute_at(
            Command::Edit(EditCommand::SetText {
                text: "ab ab".to_string(),
            }),
            start,
        )
        .unwrap();
    executor
        .execute_at(
            Command::Search(SearchCommand::Search {
                term: "ab".to_string(),
            }),
            start,
        )
        .unwrap();
    executor
        .execute_at(
            Command::Edit(EditCommand::SetText {
                text: "ab ab ab".to_string(),
            }),
            start + Duration::from_millis(10),
        )
        .unwrap();
    assert_ne!(executor.search_status(), SearchStatus::NotFound);

    let result = executor
        .execute_at(
            Command::Search(SearchCommand::ReplaceAll {
                replacement: "X".to_string(),
            }),
            start + Duration::from_millis(50),
        )
        .unwrap();
    assert_eq!(result, CommandResult::ReplaceResult { replaced: 3 });
    assert_eq!(executor.content(), "X X X");
    assert!(!executor.has_pending_search());
}

#[test]
fn test_replace_one_inside_search_debounce_targets_fresh_match() {
    let start = Instant::now();
    let mut executor = CommandExecutor::new();
    executor
        .execute_at(
            Command::Edit(EditCommand::SetText {
                text: "ab".to_string(),
            }),
            start,
        )
        .unwrap();
    executor
        .execute_at(
            Command::Search(SearchCommand::Search {
                term: "ab".to_string(),
            }),
            start,
        )
        .unwrap();
    executor
        .execute_at(
            Command::Edit(EditCommand::SetText {
                text: "xx ab".to_string(),
            }),
            start + Duration::from_millis(10),
        )
        .unwrap();

    let result = executor
        .execute_at(
            Command::Search(SearchCommand::ReplaceOne {
                replacement: "Y".to_string(),
            }),
            start + Duration::from_millis(50),
        )
        .unwrap();
    assert_eq!(result, CommandResult::ReplaceResult { replaced: 1 });
    assert_eq!(executor.content(), "xx Y");
}

#[test]
fn test_undo_after_replace_all_resets_status() {
    let mut executor = executor_with("ab ab");
    search(&mut executor, "ab");
    executor
        .execute(Command::Search(SearchCommand::ReplaceAll {
            replacement: "X".to_string(),
        }))
        .unwrap();
    assert_eq!(executor.status(), &Status::Replaced { count: 2 });

    executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
    assert_eq!(executor.content(), "ab ab");
    assert_eq!(executor.status(), &Status::Ready);
}

#[test]
fn test_close_search_clears_term() {
    let mut executor = executor_with("abc");
    search(&mut executor, "b");
    executor
        .execute(Command::Search(SearchCommand::Close))
        .unwrap();

    assert_eq!(executor.search().term(), "");
    assert_eq!(executor.current_match(), None);
    assert_eq!(executor.status(), &Status::Ready);
}
