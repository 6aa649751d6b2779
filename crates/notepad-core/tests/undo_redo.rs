use notepad_core::{
    Command, CommandExecutor, CommandResult, DEFAULT_UNDO_LIMIT, EditCommand, EditHistory,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

fn set_text(executor: &mut CommandExecutor, text: &str, now: Instant) {
    executor
        .execute_at(
            Command::Edit(EditCommand::SetText {
                text: text.to_string(),
            }),
            now,
        )
        .unwrap();
}

#[test]
fn test_undo_redo_round_trip() {
    let mut history = EditHistory::new();
    history.commit("a");
    history.commit("ab");

    assert_eq!(history.undo(), Some("a"));
    assert_eq!(history.redo(), Some("ab"));
    assert_eq!(history.current(), "ab");
}

#[test]
fn test_commit_is_idempotent() {
    let mut history = EditHistory::new();
    history.commit("x");
    let depth = history.undo_depth();

    assert!(!history.commit("x"));
    assert_eq!(history.undo_depth(), depth);
}

#[test]
fn test_commit_after_undo_clears_redo() {
    let mut history = EditHistory::new();
    history.commit("a");
    history.commit("ab");
    history.undo();
    assert!(history.can_redo());

    history.commit("ac");
    assert!(!history.can_redo());
    assert_eq!(history.redo(), None);
    assert_eq!(history.current(), "ac");
}

#[test]
fn test_history_is_bounded() {
    let mut history = EditHistory::new();
    for i in 0..150 {
        history.commit(&format!("v{i}"));
    }

    assert_eq!(history.undo_depth(), DEFAULT_UNDO_LIMIT);
    assert_eq!(history.current(), "v149");

    let mut oldest = history.current().to_string();
    while let Some(snapshot) = history.undo() {
        oldest = snapshot.to_string();
    }
    assert_eq!(oldest, "v50");
}

#[test]
fn test_undo_on_fresh_history_is_noop() {
    let mut executor = CommandExecutor::new();

    let result = executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
    assert_eq!(result, CommandResult::NoOp);
    assert_eq!(executor.content(), "");
    assert_eq!(executor.history().undo_depth(), 1);

    let result = executor.execute(Command::Edit(EditCommand::Redo)).unwrap();
    assert_eq!(result, CommandResult::NoOp);
}

#[test]
fn test_typing_burst_is_one_undo_step() {
    let start = Instant::now();
    let mut executor = CommandExecutor::new();

    let mut text = String::new();
    for (i, ch) in "hello".chars().enumerate() {
        text.push(ch);
        set_text(&mut executor, &text, start + Duration::from_millis(i as u64 * 100));
    }
    executor.tick(start + Duration::from_secs(2));
    assert_eq!(executor.history().undo_depth(), 2);

    let result = executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
    assert_eq!(result, CommandResult::Text(String::new()));
    assert_eq!(executor.content(), "");
    assert!(executor.can_redo());
}

#[test]
fn test_undo_before_debounce_fires_reverts_pending_edit() {
    let start = Instant::now();
    let mut executor = CommandExecutor::new();
    set_text(&mut executor, "saved", start);
    executor.tick(start + Duration::from_secs(1));

    set_text(&mut executor, "saved and more", start + Duration::from_secs(2));
    let result = executor
        .execute_at(
            Command::Edit(EditCommand::Undo),
            start + Duration::from_millis(2100),
        )
        .unwrap();
    assert_eq!(result, CommandResult::Text("saved".to_string()));

    let result = executor
        .execute_at(
            Command::Edit(EditCommand::Redo),
            start + Duration::from_millis(2200),
        )
        .unwrap();
    assert_eq!(result, CommandResult::Text("saved and more".to_string()));
    assert!(!executor.has_pending_commit());
}

#[test]
fn test_undo_restores_modified_flag() {
    let mut executor = CommandExecutor::new();
    set_text(&mut executor, "draft", Instant::now());
    executor.execute(Command::Edit(EditCommand::Commit)).unwrap();
    assert!(executor.document().modified);

    executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
    assert!(!executor.document().modified);
}

#[test]
fn test_random_commit_undo_redo_matches_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut history = EditHistory::with_limit(8);
    let mut model_undo: Vec<String> = vec![String::new()];
    let mut model_redo: Vec<String> = Vec::new();

    for step in 0..2_000 {
        match rng.gen_range(0..3) {
            0 => {
                let content = format!("{}", rng.gen_range(0..20));
                let committed = history.commit(&content);
                let expected = model_undo.last().map(String::as_str) != Some(content.as_str());
                assert_eq!(committed, expected, "step {step}");
                if expected {
                    model_undo.push(content);
                    model_redo.clear();
                    if model_undo.len() > 8 {
                        model_undo.remove(0);
                    }
                }
            }
            1 => {
                let got = history.undo().map(str::to_string);
                if model_undo.len() > 1 {
                    let top = model_undo.pop().unwrap();
                    model_redo.push(top);
                    assert_eq!(got.as_deref(), model_undo.last().map(String::as_str));
                } else {
                    assert_eq!(got, None, "step {step}");
                }
            }
            _ => {
                let got = history.redo().map(str::to_string);
                match model_redo.pop() {
                    Some(snapshot) => {
                        assert_eq!(got.as_deref(), Some(snapshot.as_str()));
                        model_undo.push(snapshot);
                    }
                    None => assert_eq!(got, None, "step {step}"),
                }
            }
        }

        assert_eq!(history.undo_depth(), model_undo.len());
        assert_eq!(history.redo_depth(), model_redo.len());
        assert!(history.undo_depth() >= 1 && history.undo_depth() <= 8);
    }
}
