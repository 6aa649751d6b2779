//! State management example
//!
//! Demonstrates how to drive `EditorStateManager` with commands and query its state.

use notepad_core::{
    Command, CommandResult, EditCommand, EditorStateManager, FileCommand, LineEnding,
    SearchCommand,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn main() {
    println!("=== Notepad state management example ===\n");

    let mut manager = EditorStateManager::new();

    println!("1. Initial document state:");
    print_document_state(&manager);

    println!("\n2. State change listener:");
    let change_count = Arc::new(Mutex::new(0));
    let change_count_clone = change_count.clone();
    manager.subscribe(move |change| {
        let mut count = change_count_clone.lock().unwrap();
        *count += 1;
        println!(
            "  change #{}: {:?} (version {} -> {})",
            count, change.change_type, change.old_version, change.new_version
        );
    });

    println!("\n3. Load a file:");
    manager
        .execute(Command::File(FileCommand::Load {
            file_name: "todo.txt".to_string(),
            content: "buy milk\r\nbuy bread\r\nwalk the dog".to_string(),
        }))
        .unwrap();
    print_document_state(&manager);

    println!("\n4. Type, then let the debounced commit fire:");
    let start = Instant::now();
    manager
        .execute_at(
            Command::Edit(EditCommand::SetText {
                text: "buy milk\nbuy bread\nwalk the dog\nbuy eggs".to_string(),
            }),
            start,
        )
        .unwrap();
    print_undo_redo_state(&manager);
    manager.tick(start + Duration::from_millis(600));
    print_undo_redo_state(&manager);

    println!("\n5. Search and replace:");
    manager
        .execute(Command::Search(SearchCommand::Search {
            term: "buy".to_string(),
        }))
        .unwrap();
    let search = manager.get_search_state();
    println!(
        "  term {:?}: {} matches, current {:?}",
        search.term, search.match_count, search.current_match
    );
    let result = manager
        .execute(Command::Search(SearchCommand::ReplaceAll {
            replacement: "get".to_string(),
        }))
        .unwrap();
    if let CommandResult::ReplaceResult { replaced } = result {
        println!("  replaced {} occurrences", replaced);
    }
    println!("  status: {:?}", manager.get_status_message());

    println!("\n6. Undo the replacement:");
    manager.execute(Command::Edit(EditCommand::Undo)).unwrap();
    println!("  content: {:?}", manager.content());

    println!("\n7. Version tracking:");
    let current_version = manager.version();
    println!("  current version: {}", current_version);
    println!("  changed since 0: {}", manager.has_changed_since(0));
    println!(
        "  changed since {}: {}",
        current_version,
        manager.has_changed_since(current_version)
    );

    println!("\n8. Save as LF:");
    let result = manager
        .execute(Command::File(FileCommand::PrepareSave {
            file_name: None,
            encoding: None,
            line_ending: Some(LineEnding::Lf),
        }))
        .unwrap();
    if let CommandResult::SaveReady { file_name, text, encoding } = result {
        println!("  would write {} bytes to {} as {}", text.len(), file_name, encoding);
    }
    manager
        .execute(Command::File(FileCommand::MarkSaved))
        .unwrap();
    println!("  title: {}", manager.title("Simple Notepad", "New Document"));

    println!("\n9. Full state snapshot:");
    let full_state = manager.get_full_state();
    println!("  lines: {}", full_state.document.line_count);
    println!("  words: {}", full_state.document.word_count);
    println!("  can undo: {}", full_state.undo_redo.can_undo);
    println!("  total changes: {}", *change_count.lock().unwrap());

    println!("\n=== Done ===");
}

fn print_document_state(manager: &EditorStateManager) {
    let state = manager.get_document_state();
    println!("  lines: {}", state.line_count);
    println!("  characters: {}", state.char_count);
    println!("  bytes: {}", state.byte_count);
    println!("  modified: {}", state.is_modified);
    println!("  line ending: {}", state.line_ending);
    println!("  version: {}", state.version);
}

fn print_undo_redo_state(manager: &EditorStateManager) {
    let state = manager.get_undo_redo_state();
    println!(
        "  undo depth {}, redo depth {}, commit pending {}",
        state.undo_depth, state.redo_depth, state.commit_pending
    );
}
