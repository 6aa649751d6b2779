use notepad_core::{Command, CommandExecutor, CommandResult, Encoding, FileCommand, LineEnding};

fn load(executor: &mut CommandExecutor, file_name: &str, content: &str) {
    executor
        .execute(Command::File(FileCommand::Load {
            file_name: file_name.to_string(),
            content: content.to_string(),
        }))
        .unwrap();
}

fn prepare_save(executor: &mut CommandExecutor, line_ending: Option<LineEnding>) -> String {
    let result = executor
        .execute(Command::File(FileCommand::PrepareSave {
            file_name: None,
            encoding: None,
            line_ending,
        }))
        .unwrap();
    let CommandResult::SaveReady { text, .. } = result else {
        panic!("expected CommandResult::SaveReady");
    };
    text
}

#[test]
fn test_crlf_is_detected_on_load_and_preserved_for_saving() {
    let mut executor = CommandExecutor::new();
    load(&mut executor, "a.txt", "a\r\nb\r\n");

    assert_eq!(executor.document().line_ending, LineEnding::Crlf);
    assert_eq!(executor.content(), "a\nb\n");
    assert_eq!(prepare_save(&mut executor, None), "a\r\nb\r\n");
}

#[test]
fn test_lf_file_keeps_lf() {
    let mut executor = CommandExecutor::new();
    load(&mut executor, "a.txt", "a\nb\n");

    assert_eq!(executor.document().line_ending, LineEnding::Lf);
    assert_eq!(prepare_save(&mut executor, None), "a\nb\n");
}

#[test]
fn test_save_converts_mixed_endings() {
    let mut executor = CommandExecutor::new();
    load(&mut executor, "mixed.txt", "a\r\nb\nc\rd");

    assert_eq!(
        prepare_save(&mut executor, Some(LineEnding::Lf)),
        "a\nb\nc\nd"
    );
    assert_eq!(executor.document().line_ending, LineEnding::Lf);
    assert_eq!(
        prepare_save(&mut executor, Some(LineEnding::Cr)),
        "a\rb\rc\rd"
    );
    assert_eq!(
        prepare_save(&mut executor, Some(LineEnding::Crlf)),
        "a\r\nb\r\nc\r\nd"
    );
}

#[test]
fn test_single_line_file_keeps_current_line_ending() {
    let mut executor = CommandExecutor::new();
    executor
        .execute(Command::File(FileCommand::SetLineEnding {
            line_ending: LineEnding::Lf,
        }))
        .unwrap();
    load(&mut executor, "one.txt", "single line");

    assert_eq!(executor.document().line_ending, LineEnding::Lf);
}

#[test]
fn test_web_sources_load_as_utf8() {
    let mut executor = CommandExecutor::new();
    executor
        .execute(Command::File(FileCommand::SetEncoding {
            encoding: Encoding::ShiftJis,
        }))
        .unwrap();

    load(&mut executor, "notes.txt", "x");
    assert_eq!(executor.document().encoding, Encoding::ShiftJis);

    load(&mut executor, "app.JSON", "{}");
    assert_eq!(executor.document().encoding, Encoding::Utf8);
}

#[test]
fn test_line_ending_parse_and_display() {
    for ending in LineEnding::ALL {
        assert_eq!(ending.to_string().parse::<LineEnding>(), Ok(ending));
    }
    assert!("NEL".parse::<LineEnding>().is_err());
    assert_eq!(LineEnding::default(), LineEnding::Crlf);
}
