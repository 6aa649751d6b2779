//! Terminal notepad built on `notepad-core`.
//!
//! Usage: `notepad-tui [file]`
//!
//! # Shortcuts
//!
//! - Arrows / Home / End / PageUp / PageDown: move (Shift extends the selection)
//! - Ctrl+N: new document
//! - Ctrl+O: open file
//! - Ctrl+S / Ctrl+Shift+S: save / save as
//! - Ctrl+Z: undo
//! - Ctrl+Y / Ctrl+Shift+Z: redo
//! - Ctrl+F: find (typing searches as you go, Enter closes the prompt)
//! - Ctrl+H: replace (Enter moves from the term to the replacement, then replaces one)
//! - F3 / Shift+F3: next / previous match
//! - Ctrl+R / Ctrl+A: replace current / replace all
//! - Alt+C / Alt+W: toggle case sensitivity / whole word
//! - Tab / Shift+Tab: insert tab / remove a leading tab
//! - Ctrl+D: dark mode
//! - Ctrl+L: line numbers
//! - Esc: close the prompt or the search
//! - Ctrl+Q: quit
//!
//! Set `NOTEPAD_LOG=<path>` to write logs (filtered by `RUST_LOG`) to a file.

use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use notepad_core::{
    Command, CommandError, CommandResult, EditCommand, EditorStateManager, Encoding, FileCommand,
    LineEnding, Position, Preferences, SearchCommand, SearchOptions,
    document::{cursor_position, line_count, position_to_offset},
};
use notepad_i18n::{Translator, resolve_language};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmAction {
    Quit,
    NewFile,
    Open,
}

impl ConfirmAction {
    fn message_key(self) -> &'static str {
        match self {
            ConfirmAction::Quit => "confirm.quit",
            ConfirmAction::NewFile => "confirm.newFile",
            ConfirmAction::Open => "confirm.unsavedChanges",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Find,
    ReplaceFind,
    ReplaceWith,
    Open,
    SaveAs,
    Confirm(ConfirmAction),
}

/// Editor actions reachable from a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    New,
    Open,
    Save,
    SaveAs,
    Undo,
    Redo,
    Find,
    Replace,
    FindNext,
    FindPrevious,
    ReplaceOne,
    ReplaceAll,
    ToggleCaseSensitive,
    ToggleWholeWord,
    CloseSearch,
    Indent,
    Outdent,
    ToggleDarkMode,
    ToggleLineNumbers,
    ToggleWordWrap,
    Quit,
}

impl Action {
    /// Actions that stay available while a find/replace prompt is open.
    fn is_search_action(self) -> bool {
        matches!(
            self,
            Action::FindNext
                | Action::FindPrevious
                | Action::ReplaceOne
                | Action::ReplaceAll
                | Action::ToggleCaseSensitive
                | Action::ToggleWholeWord
        )
    }
}

fn shortcut(key: &KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let action = match key.code {
        KeyCode::Char(c) if ctrl => {
            let shifted = shift || c.is_ascii_uppercase();
            match c.to_ascii_lowercase() {
                'n' => Action::New,
                'o' => Action::Open,
                's' if shifted => Action::SaveAs,
                's' => Action::Save,
                'z' if shifted => Action::Redo,
                'z' => Action::Undo,
                'y' => Action::Redo,
                'f' => Action::Find,
                'h' => Action::Replace,
                'r' => Action::ReplaceOne,
                'a' => Action::ReplaceAll,
                'd' => Action::ToggleDarkMode,
                'l' => Action::ToggleLineNumbers,
                'q' => Action::Quit,
                _ => return None,
            }
        }
        KeyCode::Char(c) if alt => match c.to_ascii_lowercase() {
            'c' => Action::ToggleCaseSensitive,
            'w' => Action::ToggleWholeWord,
            'z' => Action::ToggleWordWrap,
            _ => return None,
        },
        KeyCode::F(3) if shift => Action::FindPrevious,
        KeyCode::F(3) => Action::FindNext,
        KeyCode::BackTab => Action::Outdent,
        KeyCode::Tab if shift => Action::Outdent,
        KeyCode::Tab => Action::Indent,
        KeyCode::Esc => Action::CloseSearch,
        _ => return None,
    };
    Some(action)
}

/// Decode file bytes, honoring a UTF-8 or UTF-16 byte order mark.
///
/// Returns the text and the encoding implied by the BOM, if any.
fn decode(bytes: &[u8]) -> (String, Option<Encoding>) {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return (
            String::from_utf8_lossy(rest).into_owned(),
            Some(Encoding::Utf8Bom),
        );
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        return (decode_utf16(rest, u16::from_le_bytes), Some(Encoding::Utf16Le));
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        return (decode_utf16(rest, u16::from_be_bytes), Some(Encoding::Utf16Be));
    }
    (String::from_utf8_lossy(bytes).into_owned(), None)
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Display width of `ch` at visual column `x`.
fn char_width(ch: char, x: usize) -> usize {
    if ch == '\t' {
        TAB_WIDTH - x % TAB_WIDTH
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Char columns where the visual rows of `line` start when wrapped at `width` cells.
///
/// A `width` of 0 disables wrapping. Tab stops are measured from the line start.
fn wrap_starts(line: &str, width: usize) -> Vec<usize> {
    let mut starts = vec![0];
    if width == 0 {
        return starts;
    }
    let mut x_in_row = 0;
    let mut x_in_line = 0;
    for (col, ch) in line.chars().enumerate() {
        let ch_width = char_width(ch, x_in_line);
        // A character wider than the whole row still gets a row of its own.
        if x_in_row > 0 && x_in_row + ch_width > width {
            starts.push(col);
            x_in_row = 0;
        }
        x_in_row += ch_width;
        x_in_line += ch_width;
    }
    starts
}

fn preferences_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("simple-notepad").join("preferences.json"))
}

struct App {
    /// Document, history and search state
    state: EditorStateManager,
    translator: Translator,
    prefs: Preferences,
    /// Where preferences are persisted (`None` disables persistence)
    prefs_path: Option<PathBuf>,
    /// Full path of the open file
    file_path: Option<PathBuf>,
    /// Caret as a character offset
    cursor: usize,
    /// Selection anchor; the selection spans anchor..cursor
    anchor: Option<usize>,
    /// First visible visual row
    scroll_top: usize,
    viewport_height: usize,
    /// Cells available for text, measured at the last render
    text_width: usize,
    input_mode: InputMode,
    input_buffer: String,
    find_text: String,
    replace_text: String,
    /// Transient message shown instead of the core status
    message: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(translator: Translator, prefs: Preferences, prefs_path: Option<PathBuf>) -> Self {
        let mut state = EditorStateManager::new();
        state.subscribe(|change| {
            tracing::trace!(
                change = ?change.change_type,
                version = change.new_version,
                "state changed"
            );
        });

        let mut app = Self {
            state,
            translator,
            prefs,
            prefs_path,
            file_path: None,
            cursor: 0,
            anchor: None,
            scroll_top: 0,
            viewport_height: 0,
            text_width: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            find_text: String::new(),
            replace_text: String::new(),
            message: None,
            should_quit: false,
        };
        let encoding = app.prefs.encoding;
        app.execute(Command::File(FileCommand::SetEncoding { encoding }));
        app
    }

    fn t(&self, key: &str) -> String {
        self.translator.t(key, &[])
    }

    fn content(&self) -> &str {
        self.state.content()
    }

    fn char_count(&self) -> usize {
        self.state.executor().document().char_count()
    }

    fn is_modified(&self) -> bool {
        self.state.executor().document().modified
    }

    fn execute(&mut self, command: Command) -> Option<CommandResult> {
        match self.state.execute(command) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::warn!(error = %err, "command failed");
                self.message = Some(match err {
                    CommandError::EmptyFileName => self.t("error.emptyFilename"),
                    other => other.to_string(),
                });
                None
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.message = None;

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Confirm(action) => self.handle_confirm_key(action, key),
            _ => self.handle_prompt_key(key),
        }

        self.adjust_scroll();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if let Some(action) = shortcut(&key) {
            self.run_action(action);
            return;
        }

        let select = key.modifiers.contains(KeyModifiers::SHIFT);
        let typed = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1), select),
            KeyCode::Right => self.move_to((self.cursor + 1).min(self.char_count()), select),
            KeyCode::Up => self.move_vertical(-1, select),
            KeyCode::Down => self.move_vertical(1, select),
            KeyCode::PageUp => self.move_vertical(-(self.page_size() as isize), select),
            KeyCode::PageDown => self.move_vertical(self.page_size() as isize, select),
            KeyCode::Home => self.move_to(self.line_boundary(0), select),
            KeyCode::End => self.move_to(self.line_boundary(usize::MAX), select),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Enter => self.insert_text("\n"),
            KeyCode::Char(c) if typed => self.insert_text(c.encode_utf8(&mut [0; 4])),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, action: ConfirmAction, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                self.input_mode = InputMode::Normal;
                match action {
                    ConfirmAction::Quit => self.should_quit = true,
                    ConfirmAction::NewFile => self.new_file(),
                    ConfirmAction::Open => self.start_prompt(InputMode::Open, String::new()),
                }
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => self.input_mode = InputMode::Normal,
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let typed = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => {
                if matches!(
                    self.input_mode,
                    InputMode::Find | InputMode::ReplaceFind | InputMode::ReplaceWith
                ) {
                    self.close_search();
                }
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.on_prompt_edit();
            }
            KeyCode::Char(c) if typed => {
                self.input_buffer.push(c);
                self.on_prompt_edit();
            }
            _ => {
                if let Some(action) = shortcut(&key).filter(|action| action.is_search_action()) {
                    self.run_action(action);
                    if action == Action::ReplaceAll {
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                    }
                }
            }
        }
    }

    fn start_prompt(&mut self, mode: InputMode, initial: String) {
        self.input_mode = mode;
        self.input_buffer = initial;
    }

    fn on_prompt_edit(&mut self) {
        match self.input_mode {
            InputMode::Find | InputMode::ReplaceFind => {
                self.find_text = self.input_buffer.clone();
                let term = self.find_text.clone();
                self.execute(Command::Search(SearchCommand::Search { term }));
                self.select_current_match();
            }
            InputMode::ReplaceWith => self.replace_text = self.input_buffer.clone(),
            _ => {}
        }
    }

    fn submit_prompt(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
        match mode {
            InputMode::ReplaceFind => {
                self.start_prompt(InputMode::ReplaceWith, self.replace_text.clone());
            }
            InputMode::ReplaceWith => {
                self.replace_text = input;
                self.run_action(Action::ReplaceOne);
                self.start_prompt(InputMode::ReplaceWith, self.replace_text.clone());
            }
            InputMode::Open => self.open_file(PathBuf::from(input.trim())),
            InputMode::SaveAs => self.save(Some(PathBuf::from(input.trim()))),
            InputMode::Find | InputMode::Normal | InputMode::Confirm(_) => {}
        }
    }

    fn run_action(&mut self, action: Action) {
        match action {
            Action::New => self.confirm_if_modified(ConfirmAction::NewFile),
            Action::Open => self.confirm_if_modified(ConfirmAction::Open),
            Action::Save => self.save(None),
            Action::SaveAs => {
                let current = self
                    .file_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                self.start_prompt(InputMode::SaveAs, current);
            }
            Action::Undo => self.history_step(EditCommand::Undo),
            Action::Redo => self.history_step(EditCommand::Redo),
            Action::Find => self.open_search(InputMode::Find),
            Action::Replace => self.open_search(InputMode::ReplaceFind),
            Action::FindNext => self.find(SearchCommand::FindNext),
            Action::FindPrevious => self.find(SearchCommand::FindPrevious),
            Action::ReplaceOne => self.replace(SearchCommand::ReplaceOne {
                replacement: self.replace_text.clone(),
            }),
            Action::ReplaceAll => self.replace(SearchCommand::ReplaceAll {
                replacement: self.replace_text.clone(),
            }),
            Action::ToggleCaseSensitive => self.update_search_options(|options| {
                options.case_sensitive = !options.case_sensitive;
            }),
            Action::ToggleWholeWord => self.update_search_options(|options| {
                options.whole_word = !options.whole_word;
            }),
            Action::CloseSearch => self.close_search(),
            Action::Indent => self.indent(),
            Action::Outdent => self.outdent(),
            Action::ToggleDarkMode => {
                self.prefs.dark_mode = !self.prefs.dark_mode;
                self.save_preferences();
                self.message = Some(self.t(if self.prefs.dark_mode {
                    "status.darkModeOn"
                } else {
                    "status.darkModeOff"
                }));
            }
            Action::ToggleLineNumbers => {
                self.prefs.show_line_numbers = !self.prefs.show_line_numbers;
                self.save_preferences();
            }
            Action::ToggleWordWrap => {
                self.prefs.word_wrap = !self.prefs.word_wrap;
                self.save_preferences();
                self.scroll_top = 0;
            }
            Action::Quit => self.confirm_if_modified(ConfirmAction::Quit),
        }
    }

    fn confirm_if_modified(&mut self, action: ConfirmAction) {
        if self.is_modified() {
            self.input_mode = InputMode::Confirm(action);
            return;
        }
        match action {
            ConfirmAction::Quit => self.should_quit = true,
            ConfirmAction::NewFile => self.new_file(),
            ConfirmAction::Open => self.start_prompt(InputMode::Open, String::new()),
        }
    }

    fn save_preferences(&mut self) {
        let Some(path) = &self.prefs_path else {
            return;
        };
        if let Err(err) = self.prefs.save(path) {
            tracing::warn!(path = %path.display(), error = %err, "failed to save preferences");
        }
    }

    // ---- editing ----

    fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        (anchor != self.cursor).then(|| (anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            return false;
        };
        self.execute(Command::Edit(EditCommand::Delete {
            start,
            length: end - start,
        }));
        self.cursor = start;
        self.anchor = None;
        true
    }

    fn insert_text(&mut self, text: &str) {
        self.delete_selection();
        self.anchor = None;
        let inserted = self.execute(Command::Edit(EditCommand::Insert {
            offset: self.cursor,
            text: text.to_string(),
        }));
        if inserted.is_some() {
            self.cursor += text.chars().count();
        }
    }

    fn backspace(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        let deleted = self.execute(Command::Edit(EditCommand::Delete {
            start: self.cursor - 1,
            length: 1,
        }));
        if deleted.is_some() {
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.delete_selection() || self.cursor >= self.char_count() {
            return;
        }
        self.execute(Command::Edit(EditCommand::Delete {
            start: self.cursor,
            length: 1,
        }));
    }

    fn indent(&mut self) {
        let (start, end) = self.selection().unwrap_or((self.cursor, self.cursor));
        if let Some(CommandResult::Caret(caret)) =
            self.execute(Command::Edit(EditCommand::InsertTab { start, end }))
        {
            self.cursor = caret;
            self.anchor = None;
        }
    }

    fn outdent(&mut self) {
        if let Some(CommandResult::Caret(caret)) = self.execute(Command::Edit(
            EditCommand::RemoveTab {
                caret: self.cursor,
            },
        )) {
            self.cursor = caret;
            self.anchor = None;
        }
    }

    fn history_step(&mut self, command: EditCommand) {
        if self.execute(Command::Edit(command)).is_some() {
            self.anchor = None;
            self.cursor = self.cursor.min(self.char_count());
        }
    }

    // ---- cursor movement ----

    fn move_to(&mut self, offset: usize, select: bool) {
        if select {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = offset;
    }

    fn move_vertical(&mut self, delta: isize, select: bool) {
        let content = self.content();
        let position = cursor_position(content, self.cursor);
        let last_line = line_count(content) - 1;
        let line = position.line.saturating_add_signed(delta).min(last_line);
        let offset = position_to_offset(content, Position::new(line, position.column));
        self.move_to(offset, select);
    }

    /// Offset of `column` on the caret's line (clamped to the line end).
    fn line_boundary(&self, column: usize) -> usize {
        let line = cursor_position(self.content(), self.cursor).line;
        position_to_offset(self.content(), Position::new(line, column))
    }

    fn page_size(&self) -> usize {
        self.viewport_height.max(1)
    }

    /// Wrap width in cells, or 0 when wrapping is off.
    fn wrap_width(&self) -> usize {
        if self.prefs.word_wrap {
            self.text_width
        } else {
            0
        }
    }

    fn gutter_width(&self) -> usize {
        if self.prefs.show_line_numbers {
            line_count(self.content()).to_string().len() + 1
        } else {
            0
        }
    }

    /// Visual row holding the caret. Equals the line index when wrapping is off.
    fn cursor_row(&self) -> usize {
        let content = self.content();
        let position = cursor_position(content, self.cursor);
        let width = self.wrap_width();
        if width == 0 {
            return position.line;
        }
        let mut row = 0;
        for line in content.split('\n').take(position.line) {
            row += wrap_starts(line, width).len();
        }
        let line = content.split('\n').nth(position.line).unwrap_or_default();
        row + wrap_starts(line, width).partition_point(|&start| start <= position.column) - 1
    }

    fn adjust_scroll(&mut self) {
        if self.viewport_height == 0 {
            return;
        }
        let row = self.cursor_row();
        if row < self.scroll_top {
            self.scroll_top = row;
        }
        if row >= self.scroll_top + self.viewport_height {
            self.scroll_top = row + 1 - self.viewport_height;
        }
    }

    // ---- search ----

    fn open_search(&mut self, mode: InputMode) {
        self.start_prompt(mode, self.find_text.clone());
        if !self.find_text.is_empty() {
            self.on_prompt_edit();
        }
    }

    fn select_current_match(&mut self) {
        match self.state.executor().current_match() {
            Some(found) => {
                self.anchor = Some(found.start);
                self.cursor = found.end;
            }
            None => {
                self.anchor = None;
                self.cursor = self.cursor.min(self.char_count());
            }
        }
    }

    fn find(&mut self, command: SearchCommand) {
        if self.find_text.is_empty() {
            self.open_search(InputMode::Find);
            return;
        }
        if self.execute(Command::Search(command)).is_some() {
            self.select_current_match();
        }
    }

    fn replace(&mut self, command: SearchCommand) {
        if self.find_text.is_empty() {
            self.open_search(InputMode::ReplaceFind);
            return;
        }
        if self.execute(Command::Search(command)).is_some() {
            self.select_current_match();
        }
    }

    fn update_search_options(&mut self, update: impl FnOnce(&mut SearchOptions)) {
        let mut options = self.state.get_search_state().options;
        update(&mut options);
        self.execute(Command::Search(SearchCommand::SetOptions { options }));
        self.select_current_match();
        self.message = Some(search_options_label(options));
    }

    fn close_search(&mut self) {
        self.execute(Command::Search(SearchCommand::Close));
        self.anchor = None;
    }

    // ---- files ----

    fn reset_view(&mut self) {
        self.cursor = 0;
        self.anchor = None;
        self.scroll_top = 0;
    }

    fn new_file(&mut self) {
        if self.execute(Command::File(FileCommand::New)).is_some() {
            self.file_path = None;
            self.reset_view();
        }
    }

    fn open_file(&mut self, path: PathBuf) {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to read file");
                self.message = Some(format!("{}: {err}", self.t("error.fileRead")));
                return;
            }
        };

        let (content, bom_encoding) = decode(&bytes);
        let loaded = self.execute(Command::File(FileCommand::Load {
            file_name: file_name_of(&path),
            content,
        }));
        if loaded.is_none() {
            return;
        }
        // Without a BOM the bytes were decoded as UTF-8.
        let encoding = bom_encoding.unwrap_or(Encoding::Utf8);
        self.execute(Command::File(FileCommand::SetEncoding { encoding }));
        tracing::info!(path = %path.display(), bytes = bytes.len(), "opened file");
        self.file_path = Some(path);
        self.reset_view();
    }

    /// Open `path`, or start an empty document that will be saved there.
    fn open_or_create(&mut self, path: PathBuf) {
        if path.exists() {
            self.open_file(path);
            return;
        }
        let loaded = self.execute(Command::File(FileCommand::Load {
            file_name: file_name_of(&path),
            content: String::new(),
        }));
        if loaded.is_some() {
            self.file_path = Some(path);
            self.reset_view();
        }
    }

    /// Save to `path`, or to the current file. Asks for a name if there is neither.
    fn save(&mut self, path: Option<PathBuf>) {
        let Some(path) = path.or_else(|| self.file_path.clone()) else {
            self.start_prompt(InputMode::SaveAs, String::new());
            return;
        };

        let prepared = self.execute(Command::File(FileCommand::PrepareSave {
            file_name: Some(file_name_of(&path)),
            encoding: None,
            line_ending: None,
        }));
        let Some(CommandResult::SaveReady { text, encoding, .. }) = prepared else {
            return;
        };

        let written = encoding
            .encode(&text)
            .map_err(|err| err.to_string())
            .and_then(|bytes| fs::write(&path, bytes).map_err(|err| err.to_string()));
        match written {
            Ok(()) => {
                self.execute(Command::File(FileCommand::MarkSaved));
                tracing::info!(path = %path.display(), %encoding, "saved file");
                self.file_path = Some(path);
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to save file");
                self.message = Some(format!("{}: {err}", self.t("error.fileSave")));
            }
        }
    }

    // ---- rendering ----

    fn editor_style(&self) -> Style {
        if self.prefs.dark_mode {
            Style::default().bg(Color::Black).fg(Color::Gray)
        } else {
            Style::default().bg(Color::White).fg(Color::Black)
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.viewport_height = chunks[0].height.saturating_sub(2) as usize;
        self.text_width = (chunks[0].width.saturating_sub(2) as usize).saturating_sub(self.gutter_width());
        self.adjust_scroll();

        self.render_editor(frame, chunks[0]);
        self.render_status_line(frame, chunks[1]);
        self.render_shortcuts(frame, chunks[2]);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let content = self.content();
        let base = self.editor_style();
        let selected = base.add_modifier(Modifier::REVERSED);
        let gutter_style = base.fg(Color::DarkGray);
        let selection = self.selection();
        let gutter_width = self.gutter_width();
        let width = self.wrap_width();
        let caret = cursor_position(content, self.cursor);
        let bottom = self.scroll_top + self.viewport_height;

        let mut display_lines = Vec::with_capacity(self.viewport_height);
        // (cell x, visible row) of the caret
        let mut caret_cell = None;
        let mut row = 0;
        let mut line_start = 0;
        for (idx, line) in content.split('\n').enumerate() {
            if row >= bottom {
                break;
            }
            let chars: Vec<char> = line.chars().collect();
            let starts = wrap_starts(line, width);
            let mut x_in_line = 0;
            for (segment, &seg_start) in starts.iter().enumerate() {
                let seg_end = starts.get(segment + 1).copied().unwrap_or(chars.len());
                let visible = row >= self.scroll_top && row < bottom;
                let is_last = segment + 1 == starts.len();

                let mut spans = Vec::new();
                if gutter_width > 0 {
                    let number = if segment == 0 {
                        (idx + 1).to_string()
                    } else {
                        String::new()
                    };
                    spans.push(Span::styled(
                        format!("{number:>width$} ", width = gutter_width - 1),
                        gutter_style,
                    ));
                }

                let mut run = String::new();
                let mut run_selected = false;
                let mut x = 0;
                for (col, &ch) in chars.iter().enumerate().take(seg_end).skip(seg_start) {
                    if visible && idx == caret.line && col == caret.column {
                        caret_cell = Some((x, row - self.scroll_top));
                    }
                    let offset = line_start + col;
                    let is_selected =
                        selection.is_some_and(|(start, end)| offset >= start && offset < end);
                    if is_selected != run_selected && !run.is_empty() {
                        let style = if run_selected { selected } else { base };
                        spans.push(Span::styled(std::mem::take(&mut run), style));
                    }
                    run_selected = is_selected;

                    let ch_width = char_width(ch, x_in_line);
                    if ch == '\t' {
                        run.extend(std::iter::repeat_n(' ', ch_width));
                    } else {
                        run.push(ch);
                    }
                    x += ch_width;
                    x_in_line += ch_width;
                }
                if visible && is_last && idx == caret.line && caret.column >= seg_end {
                    caret_cell = Some((x, row - self.scroll_top));
                }
                if !run.is_empty() {
                    spans.push(Span::styled(run, if run_selected { selected } else { base }));
                }
                if visible {
                    display_lines.push(Line::from(spans));
                }
                row += 1;
            }
            line_start += chars.len() + 1;
        }

        let title = self
            .state
            .title(&self.t("app.title"), &self.t("file.defaultName"));
        let editor = Paragraph::new(display_lines).style(base).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(base),
        );
        frame.render_widget(editor, area);

        if self.input_mode != InputMode::Normal {
            return;
        }
        let Some((x, y)) = caret_cell else {
            return;
        };
        let cursor_x = area.x as usize + 1 + gutter_width + x;
        let cursor_y = area.y as usize + 1 + y;
        if cursor_x < (area.x + area.width).saturating_sub(1) as usize {
            frame.set_cursor_position((cursor_x as u16, cursor_y as u16));
        }
    }

    fn status_text(&self) -> String {
        let status = self.state.get_status_message();
        let params: Vec<(&str, &str)> = status
            .params
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        self.translator.t(status.key, &params)
    }

    fn prompt_label(&self) -> Option<String> {
        let options = search_options_label(self.state.get_search_state().options);
        let label = match self.input_mode {
            InputMode::Normal => return None,
            InputMode::Find => format!("{} {options}", self.t("search.placeholder")),
            InputMode::ReplaceFind => format!(
                "{}: {} {options}",
                self.t("search.replace"),
                self.t("search.placeholder")
            ),
            InputMode::ReplaceWith => format!(
                "{}: {}",
                self.t("search.replace"),
                self.t("search.replacePlaceholder")
            ),
            InputMode::Open => self.t("file.openPrompt"),
            InputMode::SaveAs => self.t("saveAs.filename"),
            InputMode::Confirm(action) => format!("{} (y/n)", self.t(action.message_key())),
        };
        Some(label)
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let style = Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        if let Some(label) = self.prompt_label() {
            let text = match self.input_mode {
                InputMode::Confirm(_) => label,
                _ => format!("{label} > {}", self.input_buffer),
            };
            let cursor_x = area.x as usize
                + text
                    .chars()
                    .map(|ch| ch.width().unwrap_or(0))
                    .sum::<usize>();
            frame.render_widget(Paragraph::new(text).style(style), area);
            if cursor_x < (area.x + area.width) as usize {
                frame.set_cursor_position((cursor_x as u16, area.y));
            }
            return;
        }

        let doc_state = self.state.get_document_state();
        let position = cursor_position(self.content(), self.cursor);
        let (count_key, count) = match self.selection() {
            Some((start, end)) => ("position.selected", end - start),
            None => ("position.characters", doc_state.char_count),
        };
        let count = self
            .translator
            .t(count_key, &[("count", count.to_string().as_str())]);
        let left = self.message.clone().unwrap_or_else(|| self.status_text());
        let right = format!(
            "{} {}, {} {} | {} | {} | {} ",
            self.t("position.line"),
            position.line + 1,
            self.t("position.column"),
            position.column + 1,
            count,
            doc_state.encoding,
            doc_state.line_ending,
        );

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(right.chars().count() as u16)])
            .split(area);
        frame.render_widget(Paragraph::new(format!(" {left}")).style(style), chunks[0]);
        frame.render_widget(Paragraph::new(right).style(style), chunks[1]);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = match self.input_mode {
            InputMode::Confirm(_) => "y / n".to_string(),
            _ => self.t("tui.help"),
        };
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

fn search_options_label(options: SearchOptions) -> String {
    let case = if options.case_sensitive { "Aa" } else { "aa" };
    let word = if options.whole_word { "W" } else { "-" };
    format!("[{case} {word}]")
}

fn init_logging() {
    let Some(path) = env::var_os("NOTEPAD_LOG") else {
        return;
    };
    let file = match fs::File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("cannot open log file {}: {err}", PathBuf::from(path).display());
            return;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> io::Result<()> {
    init_logging();

    let prefs_path = preferences_path();
    let prefs = match &prefs_path {
        Some(path) => Preferences::load_or_default(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "ignoring preferences");
            Preferences::default()
        }),
        None => Preferences::default(),
    };

    let system_locale = env::var("LC_ALL")
        .or_else(|_| env::var("LANG"))
        .ok();
    let language = resolve_language(prefs.language.as_deref(), system_locale.as_deref());
    let translator = Translator::new(language).map_err(io::Error::other)?;

    let mut app = App::new(translator, prefs, prefs_path);
    if let Some(path) = env::args_os().nth(1) {
        app.open_or_create(PathBuf::from(path));
    }

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.state.tick(Instant::now());
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        let timeout = app
            .state
            .next_deadline()
            .map_or(IDLE_POLL, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            })
            .min(IDLE_POLL);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => {
                    app.message = None;
                    app.insert_text(&LineEnding::normalize(&text));
                    app.adjust_scroll();
                }
                _ => {}
            }
        }
    }

    Ok(())
}
