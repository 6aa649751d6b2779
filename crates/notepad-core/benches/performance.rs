use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use notepad_core::{
    Command, CommandExecutor, EditCommand, EditHistory, FileCommand, LineEnding, SearchCommand,
    SearchEngine,
};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (notepad benchmark line)\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty line.
    out.pop();
    out
}

fn loaded_executor(text: &str) -> CommandExecutor {
    let mut executor = CommandExecutor::new();
    executor
        .execute(Command::File(FileCommand::Load {
            file_name: "bench.txt".to_string(),
            content: text.to_string(),
        }))
        .unwrap();
    executor
}

fn bench_search_large_file(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("search/50k_lines_fox", |b| {
        b.iter(|| {
            let mut engine = SearchEngine::new();
            black_box(engine.search(black_box(&text), "fox"));
        })
    });
}

fn bench_replace_all(c: &mut Criterion) {
    let text = large_text(10_000);
    c.bench_function("replace_all/10k_lines", |b| {
        b.iter_batched(
            || {
                let mut executor = loaded_executor(&text);
                executor
                    .execute(Command::Search(SearchCommand::Search {
                        term: "lazy".to_string(),
                    }))
                    .unwrap();
                executor
            },
            |mut executor| {
                let result = executor
                    .execute(Command::Search(SearchCommand::ReplaceAll {
                        replacement: "sleepy".to_string(),
                    }))
                    .unwrap();
                black_box(result);
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_history_commits(c: &mut Criterion) {
    let text = large_text(1_000);
    c.bench_function("history/150_commits_1k_lines", |b| {
        b.iter(|| {
            let mut history = EditHistory::new();
            let mut content = text.clone();
            for i in 0..150 {
                content.push_str(&i.to_string());
                history.commit(&content);
            }
            black_box(history.undo_depth());
        })
    });
}

fn bench_typing_with_commits(c: &mut Criterion) {
    let text = large_text(5_000);
    c.bench_function("typing/100_inserts_with_commit", |b| {
        b.iter_batched(
            || loaded_executor(&text),
            |mut executor| {
                let mut offset = executor.document().char_count() / 2;
                for _ in 0..100 {
                    executor
                        .execute(Command::Edit(EditCommand::Insert {
                            offset,
                            text: "x".to_string(),
                        }))
                        .unwrap();
                    executor
                        .execute(Command::Edit(EditCommand::Commit))
                        .unwrap();
                    offset += 1;
                }
                black_box(executor.history().undo_depth());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_line_ending_conversion(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("line_ending/50k_lines_to_crlf", |b| {
        b.iter(|| black_box(LineEnding::Crlf.apply_to_text(black_box(&text))))
    });
}

criterion_group!(
    benches,
    bench_search_large_file,
    bench_replace_all,
    bench_history_commits,
    bench_typing_with_commits,
    bench_line_ending_conversion
);
criterion_main!(benches);
