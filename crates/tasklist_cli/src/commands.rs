//! Subcommands and their execution against a store.

use crate::console::{render_list, render_stats, ConsoleNotifier};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use tasklist_core::{
    NewTask, Notification, Notifier, Task, TaskFilter, TaskId, TaskRepository, TaskStore,
    TaskUpdate,
};

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Add a new task
    Add {
        title: String,
        #[arg(long, short = 'd')]
        description: Option<String>,
    },
    /// List tasks
    List {
        /// all|active|completed
        #[arg(long, short = 'f', default_value = "all")]
        filter: TaskFilter,
    },
    /// Flip a task between active and completed
    Toggle { id: String },
    /// Change title, description or completion of a task
    Edit {
        id: String,
        #[arg(long, short = 't')]
        title: Option<String>,
        /// Empty string clears the description
        #[arg(long, short = 'd')]
        description: Option<String>,
        #[arg(long, conflicts_with = "undone")]
        done: bool,
        #[arg(long)]
        undone: bool,
    },
    /// Delete a task
    Remove { id: String },
    /// Undo the last delete of this shell session
    ///
    /// Only meaningful inside `shell`; a one-shot process has no earlier delete.
    Undo,
    /// Delete all completed tasks
    ClearCompleted,
    /// Show task counts
    Stats,
    /// Read commands from stdin against one open store
    Shell,
}

/// Result of one command from the driver's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The store rejected the operation; a notification was already printed.
    Failed,
    Exit,
}

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

type Store<R> = TaskStore<R, ConsoleNotifier>;

pub fn execute<R: TaskRepository>(store: &mut Store<R>, command: Command) -> Result<Outcome> {
    let result = match command {
        Command::Add { title, description } => {
            let mut data = NewTask::new(title);
            data.description = description;
            store.add(&data).map(|_| ())
        }
        Command::List { filter } => {
            store.set_filter(filter);
            print!(
                "{}",
                render_list(&store.visible_tasks(), store.filter(), store.stats())
            );
            Ok(())
        }
        Command::Toggle { id } => {
            let id = resolve_id(store.tasks(), &id)?;
            store.toggle(id).map(|_| ())
        }
        Command::Edit {
            id,
            title,
            description,
            done,
            undone,
        } => {
            let id = resolve_id(store.tasks(), &id)?;
            let updates = TaskUpdate {
                title,
                description,
                completed: match (done, undone) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            store.edit(id, &updates).map(|_| ())
        }
        Command::Remove { id } => {
            let id = resolve_id(store.tasks(), &id)?;
            store.remove(id).map(|_| ())
        }
        Command::Undo => match store.notifier().last_action().cloned() {
            Some(action) => {
                let restored = store.trigger(&action);
                // A failed restore keeps the action so the undo can be retried.
                if restored.is_ok() {
                    store.notifier_mut().clear_last_action();
                }
                restored.map(|_| ())
            }
            None => {
                store
                    .notifier_mut()
                    .notify(Notification::info("Nothing to undo"));
                Ok(())
            }
        },
        Command::ClearCompleted => store.clear_completed().map(|_| ()),
        Command::Stats => {
            println!("{}", render_stats(store.stats()));
            Ok(())
        }
        Command::Shell => bail!("already inside a shell"),
    };

    Ok(match result {
        Ok(()) => Outcome::Done,
        Err(_) => Outcome::Failed,
    })
}

pub fn run_shell<R: TaskRepository>(store: &mut Store<R>) -> Result<Outcome> {
    let stdin = io::stdin();
    let mut last = Outcome::Done;
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let words = split_line(&line);
        if words.iter().take(1).any(|word| word == "exit" || word == "quit") {
            return Ok(Outcome::Exit);
        }
        if !words.is_empty() {
            match ShellLine::try_parse_from(words) {
                Ok(parsed) => match execute(store, parsed.command) {
                    Ok(outcome) => last = outcome,
                    Err(err) => eprintln!("error: {err:#}"),
                },
                Err(err) => {
                    let _ = err.print();
                }
            }
        }
        prompt()?;
    }
    Ok(last)
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "tasklist> ")?;
    stdout.flush()
}

/// Resolves a full id or a unique prefix of its hex form.
pub fn resolve_id(tasks: &[Task], input: &str) -> Result<TaskId> {
    let needle = input.trim().to_ascii_lowercase().replace('-', "");
    if needle.is_empty() {
        bail!("task id must not be empty");
    }

    let mut matches = tasks
        .iter()
        .filter(|task| task.id.simple().to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id),
        (Some(_), Some(_)) => bail!("task id `{input}` is ambiguous"),
        (None, _) => bail!("no task matches id `{input}`"),
    }
}

/// Splits a shell line on whitespace, keeping double-quoted runs together.
fn split_line(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut has_word = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                has_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }
    if has_word {
        words.push(current);
    }
    words
}
