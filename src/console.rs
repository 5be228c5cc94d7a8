use std::io::{BufRead, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::controllers;
use crate::models::FIELD_NAMES;
use crate::page::Page;
use crate::state::SharedState;
use crate::views::table::{RenderedTable, refresh_table};

/// A `Page` for terminals: the table prints as text, alerts go to stderr
/// and confirmations read a y/N answer from stdin.
pub struct ConsolePage;

impl Page for ConsolePage {
    fn replace_table(&self, table: &RenderedTable) {
        if table.rows.is_empty() {
            println!("(no submissions)");
            return;
        }
        for row in &table.rows {
            println!(
                "{:>3}  #{:<5} {:<10}  {} / {}  {}  {}  [{}]",
                row.index,
                row.id,
                row.submission_date,
                row.recruiter_firm,
                row.client_name,
                row.position,
                row.recruiter_name,
                row.recruiter_contact,
            );
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        let answer = tokio::task::block_in_place(|| {
            print!("{message} [y/N] ");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).map(|_| line)
        });
        matches!(
            answer.as_deref().map(str::trim),
            Ok("y") | Ok("Y") | Ok("yes")
        )
    }

    fn hide_modal(&self) {}

    fn set_modal_title(&self, title: &str) {
        println!("== {title} ==");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    New,
    Set { field: String, value: String },
    Show,
    Edit(i64),
    Save,
    Delete(i64),
    Cancel,
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search <text>        filter the table (debounced)
  new                  start a new submission
  set <field> <value>  set a form field
  show                 print the form
  edit <id>            load a row into the form
  save                 submit the form
  delete <id>          delete a row
  cancel               close the form
  refresh              reload the table
  quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let cmd = match word {
            "search" => Command::Search(rest.to_string()),
            "new" => Command::New,
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None if !rest.is_empty() => (rest, ""),
                    None => return Err("usage: set <field> <value>".to_string()),
                };
                Command::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                }
            }
            "show" => Command::Show,
            "edit" => Command::Edit(parse_id(rest)?),
            "save" => Command::Save,
            "delete" => Command::Delete(parse_id(rest)?),
            "cancel" => Command::Cancel,
            "refresh" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err(String::new()),
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(cmd)
    }
}

fn parse_id(text: &str) -> Result<i64, String> {
    text.parse()
        .map_err(|_| format!("expected a numeric id, got {text:?}"))
}

/// Read commands from `input` until EOF, `quit` or `shutdown` resolves.
/// Any pending debounced search is cancelled on the way out.
pub async fn run_console<R, S>(state: &SharedState, input: R, shutdown: S) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut shutdown => {
                tracing::info!("Interrupted");
                break;
            }
        };

        let Some(line) = line else {
            break;
        };

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(cmd) => dispatch(state, cmd).await,
            Err(msg) if msg.is_empty() => {}
            Err(msg) => eprintln!("{msg}"),
        }
    }

    state.search.cancel_pending();
    Ok(())
}

async fn dispatch(state: &SharedState, cmd: Command) {
    match cmd {
        Command::Search(text) => controllers::on_search_input(state, &text),
        Command::New => controllers::reset_form(state),
        Command::Set { field, value } => {
            if let Err(e) = controllers::set_field(state, &field, &value) {
                eprintln!("{e}");
            }
        }
        Command::Show => {
            let form = state.form.lock().unwrap_or_else(|e| e.into_inner()).clone();
            match form.mode() {
                Ok(mode) => println!("-> {}", mode.target_path()),
                Err(e) => println!("-> {e}"),
            }
            for name in FIELD_NAMES {
                println!("  {name:<18} {}", form.values.get(name).unwrap_or_default());
            }
        }
        Command::Edit(id) => {
            let _ = controllers::edit_row(state, id);
        }
        Command::Save => {
            if let Ok(false) = controllers::submit_form(state).await {
                eprintln!("! A submission is already in progress");
            }
        }
        Command::Delete(id) => {
            let _ = controllers::delete_submission(state, id).await;
        }
        Command::Cancel => controllers::close_modal(state),
        Command::Refresh => refresh_table(state).await,
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}
