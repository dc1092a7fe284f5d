//! Operator console: line parsing and the stdin reader thread.

use std::io::BufRead;
use std::path::PathBuf;
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use crate::station::StationEvent;

pub const HELP: &str = "\
commands:
  <code>            record a code typed by hand
  ::<code>          record a hand-typed code that starts with ':'
  :scan <text>      inject a decoder read
  :list             show the full inventory
  :summary          show pending/found counts
  :export [path]    write the inventory (.xlsx workbook, otherwise CSV)
  :reset            clear all progress (asks for confirmation)
  :help             show this help
  :quit             leave the station";

/// One console line, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationCommand {
    /// Anything not starting with `:` is a hand-typed code (possibly blank);
    /// a leading `::` stands for a literal `:`.
    Manual(String),
    Scan(String),
    List,
    Summary,
    Export(Option<PathBuf>),
    Reset { confirmed: bool },
    Help,
    Quit,
    Unknown(String),
}

impl StationCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if let Some(literal) = trimmed.strip_prefix("::") {
            return StationCommand::Manual(format!(":{literal}"));
        }
        let Some(rest) = trimmed.strip_prefix(':') else {
            return StationCommand::Manual(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "scan" => StationCommand::Scan(arg.to_string()),
            "list" | "ls" => StationCommand::List,
            "summary" => StationCommand::Summary,
            "export" if arg.is_empty() => StationCommand::Export(None),
            "export" => StationCommand::Export(Some(PathBuf::from(arg))),
            "reset" => StationCommand::Reset {
                confirmed: arg.eq_ignore_ascii_case("yes"),
            },
            "help" | "?" => StationCommand::Help,
            "quit" | "exit" | "q" => StationCommand::Quit,
            _ => StationCommand::Unknown(trimmed.to_string()),
        }
    }
}

/// Forward every console line onto the station queue, then `InputClosed`.
///
/// Runs on a plain thread: a blocked console read must never hold up runtime
/// shutdown.
pub fn spawn_reader<R>(reader: R, tx: mpsc::Sender<StationEvent>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(StationEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "console read failed");
                    break;
                }
            }
        }
        let _ = tx.blocking_send(StationEvent::InputClosed);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_manual_entry() {
        assert_eq!(StationCommand::parse(" b1000001 "), StationCommand::Manual(" b1000001 ".to_string()));
        assert_eq!(StationCommand::parse(""), StationCommand::Manual(String::new()));
    }

    #[test]
    fn double_colon_escapes_a_leading_colon() {
        assert_eq!(StationCommand::parse("::B100"), StationCommand::Manual(":B100".to_string()));
        assert_eq!(StationCommand::parse("  ::list "), StationCommand::Manual(":list".to_string()));
    }

    #[test]
    fn colon_commands() {
        assert_eq!(StationCommand::parse(":scan B1000001"), StationCommand::Scan("B1000001".to_string()));
        assert_eq!(StationCommand::parse(":LIST"), StationCommand::List);
        assert_eq!(StationCommand::parse(":summary"), StationCommand::Summary);
        assert_eq!(StationCommand::parse(":export"), StationCommand::Export(None));
        assert_eq!(
            StationCommand::parse(":export  /tmp/out.csv "),
            StationCommand::Export(Some(PathBuf::from("/tmp/out.csv")))
        );
        assert_eq!(StationCommand::parse(":reset"), StationCommand::Reset { confirmed: false });
        assert_eq!(StationCommand::parse(":reset YES"), StationCommand::Reset { confirmed: true });
        assert_eq!(StationCommand::parse(":help"), StationCommand::Help);
        assert_eq!(StationCommand::parse(":quit"), StationCommand::Quit);
        assert_eq!(StationCommand::parse(":frobnicate"), StationCommand::Unknown(":frobnicate".to_string()));
    }

    #[tokio::test]
    async fn reader_forwards_lines_then_closes() {
        let (tx, mut rx) = mpsc::channel(8);

        spawn_reader(std::io::Cursor::new("B1000001\n:list\n"), tx);

        assert_eq!(rx.recv().await, Some(StationEvent::Input("B1000001".to_string())));
        assert_eq!(rx.recv().await, Some(StationEvent::Input(":list".to_string())));
        assert_eq!(rx.recv().await, Some(StationEvent::InputClosed));
    }
}
