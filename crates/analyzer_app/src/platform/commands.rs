use analyzer_core::RecordId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the given url, or the current input when none is given.
    Analyze(Option<String>),
    Input(String),
    Cancel,
    Reanalyze(RecordId),
    CancelReanalysis(RecordId),
    Delete(RecordId),
    List,
    Show(RecordId),
    ClearError,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs a record id")]
    MissingId(String),
    #[error("invalid record id '{0}'")]
    InvalidId(String),
}

pub const HELP: &str = "\
commands:
  analyze [url]      analyze url (or the current input)
  input <text>       set the url input
  cancel             stop the running analysis
  reanalyze <id>     re-run the analysis of a record
  stop <id>          stop the re-analysis of a record
  delete <id>        delete a record
  list               show all records
  show <id>          show record details
  clear              dismiss the current error
  help               show this help
  quit               exit";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "analyze" | "a" => Command::Analyze((!rest.is_empty()).then(|| rest.to_string())),
        "input" => Command::Input(rest.to_string()),
        "cancel" => Command::Cancel,
        "reanalyze" | "r" => Command::Reanalyze(record_id(word, rest)?),
        "stop" => Command::CancelReanalysis(record_id(word, rest)?),
        "delete" | "rm" => Command::Delete(record_id(word, rest)?),
        "list" | "ls" => Command::List,
        "show" => Command::Show(record_id(word, rest)?),
        "clear" => Command::ClearError,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn record_id(word: &str, rest: &str) -> Result<RecordId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingId(word.to_string()));
    }
    rest.parse()
        .map_err(|_| CommandError::InvalidId(rest.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse("analyze https://a.test").unwrap(),
            Some(Command::Analyze(Some("https://a.test".into())))
        );
        assert_eq!(parse("  analyze ").unwrap(), Some(Command::Analyze(None)));
        assert_eq!(parse("reanalyze 7").unwrap(), Some(Command::Reanalyze(7)));
        assert_eq!(parse("DELETE 3").unwrap(), Some(Command::Delete(3)));
        assert_eq!(parse("stop 2").unwrap(), Some(Command::CancelReanalysis(2)));
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn reports_bad_ids_and_unknown_words() {
        assert_eq!(
            parse("show").unwrap_err(),
            CommandError::MissingId("show".into())
        );
        assert_eq!(
            parse("delete seven").unwrap_err(),
            CommandError::InvalidId("seven".into())
        );
        assert_eq!(
            parse("frobnicate").unwrap_err(),
            CommandError::Unknown("frobnicate".into())
        );
    }
}
