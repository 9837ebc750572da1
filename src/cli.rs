use std::io::{self, BufRead, Write};
use std::net::SocketAddr;

use clap::{Parser, Subcommand};

use crate::finder::Finder;
use crate::render::terminal::{format_findings, format_query};

const QUESTION_PROMPT: &str = "Enter your query (e.g., 'RL experts in California'): ";
const COUNT_PROMPT: &str = "Enter the number of experts you'd like to see: ";

#[derive(Debug, Parser)]
#[command(name = "expert-finder", version, about = "Find individual experts on the web")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one search in the terminal; prompts for anything not given
    Ask {
        /// Free-text question, e.g. "Reinforcement Learning experts in Amsterdam"
        question: Option<String>,
        /// Number of search results to inspect
        #[arg(short = 'n', long)]
        num_results: Option<u32>,
    },
    /// Serve the search form over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8501")]
        addr: SocketAddr,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("expected a whole number of experts, got '{0}'")]
    InvalidCount(String),

    #[error("input closed before a {0} was entered")]
    Eof(&'static str),
}

/// Fills in whatever the command line left out by prompting on `output` and reading `input`.
pub fn resolve_inputs(
    question: Option<String>,
    num_results: Option<u32>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<(String, u32), InputError> {
    let question = match question {
        Some(q) => q,
        None => prompt(QUESTION_PROMPT, "query", input, output)?,
    };
    let num_results = match num_results {
        Some(n) => n,
        None => {
            let raw = prompt(COUNT_PROMPT, "number", input, output)?;
            raw.parse().map_err(|_| InputError::InvalidCount(raw))?
        }
    };
    Ok((question, num_results))
}

fn prompt(
    text: &str,
    what: &'static str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<String, InputError> {
    output.write_all(text.as_bytes())?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(InputError::Eof(what));
    }
    Ok(line.trim().to_string())
}

pub async fn ask(
    finder: &Finder,
    question: Option<String>,
    num_results: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (question, num_results) = {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        resolve_inputs(question, num_results, &mut stdin.lock(), &mut stdout)?
    };

    let found = finder.run(&question, num_results).await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(format_query(&found.query).as_bytes())?;
    stdout.write_all(format_findings(&found.findings).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn arguments_skip_prompts() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        let (q, n) = resolve_inputs(
            Some("RL experts in Amsterdam".into()),
            Some(3),
            &mut input,
            &mut output,
        )
        .unwrap();

        assert_eq!(q, "RL experts in Amsterdam");
        assert_eq!(n, 3);
        assert!(output.is_empty());
    }

    #[test]
    fn missing_values_are_prompted_for() {
        let mut input = Cursor::new("RL experts in California\n 4 \n");
        let mut output = Vec::new();

        let (q, n) = resolve_inputs(None, None, &mut input, &mut output).unwrap();

        assert_eq!(q, "RL experts in California");
        assert_eq!(n, 4);
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown, format!("{QUESTION_PROMPT}{COUNT_PROMPT}"));
    }

    #[test]
    fn non_numeric_count_is_rejected() {
        let mut input = Cursor::new("five\n");
        let mut output = Vec::new();

        let err = resolve_inputs(Some("q".into()), None, &mut input, &mut output).unwrap_err();
        assert!(matches!(err, InputError::InvalidCount(ref raw) if raw == "five"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        let err = resolve_inputs(None, Some(2), &mut input, &mut output).unwrap_err();
        assert!(matches!(err, InputError::Eof("query")));
    }

    #[test]
    fn parses_ask_with_count() {
        let cli = Cli::try_parse_from(["expert-finder", "ask", "RL experts", "-n", "3"]).unwrap();
        match cli.command {
            Command::Ask {
                question,
                num_results,
            } => {
                assert_eq!(question.as_deref(), Some("RL experts"));
                assert_eq!(num_results, Some(3));
            }
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn serve_defaults_to_local_port() {
        let cli = Cli::try_parse_from(["expert-finder", "serve"]).unwrap();
        match cli.command {
            Command::Serve { addr } => assert_eq!(addr.to_string(), "127.0.0.1:8501"),
            other => panic!("expected serve, got {other:?}"),
        }
    }
}
