use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead, StdinLock},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliMode, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::errors::CliError;

/// Selects script mode: commands are read from stdin without prompts.
pub const SCRIPT_ENV: &str = "STEPPER_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    tracing::debug!(?mode, "shell started");

    match mode {
        CliMode::Interactive => {
            context.show_active().or_else(|err| context.report_error(err))?;
            let mut reader = EditorReader::new(&context)?;
            drive(&mut context, &mut reader)
        }
        CliMode::Script => {
            let mut reader = ScriptReader {
                lines: io::stdin().lock(),
            };
            drive(&mut context, &mut reader)
        }
    }
}

/// What a reader produced for one prompt.
enum Input {
    Line(String),
    Interrupted,
    Closed,
}

trait LineReader {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError>;
}

struct EditorReader {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl EditorReader {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        let helper = CommandHelper::new(context.command_names(), context.argument_words());
        editor.set_helper(Some(helper));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineReader for EditorReader {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    self.editor.add_history_entry(trimmed).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                Ok(Input::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Stdin without prompts or history.
struct ScriptReader {
    lines: StdinLock<'static>,
}

impl LineReader for ScriptReader {
    fn read(&mut self, _prompt: &str) -> Result<Input, CliError> {
        let mut line = String::new();
        if self.lines.read_line(&mut line)? == 0 {
            return Ok(Input::Closed);
        }
        Ok(Input::Line(line))
    }
}

fn drive(context: &mut ShellContext, reader: &mut dyn LineReader) -> Result<(), CliError> {
    while context.running {
        let prompt = context.prompt();
        match reader.read(&prompt)? {
            Input::Line(line) if line.trim().is_empty() => {}
            Input::Line(line) => match context.handle_line(&line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err)?,
            },
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => break,
        }
    }
    Ok(())
}

/// Completes command names in first position, then flow names, input ids
/// and group names.
struct CommandHelper {
    commands: Vec<String>,
    arguments: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>, mut arguments: Vec<String>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        arguments.sort();
        arguments.dedup();
        Self {
            commands,
            arguments,
        }
    }

    fn matching(words: &[String], needle: &str) -> Vec<Pair> {
        words
            .iter()
            .filter(|word| word.starts_with(needle))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let needle = prefix[start..].to_ascii_lowercase();
        let position = prefix[..start].split_whitespace().count();
        let candidates = match position {
            0 => Self::matching(&self.commands, &needle),
            1 => Self::matching(&self.arguments, &needle),
            _ => Vec::new(),
        };
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
