use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "quote",
        "Show the discount tier for a subtotal",
        "quote <subtotal>",
        cmd_quote,
    )
    .with_aliases(&["cotizar"])]
}

fn cmd_quote(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: quote <subtotal>".into()));
    };
    context.quote(raw)
}
