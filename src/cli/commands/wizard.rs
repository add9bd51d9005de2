use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::flows::FlowKind;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "flow",
            "List flows or switch the active one",
            "flow [client|worker]",
            cmd_flow,
        ),
        CommandEntry::new("show", "Render the current step", "show", cmd_show)
            .with_aliases(&["ver"]),
        CommandEntry::new(
            "set",
            "Type a value into a text input",
            "set <id> <value...>",
            cmd_set,
        ),
        CommandEntry::new(
            "pick",
            "Select a radio option",
            "pick <group> <option>",
            cmd_pick,
        ),
        CommandEntry::new(
            "check",
            "Tick a checkbox option",
            "check <group> <option>",
            cmd_check,
        ),
        CommandEntry::new(
            "uncheck",
            "Untick a checkbox option",
            "uncheck <group> <option>",
            cmd_uncheck,
        ),
        CommandEntry::new(
            "next",
            "Validate the current step and advance",
            "next",
            cmd_next,
        )
        .with_aliases(&["siguiente"]),
        CommandEntry::new("prev", "Go back one step", "prev", cmd_prev)
            .with_aliases(&["atras"]),
        CommandEntry::new(
            "submit",
            "Validate the last step and send the form",
            "submit",
            cmd_submit,
        )
        .with_aliases(&["enviar"]),
        CommandEntry::new(
            "summary",
            "Show the collected answers, or the submitted form as JSON",
            "summary [json]",
            cmd_summary,
        )
        .with_aliases(&["resumen"]),
        CommandEntry::new(
            "fill",
            "Answer the current step with prompts",
            "fill",
            cmd_fill,
        ),
        CommandEntry::new(
            "reset",
            "Start the active flow over",
            "reset",
            cmd_reset,
        ),
    ]
}

fn cmd_flow(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        context.list_flows();
        return Ok(());
    };
    let kind: FlowKind = name.parse().map_err(CommandError::InvalidArguments)?;
    context.switch_flow(kind)
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.show_active()
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((id, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments("usage: set <id> <value...>".into()));
    };
    context.set_text(id, &rest.join(" "))
}

fn group_and_option<'a>(args: &[&'a str], usage: &str) -> Result<(&'a str, String), CommandError> {
    match args {
        [group, option @ ..] if !option.is_empty() => Ok((*group, option.join(" "))),
        _ => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

fn cmd_pick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, option) = group_and_option(args, "pick <group> <option>")?;
    context.pick(group, &option)
}

fn cmd_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, option) = group_and_option(args, "check <group> <option>")?;
    context.check(group, &option, true)
}

fn cmd_uncheck(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, option) = group_and_option(args, "uncheck <group> <option>")?;
    context.check(group, &option, false)
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.advance()
}

fn cmd_prev(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.retreat()
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.submit()
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => context.show_summary(),
        Some(format) if format.eq_ignore_ascii_case("json") => context.show_report_json(),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown summary format `{other}`; usage: summary [json]"
        ))),
    }
}

fn cmd_fill(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.fill()
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.reset()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_may_contain_spaces() {
        let (group, option) =
            group_and_option(&["cl-ocasion", "Evento", "formal"], "pick").expect("parsed");
        assert_eq!(group, "cl-ocasion");
        assert_eq!(option, "Evento formal");
        assert!(group_and_option(&["cl-ocasion"], "pick").is_err());
    }
}
