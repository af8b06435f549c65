use clap::{Arg, ArgAction, ArgMatches, Command};

fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .long("verbose")
        .short('v')
        .help("Log debug output")
        .global(true)
        .action(ArgAction::SetTrue)
}

/// A top level command. Multicall roots take no arguments of their own, so
/// every command carries `--verbose` itself.
fn command(name: &'static str) -> Command {
    Command::new(name).arg(verbose_arg())
}

pub fn arg_parser() -> Command {
    Command::new("mentions")
        .about("Record book mentions")
        .multicall(true)
        .subcommand_required(true)
        .subcommand(command("login").about("Log in with an access token"))
        .subcommand(command("logout").about("Forget the cached access token"))
        .subcommand(
            command("add")
                .about("Add something (source)")
                .subcommand_required(true)
                .subcommand(
                    Command::new("source").about("Enter a new source").arg(
                        Arg::new("dry-run")
                            .long("dry-run")
                            .help("Show what would be written without writing it")
                            .action(ArgAction::SetTrue),
                    ),
                ),
        )
        .subcommand(
            command("find")
                .about("Search known records")
                .subcommand_required(true)
                .subcommand(
                    Command::new("book")
                        .about("Books matching a title and authors")
                        .arg(Arg::new("title").required(true))
                        .arg(
                            Arg::new("author")
                                .long("author")
                                .short('a')
                                .action(ArgAction::Append),
                        ),
                ),
        )
        .subcommand(
            command("check")
                .about("Whether a source URL is already recorded")
                .arg(Arg::new("url").required(true)),
        )
        .subcommand(
            command("covers")
                .about("Cover choices for a book")
                .arg(Arg::new("title").required(true))
                .arg(Arg::new("author").required(true)),
        )
        .subcommand(
            command("time")
                .about("Seconds in a timestamp such as 1:02:03")
                .arg(Arg::new("text").required(true)),
        )
        .subcommand(command("config").about("Print the default configuration"))
}

pub fn arg_parser_cli() -> Command {
    arg_parser().subcommand(command("repl").about("Launch a read eval print loop"))
}

pub fn arg_parser_repl() -> Command {
    arg_parser().subcommand(Command::new("exit").about("Leave the loop"))
}

/// Whether `--verbose` was given at any level.
pub fn verbose(matches: &ArgMatches) -> bool {
    matches
        .try_get_one::<bool>("verbose")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
        || matches.subcommand().map_or(false, |(_, sub)| verbose(sub))
}

pub fn generate_completions() -> Vec<String> {
    let cmd = arg_parser_repl();
    fn add_command(parent_fn_name: &str, cmd: &Command, subcmds: &mut Vec<String>) {
        let fn_name = format!("{parent_fn_name} {}", cmd.get_name())
            .trim()
            .to_string();
        subcmds.push(fn_name.clone());
        for subcmd in cmd.get_subcommands() {
            add_command(&fn_name, subcmd, subcmds);
        }
    }
    let mut subcmds = vec![];
    for subcmd in cmd.get_subcommands() {
        add_command("", subcmd, &mut subcmds);
    }
    subcmds.sort();
    subcmds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_is_consistent() {
        arg_parser_cli().debug_assert();
        arg_parser_repl().debug_assert();
    }

    #[test]
    fn completions_cover_nested_commands() {
        let completions = generate_completions();
        assert!(completions.contains(&"add source".to_string()));
        assert!(completions.contains(&"find book".to_string()));
        assert!(completions.contains(&"exit".to_string()));
    }

    #[test]
    fn finds_verbose_flag() {
        let matches = arg_parser_cli()
            .try_get_matches_from(["find", "book", "Dune", "-a", "Herbert", "--verbose"])
            .unwrap();
        assert!(verbose(&matches));
    }
}
