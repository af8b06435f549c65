use std::env;

use anyhow::{bail, Result};
use clap::ArgMatches;
use dotenvy::{dotenv, var as envar};
use inquire::{Password, PasswordDisplayMode};
use reedline::Signal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod command_parser;
mod form;
mod prompt;
mod repl;

use mentions::{
    config::Config,
    openlibrary::OpenLibrary,
    remote::{github::GithubStore, memory::DryRunStore, ContentStore},
    session::{Credentials, Session},
    traits::DisplayTerminal,
    types::{
        author::parse_author_list,
        book::Book,
        timestamp::{format_seconds, parse_time_to_seconds},
    },
};

const TOKEN_VARIABLE: &str = "MENTIONS_TOKEN";

struct App {
    config:      Config,
    credentials: Credentials,
    session:     Option<Session<GithubStore>>,
}

impl App {
    fn new(config: Config) -> Self {
        let credentials = Credentials::new(&config.credentials_location);
        Self {
            config,
            credentials,
            session: None,
        }
    }

    fn token(&self) -> Result<String> {
        if let Ok(token) = envar(TOKEN_VARIABLE) {
            debug!("Using token from {TOKEN_VARIABLE}");
            return Ok(token);
        }
        match self.credentials.load()? {
            Some(token) => Ok(token),
            None => bail!("Not logged in. Run `login` first."),
        }
    }

    fn github(&self, token: &str) -> Result<GithubStore> {
        Ok(GithubStore::new(
            &self.config.repository,
            token,
            &self.config.services.user_agent,
        )?)
    }

    /// Open a session; failures that invalidate the token also forget it.
    async fn start<S: ContentStore>(&self, store: S) -> Result<Session<S>> {
        match Session::start(store, self.config.repository.clone()).await {
            Ok(session) => Ok(session),
            Err(e) => {
                if e.clears_credentials() {
                    self.credentials.clear()?;
                }
                Err(e.into())
            }
        }
    }

    async fn session(&mut self) -> Result<&mut Session<GithubStore>> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                let store = self.github(&self.token()?)?;
                self.start(store).await?
            }
        };
        Ok(self.session.insert(session))
    }

    fn username(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|session| session.username().to_string())
    }

    async fn login(&mut self) -> Result<()> {
        self.session = None;
        let token = Password::new("Access token:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()?;
        let session = self.start(self.github(&token)?).await?;
        self.credentials.store(&token)?;
        println!(
            "{}",
            self.config
                .output_success
                .format_str(format!("Logged in as {}.", session.username()))
        );
        self.session = Some(session);
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session = None;
        self.credentials.clear()?;
        println!("{}", self.config.output_success.format_str("Logged out."));
        Ok(())
    }

    async fn add_source(&mut self, dry_run: bool) -> Result<()> {
        if dry_run {
            let store = DryRunStore::new(self.github(&self.token()?)?);
            let mut session = self.start(store).await?;
            form::add_source(&mut session, &self.config).await?;
            for (path, content) in session.store().written() {
                println!("{}", self.config.output_source.format_str(&path));
                println!("{content}");
            }
            return Ok(());
        }
        let config = self.config.clone();
        let session = self.session().await?;
        let submitted = form::add_source(session, &config).await?;
        info!("Submitted {submitted} source(s).");
        Ok(())
    }

    async fn find_book(&mut self, title: &str, authors: &[String]) -> Result<()> {
        let config = self.config.clone();
        let session = self.session().await?;
        let candidates = session.find_candidates(title, authors);
        if candidates.is_empty() {
            println!("{}", config.output_warning.format_str("No matching books."));
        }
        for book in candidates {
            println!("{}", book.fmt_to_string(&config)?);
        }
        Ok(())
    }

    async fn check(&mut self, url: &str) -> Result<()> {
        let config = self.config.clone();
        let session = self.session().await?;
        if session.check_duplicate(url).await? {
            println!("{}", config.output_duplicate.format_str(url));
        } else {
            println!("{}", config.output_success.format_str(format!("{url} is new.")));
        }
        Ok(())
    }

    async fn covers(&self, title: &str, author: &str) -> Result<()> {
        let openlibrary = OpenLibrary::new(&self.config.services)?;
        let book = Book::new(title, parse_author_list(author));
        let covers = openlibrary.covers(&book).await?;
        if covers.is_empty() {
            println!("{}", self.config.output_warning.format_str("No covers found."));
        }
        for cover in covers {
            println!(
                "{cover} {}",
                self.config.output_cover.format_str(openlibrary.cover_url(&cover))
            );
        }
        Ok(())
    }

    async fn dispatch(&mut self, matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("login", _)) => self.login().await?,
            Some(("logout", _)) => self.logout()?,
            Some(("add", matches)) => match matches.subcommand() {
                Some(("source", matches)) => self.add_source(matches.get_flag("dry-run")).await?,
                Some((name, _)) => unimplemented!("{}", name),
                None => unreachable!("subcommand required"),
            },
            Some(("find", matches)) => match matches.subcommand() {
                Some(("book", matches)) => {
                    let title = matches
                        .get_one::<String>("title")
                        .map(String::as_str)
                        .unwrap_or_default();
                    let authors = matches
                        .get_many::<String>("author")
                        .map(|authors| authors.cloned().collect::<Vec<_>>())
                        .unwrap_or_default();
                    self.find_book(title, &authors).await?;
                }
                Some((name, _)) => unimplemented!("{}", name),
                None => unreachable!("subcommand required"),
            },
            Some(("check", matches)) => {
                if let Some(url) = matches.get_one::<String>("url") {
                    self.check(url).await?;
                }
            }
            Some(("covers", matches)) => {
                let title = matches.get_one::<String>("title").cloned().unwrap_or_default();
                let author = matches.get_one::<String>("author").cloned().unwrap_or_default();
                self.covers(&title, &author).await?;
            }
            Some(("time", matches)) => {
                let text = matches.get_one::<String>("text").cloned().unwrap_or_default();
                let seconds = parse_time_to_seconds(&text);
                println!(
                    "{seconds} {}",
                    self.config.output_time.format_str(format_seconds(seconds))
                );
            }
            Some(("config", _)) => print!("{}", Config::default_as_string()?),
            Some((name, _)) => unimplemented!("{}", name),
            None => unreachable!("subcommand required"),
        }
        Ok(())
    }

    async fn handle_command(&mut self, command: &str) -> Result<bool> {
        let Some(command) = shlex::split(command) else {
            bail!("Invalid command");
        };
        if command.is_empty() {
            return Ok(true);
        }
        let matches = command_parser::arg_parser_repl().try_get_matches_from(command)?;
        if let Some(("exit", _)) = matches.subcommand() {
            return Ok(false);
        }
        self.dispatch(&matches).await?;
        Ok(true)
    }

    async fn repl(&mut self) -> Result<()> {
        let mut repl = repl::Repl::new(
            command_parser::generate_completions(),
            &self.config.history_location,
        )?;
        loop {
            repl.set_username(self.username());
            match repl.read_line() {
                Ok(Signal::Success(buffer)) => match self.handle_command(&buffer).await {
                    Ok(true) => (),
                    Ok(false) => break,
                    Err(e) => println!("{}", self.config.output_error.format_str(format!("{e:#}"))),
                },
                Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                    println!("\nAborted!");
                    break;
                }
                Err(e) => {
                    println!("{}", self.config.output_error.format_str(format!("{e:#}")));
                    break;
                }
            }
        }
        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mentions=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args_parsed = command_parser::arg_parser_cli().get_matches_from(env::args_os().skip(1));
    init_tracing(command_parser::verbose(&args_parsed));

    let config = Config::read_config()?;
    let mut app = App::new(config);

    if let Some(("repl", _)) = args_parsed.subcommand() {
        app.repl().await?;
    } else {
        app.dispatch(&args_parsed).await?;
    }

    Ok(())
}
