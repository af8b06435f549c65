use anyhow::Result;
use inquire::{
    autocompletion::{Autocomplete, Replacement},
    required, Confirm, CustomUserError, Editor, InquireError, MultiSelect, Select, Text,
};
use tracing::{debug, warn};

use mentions::{
    config::Config,
    draft::SourceDraft,
    editor::TextField,
    error::{CollectionError, Error},
    oembed::{is_post_url, Oembed},
    openlibrary::OpenLibrary,
    preview::Preview,
    remote::ContentStore,
    session::Session,
    traits::{DisplayTerminal, PromptType},
    types::{
        author::parse_author_list,
        book::{Book, BookKey},
        collection::BookCollection,
        date::SourceDate,
        isbn::Isbn,
        option_to_create::OptionToCreate,
        profile::{suggest_profiles, Profile},
        text,
        timestamp::{format_seconds, parse_time_to_seconds},
    },
};

const ADD_MENTION: &str = "Add book mention";
const EDIT_MENTION: &str = "Edit book mention";
const REMOVE_MENTION: &str = "Remove book mention";
const EDIT_DETAILS: &str = "Edit URL, content and date";
const PREVIEW: &str = "Preview";
const SUBMIT: &str = "Submit";
const DISCARD: &str = "Discard";

const CREATE_BOOK: &str = "Create new book";
const LOOKUP_ISBN: &str = "Look up by ISBN";

const FIRST_COVER: &str = "Pick first cover";
const CHOOSE_COVER: &str = "Choose cover";
const ENTER_ISBN: &str = "Enter ISBN";
const NO_COVER: &str = "No cover";

const FEATURED: &str = "featured";
const NEGATIVE: &str = "negative";
const EXTERNAL: &str = "external quote";
const UNQUOTE: &str = "unquote";

#[derive(Clone)]
struct ProfileCompleter {
    profiles: Vec<Profile>,
}

impl Autocomplete for ProfileCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(suggest_profiles(&self.profiles, input)
            .into_iter()
            .map(|profile| profile.name.clone())
            .collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

/// An answer as a single line field holds it: line breaks become spaces.
fn single_line(answer: &str) -> String {
    text::Text::from_answer(answer).0
}

fn warning(config: &Config, message: impl ToString) {
    println!("{}", config.output_warning.format_str(message));
}

fn failure(config: &Config, message: impl ToString) {
    println!("{}", config.output_error.format_str(message));
}

/// Enter sources one after another until the user stops. Returns the number
/// of sources submitted.
pub async fn add_source<S: ContentStore>(session: &mut Session<S>, config: &Config) -> Result<usize> {
    let openlibrary = OpenLibrary::new(&config.services)?;
    let oembed = Oembed::new(&config.services)?;
    let mut draft = SourceDraft::default();
    let mut submitted = 0;
    loop {
        edit_details(session, &oembed, config, &mut draft).await?;
        if !edit_mentions(session, &openlibrary, &oembed, config, &mut draft).await? {
            return Ok(submitted);
        }
        submitted += 1;
        let another = Confirm::new(&format!("Add another source for {}?", draft.name))
            .with_default(false)
            .prompt()?;
        if !another {
            return Ok(submitted);
        }
    }
}

async fn edit_details<S: ContentStore>(
    session: &mut Session<S>,
    oembed: &Oembed,
    config: &Config,
    draft: &mut SourceDraft,
) -> Result<()> {
    if draft.name.is_empty() {
        let completer = ProfileCompleter {
            profiles: session.profiles().to_vec(),
        };
        let name = Text::new("Profile:")
            .with_autocomplete(completer)
            .with_validator(required!("Profile is required."))
            .prompt()?;
        draft.name = single_line(&name);
        if !session.profiles().iter().any(|p| p.name == draft.name) {
            warning(config, format!("{} is not a known profile.", draft.name));
        }
    }

    loop {
        let url = Text::new("URL (or book title):")
            .with_initial_value(&draft.url)
            .with_validator(required!("URL is required."))
            .prompt()?;
        draft.set_url(&single_line(&url));
        if let Some(domain_warning) = draft.domain_warning() {
            warning(config, domain_warning);
            continue;
        }
        match session.check_duplicate(&draft.url).await {
            Ok(duplicate) => draft.duplicate = duplicate,
            Err(e) => failure(config, format!("Could not check for duplicates: {e}")),
        }
        if draft.duplicate {
            println!("{}", config.output_duplicate.format_str(&draft.url));
            continue;
        }
        break;
    }

    if is_post_url(&draft.url) && draft.content.is_empty() {
        match oembed.import(&draft.url).await {
            Ok(post) => {
                debug!("Imported post: {post:?}");
                draft.content = post.content;
                if let Some(date) = post.date {
                    draft.date = date;
                }
            }
            Err(e) => warning(config, format!("Could not import the post: {e}")),
        }
    }

    let content = Editor::new("Content:")
        .with_predefined_text(&draft.content)
        .prompt()?;
    draft.content = content.trim_end_matches('\n').to_string();

    let current = (!draft.date.is_empty()).then(|| SourceDate(draft.date.clone()));
    draft.date = SourceDate::create_by_prompt("Date:", current.as_ref())?.0;
    Ok(())
}

fn mention_labels(books: &BookCollection, draft: &SourceDraft) -> Vec<String> {
    draft
        .extracts
        .iter()
        .map(|extract| match books.get(&extract.book_key) {
            Some(book) => book.display_name(),
            None => format!("{} (unknown book)", extract.book_key),
        })
        .collect()
}

/// The mention menu. Returns false when the draft is discarded, true once it
/// was submitted.
async fn edit_mentions<S: ContentStore>(
    session: &mut Session<S>,
    openlibrary: &OpenLibrary,
    oembed: &Oembed,
    config: &Config,
    draft: &mut SourceDraft,
) -> Result<bool> {
    draft.upgrade_legacy_keys(session.books());
    loop {
        for (extract, label) in draft
            .extracts
            .iter()
            .zip(mention_labels(session.books(), draft))
        {
            let time = extract
                .time
                .map(|t| config.output_time.format_str(format_seconds(t)))
                .unwrap_or_default();
            println!("  {label}{time}");
        }

        let mut actions = vec![ADD_MENTION];
        if !draft.extracts.is_empty() {
            actions.extend([EDIT_MENTION, REMOVE_MENTION]);
        }
        actions.extend([EDIT_DETAILS, PREVIEW, SUBMIT, DISCARD]);

        match Select::new("Next:", actions).prompt()? {
            ADD_MENTION => {
                if let Some(key) = choose_book(session, openlibrary, config).await? {
                    let index = draft.add_extract(key);
                    edit_extract(draft, index)?;
                }
            }
            EDIT_MENTION => {
                let labels = mention_labels(session.books(), draft);
                if let Some(choice) = skippable(Select::new("Mention:", labels).raw_prompt())? {
                    edit_extract(draft, choice.index)?;
                }
            }
            REMOVE_MENTION => {
                let labels = mention_labels(session.books(), draft);
                if let Some(choice) = skippable(Select::new("Remove:", labels).raw_prompt())? {
                    draft.remove_extract(choice.index);
                }
            }
            EDIT_DETAILS => edit_details(session, oembed, config, draft).await?,
            PREVIEW => {
                println!("{}", Preview::new(draft, session.books()).to_json()?);
            }
            SUBMIT => match session.submit(draft).await {
                Ok(submission) => {
                    for path in submission.books.iter().chain([&submission.source]) {
                        println!("{}", config.output_success.format_str(format!("Saved {path}")));
                    }
                    return Ok(true);
                }
                Err(Error::Validation(e)) => failure(config, e),
                Err(e) => {
                    warn!("Submission failed: {e}");
                    failure(config, e);
                }
            },
            _ => {
                let discard = Confirm::new("Discard this source?")
                    .with_default(false)
                    .prompt()?;
                if discard {
                    return Ok(false);
                }
            }
        }
    }
}

async fn choose_book<S: ContentStore>(
    session: &mut Session<S>,
    openlibrary: &OpenLibrary,
    config: &Config,
) -> Result<Option<BookKey>> {
    let title = single_line(&Text::new("Book title:").prompt()?);
    let authors = parse_author_list(&single_line(
        &Text::new("Authors (comma separated):").prompt()?,
    ));

    let candidates = session
        .find_candidates(&title, &authors)
        .into_iter()
        .map(Book::key)
        .collect::<Vec<_>>();
    let options = OptionToCreate::with_actions(candidates, &[CREATE_BOOK, LOOKUP_ISBN]);
    let key = match Select::new("Book:", options).prompt_skippable()? {
        None => return Ok(None),
        Some(OptionToCreate::Value(key)) => key,
        Some(OptionToCreate::Create(CREATE_BOOK)) => create_book(session, &title, &authors)?,
        Some(OptionToCreate::Create(_)) => match lookup_isbn(session, openlibrary, config).await? {
            Some(key) => key,
            None => return Ok(None),
        },
    };

    let has_cover = session
        .books()
        .get(&key)
        .map_or(true, |book| book.cover().is_some());
    if !has_cover {
        pick_cover(session, openlibrary, config, &key).await?;
    }
    Ok(Some(key))
}

fn create_book<S: ContentStore>(
    session: &mut Session<S>,
    title: &str,
    authors: &[String],
) -> Result<BookKey> {
    let title = text::Text::create_by_prompt("Title:", Some(&text::Text(title.to_string())))?;
    let authors = text::Text(authors.join(", "));
    let authors = text::Text::create_by_prompt("Authors (comma separated):", Some(&authors))?;
    let book = Book::new(title.0, parse_author_list(authors.as_str()));
    match session.books_mut().add(book) {
        Err(CollectionError::DuplicateKey(key)) => Ok(BookKey(key)),
        result => Ok(result?),
    }
}

async fn lookup_isbn<S: ContentStore>(
    session: &mut Session<S>,
    openlibrary: &OpenLibrary,
    config: &Config,
) -> Result<Option<BookKey>> {
    let Some(isbn) = Isbn::create_by_prompt_skippable("ISBN:", None)? else {
        return Ok(None);
    };
    let Some(book) = openlibrary.edition_by_isbn(&isbn.digits()).await? else {
        warning(config, format!("OpenLibrary does not know ISBN {isbn}."));
        return Ok(None);
    };
    let key = book.key();
    if session.books().contains(&key) {
        return Ok(Some(key));
    }
    println!("{}", config.output_book.format(&book, config)?);
    if !Confirm::new("Add this book?").with_default(true).prompt()? {
        return Ok(None);
    }
    Ok(Some(session.books_mut().add(book)?))
}

async fn pick_cover<S: ContentStore>(
    session: &mut Session<S>,
    openlibrary: &OpenLibrary,
    config: &Config,
    key: &BookKey,
) -> Result<()> {
    let Some(book) = session.books().get(key).cloned() else {
        return Ok(());
    };
    let options = vec![FIRST_COVER, CHOOSE_COVER, ENTER_ISBN, NO_COVER];
    let cover = match Select::new("Cover:", options).prompt()? {
        FIRST_COVER => {
            let cover = openlibrary.first_cover(&book).await?;
            if cover.is_none() {
                warning(config, "First book has no cover, try picking one.");
            }
            cover
        }
        CHOOSE_COVER => {
            let covers = openlibrary.covers(&book).await?;
            if covers.is_empty() {
                warning(config, "No covers found.");
                None
            } else {
                Select::new("Cover:", covers).prompt_skippable()?
            }
        }
        ENTER_ISBN => Isbn::create_by_prompt_skippable("ISBN:", None)?.map(|isbn| isbn.to_cover()),
        _ => None,
    };
    if let Some(cover) = cover {
        println!("{}", config.output_cover.format_str(openlibrary.cover_url(&cover)));
        session.books_mut().set_cover(key, Some(cover))?;
        if let Some(book) = session.books().get(key) {
            println!("{}", book.fmt_to_string(config)?);
        }
    }
    Ok(())
}

fn edit_extract(draft: &mut SourceDraft, index: usize) -> Result<()> {
    let fields = draft.fields();
    let Some(extract) = draft.extract_mut(index) else {
        return Ok(());
    };

    let flags = vec![FEATURED, NEGATIVE, EXTERNAL, UNQUOTE];
    let defaults = [
        extract.featured,
        extract.negative,
        extract.is_external_quote,
        extract.unquote,
    ]
    .iter()
    .enumerate()
    .filter_map(|(i, set)| set.then_some(i))
    .collect::<Vec<_>>();
    let chosen = MultiSelect::new("Flags:", flags)
        .with_default(&defaults)
        .prompt()?;
    if chosen.contains(&FEATURED) != extract.featured {
        extract.toggle_featured();
    }
    if chosen.contains(&NEGATIVE) != extract.negative {
        extract.toggle_negative();
    }
    if chosen.contains(&EXTERNAL) != extract.is_external_quote {
        extract.toggle_external();
    }
    if chosen.contains(&UNQUOTE) != extract.unquote {
        extract.toggle_unquote();
    }

    if fields.time {
        let current = extract.time.map(format_seconds).unwrap_or_default();
        let answer = Text::new("Time (h:mm:ss or seconds):")
            .with_initial_value(&current)
            .prompt()?;
        extract.time = match parse_time_to_seconds(answer.trim()) {
            0 => None,
            seconds => Some(seconds),
        };
    }

    if fields.chapter {
        let current = extract.chapter.clone().unwrap_or_default();
        let answer = Text::new("Chapter:").with_initial_value(&current).prompt()?;
        extract.set_chapter(&single_line(&answer));
    }

    if fields.text {
        let current = extract.text.clone().unwrap_or_default();
        let answer = Editor::new("Mention:")
            .with_predefined_text(&current)
            .prompt()?;
        let mut field = TextField::multi_line();
        if let Some(seconds) = field.paste_transcript(answer.trim_end_matches('\n')) {
            let replace = match extract.time {
                Some(time) if fields.time && time != seconds => Confirm::new(&format!(
                    "Replace time {} with {}?",
                    format_seconds(time),
                    format_seconds(seconds)
                ))
                .with_default(false)
                .prompt()?,
                _ => fields.time,
            };
            if replace {
                extract.time = Some(seconds);
            }
        }
        extract.set_text(field.value());
    }
    Ok(())
}

/// An answer the user escaped from is no answer; other failures still abort.
fn skippable<T>(answer: Result<T, InquireError>) -> Result<Option<T>, InquireError> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e),
    }
}
