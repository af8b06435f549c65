#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use mentions::{
        config::RepositoryConfig,
        draft::SourceDraft,
        error::{SessionError, SubmitError, ValidationError},
        remote::{
            memory::{Call, DryRunStore, MemoryStore},
            ContentStore,
        },
        session::{Credentials, Session},
        types::book::{Book, BookKey, Cover},
        Error,
    };

    const PROFILES: &str = "{\"name\":\"Tim Ferriss\"}\n{\"name\":\"Naval\"}\n";
    const BOOKS: &str = "{\"title\":\"Dune\",\"author\":[\"Frank Herbert\"]}\n";
    const SOURCES: &str = "https://x.com/naval/status/1\n";
    const URL: &str = "https://www.youtube.com/watch?v=abc";
    const SOURCE_PATH: &str = "sources/tim-ferriss-https-www-youtube-com-watch-v-abc.json";
    const EMMA_PATH: &str = "books/emma-by-jane-austen.json";
    const DUNE_PATH: &str = "books/dune-by-frank-herbert.json";

    fn store() -> MemoryStore {
        MemoryStore::new("tester")
            .with_file("profiles.jsonl", PROFILES)
            .with_file("books/books.jsonl", BOOKS)
            .with_file("sources.txt", SOURCES)
    }

    async fn session(store: MemoryStore) -> Session<MemoryStore> {
        Session::start(store, RepositoryConfig::default()).await.unwrap()
    }

    fn dune() -> BookKey {
        BookKey::new("Dune", &["Frank Herbert"])
    }

    fn draft() -> SourceDraft {
        let mut draft = SourceDraft::new("Tim Ferriss");
        draft.set_url(URL);
        draft.date = "2024-03-05".into();
        draft.add_extract(dune());
        draft
    }

    fn writes(store: &MemoryStore) -> Vec<String> {
        store
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Write { path, .. } => Some(path),
                Call::Delete(path) => Some(format!("delete {path}")),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn start_loads_profiles_and_books() {
        let session = session(store()).await;
        assert_eq!(session.username(), "tester");
        assert_eq!(session.profiles().len(), 2);
        assert_eq!(session.books().len(), 1);
        assert_eq!(
            session
                .suggest_profiles("NAV")
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Naval"]
        );
        assert_eq!(session.find_candidates("dune", &["herbert".into()]).len(), 1);
    }

    #[tokio::test]
    async fn failed_login_clears_credentials() {
        let err = Session::start(MemoryStore::unauthorized(), RepositoryConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Authentication(_)));
        assert!(err.clears_credentials());
    }

    #[tokio::test]
    async fn missing_books_clear_credentials_but_missing_profiles_do_not() {
        let no_books = MemoryStore::new("tester").with_file("profiles.jsonl", PROFILES);
        let err = Session::start(no_books, RepositoryConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Books(_)));
        assert!(err.clears_credentials());

        let no_profiles = MemoryStore::new("tester").with_file("books/books.jsonl", BOOKS);
        let err = Session::start(no_profiles, RepositoryConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Profiles(_)));
        assert!(!err.clears_credentials());
    }

    #[test]
    fn credentials_round_trip() {
        let dir = std::env::temp_dir().join(format!("mentions-test-{}", std::process::id()));
        let credentials = Credentials::new(dir.join("credentials"));
        assert_eq!(credentials.load().unwrap(), None);
        credentials.store("ghp_secret\n").unwrap();
        assert_eq!(credentials.load().unwrap().as_deref(), Some("ghp_secret"));
        credentials.clear().unwrap();
        credentials.clear().unwrap();
        assert_eq!(credentials.load().unwrap(), None);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn duplicate_check_reads_index() {
        let mut session = session(store()).await;
        assert!(session.check_duplicate("https://x.com/naval/status/1").await.unwrap());
        assert!(!session.check_duplicate("https://x.com/naval/status/1/").await.unwrap());
    }

    #[tokio::test]
    async fn empty_date_aborts_before_any_request() {
        let mut session = session(store()).await;
        let calls_before = session.store().calls().len();
        let mut draft = draft();
        draft.date = String::new();
        let extracts = draft.extracts.clone();

        let err = session.submit(&mut draft).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::MissingDate)));
        assert_eq!(session.store().calls().len(), calls_before);
        assert_eq!(draft.extracts, extracts);
    }

    #[tokio::test]
    async fn submit_writes_books_then_source() {
        let mut session = session(store()).await;
        let emma = session
            .books_mut()
            .add(Book::new("Emma", vec!["Jane Austen".into()]))
            .unwrap();
        let mut draft = draft();
        draft.add_extract(emma.clone());

        let submission = session.submit(&mut draft).await.unwrap();
        assert_eq!(submission.books, vec![EMMA_PATH.to_string()]);
        assert_eq!(submission.source, SOURCE_PATH);
        assert_eq!(
            writes(session.store()),
            vec![EMMA_PATH.to_string(), SOURCE_PATH.to_string()]
        );

        let source: serde_json::Value =
            serde_json::from_str(&session.store().content(SOURCE_PATH).unwrap()).unwrap();
        assert_eq!(source["name"], "Tim Ferriss");
        assert_eq!(source["source"], URL);
        assert_eq!(source["extracts"][1]["name"], "Emma\nJane Austen");

        assert!(session.books().pending().is_empty());
        assert_eq!(draft, SourceDraft::new("Tim Ferriss"));
    }

    #[tokio::test]
    async fn modified_books_are_updated_in_place() {
        let store = store().with_file(DUNE_PATH, "{\"title\":\"Dune\",\"author\":[\"Frank Herbert\"]}");
        let mut session = session(store).await;
        session
            .books_mut()
            .set_cover(&dune(), Some(Cover::Isbn("0441013597".into())))
            .unwrap();

        let submission = session.submit(&mut draft()).await.unwrap();
        assert_eq!(submission.books, vec![DUNE_PATH.to_string()]);
        let dune: serde_json::Value =
            serde_json::from_str(&session.store().content(DUNE_PATH).unwrap()).unwrap();
        assert_eq!(dune["isbn"], "0441013597");
    }

    #[tokio::test]
    async fn failed_source_write_removes_new_books() {
        let store = store();
        store.fail_on(SOURCE_PATH);
        let mut session = session(store).await;
        session
            .books_mut()
            .add(Book::new("Emma", vec!["Jane Austen".into()]))
            .unwrap();
        let mut draft = draft();
        draft.add_extract(BookKey::new("Emma", &["Jane Austen"]));
        let before = draft.clone();

        let err = session.submit(&mut draft).await.unwrap_err();
        assert!(matches!(err, Error::Submit(SubmitError::Source { .. })));
        assert_eq!(
            writes(session.store()),
            vec![
                EMMA_PATH.to_string(),
                SOURCE_PATH.to_string(),
                format!("delete {EMMA_PATH}")
            ]
        );
        assert_eq!(session.store().content(EMMA_PATH), None);
        assert_eq!(session.books().pending().len(), 1);
        assert_eq!(draft, before);
    }

    #[tokio::test]
    async fn failed_source_write_restores_updated_books() {
        let original = "{\"title\":\"Dune\",\"author\":[\"Frank Herbert\"]}";
        let store = store().with_file(DUNE_PATH, original);
        store.fail_on(SOURCE_PATH);
        let mut session = session(store).await;
        session
            .books_mut()
            .set_cover(&dune(), Some(Cover::Isbn("0441013597".into())))
            .unwrap();

        let err = session.submit(&mut draft()).await.unwrap_err();
        assert!(matches!(err, Error::Submit(SubmitError::Source { .. })));
        assert_eq!(session.store().content(DUNE_PATH).as_deref(), Some(original));
    }

    #[tokio::test]
    async fn failed_book_write_skips_source() {
        let store = store();
        store.fail_on(EMMA_PATH);
        let mut session = session(store).await;
        session
            .books_mut()
            .add(Book::new("Emma", vec!["Jane Austen".into()]))
            .unwrap();

        let err = session.submit(&mut draft()).await.unwrap_err();
        assert!(matches!(err, Error::Submit(SubmitError::Book { .. })));
        assert_eq!(writes(session.store()), vec![EMMA_PATH.to_string()]);
        assert_eq!(session.store().content(SOURCE_PATH), None);
    }

    #[tokio::test]
    async fn failed_rollback_names_orphaned_files() {
        let store = store();
        // Creating the source conflicts with an existing file.
        store.insert(SOURCE_PATH, "{}");
        store.fail_delete_on(EMMA_PATH);
        let mut session = session(store).await;
        session
            .books_mut()
            .add(Book::new("Emma", vec!["Jane Austen".into()]))
            .unwrap();

        let err = session.submit(&mut draft()).await.unwrap_err();
        match err {
            Error::Submit(SubmitError::Compensation { cause, orphaned }) => {
                assert!(matches!(*cause, SubmitError::Source { .. }));
                assert_eq!(orphaned, vec![EMMA_PATH.to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(session.store().content(EMMA_PATH).is_some());
    }

    #[tokio::test]
    async fn dry_run_never_writes_through() {
        let inner = store();
        let dry = DryRunStore::new(inner);
        let mut session = Session::start(dry, RepositoryConfig::default()).await.unwrap();
        session
            .books_mut()
            .add(Book::new("Emma", vec!["Jane Austen".into()]))
            .unwrap();
        session.submit(&mut draft()).await.unwrap();

        let written = session
            .store()
            .written()
            .into_iter()
            .map(|(path, _)| path)
            .collect::<Vec<_>>();
        assert_eq!(written, vec![EMMA_PATH.to_string(), SOURCE_PATH.to_string()]);
        assert_eq!(session.store().inner().content(SOURCE_PATH), None);
        assert_eq!(session.store().inner().content(EMMA_PATH), None);
        assert!(session.store().read(SOURCE_PATH).await.is_ok());
    }
}
