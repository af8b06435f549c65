#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use mentions::{
        error::CollectionError,
        normalize::{kebab_case, normalize, remove_accents, strip_punctuation},
        remote::codec::{decode_content, encode_content, parse_json_lines},
        types::{
            author::{parse_author_list, AuthorField},
            book::{main_title, Book, BookKey, Cover, CoverId},
            collection::{BookCollection, BookState},
            date::{parse_pasted_date, parse_post_date},
            source::{Extract, Source},
            timestamp::{
                find_first_timestamp, format_seconds, parse_time_field, parse_time_to_seconds,
                remove_timestamps,
            },
        },
        Error,
    };

    fn dune() -> Book {
        Book::new("Series;Dune: Part One", vec!["Frank Herbert".into()])
    }

    #[test]
    fn time_to_seconds() {
        assert_eq!(parse_time_to_seconds("1:02:03"), 3723);
        assert_eq!(parse_time_to_seconds("02:03"), 123);
        assert_eq!(parse_time_to_seconds("7"), 7);
        assert_eq!(parse_time_to_seconds(""), 0);
        assert_eq!(parse_time_to_seconds("0:75"), 75);
        assert_eq!(parse_time_to_seconds("a:10"), 10);
    }

    #[test]
    fn huge_times_saturate() {
        assert_eq!(parse_time_to_seconds("99999999999999999999:00:00"), i64::MAX);
        assert_eq!(parse_time_to_seconds("-99999999999999999999:00:00"), i64::MIN);
        assert_eq!(parse_time_to_seconds("1:99999999999999999999"), i64::MAX);
        assert_eq!(format_seconds(i64::MIN), "-2562047788015215:30:08");
        assert_eq!(format_seconds(-75), "-1:15");
    }

    #[test]
    fn time_field_as_typed() {
        assert_eq!(parse_time_field("90"), Some(90));
        assert_eq!(parse_time_field("90s"), Some(90));
        assert_eq!(parse_time_field("0"), None);
        assert_eq!(parse_time_field("soon"), None);
        assert_eq!(format_seconds(3723), "1:02:03");
        assert_eq!(format_seconds(123), "2:03");
    }

    #[test]
    fn transcript_timestamps() {
        assert_eq!(find_first_timestamp("12:34 and then"), Some("12:34"));
        assert_eq!(find_first_timestamp("  1:02:03 he said"), Some("1:02:03"));
        assert_eq!(find_first_timestamp("he said 12:34"), None);
        assert_eq!(
            remove_timestamps("12:34 first line\n12:40 second line\n"),
            "first line second line"
        );
    }

    #[test]
    fn normalization() {
        assert_eq!(remove_accents("Brontë"), "Bronte");
        assert_eq!(strip_punctuation("Dune: Messiah (1969)?"), "Dune Messiah 1969 ");
        assert_eq!(kebab_case("The Lord of the Rings"), "the-lord-of-the-rings");
        assert_eq!(normalize("Gödel, Escher, Bach"), "godel-escher-bach");
        for s in ["Dune: Part One", "Catch-22", "L'Étranger", "  spaced   out ", "ÆON flux"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn main_titles() {
        assert_eq!(main_title("Series;Dune: Part One"), "Dune");
        assert_eq!(main_title("Dune: Part One"), "Dune");
        assert_eq!(main_title("Dune"), "Dune");
        assert_eq!(main_title("Series;Dune"), "Dune");
        assert_eq!(main_title("A: B;C"), "C");
        assert_eq!(main_title("Notes: vol 1;Dune: Part One"), "Dune");
    }

    #[test]
    fn book_identity_and_paths() {
        let book = Book::new("Good Omens", vec!["Terry Pratchett".into(), "Neil Gaiman".into()]);
        assert_eq!(book.key(), BookKey("Good Omens\nTerry Pratchett\nNeil Gaiman".into()));
        assert_eq!(book.display_name(), "Good Omens by Terry Pratchett, Neil Gaiman");
        assert_eq!(
            book.file_path("books"),
            "books/good-omens-by-terry-pratchett-neil-gaiman.json"
        );
        assert_eq!(
            book.commit_message(),
            "Add book: Good Omens by Terry Pratchett, Neil Gaiman"
        );
    }

    #[test]
    fn book_records() {
        let records = r#"{"title":"Dune","author":"Frank Herbert","openLibraryId":8231856}

{"title":"Good Omens","author":["Terry Pratchett","Neil Gaiman"],"isbn":"0060853980"}"#;
        let books: Vec<Book> = parse_json_lines(records).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].author, Some(AuthorField::Single("Frank Herbert".into())));
        assert_eq!(
            books[0].cover(),
            Some(Cover::OpenLibrary(CoverId::Numeric(8231856)))
        );
        assert_eq!(books[1].authors(), ["Terry Pratchett", "Neil Gaiman"]);
        assert_eq!(books[1].cover(), Some(Cover::Isbn("0060853980".into())));

        let written = serde_json::to_string(&books[0]).unwrap();
        assert!(written.contains(r#""author":"Frank Herbert""#));
        assert!(written.contains(r#""openLibraryId":8231856"#));
        assert!(!written.contains("isbn"));
    }

    #[test]
    fn malformed_record_names_line() {
        let records = "{\"title\":\"Dune\"}\n{\"title\":42}";
        match parse_json_lines::<Book>(records) {
            Err(Error::MalformedLine { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source.path().to_string(), "title");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn content_encoding() {
        let text = "Dune\nGödel, Escher, Bach\n";
        let encoded = encode_content(text);
        let wrapped = encoded
            .as_bytes()
            .chunks(8)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(decode_content("books/books.jsonl", &wrapped).unwrap(), text);
        assert!(decode_content("books/books.jsonl", "not base64!").is_err());
    }

    #[test]
    fn cover_urls() {
        let base = "https://covers.openlibrary.org/b";
        assert_eq!(
            Cover::Isbn("0441013597".into()).url(base),
            "https://covers.openlibrary.org/b/isbn/0441013597-L.jpg"
        );
        assert_eq!(
            Cover::OpenLibrary(CoverId::Numeric(8231856)).url(base),
            "https://covers.openlibrary.org/b/id/8231856-L.jpg"
        );
    }

    #[test]
    fn author_lists() {
        assert_eq!(
            parse_author_list("Terry Pratchett, Neil Gaiman"),
            vec!["Terry Pratchett".to_string(), "Neil Gaiman".to_string()]
        );
        assert!(parse_author_list("  ").is_empty());
    }

    #[test]
    fn extract_field_names() {
        let mut extract = Extract::new(dune().key());
        extract.toggle_featured();
        extract.toggle_external();
        extract.set_text("  A great read ");
        extract.set_time_text("75");
        extract.set_chapter(" ");
        let json = serde_json::to_value(&extract).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Series;Dune: Part One\nFrank Herbert",
                "featured": true,
                "negative": false,
                "__external": true,
                "extract": "A great read",
                "time": 75,
            })
        );
    }

    #[test]
    fn source_paths() {
        let source = Source {
            name: "Tim Ferriss".into(),
            source: "https://x.com/tferriss/status/123".into(),
            ..Source::default()
        };
        assert_eq!(
            source.file_path("sources"),
            "sources/tim-ferriss-https-x-com-tferriss-status-123.json"
        );
        assert_eq!(source.commit_message(), "Add source for Tim Ferriss");
    }

    #[test]
    fn pasted_dates() {
        assert_eq!(parse_pasted_date("7"), None);
        assert_eq!(parse_pasted_date("+"), None);
        assert_eq!(parse_pasted_date("2024").as_deref(), Some("2024"));
        assert_eq!(parse_pasted_date("2024-03").as_deref(), Some("2024-03"));
        assert_eq!(
            parse_pasted_date("2024-03-05T10:00:00Z").as_deref(),
            Some("2024-03-05")
        );
        assert_eq!(parse_post_date("March 5, 2024").as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn collection_states() {
        let mut books = BookCollection::from_books(vec![dune(), dune()]);
        assert_eq!(books.len(), 1);
        assert_eq!(books.state(&dune().key()), Some(BookState::Persisted));

        assert_eq!(
            books.add(dune()),
            Err(CollectionError::DuplicateKey(dune().key().0))
        );
        assert_eq!(
            books.add(Book::new(" ", vec![])),
            Err(CollectionError::MissingTitle)
        );

        let emma = Book::new("Emma", vec!["Jane Austen".into()]);
        let key = books.add(emma).unwrap();
        assert_eq!(books.state(&key), Some(BookState::Created));

        books
            .set_cover(&dune().key(), Some(Cover::Isbn("0441013597".into())))
            .unwrap();
        assert_eq!(books.state(&dune().key()), Some(BookState::Modified));
        assert_eq!(books.pending().len(), 2);

        books.mark_persisted(&key);
        books.mark_persisted(&dune().key());
        assert!(books.pending().is_empty());
    }
}
