#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use mentions::{
        reconcile::{find_candidates, resolve_key, Query, CANDIDATE_LIMIT},
        types::{
            author::AuthorField,
            book::{Book, BookKey},
            collection::BookCollection,
        },
    };

    fn book(title: &str, authors: &[&str]) -> Book {
        Book::new(title, authors.iter().map(|a| a.to_string()).collect())
    }

    fn titles<'a>(books: &[&'a Book]) -> Vec<&'a str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    const NO_AUTHORS: [&str; 0] = [];

    #[test]
    fn dune_scenario() {
        let books = vec![book("Series;Dune: Part One", &["Frank Herbert"])];
        assert_eq!(
            titles(&find_candidates(&books, "Dune", &["Herbert"])),
            vec!["Series;Dune: Part One"]
        );
        assert!(find_candidates(&books, "Dune", &["Asimov"]).is_empty());
    }

    #[test]
    fn title_and_every_author_must_match() {
        let books = vec![
            book("Good Omens", &["Terry Pratchett", "Neil Gaiman"]),
            book("American Gods", &["Neil Gaiman"]),
            book("Mort", &["Terry Pratchett"]),
        ];
        assert_eq!(
            titles(&find_candidates(&books, "", &["gaiman"])),
            vec!["Good Omens", "American Gods"]
        );
        assert_eq!(
            titles(&find_candidates(&books, "", &["Gaiman", "Pratchett"])),
            vec!["Good Omens"]
        );
        assert_eq!(
            titles(&find_candidates(&books, "omens", &NO_AUTHORS)),
            vec!["Good Omens"]
        );
        assert!(find_candidates(&books, "Mort", &["Gaiman"]).is_empty());
    }

    #[test]
    fn comparison_ignores_case_accents_and_punctuation() {
        let books = vec![book("Gödel, Escher, Bach: an Eternal Golden Braid", &["Douglas R. Hofstadter"])];
        assert_eq!(find_candidates(&books, "godel escher bach", &["hofstadter"]).len(), 1);
        assert_eq!(find_candidates(&books, "Gödel, Escher", &["Douglas R Hofstadter"]).len(), 1);
    }

    #[test]
    fn subtitle_of_typed_title_is_ignored() {
        let books = vec![book("Dune", &["Frank Herbert"])];
        assert_eq!(find_candidates(&books, "Dune: Deluxe Edition", &NO_AUTHORS).len(), 1);
    }

    #[test]
    fn series_is_dropped_before_subtitle() {
        let books = vec![book("Notes: vol 1;Dune", &["Frank Herbert"])];
        assert_eq!(
            titles(&find_candidates(&books, "Dune", &["Herbert"])),
            ["Notes: vol 1;Dune"]
        );
    }

    #[test]
    fn at_most_ten_candidates() {
        let books = (0..25)
            .map(|i| book(&format!("Volume {i}"), &["Same Author"]))
            .collect::<Vec<_>>();
        let found = find_candidates(&books, "Volume", &["Same Author"]);
        assert_eq!(found.len(), CANDIDATE_LIMIT);
        assert_eq!(found[0].title, "Volume 0");
        assert_eq!(found[9].title, "Volume 9");
    }

    #[test]
    fn same_title_different_authors_all_offered() {
        let books = vec![
            book("Emma", &["Jane Austen"]),
            book("Emma", &["Someone Else"]),
        ];
        let found = find_candidates(&books, "Emma", &NO_AUTHORS);
        assert_eq!(
            found.iter().map(|b| b.display_name()).collect::<Vec<_>>(),
            vec!["Emma by Jane Austen", "Emma by Someone Else"]
        );
    }

    #[test]
    fn nothing_typed_finds_nothing() {
        let books = vec![book("Dune", &["Frank Herbert"])];
        assert!(find_candidates(&books, "", &NO_AUTHORS).is_empty());
        assert!(find_candidates(&books, " :; ", &["  "]).is_empty());
        assert!(Query::new("", &[""]).is_empty());
    }

    #[test]
    fn books_without_authors() {
        let anonymous = Book {
            author: None,
            ..book("Beowulf", &[])
        };
        let books = vec![anonymous];
        assert_eq!(find_candidates(&books, "Beowulf", &NO_AUTHORS).len(), 1);
        assert!(find_candidates(&books, "Beowulf", &["Heaney"]).is_empty());
    }

    #[test]
    fn legacy_title_only_keys() {
        let books = BookCollection::from_books(vec![
            book("Dune", &["Frank Herbert"]),
            book("Emma", &["Jane Austen"]),
            Book {
                author: Some(AuthorField::Single("Someone Else".into())),
                ..book("Emma", &[])
            },
        ]);
        let dune = BookKey::new("Dune", &["Frank Herbert"]);
        assert_eq!(resolve_key(&books, &dune), Some(dune.clone()));
        assert_eq!(resolve_key(&books, &BookKey::from("Dune")), Some(dune));
        assert_eq!(resolve_key(&books, &BookKey::from("Emma")), None);
        assert_eq!(resolve_key(&books, &BookKey::from("Mort")), None);
    }
}
