#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use mentions::{
        openlibrary::{
            cover_choices, first_cover,
            schema::{Edition, SearchDoc, SearchResponse},
        },
        types::book::{Cover, CoverId},
    };

    const SEARCH: &str = r#"{
        "numFound": 3,
        "docs": [
            {"title": "Dune", "author_name": ["Frank Herbert"], "isbn": ["0441013597", "9780441013593"]},
            {"title": "Dune", "author_name": ["Frank Herbert"], "isbn": ["0441013597"], "cover_i": 8231856},
            {"title": "Dune", "cover_i": 8231856}
        ]
    }"#;

    fn docs() -> Vec<SearchDoc> {
        serde_json::from_str::<SearchResponse>(SEARCH).unwrap().docs
    }

    #[test]
    fn search_response() {
        let response: SearchResponse = serde_json::from_str(SEARCH).unwrap();
        assert_eq!(response.num_found, 3);
        assert_eq!(response.docs[2].isbn, Vec::<String>::new());
        assert_eq!(response.docs[2].author_name, None);
    }

    #[test]
    fn isbns_come_before_cover_ids_without_repeats() {
        assert_eq!(
            cover_choices(&docs()),
            vec![
                Cover::Isbn("0441013597".into()),
                Cover::Isbn("9780441013593".into()),
                Cover::OpenLibrary(CoverId::Numeric(8231856)),
            ]
        );
        assert!(cover_choices(&[]).is_empty());
    }

    #[test]
    fn first_cover_only_looks_at_best_result() {
        assert_eq!(first_cover(&docs()), None);
        assert_eq!(
            first_cover(&docs()[1..]),
            Some(Cover::OpenLibrary(CoverId::Numeric(8231856)))
        );
    }

    #[test]
    fn edition_data() {
        let edition: Edition = serde_json::from_str(
            r#"{"title": "Dune", "authors": [{"name": "Frank Herbert"}], "number_of_pages": 604}"#,
        )
        .unwrap();
        assert_eq!(edition.title.as_deref(), Some("Dune"));
        assert_eq!(edition.authors.unwrap()[0].name, "Frank Herbert");
    }
}
