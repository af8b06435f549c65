//! String folding used to compare titles and authors and to name files.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Letters that carry no decomposition but still have a plain latin spelling.
fn fold_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'ø' => "o",
        'Ø' => "O",
        'æ' => "ae",
        'Æ' => "Ae",
        'œ' => "oe",
        'Œ' => "Oe",
        'ß' => "ss",
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'ł' => "l",
        'Ł' => "L",
        'þ' => "th",
        'Þ' => "Th",
        'ı' => "i",
        _ => return None,
    })
}

/// Remove diacritics: "Brontë" becomes "Bronte", "Søren" becomes "Soren".
pub fn remove_accents(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfd().filter(|c| !is_combining_mark(*c)) {
        match fold_letter(c) {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }
    out
}

/// Remove accents, replace `? . , : ; ( )` with spaces and collapse runs of
/// whitespace into one space. Leading and trailing space is kept.
pub fn strip_punctuation(s: &str) -> String {
    let replaced: String = remove_accents(s)
        .chars()
        .map(|c| match c {
            '?' | '.' | ',' | ':' | ';' | '(' | ')' => ' ',
            c => c,
        })
        .collect();
    let mut out = String::with_capacity(replaced.len());
    let mut in_space = false;
    for c in replaced.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Upper,
    Lower,
    Digit,
}

fn class_of(c: char) -> Option<Class> {
    if c.is_numeric() {
        Some(Class::Digit)
    } else if c.is_uppercase() {
        Some(Class::Upper)
    } else if c.is_alphanumeric() {
        Some(Class::Lower)
    } else {
        None
    }
}

/// Split into words the way a kebab-case folder does: on anything that is not
/// a letter or digit, on lower-to-upper transitions, between letters and
/// digits, and before the last capital of an acronym ("XMLHttp" is
/// "XML" + "Http").
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().filter(|c| !matches!(c, '\'' | '’')).collect();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<Class> = None;
    for (i, &c) in chars.iter().enumerate() {
        let Some(class) = class_of(c) else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        };
        let next = chars.get(i + 1).copied().and_then(class_of);
        let boundary = match (prev, class) {
            (None, _) => false,
            (Some(Class::Lower), Class::Upper) => true,
            (Some(Class::Digit), Class::Upper | Class::Lower) => true,
            (Some(Class::Upper | Class::Lower), Class::Digit) => true,
            (Some(Class::Upper), Class::Upper) => next == Some(Class::Lower),
            _ => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(class);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Lower kebab-case: "The Lord of the Rings" becomes "the-lord-of-the-rings".
pub fn kebab_case(s: &str) -> String {
    words(&remove_accents(s))
        .iter()
        .map(|word| {
            word.to_lowercase()
                .chars()
                .filter(|c| !is_combining_mark(*c))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// The comparable slug of a title or author name.
pub fn normalize(s: &str) -> String {
    kebab_case(&strip_punctuation(s))
}
