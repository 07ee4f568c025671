use std::borrow::Cow;

const TRUNCATE_AT: usize = 497;

/// Shortens long text for error and log messages, never splitting a character.
pub fn truncate_long(value: &str) -> Cow<'_, str> {
    if value.len() <= TRUNCATE_AT {
        return Cow::Borrowed(value);
    }
    let mut end = TRUNCATE_AT;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}...", value[..end].trim_end()))
}

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

/// English plural of a lower-cased noun, enough for table names.
///
/// Whole words listed as irregular or uncountable are looked up (`person` gives `people`,
/// `sheep` stays `sheep`). Anything else, compounds like `salesperson` included, follows the
/// regular rules: consonant + `y` becomes `ies`, sibilants take `es`, the rest take `s`.
pub fn pluralize(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    let consonant_y = word
        .strip_suffix('y')
        .and_then(|stem| stem.chars().last())
        .is_some_and(|c| !"aeiou".contains(c));
    if word.is_empty() {
        String::new()
    } else if consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}
