use std::sync::LazyLock;

use regex::Regex;

static COLUMN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("column name pattern"));

/// Stricter than [crate::lex::is_identifier]: no leading digit.
pub fn is_valid_column_name(name: &str) -> bool {
    COLUMN_NAME.is_match(name)
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('_') {
        out.push('_');
    }
}

/// Converts `CamelCase` style names to `snake_case`.
///
/// A run of capitals is one word (`userID` => `user_id`), anything that isn't
///  alphanumeric becomes a single `_`, and names that are entirely capitals
///  (`ID`, `ID_CODE`) are just lowercased.
pub fn snake_case(name: &str) -> String {
    if name
        .chars()
        .filter(|c| c.is_alphabetic())
        .all(|c| c.is_uppercase())
    {
        return name.to_lowercase();
    }

    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_upper = false;
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !prev_upper {
                push_separator(&mut out);
            }
            out.extend(c.to_lowercase());
            prev_upper = true;
        } else if c.is_alphanumeric() {
            out.push(c);
            prev_upper = false;
        } else {
            push_separator(&mut out);
            prev_upper = false;
        }
    }
    out.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names() {
        assert!(is_valid_column_name("CreatedOn"));
        assert!(is_valid_column_name("_hidden"));
        assert!(is_valid_column_name("a1"));
        assert!(!is_valid_column_name("1abc"));
        assert!(!is_valid_column_name(""));
        assert!(!is_valid_column_name("a-b"));
    }

    #[test]
    fn snake_case_table() {
        let cases = [
            ("Name", "name"),
            ("DepartmetCode", "departmet_code"),
            ("BirdBirthday", "bird_birthday"),
            ("JoinYear", "join_year"),
            ("ID", "id"),
            ("Emp", "emp"),
            ("CreatedOn", "created_on"),
            ("UserName", "user_name"),
        ];
        for (input, expected) in cases {
            assert_eq!(snake_case(input), expected, "input: {input}");
        }
    }

    #[test]
    fn snake_case_acronyms_and_separators() {
        assert_eq!(snake_case("userID"), "user_id");
        assert_eq!(snake_case("HTTPServer"), "httpserver");
        assert_eq!(snake_case("ID_CODE"), "id_code");
        assert_eq!(snake_case("Join_Year"), "join_year");
        assert_eq!(snake_case("a__b"), "a_b");
        assert_eq!(snake_case("_Private_"), "private");
        assert_eq!(snake_case("Code123"), "code123");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case(""), "");
    }
}
