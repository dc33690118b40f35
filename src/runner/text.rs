//! Small text formatting helpers

/// Column that [`wrap`] fills paragraphs to
pub const WRAP_WIDTH: usize = 79;

/// Join `fragments` and fill the result to [`WRAP_WIDTH`] columns
///
/// Line breaks already present in the fragments start new paragraphs.
pub fn wrap(fragments: &[&str]) -> String {
    let joined = fragments.concat();
    joined
        .split('\n')
        .map(fill_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn fill_line(line: &str) -> String {
    let mut filled = String::new();
    let mut width = 0;

    for word in line.split_whitespace() {
        let len = word.chars().count();
        if width > 0 && width + 1 + len > WRAP_WIDTH {
            filled.push('\n');
            width = 0;
        } else if width > 0 {
            filled.push(' ');
            width += 1;
        }
        filled.push_str(word);
        width += len;
    }

    filled
}

/// The form of `noun` that goes with `count`
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        return noun.to_string();
    }
    let sibilant = ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|ending| noun.ends_with(ending));
    if sibilant {
        format!("{}es", noun)
    } else {
        format!("{}s", noun)
    }
}

/// Prefix every line of `text` with `prefix`
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn a function identifier into a title
///
/// Underscores become spaces and every word is capitalized:
/// `failed_test_with_helper` becomes `Failed Test With Helper`.
pub fn title_case(identifier: &str) -> String {
    identifier
        .replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
