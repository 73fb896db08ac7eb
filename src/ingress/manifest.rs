pub const SEPARATOR: &str = "---";

/// Splits a multi-document manifest into fragments.
///
/// A separator is a line that is exactly `---` once trailing whitespace is
/// removed. Each fragment keeps its original text, trailing newline included.
/// Fragments made only of whitespace are dropped.
pub fn split(content: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();

    for line in content.split_inclusive('\n') {
        if line.trim_end() == SEPARATOR {
            fragments.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
        }
    }

    fragments.push(current);

    fragments
        .into_iter()
        .filter(|fragment| !fragment.trim().is_empty())
        .collect()
}

/// Rejoins fragments with `---\n`.
pub fn join<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut joined = String::new();

    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            if !joined.ends_with('\n') {
                joined.push('\n');
            }
            joined.push_str(SEPARATOR);
            joined.push('\n');
        }

        joined.push_str(fragment.as_ref());
    }

    joined
}
