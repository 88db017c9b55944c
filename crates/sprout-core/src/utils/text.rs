//! Text helpers for diagnostics messages.

/// `""` for one item, `"s"` otherwise
pub fn pluralise(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Join items as `a, b or c`
pub fn join_or<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} or {}", head.join(", "), last.as_ref())
        },
    }
}

/// Suggest the closest candidate within an edit distance of 2
pub fn suggest_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for &candidate in candidates {
        let distance = edit_distance(input, candidate);
        if distance < best_distance && distance <= 2 {
            best_distance = distance;
            best_match = Some(candidate);
        }
    }

    best_match
}

/// Levenshtein distance between two strings, counted in chars.
///
/// Keeps only the previous and current rows of the distance table.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=target.len()).collect();
    let mut current = vec![0; target.len() + 1];

    for (i, source) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, &ch) in target.iter().enumerate() {
            let substitution = previous[j] + usize::from(source != ch);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[target.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralise() {
        assert_eq!(pluralise(0), "s");
        assert_eq!(pluralise(1), "");
        assert_eq!(pluralise(2), "s");
    }

    #[test]
    fn test_join_or() {
        assert_eq!(join_or::<&str>(&[]), "");
        assert_eq!(join_or(&["a string"]), "a string");
        assert_eq!(join_or(&["false", "an object"]), "false or an object");
        assert_eq!(join_or(&["a", "b", "c"]), "a, b or c");
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("react-ap", "react-app"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("babel", ""), 5);
        assert_eq!(edit_distance("webpack", "wepback"), 2);
    }

    #[test]
    fn test_suggest_similar() {
        let types = ["react-app", "react-component", "web-module"];
        assert_eq!(suggest_similar("react-ap", &types), Some("react-app"));
        assert_eq!(suggest_similar("web-modul", &types), Some("web-module"));
        assert_eq!(suggest_similar("angular", &types), None);
    }
}
