//! `Link` header parsing for paginated responses.
//!
//! The directory announces continuation pages through RFC 8288 style
//! headers:
//!
//! ```text
//! <https://api.github.com/repositories/1/contributors?per_page=100&page=2>; rel="next",
//! <https://api.github.com/repositories/1/contributors?per_page=100&page=5>; rel="last"
//! ```

/// Returns the target of the first link whose `rel` list contains `relation`.
pub fn find_relation<'a>(header: &'a str, relation: &str) -> Option<&'a str> {
    links(header).find_map(|(target, params)| {
        let params = params.trim_start().strip_prefix(';')?;

        let matches = params.split(';').any(|param| {
            let Some((name, value)) = param.split_once('=') else {
                return false;
            };
            name.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_ascii_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case(relation))
        });

        matches.then_some(target)
    })
}

/// Splits a header into `(target, params)` pairs.
///
/// Targets run from `<` to the next `>` and may contain commas. Parameters
/// end at the first comma outside a quoted string.
fn links(header: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut rest = header;
    std::iter::from_fn(move || {
        let open = rest.find('<')?;
        let after = &rest[open + 1..];
        let close = after.find('>')?;
        let target = &after[..close];
        let tail = &after[close + 1..];

        let mut quoted = false;
        let end = tail
            .char_indices()
            .find_map(|(index, c)| match c {
                '"' => {
                    quoted = !quoted;
                    None
                }
                ',' if !quoted => Some(index),
                _ => None,
            })
            .unwrap_or(tail.len());

        rest = &tail[end..];
        Some((target.trim(), &tail[..end]))
    })
}

/// Returns the continuation URL of a page, if any.
pub fn next_page(header: &str) -> Option<&str> {
    find_relation(header, "next")
}

#[cfg(test)]
mod tests {
    use super::*;

    const GITHUB_HEADER: &str = "<https://api.github.com/repositories/1/contributors?per_page=100&page=2>; rel=\"next\", \
         <https://api.github.com/repositories/1/contributors?per_page=100&page=5>; rel=\"last\"";

    #[test]
    fn test_next_page_found() {
        assert_eq!(
            next_page(GITHUB_HEADER),
            Some("https://api.github.com/repositories/1/contributors?per_page=100&page=2")
        );
    }

    #[test]
    fn test_other_relations() {
        assert_eq!(
            find_relation(GITHUB_HEADER, "last"),
            Some("https://api.github.com/repositories/1/contributors?per_page=100&page=5")
        );
        assert_eq!(find_relation(GITHUB_HEADER, "prev"), None);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let header = "<https://api.github.com/x?page=1>; rel=\"prev\", <https://api.github.com/x?page=1>; rel=\"first\"";
        assert_eq!(next_page(header), None);
    }

    #[test]
    fn test_unquoted_and_multi_valued_rel() {
        assert_eq!(next_page("<https://a.example/2>; rel=next"), Some("https://a.example/2"));
        assert_eq!(
            next_page("<https://a.example/2>; title=\"x\"; rel=\"last next\""),
            Some("https://a.example/2")
        );
    }

    #[test]
    fn test_commas_inside_targets_and_quotes() {
        assert_eq!(
            next_page("<https://a.example/list?ids=1,2&page=2>; rel=\"next\""),
            Some("https://a.example/list?ids=1,2&page=2")
        );
        assert_eq!(
            next_page(
                "<https://a.example/1>; title=\"a, b\"; rel=\"prev\", <https://a.example/2>; rel=\"next\""
            ),
            Some("https://a.example/2")
        );
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(next_page(""), None);
        assert_eq!(next_page("https://a.example/2; rel=\"next\""), None);
        assert_eq!(next_page("<https://a.example/2>"), None);
    }
}
