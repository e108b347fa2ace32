use crate::block::Inline;

/// Format one run of text into inline nodes.
///
/// Passes run in precedence order: code spans, `**bold**`, `*italic*`, then
/// `[label](href)`. Each pass only looks at the plain text left by the passes
/// before it, so a code span never contains bold and bold never contains
/// italic. Delimiters that do not close are kept as literal text.
pub fn format_inline(text: &str) -> Vec<Inline> {
    let nodes = split_code(text);
    let nodes = refine(nodes, split_bold);
    let nodes = refine(nodes, split_italic);
    refine(nodes, split_links)
}

fn refine(nodes: Vec<Inline>, pass: fn(&str) -> Vec<Inline>) -> Vec<Inline> {
    nodes
        .into_iter()
        .flat_map(|node| match node {
            Inline::Text(text) => pass(&text),
            other => vec![other],
        })
        .collect()
}

/// Collects plain text between matches so unmatched delimiters stay in one run.
#[derive(Default)]
struct Runs {
    nodes: Vec<Inline>,
    plain: String,
}

impl Runs {
    fn text(&mut self, s: &str) {
        self.plain.push_str(s);
    }

    fn node(&mut self, node: Inline) {
        self.flush();
        self.nodes.push(node);
    }

    fn flush(&mut self) {
        if !self.plain.is_empty() {
            self.nodes.push(Inline::Text(std::mem::take(&mut self.plain)));
        }
    }

    fn finish(mut self, rest: &str) -> Vec<Inline> {
        self.text(rest);
        self.flush();
        self.nodes
    }
}

/// Split `text` on `delim ... delim` pairs with a non-empty payload.
fn split_delimited(text: &str, delim: &str, wrap: fn(&str) -> Inline) -> Vec<Inline> {
    let mut runs = Runs::default();
    let mut rest = text;

    while let Some(open) = rest.find(delim) {
        let after = &rest[open + delim.len()..];
        match after.find(delim) {
            Some(0) => {
                // Empty payload: the opener is literal, retry from the second delimiter
                runs.text(&rest[..open + delim.len()]);
                rest = after;
            }
            Some(close) => {
                runs.text(&rest[..open]);
                runs.node(wrap(&after[..close]));
                rest = &after[close + delim.len()..];
            }
            None => break,
        }
    }

    runs.finish(rest)
}

fn split_code(text: &str) -> Vec<Inline> {
    split_delimited(text, "`", |code| Inline::Code(code.to_string()))
}

fn split_bold(text: &str) -> Vec<Inline> {
    split_delimited(text, "**", |inner| Inline::Bold(vec![Inline::text(inner)]))
}

fn split_italic(text: &str) -> Vec<Inline> {
    let bytes = text.as_bytes();
    // A lone `*`; either half of a `**` never delimits italics.
    let is_delim = |i: usize| {
        bytes[i] == b'*'
            && (i == 0 || bytes[i - 1] != b'*')
            && bytes.get(i + 1).is_none_or(|&b| b != b'*')
    };

    let mut runs = Runs::default();
    let mut consumed = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('*') {
        let open = pos + offset;
        if !is_delim(open) {
            pos = open + 1;
            continue;
        }
        let Some(close) = text[open + 1..].find('*').map(|c| open + 1 + c) else {
            break;
        };
        if is_delim(close) && close > open + 1 {
            runs.text(&text[consumed..open]);
            runs.node(Inline::Italic(vec![Inline::text(&text[open + 1..close])]));
            consumed = close + 1;
            pos = close + 1;
        } else {
            pos = close;
        }
    }

    runs.finish(&text[consumed..])
}

fn split_links(text: &str) -> Vec<Inline> {
    let mut runs = Runs::default();
    let mut consumed = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('[') {
        let open = pos + offset;

        match match_link(&text[open..]) {
            LinkMatch::Found { label, href, len } => {
                runs.text(&text[consumed..open]);
                runs.node(Inline::Link {
                    label: vec![Inline::text(label)],
                    href: href.to_string(),
                });
                consumed = open + len;
                pos = consumed;
            }
            LinkMatch::Skip(len) => pos = open + len,
            LinkMatch::Exhausted => break,
        }
    }

    runs.finish(&text[consumed..])
}

enum LinkMatch<'a> {
    Found {
        label: &'a str,
        href: &'a str,
        len: usize,
    },
    /// No link opens at any `[` before this offset; they all share the same `]`.
    Skip(usize),
    /// No `]` or `)` left in the text, so no later `[` can match either.
    Exhausted,
}

/// Match `[label](href)` at the start of `s`.
fn match_link(s: &str) -> LinkMatch<'_> {
    let Some(label_end) = s[1..].find(']').map(|i| i + 1) else {
        return LinkMatch::Exhausted;
    };
    let skip = LinkMatch::Skip(label_end + 1);
    let label = &s[1..label_end];
    let Some(tail) = s[label_end + 1..].strip_prefix('(') else {
        return skip;
    };
    let Some(href_len) = tail.find(')') else {
        return LinkMatch::Exhausted;
    };
    let href = &tail[..href_len];
    if label.is_empty() || href.is_empty() {
        return skip;
    }
    LinkMatch::Found {
        label,
        href,
        len: label_end + 2 + href_len + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> Inline {
        Inline::text(s)
    }

    fn bold(s: &str) -> Inline {
        Inline::Bold(vec![text(s)])
    }

    fn italic(s: &str) -> Inline {
        Inline::Italic(vec![text(s)])
    }

    fn code(s: &str) -> Inline {
        Inline::Code(s.to_string())
    }

    fn link(label: &str, href: &str) -> Inline {
        Inline::Link {
            label: vec![text(label)],
            href: href.to_string(),
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(format_inline(""), vec![]);
    }

    #[test]
    fn plain_text() {
        assert_eq!(format_inline("just words"), vec![text("just words")]);
    }

    #[test]
    fn mixed_formatting() {
        assert_eq!(
            format_inline(
                "Run `cargo test` with **care** and *patience*, see [docs](https://docs.rs)."
            ),
            vec![
                text("Run "),
                code("cargo test"),
                text(" with "),
                bold("care"),
                text(" and "),
                italic("patience"),
                text(", see "),
                link("docs", "https://docs.rs"),
                text("."),
            ]
        );
    }

    #[test]
    fn bold_swallows_inner_italic() {
        assert_eq!(
            format_inline("**bold *not-italic* still bold**"),
            vec![bold("bold *not-italic* still bold")]
        );
    }

    #[test]
    fn bold_closes_at_first_pair() {
        assert_eq!(
            format_inline("**a** and **b**"),
            vec![bold("a"), text(" and "), bold("b")]
        );
    }

    #[test]
    fn code_span_is_not_formatted() {
        assert_eq!(
            format_inline("`**not bold** [x](y)`"),
            vec![code("**not bold** [x](y)")]
        );
    }

    #[test]
    fn code_splits_bold() {
        // The code pass runs first, so the `**` pair is broken apart.
        assert_eq!(
            format_inline("**a `b` c**"),
            vec![text("**a "), code("b"), text(" c**")]
        );
    }

    #[test]
    fn italic_skips_double_star() {
        assert_eq!(format_inline("**a*"), vec![text("**a*")]);
    }

    #[test]
    fn italic_across_lines() {
        assert_eq!(format_inline("*one\ntwo*"), vec![italic("one\ntwo")]);
    }

    #[test]
    fn link_inside_bold_stays_literal() {
        assert_eq!(format_inline("**[a](b)**"), vec![bold("[a](b)")]);
    }

    #[test]
    fn link_after_failed_bracket() {
        assert_eq!(
            format_inline("[note] see [here](http://x.y)"),
            vec![text("[note] see "), link("here", "http://x.y")]
        );
    }

    #[test]
    fn unicode_around_delimiters() {
        assert_eq!(
            format_inline("héllo *wörld* ✓"),
            vec![text("héllo "), italic("wörld"), text(" ✓")]
        );
    }

    #[test]
    fn nested_brackets_use_outer_opener() {
        assert_eq!(format_inline("[[a](b)"), vec![link("[a", "b")]);
    }

    #[test]
    fn link_after_empty_href() {
        assert_eq!(
            format_inline("[a]() [b](c)"),
            vec![text("[a]() "), link("b", "c")]
        );
    }

    #[test]
    fn many_unclosed_links_stay_literal() {
        let input = "[a](".repeat(100_000);
        let start = std::time::Instant::now();
        assert_eq!(format_inline(&input), vec![text(&input)]);
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn many_brackets_without_links() {
        let input = "[a] ".repeat(100_000);
        assert_eq!(format_inline(&input), vec![text(&input)]);
    }

    #[rstest]
    #[case("a * b")]
    #[case("stray ` backtick")]
    #[case("``")]
    #[case("****")]
    #[case("**unclosed bold")]
    #[case("[label](")]
    #[case("[](href)")]
    #[case("[label]()")]
    #[case("[label] (href)")]
    #[case("2 ** 3")]
    fn unmatched_delimiters_are_literal(#[case] input: &str) {
        assert_eq!(format_inline(input), vec![text(input)]);
    }
}
