use tracing::debug;

/// A maximal run of a reply: either a fenced code block or prose between fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Code {
        language: Option<String>,
        code: String,
    },
    Prose(String),
}

/// Opening fence: "```" plus an optional language tag with no spaces or backticks.
fn opening_fence(line: &str) -> Option<Option<&str>> {
    let tag = line.trim().strip_prefix("```")?;
    if tag.contains(|c: char| c == '`' || c.is_whitespace()) {
        return None;
    }
    Some((!tag.is_empty()).then_some(tag))
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == "```"
}

/// Split a reply into code and prose segments in source order.
///
/// Fence lines themselves are dropped. An opening fence without a matching
/// close is left as prose, along with everything after it.
pub fn segment(reply: &str) -> Vec<Segment> {
    let lines: Vec<&str> = reply.lines().collect();
    let mut segments = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(language) = opening_fence(lines[i]) else {
            prose.push(lines[i]);
            i += 1;
            continue;
        };

        let Some(close) = lines[i + 1..].iter().position(|l| is_closing_fence(l)) else {
            debug!(line = i + 1, "unterminated code fence, keeping rest as prose");
            prose.extend_from_slice(&lines[i..]);
            break;
        };

        push_prose(&mut segments, &mut prose);
        let body = &lines[i + 1..i + 1 + close];
        segments.push(Segment::Code {
            language: language.map(str::to_string),
            code: body.join("\n"),
        });
        i += close + 2;
    }

    push_prose(&mut segments, &mut prose);
    segments
}

fn push_prose(segments: &mut Vec<Segment>, prose: &mut Vec<&str>) {
    if prose.iter().any(|l| !l.trim().is_empty()) {
        segments.push(Segment::Prose(prose.join("\n")));
    }
    prose.clear();
}
