//! Inline paragraph markup.
//!
//! Narrative fields may carry a tiny subset of HTML-like tags (`<b>`, `<i>`,
//! `<br/>`) plus the common character entities. Anything else is treated as
//! text with the tag itself dropped.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct SpanState {
    bold: u32,
    italic: u32,
}

/// Parses markup into spans. A forced line break is a span containing `"\n"`.
pub fn parse(input: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut state = SpanState::default();
    let mut text = String::new();
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '<' => {
                let opens_tag = rest[1..]
                    .chars()
                    .next()
                    .is_some_and(|next| next.is_ascii_alphabetic() || next == '/');
                if let Some(end) = rest.find('>').filter(|_| opens_tag) {
                    let tag = rest[1..end].trim();
                    if let Some(next) = apply_tag(tag, state) {
                        flush(&mut spans, &mut text, state);
                        match next {
                            TagEffect::State(next_state) => state = next_state,
                            TagEffect::LineBreak => push_text(&mut spans, "\n", state),
                        }
                        rest = &rest[end + 1..];
                        continue;
                    }
                    if is_tag_like(tag) {
                        rest = &rest[end + 1..];
                        continue;
                    }
                }
                text.push('<');
                rest = &rest[1..];
            }
            '&' => {
                let (decoded, consumed) = decode_entity(rest);
                text.push_str(decoded);
                rest = &rest[consumed..];
            }
            _ => {
                text.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    flush(&mut spans, &mut text, state);
    spans
}

/// Markup with tags removed and entities decoded.
pub fn plain_text(input: &str) -> String {
    parse(input).into_iter().map(|span| span.text).collect()
}

enum TagEffect {
    State(SpanState),
    LineBreak,
}

fn apply_tag(tag: &str, mut state: SpanState) -> Option<TagEffect> {
    let lower = tag.to_ascii_lowercase();
    let name = lower.trim_end_matches('/').trim();
    match name {
        "b" | "strong" => state.bold += 1,
        "/b" | "/strong" => state.bold = state.bold.saturating_sub(1),
        "i" | "em" => state.italic += 1,
        "/i" | "/em" => state.italic = state.italic.saturating_sub(1),
        "br" => return Some(TagEffect::LineBreak),
        _ => return None,
    }
    Some(TagEffect::State(state))
}

fn is_tag_like(tag: &str) -> bool {
    let name = tag.trim_start_matches('/');
    name.chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '=' | '"' | '\'' | '/' | '-' | '#' | '.'))
}

fn decode_entity(rest: &str) -> (&'static str, usize) {
    const ENTITIES: [(&str, &str); 6] = [
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&apos;", "'"),
        ("&nbsp;", "\u{00A0}"),
    ];
    for (entity, decoded) in ENTITIES {
        if rest.starts_with(entity) {
            return (decoded, entity.len());
        }
    }
    ("&", 1)
}

fn flush(spans: &mut Vec<Span>, text: &mut String, state: SpanState) {
    if text.is_empty() {
        return;
    }
    push_text(spans, text, state);
    text.clear();
}

fn push_text(spans: &mut Vec<Span>, text: &str, state: SpanState) {
    let bold = state.bold > 0;
    let italic = state.italic > 0;
    if text != "\n" {
        if let Some(last) = spans.last_mut() {
            if last.bold == bold && last.italic == italic && last.text != "\n" {
                last.text.push_str(text);
                return;
            }
        }
    }
    spans.push(Span {
        text: text.to_string(),
        bold,
        italic,
    });
}
