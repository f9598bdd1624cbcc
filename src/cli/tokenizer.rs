//! Lexical split of an input line into its command segment and `/param` segments.

/// A `/name value…` segment after the command segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamToken<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> ParamToken<'a> {
    fn from_segment(segment: &'a str) -> Self {
        match segment.split_once(char::is_whitespace) {
            Some((name, rest)) => {
                let value = rest.trim();
                Self {
                    name,
                    value: (!value.is_empty()).then_some(value),
                }
            }
            None => Self {
                name: segment,
                value: None,
            },
        }
    }
}

/// Splits the trimmed line wherever whitespace is directly followed by `/` and a
/// lowercase ASCII letter. The whitespace and slash are dropped.
///
/// `"cmd /a 1 /b 2"` yields `["cmd", "a 1", "b 2"]`; `1/1`, `a / b` and a
/// trailing `a/` stay inside their segment.
pub fn split_segments(line: &str) -> Vec<&str> {
    let line = line.trim();
    let bytes = line.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        if !bytes[idx].is_ascii_whitespace() {
            idx += 1;
            continue;
        }
        let run_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
            idx += 1;
        }
        let is_boundary = bytes.get(idx) == Some(&b'/')
            && bytes.get(idx + 1).is_some_and(u8::is_ascii_lowercase);
        if is_boundary {
            segments.push(&line[start..run_start]);
            start = idx + 1;
            idx += 1;
        }
    }
    segments.push(&line[start..]);
    segments
}

/// First segment followed by the parsed `/param` tokens.
pub fn tokenize(line: &str) -> (&str, Vec<ParamToken<'_>>) {
    let mut segments = split_segments(line).into_iter();
    let head = segments.next().unwrap_or_default();
    (head, segments.map(ParamToken::from_segment).collect())
}
