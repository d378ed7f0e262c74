/// A single CSS line split into the pieces the rewrite rules work with.
///
/// Concatenating `indent`, `content`, `trailing` and `terminator` gives back the exact
/// original line.
#[derive(Clone, PartialEq, Debug)]
pub struct LineParts<'a> {
    pub indent: &'a str,
    pub content: &'a str,
    pub trailing: &'a str,
    pub terminator: &'a str,
}

impl<'a> LineParts<'a> {
    pub fn split(line: &'a str) -> Self {
        let terminator = line_terminator(line);
        let body = &line[..line.len() - terminator.len()];

        let content_start = body.len() - body.trim_start().len();
        let content_end = body.trim_end().len().max(content_start);

        Self {
            indent: &body[..content_start],
            content: &body[content_start..content_end],
            trailing: &body[content_end..],
            terminator,
        }
    }
}

/// Returns the line ending carried by `line`, or an empty string for a final unterminated line.
pub fn line_terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// The line ending used by the document, `\n` when no line is terminated.
pub fn document_line_ending<S: AsRef<str>>(lines: &[S]) -> &'static str {
    match lines
        .iter()
        .map(|line| line_terminator(line.as_ref()))
        .find(|terminator| !terminator.is_empty())
    {
        Some("\r\n") => "\r\n",
        _ => "\n",
    }
}

/// Appends `line_ending` to `line` if it has no terminator yet.
pub fn ensure_terminated(line: &str, line_ending: &str) -> String {
    if line_terminator(line).is_empty() {
        format!("{}{}", line, line_ending)
    } else {
        line.to_string()
    }
}

/// A backdrop line mentions the property and carries a `url(` token.
///
/// Lines such as `background: var(--dplus-backdrop);` reference the property without
/// declaring a backdrop and are never touched.
pub fn is_backdrop_line(line: &str, property: &str) -> bool {
    line.contains(property) && line.contains("url(")
}

/// Extracts the value of the first `url(...)` token, without surrounding quotes.
///
/// Malformed tokens (no closing parenthesis) and empty values yield `None`.
pub fn extract_url(line: &str) -> Option<String> {
    let url_start = line.find("url(")? + 4;
    let url_end = url_start + line[url_start..].find(')')?;
    let raw_url = line[url_start..url_end].trim();

    let unquoted = ['"', '\'']
        .iter()
        .find_map(|quote| {
            if raw_url.len() >= 2 && raw_url.starts_with(*quote) && raw_url.ends_with(*quote) {
                Some(&raw_url[1..raw_url.len() - 1])
            } else {
                None
            }
        })
        .unwrap_or(raw_url);

    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

/// True when the trimmed line is wrapped in a single block comment.
pub fn is_commented(line: &str) -> bool {
    let content = LineParts::split(line).content;

    content.len() >= 4 && content.starts_with("/*") && content.ends_with("*/")
}

/// Wraps the line content in `/* */`, keeping indentation and line ending.
/// Already commented lines come back unchanged.
pub fn comment_line(line: &str) -> String {
    if is_commented(line) {
        return line.to_string();
    }

    let parts = LineParts::split(line);

    format!(
        "{}/*{}*/{}{}",
        parts.indent, parts.content, parts.trailing, parts.terminator
    )
}

/// Strips exactly one leading `/*` and one trailing `*/`, keeping indentation and line ending.
/// Lines that are not commented come back unchanged.
pub fn uncomment_line(line: &str) -> String {
    if !is_commented(line) {
        return line.to_string();
    }

    let parts = LineParts::split(line);
    let inner = parts.content[2..parts.content.len() - 2].trim();

    format!(
        "{}{}{}{}",
        parts.indent, inner, parts.trailing, parts.terminator
    )
}
