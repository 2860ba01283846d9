//! Adapter for the self-describing markdown source-file format (§6): fenced
//! code blocks tagged with a fixed language identifier are concatenated to
//! form the source text fed to a [Frontend](super::Frontend); everything
//! outside those fences is ignored.

#[cfg(test)]
mod __tests__;

/// Extract and preprocess the source embedded in `markdown`'s fenced code
/// blocks tagged ```` ```{language} ````. Within a fence, an unescaped `#`
/// starts a line comment running to end-of-line; `%!X` escapes the next
/// character `X`, protecting it from comment-start meaning.
pub fn extract(markdown: &str, language: &str) -> String {
    let fence_open = format!("```{}", language);
    let mut in_fence = false;
    let mut source = String::new();

    for raw_line in markdown.lines() {
        let line = raw_line.trim_end_matches('\r');
        if !in_fence {
            if line.trim_start() == fence_open {
                in_fence = true;
            }
            continue;
        }
        if line.trim_start() == "```" {
            in_fence = false;
            continue;
        }
        source.push_str(&strip_comment(line));
        source.push('\n');
    }

    source
}

fn strip_comment(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' && chars.peek() == Some(&'!') {
            chars.next();
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
            continue;
        }
        if c == '#' {
            break;
        }
        result.push(c);
    }
    result
}
