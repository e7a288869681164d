//! Math delimiter scanning
//!
//! Finds TeX math in markdown source before the markdown parser runs.
//! Four delimiter pairs are recognized: `$$...$$` and `\[...\]` for
//! display math, `$...$` and `\(...\)` for inline math. Fenced code
//! blocks and inline code spans are left untouched, as is anything
//! with an unmatched closing delimiter.
//!
//! The pass works in two phases. [`extract_math`] replaces each math
//! region with an opaque placeholder token the markdown parser treats
//! as plain text, so backslash escapes and emphasis never touch the
//! TeX body. After HTML conversion, [`restore_math`] splices the math
//! markup back in: escaped TeX inside normalized `\(...\)` / `\[...\]`
//! delimiters so the document shell's typesetter finds it, wrapped in
//! `math-inline` / `math-display` classes so inline and display
//! regions stay distinguishable in the raw HTML.

/// Placeholder token boundaries, from the private use area so they
/// never collide with document text
const REGION_OPEN: char = '\u{E000}';
const REGION_CLOSE: char = '\u{E001}';

/// Markdown with math regions masked out, plus the markup to restore
#[derive(Debug)]
pub struct MathRegions {
    /// Source text with each math region replaced by a placeholder
    pub masked: String,

    /// Final HTML markup for each region, indexed by placeholder
    pub markup: Vec<String>,
}

/// Replace math regions in markdown source with placeholder tokens
pub fn extract_math(markdown: &str) -> MathRegions {
    let chars: Vec<char> = markdown.chars().collect();
    let len = chars.len();
    let mut masked = String::with_capacity(markdown.len());
    let mut markup: Vec<String> = Vec::new();
    let mut i = 0;

    let mask = |out: &mut String, markup: &mut Vec<String>, region: String| {
        out.push(REGION_OPEN);
        out.push_str(&markup.len().to_string());
        out.push(REGION_CLOSE);
        markup.push(region);
    };

    while i < len {
        // Fenced code blocks (``` or ~~~) pass through verbatim
        if at_line_start(&chars, i) && is_fence(&chars, i) {
            i = copy_fenced_block(&chars, i, &mut masked);
            continue;
        }

        // Inline code spans pass through verbatim
        if chars[i] == '`' {
            i = copy_code_span(&chars, i, &mut masked);
            continue;
        }

        // Escaped dollar is literal
        if chars[i] == '\\' && i + 1 < len && chars[i + 1] == '$' {
            masked.push('$');
            i += 2;
            continue;
        }

        // Display math: $$...$$
        if chars[i] == '$' && i + 1 < len && chars[i + 1] == '$' {
            if let Some(end) = find_seq(&chars, i + 2, &['$', '$']) {
                let tex: String = chars[i + 2..end].iter().collect();
                mask(&mut masked, &mut markup, display_markup(&tex));
                i = end + 2;
                continue;
            }
        }

        // Display math: \[...\]
        if chars[i] == '\\' && i + 1 < len && chars[i + 1] == '[' {
            if let Some(end) = find_seq(&chars, i + 2, &['\\', ']']) {
                let tex: String = chars[i + 2..end].iter().collect();
                mask(&mut masked, &mut markup, display_markup(&tex));
                i = end + 2;
                continue;
            }
        }

        // Inline math: \(...\)
        if chars[i] == '\\' && i + 1 < len && chars[i + 1] == '(' {
            if let Some(end) = find_seq(&chars, i + 2, &['\\', ')']) {
                let tex: String = chars[i + 2..end].iter().collect();
                mask(&mut masked, &mut markup, inline_markup(&tex));
                i = end + 2;
                continue;
            }
        }

        // Inline math: $...$ (single line, non-empty)
        if chars[i] == '$' {
            if let Some(end) = find_inline_dollar_close(&chars, i + 1) {
                let tex: String = chars[i + 1..end].iter().collect();
                mask(&mut masked, &mut markup, inline_markup(&tex));
                i = end + 1;
                continue;
            }
        }

        masked.push(chars[i]);
        i += 1;
    }

    MathRegions { masked, markup }
}

/// Splice math markup back over the placeholder tokens in `html`
///
/// Placeholders with no matching region (stray private-use characters
/// in the source) are left as-is.
pub fn restore_math(html: &str, markup: &[String]) -> String {
    if markup.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find(REGION_OPEN) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + REGION_OPEN.len_utf8()..];
        match after.find(REGION_CLOSE) {
            Some(end) => {
                let region = after[..end]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| markup.get(idx));
                match region {
                    Some(m) => out.push_str(m),
                    None => out.push_str(
                        &rest[pos..pos + REGION_OPEN.len_utf8() + end + REGION_CLOSE.len_utf8()],
                    ),
                }
                rest = &after[end + REGION_CLOSE.len_utf8()..];
            }
            None => {
                out.push_str(&rest[pos..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn display_markup(tex: &str) -> String {
    format!(
        r#"<div class="math math-display">\[{}\]</div>"#,
        escape_tex(tex)
    )
}

fn inline_markup(tex: &str) -> String {
    format!(
        r#"<span class="math math-inline">\({}\)</span>"#,
        escape_tex(tex)
    )
}

/// Escape the TeX body so it survives as HTML text content
fn escape_tex(tex: &str) -> String {
    tex.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn at_line_start(chars: &[char], i: usize) -> bool {
    i == 0 || chars[i - 1] == '\n'
}

fn is_fence(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    (c == '`' || c == '~') && chars[i..].iter().take_while(|&&x| x == c).count() >= 3
}

/// Copy a fenced code block verbatim, returning the index past its end
fn copy_fenced_block(chars: &[char], start: usize, out: &mut String) -> usize {
    let fence_char = chars[start];
    let mut i = start;
    while i < chars.len() && chars[i] == fence_char {
        i += 1;
    }
    let fence_len = i - start;
    for &c in &chars[start..i] {
        out.push(c);
    }

    // Rest of the info string
    while i < chars.len() && chars[i] != '\n' {
        out.push(chars[i]);
        i += 1;
    }

    // Body, until a closing fence of at least the same length
    loop {
        if i >= chars.len() {
            return i;
        }
        out.push(chars[i]);
        let at_newline = chars[i] == '\n';
        i += 1;
        if at_newline && i < chars.len() && chars[i] == fence_char {
            let close_start = i;
            while i < chars.len() && chars[i] == fence_char {
                i += 1;
            }
            for &c in &chars[close_start..i] {
                out.push(c);
            }
            if i - close_start >= fence_len {
                return i;
            }
        }
    }
}

/// Copy an inline code span verbatim, returning the index past its end
///
/// A span opened by a run of N backticks closes only at a run of
/// exactly N backticks.
fn copy_code_span(chars: &[char], start: usize, out: &mut String) -> usize {
    let mut i = start;
    while i < chars.len() && chars[i] == '`' {
        out.push('`');
        i += 1;
    }
    let open_len = i - start;

    loop {
        if i >= chars.len() {
            return i;
        }
        if chars[i] == '`' {
            let run_start = i;
            while i < chars.len() && chars[i] == '`' {
                out.push('`');
                i += 1;
            }
            if i - run_start == open_len {
                return i;
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
}

/// Find the next occurrence of a two-character sequence
fn find_seq(chars: &[char], from: usize, seq: &[char; 2]) -> Option<usize> {
    let mut i = from;
    while i + 1 < chars.len() {
        if chars[i] == seq[0] && chars[i + 1] == seq[1] {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Find the closing `$` of an inline expression
///
/// The match must be non-empty and close before the end of the line;
/// an escaped `\$` does not close.
fn find_inline_dollar_close(chars: &[char], from: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        match chars[i] {
            '\n' => return None,
            '\\' => i += 2,
            '$' => {
                if i == from {
                    return None;
                }
                return Some(i);
            }
            _ => i += 1,
        }
    }
    None
}
