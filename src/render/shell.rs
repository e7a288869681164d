//! HTML document shell
//!
//! Wraps a rendered markdown fragment in a complete HTML document with
//! fixed styling and the KaTeX assets that typeset the math markup the
//! pipeline emitted. Styling values come from configuration, not from
//! the document.

use crate::config::{AssetConfig, ShellConfig};

/// Wrap an HTML fragment in the preview document shell
pub fn wrap_document(
    body: &str,
    shell: &ShellConfig,
    assets: &AssetConfig,
    syntax_css: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
{katex}
<style>
body {{
    font-family: '{font}', sans-serif;
    font-size: {size}px;
    font-weight: 600;
    color: {text};
    background-color: {background};
}}
mark {{
    background-color: #FFE066;
}}
.image-missing {{
    color: #AA3333;
    font-style: italic;
}}
pre.code-block {{
    background-color: rgba(0, 0, 0, 0.05);
    padding: 0.6em;
    overflow-x: auto;
}}
{syntax_css}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        katex = katex_block(assets),
        font = shell.font_family,
        size = shell.font_size_px,
        text = shell.text_color,
        background = shell.background_color,
        syntax_css = syntax_css,
        body = body,
    )
}

/// KaTeX stylesheet, scripts and the auto-render hook
///
/// The math pass normalizes every delimiter form to `\(...\)` and
/// `\[...\]`, so those are the only pairs the typesetter needs.
fn katex_block(assets: &AssetConfig) -> String {
    let dir = assets.katex_dir.display();
    format!(
        r#"<link rel="stylesheet" href="{dir}/katex.min.css">
<script defer src="{dir}/katex.min.js"></script>
<script defer src="{dir}/contrib/auto-render.min.js"></script>
<script>
    document.addEventListener("DOMContentLoaded", function() {{
        renderMathInElement(document.body, {{
            delimiters: [
                {{left: "\\[", right: "\\]", display: true}},
                {{left: "\\(", right: "\\)", display: false}}
            ]
        }});
    }});
</script>"#,
        dir = dir
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreviewConfig;

    #[test]
    fn test_shell_carries_configured_style() {
        let config = PreviewConfig::default();
        let html = wrap_document("<p>hi</p>", &config.shell, &config.assets, "");
        assert!(html.contains("font-family: 'Raleway'"));
        assert!(html.contains("font-size: 18px"));
        assert!(html.contains("background-color: #FFFFEE"));
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn test_shell_references_katex_assets() {
        let config = PreviewConfig::default();
        let html = wrap_document("", &config.shell, &config.assets, "");
        assert!(html.contains("assets/katex/katex.min.css"));
        assert!(html.contains("auto-render.min.js"));
        assert!(html.contains("renderMathInElement"));
    }

    #[test]
    fn test_shell_embeds_syntax_css() {
        let config = PreviewConfig::default();
        let html = wrap_document("", &config.shell, &config.assets, ".code { color: red; }");
        assert!(html.contains(".code { color: red; }"));
    }
}
