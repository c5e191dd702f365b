// src/render/asciidoc.rs
//! Markdown to AsciiDoc conversion for rendered digest entries.
//!
//! This is a deliberately small, line-oriented transform covering the
//! constructs that actually occur in dev docs excerpts: ATX headings, bold,
//! links, images, fenced code blocks, and dash list items. Inline backtick
//! code and `_italic_` are already valid AsciiDoc and pass through untouched.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#+) (.*)$").expect("Failed to compile heading regex"));
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```([A-Za-z0-9_+-]*)\s*$").expect("Failed to compile fence regex"));
static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^- (.*)$").expect("Failed to compile list item regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("Failed to compile bold regex"));
// Image syntax embeds link syntax, so images must be rewritten first
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("Failed to compile image regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Failed to compile link regex"));

/// Converts a Markdown fragment into AsciiDoc. Pure text transform; lines
/// inside fenced code blocks are copied verbatim.
pub fn convert(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        if let Some(caps) = FENCE_RE.captures(line) {
            if in_fence {
                out.push("----".to_string());
                in_fence = false;
            } else {
                let lang = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                if lang.is_empty() {
                    out.push("[source]".to_string());
                } else {
                    out.push(format!("[source,{}]", lang));
                }
                out.push("----".to_string());
                in_fence = true;
            }
            continue;
        }

        if in_fence {
            out.push(line.to_string());
            continue;
        }

        out.push(convert_line(line));
    }

    // Close an unterminated fence so the block cannot swallow following entries
    if in_fence {
        out.push("----".to_string());
    }

    let mut result = out.join("\n");
    if markdown.ends_with('\n') {
        result.push('\n');
    }
    result
}

fn convert_line(line: &str) -> String {
    if let Some(caps) = HEADING_RE.captures(line) {
        return format!("{} {}", "=".repeat(caps[1].len()), &caps[2]);
    }

    let line = LIST_ITEM_RE.replace(line, "* $1");
    let line = BOLD_RE.replace_all(&line, "*$1*");
    let line = IMAGE_RE.replace_all(&line, "image::$2[$1]");
    let line = LINK_RE.replace_all(&line, "$2[$1]");
    line.into_owned()
}
