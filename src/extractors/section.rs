// src/extractors/section.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
// Matched against the heading text, i.e. everything after the heading-marker
// characters and their single space. The marker words must start the heading
// text and end at a word boundary, so "## Dev Docs (API)" matches while
// "## DevDocsification" does not.
static DEV_DOCS_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^dev[- ]?docs?\b").expect("Failed to compile DEV_DOCS_MARKER_RE")
});

// --- Data Structures ---
/// The sub-document found behind a marker heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    /// Nesting level of the marker heading (`###` is depth 3).
    pub heading_depth: usize,
    /// Excerpt text with surrounding whitespace trimmed. Interior bytes are
    /// preserved verbatim, including CRLF line endings from tracker bodies.
    pub text: String,
}

// --- Main Extractor Structure ---
/// Locates a labeled subsection inside an arbitrarily structured free-text
/// document and trims it at the next sibling-or-higher heading.
///
/// The scan is line-anchored: heading-marker characters only count at the
/// start of a line, and only when followed by a single space. Extraction is
/// an explicit two-phase walk: find the marker heading and its depth, then
/// scan forward once for the first heading at that depth or shallower.
pub struct SectionExtractor {
    marker: Regex,
    heading_char: char,
}

impl SectionExtractor {
    /// Extractor for the production marker: case-insensitive "Dev Docs",
    /// "Dev-Docs", "DevDocs" or "Dev Doc" under Markdown `#` headings.
    pub fn dev_docs() -> Self {
        Self::new(DEV_DOCS_MARKER_RE.clone(), '#')
    }

    /// `marker` is matched against the heading text of every heading line;
    /// `heading_char` selects the heading syntax (`#` for Markdown, `=` for
    /// AsciiDoc-style documents).
    pub fn new(marker: Regex, heading_char: char) -> Self {
        Self {
            marker,
            heading_char,
        }
    }

    /// Returns the excerpt bounded by the marker heading and the next heading
    /// of equal-or-shallower depth, or `None` when no marker heading exists.
    ///
    /// Headings of strictly greater depth (sub-sections) stay inside the
    /// excerpt. Without a bounding heading the excerpt runs to the end of the
    /// document. The returned text can be empty when nothing but whitespace
    /// follows the marker; callers decide what an empty section means.
    pub fn extract(&self, document: &str) -> Option<ExtractedSection> {
        // Phase 1: walk the document's lines once for the marker heading.
        let (heading_depth, body_start) = self.find_marker(document)?;
        let body = &document[body_start..];

        // Phase 2: single forward scan for the first heading at the marker's
        // depth or shallower.
        let body_end = self.find_boundary(body, heading_depth).unwrap_or(body.len());

        Some(ExtractedSection {
            heading_depth,
            text: body[..body_end].trim().to_string(),
        })
    }

    /// Finds the first heading line whose heading text matches the marker
    /// pattern. Returns its depth and the byte offset just past its line.
    fn find_marker(&self, document: &str) -> Option<(usize, usize)> {
        let mut offset = 0;
        for line in document.split_inclusive('\n') {
            if let Some((depth, heading_text)) = self.split_heading(line) {
                if self.marker.is_match(heading_text) {
                    return Some((depth, offset + line.len()));
                }
            }
            offset += line.len();
        }
        None
    }

    /// Byte offset into `body` of the first line holding a heading of depth
    /// `max_depth` or shallower, or `None` when no such line exists.
    fn find_boundary(&self, body: &str, max_depth: usize) -> Option<usize> {
        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            if let Some((depth, _)) = self.split_heading(line) {
                if depth <= max_depth {
                    return Some(offset);
                }
            }
            offset += line.len();
        }
        None
    }

    /// Splits a raw line into heading depth and heading text. A heading is
    /// one or more marker characters followed by a single space; anything
    /// else, including a bare marker run, is ordinary text.
    fn split_heading<'a>(&self, line: &'a str) -> Option<(usize, &'a str)> {
        let content = line.trim_end_matches(['\r', '\n']);
        let depth = content
            .chars()
            .take_while(|&c| c == self.heading_char)
            .count();
        if depth == 0 {
            return None;
        }
        let text = content[depth * self.heading_char.len_utf8()..].strip_prefix(' ')?;
        Some((depth, text))
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn extract(document: &str) -> Option<ExtractedSection> {
        SectionExtractor::dev_docs().extract(document)
    }

    #[test]
    fn test_extracts_simple_content_at_the_end() {
        let markdown = "\
## Some issue

Lorem ipsum foo bar

# Dev-Docs

This should be extracted correctly.
";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(section.heading_depth, 1);
        assert_eq!(section.text, "This should be extracted correctly.");
    }

    #[test]
    fn test_extracts_trailing_section_without_final_newline() {
        let markdown = "## Issue\n\nfoo\n\n# Dev-Docs\n\nBar baz.";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(section.text, "Bar baz.");
    }

    #[test]
    fn test_stops_at_heading_of_same_depth() {
        let markdown = "\
## Some issue

Lorem ipsum foo bar

### Dev-Docs

This should be extracted correctly.

### Another section

This should not be part anymore.
";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(section.heading_depth, 3);
        assert_eq!(section.text, "This should be extracted correctly.");
    }

    #[test]
    fn test_keeps_deeper_subsections_until_shallower_heading() {
        let markdown = "\
## Some issue

Lorem ipsum foo bar

### Dev-Docs

This should be extracted correctly.

#### Including this

subsection

# Another section

This should not be part anymore.
";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(
            section.text,
            "This should be extracted correctly.\n\n#### Including this\n\nsubsection"
        );
    }

    #[test]
    fn test_missing_marker_returns_none() {
        for document in [
            "",
            "plain text with no headings at all",
            "# Summary\n\ncontent\n\n## Details\n\nmore content\n",
            "### Release notes\n\n#### Changes\n\n- one\n- two\n",
        ] {
            assert!(
                extract(document).is_none(),
                "no marker heading in {:?}, expected None",
                document
            );
        }
    }

    #[test]
    fn test_marker_at_depth_one_runs_to_document_end() {
        let markdown = "# Dev Docs\n\nEverything below the marker.\n\nEven this paragraph.\n";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(
            section.text,
            "Everything below the marker.\n\nEven this paragraph."
        );
    }

    #[test]
    fn test_marker_matching_is_case_insensitive() {
        for heading in ["### dev docs", "### DEV-DOCS", "### Dev docs"] {
            let markdown = format!("{heading}\n\ncontent\n");
            let section = extract(&markdown).expect("marker should be found");
            assert_eq!(section.text, "content", "heading was {:?}", heading);
        }
    }

    #[test]
    fn test_marker_tolerates_spelling_variants() {
        for heading in ["## Dev Docs", "## Dev-Docs", "## DevDocs", "## Dev Doc"] {
            let markdown = format!("{heading}\n\ncontent\n");
            assert!(
                extract(&markdown).is_some(),
                "heading {:?} should count as a marker",
                heading
            );
        }
        // The marker words must end at a word boundary.
        assert!(extract("## DevDocsification\n\ncontent\n").is_none());
    }

    #[test]
    fn test_marker_with_trailing_heading_text_matches() {
        let markdown = "## Dev Docs (API changes)\n\ncontent\n";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(section.text, "content");
    }

    #[test]
    fn test_heading_markers_only_count_at_line_start() {
        let markdown = "Put the note under a # Dev Docs heading in the body.\n";
        assert!(extract(markdown).is_none());

        // Same rule for the end boundary: a mid-line hash run never bounds.
        let markdown = "# Dev Docs\n\nfoo # Another section bar\n\nbaz\n";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(section.text, "foo # Another section bar\n\nbaz");
    }

    #[test]
    fn test_heading_requires_space_after_markers() {
        assert!(extract("##Dev Docs\n\ncontent\n").is_none());

        // A bare hash run inside the excerpt is ordinary text, not a boundary.
        let markdown = "## Dev Docs\n\n#hashtag\n\n####\n\ntail\n";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(section.text, "#hashtag\n\n####\n\ntail");
    }

    #[test]
    fn test_empty_section_yields_empty_text() {
        let section = extract("# Dev Docs\n").expect("marker should be found");
        assert_eq!(section.text, "");

        let section = extract("## intro\n\n# Dev Docs\n\n   \n").expect("marker should be found");
        assert_eq!(section.text, "");
    }

    #[test]
    fn test_first_marker_wins_and_second_bounds() {
        let markdown = "# Dev Docs\n\nfirst\n\n# Dev Docs\n\nsecond\n";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(section.text, "first");
    }

    #[test]
    fn test_preserves_crlf_line_endings_inside_excerpt() {
        let markdown = "## Dev Docs\r\nline one\r\n\r\nline two\r\n## Next\r\n";
        let section = extract(markdown).expect("marker should be found");
        assert_eq!(section.text, "line one\r\n\r\nline two");
    }

    #[test]
    fn test_excerpt_never_contains_heading_at_or_above_marker_depth() {
        let documents = [
            "# Dev Docs\n\na\n\n## sub\n\nb\n\n# End\n\nc\n",
            "## Dev Docs\n\na\n\n### sub\n\n#### subsub\n\n## Sibling\n\nd\n",
            "### Dev Docs\n\n#### deep\n\ntext\n\n# Top\n\nafter\n",
            "#### Dev Docs\n\nonly content, no boundary\n",
        ];
        let extractor = SectionExtractor::dev_docs();
        for document in documents {
            let section = extractor.extract(document).expect("marker should be found");
            for line in section.text.split_inclusive('\n') {
                if let Some((depth, _)) = extractor.split_heading(line) {
                    assert!(
                        depth > section.heading_depth,
                        "line {:?} of depth {} leaked into a depth-{} excerpt",
                        line,
                        depth,
                        section.heading_depth
                    );
                }
            }
        }
    }

    #[test]
    fn test_custom_heading_syntax() {
        let asciidoc = "= Title\n\nintro\n\n== Dev Docs\n\ncontent here\n\n== Next section\n";
        let extractor = SectionExtractor::new(
            Regex::new(r"(?i)^dev[- ]?docs?\b").unwrap(),
            '=',
        );
        let section = extractor.extract(asciidoc).expect("marker should be found");
        assert_eq!(section.heading_depth, 2);
        assert_eq!(section.text, "content here");
    }
}
