// src/render/mod.rs
pub mod asciidoc;

use crate::github::models::{IssueState, RepoSlug, StateFilter};

/// The publishable view of a ticket: number, state, title, and the dev docs
/// excerpt pulled out of its body. `text` is `None` when the body held no
/// usable dev docs content (the ticket is "broken").
#[derive(Debug, Clone)]
pub struct ExtractedExcerpt {
    pub pr: u64,
    pub state: IssueState,
    pub title: String,
    pub text: Option<String>,
}

impl ExtractedExcerpt {
    pub fn is_broken(&self) -> bool {
        self.text.is_none()
    }
}

/// Applies the state filter to the built excerpt list, returning the visible
/// excerpts in fetch order and the number of tickets hidden. Runs after
/// extraction, so a hidden ticket is neither published nor reported as broken.
pub fn admit_excerpts(
    excerpts: Vec<ExtractedExcerpt>,
    filter: StateFilter,
) -> (Vec<ExtractedExcerpt>, usize) {
    let mut admitted = Vec::with_capacity(excerpts.len());
    let mut hidden = 0;

    for excerpt in excerpts {
        if filter.admits(excerpt.state) {
            admitted.push(excerpt);
        } else {
            tracing::debug!("Hiding #{}: ticket is still open", excerpt.pr);
            hidden += 1;
        }
    }

    (admitted, hidden)
}

/// Renders one excerpt as a Markdown entry, or `None` for broken excerpts.
/// The ticket title becomes the entry heading unless the excerpt text already
/// starts with a heading of its own; a `*via [#PR](...)*` attribution line
/// closes every entry.
pub fn render_excerpt(excerpt: &ExtractedExcerpt, repo: &RepoSlug) -> Option<String> {
    let text = excerpt.text.as_deref()?;

    let mut entry = String::new();
    if !text.trim_start().starts_with('#') {
        entry.push_str(&format!("## {}\n\n", excerpt.title));
    }
    entry.push_str(text);
    entry.push_str(&format!(
        "\n\n*via [#{}](https://github.com/{}/pull/{})*",
        excerpt.pr, repo, excerpt.pr
    ));

    Some(entry)
}

/// Joins the renderable excerpts into one document, passing each entry through
/// `convert` first. Markdown output supplies the identity transform; AsciiDoc
/// output supplies [`asciidoc::convert`]. Broken excerpts are skipped here and
/// reported by the caller.
pub fn compile_document<F>(excerpts: &[ExtractedExcerpt], repo: &RepoSlug, convert: F) -> String
where
    F: Fn(&str) -> String,
{
    excerpts
        .iter()
        .filter_map(|excerpt| render_excerpt(excerpt, repo))
        .map(|entry| convert(&entry))
        .collect::<Vec<_>>()
        .join("\n\n")
}
