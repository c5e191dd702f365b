// src/main.rs
mod utils;
mod github;
mod extractors;
mod release;
mod render;
mod storage;

use clap::{Parser, ValueEnum};
use extractors::section::SectionExtractor;
use github::client;
use github::models::{RepoSlug, StateFilter};
use release::ReleaseVersion;
use render::ExtractedExcerpt;
use storage::{BrokenTicket, DigestSummary, StorageManager};
use utils::AppError;

const DEFAULT_DEV_DOC_LABEL: &str = "release_note:dev_docs";

/// Output dialect of the compiled digest.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Markdown,
    Asciidoc,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Asciidoc => "adoc",
        }
    }

    fn label(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Asciidoc => "asciidoc",
        }
    }
}

/// Command Line Interface for the dev docs release digest
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target release label, e.g. v7.3.0 (omit to list available releases)
    #[arg(short, long)]
    release: Option<ReleaseVersion>,

    /// Repository to search, in owner/name form
    #[arg(long, default_value = "elastic/kibana")]
    repo: RepoSlug,

    /// Label marking tickets that carry a dev docs section
    #[arg(long, default_value = DEFAULT_DEV_DOC_LABEL)]
    label: String,

    /// Include open tickets (default: closed tickets only)
    #[arg(long)]
    include_open: bool,

    /// Output dialect for the compiled document
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Directory for the document and its metadata sidecar (default: stdout)
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var, --verbose lowers the fallback)
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting digest run for args: {:?}", args);

    if args.label.trim().is_empty() {
        return Err(AppError::Config(
            "The dev docs label must not be empty".to_string(),
        ));
    }

    // 3. Without a target release, list what the repository offers and exit
    let release = match args.release {
        Some(release) => release,
        None => return list_release_options(&args.repo).await,
    };

    // 4. Fetch candidate tickets
    let issues = client::fetch_dev_doc_issues(&args.repo, &args.label, release).await?;
    tracing::info!("Fetched {} labeled tickets for {}", issues.len(), release);

    if issues.is_empty() {
        println!("No tickets are labeled for {} yet.", release);
        println!(
            "To add content, attach the `{}` label to a PR or issue and put the text \
             behind a `# Dev Docs` heading in its description.",
            args.label
        );
        return Ok(());
    }

    // 5. Per-ticket processing: dedup and section extraction
    let fetched = issues.len();
    let extractor = SectionExtractor::dev_docs();

    let mut suppressed = 0;
    let mut excerpts: Vec<ExtractedExcerpt> = Vec::new();

    for issue in issues {
        let labels = issue.labels.iter().map(|label| label.name.as_str());
        if release::is_already_released(release, labels) {
            tracing::debug!(
                "Skipping #{} ({}): already published under an earlier release",
                issue.number,
                issue.title
            );
            suppressed += 1;
            continue;
        }

        // An empty marked section is as unusable as a missing one
        let text = match issue.body.as_deref().and_then(|body| extractor.extract(body)) {
            Some(section) => {
                tracing::debug!(
                    "Found depth-{} dev docs section in #{} ({} bytes)",
                    section.heading_depth,
                    issue.number,
                    section.text.len()
                );
                Some(section.text).filter(|text| !text.is_empty())
            }
            None => None,
        };

        excerpts.push(ExtractedExcerpt {
            pr: issue.number,
            state: issue.state,
            title: issue.title,
            text,
        });
    }

    // 6. The state filter runs over the built excerpts (closed-only default)
    let state_filter = if args.include_open {
        StateFilter::All
    } else {
        StateFilter::ClosedOnly
    };
    let (excerpts, hidden) = render::admit_excerpts(excerpts, state_filter);

    if excerpts.is_empty() {
        tracing::info!(
            "Digest finished. Published: 0, Suppressed: {}, Hidden: {}, Broken: 0",
            suppressed,
            hidden
        );
        println!(
            "Every fetched ticket was already published or hidden; nothing to compile for {}.",
            release
        );
        return Ok(());
    }

    // 7. Surface broken tickets (labeled but without a usable dev docs section)
    let broken: Vec<BrokenTicket> = excerpts
        .iter()
        .filter(|excerpt| excerpt.is_broken())
        .map(|excerpt| BrokenTicket {
            pr: excerpt.pr,
            title: excerpt.title.clone(),
        })
        .collect();

    for ticket in &broken {
        tracing::warn!(
            "Missing dev docs section in #{} ({}): https://github.com/{}/pull/{}",
            ticket.pr,
            ticket.title,
            args.repo,
            ticket.pr
        );
    }

    let published = excerpts.len() - broken.len();
    tracing::info!(
        "Digest finished. Published: {}, Suppressed: {}, Hidden: {}, Broken: {}",
        published,
        suppressed,
        hidden,
        broken.len()
    );

    if published == 0 {
        return Err(AppError::Processing(format!(
            "All {} surviving tickets lack a dev docs section",
            broken.len()
        )));
    }

    // 8. Compile the final document in the requested dialect
    let document = match args.format {
        OutputFormat::Markdown => {
            render::compile_document(&excerpts, &args.repo, |entry| entry.to_string())
        }
        OutputFormat::Asciidoc => {
            render::compile_document(&excerpts, &args.repo, render::asciidoc::convert)
        }
    };

    // 9. Emit: save alongside a metadata sidecar, or print to stdout
    match &args.output_dir {
        Some(dir) => {
            let storage_manager = StorageManager::new(dir)?;
            storage_manager.save_document(
                &args.repo,
                release,
                args.format.extension(),
                &document,
            )?;

            let summary = DigestSummary {
                repo: args.repo.clone(),
                release,
                format: args.format.label().to_string(),
                fetched,
                suppressed,
                hidden,
                published,
                broken,
            };
            storage_manager.save_summary(&summary)?;
        }
        None => {
            println!("{}", document);
        }
    }

    Ok(())
}

/// Prints the repository's minor release labels, newest first. These are the
/// values `--release` accepts; the CLI stand-in for a version dropdown.
async fn list_release_options(repo: &RepoSlug) -> Result<(), AppError> {
    let repository = client::fetch_repository(repo).await?;
    tracing::debug!(
        "Resolved {} to repository id {}",
        repository.full_name,
        repository.id
    );

    let labels = client::fetch_release_labels(repository.id).await?;
    let options = release::minor_release_options(labels.iter().map(|label| label.name.as_str()));

    if options.is_empty() {
        println!("No release labels found in {}.", repo);
        println!("Pass --release <vX.Y.Z> explicitly if the repository labels releases another way.");
        return Ok(());
    }

    println!("Available releases in {} (newest first):", repo);
    for option in options {
        println!("  {}", option);
    }
    println!();
    println!("Run again with --release <version> to compile its digest.");

    Ok(())
}
