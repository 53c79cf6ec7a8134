//! pdfsift CLI - PDF content analysis and segmentation tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::split::{self, PageRange, SplitPart};
use pdfsift::{
    render, AnalysisConfig, ContentType, DocumentAnalysis, DocumentSource, JsonFormat,
    LopdfSource, Sift,
};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(about = "Analyze and segment PDF documents by content", long_about = None)]
struct Cli {
    /// Process pages one at a time instead of in parallel
    #[arg(long, global = true, env = "PDFSIFT_SEQUENTIAL")]
    sequential: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every page and score the document
    Analyze {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Output compact JSON (with --format json)
        #[arg(long)]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List content-based sections
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Expand a page range to the surrounding content boundaries
    Snap {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range to snap (e.g., "3-4" or "7")
        #[arg(short, long)]
        range: String,
    },

    /// Show table candidates
    Tables {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Plan how to split the document
    SplitPlan {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Split strategy
        #[arg(short, long, value_enum, default_value = "sections")]
        strategy: SplitStrategy,

        /// Pages per part (with --strategy every-n)
        #[arg(short, long, default_value = "1")]
        n: u32,

        /// Page ranges (with --strategy ranges or smart-ranges)
        #[arg(long)]
        ranges: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Plain text summary
    Text,
    /// Markdown report
    Markdown,
    /// Full analysis as JSON
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SplitStrategy {
    /// One part per content-based section
    Sections,
    /// One part per content type
    ContentType,
    /// One part per bookmark
    Bookmarks,
    /// Fixed-size chunks
    EveryN,
    /// Explicit page ranges
    Ranges,
    /// Explicit page ranges snapped to content boundaries
    SmartRanges,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let sift = if cli.sequential {
        Sift::new().sequential()
    } else {
        Sift::new()
    };

    let result = match cli.command {
        Some(Commands::Analyze {
            input,
            format,
            compact,
            output,
        }) => cmd_analyze(&sift, &input, format, compact, output.as_deref()),
        Some(Commands::Sections { input }) => cmd_sections(&sift, &input),
        Some(Commands::Snap { input, range }) => cmd_snap(&sift, &input, &range),
        Some(Commands::Tables { input, pages, json }) => {
            cmd_tables(&sift, &input, pages.as_deref(), json)
        }
        Some(Commands::SplitPlan {
            input,
            strategy,
            n,
            ranges,
            json,
        }) => cmd_split_plan(&sift, &input, strategy, n, ranges.as_deref(), json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdfsift <COMMAND> <FILE>".yellow());
            println!("       pdfsift --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Open and analyze a file behind a spinner.
fn run_analysis(sift: &Sift, input: &Path) -> Result<DocumentAnalysis, pdfsift::Error> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Opening PDF...");
    let source = match LopdfSource::open(input) {
        Ok(source) => source,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message(format!("Analyzing {} pages...", source.page_count()));
    let analysis = sift.analyze(&source);
    pb.finish_and_clear();

    analysis
}

fn cmd_analyze(
    sift: &Sift,
    input: &Path,
    format: ReportFormat,
    compact: bool,
    output: Option<&Path>,
) -> CliResult {
    let analysis = run_analysis(sift, input)?;

    if output.is_none() && format == ReportFormat::Text {
        print_summary(input, &analysis);
        return Ok(());
    }

    let report = match format {
        ReportFormat::Text => render::to_text(&analysis),
        ReportFormat::Markdown => render::to_markdown(&analysis),
        ReportFormat::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&analysis, json_format)?
        }
    };

    if let Some(path) = output {
        fs::write(path, &report)?;
        println!("{} {}", "Saved to".green(), path.display());
        return Ok(());
    }

    println!("{}", report);
    Ok(())
}

fn print_summary(input: &Path, analysis: &DocumentAnalysis) {
    println!("{}", "Document Analysis".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), analysis.total_pages);

    let score = format!("{:.0}/100", analysis.quality_score);
    let score = if analysis.quality_score >= 70.0 {
        score.green()
    } else {
        score.yellow()
    };
    println!("{}: {}", "Quality".bold(), score);
    println!(
        "{}: {}",
        "Needs OCR".bold(),
        if analysis.needs_ocr { "Yes".yellow() } else { "No".normal() }
    );
    println!("{}: {:.2}", "OCR confidence".bold(), analysis.ocr_confidence);
    println!("{}: {:?}", "Layout".bold(), analysis.layout_complexity);
    println!("{}: {:?}", "Strategy".bold(), analysis.processing_strategy);

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in &analysis.page_classifications {
        println!(
            "  {:>4}  {}  {:<11} quality {:.2}  images {:.2}  tables {}{}",
            page.page_number,
            colorize(page.content_type),
            page.hint.as_str().dimmed(),
            page.text_quality,
            page.image_density,
            page.table_count(),
            if page.needs_ocr {
                "  [ocr]".yellow().to_string()
            } else {
                String::new()
            }
        );
    }

    if !analysis.recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for recommendation in &analysis.recommendations {
            println!("  {} {}", "•".dimmed(), recommendation);
        }
    }

    for warning in &analysis.page_warnings {
        println!(
            "{} page {}: {}",
            "Warning".yellow().bold(),
            warning.page_number,
            warning.message
        );
    }
}

fn colorize(content_type: ContentType) -> colored::ColoredString {
    let label = format!("{:<6}", content_type.as_str());
    match content_type {
        ContentType::Text => label.normal(),
        ContentType::Image => label.magenta(),
        ContentType::Table => label.blue(),
        ContentType::Form => label.cyan(),
        ContentType::Mixed => label.dimmed(),
    }
}

fn cmd_sections(sift: &Sift, input: &Path) -> CliResult {
    let analysis = run_analysis(sift, input)?;

    println!("{}", "Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (i, section) in analysis.sections.iter().enumerate() {
        let (first, last) = section.range();
        println!(
            "  {:>3}. {} {}",
            i + 1,
            PageRange::new(first, last).to_string().bold(),
            format!("({})", render::describe_boundary(&section.boundary_reason)).dimmed()
        );
    }
    Ok(())
}

fn cmd_snap(sift: &Sift, input: &Path, range: &str) -> CliResult {
    let analysis = run_analysis(sift, input)?;

    let ranges = split::parse_page_ranges(range, analysis.total_pages)?;
    let [requested] = ranges.as_slice() else {
        return Err("expected a single range".into());
    };

    let (start, end) = pdfsift::snap_range(
        &analysis.page_classifications,
        requested.start,
        requested.end,
        sift.config(),
    )?;
    println!(
        "{} {} {} {}",
        "Requested".bold(),
        requested,
        "→ snapped".green(),
        PageRange::new(start, end).to_string().bold()
    );
    Ok(())
}

fn cmd_tables(sift: &Sift, input: &Path, pages: Option<&str>, json: bool) -> CliResult {
    let analysis = run_analysis(sift, input)?;

    let selected = match pages {
        Some(p) => split::selected_pages(&split::parse_page_ranges(p, analysis.total_pages)?),
        None => (1..=analysis.total_pages).collect(),
    };

    let pages: Vec<_> = selected
        .iter()
        .filter_map(|&n| analysis.page(n))
        .filter(|p| p.table_count() > 0)
        .collect();

    if json {
        let value: Vec<serde_json::Value> = pages
            .iter()
            .map(|p| {
                serde_json::json!({
                    "page": p.page_number,
                    "tables": p.table_candidates,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if pages.is_empty() {
        println!("{}", "No table candidates found".yellow());
        return Ok(());
    }

    for page in pages {
        for table in &page.table_candidates {
            println!(
                "{} {}: {} rows x {} columns {}",
                "Page".bold(),
                page.page_number,
                table.row_count,
                table.column_count,
                format!("(confidence {:.2})", table.confidence).dimmed()
            );
        }
    }
    Ok(())
}

fn cmd_split_plan(
    sift: &Sift,
    input: &Path,
    strategy: SplitStrategy,
    n: u32,
    ranges: Option<&str>,
    json: bool,
) -> CliResult {
    let analysis = run_analysis(sift, input)?;
    let total = analysis.total_pages;

    let parse_ranges = || -> Result<Vec<PageRange>, Box<dyn std::error::Error>> {
        let selection = ranges.ok_or("--ranges is required for this strategy")?;
        Ok(split::parse_page_ranges(selection, total)?)
    };

    let parts: Vec<SplitPart> = match strategy {
        SplitStrategy::Sections => split::by_sections(&analysis.sections),
        SplitStrategy::ContentType => split::by_content_type(&analysis.page_classifications),
        SplitStrategy::Bookmarks => {
            if !analysis.structure.has_bookmarks {
                return Err("document has no bookmarks".into());
            }
            split::by_bookmarks(&analysis.structure.outline, total)
        }
        SplitStrategy::EveryN => split::every_n_pages(total, n)?,
        SplitStrategy::Ranges => split::by_ranges(&parse_ranges()?),
        SplitStrategy::SmartRanges => {
            split::smart_ranges(
                &analysis.page_classifications,
                &parse_ranges()?,
                &sift.config().segment,
            )?
        }
    };

    if json {
        println!("{}", render::to_json(&parts, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!("{} {} parts", "Split plan:".cyan().bold(), parts.len());
    for part in &parts {
        println!(
            "  {} {} {}",
            "├─".dimmed(),
            part.label.bold(),
            format!("({} pages: {})", part.pages.len(), describe_pages(&part.pages)).dimmed()
        );
    }
    Ok(())
}

/// Compact page list, e.g. `1-3, 7`.
fn describe_pages(pages: &[u32]) -> String {
    let mut runs: Vec<PageRange> = Vec::new();
    for &page in pages {
        match runs.last_mut() {
            Some(run) if run.end + 1 == page => run.end = page,
            _ => runs.push(PageRange::new(page, page)),
        }
    }
    runs.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_version() {
    println!("{} {}", "pdfsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF content analysis and segmentation");
    println!();
    println!("Configuration defaults:");
    let config = AnalysisConfig::default();
    println!("  header/footer margin: {}/{}", config.header_margin, config.footer_margin);
    println!("  table row tolerance:  {}", config.table.row_tolerance);
    println!("  parallel:             {}", config.parallel);
}
