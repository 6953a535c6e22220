//! untei CLI - TEI XML conversion tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use untei::{parse_file_with_options, Document, JsonFormat, ParseOptions, RenderOptions};

#[derive(Parser)]
#[command(name = "untei")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert TEI XML to Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Input TEI file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert TEI to Markdown and JSON
    Convert {
        /// Input TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory (next to the input if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Accept a teiCorpus wrapper
        #[arg(long)]
        lenient: bool,
    },

    /// Convert TEI to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Include the abstract
        #[arg(short, long = "abstract")]
        with_abstract: bool,

        /// Leave out back-matter content
        #[arg(long)]
        no_annex: bool,

        /// Leave out the references section
        #[arg(long)]
        no_references: bool,

        /// Publication date format (chrono syntax)
        #[arg(long, env = "UNTEI_DATE_FORMAT")]
        date_format: Option<String>,
    },

    /// Convert TEI to plain text
    Text {
        /// Input TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert TEI to a JSON record
    Json {
        /// Input TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert every TEI file in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (input directory if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Number of worker threads (all cores if not specified)
        #[arg(short = 'j', long)]
        jobs: Option<usize>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            lenient,
        }) => cmd_convert(&input, output.as_deref(), lenient),
        Some(Commands::Markdown {
            input,
            output,
            frontmatter,
            with_abstract,
            no_annex,
            no_references,
            date_format,
        }) => {
            let render_options = RenderOptions::new()
                .with_frontmatter(frontmatter)
                .with_abstract(with_abstract)
                .with_annex(!no_annex)
                .with_references(!no_references);
            cmd_markdown(&input, output.as_deref(), render_options, date_format)
        }
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Batch {
            input,
            output,
            jobs,
        }) => cmd_batch(&input, output.as_deref(), jobs),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), false)
            } else {
                println!("{}", "Usage: untei <FILE> [OUTPUT]".yellow());
                println!("       untei --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Output file stem: "paper.tei.xml" -> "paper".
fn output_stem(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    stem.strip_suffix(".tei").unwrap_or(&stem).to_string()
}

/// Write Markdown and JSON next to each other; returns the two paths.
fn write_outputs(doc: &Document, dir: &Path, stem: &str) -> CliResult<(PathBuf, PathBuf)> {
    let md_path = dir.join(format!("{}.md", stem));
    let json_path = dir.join(format!("{}.json", stem));

    let markdown = untei::render::to_markdown(doc, &RenderOptions::default());
    fs::write(&md_path, markdown)?;

    let json = untei::render::to_json(doc, JsonFormat::Pretty)?;
    fs::write(&json_path, json)?;

    Ok((md_path, json_path))
}

fn cmd_convert(input: &Path, output: Option<&Path>, lenient: bool) -> CliResult<()> {
    let output_dir = output
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing TEI...");
    let mut options = ParseOptions::new();
    if lenient {
        options = options.lenient();
    }
    let doc = parse_file_with_options(input, options)?;
    pb.inc(1);

    pb.set_message("Writing outputs...");
    let (md_path, json_path) = write_outputs(&doc, &output_dir, &output_stem(input))?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} {}", "├─".dimmed(), md_path.display());
    println!("  {} {}", "└─".dimmed(), json_path.display());

    Ok(())
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    render_options: RenderOptions,
    date_format: Option<String>,
) -> CliResult<()> {
    let mut options = ParseOptions::new();
    if let Some(format) = date_format {
        options = options.with_date_format(format);
    }
    let doc = parse_file_with_options(input, options)?;

    let markdown = untei::render::to_markdown(&doc, &render_options);
    emit(output, &markdown)
}

fn cmd_text(input: &Path, output: Option<&Path>) -> CliResult<()> {
    let doc = untei::parse_file(input)?;
    let text = untei::render::to_text(&doc, &RenderOptions::default());
    emit(output, &text)
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> CliResult<()> {
    let doc = untei::parse_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = untei::render::to_json(&doc, format)?;
    emit(output, &json)
}

fn emit(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> CliResult<()> {
    // Header and statistics only need a best-effort parse.
    let options = ParseOptions::new().lenient();
    let doc = parse_file_with_options(input, options)?;
    let stats = doc.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = doc.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if !doc.authors.is_empty() {
        let names: Vec<&str> = doc.authors.iter().map(|a| a.name.as_str()).collect();
        println!("{}: {}", "Authors".bold(), names.join(", "));
    }
    if let Some(ref date) = doc.publication_date {
        println!("{}: {}", "Published".bold(), date.formatted);
    }
    if let Some(ref doi) = doc.doi {
        println!("{}: {}", "DOI".bold(), doi);
    }
    if let Some(ref publisher) = doc.publisher {
        println!("{}: {}", "Publisher".bold(), publisher);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Formulas".bold(), stats.formula_count);
    println!("{}: {}", "Figures".bold(), stats.figure_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "References".bold(), stats.citation_count);
    println!("{}: {}", "Words".bold(), stats.word_count);

    Ok(())
}

/// Collect `.xml` files of a directory, sorted by name.
fn tei_files(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if path.is_file() && is_xml {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn cmd_batch(input: &Path, output: Option<&Path>, jobs: Option<usize>) -> CliResult<()> {
    let output_dir = output.unwrap_or(input).to_path_buf();
    fs::create_dir_all(&output_dir)?;

    let files = tei_files(input)?;
    if files.is_empty() {
        println!("{} {}", "No TEI files found in".yellow(), input.display());
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let failed = AtomicUsize::new(0);
    pool.install(|| {
        files.par_iter().for_each(|path| {
            let converted = untei::parse_file(path)
                .map_err(|e| e.to_string())
                .and_then(|doc| {
                    write_outputs(&doc, &output_dir, &output_stem(path)).map_err(|e| e.to_string())
                });
            if let Err(e) = converted {
                log::warn!("Failed to convert {}: {}", path.display(), e);
                failed.fetch_add(1, Ordering::Relaxed);
            }
            pb.inc(1);
        });
    });
    pb.finish_with_message("Done!");

    let failed = failed.into_inner();
    println!(
        "\n{} {} converted, {} failed",
        "Batch complete:".green().bold(),
        files.len() - failed,
        failed
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "untei".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("TEI XML conversion tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/untei".dimmed());
    println!("License: MIT");
}
