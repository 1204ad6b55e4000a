use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use reportgen::config::{config_dir, init_config_dir, load_config};
use reportgen::print::Geometry;
use reportgen::render::normalize_tag;
use reportgen::{plan_columns, Document, Engine, OutputFormat, ReportData, Result, SectionBody};

#[derive(Parser)]
#[command(name = "reportgen")]
#[command(version, about = "Render accounting reports to PDF, XLSX and CSV", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log layout decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Render a report JSON file
    Render {
        /// Report JSON (`-` reads stdin)
        input: PathBuf,

        /// Output format: pdf, xlsx or csv
        #[arg(short, long, default_value = "pdf")]
        format: OutputFormat,

        /// Output path (default: input path with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the rendered file with the system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Print the summary band and sections as terminal tables
    Preview {
        /// Report JSON (`-` reads stdin)
        input: PathBuf,
    },

    /// Show the column plan for a tabular report
    Columns {
        /// Report JSON (`-` reads stdin)
        input: PathBuf,
    },

    /// List registered report types
    Types,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("reportgen=debug")
    } else {
        EnvFilter::try_from_env("REPORTGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Render {
            input,
            format,
            output,
            open,
        } => cmd_render(&cfg_dir, &input, format, output, open),
        Commands::Preview { input } => cmd_preview(&cfg_dir, &input),
        Commands::Columns { input } => cmd_columns(&cfg_dir, &input),
        Commands::Types => cmd_types(),
    }
}

fn engine(cfg_dir: &Path) -> Result<Engine> {
    Ok(Engine::new(load_config(cfg_dir)?))
}

fn read_report(input: &Path) -> Result<ReportData> {
    let json = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };
    ReportData::from_json(&json)
}

fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config_dir(cfg_dir)?;
    println!("Initialized reportgen config at: {}", cfg_dir.display());
    println!();
    println!("Adjust page layout, number formats and colours in:");
    println!("  $EDITOR {}", path.display());
    Ok(())
}

fn cmd_render(
    cfg_dir: &Path,
    input: &Path,
    format: OutputFormat,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let engine = engine(cfg_dir)?;
    let report = read_report(input)?;
    let rendered = engine.render(format, &report)?;

    let path = output.unwrap_or_else(|| {
        if input == Path::new("-") {
            PathBuf::from(format!("report.{}", format.extension()))
        } else {
            input.with_extension(format.extension())
        }
    });
    std::fs::write(&path, &rendered.bytes)?;

    let detail = match (rendered.pages, rendered.sheets.len()) {
        (Some(pages), _) => format!("{pages} page(s)"),
        (None, 0) => format!("{} bytes", rendered.bytes.len()),
        (None, sheets) => format!("{sheets} sheet(s): {}", rendered.sheets.join(", ")),
    };
    println!("Rendered {} ({detail})", path.display());
    for warning in &rendered.warnings {
        eprintln!("warning: {warning}");
    }

    if open {
        open_path(&path)?;
    }
    Ok(())
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "SUMMARY")]
    label: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

fn print_document(document: &Document) {
    println!("{}", document.title);
    if let Some(org) = &document.identity.organization {
        println!("{org}");
    }
    for line in document.identity.detail_lines() {
        println!("{line}");
    }
    println!();

    if !document.cards.is_empty() {
        let rows: Vec<CardRow> = document
            .cards
            .iter()
            .map(|c| CardRow {
                label: c.label.clone(),
                value: c.value.display.clone(),
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
        println!();
    }

    for section in &document.sections {
        if let Some(title) = &section.title {
            let marker = if section.sheet_only { " (spreadsheet only)" } else { "" };
            println!("{title}{marker}");
        }
        match &section.body {
            SectionBody::Table(table) => {
                let mut builder = Builder::default();
                builder.push_record(table.columns.iter().map(|c| c.label.clone()));
                for row in &table.rows {
                    builder.push_record(row.iter().map(|c| c.display.clone()));
                }
                if let Some(totals) = &table.totals {
                    builder.push_record(totals.iter().map(|c| c.display.clone()));
                }
                println!("{}", builder.build().with(Style::rounded()));
            }
            SectionBody::KeyValues(items) => {
                let mut builder = Builder::default();
                for item in items {
                    builder.push_record([item.label.clone(), item.value.display.clone()]);
                }
                println!("{}", builder.build().with(Style::rounded()));
            }
            SectionBody::Notice(message) => println!("  {message}"),
            SectionBody::Paragraph(text) => println!("  {text}"),
        }
        println!();
    }
}

fn cmd_preview(cfg_dir: &Path, input: &Path) -> Result<()> {
    let engine = engine(cfg_dir)?;
    let report = read_report(input)?;
    let rendered = engine.document(&report);
    print_document(&rendered.document);
    for warning in &rendered.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "LABEL")]
    label: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "ALIGN")]
    align: String,
    #[tabled(rename = "WIDTH")]
    width: String,
}

fn cmd_columns(cfg_dir: &Path, input: &Path) -> Result<()> {
    let engine = engine(cfg_dir)?;
    let report = read_report(input)?;
    let Some(sample) = report.rows().first() else {
        println!("'{}' has no tabular rows to plan.", report.report_type);
        return Ok(());
    };

    let content_width = Geometry::from_settings(&engine.config().layout).content_width();
    let plan = plan_columns(&normalize_tag(&report.report_type), sample, content_width);
    let rows: Vec<ColumnRow> = plan
        .columns
        .iter()
        .map(|c| ColumnRow {
            key: c.key.clone(),
            label: c.label.clone(),
            kind: format!("{:?}", c.kind).to_lowercase(),
            align: format!("{:?}", c.align).to_lowercase(),
            width: format!("{:.1}", c.width),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "TYPE")]
    tag: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "SHAPE")]
    shape: String,
    #[tabled(rename = "CARDS")]
    cards: String,
}

fn cmd_types() -> Result<()> {
    let engine = Engine::default();
    let rows: Vec<TypeRow> = engine
        .registry()
        .descriptors()
        .into_iter()
        .map(|d| TypeRow {
            tag: d.tag.to_string(),
            title: d.title.to_string(),
            shape: format!("{:?}", d.shape).to_lowercase(),
            cards: d.cards.iter().map(|c| c.label).collect::<Vec<_>>().join(", "),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

/// Open a file with the system default viewer
fn open_path(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()?;
    }
    Ok(())
}
