use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use schemascribe_core::{prompt, Config, Report, SchemaStore, Severity};
use schemascribe_parser::{ParseOutput, SchemaParser};

/// File extensions picked up by `batch`
const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "sql", "ddl", "md"];

/// SchemaScribe - turn schema notes, DDL and Markdown into a relational model
#[derive(Parser)]
#[command(name = "schemascribe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemascribe.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and print the schema as JSON
    Parse {
        /// Document to parse
        input: PathBuf,

        /// Write the schema here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the plain-text structure description of a document
    Describe {
        /// Document to parse
        input: PathBuf,
    },

    /// Parse a document and write a report with diagnostics
    Check {
        /// Document to parse
        input: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Parse every document under a directory
    Batch {
        /// Directory to walk
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;
    let parser = SchemaParser::with_config(config.parser.clone());

    match cli.command {
        Commands::Parse { input, output } => parse_command(&parser, &input, output.as_deref()),
        Commands::Describe { input } => describe_command(&parser, &input),
        Commands::Check { input, output, markdown } => {
            check_command(&parser, &input, &output, markdown.as_deref(), cli.verbose)
        }
        Commands::Batch { dir } => batch_command(&parser, &dir, cli.verbose),
    }
}

/// `--config`, then `./schemascribe.toml`, then defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let local = Path::new("schemascribe.toml");
    if local.exists() {
        return Config::from_file(local).context("Failed to load schemascribe.toml");
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse command - schema JSON to stdout or a file
fn parse_command(parser: &SchemaParser, input: &Path, output: Option<&Path>) -> Result<()> {
    let text = read_document(input)?;
    let schema = parser.parse(&text)?;
    let json = schema.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "Schema saved to:".green(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Describe command - the structure block handed to query generation
fn describe_command(parser: &SchemaParser, input: &Path) -> Result<()> {
    let text = read_document(input)?;

    let mut store = SchemaStore::new();
    store.set(parser.parse(&text)?);

    let summary = store.summary();
    eprintln!(
        "{} {} tables, {} relationships ({})",
        "Loaded".cyan(),
        summary.tables_count,
        summary.relationships_count,
        summary.format.as_deref().unwrap_or("unknown")
    );

    if let Some(schema) = store.current() {
        print!("{}", prompt::render(schema));
    }

    Ok(())
}

/// Check command - report.json (and optionally markdown), exit 1 on errors
fn check_command(
    parser: &SchemaParser,
    input: &Path,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let text = read_document(input)?;

    let report = match parser.parse_with_diagnostics(&text) {
        Ok(ParseOutput { schema, diagnostics, .. }) => Report::new(schema, diagnostics),
        Err(err) => Report::new(Default::default(), vec![err.to_diagnostic()]),
    }
    .with_source(input.display().to_string());

    report.save_to_file(output)?;
    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Batch command - one summary line per document
fn batch_command(parser: &SchemaParser, dir: &Path, verbose: bool) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let mut documents: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    documents.sort();

    if verbose {
        eprintln!("{} {} documents under {}", "Found".cyan(), documents.len(), dir.display());
    }

    let mut failed = 0usize;
    for path in &documents {
        let outcome = read_document(path).and_then(|text| Ok(parser.parse_with_diagnostics(&text)?));

        match outcome {
            Ok(output) => {
                let warnings = output
                    .diagnostics
                    .iter()
                    .filter(|d| d.severity >= Severity::Warn)
                    .count();
                println!(
                    "{} {} [{}] {} tables, {} fields, {} relationships{}",
                    "✓".green(),
                    path.display(),
                    output.format,
                    output.schema.tables.len(),
                    output.schema.field_count(),
                    output.schema.relationships.len(),
                    if warnings > 0 {
                        format!(", {} warnings", warnings).yellow().to_string()
                    } else {
                        String::new()
                    }
                );
            }
            Err(err) => {
                failed += 1;
                println!("{} {} {}", "✗".red(), path.display(), format!("{:#}", err).red());
            }
        }
    }

    println!();
    println!(
        "Parsed {} documents, {} failed",
        documents.len() - failed,
        if failed > 0 {
            failed.to_string().red().bold()
        } else {
            failed.to_string().green()
        }
    );

    Ok(())
}

fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Parse Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    if let Some(source) = &report.source {
        println!("Source: {}", source);
    }
    println!();

    println!("{}", "Summary:".bold());
    println!("  Tables:        {}", report.summary.tables);
    println!("  Fields:        {}", report.summary.fields);
    println!(
        "  Relationships: {} explicit, {} implicit",
        report.summary.explicit_relationships, report.summary.implicit_relationships
    );

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
        return;
    }

    println!("{}", "Diagnostics:".bold());
    for diag in &report.diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warn => "WARN".yellow().bold(),
            Severity::Info => "INFO".cyan(),
        };

        println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

        if let Some(loc) = &diag.location {
            match &loc.table {
                Some(table) => println!("    at line {} (table {})", loc.line, table),
                None => println!("    at line {}", loc.line),
            }
        }

        if let Some(snippet) = &diag.snippet {
            println!("    {}", snippet.dimmed());
        }
    }
}

fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Schema Parse Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));
    if let Some(source) = &report.source {
        md.push_str(&format!("**Source:** `{}`\n\n", source));
    }

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Tables: {}\n", report.summary.tables));
    md.push_str(&format!("- Fields: {}\n", report.summary.fields));
    md.push_str(&format!(
        "- Relationships: {} explicit, {} implicit\n",
        report.summary.explicit_relationships, report.summary.implicit_relationships
    ));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n", report.summary.info));
    md.push('\n');

    if !report.schema.tables.is_empty() {
        md.push_str("## Tables\n\n");
        md.push_str("| Table | Fields | Primary key |\n|---|---|---|\n");
        for table in &report.schema.tables {
            let keys: Vec<&str> = table.primary_key_fields().map(|f| f.name.as_str()).collect();
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                table.name,
                table.fields.len(),
                keys.join(", ")
            ));
        }
        md.push('\n');
    }

    if report.diagnostics.is_empty() {
        md.push_str("✅ **No issues found!**\n");
        return md;
    }

    md.push_str("## Diagnostics\n\n");
    for diag in &report.diagnostics {
        let severity_emoji = match diag.severity {
            Severity::Error => "❌",
            Severity::Warn => "⚠️",
            Severity::Info => "ℹ️",
        };

        md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
        md.push_str(&format!("{}\n\n", diag.message));

        if let Some(loc) = &diag.location {
            md.push_str(&format!("**Line:** {}\n\n", loc.line));
        }
        if let Some(snippet) = &diag.snippet {
            md.push_str(&format!("```\n{}\n```\n\n", snippet));
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn markdown_report_lists_tables_and_diagnostics() {
        let output = SchemaParser::new()
            .parse_with_diagnostics("tabela: vazia\ntabela: users\ncampos: id (int, pk)")
            .unwrap();
        let report = Report::new(output.schema, output.diagnostics);

        let md = generate_markdown_report(&report);
        assert!(md.contains("| users | 1 | id |"));
        assert!(md.contains("TABLE_WITHOUT_FIELDS"));
    }
}
