// Command-line driver.
//
// Mirrors the preview-then-download flow of the report tool:
// - Option [1] builds the report and prints it.
// - Option [2] exports the document, JSON model and section CSVs, and is only
//   accepted once a preview has been shown in this session.
use anyhow::{Context, Result};
use clap::Parser;
use cpt_report::session::Session;
use cpt_report::ReportOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cpt-report")]
#[command(about = "Rate, billing class, contract type and city report for CPT billing data")]
struct Args {
    /// CSV file with one provider row per line.
    input: PathBuf,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON file overriding report labels and limits.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log: String,

    /// Preview and export without prompting.
    #[arg(long)]
    yes: bool,
}

/// `None` once the input is closed or unreadable.
fn read_choice<R: BufRead>(input: &mut R) -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn handle_preview(session: &mut Session) {
    println!("Loading data and generating preview...\n");
    match session.preview() {
        Ok(text) => {
            println!("{}", text);
            println!("Preview complete. Choose [2] to export the report.\n");
        }
        Err(e) => eprintln!("Error generating preview: {}\n", e),
    }
}

fn handle_export(session: &Session, args: &Args) {
    match session.export(&args.out_dir) {
        Ok(files) => {
            println!("Report document: {}", files.document.display());
            println!("Report model (JSON): {}", files.json.display());
            for t in &files.tables {
                println!("Table: {}", t.display());
            }
            println!();
        }
        Err(e) => eprintln!("Error generating report: {}\n", e),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(io::stderr)
        .init();

    let options = match &args.config {
        Some(path) => ReportOptions::from_file(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?,
        None => ReportOptions::default(),
    };
    let mut session = Session::new(args.input.clone(), options);

    if args.yes {
        let text = session
            .preview()
            .with_context(|| format!("failed to build report from {}", args.input.display()))?;
        println!("{}", text);
        let files = session.export(&args.out_dir)?;
        println!("Report document: {}", files.document.display());
        return Ok(());
    }

    let mut stdin = io::stdin().lock();
    loop {
        println!("CPT Analysis Report Generator");
        println!("[1] Preview report");
        if session.preview_ready() {
            println!("[2] Export report");
        }
        println!("[q] Quit\n");
        let Some(choice) = read_choice(&mut stdin) else {
            println!("\nInput closed. Exiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_preview(&mut session),
            "2" if session.preview_ready() => handle_export(&session, &args),
            "2" => println!("Preview the report first (option 1).\n"),
            "q" | "Q" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice.\n"),
        }
    }
    Ok(())
}
