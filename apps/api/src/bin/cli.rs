//! Command-line client for a running Resume API server.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use resume_analyzer::analysis::models::{AnalysisResult, MatchResult};
use resume_analyzer::client::history::{JsonFileStore, Snapshot, SnapshotHistory};
use resume_analyzer::client::{ApiClient, DEFAULT_API_URL};
use resume_analyzer::llm_client::json::extract_any_json;

#[derive(Parser)]
#[command(name = "resume-cli")]
#[command(about = "Analyze resumes against a Resume API server")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Server root URL
    #[arg(long, env = "RESUME_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Where analysis snapshots are kept
    #[arg(long, env = "RESUME_HISTORY_FILE", default_value = "resume_history.json")]
    history_file: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a resume (.pdf or text) and save a snapshot
    Analyze {
        file: PathBuf,
        /// Also match against this job description file
        #[arg(long)]
        job: Option<PathBuf>,
    },
    /// Show or edit saved snapshots
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Send a raw prompt to the active model
    Generate {
        prompt: String,
        #[arg(long, default_value_t = 800)]
        max_tokens: u32,
        /// Extract and pretty-print the JSON in the reply
        #[arg(long)]
        json: bool,
    },
    /// Check that the server can reach its model provider
    Probe,
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Remove { id: Uuid },
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("resume_analyzer={level}"))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = ApiClient::new(&cli.api_url)?;
    let history = SnapshotHistory::new(JsonFileStore::new(&cli.history_file));

    match cli.command {
        Command::Analyze { file, job } => {
            let resume_text = read_resume(&client, &file).await?;
            let analysis = client.analyze_resume(&resume_text).await?;
            print_analysis(&analysis);

            let snapshot = history.save_snapshot(&analysis)?;
            println!("\nSaved {} ({})", snapshot.label, snapshot.id);

            if let Some(job_path) = job {
                let job_description = std::fs::read_to_string(&job_path)
                    .with_context(|| format!("Failed to read {}", job_path.display()))?;
                let result = client.match_job(&resume_text, &job_description).await?;
                print_match(&result);
            }
        }
        Command::History { action } => match action.unwrap_or(HistoryAction::List) {
            HistoryAction::List => print_history(&history.load_history()),
            HistoryAction::Remove { id } => {
                if !history.remove(id)? {
                    bail!("No snapshot with id {id}");
                }
                println!("Removed {id}");
            }
            HistoryAction::Clear => {
                history.clear()?;
                println!("History cleared");
            }
        },
        Command::Generate {
            prompt,
            max_tokens,
            json,
        } => {
            let text = client.call_ai(&prompt, max_tokens).await?;
            if json {
                let value = extract_any_json(&text)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{text}");
            }
        }
        Command::Probe => {
            let report = client.probe().await?;
            println!("{} ({}): {}", report.provider, report.model, report.response.trim());
        }
    }

    Ok(())
}

async fn read_resume(client: &ApiClient, path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf");
        let parsed = client.parse_pdf(bytes, filename).await?;
        return Ok(parsed.text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_analysis(analysis: &AnalysisResult) {
    let score = &analysis.score;
    let name = match analysis.candidate.name.trim() {
        "" => "Resume",
        name => name,
    };
    println!("{name}: {}/100 {}", score.overall, score.grade);
    let b = &score.breakdown;
    println!(
        "  formatting {}  impact {}  skills {}  experience {}  education {}",
        b.formatting, b.impact, b.skills, b.experience, b.education
    );

    if !analysis.strengths.is_empty() {
        println!("\nStrengths:");
        for strength in &analysis.strengths {
            println!("  + {strength}");
        }
    }
    if !analysis.improvements.is_empty() {
        println!("\nImprovements:");
        for item in &analysis.improvements {
            println!("  [{:?}] {}: {}", item.priority, item.category, item.suggestion);
        }
    }
}

fn print_match(result: &MatchResult) {
    println!(
        "\nJob match: {}/100 {} - {}",
        result.match_score, result.match_grade, result.verdict
    );
    if !result.missing_keywords.is_empty() {
        println!("  missing: {}", result.missing_keywords.join(", "));
    }
    for tip in &result.tailoring_tips {
        println!("  {}: {}", tip.section, tip.tip);
    }
}

fn print_history(snapshots: &[Snapshot]) {
    if snapshots.is_empty() {
        println!("No snapshots yet. Run `resume-cli analyze <file>` to save one.");
        return;
    }
    for (i, snap) in snapshots.iter().enumerate() {
        let delta = snapshots
            .get(i + 1)
            .map(|prev| snap.score.overall as i64 - prev.score.overall as i64)
            .map(|d| format!(" ({d:+})"))
            .unwrap_or_default();
        println!(
            "{}  {}  {}/100{delta}  {}",
            snap.id,
            snap.timestamp.format("%Y-%m-%d %H:%M"),
            snap.score.overall,
            snap.label
        );
    }
}
