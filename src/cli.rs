use clap::{Args, Parser, Subcommand};
use posting_taxonomy::classification::import;
use posting_taxonomy::classification::{
    BatchReport, Classifier, CompanyRecord, EmploymentCategory, IndustryResult, JobRecord,
    RuleStore,
};
use posting_taxonomy::config::AppConfig;
use posting_taxonomy::error::AppError;
use posting_taxonomy::telemetry;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "posting-taxonomy",
    about = "Classify crawled job postings and company profiles with hot-reloadable rules",
    version
)]
struct Cli {
    #[command(flatten)]
    rules: RuleArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify job postings from a CSV export (title, description, type)
    Jobs(ClassifyArgs),
    /// Place companies from a CSV export (name, description) in the industry taxonomy
    Companies(ClassifyArgs),
    /// Inspect rule files
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// Keep reloading rule files on the configured interval until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Load the configured rule files once and print a summary of the snapshot
    Check,
}

#[derive(Args, Debug, Default)]
struct RuleArgs {
    /// Override the employment rule file (RULES_EMPLOYMENT_PATH)
    #[arg(long, global = true)]
    employment_rules: Option<PathBuf>,
    /// Override the industry rule file (RULES_INDUSTRY_PATH)
    #[arg(long, global = true)]
    industry_rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// CSV file to classify
    #[arg(long)]
    input: PathBuf,
    /// Records per chunk (defaults to BATCH_CHUNK_SIZE)
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Emit the signal trail for every record instead of just the label
    #[arg(long)]
    explain: bool,
}

#[derive(Serialize)]
struct JobLine<'a> {
    title: &'a str,
    category: EmploymentCategory,
}

#[derive(Serialize)]
struct CompanyLine<'a> {
    name: &'a str,
    #[serde(flatten)]
    result: &'a IndustryResult,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(path) = cli.rules.employment_rules {
        config.rules.employment_path = Some(path);
    }
    if let Some(path) = cli.rules.industry_rules {
        config.rules.industry_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Jobs(args) => run_jobs(&config, args).await,
        Command::Companies(args) => run_companies(&config, args).await,
        Command::Rules {
            command: RulesCommand::Check,
        } => run_rules_check(&config).await,
        Command::Watch => run_watch(&config).await,
    }
}

async fn open_classifier(config: &AppConfig) -> Classifier {
    let store = Arc::new(RuleStore::open(config.rules.source()).await);
    Classifier::new(store, config.batch.clone())
}

async fn run_jobs(config: &AppConfig, args: ClassifyArgs) -> Result<(), AppError> {
    let classifier = open_classifier(config).await;
    let jobs: Vec<JobRecord> = import::jobs_from_path(&args.input)?;

    if args.explain {
        let mut out = std::io::stdout().lock();
        for job in &jobs {
            serde_json::to_writer(&mut out, &classifier.explain_job(job))?;
            writeln!(out)?;
        }
        return Ok(());
    }

    let chunk_size = args.chunk_size.unwrap_or(config.batch.chunk_size);
    let output = classifier.classify_batch(jobs, chunk_size).await?;
    let mut out = std::io::stdout().lock();
    for (job, category) in &output.results {
        let line = JobLine {
            title: &job.title,
            category: *category,
        };
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
    }
    log_report("jobs", &output.report);
    Ok(())
}

async fn run_companies(config: &AppConfig, args: ClassifyArgs) -> Result<(), AppError> {
    let classifier = open_classifier(config).await;
    let companies: Vec<CompanyRecord> = import::companies_from_path(&args.input)?;

    if args.explain {
        let mut out = std::io::stdout().lock();
        for company in &companies {
            serde_json::to_writer(&mut out, &classifier.explain_company(company))?;
            writeln!(out)?;
        }
        return Ok(());
    }

    let chunk_size = args.chunk_size.unwrap_or(config.batch.chunk_size);
    let output = classifier
        .classify_company_batch(companies, chunk_size)
        .await?;
    let mut out = std::io::stdout().lock();
    for (company, result) in &output.results {
        let line = CompanyLine {
            name: &company.name,
            result,
        };
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
    }
    log_report("companies", &output.report);
    Ok(())
}

async fn run_rules_check(config: &AppConfig) -> Result<(), AppError> {
    let store = RuleStore::new(config.rules.source());
    let snapshot = store.reload().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot.summary())?);
    Ok(())
}

async fn run_watch(config: &AppConfig) -> Result<(), AppError> {
    let store = Arc::new(RuleStore::open(config.rules.source()).await);
    let schedule = store.schedule_reload(config.rules.reload_interval);

    info!(
        ?config.environment,
        interval = ?config.rules.reload_interval,
        version = store.snapshot().version,
        "watching rule files"
    );

    tokio::signal::ctrl_c().await?;
    schedule.stop();
    info!(version = store.snapshot().version, "rule watcher stopped");
    Ok(())
}

fn log_report(kind: &str, report: &BatchReport) {
    info!(
        kind,
        total = report.total,
        chunks = report.chunks,
        classified = report.classified,
        substituted = report.substituted,
        dropped = report.dropped,
        "batch classification finished"
    );
}
