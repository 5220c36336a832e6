use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use proposal_admin::authz::{evaluate_proposal_permissions, evaluate_subject_permissions};
use proposal_admin::mappers::proposal_from_api;
use proposal_admin::models::{ApiProposal, KeyConcept, ProposalForm, Role, SubjectForm, TutorSelection, User};
use proposal_admin::notify::NotificationBus;
use proposal_admin::services::{SubjectCreationFlow, SubmitOutcome};
use proposal_admin::utils::read_json_file;
use proposal_admin::validation::{validate_key_concepts, validate_proposal, validate_subject_form, ValidationReport};

#[derive(Parser, Debug)]
#[command(author, version, about = "proposal and subject administration tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a proposal form stored as JSON
    ValidateProposal { file: PathBuf },
    /// Validate a subject form stored as JSON
    ValidateSubject { file: PathBuf },
    /// Validate a list of PEA key concepts stored as JSON
    ValidateConcepts { file: PathBuf },
    /// Evaluate what a user may do with a proposal
    Permissions {
        #[arg(long)]
        user: PathBuf,
        #[arg(long)]
        proposal: PathBuf,
    },
    /// Print the subject capabilities of a role code (1 admin, 2 tutor, 3 student)
    SubjectPermissions {
        #[arg(long)]
        role: i64,
    },
    /// Create a subject through the configured API, optionally assigning a tutor
    CreateSubject {
        #[arg(long)]
        name: String,
        #[arg(long)]
        semester: String,
        #[arg(long)]
        journey: String,
        #[arg(long)]
        tutor: Option<i64>,
    },
    /// Send a PEA document to the PDF service and print the resulting draft
    AnalyzePea {
        #[arg(long)]
        subject: i64,
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::ValidateProposal { file } => {
            let form: ProposalForm = read_json_file(&file)?;
            report(ValidationReport::from_errors(validate_proposal(&form)))?;
        }
        Commands::ValidateSubject { file } => {
            let form: SubjectForm = read_json_file(&file)?;
            report(validate_subject_form(&form).into())?;
        }
        Commands::ValidateConcepts { file } => {
            let concepts: Vec<KeyConcept> = read_json_file(&file)?;
            report(validate_key_concepts(&concepts))?;
        }
        Commands::Permissions { user, proposal } => {
            let user: User = read_json_file(&user)?;
            let raw: ApiProposal = read_json_file(&proposal)?;
            let permissions = evaluate_proposal_permissions(Some(&user), Some(&proposal_from_api(&raw)));
            println!("{}", serde_json::to_string_pretty(&permissions)?);
        }
        Commands::SubjectPermissions { role } => {
            let capabilities = evaluate_subject_permissions(Role::from_code(role));
            println!("{}", serde_json::to_string_pretty(&capabilities)?);
        }
        Commands::CreateSubject {
            name,
            semester,
            journey,
            tutor,
        } => {
            let ctx = proposal_admin::create_context(NotificationBus::default())
                .context("failed to configure the api client")?;
            let mut flow = SubjectCreationFlow::new(ctx);

            flow.set_details(name, semester, journey);
            if let Err(errors) = flow.next() {
                anyhow::bail!("invalid subject: {}", errors.join("; "));
            }
            flow.select_tutor(tutor.map(TutorSelection::new));

            let outcome = flow.submit(tutor.is_some()).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            match outcome {
                SubmitOutcome::SubjectCreated { .. } | SubmitOutcome::Completed { .. } => {}
                other => anyhow::bail!("subject creation did not complete: {other:?}"),
            }
        }
        Commands::AnalyzePea { subject, file } => {
            let service = proposal_admin::create_pea_service(NotificationBus::default())
                .context("failed to configure the pdf service")?;
            let document = std::fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "pea.pdf".to_string());

            let draft = service.analyze_document(subject, &file_name, document).await?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
    }

    Ok(())
}

fn report(report: ValidationReport) -> anyhow::Result<()> {
    if report.is_valid {
        println!("valid");
        return Ok(());
    }

    for error in &report.errors {
        println!("- {error}");
    }
    anyhow::bail!("{} validation error(s)", report.errors.len())
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
