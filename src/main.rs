use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use loanscore_api::RestApi;
use loanscore_core::{Classifier, SchemaVariant};
use loanscore_schema::{Deployment, DeploymentSet, ExplainedVector, RawForm};
use loanscore_storage::ArtifactStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Loan default scoring service
#[derive(Parser, Debug)]
#[command(name = "loanscore")]
#[command(about = "Score loan applicant forms with pre-trained classifiers", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Classifier artifact for schema A
    #[arg(long, global = true)]
    model_a: Option<PathBuf>,

    /// Classifier artifact for schema B
    #[arg(long, global = true)]
    model_b: Option<PathBuf>,

    /// HTTP API port
    #[arg(long, default_value_t = 8501, global = true)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,

    /// Score one form read from a JSON file and print the verdict
    Predict {
        /// Schema variant: a or b
        #[arg(long)]
        variant: SchemaVariant,

        /// JSON object of form fields
        #[arg(long)]
        form: PathBuf,

        /// Include the encoded vector with slot names
        #[arg(long)]
        explain: bool,
    },
}

fn load_deployment(path: &Path, variant: SchemaVariant) -> anyhow::Result<Deployment> {
    let loaded = ArtifactStore::load_for(path, variant)
        .with_context(|| format!("loading schema {} artifact", variant))?;

    let name = loaded.artifact.name.clone();
    let classifier: Arc<dyn Classifier> = Arc::new(loaded.artifact.model);
    let deployment = Deployment::new(variant, classifier)
        .with_context(|| format!("deploying {:?}", path))?
        .named(name);

    info!(
        "Deployment {} ready: schema {}, {} features, rule {:?}",
        deployment.name(),
        variant,
        deployment.schema().dim(),
        deployment.rule()
    );
    Ok(deployment)
}

fn load_deployments(args: &Args) -> anyhow::Result<DeploymentSet> {
    let mut set = DeploymentSet::new();
    for (variant, path) in [
        (SchemaVariant::A, &args.model_a),
        (SchemaVariant::B, &args.model_b),
    ] {
        if let Some(path) = path {
            set.insert(load_deployment(path, variant)?);
        }
    }
    Ok(set)
}

fn run_predict(args: &Args, variant: SchemaVariant, form: &Path, explain: bool) -> anyhow::Result<()> {
    let model = match variant {
        SchemaVariant::A => &args.model_a,
        SchemaVariant::B => &args.model_b,
    };
    let Some(model) = model else {
        bail!("--model-{} is required to score schema {} forms", variant, variant);
    };
    let deployment = load_deployment(model, variant)?;

    let raw = std::fs::read_to_string(form).with_context(|| format!("reading {:?}", form))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {:?}", form))?;
    let form = RawForm::from_json(value)?;
    deployment.schema().check_bounds(&form)?;

    let prediction = deployment.predict(&form)?;
    let mut output = serde_json::to_value(&prediction)?;
    if explain {
        let slots = ExplainedVector::new(&deployment.schema().slot_names(), &prediction.vector);
        output["explain"] = serde_json::to_value(slots)?;
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(Command::Predict {
        variant,
        form,
        explain,
    }) = &args.command
    {
        return run_predict(&args, *variant, form, *explain);
    }

    info!("Starting loanscore v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP API port: {}", args.http_port);

    let deployments = load_deployments(&args)?;
    if deployments.is_empty() {
        bail!("no classifier artifacts given; pass --model-a and/or --model-b");
    }
    let deployments = Arc::new(deployments);
    info!("{} deployment(s) loaded", deployments.len());

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(deployments, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("loanscore started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
