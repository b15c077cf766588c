//! dashgen CLI entrypoint
//! Parses command-line arguments and dispatches to the server or the offline generator.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use dashgen::{
    core::{
        config::{DEFAULT_CORS_ORIGIN, ServerConfig, log_filter},
        schema,
        templates::{ComponentKind, TemplateStore},
    },
    generation::{GENERATED_FILENAME, LayoutComposer},
    server::{AppState, build_router},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "dashgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP code generation service
    Serve {
        /// Address to bind
        #[arg(long, env = "DASHGEN_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, env = "DASHGEN_PORT", default_value_t = 8000)]
        port: u16,
        /// Template directory replacing the embedded templates
        #[arg(long, env = "DASHGEN_TEMPLATE_DIR")]
        template_dir: Option<PathBuf>,
        /// Origin allowed to call the service from a browser
        #[arg(long, env = "DASHGEN_CORS_ORIGIN", default_value = DEFAULT_CORS_ORIGIN)]
        cors_origin: String,
    },
    /// Generate a dashboard from a layout file without starting a server
    Generate {
        /// Path to the JSON layout description
        #[arg(long)]
        config: PathBuf,
        /// Output file, or `-` for stdout
        #[arg(long, default_value = GENERATED_FILENAME)]
        output: PathBuf,
        /// Template directory replacing the embedded templates
        #[arg(long, env = "DASHGEN_TEMPLATE_DIR")]
        template_dir: Option<PathBuf>,
    },
    /// Inspect the template store
    Templates {
        #[command(subcommand)]
        action: TemplateCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum TemplateCommands {
    /// List every registered template with its placeholders
    List {
        /// Template directory replacing the embedded templates
        #[arg(long, env = "DASHGEN_TEMPLATE_DIR")]
        template_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve {
            host,
            port,
            template_dir,
            cors_origin,
        } => {
            serve(ServerConfig {
                host,
                port,
                template_dir,
                cors_origin,
            })
            .await?
        }
        Commands::Generate {
            config,
            output,
            template_dir,
        } => generate(&config, &output, template_dir).await?,
        Commands::Templates { action } => match action {
            TemplateCommands::List { template_dir } => list_templates(template_dir).await?,
        },
    }
    Ok(())
}

/// Serve the HTTP API until Ctrl-C
async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let cors_origin = config.cors_origin_header()?;

    let store = TemplateStore::open(config.template_dir.as_deref())
        .await
        .context("Failed to load templates")?;
    let app = build_router(AppState::new(Arc::new(store)), cors_origin);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, cors_origin = %config.cors_origin, "Dashboard code generator listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

/// Render a layout file to disk or stdout
async fn generate(
    config: &Path,
    output: &Path,
    template_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(config)
        .await
        .with_context(|| format!("Failed to read {}", config.display()))?;
    let body: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", config.display()))?;
    let request = schema::validate(&body)?;

    let store = TemplateStore::open(template_dir.as_deref())
        .await
        .context("Failed to load templates")?;
    let document = LayoutComposer::new(Arc::new(store)).compose(&request)?;

    if output.as_os_str() == "-" {
        print!("{}", document.content);
    } else {
        tokio::fs::write(output, &document.content)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!(path = %output.display(), layout = %request.layout, "Wrote dashboard");
    }
    Ok(())
}

/// Print the registered templates grouped by kind
async fn list_templates(template_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let store = TemplateStore::open(template_dir.as_deref())
        .await
        .context("Failed to load templates")?;

    let manifest = store.manifest();
    println!(
        "Template set '{}' v{} from {}",
        manifest.name,
        manifest.version,
        store.source()
    );
    if !manifest.description.is_empty() {
        println!("{}", manifest.description);
    }
    for kind in ComponentKind::all() {
        println!("\n{} templates:", kind.label());
        for entry in store.entries_of(kind) {
            let key = kind.key_from_artifact(&entry.name).unwrap_or(entry.name.as_str());
            println!("  • {key} ({}) [{}]", entry.name, entry.placeholders.join(", "));
        }
    }
    Ok(())
}
