use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared_types::Category;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use costs_client::forms::{ProjectForm, ServiceForm};
use costs_client::render::render;
use costs_client::{ClientConfig, HttpProjectsApi, ProjectDetailView, ViewOptions};

#[derive(Parser, Debug)]
#[command(name = "costs", author, version, about = "View and edit a project's budget and services")]
struct Args {
    /// Projects API base URL, overriding the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[arg(long, global = true)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a project and its services
    Show { id: String },

    /// Edit a project's name, budget or category
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long, requires = "category_name")]
        category_id: Option<String>,
        #[arg(long, requires = "category_id")]
        category_name: Option<String>,
    },

    /// Add a service to a project
    AddService {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        cost: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Remove a service from a project
    RemoveService { id: String, service_id: String },
}

impl Command {
    fn project_id(&self) -> &str {
        match self {
            Command::Show { id }
            | Command::Edit { id, .. }
            | Command::AddService { id, .. }
            | Command::RemoveService { id, .. } => id,
        }
    }
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("costs.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path.as_deref());

    let (mut config, config_path) = ClientConfig::load().context("Failed to load costs config")?;
    tracing::debug!("Loaded config from {:?}", config_path);
    if let Some(api_url) = args.api_url {
        config.api.base_url = api_url;
    }

    let api = Arc::new(HttpProjectsApi::from_config(&config.api)?);
    tracing::info!("Using projects API at {}", api.base_url());

    let view = ProjectDetailView::new(
        api,
        args.command.project_id(),
        ViewOptions {
            stale_responses: config.view.stale_responses,
        },
    );
    view.load().await;

    if !view.state().is_loading() {
        run_command(&view, args.command).await?;
    }

    let state = view.state();
    print!("{}", render(&state));

    if state.is_error() {
        bail!("{}", state.status_text().unwrap_or_default());
    }
    Ok(())
}

async fn run_command(view: &ProjectDetailView, command: Command) -> Result<()> {
    match command {
        Command::Show { .. } => {}
        Command::Edit {
            name,
            budget,
            category_id,
            category_name,
            ..
        } => {
            view.toggle_project_form();

            let mut form = ProjectForm::new(&view.state().project);
            if let Some(name) = name {
                form = form.name(name);
            }
            if let Some(budget) = budget {
                form = form.budget(budget);
            }
            if let (Some(id), Some(name)) = (category_id, category_name) {
                form = form.category(Category { id, name });
            }

            view.edit_project(form.submit()?).await;
        }
        Command::AddService {
            name,
            cost,
            description,
            ..
        } => {
            view.toggle_service_form();

            let form = ServiceForm {
                name,
                cost,
                description,
            };
            view.create_service(form.submit()?).await;
        }
        Command::RemoveService { service_id, .. } => {
            let state = view.state();
            let service = state
                .services
                .iter()
                .find(|service| service.id == service_id)
                .with_context(|| format!("Service {service_id} not found in project"))?;

            view.remove_service(&service.id, service.cost).await;
        }
    }

    Ok(())
}
