use clap::{Parser, Subcommand};
use pv_app::{
    AppError, AppResult, CaseRow, ResultsSession, ViewerConfig, load_config, project_service,
    query,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pv-cli")]
#[command(about = "ParView CLI - Parametric study results viewer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// List the variables of a project
    Variables {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// Show the case results table
    Show {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Output shown in the result column (defaults to the main output)
        #[arg(short, long)]
        output: Option<String>,
        /// Discrete variable to group by ("None" for no grouping)
        #[arg(short, long)]
        group_by: Option<String>,
        /// Viewer config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show design-of-experiments analysis results
    Doe {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Variables { project_path } => cmd_variables(&project_path),
        Commands::Show {
            project_path,
            output,
            group_by,
            config,
            json,
        } => cmd_show(&project_path, output, group_by, config.as_deref(), json),
        Commands::Doe { project_path, json } => cmd_doe(&project_path, json),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    let summary = project_service::summarize(&project);
    println!("✓ Project is valid");
    println!(
        "  {} cases ({} finished), {} variables, {} design sessions",
        summary.case_count,
        summary.finished_cases,
        summary.variable_count,
        summary.design_sessions
    );
    Ok(())
}

fn cmd_variables(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let variables = project_service::list_variables(&project);

    if variables.is_empty() {
        println!("No variables found in project");
    } else {
        println!("Variables in project:");
        for var in variables {
            let group = var
                .group
                .map(|g| format!(" [{}]", g))
                .unwrap_or_default();
            println!(
                "  {} ({:?}){}: {}",
                var.name,
                var.kind,
                group,
                var.values.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_show(
    project_path: &Path,
    output: Option<String>,
    group_by: Option<String>,
    config_path: Option<&Path>,
    json: bool,
) -> AppResult<()> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => ViewerConfig::default(),
    };
    if output.is_some() {
        config.output = output;
    }
    if group_by.is_some() {
        config.group_by = group_by;
    }

    let session = ResultsSession::load(project_path, config)?;
    let snapshot = session.replay()?;
    let output = session.output();
    let rows = query::case_rows(&snapshot, &output);
    tracing::debug!(rows = rows.len(), version = snapshot.version, "case table ready");

    if json {
        return print_json(&rows);
    }

    println!("Results: {}", snapshot.result_name);
    let header: Vec<&str> = snapshot
        .discrete_variables
        .iter()
        .map(String::as_str)
        .collect();
    println!("  #  {} | {}", header.join(" | "), output);
    for row in &rows {
        println!(
            "  {}  {} | {}{}",
            row.index,
            row.values.join(" | "),
            row.result,
            progress_suffix(row, session.config().show_progress)
        );
    }
    Ok(())
}

fn progress_suffix(row: &CaseRow, show_progress: bool) -> String {
    if !show_progress {
        return String::new();
    }
    let mut parts = Vec::new();
    if let Some(percent) = row.percent {
        parts.push(format!("{:.0}%", percent * 100.0));
    }
    if let Some(count) = row.count {
        parts.push(format!("{:.0}% of runs", count * 100.0));
    }
    if let Some(ftp) = &row.ftp {
        parts.push(ftp.clone());
    }
    if let Some(spark) = &row.sparkline {
        let points = spark.values.first().map(Vec::len).unwrap_or(0);
        parts.push(format!("~{} pts", points));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("  ({})", parts.join(", "))
    }
}

fn cmd_doe(project_path: &Path, json: bool) -> AppResult<()> {
    let session = ResultsSession::load(project_path, ViewerConfig::default())?;
    let snapshot = session.replay()?;
    let rows = query::doe_rows(&snapshot);

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No design sessions in project");
        return Ok(());
    }
    let variables: Vec<&str> = snapshot.variables.iter().map(String::as_str).collect();
    println!(
        "  #  {} | {}",
        variables.join(" | "),
        snapshot.doe_outputs.join(" | ")
    );
    for row in rows {
        println!(
            "  {}  {} | {}",
            row.index,
            row.values.join(" | "),
            row.outputs.join(" | ")
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(rows: &T) -> AppResult<()> {
    let text = serde_json::to_string_pretty(rows)
        .map_err(|e| AppError::InvalidInput(format!("Failed to serialize rows: {}", e)))?;
    println!("{}", text);
    Ok(())
}
