use super::load_catalog;
use crate::output::{print_json, Table};
use anyhow::Context;
use clap::Subcommand;
use dmaic_core::{
    paths,
    project::Project,
    types::{Phase, ToolStatus},
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a new project
    Create {
        /// Project slug (lowercase letters, digits and hyphens)
        slug: String,
        /// Human-readable title (defaults to the slug)
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Starting phase
        #[arg(long, default_value = "define")]
        phase: String,
    },

    /// List all projects
    List,

    /// Show a project and the status of every catalog tool
    Show { slug: String },

    /// Move a project to another phase
    Phase { slug: String, phase: String },

    /// Delete a project
    Delete { slug: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Create {
            slug,
            title,
            description,
            phase,
        } => create(root, &slug, title, description, &phase, json),
        ProjectSubcommand::List => list(root, json),
        ProjectSubcommand::Show { slug } => show(root, &slug, json),
        ProjectSubcommand::Phase { slug, phase } => set_phase(root, &slug, &phase, json),
        ProjectSubcommand::Delete { slug } => delete(root, &slug, json),
    }
}

fn create(
    root: &Path,
    slug: &str,
    title: Option<String>,
    description: Option<String>,
    phase: &str,
    json: bool,
) -> anyhow::Result<()> {
    let phase: Phase = phase.parse()?;
    let mut project = Project::new(slug, title.unwrap_or_else(|| slug.to_string()), phase);
    project.description = description;
    let project = Project::create(root, project)?;

    if json {
        print_json(&project)?;
    } else {
        println!(
            "Created project '{}' in phase {}",
            project.slug,
            project.phase.label()
        );
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    if !paths::dmaic_dir(root).is_dir() {
        return Err(dmaic_core::DmaicError::NotInitialized.into());
    }
    let projects = Project::list(root).context("failed to list projects")?;

    if json {
        print_json(&projects)?;
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects. Run: dmaic project create <slug>");
        return Ok(());
    }

    let mut table = Table::new(["SLUG", "TITLE", "PHASE", "IN PROGRESS", "COMPLETED"]);
    for p in &projects {
        table.row([
            p.slug.clone(),
            p.title.clone(),
            p.phase.label().to_string(),
            p.count_with_status(ToolStatus::InProgress).to_string(),
            p.count_with_status(ToolStatus::Completed).to_string(),
        ]);
    }
    table.print();
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let (_, catalog) = load_catalog(root)?;
    let project = Project::load(root, slug)?;

    if json {
        print_json(&project)?;
        return Ok(());
    }

    println!("Project: {} ({})", project.slug, project.title);
    if let Some(ref desc) = project.description {
        println!("         {desc}");
    }
    println!("Phase:   {}", project.phase.label());
    println!("Updated: {}", project.updated_at.format("%Y-%m-%d %H:%M UTC"));
    println!();

    let mut table = Table::new(["TOOL", "PHASE", "STATUS"]);
    for t in &catalog.tools {
        table.row([
            t.id.clone(),
            t.phase.clone(),
            project.tool_status(&t.id).to_string(),
        ]);
    }
    table.print();
    Ok(())
}

fn set_phase(root: &Path, slug: &str, phase: &str, json: bool) -> anyhow::Result<()> {
    let phase: Phase = phase.parse()?;
    let mut project = Project::load(root, slug)?;
    let from = project.phase;
    project.set_phase(phase);
    project.save(root).context("failed to save project")?;
    tracing::info!(project = slug, %from, to = %phase, "phase changed");

    if json {
        print_json(&serde_json::json!({ "slug": slug, "from": from, "phase": phase }))?;
    } else {
        println!("Project '{slug}': {} -> {}", from.label(), phase.label());
    }
    Ok(())
}

fn delete(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    Project::delete(root, slug)?;
    if json {
        print_json(&serde_json::json!({ "slug": slug, "deleted": true }))?;
    } else {
        println!("Deleted project '{slug}'");
    }
    Ok(())
}
