use super::load_catalog;
use crate::output::{print_json, Table};
use anyhow::Context;
use clap::Subcommand;
use dmaic_core::{
    catalog::ToolDefinition,
    project::Project,
    types::{Phase, ToolStatus},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum ToolSubcommand {
    /// List catalog tools
    List {
        /// Only tools belonging to this phase
        #[arg(long)]
        phase: Option<String>,
    },
    /// Mark a tool as in progress on a project
    Start { slug: String, tool: String },
    /// Mark a tool as completed on a project
    Complete { slug: String, tool: String },
    /// Reset a tool to not started on a project
    Reset { slug: String, tool: String },
}

pub fn run(root: &Path, subcmd: ToolSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ToolSubcommand::List { phase } => list(root, phase.as_deref(), json),
        ToolSubcommand::Start { slug, tool } => {
            set_status(root, &slug, &tool, ToolStatus::InProgress, json)
        }
        ToolSubcommand::Complete { slug, tool } => {
            set_status(root, &slug, &tool, ToolStatus::Completed, json)
        }
        ToolSubcommand::Reset { slug, tool } => {
            set_status(root, &slug, &tool, ToolStatus::NotStarted, json)
        }
    }
}

fn list(root: &Path, phase: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (_, catalog) = load_catalog(root)?;
    let tools: Vec<&ToolDefinition> = match phase {
        Some(p) => {
            let phase: Phase = p.parse()?;
            catalog.tools_in_phase(phase).collect()
        }
        None => catalog.tools.iter().collect(),
    };

    if json {
        print_json(&tools)?;
        return Ok(());
    }

    let mut table = Table::new(["ID", "NAME", "PHASE", "DIFFICULTY", "CATEGORY"]);
    for t in &tools {
        table.row([
            t.id.clone(),
            t.name.clone(),
            t.phase.clone(),
            t.difficulty.to_string(),
            t.category.clone(),
        ]);
    }
    table.print();
    Ok(())
}

fn set_status(
    root: &Path,
    slug: &str,
    tool_id: &str,
    status: ToolStatus,
    json: bool,
) -> anyhow::Result<()> {
    let (_, catalog) = load_catalog(root)?;
    let mut project = Project::load(root, slug)?;
    project.set_tool_status(&catalog, tool_id, status)?;
    project.save(root).context("failed to save project")?;
    tracing::info!(project = slug, tool = tool_id, %status, "tool status changed");

    if json {
        print_json(&serde_json::json!({ "slug": slug, "tool": tool_id, "status": status }))?;
    } else {
        println!("Project '{slug}': {tool_id} is now {status}");
    }
    Ok(())
}
