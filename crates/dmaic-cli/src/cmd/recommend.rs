use super::load_catalog;
use crate::output::print_json;
use dmaic_core::project::Project;
use std::path::Path;

pub fn run(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let (config, catalog) = load_catalog(root)?;
    let project = Project::load(root, slug)?;
    let state = project.state();
    let recs = catalog.recommend_with_limit(Some(&state), config.recommend.effective_limit());

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "phase": project.phase,
            "recommendations": recs,
        }))?;
        return Ok(());
    }

    println!("Project: {} [{}]", project.slug, project.phase.label());
    if recs.is_empty() {
        println!("No further recommendations: every catalog tool is completed.");
        return Ok(());
    }

    for (i, rec) in recs.iter().enumerate() {
        println!();
        println!(
            "{}. {} ({}) [{}]  score {}",
            i + 1,
            rec.name,
            rec.tool_id,
            rec.phase,
            rec.score
        );
        for reason in &rec.reasons {
            println!("     - {reason}");
        }
    }
    Ok(())
}
