use super::load_catalog;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use dmaic_core::config::WarnLevel;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// Check the catalog and config for mistakes
    Validate,

    /// Write the active catalog as YAML (to stdout unless --output is given)
    Export {
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

pub fn run(root: &Path, subcmd: CatalogSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CatalogSubcommand::Validate => validate(root, json),
        CatalogSubcommand::Export { output } => export(root, output.as_deref()),
    }
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let (config, catalog) = load_catalog(root)?;
    let mut warnings = config.validate(root);
    warnings.extend(catalog.validate());
    let errors = warnings
        .iter()
        .filter(|w| w.level == WarnLevel::Error)
        .count();

    if json {
        print_json(&serde_json::json!({
            "tools": catalog.tools.len(),
            "sequences": catalog.sequences.len(),
            "warnings": warnings,
        }))?;
    } else if warnings.is_empty() {
        println!(
            "Catalog OK: {} tools, {} sequences",
            catalog.tools.len(),
            catalog.sequences.len()
        );
    } else {
        for w in &warnings {
            let tag = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{tag}: {}", w.message);
        }
    }

    if errors > 0 {
        anyhow::bail!("catalog has {errors} error(s)");
    }
    Ok(())
}

fn export(root: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let (_, catalog) = load_catalog(root)?;
    match output {
        Some(path) => {
            dmaic_core::io::write_yaml(path, &*catalog)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote catalog to {}", path.display());
        }
        None => print!("{}", catalog.to_yaml()?),
    }
    Ok(())
}
