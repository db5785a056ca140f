pub mod catalog;
pub mod init;
pub mod project;
pub mod recommend;
pub mod tool;

use anyhow::Context;
use dmaic_core::{catalog::Catalog, config::Config};
use std::borrow::Cow;
use std::path::Path;

/// Load the config and the catalog it selects.
pub fn load_catalog(root: &Path) -> anyhow::Result<(Config, Cow<'static, Catalog>)> {
    let config = Config::load(root).context("failed to load config")?;
    let catalog = Catalog::resolve(root, &config).context("failed to load catalog")?;
    Ok((config, catalog))
}
