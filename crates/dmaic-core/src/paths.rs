use crate::error::{DmaicError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const DMAIC_DIR: &str = ".dmaic";
pub const PROJECTS_DIR: &str = ".dmaic/projects";
pub const CONFIG_FILE: &str = ".dmaic/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn dmaic_dir(root: &Path) -> PathBuf {
    root.join(DMAIC_DIR)
}

pub fn projects_dir(root: &Path) -> PathBuf {
    root.join(PROJECTS_DIR)
}

/// File holding project `slug`. The slug is validated first so it can never
/// point outside the projects directory.
pub fn project_path(root: &Path, slug: &str) -> Result<PathBuf> {
    validate_slug(slug)?;
    Ok(projects_dir(root).join(format!("{slug}.yaml")))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(DmaicError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        for slug in ["reduce-scrap", "a", "line-4-downtime", "x1"] {
            validate_slug(slug).unwrap_or_else(|_| panic!("expected valid: {slug}"));
        }
    }

    #[test]
    fn invalid_slugs() {
        for slug in ["", "-leading", "trailing-", "has spaces", "UPPER", "a_b"] {
            assert!(validate_slug(slug).is_err(), "expected invalid: {slug}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/plant");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/plant/.dmaic/config.yaml")
        );
        assert_eq!(
            project_path(root, "reduce-scrap").unwrap(),
            PathBuf::from("/tmp/plant/.dmaic/projects/reduce-scrap.yaml")
        );
    }

    #[test]
    fn project_path_rejects_traversal() {
        let root = Path::new("/tmp/plant");
        for slug in ["../config", "a/b", "..", "/etc/passwd"] {
            assert!(
                matches!(project_path(root, slug), Err(DmaicError::InvalidSlug(_))),
                "expected rejection: {slug}"
            );
        }
    }
}
