use crate::config::{Config, ConfigWarning, WarnLevel};
use crate::error::{DmaicError, Result};
use crate::types::{phase_rank, Difficulty, Phase};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

/// Category value that marks a tool as foundational.
pub const FOUNDATIONAL_CATEGORY: &str = "foundational";

// ---------------------------------------------------------------------------
// ToolDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub id: String,
    pub name: String,
    /// Phase name as written in the catalog. Resolved through [`phase_rank`],
    /// so an unknown name still loads and ranks as 0.
    pub phase: String,
    pub difficulty: Difficulty,
    pub category: String,
}

impl ToolDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phase: impl Into<String>,
        difficulty: Difficulty,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phase: phase.into(),
            difficulty,
            category: category.into(),
        }
    }

    pub fn phase_rank(&self) -> u8 {
        phase_rank(&self.phase)
    }

    pub fn is_foundational(&self) -> bool {
        self.category == FOUNDATIONAL_CATEGORY
    }
}

// ---------------------------------------------------------------------------
// Prerequisites and sequences
// ---------------------------------------------------------------------------

/// Direct prerequisites per tool id. Tools without an entry have none.
pub type PrerequisiteGraph = BTreeMap<String, Vec<String>>;

pub fn prerequisites_of<'a>(graph: &'a PrerequisiteGraph, tool_id: &str) -> &'a [String] {
    graph.get(tool_id).map(|v| v.as_slice()).unwrap_or(&[])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimalSequence {
    pub sequence: Vec<String>,
    pub bonus: u32,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub tools: Vec<ToolDefinition>,
    #[serde(default)]
    pub prerequisites: PrerequisiteGraph,
    #[serde(default)]
    pub sequences: Vec<OptimalSequence>,
}

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// The catalog shipped with the binary. Built on first use and shared for
    /// the rest of the process.
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(builtin_catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        crate::io::read_yaml(path)?
            .ok_or_else(|| DmaicError::CatalogNotFound(path.display().to_string()))
    }

    /// The catalog named in `config`, falling back to the built-in one.
    pub fn resolve(root: &Path, config: &Config) -> Result<Cow<'static, Catalog>> {
        match config.catalog_path(root) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading catalog");
                Ok(Cow::Owned(Self::load(&path)?))
            }
            None => Ok(Cow::Borrowed(Self::builtin())),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn tool(&self, id: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn require_tool(&self, id: &str) -> Result<&ToolDefinition> {
        self.tool(id)
            .ok_or_else(|| DmaicError::UnknownTool(id.to_string()))
    }

    pub fn tools_in_phase(&self, phase: Phase) -> impl Iterator<Item = &ToolDefinition> {
        self.tools
            .iter()
            .filter(move |t| t.phase_rank() == phase.rank())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Structural checks. The engine tolerates every issue reported here;
    /// errors only mean the catalog will not behave as its author expects.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for tool in &self.tools {
            if !seen.insert(tool.id.as_str()) {
                warnings.push(error(format!("duplicate tool id '{}'", tool.id)));
            }
            if tool.phase_rank() == 0 {
                warnings.push(error(format!(
                    "tool '{}' has unknown phase '{}'",
                    tool.id, tool.phase
                )));
            }
        }

        for (tool_id, prereqs) in &self.prerequisites {
            if !seen.contains(tool_id.as_str()) {
                warnings.push(warning(format!(
                    "prerequisites listed for unknown tool '{tool_id}'"
                )));
            }
            for p in prereqs {
                if p == tool_id {
                    warnings.push(warning(format!("tool '{tool_id}' lists itself as a prerequisite")));
                } else if !seen.contains(p.as_str()) {
                    warnings.push(warning(format!(
                        "tool '{tool_id}' has unknown prerequisite '{p}'"
                    )));
                }
            }
        }

        for (i, seq) in self.sequences.iter().enumerate() {
            if seq.sequence.len() < 2 {
                warnings.push(warning(format!(
                    "sequence #{} has fewer than two tools and can never award a bonus",
                    i + 1
                )));
            }
            if seq.bonus == 0 {
                warnings.push(warning(format!("sequence #{} has a zero bonus", i + 1)));
            }
            for id in &seq.sequence {
                if !seen.contains(id.as_str()) {
                    warnings.push(warning(format!(
                        "sequence #{} references unknown tool '{id}'",
                        i + 1
                    )));
                }
            }
        }

        warnings
    }
}

fn warning(message: String) -> ConfigWarning {
    ConfigWarning {
        level: WarnLevel::Warning,
        message,
    }
}

fn error(message: String) -> ConfigWarning {
    ConfigWarning {
        level: WarnLevel::Error,
        message,
    }
}

// ---------------------------------------------------------------------------
// Built-in catalog
// ---------------------------------------------------------------------------

fn builtin_catalog() -> Catalog {
    use Difficulty::{High, Low, Medium};

    let t = |id: &str, name: &str, phase: Phase, difficulty, category: &str| {
        ToolDefinition::new(id, name, phase.label(), difficulty, category)
    };

    let tools = vec![
        // Define
        t("project-charter", "Project Charter", Phase::Define, Low, FOUNDATIONAL_CATEGORY),
        t("sipoc", "SIPOC Diagram", Phase::Define, Low, FOUNDATIONAL_CATEGORY),
        t("voice-of-customer", "Voice of the Customer", Phase::Define, Medium, "customer"),
        t("ctq-tree", "CTQ Tree", Phase::Define, Medium, "customer"),
        t("stakeholder-analysis", "Stakeholder Analysis", Phase::Define, Low, "project-management"),
        // Measure
        t("process-map", "Process Map", Phase::Measure, Medium, FOUNDATIONAL_CATEGORY),
        t("data-collection-plan", "Data Collection Plan", Phase::Measure, Medium, "data"),
        t("msa", "Measurement System Analysis", Phase::Measure, High, "statistics"),
        t("process-capability", "Process Capability", Phase::Measure, High, "statistics"),
        t("pareto-chart", "Pareto Chart", Phase::Measure, Low, "quality-tools"),
        // Analyze
        t("cause-effect-diagram", "Cause and Effect Diagram", Phase::Analyze, Low, "quality-tools"),
        t("five-whys", "5 Whys", Phase::Analyze, Low, "root-cause"),
        t("hypothesis-testing", "Hypothesis Testing", Phase::Analyze, High, "statistics"),
        t("regression-analysis", "Regression Analysis", Phase::Analyze, High, "statistics"),
        t("fmea", "FMEA", Phase::Analyze, High, "risk"),
        // Improve
        t("brainstorming", "Brainstorming", Phase::Improve, Low, "creativity"),
        t("solution-selection-matrix", "Solution Selection Matrix", Phase::Improve, Medium, "decision"),
        t("pilot-plan", "Pilot Plan", Phase::Improve, Medium, "project-management"),
        t("doe", "Design of Experiments", Phase::Improve, High, "statistics"),
        // Control
        t("control-chart", "Control Chart", Phase::Control, Medium, "statistics"),
        t("control-plan", "Control Plan", Phase::Control, Medium, FOUNDATIONAL_CATEGORY),
        t("standard-work", "Standard Work", Phase::Control, Low, "documentation"),
    ];

    let edges: &[(&str, &[&str])] = &[
        ("sipoc", &["project-charter"]),
        ("ctq-tree", &["voice-of-customer"]),
        ("process-map", &["sipoc"]),
        ("data-collection-plan", &["process-map", "ctq-tree"]),
        ("msa", &["data-collection-plan"]),
        ("process-capability", &["msa", "data-collection-plan"]),
        ("pareto-chart", &["data-collection-plan"]),
        ("cause-effect-diagram", &["process-map"]),
        ("five-whys", &["cause-effect-diagram"]),
        ("hypothesis-testing", &["data-collection-plan", "cause-effect-diagram"]),
        ("regression-analysis", &["hypothesis-testing"]),
        ("fmea", &["process-map"]),
        ("brainstorming", &["cause-effect-diagram"]),
        ("solution-selection-matrix", &["brainstorming"]),
        ("pilot-plan", &["solution-selection-matrix"]),
        ("doe", &["regression-analysis"]),
        ("control-chart", &["process-capability"]),
        ("control-plan", &["pilot-plan", "fmea"]),
        ("standard-work", &["control-plan"]),
    ];
    let prerequisites = edges
        .iter()
        .map(|(id, prereqs)| {
            (
                id.to_string(),
                prereqs.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect();

    let s = |ids: &[&str], bonus: u32, message: &str| OptimalSequence {
        sequence: ids.iter().map(|id| id.to_string()).collect(),
        bonus,
        message: message.to_string(),
    };

    let sequences = vec![
        s(
            &["project-charter", "sipoc", "process-map"],
            15,
            "next step in scoping: charter, then SIPOC, then a detailed process map",
        ),
        s(
            &["voice-of-customer", "ctq-tree", "data-collection-plan"],
            12,
            "turns customer needs into measurable requirements",
        ),
        s(
            &["data-collection-plan", "msa", "process-capability"],
            15,
            "validate the measurement system before judging capability",
        ),
        s(
            &["process-map", "cause-effect-diagram", "five-whys"],
            10,
            "drills from the process view down to root causes",
        ),
        s(
            &["cause-effect-diagram", "pareto-chart"],
            8,
            "prioritise the causes that were just identified",
        ),
        s(
            &["brainstorming", "solution-selection-matrix", "pilot-plan"],
            12,
            "narrows generated ideas down to a solution worth piloting",
        ),
        s(
            &["pilot-plan", "control-plan", "standard-work"],
            10,
            "locks in the piloted improvement",
        ),
    ];

    Catalog {
        tools,
        prerequisites,
        sequences,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_catalog_is_valid() {
        let warnings = Catalog::builtin().validate();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn builtin_covers_every_phase() {
        let catalog = Catalog::builtin();
        for phase in Phase::all() {
            assert!(
                catalog.tools_in_phase(*phase).next().is_some(),
                "no tool for {phase}"
            );
        }
    }

    #[test]
    fn builtin_is_shared() {
        assert!(std::ptr::eq(Catalog::builtin(), Catalog::builtin()));
    }

    #[test]
    fn missing_prerequisites_are_empty() {
        let graph = &Catalog::builtin().prerequisites;
        assert!(prerequisites_of(graph, "project-charter").is_empty());
        assert!(prerequisites_of(graph, "no-such-tool").is_empty());
        assert_eq!(prerequisites_of(graph, "sipoc"), ["project-charter"]);
    }

    #[test]
    fn require_tool_reports_unknown_id() {
        let catalog = Catalog::builtin();
        assert!(catalog.require_tool("fmea").is_ok());
        assert!(matches!(
            catalog.require_tool("kaizen"),
            Err(DmaicError::UnknownTool(id)) if id == "kaizen"
        ));
    }

    #[test]
    fn validate_reports_structural_problems() {
        let catalog = Catalog {
            tools: vec![
                ToolDefinition::new("a", "A", "Define", Difficulty::Low, "x"),
                ToolDefinition::new("a", "A again", "Define", Difficulty::Low, "x"),
                ToolDefinition::new("b", "B", "Deploy", Difficulty::Low, "x"),
            ],
            prerequisites: BTreeMap::from([
                ("b".to_string(), vec!["b".to_string(), "ghost".to_string()]),
                ("stale".to_string(), vec![]),
            ]),
            sequences: vec![OptimalSequence {
                sequence: vec!["a".to_string()],
                bonus: 0,
                message: String::new(),
            }],
        };

        let warnings = catalog.validate();
        let errors = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .count();
        assert_eq!(errors, 2, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.message.contains("ghost")));
        assert!(warnings.iter().any(|w| w.message.contains("itself")));
        assert!(warnings.iter().any(|w| w.message.contains("'stale'")));
        assert!(warnings.iter().any(|w| w.message.contains("zero bonus")));
        assert!(warnings.iter().any(|w| w.message.contains("fewer than two")));
    }

    #[test]
    fn yaml_export_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, Catalog::builtin().to_yaml().unwrap()).unwrap();

        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded.tools, Catalog::builtin().tools);
        assert_eq!(loaded.prerequisites, Catalog::builtin().prerequisites);
        assert_eq!(loaded.sequences, Catalog::builtin().sequences);
    }

    #[test]
    fn minimal_yaml_catalog_defaults_tables() {
        let yaml = r#"
tools:
  - id: kaizen
    name: Kaizen Event
    phase: Improve
    difficulty: medium
    category: events
"#;
        let catalog: Catalog = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(catalog.tools.len(), 1);
        assert!(catalog.prerequisites.is_empty());
        assert!(catalog.sequences.is_empty());
    }

    #[test]
    fn resolve_prefers_configured_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("custom.yaml"),
            "tools:\n  - {id: t, name: T, phase: Define, difficulty: low, category: c}\n",
        )
        .unwrap();

        let mut config = Config::new("p");
        assert!(matches!(
            Catalog::resolve(dir.path(), &config).unwrap(),
            Cow::Borrowed(_)
        ));

        config.catalog = Some("custom.yaml".to_string());
        let resolved = Catalog::resolve(dir.path(), &config).unwrap();
        assert_eq!(resolved.tools.len(), 1);

        config.catalog = Some("missing.yaml".to_string());
        assert!(matches!(
            Catalog::resolve(dir.path(), &config),
            Err(DmaicError::CatalogNotFound(_))
        ));
    }
}
