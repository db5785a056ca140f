use crate::catalog::{Catalog, OptimalSequence, PrerequisiteGraph, ToolDefinition};
use crate::project::ProjectState;
use crate::rules::default_rules;
use crate::types::{phase_rank, Difficulty, ToolStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Score every candidate starts from.
pub const BASE_SCORE: i32 = 50;

/// Number of recommendations returned by [`recommend`].
pub const DEFAULT_LIMIT: usize = 3;

// ---------------------------------------------------------------------------
// ScoreContext
// ---------------------------------------------------------------------------

pub struct ScoreContext<'a> {
    pub tool: &'a ToolDefinition,
    pub project: &'a ProjectState,
    pub graph: &'a PrerequisiteGraph,
    pub sequences: &'a [OptimalSequence],
    /// Completed low and medium difficulty tools across the whole project.
    pub experience: usize,
}

impl ScoreContext<'_> {
    pub fn project_rank(&self) -> u8 {
        phase_rank(&self.project.phase)
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDelta {
    pub points: i32,
    pub reason: String,
}

/// A fn-pointer scoring rule. Returning `None` leaves the score untouched and
/// adds no reason.
pub struct ScoreRule {
    pub id: &'static str,
    pub apply: fn(&ScoreContext) -> Option<ScoreDelta>,
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scorecard {
    pub score: i32,
    pub reasons: Vec<String>,
}

pub struct Scorer {
    rules: Vec<ScoreRule>,
}

impl Scorer {
    pub fn new(rules: Vec<ScoreRule>) -> Self {
        Self { rules }
    }

    pub fn score(&self, ctx: &ScoreContext) -> Scorecard {
        self.rules.iter().fold(
            Scorecard {
                score: BASE_SCORE,
                reasons: Vec::new(),
            },
            |mut card, rule| {
                if let Some(d) = (rule.apply)(ctx) {
                    trace!(tool = %ctx.tool.id, rule = rule.id, points = d.points);
                    card.score += d.points;
                    card.reasons.push(d.reason);
                }
                card
            },
        )
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

// ---------------------------------------------------------------------------
// Recommendation (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tool_id: String,
    pub name: String,
    pub phase: String,
    pub score: i32,
    pub reasons: Vec<String>,
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// Catalog tools the project has not completed, in catalog order.
pub fn candidates<'a>(tools: &'a [ToolDefinition], project: &ProjectState) -> Vec<&'a ToolDefinition> {
    tools
        .iter()
        .filter(|t| !project.is_completed(&t.id))
        .collect()
}

/// Completed catalog tools of low or medium difficulty.
pub fn experience(tools: &[ToolDefinition], project: &ProjectState) -> usize {
    tools
        .iter()
        .filter(|t| matches!(t.difficulty, Difficulty::Low | Difficulty::Medium))
        .filter(|t| project.status(&t.id) == ToolStatus::Completed)
        .count()
}

/// Highest scores first, at most `limit` entries. The sort is stable, so
/// equal scores keep catalog order.
pub fn rank(mut scored: Vec<Recommendation>, limit: usize) -> Vec<Recommendation> {
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Rank the next tools to work on for `project`. Returns at most
/// [`DEFAULT_LIMIT`] recommendations and an empty list when there is no
/// project.
pub fn recommend(
    project: Option<&ProjectState>,
    tools: &[ToolDefinition],
    graph: &PrerequisiteGraph,
    sequences: &[OptimalSequence],
) -> Vec<Recommendation> {
    recommend_with_limit(project, tools, graph, sequences, DEFAULT_LIMIT)
}

/// Like [`recommend`] with a smaller cap. Limits above [`DEFAULT_LIMIT`]
/// are clamped to it.
pub fn recommend_with_limit(
    project: Option<&ProjectState>,
    tools: &[ToolDefinition],
    graph: &PrerequisiteGraph,
    sequences: &[OptimalSequence],
    limit: usize,
) -> Vec<Recommendation> {
    let Some(project) = project else {
        debug!("no project state, nothing to recommend");
        return Vec::new();
    };

    let scorer = Scorer::default();
    let experience = experience(tools, project);
    let candidates = candidates(tools, project);
    debug!(
        phase = %project.phase,
        candidates = candidates.len(),
        experience,
        "scoring candidates"
    );

    let scored = candidates
        .into_iter()
        .map(|tool| {
            let ctx = ScoreContext {
                tool,
                project,
                graph,
                sequences,
                experience,
            };
            let card = scorer.score(&ctx);
            Recommendation {
                tool_id: tool.id.clone(),
                name: tool.name.clone(),
                phase: tool.phase.clone(),
                score: card.score,
                reasons: card.reasons,
            }
        })
        .collect();

    rank(scored, limit.min(DEFAULT_LIMIT))
}

impl Catalog {
    pub fn recommend(&self, project: Option<&ProjectState>) -> Vec<Recommendation> {
        recommend(project, &self.tools, &self.prerequisites, &self.sequences)
    }

    pub fn recommend_with_limit(
        &self,
        project: Option<&ProjectState>,
        limit: usize,
    ) -> Vec<Recommendation> {
        recommend_with_limit(project, &self.tools, &self.prerequisites, &self.sequences, limit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
