use crate::catalog::prerequisites_of;
use crate::recommend::{ScoreContext, ScoreDelta, ScoreRule};
use crate::sequence::best_match;
use crate::types::{Difficulty, ToolStatus};
use std::cmp::Ordering;

/// Completed low/medium tools needed before advanced tools stop being penalised.
pub const EXPERIENCE_THRESHOLD: usize = 3;

fn delta(points: i32, reason: impl Into<String>) -> Option<ScoreDelta> {
    Some(ScoreDelta {
        points,
        reason: reason.into(),
    })
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn phase_alignment(ctx: &ScoreContext) -> Option<ScoreDelta> {
    match ctx.tool.phase_rank().cmp(&ctx.project_rank()) {
        Ordering::Equal => delta(30, "matches current phase"),
        Ordering::Less => delta(20, "important tool from an earlier phase not yet completed"),
        Ordering::Greater => delta(-10, "belongs to a future phase"),
    }
}

fn work_in_progress(ctx: &ScoreContext) -> Option<ScoreDelta> {
    (ctx.project.status(&ctx.tool.id) == ToolStatus::InProgress)
        .then(|| ScoreDelta {
            points: 25,
            reason: "work already started".to_string(),
        })
}

fn prerequisites(ctx: &ScoreContext) -> Option<ScoreDelta> {
    let prereqs = prerequisites_of(ctx.graph, &ctx.tool.id);
    if prereqs.is_empty() {
        return None;
    }
    let total = prereqs.len();
    let done = prereqs
        .iter()
        .filter(|p| ctx.project.is_completed(p))
        .count();

    if done == total {
        delta(20, "all prerequisites completed")
    } else if done * 2 >= total {
        let pct = (done * 100 + total / 2) / total;
        delta(10, format!("{pct}% of prerequisites completed"))
    } else if done == 0 {
        delta(-30, "no required prerequisite has been completed")
    } else {
        // Between 0 and 50% completed: neither bonus nor penalty.
        None
    }
}

fn difficulty(ctx: &ScoreContext) -> Option<ScoreDelta> {
    match ctx.tool.difficulty {
        Difficulty::Low => delta(5, "low-difficulty tool, good for making fast progress"),
        Difficulty::High if ctx.experience < EXPERIENCE_THRESHOLD => {
            delta(-15, "advanced tool that requires prior experience")
        }
        Difficulty::High => delta(
            10,
            "advanced tool for which sufficient experience already exists",
        ),
        Difficulty::Medium => None,
    }
}

fn foundational(ctx: &ScoreContext) -> Option<ScoreDelta> {
    if ctx.tool.is_foundational() && ctx.tool.phase_rank() <= ctx.project_rank() {
        delta(15, "foundational tool relevant at or before the current phase")
    } else {
        None
    }
}

fn sequence_bonus(ctx: &ScoreContext) -> Option<ScoreDelta> {
    let m = best_match(&ctx.tool.id, ctx.project, ctx.sequences)?;
    delta(i32::try_from(m.bonus).unwrap_or(i32::MAX), m.message)
}

// ---------------------------------------------------------------------------
// Default rules (evaluation order is the order reasons are reported in)
// ---------------------------------------------------------------------------

pub fn default_rules() -> Vec<ScoreRule> {
    vec![
        ScoreRule {
            id: "phase_alignment",
            apply: phase_alignment,
        },
        ScoreRule {
            id: "work_in_progress",
            apply: work_in_progress,
        },
        ScoreRule {
            id: "prerequisites",
            apply: prerequisites,
        },
        ScoreRule {
            id: "difficulty",
            apply: difficulty,
        },
        ScoreRule {
            id: "foundational",
            apply: foundational,
        },
        ScoreRule {
            id: "sequence_bonus",
            apply: sequence_bonus,
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
