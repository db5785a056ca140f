use crate::catalog::OptimalSequence;
use crate::project::ProjectState;

/// The sequence that rewards recommending a tool next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceMatch<'a> {
    pub bonus: u32,
    pub message: &'a str,
}

/// Find the highest-bonus sequence in which `tool_id` is the next unfinished
/// step: it appears after position 0 and every tool before it is completed.
///
/// Only the single best sequence counts. On equal bonuses the earlier entry
/// in `sequences` wins. A zero bonus never matches.
pub fn best_match<'a>(
    tool_id: &str,
    project: &ProjectState,
    sequences: &'a [OptimalSequence],
) -> Option<SequenceMatch<'a>> {
    let mut best: Option<SequenceMatch<'a>> = None;

    for seq in sequences {
        let Some(index) = seq.sequence.iter().position(|id| id == tool_id) else {
            continue;
        };
        if index == 0 {
            continue;
        }
        if !seq.sequence[..index].iter().all(|id| project.is_completed(id)) {
            continue;
        }
        if seq.bonus > best.map_or(0, |m| m.bonus) {
            best = Some(SequenceMatch {
                bonus: seq.bonus,
                message: &seq.message,
            });
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolStatus;

    fn seq(ids: &[&str], bonus: u32, message: &str) -> OptimalSequence {
        OptimalSequence {
            sequence: ids.iter().map(|s| s.to_string()).collect(),
            bonus,
            message: message.to_string(),
        }
    }

    fn completed(ids: &[&str]) -> ProjectState {
        ids.iter().fold(ProjectState::new("Measure"), |state, id| {
            state.with_status(*id, ToolStatus::Completed)
        })
    }

    #[test]
    fn next_step_after_completed_predecessors_matches() {
        let table = [seq(&["a", "b", "c"], 10, "abc")];
        let state = completed(&["a", "b"]);
        assert_eq!(
            best_match("c", &state, &table),
            Some(SequenceMatch {
                bonus: 10,
                message: "abc"
            })
        );
    }

    #[test]
    fn first_position_never_matches() {
        let table = [seq(&["a", "b"], 10, "ab")];
        assert_eq!(best_match("a", &completed(&["b"]), &table), None);
    }

    #[test]
    fn unfinished_predecessor_blocks_match() {
        let table = [seq(&["a", "b", "c"], 10, "abc")];
        let state = completed(&["a"]).with_status("b", ToolStatus::InProgress);
        assert_eq!(best_match("c", &state, &table), None);
    }

    #[test]
    fn absent_tool_and_empty_table_give_nothing() {
        let table = [seq(&["a", "b"], 10, "ab")];
        let state = completed(&["a"]);
        assert_eq!(best_match("z", &state, &table), None);
        assert_eq!(best_match("b", &state, &[]), None);
    }

    #[test]
    fn highest_bonus_wins_not_sum() {
        let table = [
            seq(&["a", "x"], 10, "ten"),
            seq(&["b", "x"], 15, "fifteen"),
            seq(&["c", "x"], 12, "twelve"),
        ];
        let state = completed(&["a", "b", "c"]);
        let m = best_match("x", &state, &table).unwrap();
        assert_eq!(m.bonus, 15);
        assert_eq!(m.message, "fifteen");
    }

    #[test]
    fn equal_bonus_keeps_first_in_table_order() {
        let table = [seq(&["a", "x"], 10, "first"), seq(&["b", "x"], 10, "second")];
        let state = completed(&["a", "b"]);
        assert_eq!(best_match("x", &state, &table).unwrap().message, "first");
    }

    #[test]
    fn zero_bonus_sequence_is_inert() {
        let table = [seq(&["a", "x"], 0, "zero")];
        assert_eq!(best_match("x", &completed(&["a"]), &table), None);
    }

    #[test]
    fn non_matching_sequence_does_not_shadow_a_match() {
        let table = [seq(&["q", "x"], 20, "blocked"), seq(&["a", "x"], 5, "open")];
        let state = completed(&["a"]);
        assert_eq!(best_match("x", &state, &table).unwrap().message, "open");
    }
}
