//! Technician ranking.
//!
//! Picks the candidate whose skills overlap most with the repair
//! requirements. Candidates with partial or no overlap stay eligible, so a
//! non-empty roster always yields a preferred technician.

use std::cmp::Reverse;
use std::collections::HashSet;

use maintenance_state::Technician;

/// Number of distinct candidate skills that appear in `required`
/// (compared lower-cased).
pub fn skill_score(candidate: &Technician, required: &HashSet<String>) -> usize {
    candidate
        .skills
        .iter()
        .map(|s| s.to_lowercase())
        .collect::<HashSet<_>>()
        .intersection(required)
        .count()
}

/// Select the best-qualified technician.
///
/// Highest skill score wins; ties go to the lexicographically smallest name
/// (case-sensitive, as stored). Returns `None` only for an empty list.
pub fn select_best<'a>(
    candidates: &'a [Technician],
    required_skills: &[&str],
) -> Option<&'a Technician> {
    let required: HashSet<String> = required_skills.iter().map(|s| s.to_lowercase()).collect();

    candidates
        .iter()
        .map(|t| (Reverse(skill_score(t, &required)), t))
        .min_by(|(score_a, a), (score_b, b)| {
            score_a.cmp(score_b).then_with(|| a.name.cmp(&b.name))
        })
        .map(|(_, t)| t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tech(id: &str, name: &str, skills: &[&str]) -> Technician {
        Technician::new(id, name, skills, true)
    }

    #[test]
    fn store_skill_filter_and_score_agree_on_case() {
        let candidate = tech("T9", "Önder", &["Ölhydraulik", "instrumentation"]);
        let required = ["ÖLHYDRAULIK", "Instrumentation"];

        assert!(required.iter().all(|s| candidate.has_skill(s)));
        let folded: HashSet<String> = required.iter().map(|s| s.to_lowercase()).collect();
        assert_eq!(skill_score(&candidate, &folded), 2);
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert!(select_best(&[], &["instrumentation"]).is_none());
        assert!(select_best(&[], &[]).is_none());
    }

    #[test]
    fn highest_overlap_wins_regardless_of_order() {
        let required = ["a", "b", "c"];
        let three = tech("T3", "Zed", &["a", "b", "c"]);
        let one = tech("T1", "Amy", &["a"]);
        let zero = tech("T0", "Bob", &["x"]);

        let orders = [
            vec![three.clone(), one.clone(), zero.clone()],
            vec![one.clone(), zero.clone(), three.clone()],
            vec![zero.clone(), three.clone(), one.clone()],
        ];
        for candidates in orders {
            let best = select_best(&candidates, &required).unwrap();
            assert_eq!(best.id, "T3");
        }
    }

    #[test]
    fn ties_break_by_ascending_name() {
        let candidates = vec![
            tech("T1", "Marta", &["instrumentation"]),
            tech("T2", "Luis", &["instrumentation"]),
        ];
        let best = select_best(&candidates, &["instrumentation"]).unwrap();
        assert_eq!(best.id, "T2");
    }

    #[test]
    fn tie_break_is_case_sensitive() {
        let candidates = vec![tech("T1", "alice", &[]), tech("T2", "Bob", &[])];
        // 'B' (0x42) sorts before 'a' (0x61)
        let best = select_best(&candidates, &["instrumentation"]).unwrap();
        assert_eq!(best.id, "T2");
    }

    #[test]
    fn skill_match_ignores_case_and_duplicates() {
        let required: HashSet<String> = ["plc_troubleshooting".to_string()].into();
        let t = tech("T1", "Ana", &["PLC_Troubleshooting", "plc_troubleshooting"]);
        assert_eq!(skill_score(&t, &required), 1);
    }

    #[test]
    fn zero_overlap_candidate_is_still_selected() {
        let candidates = vec![tech("T9", "Solo", &["welding"])];
        let best = select_best(&candidates, &["instrumentation"]).unwrap();
        assert_eq!(best.id, "T9");
    }
}
