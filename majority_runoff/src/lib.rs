/*!

Single-seat majority counting with a runoff fallback.

A candidate wins outright when it holds strictly more than half of the valid
votes. Otherwise the two best-placed candidates are selected for a second
round. Ties are broken in favour of the candidate whose first valid vote
appeared earlier.

```
use majority_runoff::*;

let votes = vec![
    Vote::valid("Anna"),
    Vote::valid("Bob"),
    Vote::valid("Anna"),
    Vote::invalid("Bob"),
];
let res = run_majority_runoff(&votes, 3)?;
assert_eq!(res.winner_and_runner_up(), ("Anna".to_string(), None));
# Ok::<(), VotingErrors>(())
```
*/
mod config;
use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;

/// Valid votes per candidate.
///
/// Iteration follows the order in which candidates first received a valid
/// vote. This order is what makes the tie-break deterministic.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CandidateTally {
    counts: Vec<(String, VoteCount)>,
    positions: HashMap<String, usize>,
}

impl CandidateTally {
    pub fn new() -> CandidateTally {
        CandidateTally::default()
    }

    /// Adds one vote for the candidate, creating its entry on first sight.
    pub fn record(&mut self, candidate: &str) {
        match self.positions.get(candidate) {
            Some(&idx) => self.counts[idx].1 += VoteCount(1),
            None => {
                self.positions
                    .insert(candidate.to_string(), self.counts.len());
                self.counts.push((candidate.to_string(), VoteCount(1)));
            }
        }
    }

    pub fn get(&self, candidate: &str) -> Option<VoteCount> {
        self.positions.get(candidate).map(|&idx| self.counts[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, VoteCount)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> VoteCount {
        self.counts.iter().map(|(_, count)| *count).sum()
    }
}

/// Counts the valid votes of each candidate. Invalid votes are skipped.
pub fn tally_votes(votes: &[Vote]) -> CandidateTally {
    let mut tally = CandidateTally::new();
    for v in votes.iter().filter(|v| v.valid) {
        tally.record(&v.candidate);
    }
    debug!(
        "tally_votes: {} votes, {} candidates with valid votes",
        votes.len(),
        tally.len()
    );
    tally
}

/// Selects the two best-placed candidates in a single pass.
///
/// Comparisons are strict: a later candidate with the same count never
/// displaces an earlier one. Slots that stay empty hold the sentinel.
pub fn top_two(tally: &CandidateTally) -> RankedPair {
    let mut first = Contender::sentinel();
    let mut second = Contender::sentinel();
    for (name, votes) in tally.iter() {
        if votes > first.votes {
            second = first;
            first = Contender {
                name: name.to_string(),
                votes,
            };
        } else if votes > second.votes {
            second = Contender {
                name: name.to_string(),
                votes,
            };
        }
    }
    RankedPair { first, second }
}

/// Applies the majority rule to the ranked pair.
///
/// Strictly more than half is required, so an exact 50% share goes to a
/// runoff.
pub fn decide(ranked: &RankedPair, total_valid: VoteCount) -> Decision {
    // first > total / 2, without rounding: first > total - first.
    let leader = ranked.first.votes.0;
    if leader <= total_valid.0 && leader > total_valid.0 - leader {
        Decision::Winner(ranked.first.name.clone())
    } else {
        Decision::Runoff(ranked.first.name.clone(), ranked.second.name.clone())
    }
}

/// Runs the counting for the given votes.
///
/// Arguments:
/// * `votes` the ballots, in the order they were read
/// * `total_valid` the number of valid ballots as counted by the reader. It
/// must match the tally, otherwise `VotingErrors::InconsistentTotal` is
/// returned.
pub fn run_majority_runoff(votes: &[Vote], total_valid: u64) -> Result<VotingResult, VotingErrors> {
    info!(
        "run_majority_runoff: Processing {} votes ({} valid)",
        votes.len(),
        total_valid
    );
    let tally = tally_votes(votes);
    let tallied = tally.total();
    if tallied != VoteCount(total_valid) {
        return Err(VotingErrors::InconsistentTotal {
            tallied: tallied.0,
            declared: total_valid,
        });
    }

    for (name, count) in tally.iter() {
        info!("Candidate: {}: {} valid votes", name, count.0);
    }

    let ranked = top_two(&tally);
    debug!("run_majority_runoff: ranked {:?}", ranked);
    let decision = decide(&ranked, VoteCount(total_valid));
    match &decision {
        Decision::Winner(name) => info!("{} -> elected", name),
        Decision::Runoff(first, second) => {
            info!("No majority: runoff between {:?} and {:?}", first, second)
        }
    }

    Ok(VotingResult {
        tally: tally
            .iter()
            .map(|(name, count)| (name.to_string(), count.0))
            .collect(),
        total_valid,
        ranked,
        decision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn valid_count(votes: &[Vote]) -> u64 {
        votes.iter().filter(|v| v.valid).count() as u64
    }

    fn run(votes: &[Vote]) -> VotingResult {
        init_logger();
        run_majority_runoff(votes, valid_count(votes)).unwrap()
    }

    fn repeat(name: &str, n: usize) -> Vec<Vote> {
        (0..n).map(|_| Vote::valid(name)).collect()
    }

    #[test]
    fn sample_ballots_elect_majority_candidate() {
        let votes = vec![
            Vote::invalid("Eddie Hinesley"),
            Vote::valid("Eddie Hinesley"),
            Vote::valid("Aundrea Grace"),
            Vote::valid("Aundrea Grace"),
        ];
        let res = run(&votes);
        assert_eq!(res.total_valid, 3);
        assert_eq!(
            res.tally,
            vec![
                ("Eddie Hinesley".to_string(), 1),
                ("Aundrea Grace".to_string(), 2)
            ]
        );
        assert_eq!(
            res.winner_and_runner_up(),
            ("Aundrea Grace".to_string(), None)
        );
    }

    #[test]
    fn tied_leaders_go_to_runoff_in_order_of_appearance() {
        let mut votes = vec![Vote::valid("C"), Vote::valid("B")];
        votes.extend(repeat("A", 10));
        votes.extend(repeat("B", 9));
        votes.extend(repeat("C", 4));
        // C: 5, B: 10, A: 10. B appeared before A.
        let res = run(&votes);
        assert_eq!(res.total_valid, 25);
        assert_eq!(
            res.decision,
            Decision::Runoff("B".to_string(), "A".to_string())
        );
        assert_eq!(res.ranked.first.votes, VoteCount(10));
        assert_eq!(res.ranked.second.votes, VoteCount(10));
    }

    #[test]
    fn no_ballots_gives_sentinel_pair() {
        let res = run(&[]);
        assert_eq!(res.total_valid, 0);
        assert!(res.tally.is_empty());
        assert!(!res.has_contest());
        assert!(res.ranked.first.is_sentinel());
        assert!(res.ranked.second.is_sentinel());
        assert_eq!(
            res.winner_and_runner_up(),
            (String::new(), Some(String::new()))
        );
    }

    #[test]
    fn only_invalid_ballots_gives_sentinel_pair() {
        let votes = vec![Vote::invalid("A"), Vote::invalid("B")];
        let res = run(&votes);
        assert!(!res.has_contest());
        assert_eq!(
            res.decision,
            Decision::Runoff(String::new(), String::new())
        );
    }

    #[test]
    fn single_candidate_wins_outright() {
        let res = run(&repeat("Solo", 5));
        assert_eq!(res.winner_and_runner_up(), ("Solo".to_string(), None));
        assert!(res.ranked.second.is_sentinel());
    }

    #[test]
    fn exact_half_is_not_a_majority() {
        let mut votes = repeat("A", 2);
        votes.extend(repeat("B", 2));
        let res = run(&votes);
        assert_eq!(
            res.winner_and_runner_up(),
            ("A".to_string(), Some("B".to_string()))
        );
    }

    #[test]
    fn majority_requires_strictly_more_than_half() {
        // 3 out of 5: 3 > 2.5
        let mut votes = repeat("A", 3);
        votes.extend(repeat("B", 1));
        votes.extend(repeat("C", 1));
        assert_eq!(run(&votes).decision, Decision::Winner("A".to_string()));

        // 3 out of 7: 3 < 3.5
        let mut votes = repeat("A", 3);
        votes.extend(repeat("B", 2));
        votes.extend(repeat("C", 2));
        assert_eq!(
            run(&votes).decision,
            Decision::Runoff("A".to_string(), "B".to_string())
        );
    }

    #[test]
    fn invalid_votes_never_count() {
        let mut votes = repeat("A", 2);
        votes.extend(repeat("B", 2));
        let baseline = run(&votes);
        votes.push(Vote::invalid("B"));
        votes.push(Vote::invalid("C"));
        let res = run(&votes);
        assert_eq!(res.tally, baseline.tally);
        assert_eq!(res.total_valid, baseline.total_valid);
        assert_eq!(res.decision, baseline.decision);
    }

    #[test]
    fn candidate_with_only_invalid_votes_is_not_tallied() {
        let votes = vec![Vote::invalid("Ghost"), Vote::valid("A")];
        let tally = tally_votes(&votes);
        assert_eq!(tally.get("Ghost"), None);
        assert_eq!(tally.get("A"), Some(VoteCount(1)));
    }

    #[test]
    fn tally_order_follows_first_valid_vote() {
        let votes = vec![
            Vote::invalid("B"),
            Vote::valid("A"),
            Vote::valid("B"),
            Vote::valid("A"),
        ];
        let tally = tally_votes(&votes);
        let names: Vec<&str> = tally.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(tally.total(), VoteCount(3));
    }

    #[test]
    fn later_leader_pushes_previous_one_to_second() {
        let mut votes = repeat("A", 2);
        votes.extend(repeat("B", 3));
        votes.extend(repeat("C", 1));
        let ranked = top_two(&tally_votes(&votes));
        assert_eq!(ranked.first.name, "B");
        assert_eq!(ranked.second.name, "A");
        assert!(ranked.first.votes >= ranked.second.votes);
    }

    #[test]
    fn late_candidate_can_take_second_place() {
        let mut votes = repeat("A", 5);
        votes.extend(repeat("B", 1));
        votes.extend(repeat("C", 3));
        let ranked = top_two(&tally_votes(&votes));
        assert_eq!(ranked.first.name, "A");
        assert_eq!(ranked.second.name, "C");
    }

    #[test]
    fn running_twice_gives_same_result() {
        let mut votes = repeat("A", 4);
        votes.extend(repeat("B", 4));
        votes.push(Vote::invalid("A"));
        assert_eq!(run(&votes), run(&votes));
    }

    #[test]
    fn mismatched_total_is_rejected() {
        init_logger();
        let votes = repeat("A", 3);
        assert_eq!(
            run_majority_runoff(&votes, 4),
            Err(VotingErrors::InconsistentTotal {
                tallied: 3,
                declared: 4
            })
        );
    }
}
