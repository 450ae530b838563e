// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// One ballot as seen by the counting algorithm.
///
/// Readers are expected to decide upfront whether a ballot counts: a ballot
/// with `valid == false` never contributes to any candidate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vote {
    pub candidate: String,
    pub valid: bool,
}

impl Vote {
    pub fn valid(candidate: &str) -> Vote {
        Vote {
            candidate: candidate.to_string(),
            valid: true,
        }
    }

    pub fn invalid(candidate: &str) -> Vote {
        Vote {
            candidate: candidate.to_string(),
            valid: false,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct VoteCount(pub u64);

impl VoteCount {
    pub const EMPTY: VoteCount = VoteCount(0);
}

impl Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

// ******** Output data structures *********

/// A candidate together with its number of valid votes.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Contender {
    pub name: String,
    pub votes: VoteCount,
}

impl Contender {
    /// The placeholder used when fewer than two candidates received votes.
    pub fn sentinel() -> Contender {
        Contender::default()
    }

    pub fn is_sentinel(&self) -> bool {
        self.name.is_empty() && self.votes == VoteCount::EMPTY
    }
}

/// The two highest-tallied candidates.
///
/// Invariant: `first.votes >= second.votes`.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RankedPair {
    pub first: Contender,
    pub second: Contender,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Decision {
    /// The leader holds strictly more than half of the valid votes.
    Winner(String),
    /// Nobody reached a majority: the two leaders go to a second round.
    Runoff(String, String),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingResult {
    /// Valid votes per candidate, in order of first valid appearance.
    pub tally: Vec<(String, u64)>,
    pub total_valid: u64,
    pub ranked: RankedPair,
    pub decision: Decision,
}

impl VotingResult {
    /// The leader, and the runner-up when a runoff is needed.
    pub fn winner_and_runner_up(&self) -> (String, Option<String>) {
        match &self.decision {
            Decision::Winner(name) => (name.clone(), None),
            Decision::Runoff(first, second) => (first.clone(), Some(second.clone())),
        }
    }

    /// False when no valid vote was cast. The runoff pair is then made of
    /// two sentinels and does not describe a real contest.
    pub fn has_contest(&self) -> bool {
        self.total_valid > 0
    }
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    /// The tallied votes do not add up to the number of valid ballots
    /// declared by the reader.
    InconsistentTotal { tallied: u64, declared: u64 },
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::InconsistentTotal { tallied, declared } => write!(
                f,
                "VotingError: {} votes tallied but {} valid ballots declared",
                tallied, declared
            ),
        }
    }
}
