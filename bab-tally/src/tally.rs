use std::collections::{HashMap, HashSet};

/// Group holding every processed voter.
pub const TOTAL: &str = "total";

/// Choice byte meaning "yes" for the candidate at that position.
pub const YES: u8 = 0;

/// Per-candidate sets of voter addresses plus the set of all voters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    candidates: Vec<String>,
    groups: HashMap<String, HashSet<String>>,
    total: HashSet<String>,
}

impl Tally {
    #[must_use]
    pub fn new(candidates: Vec<String>) -> Self {
        let groups = candidates
            .iter()
            .map(|candidate| (candidate.clone(), HashSet::new()))
            .collect();
        Self {
            candidates,
            groups,
            total: HashSet::new(),
        }
    }

    /// Rebuild a tally from persisted address lists. Groups that are not
    /// configured candidates are carried along untouched.
    #[must_use]
    pub fn from_groups(candidates: Vec<String>, groups: HashMap<String, Vec<String>>) -> Self {
        let mut tally = Self::new(candidates);
        for (name, voters) in groups {
            if name == TOTAL {
                tally.total.extend(voters);
            } else {
                tally.groups.entry(name).or_default().extend(voters);
            }
        }
        tally
    }

    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    #[must_use]
    pub fn contains(&self, voter: &str) -> bool {
        self.total.contains(voter)
    }

    #[must_use]
    pub const fn total(&self) -> &HashSet<String> {
        &self.total
    }

    /// Voters of a candidate, or of everyone for [`TOTAL`].
    #[must_use]
    pub fn voters(&self, group: &str) -> Option<&HashSet<String>> {
        if group == TOTAL {
            Some(&self.total)
        } else {
            self.groups.get(group)
        }
    }

    /// Add `voter` to the total set and to every candidate whose position in
    /// `choices` holds [`YES`]. Returns whether the voter was new.
    pub fn record(&mut self, voter: &str, choices: &[u8]) -> bool {
        for (candidate, _) in self
            .candidates
            .iter()
            .zip(choices)
            .filter(|(_, choice)| **choice == YES)
        {
            self.groups
                .entry(candidate.clone())
                .or_default()
                .insert(voter.to_owned());
        }
        self.total.insert(voter.to_owned())
    }

    /// Address lists keyed by group name, [`TOTAL`] included. List order is
    /// unspecified.
    #[must_use]
    pub fn to_groups(&self) -> HashMap<String, Vec<String>> {
        self.groups
            .iter()
            .map(|(name, voters)| (name.clone(), voters.iter().cloned().collect()))
            .chain(std::iter::once((
                TOTAL.to_owned(),
                self.total.iter().cloned().collect(),
            )))
            .collect()
    }
}
