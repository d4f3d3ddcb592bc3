//! Fraud breakdown of a collected tally.
//!
//! Every vote is scored against three conditions: the voter was funded by an
//! account that funded many other voters, the voter account is younger than
//! the allowed activity window, and the voter received few transactions
//! before voting. Votes from accounts funded by the equalizer address are
//! counted apart.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{enricher::AccountMetadata, persistence::Snapshot, tally::TOTAL};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const TOP_FUNDERS: usize = 15;
const EQUALIZER: &str = "FRAUDD77SWCXYGJZS7G5GTNISGWQMM3JEIJIUNGOT64CTG25DJNA45EB7Y";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudCriteria {
    /// Accounts created within this many days before `reference_timestamp`
    /// are too young.
    pub min_active_days: u64,
    /// Fewer received transactions than this before voting is suspicious.
    pub min_transactions: u64,
    /// A funder of more than this many other voters is suspicious.
    pub funded_by_limit: u64,
    pub reference_timestamp: u64,
    /// Funder whose accounts voted to cancel out fraudulent votes.
    pub equalizer: Option<String>,
}

impl Default for FraudCriteria {
    fn default() -> Self {
        Self {
            min_active_days: 1,
            min_transactions: 5,
            funded_by_limit: 5,
            reference_timestamp: 1_702_422_000,
            equalizer: Some(EQUALIZER.into()),
        }
    }
}

impl FraudCriteria {
    /// Accounts created after this timestamp are too young. Windows reaching
    /// past the epoch clamp to zero.
    #[must_use]
    pub const fn min_timestamp(&self) -> u64 {
        let window = self
            .min_active_days
            .saturating_sub(1)
            .saturating_mul(SECONDS_PER_DAY);
        self.reference_timestamp.saturating_sub(window)
    }

    fn is_equalizer(&self, funder: &str) -> bool {
        self.equalizer.as_deref() == Some(funder)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupBreakdown {
    pub name: String,
    pub valid: u64,
    pub one_condition: u64,
    pub two_conditions: u64,
    pub three_conditions: u64,
    pub equalizer: u64,
}

impl GroupBreakdown {
    fn count(&mut self, fraud_level: u8) {
        match fraud_level {
            0 => self.valid += 1,
            1 => self.one_condition += 1,
            2 => self.two_conditions += 1,
            _ => self.three_conditions += 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FunderSummary {
    pub funder: String,
    pub funded_accounts: u64,
    /// Votes cast by funded accounts, per candidate.
    pub votes: BTreeMap<String, u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FraudReport {
    pub groups: Vec<GroupBreakdown>,
    pub top_funders: Vec<FunderSummary>,
}

/// Break down `snapshot` by fraud level, `total` first then each of
/// `candidates` in order.
#[must_use]
pub fn analyze(
    snapshot: &Snapshot,
    candidates: &[String],
    criteria: &FraudCriteria,
) -> FraudReport {
    let mut funders: HashMap<&str, FunderSummary> = HashMap::new();
    for metadata in snapshot.accounts.values() {
        let funder = metadata.first_transaction_from.as_str();
        funders
            .entry(funder)
            .or_insert_with(|| FunderSummary {
                funder: funder.to_owned(),
                ..FunderSummary::default()
            })
            .funded_accounts += 1;
    }

    let min_timestamp = criteria.min_timestamp();
    let groups = std::iter::once(TOTAL)
        .chain(candidates.iter().map(String::as_str))
        .map(|group| {
            let mut breakdown = GroupBreakdown {
                name: group.to_owned(),
                ..GroupBreakdown::default()
            };
            for voter in snapshot.votes.get(group).into_iter().flatten() {
                let Some(account) = snapshot.accounts.get(voter) else {
                    tracing::warn!(%voter, group, "Voter has no account metadata");
                    continue;
                };
                if criteria.is_equalizer(&account.first_transaction_from) {
                    breakdown.equalizer += 1;
                    continue;
                }
                let Some(funder) = funders.get_mut(account.first_transaction_from.as_str()) else {
                    continue;
                };
                if group != TOTAL {
                    *funder.votes.entry(group.to_owned()).or_default() += 1;
                }
                breakdown.count(fraud_level(
                    account,
                    funder.funded_accounts,
                    min_timestamp,
                    criteria,
                ));
            }
            breakdown
        })
        .collect();

    let mut top_funders: Vec<_> = funders.into_values().collect();
    top_funders.sort_by(|a, b| {
        b.funded_accounts
            .cmp(&a.funded_accounts)
            .then_with(|| a.funder.cmp(&b.funder))
    });
    top_funders.truncate(TOP_FUNDERS);

    FraudReport {
        groups,
        top_funders,
    }
}

fn fraud_level(
    account: &AccountMetadata,
    funded_accounts: u64,
    min_timestamp: u64,
    criteria: &FraudCriteria,
) -> u8 {
    let prolific_funder = funded_accounts.saturating_sub(1) > criteria.funded_by_limit;
    let young_account = account.created_at_timestamp > min_timestamp;
    let few_transactions = account.received_transactions_before_vote < criteria.min_transactions;
    u8::from(prolific_funder) + u8::from(young_account) + u8::from(few_transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: u64 = 1_600_000_000;
    const NEW: u64 = 1_702_500_000;

    fn candidates() -> Vec<String> {
        vec!["CompX".into(), "Janus".into()]
    }

    fn account(funder: &str, created_at_timestamp: u64, received: u64) -> AccountMetadata {
        AccountMetadata {
            first_transaction_from: funder.into(),
            created_at_timestamp,
            received_transactions_before_vote: received,
        }
    }

    fn snapshot(entries: &[(&str, AccountMetadata, &[&str])]) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for (voter, metadata, groups) in entries {
            snapshot.accounts.insert((*voter).into(), metadata.clone());
            for group in std::iter::once(&TOTAL).chain(groups.iter()) {
                snapshot
                    .votes
                    .entry((*group).into())
                    .or_default()
                    .push((*voter).into());
            }
        }
        snapshot
    }

    #[test]
    fn scores_each_condition() {
        let criteria = FraudCriteria {
            funded_by_limit: 1,
            ..FraudCriteria::default()
        };
        let snapshot = snapshot(&[
            ("HONEST", account("SOLO", OLD, 50), &["CompX"]),
            ("YOUNG", account("SOLO2", NEW, 50), &["CompX"]),
            ("FARM1", account("FARM", NEW, 1), &["Janus"]),
            ("FARM2", account("FARM", NEW, 1), &["Janus"]),
            ("FARM3", account("FARM", OLD, 50), &["Janus"]),
        ]);

        let report = analyze(&snapshot, &candidates(), &criteria);

        let names: Vec<_> = report.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["total", "CompX", "Janus"]);
        assert_eq!(
            report.groups[1],
            GroupBreakdown {
                name: "CompX".into(),
                valid: 1,
                one_condition: 1,
                ..GroupBreakdown::default()
            }
        );
        assert_eq!(
            report.groups[2],
            GroupBreakdown {
                name: "Janus".into(),
                one_condition: 1,
                three_conditions: 2,
                ..GroupBreakdown::default()
            }
        );
        assert_eq!(report.groups[0].valid, 1);
        assert_eq!(report.groups[0].one_condition, 2);
        assert_eq!(report.groups[0].three_conditions, 2);
    }

    #[test]
    fn equalizer_votes_are_counted_apart() {
        let criteria = FraudCriteria {
            equalizer: Some("EQ".into()),
            ..FraudCriteria::default()
        };
        let snapshot = snapshot(&[
            ("E1", account("EQ", NEW, 0), &["CompX"]),
            ("V1", account("SOLO", OLD, 10), &["CompX"]),
        ]);

        let report = analyze(&snapshot, &candidates(), &criteria);
        assert_eq!(report.groups[1].equalizer, 1);
        assert_eq!(report.groups[1].valid, 1);

        let equalizer = report
            .top_funders
            .iter()
            .find(|funder| funder.funder == "EQ")
            .unwrap();
        assert_eq!(equalizer.funded_accounts, 1);
        assert!(equalizer.votes.is_empty());
    }

    #[test]
    fn top_funders_sorted_by_funded_accounts() {
        let mut snapshot = Snapshot::default();
        for i in 0..20 {
            let voter = format!("V{i}");
            let metadata = account(&format!("F{}", i % 17), OLD, 10);
            snapshot.accounts.insert(voter.clone(), metadata);
            for group in [TOTAL, "CompX"] {
                snapshot
                    .votes
                    .entry(group.into())
                    .or_default()
                    .push(voter.clone());
            }
        }

        let report = analyze(&snapshot, &candidates(), &FraudCriteria::default());

        assert_eq!(report.top_funders.len(), TOP_FUNDERS);
        let leaders: Vec<_> = report.top_funders[..3]
            .iter()
            .map(|f| (f.funder.as_str(), f.funded_accounts))
            .collect();
        assert_eq!(leaders, [("F0", 2), ("F1", 2), ("F2", 2)]);
        assert_eq!(report.top_funders[0].votes["CompX"], 2);
    }

    #[test]
    fn voters_without_metadata_are_skipped() {
        let mut snapshot = snapshot(&[("A", account("F", OLD, 10), &["CompX"])]);
        snapshot
            .votes
            .get_mut("CompX")
            .unwrap()
            .push("UNKNOWN".into());

        let report = analyze(&snapshot, &candidates(), &FraudCriteria::default());
        assert_eq!(report.groups[1].valid, 1);
    }

    #[test]
    fn activity_window_moves_min_timestamp() {
        let criteria = FraudCriteria {
            min_active_days: 3,
            ..FraudCriteria::default()
        };
        assert_eq!(
            criteria.min_timestamp(),
            1_702_422_000 - 2 * SECONDS_PER_DAY
        );
        assert_eq!(FraudCriteria::default().min_timestamp(), 1_702_422_000);
    }

    #[test]
    fn oversized_activity_window_clamps_to_epoch() {
        let criteria = FraudCriteria {
            min_active_days: 1_000_000_000_000_000,
            ..FraudCriteria::default()
        };
        assert_eq!(criteria.min_timestamp(), 0);

        let criteria = FraudCriteria {
            min_active_days: u64::MAX,
            ..FraudCriteria::default()
        };
        assert_eq!(criteria.min_timestamp(), 0);
    }
}
