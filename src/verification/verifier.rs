//! Hard-constraint verification.
//!
//! Produces a pass/warn/fail report over a layout. Purely diagnostic: the
//! layout is never mutated.
//!
//! # Checks
//!
//! | Check | Pass | Warn | Fail |
//! |-------|------|------|------|
//! | Fixed seat | person at pin | | elsewhere / missing |
//! | Leaders | exactly one | none | more than one |
//! | Must-together | one group | | split |
//! | Together overlap | | two sets share a group | |
//! | Must-separate | all apart | | two in one group |
//! | Contiguity | `M*F*` | broken only by a pinned seat | broken |
//! | Boarder spread | ≤ 1 | > 1 | |
//! | Occupancy | each seated once | someone unseated | seated twice / unknown id |
//!
//! Fixed seats are checked by index, so verify before compacting.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::optimizer::honored_pins;
use crate::log::{Phase, RunLog};
use crate::models::{is_males_first, ConstraintSet, FixedPositions, Layout, Roster};

/// Result of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// What a check looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckKind {
    FixedSeat,
    Leaders,
    MustTogether,
    TogetherOverlap,
    MustSeparate,
    Contiguity,
    BoarderSpread,
    Occupancy,
}

/// One line of a verification report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub kind: CheckKind,
    pub status: CheckStatus,
    pub message: String,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.status {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warn => "WARN",
            CheckStatus::Fail => "FAIL",
        };
        write!(f, "{tag} {}", self.message)
    }
}

/// All checks of one verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub checks: Vec<Check>,
}

impl VerificationReport {
    fn push(&mut self, kind: CheckKind, status: CheckStatus, message: impl Into<String>) {
        self.checks.push(Check {
            kind,
            status,
            message: message.into(),
        });
    }

    /// Checks of one kind.
    pub fn of_kind(&self, kind: CheckKind) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(move |c| c.kind == kind)
    }

    /// Number of checks with a status.
    pub fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    /// Failed checks.
    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| c.status == CheckStatus::Fail)
    }

    /// Whether nothing failed.
    pub fn passed(&self) -> bool {
        self.count(CheckStatus::Fail) == 0
    }

    /// Whether no check of `kind` failed.
    pub fn passed_kind(&self, kind: CheckKind) -> bool {
        self.of_kind(kind).all(|c| c.status != CheckStatus::Fail)
    }

    /// Worst status across all checks.
    pub fn worst(&self) -> CheckStatus {
        self.checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    /// Copies every check into a run log.
    pub fn write_to(&self, log: &mut RunLog) {
        for check in &self.checks {
            match check.status {
                CheckStatus::Pass => log.info(Phase::Verify, check.to_string()),
                CheckStatus::Warn => log.warn(Phase::Verify, check.to_string()),
                CheckStatus::Fail => log.error(Phase::Verify, check.to_string()),
            }
        }
    }
}

/// Checks every hard constraint over `layout`.
///
/// # Example
///
/// ```
/// use u_seating::models::{ConstraintSet, FixedPositions, Layout, Roster};
/// use u_seating::verification::{verify, CheckKind};
///
/// let roster = Roster::anonymous(2, 2);
/// let layout = Layout::from_rows(vec![vec![1, 3], vec![2, 4]]);
/// let constraints = ConstraintSet::new().with_separate(vec![1, 2]);
///
/// let report = verify(&layout, &roster, &constraints, &FixedPositions::new());
/// assert!(report.passed());
/// assert!(report.passed_kind(CheckKind::MustSeparate));
/// ```
pub fn verify(
    layout: &Layout,
    roster: &Roster,
    constraints: &ConstraintSet,
    fixed: &FixedPositions,
) -> VerificationReport {
    let mut report = VerificationReport::default();
    let group_of = layout.person_to_group();
    let number = |gi: usize| layout.groups()[gi].number;
    let pinned = honored_pins(layout, fixed);

    for (person, pin) in fixed.iter() {
        let status = if pinned.contains(&person) {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        };
        report.push(
            CheckKind::FixedSeat,
            status,
            format!(
                "{} fixed at group {} seat {}",
                roster.label(person),
                pin.group,
                pin.seat
            ),
        );
    }

    for group in layout.groups() {
        let leaders = group.count_where(|p| roster.is_leader(p));
        let status = match leaders {
            0 => CheckStatus::Warn,
            1 => CheckStatus::Pass,
            _ => CheckStatus::Fail,
        };
        report.push(
            CheckKind::Leaders,
            status,
            format!("group {} has {leaders} leader(s)", group.number),
        );
    }

    let mut together_groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (ri, members) in constraints.must_together().enumerate() {
        let groups: BTreeSet<Option<usize>> =
            members.iter().map(|p| group_of.get(p).copied()).collect();
        let names = roster.label_list(members);
        match (groups.len(), groups.iter().next()) {
            (1, Some(Some(gi))) => {
                together_groups.entry(*gi).or_default().push(ri + 1);
                report.push(
                    CheckKind::MustTogether,
                    CheckStatus::Pass,
                    format!("together [{names}] in group {}", number(*gi)),
                );
            }
            _ => report.push(
                CheckKind::MustTogether,
                CheckStatus::Fail,
                format!("together [{names}] split across groups"),
            ),
        }
    }
    for (gi, sets) in together_groups {
        if sets.len() > 1 {
            report.push(
                CheckKind::TogetherOverlap,
                CheckStatus::Warn,
                format!(
                    "group {} holds {} must-together sets",
                    number(gi),
                    sets.len()
                ),
            );
        }
    }

    for members in constraints.must_separate() {
        let mut seen: BTreeMap<usize, usize> = BTreeMap::new();
        for p in members {
            if let Some(&gi) = group_of.get(p) {
                *seen.entry(gi).or_default() += 1;
            }
        }
        let names = roster.label_list(members);
        match seen.iter().find(|&(_, &n)| n > 1) {
            Some((&gi, _)) => report.push(
                CheckKind::MustSeparate,
                CheckStatus::Fail,
                format!("separate [{names}] share group {}", number(gi)),
            ),
            None => report.push(
                CheckKind::MustSeparate,
                CheckStatus::Pass,
                format!("separate [{names}] apart"),
            ),
        }
    }

    for group in layout.groups() {
        let status = if group.is_gender_contiguous(roster) {
            CheckStatus::Pass
        } else if is_males_first(
            group
                .occupants()
                .filter(|p| !pinned.contains(p))
                .map(|p| roster.gender(p)),
        ) {
            CheckStatus::Warn
        } else {
            CheckStatus::Fail
        };
        report.push(
            CheckKind::Contiguity,
            status,
            format!("group {} seats {}", group.number, group.gender_pattern(roster)),
        );
    }

    if !layout.is_empty() {
        let counts: Vec<usize> = layout
            .groups()
            .iter()
            .map(|g| g.count_where(|p| roster.is_boarder(p)))
            .collect();
        let max = counts.iter().copied().max().unwrap_or(0);
        let min = counts.iter().copied().min().unwrap_or(0);
        let status = if max - min <= 1 {
            CheckStatus::Pass
        } else {
            CheckStatus::Warn
        };
        report.push(
            CheckKind::BoarderSpread,
            status,
            format!("boarder spread {} (max {max}, min {min})", max - min),
        );
    }

    check_occupancy(layout, roster, &mut report);
    report
}

fn check_occupancy(layout: &Layout, roster: &Roster, report: &mut VerificationReport) {
    let mut seen = BTreeSet::new();
    let mut twice = BTreeSet::new();
    let mut unknown = BTreeSet::new();
    for p in layout.groups().iter().flat_map(|g| g.occupants()) {
        if !roster.contains(p) {
            unknown.insert(p);
        }
        if !seen.insert(p) {
            twice.insert(p);
        }
    }
    if !twice.is_empty() || !unknown.is_empty() {
        report.push(
            CheckKind::Occupancy,
            CheckStatus::Fail,
            format!("seated more than once: {twice:?}; not on roster: {unknown:?}"),
        );
        return;
    }
    let unseated: Vec<String> = roster
        .ids()
        .filter(|p| !seen.contains(p))
        .map(|p| roster.label(p))
        .collect();
    if unseated.is_empty() {
        report.push(
            CheckKind::Occupancy,
            CheckStatus::Pass,
            format!("all {} people seated", roster.len()),
        );
    } else {
        report.push(
            CheckKind::Occupancy,
            CheckStatus::Warn,
            format!("unseated: {}", unseated.join(", ")),
        );
    }
}
