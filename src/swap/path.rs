//! Shortest swap chain search.
//!
//! # Algorithm
//!
//! Breadth-first search over seat positions. From a node, the mover may
//! exchange with any other seat of the same group, or with an occupied seat
//! of another group whose occupant has the mover's gender. Empty seats are
//! never entered across groups, so every cross-group exchange trades two
//! people of the same gender and per-group gender counts stay unchanged.
//!
//! Nodes are visited at most once, so a seat on the chain still holds its
//! original occupant when the chain reaches it. Gating on the static
//! occupant is therefore exact for sequential application.
//!
//! # Complexity
//! O(S²) for S seats: each dequeued node scans every seat.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.2 (BFS)

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::models::{Gender, Layout, Position, Roster};

/// One elementary exchange: the mover at `from` trades places with the
/// occupant (or emptiness) of `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swap {
    pub from: Position,
    pub to: Position,
}

impl Swap {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Whether both seats belong to the same group.
    pub fn is_same_group(&self) -> bool {
        self.from.group == self.to.group
    }
}

impl fmt::Display for Swap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Computes swap chains over a borrowed layout.
///
/// # Example
///
/// ```
/// use u_seating::models::{Layout, Position, Roster};
/// use u_seating::swap::SwapPathFinder;
///
/// let roster = Roster::anonymous(2, 2);
/// let layout = Layout::from_rows(vec![vec![1, 3], vec![2, 4]]);
///
/// // Male 1 can reach male 2's seat in one step.
/// let path = SwapPathFinder::new(&layout, &roster)
///     .find(Position::new(0, 0), Position::new(1, 0))
///     .unwrap();
/// assert_eq!(path.len(), 1);
///
/// // A female's seat in another group takes a detour through male 2's seat.
/// let path = SwapPathFinder::new(&layout, &roster)
///     .find(Position::new(0, 0), Position::new(1, 1))
///     .unwrap();
/// assert_eq!(path.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SwapPathFinder<'a> {
    layout: &'a Layout,
    roster: &'a Roster,
    locked: HashSet<Position>,
}

impl<'a> SwapPathFinder<'a> {
    /// Creates a finder with no locked seats.
    pub fn new(layout: &'a Layout, roster: &'a Roster) -> Self {
        Self {
            layout,
            roster,
            locked: HashSet::new(),
        }
    }

    /// Seats the chain must never enter.
    pub fn with_locked(mut self, locked: impl IntoIterator<Item = Position>) -> Self {
        self.locked.extend(locked);
        self
    }

    /// Shortest chain moving the occupant of `start` to `goal`.
    ///
    /// Returns `Some(vec![])` when `start == goal`, `None` when the goal
    /// cannot be reached (out of range, locked, or gender-gated).
    pub fn find(&self, start: Position, goal: Position) -> Option<Vec<Swap>> {
        if !self.layout.contains_position(start) || !self.layout.contains_position(goal) {
            return None;
        }
        if start == goal {
            return Some(Vec::new());
        }
        if self.locked.contains(&goal) {
            return None;
        }

        let mover = self.layout.get(start).map(|p| self.roster.gender(p));

        let mut parent: HashMap<Position, Position> = HashMap::new();
        let mut visited: HashSet<Position> = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for next in self.neighbors(node, mover) {
                if !visited.insert(next) {
                    continue;
                }
                parent.insert(next, node);
                if next == goal {
                    return Some(rebuild(&parent, start, goal));
                }
                queue.push_back(next);
            }
        }

        None
    }

    fn neighbors(&self, node: Position, mover: Option<Gender>) -> Vec<Position> {
        let mut out = Vec::new();
        for (gi, group) in self.layout.groups().iter().enumerate() {
            for (si, slot) in group.seats.iter().enumerate() {
                let pos = Position::new(gi, si);
                if pos == node || self.locked.contains(&pos) {
                    continue;
                }
                let reachable = if gi == node.group {
                    true
                } else {
                    match (mover, slot) {
                        (Some(g), Some(occupant)) => self.roster.gender(*occupant) == g,
                        _ => false,
                    }
                };
                if reachable {
                    out.push(pos);
                }
            }
        }
        out
    }
}

fn rebuild(parent: &HashMap<Position, Position>, start: Position, goal: Position) -> Vec<Swap> {
    let mut chain = Vec::new();
    let mut cur = goal;
    while cur != start {
        let prev = parent[&cur];
        chain.push(Swap::new(prev, cur));
        cur = prev;
    }
    chain.reverse();
    chain
}
