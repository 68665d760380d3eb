//! Decides which blank nodes are nested as `[ ]` and which ones get a label.

use crate::graph::{GraphBuilder, SubjectEntry};
use crate::observer::LabelReason;
use crate::triple::Node;

#[derive(Debug, Clone, Copy)]
pub(crate) struct FoldOptions {
    pub(crate) enabled: bool,
    /// Unbounded if `None`.
    pub(crate) max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    /// Used once as object, not reached yet.
    Candidate,
    Folded,
    Labelled(LabelReason),
}

/// Outcome of the analysis, indexed by blank node arena position.
#[derive(Debug)]
pub(crate) struct FoldPlan {
    decisions: Vec<Decision>,
    labels: Vec<Option<usize>>,
}

impl FoldPlan {
    #[inline]
    pub(crate) fn is_folded(&self, blank_node: usize) -> bool {
        self.decisions.get(blank_node) == Some(&Decision::Folded)
    }

    #[inline]
    pub(crate) fn label(&self, blank_node: usize) -> Option<usize> {
        self.labels.get(blank_node).copied().flatten()
    }

    /// Root subjects are the ones that are not nested inside another subject block.
    #[inline]
    pub(crate) fn is_root(&self, subject: &SubjectEntry) -> bool {
        subject.blank_node.is_none_or(|b| !self.is_folded(b))
    }

    /// The generated labels with the reason they were needed, by increasing label.
    pub(crate) fn labelled(&self) -> impl Iterator<Item = (usize, LabelReason)> {
        self.decisions
            .iter()
            .zip(&self.labels)
            .filter_map(|(decision, label)| match (decision, label) {
                (Decision::Labelled(reason), Some(label)) => Some((*label, *reason)),
                _ => None,
            })
    }
}

/// Classifies every blank node of a completed graph as foldable or labelled.
///
/// A blank node is folded if it is the object of exactly one triple,
/// its nesting depth stays within the optional limit and nesting it does not close a cycle.
/// The traversal uses an explicit stack and index bitsets, so it terminates on any graph.
pub(crate) struct BlankNodeFolder<'a> {
    graph: &'a GraphBuilder,
    options: FoldOptions,
    decisions: Vec<Decision>,
    walked: Vec<bool>,
    on_chain: Vec<bool>,
    stack: Vec<(usize, usize)>,
}

impl<'a> BlankNodeFolder<'a> {
    pub(crate) fn fold(graph: &'a GraphBuilder, options: FoldOptions) -> FoldPlan {
        let decisions = graph
            .blank_node_entries()
            .iter()
            .map(|entry| {
                if !options.enabled {
                    Decision::Labelled(LabelReason::FoldingDisabled)
                } else if entry.in_degree == 1 {
                    Decision::Candidate
                } else if entry.in_degree == 0 {
                    Decision::Labelled(LabelReason::Unreferenced)
                } else {
                    Decision::Labelled(LabelReason::Shared)
                }
            })
            .collect::<Vec<_>>();
        let mut folder = Self {
            graph,
            options,
            on_chain: vec![false; decisions.len()],
            decisions,
            walked: vec![false; graph.subject_entries().len()],
            stack: Vec::new(),
        };
        if options.enabled {
            folder.walk_roots();
            folder.break_cycles();
        }
        folder.into_plan()
    }

    fn walk_roots(&mut self) {
        let graph = self.graph;
        for (id, subject) in graph.subject_entries().iter().enumerate() {
            let is_candidate = subject
                .blank_node
                .is_some_and(|b| self.decisions[b] == Decision::Candidate);
            if !is_candidate {
                self.walk(id);
            }
        }
    }

    /// Candidates left after walking the roots only hang from cycles of candidates.
    ///
    /// For each such cycle, the member seen first as subject becomes a labelled root.
    fn break_cycles(&mut self) {
        let graph = self.graph;
        for subject in graph.subject_entries() {
            let Some(blank_node) = subject.blank_node else {
                continue;
            };
            if self.decisions[blank_node] != Decision::Candidate {
                continue;
            }
            let entry = self.cycle_entry(blank_node);
            self.decisions[entry] = Decision::Labelled(LabelReason::CycleClosing);
            if let Some(root) = graph.blank_node_entries()[entry].subject {
                self.walk(root);
            }
        }
    }

    /// Follows the unique parents of `start` until a blank node repeats and returns the
    /// member of that cycle seen first as subject.
    fn cycle_entry(&mut self, start: usize) -> usize {
        let graph = self.graph;
        let subjects = graph.subject_entries();
        let blank_nodes = graph.blank_node_entries();
        let mut chain = Vec::new();
        let mut current = start;
        while !self.on_chain[current] {
            self.on_chain[current] = true;
            chain.push(current);
            let parent = blank_nodes[current]
                .parent
                .and_then(|parent| subjects[parent].blank_node)
                .filter(|parent| self.decisions[*parent] == Decision::Candidate);
            let Some(parent) = parent else {
                // Not hanging from a cycle, it can only be its own root
                current = start;
                break;
            };
            current = parent;
        }
        for b in &chain {
            self.on_chain[*b] = false;
        }
        let cycle_start = chain.iter().position(|b| *b == current).unwrap_or(0);
        chain[cycle_start..]
            .iter()
            .copied()
            .min_by_key(|b| blank_nodes[*b].subject)
            .unwrap_or(start)
    }

    /// Depth-first walk from a root subject, folding the candidates it reaches first.
    fn walk(&mut self, root: usize) {
        let graph = self.graph;
        self.stack.push((root, 0));
        while let Some((subject, depth)) = self.stack.pop() {
            if std::mem::replace(&mut self.walked[subject], true) {
                continue;
            }
            for (_, object) in &graph.subject_entries()[subject].predicate_objects {
                let Node::BlankNode(object) = object else {
                    continue;
                };
                let Some(child) = graph.blank_node_position(*object) else {
                    continue;
                };
                if self.decisions[child] != Decision::Candidate {
                    continue;
                }
                let child_subject = graph.blank_node_entries()[child].subject;
                if self.options.max_depth.is_none_or(|max_depth| depth < max_depth) {
                    self.decisions[child] = Decision::Folded;
                    if let Some(child_subject) = child_subject {
                        self.stack.push((child_subject, depth + 1));
                    }
                } else {
                    self.decisions[child] = Decision::Labelled(LabelReason::TooDeep);
                    if let Some(child_subject) = child_subject {
                        self.stack.push((child_subject, 0));
                    }
                }
            }
        }
    }

    fn into_plan(self) -> FoldPlan {
        let mut next_label = 0;
        let labels = self
            .decisions
            .iter()
            .map(|decision| {
                matches!(decision, Decision::Labelled(_)).then(|| {
                    next_label += 1;
                    next_label - 1
                })
            })
            .collect();
        FoldPlan {
            decisions: self.decisions,
            labels,
        }
    }
}
