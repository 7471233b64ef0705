//! One-step neighbors of a stack assignment.
//!
//! Every neighbor is produced by mutating the base assignment, cloning the
//! result and restoring the base before `next` returns, so the base is
//! unchanged between calls and after the iterator is dropped.

use std::fmt;

use crate::assignment::StackAssignment;

/// A deterministic action on a stack assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StackAction {
    /// Move the top of stack `from` onto stack `to`.
    Move { from: usize, to: usize },
    /// Give the top of `stack` the material `material`.
    ChangeMaterial { stack: usize, material: String },
}

impl StackAction {
    /// Name recorded in scene metadata.
    pub fn name(&self) -> &'static str {
        match self {
            StackAction::Move { .. } => "action_move",
            StackAction::ChangeMaterial { .. } => "action_change_material",
        }
    }
}

impl fmt::Display for StackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackAction::Move { from, to } => write!(f, "{} {} -> {}", self.name(), from, to),
            StackAction::ChangeMaterial { stack, material } => {
                write!(f, "{} {} = {}", self.name(), stack, material)
            }
        }
    }
}

/// A neighbor and the action that reaches it.
#[derive(Debug, Clone)]
pub struct Successor {
    /// Action applied to the base.
    pub action: StackAction,
    /// Resulting assignment, locations updated.
    pub state: StackAssignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Move { source: usize, target: usize },
    Material { source: usize, material: usize },
    Done,
}

/// Iterator over every move and material-change neighbor of a base
/// assignment. Moves come first, then material changes.
pub struct SuccessorEnumerator<'a> {
    base: &'a mut StackAssignment,
    materials: &'a [String],
    sources: Vec<usize>,
    cursor: Cursor,
}

impl<'a> SuccessorEnumerator<'a> {
    /// Enumerates the neighbors of `base` using the given material ids.
    pub fn new(base: &'a mut StackAssignment, materials: &'a [String]) -> Self {
        let sources = base.nonempty_stacks();
        Self {
            base,
            materials,
            sources,
            cursor: Cursor::Move {
                source: 0,
                target: 0,
            },
        }
    }

    /// Clones the base with the top of `from` moved to `to`, then restores it.
    fn moved(&mut self, from: usize, to: usize) -> Option<StackAssignment> {
        let block = self.base.pop(from)?;
        self.base.push(to, block);
        self.base.update_locations();
        let state = self.base.clone();
        if let Some(block) = self.base.pop(to) {
            self.base.push(from, block);
        }
        self.base.update_locations();
        Some(state)
    }

    /// Clones the base with the top of `stack` in `material`, then restores it.
    fn rematerialed(&mut self, stack: usize, material: &str) -> Option<StackAssignment> {
        let top = self.base.top_mut(stack)?;
        let previous = std::mem::replace(&mut top.material, material.to_string());
        let state = self.base.clone();
        if let Some(top) = self.base.top_mut(stack) {
            top.material = previous;
        }
        Some(state)
    }

    fn step_move(&mut self, source: usize, target: usize) -> Option<Successor> {
        let from = *self.sources.get(source)?;
        let (next_source, next_target) = if target + 1 < self.base.num_stacks() {
            (source, target + 1)
        } else {
            (source + 1, 0)
        };
        self.cursor = Cursor::Move {
            source: next_source,
            target: next_target,
        };
        if target == from {
            return None;
        }
        let state = self.moved(from, target)?;
        Some(Successor {
            action: StackAction::Move { from, to: target },
            state,
        })
    }

    fn step_material(&mut self, source: usize, material: usize) -> Option<Successor> {
        let stack = *self.sources.get(source)?;
        let (next_source, next_material) = if material + 1 < self.materials.len() {
            (source, material + 1)
        } else {
            (source + 1, 0)
        };
        self.cursor = Cursor::Material {
            source: next_source,
            material: next_material,
        };
        let materials = self.materials;
        let name = materials.get(material)?;
        if self.base.top(stack).map(|b| &b.material) == Some(name) {
            return None;
        }
        let state = self.rematerialed(stack, name)?;
        Some(Successor {
            action: StackAction::ChangeMaterial {
                stack,
                material: name.clone(),
            },
            state,
        })
    }
}

impl Iterator for SuccessorEnumerator<'_> {
    type Item = Successor;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.cursor {
                Cursor::Move { source, target } => {
                    if source >= self.sources.len() {
                        self.cursor = Cursor::Material {
                            source: 0,
                            material: 0,
                        };
                        continue;
                    }
                    if let Some(successor) = self.step_move(source, target) {
                        return Some(successor);
                    }
                }
                Cursor::Material { source, material } => {
                    if source >= self.sources.len() || self.materials.is_empty() {
                        self.cursor = Cursor::Done;
                        continue;
                    }
                    if let Some(successor) = self.step_material(source, material) {
                        return Some(successor);
                    }
                }
                Cursor::Done => return None,
            }
        }
    }
}
