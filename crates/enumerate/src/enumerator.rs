//! Exhaustive enumeration of stack assignments.
//!
//! The search picks an unassigned object, then a stack, then a material,
//! and descends until every object is placed. Instead of recursion the
//! enumerator keeps one choice index per depth and undoes the deepest
//! choice on backtrack, so a single working assignment is mutated in place
//! and cloned only when a complete configuration is yielded.

use std::collections::HashSet;

use rand::Rng;

use blockworld_core::{draw_blocks, Block, DuplicatePolicy, PropertyCatalog, Result};

use crate::assignment::StackAssignment;
use crate::key::CanonicalKey;
use crate::layout::StackLayout;

/// Draws the fixed object set for an enumeration run.
///
/// Shape, size, color and rotation are drawn once; the material is left
/// empty because the enumerator assigns it.
pub fn initial_objects<R: Rng + ?Sized>(
    catalog: &PropertyCatalog,
    count: usize,
    policy: DuplicatePolicy,
    rng: &mut R,
) -> Result<Vec<Block>> {
    let mut objects = draw_blocks(catalog, count, policy, rng)?;
    for object in &mut objects {
        object.material.clear();
    }
    Ok(objects)
}

/// Iterator over every raw stack assignment of a fixed object set.
///
/// Distinct search paths can produce identical scenes; use
/// [`StackEnumerator::distinct`] to drop repeats.
#[derive(Debug, Clone)]
pub struct StackEnumerator {
    materials: Vec<String>,
    working: StackAssignment,
    remaining: Vec<Block>,
    /// Combined (pick, stack, material) index chosen at each depth.
    choices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl StackEnumerator {
    /// Enumerates `objects` over the stacks of `layout` with the given
    /// material ids.
    pub fn new(objects: Vec<Block>, layout: StackLayout, materials: Vec<String>) -> Self {
        Self {
            materials,
            working: StackAssignment::new(layout),
            remaining: objects,
            choices: Vec::new(),
            started: false,
            exhausted: false,
        }
    }

    /// Uses every material of `catalog`.
    pub fn from_catalog(objects: Vec<Block>, layout: StackLayout, catalog: &PropertyCatalog) -> Self {
        let materials = catalog.material_ids().map(str::to_string).collect();
        Self::new(objects, layout, materials)
    }

    /// Wraps the enumerator so that each canonical key is yielded once.
    pub fn distinct(self) -> Distinct<Self> {
        Distinct::new(self)
    }

    fn per_pick(&self) -> usize {
        self.working.num_stacks() * self.materials.len()
    }

    /// Number of choices at a depth with `unassigned` objects left.
    fn width(&self, unassigned: usize) -> usize {
        unassigned * self.per_pick()
    }

    fn decode(&self, choice: usize) -> (usize, usize, usize) {
        let per_pick = self.per_pick();
        let m = self.materials.len();
        (choice / per_pick, (choice / m) % self.working.num_stacks(), choice % m)
    }

    fn apply(&mut self, choice: usize) {
        let (pick, stack, material) = self.decode(choice);
        let mut block = self.remaining.remove(pick);
        block.material.clone_from(&self.materials[material]);
        self.working.push(stack, block);
        self.choices.push(choice);
    }

    fn undo(&mut self) -> Option<usize> {
        let choice = self.choices.pop()?;
        let (pick, stack, _) = self.decode(choice);
        if let Some(block) = self.working.pop(stack) {
            self.remaining.insert(pick, block);
        }
        Some(choice)
    }

    /// Takes the first choice at every depth until all objects are placed.
    fn descend(&mut self) {
        while !self.remaining.is_empty() {
            self.apply(0);
        }
    }

    /// Steps to the next complete assignment. Returns false when done.
    fn advance(&mut self) -> bool {
        while let Some(choice) = self.undo() {
            let next = choice + 1;
            if next < self.width(self.remaining.len()) {
                self.apply(next);
                self.descend();
                return true;
            }
        }
        false
    }
}

impl Iterator for StackEnumerator {
    type Item = StackAssignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if self.started {
            if !self.advance() {
                self.exhausted = true;
                return None;
            }
        } else {
            self.started = true;
            if self.width(self.remaining.len()) == 0 && !self.remaining.is_empty() {
                self.exhausted = true;
                return None;
            }
            self.descend();
        }
        self.working.update_locations();
        Some(self.working.clone())
    }
}

/// Drops configurations whose canonical key was already yielded.
#[derive(Debug, Clone)]
pub struct Distinct<I> {
    inner: I,
    seen: HashSet<CanonicalKey>,
}

impl<I> Distinct<I> {
    /// Wraps `inner`.
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            seen: HashSet::new(),
        }
    }

    /// Number of distinct keys seen so far.
    pub fn seen(&self) -> usize {
        self.seen.len()
    }
}

impl<I> Iterator for Distinct<I>
where
    I: Iterator<Item = StackAssignment>,
{
    type Item = (CanonicalKey, StackAssignment);

    fn next(&mut self) -> Option<Self::Item> {
        for assignment in self.inner.by_ref() {
            let key = assignment.key();
            if self.seen.insert(key.clone()) {
                return Some((key, assignment));
            }
        }
        None
    }
}
