//! Stack assignments: objects partitioned into fixed-position stacks.

use blockworld_core::{records_by_id, Block, Error, Location, ObjectRecord, Result};

use crate::key::CanonicalKey;
use crate::layout::StackLayout;

/// Objects distributed over the stacks of a [`StackLayout`], each stack
/// ordered bottom to top.
#[derive(Debug, Clone)]
pub struct StackAssignment {
    layout: StackLayout,
    stacks: Vec<Vec<Block>>,
}

impl StackAssignment {
    /// An assignment with every stack empty.
    pub fn new(layout: StackLayout) -> Self {
        let stacks = vec![Vec::new(); layout.len()];
        Self { layout, stacks }
    }

    /// Returns the layout.
    pub fn layout(&self) -> &StackLayout {
        &self.layout
    }

    /// Returns the stacks, bottom to top.
    pub fn stacks(&self) -> &[Vec<Block>] {
        &self.stacks
    }

    /// Number of stacks.
    pub fn num_stacks(&self) -> usize {
        self.stacks.len()
    }

    /// Total number of objects.
    pub fn len(&self) -> usize {
        self.stacks.iter().map(Vec::len).sum()
    }

    /// True if no stack holds an object.
    pub fn is_empty(&self) -> bool {
        self.stacks.iter().all(Vec::is_empty)
    }

    /// Indices of stacks holding at least one object.
    pub fn nonempty_stacks(&self) -> Vec<usize> {
        (0..self.stacks.len())
            .filter(|&i| !self.stacks[i].is_empty())
            .collect()
    }

    /// Top object of stack `index`.
    pub fn top(&self, index: usize) -> Option<&Block> {
        self.stacks.get(index)?.last()
    }

    pub(crate) fn top_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.stacks.get_mut(index)?.last_mut()
    }

    pub(crate) fn push(&mut self, index: usize, block: Block) {
        self.stacks[index].push(block);
    }

    pub(crate) fn pop(&mut self, index: usize) -> Option<Block> {
        self.stacks[index].pop()
    }

    /// Recomputes every object's location from its stack and level.
    ///
    /// Each object rests on the top of the one below it: its center sits at
    /// the sum of the diameters below plus its own radius.
    pub fn update_locations(&mut self) {
        for (stack, &x) in self.stacks.iter_mut().zip(self.layout.positions()) {
            let mut height = 0.0;
            for block in stack.iter_mut() {
                block.location = Location::new(x, height + block.size);
                height += 2.0 * block.size;
            }
        }
    }

    /// Moves the top of stack `from` onto stack `to` and updates locations.
    pub fn move_top(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.stacks.len() || to >= self.stacks.len() || from == to {
            return Err(Error::InvalidState(format!(
                "cannot move from stack {from} to stack {to}"
            )));
        }
        let block = self
            .pop(from)
            .ok_or_else(|| Error::InvalidState(format!("stack {from} is empty")))?;
        self.push(to, block);
        self.update_locations();
        Ok(())
    }

    /// Objects in stack order, bottom to top.
    pub fn objects(&self) -> impl Iterator<Item = &Block> + '_ {
        self.stacks.iter().flatten()
    }

    /// Objects sorted by id.
    pub fn objects_by_id(&self) -> Vec<Block> {
        let mut objects: Vec<Block> = self.objects().cloned().collect();
        objects.sort_by_key(|b| b.id);
        objects
    }

    /// Renderer records, ordered by id.
    pub fn records(&self) -> Vec<ObjectRecord> {
        records_by_id(self.objects())
    }

    /// Canonical key of the current configuration.
    pub fn key(&self) -> CanonicalKey {
        CanonicalKey::from_blocks(self.objects())
    }
}
