//! In-memory block hierarchy for one page.
//!
//! A [`BlockTree`] is an adjacency map (`BlockId -> Block`, each block
//! holding its parent id) plus a derived sibling index keyed by parent.
//! Structural operations are planned here as pure functions returning a
//! [`Placement`]; the store persists the result.

use crate::domain::{Block, BlockId, PageId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

/// Failures of structural planning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("block {0} is not part of this page")]
    UnknownBlock(BlockId),

    #[error("block {0} is the first of its siblings and cannot be indented")]
    FirstSibling(BlockId),

    #[error("block {0} is already at the top level")]
    AlreadyRoot(BlockId),

    #[error("moving block {block} under {parent} would create a cycle")]
    Cycle { block: BlockId, parent: BlockId },

    #[error("parent block {0} belongs to a different page")]
    ForeignParent(BlockId),

    #[error("order {0} is already used by a sibling")]
    OrderTaken(f64),

    #[error("order must be a finite number, got {0}")]
    InvalidOrder(f64),
}

/// Where a block should end up after a structural change.
///
/// `renumber` lists sibling keys rewritten in the same step; it is only
/// non-empty when the target group ran out of representable keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub block: BlockId,
    pub parent: Option<BlockId>,
    pub order: f64,
    pub renumber: Vec<(BlockId, f64)>,
}

/// A block together with its nesting depth in a page outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineEntry {
    pub depth: usize,
    #[serde(flatten)]
    pub block: Block,
}

/// The blocks of one page.
#[derive(Debug, Clone)]
pub struct BlockTree {
    page_id: PageId,
    blocks: HashMap<BlockId, Block>,
    groups: HashMap<Option<BlockId>, Vec<BlockId>>,
}

fn sibling_order(a: &Block, b: &Block) -> Ordering {
    a.order()
        .total_cmp(&b.order())
        .then_with(|| a.id().cmp(b.id()))
}

impl BlockTree {
    /// Builds the tree from a page's blocks. Blocks of other pages are ignored.
    pub fn new(page_id: PageId, blocks: impl IntoIterator<Item = Block>) -> Self {
        let blocks = blocks
            .into_iter()
            .filter(|b| b.page_id() == &page_id)
            .map(|b| (b.id().clone(), b))
            .collect();
        let mut tree = Self {
            page_id,
            blocks,
            groups: HashMap::new(),
        };
        tree.rebuild_index();
        tree
    }

    fn rebuild_index(&mut self) {
        let mut groups: HashMap<Option<BlockId>, Vec<BlockId>> = HashMap::new();
        for block in self.blocks.values() {
            groups
                .entry(block.parent_id().cloned())
                .or_default()
                .push(block.id().clone());
        }
        for ids in groups.values_mut() {
            ids.sort_by(|a, b| sibling_order(&self.blocks[a], &self.blocks[b]));
        }
        self.groups = groups;
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    fn group(&self, parent: Option<&BlockId>) -> &[BlockId] {
        self.groups
            .get(&parent.cloned())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Children of `parent` (top-level blocks for `None`) in sibling order.
    pub fn children(&self, parent: Option<&BlockId>) -> Vec<&Block> {
        self.group(parent).iter().map(|id| &self.blocks[id]).collect()
    }

    /// Top-level blocks in sibling order.
    pub fn roots(&self) -> Vec<&Block> {
        self.children(None)
    }

    /// All blocks below `id`, parents before children.
    pub fn descendants(&self, id: &BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut stack: Vec<&BlockId> = self.group(Some(id)).iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next.clone());
            stack.extend(self.group(Some(next)).iter().rev());
        }
        out
    }

    /// `id` and everything below it, children before parents.
    ///
    /// Deleting in this order never leaves a block whose parent is gone.
    pub fn subtree_post_order(&self, id: &BlockId) -> Vec<BlockId> {
        let mut out = self.descendants(id);
        out.reverse();
        out.push(id.clone());
        out
    }

    /// True when `candidate` sits somewhere below `ancestor`.
    pub fn is_descendant(&self, candidate: &BlockId, ancestor: &BlockId) -> bool {
        let mut current = self.blocks.get(candidate).and_then(|b| b.parent_id());
        // Bounded by the block count so a corrupt parent loop cannot spin forever.
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.blocks.len() {
                return false;
            }
            current = self.blocks.get(parent).and_then(|b| b.parent_id());
        }
        false
    }

    /// Every block in display order with its depth (top level is 0).
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut out = Vec::with_capacity(self.blocks.len());
        let mut stack: Vec<(usize, &BlockId)> =
            self.group(None).iter().rev().map(|id| (0, id)).collect();
        while let Some((depth, id)) = stack.pop() {
            out.push(OutlineEntry {
                depth,
                block: self.blocks[id].clone(),
            });
            stack.extend(self.group(Some(id)).iter().rev().map(|c| (depth + 1, c)));
        }
        out
    }

    /// Key that sorts `id` after every other child of `parent`: `max + 1`,
    /// or 0 in an empty group.
    ///
    /// When `max + 1` rounds back to `max` the other children are respaced
    /// to `0..n` and `id` takes `n`.
    fn append_slot(&self, parent: Option<&BlockId>, id: &BlockId) -> (f64, Vec<(BlockId, f64)>) {
        let siblings: Vec<&BlockId> = self.group(parent).iter().filter(|s| *s != id).collect();
        let Some(max) = siblings
            .iter()
            .map(|s| self.blocks[*s].order())
            .reduce(f64::max)
        else {
            return (0.0, Vec::new());
        };
        let next = max + 1.0;
        if next > max {
            return (next, Vec::new());
        }
        let renumber = siblings
            .iter()
            .enumerate()
            .map(|(i, s)| ((*s).clone(), i as f64))
            .collect();
        (siblings.len() as f64, renumber)
    }

    /// Key that sorts a new child before every current child of `parent`:
    /// `min - 1`, or 0 in an empty group.
    ///
    /// When `min - 1` rounds back to `min` the current children are respaced
    /// to `1..=n` and the new child takes 0.
    fn prepend_slot(&self, parent: Option<&BlockId>) -> (f64, Vec<(BlockId, f64)>) {
        let children = self.group(parent);
        let Some(first) = children.first() else {
            return (0.0, Vec::new());
        };
        let min = self.blocks[first].order();
        let below = min - 1.0;
        if below < min {
            return (below, Vec::new());
        }
        let renumber = children
            .iter()
            .enumerate()
            .map(|(i, child)| (child.clone(), (i + 1) as f64))
            .collect();
        (0.0, renumber)
    }

    /// Checks that `order` can be used under `parent`.
    ///
    /// `moving` is excluded from the comparison so a block may keep its own key.
    pub fn check_order(
        &self,
        parent: Option<&BlockId>,
        order: f64,
        moving: Option<&BlockId>,
    ) -> Result<(), TreeError> {
        if !order.is_finite() {
            return Err(TreeError::InvalidOrder(order));
        }
        let taken = self
            .group(parent)
            .iter()
            .filter(|id| Some(*id) != moving)
            .any(|id| self.blocks[id].order() == order);
        if taken {
            return Err(TreeError::OrderTaken(order));
        }
        Ok(())
    }

    /// Plans nesting `id` under its preceding sibling.
    ///
    /// The block becomes the first child there: key 0 in an empty group,
    /// otherwise one below the current minimum. The group is respaced when
    /// no lower key is representable.
    pub fn plan_indent(&self, id: &BlockId) -> Result<Placement, TreeError> {
        let block = self
            .blocks
            .get(id)
            .ok_or_else(|| TreeError::UnknownBlock(id.clone()))?;
        let group = self.group(block.parent_id());
        let position = group
            .iter()
            .position(|sibling| sibling == id)
            .ok_or_else(|| TreeError::UnknownBlock(id.clone()))?;
        if position == 0 {
            return Err(TreeError::FirstSibling(id.clone()));
        }

        let new_parent = group[position - 1].clone();
        let (order, renumber) = self.prepend_slot(Some(&new_parent));

        Ok(Placement {
            block: id.clone(),
            parent: Some(new_parent),
            order,
            renumber,
        })
    }

    /// Plans promoting `id` to its grandparent's level, directly after its
    /// former parent.
    ///
    /// The key is the midpoint between the former parent and the next
    /// sibling. When floating point leaves no room between the two, the
    /// whole group is respaced to consecutive integers.
    pub fn plan_outdent(&self, id: &BlockId) -> Result<Placement, TreeError> {
        let block = self
            .blocks
            .get(id)
            .ok_or_else(|| TreeError::UnknownBlock(id.clone()))?;
        let parent_id = block
            .parent_id()
            .ok_or_else(|| TreeError::AlreadyRoot(id.clone()))?;
        let parent = self
            .blocks
            .get(parent_id)
            .ok_or_else(|| TreeError::UnknownBlock(parent_id.clone()))?;

        let grandparent = parent.parent_id().cloned();
        let group = self.group(grandparent.as_ref());
        let position = group
            .iter()
            .position(|sibling| sibling == parent_id)
            .ok_or_else(|| TreeError::UnknownBlock(parent_id.clone()))?;

        let after = parent.order();
        let order = match group.get(position + 1) {
            None => Some(after + 1.0),
            Some(next) => {
                let before = self.blocks[next].order();
                let mid = after + (before - after) / 2.0;
                (mid > after && mid < before).then_some(mid)
            }
        };

        if let Some(order) = order {
            return Ok(Placement {
                block: id.clone(),
                parent: grandparent,
                order,
                renumber: Vec::new(),
            });
        }

        let mut sequence: Vec<BlockId> = group.to_vec();
        sequence.insert(position + 1, id.clone());
        let renumber = sequence
            .iter()
            .enumerate()
            .filter(|(_, sibling)| *sibling != id)
            .map(|(i, sibling)| (sibling.clone(), i as f64))
            .collect();

        Ok(Placement {
            block: id.clone(),
            parent: grandparent,
            order: (position + 1) as f64,
            renumber,
        })
    }

    /// Plans moving `id` under `parent` (top level for `None`).
    ///
    /// Without an explicit order the block keeps its key when the parent is
    /// unchanged and is appended otherwise.
    pub fn plan_move(
        &self,
        id: &BlockId,
        parent: Option<&BlockId>,
        order: Option<f64>,
    ) -> Result<Placement, TreeError> {
        let block = self
            .blocks
            .get(id)
            .ok_or_else(|| TreeError::UnknownBlock(id.clone()))?;

        if let Some(parent) = parent {
            if parent == id || self.is_descendant(parent, id) {
                return Err(TreeError::Cycle {
                    block: id.clone(),
                    parent: parent.clone(),
                });
            }
            if !self.contains(parent) {
                return Err(TreeError::ForeignParent(parent.clone()));
            }
        }

        let (order, renumber) = match order {
            Some(order) => {
                self.check_order(parent, order, Some(id))?;
                (order, Vec::new())
            }
            None if block.parent_id() == parent => (block.order(), Vec::new()),
            None => self.append_slot(parent, id),
        };

        Ok(Placement {
            block: id.clone(),
            parent: parent.cloned(),
            order,
            renumber,
        })
    }

    /// Plans where a block that is not yet in the tree goes.
    ///
    /// An explicit `order` must be free under `parent`; without one the block
    /// is appended after its future siblings.
    pub fn plan_insert(
        &self,
        id: &BlockId,
        parent: Option<&BlockId>,
        order: Option<f64>,
    ) -> Result<Placement, TreeError> {
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(TreeError::ForeignParent(parent.clone()));
            }
        }
        let (order, renumber) = match order {
            Some(order) => {
                self.check_order(parent, order, None)?;
                (order, Vec::new())
            }
            None => self.append_slot(parent, id),
        };

        Ok(Placement {
            block: id.clone(),
            parent: parent.cloned(),
            order,
            renumber,
        })
    }

    /// Inserts a new block or replaces an existing one.
    pub fn insert(&mut self, block: Block) {
        self.blocks.insert(block.id().clone(), block);
        self.rebuild_index();
    }

    /// Applies a planned placement in memory.
    pub fn apply(&mut self, placement: &Placement) -> Result<(), TreeError> {
        let block = self
            .blocks
            .get(&placement.block)
            .ok_or_else(|| TreeError::UnknownBlock(placement.block.clone()))?;
        let moved = block.placed(placement.parent.clone(), placement.order);
        self.blocks.insert(placement.block.clone(), moved);
        for (sibling, order) in &placement.renumber {
            if let Some(block) = self.blocks.get(sibling) {
                let parent = block.parent_id().cloned();
                let renumbered = block.placed(parent, *order);
                self.blocks.insert(sibling.clone(), renumbered);
            }
        }
        self.rebuild_index();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-05-18T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn page() -> PageId {
        PageId::from_title("P").unwrap()
    }

    fn block(content: &str, parent: Option<&BlockId>, order: f64) -> Block {
        Block::new(
            BlockId::new(),
            page(),
            parent.cloned(),
            content,
            order,
            at(),
            at(),
        )
    }

    fn contents(blocks: Vec<&Block>) -> Vec<String> {
        blocks.iter().map(|b| b.content().to_string()).collect()
    }

    /// X, Y, Z as top-level siblings with orders 0, 1, 2.
    fn xyz() -> (BlockTree, BlockId, BlockId, BlockId) {
        let x = block("X", None, 0.0);
        let y = block("Y", None, 1.0);
        let z = block("Z", None, 2.0);
        let ids = (x.id().clone(), y.id().clone(), z.id().clone());
        let tree = BlockTree::new(page(), vec![z, x, y]);
        (tree, ids.0, ids.1, ids.2)
    }

    // ===========================================
    // Construction and queries
    // ===========================================

    #[test]
    fn children_are_sorted_by_order() {
        let (tree, ..) = xyz();
        assert_eq!(contents(tree.roots()), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn blocks_of_other_pages_are_ignored() {
        let stray = Block::new(
            BlockId::new(),
            PageId::from_title("Other").unwrap(),
            None,
            "stray",
            0.0,
            at(),
            at(),
        );
        let tree = BlockTree::new(page(), vec![stray]);
        assert!(tree.is_empty());
    }

    #[test]
    fn insert_appends_at_max_plus_one() {
        let (tree, x, ..) = xyz();
        let fresh = BlockId::new();
        assert_eq!(tree.plan_insert(&fresh, None, None).unwrap().order, 3.0);
        assert_eq!(tree.plan_insert(&fresh, Some(&x), None).unwrap().order, 0.0);
        assert_eq!(
            tree.plan_insert(&fresh, None, Some(2.0)),
            Err(TreeError::OrderTaken(2.0))
        );
    }

    #[test]
    fn insert_respaces_when_max_plus_one_rounds() {
        let huge = 2f64.powi(53);
        let a = block("a", None, huge - 2.0);
        let b = block("b", None, huge);
        let (aid, bid) = (a.id().clone(), b.id().clone());
        let tree = BlockTree::new(page(), vec![a, b]);

        let placement = tree.plan_insert(&BlockId::new(), None, None).unwrap();
        assert_eq!(placement.order, 2.0);
        assert_eq!(placement.renumber, vec![(aid, 0.0), (bid, 1.0)]);
    }

    #[test]
    fn outline_is_pre_order_with_depth() {
        let a = block("a", None, 0.0);
        let a1 = block("a1", Some(a.id()), 0.0);
        let a1x = block("a1x", Some(a1.id()), 0.0);
        let a2 = block("a2", Some(a.id()), 1.0);
        let b = block("b", None, 1.0);
        let tree = BlockTree::new(page(), vec![b, a2, a1x, a1, a]);

        let outline: Vec<(usize, String)> = tree
            .outline()
            .into_iter()
            .map(|e| (e.depth, e.block.content().to_string()))
            .collect();
        assert_eq!(
            outline,
            vec![
                (0, "a".to_string()),
                (1, "a1".to_string()),
                (2, "a1x".to_string()),
                (1, "a2".to_string()),
                (0, "b".to_string()),
            ]
        );
    }

    #[test]
    fn subtree_post_order_lists_children_first() {
        let a = block("a", None, 0.0);
        let child = block("child", Some(a.id()), 0.0);
        let grandchild = block("grandchild", Some(child.id()), 0.0);
        let ids = (a.id().clone(), child.id().clone(), grandchild.id().clone());
        let tree = BlockTree::new(page(), vec![a, child, grandchild]);

        assert_eq!(
            tree.subtree_post_order(&ids.0),
            vec![ids.2.clone(), ids.1.clone(), ids.0.clone()]
        );
        assert!(tree.is_descendant(&ids.2, &ids.0));
        assert!(!tree.is_descendant(&ids.0, &ids.2));
    }

    #[test]
    fn check_order_rejects_taken_and_non_finite_keys() {
        let (tree, x, ..) = xyz();
        assert_eq!(tree.check_order(None, 1.0, None), Err(TreeError::OrderTaken(1.0)));
        assert!(tree.check_order(None, 0.0, Some(&x)).is_ok());
        assert!(matches!(
            tree.check_order(None, f64::NAN, None),
            Err(TreeError::InvalidOrder(_))
        ));
    }

    // ===========================================
    // Indent / outdent
    // ===========================================

    #[test]
    fn indent_then_outdent_round_trip() {
        let (mut tree, x, y, z) = xyz();

        let indent = tree.plan_indent(&y).unwrap();
        assert_eq!(indent.parent, Some(x.clone()));
        assert_eq!(indent.order, 0.0);
        tree.apply(&indent).unwrap();
        assert_eq!(contents(tree.roots()), vec!["X", "Z"]);
        assert_eq!(contents(tree.children(Some(&x))), vec!["Y"]);

        let outdent = tree.plan_outdent(&y).unwrap();
        assert_eq!(outdent.parent, None);
        assert!(outdent.order > 0.0);
        assert!(outdent.order < 2.0);
        tree.apply(&outdent).unwrap();
        assert_eq!(contents(tree.roots()), vec!["X", "Y", "Z"]);
        assert!(tree.children(Some(&x)).is_empty());
        assert!(tree.get(&z).is_some());
    }

    #[test]
    fn indent_first_sibling_fails() {
        let (tree, x, ..) = xyz();
        assert_eq!(tree.plan_indent(&x), Err(TreeError::FirstSibling(x)));
    }

    #[test]
    fn indent_unknown_block_fails() {
        let (tree, ..) = xyz();
        let ghost = BlockId::new();
        assert_eq!(tree.plan_indent(&ghost), Err(TreeError::UnknownBlock(ghost)));
    }

    #[test]
    fn indent_goes_below_existing_children() {
        let x = block("X", None, 0.0);
        let kid = block("kid", Some(x.id()), 5.0);
        let y = block("Y", None, 1.0);
        let (xid, yid) = (x.id().clone(), y.id().clone());
        let mut tree = BlockTree::new(page(), vec![x, kid, y]);

        let placement = tree.plan_indent(&yid).unwrap();
        assert_eq!(placement.order, 4.0);
        tree.apply(&placement).unwrap();
        assert_eq!(contents(tree.children(Some(&xid))), vec!["Y", "kid"]);
    }

    #[test]
    fn indent_respaces_when_min_minus_one_rounds() {
        let x = block("X", None, 0.0);
        let low = block("low", Some(x.id()), -(2f64.powi(53)));
        let high = block("high", Some(x.id()), 0.0);
        let y = block("Y", None, 1.0);
        let (xid, lid, hid, yid) = (
            x.id().clone(),
            low.id().clone(),
            high.id().clone(),
            y.id().clone(),
        );
        let mut tree = BlockTree::new(page(), vec![x, low, high, y]);

        let placement = tree.plan_indent(&yid).unwrap();
        assert_eq!(placement.order, 0.0);
        assert_eq!(placement.renumber, vec![(lid, 1.0), (hid, 2.0)]);
        tree.apply(&placement).unwrap();
        assert_eq!(contents(tree.children(Some(&xid))), vec!["Y", "low", "high"]);
    }

    #[test]
    fn outdent_root_fails() {
        let (tree, x, ..) = xyz();
        assert_eq!(tree.plan_outdent(&x), Err(TreeError::AlreadyRoot(x)));
    }

    #[test]
    fn outdent_after_last_parent_appends() {
        let x = block("X", None, 0.0);
        let child = block("child", Some(x.id()), 0.0);
        let cid = child.id().clone();
        let tree = BlockTree::new(page(), vec![x, child]);

        let placement = tree.plan_outdent(&cid).unwrap();
        assert_eq!(placement.order, 1.0);
        assert!(placement.renumber.is_empty());
    }

    #[test]
    fn outdent_keeps_nested_grandparent() {
        let a = block("a", None, 0.0);
        let b = block("b", Some(a.id()), 0.0);
        let c = block("c", Some(b.id()), 0.0);
        let (aid, cid) = (a.id().clone(), c.id().clone());
        let mut tree = BlockTree::new(page(), vec![a, b, c]);

        let placement = tree.plan_outdent(&cid).unwrap();
        assert_eq!(placement.parent, Some(aid.clone()));
        tree.apply(&placement).unwrap();
        assert_eq!(contents(tree.children(Some(&aid))), vec!["b", "c"]);
    }

    #[test]
    fn outdent_respaces_when_keys_are_exhausted() {
        let x = block("X", None, 1.0);
        let child = block("child", Some(x.id()), 0.0);
        let next = block("next", None, f64::from_bits(1.0f64.to_bits() + 1));
        let (xid, cid, nid) = (x.id().clone(), child.id().clone(), next.id().clone());
        let mut tree = BlockTree::new(page(), vec![x, child, next]);

        let placement = tree.plan_outdent(&cid).unwrap();
        assert_eq!(placement.order, 1.0);
        assert_eq!(placement.renumber, vec![(xid, 0.0), (nid, 2.0)]);
        tree.apply(&placement).unwrap();
        assert_eq!(contents(tree.roots()), vec!["X", "child", "next"]);
    }

    // ===========================================
    // Move
    // ===========================================

    #[test]
    fn move_under_own_descendant_is_a_cycle() {
        let a = block("a", None, 0.0);
        let b = block("b", Some(a.id()), 0.0);
        let (aid, bid) = (a.id().clone(), b.id().clone());
        let tree = BlockTree::new(page(), vec![a, b]);

        assert_eq!(
            tree.plan_move(&aid, Some(&bid), None),
            Err(TreeError::Cycle {
                block: aid.clone(),
                parent: bid
            })
        );
        assert!(matches!(
            tree.plan_move(&aid, Some(&aid), None),
            Err(TreeError::Cycle { .. })
        ));
    }

    #[test]
    fn move_to_parent_outside_page_fails() {
        let (tree, x, ..) = xyz();
        let foreign = BlockId::new();
        assert_eq!(
            tree.plan_move(&x, Some(&foreign), None),
            Err(TreeError::ForeignParent(foreign))
        );
    }

    #[test]
    fn move_without_order_appends_to_new_group() {
        let (tree, x, y, z) = xyz();
        let under_x = tree.plan_move(&z, Some(&x), None).unwrap();
        assert_eq!(under_x.order, 0.0);

        let same_group = tree.plan_move(&y, None, None).unwrap();
        assert_eq!(same_group.order, 1.0);
    }

    #[test]
    fn move_respaces_target_group_when_keys_round() {
        let x = block("X", None, 0.0);
        let top = block("top", Some(x.id()), 2f64.powi(53));
        let y = block("Y", None, 1.0);
        let (xid, tid, yid) = (x.id().clone(), top.id().clone(), y.id().clone());
        let mut tree = BlockTree::new(page(), vec![x, top, y]);

        let placement = tree.plan_move(&yid, Some(&xid), None).unwrap();
        assert_eq!(placement.order, 1.0);
        assert_eq!(placement.renumber, vec![(tid, 0.0)]);
        tree.apply(&placement).unwrap();
        assert_eq!(contents(tree.children(Some(&xid))), vec!["top", "Y"]);
    }

    #[test]
    fn move_with_taken_order_conflicts() {
        let (tree, _, y, z) = xyz();
        assert_eq!(
            tree.plan_move(&z, None, Some(1.0)),
            Err(TreeError::OrderTaken(1.0))
        );
        assert!(tree.plan_move(&y, None, Some(1.0)).is_ok());
    }
}
