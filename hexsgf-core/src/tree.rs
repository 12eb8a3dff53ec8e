//! Game tree structure and node management
//!
//! Uses arena allocation: nodes are addressed by [`NodeId`], each node stores
//! its parent id and an ordered list of child ids. Sibling order is list
//! order, so the first child is the main line continuation.
//!
//! Removing a node detaches its subtree; the nodes stay in the arena and can
//! be re-attached with [`GameTree::add_child`] or [`GameTree::add_first_child`].
//!
//! ## Architecture
//! - Level 2: Structural edits (attach, remove, move_to_first, make_main)
//! - Level 3: Navigation and player-to-move resolution
//! - Level 4: Per-node data (move, properties, setup, labels)

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::moves::{Move, Player, Stone};
use crate::point::{points_to_string, HexPoint};

/// Comment property
pub const COMMENT_KEY: &str = "C";

/// Explicit player-to-move override
pub const PLAYER_KEY: &str = "PL";

/// Count/name annotation
pub const COUNT_KEY: &str = "CN";

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// Rejected structural or setup edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("a node cannot be attached beneath itself or one of its descendants")]
    Cycle,

    #[error("the root node cannot be attached as a child")]
    RootNotMovable,

    #[error("setup can only be edited on a node without a move or children")]
    SetupFrozen,
}

/// A position in the game tree
#[derive(Clone, Debug, Default)]
pub struct Node {
    mv: Option<Move>,
    /// Keyed properties, including ones this crate does not interpret
    properties: BTreeMap<String, String>,
    setup: BTreeMap<HexPoint, Stone>,
    /// cell:label pairs, kept verbatim
    labels: Vec<String>,
    /// Navigation marker: the child "forward" should follow
    recent: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

// ============================================================================
// NODE (Level 4 - Per-node data)
// ============================================================================

impl Node {
    pub fn new(mv: Option<Move>) -> Self {
        Self {
            mv,
            ..Default::default()
        }
    }

    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    pub fn set_move(&mut self, mv: Option<Move>) {
        self.mv = mv;
    }

    pub fn has_move(&self) -> bool {
        self.mv.is_some()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn has_child(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_recent(&self) -> bool {
        self.recent
    }

    /// Set the flag on this node only; see [`GameTree::mark_recent`]
    pub fn set_recent(&mut self, recent: bool) {
        self.recent = recent;
    }

    /// True if the move is swap-sides or swap-pieces
    pub fn is_swap(&self) -> bool {
        matches!(
            self.mv.map(|mv| mv.point()),
            Some(HexPoint::SWAP_SIDES) | Some(HexPoint::SWAP_PIECES)
        )
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    pub fn set_property(&mut self, key: &str, value: impl Into<String>) {
        self.properties.insert(key.to_string(), value.into());
    }

    pub fn unset_property(&mut self, key: &str) {
        self.properties.remove(key);
    }

    /// Append to a property, creating it if absent
    pub fn append_property(&mut self, key: &str, value: &str) {
        self.properties
            .entry(key.to_string())
            .or_default()
            .push_str(value);
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// All properties in key order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn comment(&self) -> Option<&str> {
        self.property(COMMENT_KEY)
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.set_property(COMMENT_KEY, comment);
    }

    pub fn has_count(&self) -> bool {
        self.properties.contains_key(COUNT_KEY)
    }

    pub fn count(&self) -> Option<&str> {
        self.property(COUNT_KEY)
    }

    // ------------------------------------------------------------------------
    // Setup stones
    // ------------------------------------------------------------------------

    /// Record a setup placement, replacing any earlier one on that point
    pub fn add_setup(&mut self, stone: Stone, point: HexPoint) {
        self.setup.insert(point, stone);
    }

    pub fn remove_setup(&mut self, point: HexPoint) {
        self.setup.remove(&point);
    }

    /// Points placed with `stone`, in point order
    pub fn setup(&self, stone: Stone) -> Vec<HexPoint> {
        self.setup
            .iter()
            .filter(|(_, &s)| s == stone)
            .map(|(&p, _)| p)
            .collect()
    }

    pub fn has_setup(&self) -> bool {
        !self.setup.is_empty()
    }

    /// Setup may only change while the node has no move and no children
    pub fn can_setup(&self) -> bool {
        !self.has_move() && !self.has_child()
    }

    pub fn try_add_setup(&mut self, stone: Stone, point: HexPoint) -> Result<(), TreeError> {
        if !self.can_setup() {
            return Err(TreeError::SetupFrozen);
        }
        self.add_setup(stone, point);
        Ok(())
    }

    pub fn try_remove_setup(&mut self, point: HexPoint) -> Result<(), TreeError> {
        if !self.can_setup() {
            return Err(TreeError::SetupFrozen);
        }
        self.remove_setup(point);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------------

    pub fn add_label(&mut self, label: impl Into<String>) {
        self.labels.push(label.into());
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn has_label(&self) -> bool {
        !self.labels.is_empty()
    }
}

// ============================================================================
// GAME TREE (Level 2 - Structural edits)
// ============================================================================

/// Game tree with arena allocation
#[derive(Clone, Debug)]
pub struct GameTree {
    nodes: Vec<Node>,
}

impl GameTree {
    /// Create a tree holding only an empty root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Arena size, detached nodes included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node
    pub fn new_node(&mut self, mv: Option<Move>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(mv));
        id
    }

    /// Allocate a node and append it as the last child of `parent`
    pub fn push_child(&mut self, parent: NodeId, mv: Option<Move>) -> NodeId {
        let id = self.new_node(mv);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append `child` (with its subtree) at the end of `parent`'s children
    ///
    /// A child still attached elsewhere is detached first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.attach(parent, child, false)
    }

    /// Insert `child` (with its subtree) as the first child of `parent`
    pub fn add_first_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.attach(parent, child, true)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, first: bool) -> Result<(), TreeError> {
        if child == NodeId::ROOT {
            return Err(TreeError::RootNotMovable);
        }
        if self.is_ancestor_of(child, parent) {
            return Err(TreeError::Cycle);
        }

        self.remove(child);
        self.nodes[child.0].parent = Some(parent);

        let children = &mut self.nodes[parent.0].children;
        if first {
            children.insert(0, child);
        } else {
            children.push(child);
        }
        Ok(())
    }

    /// Detach `id` and its subtree from its parent
    ///
    /// No-op for a node without a parent.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
    }

    /// Move `id` to the front of its sibling list, keeping its subtree
    pub fn move_to_first(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        let children = &mut self.nodes[parent.0].children;
        if let Some(pos) = children.iter().position(|&c| c == id) {
            children[..=pos].rotate_right(1);
        }
    }

    /// Make the path from the root to `id` the main line
    ///
    /// Moves `id` and every ancestor to the front of its sibling list.
    /// The recent flags are left untouched.
    pub fn make_main(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            self.move_to_first(node_id);
            current = self.nodes[node_id.0].parent;
        }
    }

    /// Flag `id` as the recent child of its parent, clearing its siblings
    pub fn mark_recent(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent {
            // Index loop: children and flags live in the same arena
            for i in 0..self.nodes[parent.0].children.len() {
                let sibling = self.nodes[parent.0].children[i];
                self.nodes[sibling.0].recent = false;
            }
        }
        self.nodes[id.0].recent = true;
    }

    // ========================================================================
    // Level 3: Navigation
    // ========================================================================

    /// The `n`th child of `id`
    pub fn child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.get(id).children.get(n).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child(id, 0)
    }

    /// Sibling just before `id` in its parent's child list
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (siblings, pos) = self.sibling_position(id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    /// Sibling just after `id` in its parent's child list
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (siblings, pos) = self.sibling_position(id)?;
        siblings.get(pos + 1).copied()
    }

    fn sibling_position(&self, id: NodeId) -> Option<(&[NodeId], usize)> {
        let siblings = &self.get(self.get(id).parent?).children;
        let pos = siblings.iter().position(|&c| c == id)?;
        Some((siblings, pos))
    }

    /// The flagged child, else the first child, else `None`
    pub fn recent_child(&self, id: NodeId) -> Option<NodeId> {
        let children = &self.get(id).children;
        children
            .iter()
            .copied()
            .find(|&c| self.get(c).recent)
            .or_else(|| children.first().copied())
    }

    /// Number of edges between `id` and the top of its tree
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// True if `ancestor` is `node` or lies on the path from `node` upward
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).parent;
        }
        false
    }

    /// The child of `id` whose subtree contains `target`
    pub fn child_containing(&self, id: NodeId, target: NodeId) -> Option<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.is_ancestor_of(c, target))
    }

    /// Root followed by first children down to a leaf
    pub fn main_line(&self) -> Vec<NodeId> {
        let mut line = vec![self.root()];
        let mut current = self.root();
        while let Some(next) = self.first_child(current) {
            line.push(next);
            current = next;
        }
        line
    }

    /// Nodes reachable from `id` in pre-order, `id` first
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.get(current).children.iter().rev());
        }
        order
    }

    /// Number of nodes attached to the root
    pub fn node_count(&self) -> usize {
        self.subtree(self.root()).len()
    }

    // ========================================================================
    // Level 3: Player to move
    // ========================================================================

    /// Who moves next when no `PL` override is present
    ///
    /// - after a move: the opponent, except swap-sides where the mover
    ///   continues, and resign/forfeit which have no default
    /// - root without a move: Black
    /// - any other node without a move (setup): no default
    pub fn default_player_to_move(&self, id: NodeId) -> Option<Player> {
        let node = self.get(id);
        match node.mv {
            Some(mv) => match mv.point() {
                HexPoint::RESIGN | HexPoint::FORFEIT => None,
                HexPoint::SWAP_SIDES => Some(mv.player()),
                _ => Some(mv.player().opponent()),
            },
            None if id == self.root() => Some(Player::Black),
            None => None,
        }
    }

    /// Store an override unless `player` is already the default
    pub fn set_player_to_move(&mut self, id: NodeId, player: Player) {
        if self.default_player_to_move(id) == Some(player) {
            self.get_mut(id).unset_property(PLAYER_KEY);
        } else {
            self.get_mut(id).set_property(PLAYER_KEY, player.sgf_key());
        }
    }

    /// Resolved player to move; never fails
    ///
    /// A valid `PL` override wins, then the default. Resign and forfeit
    /// nodes inherit from their parent. Anything left over is Black.
    pub fn player_to_move(&self, id: NodeId) -> Player {
        let mut current = id;
        loop {
            let node = self.get(current);
            if let Some(player) = node.property(PLAYER_KEY).and_then(Player::from_sgf_key) {
                return player;
            }
            if let Some(player) = self.default_player_to_move(current) {
                return player;
            }
            let resigned = matches!(
                node.mv.map(|mv| mv.point()),
                Some(HexPoint::RESIGN) | Some(HexPoint::FORFEIT)
            );
            match node.parent {
                Some(parent) if resigned => current = parent,
                _ => return Player::Black,
            }
        }
    }

    // ========================================================================
    // Level 4: Debugging output
    // ========================================================================

    /// Indented text rendering of the subtree at `id`
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![(id, 0)];
        while let Some((current, indent)) = stack.pop() {
            self.dump_node(&mut out, current, indent);
            let children = &self.get(current).children;
            stack.extend(children.iter().rev().map(|&c| (c, indent + 1)));
        }
        out
    }

    fn dump_node(&self, out: &mut String, id: NodeId, indent: usize) {
        let node = self.get(id);
        let pad = "  ".repeat(indent);
        let mv = node.mv.map(|mv| mv.to_string()).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "{}node {} move={} recent={}", pad, id.0, mv, node.recent);
        for stone in [Stone::Black, Stone::White, Stone::Empty] {
            let points = node.setup(stone);
            if !points.is_empty() {
                let key = stone.setup_key();
                let _ = writeln!(out, "{}  {}: {}", pad, key, points_to_string(&points));
            }
        }
        if node.has_label() {
            let _ = writeln!(out, "{}  LB: {}", pad, node.labels.join(" "));
        }
        for (key, value) in node.properties() {
            let _ = writeln!(out, "{}  {}={:?}", pad, key, value);
        }
    }
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
