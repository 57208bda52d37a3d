//! Tree data structures for Monte Carlo Tree Search
//!
//! The tree is an arena: every node lives in one contiguous `Vec` and
//! parent/child links are [`NodeId`] indices into it. The root is always
//! `NodeId(0)`. Nodes are never removed during a search; re-rooting builds
//! a compacted arena holding only the retained subtree.

use std::fmt::Write as _;

use rand::rngs::StdRng;

use crate::{
    config::TieBreak,
    game_state::{Action, GameState},
    policy::selection::SelectionPolicy,
    reward::Reward,
    stats::ChildStats,
    utils, MCTSError, Result,
};

/// Index of a node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Snapshot of the statistics a bandit needs to score a node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeStats {
    /// Number of simulations that passed through the node
    pub visits: u64,
    /// Sum of the rewards credited to the node
    pub total_reward: f64,
    /// Sum of the squared rewards credited to the node
    pub sum_squared_reward: f64,
}

impl NodeStats {
    /// Average reward, or 0.0 for an unvisited node
    pub fn average_reward(&self) -> f64 {
        utils::exploitation_term(self.total_reward, self.visits)
    }

    /// Sample variance of the credited rewards, or 0.0 for an unvisited node
    pub fn variance(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        let mean = self.average_reward();
        (self.sum_squared_reward / self.visits as f64 - mean * mean).max(0.0)
    }
}

/// A node in the MCTS tree
///
/// Each node owns its game state, the action that led to it and the
/// statistics accumulated by backpropagation.
#[derive(Clone)]
pub struct Node<S: GameState> {
    /// The game state at this node
    pub state: S,

    /// The action that led to this state (None for root)
    pub action: Option<S::Action>,

    /// Parent node (None for root)
    pub parent: Option<NodeId>,

    /// Expanded children in expansion order
    pub children: Vec<(S::Action, NodeId)>,

    /// Legal actions that have not been expanded yet
    pub untried_actions: Vec<S::Action>,

    /// Player who made the move to reach this state
    ///
    /// For the root node, this is the player to move. Rewards credited to
    /// the node are evaluated from this player's perspective.
    pub player: S::Player,

    /// Depth of this node in the tree (root = 0)
    pub depth: usize,

    terminal: bool,
    visits: u64,
    total_reward: S::Reward,
    sum_squared_reward: f64,
}

impl<S: GameState> Node<S> {
    /// Creates an unvisited node for `state`
    ///
    /// Fails with [`MCTSError::DomainContractViolation`] when the state is not
    /// terminal but reports no legal actions.
    pub fn new(
        state: S,
        action: Option<S::Action>,
        player: S::Player,
        depth: usize,
    ) -> Result<Self> {
        let terminal = state.is_terminal();
        let untried_actions = if terminal {
            Vec::new()
        } else {
            state.get_legal_actions()
        };

        if !terminal && untried_actions.is_empty() {
            log::warn!("non-terminal state at depth {} has no legal actions", depth);
            return Err(MCTSError::DomainContractViolation(format!(
                "state at depth {} is not terminal but has no legal actions",
                depth
            )));
        }

        Ok(Node {
            state,
            action,
            parent: None,
            children: Vec::new(),
            untried_actions,
            player,
            depth,
            terminal,
            visits: 0,
            total_reward: S::Reward::default(),
            sum_squared_reward: 0.0,
        })
    }

    /// Returns the number of visits to this node
    #[inline]
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Returns the total reward accumulated at this node
    #[inline]
    pub fn total_reward(&self) -> S::Reward {
        self.total_reward
    }

    /// Returns the average reward (value) of this node
    pub fn value(&self) -> f64 {
        utils::exploitation_term(self.total_reward.to_f64(), self.visits)
    }

    /// Returns the statistics used to score this node
    pub fn stats(&self) -> NodeStats {
        NodeStats {
            visits: self.visits,
            total_reward: self.total_reward.to_f64(),
            sum_squared_reward: self.sum_squared_reward,
        }
    }

    /// Records one simulation: one visit and one reward addition
    pub fn record(&mut self, reward: S::Reward) {
        let value = reward.to_f64();
        self.visits += 1;
        self.total_reward = self.total_reward + reward;
        self.sum_squared_reward += value * value;
    }

    /// Returns true if the state at this node is terminal
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Returns true if every legal action has a child
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// Returns true if this node is a leaf (has no children)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed MCTS tree
#[derive(Clone)]
pub struct Tree<S: GameState> {
    nodes: Vec<Node<S>>,
}

impl<S: GameState> Tree<S> {
    /// Creates a tree holding a single root node for `root_state`
    pub fn new(root_state: S) -> Result<Self> {
        let player = root_state.get_current_player();
        let root = Node::new(root_state, None, player, 0)?;
        Ok(Tree { nodes: vec![root] })
    }

    /// Returns the root id
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the root node
    #[inline]
    pub fn root_node(&self) -> &Node<S> {
        &self.nodes[0]
    }

    /// Returns a node by id
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Returns a node by id for mutation
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Number of nodes in the arena
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a constructed tree
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes with their ids
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Builds the child reached by expanding `parent.untried_actions[untried_index]`
    ///
    /// The tree is not modified; pass the result to [`Tree::commit_child`].
    pub fn prepare_child(&self, parent: NodeId, untried_index: usize) -> Result<Node<S>> {
        let node = self.get(parent);
        let action = node.untried_actions.get(untried_index).ok_or_else(|| {
            MCTSError::InvalidConfiguration(format!(
                "expansion index {} out of range for {} untried actions",
                untried_index,
                node.untried_actions.len()
            ))
        })?;

        let next_state = node.state.apply_action(action);
        let mover = node.state.get_current_player();
        Node::new(next_state, Some(action.clone()), mover, node.depth + 1)
    }

    /// Inserts a prepared child and removes its action from the parent's untried list
    pub fn commit_child(
        &mut self,
        parent: NodeId,
        untried_index: usize,
        mut child: Node<S>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let action = self.nodes[parent.0].untried_actions.remove(untried_index);

        child.parent = Some(parent);
        self.nodes.push(child);
        self.nodes[parent.0].children.push((action, id));
        id
    }

    /// Expands `parent` with the untried action at `untried_index`
    pub fn add_child(&mut self, parent: NodeId, untried_index: usize) -> Result<NodeId> {
        let child = self.prepare_child(parent, untried_index)?;
        Ok(self.commit_child(parent, untried_index, child))
    }

    /// Selects the child of `node` with the best bandit score
    ///
    /// Returns `None` if the node has no children.
    pub fn select_child(
        &self,
        node: NodeId,
        policy: &dyn SelectionPolicy,
        tie_break: TieBreak,
        rng: &mut StdRng,
    ) -> Option<NodeId> {
        let parent = self.get(node);
        let parent_visits = parent.visits();
        let scores: Vec<f64> = parent
            .children
            .iter()
            .map(|(_, id)| policy.score(&self.get(*id).stats(), parent_visits))
            .collect();

        utils::argmax(&scores, tie_break, rng).map(|i| parent.children[i].1)
    }

    /// Finds the child of `node` reached by the action with `action_id`
    pub fn find_child(&self, node: NodeId, action_id: usize) -> Option<NodeId> {
        self.get(node)
            .children
            .iter()
            .find(|(action, _)| action.id() == action_id)
            .map(|(_, id)| *id)
    }

    /// Returns the ids from `leaf` up to and including the root
    pub fn path_to_root(&self, leaf: NodeId) -> Vec<NodeId> {
        let mut path = vec![leaf];
        let mut current = leaf;
        while let Some(parent) = self.get(current).parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Walks from `leaf` to the root, recording one simulation on every node
    ///
    /// `credit` maps the player who moved into a node to the reward that
    /// node receives. Returns the number of nodes updated.
    pub fn backpropagate<F>(&mut self, leaf: NodeId, mut credit: F) -> usize
    where
        F: FnMut(&S::Player) -> S::Reward,
    {
        let mut current = Some(leaf);
        let mut updated = 0;

        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            let reward = credit(&node.player);
            node.record(reward);
            updated += 1;
            current = node.parent;
        }

        updated
    }

    /// Statistics of the children of `node` in expansion order
    pub fn child_statistics(&self, node: NodeId) -> Vec<ChildStats<S::Action>> {
        self.get(node)
            .children
            .iter()
            .map(|(action, id)| {
                let child = self.get(*id);
                ChildStats {
                    action: action.clone(),
                    visits: child.visits(),
                    total_reward: child.total_reward().to_f64(),
                    terminal: child.is_terminal(),
                }
            })
            .collect()
    }

    /// Makes `new_root` the root, discarding every node not below it
    ///
    /// The arena is compacted so the new root becomes `NodeId(0)`; ids from
    /// before the call are invalidated. Statistics of retained nodes are kept.
    /// `state` replaces the state stored at the new root, whose player becomes
    /// the player to move as in [`Tree::new`]. Unknown ids are ignored.
    pub fn reroot(&mut self, new_root: NodeId, state: S) {
        if new_root.0 >= self.nodes.len() {
            return;
        }

        let mut old: Vec<Option<Node<S>>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();
        let mut remap: Vec<Option<NodeId>> = vec![None; old.len()];

        // Breadth-first order keeps every parent ahead of its children
        let mut order = vec![new_root];
        remap[new_root.0] = Some(NodeId::ROOT);
        let mut next = 0;
        while next < order.len() {
            if let Some(node) = old[order[next].0].as_ref() {
                for (_, child) in &node.children {
                    remap[child.0] = Some(NodeId(order.len()));
                    order.push(*child);
                }
            }
            next += 1;
        }

        let base_depth = old[new_root.0].as_ref().map_or(0, |n| n.depth);
        let mut nodes = Vec::with_capacity(order.len());
        for id in order {
            if let Some(mut node) = old[id.0].take() {
                node.parent = node.parent.and_then(|p| remap[p.0]);
                for (_, child) in node.children.iter_mut() {
                    if let Some(mapped) = remap[child.0] {
                        *child = mapped;
                    }
                }
                node.depth -= base_depth;
                nodes.push(node);
            }
        }

        let root = &mut nodes[0];
        root.parent = None;
        root.action = None;
        root.player = state.get_current_player();
        root.state = state;

        log::debug!(
            "re-rooted tree: kept {} of {} nodes",
            nodes.len(),
            remap.len()
        );
        self.nodes = nodes;
    }

    /// Deepest node depth in the tree
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Renders the tree as indented text, one node per line
    pub fn visualize(&self) -> String {
        let mut output = String::new();
        let mut stack = vec![(NodeId::ROOT, 0usize)];

        while let Some((id, indent)) = stack.pop() {
            let node = self.get(id);
            let action_str = match &node.action {
                Some(action) => format!("{:?}", action),
                None => "Root".to_string(),
            };
            let _ = writeln!(
                output,
                "{}{} (visits: {}, value: {:.3})",
                "  ".repeat(indent),
                action_str,
                node.visits(),
                node.value()
            );

            for (_, child) in node.children.iter().rev() {
                stack.push((*child, indent + 1));
            }
        }

        output
    }
}
