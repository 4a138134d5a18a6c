//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

/// Basic graph data structure
/// - source: http://smallcultfollowing.com/babysteps/blog/2015/04/06/modeling-graphs-in-rust-using-vector-indices/
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

pub type NodeIndex = usize;

#[derive(Debug, PartialEq)]
struct NodeData<V> {
    node: V,
    first_outgoing_edge: Option<EdgeIndex>,
    first_incoming_edge: Option<EdgeIndex>,
}

type EdgeIndex = usize;

#[derive(Debug, PartialEq)]
struct EdgeData<E> {
    edge: E,
    source: NodeIndex,
    target: NodeIndex,
    next_outgoing_edge: Option<EdgeIndex>,
    next_incoming_edge: Option<EdgeIndex>,
}

#[derive(Debug, PartialEq)]
pub struct Graph<V, E> {
    vertices: Vec<NodeData<V>>,
    edges: Vec<EdgeData<E>>,
}

impl<V, E> Graph<V, E> {
    /// Creates an empty `Graph` struct.
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Adds a new node to the graph.
    ///
    /// Returns the `NodeIndex` to remember the node.
    pub fn add_node(&mut self, node: V) -> NodeIndex {
        let index = self.vertices.len();
        self.vertices.push(NodeData {
            node: node,
            first_outgoing_edge: None,
            first_incoming_edge: None,
        });
        index
    }

    /// Checks if a given `source` node is in the graph.
    pub fn has_node(&self, source: NodeIndex) -> bool {
        source < self.node_count()
    }

    /// Checks if a given `source` node is connected to the given `target` node.
    pub fn has_edge(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.successors(source).any(|f| f == target)
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// Accesses the node data label behind the `node` index.
    pub fn get_node(&self, node: NodeIndex) -> Option<&V> {
        Some(&self.vertices.get(node)?.node)
    }

    /// Adds a new edge to the graph from `source` to `target`.
    ///
    /// Duplicate edges and self-loops are not inserted.
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, cost: E) -> EdgeStatus {
        if self.has_node(source) == false {
            return EdgeStatus::MissingSource;
        }
        if self.has_node(target) == false {
            return EdgeStatus::MissingTarget;
        }
        if source == target {
            return EdgeStatus::SelfLoop;
        }
        if self.has_edge(source, target) == true {
            return EdgeStatus::AlreadyExists;
        }

        let edge_index = self.edges.len();
        let outgoing_edge = self.vertices[source].first_outgoing_edge;
        let incoming_edge = self.vertices[target].first_incoming_edge;
        self.edges.push(EdgeData {
            source: source,
            edge: cost,
            target: target,
            next_outgoing_edge: outgoing_edge,
            next_incoming_edge: incoming_edge,
        });
        self.vertices[source].first_outgoing_edge = Some(edge_index);
        self.vertices[target].first_incoming_edge = Some(edge_index);
        EdgeStatus::Success
    }

    /// Creates an iterator over the incoming nodes to the `target` node.
    pub fn predecessors(&self, target: NodeIndex) -> Predecessors<V, E> {
        let first_incoming_edge = self.vertices[target].first_incoming_edge;
        Predecessors {
            graph: self,
            current_edge_index: first_incoming_edge,
        }
    }

    /// Creates an iterator over the outgoing nodes from the `source` node.
    pub fn successors(&self, source: NodeIndex) -> Successors<V, E> {
        let first_outgoing_edge = self.vertices[source].first_outgoing_edge;
        Successors {
            graph: self,
            current_edge_index: first_outgoing_edge,
        }
    }

    /// Collects every node with zero outgoing edges, in index order.
    pub fn find_roots(&self) -> Vec<NodeIndex> {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n.first_outgoing_edge {
                None => Some(i),
                Some(_) => None,
            })
            .collect()
    }

    /// Collects the `target` node and every node it can be reached from.
    pub fn ancestors(&self, target: NodeIndex) -> HashSet<NodeIndex> {
        let mut visited = HashSet::new();
        let mut stack = vec![target];
        while let Some(n) = stack.pop() {
            if visited.insert(n) == true {
                stack.extend(self.predecessors(n));
            }
        }
        visited
    }

    /// Performs topological sort to give in-order nodes to perform given tasks
    /// based upon dependencies.
    ///
    /// Among the nodes ready at any step, the lowest index is taken first. When
    /// a cycle prevents completing the order, one cycle is returned as the error
    /// with its first node repeated at the end.
    pub fn topological_sort(&self) -> Result<Vec<NodeIndex>, Vec<NodeIndex>> {
        let all: HashSet<NodeIndex> = (0..self.node_count()).collect();
        self.topological_sort_within(&all)
    }

    /// Sorts only the nodes in `within`, ignoring every edge that leaves the set.
    pub fn topological_sort_within(
        &self,
        within: &HashSet<NodeIndex>,
    ) -> Result<Vec<NodeIndex>, Vec<NodeIndex>> {
        let mut order = Vec::<NodeIndex>::with_capacity(within.len());
        let mut remaining: Vec<usize> = (0..self.node_count())
            .map(|i| match within.contains(&i) {
                true => self.predecessors(i).filter(|p| within.contains(p)).count(),
                false => 0,
            })
            .collect();
        let mut ready: BinaryHeap<Reverse<NodeIndex>> = within
            .iter()
            .filter(|i| remaining[**i] == 0)
            .map(|i| Reverse(*i))
            .collect();
        while let Some(Reverse(current)) = ready.pop() {
            order.push(current);
            for n in self.successors(current) {
                if within.contains(&n) == false {
                    continue;
                }
                remaining[n] -= 1;
                if remaining[n] == 0 {
                    ready.push(Reverse(n));
                }
            }
        }
        match order.len() == within.len() {
            true => Ok(order),
            false => {
                let stuck: HashSet<NodeIndex> = within
                    .iter()
                    .filter(|i| remaining[**i] > 0)
                    .copied()
                    .collect();
                Err(self.find_cycle(&stuck))
            }
        }
    }

    /// Walks backwards through predecessors within `within` until a node
    /// repeats.
    ///
    /// Every node in `within` must have a predecessor that is also in `within`.
    fn find_cycle(&self, within: &HashSet<NodeIndex>) -> Vec<NodeIndex> {
        let start = match within.iter().min() {
            Some(n) => *n,
            None => return Vec::new(),
        };
        let mut path = vec![start];
        let mut current = start;
        loop {
            let next = self
                .predecessors(current)
                .filter(|p| within.contains(p))
                .min();
            match next {
                Some(n) => match path.iter().position(|p| *p == n) {
                    Some(i) => {
                        let mut cycle: Vec<NodeIndex> = path[i..].to_vec();
                        cycle.push(n);
                        return cycle;
                    }
                    None => {
                        path.push(n);
                        current = n;
                    }
                },
                None => return path,
            }
        }
    }

    /// Recursively generates the in-order y-down list of nodes to print with their
    /// corresponding twig style and level of indentation.
    ///
    /// A node already on the current branch is listed but not expanded again.
    fn recurse_treeview(
        &self,
        target: NodeIndex,
        level: Twig,
        branch: &mut Vec<NodeIndex>,
    ) -> Vec<(Twig, NodeIndex)> {
        let mut traversal = Vec::new();
        traversal.push((level.clone(), target));
        if branch.contains(&target) == true {
            return traversal;
        }
        branch.push(target);
        let mut preds: Vec<NodeIndex> = self.predecessors(target).collect();
        preds.sort();
        let mut tunnels = preds.into_iter().peekable();
        while let Some(n) = tunnels.next() {
            // remember the order and parent branch type
            let twig_type = match tunnels.peek() {
                Some(_) => Twig::MidBranch(Some(Box::new(level.clone()))),
                None => Twig::EndLeaf(Some(Box::new(level.clone()))),
            };
            traversal.append(&mut self.recurse_treeview(n, twig_type, branch));
        }
        branch.pop();
        traversal
    }

    /// Creates the in-order y-down list of nodes to display with their
    /// corresponding indentation depth and twig style.
    pub fn treeview(&self, target: NodeIndex) -> Vec<(Twig, NodeIndex)> {
        self.recurse_treeview(target, Twig::EndLeaf(None), &mut Vec::new())
    }
}

#[derive(Debug, PartialEq)]
pub enum EdgeStatus {
    MissingSource,
    MissingTarget,
    SelfLoop,
    AlreadyExists,
    Success,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Twig {
    EndLeaf(Option<Box<Twig>>),
    MidBranch(Option<Box<Twig>>),
}

impl Twig {
    /// Accesses what type of node was the parent to the current `self`.
    pub fn get_upper(&self) -> Option<&Twig> {
        match self {
            Self::EndLeaf(e) => e.as_deref(),
            Self::MidBranch(e) => e.as_deref(),
        }
    }

    /// Converts the twig text from using extended ascii characters to the
    /// original 128 ascii characters.
    pub fn to_ascii(&self) -> String {
        self.to_string()
            .chars()
            .map(|c| match c {
                '─' => '-',
                '│' => '|',
                '├' => '+',
                '└' => '\\',
                _ => c,
            })
            .collect()
    }
}

impl std::fmt::Display for Twig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // determine the spacing leading up the node in the tree
        let space: String = {
            let mut space = String::new();
            let mut x = self;
            while let Some(n) = x.get_upper() {
                match n {
                    Self::EndLeaf(q) => {
                        if q.is_some() {
                            space.push_str("   ")
                        }
                    }
                    Self::MidBranch(q) => {
                        if q.is_some() {
                            space.push_str("  │")
                        }
                    }
                }
                x = n;
            }
            // twig chains are collected from the leaf upwards
            space.chars().rev().collect()
        };

        match self {
            Self::EndLeaf(m) => match m.is_none() {
                true => write!(f, ""),
                false => write!(f, "{}└─ ", space),
            },
            Self::MidBranch(_) => write!(f, "{}├─ ", space),
        }
    }
}

pub struct Predecessors<'graph, V, E> {
    graph: &'graph Graph<V, E>,
    current_edge_index: Option<EdgeIndex>,
}

impl<'graph, V, E> Iterator for Predecessors<'graph, V, E> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let edge = &self.graph.edges[self.current_edge_index?];
        self.current_edge_index = edge.next_incoming_edge;
        Some(edge.source)
    }
}

pub struct Successors<'graph, V, E> {
    graph: &'graph Graph<V, E>,
    current_edge_index: Option<EdgeIndex>,
}

impl<'graph, V, E> Iterator for Successors<'graph, V, E> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let edge = &self.graph.edges[self.current_edge_index?];
        self.current_edge_index = edge.next_outgoing_edge;
        Some(edge.target)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Transforms a tree into a string for easier verification.
    fn tree_to_string(t: &Vec<(Twig, usize)>) -> String {
        let mut display = String::new();
        for node in t {
            display.push_str(&format!("{}{}\n", node.0, node.1));
        }
        display
    }

    /// 0 -> 2, 1 -> 2, 2 -> 3, 1 -> 3
    fn diamond() -> Graph<(), ()> {
        let mut g = Graph::new();
        for _ in 0..4 {
            g.add_node(());
        }
        g.add_edge(0, 2, ());
        g.add_edge(1, 2, ());
        g.add_edge(2, 3, ());
        g.add_edge(1, 3, ());
        g
    }

    #[test]
    fn add_edge() {
        let mut g = diamond();
        assert_eq!(g.get_node(3), Some(&()));
        assert_eq!(g.get_node(4), None);
        assert_eq!(g.add_edge(0, 2, ()), EdgeStatus::AlreadyExists);
        assert_eq!(g.add_edge(1, 1, ()), EdgeStatus::SelfLoop);
        assert_eq!(g.add_edge(9, 1, ()), EdgeStatus::MissingSource);
        assert_eq!(g.add_edge(1, 9, ()), EdgeStatus::MissingTarget);
        assert_eq!(g.add_edge(0, 3, ()), EdgeStatus::Success);
        assert_eq!(g.has_edge(0, 3), true);
        assert_eq!(g.has_edge(3, 0), false);
    }

    #[test]
    fn degrees() {
        let g = diamond();
        assert_eq!(g.predecessors(2).count(), 2);
        assert_eq!(g.predecessors(0).count(), 0);
        assert_eq!(g.find_roots(), vec![3]);
    }

    #[test]
    fn topological_sort_breaks_ties_by_index() {
        let mut g: Graph<(), ()> = Graph::new();
        for _ in 0..5 {
            g.add_node(());
        }
        g.add_edge(3, 0, ());
        g.add_edge(4, 1, ());
        assert_eq!(g.topological_sort(), Ok(vec![2, 3, 0, 4, 1]));
        assert_eq!(diamond().topological_sort(), Ok(vec![0, 1, 2, 3]));
    }

    #[test]
    fn topological_sort_reports_cycle() {
        let mut g: Graph<(), ()> = Graph::new();
        for _ in 0..4 {
            g.add_node(());
        }
        g.add_edge(0, 1, ());
        g.add_edge(1, 2, ());
        g.add_edge(2, 1, ());
        g.add_edge(2, 3, ());
        assert_eq!(g.topological_sort(), Err(vec![1, 2, 1]));
        // the cycle is outside of what node 0 needs
        assert_eq!(g.topological_sort_within(&g.ancestors(0)), Ok(vec![0]));
        assert_eq!(g.topological_sort_within(&g.ancestors(3)), Err(vec![1, 2, 1]));
    }

    #[test]
    fn topological_sort_within() {
        let g = diamond();
        let set: HashSet<NodeIndex> = [3, 1, 0].into_iter().collect();
        assert_eq!(g.topological_sort_within(&set), Ok(vec![0, 1, 3]));
    }

    #[test]
    fn ancestors() {
        let g = diamond();
        let mut up: Vec<NodeIndex> = g.ancestors(2).into_iter().collect();
        up.sort();
        assert_eq!(up, vec![0, 1, 2]);
        assert_eq!(g.topological_sort_within(&g.ancestors(0)), Ok(vec![0]));
    }

    #[test]
    fn treeview() {
        let g = diamond();
        let tree = g.treeview(3);
        assert_eq!(
            tree_to_string(&tree),
            "\
3
├─ 1
└─ 2
   ├─ 0
   └─ 1
"
        );
        assert_eq!(tree[1].0.to_ascii(), "+- ");
    }

    #[test]
    fn treeview_stops_at_cycle() {
        let mut g: Graph<(), ()> = Graph::new();
        g.add_node(());
        g.add_node(());
        g.add_edge(0, 1, ());
        g.add_edge(1, 0, ());
        assert_eq!(
            tree_to_string(&g.treeview(0)),
            "\
0
└─ 1
   └─ 0
"
        );
    }
}
