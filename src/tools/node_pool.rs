//! Node pool for the trie dictionaries
//!
//! Nodes live in a single vector and refer to each other by index.  A node's children
//! can therefore be handed over to another node (as the Patricia split requires) without
//! disturbing any other index held by the caller.  Nodes are never freed, the pool only
//! grows until it is dropped.

use std::collections::HashMap;
use crate::Code;

pub type NodeId = usize;

/// the root is always the first node in the pool
pub const ROOT: NodeId = 0;

/// Label on the edge leading into a node.
/// A node is always filed in its parent under the first symbol of its edge.
pub trait Edge {
    /// append the symbols of the edge to `path`, `key` is the symbol the edge is filed under
    fn extend_path(&self,key: u8,path: &mut Vec<u8>);
}

/// trie edges are the key itself
impl Edge for () {
    fn extend_path(&self,key: u8,path: &mut Vec<u8>) {
        path.push(key);
    }
}

/// Patricia edges carry the whole compressed run
impl Edge for Vec<u8> {
    fn extend_path(&self,_key: u8,path: &mut Vec<u8>) {
        path.extend_from_slice(self);
    }
}

pub struct Node<E: Edge> {
    pub edge: E,
    /// code of the string that ends at this node, if any
    pub code: Option<Code>,
    pub children: HashMap<u8,NodeId>
}

pub struct NodePool<E: Edge> {
    nodes: Vec<Node<E>>
}

impl <E: Edge> NodePool<E> {
    /// create a pool holding only the root
    pub fn create(root_edge: E) -> Self {
        Self {
            nodes: vec![Node {
                edge: root_edge,
                code: None,
                children: HashMap::new()
            }]
        }
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn get(&self,id: NodeId) -> &Node<E> {
        &self.nodes[id]
    }
    pub fn get_mut(&mut self,id: NodeId) -> &mut Node<E> {
        &mut self.nodes[id]
    }
    /// child of `id` filed under `sym`
    pub fn child(&self,id: NodeId,sym: u8) -> Option<NodeId> {
        self.nodes[id].children.get(&sym).copied()
    }
    /// Create a node and file it under `parent` with key `key`.
    /// Panics if the slot is taken, callers must check first.
    pub fn spawn(&mut self,parent: NodeId,key: u8,edge: E,code: Option<Code>) -> NodeId {
        let id = self.nodes.len();
        if self.nodes[parent].children.contains_key(&key) {
            panic!("node {} already has a child under {}",parent,key);
        }
        self.nodes.push(Node {
            edge,
            code,
            children: HashMap::new()
        });
        self.nodes[parent].children.insert(key,id);
        id
    }
    /// Visit every node depth first, passing the node and the string spelled out by the
    /// edges from the root down to it.  Uses an explicit stack so deep trees are fine.
    pub fn walk<F>(&self,mut visit: F) where F: FnMut(NodeId,&Node<E>,&[u8]) {
        let mut path: Vec<u8> = Vec::new();
        // (node, key it is filed under, length of the parent's path)
        let mut stack: Vec<(NodeId,Option<u8>,usize)> = vec![(ROOT,None,0)];
        while let Some((id,key,parent_len)) = stack.pop() {
            // everything visited since the parent lies in the parent's subtree,
            // so truncating restores the parent's path
            path.truncate(parent_len);
            let node = &self.nodes[id];
            if let Some(k) = key {
                node.edge.extend_path(k,&mut path);
            }
            visit(id,node,&path);
            for (k,child) in node.children.iter() {
                stack.push((*child,Some(*k),path.len()));
            }
        }
    }
    /// all (code,string) pairs in the tree, ascending by code
    pub fn entries(&self) -> Vec<(Code,Vec<u8>)> {
        let mut ans = Vec::new();
        self.walk(|_id,node,path| {
            if let Some(code) = node.code {
                ans.push((code,path.to_vec()));
            }
        });
        ans.sort_by_key(|(code,_)| *code);
        ans
    }
}

#[test]
fn spawn_and_find() {
    let mut pool: NodePool<()> = NodePool::create(());
    let a = pool.spawn(ROOT,b'a',(),Some(97));
    let ab = pool.spawn(a,b'b',(),Some(256));
    assert_eq!(pool.len(),3);
    assert_eq!(pool.child(ROOT,b'a'),Some(a));
    assert_eq!(pool.child(a,b'b'),Some(ab));
    assert_eq!(pool.child(a,b'c'),None);
}

#[test]
#[should_panic]
fn spawn_into_occupied_slot() {
    let mut pool: NodePool<()> = NodePool::create(());
    pool.spawn(ROOT,b'a',(),Some(97));
    pool.spawn(ROOT,b'a',(),Some(98));
}

#[test]
fn walk_spells_labels() {
    let mut pool: NodePool<Vec<u8>> = NodePool::create(Vec::new());
    let to = pool.spawn(ROOT,b't',b"to".to_vec(),Some(300));
    pool.spawn(to,b'b',b"be".to_vec(),Some(302));
    pool.spawn(to,b'p',b"p".to_vec(),Some(301));
    pool.spawn(ROOT,b'x',b"xyz".to_vec(),None);
    let entries = pool.entries();
    assert_eq!(entries,vec![
        (300,b"to".to_vec()),
        (301,b"top".to_vec()),
        (302,b"tobe".to_vec())
    ]);
}
