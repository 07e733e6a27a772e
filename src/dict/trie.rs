//! Trie Dictionary
//!
//! One node per symbol.  The encoder keeps a cursor on the node of the current match
//! and steps down one child per input symbol, so a probe is a single child lookup.

use super::Dictionary;
use crate::tools::node_pool::{NodePool,NodeId,ROOT};
use crate::{Code,BASE_CODES};

/// Cursor is the node of the current match along with its code
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct TrieCursor {
    pub node: NodeId,
    pub code: Code
}

pub struct TrieDictionary {
    pool: NodePool<()>,
    next_code: Code
}

impl TrieDictionary {
    /// node for the empty string
    pub fn root(&self) -> NodeId {
        ROOT
    }
    /// single symbol step
    pub fn descend(&self,node: NodeId,sym: u8) -> Option<NodeId> {
        self.pool.child(node,sym)
    }
    pub fn code(&self,node: NodeId) -> Option<Code> {
        self.pool.get(node).code
    }
    /// Link a new node under `parent` with the next code.
    /// Panics if `parent` already has a child under `sym`.
    pub fn insert_next(&mut self,parent: NodeId,sym: u8) -> (Code,NodeId) {
        let code = self.next_code;
        let node = self.pool.spawn(parent,sym,(),Some(code));
        self.next_code += 1;
        (code,node)
    }
}

impl Dictionary for TrieDictionary {
    type Cursor = TrieCursor;
    fn create() -> Self {
        let mut pool = NodePool::create(());
        for i in 0..BASE_CODES {
            pool.spawn(ROOT,i as u8,(),Some(i));
        }
        Self {
            pool,
            next_code: BASE_CODES
        }
    }
    fn next_code(&self) -> Code {
        self.next_code
    }
    fn single(&self,sym: u8) -> TrieCursor {
        // base nodes were spawned in symbol order right after the root
        TrieCursor {
            node: ROOT + 1 + sym as NodeId,
            code: sym as Code
        }
    }
    fn extend(&self,curr: &TrieCursor,sym: u8) -> Option<TrieCursor> {
        let node = self.descend(curr.node,sym)?;
        self.code(node).map(|code| TrieCursor {
            node,
            code
        })
    }
    fn code_of(&self,curr: &TrieCursor) -> Code {
        curr.code
    }
    fn add(&mut self,curr: &TrieCursor,sym: u8) -> Code {
        self.insert_next(curr.node,sym).0
    }
    fn entries(&self) -> Vec<(Code,Vec<u8>)> {
        self.pool.entries()
    }
    fn node_count(&self) -> usize {
        self.pool.len()
    }
}

#[test]
fn base_nodes() {
    let dict = TrieDictionary::create();
    assert_eq!(dict.node_count(),257);
    assert_eq!(dict.code(dict.root()),None);
    for sym in [0u8,65,255] {
        let node = dict.descend(dict.root(),sym).expect("base node missing");
        assert_eq!(dict.code(node),Some(sym as Code));
        assert_eq!(dict.single(sym),TrieCursor { node, code: sym as Code });
    }
}

#[test]
fn insert_and_descend() {
    let mut dict = TrieDictionary::create();
    let t = dict.descend(dict.root(),b'T').unwrap();
    let (code,to) = dict.insert_next(t,b'O');
    assert_eq!(code,256);
    assert_eq!(dict.descend(t,b'O'),Some(to));
    let (code,_) = dict.insert_next(to,b'B');
    assert_eq!(code,257);
    assert_eq!(dict.next_code(),258);
    assert_eq!(dict.entries()[256..],[(256,b"TO".to_vec()),(257,b"TOB".to_vec())]);
}

#[test]
#[should_panic]
fn insert_existing_child() {
    let mut dict = TrieDictionary::create();
    dict.insert_next(dict.root(),b'A');
}
