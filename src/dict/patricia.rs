//! Patricia Dictionary
//!
//! Path compressed trie: the edge into each node carries a label of one or more symbols,
//! so chains of single child nodes collapse into one edge.  The encoder searches the whole
//! extended match on every symbol, paying per edge rather than per symbol.
//!
//! Structural rules, kept up by `insert` without any repair pass:
//! * every non-root node's label is non-empty and it is filed under the label's first symbol
//! * no non-root node has exactly one child and no code
//!
//! An LZW dictionary is prefix closed, so when it is grown by the encoder every entry
//! ends on a node and every new edge is one symbol.  Longer labels and splits come into
//! play when arbitrary strings are inserted directly.

use super::{Dictionary,StringMatch};
use crate::tools::node_pool::{NodePool,NodeId,ROOT};
use crate::{Code,BASE_CODES};

pub struct PatriciaDictionary {
    pool: NodePool<Vec<u8>>,
    next_code: Code
}

/// length of the common prefix
fn match_len(label: &[u8],rest: &[u8]) -> usize {
    label.iter().zip(rest.iter()).take_while(|(a,b)| a==b).count()
}

impl PatriciaDictionary {
    /// Code of `string` if it is an entry.  Fails if the string runs off the end of
    /// the tree, or stops or diverges partway along an edge.
    pub fn search(&self,string: &[u8]) -> Option<Code> {
        let mut curr = ROOT;
        let mut idx = 0;
        while idx < string.len() {
            let rest = &string[idx..];
            let child = self.pool.child(curr,rest[0])?;
            let label = &self.pool.get(child).edge;
            if match_len(label,rest) < label.len() {
                return None;
            }
            idx += label.len();
            curr = child;
        }
        self.pool.get(curr).code
    }
    /// Insert `string` under `code`.  If the string is already an entry this does nothing,
    /// the existing code is never overwritten.  Inserting the empty string does nothing.
    pub fn insert(&mut self,string: &[u8],code: Code) {
        let mut curr = ROOT;
        let mut idx = 0;
        while idx < string.len() {
            let rest = &string[idx..];
            let child = match self.pool.child(curr,rest[0]) {
                Some(c) => c,
                None => {
                    // nothing under this symbol, the rest of the string becomes one edge
                    self.pool.spawn(curr,rest[0],rest.to_vec(),Some(code));
                    return;
                }
            };
            let label_len = self.pool.get(child).edge.len();
            let matched = match_len(&self.pool.get(child).edge,rest);
            if matched < label_len {
                self.split(child,matched,&rest[matched..],code);
                return;
            }
            idx += matched;
            curr = child;
        }
        let node = self.pool.get_mut(curr);
        match node.code {
            None => node.code = Some(code),
            Some(existing) => log::trace!("duplicate insertion of code {}, keeping {}",code,existing)
        }
    }
    /// Split the edge into `node` after `at` symbols.  The node keeps the common part of
    /// its label; its code and children move down to a new node labeled with the rest.
    /// The new string then hangs off `node` as a leaf, or ends at `node` if `new_suffix`
    /// is empty.
    fn split(&mut self,node: NodeId,at: usize,new_suffix: &[u8],code: Code) {
        if at == 0 {
            panic!("label of node {} does not start with its key",node);
        }
        let n = self.pool.get_mut(node);
        let old_suffix = n.edge.split_off(at);
        let old_code = n.code.take();
        let old_children = std::mem::take(&mut n.children);
        let moved = self.pool.spawn(node,old_suffix[0],old_suffix,old_code);
        self.pool.get_mut(moved).children = old_children;
        match new_suffix.first() {
            Some(key) => {
                self.pool.spawn(node,*key,new_suffix.to_vec(),Some(code));
            },
            None => {
                self.pool.get_mut(node).code = Some(code);
            }
        }
    }
    /// Insert `string` under the next code and return that code.
    pub fn insert_next(&mut self,string: &[u8]) -> Code {
        let code = self.next_code;
        self.insert(string,code);
        self.next_code += 1;
        code
    }
    /// Check the structural rules by walking the whole tree.
    pub fn is_maximally_compressed(&self) -> bool {
        let mut ans = true;
        self.pool.walk(|id,node,_path| {
            if id != ROOT && node.children.len() == 1 && node.code.is_none() {
                log::debug!("node {} is redundant",id);
                ans = false;
            }
            for (key,child) in node.children.iter() {
                if self.pool.get(*child).edge.first() != Some(key) {
                    log::debug!("node {} is misfiled under {}",child,key);
                    ans = false;
                }
            }
        });
        ans
    }
}

impl Dictionary for PatriciaDictionary {
    type Cursor = StringMatch;
    fn create() -> Self {
        let mut pool = NodePool::create(Vec::new());
        for i in 0..BASE_CODES {
            pool.spawn(ROOT,i as u8,vec![i as u8],Some(i));
        }
        Self {
            pool,
            next_code: BASE_CODES
        }
    }
    fn next_code(&self) -> Code {
        self.next_code
    }
    fn single(&self,sym: u8) -> StringMatch {
        StringMatch::single(sym)
    }
    fn extend(&self,curr: &StringMatch,sym: u8) -> Option<StringMatch> {
        let probe = curr.probe(sym);
        self.search(&probe).map(|code| StringMatch {
            string: probe,
            code
        })
    }
    fn code_of(&self,curr: &StringMatch) -> Code {
        curr.code
    }
    fn add(&mut self,curr: &StringMatch,sym: u8) -> Code {
        self.insert_next(&curr.probe(sym))
    }
    fn entries(&self) -> Vec<(Code,Vec<u8>)> {
        self.pool.entries()
    }
    fn node_count(&self) -> usize {
        self.pool.len()
    }
}

#[test]
fn leaf_takes_whole_remainder() {
    let mut dict = PatriciaDictionary::create();
    dict.insert(b"banana",300);
    // one new node for the whole run after 'b'
    assert_eq!(dict.node_count(),258);
    assert_eq!(dict.search(b"banana"),Some(300));
    assert_eq!(dict.search(b"ban"),None);
    assert_eq!(dict.search(b"bananas"),None);
    assert_eq!(dict.search(b"b"),Some(b'b' as Code));
    assert!(dict.is_maximally_compressed());
}

#[test]
fn split_with_two_leaves() {
    let mut dict = PatriciaDictionary::create();
    dict.insert(b"banana",300);
    dict.insert(b"bandana",301);
    // "anana" splits into "an" + "ana", "dana" hangs off the split
    assert_eq!(dict.node_count(),260);
    assert_eq!(dict.search(b"banana"),Some(300));
    assert_eq!(dict.search(b"bandana"),Some(301));
    assert_eq!(dict.search(b"ban"),None);
    assert!(dict.is_maximally_compressed());
    assert_eq!(dict.entries()[256..],[(300,b"banana".to_vec()),(301,b"bandana".to_vec())]);
}

#[test]
fn split_ending_on_the_split() {
    let mut dict = PatriciaDictionary::create();
    dict.insert(b"banana",300);
    dict.insert(b"ban",301);
    assert_eq!(dict.node_count(),259);
    assert_eq!(dict.search(b"ban"),Some(301));
    assert_eq!(dict.search(b"banana"),Some(300));
    assert_eq!(dict.search(b"bana"),None);
    assert!(dict.is_maximally_compressed());
}

#[test]
fn split_carries_children() {
    let mut dict = PatriciaDictionary::create();
    dict.insert(b"abcdef",300);
    dict.insert(b"abcdxy",301);
    dict.insert(b"abqq",302);
    // the second split moves "cd" along with both of its children
    assert_eq!(dict.search(b"abcdef"),Some(300));
    assert_eq!(dict.search(b"abcdxy"),Some(301));
    assert_eq!(dict.search(b"abqq"),Some(302));
    assert_eq!(dict.search(b"abcd"),None);
    assert!(dict.is_maximally_compressed());
}

#[test]
fn duplicate_insertion_is_ignored() {
    let mut dict = PatriciaDictionary::create();
    dict.insert(b"tobe",300);
    dict.insert(b"tobe",301);
    dict.insert(b"A",302);
    assert_eq!(dict.search(b"tobe"),Some(300));
    assert_eq!(dict.search(b"A"),Some(65));
    assert_eq!(dict.node_count(),258);
    // the empty string is never an entry
    dict.insert(b"",303);
    assert_eq!(dict.search(b""),None);
    assert_eq!(dict.node_count(),258);
}

#[test]
fn fewer_nodes_than_a_trie() {
    let words: [&[u8];4] = [b"compression",b"compressor",b"computer",b"compile"];
    let mut dict = PatriciaDictionary::create();
    let mut prefixes = std::collections::HashSet::new();
    for (i,w) in words.iter().enumerate() {
        dict.insert(w,300+i);
        for end in 2..=w.len() {
            prefixes.insert(w[0..end].to_vec());
        }
    }
    // a trie needs the root, the 256 base nodes, and one node per longer prefix
    let trie_nodes = 257 + prefixes.len();
    assert!(dict.node_count() < trie_nodes);
    assert!(dict.is_maximally_compressed());
    for (i,w) in words.iter().enumerate() {
        assert_eq!(dict.search(w),Some(300+i));
    }
}
