//! Flat Dictionary
//!
//! Exact match hash map from strings to codes.  The encoder re-hashes the entire
//! accumulated string on every symbol, so a probe costs time proportional to the match
//! length.  This is kept as the baseline the tree dictionaries are measured against.

use std::collections::HashMap;
use super::{Dictionary,StringMatch};
use crate::{Code,BASE_CODES};

pub struct FlatDictionary {
    map: HashMap<Vec<u8>,Code>,
    next_code: Code
}

impl FlatDictionary {
    /// exact match only
    pub fn lookup(&self,string: &[u8]) -> Option<Code> {
        self.map.get(string).copied()
    }
    /// Record `string` under the next code and return it.
    /// An existing entry keeps its code, but the code is still used up.
    pub fn insert_next(&mut self,string: Vec<u8>) -> Code {
        let code = self.next_code;
        self.map.entry(string).or_insert(code);
        self.next_code += 1;
        code
    }
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl Dictionary for FlatDictionary {
    type Cursor = StringMatch;
    fn create() -> Self {
        let mut map = HashMap::new();
        for i in 0..BASE_CODES {
            map.insert(vec![i as u8],i);
        }
        Self {
            map,
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
        self.lookup(&probe).map(|code| StringMatch {
            string: probe,
            code
        })
    }
    fn code_of(&self,curr: &StringMatch) -> Code {
        curr.code
    }
    fn add(&mut self,curr: &StringMatch,sym: u8) -> Code {
        self.insert_next(curr.probe(sym))
    }
    fn entries(&self) -> Vec<(Code,Vec<u8>)> {
        let mut ans: Vec<(Code,Vec<u8>)> = self.map.iter().map(|(s,c)| (*c,s.clone())).collect();
        ans.sort_by_key(|(code,_)| *code);
        ans
    }
    fn node_count(&self) -> usize {
        self.map.len()
    }
}

#[test]
fn base_entries() {
    let dict = FlatDictionary::create();
    assert_eq!(dict.len(),256);
    assert_eq!(dict.lookup(b"A"),Some(65));
    assert_eq!(dict.lookup(&[255]),Some(255));
    assert_eq!(dict.lookup(b"AB"),None);
    assert_eq!(dict.lookup(b""),None);
}

#[test]
fn sequential_codes() {
    let mut dict = FlatDictionary::create();
    assert_eq!(dict.insert_next(b"AB".to_vec()),256);
    assert_eq!(dict.insert_next(b"BA".to_vec()),257);
    assert_eq!(dict.lookup(b"AB"),Some(256));
    assert_eq!(dict.lookup(b"BA"),Some(257));
    assert_eq!(dict.next_code(),258);
    // re-inserting does not move the entry
    assert_eq!(dict.insert_next(b"AB".to_vec()),258);
    assert_eq!(dict.lookup(b"AB"),Some(256));
}

#[test]
fn cursor_extension() {
    let mut dict = FlatDictionary::create();
    let a = dict.single(b'A');
    assert!(dict.extend(&a,b'B').is_none());
    assert_eq!(dict.add(&a,b'B'),256);
    let ab = dict.extend(&a,b'B').expect("AB should be present");
    assert_eq!(ab.string,b"AB".to_vec());
    assert_eq!(dict.code_of(&ab),256);
}
