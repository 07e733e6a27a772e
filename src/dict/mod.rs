//! Encoder Dictionaries
//!
//! The encoder needs to know whether the string matched so far, extended by one more
//! symbol, is already in the dictionary.  How the match is held between steps depends on
//! the structure, so each variant supplies its own `Cursor`:
//!
//! * `flat::FlatDictionary` holds the whole string and hashes it on every probe
//! * `trie::TrieDictionary` holds a node and steps one symbol at a time
//! * `patricia::PatriciaDictionary` holds the whole string and searches it edge by edge
//!
//! All three assign codes the same way, so for the same input they hold the same entries.

pub mod flat;
pub mod trie;
pub mod patricia;

use crate::Code;

/// Contract between the encoder and a dictionary.
/// Every dictionary starts out holding the 256 single symbol strings under codes 0-255.
pub trait Dictionary {
    /// the encoder's handle on the current longest match
    type Cursor: Clone;
    /// create a dictionary holding the base entries only
    fn create() -> Self;
    /// the code the next insertion will receive
    fn next_code(&self) -> Code;
    /// cursor for the single symbol string `sym`, always present
    fn single(&self,sym: u8) -> Self::Cursor;
    /// cursor for `curr` extended by `sym`, or `None` if that string is not an entry
    fn extend(&self,curr: &Self::Cursor,sym: u8) -> Option<Self::Cursor>;
    /// code of the string under the cursor
    fn code_of(&self,curr: &Self::Cursor) -> Code;
    /// Add `curr` extended by `sym` under the next code and return that code.
    /// The extension must not already be an entry.
    fn add(&mut self,curr: &Self::Cursor,sym: u8) -> Code;
    /// all entries as (code,string), ascending by code
    fn entries(&self) -> Vec<(Code,Vec<u8>)>;
    /// number of nodes (or entries for the flat map) the structure uses
    fn node_count(&self) -> usize;
}

/// Cursor for dictionaries that are probed with the whole string
#[derive(Clone,Debug,PartialEq)]
pub struct StringMatch {
    pub string: Vec<u8>,
    pub code: Code
}

impl StringMatch {
    pub fn single(sym: u8) -> Self {
        Self {
            string: vec![sym],
            code: sym as Code
        }
    }
    /// the probe string: this match extended by `sym`
    pub fn probe(&self,sym: u8) -> Vec<u8> {
        let mut ans = Vec::with_capacity(self.string.len()+1);
        ans.extend_from_slice(&self.string);
        ans.push(sym);
        ans
    }
}

/// Dictionary of a variant chosen at run time, kept after compression for diagnostics
pub enum AnyDictionary {
    Flat(flat::FlatDictionary),
    Trie(trie::TrieDictionary),
    Patricia(patricia::PatriciaDictionary)
}

impl AnyDictionary {
    pub fn entries(&self) -> Vec<(Code,Vec<u8>)> {
        match self {
            AnyDictionary::Flat(d) => d.entries(),
            AnyDictionary::Trie(d) => d.entries(),
            AnyDictionary::Patricia(d) => d.entries()
        }
    }
    pub fn node_count(&self) -> usize {
        match self {
            AnyDictionary::Flat(d) => d.node_count(),
            AnyDictionary::Trie(d) => d.node_count(),
            AnyDictionary::Patricia(d) => d.node_count()
        }
    }
}
