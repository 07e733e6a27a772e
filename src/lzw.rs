//! LZW Compression
//!
//! Codes are produced and consumed as plain integers, packing them into bytes is up to
//! the caller.  The encoder is generic over `dict::Dictionary`.  The decoder always
//! rebuilds the dictionary as a `CodeTable`, whichever variant produced the codes; this
//! works because both sides hand out codes 256, 257, ... in the same order.
//!
//! The code space is unbounded unless `Options::max_code_width` is set, in which case
//! `Options::exhaustion` decides between freezing the dictionary and failing.

use crate::dict::{Dictionary,AnyDictionary};
use crate::dict::flat::FlatDictionary;
use crate::dict::trie::TrieDictionary;
use crate::dict::patricia::PatriciaDictionary;
use crate::{Code,Error,Exhaustion,Method,Options,BASE_CODES};

/// Tracks whether new codes can still be handed out.
/// Shared by encoder and decoder so both stop at the same code.
struct CodeSpace {
    max_code: Option<Code>,
    width: u32,
    exhaustion: Exhaustion,
    frozen: bool
}

impl CodeSpace {
    fn create(opt: &Options) -> Result<Self,Error> {
        Ok(Self {
            max_code: opt.max_code()?,
            width: opt.max_code_width.unwrap_or(0),
            exhaustion: opt.exhaustion,
            frozen: false
        })
    }
    /// Whether `code` may be assigned.  `Ok(false)` means the dictionary is frozen.
    fn admit(&mut self,code: Code) -> Result<bool,Error> {
        match self.max_code {
            Some(max) if code > max => match self.exhaustion {
                Exhaustion::Freeze => {
                    if !self.frozen {
                        log::warn!("{} bit code space used up, dictionary is frozen",self.width);
                        self.frozen = true;
                    }
                    Ok(false)
                },
                Exhaustion::Fail => Err(Error::CodeSpaceExhausted(self.width))
            },
            _ => Ok(true)
        }
    }
}

/// Code table element: the code of the prefix string and the symbol appended to it.
/// Single symbol strings have no prefix.
#[derive(Clone)]
struct Link {
    prefix: Option<Code>,
    sym: u8
}

/// Decoder's dictionary, maps codes back to strings.  Only ever grows.
pub struct CodeTable {
    links: Vec<Link>
}

impl CodeTable {
    /// table holding the 256 single symbol strings
    pub fn create() -> Self {
        Self {
            links: (0..BASE_CODES).map(|i| Link { prefix: None, sym: i as u8 }).collect()
        }
    }
    /// the code the next registration will receive
    pub fn next_code(&self) -> Code {
        self.links.len()
    }
    pub fn contains(&self,code: Code) -> bool {
        code < self.links.len()
    }
    /// Walk back through the prefix links to form the string.
    pub fn get_string(&self,code: Code) -> Option<Vec<u8>> {
        let mut rev = Vec::new();
        let mut link = self.links.get(code)?;
        loop {
            rev.push(link.sym);
            match link.prefix {
                Some(prefix) => link = &self.links[prefix],
                None => break
            }
        }
        rev.reverse();
        Some(rev)
    }
    /// Register the string for `prefix` extended by `sym` under the next code.
    pub fn register(&mut self,prefix: Code,sym: u8) -> Code {
        let code = self.links.len();
        self.links.push(Link { prefix: Some(prefix), sym });
        code
    }
}

/// Structure to perform LZW compression over dictionary `D`.
/// The dictionary is rebuilt at the start of every call to `compress`.
pub struct Compressor<D: Dictionary> {
    opt: Options,
    dict: D
}

impl <D: Dictionary> Compressor<D> {
    /// Fails if the options carry an unusable code width.
    pub fn create(opt: &Options) -> Result<Self,Error> {
        opt.max_code()?;
        Ok(Self {
            opt: opt.clone(),
            dict: D::create()
        })
    }
    /// Greedy longest match: extend the match while the dictionary has it, otherwise emit
    /// the match, add the extension, and restart from the symbol that did not fit.
    pub fn compress(&mut self,symbols: &[u8]) -> Result<Vec<Code>,Error> {
        log::debug!("create LZW dictionary");
        self.dict = D::create();
        let mut space = CodeSpace::create(&self.opt)?;
        let mut ans = Vec::new();
        let mut curr_match: Option<D::Cursor> = None;
        log::debug!("entering loop over symbols");
        for &sym in symbols {
            let curr = match curr_match.take() {
                Some(c) => c,
                None => {
                    curr_match = Some(self.dict.single(sym));
                    continue;
                }
            };
            match self.dict.extend(&curr,sym) {
                Some(longer) => curr_match = Some(longer),
                None => {
                    let code = self.dict.code_of(&curr);
                    log::trace!("code: {}",code);
                    ans.push(code);
                    if space.admit(self.dict.next_code())? {
                        let added = self.dict.add(&curr,sym);
                        log::trace!("add {} extending {} by {}",added,code,sym);
                    }
                    curr_match = Some(self.dict.single(sym));
                }
            }
        }
        if let Some(curr) = curr_match {
            ans.push(self.dict.code_of(&curr));
        }
        log::debug!("{} symbols coded as {} codes",symbols.len(),ans.len());
        Ok(ans)
    }
    /// dictionary as left by the last call to `compress`
    pub fn dictionary(&self) -> &D {
        &self.dict
    }
    pub fn into_dictionary(self) -> D {
        self.dict
    }
}

/// Compress `symbols` using dictionary variant `D`.
pub fn compress<D: Dictionary>(symbols: &[u8],opt: &Options) -> Result<Vec<Code>,Error> {
    Compressor::<D>::create(opt)?.compress(symbols)
}

fn compress_into<D: Dictionary>(symbols: &[u8],opt: &Options,wrap: fn(D) -> AnyDictionary) -> Result<(Vec<Code>,AnyDictionary),Error> {
    let mut lzw = Compressor::<D>::create(opt)?;
    let codes = lzw.compress(symbols)?;
    Ok((codes,wrap(lzw.into_dictionary())))
}

/// Compress `symbols` with a dictionary variant chosen at run time.
/// The dictionary is returned along with the codes so it can be inspected.
pub fn compress_with(method: Method,symbols: &[u8],opt: &Options) -> Result<(Vec<Code>,AnyDictionary),Error> {
    match method {
        Method::Flat => compress_into::<FlatDictionary>(symbols,opt,AnyDictionary::Flat),
        Method::Trie => compress_into::<TrieDictionary>(symbols,opt,AnyDictionary::Trie),
        Method::Patricia => compress_into::<PatriciaDictionary>(symbols,opt,AnyDictionary::Patricia)
    }
}

/// Rebuild the symbols from `codes`.  The options must match those used to compress.
/// A code that is neither in the table nor the very next code to be assigned
/// is an `Error::InvalidCode`, and decoding stops there.
pub fn decompress(codes: &[Code],opt: &Options) -> Result<Vec<u8>,Error> {
    log::debug!("create code table");
    let mut table = CodeTable::create();
    let mut space = CodeSpace::create(opt)?;
    let mut ans = Vec::new();
    let mut iter = codes.iter();
    let mut prev_code = match iter.next() {
        Some(c) => *c,
        None => return Ok(ans)
    };
    let mut prev_str = match table.get_string(prev_code) {
        Some(s) => s,
        None => {
            log::error!("stream opens with code {}",prev_code);
            return Err(Error::InvalidCode { code: prev_code, expected: BASE_CODES - 1 });
        }
    };
    ans.extend_from_slice(&prev_str);
    log::debug!("enter main LZW loop");
    for &code in iter {
        let next_code = table.next_code();
        let can_add = space.admit(next_code)?;
        let curr_str = match table.get_string(code) {
            Some(s) => s,
            None if can_add && code == next_code => {
                // the encoder used this entry in the same step that created it
                let mut s = prev_str.clone();
                s.push(prev_str[0]);
                s
            },
            None => {
                let expected = if can_add { next_code } else { next_code - 1 };
                log::error!("Bad LZW code, expected at most {}, got {}",expected,code);
                return Err(Error::InvalidCode { code, expected });
            }
        };
        if can_add {
            table.register(prev_code,curr_str[0]);
            log::trace!("add {} linking to {}.{}",next_code,prev_code,curr_str[0]);
        }
        ans.extend_from_slice(&curr_str);
        log::trace!("  write {} as {:?}",code,curr_str);
        prev_code = code;
        prev_str = curr_str;
    }
    Ok(ans)
}


// *************** TESTS *****************

#[cfg(test)]
fn pseudo_random_text(len: usize) -> Vec<u8> {
    use proptest::strategy::{Strategy,ValueTree};
    // small alphabet so matches actually grow, fixed seed so every run sees the same text
    let mut runner = proptest::test_runner::TestRunner::deterministic();
    proptest::collection::vec(b'a'..=b'h',len)
        .new_tree(&mut runner)
        .expect("could not generate text")
        .current()
}

#[test]
fn empty_and_single() {
    for m in Method::ALL {
        let (codes,_) = compress_with(m,&[],&crate::STD_OPTIONS).expect("compression failed");
        assert!(codes.is_empty());
        for x in [0u8,b'x',255] {
            let (codes,_) = compress_with(m,&[x],&crate::STD_OPTIONS).expect("compression failed");
            assert_eq!(codes,vec![x as Code]);
        }
    }
    assert_eq!(decompress(&[],&crate::STD_OPTIONS),Ok(Vec::new()));
}

#[test]
fn self_referencing_code() {
    // ABABABA ends on ABA, which is coded in the step that creates it
    for m in Method::ALL {
        let (codes,_) = compress_with(m,b"ABABABA",&crate::STD_OPTIONS).expect("compression failed");
        assert_eq!(codes,vec![65,66,256,258]);
    }
    assert_eq!(decompress(&[65,66,256,258],&crate::STD_OPTIONS),Ok(b"ABABABA".to_vec()));
    assert_eq!(decompress(&[97,256,257,97],&crate::STD_OPTIONS),Ok(b"aaaaaaa".to_vec()));
}

#[test]
fn compression_works() {
    // Example adapted from wikipedia, with all 256 byte values as base codes
    let test_data = "TOBEORNOTTOBEORTOBEORNOT".as_bytes();
    let expected: Vec<Code> = vec![84,79,66,69,79,82,78,79,84,256,258,260,265,259,261,263];
    for m in Method::ALL {
        let (codes,_) = compress_with(m,test_data,&crate::STD_OPTIONS).expect("compression failed");
        assert_eq!(codes,expected);
        let expanded = decompress(&codes,&crate::STD_OPTIONS).expect("expansion failed");
        assert_eq!(test_data.to_vec(),expanded);
    }
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let flat = compress::<FlatDictionary>(test_data,&crate::STD_OPTIONS).expect("compression failed");
    let trie = compress::<TrieDictionary>(test_data,&crate::STD_OPTIONS).expect("compression failed");
    let patricia = compress::<PatriciaDictionary>(test_data,&crate::STD_OPTIONS).expect("compression failed");
    assert_eq!(flat,trie);
    assert_eq!(flat,patricia);
    let expanded = decompress(&flat,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn dictionaries_agree() {
    let test_data = pseudo_random_text(3000);
    let (_,flat) = compress_with(Method::Flat,&test_data,&crate::STD_OPTIONS).expect("compression failed");
    let (_,trie) = compress_with(Method::Trie,&test_data,&crate::STD_OPTIONS).expect("compression failed");
    let (_,patricia) = compress_with(Method::Patricia,&test_data,&crate::STD_OPTIONS).expect("compression failed");
    let entries = flat.entries();
    assert!(entries.len() > 256);
    assert_eq!(entries,trie.entries());
    assert_eq!(entries,patricia.entries());
    // codes are dense
    for (i,(code,_)) in entries.iter().enumerate() {
        assert_eq!(i,*code);
    }
    // a prefix closed dictionary gives Patricia nothing to collapse
    assert_eq!(patricia.node_count(),trie.node_count());
    assert_eq!(trie.node_count(),entries.len() + 1);
}

#[test]
fn patricia_stays_compressed() {
    let mut lzw = Compressor::<PatriciaDictionary>::create(&crate::STD_OPTIONS).unwrap();
    lzw.compress(&pseudo_random_text(2000)).expect("compression failed");
    assert!(lzw.dictionary().is_maximally_compressed());
}

#[test]
fn dictionary_is_reset() {
    let mut lzw = Compressor::<TrieDictionary>::create(&crate::STD_OPTIONS).unwrap();
    let first = lzw.compress(b"TOBEORNOTTOBEORTOBEORNOT").expect("compression failed");
    let second = lzw.compress(b"TOBEORNOTTOBEORTOBEORNOT").expect("compression failed");
    assert_eq!(first,second);
}

#[test]
fn invalid_codes() {
    assert_eq!(decompress(&[300],&crate::STD_OPTIONS),Err(Error::InvalidCode { code: 300, expected: 255 }));
    // 256 is the next code here, 257 skips ahead
    assert_eq!(decompress(&[65,257],&crate::STD_OPTIONS),Err(Error::InvalidCode { code: 257, expected: 256 }));
    assert_eq!(decompress(&[65,66,256,1000,65],&crate::STD_OPTIONS),Err(Error::InvalidCode { code: 1000, expected: 258 }));
}

#[test]
fn code_table_strings() {
    let mut table = CodeTable::create();
    assert_eq!(table.next_code(),256);
    assert_eq!(table.get_string(65),Some(b"A".to_vec()));
    assert_eq!(table.register(65,b'B'),256);
    assert_eq!(table.register(256,b'C'),257);
    assert_eq!(table.get_string(257),Some(b"ABC".to_vec()));
    assert!(table.contains(257));
    assert!(!table.contains(258));
    assert_eq!(table.get_string(258),None);
}

#[test]
fn frozen_dictionary() {
    let mut opt = crate::STD_OPTIONS;
    opt.max_code_width = Some(9);
    opt.exhaustion = Exhaustion::Freeze;
    let test_data = pseudo_random_text(5000);
    for m in Method::ALL {
        let (codes,dict) = compress_with(m,&test_data,&opt).expect("compression failed");
        assert!(codes.iter().all(|c| *c < 512));
        assert_eq!(dict.entries().len(),512);
        let expanded = decompress(&codes,&opt).expect("expansion failed");
        assert_eq!(test_data,expanded);
    }
}

#[test]
fn exhausted_code_space() {
    let mut opt = crate::STD_OPTIONS;
    opt.max_code_width = Some(9);
    let test_data = pseudo_random_text(5000);
    for m in Method::ALL {
        assert_eq!(compress_with(m,&test_data,&opt).err(),Some(Error::CodeSpaceExhausted(9)));
    }
    let codes = compress::<TrieDictionary>(&test_data,&crate::STD_OPTIONS).expect("compression failed");
    assert_eq!(decompress(&codes,&opt),Err(Error::CodeSpaceExhausted(9)));
    // a wide enough code space is no different from an unbounded one
    opt.max_code_width = Some(16);
    assert_eq!(compress::<TrieDictionary>(&test_data,&opt),Ok(codes.clone()));
    assert_eq!(decompress(&codes,&opt),Ok(test_data));
}

#[test]
fn frozen_stream_rejects_next_code() {
    let mut opt = crate::STD_OPTIONS;
    opt.max_code_width = Some(9);
    opt.exhaustion = Exhaustion::Freeze;
    let codes = compress::<FlatDictionary>(&pseudo_random_text(5000),&opt).expect("compression failed");
    let mut bad = codes.clone();
    bad.push(512);
    assert_eq!(decompress(&bad,&opt),Err(Error::InvalidCode { code: 512, expected: 511 }));
}
