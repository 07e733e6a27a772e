//! # LZW with adaptive dictionaries
//!
//! LZW compression and expansion where the encoder's dictionary is one of three
//! interchangeable structures: a flat hash map, a character trie, or a path
//! compressed (Patricia) trie.  Codes are produced and consumed as plain integers,
//! packing them into bytes is left to the caller.
//!
//! * `lzw` has the encoder, the decoder, and the decoder's code table
//! * `dict` has the `Dictionary` trait and its three variants
//! * `export` has text formats for code streams and dictionary dumps

mod tools;
pub mod dict;
pub mod lzw;
pub mod export;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// LZW code, values 0-255 are always the single symbol strings
pub type Code = usize;

/// number of single symbol strings seeded into every dictionary
pub const BASE_CODES: usize = 256;

/// Compression Errors
#[derive(thiserror::Error,Debug,PartialEq)]
pub enum Error {
    #[error("bad LZW code {code}, expected at most {expected}")]
    InvalidCode { code: Code, expected: Code },
    #[error("code space of {0} bits exhausted")]
    CodeSpaceExhausted(u32),
    #[error("code width {0} is out of range")]
    InvalidCodeWidth(u32),
    #[error("unknown method {0}")]
    UnknownMethod(String),
    #[error("file format mismatch")]
    FileFormatMismatch
}

/// What to do when the next code would not fit in `max_code_width` bits
#[derive(Clone,Copy,Debug,PartialEq)]
pub enum Exhaustion {
    /// stop adding entries, keep coding with the dictionary as it stands
    Freeze,
    /// abort with `Error::CodeSpaceExhausted`
    Fail
}

/// Options controlling compression
#[derive(Clone,Debug)]
pub struct Options {
    /// Maximum code width in bits, `None` lets codes grow without bound.
    /// Must be in the range 9..=32 if given.
    pub max_code_width: Option<u32>,
    /// policy once the code space is used up
    pub exhaustion: Exhaustion
}

pub const STD_OPTIONS: Options = Options {
    max_code_width: None,
    exhaustion: Exhaustion::Fail
};

impl Options {
    /// Largest code the options admit, or error if the width is unusable.
    pub fn max_code(&self) -> Result<Option<Code>,Error> {
        match self.max_code_width {
            None => Ok(None),
            Some(w) if w < 9 || w > 32 => Err(Error::InvalidCodeWidth(w)),
            Some(w) => match (1 as Code).checked_shl(w) {
                Some(limit) => Ok(Some(limit - 1)),
                // too wide for this platform's code type
                None => Err(Error::InvalidCodeWidth(w))
            }
        }
    }
}

/// Dictionary variant used by the encoder
#[derive(Clone,Copy,Debug,PartialEq)]
pub enum Method {
    Flat,
    Trie,
    Patricia
}

impl Method {
    pub const ALL: [Method;3] = [Method::Flat,Method::Trie,Method::Patricia];
    pub fn name(&self) -> &'static str {
        match self {
            Method::Flat => "flat",
            Method::Trie => "trie",
            Method::Patricia => "patricia"
        }
    }
}

impl std::str::FromStr for Method {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "flat" => Ok(Method::Flat),
            "trie" => Ok(Method::Trie),
            "patricia" => Ok(Method::Patricia),
            _ => Err(Error::UnknownMethod(s.to_string()))
        }
    }
}

#[test]
fn code_width_limits() {
    let mut opt = STD_OPTIONS;
    assert_eq!(opt.max_code(),Ok(None));
    opt.max_code_width = Some(12);
    assert_eq!(opt.max_code(),Ok(Some(4095)));
    opt.max_code_width = Some(8);
    assert_eq!(opt.max_code(),Err(Error::InvalidCodeWidth(8)));
    opt.max_code_width = Some(32);
    if Code::BITS > 32 {
        assert_eq!(opt.max_code(),Ok(Some(0xffff_ffff)));
    } else {
        assert_eq!(opt.max_code(),Err(Error::InvalidCodeWidth(32)));
    }
    opt.max_code_width = Some(33);
    assert_eq!(opt.max_code(),Err(Error::InvalidCodeWidth(33)));
}

#[test]
fn method_names() {
    for m in Method::ALL {
        assert_eq!(m.name().parse::<Method>(),Ok(m));
    }
    assert!("lzss".parse::<Method>().is_err());
}
