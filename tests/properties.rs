use proptest::prelude::*;
use lzwdict::dict::Dictionary;
use lzwdict::dict::patricia::PatriciaDictionary;
use lzwdict::lzw::{compress_with,decompress};
use lzwdict::{Exhaustion,Method,STD_OPTIONS};

proptest! {
    /// Invariant: every method reproduces its input.
    #[test]
    fn round_trip(dat in proptest::collection::vec(any::<u8>(),0..2000)) {
        for m in Method::ALL {
            let (codes,_) = compress_with(m,&dat,&STD_OPTIONS).unwrap();
            prop_assert!(codes.len() <= dat.len());
            prop_assert_eq!(decompress(&codes,&STD_OPTIONS).unwrap(),dat.clone());
        }
    }

    /// Invariant: small alphabets give long matches, and still round trip.
    #[test]
    fn round_trip_repetitive(dat in proptest::collection::vec(0u8..3,0..3000)) {
        for m in Method::ALL {
            let (codes,_) = compress_with(m,&dat,&STD_OPTIONS).unwrap();
            prop_assert_eq!(decompress(&codes,&STD_OPTIONS).unwrap(),dat.clone());
        }
    }

    /// Invariant: a frozen 9 bit code space round trips and never emits a wide code.
    #[test]
    fn round_trip_frozen(dat in proptest::collection::vec(0u8..16,0..3000)) {
        let mut opt = STD_OPTIONS;
        opt.max_code_width = Some(9);
        opt.exhaustion = Exhaustion::Freeze;
        for m in Method::ALL {
            let (codes,_) = compress_with(m,&dat,&opt).unwrap();
            prop_assert!(codes.iter().all(|c| *c < 512));
            prop_assert_eq!(decompress(&codes,&opt).unwrap(),dat.clone());
        }
    }

    /// Invariant: all three dictionaries hold the same entries and emit the same codes.
    #[test]
    fn dictionaries_agree(dat in proptest::collection::vec(0u8..4,0..1500)) {
        let (flat_codes,flat) = compress_with(Method::Flat,&dat,&STD_OPTIONS).unwrap();
        let (trie_codes,trie) = compress_with(Method::Trie,&dat,&STD_OPTIONS).unwrap();
        let (patricia_codes,patricia) = compress_with(Method::Patricia,&dat,&STD_OPTIONS).unwrap();
        prop_assert_eq!(&flat_codes,&trie_codes);
        prop_assert_eq!(&flat_codes,&patricia_codes);
        prop_assert_eq!(flat.entries(),trie.entries());
        prop_assert_eq!(flat.entries(),patricia.entries());
    }

    /// Invariant: direct insertion of arbitrary strings keeps the Patricia tree compressed
    /// and every inserted string findable under its first code.
    #[test]
    fn patricia_structure(words in proptest::collection::vec(proptest::collection::vec(0u8..4,1..12),1..60)) {
        let mut dict = PatriciaDictionary::create();
        let mut first_code = std::collections::HashMap::new();
        for w in words.iter() {
            let code = dict.insert_next(w);
            let expected = match w.len() {
                1 => w[0] as usize,
                _ => *first_code.entry(w.clone()).or_insert(code)
            };
            prop_assert!(dict.is_maximally_compressed());
            prop_assert_eq!(dict.search(w),Some(expected));
        }
        for (w,code) in first_code.iter() {
            prop_assert_eq!(dict.search(w),Some(*code));
        }
    }
}
