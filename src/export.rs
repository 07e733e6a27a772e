//! Text Formats
//!
//! Formats for handing codes and dictionaries to other programs.
//!
//! * code files hold decimal codes separated by commas
//! * dictionary dumps are CSV with columns `Code,String,Hex`, one row per entry in code
//!   order, where `String` renders each byte as the Latin-1 character of the same value.
//!   Rows end in CRLF, quoting is left to the `csv` crate.

use std::io::{Read,Write,BufWriter};
use crate::{Code,DYNERR,STDRESULT};

/// Write `codes` as comma separated decimal numbers, nothing at all for an empty stream.
pub fn write_codes<W: Write>(codes: &[Code],out: &mut W) -> STDRESULT {
    let mut writer = BufWriter::new(out);
    for (i,code) in codes.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        write!(writer,"{}",code)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a code file written by `write_codes`.  Whitespace around codes is ignored.
pub fn read_codes<R: Read>(input: &mut R) -> Result<Vec<Code>,DYNERR> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;
    let txt = match std::str::from_utf8(&buf) {
        Ok(s) => s.trim(),
        Err(_) => return Err(Box::new(crate::Error::FileFormatMismatch))
    };
    if txt.is_empty() {
        return Ok(Vec::new());
    }
    let mut ans = Vec::new();
    for field in txt.split(',') {
        match field.trim().parse::<Code>() {
            Ok(code) => ans.push(code),
            Err(_) => {
                log::error!("cannot parse code `{}`",field.trim());
                return Err(Box::new(crate::Error::FileFormatMismatch));
            }
        }
    }
    Ok(ans)
}

/// each byte becomes the character with the same code point
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

/// Write dictionary entries as CSV, `entries` should already be in code order.
pub fn write_dictionary_csv<W: Write>(entries: &[(Code,Vec<u8>)],out: &mut W) -> STDRESULT {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);
    writer.write_record(["Code","String","Hex"])?;
    for (code,string) in entries {
        writer.write_record([code.to_string(),latin1(string),hex::encode(string)])?;
    }
    writer.flush()?;
    Ok(())
}

#[test]
fn code_file() {
    let mut out: Vec<u8> = Vec::new();
    write_codes(&[84,79,256,4095],&mut out).expect("write failed");
    assert_eq!(out,b"84,79,256,4095".to_vec());
    let codes = read_codes(&mut std::io::Cursor::new(b" 84, 79,256,4095\n".to_vec())).expect("read failed");
    assert_eq!(codes,vec![84,79,256,4095]);
}

#[test]
fn empty_code_file() {
    let mut out: Vec<u8> = Vec::new();
    write_codes(&[],&mut out).expect("write failed");
    assert!(out.is_empty());
    let codes = read_codes(&mut std::io::Cursor::new(b"\n".to_vec())).expect("read failed");
    assert!(codes.is_empty());
}

#[test]
fn malformed_code_file() {
    assert!(read_codes(&mut std::io::Cursor::new(b"84,,79".to_vec())).is_err());
    assert!(read_codes(&mut std::io::Cursor::new(b"84,-1".to_vec())).is_err());
    assert!(read_codes(&mut std::io::Cursor::new(vec![0xff,0xfe])).is_err());
}

#[test]
fn dictionary_csv() {
    let entries = vec![
        (10,b"\n".to_vec()),
        (44,b",".to_vec()),
        (65,b"A".to_vec()),
        (233,vec![0xe9]),
        (256,b"say \"hi\"".to_vec())
    ];
    let mut out: Vec<u8> = Vec::new();
    write_dictionary_csv(&entries,&mut out).expect("write failed");
    let expected = "Code,String,Hex\r\n10,\"\n\",0a\r\n44,\",\",2c\r\n65,A,41\r\n233,é,e9\r\n256,\"say \"\"hi\"\"\",7361792022686922\r\n";
    assert_eq!(String::from_utf8(out).unwrap(),expected);
}
