use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use proptest::strategy::{Strategy,ValueTree};
use proptest::test_runner::TestRunner;
use std::path::PathBuf;
use std::process::Command; // Run programs
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const TOBE: &str = "TOBEORNOTTOBEORTOBEORNOT";

// Write `dat` into the temporary directory and return its path.
fn make_input(temp_dir: &tempfile::TempDir,name: &str,dat: &[u8]) -> Result<PathBuf,Box<dyn std::error::Error>> {
    let path = temp_dir.path().join(name);
    std::fs::write(&path,dat)?;
    Ok(path)
}

fn round_trip_test(method: &str,dat: &[u8]) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"original.txt",dat)?;
    let codes_path = temp_dir.path().join("original.lzw");
    let out_path = temp_dir.path().join("expanded.txt");
    Command::cargo_bin("lzwdict")?
        .arg("compress")
        .arg("-m").arg(method)
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&codes_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("compressed"));
    Command::cargo_bin("lzwdict")?
        .arg("expand")
        .arg("-i").arg(&codes_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("expanded"));
    match std::fs::read(out_path) {
        Ok(v) => assert_eq!(v,dat.to_vec()),
        _ => panic!("unable to compare output with original")
    }
    Ok(())
}

#[test]
fn flat_round_trip() -> STDRESULT {
    round_trip_test("flat",TOBE.repeat(50).as_bytes())
}

#[test]
fn trie_round_trip() -> STDRESULT {
    round_trip_test("trie",TOBE.repeat(50).as_bytes())
}

#[test]
fn patricia_round_trip() -> STDRESULT {
    round_trip_test("patricia",TOBE.repeat(50).as_bytes())
}

#[test]
fn binary_round_trip() -> STDRESULT {
    let dat: Vec<u8> = (0..4000).map(|i: u32| ((i * 7) % 251) as u8 ^ ((i / 13) as u8)).collect();
    round_trip_test("patricia",&dat)
}

#[test]
fn code_file_format() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"tobe.txt",TOBE.as_bytes())?;
    let codes_path = temp_dir.path().join("tobe.lzw");
    Command::cargo_bin("lzwdict")?
        .arg("compress")
        .arg("-m").arg("trie")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&codes_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("compressed 24 bytes into 16 codes"));
    let codes = std::fs::read_to_string(codes_path)?;
    assert_eq!(codes,"84,79,66,69,79,82,78,79,84,256,258,260,265,259,261,263");
    Ok(())
}

#[test]
fn dictionary_export() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"abab.txt",b"ABABABA")?;
    let codes_path = temp_dir.path().join("abab.lzw");
    let csv_path = temp_dir.path().join("abab.csv");
    Command::cargo_bin("lzwdict")?
        .arg("compress")
        .arg("-m").arg("patricia")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&codes_path)
        .arg("-d").arg(&csv_path)
        .assert()
        .success();
    let csv = std::fs::read_to_string(csv_path)?;
    // rows end in CRLF, a bare LF can only appear inside a quoted field
    let lines: Vec<&str> = csv.trim_end_matches("\r\n").split("\r\n").collect();
    assert_eq!(lines.len(),1 + 259);
    assert_eq!(lines[0],"Code,String,Hex");
    assert_eq!(lines[11],"10,\"\n\",0a");
    assert_eq!(lines[66],"65,A,41");
    assert_eq!(&lines[257..],["256,AB,4142","257,BA,4241","258,ABA,414241"]);
    Ok(())
}

#[test]
fn corrupt_codes_fail() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let codes_path = make_input(&temp_dir,"bad.lzw",b"65,66,300")?;
    let out_path = temp_dir.path().join("bad.txt");
    Command::cargo_bin("lzwdict")?
        .arg("expand")
        .arg("-i").arg(&codes_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidCode { code: 300, expected: 257 }"));
    let codes_path = make_input(&temp_dir,"garbled.lzw",b"65,B,66")?;
    Command::cargo_bin("lzwdict")?
        .arg("expand")
        .arg("-i").arg(&codes_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("FileFormatMismatch"));
    Ok(())
}

#[test]
fn code_width_policy() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let mut runner = TestRunner::deterministic();
    let dat = proptest::collection::vec(b'a'..=b'h',6000).new_tree(&mut runner).expect("could not generate text").current();
    let in_path = make_input(&temp_dir,"long.txt",&dat)?;
    let codes_path = temp_dir.path().join("long.lzw");
    let out_path = temp_dir.path().join("long.out");
    Command::cargo_bin("lzwdict")?
        .arg("compress")
        .arg("-m").arg("trie")
        .arg("-w").arg("9")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&codes_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CodeSpaceExhausted(9)"));
    Command::cargo_bin("lzwdict")?
        .arg("compress")
        .arg("-m").arg("trie")
        .arg("-w").arg("9")
        .arg("--freeze")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&codes_path)
        .assert()
        .success();
    Command::cargo_bin("lzwdict")?
        .arg("expand")
        .arg("-w").arg("9")
        .arg("--freeze")
        .arg("-i").arg(&codes_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success();
    assert_eq!(std::fs::read(out_path)?,dat);
    Command::cargo_bin("lzwdict")?
        .arg("compress")
        .arg("-m").arg("trie")
        .arg("-w").arg("4")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(temp_dir.path().join("narrow.lzw"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidCodeWidth(4)"));
    Ok(())
}

#[test]
fn compare_methods() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"sample.txt",TOBE.repeat(500).as_bytes())?;
    Command::cargo_bin("lzwdict")?
        .arg("compare")
        .arg("-i").arg(&in_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("flat").and(predicate::str::contains("trie"))
            .and(predicate::str::contains("patricia")))
        .stdout(predicate::str::contains("SUCCESS").count(3))
        .stdout(predicate::str::contains("nodes"))
        .stdout(predicate::str::contains("FAIL").not());
    Ok(())
}
