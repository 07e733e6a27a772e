use clap::{arg,crate_version,value_parser,ArgMatches,Command};
use lzwdict::{lzw,export,Exhaustion,Method,Options,STD_OPTIONS};
use std::time::Instant;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const RCH: &str = "unreachable was reached";

fn ok_to_overwrite(path_out: &str) -> bool {
    if let Ok(_f) = std::fs::File::open(path_out) {
        let mut ans = String::new();
        eprint!("{} exists, overwrite? (y/n) ",path_out);
        std::io::stdin().read_line(&mut ans).expect("could not read stdin");
        if ans.trim_end()=="y" || ans.trim_end()=="Y" {
            log::info!("overwriting {}",path_out);
            return true;
        }
        return false;
    }
    true
}

/// code space options shared by all subcommands
fn code_space_args(cmd: Command) -> Command {
    cmd.arg(arg!(-w --width <BITS> "maximum code width, unbounded if omitted")
            .value_parser(value_parser!(u32))
            .required(false))
        .arg(arg!(--freeze "stop adding codes when the width is used up, rather than failing"))
}

fn get_options(cmd: &ArgMatches) -> Result<Options,lzwdict::Error> {
    let mut opt = STD_OPTIONS;
    opt.max_code_width = cmd.get_one::<u32>("width").copied();
    if cmd.get_flag("freeze") {
        opt.exhaustion = Exhaustion::Freeze;
    }
    opt.max_code()?;
    Ok(opt)
}

/// Run every method on one input and report, verifying the round trip.
fn compare(path_in: &str,opt: &Options) -> STDRESULT {
    let dat = std::fs::read(path_in)?;
    let bytes_per_code = match opt.max_code_width {
        Some(w) => (w as usize + 7) / 8,
        None => 2
    };
    println!("{:<10} {:<8} {:>10} {:>10} {:>10} {:>8} {:>7}","method","status","comp (s)","exp (s)","MB/s","nodes","ratio");
    for method in Method::ALL {
        let start = Instant::now();
        let (codes,dict) = lzw::compress_with(method,&dat,opt)?;
        let comp_time = start.elapsed().as_secs_f64();
        let start = Instant::now();
        let expanded = lzw::decompress(&codes,opt)?;
        let exp_time = start.elapsed().as_secs_f64();
        let status = match expanded==dat {
            true => "SUCCESS",
            false => "FAIL"
        };
        let throughput = match comp_time > 0.0 {
            true => dat.len() as f64 / (1024.0*1024.0) / comp_time,
            false => 0.0
        };
        let ratio = match codes.len() {
            0 => 0.0,
            n => dat.len() as f64 / (n * bytes_per_code) as f64
        };
        println!("{:<10} {:<8} {:>10.4} {:>10.4} {:>10.2} {:>8} {:>7.2}",
            method.name(),status,comp_time,exp_time,throughput,dict.node_count(),ratio);
        if expanded!=dat {
            log::error!("{} did not reproduce the input",method.name());
        }
    }
    Ok(())
}

fn main() -> STDRESULT
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help =
"Examples:
---------
Compress:      `lzwdict compress -m patricia -i my_expanded -o my_codes -d my_dictionary.csv`
Expand:        `lzwdict expand -i my_codes -o my_expanded`
Compare:       `lzwdict compare -i my_expanded -w 16`";

    let methods = ["flat","trie","patricia"];

    let mut main_cmd = Command::new("lzwdict")
        .about("LZW compression over hash, trie, and Patricia trie dictionaries")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(code_space_args(Command::new("compress")
        .arg(arg!(-m --method <METHOD> "dictionary structure").value_parser(methods)
            .required(true))
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path for the codes").required(true))
        .arg(arg!(-d --dictionary <PATH> "also write the dictionary as CSV").required(false))
        .about("compress a file into a list of codes")));

    main_cmd = main_cmd.subcommand(code_space_args(Command::new("expand")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("expand a list of codes")));

    main_cmd = main_cmd.subcommand(code_space_args(Command::new("compare")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .about("run every dictionary structure on a file and report")));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let method = cmd.get_one::<String>("method").expect(RCH).parse::<Method>()?;
        let opt = get_options(cmd)?;
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let dat = std::fs::read(path_in)?;
        let start = Instant::now();
        let (codes,dict) = lzw::compress_with(method,&dat,&opt)?;
        log::info!("{} compression took {:?}",method.name(),start.elapsed());
        let mut out_file = std::fs::File::create(path_out)?;
        export::write_codes(&codes,&mut out_file)?;
        if let Some(path_dict) = cmd.get_one::<String>("dictionary") {
            if ok_to_overwrite(path_dict) {
                let mut dict_file = std::fs::File::create(path_dict)?;
                export::write_dictionary_csv(&dict.entries(),&mut dict_file)?;
            }
        }
        eprintln!("compressed {} bytes into {} codes",dat.len(),codes.len());
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = get_options(cmd)?;
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let mut in_file = std::fs::File::open(path_in)?;
        let codes = export::read_codes(&mut in_file)?;
        let start = Instant::now();
        let dat = lzw::decompress(&codes,&opt)?;
        log::info!("expansion took {:?}",start.elapsed());
        std::fs::write(path_out,&dat)?;
        eprintln!("expanded {} codes into {} bytes",codes.len(),dat.len());
    }

    if let Some(cmd) = matches.subcommand_matches("compare") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let opt = get_options(cmd)?;
        compare(path_in,&opt)?;
    }

    Ok(())
}
