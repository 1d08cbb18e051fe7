use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lexiseg::{Dictionary, SegmentationMode, Segmenter, UnitMode, trim};

use clap::Parser;

#[derive(Clone, Debug)]
enum OutputMode {
    Slice,
    String,
    Detail,
    Positions,
}

impl FromStr for OutputMode {
    type Err = &'static str;
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "slice" => Ok(Self::Slice),
            "string" => Ok(Self::String),
            "detail" => Ok(Self::Detail),
            "positions" => Ok(Self::Positions),
            _ => Err("Could not parse a mode"),
        }
    }
}

#[derive(Parser, Debug)]
#[clap(name = "tokenize", about = "Segments text into dictionary words")]
struct Args {
    /// Dictionary in the `TEXT FREQUENCY [POS]` format, optionally compressed
    /// with zstd (`.zst`). Can be given multiple times.
    #[clap(short = 'i', long = "dict")]
    dicts: Vec<PathBuf>,

    /// Output mode. Choices are slice, string, detail, and positions.
    #[clap(short = 'O', long, default_value = "slice")]
    output_mode: OutputMode,

    /// Treats runs of ASCII letters and digits as single units.
    #[clap(short = 'a', long)]
    alpha_num: bool,

    /// Expands compound words into their parts.
    #[clap(short = 's', long)]
    search: bool,

    /// Drops tokens consisting only of white space and punctuation.
    #[clap(short = 't', long)]
    trim: bool,
}

fn load_dictionary(
    path: &Path,
    dict: &Dictionary,
    mode: UnitMode,
) -> Result<usize, Box<dyn Error>> {
    let file = File::open(path)?;
    let rdr: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "zst") {
        Box::new(BufReader::new(zstd::Decoder::new(file)?))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(dict.extend_from_text(rdr, mode)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let unit_mode = if args.alpha_num {
        UnitMode::AlphaNum
    } else {
        UnitMode::Char
    };
    let dict = Dictionary::new();
    if args.dicts.is_empty() {
        eprintln!("No dictionary is given; every unit becomes a token");
    }
    for path in &args.dicts {
        eprintln!("Loading {}...", path.display());
        let num_added = load_dictionary(path, &dict, unit_mode)?;
        eprintln!("Loaded {num_added} words");
    }

    let segmenter = Segmenter::new(dict).alpha_num(args.alpha_num);
    let mut worker = segmenter.new_worker();
    let mode = if args.search {
        SegmentationMode::Search
    } else {
        SegmentationMode::Normal
    };

    eprintln!("Ready to segment");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        worker.reset_sentence(line);
        worker.segment();
        let mut tokens = worker.to_bufs(mode);
        if args.trim {
            tokens = trim(&tokens);
        }
        match args.output_mode {
            OutputMode::Slice => {
                for (i, t) in tokens.iter().enumerate() {
                    if i != 0 {
                        out.write_all(b" ")?;
                    }
                    out.write_all(t.text.as_bytes())?;
                }
                out.write_all(b"\n")?;
            }
            OutputMode::String => {
                for t in &tokens {
                    write!(&mut out, "{}/{} ", t.text, t.pos)?;
                }
                out.write_all(b"\n")?;
            }
            OutputMode::Detail => {
                for t in &tokens {
                    writeln!(
                        &mut out,
                        "{}\t{}\tlex_type={:?}\tleaf={}\tword_cost={:.3}\ttotal_cost={:.3}",
                        t.text, t.pos, t.lex_type, t.leaf, t.word_cost, t.total_cost,
                    )?;
                }
                out.write_all(b"EOS\n")?;
            }
            OutputMode::Positions => {
                for t in &tokens {
                    writeln!(
                        &mut out,
                        "{}\t{}\t{}\t{}",
                        t.text, t.pos, t.range_byte.start, t.range_byte.end,
                    )?;
                }
                out.write_all(b"EOS\n")?;
            }
        }
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
