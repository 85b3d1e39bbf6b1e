use regex_enumerator::{
    Alphabet, BracketMode, Enumerator, OperationRenderer, RendererConfig, SortOrder,
};

use std::io::{self, Write};
use std::process;

fn print_usage() {
    eprintln!(
        "\
Usage: regenum [OPTIONS] [SYMBOLS]

Enumerate regular expressions over SYMBOLS (default: ab), one per line.

Options:
  -n, --limit <N>          Maximum number of expressions (default: 40)
  -b, --brackets <MODE>    none | necessary | all (default: necessary)
  -s, --sort <ORDER>       unsorted | asc | desc (default: unsorted)
      --no-specials        Do not seed with ε and ∅
      --concat <GLYPH>     Concatenation glyph (default: ·)
      --alt <GLYPH>        Alternation glyph (default: +)
      --star <GLYPH>       Kleene-star glyph (default: *)
      --debug              Print configuration and counts to stderr
  -h, --help               Print this help message"
    );
}

struct Options {
    symbols: String,
    limit: usize,
    order: SortOrder,
    include_specials: bool,
    config: RendererConfig,
    debug: bool,
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut options = Options {
        symbols: "ab".to_owned(),
        limit: 40,
        order: SortOrder::Unsorted,
        include_specials: true,
        config: RendererConfig {
            brackets: BracketMode::Necessary,
            ..Default::default()
        },
        debug: false,
    };
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        // Every option except the boolean ones takes the next argument.
        let mut value = || {
            i += 1;
            args.get(i)
                .cloned()
                .unwrap_or_else(|| fail(&format!("{flag} requires a value")))
        };
        match flag {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-n" | "--limit" => {
                options.limit = value()
                    .parse::<usize>()
                    .unwrap_or_else(|_| fail("--limit must be a positive integer"));
                if options.limit == 0 {
                    fail("--limit must be > 0");
                }
            }
            "-b" | "--brackets" => {
                options.config.brackets = value().parse().unwrap_or_else(|e| fail(&format!("{e}")));
            }
            "-s" | "--sort" => {
                options.order = value().parse().unwrap_or_else(|e| fail(&format!("{e}")));
            }
            "--concat" => options.config.concat = value(),
            "--alt" => options.config.alternation = value(),
            "--star" => options.config.kleene = value(),
            "--no-specials" => options.include_specials = false,
            "--debug" => options.debug = true,
            other if other.starts_with('-') && other.len() > 1 => {
                eprintln!("error: unknown option: {other}");
                print_usage();
                process::exit(1);
            }
            _ => positional.push(flag.to_owned()),
        }
        i += 1;
    }

    match positional.len() {
        0 => {}
        1 => options.symbols = positional.remove(0),
        _ => {
            eprintln!("error: expected at most one SYMBOLS argument");
            print_usage();
            process::exit(1);
        }
    }
    options
}

fn main() {
    let options = parse_args();

    let alphabet = Alphabet::with_symbols(options.include_specials, options.symbols.chars());
    let renderer =
        OperationRenderer::new(options.config).unwrap_or_else(|e| fail(&format!("{e}")));

    if options.debug {
        eprintln!("alphabet: {:?}", alphabet.symbols());
        eprintln!("renderer: {:#?}", renderer.config());
        eprintln!("limit: {}", options.limit);
        eprintln!("sort: {:?}", options.order);
    }

    let enumerator = Enumerator::new(&alphabet, renderer);
    let result = enumerator
        .enumerate(options.limit, options.order)
        .unwrap_or_else(|e| fail(&format!("{e}")));

    if options.debug {
        eprintln!("produced: {} expressions", result.len());
        eprintln!();
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for expr in &result {
        if writeln!(out, "{expr}").is_err() {
            // Downstream closed the pipe.
            process::exit(0);
        }
    }
    if out.flush().is_err() {
        process::exit(0);
    }
}
