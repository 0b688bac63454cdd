//! Print the terms in ATerm files, one term per line.

use aterm_parse::{TermIter, Token};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use transf::{annotation, traverse, Factory, Fatal, Strategy};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Pretty printer for terms in the textual ATerm format
#[derive(Clone, Debug, Parser)]
pub struct Opt {
    /// Only lex, printing tokens instead of terms
    #[arg(long)]
    lex: bool,
    /// Remove all annotations
    #[arg(long)]
    strip: bool,
    /// Verify that printed terms parse back to the same terms
    #[arg(long)]
    check: bool,
    /// Print nothing
    #[arg(long)]
    quiet: bool,
    /// Maximal number of parsed terms to cache
    #[arg(long, value_name = "N", default_value_t = transf::DEFAULT_CAPACITY)]
    cache: usize,

    /// Files to process; use "-" to read from standard input
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug)]
enum Error {
    Io(io::Error),
    Parse(aterm_parse::Error),
    Transf(Fatal),
    /// a printed term, and the term that was read back from it
    Mismatch(String, String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<aterm_parse::Error> for Error {
    fn from(err: aterm_parse::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<Fatal> for Error {
    fn from(err: Fatal) -> Self {
        Self::Transf(err)
    }
}

fn no_space_after(token: &Token) -> bool {
    matches!(token, Token::LBrk | Token::LPar | Token::LBrc | Token::Star | Token::Eq)
}

fn no_space_before(token: &Token) -> bool {
    use Token::*;
    matches!(token, RBrk | RPar | LPar | LBrc | RBrc | Comma | Eq)
}

fn print_token(token: &Token, space: &mut bool) {
    if *space && !no_space_before(token) {
        print!(" ");
    }
    print!("{}", token);
    *space = !no_space_after(token);
}

fn print_tokens<'s>(iter: impl Iterator<Item = Token<'s>>, opt: &Opt) {
    let mut space = false;
    for token in iter {
        if token == Token::Error {
            log::warn!("unknown token");
        }
        if !opt.quiet {
            print_token(&token, &mut space)
        }
    }
    if !opt.quiet && space {
        println!()
    }
}

fn print_terms(file: &str, f: &Factory, strip: Option<&Strategy>, opt: &Opt) -> Result<(), Error> {
    for tm in TermIter::new(file) {
        let tm = f.share(tm?);
        log::info!("term parsed");
        let tm = match strip {
            Some(s) => s.run(&tm)?.unwrap_or(tm),
            None => tm,
        };
        let printed = tm.to_string();
        if opt.check {
            check(f, &printed, &tm)?
        }
        if !opt.quiet {
            println!("{}", printed)
        }
    }
    Ok(())
}

/// Verify that a printed term is read back as the same term.
fn check(f: &Factory, printed: &str, tm: &transf::Term) -> Result<(), Error> {
    let reparsed = f.parse(printed)?;
    let again = reparsed.to_string();
    if reparsed != *tm || again != printed {
        log::warn!("term does not survive printing: {} became {}", printed, again);
        return Err(Error::Mismatch(printed.to_string(), again));
    }
    Ok(())
}

fn read(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;
        Ok(s)
    } else {
        std::fs::read_to_string(path)
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env("LOG").init();

    let opt = Opt::parse();
    let f = Factory::with_capacity(opt.cache);
    let strip = opt.strip.then(|| traverse::bottomup(annotation::strip()));

    for path in &opt.files {
        log::info!("processing {}", path.display());
        let file = read(path)?;
        if opt.lex {
            print_tokens(aterm_parse::lex(&file), &opt)
        } else {
            print_terms(&file, &f, strip.as_ref(), &opt)?
        }
    }
    log::debug!("{} terms in parse cache", f.cache_len());
    Ok(())
}
