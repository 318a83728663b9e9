//! `rotorc` — CLI driver for the rotor ECMAScript front-end.
//!
//! Streams a source through the front-end pipeline in byte chunks and
//! prints tokens, syntax nodes, or just diagnostics.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::process::ExitCode;

use rotor_core::source::{Scheme, SourceUrl};
use rotor_core::{Pipeline, RotorError, RotorResult, TokenStream};

#[derive(Parser)]
#[command(name = "rotorc")]
#[command(about = "rotor — streaming ECMAScript compiler front-end")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Size of the byte chunks fed through the pipeline.
    #[arg(long, default_value_t = 8192, global = true)]
    chunk_size: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream of a source
    Lex {
        /// File path, URL, or inline program text
        source: String,
    },

    /// Print the syntax tree of a source
    Parse {
        /// File path, URL, or inline program text
        source: String,
    },

    /// Report diagnostics only
    Check {
        /// File path, URL, or inline program text
        source: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let chunk_size = cli.chunk_size.max(1);

    let result = match cli.command {
        Command::Lex { source } => lex(&source, chunk_size),
        Command::Parse { source } => parse(&source, chunk_size),
        Command::Check { source } => check(&source, chunk_size),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Fetch the source bytes behind a URL.
///
/// Network schemes are accepted by the resolver but not fetched here.
fn fetch(url: &SourceUrl) -> RotorResult<Vec<u8>> {
    match url.scheme() {
        Scheme::File => {
            let mut bytes = Vec::new();
            std::fs::File::open(url.target())?.read_to_end(&mut bytes)?;
            Ok(bytes)
        }
        Scheme::Data => url.data_bytes(),
        Scheme::Http | Scheme::Https => Err(RotorError::UnresolvableSource(format!(
            "{url}: network sources are not supported by rotorc"
        ))),
    }
}

fn lex(source: &str, chunk_size: usize) -> RotorResult<()> {
    let url = SourceUrl::resolve(source)?;
    let bytes = fetch(&url)?;
    let mut stream = TokenStream::new(url);
    let mut tokens = Vec::new();
    for chunk in bytes.chunks(chunk_size) {
        tokens.extend(stream.feed(chunk)?);
    }
    tokens.extend(stream.finish()?);
    for token in tokens {
        println!(
            "{}:{}\t{}\t{:?}",
            token.span.begin.line + 1,
            token.span.begin.column + 1,
            token.kind,
            token.text
        );
    }
    Ok(())
}

fn parse(source: &str, chunk_size: usize) -> RotorResult<()> {
    let url = SourceUrl::resolve(source)?;
    let bytes = fetch(&url)?;
    let mut pipeline = Pipeline::new(url);
    let mut statements = Vec::new();
    for chunk in bytes.chunks(chunk_size) {
        statements.extend(pipeline.feed(chunk)?);
    }
    statements.extend(pipeline.finish()?);
    for statement in statements {
        println!("{statement:#?}");
    }
    Ok(())
}

fn check(source: &str, chunk_size: usize) -> RotorResult<()> {
    let url = SourceUrl::resolve(source)?;
    let bytes = fetch(&url)?;
    let mut pipeline = Pipeline::new(url);
    for chunk in bytes.chunks(chunk_size) {
        pipeline.feed(chunk)?;
    }
    pipeline.finish()?;
    Ok(())
}
