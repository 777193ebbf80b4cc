//! Prints the tokens of a manifest file and reports its syntax problems.
//!
//! ```text
//! cargo run --example dump_tokens -- META-INF/MANIFEST.MF
//! ```

use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use manifest_lexer::Lexer;
use tracing::{error, info, metadata::LevelFilter};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Parser)]
struct Args {
    /// Manifest file to tokenize.
    path: PathBuf,

    /// Exit with an error if the manifest contains any syntax problems.
    #[clap(long)]
    strict: bool,

    /// Do not print the tokens, only the problems.
    #[clap(short, long)]
    quiet: bool,
}

fn fallible_main(args: Args) -> anyhow::Result<()> {
    let file = File::open(&args.path)
        .with_context(|| format!("cannot open manifest at {:?}", args.path))?;
    let input = std::io::read_to_string(BufReader::new(file))
        .with_context(|| format!("cannot read manifest at {:?}", args.path))?;

    let name = args.path.display().to_string();
    let stream = Lexer::new().lex_named(&name, &input);
    info!(
        tokens = stream.len(),
        problems = stream.problems().len(),
        "tokenized {name}"
    );

    if !args.quiet {
        let context = stream.source_context();
        for token in stream.tokens() {
            println!(
                "{}:{}\t{:?}{}",
                context.line(token.span.start),
                context.column(token.span.start),
                token,
                if token.is_phantom() { " (phantom)" } else { "" }
            );
        }
    }

    for problem in stream.problems() {
        problem
            .to_diagnostic()
            .emit_to_stderr(stream.source_context())?;
    }

    if args.strict {
        stream.ensure_no_problems()?;
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        );
    tracing::subscriber::set_global_default(subscriber)
        .expect("cannot set default tracing subscriber");

    if let Err(error) = fallible_main(args) {
        error!("{error:?}");
        std::process::exit(1);
    }
}
