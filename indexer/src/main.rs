use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docsearch_core::{IndexBuilder, IndexStore, QueryProcessor, StandardTokenizer};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docsearch-indexer")]
#[command(about = "Build an in-memory index over a document corpus and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Corpus file: one `title\x03body\x03url` document per line
    #[arg(long, default_value = "data/raw_html/raw.txt")]
    input: String,
    /// Stem terms to their English root
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Stop-word file (one word per line) replacing the built-in English list
    #[arg(long)]
    stop_words: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print document and term counts
    Stats {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Build the index and answer queries; reads them from stdin when none is given
    Query {
        #[command(flatten)]
        index: IndexArgs,
        /// Also print the ranked weights and matched terms
        #[arg(long, default_value_t = false)]
        verbose: bool,
        query: Option<String>,
    },
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct Stats {
    documents: usize,
    skipped: usize,
    terms: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { index } => {
            let stats = stats(&index)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        Commands::Query { index, verbose, query } => {
            let tokenizer = tokenizer(&index)?;
            let store = build(&index, &tokenizer)?;
            let mut out = io::stdout().lock();
            match query {
                Some(q) => answer(&mut out, &store, &tokenizer, &q, verbose),
                None => repl(io::stdin().lock(), &mut out, &store, &tokenizer, verbose),
            }
        }
    }
}

fn tokenizer(args: &IndexArgs) -> Result<StandardTokenizer> {
    let mut tokenizer = StandardTokenizer::new().with_stemming(args.stem);
    if let Some(path) = &args.stop_words {
        tokenizer = tokenizer.with_stop_words_file(path)?;
    }
    Ok(tokenizer)
}

fn build(args: &IndexArgs, tokenizer: &StandardTokenizer) -> Result<IndexStore> {
    let built = IndexBuilder::new(tokenizer)
        .build(&args.input)
        .with_context(|| format!("building index from {}", args.input))?;
    Ok(built.store)
}

fn stats(args: &IndexArgs) -> Result<Stats> {
    let tokenizer = tokenizer(args)?;
    let built = IndexBuilder::new(&tokenizer)
        .build(&args.input)
        .with_context(|| format!("building index from {}", args.input))?;
    Ok(Stats {
        documents: built.report.indexed,
        skipped: built.report.skipped,
        terms: built.store.term_count(),
    })
}

fn answer<W: Write>(out: &mut W, store: &IndexStore, tokenizer: &StandardTokenizer, query: &str, verbose: bool) -> Result<()> {
    let qp = QueryProcessor::new(store, tokenizer);
    tracing::info!(query, "searching");
    if verbose {
        let json = serde_json::json!({ "hits": qp.rank(query), "results": qp.search(query) });
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    } else {
        writeln!(out, "{}", serde_json::to_string(&qp.search(query))?)?;
    }
    Ok(())
}

fn repl<R: BufRead, W: Write>(input: R, out: &mut W, store: &IndexStore, tokenizer: &StandardTokenizer, verbose: bool) -> Result<()> {
    let mut lines = input.lines();
    loop {
        write!(out, "Please Enter: ")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().is_empty() { continue; }
        answer(out, store, tokenizer, line.trim(), verbose)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_core::ResultRecord;
    use std::fs;
    use tempfile::TempDir;

    const CORPUS: &str = "Asio Networking\x03Asio is a cross platform IO library\x03https://boost.org/asio\n\
                          not a document\n\
                          Filesystem\x03Boost filesystem utilities\x03https://boost.org/filesystem\n";

    fn corpus() -> (TempDir, IndexArgs) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.txt");
        fs::write(&input, CORPUS).unwrap();
        let args = IndexArgs { input: input.to_string_lossy().into_owned(), stem: false, stop_words: None };
        (dir, args)
    }

    #[test]
    fn stats_counts_documents_and_skips() {
        let (_dir, args) = corpus();
        let stats = stats(&args).unwrap();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.skipped, 1);
        assert!(stats.terms > 0);
    }

    #[test]
    fn stats_fails_on_missing_corpus() {
        let args = IndexArgs { input: "/nonexistent/raw.txt".into(), stem: false, stop_words: None };
        assert!(stats(&args).is_err());
    }

    #[test]
    fn answer_prints_json_results() {
        let (_dir, args) = corpus();
        let tok = tokenizer(&args).unwrap();
        let store = build(&args, &tok).unwrap();
        let mut out = Vec::new();
        answer(&mut out, &store, &tok, "filesystem", false).unwrap();
        let results: Vec<ResultRecord> = serde_json::from_slice(&out).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://boost.org/filesystem");
    }

    #[test]
    fn verbose_answer_includes_weights() {
        let (_dir, args) = corpus();
        let tok = tokenizer(&args).unwrap();
        let store = build(&args, &tok).unwrap();
        let mut out = Vec::new();
        answer(&mut out, &store, &tok, "asio", true).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["hits"][0]["weight"], 11);
        assert_eq!(json["hits"][0]["matched_terms"][0], "asio");
        assert_eq!(json["results"][0]["title"], "Asio Networking");
    }

    #[test]
    fn repl_answers_each_stdin_line() {
        let (_dir, args) = corpus();
        let tok = tokenizer(&args).unwrap();
        let store = build(&args, &tok).unwrap();
        let mut out = Vec::new();
        repl("asio\n\ncoroutine\n".as_bytes(), &mut out, &store, &tok, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let answers: Vec<&str> = text
            .split("Please Enter: ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(answers.len(), 2);
        let first: Vec<ResultRecord> = serde_json::from_str(answers[0]).unwrap();
        assert_eq!(first[0].title, "Asio Networking");
        let second: Vec<ResultRecord> = serde_json::from_str(answers[1]).unwrap();
        assert_eq!(second, vec![ResultRecord::no_results()]);
    }
}
