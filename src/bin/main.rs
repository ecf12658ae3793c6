//! sk-algo: rank the lines of stdin against a query and print the matches.
#[macro_use]
extern crate log;

use std::env;
use std::io::{self, BufRead, BufWriter, Write};
use std::num::NonZeroUsize;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use rayon::prelude::*;
use unicode_normalization::UnicodeNormalization;

use skim_algo::prelude::*;

/// sk-algo - rank lines with fuzzy finder algorithms
///
/// Reads candidate lines from stdin, matches them against QUERY and prints
/// the matching lines, best first.
#[derive(Parser, Debug)]
#[command(name = "sk-algo", args_override_self = true, verbatim_doc_comment, version, about)]
struct Args {
    /// Query to match the lines against
    query: String,

    /// Matching algorithm: v1, v2, exact, prefix, suffix or equal
    #[arg(long, default_value_t = Algorithm::V2)]
    algo: Algorithm,

    /// Parse the query with the extended search syntax: space-separated terms
    /// that all have to match, `|` for alternatives, `'` exact, `^` prefix,
    /// `$` suffix and `!` negation
    #[arg(short = 'x', long)]
    extended: bool,

    /// Case sensitivity
    #[arg(long, value_enum, default_value_t = CaseMatching::Smart)]
    case: CaseMatching,

    /// Do not match decorated Latin letters with their bare form
    #[arg(long)]
    literal: bool,

    /// Prefer matches towards the end of the lines
    #[arg(long)]
    backward: bool,

    /// Comma-separated list of sort criteria to apply when the scores are tied
    #[arg(long, value_delimiter = ',', default_value = "score,begin,end")]
    tiebreak: Vec<RankCriteria>,

    /// Print at most this many lines
    #[arg(long)]
    limit: Option<usize>,

    /// Number of worker threads, defaults to the available parallelism
    #[arg(long)]
    threads: Option<NonZeroUsize>,

    /// Log the score matrices of the optimal fuzzy matcher (needs RUST_LOG=trace)
    #[arg(long)]
    debug: bool,

    /// Print the score before each line
    #[arg(long)]
    print_score: bool,

    /// Print the matched character positions after each line
    #[arg(long)]
    positions: bool,
}

struct MatchedLine {
    rank: Rank,
    index: usize,
    score: i32,
    positions: Option<MatchIndices>,
}

//------------------------------------------------------------------------------
fn main() {
    env_logger::builder().format_timestamp_nanos().init();

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            if err
                .downcast_ref::<io::Error>()
                .is_some_and(|err| err.kind() == io::ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            eprintln!("sk-algo: {err:?}");
            std::process::exit(2)
        }
    }
}

fn parse_args() -> Args {
    let mut args: Vec<String> = env::args().take(1).collect();
    args.extend(
        env::var("SKIM_ALGO_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    args.extend(env::args().skip(1));

    Args::parse_from(args)
}

fn read_lines(normalize: bool) -> Result<Vec<Chars>> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for (index, line) in stdin.lock().split(b'\n').enumerate() {
        let mut line = line.wrap_err("failed to read stdin")?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        let chars = if normalize && !line.is_ascii() {
            let composed: String = String::from_utf8_lossy(&line).nfc().collect();
            Chars::from(composed.as_str())
        } else {
            Chars::from_bytes(&line)
        };
        lines.push(chars.with_index(index as i32));
    }
    Ok(lines)
}

fn match_lines<F>(rank_builder: &RankBuilder, lines: &[Chars], match_line: F) -> Vec<MatchedLine>
where
    F: Fn(&Chars) -> Option<(MatchResult, Option<MatchIndices>)> + Sync,
{
    lines
        .par_iter()
        .filter_map(|line| {
            let (res, positions) = match_line(line)?;
            Some(MatchedLine {
                rank: rank_builder.build_rank(&res, line),
                index: line.index as usize,
                score: res.score,
                positions,
            })
        })
        .collect()
}

fn real_main() -> Result<i32> {
    color_eyre::install()?;
    let args = parse_args();
    let options = MatcherOptionsBuilder::default()
        .algorithm(args.algo)
        .case(args.case)
        .normalize(!args.literal)
        .forward(!args.backward)
        .debug(args.debug)
        .build()?;
    let matcher = LineMatcher::new(options);
    let rank_builder = RankBuilder::new(args.tiebreak.clone());

    let lines = read_lines(!args.literal)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.map_or(0, NonZeroUsize::get))
        .build()?;
    debug!("matching {} lines on {} threads", lines.len(), pool.current_num_threads());

    let with_pos = args.positions;
    let mut matched = if args.extended {
        let pattern = matcher.extended_pattern(&args.query);
        debug!("query: {pattern}");
        pool.install(|| {
            match_lines(&rank_builder, &lines, |line| {
                let (res, positions) = matcher.match_extended(line, &pattern)?;
                Some((res, with_pos.then_some(positions)))
            })
        })
    } else {
        let pattern = matcher.pattern(&args.query);
        pool.install(|| match_lines(&rank_builder, &lines, |line| matcher.match_chars(line, &pattern, with_pos)))
    };
    matched.sort_by_key(|m| (m.rank, m.index));
    debug!("{} of {} lines matched", matched.len(), lines.len());

    let mut out = BufWriter::new(io::stdout().lock());
    for m in matched.iter().take(args.limit.unwrap_or(usize::MAX)) {
        if args.print_score {
            write!(out, "{}\t", m.score)?;
        }
        write!(out, "{}", lines[m.index])?;
        if let Some(positions) = &m.positions {
            let mut positions = positions.clone();
            positions.sort_unstable();
            let positions: Vec<String> = positions.iter().map(ToString::to_string).collect();
            write!(out, "\t{}", positions.join(","))?;
        }
        writeln!(out)?;
    }
    out.flush()?;

    Ok(if matched.is_empty() { 1 } else { 0 })
}
