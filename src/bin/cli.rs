use assay::board::Position;
use assay::eval::tables::{BASELINE, MAX_GAME_PHASE, Weights};
use assay::eval::{evaluate, evaluate_fen, game_phase};
use assay::logger::init_logging;
use assay::params;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, warn};

fn main() {
    init_logging("logs/assay.log", "assay=info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str);

    match command {
        Some("params") => match args.get(1) {
            Some(path) => handle_params_file(path),
            None => print!("{}", params::render(&BASELINE)),
        },
        Some("eval") if args.len() > 1 => handle_eval(&args[1..]),
        Some("batch") if args.len() == 2 => handle_batch(&args[1]),
        Some("export") if args.len() == 2 => handle_export(&args[1]),
        _ => print_usage(),
    }
}

fn print_usage() {
    eprintln!("usage: assay <command>");
    eprintln!("  params [file]     print the baseline weights (or a saved set) as Rust literals");
    eprintln!("  eval <fen>        score one position and summarize its trace");
    eprintln!("  batch <file>      evaluate a file of FEN lines");
    eprintln!("  export <file>     write the baseline weights in binary form");
}

fn handle_params_file(path: &str) {
    match Weights::load(path) {
        Ok(weights) => print!("{}", params::render(&weights)),
        Err(e) => eprintln!("Error: could not load weights from '{}': {}", path, e),
    }
}

fn handle_eval(fen_parts: &[String]) {
    // The FEN was split by the shell; stitch it back together.
    let fen = fen_parts.join(" ");
    let pos = match Position::from_str(&fen) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let (score, trace) = evaluate(&pos, &BASELINE);
    let coefficients = params::coefficients(&trace);
    let active = coefficients.iter().filter(|&&c| c != 0).count();

    info!(fen = %pos.to_fen(), score, "evaluated position");

    println!("fen:          {}", pos.to_fen());
    println!("phase:        {}/{}", game_phase(&pos), MAX_GAME_PHASE);
    println!("score:        {:+} cp from White's side", score);
    println!(
        "coefficients: {} of {} nonzero",
        active,
        params::NUM_PARAMS
    );
}

fn handle_batch(path: &str) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: could not open '{}': {}", path, e);
            return;
        }
    };

    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .collect();

    let bar = ProgressBar::new(lines.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] [{bar:40}] {pos}/{len} ({per_sec})")
    {
        bar.set_style(style.progress_chars("=>-"));
    }

    let start = Instant::now();
    let mut evaluated = 0u64;
    let mut rejected = 0u64;
    let mut score_sum = 0i64;

    for line in &lines {
        let line = line.trim();
        if !line.is_empty() {
            match evaluate_fen(line) {
                Ok(result) => {
                    evaluated += 1;
                    score_sum += result.score as i64;
                }
                Err(e) => {
                    rejected += 1;
                    warn!(fen = line, error = %e, "rejected entry");
                }
            }
        }
        bar.inc(1);
    }
    bar.finish();

    let elapsed = start.elapsed();
    println!(
        "Evaluated {}/{} positions ({} rejected) in {:.2?}",
        evaluated,
        evaluated + rejected,
        rejected,
        elapsed
    );
    if evaluated > 0 {
        let secs = elapsed.as_secs_f64();
        println!(
            "Mean score {:+.1} cp, {:.0} positions/s",
            score_sum as f64 / evaluated as f64,
            evaluated as f64 / secs.max(f64::EPSILON)
        );
    }
    info!(evaluated, rejected, "batch finished");
}

fn handle_export(path: &str) {
    match BASELINE.save(path) {
        Ok(()) => println!("Wrote baseline weights to {}", path),
        Err(e) => eprintln!("Error: could not write '{}': {}", path, e),
    }
}
