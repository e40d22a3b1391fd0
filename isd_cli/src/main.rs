//! Command-line front end (spec §6), grounded on the teacher's
//! `bike-trials::main` `Args::parse -> Settings::from_args -> run` shape.

mod cli;
mod error;
mod output;
mod parse;

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use isd_core::params::{BENCHMARK, DOOM, EPS, L, P};
use isd_core::{run_benchmark, run_pool, Problem, Seed, Variant};

use crate::cli::{Args, RunConfig};

fn startup_message(problem: &Problem) -> String {
    format!(
        "n={} k={} w={}\nl={L} p={P} epsilon={EPS} doom={}",
        problem.n(),
        problem.k(),
        problem.w(),
        DOOM as u8,
    )
}

fn run(config: &RunConfig) -> Result<()> {
    if DOOM && config.variant() != Variant::Qc {
        eprintln!("Using DOOM in a non quasi-cyclic setting will most likely not give any meaningful result!");
    }

    let problem = parse::parse_problem(config.input_file(), config.variant())?;
    eprintln!("{}", startup_message(&problem));

    let seed = Seed::from_entropy()?;

    if BENCHMARK > 0 {
        let outcome = run_benchmark(&problem, config.threads(), seed)?;
        println!("{}", outcome.elapsed.as_nanos());
        return Ok(());
    }

    // Nothing ever sets this internally for LW (spec's "run indefinitely,
    // continuously tightening w_best"), so a Ctrl-C handler is the only way
    // such a run ever stops short of exhausting its search space.
    let stop = Arc::new(AtomicBool::new(false));
    let stop_for_handler = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_for_handler.store(true, Ordering::Relaxed);
    })?;

    let variant = config.variant();
    let streamed = Cell::new(false);
    let outcome = run_pool(&problem, config.threads(), seed, stop, |result| {
        streamed.set(true);
        output::print_result(variant, result).ok();
    })?;

    if streamed.get() {
        // LW already printed every improvement as it was found.
        return Ok(());
    }
    match outcome.best {
        Some(result) => {
            output::print_result(config.variant(), &result)?;
            Ok(())
        }
        None => {
            eprintln!("no solution found");
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = RunConfig::from_args(args)?;
    run(&config)
}
