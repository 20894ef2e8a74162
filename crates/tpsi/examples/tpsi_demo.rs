// Threshold private set intersection between local parties, using the
// threshold Paillier backend of the `tpsi` crate.

use std::{env, error::Error, process::exit, sync::Arc, time::Instant};

use console::style;
use num_bigint::BigUint;
use rand::rngs::OsRng;
use tpsi::{
    network::star, paillier::ThresholdPaillier, run_coordinator, run_participant, Outcome,
    ProtocolParametersBuilder, Setting,
};

fn print_notice_and_exit(error: Option<String>) {
    println!(
        "{} Threshold private set intersection with threshold Paillier",
        style("  overview:").magenta().bold()
    );
    println!(
        "{} tpsi_demo [-h] [--help] [--num_parties=<value>] [--set_size=<value>] \
         [--threshold=<value>]",
        style("     usage:").magenta().bold()
    );
    println!(
        "{} {} must be at least 2, {} and {} at least 1",
        style("constraints:").magenta().bold(),
        style("num_parties").blue(),
        style("set_size").blue(),
        style("threshold").blue(),
    );
    if let Some(error) = error {
        println!("{} {}", style("     error:").red().bold(), error);
    }
    exit(0);
}

fn parse_arg(arg: &str, name: &str) -> usize {
    let a: Vec<&str> = arg.rsplit('=').collect();
    match a.first().map(|v| v.parse::<usize>()) {
        Some(Ok(v)) if a.len() == 2 => v,
        _ => {
            print_notice_and_exit(Some(format!("Invalid `--{name}` argument")));
            0
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.contains(&"-h".to_string()) || args.contains(&"--help".to_string()) {
        print_notice_and_exit(None)
    }

    let mut num_parties = 3;
    let mut set_size = 6;
    let mut threshold = 6;
    let prime_bits = 256;

    for arg in &args {
        if arg.starts_with("--num_parties") {
            num_parties = parse_arg(arg, "num_parties");
        } else if arg.starts_with("--set_size") {
            set_size = parse_arg(arg, "set_size");
        } else if arg.starts_with("--threshold") {
            threshold = parse_arg(arg, "threshold");
        } else {
            print_notice_and_exit(Some(format!("Unrecognized argument: {arg}")))
        }
    }

    let params = match ProtocolParametersBuilder::new()
        .set_parties(num_parties)
        .set_threshold(threshold)
        .set_set_size(set_size)
        .build()
    {
        Ok(params) => params,
        Err(e) => {
            print_notice_and_exit(Some(e.to_string()));
            return Ok(());
        }
    };

    println!("# Threshold private set intersection");
    println!("\tnum_parties = {num_parties}");
    println!("\tset_size = {set_size}");
    println!("\tthreshold = {threshold}");

    // Every party holds 1..=common plus up to two elements of its own.
    let common = set_size - set_size.min(2);
    let sets: Vec<Vec<BigUint>> = (0..num_parties)
        .map(|i| {
            (1..=common)
                .chain((0..set_size - common).map(|j| 1000 * (i + 1) + j))
                .map(BigUint::from)
                .collect()
        })
        .collect();

    let start = Instant::now();
    let (scheme, keys) = ThresholdPaillier::generate_for(&params, prime_bits, &mut OsRng)?;
    println!(
        "{} Key generation: {:?}",
        style("  ⏱").cyan(),
        start.elapsed()
    );

    let scheme = Arc::new(scheme);
    let topologies = star::<ThresholdPaillier>(num_parties)?;
    let start = Instant::now();
    let outcomes = std::thread::scope(|s| {
        let handles = topologies
            .into_iter()
            .zip(&keys)
            .zip(&sets)
            .enumerate()
            .map(|(i, ((topology, key), items))| {
                let setting = Setting::new(params, i, scheme.clone());
                s.spawn(move || {
                    let setting = setting?;
                    if i == 0 {
                        run_coordinator(items, key, &setting, &topology)
                    } else {
                        run_participant(items, key, &setting, &topology)
                    }
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(outcome) => outcome.map_err(Box::<dyn Error>::from),
                Err(_) => Err("a party panicked".into()),
            })
            .collect::<Result<Vec<_>, Box<dyn Error>>>()
    })?;
    println!(
        "{} Protocol run: {:?}",
        style("  ⏱").cyan(),
        start.elapsed()
    );

    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            Outcome::Intersection { shared, unique } => println!(
                "{} party {i}: shared {:?}, unique {:?}",
                style("✓").green().bold(),
                shared.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
                unique.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
            ),
            Outcome::CardinalityTestFailed => println!(
                "{} party {i}: more than {threshold} elements outside the intersection",
                style("✗").red().bold(),
            ),
        }
    }

    Ok(())
}
