use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use aco_engine::{Colony, Parameters};
use aco_instances::{tsplib, Instance};
use anyhow::{anyhow, Context, Result};
use clap::{arg, Command};
use serde_json::json;

fn cli() -> Command {
    Command::new("aco-worker")
        .about("Approximates symmetric TSP tours with an ant colony")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Runs the colony against an instance")
                .arg(
                    arg!(<INSTANCE> "Path to a TSPLIB or JSON instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--params [PARAMS] "Parameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--ants [ANTS] "Overrides the number of ants")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--workers [WORKERS] "Overrides the number of concurrent agents")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--seed [SEED] "Overrides the base seed")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("verify_tour")
                .about("Recomputes and validates a tour against an instance")
                .arg(
                    arg!(<INSTANCE> "Path to a TSPLIB or JSON instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<TOUR> "Route json array (string or path to json file)")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("generate_instance")
                .about("Generates a deterministic random instance as json")
                .arg(arg!(<NUM_NODES> "Number of nodes").value_parser(clap::value_parser!(usize)))
                .arg(arg!(<SEED> "Generation seed").value_parser(clap::value_parser!(u64)))
                .arg(
                    arg!(--output [PATH] "Write the instance here instead of stdout")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("params").cloned(),
            sub_m.get_one::<u64>("ants").copied(),
            sub_m.get_one::<usize>("workers").copied(),
            sub_m.get_one::<u64>("seed").copied(),
        ),
        Some(("verify_tour", sub_m)) => verify_tour(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("TOUR").unwrap().clone(),
        ),
        Some(("generate_instance", sub_m)) => generate_instance(
            *sub_m.get_one::<usize>("NUM_NODES").unwrap(),
            *sub_m.get_one::<u64>("SEED").unwrap(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve(
    instance: PathBuf,
    params: Option<String>,
    ants: Option<u64>,
    workers: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let instance = load_instance(&instance)?;
    let mut params = match params {
        Some(params) => load_params(&params)?,
        None => Parameters::default(),
    };
    if let Some(ants) = ants {
        params.num_ants = ants;
    }
    if let Some(workers) = workers {
        params.num_workers = workers;
    }
    if let Some(seed) = seed {
        params.seed = Some(seed);
    }

    let colony = Colony::new(params)?;
    let summary = colony.run(Arc::new(instance), |received, best| {
        println!("[{} results] best distance so far: {}", received, best.distance);
    })?;

    println!("----Final Result----");
    println!(
        "{}",
        serde_json::to_string(&json!({
            "distance": summary.best.distance,
            "route": summary.best.route,
            "completed": summary.completed,
            "failed": summary.failed,
        }))?
    );
    Ok(())
}

fn verify_tour(instance: PathBuf, tour: String) -> Result<()> {
    let instance = load_instance(&instance)?;
    let route: Vec<usize> = serde_json::from_str(&load_string_or_file(&tour)?)
        .map_err(|e| anyhow!("Failed to parse tour json: {}", e))?;
    let distance = instance
        .tour_distance(&route)
        .map_err(|e| anyhow!("Invalid tour: {}", e))?;
    println!("{}", serde_json::to_string(&json!({ "distance": distance }))?);
    Ok(())
}

fn generate_instance(num_nodes: usize, seed: u64, output: Option<PathBuf>) -> Result<()> {
    let instance = Instance::generate(seed, num_nodes)?;
    let contents = serde_json::to_string(&instance)?;
    match output {
        Some(path) => fs::write(&path, contents)
            .with_context(|| format!("Failed to write instance to {}", path.display()))?,
        None => println!("{}", contents),
    }
    Ok(())
}

/// Accepts either a TSPLIB coordinate file or a json-serialized `Instance`,
/// sniffed by content.
fn load_instance(path: &Path) -> Result<Instance> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read instance file: {}", path.display()))?;
    if contents.trim_start().starts_with('{') {
        let instance: Instance = serde_json::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse json instance: {}", e))?;
        // deserialized matrices are untrusted; reject them before the
        // solver can index into them
        instance
            .validate()
            .with_context(|| format!("Invalid instance file: {}", path.display()))?;
        Ok(instance)
    } else {
        tsplib::parse_instance(&contents)
            .with_context(|| format!("Failed to parse instance file: {}", path.display()))
    }
}

fn load_params(params: &str) -> Result<Parameters> {
    serde_json::from_str(&load_string_or_file(params)?)
        .map_err(|e| anyhow!("Failed to parse parameters: {}", e))
}

fn load_string_or_file(value: &str) -> Result<String> {
    if Path::new(value).is_file() {
        fs::read_to_string(value).with_context(|| format!("Failed to read file: {}", value))
    } else {
        Ok(value.to_string())
    }
}
