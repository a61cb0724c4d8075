//! Compares a one-place buffer that forwards each name received on `a` to `b` with a relay
//! that hands the name through a number of internal stages first.

use fra_bisim::*;

/// `a(x).b<x>` repeated forever.
fn buffer() -> Result<Lts<String>, Error> {
    let empty = Registers::from_iter([(1, "a"), (2, "b")]);
    let full = Registers::from_iter([(1, "a"), (2, "b"), (3, "x")]);
    Ok(Lts::new(
        [
            (0, Configuration::new("Buf".to_string(), empty)),
            (1, Configuration::new("b<x>.Buf".to_string(), full)),
        ],
        [
            Transition::new(0, Label::fresh_input(1, 3), 1),
            Transition::new(1, Label::output(2, 3), 0),
        ],
    )?
    .with_free_names([("a", "a"), ("b", "b")]))
}

/// `a(x).τ...τ.b<x>` repeated forever, with `hops` internal steps.
fn relay(hops: usize) -> Result<Lts<String>, Error> {
    let empty = Registers::from_iter([(1, "a"), (2, "b")]);
    let full = Registers::from_iter([(1, "a"), (2, "b"), (3, "x")]);
    let mut states = vec![(0, Configuration::new("Relay".to_string(), empty))];
    let mut transitions = vec![Transition::new(0, Label::fresh_input(1, 3), 1)];
    for stage in 1..=hops + 1 {
        let remaining = hops + 1 - stage;
        states.push((stage, Configuration::new(format!("{}b<x>.Relay", "τ.".repeat(remaining)), full.clone())));
        if remaining == 0 {
            transitions.push(Transition::new(stage, Label::output(2, 3), 0));
        } else {
            transitions.push(Transition::new(stage, Label::tau(), stage + 1));
        }
    }
    Ok(Lts::new(states, transitions)?.with_free_names([("a", "a"), ("b", "b")]))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::default()
        .default_filter_or("info")); // `RUST_LOG=${LEVEL}` env variable to override

    let mut args = pico_args::Arguments::from_env();
    let garbage_collection = args.contains("--gc");
    let json = args.contains("--json");
    let algorithm = if args.contains("--floyd-warshall") {
        ClosureAlgorithm::FloydWarshall
    } else {
        ClosureAlgorithm::DepthFirst
    };
    match args.subcommand()?.as_deref() {
        Some(mode @ ("strong" | "weak")) => {
            let hops = args.opt_free_from_str()?.unwrap_or(2);
            println!("Checking the buffer against a relay with {} internal hops ({} bisimulation).", hops, mode);

            let left = buffer()?;
            let right = relay(hops)?;
            let builder = BisimBuilder::new(&left, &right).garbage_collection(garbage_collection);
            let builder = if mode == "weak" { builder.weak(algorithm) } else { builder };
            let outcome = builder.check_and_report(&mut WriteReporter::new(&mut std::io::stdout()))?;
            if let (true, Some(witness)) = (json, &outcome.witness) {
                println!("{}", witness.to_json()?);
            }
        }
        _ => {
            println!("USAGE:");
            println!("  ./buffer strong [HOPS] [--gc] [--json]");
            println!("  ./buffer weak [HOPS] [--gc] [--json] [--floyd-warshall]");
        }
    }

    Ok(())
}
