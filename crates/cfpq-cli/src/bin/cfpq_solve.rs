// cfpq-solve: Context-free path querying over a labeled graph.
//
// Loads a graph edge list and an RSM grammar, computes the closure and
// prints one `<label>\t<count>` line per label. With --pairs, also prints
// every pair of one label as `<u>\t<v>`.
//
// Usage:
//   cfpq-solve [-d DATA_PATH] --graph GRAPH --grammar GRAMMAR [OPTIONS]
//
// Options:
//   -d, --data-path PATH   Directory containing graphs/ and grammars/
//   --graph GRAPH          Graph file, or name under <data>/graphs
//   --grammar GRAMMAR      Grammar file, or name under <data>/grammars
//   --pairs LABEL          Print every pair of LABEL
//   --derived-only         Leave input edges unmatched by the grammar out
//   --reverse-seeds        Drain seed edges in reverse order
//   --stats                Print run counters to stderr
//   -h, --help             Print help

use std::io::{self, Write};

use cfpq_tensor::{SeedOrder, SolverConfig};

fn main() {
    cfpq_cli::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_path, mut args) = cfpq_cli::parse_data_path(&args);

    if cfpq_cli::wants_help(&args) {
        println!("cfpq-solve: Context-free path querying over a labeled graph.");
        println!();
        println!("Usage: cfpq-solve [-d DATA_PATH] --graph GRAPH --grammar GRAMMAR [OPTIONS]");
        println!();
        println!("GRAPH and GRAMMAR are file paths, or names looked up under");
        println!("<data>/graphs and <data>/grammars in DATA_PATH, $CFPQ_DATA_PATH,");
        println!("./data and the current directory.");
        println!();
        println!("Options:");
        println!("  -d, --data-path PATH   Directory containing graphs/ and grammars/");
        println!("  --graph GRAPH          Graph file or name");
        println!("  --grammar GRAMMAR      Grammar file or name");
        println!("  --pairs LABEL          Print every pair of LABEL");
        println!("  --derived-only         Leave input edges unmatched by the grammar out");
        println!("  --reverse-seeds        Drain seed edges in reverse order");
        println!("  --stats                Print run counters to stderr");
        println!("  -h, --help             Print this help");
        return;
    }

    let value = |args: &mut Vec<String>, name: &str| {
        cfpq_cli::take_value(args, name).unwrap_or_else(|e| cfpq_cli::fatal(&e))
    };
    let graph =
        value(&mut args, "--graph").unwrap_or_else(|| cfpq_cli::fatal("--graph is required"));
    let grammar =
        value(&mut args, "--grammar").unwrap_or_else(|| cfpq_cli::fatal("--grammar is required"));
    let pairs_label = value(&mut args, "--pairs");
    let derived_only = cfpq_cli::take_flag(&mut args, "--derived-only");
    let reverse_seeds = cfpq_cli::take_flag(&mut args, "--reverse-seeds");
    let print_stats = cfpq_cli::take_flag(&mut args, "--stats");

    if let Some(unknown) = args.first() {
        cfpq_cli::fatal(&format!("unexpected argument `{unknown}`"));
    }

    let seed_order = if reverse_seeds {
        SeedOrder::Reversed
    } else {
        SeedOrder::Forward
    };
    let config = SolverConfig::default()
        .with_seed_order(seed_order)
        .with_input_edges(!derived_only);

    let solver = cfpq_cli::load_solver(data_path.as_deref(), &graph, &grammar)
        .unwrap_or_else(|e| cfpq_cli::fatal(&e))
        .with_config(config);
    let (closure, stats) = solver.solve_with_stats();

    if print_stats {
        eprintln!(
            "vertices={} states={} product={} seeds={} processed={} unions={}",
            closure.size(),
            solver.rsm().states_number(),
            stats.product_size,
            stats.seeds,
            stats.processed,
            stats.unions
        );
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for label in closure.labels() {
        let _ = writeln!(out, "{label}\t{}", closure.nvals(label));
    }

    if let Some(label) = pairs_label {
        let Some(relation) = closure.get(&label) else {
            let _ = out.flush();
            cfpq_cli::fatal(&format!("label `{label}` is not in the closure"));
        };
        let _ = writeln!(out);
        for (u, v) in relation.sorted_pairs() {
            let _ = writeln!(out, "{u}\t{v}");
        }
    }
}
