// cfpq-cli: shared utilities for CLI tools.

use std::path::{Path, PathBuf};
use std::process;

use cfpq_tensor::{SolveError, TensorSolver};
use tracing_subscriber::EnvFilter;

/// Environment variable naming a data directory.
pub const DATA_PATH_ENV: &str = "CFPQ_DATA_PATH";

/// Subdirectory of a data directory holding graph edge lists.
const GRAPHS_SUBDIR: &str = "graphs";

/// Subdirectory of a data directory holding grammar files.
const GRAMMARS_SUBDIR: &str = "grammars";

/// Log filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve graph and grammar arguments and build a solver.
///
/// Each argument is used as-is if it names an existing file; otherwise it
/// is looked up in the data directories, in order:
/// 1. `data_path` argument (if provided)
/// 2. `CFPQ_DATA_PATH` environment variable
/// 3. `./data`
/// 4. Current working directory
///
/// Graphs are found at `<dir>/graphs/<name>` or `<dir>/graphs/<name>.txt`,
/// grammars at `<dir>/grammars/<name>`.
pub fn load_solver(
    data_path: Option<&str>,
    graph: &str,
    grammar: &str,
) -> Result<TensorSolver, String> {
    let search_paths = build_search_paths(data_path);
    let graph_path = resolve(&search_paths, GRAPHS_SUBDIR, graph, &["", ".txt"])?;
    let grammar_path = resolve(&search_paths, GRAMMARS_SUBDIR, grammar, &[""])?;
    tracing::debug!(
        graph = %graph_path.display(),
        grammar = %grammar_path.display(),
        "resolved inputs"
    );
    TensorSolver::from_files(&graph_path, &grammar_path).map_err(|e: SolveError| e.to_string())
}

/// Find `name` directly or under `<dir>/<subdir>/` with one of `suffixes`.
fn resolve(
    search_paths: &[PathBuf],
    subdir: &str,
    name: &str,
    suffixes: &[&str],
) -> Result<PathBuf, String> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }

    let mut tried = Vec::new();
    for dir in search_paths {
        for suffix in suffixes {
            let candidate = dir.join(subdir).join(format!("{name}{suffix}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
            tried.push(candidate);
        }
    }

    Err(format!(
        "could not find {} `{}` in any of the search paths:\n{}",
        subdir.trim_end_matches('s'),
        name,
        tried
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Build the list of data directories to search.
fn build_search_paths(data_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = data_path {
        paths.push(PathBuf::from(p));
    }

    if let Ok(env_path) = std::env::var(DATA_PATH_ENV) {
        paths.push(PathBuf::from(env_path));
    }

    paths.push(PathBuf::from("data"));

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }

    paths
}

/// Parse a `--data-path=PATH` or `-d PATH` argument from command line args.
///
/// Returns `(data_path, remaining_args)`.
pub fn parse_data_path(args: &[String]) -> (Option<String>, Vec<String>) {
    let mut data_path = None;
    let mut remaining = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if let Some(val) = arg.strip_prefix("--data-path=") {
            data_path = Some(val.to_string());
        } else if arg == "--data-path" || arg == "-d" {
            match iter.next() {
                Some(val) => data_path = Some(val.clone()),
                None => fatal(&format!("{arg} requires a value")),
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (data_path, remaining)
}

/// Take the value of `--name VALUE` or `--name=VALUE` out of `args`.
///
/// Returns `Err` if the flag is present without a value, including when the
/// next argument is another `--` option.
pub fn take_value(args: &mut Vec<String>, name: &str) -> Result<Option<String>, String> {
    let prefix = format!("{name}=");
    let Some(pos) = args.iter().position(|a| a == name || a.starts_with(&prefix)) else {
        return Ok(None);
    };
    let arg = args.remove(pos);
    if let Some(val) = arg.strip_prefix(&prefix) {
        return Ok(Some(val.to_string()));
    }
    if pos < args.len() && !args[pos].starts_with("--") {
        Ok(Some(args.remove(pos)))
    } else {
        Err(format!("{name} requires a value"))
    }
}

/// Remove a boolean `flag` from `args`, returning whether it was present.
pub fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn fixture_dir() -> String {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../cfpq-tensor/tests/data")
            .display()
            .to_string()
    }

    #[test]
    fn data_path_forms() {
        let (path, rest) = parse_data_path(&args(&["-d", "/x", "--graph", "g"]));
        assert_eq!(path.as_deref(), Some("/x"));
        assert_eq!(rest, args(&["--graph", "g"]));

        let (path, rest) = parse_data_path(&args(&["--data-path=/y"]));
        assert_eq!(path.as_deref(), Some("/y"));
        assert!(rest.is_empty());

        let (path, _) = parse_data_path(&args(&["--pairs", "S"]));
        assert!(path.is_none());
    }

    #[test]
    fn take_value_forms() {
        let mut a = args(&["--graph", "g", "--grammar=s", "--derived-only"]);
        assert_eq!(take_value(&mut a, "--graph").unwrap().as_deref(), Some("g"));
        assert_eq!(take_value(&mut a, "--grammar").unwrap().as_deref(), Some("s"));
        assert_eq!(take_value(&mut a, "--pairs").unwrap(), None);
        assert_eq!(a, args(&["--derived-only"]));

        let mut a = args(&["--pairs"]);
        assert!(take_value(&mut a, "--pairs").is_err());
    }

    #[test]
    fn take_value_leaves_following_option_alone() {
        let mut a = args(&["--pairs", "--stats"]);
        assert_eq!(
            take_value(&mut a, "--pairs"),
            Err("--pairs requires a value".to_string())
        );
        assert_eq!(a, args(&["--stats"]));
        assert!(take_flag(&mut a, "--stats"));

        // A lone dash is still a value.
        let mut a = args(&["--pairs", "-"]);
        assert_eq!(take_value(&mut a, "--pairs").unwrap().as_deref(), Some("-"));
    }

    #[test]
    fn take_flag_removes_every_occurrence() {
        let mut a = args(&["--stats", "x", "--stats"]);
        assert!(take_flag(&mut a, "--stats"));
        assert_eq!(a, args(&["x"]));
        assert!(!take_flag(&mut a, "--stats"));
    }

    #[test]
    fn help_detection() {
        assert!(wants_help(&args(&["--graph", "g", "-h"])));
        assert!(!wants_help(&args(&["--graph", "g"])));
    }

    #[test]
    fn search_paths_start_with_explicit_dir() {
        let paths = build_search_paths(Some("/explicit"));
        assert_eq!(paths[0], PathBuf::from("/explicit"));
        assert!(paths.contains(&PathBuf::from("data")));
    }

    #[test]
    fn resolves_names_in_data_dir() {
        let dir = fixture_dir();
        let solver = load_solver(Some(&dir), "ab_bamboo", "dyck1_1").unwrap();
        assert_eq!(solver.graph().size(), 5);
        assert_eq!(solver.solve().nvals("S"), 9);
    }

    #[test]
    fn resolves_direct_paths() {
        let dir = fixture_dir();
        let graph = format!("{dir}/graphs/ab_bamboo.txt");
        let grammar = format!("{dir}/grammars/matching_pairs");
        let solver = load_solver(None, &graph, &grammar).unwrap();
        assert_eq!(solver.solve().nvals("S"), 8);
    }

    #[test]
    fn missing_name_lists_candidates() {
        let dir = fixture_dir();
        let err = load_solver(Some(&dir), "no_such_graph", "dyck1_1").unwrap_err();
        assert!(err.contains("could not find graph `no_such_graph`"));
        assert!(err.contains("no_such_graph.txt"));
    }
}
