use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use topograph::graph::wire;
use topograph::{
    Algorithm, DEFAULT_NODE_SIZE, ElementRef, GraphIndex, Highlight, Highlighter, Partition,
    Topology,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Topology(topograph::Error),
    Json(serde_json::Error),
    Config(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Topology(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Config(msg) => write!(f, "invalid layout config: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<topograph::Error> for CliError {
    fn from(value: topograph::Error) -> Self {
        Self::Topology(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Highlight,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    algorithm: Option<String>,
    config: Option<String>,
    node_size: (f64, f64),
    hover: Option<String>,
    select: Option<String>,
    edge: bool,
    out: Option<String>,
}

#[derive(Serialize)]
struct Ids<'a> {
    nodes: Vec<&'a str>,
    edges: Vec<&'a str>,
}

#[derive(Serialize)]
struct HighlightOut<'a> {
    selected: Option<&'a ElementRef>,
    hovered: Option<&'a ElementRef>,
    highlighted: Ids<'a>,
    unhighlighted: Ids<'a>,
}

fn usage() -> &'static str {
    "topograph\n\
\n\
USAGE:\n\
  topograph [layout] [--algorithm breadthfirst|grid|concentric|hierarchical|box] [--config <json>|@<path>] [--node-size <w>,<h>] [--pretty] [--out <path>] [<path>|-]\n\
  topograph highlight [--hover <id>] [--select <id>] [--edge] [--node-size <w>,<h>] [--pretty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the topology JSON is read from stdin.\n\
  - Input is either the backend element envelope ({\"elements\": {...}}) or a plain graph.\n\
  - --config takes layout options in camelCase; its \"name\" is overridden by --algorithm.\n\
  - highlight applies --hover first, then --select; --edge treats both ids as edge ids.\n\
  - Set TOPOGRAPH_LOG (e.g. TOPOGRAPH_LOG=debug) to log to stderr.\n\
"
}

fn parse_node_size(raw: &str) -> Option<(f64, f64)> {
    let (w, h) = raw.split_once(',')?;
    let w = w.trim().parse::<f64>().ok()?;
    let h = h.trim().parse::<f64>().ok()?;
    (w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0).then_some((w, h))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        node_size: (DEFAULT_NODE_SIZE, DEFAULT_NODE_SIZE),
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "highlight" => args.command = Command::Highlight,
            "--pretty" => args.pretty = true,
            "--edge" => args.edge = true,
            "--algorithm" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.algorithm = Some(name.trim().to_ascii_lowercase());
            }
            "--config" => {
                let Some(config) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(config.clone());
            }
            "--node-size" => {
                let Some(size) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.node_size = parse_node_size(size).ok_or(CliError::Usage(usage()))?;
            }
            "--hover" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.hover = Some(id.clone());
            }
            "--select" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.select = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    match out {
        None | Some("-") => print!("{text}"),
        Some(path) => std::fs::write(path, text)?,
    }
    Ok(())
}

/// Merges `--config` and `--algorithm` into one tagged options object.
fn build_algorithm(name: Option<&str>, config: Option<&str>) -> Result<Algorithm, CliError> {
    let mut value = match config {
        None => Value::Object(Default::default()),
        Some(raw) => {
            let text = match raw.strip_prefix('@') {
                Some(path) => std::fs::read_to_string(path)?,
                None => raw.to_string(),
            };
            serde_json::from_str::<Value>(&text)?
        }
    };
    let Some(object) = value.as_object_mut() else {
        return Err(CliError::Config("expected a JSON object".to_string()));
    };
    match name {
        Some(name) => {
            object.insert("name".to_string(), Value::String(name.to_string()));
        }
        None => {
            object
                .entry("name")
                .or_insert_with(|| Value::String(Algorithm::default().name().to_string()));
        }
    }
    serde_json::from_value(value).map_err(|err| CliError::Config(err.to_string()))
}

fn focus(id: Option<&str>, edge: bool) -> Option<ElementRef> {
    id.map(|id| {
        if edge {
            ElementRef::edge(id)
        } else {
            ElementRef::node(id)
        }
    })
}

fn ids<'a>(index: &'a GraphIndex<'a>, part: &Partition, state: Highlight) -> Ids<'a> {
    Ids {
        nodes: (0..index.node_count())
            .filter(|&ix| part.node(ix) == state)
            .map(|ix| index.node_id(ix))
            .collect(),
        edges: (0..index.edge_count())
            .filter(|&ix| part.edge(ix) == state)
            .map(|ix| index.edge_id(ix))
            .collect(),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let graph = wire::from_json(&text, args.node_size)?;

    match args.command {
        Command::Layout => {
            let algorithm = build_algorithm(args.algorithm.as_deref(), args.config.as_deref())?;
            tracing::info!(algorithm = algorithm.name(), "laying out");
            let result = topograph::layout(&graph, &algorithm)?;
            write_json(&result, args.pretty, args.out.as_deref())
        }
        Command::Highlight => {
            graph.validate()?;
            let index = GraphIndex::new(&graph);
            let mut highlighter = Highlighter::new();
            if let Some(target) = focus(args.hover.as_deref(), args.edge) {
                highlighter.on_mouse_in(&index, target);
            }
            if let Some(target) = focus(args.select.as_deref(), args.edge) {
                highlighter.on_click(&index, Some(target));
            }
            let part = highlighter.partition();
            tracing::info!(
                highlighted = part.count(Highlight::Highlighted),
                unhighlighted = part.count(Highlight::Unhighlighted),
                "highlight computed"
            );
            let out = HighlightOut {
                selected: highlighter.selected(),
                hovered: highlighter.hovered(),
                highlighted: ids(&index, part, Highlight::Highlighted),
                unhighlighted: ids(&index, part, Highlight::Unhighlighted),
            };
            write_json(&out, args.pretty, args.out.as_deref())
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("TOPOGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
