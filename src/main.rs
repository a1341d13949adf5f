use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use regex::Regex;
use std::fs::File;
use std::path::{Path, PathBuf};

use un_trace::diagnostics;
use un_trace::export::AssociationMode;
use un_trace::extract::{extract_barriers, extract_controllers};
use un_trace::trace::{all_nodes, shortest_path};
use un_trace::{
    ForwardStarOptions, Graph, NodeKey, ParseOptions, ParsedExport, build_graph, build_report,
    parse_export,
};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "un-trace")]
#[command(about = "Utility network trace export analyzer", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct ExportArgs {
    /// Trace export document (JSON).
    #[arg(long)]
    export: PathBuf,

    /// Keep line segments keyed per segment instead of stitching them per feature.
    #[arg(long)]
    no_stitch: bool,

    /// Record the opposite endpoint on each side of an association.
    #[arg(long)]
    mirror_associations: bool,
}

impl ExportArgs {
    fn options(&self) -> ParseOptions {
        ParseOptions {
            stitch_geometries: !self.no_stitch,
            association_mode: if self.mirror_associations {
                AssociationMode::Mirrored
            } else {
                AssociationMode::AsExported
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parse summary with barrier and controller counts.
    Summary {
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Run downstream trace and forward star, writing a JSON report.
    Analyze {
        #[command(flatten)]
        export: ExportArgs,

        #[arg(long)]
        directed: bool,

        /// Let later starts re-explore nodes reached by earlier ones.
        #[arg(long)]
        with_replacement: bool,

        /// Start from every node key matching this pattern instead of the controllers.
        #[arg(long)]
        starts: Option<String>,

        /// Output file; stdout when omitted.
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Shortest path between two node keys.
    Path {
        #[command(flatten)]
        export: ExportArgs,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long)]
        directed: bool,
    },
}

/// Parse failures are recoverable: report them and continue with empty maps.
fn load_export(args: &ExportArgs) -> Result<ParsedExport> {
    let file = File::open(&args.export).with_context(|| {
        diagnostics::error_message(format!("cannot open export {}", args.export.display()))
    })?;

    Ok(match parse_export(file, &args.options()) {
        Ok(export) => export,
        Err(err) => {
            diagnostics::warn(format!("{}: {}", args.export.display(), err));
            err.into_empty()
        }
    })
}

fn select_starts(pattern: &str, nodes: &[NodeKey]) -> Result<Vec<NodeKey>> {
    let re = Regex::new(pattern).with_context(|| {
        diagnostics::error_message(format!("invalid --starts pattern {:?}", pattern))
    })?;
    Ok(nodes
        .iter()
        .filter(|node| re.is_match(node.as_str()))
        .cloned()
        .collect())
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| {
                diagnostics::error_message(format!("cannot write {}", path.display()))
            })?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init_logging(cli.verbose);

    match cli.cmd {
        Commands::Summary { export } => {
            let parsed = load_export(&export)?;
            let barriers = extract_barriers(&parsed.features);
            let controllers = extract_controllers(&parsed.features);
            print!("{}", parsed.summary);
            println!("Barriers #{}", barriers.len());
            println!("SubnetworkControllers #{}", controllers.len());
        }

        Commands::Analyze {
            export,
            directed,
            with_replacement,
            starts,
            out,
        } => {
            // 1) Parse.
            let parsed = load_export(&export)?;

            // 2) Graph.
            let graph = build_graph(&parsed.connectivity, directed);

            // 3) Starts: pattern over all nodes, or the controllers.
            let selected = match starts.as_deref() {
                Some(pattern) => {
                    let nodes = all_nodes(&graph);
                    let selected = select_starts(pattern, &nodes)?;
                    if selected.is_empty() {
                        diagnostics::warn(format!("no node key matches {:?}", pattern));
                    }
                    Some(selected)
                }
                None => None,
            };

            // 4) Traces + report.
            let report = build_report(
                &parsed,
                &graph,
                selected.as_deref(),
                ForwardStarOptions { with_replacement },
            );
            eprintln!("{}", report.analysis_text());

            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            write_output(out.as_deref(), &json)?;
        }

        Commands::Path {
            export,
            from,
            to,
            directed,
        } => {
            let parsed = load_export(&export)?;
            let graph = build_graph(&parsed.connectivity, directed);

            let from = NodeKey::from_raw(&from);
            let to = NodeKey::from_raw(&to);
            for key in [&from, &to] {
                if !graph.contains_node(key) {
                    diagnostics::warn(format!("{} is not a node of the graph", key));
                }
            }

            let path = shortest_path(&graph, &from, &to)
                .with_context(|| diagnostics::error_message("shortest path failed"))?;
            for node in path {
                println!("{}", node);
            }
        }
    }

    Ok(())
}
