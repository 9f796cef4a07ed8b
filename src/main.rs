use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use query_tree::render::{OutlinePresenter, present};
use query_tree::{Catalog, CatalogSpec, Group, Outcome, QueryBuilder};
use tracing::{debug, info, warn};

mod tracing_init;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "query-tree")]
#[command(about = "Edit nested boolean query trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an edit script against a tree and write the result.
    Apply {
        #[arg(long)]
        catalog: String,

        /// Starting tree. Defaults to an empty root.
        #[arg(long)]
        tree: Option<String>,

        #[arg(long)]
        script: String,

        /// Stop at the first edit whose target no longer resolves.
        #[arg(long)]
        strict: bool,

        #[arg(short = 'o', long)]
        out: String,
    },

    /// Print a tree as an indented outline.
    Show {
        #[arg(long)]
        catalog: String,

        #[arg(long)]
        tree: String,
    },
}

fn main() -> Result<()> {
    tracing_init::init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Apply {
            catalog,
            tree,
            script,
            strict,
            out,
        } => {
            // 1) Catalog + starting tree.
            let catalog = load_catalog(&catalog)?;
            let builder = match &tree {
                Some(path) => QueryBuilder::with_tree(catalog, load_tree(path)?)
                    .with_context(|| format!("load tree {}", path))?,
                None => QueryBuilder::new(catalog)?,
            };
            let mut builder = builder.on_change(|root| {
                debug!(children = root.rules.len(), "tree changed");
            });

            // 2) Script.
            let events = query_tree::script::parse_script_file(&script)?;

            // 3) Replay.
            let mut changed = 0usize;
            for (i, event) in events.iter().enumerate() {
                let outcome = builder.apply_event(event).with_context(|| {
                    format!("edit #{} ({}) on {}", i + 1, event.edit.name(), event.target)
                })?;
                match outcome {
                    Outcome::Changed => changed += 1,
                    Outcome::Stale if strict => {
                        bail!("edit #{} targets {}, which no longer exists", i + 1, event.target)
                    }
                    Outcome::Stale | Outcome::Refused => {
                        warn!(edit = i + 1, target = %event.target, ?outcome, "edit skipped")
                    }
                }
            }
            info!(edits = events.len(), changed, "script replayed");

            // 4) Write.
            let json = serde_json::to_string_pretty(&*builder.tree())?;
            std::fs::write(&out, json).with_context(|| format!("write {}", out))?;
            println!("Wrote {}", out);
        }

        Commands::Show { catalog, tree } => {
            let catalog = load_catalog(&catalog)?;
            let builder = QueryBuilder::with_tree(catalog, load_tree(&tree)?)
                .with_context(|| format!("load tree {}", tree))?;

            let mut outline = OutlinePresenter::new();
            present(builder.root_editor(), &mut outline);
            print!("{}", outline.finish());
        }
    }

    Ok(())
}

fn load_catalog(path: &str) -> Result<Catalog> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read catalog file {}", path))?;
    let spec: CatalogSpec =
        serde_json::from_str(&text).with_context(|| format!("parse catalog {}", path))?;
    spec.validate_and_build()
        .with_context(|| format!("invalid catalog {}", path))
}

fn load_tree(path: &str) -> Result<Group> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read tree file {}", path))?;
    Group::from_json(&text).with_context(|| format!("invalid tree {}", path))
}
