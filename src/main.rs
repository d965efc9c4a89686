//! amor CLI: inspect and edit an ontology through a reasoner-backed reference.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use amor::config::{CreateMode, ReferenceConfig};
use amor::naming::names;
use amor::reference::Reference;
use amor::registry::ReferenceRegistry;
use amor::Completeness;

#[derive(Parser)]
#[command(name = "amor", version, about = "Query and edit an ontology through a reasoner")]
struct Cli {
    /// Reference config (TOML). Takes precedence over --ontology.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ontology document to load (.ttl, .nt, .owl, .rdf).
    #[arg(long, global = true)]
    ontology: Option<PathBuf>,

    /// Ontology IRI; names are resolved against `<iri>#`.
    #[arg(long, global = true)]
    iri: Option<String>,

    /// Reasoner factory key.
    #[arg(long, global = true)]
    reasoner: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize the reasoner and report consistency.
    Check,

    /// List the individuals of a class.
    Individuals {
        #[arg(long)]
        class: String,
        /// Only direct instances.
        #[arg(long)]
        direct: bool,
    },

    /// List the types of an individual.
    Types {
        #[arg(long)]
        individual: String,
        /// Only the most specific types.
        #[arg(long)]
        direct: bool,
    },

    /// List the sub-classes of a class.
    Subclasses {
        #[arg(long)]
        class: String,
        #[arg(long)]
        direct: bool,
    },

    /// List the super-classes of a class.
    Superclasses {
        #[arg(long)]
        class: String,
        #[arg(long)]
        direct: bool,
    },

    /// Assert that an individual belongs to a class and save the result.
    Assert {
        #[arg(long)]
        individual: String,
        #[arg(long)]
        class: String,
        /// Where to write the ontology (defaults to the loaded file).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show reference info and statistics.
    Info {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn mode(direct: bool) -> Completeness {
    if direct {
        Completeness::Direct
    } else {
        Completeness::Transitive
    }
}

fn resolve_config(cli: &Cli) -> Result<ReferenceConfig> {
    let mut config = match (&cli.config, &cli.ontology) {
        (Some(path), _) => ReferenceConfig::load(path)?,
        (None, Some(file)) => {
            let iri = cli.iri.clone().unwrap_or_else(|| default_iri(file));
            ReferenceConfig::from_file(iri, file)
        }
        (None, None) => miette::bail!("pass --config or --ontology"),
    };
    if let Some(iri) = &cli.iri {
        config.ontology_iri = iri.clone();
    }
    if let Some(key) = &cli.reasoner {
        config.reasoner = key.clone();
    }
    Ok(config)
}

fn default_iri(file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ontology".into());
    format!("http://www.semanticweb.org/{stem}")
}

fn print_set(title: &str, items: std::collections::BTreeSet<String>) {
    if items.is_empty() {
        println!("{title}: none");
    } else {
        println!("{title} ({}):", items.len());
        for item in items {
            println!("  {item}");
        }
    }
}

fn report_consistency(reference: &Reference) {
    if reference.is_consistent() {
        println!("consistent");
    } else {
        println!("INCONSISTENT");
        if let Some(text) = reference.last_explanation() {
            println!("{text}");
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let registry = ReferenceRegistry::new();
    let reference: Arc<Reference> = registry.create("cli", config)?;

    match cli.command {
        Commands::Check => {
            reference.synchronize();
            report_consistency(&reference);
        }

        Commands::Individuals { class, direct } => {
            let found = reference.individuals_of_with(&class, mode(direct));
            print_set(&format!("individuals of {class}"), names(found));
        }

        Commands::Types { individual, direct } => {
            let found = reference.types_of_with(&individual, mode(direct));
            print_set(&format!("types of {individual}"), names(found));
        }

        Commands::Subclasses { class, direct } => {
            let found = reference.sub_classes_of_with(&class, mode(direct));
            print_set(&format!("sub-classes of {class}"), names(found));
        }

        Commands::Superclasses { class, direct } => {
            let found = reference.super_classes_of_with(&class, mode(direct));
            print_set(&format!("super-classes of {class}"), names(found));
        }

        Commands::Assert {
            individual,
            class,
            output,
        } => {
            let changes = reference.add_individual_to_class(&individual, &class);
            reference.synchronize();
            if !reference.is_consistent() {
                report_consistency(&reference);
                miette::bail!("assertion makes the ontology inconsistent; not saved");
            }
            reference.save(output.as_deref())?;
            println!("applied {} change(s)", changes.len());
            for change in &changes {
                println!("  {change}");
            }
        }

        Commands::Info { json } => {
            reference.synchronize();
            let snapshot = reference.ontology_snapshot();
            let (classes, individuals, object_properties, data_properties) = snapshot
                .as_ref()
                .map(|o| {
                    (
                        o.classes().len(),
                        o.individuals().len(),
                        o.object_properties().len(),
                        o.data_properties().len(),
                    )
                })
                .unwrap_or_default();
            let cfg = reference.config();
            if json {
                let info = serde_json::json!({
                    "ontology_iri": cfg.ontology_iri,
                    "reasoner": cfg.reasoner,
                    "mode": cfg.mode,
                    "axioms": reference.axiom_count(),
                    "classes": classes,
                    "individuals": individuals,
                    "object_properties": object_properties,
                    "data_properties": data_properties,
                    "consistent": reference.is_consistent(),
                });
                let json = serde_json::to_string_pretty(&info).into_diagnostic()?;
                println!("{json}");
            } else {
                println!("Ontology: <{}>", cfg.ontology_iri);
                if cfg.mode == CreateMode::LoadFromFile {
                    if let Some(path) = &cfg.file_path {
                        println!("  file:              {}", path.display());
                    }
                }
                println!("  reasoner:          {}", cfg.reasoner);
                println!("  axioms:            {}", reference.axiom_count());
                println!("  classes:           {classes}");
                println!("  individuals:       {individuals}");
                println!("  object properties: {object_properties}");
                println!("  data properties:   {data_properties}");
                print!("  status:            ");
                report_consistency(&reference);
            }
        }
    }

    Ok(())
}
