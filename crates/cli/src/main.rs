use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use taxonomy_merge::{merge, MergeConfig, MergeInput, RuleClassifier};

mod tsv;

#[derive(Parser)]
#[command(name = "taxonomy")]
#[command(about = "Consolidate category and ontology hierarchies into one taxonomy", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the category hierarchy with the class hierarchy
    Merge(MergeArgs),
}

#[derive(Args)]
struct MergeArgs {
    /// TSV triples: category -> ontology class
    #[arg(long, value_name = "FILE")]
    category_class: PathBuf,

    /// TSV triples: subcategory -> supercategory
    #[arg(long, value_name = "FILE")]
    category_hierarchy: PathBuf,

    /// TSV triples: subclass -> superclass
    #[arg(long, value_name = "FILE")]
    class_hierarchy: PathBuf,

    /// Branch configuration (TOML): branch_roots, branch_groups, flags
    #[arg(long, value_name = "FILE")]
    branches: PathBuf,

    /// Classifier rules (TOML); defaults to the built-in patterns
    #[arg(long, value_name = "FILE")]
    classifier: Option<PathBuf>,

    /// Output TSV path
    #[arg(long, short = 'o', value_name = "FILE")]
    output: PathBuf,

    /// Relation name used for every output triple
    #[arg(long, default_value = "subsumedBy")]
    relation: String,

    /// Print merge statistics as JSON on stdout
    #[arg(long)]
    stats_json: bool,
}

/// On-disk classifier rules. Omitted patterns fall back to the built-ins.
#[derive(Debug, Deserialize)]
struct ClassifierSpec {
    ill_formed: Option<Vec<String>>,
    #[serde(default)]
    projections: HashMap<String, String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Merge(args) => run_merge(args),
    }
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let input = MergeInput {
        category_to_class: tsv::read_pairs(&args.category_class)?,
        category_hierarchy: tsv::read_pairs(&args.category_hierarchy)?,
        class_hierarchy: tsv::read_pairs(&args.class_hierarchy)?,
    };
    let config: MergeConfig = read_toml(&args.branches)?;
    let classifier = match &args.classifier {
        Some(path) => build_classifier(read_toml(path)?)?,
        None => RuleClassifier::new(),
    };

    let outcome = merge(&input, &config, &classifier, None)?;
    tsv::write_facts(&args.output, &outcome.facts, &args.relation)?;

    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&outcome.stats)?);
    } else {
        eprintln!(
            "Wrote {} facts to {} ({} categories, {} classes in)",
            outcome.facts.len(),
            args.output.display(),
            outcome.stats.categories,
            outcome.stats.classes
        );
    }
    Ok(())
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Invalid TOML in {}", path.display()))
}

fn build_classifier(spec: ClassifierSpec) -> Result<RuleClassifier> {
    let mut classifier = match spec.ill_formed {
        Some(patterns) => RuleClassifier::from_rules(patterns, HashMap::new())
            .context("Invalid ill-formed pattern in classifier rules")?,
        None => RuleClassifier::new(),
    };
    for (category, class) in spec.projections {
        classifier.add_projection(category, class);
    }
    Ok(classifier)
}
