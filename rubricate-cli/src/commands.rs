//! CLI subcommand handlers.

use indexmap::IndexMap;
use rubricate_core::catalog::{Catalog, CatalogSpec, MemoryCatalog, RubricFilter};
use rubricate_core::config::{self, RubricateConfig};
use rubricate_core::{
    ConsolidatedResult, ConsolidationMode, EvaluationService, Rubric, RubricBuilder, ScoreInput,
    ScoringError, WeightConfig, WeightConfigBuilder, seed, templates,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::{Commands, ConfigAction, DomainAction, RubricAction, WeightsAction};

/// Everything a handler needs besides its own arguments.
pub struct Context {
    pub workspace: PathBuf,
    pub config: RubricateConfig,
    pub json: bool,
}

impl Context {
    fn catalog_path(&self) -> PathBuf {
        self.config.catalog.resolve_path(&self.workspace)
    }

    /// Workspace catalog, falling back to the seeded catalog (or an empty one
    /// when seeding is disabled).
    fn load_catalog(&self) -> anyhow::Result<MemoryCatalog> {
        let path = self.catalog_path();
        if let Some(catalog) = MemoryCatalog::load(&path)? {
            tracing::debug!(path = %path.display(), "Loaded workspace catalog");
            return Ok(catalog);
        }
        if self.config.catalog.seed_defaults {
            Ok(seed::default_catalog()?)
        } else {
            Ok(MemoryCatalog::new())
        }
    }

    fn save_catalog(&self, catalog: &MemoryCatalog) -> anyhow::Result<PathBuf> {
        let path = self.catalog_path();
        catalog.save(&path)?;
        Ok(path)
    }

    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

/// Handle a CLI subcommand.
pub fn handle_command(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Normalize { weights } => handle_normalize(weights, ctx),
        Commands::Rubric { action } => handle_rubric(action, ctx),
        Commands::Domain { action } => handle_domain(action, ctx),
        Commands::Weights { action } => handle_weights(action, ctx),
        Commands::Consolidate {
            config_id,
            scores,
            strict,
            renormalize,
            method,
        } => {
            let mode = if strict {
                ConsolidationMode::Strict
            } else if renormalize {
                ConsolidationMode::Renormalize
            } else {
                ctx.config.consolidation.mode()
            };
            handle_consolidate(&config_id, scores, mode, method, ctx)
        }
        Commands::Import { file } => handle_import(&file, ctx),
        Commands::Config { action } => handle_config(action, ctx),
    }
}

/// Collect `key=value` arguments in order, failing on a repeated key.
fn collect_unique(
    pairs: Vec<(String, f64)>,
    duplicate: impl Fn(String) -> ScoringError,
) -> Result<IndexMap<String, f64>, ScoringError> {
    let mut map = IndexMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        if map.contains_key(&key) {
            return Err(duplicate(key));
        }
        map.insert(key, value);
    }
    Ok(map)
}

fn handle_normalize(weights: Vec<(String, f64)>, ctx: &Context) -> anyhow::Result<()> {
    let raw = collect_unique(weights, |key| {
        ScoringError::invalid_weight(format!("weight '{key}' given more than once"))
    })?;
    let normalized = rubricate_core::normalize(&raw)?;
    ctx.emit(&normalized, |weights| {
        for (key, weight) in weights {
            println!("{key:<24} {weight:.6}");
        }
    })
}

fn handle_rubric(action: RubricAction, ctx: &Context) -> anyhow::Result<()> {
    match action {
        RubricAction::Build {
            domain,
            rubric_type,
            dimension,
            id,
            name,
            criteria,
            save,
        } => {
            let mut builder = RubricBuilder::new(rubric_type, dimension)
                .maybe_domain(domain)
                .scale(ctx.config.rubrics.scale())
                .criteria(criteria);
            if let Some(id) = id {
                builder = builder.id(id);
            }
            if let Some(name) = name {
                builder = builder.name(name);
            }
            let rubric = builder.build()?;

            if save {
                let mut catalog = ctx.load_catalog()?;
                catalog.insert_rubric(rubric.clone())?;
                let path = ctx.save_catalog(&catalog)?;
                tracing::info!(rubric_id = %rubric.id, path = %path.display(), "Saved rubric");
            }
            // Always JSON: the rubric is the artifact.
            println!("{}", serde_json::to_string_pretty(&rubric)?);
            Ok(())
        }
        RubricAction::List {
            domain,
            rubric_type,
            dimension,
        } => {
            let catalog = ctx.load_catalog()?;
            let filter = RubricFilter {
                domain_id: domain,
                rubric_type,
                evaluation_dimension: dimension,
            };
            let rubrics: Vec<&Rubric> = catalog.rubrics(&filter);
            ctx.emit(&rubrics, |rubrics| {
                if rubrics.is_empty() {
                    println!("No rubrics found.");
                }
                for rubric in rubrics {
                    println!(
                        "{:<28} {:<26} {:<16} {}",
                        rubric.id,
                        rubric.rubric_type.as_str(),
                        rubric.domain_id.as_deref().unwrap_or("(shared)"),
                        rubric.name
                    );
                }
            })
        }
        RubricAction::Show { id } => {
            let catalog = ctx.load_catalog()?;
            let rubric = catalog
                .rubric(&id)
                .ok_or_else(|| anyhow::anyhow!("Rubric '{}' not found", id))?;
            ctx.emit(rubric, print_rubric)
        }
        RubricAction::Templates { domain_id, save } => {
            let rubrics =
                templates::rubrics_for_domain_with_scale(&domain_id, ctx.config.rubrics.scale())?;
            if save {
                let mut catalog = ctx.load_catalog()?;
                for rubric in &rubrics {
                    if catalog.rubric(&rubric.id).is_some() {
                        catalog.update_rubric(rubric.clone())?;
                    } else {
                        catalog.insert_rubric(rubric.clone())?;
                    }
                }
                let path = ctx.save_catalog(&catalog)?;
                tracing::info!(domain_id = %domain_id, count = rubrics.len(), path = %path.display(), "Saved template rubrics");
            }
            ctx.emit(&rubrics, |rubrics| {
                for rubric in rubrics {
                    print_rubric(rubric);
                    println!();
                }
            })
        }
    }
}

fn print_rubric(rubric: &Rubric) {
    println!("{} ({})", rubric.name, rubric.id);
    println!(
        "  type: {}  dimension: {}  domain: {}",
        rubric.rubric_type,
        rubric.evaluation_dimension,
        rubric.domain_id.as_deref().unwrap_or("(shared)")
    );
    println!(
        "  scale: {} - {} (step {})",
        rubric.scoring_scale.min_score, rubric.scoring_scale.max_score, rubric.scoring_scale.step
    );
    if let Some(description) = &rubric.description {
        println!("  {description}");
    }
    for criterion in rubric.criteria() {
        println!(
            "    {:<32} {:>6.3}  {}",
            criterion.name, criterion.normalized_weight, criterion.description
        );
    }
}

fn handle_domain(action: DomainAction, ctx: &Context) -> anyhow::Result<()> {
    let catalog = ctx.load_catalog()?;
    let domains = match action {
        DomainAction::List { category } => catalog.domains(category),
        DomainAction::Search { query } => catalog.search_domains(&query),
    };
    ctx.emit(&domains, |domains| {
        if domains.is_empty() {
            println!("No domains found.");
        }
        for domain in domains {
            println!(
                "{:<20} {:<12} {}",
                domain.id,
                domain.category.as_str(),
                domain.name
            );
        }
    })
}

fn handle_weights(action: WeightsAction, ctx: &Context) -> anyhow::Result<()> {
    match action {
        WeightsAction::Create {
            id,
            name,
            domain,
            method,
            rubrics,
            save,
        } => {
            let method = method.unwrap_or(ctx.config.consolidation.default_method);
            let mut builder = WeightConfigBuilder::new(method).maybe_domain(domain);
            if let Some(id) = id {
                builder = builder.id(id);
            }
            if let Some(name) = name {
                builder = builder.name(name);
            }
            for (rubric_id, weight) in rubrics {
                builder = builder.rubric(rubric_id, weight);
            }
            let weight_config = builder.build()?;

            let mut catalog = ctx.load_catalog()?;
            catalog.add_weight_config(weight_config.clone())?;
            if save {
                let path = ctx.save_catalog(&catalog)?;
                tracing::info!(config_id = %weight_config.id, path = %path.display(), "Saved weight config");
            }
            ctx.emit(&weight_config, print_weight_config)
        }
        WeightsAction::List { domain } => {
            let catalog = ctx.load_catalog()?;
            let configs = catalog.weight_configs(domain.as_deref());
            ctx.emit(&configs, |configs| {
                if configs.is_empty() {
                    println!("No weight configurations found.");
                }
                for config in configs {
                    println!(
                        "{:<28} {:<18} {:<16} {}",
                        config.id,
                        config.normalization_method.as_str(),
                        config.domain_id.as_deref().unwrap_or("-"),
                        config.name
                    );
                }
            })
        }
        WeightsAction::Show { id } => {
            let catalog = ctx.load_catalog()?;
            let weight_config = catalog
                .weight_config(&id)
                .ok_or_else(|| anyhow::anyhow!("Weight config '{}' not found", id))?;
            ctx.emit(weight_config, print_weight_config)
        }
    }
}

fn print_weight_config(config: &WeightConfig) {
    println!("{} ({})", config.name, config.id);
    println!(
        "  method: {}  domain: {}",
        config.normalization_method,
        config.domain_id.as_deref().unwrap_or("-")
    );
    for (rubric_id, weight) in config.weights() {
        println!("    {rubric_id:<32} {weight:.4}");
    }
}

fn handle_consolidate(
    config_id: &str,
    scores: Vec<(String, f64)>,
    mode: ConsolidationMode,
    method: Option<rubricate_core::NormalizationMethod>,
    ctx: &Context,
) -> anyhow::Result<()> {
    let catalog = ctx.load_catalog()?;
    let scores: ScoreInput =
        collect_unique(scores, |rubric_id| ScoringError::DuplicateRubric { rubric_id })?;
    let result = EvaluationService::new(mode).consolidate_with_method(&catalog, config_id, &scores, method)?;
    ctx.emit(&result, print_consolidated)
}

fn print_consolidated(result: &ConsolidatedResult) {
    println!("Final score: {:.2} ({})", result.final_score, result.method);
    for (rubric_id, weight) in &result.weights_used {
        let contribution = result
            .per_rubric_contribution
            .get(rubric_id)
            .copied()
            .unwrap_or_default();
        println!("  {rubric_id:<32} weight {weight:.4}  contribution {contribution:.4}");
    }
    if result.renormalized {
        println!("  renormalized without: {}", result.excluded.join(", "));
    }
}

fn handle_import(file: &Path, ctx: &Context) -> anyhow::Result<()> {
    let spec = CatalogSpec::from_file(file)?;
    let mut catalog = ctx.load_catalog()?;
    let summary = catalog.import(spec, ctx.config.rubrics.scale())?;
    let path = ctx.save_catalog(&catalog)?;
    ctx.emit(&summary, |s| {
        println!(
            "Imported {} domain(s), {} rubric(s), {} weight config(s) into {}",
            s.domains,
            s.rubrics,
            s.weight_configs,
            path.display()
        );
    })
}

fn handle_config(action: ConfigAction, ctx: &Context) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = ctx.workspace.join(config::WORKSPACE_DIR).join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            let path = config::write_workspace_config(&ctx.workspace, &RubricateConfig::default())?;
            println!("Created default configuration at: {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&ctx.config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}
