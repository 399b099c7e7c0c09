//! Catalog of domains, rubrics, and weight configurations.
//!
//! [`Catalog`] is the read-only lookup seam used by the evaluation service.
//! [`MemoryCatalog`] is the owned, in-process implementation with CRUD
//! operations, JSON snapshots, and import of declarative catalog files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CatalogError, RubricateError};
use crate::persistence::{atomic_write_json, load_json, load_structured};
use crate::rubric::{Rubric, RubricSpec, ScoringScale};
use crate::types::{Domain, DomainCategory, EvaluationDimension, RubricType};
use crate::weight_config::{WeightConfig, WeightConfigSpec};

/// Snapshot format version written by [`MemoryCatalog::save`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Read access to catalog entries.
pub trait Catalog {
    fn domain(&self, id: &str) -> Option<&Domain>;

    fn rubric(&self, id: &str) -> Option<&Rubric>;

    fn weight_config(&self, id: &str) -> Option<&WeightConfig>;

    /// Rubrics usable from `domain_id`, including shared rubrics.
    fn rubrics_for_domain(&self, domain_id: &str) -> Vec<&Rubric>;
}

/// Optional filters for [`MemoryCatalog::rubrics`]. Unset fields match
/// everything.
#[derive(Debug, Clone, Default)]
pub struct RubricFilter {
    /// Exact owning domain; shared rubrics do not match a domain filter.
    pub domain_id: Option<String>,
    pub rubric_type: Option<RubricType>,
    pub evaluation_dimension: Option<EvaluationDimension>,
}

impl RubricFilter {
    pub fn domain(mut self, domain_id: impl Into<String>) -> Self {
        self.domain_id = Some(domain_id.into());
        self
    }

    pub fn rubric_type(mut self, rubric_type: RubricType) -> Self {
        self.rubric_type = Some(rubric_type);
        self
    }

    pub fn dimension(mut self, dimension: EvaluationDimension) -> Self {
        self.evaluation_dimension = Some(dimension);
        self
    }

    fn matches(&self, rubric: &Rubric) -> bool {
        self.domain_id
            .as_deref()
            .is_none_or(|d| rubric.domain_id.as_deref() == Some(d))
            && self.rubric_type.is_none_or(|t| rubric.rubric_type == t)
            && self
                .evaluation_dimension
                .is_none_or(|d| rubric.evaluation_dimension == d)
    }
}

/// Serialized form of a [`MemoryCatalog`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default = "snapshot_version")]
    pub version: u32,
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub rubrics: Vec<Rubric>,
    #[serde(default)]
    pub weight_configs: Vec<WeightConfig>,
}

fn snapshot_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Declarative catalog file: raw rubric and weight definitions that are run
/// through the builders on import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSpec {
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub rubrics: Vec<RubricSpec>,
    #[serde(default)]
    pub weight_configs: Vec<WeightConfigSpec>,
}

impl CatalogSpec {
    /// Load a spec file; the format follows the extension (json, yaml, toml).
    pub fn from_file(path: &Path) -> Result<Self, RubricateError> {
        load_structured(path)
    }
}

/// Counts of entries touched by [`MemoryCatalog::import`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub domains: usize,
    pub rubrics: usize,
    pub weight_configs: usize,
}

/// In-memory catalog keyed by id, preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    domains: IndexMap<String, Domain>,
    rubrics: IndexMap<String, Rubric>,
    weight_configs: IndexMap<String, WeightConfig>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.rubrics.is_empty() && self.weight_configs.is_empty()
    }

    // --- domains ---

    pub fn insert_domain(&mut self, domain: Domain) -> Result<(), CatalogError> {
        if self.domains.contains_key(&domain.id) {
            return Err(CatalogError::AlreadyExists {
                kind: "Domain",
                id: domain.id,
            });
        }
        self.domains.insert(domain.id.clone(), domain);
        Ok(())
    }

    /// All domains, optionally restricted to one category.
    pub fn domains(&self, category: Option<DomainCategory>) -> Vec<&Domain> {
        self.domains
            .values()
            .filter(|d| category.is_none_or(|c| d.category == c))
            .collect()
    }

    pub fn update_domain(&mut self, domain: Domain) -> Result<(), CatalogError> {
        match self.domains.get_mut(&domain.id) {
            Some(existing) => {
                *existing = domain;
                Ok(())
            }
            None => Err(CatalogError::NotFound {
                kind: "Domain",
                id: domain.id,
            }),
        }
    }

    pub fn delete_domain(&mut self, id: &str) -> bool {
        self.domains.shift_remove(id).is_some()
    }

    /// Case-insensitive substring search over domain name and description.
    pub fn search_domains(&self, query: &str) -> Vec<&Domain> {
        self.domains.values().filter(|d| d.matches(query)).collect()
    }

    // --- rubrics ---

    pub fn insert_rubric(&mut self, rubric: Rubric) -> Result<(), CatalogError> {
        if self.rubrics.contains_key(&rubric.id) {
            return Err(CatalogError::AlreadyExists {
                kind: "Rubric",
                id: rubric.id,
            });
        }
        self.rubrics.insert(rubric.id.clone(), rubric);
        Ok(())
    }

    pub fn rubrics(&self, filter: &RubricFilter) -> Vec<&Rubric> {
        self.rubrics.values().filter(|r| filter.matches(r)).collect()
    }

    /// Replace a rubric. Fails with `ForeignRubric` when the new version
    /// moves out of the domain of a weight config that references it.
    pub fn update_rubric(&mut self, rubric: Rubric) -> Result<(), CatalogError> {
        if !self.rubrics.contains_key(&rubric.id) {
            return Err(CatalogError::NotFound {
                kind: "Rubric",
                id: rubric.id,
            });
        }
        for config in self.weight_configs.values() {
            check_membership(config, &rubric)?;
        }
        self.rubrics.insert(rubric.id.clone(), rubric);
        Ok(())
    }

    /// Remove a rubric. Weight configs that reference it are left as is and
    /// fail at consolidation time.
    pub fn delete_rubric(&mut self, id: &str) -> bool {
        self.rubrics.shift_remove(id).is_some()
    }

    // --- weight configs ---

    /// Add a weight config after checking that every referenced rubric exists
    /// and is usable from the config's domain.
    pub fn add_weight_config(&mut self, config: WeightConfig) -> Result<(), CatalogError> {
        if self.weight_configs.contains_key(&config.id) {
            return Err(CatalogError::AlreadyExists {
                kind: "Weight config",
                id: config.id,
            });
        }
        self.check_references(&config)?;
        self.weight_configs.insert(config.id.clone(), config);
        Ok(())
    }

    /// Weight configs, optionally restricted to one domain.
    pub fn weight_configs(&self, domain_id: Option<&str>) -> Vec<&WeightConfig> {
        self.weight_configs
            .values()
            .filter(|c| domain_id.is_none_or(|d| c.domain_id.as_deref() == Some(d)))
            .collect()
    }

    pub fn update_weight_config(&mut self, config: WeightConfig) -> Result<(), CatalogError> {
        if !self.weight_configs.contains_key(&config.id) {
            return Err(CatalogError::NotFound {
                kind: "Weight config",
                id: config.id,
            });
        }
        self.check_references(&config)?;
        self.weight_configs.insert(config.id.clone(), config);
        Ok(())
    }

    pub fn delete_weight_config(&mut self, id: &str) -> bool {
        self.weight_configs.shift_remove(id).is_some()
    }

    fn check_references(&self, config: &WeightConfig) -> Result<(), CatalogError> {
        for rubric_id in config.rubric_ids() {
            let rubric = self.rubrics.get(rubric_id).ok_or_else(|| CatalogError::NotFound {
                kind: "Rubric",
                id: rubric_id.to_string(),
            })?;
            check_membership(config, rubric)?;
        }
        Ok(())
    }

    // --- import ---

    /// Merge a declarative spec into the catalog. Entries whose id already
    /// exists are replaced; rubrics without a scale get `default_scale`.
    ///
    /// Everything is built and checked before the catalog is touched, so a
    /// failing import leaves the catalog unchanged.
    pub fn import(
        &mut self,
        spec: CatalogSpec,
        default_scale: ScoringScale,
    ) -> Result<ImportSummary, RubricateError> {
        let mut staged = self.clone();
        let summary = ImportSummary {
            domains: spec.domains.len(),
            rubrics: spec.rubrics.len(),
            weight_configs: spec.weight_configs.len(),
        };

        for domain in spec.domains {
            staged.domains.insert(domain.id.clone(), domain);
        }
        let mut replaced = Vec::new();
        for rubric_spec in spec.rubrics {
            let rubric = rubric_spec.into_builder(default_scale).build()?;
            if staged.rubrics.contains_key(&rubric.id) {
                replaced.push(rubric.id.clone());
            }
            staged.rubrics.insert(rubric.id.clone(), rubric);
        }
        for config_spec in spec.weight_configs {
            let config = config_spec.into_builder().build()?;
            staged.check_references(&config)?;
            staged.weight_configs.insert(config.id.clone(), config);
        }
        // Existing configs must still accept the rubrics replaced above.
        for config in staged.weight_configs.values() {
            for rubric_id in &replaced {
                if let Some(rubric) = staged.rubrics.get(rubric_id) {
                    check_membership(config, rubric)?;
                }
            }
        }

        tracing::debug!(
            domains = summary.domains,
            rubrics = summary.rubrics,
            weight_configs = summary.weight_configs,
            "Imported catalog spec"
        );
        *self = staged;
        Ok(summary)
    }

    // --- snapshots ---

    pub fn to_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            version: SNAPSHOT_VERSION,
            domains: self.domains.values().cloned().collect(),
            rubrics: self.rubrics.values().cloned().collect(),
            weight_configs: self.weight_configs.values().cloned().collect(),
        }
    }

    /// Rebuild a catalog from a snapshot, re-checking rubric and weight
    /// invariants and rejecting duplicate ids.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, RubricateError> {
        let mut catalog = Self::new();
        for domain in snapshot.domains {
            catalog.insert_domain(domain)?;
        }
        for rubric in snapshot.rubrics {
            rubric.validate()?;
            catalog.insert_rubric(rubric)?;
        }
        for config in snapshot.weight_configs {
            config.validate()?;
            if catalog.weight_configs.contains_key(&config.id) {
                return Err(CatalogError::AlreadyExists {
                    kind: "Weight config",
                    id: config.id,
                }
                .into());
            }
            catalog.weight_configs.insert(config.id.clone(), config);
        }
        Ok(catalog)
    }

    pub fn save(&self, path: &Path) -> Result<(), RubricateError> {
        atomic_write_json(path, &self.to_snapshot())?;
        tracing::debug!(path = %path.display(), "Saved catalog snapshot");
        Ok(())
    }

    /// Load a snapshot; `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, RubricateError> {
        match load_json::<CatalogSnapshot>(path)? {
            Some(snapshot) => Ok(Some(Self::from_snapshot(snapshot)?)),
            None => Ok(None),
        }
    }
}

/// `rubric` must be usable from `config`'s domain if `config` weights it.
fn check_membership(config: &WeightConfig, rubric: &Rubric) -> Result<(), CatalogError> {
    match config.domain_id.as_deref() {
        Some(domain_id) if config.weight(&rubric.id).is_some() && !rubric.belongs_to(domain_id) => {
            Err(CatalogError::ForeignRubric {
                rubric_id: rubric.id.clone(),
                domain_id: domain_id.to_string(),
            })
        }
        _ => Ok(()),
    }
}

impl Catalog for MemoryCatalog {
    fn domain(&self, id: &str) -> Option<&Domain> {
        self.domains.get(id)
    }

    fn rubric(&self, id: &str) -> Option<&Rubric> {
        self.rubrics.get(id)
    }

    fn weight_config(&self, id: &str) -> Option<&WeightConfig> {
        self.weight_configs.get(id)
    }

    fn rubrics_for_domain(&self, domain_id: &str) -> Vec<&Rubric> {
        self.rubrics
            .values()
            .filter(|r| r.belongs_to(domain_id))
            .collect()
    }
}
