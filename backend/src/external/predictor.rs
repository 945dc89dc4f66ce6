//! Yield predictors
//!
//! A predictor is anything that turns a [`FeatureRecord`] into one scalar.
//! The bundled implementation evaluates a gradient-boosted regression tree
//! ensemble exported to JSON.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use shared::{CategorySet, FeatureRecord, FeatureValue, YieldTarget};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ModelsConfig;

/// Per-request prediction failures. None of these are fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictorError {
    #[error("{0}")]
    SchemaMismatch(String),

    #[error("{field} category '{value}' was not seen during training")]
    UnseenCategory { field: String, value: String },

    #[error("model produced a non-finite value")]
    NonFinite,
}

/// Narrow prediction capability consumed by the prediction service
pub trait Predictor: Send + Sync {
    /// Quantity this predictor estimates
    fn target(&self) -> YieldTarget;

    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictorError>;
}

/// A node of a regression tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    /// `row[feature] <= threshold` goes left
    NumericSplit {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    /// Category code in `categories` goes left
    CategoricalSplit {
        feature: usize,
        categories: Vec<u32>,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::NumericSplit {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { &**left } else { &**right };
                }
                TreeNode::CategoricalSplit {
                    feature,
                    categories,
                    left,
                    right,
                } => {
                    let code = row[*feature] as u32;
                    node = if categories.contains(&code) { &**left } else { &**right };
                }
            }
        }
    }

    fn max_feature_index(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::NumericSplit {
                feature, left, right, ..
            }
            | TreeNode::CategoricalSplit {
                feature, left, right, ..
            } => [Some(*feature), left.max_feature_index(), right.max_feature_index()]
                .into_iter()
                .flatten()
                .max(),
        }
    }
}

/// Gradient-boosted tree ensemble loaded from a JSON artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeEnsembleModel {
    pub target: YieldTarget,
    /// Column names in training order
    pub feature_names: Vec<String>,
    pub site_categories: CategorySet,
    pub cultivar_categories: CategorySet,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<TreeNode>,
}

impl TreeEnsembleModel {
    /// Read and sanity-check an artifact
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading model artifact {}", path.display()))?;
        let model: TreeEnsembleModel = serde_json::from_str(&raw)
            .with_context(|| format!("parsing model artifact {}", path.display()))?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.trees.is_empty() {
            bail!("{} model has no trees", self.target);
        }
        let width = self.feature_names.len();
        for (idx, tree) in self.trees.iter().enumerate() {
            if let Some(max) = tree.max_feature_index() {
                if max >= width {
                    bail!(
                        "{} model tree {} splits on feature {} but only {} features are declared",
                        self.target,
                        idx,
                        max,
                        width
                    );
                }
            }
        }
        Ok(())
    }

    fn categories_for(&self, column: &str) -> Option<&CategorySet> {
        match column {
            "Site" => Some(&self.site_categories),
            "Cultivar" => Some(&self.cultivar_categories),
            _ => None,
        }
    }

    /// The record must carry exactly the training columns, in order, and
    /// encode its categories the way the model saw them during training.
    fn check_record(&self, record: &FeatureRecord) -> Result<(), PredictorError> {
        let names = record.names();
        if names.len() != self.feature_names.len() {
            return Err(PredictorError::SchemaMismatch(format!(
                "expected {} columns, got {}",
                self.feature_names.len(),
                names.len()
            )));
        }
        if let Some((pos, (got, want))) = names
            .iter()
            .zip(&self.feature_names)
            .enumerate()
            .find(|(_, (got, want))| **got != want.as_str())
        {
            return Err(PredictorError::SchemaMismatch(format!(
                "column {} is '{}', expected '{}'",
                pos, got, want
            )));
        }

        for column in record.columns() {
            let FeatureValue::Category { label, code } = &column.value else {
                continue;
            };
            let Some(categories) = self.categories_for(column.name) else {
                return Err(PredictorError::SchemaMismatch(format!(
                    "column '{}' is not categorical in the model",
                    column.name
                )));
            };
            match categories.encode(label) {
                None => {
                    return Err(PredictorError::UnseenCategory {
                        field: column.name.to_string(),
                        value: label.clone(),
                    })
                }
                Some(trained) if trained != *code => {
                    return Err(PredictorError::SchemaMismatch(format!(
                        "{} '{}' encoded as {} but trained as {}",
                        column.name, label, code, trained
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl Predictor for TreeEnsembleModel {
    fn target(&self) -> YieldTarget {
        self.target
    }

    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictorError> {
        self.check_record(record)?;
        let row = record.values();
        let raw = self.base_score + self.trees.iter().map(|t| t.evaluate(&row)).sum::<f64>();
        if raw.is_finite() {
            Ok(raw)
        } else {
            Err(PredictorError::NonFinite)
        }
    }
}

/// The three predictors, loaded once and shared read-only
#[derive(Clone)]
pub struct PredictorSet {
    pub dry_matter: Arc<dyn Predictor>,
    pub energy: Arc<dyn Predictor>,
    pub protein: Arc<dyn Predictor>,
}

impl PredictorSet {
    pub fn new(
        dry_matter: Arc<dyn Predictor>,
        energy: Arc<dyn Predictor>,
        protein: Arc<dyn Predictor>,
    ) -> Self {
        Self {
            dry_matter,
            energy,
            protein,
        }
    }

    /// Load all three artifacts. Any failure aborts startup.
    pub fn load(config: &ModelsConfig) -> anyhow::Result<Self> {
        let slots = [
            (YieldTarget::DryMatter, &config.dry_matter_path),
            (YieldTarget::Energy, &config.energy_path),
            (YieldTarget::CrudeProtein, &config.protein_path),
        ];
        let mut loaded = Vec::with_capacity(slots.len());
        for (target, path) in slots {
            let model = TreeEnsembleModel::load(path)?;
            if model.target != target {
                bail!("{} holds a {} model, expected {}", path, model.target, target);
            }
            tracing::info!("Loaded {} model from {} ({} trees)", target, path, model.trees.len());
            loaded.push(Arc::new(model) as Arc<dyn Predictor>);
        }
        let protein = loaded.pop().context("protein model missing")?;
        let energy = loaded.pop().context("energy model missing")?;
        let dry_matter = loaded.pop().context("dry matter model missing")?;
        Ok(Self::new(dry_matter, energy, protein))
    }

    pub fn get(&self, target: YieldTarget) -> &dyn Predictor {
        match target {
            YieldTarget::DryMatter => self.dry_matter.as_ref(),
            YieldTarget::Energy => self.energy.as_ref(),
            YieldTarget::CrudeProtein => self.protein.as_ref(),
        }
    }
}
