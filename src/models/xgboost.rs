//! Gradient-boosted tree ensemble read from an XGBoost JSON model.
//!
//! The artifact is the document written by `Booster.save_model("*.json")`.
//! Only the pieces needed for inference are deserialized: the learner
//! parameters, the objective, the feature schema, and the tree arrays.
//! Everything else in the document is ignored.

use crate::error::{ArtifactError, PredictionError};
use crate::models::objective::OutputTransform;
use crate::models::predictor::Predictor;
use crate::types::record::{FeatureValue, PredictionRecord, FEATURE_NAMES};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// On-disk document
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ModelDocument {
    learner: LearnerDoc,
    #[serde(default)]
    version: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct LearnerDoc {
    #[serde(default)]
    feature_names: Vec<String>,
    #[serde(default)]
    feature_types: Vec<String>,
    gradient_booster: BoosterDoc,
    learner_model_param: LearnerParamDoc,
    objective: ObjectiveDoc,
}

#[derive(Debug, Deserialize)]
struct BoosterDoc {
    name: String,
    /// Present for `gbtree`; kept untyped so other boosters fail with a clear error
    #[serde(default)]
    model: Option<serde_json::Value>,
    /// Present for `dart`, wraps a `gbtree`
    #[serde(default)]
    gbtree: Option<Box<BoosterDoc>>,
    #[serde(default)]
    weight_drop: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GbtreeModelDoc {
    gbtree_model_param: GbtreeParamDoc,
    trees: Vec<TreeDoc>,
    #[serde(default)]
    tree_info: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct GbtreeParamDoc {
    num_trees: String,
}

#[derive(Debug, Deserialize)]
struct LearnerParamDoc {
    base_score: String,
    num_feature: String,
    #[serde(default)]
    num_target: Option<String>,
    #[serde(default)]
    num_class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectiveDoc {
    name: String,
}

/// Older releases write `default_left` as 0/1, newer ones as booleans.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TreeDoc {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<i64>,
    #[serde(default)]
    categories: Vec<i64>,
    #[serde(default)]
    categories_nodes: Vec<i64>,
    #[serde(default)]
    categories_segments: Vec<i64>,
    #[serde(default)]
    categories_sizes: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Compiled model
// ---------------------------------------------------------------------------

const LEAF: i64 = -1;
const CATEGORICAL_SPLIT: i64 = 1;
/// Upper bound on outputs per prediction accepted from an artifact.
const MAX_TARGETS: usize = 256;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f32,
    },
    Numeric {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    /// Categories listed here go right, everything else goes left
    Categorical {
        feature: usize,
        categories: Vec<u32>,
        left: usize,
        right: usize,
        default_left: bool,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
    group: usize,
    weight: f32,
}

impl Tree {
    /// Walk from the root to a leaf. Child indices were checked to be strictly
    /// greater than their parent at load time, so the walk always terminates.
    fn leaf_value(&self, row: &[f32]) -> f32 {
        let mut idx = 0;
        loop {
            idx = match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Numeric {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = row[*feature];
                    if x.is_nan() {
                        if *default_left {
                            *left
                        } else {
                            *right
                        }
                    } else if x < *threshold {
                        *left
                    } else {
                        *right
                    }
                }
                Node::Categorical {
                    feature,
                    categories,
                    left,
                    right,
                    default_left,
                } => {
                    let x = row[*feature];
                    if x.is_nan() {
                        if *default_left {
                            *left
                        } else {
                            *right
                        }
                    } else if x < 0.0 || categories.binary_search(&(x as u32)).is_err() {
                        *left
                    } else {
                        *right
                    }
                }
            };
        }
    }
}

/// Tree ensemble regressor evaluated in-process.
#[derive(Debug, Clone)]
pub struct XgbModel {
    name: String,
    feature_names: Option<Vec<String>>,
    feature_types: Option<Vec<String>>,
    num_feature: usize,
    objective: String,
    transform: OutputTransform,
    base_margin: Vec<f32>,
    trees: Vec<Tree>,
    version: Option<String>,
}

impl XgbModel {
    /// Parse a model from its JSON bytes.
    pub fn from_slice(name: &str, bytes: &[u8]) -> Result<Self, ArtifactError> {
        let doc: ModelDocument = serde_json::from_slice(bytes)?;
        Self::compile(name, doc)
    }

    /// Parse a model from a JSON string.
    pub fn from_json_str(name: &str, json: &str) -> Result<Self, ArtifactError> {
        Self::from_slice(name, json.as_bytes())
    }

    fn compile(name: &str, doc: ModelDocument) -> Result<Self, ArtifactError> {
        let learner = doc.learner;
        let params = &learner.learner_model_param;

        let num_feature = parse_count("num_feature", &params.num_feature)?;
        let num_target = match &params.num_target {
            Some(raw) => parse_count("num_target", raw)?.max(1),
            None => 1,
        };
        if num_target > MAX_TARGETS {
            return Err(ArtifactError::Invalid(format!(
                "num_target {num_target} exceeds the supported maximum of {MAX_TARGETS}"
            )));
        }
        if let Some(raw) = &params.num_class {
            if parse_count("num_class", raw)? > 1 {
                return Err(ArtifactError::Invalid(
                    "multi-class models are not supported".to_string(),
                ));
            }
        }

        let transform = OutputTransform::from_objective(&learner.objective.name)?;
        let base_margin: Vec<f32> = parse_base_score(&params.base_score, num_target)?
            .into_iter()
            .map(|score| transform.base_margin(score))
            .collect();
        if base_margin.iter().any(|m| !m.is_finite()) {
            return Err(ArtifactError::Invalid(format!(
                "base_score '{}' is outside the domain of '{}'",
                params.base_score, learner.objective.name
            )));
        }

        let feature_names = validate_schema("feature_names", learner.feature_names, num_feature)?;
        if let Some(names) = &feature_names {
            let mut seen = std::collections::HashSet::new();
            if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
                return Err(ArtifactError::Invalid(format!(
                    "feature name '{dup}' appears more than once"
                )));
            }
        }
        let feature_types = validate_schema("feature_types", learner.feature_types, num_feature)?;

        let (gbtree, weight_drop) = unwrap_booster(learner.gradient_booster)?;

        let declared = parse_count("num_trees", &gbtree.gbtree_model_param.num_trees)?;
        if declared != gbtree.trees.len() {
            return Err(ArtifactError::Invalid(format!(
                "num_trees is {declared} but {} trees are present",
                gbtree.trees.len()
            )));
        }
        if !gbtree.tree_info.is_empty() && gbtree.tree_info.len() != gbtree.trees.len() {
            return Err(ArtifactError::Invalid(
                "tree_info length does not match the number of trees".to_string(),
            ));
        }
        if !weight_drop.is_empty() && weight_drop.len() != gbtree.trees.len() {
            return Err(ArtifactError::Invalid(
                "weight_drop length does not match the number of trees".to_string(),
            ));
        }

        let mut trees = Vec::with_capacity(gbtree.trees.len());
        for (i, tree_doc) in gbtree.trees.into_iter().enumerate() {
            let group = gbtree.tree_info.get(i).copied().unwrap_or(0);
            if group < 0 || group as usize >= num_target {
                return Err(ArtifactError::Invalid(format!(
                    "tree {i} targets output {group}, model has {num_target}"
                )));
            }
            trees.push(Tree {
                nodes: compile_tree(i, tree_doc, num_feature)?,
                group: group as usize,
                weight: weight_drop.get(i).copied().unwrap_or(1.0),
            });
        }

        let version = match doc.version.as_slice() {
            [] => None,
            parts => Some(
                parts
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join("."),
            ),
        };

        debug!(
            model = %name,
            trees = trees.len(),
            num_feature = num_feature,
            num_target = num_target,
            objective = %learner.objective.name,
            "Compiled tree ensemble"
        );

        Ok(Self {
            name: name.to_string(),
            feature_names,
            feature_types,
            num_feature,
            objective: learner.objective.name,
            transform,
            base_margin,
            trees,
            version,
        })
    }

    /// Number of trees in the ensemble
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of input columns
    pub fn num_feature(&self) -> usize {
        self.num_feature
    }

    /// Number of values returned per prediction
    pub fn num_target(&self) -> usize {
        self.base_margin.len()
    }

    /// Training objective name
    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// XGBoost release that wrote the artifact, if recorded
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Column names declared by the artifact, if any
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Lay out the record in model column order.
    fn bind_row(&self, record: &PredictionRecord) -> Result<Vec<f32>, PredictionError> {
        let mut row = Vec::with_capacity(FEATURE_NAMES.len());

        match &self.feature_names {
            Some(names) => {
                for (column, name) in names.iter().enumerate() {
                    let value = record.feature(name).ok_or_else(|| {
                        PredictionError::SchemaMismatch(format!(
                            "model expects column '{name}' which the record does not provide"
                        ))
                    })?;
                    self.check_type(column, name, value)?;
                    row.push(value.as_f32());
                }
                if let Some(extra) = FEATURE_NAMES
                    .iter()
                    .find(|field| !names.iter().any(|name| name == *field))
                {
                    return Err(PredictionError::SchemaMismatch(format!(
                        "record column '{extra}' is not part of the model schema"
                    )));
                }
            }
            None => {
                if self.num_feature != FEATURE_NAMES.len() {
                    return Err(PredictionError::SchemaMismatch(format!(
                        "model expects {} columns, record has {}",
                        self.num_feature,
                        FEATURE_NAMES.len()
                    )));
                }
                for (column, (name, value)) in record.features().enumerate() {
                    self.check_type(column, name, value)?;
                    row.push(value.as_f32());
                }
            }
        }

        Ok(row)
    }

    fn check_type(
        &self,
        column: usize,
        name: &str,
        value: FeatureValue,
    ) -> Result<(), PredictionError> {
        let Some(types) = &self.feature_types else {
            return Ok(());
        };
        let model_categorical = types[column] == "c";
        match (model_categorical, value.is_categorical()) {
            (true, false) => Err(PredictionError::SchemaMismatch(format!(
                "column '{name}' is categorical in the model but numeric in the record"
            ))),
            (false, true) => Err(PredictionError::SchemaMismatch(format!(
                "column '{name}' is numeric in the model but categorical in the record"
            ))),
            _ => Ok(()),
        }
    }
}

impl Predictor for XgbModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, record: &PredictionRecord) -> Result<Vec<f64>, PredictionError> {
        let row = self.bind_row(record)?;

        let mut margins = self.base_margin.clone();
        for tree in &self.trees {
            margins[tree.group] += tree.weight * tree.leaf_value(&row);
        }

        Ok(margins
            .into_iter()
            .map(|margin| self.transform.apply(margin) as f64)
            .collect())
    }
}

fn unwrap_booster(booster: BoosterDoc) -> Result<(GbtreeModelDoc, Vec<f32>), ArtifactError> {
    match booster.name.as_str() {
        "gbtree" => {
            let model = booster.model.ok_or_else(|| {
                ArtifactError::Invalid("gbtree booster has no model".to_string())
            })?;
            Ok((serde_json::from_value(model)?, Vec::new()))
        }
        "dart" => {
            let inner = booster.gbtree.ok_or_else(|| {
                ArtifactError::Invalid("dart booster has no inner gbtree".to_string())
            })?;
            let (model, _) = unwrap_booster(*inner)?;
            Ok((model, booster.weight_drop))
        }
        other => Err(ArtifactError::UnsupportedBooster(other.to_string())),
    }
}

fn compile_tree(
    index: usize,
    doc: TreeDoc,
    num_feature: usize,
) -> Result<Vec<Node>, ArtifactError> {
    let invalid = |msg: String| ArtifactError::Invalid(format!("tree {index}: {msg}"));

    let n = doc.left_children.len();
    if n == 0 {
        return Err(invalid("no nodes".to_string()));
    }
    if doc.right_children.len() != n
        || doc.split_indices.len() != n
        || doc.split_conditions.len() != n
        || doc.default_left.len() != n
        || (!doc.split_type.is_empty() && doc.split_type.len() != n)
    {
        return Err(invalid("node arrays have different lengths".to_string()));
    }

    let segments = doc.categories_nodes.len();
    if doc.categories_segments.len() != segments || doc.categories_sizes.len() != segments {
        return Err(invalid("category arrays have different lengths".to_string()));
    }
    let mut node_categories: HashMap<usize, Vec<u32>> = HashMap::new();
    for k in 0..segments {
        let start = doc.categories_segments[k];
        let size = doc.categories_sizes[k];
        let end = match start.checked_add(size) {
            Some(end) if start >= 0 && size >= 0 && end as usize <= doc.categories.len() => end,
            _ => return Err(invalid(format!("category segment {k} out of range"))),
        };
        let mut cats = Vec::with_capacity(size as usize);
        for &cat in &doc.categories[start as usize..end as usize] {
            if cat < 0 {
                return Err(invalid(format!("negative category {cat}")));
            }
            cats.push(cat as u32);
        }
        cats.sort_unstable();
        node_categories.insert(doc.categories_nodes[k] as usize, cats);
    }

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        let left = doc.left_children[i];
        if left == LEAF {
            nodes.push(Node::Leaf {
                value: doc.split_conditions[i],
            });
            continue;
        }

        let right = doc.right_children[i];
        let child_ok = |c: i64| c > i as i64 && (c as usize) < n;
        if !child_ok(left) || !child_ok(right) {
            return Err(invalid(format!("node {i} has out-of-range children")));
        }
        let feature = doc.split_indices[i];
        if feature < 0 || feature as usize >= num_feature {
            return Err(invalid(format!(
                "node {i} splits on feature {feature}, model has {num_feature}"
            )));
        }

        let default_left = doc.default_left[i].is_set();
        let split_type = doc.split_type.get(i).copied().unwrap_or(0);
        if split_type == CATEGORICAL_SPLIT {
            let categories = node_categories
                .remove(&i)
                .ok_or_else(|| invalid(format!("categorical node {i} has no categories")))?;
            nodes.push(Node::Categorical {
                feature: feature as usize,
                categories,
                left: left as usize,
                right: right as usize,
                default_left,
            });
        } else {
            nodes.push(Node::Numeric {
                feature: feature as usize,
                threshold: doc.split_conditions[i],
                left: left as usize,
                right: right as usize,
                default_left,
            });
        }
    }

    Ok(nodes)
}

fn parse_count(field: &str, raw: &str) -> Result<usize, ArtifactError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ArtifactError::Invalid(format!("{field} '{raw}' is not a count")))
}

/// Accepts both `"5E-1"` and the bracketed `"[5E-1]"` / `"[1E0,2E0]"` forms.
fn parse_base_score(raw: &str, num_target: usize) -> Result<Vec<f32>, ArtifactError> {
    let inner = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let values = inner
        .split(',')
        .map(|part| {
            part.trim().parse::<f32>().map_err(|_| {
                ArtifactError::Invalid(format!("base_score '{raw}' is not a number"))
            })
        })
        .collect::<Result<Vec<f32>, _>>()?;

    match values.len() {
        1 => Ok(vec![values[0]; num_target]),
        n if n == num_target => Ok(values),
        n => Err(ArtifactError::Invalid(format!(
            "base_score has {n} values for {num_target} targets"
        ))),
    }
}

fn validate_schema(
    field: &str,
    values: Vec<String>,
    num_feature: usize,
) -> Result<Option<Vec<String>>, ArtifactError> {
    if values.is_empty() {
        return Ok(None);
    }
    if values.len() != num_feature {
        return Err(ArtifactError::Invalid(format!(
            "{field} lists {} columns, num_feature is {num_feature}",
            values.len()
        )));
    }
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::inputs::{Sector, UkRegion};
    use serde_json::json;

    fn record() -> PredictionRecord {
        PredictionRecord {
            year: 2023,
            latitude: 52.0,
            longitude: -2.0,
            sector: Sector::OilGas,
            uk_region: UkRegion::North,
            mean_temperature_winter: 5.0,
            mean_wind_winter: 8.0,
            total_rainfall_winter: 200.0,
            mean_temperature_annual: 10.0,
            mean_wind_annual: 6.0,
            total_rainfall_annual: 800.0,
            temp_rain_winter_interaction: 1000.0,
            pressure_wind_annual_interaction: 6078.0,
            facility_count_25km: 1,
        }
    }

    fn feature_types() -> Vec<&'static str> {
        FEATURE_NAMES
            .iter()
            .map(|name| match *name {
                "Sector" | "UK_Region" => "c",
                "Year" | "Facility_Count_25km" => "int",
                _ => "float",
            })
            .collect()
    }

    /// Single stump on the winter interaction column (index 11).
    fn stump_model(objective: &str, base_score: &str) -> serde_json::Value {
        json!({
            "learner": {
                "feature_names": FEATURE_NAMES,
                "feature_types": feature_types(),
                "gradient_booster": {
                    "name": "gbtree",
                    "model": {
                        "gbtree_model_param": { "num_trees": "1", "num_parallel_tree": "1" },
                        "tree_info": [0],
                        "trees": [{
                            "id": 0,
                            "left_children": [1, -1, -1],
                            "right_children": [2, -1, -1],
                            "split_indices": [11, 0, 0],
                            "split_conditions": [1500.0, 1.0, 3.0],
                            "default_left": [true, false, false],
                            "split_type": [0, 0, 0],
                            "categories": [],
                            "categories_nodes": [],
                            "categories_segments": [],
                            "categories_sizes": []
                        }]
                    }
                },
                "learner_model_param": {
                    "base_score": base_score,
                    "num_class": "0",
                    "num_feature": "14",
                    "num_target": "1"
                },
                "objective": { "name": objective }
            },
            "version": [2, 1, 0]
        })
    }

    fn compile(doc: &serde_json::Value) -> Result<XgbModel, ArtifactError> {
        XgbModel::from_json_str("test", &doc.to_string())
    }

    #[test]
    fn test_stump_prediction() {
        let model = compile(&stump_model("reg:squarederror", "1E1")).unwrap();
        assert_eq!(model.num_trees(), 1);
        assert_eq!(model.num_target(), 1);
        assert_eq!(model.version(), Some("2.1.0"));

        let mut rec = record();
        assert_eq!(model.predict(&rec).unwrap(), vec![11.0]);

        rec.temp_rain_winter_interaction = 1500.0;
        assert_eq!(model.predict(&rec).unwrap(), vec![13.0]);
    }

    #[test]
    fn test_bracketed_base_score() {
        let model = compile(&stump_model("reg:squarederror", "[1E1]")).unwrap();
        assert_eq!(model.predict(&record()).unwrap(), vec![11.0]);
    }

    #[test]
    fn test_log_link_objective() {
        let model = compile(&stump_model("reg:gamma", "1E0")).unwrap();
        let value = model.predict(&record()).unwrap()[0];
        assert!((value - 1.0_f64.exp()).abs() < 1e-5);
    }

    #[test]
    fn test_missing_value_follows_default() {
        let model = compile(&stump_model("reg:squarederror", "0")).unwrap();
        let mut rec = record();
        rec.temp_rain_winter_interaction = f64::NAN;
        assert_eq!(model.predict(&rec).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_categorical_split_sends_listed_levels_right() {
        let mut doc = stump_model("reg:squarederror", "0");
        let tree = &mut doc["learner"]["gradient_booster"]["model"]["trees"][0];
        tree["split_indices"] = json!([3, 0, 0]);
        tree["split_type"] = json!([1, 0, 0]);
        tree["categories"] = json!([3]);
        tree["categories_nodes"] = json!([0]);
        tree["categories_segments"] = json!([0]);
        tree["categories_sizes"] = json!([1]);
        let model = compile(&doc).unwrap();

        let mut rec = record();
        assert_eq!(model.predict(&rec).unwrap(), vec![1.0]);
        rec.sector = Sector::Waste;
        assert_eq!(model.predict(&rec).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_columns_bound_by_name() {
        let mut doc = stump_model("reg:squarederror", "0");
        let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
        names.swap(0, 11);
        let mut types = feature_types();
        types.swap(0, 11);
        doc["learner"]["feature_names"] = json!(names);
        doc["learner"]["feature_types"] = json!(types);
        doc["learner"]["gradient_booster"]["model"]["trees"][0]["split_indices"] =
            json!([0, 0, 0]);
        let model = compile(&doc).unwrap();

        let mut rec = record();
        assert_eq!(model.predict(&rec).unwrap(), vec![1.0]);
        rec.temp_rain_winter_interaction = 2000.0;
        assert_eq!(model.predict(&rec).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_unknown_column_is_schema_mismatch() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["feature_names"][1] = json!("latitude");
        let model = compile(&doc).unwrap();
        let err = model.predict(&record()).unwrap_err();
        assert!(matches!(err, PredictionError::SchemaMismatch(_)));
        assert!(err.to_string().contains("'latitude'"));
    }

    #[test]
    fn test_type_conflict_is_schema_mismatch() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["feature_types"][3] = json!("float");
        let model = compile(&doc).unwrap();
        assert!(matches!(
            model.predict(&record()),
            Err(PredictionError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_unnamed_columns_use_canonical_order() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["feature_names"] = json!([]);
        doc["learner"]["feature_types"] = json!([]);
        let model = compile(&doc).unwrap();
        assert_eq!(model.predict(&record()).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_dart_weights_scale_leaves() {
        let doc = stump_model("reg:squarederror", "0");
        let inner = doc["learner"]["gradient_booster"].clone();
        let mut dart = doc.clone();
        dart["learner"]["gradient_booster"] = json!({
            "name": "dart",
            "gbtree": inner,
            "weight_drop": [0.5]
        });
        let model = compile(&dart).unwrap();
        assert_eq!(model.predict(&record()).unwrap(), vec![0.5]);
    }

    #[test]
    fn test_rejects_unsupported_booster() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["gradient_booster"] = json!({ "name": "gblinear", "model": { "weights": [] } });
        assert!(matches!(
            compile(&doc),
            Err(ArtifactError::UnsupportedBooster(name)) if name == "gblinear"
        ));
    }

    #[test]
    fn test_rejects_backward_child_reference() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["gradient_booster"]["model"]["trees"][0]["left_children"] =
            json!([0, -1, -1]);
        assert!(matches!(compile(&doc), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn test_rejects_split_on_missing_feature() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["gradient_booster"]["model"]["trees"][0]["split_indices"] =
            json!([14, 0, 0]);
        assert!(matches!(compile(&doc), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn test_rejects_tree_count_mismatch() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["gradient_booster"]["model"]["gbtree_model_param"]["num_trees"] =
            json!("2");
        assert!(matches!(compile(&doc), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn test_rejects_overflowing_category_segment() {
        let mut doc = stump_model("reg:squarederror", "0");
        let tree = &mut doc["learner"]["gradient_booster"]["model"]["trees"][0];
        tree["split_indices"] = json!([3, 0, 0]);
        tree["split_type"] = json!([1, 0, 0]);
        tree["categories"] = json!([3]);
        tree["categories_nodes"] = json!([0]);
        tree["categories_segments"] = json!([i64::MAX]);
        tree["categories_sizes"] = json!([1]);
        assert!(matches!(compile(&doc), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn test_rejects_oversized_target_count() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["learner_model_param"]["num_target"] = json!(usize::MAX.to_string());
        assert!(matches!(compile(&doc), Err(ArtifactError::Invalid(_))));

        doc["learner"]["learner_model_param"]["num_target"] = json!("100000000000");
        assert!(matches!(compile(&doc), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn test_rejects_truncated_json() {
        let text = stump_model("reg:squarederror", "0").to_string();
        let truncated = &text[..text.len() / 2];
        assert!(matches!(
            XgbModel::from_json_str("test", truncated),
            Err(ArtifactError::Json(_))
        ));
    }

    #[test]
    fn test_legacy_integer_default_left() {
        let mut doc = stump_model("reg:squarederror", "0");
        doc["learner"]["gradient_booster"]["model"]["trees"][0]["default_left"] =
            json!([0, 0, 0]);
        let model = compile(&doc).unwrap();
        let mut rec = record();
        rec.temp_rain_winter_interaction = f64::NAN;
        assert_eq!(model.predict(&rec).unwrap(), vec![3.0]);
    }
}
