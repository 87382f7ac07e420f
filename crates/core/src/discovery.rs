//! Fold/cross discovery beneath a cross-validation model directory.
//!
//! A model directory holds one subdirectory per trained instance, named
//! `f<fold>_c<cross>`, each with a `train/` folder containing the model file.
//! The fold count is taken from the `f<N>_c0` column and the cross count from
//! the `f0_c<N>` row; the remaining grid is assumed, not checked.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::types::FoldCross;

/// Subfolder holding the trained model file.
pub const TRAIN_SUBDIR: &str = "train";

/// Subfolder holding the per-instance input data.
pub const DATA_SUBDIR: &str = "data0";

/// Parameters file shared by every fold/cross, at the model directory root.
pub const PARAMS_FILE: &str = "params.json";

/// Model file name for an optional data-head index.
///
/// ```
/// use ismfold_core::discovery::model_filename;
///
/// assert_eq!(model_filename(None), "model_best.h5");
/// assert_eq!(model_filename(Some(2)), "model2_best.h5");
/// ```
pub fn model_filename(data_head: Option<u32>) -> String {
    match data_head {
        Some(head) => format!("model{head}_best.h5"),
        None => "model_best.h5".to_string(),
    }
}

/// Number of folds and crosses found beneath a model directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FoldLayout {
    pub num_folds: usize,
    pub num_crosses: usize,
}

impl FoldLayout {
    /// Every fold/cross pair in fold-major order.
    pub fn pairs(&self) -> impl Iterator<Item = FoldCross> {
        let num_crosses = self.num_crosses;
        (0..self.num_folds).flat_map(move |fold| {
            (0..num_crosses).map(move |cross| FoldCross::new(fold, cross))
        })
    }

    /// Total number of fold/cross pairs.
    pub fn len(&self) -> usize {
        self.num_folds * self.num_crosses
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `f<N>_c0`: the first cross of every fold.
static FOLD_COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^f\d+_c0$").expect("valid regex"));

/// `f0_c<N>`: every cross of the first fold.
static CROSS_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^f0_c\d+$").expect("valid regex"));

/// Path to the model file of one fold/cross instance.
pub fn model_path(models_dir: &Path, fc: FoldCross, data_head: Option<u32>) -> PathBuf {
    models_dir
        .join(fc.to_string())
        .join(TRAIN_SUBDIR)
        .join(model_filename(data_head))
}

/// Count the folds and crosses beneath `models_dir`.
///
/// A subdirectory only counts if its `train/` folder holds the model file
/// for `data_head`. A `models_dir` that is missing or cannot be listed
/// yields an empty layout, as does an empty glob.
pub fn discover(models_dir: &Path, data_head: Option<u32>) -> FoldLayout {
    let entries = match std::fs::read_dir(models_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                models_dir = %models_dir.display(),
                error = %e,
                "Model directory not readable, no instances found"
            );
            return FoldLayout::default();
        }
    };

    let model_file = model_filename(data_head);
    let mut layout = FoldLayout::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(models_dir = %models_dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        let in_fold_column = FOLD_COLUMN_RE.is_match(name);
        let in_cross_row = CROSS_ROW_RE.is_match(name);
        if !in_fold_column && !in_cross_row {
            continue;
        }
        if !entry.path().join(TRAIN_SUBDIR).join(&model_file).is_file() {
            tracing::debug!(instance = name, model_file = %model_file, "Skipping instance without model file");
            continue;
        }

        // `f0_c0` belongs to both the fold column and the cross row.
        if in_fold_column {
            layout.num_folds += 1;
        }
        if in_cross_row {
            layout.num_crosses += 1;
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_model(root: &Path, instance: &str, file: &str) {
        let train = root.join(instance).join(TRAIN_SUBDIR);
        std::fs::create_dir_all(&train).expect("create train dir");
        std::fs::write(train.join(file), b"").expect("write model file");
    }

    #[test]
    fn two_by_two_grid() {
        let dir = tempfile::tempdir().expect("tempdir");
        for fc in ["f0_c0", "f0_c1", "f1_c0", "f1_c1"] {
            touch_model(dir.path(), fc, "model_best.h5");
        }

        let layout = discover(dir.path(), None);
        assert_eq!(layout, FoldLayout { num_folds: 2, num_crosses: 2 });
        assert_eq!(layout.len(), 4);
    }

    #[test]
    fn counts_come_from_first_row_and_column_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        for fc in ["f0_c0", "f1_c0", "f2_c0", "f0_c1", "f2_c5"] {
            touch_model(dir.path(), fc, "model_best.h5");
        }

        let layout = discover(dir.path(), None);
        assert_eq!(layout.num_folds, 3);
        assert_eq!(layout.num_crosses, 2);
    }

    #[test]
    fn data_head_selects_model_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch_model(dir.path(), "f0_c0", "model1_best.h5");
        touch_model(dir.path(), "f1_c0", "model_best.h5");

        let head = discover(dir.path(), Some(1));
        assert_eq!(head, FoldLayout { num_folds: 1, num_crosses: 1 });

        let default = discover(dir.path(), None);
        assert_eq!(default.num_folds, 1);
        assert_eq!(default.num_crosses, 0);
    }

    #[test]
    fn instance_without_model_file_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch_model(dir.path(), "f0_c0", "model_best.h5");
        std::fs::create_dir_all(dir.path().join("f1_c0").join(TRAIN_SUBDIR)).expect("mkdir");

        let layout = discover(dir.path(), None);
        assert_eq!(layout.num_folds, 1);
    }

    #[test]
    fn unrelated_entries_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch_model(dir.path(), "f0_c0", "model_best.h5");
        touch_model(dir.path(), "ensemble", "model_best.h5");
        touch_model(dir.path(), "fx_c0", "model_best.h5");
        touch_model(dir.path(), "f0_c0_old", "model_best.h5");

        let layout = discover(dir.path(), None);
        assert_eq!(layout, FoldLayout { num_folds: 1, num_crosses: 1 });
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = discover(&dir.path().join("nope"), None);
        assert!(layout.is_empty());
        assert_eq!(layout.pairs().count(), 0);
    }

    #[test]
    fn regular_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let models = dir.path().join("models");
        std::fs::write(&models, b"not a directory").expect("write file");

        let layout = discover(&models, None);
        assert!(layout.is_empty());
        assert_eq!(layout, FoldLayout::default());
    }

    #[test]
    fn pairs_are_fold_major() {
        let layout = FoldLayout { num_folds: 2, num_crosses: 3 };
        let names: Vec<String> = layout.pairs().map(|fc| fc.to_string()).collect();
        assert_eq!(names, ["f0_c0", "f0_c1", "f0_c2", "f1_c0", "f1_c1", "f1_c2"]);
    }

    #[test]
    fn zero_crosses_yields_no_pairs() {
        let layout = FoldLayout { num_folds: 4, num_crosses: 0 };
        assert!(layout.is_empty());
        assert_eq!(layout.pairs().count(), 0);
    }

    #[test]
    fn model_path_layout() {
        let path = model_path(Path::new("/m"), FoldCross::new(1, 2), Some(0));
        assert_eq!(path, PathBuf::from("/m/f1_c2/train/model0_best.h5"));
    }
}
