use std::fmt;

use serde::Serialize;

/// A single cross-validation partition: fold `fold`, cross `cross`.
///
/// Displays as the directory name used on disk, e.g. `f1_c0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FoldCross {
    pub fold: usize,
    pub cross: usize,
}

impl FoldCross {
    pub fn new(fold: usize, cross: usize) -> Self {
        Self { fold, cross }
    }
}

impl fmt::Display for FoldCross {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}_c{}", self.fold, self.cross)
    }
}
