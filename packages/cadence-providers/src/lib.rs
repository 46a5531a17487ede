pub mod rank;
pub mod visibility;

pub use rank::{GradeClassifier, RankClassifier};
pub use visibility::{PublicGate, Viewer, Visibility};
