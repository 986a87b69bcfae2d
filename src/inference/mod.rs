pub mod enumerate;
pub mod exact;
pub mod family_tree;
pub mod joint;
pub mod model;
pub mod pedigree;
pub mod posterior;
pub use exact::{infer, infer_with, Inference, InferenceStats, Method};
pub use model::{GeneCount, HeredityModel};
pub use pedigree::{Pedigree, PersonRecord};
pub use posterior::{Posterior, Posteriors};
