pub mod feature;
pub mod feature_set;
pub mod fragment;
pub mod gene_activity;

// re-export for cleaner imports
pub use self::feature::Feature;
pub use self::feature_set::FeatureSet;
pub use self::fragment::Fragment;
pub use self::gene_activity::GeneActivityOptions;
