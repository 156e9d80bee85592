pub const DEFAULT_COMMENT: &str = "#";
pub const DEFAULT_UPSTREAM: u32 = 2000;
pub const DEFAULT_DOWNSTREAM: u32 = 0;
pub const DEFAULT_WINDOW_SIZE: u32 = 5000;
pub const GTF_GENE_TYPE: &str = "gene";

/// placeholder written for GTF attributes a gene record lacks
pub const MISSING_ATTRIBUTE: &str = ".";
