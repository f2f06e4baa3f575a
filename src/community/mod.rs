pub mod algorithm;
pub mod label_propagation;
pub mod louvain;
pub mod random_partition;
