pub mod cpu_features;

pub use cpu_features::SimdLevel;
