pub mod answer;
pub mod distractor;
pub mod history;
pub mod sampler;
