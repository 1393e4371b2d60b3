pub mod analysis;
pub mod extraction;
pub mod processor;
pub mod report;
pub mod summarize;
