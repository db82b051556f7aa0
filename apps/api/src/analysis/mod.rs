// Resume analysis: segmentation, rule-based scoring, suggestions, and the pipeline
// that ties them to the critique client. All LLM calls go through `critique`.

pub mod handlers;
pub mod pipeline;
pub mod scoring;
pub mod sections;
pub mod suggestions;
