//! Marketing content generator: template substitution with performance scoring.

mod engine;
mod templates;

pub use engine::{
    AbVariation, ContentEngine, ContentError, ContentSuggestion, OptimizationHint,
    OptimizationReport, OptimizedVersion, PerformancePrediction, PerformanceReport,
    SuggestionRequest,
};
