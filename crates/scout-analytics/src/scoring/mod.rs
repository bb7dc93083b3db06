mod evaluator;
mod metric;
mod observation;
mod schema;
mod value;

pub use evaluator::{
    evaluate_period, evaluate_total, ElementContribution, PointBreakdown, ScoredObservation,
    ScoringEvaluator,
};
pub use metric::{resolve, Metric, MetricResolver};
pub use observation::{Observation, TeamObservations};
pub use schema::{ChoiceOption, ElementKind, Period, SchemaError, ScoringElement, ScoringSchema};
pub use value::{boolean_coerce, numeric_coerce, string_coerce, FieldValue, Fields};
