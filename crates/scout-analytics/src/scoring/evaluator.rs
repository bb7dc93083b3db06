use super::observation::Observation;
use super::schema::{ElementKind, Period, ScoringElement, ScoringSchema};
use super::value::{boolean_coerce, numeric_coerce, string_coerce, Fields};
use serde::{Deserialize, Serialize};

/// Sums the points earned by `fields` against one period's elements.
///
/// Absent fields and values that fail to coerce contribute nothing.
pub fn evaluate_period(elements: &[ScoringElement], fields: &Fields) -> f64 {
    elements
        .iter()
        .filter_map(|element| element_points(element, fields))
        .sum()
}

pub fn evaluate_total(schema: &ScoringSchema, fields: &Fields) -> f64 {
    Period::ordered()
        .into_iter()
        .map(|period| evaluate_period(schema.elements(period), fields))
        .sum()
}

/// Points for a single element, or `None` when the observation has no value for it.
fn element_points(element: &ScoringElement, fields: &Fields) -> Option<f64> {
    let value = fields.get(&element.id)?;

    let points = match element.kind {
        ElementKind::Counter => numeric_coerce(value) * element.points,
        ElementKind::Boolean => {
            if boolean_coerce(value) {
                element.points
            } else {
                0.0
            }
        }
        ElementKind::MultipleChoice => element
            .option_points(&string_coerce(value))
            .unwrap_or(0.0),
        ElementKind::Rating | ElementKind::Text => 0.0,
    };

    Some(if points.is_finite() { points } else { 0.0 })
}

/// Stateless evaluator bound to one session's schema.
#[derive(Debug, Clone)]
pub struct ScoringEvaluator {
    schema: ScoringSchema,
}

impl ScoringEvaluator {
    pub fn new(schema: ScoringSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ScoringSchema {
        &self.schema
    }

    pub fn period_points(&self, period: Period, fields: &Fields) -> f64 {
        evaluate_period(self.schema.elements(period), fields)
    }

    pub fn total(&self, fields: &Fields) -> f64 {
        evaluate_total(&self.schema, fields)
    }

    pub fn breakdown(&self, fields: &Fields) -> PointBreakdown {
        let auto = self.period_points(Period::Auto, fields);
        let teleop = self.period_points(Period::Teleop, fields);
        let endgame = self.period_points(Period::Endgame, fields);

        PointBreakdown {
            auto,
            teleop,
            endgame,
            total: auto + teleop + endgame,
        }
    }

    pub fn score(&self, observation: &Observation) -> ScoredObservation {
        let mut components = Vec::new();
        for period in Period::ordered() {
            for element in self.schema.elements(period) {
                if let Some(points) = element_points(element, &observation.fields) {
                    components.push(ElementContribution {
                        period,
                        element_id: element.id.clone(),
                        points,
                    });
                }
            }
        }

        ScoredObservation {
            team_number: observation.team_number,
            match_number: observation.match_number,
            breakdown: self.breakdown(&observation.fields),
            components,
        }
    }
}

/// Points earned per period for one observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointBreakdown {
    pub auto: f64,
    pub teleop: f64,
    pub endgame: f64,
    pub total: f64,
}

impl PointBreakdown {
    pub fn period(&self, period: Period) -> f64 {
        match period {
            Period::Auto => self.auto,
            Period::Teleop => self.teleop,
            Period::Endgame => self.endgame,
        }
    }
}

/// Discrete contribution of one element, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementContribution {
    pub period: Period,
    pub element_id: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredObservation {
    pub team_number: u32,
    pub match_number: u32,
    pub breakdown: PointBreakdown,
    pub components: Vec<ElementContribution>,
}
