use super::super::domain::{ConfigurationId, Criterion, CriterionId, OrderingConfiguration};

pub(crate) const MIN_WEIGHT: i32 = 1;
pub(crate) const MAX_WEIGHT: i32 = 100;

/// Structural failures detected before any sample is scored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    #[error("sample list must not be empty")]
    EmptyInput,
    #[error("ordering configuration {configuration_id} has no criteria")]
    InvalidConfiguration { configuration_id: ConfigurationId },
    #[error("at least one active criterion with a positive weight is required")]
    NoActiveCriteria,
    #[error(
        "criterion '{criterion_name}' ({criterion_id}) has weight {weight}; weights must be between 1 and 100"
    )]
    InvalidWeight {
        criterion_id: CriterionId,
        criterion_name: String,
        weight: i32,
    },
}

impl OrderingError {
    /// Stable machine-readable tag for API payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            OrderingError::EmptyInput => "empty_input",
            OrderingError::InvalidConfiguration { .. } => "invalid_configuration",
            OrderingError::NoActiveCriteria => "no_active_criteria",
            OrderingError::InvalidWeight { .. } => "invalid_weight",
        }
    }
}

/// Active criteria and their summed weight, resolved once per run.
#[derive(Debug)]
pub(crate) struct ScoringPlan<'a> {
    pub(crate) active: Vec<&'a Criterion>,
    pub(crate) total_weight: f64,
}

pub(crate) fn validate<'a, T>(
    items: &[T],
    configuration: &'a OrderingConfiguration,
) -> Result<ScoringPlan<'a>, OrderingError> {
    if items.is_empty() {
        return Err(OrderingError::EmptyInput);
    }

    if configuration.criteria.is_empty() {
        return Err(OrderingError::InvalidConfiguration {
            configuration_id: configuration.id.clone(),
        });
    }

    let active: Vec<&Criterion> = configuration.active_criteria().collect();
    let total_weight = configuration.total_active_weight();
    if active.is_empty() || total_weight <= 0 {
        return Err(OrderingError::NoActiveCriteria);
    }

    if let Some(criterion) = active
        .iter()
        .find(|criterion| !(MIN_WEIGHT..=MAX_WEIGHT).contains(&criterion.weight))
    {
        return Err(OrderingError::InvalidWeight {
            criterion_id: criterion.id.clone(),
            criterion_name: criterion.name.clone(),
            weight: criterion.weight,
        });
    }

    Ok(ScoringPlan {
        active,
        total_weight: total_weight as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::ordering::domain::CriterionKind;

    fn configuration(criteria: Vec<Criterion>) -> OrderingConfiguration {
        OrderingConfiguration::new("cfg-test", "Test", criteria, "qa")
    }

    fn criterion(id: &str, weight: i32) -> Criterion {
        Criterion::new(id, id, CriterionKind::Numeric, "score").weight(weight)
    }

    #[test]
    fn empty_items_are_rejected_first() {
        let items: Vec<u8> = Vec::new();
        let config = configuration(Vec::new());

        assert_eq!(
            validate(&items, &config).unwrap_err(),
            OrderingError::EmptyInput
        );
    }

    #[test]
    fn configuration_without_criteria_is_invalid() {
        let config = configuration(Vec::new());

        match validate(&[1], &config).unwrap_err() {
            OrderingError::InvalidConfiguration { configuration_id } => {
                assert_eq!(configuration_id.0, "cfg-test");
            }
            other => panic!("expected invalid configuration, got {other:?}"),
        }
    }

    #[test]
    fn zero_summed_weight_counts_as_no_active_criteria() {
        let config = configuration(vec![criterion("a", 0), criterion("b", 0)]);

        assert_eq!(
            validate(&[1], &config).unwrap_err(),
            OrderingError::NoActiveCriteria
        );
    }

    #[test]
    fn names_the_first_out_of_range_weight() {
        let config = configuration(vec![
            criterion("ok", 40),
            criterion("too-heavy", 140),
            criterion("negative", -5),
        ]);

        match validate(&[1], &config).unwrap_err() {
            OrderingError::InvalidWeight {
                criterion_id,
                weight,
                ..
            } => {
                assert_eq!(criterion_id.0, "too-heavy");
                assert_eq!(weight, 140);
            }
            other => panic!("expected invalid weight, got {other:?}"),
        }
    }

    #[test]
    fn inactive_criteria_are_not_weight_checked() {
        let config = configuration(vec![criterion("ok", 10), criterion("off", 500).inactive()]);

        let plan = validate(&[1], &config).expect("valid plan");
        assert_eq!(plan.active.len(), 1);
        assert_eq!(plan.total_weight, 10.0);
    }
}
