use super::domain::{Criterion, CriterionKind, OrderingConfiguration, SessionScope, SortDirection};

pub const ROUTINE_DEFAULT_ID: &str = "routine-default";

impl OrderingConfiguration {
    /// Standard ordering for routine tasting sessions.
    ///
    /// Production recency carries 40% of the weight; sample priority and beer style split
    /// the remainder.
    pub fn routine_default() -> Self {
        let criteria = vec![
            Criterion::new(
                "production-date",
                "Production date",
                CriterionKind::Date,
                "production_date",
            )
            .described("Recency of the production date")
            .weight(40)
            .direction(SortDirection::Desc)
            .window_days(30.0),
            Criterion::new("priority", "Priority", CriterionKind::Enum, "priority")
                .described("Priority level assigned to the sample")
                .weight(30)
                .direction(SortDirection::Desc)
                .options(["low", "medium", "high"])
                .default_value(50.0),
            Criterion::new("beer-type", "Beer type", CriterionKind::Enum, "type")
                .described("Style of the sampled beer")
                .weight(30)
                .options(["IPA", "Lager", "Pilsner", "Weiss", "Porter"])
                .default_value(50.0),
        ];

        let mut configuration = OrderingConfiguration::new(
            ROUTINE_DEFAULT_ID,
            "Standard ordering - routine",
            criteria,
            "admin",
        );
        configuration.description = "Default configuration for routine sessions".to_string();
        configuration.is_default = true;
        configuration.scope = Some(SessionScope::Routine);
        configuration
    }
}
