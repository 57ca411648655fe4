use crate::infra::{load_configuration, load_items, ordering_service};
use brew_qc::config::{AppConfig, OrderingSettings, DEFAULT_RESULT_HISTORY};
use brew_qc::error::AppError;
use brew_qc::workflows::ordering::{
    Criterion, CriterionKind, OrderingConfiguration, OrderingResult, PreviewEntry, SessionScope,
};
use brew_qc::workflows::samples::{
    Conformity, Priority, QualityAssessment, Sample, SampleId,
};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Sample file to rank (.csv export or JSON array)
    #[arg(long)]
    pub(crate) samples: PathBuf,
    /// Ordering configuration (JSON). Defaults to the session default.
    #[arg(long)]
    pub(crate) configuration: Option<PathBuf>,
    /// Session family used to pick the default configuration
    #[arg(long, value_parser = parse_session_scope, default_value = "routine")]
    pub(crate) session: SessionScope,
    /// Scope (session) identifier stamped on the result
    #[arg(long, default_value = "cli")]
    pub(crate) scope: String,
    /// Actor identifier stamped on the result
    #[arg(long, default_value = "cli")]
    pub(crate) actor: String,
    /// Print the per-criterion breakdown for every sample
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Sample file to preview (.csv export or JSON array)
    #[arg(long)]
    pub(crate) samples: PathBuf,
    /// Configuration whose criteria are previewed. Defaults to the routine default.
    #[arg(long)]
    pub(crate) configuration: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the per-criterion breakdown for every sample
    #[arg(long)]
    pub(crate) explain: bool,
}

pub(crate) fn parse_session_scope(raw: &str) -> Result<SessionScope, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "routine" => Ok(SessionScope::Routine),
        "extra" => Ok(SessionScope::Extra),
        "all" => Ok(SessionScope::All),
        other => Err(format!(
            "unknown session scope '{other}' (expected routine, extra, or all)"
        )),
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        samples,
        configuration,
        session,
        scope,
        actor,
        explain,
    } = args;

    let config = AppConfig::load()?;
    let service = ordering_service(&config.ordering)?;
    let items = load_items(&samples)?;

    let result = match configuration {
        Some(path) => {
            let configuration = load_configuration(&path)?;
            service.rank_with(&configuration, &items, &scope, &actor)?
        }
        None => service.rank_with_default(session, &items, &scope, &actor)?,
    };

    render_ranking(&result, explain);
    Ok(())
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let PreviewArgs {
        samples,
        configuration,
    } = args;

    let items = load_items(&samples)?;
    let criteria = match configuration {
        Some(path) => load_configuration(&path)?.criteria,
        None => OrderingConfiguration::routine_default().criteria,
    };
    let service = ordering_service(&OrderingSettings {
        catalog_path: None,
        result_history: DEFAULT_RESULT_HISTORY,
    })?;

    render_preview(&service.preview(&items, &criteria));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = Utc::now().date_naive();
    let service = ordering_service(&OrderingSettings {
        catalog_path: None,
        result_history: DEFAULT_RESULT_HISTORY,
    })?;
    let items = demo_samples(today)
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()?;

    println!("Brewery sample ordering demo ({today})");
    let result = service.rank_with_default(SessionScope::Routine, &items, "demo-session", "demo")?;
    render_ranking(&result, args.explain);

    println!("\nDraft criteria preview (weight 0 is rejected by strict ranking)");
    let draft = vec![
        Criterion::new("quality", "Quality score", CriterionKind::Numeric, "quality.score")
            .weight(0)
            .bounds(0.0, 100.0),
    ];
    render_preview(&service.preview(&items, &draft));

    Ok(())
}

fn item_label(item: &Value) -> String {
    let id = item.get("id").and_then(Value::as_str).unwrap_or("?");
    match item.get("code").and_then(Value::as_str) {
        Some(code) => format!("{code} ({id})"),
        None => id.to_string(),
    }
}

pub(crate) fn render_ranking(result: &OrderingResult<Value>, explain: bool) {
    println!(
        "Ordering {} for scope {} by {} at {}",
        result.configuration_id,
        result.scope_id,
        result.generated_by,
        result.applied_at.format("%Y-%m-%d %H:%M UTC")
    );
    for (item, score) in result.ranked() {
        println!(
            "  {:>2}. {:<24} {:>6.2}",
            score.final_position,
            item_label(item),
            score.total_score
        );
        if explain {
            for line in score.explain() {
                println!("        {line}");
            }
        }
    }
}

pub(crate) fn render_preview(entries: &[PreviewEntry<Value>]) {
    if entries.is_empty() {
        println!("  (no samples)");
        return;
    }
    for entry in entries {
        println!(
            "  {:>2}. {:<24} {:>6.2}",
            entry.position,
            item_label(&entry.item),
            entry.score
        );
    }
}

fn demo_sample(
    id: &str,
    code: &str,
    description: &str,
    produced: NaiveDate,
    sample_type: &str,
    priority: Option<Priority>,
    quality: Option<f64>,
) -> Sample {
    Sample {
        id: SampleId(id.to_string()),
        code: code.to_string(),
        description: description.to_string(),
        production_date: produced,
        expiration_date: Some(produced + Duration::days(180)),
        batch: format!("B-{}", produced.format("%y%m%d")),
        sample_type: sample_type.to_string(),
        priority,
        quality: quality.map(|score| QualityAssessment {
            score,
            conformity: if score >= 80.0 {
                Conformity::Conforming
            } else {
                Conformity::Pending
            },
            last_evaluation: None,
        }),
        alcohol_content: None,
        bitterness: None,
        color: None,
        temperature: None,
        clarity: None,
        aroma: None,
        stability: None,
        storage_conditions: None,
        risk_level: None,
        last_tested: None,
        test_frequency: None,
        cost_per_unit: None,
        available_quantity: None,
    }
}

fn demo_samples(today: NaiveDate) -> Vec<Sample> {
    vec![
        demo_sample(
            "s-101",
            "IPA-101",
            "West coast IPA",
            today - Duration::days(2),
            "IPA",
            Some(Priority::High),
            Some(91.0),
        ),
        demo_sample(
            "s-102",
            "LAG-102",
            "Munich helles",
            today - Duration::days(12),
            "Lager",
            Some(Priority::Medium),
            Some(86.5),
        ),
        demo_sample(
            "s-103",
            "PIL-103",
            "Bohemian pilsner",
            today - Duration::days(21),
            "Pilsner",
            None,
            None,
        ),
        demo_sample(
            "s-104",
            "WEI-104",
            "Hefeweizen",
            today - Duration::days(5),
            "Weiss",
            Some(Priority::Low),
            Some(78.0),
        ),
        demo_sample(
            "s-105",
            "POR-105",
            "Robust porter",
            today - Duration::days(40),
            "Porter",
            Some(Priority::Medium),
            Some(83.0),
        ),
    ]
}
