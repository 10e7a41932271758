//! Deterministic fallback planner.
//!
//! Produces a week-by-week study plan from nothing but the prompt text, so
//! plan generation keeps working when the model is unconfigured, down, or
//! returns garbage. The only signal read from the prompt is an
//! `<N> month` duration.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Duration used when the prompt names no month count.
pub const DEFAULT_MONTHS: u32 = 3;

/// Upper bound on the month count taken from a prompt.
pub const MAX_MONTHS: u32 = 120;

/// Weeks per month in the synthetic calendar.
pub const WEEKS_PER_MONTH: u32 = 4;

/// Number of distinct topics the weekly tasks cycle through.
const TOPIC_CYCLE: u32 = 6;

static MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*month").expect("month pattern is valid"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One actionable task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

/// A week of the synthetic plan: always exactly three tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBlock {
    pub id: String,
    pub title: String,
    pub tasks: Vec<GeneratedTask>,
}

/// Echo of what the generator derived from the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMeta {
    pub months: u32,
    pub weeks: u32,
    pub prompt: String,
}

/// The fallback plan: weekly blocks plus the flattened task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticPlan {
    pub meta: PlanMeta,
    pub plan: Vec<WeekBlock>,
    pub tasks: Vec<GeneratedTask>,
}

impl SyntheticPlan {
    pub fn months(&self) -> u32 {
        self.meta.months
    }

    pub fn weeks(&self) -> u32 {
        self.meta.weeks
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Read the month count from a prompt.
///
/// The first `<ASCII digits> month` match wins (whitespace between the two is
/// allowed, so "6months" and "6 months" both count). Values are clamped to
/// `1..=MAX_MONTHS`; a number too large to parse is treated as the maximum.
pub fn parse_months(prompt: &str) -> u32 {
    let Some(caps) = MONTH_PATTERN.captures(prompt) else {
        return DEFAULT_MONTHS;
    };
    caps[1]
        .parse::<u32>()
        .unwrap_or(MAX_MONTHS)
        .clamp(1, MAX_MONTHS)
}

fn week_block(week: u32) -> WeekBlock {
    let topic = ((week - 1) % TOPIC_CYCLE) + 1;
    let texts = [
        format!("Learn/Review core concept {topic}"),
        format!("Solve 3 coding problems focused on concept {topic}"),
        format!("Build a tiny project or component applying concept {topic}"),
    ];

    WeekBlock {
        id: format!("week-{week}"),
        title: format!("Week {week}"),
        tasks: texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| GeneratedTask {
                id: format!("w{week}-{}", i + 1),
                text,
                done: false,
            })
            .collect(),
    }
}

/// Build the synthetic plan for `prompt`. Total and pure.
pub fn generate(prompt: &str) -> SyntheticPlan {
    let months = parse_months(prompt);
    let weeks = months * WEEKS_PER_MONTH;

    let plan: Vec<WeekBlock> = (1..=weeks).map(week_block).collect();
    let tasks = plan.iter().flat_map(|w| w.tasks.iter().cloned()).collect();

    SyntheticPlan {
        meta: PlanMeta {
            months,
            weeks,
            prompt: prompt.to_string(),
        },
        plan,
        tasks,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn parse_months_reads_number_before_month() {
        assert_eq!(parse_months("Learn Go in 2 months"), 2);
        assert_eq!(parse_months("6months of Rust"), 6);
        assert_eq!(parse_months("a 1 month sprint"), 1);
    }

    #[test]
    fn parse_months_defaults_without_pattern() {
        assert_eq!(parse_months("Learn Go"), DEFAULT_MONTHS);
        assert_eq!(parse_months("Learn Go in 8 weeks"), DEFAULT_MONTHS);
        assert_eq!(parse_months(""), DEFAULT_MONTHS);
    }

    #[test]
    fn non_ascii_digits_fall_back_to_default() {
        assert_eq!(parse_months("Learn Go in ２ months"), DEFAULT_MONTHS);
        assert_eq!(parse_months("تعلم في ٣ month"), DEFAULT_MONTHS);

        let plan = generate("Learn Go in ２ months");
        assert_eq!(plan.months(), DEFAULT_MONTHS);
        assert_eq!(plan.weeks(), DEFAULT_MONTHS * WEEKS_PER_MONTH);
        assert_eq!(plan.tasks.len(), 36);
    }

    #[test]
    fn parse_months_first_match_wins() {
        assert_eq!(parse_months("2 months of Go then 5 months of Rust"), 2);
    }

    #[test]
    fn parse_months_clamps() {
        assert_eq!(parse_months("0 months"), 1);
        assert_eq!(parse_months("500 months"), MAX_MONTHS);
        assert_eq!(parse_months("99999999999999999999 months"), MAX_MONTHS);
    }

    #[test]
    fn week_count_and_tasks_per_week() {
        for months in 1..=12u32 {
            let plan = generate(&format!("Study compilers for {months} month"));
            assert_eq!(plan.months(), months);
            assert_eq!(plan.weeks(), months * 4);
            assert_eq!(plan.plan.len(), (months * 4) as usize);
            assert!(plan.plan.iter().all(|w| w.tasks.len() == 3));
            assert_eq!(plan.tasks.len(), (months * 12) as usize);

            let ids: HashSet<&str> = plan.tasks.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(ids.len(), plan.tasks.len(), "task ids must be unique");
        }
    }

    #[test]
    fn default_plan_has_twelve_weeks() {
        let plan = generate("Get better at algorithms");
        assert_eq!(plan.months(), 3);
        assert_eq!(plan.plan.len(), 12);
        assert_eq!(plan.tasks.len(), 36);
    }

    #[test]
    fn week_layout_and_topic_cycle() {
        let plan = generate("3 months");
        let first = &plan.plan[0];
        assert_eq!(first.id, "week-1");
        assert_eq!(first.title, "Week 1");
        assert_eq!(first.tasks[0].id, "w1-1");
        assert_eq!(first.tasks[0].text, "Learn/Review core concept 1");
        assert_eq!(
            first.tasks[1].text,
            "Solve 3 coding problems focused on concept 1"
        );
        assert_eq!(
            first.tasks[2].text,
            "Build a tiny project or component applying concept 1"
        );
        assert!(first.tasks.iter().all(|t| !t.done));

        // Week 7 wraps back to topic 1, week 6 is topic 6.
        assert_eq!(plan.plan[5].tasks[0].text, "Learn/Review core concept 6");
        assert_eq!(plan.plan[6].tasks[0].text, "Learn/Review core concept 1");
        assert_eq!(plan.plan[6].tasks[2].id, "w7-3");
    }

    #[test]
    fn flattened_tasks_preserve_order() {
        let plan = generate("1 month");
        let expected: Vec<String> = (1..=4)
            .flat_map(|w| (1..=3).map(move |i| format!("w{w}-{i}")))
            .collect();
        let actual: Vec<String> = plan.tasks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn generation_is_pure() {
        let prompt = "Learn Go in 2 months";
        assert_eq!(generate(prompt), generate(prompt));
    }

    #[test]
    fn serializes_with_meta_block() {
        let value = serde_json::to_value(generate("Learn Go in 2 months")).unwrap();
        assert_eq!(value["meta"]["months"], 2);
        assert_eq!(value["meta"]["weeks"], 8);
        assert_eq!(value["meta"]["prompt"], "Learn Go in 2 months");
        assert_eq!(value["plan"].as_array().unwrap().len(), 8);
        assert_eq!(value["tasks"].as_array().unwrap().len(), 24);
        assert_eq!(value["tasks"][0]["done"], false);
    }
}
