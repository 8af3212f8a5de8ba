//! Daily summary generation: adherence scoring, tier classification, and
//! the rendered journal entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habits::{HabitAnswer, HabitPolarity, HabitRecord};
use crate::platform::UserRef;

/// How a single habit scored for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitOutcome {
    /// Positive habit answered yes (+1).
    Achieved,
    /// Positive habit answered no.
    Missed,
    /// Negative habit answered no (+1).
    Avoided,
    /// Negative habit answered yes.
    Indulged,
}

impl HabitOutcome {
    fn from_answer(answer: &HabitAnswer) -> Self {
        match (answer.polarity, answer.answered_yes) {
            (HabitPolarity::Positive, true) => HabitOutcome::Achieved,
            (HabitPolarity::Positive, false) => HabitOutcome::Missed,
            (HabitPolarity::Negative, false) => HabitOutcome::Avoided,
            (HabitPolarity::Negative, true) => HabitOutcome::Indulged,
        }
    }

    pub fn scores(&self) -> bool {
        matches!(self, HabitOutcome::Achieved | HabitOutcome::Avoided)
    }
}

/// One line of the habit scoreboard, in original list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub habit: String,
    pub outcome: HabitOutcome,
}

impl ScoreLine {
    /// Scoreboard rendering, matching the journal's marker style.
    pub fn render(&self) -> String {
        match self.outcome {
            HabitOutcome::Achieved => format!("✅ {}", self.habit),
            HabitOutcome::Missed => format!("❌ {}", self.habit),
            HabitOutcome::Avoided => format!("✅ Avoided {}", self.habit),
            HabitOutcome::Indulged => format!("❌ Indulged in {}", self.habit),
        }
    }
}

/// Narrative classification of a day's adherence percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Pinnacle,
    Master,
    Steady,
    Mixed,
    Uphill,
    Reflection,
}

impl Tier {
    /// Classify a percentage. Thresholds are checked in descending order;
    /// first match wins.
    pub fn classify(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Tier::Pinnacle
        } else if percentage >= 80.0 {
            Tier::Master
        } else if percentage >= 60.0 {
            Tier::Steady
        } else if percentage >= 40.0 {
            Tier::Mixed
        } else if percentage > 0.0 {
            Tier::Uphill
        } else {
            Tier::Reflection
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tier::Pinnacle => "The Pinnacle of Discipline",
            Tier::Master => "The Master Practitioner",
            Tier::Steady => "The Steady Hand",
            Tier::Mixed => "A Day of Mixed Results",
            Tier::Uphill => "The Uphill Battle",
            Tier::Reflection => "The Day of Reflection",
        }
    }

    fn narrative(&self, name: &str, score: u32, total: u32) -> String {
        match self {
            Tier::Pinnacle => format!(
                "{name} had a perfect day, demonstrating flawless discipline. They completed \
                 all {total} goals, remaining steadfast and focused. An outstanding performance."
            ),
            Tier::Master => format!(
                "{name} showed exceptional focus, achieving {score}/{total} of their goals. \
                 A few minor slips couldn't overshadow a day of strong commitment and progress."
            ),
            Tier::Steady => format!(
                "{name} had a solid day. With {score}/{total} habits completed, they built \
                 positive momentum and successfully navigated most of the day's challenges."
            ),
            Tier::Mixed => format!(
                "{name}'s day was a mix of wins and challenges, hitting {score}/{total} \
                 targets. This day provides valuable lessons on what to focus on tomorrow."
            ),
            Tier::Uphill => format!(
                "{name} struggled with focus today, completing {score}/{total} habits. While \
                 it was a tough day, every completed habit is a small victory to build on."
            ),
            Tier::Reflection => format!(
                "It was a challenging day for {name}, with {score}/{total} habits met. Today \
                 is best used as a day of rest and reflection to come back stronger tomorrow."
            ),
        }
    }
}

/// Scored check-in results for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub tier: Tier,
    pub scoreboard: Vec<ScoreLine>,
}

/// Score a habit record in its stored (declared) order.
pub fn score_record(record: &HabitRecord) -> DayScore {
    let mut score = 0;
    let mut scoreboard = Vec::with_capacity(record.answers.len());
    for answer in &record.answers {
        let outcome = HabitOutcome::from_answer(answer);
        if outcome.scores() {
            score += 1;
        }
        scoreboard.push(ScoreLine {
            habit: answer.habit.clone(),
            outcome,
        });
    }
    let total = record.answers.len() as u32;
    let percentage = if total == 0 {
        0.0
    } else {
        score as f64 * 100.0 / total as f64
    };
    DayScore {
        score,
        total,
        percentage,
        tier: Tier::classify(percentage),
        scoreboard,
    }
}

/// The structured journal document posted to the user's journal channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub title: String,
    pub status_line: String,
    pub narrative: String,
    pub scoreboard: Vec<ScoreLine>,
    /// Free-text journal entry, if one was written before the wait timed out.
    pub journal_text: Option<String>,
    pub author: UserRef,
    pub date: NaiveDate,
}

/// Placeholder shown when the journal wait timed out.
pub const NO_ENTRY_PLACEHOLDER: &str = "*No journal entry provided.*";

impl JournalEntry {
    pub fn scoreboard_text(&self) -> String {
        self.scoreboard
            .iter()
            .map(ScoreLine::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn journal_text_or_placeholder(&self) -> String {
        match &self.journal_text {
            Some(text) => format!("```{text}```"),
            None => NO_ENTRY_PLACEHOLDER.to_string(),
        }
    }

    /// Plain-text rendering for adapters without rich message support.
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n{}\n\n{}\n", self.title, self.status_line, self.narrative);
        if !self.scoreboard.is_empty() {
            out.push_str("\nHabit Scoreboard\n");
            out.push_str(&self.scoreboard_text());
            out.push('\n');
        }
        out.push_str("\nJournal Entry\n");
        out.push_str(&self.journal_text_or_placeholder());
        out.push('\n');
        out
    }
}

/// Generator for daily journal entries.
#[derive(Debug, Clone, Default)]
pub struct SummaryGenerator;

impl SummaryGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build the journal entry for a scored day.
    pub fn generate(
        &self,
        author: &UserRef,
        record: &HabitRecord,
        journal_text: Option<String>,
    ) -> JournalEntry {
        let day = score_record(record);
        JournalEntry {
            title: format!("Daily Journal: {}", record.date),
            status_line: format!("Status: {}", day.tier.title()),
            narrative: day.tier.narrative(&author.name, day.score, day.total),
            scoreboard: day.scoreboard,
            journal_text,
            author: author.clone(),
            date: record.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::UserId;

    fn record(answers: Vec<(&str, HabitPolarity, bool)>) -> HabitRecord {
        HabitRecord {
            date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            answers: answers
                .into_iter()
                .map(|(habit, polarity, answered_yes)| HabitAnswer {
                    habit: habit.into(),
                    polarity,
                    answered_yes,
                })
                .collect(),
        }
    }

    fn author() -> UserRef {
        UserRef {
            id: UserId(1),
            name: "Alex".into(),
            avatar_url: None,
        }
    }

    #[test]
    fn mixed_answers_score_to_steady() {
        // 3 positives [yes, no, yes] + 2 negatives [no, yes]:
        // 2 achieved + 1 avoided = 3 of 5 -> 60% -> Steady.
        let record = record(vec![
            ("Meditate", HabitPolarity::Positive, true),
            ("Gym", HabitPolarity::Positive, false),
            ("Read", HabitPolarity::Positive, true),
            ("Smoke", HabitPolarity::Negative, false),
            ("Junk food", HabitPolarity::Negative, true),
        ]);
        let day = score_record(&record);
        assert_eq!(day.score, 3);
        assert_eq!(day.total, 5);
        assert_eq!(day.percentage, 60.0);
        assert_eq!(day.tier, Tier::Steady);
    }

    #[test]
    fn perfect_day_is_pinnacle() {
        let record = record(vec![
            ("Meditate", HabitPolarity::Positive, true),
            ("Smoke", HabitPolarity::Negative, false),
        ]);
        assert_eq!(score_record(&record).tier, Tier::Pinnacle);
    }

    #[test]
    fn zero_score_is_reflection() {
        let record = record(vec![("Meditate", HabitPolarity::Positive, false)]);
        let day = score_record(&record);
        assert_eq!(day.score, 0);
        assert_eq!(day.tier, Tier::Reflection);
    }

    #[test]
    fn empty_record_guards_division_by_zero() {
        let day = score_record(&record(vec![]));
        assert_eq!(day.percentage, 0.0);
        assert_eq!(day.tier, Tier::Reflection);
    }

    #[test]
    fn tier_ladder_first_match_wins() {
        assert_eq!(Tier::classify(100.0), Tier::Pinnacle);
        assert_eq!(Tier::classify(80.0), Tier::Master);
        assert_eq!(Tier::classify(79.9), Tier::Steady);
        assert_eq!(Tier::classify(60.0), Tier::Steady);
        assert_eq!(Tier::classify(40.0), Tier::Mixed);
        assert_eq!(Tier::classify(1.0), Tier::Uphill);
        assert_eq!(Tier::classify(0.0), Tier::Reflection);
    }

    #[test]
    fn scoreboard_keeps_original_order_and_markers() {
        let record = record(vec![
            ("Gym", HabitPolarity::Positive, false),
            ("Smoke", HabitPolarity::Negative, true),
            ("Sugary drinks", HabitPolarity::Negative, false),
        ]);
        let day = score_record(&record);
        let lines: Vec<String> = day.scoreboard.iter().map(ScoreLine::render).collect();
        assert_eq!(
            lines,
            vec![
                "❌ Gym",
                "❌ Indulged in Smoke",
                "✅ Avoided Sugary drinks",
            ]
        );
    }

    #[test]
    fn entry_carries_placeholder_without_journal_text() {
        let generator = SummaryGenerator::new();
        let entry = generator.generate(&author(), &record(vec![]), None);
        assert_eq!(entry.journal_text_or_placeholder(), NO_ENTRY_PLACEHOLDER);
        assert!(entry.title.starts_with("Daily Journal: 2026-08-30"));
    }

    #[test]
    fn entry_embeds_journal_text_in_code_block() {
        let generator = SummaryGenerator::new();
        let entry = generator.generate(&author(), &record(vec![]), Some("Long day.".into()));
        assert_eq!(entry.journal_text_or_placeholder(), "```Long day.```");
    }
}
