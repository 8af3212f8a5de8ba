//! Habit prompts and daily adherence records.
//!
//! The check-in asks one yes/no question per configured habit, positive
//! habits first, each in declared order. Answers are stored as an ordered
//! record list rather than a map so the same habit text can appear under
//! both polarities and declared order is preserved end-to-end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::UserConfig;

/// Whether a habit is something to do or something to avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitPolarity {
    Positive,
    Negative,
}

/// One habit question in the check-in sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitPrompt {
    pub habit: String,
    pub polarity: HabitPolarity,
}

impl HabitPrompt {
    /// Question wording for this habit.
    ///
    /// A small keyword lookup varies the phrasing for well-known habit
    /// texts; everything else gets the generic form for its polarity.
    pub fn question_text(&self, index: usize, total: usize) -> String {
        let prefix = phrase_prefix(&self.habit, self.polarity);
        format!(
            "**Question {} of {}**\n\n{} **{}** today?",
            index + 1,
            total,
            prefix,
            self.habit
        )
    }
}

fn phrase_prefix(habit: &str, polarity: HabitPolarity) -> &'static str {
    let lower = habit.to_lowercase();
    match polarity {
        HabitPolarity::Positive => {
            if lower.contains("gym") {
                "Did you go to the"
            } else if lower.contains("protein") {
                "Did you take your"
            } else {
                "Did you"
            }
        }
        HabitPolarity::Negative => "Did you avoid",
    }
}

/// Build the ordered prompt list: positive habits first, then negative,
/// each in declared order.
pub fn prompt_list(config: &UserConfig) -> Vec<HabitPrompt> {
    config
        .positive_habits
        .iter()
        .map(|habit| HabitPrompt {
            habit: habit.clone(),
            polarity: HabitPolarity::Positive,
        })
        .chain(config.negative_habits.iter().map(|habit| HabitPrompt {
            habit: habit.clone(),
            polarity: HabitPolarity::Negative,
        }))
        .collect()
}

/// A recorded answer for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitAnswer {
    pub habit: String,
    pub polarity: HabitPolarity,
    pub answered_yes: bool,
}

/// All habit answers for one user on one date. Saved as a full overwrite;
/// a later check-in for the same day replaces the earlier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub date: NaiveDate,
    pub answers: Vec<HabitAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ChannelId;

    fn config() -> UserConfig {
        UserConfig::new(
            7,
            ChannelId(1),
            vec!["Meditate".into(), "Go to the gym".into()],
            vec!["Smoke".into()],
        )
        .unwrap()
    }

    #[test]
    fn prompts_are_positive_first_in_declared_order() {
        let prompts = prompt_list(&config());
        let order: Vec<(&str, HabitPolarity)> = prompts
            .iter()
            .map(|p| (p.habit.as_str(), p.polarity))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Meditate", HabitPolarity::Positive),
                ("Go to the gym", HabitPolarity::Positive),
                ("Smoke", HabitPolarity::Negative),
            ]
        );
    }

    #[test]
    fn phrasing_varies_by_keyword() {
        let prompts = prompt_list(&config());
        assert!(prompts[0].question_text(0, 3).contains("Did you **Meditate**"));
        assert!(prompts[1]
            .question_text(1, 3)
            .contains("Did you go to the **Go to the gym**"));
        assert!(prompts[2]
            .question_text(2, 3)
            .contains("Did you avoid **Smoke**"));
    }

    #[test]
    fn question_numbering_is_one_based() {
        let prompts = prompt_list(&config());
        assert!(prompts[0].question_text(0, 3).starts_with("**Question 1 of 3**"));
    }

    #[test]
    fn same_text_can_carry_both_polarities() {
        let config = UserConfig::new(
            7,
            ChannelId(1),
            vec!["Coffee".into()],
            vec!["Coffee".into()],
        )
        .unwrap();
        let record = HabitRecord {
            date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            answers: prompt_list(&config)
                .into_iter()
                .map(|p| HabitAnswer {
                    habit: p.habit,
                    polarity: p.polarity,
                    answered_yes: true,
                })
                .collect(),
        };
        // Both entries survive; a tuple-keyed map would have collided.
        assert_eq!(record.answers.len(), 2);
    }
}
