//! Read models for the day view and the completion summary.

use chrono::NaiveDate;

use super::{Habit, HabitId};

/// Habits schedulable on one date alongside the ones completed that date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayView {
    pub possible: Vec<Habit>,
    pub completed: Vec<HabitId>,
}

/// Completions recorded by one user on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCompletionCount {
    pub date: NaiveDate,
    pub completed: u64,
}

/// Per-day completion summary.
///
/// `completed` may exceed `amount`: a habit completed on a day it was not
/// scheduled still counts as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub completed: u64,
    pub amount: u64,
}

impl DaySummary {
    /// Fraction of possible habits completed, `None` when nothing was possible.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use habit_tracker::domain::DaySummary;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    /// let summary = DaySummary { date, completed: 1, amount: 4 };
    /// assert_eq!(summary.completion_ratio(), Some(0.25));
    /// assert_eq!(DaySummary { date, completed: 1, amount: 0 }.completion_ratio(), None);
    /// ```
    pub fn completion_ratio(&self) -> Option<f64> {
        if self.amount == 0 {
            return None;
        }
        Some(self.completed as f64 / self.amount as f64)
    }
}

/// Pair each day's completion count with the number of habits possible then.
///
/// Output is ordered by date ascending regardless of input order.
pub fn summarise(habits: &[Habit], counts: &[DayCompletionCount]) -> Vec<DaySummary> {
    let mut summaries: Vec<DaySummary> = counts
        .iter()
        .map(|count| DaySummary {
            date: count.date,
            completed: count.completed,
            amount: habits
                .iter()
                .filter(|habit| habit.is_possible_on(count.date))
                .count() as u64,
        })
        .collect();
    summaries.sort_by_key(|summary| summary.date);
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HabitDraft, HabitTitle, UserId, WeekDay};
    use chrono::Utc;
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
    }

    fn habit(created: u32, week_days: Vec<WeekDay>) -> Habit {
        Habit::new(HabitDraft {
            id: HabitId::random(),
            owner: UserId::random(),
            title: HabitTitle::new("habit").expect("title"),
            created_on: day(created),
            created_at: Utc::now(),
            week_days,
        })
    }

    #[rstest]
    fn amount_counts_each_possible_habit_once() {
        let habits = vec![
            habit(1, vec![WeekDay::MONDAY, WeekDay::MONDAY]),
            habit(1, vec![WeekDay::MONDAY, WeekDay::TUESDAY]),
            habit(8, vec![WeekDay::MONDAY]),
        ];
        let counts = [DayCompletionCount {
            date: day(1),
            completed: 1,
        }];

        let summary = summarise(&habits, &counts);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].amount, 2);
    }

    #[rstest]
    fn completed_above_amount_is_not_clamped() {
        let habits = vec![habit(1, vec![WeekDay::MONDAY])];
        let counts = [DayCompletionCount {
            date: day(2),
            completed: 3,
        }];

        let summary = summarise(&habits, &counts);

        assert_eq!(summary[0].completed, 3);
        assert_eq!(summary[0].amount, 0);
        assert_eq!(summary[0].completion_ratio(), None);
    }

    #[rstest]
    fn summaries_are_sorted_by_date() {
        let counts = [
            DayCompletionCount {
                date: day(9),
                completed: 1,
            },
            DayCompletionCount {
                date: day(3),
                completed: 2,
            },
        ];

        let dates: Vec<_> = summarise(&[], &counts).iter().map(|s| s.date).collect();

        assert_eq!(dates, vec![day(3), day(9)]);
    }
}
