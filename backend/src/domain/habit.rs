//! Habit aggregate and its weekly recurrence schedule.
//!
//! A habit is "possible" on a calendar day when the day is on or after the
//! habit's creation date and the day's weekday is one of the habit's
//! recurrence weekdays.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Validation errors raised when building habit values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    EmptyTitle,
    WeekDayOutOfRange { value: i64 },
}

impl fmt::Display for HabitValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::WeekDayOutOfRange { value } => {
                write!(f, "week day {value} is outside 0 (Sunday) to 6 (Saturday)")
            }
        }
    }
}

impl std::error::Error for HabitValidationError {}

/// Habit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(Uuid);

impl HabitId {
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty habit title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitTitle(String);

impl HabitTitle {
    /// Validate a title. Only the empty string is rejected; whitespace is
    /// kept as supplied.
    pub fn new(title: impl Into<String>) -> Result<Self, HabitValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(HabitValidationError::EmptyTitle);
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for HabitTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Day of the week, numbered from Sunday = 0 to Saturday = 6.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use habit_tracker::domain::WeekDay;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
/// assert_eq!(WeekDay::of(monday).number(), 1);
/// assert!(WeekDay::try_from(7_i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekDay(u8);

impl WeekDay {
    pub const SUNDAY: Self = Self(0);
    pub const MONDAY: Self = Self(1);
    pub const TUESDAY: Self = Self(2);
    pub const WEDNESDAY: Self = Self(3);
    pub const THURSDAY: Self = Self(4);
    pub const FRIDAY: Self = Self(5);
    pub const SATURDAY: Self = Self(6);

    /// Weekday of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        // num_days_from_sunday is always in 0..=6.
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for WeekDay {
    type Error = HabitValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|day| *day <= 6)
            .map(Self)
            .ok_or(HabitValidationError::WeekDayOutOfRange { value })
    }
}

/// Validated input for a habit that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub title: HabitTitle,
    pub week_days: Vec<WeekDay>,
}

impl NewHabit {
    /// Validate a title and raw weekday numbers.
    ///
    /// Weekday validation reports the index of the first offending entry.
    pub fn try_from_parts(
        title: impl Into<String>,
        week_days: &[i64],
    ) -> Result<Self, (Option<usize>, HabitValidationError)> {
        let title = HabitTitle::new(title).map_err(|err| (None, err))?;
        let week_days = week_days
            .iter()
            .enumerate()
            .map(|(index, raw)| WeekDay::try_from(*raw).map_err(|err| (Some(index), err)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { title, week_days })
    }
}

/// Input for [`Habit::new`].
#[derive(Debug, Clone)]
pub struct HabitDraft {
    pub id: HabitId,
    pub owner: UserId,
    pub title: HabitTitle,
    pub created_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub week_days: Vec<WeekDay>,
}

/// A recurring habit owned by one user.
///
/// ## Invariants
/// - `week_days` may hold duplicates; they never make a habit more possible.
/// - `week_days` is kept in ascending order, so stores need not preserve
///   insertion order.
/// - Habits are create-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    id: HabitId,
    owner: UserId,
    title: HabitTitle,
    created_on: NaiveDate,
    created_at: DateTime<Utc>,
    week_days: Vec<WeekDay>,
}

impl Habit {
    pub fn new(draft: HabitDraft) -> Self {
        let HabitDraft {
            id,
            owner,
            title,
            created_on,
            created_at,
            mut week_days,
        } = draft;
        week_days.sort_unstable();
        Self {
            id,
            owner,
            title,
            created_on,
            created_at,
            week_days,
        }
    }

    pub fn id(&self) -> &HabitId {
        &self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn title(&self) -> &HabitTitle {
        &self.title
    }

    /// Calendar date the habit was created on, in server local time.
    pub fn created_on(&self) -> NaiveDate {
        self.created_on
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn week_days(&self) -> &[WeekDay] {
        self.week_days.as_slice()
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Whether the habit is schedulable on `date`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, Utc};
    /// use habit_tracker::domain::{
    ///     Habit, HabitDraft, HabitId, HabitTitle, UserId, WeekDay,
    /// };
    ///
    /// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    /// let habit = Habit::new(HabitDraft {
    ///     id: HabitId::random(),
    ///     owner: UserId::random(),
    ///     title: HabitTitle::new("Exercise").expect("title"),
    ///     created_on: monday,
    ///     created_at: Utc::now(),
    ///     week_days: vec![WeekDay::MONDAY, WeekDay::WEDNESDAY, WeekDay::FRIDAY],
    /// });
    /// assert!(habit.is_possible_on(monday));
    /// assert!(!habit.is_possible_on(monday.succ_opt().expect("tuesday")));
    /// ```
    pub fn is_possible_on(&self, date: NaiveDate) -> bool {
        date >= self.created_on && self.week_days.contains(&WeekDay::of(date))
    }
}

#[cfg(test)]
mod tests {
    //! Schedule rules for habits.
    use super::*;
    use rstest::{fixture, rstest};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[fixture]
    fn exercise() -> Habit {
        // 2024-01-01 is a Monday.
        Habit::new(HabitDraft {
            id: HabitId::random(),
            owner: UserId::random(),
            title: HabitTitle::new("Exercise").expect("title"),
            created_on: day(2024, 1, 1),
            created_at: Utc::now(),
            week_days: vec![WeekDay::MONDAY, WeekDay::WEDNESDAY, WeekDay::FRIDAY],
        })
    }

    #[rstest]
    #[case(day(2024, 1, 1), true)]
    #[case(day(2024, 1, 2), false)]
    #[case(day(2024, 1, 3), true)]
    #[case(day(2024, 1, 5), true)]
    #[case(day(2024, 1, 7), false)]
    #[case(day(2024, 1, 8), true)]
    #[case(day(2023, 12, 29), false)]
    fn possibility_follows_creation_date_and_weekdays(
        exercise: Habit,
        #[case] date: NaiveDate,
        #[case] expected: bool,
    ) {
        assert_eq!(exercise.is_possible_on(date), expected);
    }

    #[rstest]
    fn duplicate_weekdays_are_tolerated(exercise: Habit) {
        let mut draft_days = exercise.week_days().to_vec();
        draft_days.push(WeekDay::MONDAY);
        let habit = Habit::new(HabitDraft {
            id: *exercise.id(),
            owner: *exercise.owner(),
            title: exercise.title().clone(),
            created_on: exercise.created_on(),
            created_at: exercise.created_at(),
            week_days: draft_days,
        });
        assert!(habit.is_possible_on(day(2024, 1, 1)));
        assert!(!habit.is_possible_on(day(2024, 1, 2)));
        assert_eq!(
            habit.week_days(),
            &[
                WeekDay::MONDAY,
                WeekDay::MONDAY,
                WeekDay::WEDNESDAY,
                WeekDay::FRIDAY
            ]
        );
    }

    #[rstest]
    #[case(0, true)]
    #[case(6, true)]
    #[case(7, false)]
    #[case(-1, false)]
    #[case(300, false)]
    fn weekday_range_is_zero_to_six(#[case] raw: i64, #[case] valid: bool) {
        assert_eq!(WeekDay::try_from(raw).is_ok(), valid);
    }

    #[rstest]
    fn weekday_of_sunday_is_zero() {
        assert_eq!(WeekDay::of(day(2024, 1, 7)), WeekDay::SUNDAY);
        assert_eq!(WeekDay::of(day(2024, 1, 6)), WeekDay::SATURDAY);
    }

    #[rstest]
    fn new_habit_reports_offending_weekday_index() {
        let err = NewHabit::try_from_parts("Read", &[1, 3, 9]).expect_err("out of range");
        assert_eq!(
            err,
            (Some(2), HabitValidationError::WeekDayOutOfRange { value: 9 })
        );
    }

    #[rstest]
    fn new_habit_rejects_empty_titles() {
        let err = NewHabit::try_from_parts("", &[1]).expect_err("empty title");
        assert_eq!(err, (None, HabitValidationError::EmptyTitle));
    }

    #[rstest]
    #[case(" ")]
    #[case("  Read  ")]
    fn whitespace_titles_are_kept_verbatim(#[case] title: &str) {
        let habit = NewHabit::try_from_parts(title, &[1]).expect("non-empty title");
        assert_eq!(habit.title.as_ref(), title);
    }

    #[rstest]
    fn new_habit_accepts_empty_schedule() {
        let habit = NewHabit::try_from_parts("Someday", &[]).expect("valid");
        assert!(habit.week_days.is_empty());
    }
}
