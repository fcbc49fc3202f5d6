//! Mutex-guarded maps standing in for the users, habits and day tables.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    CompletionRepository, CompletionRepositoryError, HabitRepository, HabitRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{DayCompletionCount, ExternalId, Habit, HabitId, User, UserId};

#[derive(Default)]
struct StoreState {
    users: HashMap<ExternalId, User>,
    /// Habits in creation order.
    habits: Vec<Habit>,
    /// Completed habit ids per calendar day.
    days: BTreeMap<NaiveDate, BTreeSet<HabitId>>,
}

impl StoreState {
    fn habit(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id() == id)
    }

    fn owned_ids(&self, owner: &UserId) -> BTreeSet<HabitId> {
        self.habits
            .iter()
            .filter(|habit| habit.is_owned_by(owner))
            .map(|habit| *habit.id())
            .collect()
    }
}

/// Volatile implementation of the user, habit and completion repositories.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(external_id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.users.contains_key(user.external_id()) {
            return Err(UserPersistenceError::conflict(
                "external id already registered",
            ));
        }
        state.users.insert(user.external_id().clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl HabitRepository for InMemoryStore {
    async fn create(&self, habit: &Habit) -> Result<(), HabitRepositoryError> {
        let mut state = self.lock().map_err(HabitRepositoryError::query)?;
        state.habits.push(habit.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &HabitId) -> Result<Option<Habit>, HabitRepositoryError> {
        let state = self.lock().map_err(HabitRepositoryError::query)?;
        Ok(state.habit(id).cloned())
    }

    async fn list_possible_on(
        &self,
        owner: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<Habit>, HabitRepositoryError> {
        let state = self.lock().map_err(HabitRepositoryError::query)?;
        Ok(state
            .habits
            .iter()
            .filter(|habit| habit.is_owned_by(owner) && habit.is_possible_on(date))
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, owner: &UserId) -> Result<Vec<Habit>, HabitRepositoryError> {
        let state = self.lock().map_err(HabitRepositoryError::query)?;
        Ok(state
            .habits
            .iter()
            .filter(|habit| habit.is_owned_by(owner))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CompletionRepository for InMemoryStore {
    async fn toggle(
        &self,
        habit: &HabitId,
        date: NaiveDate,
    ) -> Result<bool, CompletionRepositoryError> {
        let mut state = self.lock().map_err(CompletionRepositoryError::query)?;
        let completed = state.days.entry(date).or_default();
        if completed.remove(habit) {
            return Ok(false);
        }
        completed.insert(*habit);
        Ok(true)
    }

    async fn completed_on(
        &self,
        owner: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<HabitId>, CompletionRepositoryError> {
        let state = self.lock().map_err(CompletionRepositoryError::query)?;
        let owned = state.owned_ids(owner);
        Ok(state
            .days
            .get(&date)
            .map(|completed| completed.intersection(&owned).copied().collect())
            .unwrap_or_default())
    }

    async fn completion_counts(
        &self,
        owner: &UserId,
    ) -> Result<Vec<DayCompletionCount>, CompletionRepositoryError> {
        let state = self.lock().map_err(CompletionRepositoryError::query)?;
        let owned = state.owned_ids(owner);
        Ok(state
            .days
            .iter()
            .filter_map(|(date, completed)| {
                let count = completed.intersection(&owned).count() as u64;
                (count > 0).then_some(DayCompletionCount {
                    date: *date,
                    completed: count,
                })
            })
            .collect())
    }
}
