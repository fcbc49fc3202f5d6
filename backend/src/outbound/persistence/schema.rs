//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When the
//! migrations change, regenerate with `diesel print-schema` or update by hand.

diesel::table! {
    /// Local users keyed by the identity provider's stable identifier.
    users (id) {
        id -> Uuid,
        /// Provider identifier; unique.
        external_id -> Varchar,
        display_name -> Varchar,
        email -> Varchar,
        avatar_url -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    habits (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        /// Server-local calendar date the habit was created on.
        created_on -> Date,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Weekly recurrence rows; duplicates per habit are allowed.
    habit_week_days (id) {
        id -> Uuid,
        habit_id -> Uuid,
        /// Sunday = 0 through Saturday = 6.
        week_day -> Int2,
    }
}

diesel::table! {
    /// Calendar days that have seen at least one toggle.
    days (id) {
        id -> Uuid,
        date -> Date,
    }
}

diesel::table! {
    /// Completions, unique on `(day_id, habit_id)`.
    day_habits (id) {
        id -> Uuid,
        day_id -> Uuid,
        habit_id -> Uuid,
    }
}

diesel::joinable!(habits -> users (user_id));
diesel::joinable!(habit_week_days -> habits (habit_id));
diesel::joinable!(day_habits -> days (day_id));
diesel::joinable!(day_habits -> habits (habit_id));

diesel::allow_tables_to_appear_in_same_query!(users, habits, habit_week_days, days, day_habits);
