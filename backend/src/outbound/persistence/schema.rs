//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Users provisioned by the authentication service.
    users (id) {
        id -> Uuid,
        display_name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Scoring rules owned by a user.
    ///
    /// A partial unique index allows at most one `is_default` row per user.
    rules (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        starting_points -> Int4,
        return_points -> Int4,
        uma_1 -> Int4,
        uma_2 -> Int4,
        uma_3 -> Int4,
        uma_4 -> Int4,
        oka -> Int4,
        is_default -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Venues owned by a user.
    locations (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        address -> Nullable<Text>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded games. `location_id` is nulled when its location is deleted.
    games (id) {
        id -> Uuid,
        rule_id -> Uuid,
        location_id -> Nullable<Uuid>,
        creator_id -> Uuid,
        played_at -> Timestamptz,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per seat. Unique on `(game_id, user_id)` and `(game_id, rank)`.
    game_players (id) {
        id -> Uuid,
        game_id -> Uuid,
        user_id -> Uuid,
        rank -> Int4,
        score -> Int4,
        calculated_score -> Numeric,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(rules -> users (user_id));
diesel::joinable!(locations -> users (user_id));
diesel::joinable!(games -> rules (rule_id));
diesel::joinable!(games -> locations (location_id));
diesel::joinable!(games -> users (creator_id));
diesel::joinable!(game_players -> games (game_id));
diesel::joinable!(game_players -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, rules, locations, games, game_players);
