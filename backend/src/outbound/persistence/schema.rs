//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key.
        id -> Uuid,
        /// Optional display name (max 100 characters).
        name -> Nullable<Varchar>,
        /// Sign-in address; unique.
        email -> Text,
        /// PHC-encoded argon2 hash.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Form definitions.
    forms (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning account; cascades on delete.
        owner_id -> Uuid,
        /// Title.
        title -> Text,
        /// Optional description.
        description -> Nullable<Text>,
        /// Whether anonymous responses are accepted.
        published -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last definition change.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Questions ordered by `position` within a form.
    questions (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning form.
        form_id -> Uuid,
        /// Prompt.
        question_text -> Text,
        /// One of `text`, `multipleChoice`, `checkbox`, `dropdown`.
        question_type -> Text,
        /// Whether an answer is mandatory.
        required -> Bool,
        /// Choices for choice questions.
        options -> Nullable<Array<Text>>,
        /// Zero-based display order.
        position -> Int4,
    }
}

diesel::table! {
    /// Submitted responses.
    responses (id) {
        /// Primary key.
        id -> Uuid,
        /// Form answered.
        form_id -> Uuid,
        /// Submission time.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Answers belonging to a response.
    answers (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning response.
        response_id -> Uuid,
        /// Question answered; not a foreign key.
        question_id -> Uuid,
        /// Answer text.
        value -> Text,
    }
}

diesel::joinable!(forms -> users (owner_id));
diesel::joinable!(questions -> forms (form_id));
diesel::joinable!(responses -> forms (form_id));
diesel::joinable!(answers -> responses (response_id));

diesel::allow_tables_to_appear_in_same_query!(users, forms, questions, responses, answers);
