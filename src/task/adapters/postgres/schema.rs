//! Diesel schema for renewal task persistence.

diesel::table! {
    /// Renewal workflow tasks.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Insertion order, used for stable scope ordering.
        sequence -> Int8,
        /// Owning company.
        company_id -> Uuid,
        /// Source template identifier, string form.
        #[max_length = 255]
        template_id -> Nullable<Varchar>,
        /// Display title.
        title -> Text,
        /// Task kind (`manual` or `automated`; legacy tags allowed).
        #[max_length = 50]
        kind -> Varchar,
        /// Task status (canonical or legacy spelling).
        #[max_length = 50]
        status -> Varchar,
        /// Dependency references as a JSON array of strings or numbers.
        dependencies -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last status timestamp.
        updated_at -> Timestamptz,
    }
}
