//! Audit log migrations, embedded at compile time
//!
//! Each entry is `(file name, sql)`, applied in order. New migrations get the
//! next `NNN_` prefix and an entry at the end of the list.

pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
