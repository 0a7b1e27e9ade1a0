// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database schema definitions for the linkage relations.
//!
//! Tables are created without `if not exists`: a run always starts from an
//! empty database, so finding them already present is an error.

/// `artifacts` enumerates every store entry and the package set it belongs to.
pub const ARTIFACTS_SQL: &str = r#"
create table artifacts (
    path            text not null,
    classification  text not null,
    primary key (path)
) strict;
"#;

/// `provides` maps artifacts to the relative library paths and names they ship.
pub const PROVIDES_SQL: &str = r#"
create table provides (
    artifact        text not null,
    library_path    text not null,
    library_name    text not null,
    primary key (artifact, library_path, library_name),
    foreign key (artifact) references artifacts(path)
) strict;
"#;

/// `needs` maps artifacts to the relative library paths and the names they load.
pub const NEEDS_SQL: &str = r#"
create table needs (
    artifact        text not null,
    library_path    text not null,
    library_name    text not null,
    primary key (artifact, library_path, library_name),
    foreign key (artifact) references artifacts(path)
) strict;
"#;

/// Names of the tables, in creation order.
pub const TABLES: [&str; 3] = ["artifacts", "provides", "needs"];
