// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Runs the checks CI runs, locally, with `cargo xtask <command>`.
//!
//! Each command expands to a list of [`Step`]s that run in order and stop at
//! the first failure. The store is `SQLite` only, so nothing here needs an
//! external service. `verify-migrations` applies the embedded migrations to
//! an in-memory database and compares the result with the Diesel table
//! definitions in `crates/persistence/src/diesel_schema.rs`.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::Expression;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    let steps: Vec<Step> = args.command.steps();
    for step in steps {
        if let Err(err) = step.run() {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Command {
    /// Everything CI runs: lint, dependency checks, build, tests, migrations
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Type-check every target
    #[command(visible_alias = "c")]
    Check,

    /// Check licenses and advisories with cargo-deny
    #[command(visible_alias = "cd")]
    Deny,

    /// Find unused dependencies with cargo-machete
    #[command(visible_alias = "m")]
    Machete,

    /// Clippy, docs, formatting and typos
    #[command(visible_alias = "l")]
    Lint,

    /// Clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build docs with docs.rs flags
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check formatting
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check spelling
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Apply clippy suggestions
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Format the workspace
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix spelling
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Unit, integration and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Check the migrations against the Diesel schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

const CLIPPY: &[&str] = &["clippy", "--all-targets", "--all-features", "--", "-D", "warnings"];
const CLIPPY_FIX: &[&str] = &[
    "clippy",
    "--all-targets",
    "--all-features",
    "--fix",
    "--allow-dirty",
    "--allow-staged",
    "--",
    "-D",
    "warnings",
];

impl Command {
    /// Expands the command into the steps it runs.
    fn steps(self) -> Vec<Step> {
        match self {
            Self::CI => [Self::Lint, Self::Deny, Self::Machete, Self::Build, Self::Test]
                .into_iter()
                .flat_map(Self::steps)
                .chain([Step::Migrations])
                .collect(),
            Self::Build => vec![Step::Cargo(&["build", "--all-targets", "--all-features"])],
            Self::Check => vec![Step::Cargo(&["check", "--all-targets", "--all-features"])],
            Self::Deny => vec![Step::Cargo(&["deny", "check"])],
            Self::Machete => vec![Step::Tool("cargo-machete", &[])],
            Self::Lint => vec![
                Step::Cargo(CLIPPY),
                Step::Docs,
                Step::Nightly(&["fmt", "--all", "--check"]),
                Step::Tool("typos", &[]),
            ],
            Self::LintClippy => vec![Step::Cargo(CLIPPY)],
            Self::LintDocs => vec![Step::Docs],
            Self::LintFormatting => vec![Step::Nightly(&["fmt", "--all", "--check"])],
            Self::LintTypos => vec![Step::Tool("typos", &[])],
            Self::FixClippy => vec![Step::Cargo(CLIPPY_FIX)],
            Self::FixFormatting => vec![Step::Nightly(&["fmt", "--all"])],
            Self::FixTypos => vec![Step::Tool("typos", &["-w"])],
            // Doc tests last; they are the slowest.
            Self::Test => vec![
                Step::Cargo(&["test", "--all-targets", "--all-features"]),
                Step::Cargo(&["test", "--doc", "--all-features"]),
            ],
            Self::VerifyMigrations => vec![Step::Migrations],
        }
    }
}

/// One unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// `cargo` with the active toolchain.
    Cargo(&'static [&'static str]),
    /// `cargo` with the nightly toolchain.
    Nightly(&'static [&'static str]),
    /// Any other binary on `PATH`.
    Tool(&'static str, &'static [&'static str]),
    /// `cargo doc` per default member with `--cfg docsrs -D warnings`.
    Docs,
    /// [`verify_migrations`].
    Migrations,
}

impl Step {
    fn run(self) -> Result<()> {
        match self {
            Self::Cargo(args) => traced(&duct::cmd("cargo", args.iter().copied())),
            Self::Nightly(args) => traced(&nightly(duct::cmd("cargo", args.iter().copied()))),
            Self::Tool(program, args) => traced(&duct::cmd(program, args.iter().copied())),
            Self::Docs => lint_docs(),
            Self::Migrations => verify_migrations(),
        }
    }
}

/// Runs `expr`, logging it before and again on failure so it is not lost in
/// the output of the tool.
fn traced(expr: &Expression) -> Result<()> {
    tracing::info!("running command: {expr:?}");
    expr.run()
        .map(drop)
        .wrap_err_with(|| format!("failed to run command: {expr:?}"))
}

/// Switches a cargo invocation to nightly. `CARGO` is unset because we are
/// already inside a cargo subcommand.
fn nightly(expr: Expression) -> Expression {
    expr.env_remove("CARGO").env("RUSTUP_TOOLCHAIN", "nightly")
}

fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        let expr = duct::cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        );
        traced(&nightly(expr).env("RUSTDOCFLAGS", "--cfg docsrs -D warnings"))?;
    }

    Ok(())
}

/// Verify that the `SQLite` migrations produce the Diesel schema
///
/// Applies every embedded migration to an in-memory database, introspects
/// the result and compares it with the `diesel::table!` definitions. The
/// migrations are then reverted and reapplied so a broken `down.sql` fails
/// the check too.
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting schema verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply migrations: {e}"))?;
    tracing::info!("Migrations applied successfully");

    let migrated: Schema = introspect_sqlite_schema(&mut conn)?;
    let declared: Schema = parse_diesel_schema(
        &std::fs::read_to_string(DIESEL_SCHEMA_PATH)
            .wrap_err(format!("Failed to read {DIESEL_SCHEMA_PATH}"))?,
    )?;
    compare_schemas(&migrated, &declared)?;
    tracing::info!("Migrated schema matches the Diesel schema");

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert migrations: {e}"))?;
    let reverted: Schema = introspect_sqlite_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "❌ Schema check FAILED: tables left after reverting migrations: {:?}",
            reverted.tables.keys().collect::<Vec<_>>()
        ));
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to reapply migrations: {e}"))?;
    if introspect_sqlite_schema(&mut conn)? != migrated {
        return Err(color_eyre::eyre::eyre!(
            "❌ Schema check FAILED: reapplying migrations produced a different schema"
        ));
    }

    tracing::info!("✓ Schema verification passed");
    Ok(())
}

/// Location of the Diesel table definitions, relative to the workspace root.
const DIESEL_SCHEMA_PATH: &str = "crates/persistence/src/diesel_schema.rs";

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Introspect `SQLite` schema
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table::default();

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    // INTEGER PRIMARY KEY is a rowid alias and never NULL
                    nullable: col.notnull == 0 && col.pk == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            if idx.name.starts_with("sqlite_autoindex_") {
                continue;
            }
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            table_info.indexes.insert(Index {
                name: idx.name,
                columns: index_columns.into_iter().map(|c| c.name).collect(),
            });
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Parse the `diesel::table!` blocks of a generated schema file
///
/// Only the parts Diesel knows about are filled in: table names, primary
/// keys, and column types and nullability. Indexes are left empty.
fn parse_diesel_schema(source: &str) -> Result<Schema> {
    let mut schema = Schema {
        tables: BTreeMap::new(),
    };
    let mut current: Option<(String, Table)> = None;

    for line in source.lines().map(str::trim) {
        if line == "}" {
            if let Some((name, table)) = current.take() {
                schema.tables.insert(name, table);
            }
            continue;
        }

        if let Some((name, table)) = current.as_mut() {
            let Some((column, sql_type)) = line.trim_end_matches(',').split_once("->") else {
                return Err(color_eyre::eyre::eyre!(
                    "Unrecognized line in table '{name}': {line}"
                ));
            };
            let column: String = column.trim().to_string();
            let sql_type: &str = sql_type.trim();
            let nullable: bool = sql_type.starts_with("Nullable<");
            let inner: &str = sql_type
                .trim_start_matches("Nullable<")
                .trim_end_matches('>');
            table.columns.insert(
                column,
                Column {
                    normalized_type: normalize_diesel_type(inner),
                    nullable,
                },
            );
            continue;
        }

        // Table header: `name (pk, ...) {`
        if let Some(header) = line.strip_suffix('{') {
            let Some((name, keys)) = header.trim().split_once('(') else {
                continue;
            };
            let table = Table {
                primary_keys: keys
                    .trim_end_matches(|c: char| c == ')' || c.is_whitespace())
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect(),
                ..Table::default()
            };
            current = Some((name.trim().to_string(), table));
        }
    }

    if schema.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "No diesel::table! definitions found"
        ));
    }

    Ok(schema)
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

/// Normalize a Diesel SQL type name to common representation
fn normalize_diesel_type(diesel_type: &str) -> String {
    match diesel_type {
        "SmallInt" | "Integer" | "BigInt" | "Bool" => "integer".to_string(),
        "Float" | "Double" => "real".to_string(),
        "Binary" => "blob".to_string(),
        _ => "text".to_string(),
    }
}

/// Compare the migrated schema with the declared one and fail on mismatch
fn compare_schemas(migrated: &Schema, declared: &Schema) -> Result<()> {
    let migrated_tables: BTreeSet<_> = migrated.tables.keys().collect();
    let declared_tables: BTreeSet<_> = declared.tables.keys().collect();

    if migrated_tables != declared_tables {
        let mut errors = Vec::new();

        for table in migrated_tables.difference(&declared_tables) {
            errors.push(format!(
                "  - Table '{table}' is created by migrations but missing from the Diesel schema"
            ));
        }

        for table in declared_tables.difference(&migrated_tables) {
            errors.push(format!(
                "  - Table '{table}' is in the Diesel schema but not created by migrations"
            ));
        }

        return Err(color_eyre::eyre::eyre!(
            "❌ Schema check FAILED: Table mismatch\n{}",
            errors.join("\n")
        ));
    }

    for table_name in migrated_tables {
        let migrated_table = &migrated.tables[table_name];
        let declared_table = &declared.tables[table_name];

        let migrated_columns: BTreeSet<_> = migrated_table.columns.keys().collect();
        let declared_columns: BTreeSet<_> = declared_table.columns.keys().collect();

        if migrated_columns != declared_columns {
            return Err(color_eyre::eyre::eyre!(
                "❌ Schema check FAILED: Column mismatch in table '{}'\n  Migrations: {:?}\n  Diesel: {:?}",
                table_name,
                migrated_columns,
                declared_columns
            ));
        }

        for col_name in migrated_columns {
            let migrated_col = &migrated_table.columns[col_name];
            let declared_col = &declared_table.columns[col_name];

            if migrated_col.normalized_type != declared_col.normalized_type {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Schema check FAILED: Type mismatch in table '{}', column '{}'\n  Migrations: {}\n  Diesel: {}",
                    table_name,
                    col_name,
                    migrated_col.normalized_type,
                    declared_col.normalized_type
                ));
            }

            if migrated_col.nullable != declared_col.nullable {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Schema check FAILED: Nullability mismatch in table '{}', column '{}'\n  Migrations nullable: {}\n  Diesel nullable: {}",
                    table_name,
                    col_name,
                    migrated_col.nullable,
                    declared_col.nullable
                ));
            }
        }

        if migrated_table.primary_keys != declared_table.primary_keys {
            return Err(color_eyre::eyre::eyre!(
                "❌ Schema check FAILED: Primary key mismatch in table '{}'\n  Migrations: {:?}\n  Diesel: {:?}",
                table_name,
                migrated_table.primary_keys,
                declared_table.primary_keys
            ));
        }

        for index in &migrated_table.indexes {
            tracing::debug!(
                "table '{}' has index '{}' on {:?}",
                table_name,
                index.name,
                index.columns
            );
        }
    }

    Ok(())
}
