//! Data Source Module
//! Where product rows come from: the MySQL/MariaDB product table, or a CSV export of it.

use crate::config::DatabaseConfig;
use crate::data::record::{RawProductRow, DISCOUNT_COL, NAME_COL, PRICE_COL, RATINGS_COL};
use polars::prelude::*;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::types::Decimal;
use sqlx::{Column as _, Connection, Row, TypeInfo as _};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Error connecting to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("Failed to start database runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),
    #[error("Column {column} has unsupported type {type_name}")]
    UnsupportedType { column: String, type_name: String },
    #[error("Failed to decode column {column}: {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Anything that can hand over the full product table.
pub trait ProductSource: Send + Sync {
    /// Return every product row.
    fn fetch_all(&self) -> Result<Vec<RawProductRow>, SourceError>;

    /// Short human-readable description, safe to show and log.
    fn describe(&self) -> String;
}

/// Reads the product table over a single MySQL connection per load.
pub struct MySqlSource {
    config: DatabaseConfig,
}

impl MySqlSource {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    fn query(&self) -> Result<String, SourceError> {
        validate_table_name(&self.config.table)?;
        Ok(format!("SELECT * FROM `{}`", self.config.table))
    }

    async fn fetch_async(&self, query: &str) -> Result<Vec<RawProductRow>, SourceError> {
        let mut conn = MySqlConnection::connect_with(&connect_options(&self.config))
            .await
            .map_err(SourceError::Connect)?;

        let result = sqlx::query(query).fetch_all(&mut conn).await;

        // Release the connection before looking at the result
        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "Failed to close database connection cleanly");
        }

        let rows = result.map_err(SourceError::Query)?;
        rows.iter().map(row_to_raw).collect()
    }
}

impl ProductSource for MySqlSource {
    fn fetch_all(&self) -> Result<Vec<RawProductRow>, SourceError> {
        let query = self.query()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceError::Runtime)?;

        runtime.block_on(self.fetch_async(&query))
    }

    fn describe(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{} (table {})",
            self.config.user,
            self.config.host,
            self.config.port,
            self.config.database,
            self.config.table
        )
    }
}

fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
}

/// Only plain identifiers are interpolated into the query.
fn validate_table_name(table: &str) -> Result<(), SourceError> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SourceError::InvalidTable(table.to_string()))
    }
}

fn row_to_raw(row: &MySqlRow) -> Result<RawProductRow, SourceError> {
    Ok(RawProductRow {
        name: cell_text(row, NAME_COL)?,
        ratings: cell_text(row, RATINGS_COL)?,
        discount: cell_text(row, DISCOUNT_COL)?,
        current_price: cell_text(row, PRICE_COL)?,
    })
}

/// How a MySQL column is turned into text, keyed on its reported type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    /// Character and binary strings, decoded as bytes so `*_bin` and VARBINARY columns work too
    Text,
    Decimal,
    Float,
    Signed,
    Unsigned,
    Null,
    Unsupported,
}

fn cell_kind(type_name: &str) -> CellKind {
    let upper = type_name.trim().to_ascii_uppercase();
    let (base, unsigned) = match upper.strip_suffix(" UNSIGNED") {
        Some(base) => (base, true),
        None => (upper.as_str(), false),
    };

    match base {
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET"
        | "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            CellKind::Text
        }
        "DECIMAL" | "NUMERIC" => CellKind::Decimal,
        "FLOAT" | "DOUBLE" | "REAL" => CellKind::Float,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" | "BOOLEAN" => {
            if unsigned {
                CellKind::Unsigned
            } else {
                CellKind::Signed
            }
        }
        "NULL" => CellKind::Null,
        _ => CellKind::Unsupported,
    }
}

/// Read a cell as text whatever its SQL type.
fn cell_text(row: &MySqlRow, column: &str) -> Result<Option<String>, SourceError> {
    let type_name = match row.try_column(column) {
        Ok(col) => col.type_info().name().to_string(),
        Err(sqlx::Error::ColumnNotFound(_)) => {
            return Err(SourceError::MissingColumn(column.to_string()))
        }
        Err(source) => {
            return Err(SourceError::Decode {
                column: column.to_string(),
                source,
            })
        }
    };

    let kind = cell_kind(&type_name);
    if kind == CellKind::Unsupported {
        return Err(SourceError::UnsupportedType {
            column: column.to_string(),
            type_name,
        });
    }

    decode_cell(row, column, kind).map_err(|source| SourceError::Decode {
        column: column.to_string(),
        source,
    })
}

fn decode_cell(
    row: &MySqlRow,
    column: &str,
    kind: CellKind,
) -> Result<Option<String>, sqlx::Error> {
    let text = match kind {
        CellKind::Text => row
            .try_get::<Option<Vec<u8>>, _>(column)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        CellKind::Decimal => row
            .try_get::<Option<Decimal>, _>(column)?
            .map(|v| v.to_string()),
        CellKind::Float => match row.try_get::<Option<f64>, _>(column) {
            Ok(value) => value.map(|v| v.to_string()),
            Err(_) => row
                .try_get::<Option<f32>, _>(column)?
                .map(|v| v.to_string()),
        },
        CellKind::Signed => row
            .try_get::<Option<i64>, _>(column)?
            .map(|v| v.to_string()),
        CellKind::Unsigned => row
            .try_get::<Option<u64>, _>(column)?
            .map(|v| v.to_string()),
        CellKind::Null | CellKind::Unsupported => None,
    };
    Ok(text)
}

/// Reads the product columns from a CSV export of the table.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProductSource for CsvSource {
    fn fetch_all(&self) -> Result<Vec<RawProductRow>, SourceError> {
        // Schema inference off: every column stays text until cleaning
        let df = LazyCsvReader::new(&self.path)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        let names = string_column(&df, NAME_COL)?;
        let ratings = string_column(&df, RATINGS_COL)?;
        let discounts = string_column(&df, DISCOUNT_COL)?;
        let prices = string_column(&df, PRICE_COL)?;

        let rows = names
            .into_iter()
            .zip(ratings)
            .zip(discounts)
            .zip(prices)
            .map(|(((name, ratings), discount), current_price)| RawProductRow {
                name,
                ratings,
                discount,
                current_price,
            })
            .collect();

        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, SourceError> {
    let column = df
        .column(name)
        .map_err(|_| SourceError::MissingColumn(name.to_string()))?;
    let column = column.cast(&DataType::String)?;
    let values = column.str()?;
    Ok(values.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Sources used by tests in place of a live database.
#[cfg(test)]
pub mod testing {
    use super::*;

    pub struct InMemorySource {
        pub rows: Vec<RawProductRow>,
    }

    impl ProductSource for InMemorySource {
        fn fetch_all(&self) -> Result<Vec<RawProductRow>, SourceError> {
            Ok(self.rows.clone())
        }

        fn describe(&self) -> String {
            "in-memory".to_string()
        }
    }

    /// Behaves like an unreachable database.
    pub struct FailingSource;

    impl ProductSource for FailingSource {
        fn fetch_all(&self) -> Result<Vec<RawProductRow>, SourceError> {
            Err(SourceError::Connect(sqlx::Error::PoolTimedOut))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn table_name_must_be_a_plain_identifier() {
        assert!(validate_table_name("jumia_product").is_ok());
        assert!(validate_table_name("Products2").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("products; DROP TABLE x").is_err());
        assert!(validate_table_name("a`b").is_err());
    }

    #[test]
    fn invalid_table_fails_before_connecting() {
        let source = MySqlSource::new(DatabaseConfig {
            table: "bad name".to_string(),
            ..DatabaseConfig::default()
        });
        assert!(matches!(
            source.fetch_all(),
            Err(SourceError::InvalidTable(_))
        ));
    }

    #[test]
    fn describe_never_shows_password() {
        let source = MySqlSource::new(DatabaseConfig {
            password: "hunter2".to_string(),
            ..DatabaseConfig::default()
        });
        let text = source.describe();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("jumia_product"));
    }

    #[test]
    fn numeric_sql_types_map_to_numeric_decoders() {
        assert_eq!(cell_kind("DECIMAL"), CellKind::Decimal);
        assert_eq!(cell_kind("DECIMAL UNSIGNED"), CellKind::Decimal);
        assert_eq!(cell_kind("DOUBLE"), CellKind::Float);
        assert_eq!(cell_kind("FLOAT"), CellKind::Float);
        assert_eq!(cell_kind("INT"), CellKind::Signed);
        assert_eq!(cell_kind("BIGINT"), CellKind::Signed);
        assert_eq!(cell_kind("BOOLEAN"), CellKind::Signed);
        assert_eq!(cell_kind("INT UNSIGNED"), CellKind::Unsigned);
        assert_eq!(cell_kind("TINYINT UNSIGNED"), CellKind::Unsigned);
    }

    #[test]
    fn character_and_binary_strings_decode_as_text() {
        for name in [
            "VARCHAR", "CHAR", "TEXT", "LONGTEXT", "ENUM", "VARBINARY", "BINARY", "BLOB",
        ] {
            assert_eq!(cell_kind(name), CellKind::Text, "{name}");
        }
        assert_eq!(cell_kind("varchar"), CellKind::Text);
    }

    #[test]
    fn unknown_sql_types_are_rejected() {
        assert_eq!(cell_kind("NULL"), CellKind::Null);
        assert_eq!(cell_kind("DATETIME"), CellKind::Unsupported);
        assert_eq!(cell_kind("JSON"), CellKind::Unsupported);
        assert_eq!(cell_kind("GEOMETRY"), CellKind::Unsupported);
    }

    /// Needs a reachable MySQL/MariaDB; point `DASHBOARD_TEST_CONFIG` at a config
    /// file whose user may create and drop tables, then run with `--ignored`.
    #[test]
    #[ignore]
    fn live_table_cells_of_every_column_type_load() {
        use crate::data::record::ProductRecord;

        let path = std::env::var("DASHBOARD_TEST_CONFIG").expect("DASHBOARD_TEST_CONFIG not set");
        let mut config = crate::config::AppConfig::load(std::path::Path::new(&path))
            .unwrap()
            .database;
        config.table = "dashboard_cell_types".to_string();

        let layouts = [
            "`Name` VARCHAR(64), `Ratings` DECIMAL(2,1), `Discount` INT, `Current Price` DECIMAL(10,2)",
            "`Name` VARBINARY(64), `Ratings` DOUBLE, `Discount` INT UNSIGNED, `Current Price` DOUBLE",
            "`Name` VARCHAR(64) COLLATE utf8mb4_bin, `Ratings` VARCHAR(16), `Discount` VARCHAR(16), `Current Price` BIGINT",
        ];

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        for layout in layouts {
            runtime.block_on(async {
                let mut conn = MySqlConnection::connect_with(&connect_options(&config))
                    .await
                    .unwrap();
                for statement in [
                    "DROP TABLE IF EXISTS dashboard_cell_types".to_string(),
                    format!("CREATE TABLE dashboard_cell_types ({layout})"),
                    "INSERT INTO dashboard_cell_types VALUES ('Blender', 4.5, 15, 1200), ('Iron', NULL, NULL, NULL)"
                        .to_string(),
                ] {
                    sqlx::query(&statement).execute(&mut conn).await.unwrap();
                }
                conn.close().await.unwrap();
            });

            let rows = MySqlSource::new(config.clone()).fetch_all().unwrap();
            let records: Vec<ProductRecord> = rows.iter().map(ProductRecord::from_raw).collect();

            assert_eq!(records.len(), 2, "{layout}");
            assert_eq!(records[0].name, "Blender", "{layout}");
            assert_eq!(records[0].ratings, 4.5, "{layout}");
            assert_eq!(records[0].discount, 15.0, "{layout}");
            assert_eq!(records[0].current_price, Some(1200.0), "{layout}");
            assert_eq!(records[1].ratings, 0.0, "{layout}");
            assert_eq!(records[1].current_price, None, "{layout}");
        }

        runtime.block_on(async {
            let mut conn = MySqlConnection::connect_with(&connect_options(&config))
                .await
                .unwrap();
            sqlx::query("DROP TABLE dashboard_cell_types")
                .execute(&mut conn)
                .await
                .unwrap();
            conn.close().await.unwrap();
        });
    }

    #[test]
    fn csv_source_reads_product_columns_as_text() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Ratings,Discount,Current Price,Old Price").unwrap();
        writeln!(file, "Blender,No ratings,15,1200,1500").unwrap();
        writeln!(file, "Iron,3.5,No discount,800,800").unwrap();
        file.flush().unwrap();

        let rows = CsvSource::new(file.path()).fetch_all().unwrap();

        assert_eq!(
            rows,
            vec![
                RawProductRow::new("Blender", "No ratings", "15", "1200"),
                RawProductRow::new("Iron", "3.5", "No discount", "800"),
            ]
        );
    }

    #[test]
    fn csv_source_reports_missing_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Ratings,Current Price").unwrap();
        writeln!(file, "Blender,4,1200").unwrap();
        file.flush().unwrap();

        let err = CsvSource::new(file.path()).fetch_all().unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn(col) if col == DISCOUNT_COL));
    }
}
