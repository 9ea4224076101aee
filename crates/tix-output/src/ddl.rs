//! SQL text for the analytics table.
//!
//! Only identifiers are rendered here. Values always travel as bound
//! parameters.

use tix_model::TICKETS_ANALYSIS_COLUMNS;

use crate::error::{OutputError, Result};

/// PostgreSQL identifier length limit in bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Checks that `name` is a plain identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_table_name(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(OutputError::InvalidTableName {
            name: name.to_string(),
            reason,
        })
    };
    let Some(first) = name.chars().next() else {
        return invalid("name is empty");
    };
    if name.len() > MAX_IDENTIFIER_LEN {
        return invalid("name is longer than 63 bytes");
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return invalid("name must start with a letter or underscore");
    }
    if !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return invalid("name may only contain letters, digits, and underscores");
    }
    Ok(())
}

/// Double-quotes an identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `CREATE TABLE` statement for the analytics table.
pub fn create_table_sql(table: &str) -> Result<String> {
    validate_table_name(table)?;
    let columns = TICKETS_ANALYSIS_COLUMNS
        .iter()
        .map(|column| {
            let mut line = format!("    {} {}", column.name, column.kind.sql_type());
            if column.primary_key {
                line.push_str(" PRIMARY KEY");
            }
            line
        })
        .collect::<Vec<_>>()
        .join(",\n");
    Ok(format!(
        "CREATE TABLE {} (\n{columns}\n)",
        quote_identifier(table)
    ))
}

/// `DROP TABLE IF EXISTS` statement.
pub fn drop_table_sql(table: &str) -> Result<String> {
    validate_table_name(table)?;
    Ok(format!("DROP TABLE IF EXISTS {}", quote_identifier(table)))
}

/// Column-listing head of a multi-row insert; the `VALUES` list is appended
/// by the caller.
pub fn insert_prefix(table: &str) -> Result<String> {
    validate_table_name(table)?;
    let names = TICKETS_ANALYSIS_COLUMNS
        .iter()
        .map(|column| column.name)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("INSERT INTO {} ({names}) ", quote_identifier(table)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_rules() {
        assert!(validate_table_name("tickets_analysis").is_ok());
        assert!(validate_table_name("_t9").is_ok());
        assert!(validate_table_name(&"a".repeat(63)).is_ok());
        for bad in ["", "9lives", "tickets-analysis", "t; DROP", "tíckets", &"a".repeat(64)] {
            assert!(
                matches!(
                    validate_table_name(bad),
                    Err(OutputError::InvalidTableName { .. })
                ),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("t"), "\"t\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_drop_and_insert_sql() {
        assert_eq!(
            drop_table_sql("tickets_analysis").unwrap(),
            "DROP TABLE IF EXISTS \"tickets_analysis\""
        );
        let insert = insert_prefix("t").unwrap();
        assert!(insert.starts_with("INSERT INTO \"t\" (mongo_ticket_id, ticket_id, subject,"));
        assert!(insert.ends_with("handle_duration_mins) "));
        assert!(create_table_sql("bad name").is_err());
    }
}
