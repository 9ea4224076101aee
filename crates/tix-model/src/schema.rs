//! Fixed relational schema of the analytics table.

/// Default target table name.
pub const DEFAULT_TABLE_NAME: &str = "tickets_analysis";

/// Storage class of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Bounded character column, limit counted in characters.
    Varchar(usize),
    /// Unbounded text.
    Text,
    BigInt,
    /// Timestamp without time zone, UTC by convention.
    Timestamp,
    Numeric,
}

impl ColumnKind {
    /// PostgreSQL type used in the table definition.
    pub fn sql_type(self) -> String {
        match self {
            Self::Varchar(len) => format!("VARCHAR({len})"),
            Self::Text => "TEXT".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
            Self::Numeric => "NUMERIC".to_string(),
        }
    }

    /// Character limit for string columns.
    pub fn max_chars(self) -> Option<usize> {
        match self {
            Self::Varchar(len) => Some(len),
            _ => None,
        }
    }

    pub fn is_string(self) -> bool {
        matches!(self, Self::Varchar(_) | Self::Text)
    }
}

/// One column of the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub primary_key: bool,
    /// Whether negative values are rejected (numeric columns only).
    pub non_negative: bool,
}

impl ColumnDef {
    const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            primary_key: false,
            non_negative: false,
        }
    }

    const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    const fn non_negative(mut self) -> Self {
        self.non_negative = true;
        self
    }
}

pub const MONGO_TICKET_ID: ColumnDef =
    ColumnDef::new("mongo_ticket_id", ColumnKind::Varchar(50)).primary_key();
pub const TICKET_ID: ColumnDef = ColumnDef::new("ticket_id", ColumnKind::BigInt);
pub const SUBJECT: ColumnDef = ColumnDef::new("subject", ColumnKind::Text);
pub const TICKET_TYPE: ColumnDef = ColumnDef::new("ticket_type", ColumnKind::Varchar(100));
pub const CURRENT_STATUS: ColumnDef = ColumnDef::new("current_status", ColumnKind::Varchar(50));
pub const TICKET_CREATED_AT: ColumnDef =
    ColumnDef::new("ticket_created_at", ColumnKind::Timestamp);
pub const TICKET_CLOSED_AT: ColumnDef = ColumnDef::new("ticket_closed_at", ColumnKind::Timestamp);
pub const CURRENT_STAFF_ID: ColumnDef = ColumnDef::new("current_staff_id", ColumnKind::BigInt);
pub const STAFF_NAME: ColumnDef = ColumnDef::new("staff_name", ColumnKind::Varchar(100));
pub const STAFF_DEPARTMENT: ColumnDef =
    ColumnDef::new("staff_department", ColumnKind::Varchar(100));
pub const HANDLE_DURATION_MINS: ColumnDef =
    ColumnDef::new("handle_duration_mins", ColumnKind::Numeric).non_negative();

/// Columns of the analytics table in load order.
pub const TICKETS_ANALYSIS_COLUMNS: [ColumnDef; 11] = [
    MONGO_TICKET_ID,
    TICKET_ID,
    SUBJECT,
    TICKET_TYPE,
    CURRENT_STATUS,
    TICKET_CREATED_AT,
    TICKET_CLOSED_AT,
    CURRENT_STAFF_ID,
    STAFF_NAME,
    STAFF_DEPARTMENT,
    HANDLE_DURATION_MINS,
];

/// Column names in load order.
pub fn column_names() -> Vec<&'static str> {
    TICKETS_ANALYSIS_COLUMNS.iter().map(|col| col.name).collect()
}
