//! Batch entry point: staff projection, ticket resolution, join, sanitize.

use std::collections::HashMap;
use std::time::Instant;

use tix_model::schema::MONGO_TICKET_ID;
use tix_model::{OutputRow, RawStaff, RawTicket, TransformOptions};
use tracing::{debug, info, info_span};

use crate::error::{Result, TransformError};
use crate::join::join_ticket;
use crate::sanitize::{sanitize_record, ticket_id_fits};
use crate::staff::project_staff;

/// Name of the ticket collection in error messages.
pub const TICKETS_COLLECTION: &str = "tickets";
/// Name of the staff collection in error messages.
pub const STAFF_COLLECTION: &str = "staffs";

/// Counts describing one transform run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub tickets: usize,
    pub staff_records: usize,
    /// Distinct owner ids in the staff index.
    pub staff_indexed: usize,
    pub staff_duplicates: usize,
    pub staff_unparseable: usize,
    /// Tickets whose history names no owner.
    pub unassigned: usize,
    /// Tickets whose owner has no staff record.
    pub unmatched_owner: usize,
    pub closed: usize,
    pub with_duration: usize,
}

/// Sanitized rows in ticket input order plus run counts.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub rows: Vec<OutputRow>,
    pub summary: TransformSummary,
}

/// Transforms a full batch of tickets and staff into output rows.
///
/// The staff index is built completely before any ticket is resolved. Either
/// collection being empty, or a ticket lacking a unique external id, fails
/// the whole batch. So does an id wider than the key column; ids are never
/// shortened.
pub fn transform_batch(
    tickets: &[RawTicket],
    staff: &[RawStaff],
    options: &TransformOptions,
) -> Result<TransformOutput> {
    let span = info_span!(
        "transform",
        ticket_count = tickets.len(),
        staff_count = staff.len()
    );
    let _guard = span.enter();
    let start = Instant::now();

    if tickets.is_empty() {
        return Err(TransformError::EmptySource {
            collection: TICKETS_COLLECTION,
        });
    }
    if staff.is_empty() {
        return Err(TransformError::EmptySource {
            collection: STAFF_COLLECTION,
        });
    }

    let projection = project_staff(staff);
    let index = projection.index;
    debug!(
        staff_indexed = index.len(),
        duplicates = projection.duplicates,
        unparseable = projection.unparseable,
        "staff index built"
    );

    let mut summary = TransformSummary {
        tickets: tickets.len(),
        staff_records: staff.len(),
        staff_indexed: index.len(),
        staff_duplicates: projection.duplicates,
        staff_unparseable: projection.unparseable,
        ..TransformSummary::default()
    };

    let mut rows = Vec::with_capacity(tickets.len());
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(tickets.len());
    for (position, ticket) in tickets.iter().enumerate() {
        let outcome = join_ticket(ticket, &index, options);
        let row = sanitize_record(&outcome.record)
            .ok_or(TransformError::MissingTicketId { position })?;
        if !ticket_id_fits(&row.mongo_ticket_id) {
            return Err(TransformError::TicketIdTooLong {
                id: row.mongo_ticket_id,
                position,
                max_chars: MONGO_TICKET_ID.kind.max_chars().unwrap_or_default(),
            });
        }
        if let Some(&first) = seen.get(&row.mongo_ticket_id) {
            return Err(TransformError::DuplicateTicketId {
                id: row.mongo_ticket_id,
                first,
                second: position,
            });
        }
        seen.insert(row.mongo_ticket_id.clone(), position);

        if outcome.state.owner_id.is_none() {
            summary.unassigned += 1;
        }
        if outcome.unmatched_owner {
            debug!(
                ticket = %row.mongo_ticket_id,
                owner_id = outcome.state.owner_id,
                "owner has no staff record"
            );
            summary.unmatched_owner += 1;
        }
        if row.ticket_closed_at.is_some() {
            summary.closed += 1;
        }
        if row.handle_duration_mins.is_some() {
            summary.with_duration += 1;
        }
        rows.push(row);
    }

    info!(
        rows = rows.len(),
        unassigned = summary.unassigned,
        unmatched_owner = summary.unmatched_owner,
        duration_ms = start.elapsed().as_millis(),
        "transform complete"
    );
    Ok(TransformOutput { rows, summary })
}
