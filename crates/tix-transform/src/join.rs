//! Left join of tickets against the staff index.

use chrono::NaiveDateTime;
use tix_model::{
    OutputRow, RawTicket, ResolvedTicketState, StaffIndex, StatusSource, TransformOptions,
};

use crate::history::resolve_history;
use crate::scalar::{Scalar, normalize_field};

/// A joined ticket before sanitization, one loosely typed value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub mongo_ticket_id: Scalar,
    pub ticket_id: Scalar,
    pub subject: Scalar,
    pub ticket_type: Scalar,
    pub current_status: Scalar,
    pub ticket_created_at: Scalar,
    pub ticket_closed_at: Scalar,
    pub current_staff_id: Scalar,
    pub staff_name: Scalar,
    pub staff_department: Scalar,
    pub handle_duration_mins: Scalar,
}

impl From<&OutputRow> for JoinedRecord {
    fn from(row: &OutputRow) -> Self {
        Self {
            mongo_ticket_id: Scalar::Text(row.mongo_ticket_id.clone()),
            ticket_id: row.ticket_id.into(),
            subject: row.subject.clone().into(),
            ticket_type: row.ticket_type.clone().into(),
            current_status: row.current_status.clone().into(),
            ticket_created_at: row.ticket_created_at.into(),
            ticket_closed_at: row.ticket_closed_at.into(),
            current_staff_id: row.current_staff_id.into(),
            staff_name: row.staff_name.clone().into(),
            staff_department: row.staff_department.clone().into(),
            handle_duration_mins: row.handle_duration_mins.into(),
        }
    }
}

/// Outcome of joining one ticket.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub record: JoinedRecord,
    pub state: ResolvedTicketState,
    /// True when the ticket has an owner but no staff record matches it.
    pub unmatched_owner: bool,
}

/// Resolves one ticket and attaches its owner's staff attributes.
///
/// Tickets are never dropped: a missing owner or an owner without a staff
/// record just leaves the staff columns null.
pub fn join_ticket(
    ticket: &RawTicket,
    index: &StaffIndex,
    options: &TransformOptions,
) -> JoinOutcome {
    let state = resolve_history(ticket.activity_history.as_deref());
    let staff = state.owner_id.and_then(|owner_id| index.get(owner_id));
    let unmatched_owner = state.owner_id.is_some() && staff.is_none();

    let record = JoinedRecord {
        mongo_ticket_id: normalize_field(ticket.id.as_ref()),
        ticket_id: normalize_field(ticket.ticket_id.as_ref()),
        subject: normalize_field(ticket.subject.as_ref()),
        ticket_type: normalize_field(ticket.ticket_type.as_ref()),
        current_status: current_status(ticket, &state, options.status_source),
        ticket_created_at: state.created_at.into(),
        ticket_closed_at: state.closed_at.into(),
        current_staff_id: state.owner_id.into(),
        staff_name: staff.and_then(|entry| entry.name.clone()).into(),
        staff_department: staff.and_then(|entry| entry.department.clone()).into(),
        handle_duration_mins: handle_duration_mins(state.created_at, state.closed_at).into(),
    };

    JoinOutcome {
        record,
        state,
        unmatched_owner,
    }
}

fn current_status(
    ticket: &RawTicket,
    state: &ResolvedTicketState,
    source: StatusSource,
) -> Scalar {
    let from_history = || Scalar::from(state.status.clone());
    let from_ticket = || normalize_field(ticket.status.as_ref());
    match source {
        StatusSource::History => from_history(),
        StatusSource::Ticket => from_ticket(),
        StatusSource::PreferTicket => match from_ticket() {
            value if value.is_null() => from_history(),
            value => value,
        },
    }
}

/// Minutes between creation and closure, `None` when either end is missing
/// or the interval is negative.
pub fn handle_duration_mins(
    created_at: Option<NaiveDateTime>,
    closed_at: Option<NaiveDateTime>,
) -> Option<f64> {
    let elapsed = closed_at? - created_at?;
    let micros = elapsed.num_microseconds()?;
    (micros >= 0).then(|| micros as f64 / 60_000_000.0)
}
