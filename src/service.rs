//! Date service: month grids and date formatting rendered away from the UI.
//!
//! The calendar never computes its own grid; it sends a [`MonthRequest`]
//! and replaces its grid subtree with whatever comes back, and formats
//! committed dates through [`FormatRequest`]. [`ServiceBridge`] carries the
//! round-trip: spawned on tokio for real hosts, inline for tests. A failed
//! request is logged and produces no reply, leaving the UI as it was.

use std::collections::VecDeque;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::warn;

use crate::controller::ControllerId;

// ---------------------------------------------------------------------------
// Requests and replies
// ---------------------------------------------------------------------------

/// Ask for a rendered month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRequest {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// Week rows to render; the grid always starts on a Sunday.
    pub weeks: u8,
    /// Day the roving focus sits on, if any.
    pub focused: Option<NaiveDate>,
    /// Months to move before rendering: +1 next, -1 previous, ±12 a year.
    pub jump_amount: i32,
    /// Committed selection, marked in the grid.
    pub selected_value: Option<NaiveDate>,
}

impl MonthRequest {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            weeks: 6,
            focused: None,
            jump_amount: 0,
            selected_value: None,
        }
    }
}

/// Ask for a display string for a committed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRequest {
    pub value: NaiveDate,
}

/// One rendered day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Day-of-month label, e.g. "17".
    pub label: String,
    pub in_month: bool,
    pub selected: bool,
    pub focused: bool,
}

/// A rendered month: title plus week rows of seven cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub weeks: Vec<Vec<DayCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatReply {
    pub value: String,
}

/// Requests a controller can issue through the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRequest {
    Month(MonthRequest),
    Format(FormatRequest),
}

/// Replies routed back to the requesting controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    Month(MonthGrid),
    Format(FormatReply),
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("invalid month {month}; expected 1-12")]
    InvalidMonth { month: u32 },

    #[error("date out of the supported range")]
    OutOfRange,
}

// ---------------------------------------------------------------------------
// DateService
// ---------------------------------------------------------------------------

/// The two operations the calendar family needs.
pub trait DateService: Send + 'static {
    fn month(&self, request: &MonthRequest) -> Result<MonthGrid, ServiceError>;
    fn format(&self, request: &FormatRequest) -> Result<FormatReply, ServiceError>;
}

/// Built-in service computing grids locally with chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDateService;

impl LocalDateService {
    pub fn new() -> Self {
        Self
    }
}

impl DateService for LocalDateService {
    fn month(&self, request: &MonthRequest) -> Result<MonthGrid, ServiceError> {
        if !(1..=12).contains(&request.month) {
            return Err(ServiceError::InvalidMonth { month: request.month });
        }

        // Apply the jump in whole months.
        let total = request.year as i64 * 12 + (request.month as i64 - 1) + request.jump_amount as i64;
        let year = total.div_euclid(12) as i32;
        let month = (total.rem_euclid(12) + 1) as u32;

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ServiceError::OutOfRange)?;
        let start = first - ChronoDuration::days(first.weekday().num_days_from_sunday() as i64);

        let mut weeks = Vec::with_capacity(request.weeks as usize);
        let mut day = start;
        for _ in 0..request.weeks {
            let mut row = Vec::with_capacity(7);
            for _ in 0..7 {
                row.push(DayCell {
                    date: day,
                    label: day.day().to_string(),
                    in_month: day.year() == year && day.month() == month,
                    selected: request.selected_value == Some(day),
                    focused: request.focused == Some(day),
                });
                day = day
                    .succ_opt()
                    .ok_or(ServiceError::OutOfRange)?;
            }
            weeks.push(row);
        }

        Ok(MonthGrid {
            year,
            month,
            title: first.format("%B %Y").to_string(),
            weeks,
        })
    }

    fn format(&self, request: &FormatRequest) -> Result<FormatReply, ServiceError> {
        Ok(FormatReply {
            value: request.value.format("%B %-d, %Y").to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// ServiceBridge
// ---------------------------------------------------------------------------

fn serve(service: &dyn DateService, request: ServiceRequest) -> Result<ServiceReply, ServiceError> {
    match request {
        ServiceRequest::Month(req) => service.month(&req).map(ServiceReply::Month),
        ServiceRequest::Format(req) => service.format(&req).map(ServiceReply::Format),
    }
}

enum Inner {
    Spawned {
        tx: mpsc::UnboundedSender<(ControllerId, ServiceRequest)>,
        rx: mpsc::UnboundedReceiver<(ControllerId, ServiceReply)>,
    },
    Inline {
        service: Box<dyn DateService>,
        replies: VecDeque<(ControllerId, ServiceReply)>,
    },
}

/// Fire-and-forget request path with a drainable reply queue.
///
/// No cancellation and no timeout: a request that never answers leaves the
/// UI unchanged.
pub struct ServiceBridge {
    inner: Inner,
}

impl ServiceBridge {
    /// Run the service on a spawned tokio task. Must be called inside a
    /// runtime.
    pub fn spawn(service: impl DateService) -> Self {
        let (req_tx, mut req_rx) = mpsc::unbounded_channel::<(ControllerId, ServiceRequest)>();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some((owner, request)) = req_rx.recv().await {
                match serve(&service, request) {
                    Ok(reply) => {
                        if reply_tx.send((owner, reply)).is_err() {
                            break;
                        }
                    }
                    Err(error) => warn!(%error, "date service request failed"),
                }
            }
        });

        Self {
            inner: Inner::Spawned { tx: req_tx, rx: reply_rx },
        }
    }

    /// Serve requests synchronously on send. The reply still waits in the
    /// queue until drained, preserving the round-trip shape for tests.
    pub fn inline(service: impl DateService) -> Self {
        Self {
            inner: Inner::Inline {
                service: Box::new(service),
                replies: VecDeque::new(),
            },
        }
    }

    /// Send one request on behalf of a controller.
    pub fn send(&mut self, owner: ControllerId, request: ServiceRequest) {
        match &mut self.inner {
            Inner::Spawned { tx, .. } => {
                if tx.send((owner, request)).is_err() {
                    warn!("date service worker is gone; request dropped");
                }
            }
            Inner::Inline { service, replies } => match serve(service.as_ref(), request) {
                Ok(reply) => replies.push_back((owner, reply)),
                Err(error) => warn!(%error, "date service request failed"),
            },
        }
    }

    /// Take every reply that has arrived so far.
    pub fn drain(&mut self) -> Vec<(ControllerId, ServiceReply)> {
        match &mut self.inner {
            Inner::Spawned { rx, .. } => {
                let mut out = Vec::new();
                while let Ok(reply) = rx.try_recv() {
                    out.push(reply);
                }
                out
            }
            Inner::Inline { replies, .. } => replies.drain(..).collect(),
        }
    }
}

impl std::fmt::Debug for ServiceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.inner {
            Inner::Spawned { .. } => "spawned",
            Inner::Inline { .. } => "inline",
        };
        f.debug_struct("ServiceBridge").field("mode", &mode).finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
