use std::fmt;

use chrono::NaiveDateTime;

/// An operation whose parameters have been entered but which has not been committed yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Register {
        id: String,
        name: String,
        email: String,
        address: String,
        phone: String,
    },
    RecordMeasurement {
        id: String,
        weight: f64,
        height: f64,
    },
    CheckIn {
        id: String,
        check_in: NaiveDateTime,
        check_out: Option<NaiveDateTime>,
    },
    CheckOut {
        id: String,
        check_out: NaiveDateTime,
    },
    RemoveAttendance {
        id: String,
    },
    Freeze {
        id: String,
    },
    Unfreeze {
        id: String,
    },
    Remove {
        id: String,
    },
    Report {
        id: String,
        month: u32,
        year: i32,
    },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Register { id, name, .. } => write!(f, "register member {id} ({name})"),
            Action::RecordMeasurement { id, weight, height } => {
                write!(f, "record {weight} kg and {height} m for member {id}")
            }
            Action::CheckIn {
                id,
                check_in,
                check_out,
            } => match check_out {
                Some(check_out) => write!(
                    f,
                    "record attendance of member {id} from {} to {}",
                    check_in.format("%Y-%m-%d %H:%M"),
                    check_out.format("%H:%M")
                ),
                None => write!(
                    f,
                    "check in member {id} at {}",
                    check_in.format("%Y-%m-%d %H:%M")
                ),
            },
            Action::CheckOut { id, check_out } => write!(
                f,
                "check out member {id} at {}",
                check_out.format("%Y-%m-%d %H:%M")
            ),
            Action::RemoveAttendance { id } => {
                write!(f, "remove last attendance of member {id}")
            }
            Action::Freeze { id } => write!(f, "freeze membership of member {id}"),
            Action::Unfreeze { id } => write!(f, "unfreeze membership of member {id}"),
            Action::Remove { id } => write!(f, "remove member {id}"),
            Action::Report { id, month, year } => {
                write!(f, "generate report of member {id} for {month}/{year}")
            }
        }
    }
}

/// First step of a two-step operation: the parameters are captured, nothing is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    action: Action,
}

impl Request {
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self { action }
    }

    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    #[must_use]
    pub fn summary(&self) -> String {
        let text = self.action.to_string();
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => text,
        }
    }

    #[must_use]
    pub fn confirm(self) -> ConfirmedRequest {
        ConfirmedRequest {
            action: self.action,
        }
    }
}

/// Second step of a two-step operation: the request has been confirmed and may be executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedRequest {
    action: Action,
}

impl ConfirmedRequest {
    #[must_use]
    pub fn into_action(self) -> Action {
        self.action
    }
}
