use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use derive_more::{AsRef, Deref, Display};
use serde::Serialize;

use crate::{ErrorKind, GymError, Name, validate_measurements};

#[derive(
    AsRef, Deref, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
pub struct MemberID(String);

impl MemberID {
    pub fn new(id: &str) -> Result<Self, GymError> {
        let trimmed_id = id.trim();

        if trimmed_id.is_empty() {
            return Err(GymError::invalid_data("id", "must not be empty"));
        }

        Ok(Self(trimmed_id.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MembershipState {
    Active,
    Frozen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub timestamp: NaiveDateTime,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attendance {
    pub date: NaiveDate,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub duration_minutes: f64,
}

impl Attendance {
    pub fn new(
        date: NaiveDate,
        check_in: NaiveDateTime,
        check_out: Option<NaiveDateTime>,
    ) -> Result<Self, GymError> {
        let duration_minutes = match check_out {
            Some(check_out) => duration_minutes(check_in, check_out)?,
            None => 0.0,
        };
        Ok(Self {
            date,
            check_in,
            check_out,
            duration_minutes,
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }
}

fn duration_minutes(check_in: NaiveDateTime, check_out: NaiveDateTime) -> Result<f64, GymError> {
    if check_out < check_in {
        return Err(ErrorKind::Attendance(
            "check-out time must not be earlier than check-in time".to_string(),
        )
        .into());
    }
    #[allow(clippy::cast_precision_loss)]
    Ok((check_out - check_in).num_seconds() as f64 / 60.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct Member {
    id: MemberID,
    pub name: Name,
    pub email: String,
    pub address: String,
    pub phone: String,
    state: MembershipState,
    measurements: Vec<Measurement>,
    attendance: Vec<Attendance>,
    total_training_minutes: f64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Member {
    #[must_use]
    pub fn new(id: MemberID, name: Name, email: &str, address: &str, phone: &str) -> Self {
        let now = Local::now().naive_local();
        Self {
            id,
            name,
            email: email.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
            state: MembershipState::Active,
            measurements: vec![],
            attendance: vec![],
            total_training_minutes: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn id(&self) -> &MemberID {
        &self.id
    }

    #[must_use]
    pub fn state(&self) -> MembershipState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == MembershipState::Active
    }

    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    #[must_use]
    pub fn attendance(&self) -> &[Attendance] {
        &self.attendance
    }

    #[must_use]
    pub fn total_training_minutes(&self) -> f64 {
        self.total_training_minutes
    }

    #[must_use]
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// Append a measurement and derive the BMI, rounded to two decimal places.
    pub fn record_measurement(
        &mut self,
        weight: f64,
        height: f64,
    ) -> Result<&Measurement, GymError> {
        if weight.is_nan() || height.is_nan() || weight <= 0.0 || height <= 0.0 {
            return Err(ErrorKind::Measurement(
                "weight and height must be positive values".to_string(),
            )
            .into());
        }

        validate_measurements(weight, height)?;

        let now = Local::now().naive_local();
        self.measurements.push(Measurement {
            timestamp: now,
            weight,
            height,
            bmi: round_2(weight / height.powi(2)),
        });
        self.updated_at = now;

        Ok(&self.measurements[self.measurements.len() - 1])
    }

    #[must_use]
    pub fn latest_measurement(&self) -> Option<&Measurement> {
        self.measurements.last()
    }

    /// Measurements ordered from newest to oldest.
    #[must_use]
    pub fn measurement_history(&self) -> Vec<&Measurement> {
        self.measurements.iter().rev().collect()
    }

    pub fn freeze_membership(&mut self) -> Result<(), GymError> {
        if self.state != MembershipState::Active {
            return Err(ErrorKind::MembershipState(
                "membership cannot be frozen because it is not active".to_string(),
            )
            .into());
        }
        self.set_state(MembershipState::Frozen);
        Ok(())
    }

    pub fn unfreeze_membership(&mut self) -> Result<(), GymError> {
        if self.state != MembershipState::Frozen {
            return Err(ErrorKind::MembershipState(
                "membership is already active".to_string(),
            )
            .into());
        }
        self.set_state(MembershipState::Active);
        Ok(())
    }

    fn set_state(&mut self, state: MembershipState) {
        self.state = state;
        self.updated_at = Local::now().naive_local();
    }

    /// Add an attendance entry and return its duration in minutes.
    ///
    /// Entries without check-out time are kept open and contribute no training time until they
    /// are closed by [`Member::check_out`].
    pub fn check_in(
        &mut self,
        date: NaiveDate,
        check_in: NaiveDateTime,
        check_out: Option<NaiveDateTime>,
    ) -> Result<f64, GymError> {
        self.ensure_may_attend()?;
        let attendance = Attendance::new(date, check_in, check_out)?;
        let duration = attendance.duration_minutes;
        self.attendance.push(attendance);
        self.total_training_minutes += duration;
        self.updated_at = Local::now().naive_local();
        Ok(duration)
    }

    /// Close the most recent open attendance entry and return its duration in minutes.
    pub fn check_out(&mut self, check_out: NaiveDateTime) -> Result<f64, GymError> {
        self.ensure_may_attend()?;
        let Some(attendance) = self.attendance.iter_mut().rev().find(|a| a.is_open()) else {
            return Err(ErrorKind::Attendance("no open check-in found".to_string()).into());
        };
        let duration = duration_minutes(attendance.check_in, check_out)?;
        attendance.check_out = Some(check_out);
        attendance.duration_minutes = duration;
        self.total_training_minutes += duration;
        self.updated_at = Local::now().naive_local();
        Ok(duration)
    }

    /// Remove the most recent attendance entry and take its duration off the running total.
    pub fn remove_last_attendance(&mut self) -> Result<Attendance, GymError> {
        let attendance = self
            .attendance
            .pop()
            .ok_or_else(|| ErrorKind::Attendance("no attendance entries to remove".to_string()))?;
        self.total_training_minutes -= attendance.duration_minutes;
        self.updated_at = Local::now().naive_local();
        Ok(attendance)
    }

    fn ensure_may_attend(&self) -> Result<(), GymError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(ErrorKind::Attendance(
                "attendance cannot be recorded while the membership is not active".to_string(),
            )
            .into())
        }
    }

    /// Sum of the durations of all attendance entries in minutes.
    #[must_use]
    pub fn total_training_time(&self) -> f64 {
        self.attendance.iter().map(|a| a.duration_minutes).sum()
    }

    pub fn attendance_in(&self, month: u32, year: i32) -> impl Iterator<Item = &Attendance> {
        self.attendance
            .iter()
            .filter(move |a| a.date.month() == month && a.date.year() == year)
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
