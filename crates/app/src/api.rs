use std::path::PathBuf;

use chrono::NaiveDateTime;
use gymlog_domain::{
    Action, Attendance, ConfirmedRequest, Envelope, Gym, GymError, Measurement, Member, MemberID,
    MembershipState, SearchField, Statistics, guard, validate_measurements,
    validate_member_fields,
};
use gymlog_report::MonthlyReport;
use log::debug;

use crate::settings::Settings;

/// Callable front end over a gym registry.
///
/// Every operation reports its outcome as an [`Envelope`] instead of an error.
pub struct Api {
    gym: Gym,
    settings: Settings,
}

impl Api {
    #[must_use]
    pub fn new(gym: Gym, settings: Settings) -> Self {
        Self { gym, settings }
    }

    #[must_use]
    pub fn gym(&self) -> &Gym {
        &self.gym
    }

    pub fn register_member(
        &mut self,
        id: &str,
        name: &str,
        email: &str,
        address: &str,
        phone: &str,
    ) -> Envelope<MemberID> {
        guard(|| {
            let id = MemberID::new(id)?;
            let name = validate_member_fields(name, email, phone)?;
            self.gym
                .add_member(Member::new(id.clone(), name, email, address, phone))?;
            Ok(id)
        })
        .with_message(|id| {
            format!(
                "Member {} registered successfully",
                self.member_name(id).unwrap_or_default()
            )
        })
    }

    pub fn membership_state(&self, id: &str) -> Envelope<MembershipState> {
        guard(|| Ok(self.gym.get_member(&MemberID::new(id)?)?.state()))
            .with_message(|state| format!("Membership state: {state}"))
    }

    pub fn record_measurement(
        &mut self,
        id: &str,
        weight: f64,
        height: f64,
    ) -> Envelope<Measurement> {
        guard(|| {
            validate_measurements(weight, height)?;
            let member = self.gym.get_member_mut(&MemberID::new(id)?)?;
            Ok(member.record_measurement(weight, height)?.clone())
        })
        .with_message(|m| format!("Measurements recorded (BMI {:.2})", m.bmi))
    }

    /// Record a visit on the day of the check-in and return its duration in minutes.
    pub fn record_attendance(
        &mut self,
        id: &str,
        check_in: NaiveDateTime,
        check_out: Option<NaiveDateTime>,
    ) -> Envelope<f64> {
        guard(|| {
            Ok(self.gym.record_attendance(
                &MemberID::new(id)?,
                check_in.date(),
                check_in,
                check_out,
            )?)
        })
        .with_message(|duration| {
            if check_out.is_some() {
                format!("Attendance recorded. Training time: {duration:.2} minutes")
            } else {
                "Check-in recorded".to_string()
            }
        })
    }

    pub fn record_check_out(&mut self, id: &str, check_out: NaiveDateTime) -> Envelope<f64> {
        guard(|| Ok(self.gym.record_check_out(&MemberID::new(id)?, check_out)?)).with_message(
            |duration| format!("Check-out recorded. Training time: {duration:.2} minutes"),
        )
    }

    pub fn remove_last_attendance(&mut self, id: &str) -> Envelope<Attendance> {
        guard(|| Ok(self.gym.remove_last_attendance(&MemberID::new(id)?)?)).with_message(
            |attendance| {
                format!(
                    "Attendance of {} removed ({:.2} minutes)",
                    attendance.date.format("%d/%m/%Y"),
                    attendance.duration_minutes
                )
            },
        )
    }

    pub fn freeze_membership(&mut self, id: &str) -> Envelope<MembershipState> {
        guard(|| {
            let member = self.gym.get_member_mut(&MemberID::new(id)?)?;
            member.freeze_membership()?;
            Ok(member.state())
        })
        .with_message(|_| "Membership frozen successfully".to_string())
    }

    pub fn unfreeze_membership(&mut self, id: &str) -> Envelope<MembershipState> {
        guard(|| {
            let member = self.gym.get_member_mut(&MemberID::new(id)?)?;
            member.unfreeze_membership()?;
            Ok(member.state())
        })
        .with_message(|_| "Membership activated successfully".to_string())
    }

    pub fn admit_guest(&mut self, name: &str) -> Envelope<MemberID> {
        guard(|| Ok(self.gym.admit_guest(name)?))
            .with_message(|id| format!("Guest {} registered with ID {id}", name.trim()))
    }

    pub fn remove_member(&mut self, id: &str) -> Envelope<MemberID> {
        guard(|| {
            let member = self.gym.remove_member(&MemberID::new(id)?)?;
            Ok(member.id().clone())
        })
        .with_message(|id| format!("Member {id} removed successfully"))
    }

    /// Search members by `field`, which is either `name` or `membership`.
    pub fn search(&self, field: &str, value: &str) -> Envelope<Vec<Member>> {
        guard(|| {
            let field = field
                .trim()
                .parse::<SearchField>()
                .map_err(|_| GymError::invalid_data("field", "must be name or membership"))?;
            Ok(self
                .gym
                .search(field, value.trim())
                .into_iter()
                .cloned()
                .collect())
        })
        .with_message(|members: &Vec<Member>| format!("{} member(s) found", members.len()))
    }

    #[must_use]
    pub fn statistics(&self) -> Envelope<Statistics> {
        guard(|| Ok(self.gym.statistics()))
    }

    pub fn generate_report(&self, id: &str, month: u32, year: i32) -> Envelope<PathBuf> {
        guard(|| {
            let member = self.gym.get_member(&MemberID::new(id)?)?;
            let report = MonthlyReport::new(member, month, year)?;
            Ok(report.write_pdf(&self.settings.report_dir)?)
        })
        .with_message(|path| format!("Report generated: {}", path.display()))
    }

    /// Commit a confirmed two-step request.
    pub fn execute(&mut self, request: ConfirmedRequest) -> Envelope<()> {
        let action = request.into_action();
        debug!("executing request: {action}");
        match action {
            Action::Register {
                id,
                name,
                email,
                address,
                phone,
            } => self
                .register_member(&id, &name, &email, &address, &phone)
                .map(drop),
            Action::RecordMeasurement { id, weight, height } => {
                self.record_measurement(&id, weight, height).map(drop)
            }
            Action::CheckIn {
                id,
                check_in,
                check_out,
            } => self.record_attendance(&id, check_in, check_out).map(drop),
            Action::CheckOut { id, check_out } => self.record_check_out(&id, check_out).map(drop),
            Action::RemoveAttendance { id } => self.remove_last_attendance(&id).map(drop),
            Action::Freeze { id } => self.freeze_membership(&id).map(drop),
            Action::Unfreeze { id } => self.unfreeze_membership(&id).map(drop),
            Action::Remove { id } => self.remove_member(&id).map(drop),
            Action::Report { id, month, year } => {
                self.generate_report(&id, month, year).map(drop)
            }
        }
    }

    fn member_name(&self, id: &MemberID) -> Option<String> {
        self.gym.get_member(id).ok().map(|m| m.name.to_string())
    }
}
