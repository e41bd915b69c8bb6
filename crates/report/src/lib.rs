#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use gymlog_domain::{ErrorKind, GymError, Measurement, Member, MemberID, MembershipState};
use log::info;

mod pdf;

pub const TITLE: &str = "Activity Report";

#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub date: NaiveDate,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub duration_minutes: f64,
}

/// Attendance and measurement data of one member for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub member_id: MemberID,
    pub member_name: String,
    pub state: MembershipState,
    pub month: u32,
    pub year: i32,
    pub visits: Vec<Visit>,
    /// Newest first.
    pub measurements: Vec<Measurement>,
}

impl MonthlyReport {
    pub fn new(member: &Member, month: u32, year: i32) -> Result<Self, GymError> {
        if !(1..=12).contains(&month) {
            return Err(ErrorKind::Report(format!(
                "month must be between 1 and 12 ({month})"
            ))
            .into());
        }

        Ok(Self {
            member_id: member.id().clone(),
            member_name: member.name.to_string(),
            state: member.state(),
            month,
            year,
            visits: member
                .attendance_in(month, year)
                .map(|a| Visit {
                    date: a.date,
                    check_in: a.check_in,
                    check_out: a.check_out,
                    duration_minutes: a.duration_minutes,
                })
                .collect(),
            measurements: member
                .measurement_history()
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "reporte_{}_{}_{}.pdf",
            self.member_id, self.month, self.year
        )
    }

    #[must_use]
    pub fn total_minutes(&self) -> f64 {
        self.visits.iter().map(|v| v.duration_minutes).sum()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Member: {} ({})", self.member_name, self.member_id),
            format!("Month: {}, Year: {}", self.month, self.year),
            format!("Membership state: {}", self.state),
        ];

        if !self.measurements.is_empty() {
            lines.push("Measurements:".to_string());
            lines.extend(self.measurements.iter().map(measurement_line));
        }

        lines.push(format!("Total visits: {}", self.visits.len()));
        lines.push(format!(
            "Total training time: {:.2} minutes",
            self.total_minutes()
        ));

        for visit in &self.visits {
            lines.push(String::new());
            lines.push(format!("Date: {}", visit.date.format("%d/%m/%Y")));
            lines.push(format!("Check-in: {}", visit.check_in.format("%H:%M")));
            lines.push(match visit.check_out {
                Some(check_out) => format!("Check-out: {}", check_out.format("%H:%M")),
                None => "Check-out: open".to_string(),
            });
            lines.push(format!(
                "Training time: {:.2} minutes",
                visit.duration_minutes
            ));
        }

        lines
    }

    /// Render the report into `dir` and return the path of the written file.
    pub fn write_pdf(&self, dir: &Path) -> Result<PathBuf, GymError> {
        let path = dir.join(self.file_name());
        pdf::render(TITLE, &self.lines(), &path)?;
        info!("generated report {}", path.display());
        Ok(path)
    }
}

fn measurement_line(measurement: &Measurement) -> String {
    format!(
        "  {}: {:.2} kg, {:.2} m, BMI {:.2}",
        measurement.timestamp.format("%d/%m/%Y %H:%M"),
        measurement.weight,
        measurement.height,
        measurement.bmi
    )
}
