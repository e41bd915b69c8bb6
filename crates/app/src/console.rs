use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDateTime, Timelike};
use gymlog_domain::{
    Action, Envelope, GymError, Request, parse_measurement, validate_date,
};
use log::warn;

use crate::api::Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::FromRepr)]
#[repr(u8)]
enum MenuOption {
    Register = 1,
    RecordMeasurement,
    RecordAttendance,
    MembershipState,
    GenerateReport,
    FreezeMembership,
    UnfreezeMembership,
    Exit,
    RecordCheckOut,
    Search,
    Statistics,
    RemoveMember,
    AdmitGuest,
    RemoveAttendance,
}

impl MenuOption {
    fn label(self) -> &'static str {
        match self {
            MenuOption::Register => "Register new member",
            MenuOption::RecordMeasurement => "Record measurements",
            MenuOption::RecordAttendance => "Record attendance",
            MenuOption::MembershipState => "View membership state",
            MenuOption::GenerateReport => "Generate report",
            MenuOption::FreezeMembership => "Freeze membership",
            MenuOption::UnfreezeMembership => "Unfreeze membership",
            MenuOption::Exit => "Exit",
            MenuOption::RecordCheckOut => "Record check-out",
            MenuOption::Search => "Search members",
            MenuOption::Statistics => "Statistics",
            MenuOption::RemoveMember => "Delete member",
            MenuOption::AdmitGuest => "Admit guest",
            MenuOption::RemoveAttendance => "Delete last attendance",
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Interactive numbered menu reading commands line by line.
///
/// The session ends when the exit option is chosen or the input is exhausted.
pub struct Console<R, W> {
    api: Api,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(api: Api, input: R, output: W) -> Self {
        Self { api, input, output }
    }

    #[must_use]
    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.show_menu()?;
            let flow = match self.ask("Select an option") {
                Ok(choice) => self.dispatch(&choice),
                Err(err) => Err(err),
            };
            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    writeln!(self.output)?;
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- GYM MANAGEMENT SYSTEM ---")?;
        for option in <MenuOption as strum::IntoEnumIterator>::iter() {
            writeln!(self.output, "{}. {}", option as u8, option.label())?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> io::Result<Flow> {
        let Some(option) = choice.trim().parse::<u8>().ok().and_then(MenuOption::from_repr) else {
            writeln!(self.output, "Invalid option. Please try again.")?;
            return Ok(Flow::Continue);
        };

        writeln!(self.output, "\n--- {} ---", option.label())?;

        match option {
            MenuOption::Register => self.register(),
            MenuOption::RecordMeasurement => self.record_measurement(),
            MenuOption::RecordAttendance => self.record_attendance(),
            MenuOption::MembershipState => self.membership_state(),
            MenuOption::GenerateReport => self.generate_report(),
            MenuOption::FreezeMembership => {
                let id = self.ask("Member ID")?;
                self.confirm_and_execute(Action::Freeze { id })
            }
            MenuOption::UnfreezeMembership => {
                let id = self.ask("Member ID")?;
                self.confirm_and_execute(Action::Unfreeze { id })
            }
            MenuOption::Exit => {
                writeln!(self.output, "Thank you for using the gym management system. Goodbye!")?;
                return Ok(Flow::Exit);
            }
            MenuOption::RecordCheckOut => self.record_check_out(),
            MenuOption::Search => self.search(),
            MenuOption::Statistics => self.statistics(),
            MenuOption::RemoveMember => {
                let id = self.ask("Member ID")?;
                self.confirm_and_execute(Action::Remove { id })
            }
            MenuOption::AdmitGuest => {
                let name = self.ask("Guest name")?;
                let envelope = self.api.admit_guest(&name);
                self.show(&envelope)
            }
            MenuOption::RemoveAttendance => {
                let id = self.ask("Member ID")?;
                self.confirm_and_execute(Action::RemoveAttendance { id })
            }
        }?;

        Ok(Flow::Continue)
    }

    fn register(&mut self) -> io::Result<()> {
        let id = self.ask("Member ID")?;
        let name = self.ask("Name")?;
        let email = self.ask("Email")?;
        let address = self.ask("Address")?;
        let phone = self.ask("Phone")?;
        let envelope = self
            .api
            .register_member(&id, &name, &email, &address, &phone);
        self.show(&envelope)
    }

    fn record_measurement(&mut self) -> io::Result<()> {
        let id = self.ask("Member ID")?;
        let weight = self.ask("Weight (kg)")?;
        let height = self.ask("Height (m)")?;
        match (
            parse_measurement("weight", &weight),
            parse_measurement("height", &height),
        ) {
            (Ok(weight), Ok(height)) => {
                let envelope = self.api.record_measurement(&id, weight, height);
                self.show(&envelope)
            }
            (Err(err), _) | (_, Err(err)) => self.show_error(&err),
        }
    }

    fn record_attendance(&mut self) -> io::Result<()> {
        let id = self.ask("Member ID")?;
        let check_in = self.ask("Check-in (YYYY-MM-DD HH:MM, empty for now)")?;
        let check_out = self.ask("Check-out (YYYY-MM-DD HH:MM, empty if still training)")?;
        let (check_in, check_out) = match (parse_time(&check_in), parse_time(&check_out)) {
            (Ok(None), Ok(Some(_))) => {
                return self.show_error(&GymError::invalid_data(
                    "check-out",
                    "requires an explicit check-in time, record it later with the check-out option",
                ));
            }
            (Ok(check_in), Ok(check_out)) => (check_in.unwrap_or_else(now), check_out),
            (Err(err), _) | (_, Err(err)) => return self.show_error(&err),
        };
        let envelope = self.api.record_attendance(&id, check_in, check_out);
        self.show(&envelope)
    }

    fn record_check_out(&mut self) -> io::Result<()> {
        let id = self.ask("Member ID")?;
        let check_out = self.ask("Check-out (YYYY-MM-DD HH:MM, empty for now)")?;
        let check_out = match parse_time(&check_out) {
            Ok(time) => time.unwrap_or_else(now),
            Err(err) => return self.show_error(&err),
        };
        let envelope = self.api.record_check_out(&id, check_out);
        self.show(&envelope)
    }

    fn membership_state(&mut self) -> io::Result<()> {
        let id = self.ask("Member ID")?;
        let envelope = self.api.membership_state(&id);
        self.show(&envelope)
    }

    fn generate_report(&mut self) -> io::Result<()> {
        let id = self.ask("Member ID")?;
        let month = self.ask("Month (1-12)")?;
        let year = self.ask("Year")?;
        let Ok(month) = month.trim().parse::<u32>() else {
            return self.show_error(&GymError::invalid_data("month", "must be a whole number"));
        };
        let Ok(year) = year.trim().parse::<i32>() else {
            return self.show_error(&GymError::invalid_data("year", "must be a whole number"));
        };
        let envelope = self.api.generate_report(&id, month, year);
        self.show(&envelope)
    }

    fn search(&mut self) -> io::Result<()> {
        let field = self.ask("Search by (name/membership)")?;
        let value = self.ask("Value")?;
        let envelope = self.api.search(&field, &value);
        self.show(&envelope)?;
        for member in envelope.result.iter().flatten() {
            writeln!(
                self.output,
                "  {} - {} - {}",
                member.id(),
                member.name,
                member.state()
            )?;
        }
        Ok(())
    }

    fn statistics(&mut self) -> io::Result<()> {
        let envelope = self.api.statistics();
        if let Some(statistics) = &envelope.result {
            writeln!(self.output, "Total members: {}", statistics.total_members)?;
            writeln!(self.output, "Active members: {}", statistics.active_members)?;
            writeln!(self.output, "Frozen members: {}", statistics.frozen_members)?;
            writeln!(
                self.output,
                "Running since: {}",
                statistics.started_at.format("%Y-%m-%d %H:%M")
            )?;
            Ok(())
        } else {
            self.show(&envelope)
        }
    }

    fn confirm_and_execute(&mut self, action: Action) -> io::Result<()> {
        let request = Request::new(action);
        let answer = self.ask(&format!("{}? [y/N]", request.summary()))?;
        if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            let envelope = self.api.execute(request.confirm());
            self.show(&envelope)
        } else {
            writeln!(self.output, "Cancelled.")
        }
    }

    fn show<T>(&mut self, envelope: &Envelope<T>) -> io::Result<()> {
        match &envelope.kind {
            Some(kind) => writeln!(self.output, "Error ({kind}): {}", envelope.message),
            None => writeln!(self.output, "{}", envelope.message),
        }
    }

    fn show_error(&mut self, err: &GymError) -> io::Result<()> {
        warn!("rejected input: {err}");
        writeln!(self.output, "Error ({}): {err}", err.name())
    }

    /// Prompt for a line of input, failing with `UnexpectedEof` when the input is exhausted.
    fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn parse_time(value: &str) -> Result<Option<NaiveDateTime>, GymError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        validate_date(value).map(Some)
    }
}

/// Current local time, truncated to the minute like entered times.
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|time| time.with_nanosecond(0))
        .unwrap_or(now)
}
