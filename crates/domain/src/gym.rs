use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, info};
use serde::Serialize;

use crate::{Attendance, ErrorKind, GymError, Member, MemberID, MembershipState, Name};

pub const GUEST_EMAIL: &str = "guest@example.com";
pub const GUEST_PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SearchField {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "membership", serialize = "state")]
    MembershipState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_members: usize,
    pub active_members: usize,
    pub frozen_members: usize,
    pub started_at: NaiveDateTime,
}

/// In-memory registry of all members, keyed by member ID.
#[derive(Debug)]
pub struct Gym {
    members: BTreeMap<MemberID, Member>,
    started_at: NaiveDateTime,
}

impl Default for Gym {
    fn default() -> Self {
        Self::new()
    }
}

impl Gym {
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: BTreeMap::new(),
            started_at: Local::now().naive_local(),
        }
    }

    pub fn add_member(&mut self, member: Member) -> Result<(), GymError> {
        if self.members.contains_key(member.id()) {
            return Err(ErrorKind::DuplicateMember(member.id().clone()).into());
        }
        info!("registered member {}", member.id());
        self.members.insert(member.id().clone(), member);
        Ok(())
    }

    pub fn get_member(&self, id: &MemberID) -> Result<&Member, GymError> {
        self.members
            .get(id)
            .ok_or_else(|| ErrorKind::MemberNotFound(id.clone()).into())
    }

    pub fn get_member_mut(&mut self, id: &MemberID) -> Result<&mut Member, GymError> {
        self.members
            .get_mut(id)
            .ok_or_else(|| ErrorKind::MemberNotFound(id.clone()).into())
    }

    pub fn remove_member(&mut self, id: &MemberID) -> Result<Member, GymError> {
        let member = self
            .members
            .remove(id)
            .ok_or_else(|| GymError::from(ErrorKind::MemberNotFound(id.clone())))?;
        info!("removed member {id}");
        Ok(member)
    }

    #[must_use]
    pub fn contains(&self, id: &MemberID) -> bool {
        self.members.contains_key(id)
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Register a walk-in guest and return the generated ID.
    ///
    /// Guests only need a valid name, their contact details are placeholders.
    pub fn admit_guest(&mut self, name: &str) -> Result<MemberID, GymError> {
        let name = Name::new(name)?;
        let id = MemberID::new(&format!("guest_{}", self.members.len() + 1))?;
        self.add_member(Member::new(
            id.clone(),
            name,
            GUEST_EMAIL,
            GUEST_PLACEHOLDER,
            GUEST_PLACEHOLDER,
        ))?;
        Ok(id)
    }

    /// Record a visit and return its duration in minutes.
    pub fn record_attendance(
        &mut self,
        id: &MemberID,
        date: NaiveDate,
        check_in: NaiveDateTime,
        check_out: Option<NaiveDateTime>,
    ) -> Result<f64, GymError> {
        let duration = self.get_member_mut(id)?.check_in(date, check_in, check_out)?;
        debug!("recorded attendance of member {id} ({duration:.2} min)");
        Ok(duration)
    }

    pub fn record_check_out(
        &mut self,
        id: &MemberID,
        check_out: NaiveDateTime,
    ) -> Result<f64, GymError> {
        let duration = self.get_member_mut(id)?.check_out(check_out)?;
        debug!("recorded check-out of member {id} ({duration:.2} min)");
        Ok(duration)
    }

    #[must_use]
    pub fn search(&self, field: SearchField, value: &str) -> Vec<&Member> {
        match field {
            SearchField::Name => self.members().filter(|m| m.name.contains(value)).collect(),
            SearchField::MembershipState => match value.parse::<MembershipState>() {
                Ok(state) => self.members().filter(|m| m.state() == state).collect(),
                Err(_) => vec![],
            },
        }
    }

    /// Remove the most recent attendance entry of a member and return it.
    pub fn remove_last_attendance(&mut self, id: &MemberID) -> Result<Attendance, GymError> {
        let attendance = self.get_member_mut(id)?.remove_last_attendance()?;
        info!(
            "removed attendance of member {id} from {}",
            attendance.check_in.format("%Y-%m-%d %H:%M")
        );
        Ok(attendance)
    }

    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let total_members = self.members.len();
        let active_members = self.members().filter(|m| m.is_active()).count();
        Statistics {
            total_members,
            active_members,
            frozen_members: total_members - active_members,
            started_at: self.started_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    fn id(value: &str) -> MemberID {
        MemberID::new(value).unwrap()
    }

    fn member(member_id: &str, name: &str) -> Member {
        Member::new(
            id(member_id),
            Name::new(name).unwrap(),
            "member@example.com",
            "Main Street 123",
            "1234567890",
        )
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[fixture]
    fn gym() -> Gym {
        let mut gym = Gym::new();
        gym.add_member(member("U001", "Juan Pérez")).unwrap();
        gym.add_member(member("U002", "Ana García")).unwrap();
        gym.add_member(member("U003", "Juana Ruiz")).unwrap();
        gym
    }

    #[rstest]
    fn test_add_member_duplicate(mut gym: Gym) {
        let result = gym.add_member(member("U001", "Someone Else"));
        assert_eq!(
            result.map_err(|err| err.kind().clone()),
            Err(ErrorKind::DuplicateMember(id("U001")))
        );
        assert_eq!(gym.len(), 3);
        assert_eq!(
            gym.get_member(&id("U001")).unwrap().name.to_string(),
            "Juan Pérez"
        );
    }

    #[rstest]
    fn test_get_member(gym: Gym) {
        assert_eq!(gym.get_member(&id("U002")).unwrap().id(), &id("U002"));
        assert_eq!(
            gym.get_member(&id("U999")).map_err(|err| err.kind().clone()).err(),
            Some(ErrorKind::MemberNotFound(id("U999")))
        );
    }

    #[rstest]
    fn test_remove_member(mut gym: Gym) {
        assert_eq!(gym.remove_member(&id("U001")).unwrap().id(), &id("U001"));
        assert!(!gym.contains(&id("U001")));
        assert!(gym.get_member(&id("U001")).is_err());
        assert!(gym.search(SearchField::Name, "juan ").is_empty());
        assert_eq!(gym.len(), 2);

        assert_eq!(
            gym.remove_member(&id("U001"))
                .map_err(|err| err.kind().clone())
                .err(),
            Some(ErrorKind::MemberNotFound(id("U001")))
        );
    }

    #[rstest]
    fn test_members_ordered_by_id(gym: Gym) {
        assert_eq!(
            gym.members().map(|m| m.id().to_string()).collect::<Vec<_>>(),
            vec!["U001", "U002", "U003"]
        );
    }

    #[rstest]
    fn test_record_attendance(mut gym: Gym) {
        let duration = gym
            .record_attendance(&id("U001"), at(10, 0).date(), at(10, 0), Some(at(11, 0)))
            .unwrap();
        assert_approx_eq!(duration, 60.0);
        let member = gym.get_member(&id("U001")).unwrap();
        assert_eq!(member.attendance().len(), 1);
        assert_approx_eq!(member.total_training_minutes(), 60.0);

        gym.record_attendance(&id("U001"), at(10, 0).date(), at(12, 0), Some(at(12, 25)))
            .unwrap();
        assert_approx_eq!(
            gym.get_member(&id("U001")).unwrap().total_training_minutes(),
            85.0
        );
    }

    #[rstest]
    fn test_record_attendance_check_out_before_check_in(mut gym: Gym) {
        let result =
            gym.record_attendance(&id("U001"), at(10, 0).date(), at(10, 0), Some(at(9, 0)));
        assert!(matches!(
            result.map_err(|err| err.kind().clone()),
            Err(ErrorKind::Attendance(_))
        ));
        let member = gym.get_member(&id("U001")).unwrap();
        assert!(member.attendance().is_empty());
        assert_approx_eq!(member.total_training_minutes(), 0.0);
    }

    #[rstest]
    fn test_record_attendance_unknown_member(mut gym: Gym) {
        let result = gym.record_attendance(&id("U999"), at(10, 0).date(), at(10, 0), None);
        assert_eq!(
            result.map_err(|err| err.kind().clone()),
            Err(ErrorKind::MemberNotFound(id("U999")))
        );
    }

    #[rstest]
    fn test_record_check_out(mut gym: Gym) {
        gym.record_attendance(&id("U002"), at(10, 0).date(), at(10, 0), None)
            .unwrap();
        assert_approx_eq!(
            gym.record_check_out(&id("U002"), at(10, 50)).unwrap(),
            50.0
        );
        assert_approx_eq!(
            gym.get_member(&id("U002")).unwrap().total_training_minutes(),
            50.0
        );
    }

    #[rstest]
    fn test_remove_last_attendance(mut gym: Gym) {
        assert!(matches!(
            gym.remove_last_attendance(&id("U001"))
                .map_err(|err| err.kind().clone()),
            Err(ErrorKind::Attendance(_))
        ));
        assert_eq!(
            gym.remove_last_attendance(&id("U999"))
                .map_err(|err| err.kind().clone())
                .err(),
            Some(ErrorKind::MemberNotFound(id("U999")))
        );

        gym.record_attendance(&id("U001"), at(10, 0).date(), at(10, 0), Some(at(11, 0)))
            .unwrap();
        gym.record_attendance(&id("U001"), at(10, 0).date(), at(12, 0), Some(at(12, 20)))
            .unwrap();
        assert_approx_eq!(
            gym.remove_last_attendance(&id("U001"))
                .unwrap()
                .duration_minutes,
            20.0
        );
        let member = gym.get_member(&id("U001")).unwrap();
        assert_eq!(member.attendance().len(), 1);
        assert_approx_eq!(member.total_training_minutes(), 60.0);
    }

    #[rstest]
    #[case::name_lowercase(SearchField::Name, "juan", vec!["U001", "U003"])]
    #[case::name_uppercase(SearchField::Name, "GARCÍA", vec!["U002"])]
    #[case::name_substring(SearchField::Name, "an", vec!["U001", "U002", "U003"])]
    #[case::name_no_match(SearchField::Name, "pedro", vec![])]
    #[case::state_active(SearchField::MembershipState, "active", vec!["U001", "U003"])]
    #[case::state_frozen(SearchField::MembershipState, "Frozen", vec!["U002"])]
    #[case::state_partial(SearchField::MembershipState, "act", vec![])]
    #[case::state_unknown(SearchField::MembershipState, "cancelled", vec![])]
    fn test_search(
        mut gym: Gym,
        #[case] field: SearchField,
        #[case] value: &str,
        #[case] expected: Vec<&str>,
    ) {
        gym.get_member_mut(&id("U002"))
            .unwrap()
            .freeze_membership()
            .unwrap();
        assert_eq!(
            gym.search(field, value)
                .iter()
                .map(|m| m.id().to_string())
                .collect::<Vec<_>>(),
            expected
        );
    }

    #[rstest]
    #[case("name", Some(SearchField::Name))]
    #[case("Name", Some(SearchField::Name))]
    #[case("membership", Some(SearchField::MembershipState))]
    #[case("state", Some(SearchField::MembershipState))]
    #[case("email", None)]
    fn test_search_field_from_str(#[case] value: &str, #[case] expected: Option<SearchField>) {
        assert_eq!(value.parse::<SearchField>().ok(), expected);
    }

    #[rstest]
    fn test_statistics(mut gym: Gym) {
        gym.get_member_mut(&id("U003"))
            .unwrap()
            .freeze_membership()
            .unwrap();
        assert_eq!(
            gym.statistics(),
            Statistics {
                total_members: 3,
                active_members: 2,
                frozen_members: 1,
                started_at: gym.started_at(),
            }
        );
    }

    #[test]
    fn test_statistics_empty() {
        let gym = Gym::default();
        let statistics = gym.statistics();
        assert_eq!(statistics.total_members, 0);
        assert_eq!(statistics.active_members, 0);
        assert_eq!(statistics.frozen_members, 0);
        assert!(gym.is_empty());
    }

    #[rstest]
    fn test_admit_guest(mut gym: Gym) {
        let guest = gym.admit_guest("Pedro Sánchez").unwrap();
        assert_eq!(guest, id("guest_4"));
        let member = gym.get_member(&guest).unwrap();
        assert_eq!(member.email, GUEST_EMAIL);
        assert_eq!(member.phone, GUEST_PLACEHOLDER);
        assert_eq!(member.address, GUEST_PLACEHOLDER);

        assert!(gym.admit_guest("P2").is_err());
        assert_eq!(gym.len(), 4);
    }

    #[test]
    fn test_admit_guest_generated_id_taken() {
        let mut gym = Gym::new();
        gym.add_member(member("guest_2", "Ana García")).unwrap();
        assert_eq!(
            gym.admit_guest("Pedro Sánchez")
                .map_err(|err| err.kind().clone()),
            Err(ErrorKind::DuplicateMember(id("guest_2")))
        );
    }

    #[test]
    fn test_example_scenario() {
        let mut gym = Gym::new();
        let name = crate::validate_member_fields("Juan Pérez", "juan@example.com", "1234567890")
            .unwrap();
        gym.add_member(Member::new(
            id("U001"),
            name,
            "juan@example.com",
            "Main Street 123",
            "1234567890",
        ))
        .unwrap();

        let member = gym.get_member_mut(&id("U001")).unwrap();
        assert_approx_eq!(member.record_measurement(70.5, 1.75).unwrap().bmi, 23.02);
        member.freeze_membership().unwrap();
        assert_eq!(member.state().to_string(), "Frozen");

        assert!(matches!(
            gym.record_attendance(&id("U001"), at(10, 0).date(), at(10, 0), Some(at(11, 0)))
                .map_err(|err| err.kind().clone()),
            Err(ErrorKind::Attendance(_))
        ));

        gym.get_member_mut(&id("U001"))
            .unwrap()
            .unfreeze_membership()
            .unwrap();
        assert_eq!(
            gym.get_member(&id("U001")).unwrap().state().to_string(),
            "Active"
        );

        assert_approx_eq!(
            gym.record_attendance(&id("U001"), at(10, 0).date(), at(10, 0), Some(at(11, 0)))
                .unwrap(),
            60.0
        );
        assert_approx_eq!(
            gym.get_member(&id("U001")).unwrap().total_training_minutes(),
            60.0
        );
    }
}
