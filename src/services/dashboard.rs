//! Dashboard counters.

use chrono::NaiveDate;

use crate::domain::actor::Actor;
use crate::domain::types::{ClientStatus, MeetingStatus};
use crate::dto::dashboard::DashboardStats;
use crate::repository::{ClientFilter, ClientReader};
use crate::services::ServiceResult;
use crate::services::scope::scope_filter;

/// Computes the dashboard counters within the actor's scope.
///
/// Registration counters cover all time. Visit counters cover `date` when
/// given. Each counter is a separate query, so concurrent writes may make
/// them disagree momentarily.
pub fn dashboard_stats<R>(
    repo: &R,
    actor: &Actor,
    date: Option<NaiveDate>,
) -> ServiceResult<DashboardStats>
where
    R: ClientReader + ?Sized,
{
    let base = scope_filter(actor, ClientFilter::new());
    let dated = match date {
        Some(day) => base.clone().on_day(day),
        None => base.clone(),
    };

    let count = |filter: ClientFilter| {
        repo.count_clients(&filter).map_err(|err| {
            log::error!("Failed to count clients: {err}");
            err
        })
    };

    Ok(DashboardStats {
        total_clients: count(base.clone())?,
        registered_clients: count(base.clone().client_status(ClientStatus::Registered))?,
        non_registered_clients: count(base.client_status(ClientStatus::NotRegistered))?,
        todays_clients: count(dated.clone())?,
        pending_visits: count(dated.clone().meeting_status(MeetingStatus::Pending))?,
        visited_count: count(dated.clone().meeting_status(MeetingStatus::Visited))?,
        rescheduled_count: count(dated.meeting_status(MeetingStatus::Rescheduled))?,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin, team, user};

    #[test]
    fn team_counts_are_scoped_to_self() {
        let mut repo = MockRepository::new();
        repo.expect_count_clients()
            .withf(|filter| filter.assigned_to == Some(user(2)))
            .times(7)
            .returning(|_| Ok(1));

        let stats = dashboard_stats(&repo, &team(2), None).expect("stats are computed");

        assert_eq!(stats.total_clients, 1);
    }

    #[test]
    fn only_visit_counters_are_dated() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
        let mut repo = MockRepository::new();
        repo.expect_count_clients().returning(|filter| {
            Ok(match (filter.date_range.is_some(), filter.meeting_status) {
                (false, _) => 10,
                (true, None) => 3,
                (true, Some(_)) => 1,
            })
        });

        let stats = dashboard_stats(&repo, &admin(), Some(day)).expect("stats are computed");

        assert_eq!(
            stats,
            DashboardStats {
                total_clients: 10,
                registered_clients: 10,
                non_registered_clients: 10,
                todays_clients: 3,
                pending_visits: 1,
                visited_count: 1,
                rescheduled_count: 1,
            }
        );
    }
}
