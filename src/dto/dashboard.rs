use serde::{Deserialize, Serialize};

/// Query string of the dashboard endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// `YYYY-MM-DD`; ignored when it does not parse.
    pub date: Option<String>,
}

/// Dashboard counters for one actor scope.
///
/// The first three count every visible client. The last four count only
/// clients whose assigned visit falls on the requested day, or every visible
/// client when no day was requested.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_clients: usize,
    pub registered_clients: usize,
    pub non_registered_clients: usize,
    pub todays_clients: usize,
    pub pending_visits: usize,
    pub visited_count: usize,
    pub rescheduled_count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: DashboardStats,
}
