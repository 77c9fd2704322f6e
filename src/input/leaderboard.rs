use crate::config::{LeaderboardConfig, LeaderboardWindow};

/// One page of a popular-members leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaderboardPageRef {
    pub window: LeaderboardWindow,
    pub page: u32,
}

/// Enumerates every leaderboard page to fetch
///
/// Produces `windows × first_page..=last_page`, ordered page-major so that
/// the first pages of every window are launched before deeper pages.
pub fn enumerate_leaderboard_pages(config: &LeaderboardConfig) -> Vec<LeaderboardPageRef> {
    (config.first_page..=config.last_page)
        .flat_map(|page| {
            config
                .windows
                .iter()
                .map(move |&window| LeaderboardPageRef { window, page })
        })
        .collect()
}
