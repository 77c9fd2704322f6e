use crate::config::LeaderboardWindow;
use crate::input::{LeaderboardPageRef, SeedItem};
use url::{ParseError, Url};

/// Builds the two URL families the crawler fetches
///
/// Every URL is resolved against the configured base, so pointing the
/// base at a mock server redirects the whole crawl.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    /// Creates a URL builder for the given site root
    ///
    /// A trailing slash is appended when missing so that joins keep any
    /// path prefix of the base.
    pub fn new(base: &str) -> Result<Self, ParseError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Members listing of a seed film
    ///
    /// # Examples
    ///
    /// ```
    /// use letterboxd_harvest::input::SeedItem;
    /// use letterboxd_harvest::url::SiteUrls;
    ///
    /// let urls = SiteUrls::new("https://letterboxd.com/").unwrap();
    /// let seed = SeedItem::new("the-thing").unwrap();
    ///
    /// assert_eq!(
    ///     urls.members_page(&seed, 1).unwrap().as_str(),
    ///     "https://letterboxd.com/film/the-thing/members/"
    /// );
    /// assert_eq!(
    ///     urls.members_page(&seed, 7).unwrap().as_str(),
    ///     "https://letterboxd.com/film/the-thing/members/page/7/"
    /// );
    /// ```
    pub fn members_page(&self, seed: &SeedItem, page: u32) -> Result<Url, ParseError> {
        if page <= 1 {
            self.base.join(&format!("film/{}/members/", seed.as_str()))
        } else {
            self.base
                .join(&format!("film/{}/members/page/{}/", seed.as_str(), page))
        }
    }

    /// One page of a popular-members leaderboard
    pub fn leaderboard_page(&self, page_ref: &LeaderboardPageRef) -> Result<Url, ParseError> {
        self.leaderboard_window_page(page_ref.window, page_ref.page)
    }

    fn leaderboard_window_page(
        &self,
        window: LeaderboardWindow,
        page: u32,
    ) -> Result<Url, ParseError> {
        self.base.join(&format!(
            "members/popular/this/{}/page/{}/",
            window.path_segment(),
            page
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(slug: &str) -> SeedItem {
        SeedItem::new(slug).unwrap()
    }

    #[test]
    fn test_members_first_page_has_no_page_segment() {
        let urls = SiteUrls::new("https://letterboxd.com/").unwrap();
        let url = urls.members_page(&seed("film-a"), 1).unwrap();
        assert_eq!(url.as_str(), "https://letterboxd.com/film/film-a/members/");
    }

    #[test]
    fn test_members_page_uses_requested_number() {
        let urls = SiteUrls::new("https://letterboxd.com/").unwrap();
        for page in [2, 3, 12] {
            let url = urls.members_page(&seed("film-a"), page).unwrap();
            assert_eq!(
                url.as_str(),
                format!("https://letterboxd.com/film/film-a/members/page/{}/", page)
            );
        }
    }

    #[test]
    fn test_base_without_trailing_slash_keeps_prefix() {
        let urls = SiteUrls::new("http://127.0.0.1:9000/mirror").unwrap();
        let url = urls.members_page(&seed("film-a"), 1).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mirror/film/film-a/members/");
    }

    #[test]
    fn test_leaderboard_urls() {
        let urls = SiteUrls::new("https://letterboxd.com/").unwrap();
        let expected = [
            (LeaderboardWindow::AllTime, "all-time"),
            (LeaderboardWindow::Weekly, "week"),
            (LeaderboardWindow::Monthly, "month"),
            (LeaderboardWindow::Yearly, "year"),
        ];

        for (window, segment) in expected {
            let url = urls
                .leaderboard_page(&LeaderboardPageRef { window, page: 3 })
                .unwrap();
            assert_eq!(
                url.as_str(),
                format!("https://letterboxd.com/members/popular/this/{}/page/3/", segment)
            );
        }
    }
}
