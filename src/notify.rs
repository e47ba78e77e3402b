use std::time::Duration;

pub const MOVIE_NIGHT_TITLE: &str = "🎥 Movie Night!";
pub const MOVIE_NIGHT_BODY: &str = "Don’t forget to check out today’s top picks!";

/// A local reminder shown once `delay` has elapsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub delay: Duration,
}

impl Reminder {
    pub fn movie_night(delay: Duration) -> Self {
        Self {
            title: MOVIE_NIGHT_TITLE.to_string(),
            body: MOVIE_NIGHT_BODY.to_string(),
            delay,
        }
    }

    /// Wait out the delay, then hand the reminder to `deliver`.
    pub async fn fire_after_delay<F>(self, deliver: F)
    where
        F: FnOnce(Reminder),
    {
        tracing::info!(delay_secs = self.delay.as_secs(), title = %self.title, "reminder scheduled");
        tokio::time::sleep(self.delay).await;
        deliver(self);
    }
}
