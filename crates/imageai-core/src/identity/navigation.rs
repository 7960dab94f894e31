use serde::{Deserialize, Serialize};

/// Surfaces the host router can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Splash screen shown on first load.
    Splash,
    /// Login surface, shown whenever there is no active session.
    Login,
    /// Conversation surface, requires an active session.
    Chat,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Splash => "/",
            Route::Login => "/login",
            Route::Chat => "/chat",
        }
    }

    /// Whether the route is only reachable with an active session.
    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Chat)
    }
}
