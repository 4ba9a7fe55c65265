// 🔐 Session Guard - Gate protected views on a client-held token
//
// Presence only: the guard never validates signature or expiry, that is the
// auth service's business. The check runs once per mount; re-rendering a
// mounted view reuses the outcome instead of reading the token again.

use serde::Serialize;

/// Where unauthenticated sessions are sent
pub const LOGIN_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuardOutcome {
    Allowed,
    Redirect(&'static str),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allowed)
    }
}

/// Anything that can hand over the stored credential token
pub trait TokenSource {
    fn token(&self) -> Option<String>;
}

/// A token that is already in hand (e.g. parsed from a request)
impl TokenSource for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    /// Not mounted yet: nothing may render
    Checking,
    Decided(GuardOutcome),
}

pub struct SessionGuard<S: TokenSource> {
    source: S,
    state: GuardState,
}

impl<S: TokenSource> SessionGuard<S> {
    pub fn new(source: S) -> Self {
        SessionGuard {
            source,
            state: GuardState::Checking,
        }
    }

    /// Activate the protected view
    ///
    /// Reads the token on the first call only; later calls return the
    /// outcome decided at mount time.
    pub fn mount(&mut self) -> GuardOutcome {
        if let GuardState::Decided(outcome) = self.state {
            return outcome;
        }

        let outcome = match self.source.token() {
            Some(token) if !token.trim().is_empty() => GuardOutcome::Allowed,
            _ => {
                tracing::debug!("no session token, redirecting to {}", LOGIN_PATH);
                GuardOutcome::Redirect(LOGIN_PATH)
            }
        };
        self.state = GuardState::Decided(outcome);
        outcome
    }

    /// Outcome for a re-render; None while still checking
    pub fn status(&self) -> Option<GuardOutcome> {
        match self.state {
            GuardState::Checking => None,
            GuardState::Decided(outcome) => Some(outcome),
        }
    }

    /// True once mounted with a token; protected content may render
    pub fn can_render(&self) -> bool {
        self.status().is_some_and(|o| o.is_allowed())
    }

    /// Leave the view; the next mount checks again
    pub fn unmount(&mut self) {
        self.state = GuardState::Checking;
    }
}

/// Check a token once, for request-scoped activations
pub fn check(token: Option<String>) -> GuardOutcome {
    SessionGuard::new(token).mount()
}

/// True if a token can travel verbatim as a cookie value
///
/// Cookie values are limited to printable ASCII minus whitespace, double
/// quote, comma, semicolon and backslash.
pub fn is_cookie_safe(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}
