//! Voter identity held entirely in client cookies.
//!
//! Nothing about individual voters is kept server-side: the `voter_id`
//! cookie carries the identity and `last_vote` remembers the most recent
//! confirmed ballot for display.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use shared::{ClientIdentity, VoteChoice};
use tracing::info;

pub const VOTER_ID_COOKIE: &str = "voter_id";
pub const LAST_VOTE_COOKIE: &str = "last_vote";

/// Two years
pub const COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 365 * 2;

/// Outcome of identity resolution for a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub identity: ClientIdentity,
    /// Advisory only; whatever the client sent back, unvalidated
    pub last_vote: Option<String>,
    /// The identity was created for this request
    pub minted: bool,
}

pub struct IdentityManager {
    secure_cookies: bool,
}

impl IdentityManager {
    pub fn new(secure_cookies: bool) -> Self {
        Self { secure_cookies }
    }

    /// Identity the client presented, if any. Never mints.
    pub fn presented(&self, jar: &CookieJar) -> Option<ClientIdentity> {
        jar.get(VOTER_ID_COOKIE)
            .and_then(|cookie| ClientIdentity::from_token(cookie.value()))
    }

    /// Resolve the caller's identity, minting one if none was presented.
    pub fn resolve(&self, jar: &CookieJar) -> ResolvedIdentity {
        match self.presented(jar) {
            Some(identity) => ResolvedIdentity {
                identity,
                last_vote: jar
                    .get(LAST_VOTE_COOKIE)
                    .map(|cookie| cookie.value().to_string()),
                minted: false,
            },
            None => {
                let identity = ClientIdentity::mint();
                info!(voter_id = %identity, "New voter identified, assigning ID");
                ResolvedIdentity {
                    identity,
                    last_vote: None,
                    minted: true,
                }
            }
        }
    }

    /// Set (or refresh the expiry of) the identity cookie
    pub fn remember_identity(&self, jar: CookieJar, identity: &ClientIdentity) -> CookieJar {
        jar.add(self.cookie(VOTER_ID_COOKIE, identity.as_str().to_string()))
    }

    /// Record a confirmed ballot for display on later visits
    pub fn remember_vote(&self, jar: CookieJar, choice: VoteChoice) -> CookieJar {
        jar.add(self.cookie(LAST_VOTE_COOKIE, choice.as_str().to_string()))
    }

    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .max_age(time::Duration::seconds(COOKIE_MAX_AGE_SECS))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .build()
    }
}
