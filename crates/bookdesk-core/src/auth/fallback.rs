//! Profile precedence during rehydration.
//!
//! Candidates are evaluated in order and the first acceptable one wins:
//! a successful fresh fetch is always acceptable, a cached profile only
//! with a valid enrollment. No winner means the session is anonymous.

use tracing::debug;

use crate::error::AuthError;
use crate::models::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Fresh,
    Cached,
}

#[derive(Debug)]
pub enum ProfileCandidate {
    /// Result of asking the backend who the credential belongs to.
    Fresh(Result<UserProfile, AuthError>),
    /// The profile persisted alongside the credential.
    Cached(UserProfile),
}

impl ProfileCandidate {
    fn accept(self) -> Option<(ProfileSource, UserProfile)> {
        match self {
            ProfileCandidate::Fresh(Ok(user)) => Some((ProfileSource::Fresh, user)),
            ProfileCandidate::Fresh(Err(e)) => {
                debug!(error = %e, "Fresh profile unavailable");
                None
            }
            ProfileCandidate::Cached(user) if user.has_valid_enrollment() => {
                Some((ProfileSource::Cached, user))
            }
            ProfileCandidate::Cached(_) => {
                debug!("Cached profile has no valid enrollment");
                None
            }
        }
    }
}

/// Pick the first acceptable profile.
pub fn resolve(candidates: impl IntoIterator<Item = ProfileCandidate>) -> Option<(ProfileSource, UserProfile)> {
    candidates.into_iter().find_map(ProfileCandidate::accept)
}
