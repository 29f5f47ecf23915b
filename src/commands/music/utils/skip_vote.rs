//! Skip voting rules.
//!
//! Elevated roles, autoplay picks and the track's own requester skip outright;
//! everyone else adds a vote until the threshold is reached.

use super::music_manager::{MusicError, MusicResult};
use super::queue_manager::QueueEntry;
use serenity::model::id::UserId;
use std::collections::HashSet;

/// Who may skip without a vote, and how many votes everyone else needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPolicy {
    pub threshold: usize,
    /// Role names (matched case-insensitively) that skip immediately
    pub elevated_roles: Vec<String>,
}

impl Default for SkipPolicy {
    fn default() -> Self {
        Self {
            threshold: 3,
            elevated_roles: vec!["DJ".to_string(), "PRO".to_string()],
        }
    }
}

impl SkipPolicy {
    fn is_elevated(&self, role_names: &[String]) -> bool {
        role_names.iter().any(|role| {
            self.elevated_roles
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(role))
        })
    }
}

/// The member asking to skip
#[derive(Debug, Clone)]
pub struct Voter {
    pub id: UserId,
    pub role_names: Vec<String>,
}

impl Voter {
    pub fn new(id: UserId, role_names: Vec<String>) -> Self {
        Self { id, role_names }
    }
}

/// What a skip request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipOutcome {
    /// The voter holds an elevated role
    Elevated,
    /// The current track was picked by autoplay
    Autoplay,
    /// The voter requested the current track
    Requester,
    /// This vote reached the threshold
    VotePassed { votes: usize, required: usize },
    /// Vote recorded, still short of the threshold
    VoteAdded { votes: usize, required: usize },
}

impl SkipOutcome {
    /// Whether the current track should be stopped
    pub fn skips(&self) -> bool {
        !matches!(self, SkipOutcome::VoteAdded { .. })
    }
}

/// Applies the rules in order, recording the vote in `votes` when one is cast.
/// Repeat votes are rejected without touching the tally.
pub fn evaluate(
    policy: &SkipPolicy,
    current: &QueueEntry,
    votes: &mut HashSet<UserId>,
    voter: &Voter,
) -> MusicResult<SkipOutcome> {
    if policy.is_elevated(&voter.role_names) {
        return Ok(SkipOutcome::Elevated);
    }

    if current.requester().is_autoplay() {
        return Ok(SkipOutcome::Autoplay);
    }

    if current.requester().id == voter.id {
        return Ok(SkipOutcome::Requester);
    }

    if !votes.insert(voter.id) {
        return Err(MusicError::DuplicateVote);
    }

    let required = policy.threshold;
    let total = votes.len();
    if total >= required {
        Ok(SkipOutcome::VotePassed {
            votes: total,
            required,
        })
    } else {
        Ok(SkipOutcome::VoteAdded {
            votes: total,
            required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::music::audio_sources::TrackMetadata;
    use crate::commands::music::utils::queue_manager::Requester;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serenity::model::id::ChannelId;
    use test_case::test_case;

    const REQUESTER: u64 = 100;

    fn current(requester: Requester) -> QueueEntry {
        QueueEntry::new(requester, ChannelId::new(1), TrackMetadata::new("Song", "Band"))
    }

    fn member_track() -> QueueEntry {
        current(Requester::member(UserId::new(REQUESTER), "alice"))
    }

    fn voter(id: u64) -> Voter {
        Voter::new(UserId::new(id), vec!["Member".to_string()])
    }

    #[test]
    fn third_distinct_vote_skips() {
        let policy = SkipPolicy::default();
        let track = member_track();
        let mut votes = HashSet::new();

        assert_eq!(
            evaluate(&policy, &track, &mut votes, &voter(1)).unwrap(),
            SkipOutcome::VoteAdded { votes: 1, required: 3 }
        );
        assert_eq!(
            evaluate(&policy, &track, &mut votes, &voter(2)).unwrap(),
            SkipOutcome::VoteAdded { votes: 2, required: 3 }
        );
        let outcome = evaluate(&policy, &track, &mut votes, &voter(3)).unwrap();
        assert_eq!(outcome, SkipOutcome::VotePassed { votes: 3, required: 3 });
        assert!(outcome.skips());
    }

    #[test]
    fn repeat_vote_is_rejected_without_changing_the_tally() {
        let policy = SkipPolicy::default();
        let track = member_track();
        let mut votes = HashSet::new();

        evaluate(&policy, &track, &mut votes, &voter(1)).unwrap();
        assert_matches!(
            evaluate(&policy, &track, &mut votes, &voter(1)),
            Err(MusicError::DuplicateVote)
        );
        assert_eq!(votes.len(), 1);
    }

    #[test_case("dj" ; "lowercase dj")]
    #[test_case("Pro" ; "mixed case pro")]
    #[test_case("DJ" ; "exact dj")]
    fn elevated_roles_skip_immediately(role: &str) {
        let mut votes = HashSet::new();
        let elevated = Voter::new(UserId::new(5), vec!["Member".into(), role.into()]);

        let outcome = evaluate(&SkipPolicy::default(), &member_track(), &mut votes, &elevated);

        assert_eq!(outcome.unwrap(), SkipOutcome::Elevated);
        assert!(votes.is_empty());
    }

    #[test]
    fn autoplay_tracks_are_always_skippable() {
        let track = current(Requester::autoplay(UserId::new(999), "DakBot"));
        let mut votes = HashSet::new();

        let outcome = evaluate(&SkipPolicy::default(), &track, &mut votes, &voter(1)).unwrap();
        assert_eq!(outcome, SkipOutcome::Autoplay);
    }

    #[test]
    fn requester_skips_their_own_track() {
        let mut votes = HashSet::new();
        let outcome =
            evaluate(&SkipPolicy::default(), &member_track(), &mut votes, &voter(REQUESTER));
        assert_eq!(outcome.unwrap(), SkipOutcome::Requester);
    }

    #[test]
    fn partial_role_names_are_not_elevated() {
        let mut votes = HashSet::new();
        let almost = Voter::new(UserId::new(5), vec!["DJs".into(), "Professional".into()]);
        let outcome = evaluate(&SkipPolicy::default(), &member_track(), &mut votes, &almost);
        assert_eq!(outcome.unwrap(), SkipOutcome::VoteAdded { votes: 1, required: 3 });
    }
}
