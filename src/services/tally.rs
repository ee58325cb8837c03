use mongodb::bson::oid::ObjectId;

use crate::database::poll_store::PollStore;
use crate::errors::{AppError, Result};
use crate::models::poll::{OptionTally, Poll, PollResults};

/// `0 <= index < options.len()`, else `OutOfRange`.
pub fn checked_option_index(poll: &Poll, index: i64) -> Result<usize> {
    let len = poll.options.len();
    match usize::try_from(index) {
        Ok(position) if position < len => Ok(position),
        _ => Err(AppError::OutOfRange { index, len }),
    }
}

/// Percentages are shares of the counter sum; all zero when nobody has voted.
pub fn tally(poll: &Poll) -> Vec<OptionTally> {
    let sum: i64 = poll.options.iter().map(|option| option.votes).sum();

    poll.options
        .iter()
        .enumerate()
        .map(|(option_index, option)| OptionTally {
            option_index,
            count: option.votes,
            percentage: if sum > 0 {
                option.votes as f64 / sum as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

pub fn results(poll: &Poll) -> PollResults {
    PollResults {
        poll_id: poll.id.map(|id| id.to_hex()).unwrap_or_default(),
        question: poll.question.clone(),
        total_votes: poll.options.iter().map(|option| option.votes).sum(),
        results: tally(poll),
    }
}

/// Adds one vote. Repeat votes are allowed; there is no voter tracking.
pub async fn vote(store: &dyn PollStore, id: ObjectId, option_index: i64) -> Result<Poll> {
    let poll = store.find(id).await?.ok_or(AppError::NotFound("Poll"))?;
    let position = checked_option_index(&poll, option_index)?;

    if let Some(updated) = store.increment_vote(id, position).await? {
        tracing::info!("🗳️ Vote recorded on poll {} option {}", id, position);
        return Ok(updated);
    }

    // The poll changed between the read and the increment.
    match store.find(id).await? {
        None => Err(AppError::NotFound("Poll")),
        Some(current) => Err(AppError::OutOfRange {
            index: option_index,
            len: current.options.len(),
        }),
    }
}

pub async fn reset_votes(store: &dyn PollStore, id: ObjectId) -> Result<Poll> {
    let poll = store
        .reset_votes(id)
        .await?
        .ok_or(AppError::NotFound("Poll"))?;
    tracing::info!("🔄 Votes reset on poll {}", id);
    Ok(poll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryPollStore;
    use crate::models::poll::PollOption;

    fn poll_with(counts: &[(&str, i64)]) -> Poll {
        Poll {
            id: None,
            question: "Who wins tonight?".to_string(),
            options: counts
                .iter()
                .map(|(label, votes)| PollOption {
                    option: label.to_string(),
                    votes: *votes,
                })
                .collect(),
            team_id: None,
            active: true,
            total_votes: counts.iter().map(|(_, votes)| votes).sum(),
            created_at: None,
            expires_at: None,
        }
    }

    fn counts(poll: &Poll) -> Vec<i64> {
        poll.options.iter().map(|option| option.votes).collect()
    }

    #[tokio::test]
    async fn vote_then_tally() {
        let store = InMemoryPollStore::new();
        let id = store.insert(poll_with(&[("A", 5), ("B", 3)]));

        let poll = vote(&store, id, 1).await.unwrap();
        assert_eq!(counts(&poll), vec![5, 4]);
        assert_eq!(poll.total_votes, 9);

        let rows = tally(&poll);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].option_index, rows[0].count), (0, 5));
        assert_eq!((rows[1].option_index, rows[1].count), (1, 4));
        assert!((rows[0].percentage - 55.555_555).abs() < 1e-5);
        assert!((rows[1].percentage - 44.444_444).abs() < 1e-5);
    }

    #[test]
    fn tally_of_five_and_three() {
        let rows = tally(&poll_with(&[("A", 5), ("B", 3)]));
        assert!((rows[0].percentage - 62.5).abs() < 1e-6);
        assert!((rows[1].percentage - 37.5).abs() < 1e-6);
    }

    #[test]
    fn empty_poll_tallies_to_zero_percent() {
        let rows = tally(&poll_with(&[("A", 0), ("B", 0), ("C", 0)]));
        assert!(rows.iter().all(|row| row.count == 0 && row.percentage == 0.0));
    }

    #[tokio::test]
    async fn vote_adds_exactly_one_to_one_counter() {
        let store = InMemoryPollStore::new();
        let before = [("A", 2), ("B", 0), ("C", 7)];
        let id = store.insert(poll_with(&before));

        for index in 0..before.len() {
            let prior = counts(&store.get(id).unwrap());
            let after = counts(&vote(&store, id, index as i64).await.unwrap());

            assert_eq!(after.iter().sum::<i64>(), prior.iter().sum::<i64>() + 1);
            for (position, (old, new)) in prior.iter().zip(&after).enumerate() {
                let expected = if position == index { old + 1 } else { *old };
                assert_eq!(*new, expected);
            }
        }
    }

    #[tokio::test]
    async fn out_of_range_index_leaves_counters_alone() {
        let store = InMemoryPollStore::new();
        let id = store.insert(poll_with(&[("A", 5), ("B", 3)]));

        for index in [-1, 2] {
            let err = vote(&store, id, index).await.unwrap_err();
            assert!(matches!(err, AppError::OutOfRange { len: 2, .. }));
        }

        let poll = store.get(id).unwrap();
        assert_eq!(counts(&poll), vec![5, 3]);
        assert_eq!(poll.total_votes, 8);
    }

    #[tokio::test]
    async fn vote_on_unknown_poll_is_not_found() {
        let store = InMemoryPollStore::new();
        let err = vote(&store, ObjectId::new(), 0).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Poll")));
    }

    #[tokio::test]
    async fn reset_zeroes_counters_and_keeps_labels() {
        let store = InMemoryPollStore::new();
        let id = store.insert(poll_with(&[("Russell", 12), ("Narine", 40), ("Rinku", 1)]));

        let poll = reset_votes(&store, id).await.unwrap();
        assert_eq!(counts(&poll), vec![0, 0, 0]);
        assert_eq!(poll.total_votes, 0);
        let labels: Vec<&str> = poll.options.iter().map(|option| option.option.as_str()).collect();
        assert_eq!(labels, vec!["Russell", "Narine", "Rinku"]);
    }

    #[tokio::test]
    async fn concurrent_votes_are_all_counted() {
        let store = std::sync::Arc::new(InMemoryPollStore::new());
        let id = store.insert(poll_with(&[("A", 0), ("B", 0)]));

        let tasks: Vec<_> = (0..20)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move { vote(store.as_ref(), id, n % 2).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let poll = store.get(id).unwrap();
        assert_eq!(counts(&poll), vec![10, 10]);
        assert_eq!(poll.total_votes, 20);
    }

    #[test]
    fn results_carry_the_poll_id() {
        let mut poll = poll_with(&[("A", 1), ("B", 1)]);
        let id = ObjectId::new();
        poll.id = Some(id);

        let summary = results(&poll);
        assert_eq!(summary.poll_id, id.to_hex());
        assert_eq!(summary.total_votes, 2);
        assert_eq!(summary.results[1].percentage, 50.0);
    }
}
