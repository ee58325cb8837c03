// Bridges the live-score feed and the local `matches` collection.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::database::match_store::MatchStore;
use crate::errors::{AppError, Result};
use crate::models::external::ExternalMatch;
use crate::models::matches::{ExternalFixture, Match, MatchStatus, MatchView, EXTERNAL_SOURCE};
use crate::models::to_bson_date;

const FALLBACK_HOME: &str = "Home";
const FALLBACK_AWAY: &str = "Away";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// The parts of a feed record that map onto the local schema.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatch {
    pub home_team_name: String,
    pub away_team_name: String,
    pub status: MatchStatus,
    pub date: Option<DateTime<Utc>>,
}

pub fn normalize_external_match(raw: &ExternalMatch) -> NormalizedMatch {
    let (home_team_name, away_team_name) = team_pair(raw);
    NormalizedMatch {
        home_team_name,
        away_team_name,
        status: feed_status(raw),
        date: feed_date(raw),
    }
}

/// `teamInfo` first, then `teams`, then the literal `("Home", "Away")`.
fn team_pair(raw: &ExternalMatch) -> (String, String) {
    if let Some(info) = raw.team_info.as_deref().filter(|info| info.len() >= 2) {
        let display = |index: usize| {
            let team = &info[index];
            team.name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .or_else(|| team.shortname.as_deref().map(str::trim))
                .unwrap_or("")
                .to_string()
        };
        return (display(0), display(1));
    }

    if let Some(teams) = raw.teams.as_deref().filter(|teams| teams.len() >= 2) {
        return (teams[0].trim().to_string(), teams[1].trim().to_string());
    }

    (FALLBACK_HOME.to_string(), FALLBACK_AWAY.to_string())
}

pub fn feed_status(raw: &ExternalMatch) -> MatchStatus {
    if raw.match_ended {
        MatchStatus::Completed
    } else if raw.match_started {
        MatchStatus::Live
    } else {
        MatchStatus::Upcoming
    }
}

/// First of `dateTimeGMT`, `dateTime`, `date` that parses. Bad values are skipped.
fn feed_date(raw: &ExternalMatch) -> Option<DateTime<Utc>> {
    [&raw.date_time_gmt, &raw.date_time, &raw.date]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find_map(parse_feed_date)
}

/// Timestamps without an offset are read as UTC.
pub fn parse_feed_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// First non-empty of `id`, `matchId`, `unique_id`, `match_id`.
pub fn external_id(raw: &ExternalMatch) -> Option<String> {
    [&raw.id, &raw.match_id, &raw.unique_id, &raw.legacy_match_id]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|id| !id.is_empty())
        .map(str::to_string)
}

pub fn build_external_fixture(raw: &ExternalMatch) -> Result<ExternalFixture> {
    let external_match_id = external_id(raw)
        .ok_or_else(|| AppError::invalid_data("External match id is required"))?;
    let normalized = normalize_external_match(raw);

    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    };

    let result = match normalized.status {
        MatchStatus::Completed => non_empty(&raw.status),
        _ => None,
    };

    Ok(ExternalFixture {
        external_match_id,
        source: EXTERNAL_SOURCE.to_string(),
        home_team_name: normalized.home_team_name,
        away_team_name: normalized.away_team_name,
        status: normalized.status,
        venue: non_empty(&raw.venue),
        date: normalized.date.map(to_bson_date),
        result,
        description: non_empty(&raw.name),
    })
}

/// Writes a feed record into `matches`, updating the row that already holds
/// its external id if there is one.
pub async fn publish(store: &dyn MatchStore, raw: &ExternalMatch) -> Result<Match> {
    let fixture = build_external_fixture(raw)?;
    tracing::info!(
        "📥 Publishing external match {} ({} vs {})",
        fixture.external_match_id,
        fixture.home_team_name,
        fixture.away_team_name
    );
    store.upsert_external(&fixture).await
}

/// Lowercase ASCII alphanumerics only: "Mumbai-Indians" and "mumbai indians"
/// share the key "mumbaiindians".
pub fn normalize_team_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Fuzzy team-name join between local fixtures and feed records. The alias
/// table maps extra spellings onto one key; empty by default.
#[derive(Debug, Clone, Default)]
pub struct TeamNameMatcher {
    aliases: HashMap<String, String>,
}

impl TeamNameMatcher {
    pub fn with_aliases(aliases: &HashMap<String, String>) -> Self {
        let aliases = aliases
            .iter()
            .map(|(alias, canonical)| (normalize_team_key(alias), normalize_team_key(canonical)))
            .filter(|(alias, canonical)| !alias.is_empty() && !canonical.is_empty())
            .collect();
        Self { aliases }
    }

    pub fn key(&self, name: &str) -> String {
        let key = normalize_team_key(name);
        match self.aliases.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    /// Every name a feed record goes by: team-info names and short names, the
    /// plain team list, and the record's own display name.
    pub fn feed_names(&self, feed: &ExternalMatch) -> HashSet<String> {
        let mut names = Vec::new();

        if let Some(info) = &feed.team_info {
            for team in info.iter().take(2) {
                names.extend(team.name.iter().cloned());
                names.extend(team.shortname.iter().cloned());
            }
        }
        if let Some(teams) = &feed.teams {
            names.extend(teams.iter().take(2).cloned());
        }
        names.extend(feed.name.iter().cloned());

        names
            .iter()
            .map(|name| self.key(name))
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// The first feed record naming both sides of `local`. Fixtures that have
    /// not started are never matched.
    pub fn find_live_counterpart<'a>(
        &self,
        local: &MatchView,
        feed: &'a [ExternalMatch],
    ) -> Option<&'a ExternalMatch> {
        if !local.status.has_started() {
            return None;
        }

        let home = self.key(local.home_name());
        let away = self.key(local.away_name());
        if home.is_empty() || away.is_empty() {
            return None;
        }

        feed.iter().find(|entry| {
            let names = self.feed_names(entry);
            names.contains(&home) && names.contains(&away)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryMatchStore;
    use mongodb::bson::oid::ObjectId;
    use crate::models::team::Team;
    use serde_json::json;

    fn feed(value: serde_json::Value) -> ExternalMatch {
        serde_json::from_value(value).unwrap()
    }

    fn local(home: &str, away: &str, status: MatchStatus) -> MatchView {
        MatchView {
            home_team_name: Some(home.to_string()),
            away_team_name: Some(away.to_string()),
            status,
            ..MatchView::default()
        }
    }

    #[test]
    fn missing_team_lists_fall_back_to_home_and_away() {
        for raw in [
            json!({}),
            json!({ "teams": "MI v CSK" }),
            json!({ "teams": ["Only One"] }),
            json!({ "teamInfo": null, "teams": null }),
            json!({ "teamInfo": [{ "name": "Solo" }] }),
        ] {
            let normalized = normalize_external_match(&feed(raw));
            assert_eq!(normalized.home_team_name, "Home");
            assert_eq!(normalized.away_team_name, "Away");
        }
    }

    #[test]
    fn team_info_wins_over_team_list() {
        let normalized = normalize_external_match(&feed(json!({
            "teamInfo": [{ "name": "  Mumbai Indians " }, { "shortname": "CSK" }],
            "teams": ["A", "B"],
        })));
        assert_eq!(normalized.home_team_name, "Mumbai Indians");
        assert_eq!(normalized.away_team_name, "CSK");
    }

    #[test]
    fn nameless_team_info_entry_becomes_empty_string() {
        let normalized = normalize_external_match(&feed(json!({
            "teamInfo": [{}, { "name": "Punjab Kings" }],
        })));
        assert_eq!(normalized.home_team_name, "");
        assert_eq!(normalized.away_team_name, "Punjab Kings");
    }

    #[test]
    fn plain_team_list_is_trimmed() {
        let normalized = normalize_external_match(&feed(json!({
            "teams": [" Rajasthan Royals", "Delhi Capitals "],
        })));
        assert_eq!(normalized.home_team_name, "Rajasthan Royals");
        assert_eq!(normalized.away_team_name, "Delhi Capitals");
    }

    #[test]
    fn status_follows_started_and_ended_flags() {
        let cases = [
            (true, true, MatchStatus::Completed),
            (true, false, MatchStatus::Completed),
            (false, true, MatchStatus::Live),
            (false, false, MatchStatus::Upcoming),
        ];
        for (ended, started, expected) in cases {
            let raw = feed(json!({ "matchEnded": ended, "matchStarted": started }));
            assert_eq!(normalize_external_match(&raw).status, expected);
        }
    }

    #[test]
    fn first_parseable_date_field_wins() {
        let raw = feed(json!({
            "dateTimeGMT": "not a date",
            "dateTime": "2024-04-10T14:00:00",
            "date": "2024-01-01",
        }));
        let date = normalize_external_match(&raw).date.unwrap();
        assert_eq!(date.to_rfc3339(), "2024-04-10T14:00:00+00:00");

        let raw = feed(json!({ "date": "2024-05-26" }));
        let date = normalize_external_match(&raw).date.unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-26T00:00:00+00:00");
    }

    #[test]
    fn unparseable_dates_leave_the_date_unset() {
        let raw = feed(json!({ "dateTimeGMT": "", "dateTime": "soon", "date": 42 }));
        assert!(normalize_external_match(&raw).date.is_none());
    }

    #[test]
    fn external_id_checks_fields_in_order() {
        let raw = feed(json!({ "id": "  ", "matchId": "m-1", "unique_id": 99 }));
        assert_eq!(external_id(&raw).as_deref(), Some("m-1"));

        let raw = feed(json!({ "match_id": 12345 }));
        assert_eq!(external_id(&raw).as_deref(), Some("12345"));

        assert!(external_id(&feed(json!({ "name": "MI vs CSK" }))).is_none());
    }

    #[test]
    fn fixture_keeps_result_only_for_finished_matches() {
        let live = build_external_fixture(&feed(json!({
            "id": "a",
            "status": "MI need 20 runs",
            "matchStarted": true,
        })))
        .unwrap();
        assert_eq!(live.result, None);
        assert_eq!(live.source, "cricapi");

        let done = build_external_fixture(&feed(json!({
            "id": "a",
            "name": "MI vs CSK, 5th Match",
            "status": "CSK won by 6 wkts",
            "matchEnded": true,
        })))
        .unwrap();
        assert_eq!(done.result.as_deref(), Some("CSK won by 6 wkts"));
        assert_eq!(done.description.as_deref(), Some("MI vs CSK, 5th Match"));
    }

    #[tokio::test]
    async fn publish_without_external_id_is_a_validation_error() {
        let store = InMemoryMatchStore::new();
        let err = publish(&store, &feed(json!({ "teams": ["A", "B"] })))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(store.published().is_empty());
    }

    #[tokio::test]
    async fn republishing_updates_the_same_row() {
        let store = InMemoryMatchStore::new();

        let first = publish(
            &store,
            &feed(json!({
                "id": "ext-42",
                "teams": ["Mumbai Indians", "Chennai Super Kings"],
                "venue": "Wankhede",
            })),
        )
        .await
        .unwrap();

        let second = publish(
            &store,
            &feed(json!({
                "id": "ext-42",
                "teams": ["Mumbai Indians", "Chennai Super Kings"],
                "matchStarted": true,
                "matchEnded": true,
                "status": "Mumbai Indians won by 9 runs",
            })),
        )
        .await
        .unwrap();

        let rows = store.published();
        assert_eq!(rows.len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(rows[0].status, MatchStatus::Completed);
        assert_eq!(rows[0].result.as_deref(), Some("Mumbai Indians won by 9 runs"));
        assert_eq!(rows[0].venue.as_deref(), Some("Wankhede"));
    }

    #[tokio::test]
    async fn republishing_replaces_team_references_with_feed_names() {
        let row = Match {
            id: Some(ObjectId::new()),
            external_match_id: Some("ext-1".to_string()),
            source: Some(EXTERNAL_SOURCE.to_string()),
            home_team: Some(ObjectId::new()),
            away_team: Some(ObjectId::new()),
            ..Match::default()
        };
        let store = InMemoryMatchStore::new().with_published(row);

        publish(
            &store,
            &feed(json!({ "id": "ext-1", "teams": ["Mumbai Indians", "Chennai Super Kings"] })),
        )
        .await
        .unwrap();

        let rows = store.published();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].home_team, None);
        assert_eq!(rows[0].away_team, None);
        assert_eq!(rows[0].home_team_name.as_deref(), Some("Mumbai Indians"));
        assert_eq!(rows[0].away_team_name.as_deref(), Some("Chennai Super Kings"));
    }

    #[test]
    fn team_keys_ignore_case_and_punctuation() {
        assert_eq!(normalize_team_key("Mumbai Indians"), normalize_team_key("mumbai-indians"));
        assert_eq!(normalize_team_key("Royal Challengers Bengaluru!"), "royalchallengersbengaluru");
        assert_eq!(normalize_team_key(" - "), "");
    }

    #[test]
    fn upcoming_fixtures_never_match() {
        let matcher = TeamNameMatcher::default();
        let entries = vec![feed(json!({ "teams": ["Mumbai Indians", "Chennai Super Kings"] }))];
        let fixture = local("Mumbai Indians", "Chennai Super Kings", MatchStatus::Upcoming);

        assert!(matcher.find_live_counterpart(&fixture, &entries).is_none());
    }

    #[test]
    fn live_fixture_finds_its_feed_entry() {
        let matcher = TeamNameMatcher::default();
        let entries = vec![
            feed(json!({ "id": "other", "teams": ["Gujarat Titans", "Punjab Kings"] })),
            feed(json!({
                "id": "target",
                "teamInfo": [{ "name": "mumbai indians" }, { "name": "chennai-super-kings" }],
                "name": "MI vs CSK",
            })),
        ];
        let fixture = local("Mumbai Indians", "Chennai Super Kings", MatchStatus::Live);

        let found = matcher.find_live_counterpart(&fixture, &entries).unwrap();
        assert_eq!(found.id.as_deref(), Some("target"));
    }

    #[test]
    fn first_matching_entry_wins() {
        let matcher = TeamNameMatcher::default();
        let entries = vec![
            feed(json!({ "id": "first", "teams": ["KKR", "SRH"] })),
            feed(json!({ "id": "second", "teams": ["KKR", "SRH"] })),
        ];
        let fixture = local("KKR", "SRH", MatchStatus::Completed);

        let found = matcher.find_live_counterpart(&fixture, &entries).unwrap();
        assert_eq!(found.id.as_deref(), Some("first"));
    }

    #[test]
    fn one_side_missing_is_not_a_match() {
        let matcher = TeamNameMatcher::default();
        let entries = vec![feed(json!({ "teams": ["Mumbai Indians", "Delhi Capitals"] }))];

        let fixture = local("Mumbai Indians", "Chennai Super Kings", MatchStatus::Live);
        assert!(matcher.find_live_counterpart(&fixture, &entries).is_none());

        let fixture = local("Mumbai Indians", "", MatchStatus::Live);
        assert!(matcher.find_live_counterpart(&fixture, &entries).is_none());
    }

    #[test]
    fn referenced_team_name_is_preferred() {
        let matcher = TeamNameMatcher::default();
        let entries = vec![feed(json!({ "teams": ["Kolkata Knight Riders", "Lucknow Super Giants"] }))];
        let fixture = MatchView {
            home_team: Some(Team {
                name: "Kolkata Knight Riders".to_string(),
                ..Team::default()
            }),
            away_team_name: Some("Lucknow Super Giants".to_string()),
            status: MatchStatus::Live,
            ..MatchView::default()
        };

        assert!(matcher.find_live_counterpart(&fixture, &entries).is_some());
    }

    #[test]
    fn aliases_extend_the_default_heuristic() {
        let aliases = HashMap::from([("KKR".to_string(), "Kolkata Knight Riders".to_string())]);
        let matcher = TeamNameMatcher::with_aliases(&aliases);
        let entries = vec![feed(json!({ "teams": ["KKR", "Rajasthan Royals"] }))];
        let fixture = local("Kolkata Knight Riders", "Rajasthan Royals", MatchStatus::Live);

        assert!(matcher.find_live_counterpart(&fixture, &entries).is_some());
        assert!(TeamNameMatcher::default()
            .find_live_counterpart(&fixture, &entries)
            .is_none());
    }
}
