use mongodb::bson::{doc, Document};

use crate::database::{PLAYERS, TEAMS};

/// Reference fields resolved on match reads: (field, collection).
pub const MATCH_REFERENCES: [(&str, &str); 4] = [
    ("homeTeam", TEAMS),
    ("awayTeam", TEAMS),
    ("winnerTeamId", TEAMS),
    ("manOfMatch", PLAYERS),
];

pub const TEAM_REFERENCE: [(&str, &str); 1] = [("teamId", TEAMS)];

/// Replaces an ObjectId field with the document it points at. A dangling or
/// missing reference leaves the field absent.
pub fn lookup_one(field: &str, from: &str) -> [Document; 2] {
    [
        doc! {
            "$lookup": {
                "from": from,
                "localField": field,
                "foreignField": "_id",
                "as": field,
            }
        },
        doc! {
            "$unwind": {
                "path": format!("${}", field),
                "preserveNullAndEmptyArrays": true,
            }
        },
    ]
}

pub fn populated_pipeline(
    filter: Document,
    sort: Option<Document>,
    references: &[(&str, &str)],
) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": filter }];
    if let Some(sort) = sort {
        pipeline.push(doc! { "$sort": sort });
    }
    for (field, from) in references {
        pipeline.extend(lookup_one(field, from));
    }
    pipeline
}
