use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use diesel::{
    helper_types::{Find, ForUpdate, Select},
    prelude::*,
};
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    identity::{self, UnknownUser},
    models::vote::{NewVote, Vote},
    schema::{posts, votes},
};

/// The effect of a vote request given the voter's existing vote.
#[derive(Debug, PartialEq)]
pub struct Tally {
    /// Change applied to the scroll's running upvote count.
    pub delta: i32,
    /// The voter's vote after the request, 0 when retracted.
    pub user_vote: i32,
}

/// Voting the same way twice retracts the vote, voting the other way flips it.
pub fn tally(existing: Option<i32>, requested: i32) -> Tally {
    match existing {
        None => Tally {
            delta: requested,
            user_vote: requested,
        },
        Some(v) if v == requested => Tally {
            delta: -v,
            user_vote: 0,
        },
        Some(v) => Tally {
            delta: requested - v,
            user_vote: requested,
        },
    }
}

/// Locks the scroll's row for the rest of the transaction. Votes on one
/// scroll are serialized by it, including first votes that have no row of
/// their own to lock yet.
fn lock_post(id: i32) -> ForUpdate<Select<Find<posts::table, i32>, posts::id>> {
    posts::table.find(id).select(posts::id).for_update()
}

#[derive(Deserialize)]
pub struct VoteSubmission {
    value: i32,
    username: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct VoteResponse {
    upvotes: i32,
    user_vote: i32,
}

#[axum::debug_handler]
pub async fn vote_post(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    crate::json::Json(submission): crate::json::Json<VoteSubmission>,
) -> Result<Json<VoteResponse>, AppError> {
    if submission.value != 1 && submission.value != -1 {
        return Err(("Vote value must be 1 or -1", StatusCode::BAD_REQUEST).into());
    }

    let mut conn = ctx.diesel.get().await?;

    let voter = identity::resolve_actor(
        &mut conn,
        submission.username.as_deref(),
        UnknownUser::Reject,
    )
    .await?;

    let requested = submission.value;
    let voter_id = voter.id;

    let outcome = conn
        .transaction(|conn| {
            Box::pin(async move {
                if lock_post(id).first::<i32>(conn).await.optional()?.is_none() {
                    return Ok(None);
                }

                let existing = votes::table
                    .filter(votes::user_id.eq(voter_id))
                    .filter(votes::post_id.eq(id))
                    .select(Vote::as_select())
                    .for_update()
                    .first::<Vote>(conn)
                    .await
                    .optional()?;

                let result = tally(existing.as_ref().map(|v| v.value), requested);

                match existing {
                    None => {
                        diesel::insert_into(votes::table)
                            .values(&NewVote {
                                user_id: voter_id,
                                post_id: id,
                                value: requested,
                                created_at: chrono::Utc::now().naive_utc(),
                            })
                            .execute(conn)
                            .await?;
                    }
                    Some(vote) if result.user_vote == 0 => {
                        diesel::delete(votes::table.find(vote.id))
                            .execute(conn)
                            .await?;
                    }
                    Some(vote) => {
                        diesel::update(votes::table.find(vote.id))
                            .set(votes::value.eq(requested))
                            .execute(conn)
                            .await?;
                    }
                }

                let upvotes = diesel::update(posts::table.find(id))
                    .set(posts::upvotes.eq(posts::upvotes + result.delta))
                    .returning(posts::upvotes)
                    .get_result::<i32>(conn)
                    .await?;

                Ok::<_, diesel::result::Error>(Some((upvotes, result.user_vote)))
            })
        })
        .await?;

    let Some((upvotes, user_vote)) = outcome else {
        return Err(("Scroll not found", StatusCode::NOT_FOUND).into());
    };

    tracing::debug!(post_id = id, voter = %voter.username, user_vote, "vote counted");

    Ok(Json(VoteResponse { upvotes, user_vote }))
}
