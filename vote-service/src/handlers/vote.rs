use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use service_core::error::AppError;

use crate::models::{Choice, VoteRecord, VoterId};
use crate::services::{metrics, VoteStore};
use crate::{AppState, PageSettings};

pub const VOTER_COOKIE: &str = "voter_id";

#[derive(Template)]
#[template(path = "index.html")]
pub struct BallotTemplate<'a> {
    pub option_a: &'a str,
    pub option_b: &'a str,
    pub hostname: &'a str,
    pub voted_a: bool,
    pub voted_b: bool,
}

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub vote: Option<String>,
}

/// Resolve the caller's identity from the `voter_id` cookie, minting one when
/// it is missing or empty. The cookie is written back on every successful
/// response.
pub fn identify_voter(jar: CookieJar) -> (CookieJar, VoterId) {
    let voter_id = jar
        .get(VOTER_COOKIE)
        .and_then(|cookie| VoterId::from_client(cookie.value()))
        .unwrap_or_else(|| {
            let voter_id = VoterId::generate();
            tracing::debug!(voter_id = %voter_id, "Assigned new voter id");
            voter_id
        });

    let cookie = Cookie::build((VOTER_COOKIE, voter_id.as_str().to_string())).path("/");
    (jar.add(cookie), voter_id)
}

pub async fn show_ballot(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, _) = identify_voter(jar);
    let page = render_ballot(&state.page, None)?;
    Ok((jar, page))
}

pub async fn cast_vote(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<VoteForm>,
) -> Result<impl IntoResponse, AppError> {
    let choice: Choice = form
        .vote
        .as_deref()
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("missing form field `vote`")))?
        .parse()?;

    let (jar, voter_id) = identify_voter(jar);
    process_vote(state.store.as_ref(), &voter_id, choice).await?;

    let page = render_ballot(&state.page, Some(choice))?;
    Ok((jar, page))
}

#[tracing::instrument(name = "process-vote", skip_all, fields(vote = %choice))]
async fn process_vote(
    store: &dyn VoteStore,
    voter_id: &VoterId,
    choice: Choice,
) -> Result<(), AppError> {
    let record = VoteRecord::new(voter_id, choice);
    let queued = store.push_vote(&record).await?;
    metrics::record_vote(choice);

    tracing::info!(
        voter_id = %voter_id,
        queued,
        "Received vote for {}",
        choice
    );
    Ok(())
}

fn render_ballot(page: &PageSettings, vote: Option<Choice>) -> Result<Html<String>, AppError> {
    let _span = tracing::info_span!("render-template").entered();

    let template = BallotTemplate {
        option_a: &page.option_a,
        option_b: &page.option_b,
        hostname: &page.hostname,
        voted_a: vote == Some(Choice::A),
        voted_b: vote == Some(Choice::B),
    };

    template
        .render()
        .map(Html)
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))
}
