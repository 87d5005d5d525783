use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, Uri},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;
use tracing::info;

use platform::{
    error::AppError,
    identity::{CurrentUser, User},
    pager,
};

use crate::{
    models::{Answer, Question, QuestionQuery, UserInfo, UserPhoto, QUESTION_SCOPE},
    pages,
    state::AppState,
};

pub const PAGE_SIZE: usize = 5;

/// Absent, empty, or unparsable means the first page.
fn parse_page(raw: &str) -> usize {
    raw.parse().unwrap_or(0)
}

fn split_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(',').map(|tag| tag.trim().to_owned()).collect()
}

fn ensure_user_info(state: &AppState, user: &User) -> UserInfo {
    if let Some(row) = state.user_infos.children_of(&user.id).into_iter().next() {
        return row.entity;
    }

    let info = UserInfo::new(user.author());
    state.user_infos.insert(Some(&user.id), info.clone());
    info
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
) -> Markup {
    let userinfo = user.as_ref().map(|user| ensure_user_info(&state, user));

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    pages::home(user.as_ref(), userinfo.as_ref(), &session)
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    tag: String,
    #[serde(default)]
    page: String,
}

pub async fn question_home(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<ListParams>,
) -> Markup {
    let page = parse_page(&params.page);
    let query = QuestionQuery::from_tag_param(&params.tag);

    let rows = query.run(&state.questions);
    let total_pages = pager::total_pages(rows.len(), PAGE_SIZE);
    let window = pager::window(page, total_pages);
    let slice = pager::page_slice(&rows, page, PAGE_SIZE);

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    pages::question_home(user.as_ref(), &session, slice, &params.tag, &window)
}

#[derive(Deserialize)]
pub struct AskForm {
    title: String,
    content: String,
    #[serde(default)]
    tags: String,
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<AskForm>,
) -> Redirect {
    let Some(user) = user else {
        return Redirect::to(&state.identity.login_url("/"));
    };

    let question = Question::new(
        user.author(),
        form.title,
        form.content,
        split_tags(&form.tags),
    );
    let key = state.questions.insert(Some(QUESTION_SCOPE), question);
    info!("user {} asked question {}", user.id, key.urlsafe());

    Redirect::to(&format!("/Question?qid={}", key.urlsafe()))
}

#[derive(Deserialize)]
pub struct QuestionParams {
    qid: String,
}

pub async fn question_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<QuestionParams>,
) -> Result<Markup, AppError> {
    let key = state.questions.key(&params.qid)?;
    let question = state.questions.get(&key).ok_or(AppError::NotFound)?;

    let mut answers = state.answers.children_of(&params.qid);
    answers.sort_by(|a, b| b.entity.created_date.cmp(&a.entity.created_date));

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::question_page(
        user.as_ref(),
        &session,
        &params.qid,
        &question,
        &answers,
    ))
}

#[derive(Deserialize)]
pub struct EditQuestionParams {
    qid: String,
    #[serde(default)]
    decision: String,
}

pub async fn edit_question_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<EditQuestionParams>,
) -> Result<Response, AppError> {
    if user.is_none() {
        let login = state.identity.login_url(&uri.to_string());
        return Ok(Redirect::to(&login).into_response());
    }

    let key = state.questions.key(&params.qid)?;

    if params.decision == "Yes" {
        if !state.questions.delete(&key) {
            return Err(AppError::NotFound);
        }
        info!("question {} deleted", params.qid);
        return Ok(Redirect::to("/DeleteSuccess").into_response());
    }

    let question = state.questions.get(&key).ok_or(AppError::NotFound)?;
    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::edit_question(&session, &params.qid, &question).into_response())
}

#[derive(Deserialize)]
pub struct EditQuestionForm {
    qid: String,
    title: String,
    content: String,
    #[serde(default)]
    tags: String,
}

pub async fn edit_question(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<EditQuestionForm>,
) -> Result<Response, AppError> {
    if user.is_none() {
        let login = state.identity.login_url(&format!("/Question?qid={}", form.qid));
        return Ok(Redirect::to(&login).into_response());
    }

    let key = state.questions.key(&form.qid)?;
    let updated = state.questions.update(&key, |question| {
        question.title = form.title.clone();
        question.content = form.content.clone();
        question.tags = split_tags(&form.tags);
        question.modified_date = Some(Utc::now());
    });
    if !updated {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to(&format!("/Question?qid={}", form.qid)).into_response())
}

#[derive(Deserialize)]
pub struct AnswerForm {
    qid: String,
    content: String,
}

pub async fn answer(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<AnswerForm>,
) -> Result<Response, AppError> {
    let Some(user) = user else {
        return Ok(Redirect::to(&state.identity.login_url("/")).into_response());
    };

    let key = state.questions.key(&form.qid)?;
    state.questions.get(&key).ok_or(AppError::NotFound)?;

    state
        .answers
        .insert(Some(&form.qid), Answer::new(user.author(), form.content));
    info!("user {} answered question {}", user.id, form.qid);

    Ok(Redirect::to(&format!("/Question?qid={}", form.qid)).into_response())
}

#[derive(Deserialize)]
pub struct VoteParams {
    aid: String,
    qid: String,
}

pub async fn up_vote(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<VoteParams>,
) -> Result<Response, AppError> {
    vote(&state, user, &uri, &params, 1)
}

pub async fn down_vote(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<VoteParams>,
) -> Result<Response, AppError> {
    vote(&state, user, &uri, &params, -1)
}

fn vote(
    state: &AppState,
    user: Option<User>,
    uri: &Uri,
    params: &VoteParams,
    delta: i64,
) -> Result<Response, AppError> {
    let Some(user) = user else {
        let login = state.identity.login_url(&uri.to_string());
        return Ok(Redirect::to(&login).into_response());
    };

    let key = state.answers.key(&params.aid)?;
    let mut counted = false;
    let found = state.answers.update(&key, |answer| {
        counted = answer.cast_vote(&user.id, delta);
    });
    if !found {
        return Err(AppError::NotFound);
    }
    if counted {
        info!("user {} voted {delta:+} on answer {}", user.id, params.aid);
    }

    Ok(Redirect::to(&format!("/Question?qid={}", params.qid)).into_response())
}

#[derive(Deserialize)]
pub struct EditAnswerParams {
    aid: String,
    qid: String,
    #[serde(default)]
    decision: String,
}

pub async fn edit_answer_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<EditAnswerParams>,
) -> Result<Response, AppError> {
    if user.is_none() {
        let login = state.identity.login_url(&uri.to_string());
        return Ok(Redirect::to(&login).into_response());
    }

    let answer_key = state.answers.key(&params.aid)?;
    state.questions.key(&params.qid)?;

    if params.decision == "Yes" {
        if !state.answers.delete(&answer_key) {
            return Err(AppError::NotFound);
        }
        info!("answer {} deleted", params.aid);
        return Ok(Redirect::to(&format!("/Question?qid={}", params.qid)).into_response());
    }

    let answer = state.answers.get(&answer_key).ok_or(AppError::NotFound)?;
    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::edit_answer(&session, &params.qid, &params.aid, &answer).into_response())
}

#[derive(Deserialize)]
pub struct EditAnswerForm {
    aid: String,
    qid: String,
    content: String,
}

pub async fn edit_answer(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<EditAnswerForm>,
) -> Result<Response, AppError> {
    if user.is_none() {
        let login = state.identity.login_url(&format!("/Question?qid={}", form.qid));
        return Ok(Redirect::to(&login).into_response());
    }

    let key = state.answers.key(&form.aid)?;
    let updated = state.answers.update(&key, |answer| {
        answer.content = form.content.clone();
        answer.modified_date = Some(Utc::now());
    });
    if !updated {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to(&format!("/Question?qid={}", form.qid)).into_response())
}

pub async fn album(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(user) = user else {
        let login = state.identity.login_url(&uri.to_string());
        return Ok(Redirect::to(&login).into_response());
    };

    let userinfo = ensure_user_info(&state, &user);

    let mut photos = state.photos.children_of(&user.id);
    photos.sort_by(|a, b| b.entity.created_date.cmp(&a.entity.created_date));

    let upload_url = format!(
        "{}?uid={}",
        state.blobs.create_upload_url("/Upload"),
        user.id
    );

    let session = state.identity.session_link(Some(&user), &uri.to_string());
    Ok(pages::album(&user, &userinfo, &photos, &upload_url, &session).into_response())
}

#[derive(Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    uid: String,
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut note: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                file = Some((content_type, bytes.to_vec()));
            }
            Some("note") => {
                let text = field.text().await?;
                if !text.is_empty() {
                    note = Some(text);
                }
            }
            _ => {}
        }
    }

    let (content_type, bytes) = file.ok_or(AppError::BadParam("file"))?;
    let blob_key = state.blobs.save(&content_type, bytes);
    let url = state.blobs.serving_url(&blob_key);

    if let Some(user) = user.as_ref().filter(|user| user.id == params.uid) {
        state.photos.insert(
            Some(&user.id),
            UserPhoto::new(user.author(), blob_key, url.clone(), note),
        );
        info!("user {} uploaded a photo", user.id);
    }

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::upload_done(user.as_ref(), &url, &session))
}

#[derive(Deserialize)]
pub struct DeletePhotoParams {
    pid: String,
}

pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<DeletePhotoParams>,
) -> Result<Response, AppError> {
    let key = state.photos.key(&params.pid)?;
    let photo = state.photos.get(&key).ok_or(AppError::NotFound)?;

    let Some(user) = user else {
        let login = state.identity.login_url(&uri.to_string());
        return Ok(Redirect::to(&login).into_response());
    };

    if user.id != photo.author.id {
        return Ok(Redirect::to("/Album").into_response());
    }

    state.blobs.delete(&photo.blob_key);
    state.photos.delete(&key);
    info!("user {} deleted photo {}", user.id, params.pid);

    Ok(Redirect::to("/Album").into_response())
}

pub async fn serve_blob(
    State(state): State<Arc<AppState>>,
    Path(blob_key): Path<String>,
) -> Result<Response, AppError> {
    let blob = state.blobs.get(&blob_key).ok_or(AppError::NotFound)?;

    Ok(([(header::CONTENT_TYPE, blob.content_type)], blob.bytes).into_response())
}

pub async fn about(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
) -> Markup {
    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    pages::about(&session)
}

pub async fn delete_success(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
) -> Markup {
    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    pages::delete_success(&session)
}
