//! Admin console: create, edit, publish, and delete articles.
//!
//! Every route here requires the admin flag from the identity service;
//! anyone else is sent back to the front page.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;

use platform::{error::AppError, identity::CurrentUser};

use crate::{
    models::{Article, ArticleQuery},
    pages,
    routes::{is_admin, listing, sidebar, split_tags, ListParams},
    state::AppState,
};

pub async fn admin_home(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    if !is_admin(&user) {
        return Ok(Redirect::to("/").into_response());
    }

    let listing = listing(&state.articles, ArticleQuery::All, &params)?;
    let sidebar = sidebar(&state.articles);

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::admin_home(&session, &listing, &sidebar).into_response())
}

pub async fn add_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Response {
    if !is_admin(&user) {
        return Redirect::to("/").into_response();
    }

    let key = state.articles.insert(None, Article::placeholder());
    info!("draft article {} created", key.urlsafe());

    Redirect::to(&format!("/admin/EditArticle?aid={}", key.urlsafe())).into_response()
}

#[derive(Deserialize)]
pub struct AdminArticleParams {
    aid: String,
}

pub async fn edit_article_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<AdminArticleParams>,
) -> Result<Response, AppError> {
    if !is_admin(&user) {
        return Ok(Redirect::to("/").into_response());
    }

    let key = state.articles.key(&params.aid)?;
    let article = state.articles.get(&key).ok_or(AppError::NotFound)?;

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::edit_article(&session, &params.aid, &article).into_response())
}

#[derive(Deserialize)]
pub struct EditArticleForm {
    aid: String,
    title: String,
    content: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    decision: String,
}

pub async fn edit_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<EditArticleForm>,
) -> Result<Response, AppError> {
    if !is_admin(&user) {
        return Ok(Redirect::to("/").into_response());
    }

    // "P" is the publish decision; anything else asks to stay a draft.
    let keep_draft = form.decision != "P";
    let tags = split_tags(&form.tags);

    let key = state.articles.key(&form.aid)?;
    let updated = state.articles.update(&key, |article| {
        article.apply_edit(
            form.title.clone(),
            form.content.clone(),
            tags.clone(),
            keep_draft,
        );
    });
    if !updated {
        return Err(AppError::NotFound);
    }
    info!("article {} saved", form.aid);

    Ok(Redirect::to(&format!("/admin/Article?aid={}", form.aid)).into_response())
}

pub async fn admin_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<AdminArticleParams>,
) -> Result<Response, AppError> {
    if !is_admin(&user) {
        return Ok(Redirect::to("/").into_response());
    }

    let key = state.articles.key(&params.aid)?;
    let article = state.articles.get(&key).ok_or(AppError::NotFound)?;
    let sidebar = sidebar(&state.articles);

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::admin_article_page(&session, &params.aid, &article, &sidebar).into_response())
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<AdminArticleParams>,
) -> Result<Response, AppError> {
    if !is_admin(&user) {
        return Ok(Redirect::to("/").into_response());
    }

    let key = state.articles.key(&params.aid)?;
    if !state.articles.delete(&key) {
        return Err(AppError::NotFound);
    }
    info!("article {} deleted", params.aid);

    Ok(Redirect::to("/admin/PageDeleted").into_response())
}

pub async fn page_deleted(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
) -> Response {
    if !is_admin(&user) {
        return Redirect::to("/").into_response();
    }

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    pages::page_deleted(&session).into_response()
}
