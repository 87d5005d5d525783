use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::Uri,
};
use maud::Markup;
use serde::Deserialize;

use platform::{
    error::AppError,
    identity::{CurrentUser, User},
    pager::{self, PageWindow},
    store::{Row, Store},
};

use crate::{
    models::{month_counts, tag_counts, Article, ArticleQuery, DateCount, TagCount},
    pages,
    state::AppState,
};

pub const PAGE_SIZE: usize = 5;

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    tag: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    month: String,
    #[serde(default)]
    page: String,
}

/// One page of a filtered article listing, plus what the footer needs
/// to rebuild the filter links.
pub struct Listing {
    pub rows: Vec<Row<Article>>,
    pub total_pages: usize,
    pub window: PageWindow,
    pub tagstr: String,
    pub year: String,
    pub month: String,
}

/// The per-request view data every blog page shows next to its content.
pub struct Sidebar {
    pub tags: Vec<TagCount>,
    pub archive: Vec<(DateCount, Vec<Row<Article>>)>,
}

/// Absent, empty, or unparsable means the first page.
fn parse_page(raw: &str) -> usize {
    raw.parse().unwrap_or(0)
}

fn parse_opt<T: FromStr>(raw: &str, name: &'static str) -> Result<Option<T>, AppError> {
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse().map(Some).map_err(|_| AppError::BadParam(name))
}

pub(crate) fn split_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(',').map(|tag| tag.trim().to_owned()).collect()
}

pub(crate) fn listing(
    store: &Store<Article>,
    fallback: ArticleQuery,
    params: &ListParams,
) -> Result<Listing, AppError> {
    let page = parse_page(&params.page);
    let year = parse_opt(&params.year, "year")?;
    let month = parse_opt(&params.month, "month")?;

    let query = ArticleQuery::from_params(&params.tag, year, month, fallback);
    let rows = query.run(store);

    let total_pages = pager::total_pages(rows.len(), PAGE_SIZE);
    let window = pager::window(page, total_pages);
    let rows = pager::page_slice(&rows, page, PAGE_SIZE).to_vec();

    Ok(Listing {
        rows,
        total_pages,
        window,
        tagstr: params.tag.clone(),
        year: params.year.clone(),
        month: params.month.clone(),
    })
}

/// Recomputed from the store on every request; nothing is cached.
pub(crate) fn sidebar(store: &Store<Article>) -> Sidebar {
    let published = ArticleQuery::Published.run(store);
    let months = month_counts(&published);

    let archive = months
        .into_iter()
        .map(|date_count| {
            let rows = ArticleQuery::PublishedInMonth {
                year: date_count.year,
                month: date_count.month,
            }
            .run(store);
            (date_count, rows)
        })
        .collect();

    Sidebar {
        tags: tag_counts(&published),
        archive,
    }
}

pub(crate) fn is_admin(user: &Option<User>) -> bool {
    user.as_ref().is_some_and(|user| user.admin)
}

pub async fn front_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<ListParams>,
) -> Result<Markup, AppError> {
    let listing = listing(&state.articles, ArticleQuery::Published, &params)?;
    let sidebar = sidebar(&state.articles);

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::blog_home(
        is_admin(&user),
        &session,
        &listing,
        &sidebar,
    ))
}

#[derive(Deserialize)]
pub struct ArticleParams {
    aid: String,
}

pub async fn article(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
    Query(params): Query<ArticleParams>,
) -> Result<Markup, AppError> {
    let key = state.articles.key(&params.aid)?;
    let article = state.articles.get(&key).ok_or(AppError::NotFound)?;
    let sidebar = sidebar(&state.articles);

    let session = state.identity.session_link(user.as_ref(), &uri.to_string());
    Ok(pages::article_page(
        is_admin(&user),
        &session,
        &params.aid,
        &article,
        &sidebar,
    ))
}
