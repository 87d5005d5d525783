//! HTML pages, rendered with compile-time maud templates.

use maud::{html, Markup, DOCTYPE};

use platform::{
    identity::{encode_component, SessionLink, User},
    pager::PageWindow,
    store::Row,
};

use crate::{
    content::render_content,
    models::{Answer, Question, UserInfo, UserPhoto},
};

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 56em; margin: 1em auto; padding: 0 1em; }\
header nav a { margin-right: 1em; }\
article.question, div.answer { border-bottom: 1px solid #ddd; padding: 0.5em 0; }\
p.meta { color: #666; font-size: 85%; }\
nav.pages a { margin-right: 0.5em; }\
img { max-width: 20em; }\
";

fn layout(title: &str, session: &SessionLink, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (STYLE) }
            }
            body {
                header {
                    nav {
                        a href="/" { "Home" }
                        a href="/Question_Home" { "Questions" }
                        a href="/Album" { "Album" }
                        a href="/About" { "About" }
                        a href=(session.url) { (session.label) }
                    }
                }
                main { (content) }
            }
        }
    }
}

fn page_nav(window: &PageWindow, base: &str) -> Markup {
    html! {
        nav.pages {
            @if let Some(first) = window.first {
                a href={ (base) (first) } { "« first" }
            }
            @if let Some(prev) = window.prev {
                a href={ (base) (prev) } { "‹ prev" }
            }
            @for page in &window.pages {
                a href={ (base) (page) } { (page + 1) }
            }
            @if let Some(next) = window.next {
                a href={ (base) (next) } { "next ›" }
            }
            @if let Some(last) = window.last {
                a href={ (base) (last) } { "last »" }
            }
        }
    }
}

fn tag_links(tags: &[String]) -> Markup {
    html! {
        @for tag in tags {
            a href={ "/Question_Home?tag=" (encode_component(tag)) } { (tag) }
            " "
        }
    }
}

pub fn home(user: Option<&User>, userinfo: Option<&UserInfo>, session: &SessionLink) -> Markup {
    let content = html! {
        h1 { "Zhidao" }
        @match user {
            Some(user) => {
                p { "Welcome back, " (user.nickname) "." }
                @if let Some(info) = userinfo {
                    p.meta { "Member since " (info.created_date.format("%Y-%m-%d")) "." }
                }
            }
            None => {
                p { "A place to ask and answer questions. " a href=(session.url) { "Sign in" } " to take part." }
            }
        }
        p { a href="/Question_Home" { "Browse questions" } }
    };

    layout("Zhidao", session, content)
}

pub fn question_home(
    user: Option<&User>,
    session: &SessionLink,
    questions: &[Row<Question>],
    tagstr: &str,
    window: &PageWindow,
) -> Markup {
    let base = format!("/Question_Home?tag={}&page=", encode_component(tagstr));

    let content = html! {
        h1 { "Questions" }

        form method="get" action="/Question_Home" {
            input type="text" name="tag" value=(tagstr) placeholder="tags, space separated";
            button type="submit" { "Filter" }
        }

        @if questions.is_empty() {
            p { "No questions yet." }
        }
        @for row in questions {
            article.question {
                h3 { a href={ "/Question?qid=" (row.key.urlsafe()) } { (row.entity.title) } }
                p.meta {
                    "asked by " (row.entity.author.nickname)
                    " on " (row.entity.created_date.format("%Y-%m-%d %H:%M"))
                }
                @if !row.entity.tags.is_empty() {
                    p.tags { (tag_links(&row.entity.tags)) }
                }
            }
        }

        (page_nav(window, &base))

        @if user.is_some() {
            h2 { "Ask a question" }
            form method="post" action="/ask" {
                p { input type="text" name="title" size="60" placeholder="Title"; }
                p { textarea name="content" rows="6" cols="60" {} }
                p { input type="text" name="tags" size="40" placeholder="tags, comma separated"; }
                p { button type="submit" { "Ask" } }
            }
        } @else {
            p { a href=(session.url) { "Sign in" } " to ask a question." }
        }
    };

    layout("Questions", session, content)
}

pub fn question_page(
    user: Option<&User>,
    session: &SessionLink,
    qid: &str,
    question: &Question,
    answers: &[Row<Answer>],
) -> Markup {
    let content = html! {
        h1 { (question.title) }
        p.meta {
            "asked by " (question.author.nickname)
            " on " (question.created_date.format("%Y-%m-%d %H:%M"))
            @if let Some(modified) = question.modified_date {
                " (edited " (modified.format("%Y-%m-%d %H:%M")) ")"
            }
        }
        div.content { (render_content(&question.content)) }
        @if !question.tags.is_empty() {
            p.tags { (tag_links(&question.tags)) }
        }
        p { a href={ "/EditQuestion?qid=" (qid) } { "Edit question" } }

        h2 { (answers.len()) " answers" }
        @for row in answers {
            div.answer {
                (render_content(&row.entity.content))
                p.meta {
                    (row.entity.vote) " votes by "
                    (row.entity.author.nickname)
                    " on " (row.entity.created_date.format("%Y-%m-%d %H:%M"))
                }
                p.actions {
                    a href={ "/upVote?aid=" (row.key.urlsafe()) "&qid=" (qid) } { "▲ up" }
                    " "
                    a href={ "/downVote?aid=" (row.key.urlsafe()) "&qid=" (qid) } { "▼ down" }
                    " "
                    a href={ "/EditAnswer?aid=" (row.key.urlsafe()) "&qid=" (qid) } { "edit" }
                }
            }
        }

        @if user.is_some() {
            h2 { "Your answer" }
            form method="post" action="/Answer" {
                input type="hidden" name="qid" value=(qid);
                p { textarea name="content" rows="4" cols="60" {} }
                p { button type="submit" { "Answer" } }
            }
        } @else {
            p { a href=(session.url) { "Sign in" } " to answer." }
        }
    };

    layout(&question.title, session, content)
}

pub fn edit_question(session: &SessionLink, qid: &str, question: &Question) -> Markup {
    let tags = question.tags.join(", ");

    let content = html! {
        h1 { "Edit question" }
        form method="post" action="/EditQuestion" {
            input type="hidden" name="qid" value=(qid);
            p { input type="text" name="title" size="60" value=(question.title); }
            p { textarea name="content" rows="6" cols="60" { (question.content) } }
            p { input type="text" name="tags" size="40" value=(tags); }
            p { button type="submit" { "Save" } }
        }
        p {
            a href={ "/EditQuestion?qid=" (qid) "&decision=Yes" } { "Delete this question" }
        }
    };

    layout("Edit question", session, content)
}

pub fn edit_answer(session: &SessionLink, qid: &str, aid: &str, answer: &Answer) -> Markup {
    let content = html! {
        h1 { "Edit answer" }
        form method="post" action="/EditAnswer" {
            input type="hidden" name="qid" value=(qid);
            input type="hidden" name="aid" value=(aid);
            p { textarea name="content" rows="4" cols="60" { (answer.content) } }
            p { button type="submit" { "Save" } }
        }
        p {
            a href={ "/EditAnswer?aid=" (aid) "&qid=" (qid) "&decision=Yes" } { "Delete this answer" }
        }
    };

    layout("Edit answer", session, content)
}

pub fn album(
    user: &User,
    userinfo: &UserInfo,
    photos: &[Row<UserPhoto>],
    upload_url: &str,
    session: &SessionLink,
) -> Markup {
    let content = html! {
        h1 { (user.nickname) "'s album" }
        p.meta { (userinfo.friends.len()) " friends" }

        @if photos.is_empty() {
            p { "No photos yet." }
        }
        @for row in photos {
            div.photo {
                img src=(row.entity.url) alt="photo";
                @if let Some(note) = &row.entity.note {
                    p { (note) }
                }
                p.meta {
                    (row.entity.created_date.format("%Y-%m-%d"))
                    " - "
                    a href={ "/DeletePhoto?pid=" (row.key.urlsafe()) } { "delete" }
                }
            }
        }

        h2 { "Upload a photo" }
        form method="post" action=(upload_url) enctype="multipart/form-data" {
            p { input type="file" name="file"; }
            p { input type="text" name="note" size="40" placeholder="note (optional)"; }
            p { button type="submit" { "Upload" } }
        }
    };

    layout("Album", session, content)
}

pub fn upload_done(user: Option<&User>, url: &str, session: &SessionLink) -> Markup {
    let content = html! {
        h1 { "Upload complete" }
        @if user.is_some() {
            img src=(url) alt="uploaded photo";
            p { a href="/Album" { "Back to album" } }
        } @else {
            p { "Sign in to keep uploads in your album." }
        }
    };

    layout("Upload", session, content)
}

pub fn about(session: &SessionLink) -> Markup {
    let content = html! {
        h1 { "About" }
        p { "Zhidao is a small question and answer community." }
    };

    layout("About", session, content)
}

pub fn delete_success(session: &SessionLink) -> Markup {
    let content = html! {
        h1 { "Deleted" }
        p { "The question was deleted. " a href="/Question_Home" { "Back to questions" } }
    };

    layout("Deleted", session, content)
}
