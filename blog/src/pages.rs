//! HTML pages, rendered with compile-time maud templates.
//!
//! Article bodies come out of the admin's rich-text editor and are
//! rendered as-is; everything else is escaped by maud.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use platform::identity::{encode_component, SessionLink};

use crate::{
    models::Article,
    routes::{Listing, Sidebar},
};

const STYLE: &str = "\
body { font-family: serif; max-width: 60em; margin: 1em auto; padding: 0 1em; }\
header nav a { margin-right: 1em; }\
main { display: flex; gap: 2em; }\
section.articles { flex: 3; }\
aside { flex: 1; font-family: sans-serif; }\
article { border-bottom: 1px solid #ddd; padding-bottom: 1em; }\
p.meta { color: #666; font-size: 85%; }\
nav.pages a { margin-right: 0.5em; }\
span.draft { color: #b00; font-size: 80%; }\
p.cloud a { margin-right: 0.4em; }\
.tiny { font-size: 60%; }\
.small { font-size: 80%; }\
.medium { font-size: 100%; }\
.large { font-size: 135%; }\
.huge { font-size: 170%; }\
";

fn layout(title: &str, admin: bool, session: &SessionLink, content: Markup) -> Markup {
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
                        a href="/" { "Blog" }
                        @if admin {
                            a href="/admin" { "Admin" }
                        }
                        a href=(session.url) { (session.label) }
                    }
                }
                main { (content) }
            }
        }
    }
}

fn sidebar_panel(sidebar: &Sidebar) -> Markup {
    html! {
        aside {
            h3 { "Tags" }
            @if sidebar.tags.is_empty() {
                p.meta { "Nothing tagged yet." }
            } @else {
                p.cloud {
                    @for tc in &sidebar.tags {
                        a class=(tc.css_class) href={ "/?tag=" (encode_component(&tc.tag)) } {
                            (tc.tag)
                        }
                        " "
                    }
                }
            }

            h3 { "Archive" }
            ul.archive {
                @for (date_count, rows) in &sidebar.archive {
                    li {
                        a href={ "/?year=" (date_count.year) "&month=" (date_count.month) } {
                            (date_count.label()) " (" (date_count.count) ")"
                        }
                        ul {
                            @for row in rows {
                                li {
                                    a href={ "/Article?aid=" (row.key.urlsafe()) } {
                                        (row.entity.title)
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn listing_base(path: &str, listing: &Listing) -> String {
    if !listing.tagstr.is_empty() {
        format!("{path}?tag={}&page=", encode_component(&listing.tagstr))
    } else if !listing.year.is_empty() && !listing.month.is_empty() {
        format!(
            "{path}?year={}&month={}&page=",
            listing.year, listing.month
        )
    } else {
        format!("{path}?page=")
    }
}

fn page_nav(listing: &Listing, path: &str) -> Markup {
    let base = listing_base(path, listing);
    let window = &listing.window;

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

fn article_entry(aid: &str, article: &Article, href_base: &str) -> Markup {
    html! {
        article {
            h2 { a href={ (href_base) (aid) } { (article.title) } }
            p.meta {
                (article.published_date.format("%Y/%m/%d %H:%M"))
                @if article.draft {
                    " " span.draft { "[draft]" }
                }
            }
            div.body { (PreEscaped(article.content.as_str())) }
            @if !article.tags.is_empty() {
                p.tags {
                    @for tag in &article.tags {
                        a href={ "/?tag=" (encode_component(tag)) } { (tag) }
                        " "
                    }
                }
            }
        }
    }
}

pub fn blog_home(
    admin: bool,
    session: &SessionLink,
    listing: &Listing,
    sidebar: &Sidebar,
) -> Markup {
    let content = html! {
        section.articles {
            @if listing.rows.is_empty() {
                p { "Nothing published yet." }
            }
            @for row in &listing.rows {
                (article_entry(&row.key.urlsafe(), &row.entity, "/Article?aid="))
            }
            (page_nav(listing, "/"))
        }
        (sidebar_panel(sidebar))
    };

    layout("Blog", admin, session, content)
}

pub fn article_page(
    admin: bool,
    session: &SessionLink,
    aid: &str,
    article: &Article,
    sidebar: &Sidebar,
) -> Markup {
    let content = html! {
        section.articles {
            (article_entry(aid, article, "/Article?aid="))
        }
        (sidebar_panel(sidebar))
    };

    layout(&article.title, admin, session, content)
}

pub fn admin_home(session: &SessionLink, listing: &Listing, sidebar: &Sidebar) -> Markup {
    let content = html! {
        section.articles {
            p { a href="/admin/AddArticle" { "New article" } }

            @if listing.rows.is_empty() {
                p { "No articles." }
            }
            @for row in &listing.rows {
                (article_entry(&row.key.urlsafe(), &row.entity, "/admin/Article?aid="))
                p.actions {
                    a href={ "/admin/EditArticle?aid=" (row.key.urlsafe()) } { "edit" }
                    " "
                    a href={ "/admin/DeleteArticle?aid=" (row.key.urlsafe()) } { "delete" }
                }
            }
            (page_nav(listing, "/admin"))
        }
        (sidebar_panel(sidebar))
    };

    layout("Admin", true, session, content)
}

pub fn edit_article(session: &SessionLink, aid: &str, article: &Article) -> Markup {
    let tags = article.tags.join(", ");

    let content = html! {
        section.articles {
            h1 { "Edit article" }
            form method="post" action="/admin/EditArticle" {
                input type="hidden" name="aid" value=(aid);
                p { input type="text" name="title" size="60" value=(article.title); }
                p { textarea name="content" rows="14" cols="72" { (article.content) } }
                p { input type="text" name="tags" size="40" value=(tags); }
                p {
                    label {
                        input type="radio" name="decision" value="P" checked[!article.draft];
                        " Publish"
                    }
                    label {
                        input type="radio" name="decision" value="D" checked[article.draft];
                        " Keep as draft"
                    }
                }
                p { button type="submit" { "Save" } }
            }
        }
    };

    layout("Edit article", true, session, content)
}

pub fn admin_article_page(
    session: &SessionLink,
    aid: &str,
    article: &Article,
    sidebar: &Sidebar,
) -> Markup {
    let content = html! {
        section.articles {
            (article_entry(aid, article, "/admin/Article?aid="))
            p.actions {
                a href={ "/admin/EditArticle?aid=" (aid) } { "edit" }
                " "
                a href={ "/admin/DeleteArticle?aid=" (aid) } { "delete" }
            }
        }
        (sidebar_panel(sidebar))
    };

    layout(&article.title, true, session, content)
}

pub fn page_deleted(session: &SessionLink) -> Markup {
    let content = html! {
        section.articles {
            h1 { "Deleted" }
            p { "The article was deleted. " a href="/admin" { "Back to the console" } }
        }
    };

    layout("Deleted", true, session, content)
}
