use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use platform::store::{Row, Store};

#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub published_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub draft: bool,
}

impl Article {
    /// The empty draft the admin console creates before first edit.
    pub fn placeholder() -> Self {
        Self {
            title: "place your new article's title here".to_string(),
            content: "Content goes here".to_string(),
            published_date: Utc::now(),
            tags: Vec::new(),
            draft: true,
        }
    }

    /// Apply an admin edit. Publication is sticky: once an article has
    /// left the draft state it stays published no matter what the form
    /// asks for.
    pub fn apply_edit(
        &mut self,
        title: String,
        content: String,
        tags: Vec<String>,
        keep_draft: bool,
    ) {
        self.title = title;
        self.content = content;
        self.tags = tags;
        self.draft = self.draft && keep_draft;
    }
}

/// Which articles a view works over.
pub enum ArticleQuery {
    All,
    Published,
    PublishedWithAnyTag(Vec<String>),
    PublishedInMonth { year: i32, month: u32 },
}

impl ArticleQuery {
    /// Resolve the request's filter parameters. A tag search wins over
    /// a year/month pair; with neither, `fallback` applies.
    pub fn from_params(
        tag: &str,
        year: Option<i32>,
        month: Option<u32>,
        fallback: ArticleQuery,
    ) -> ArticleQuery {
        let tags: Vec<String> = tag.split(' ').map(str::to_owned).collect();
        if !tags[0].is_empty() {
            return ArticleQuery::PublishedWithAnyTag(tags);
        }

        if let (Some(year), Some(month)) = (year, month) {
            return ArticleQuery::PublishedInMonth { year, month };
        }

        fallback
    }

    /// Matching articles, newest first.
    pub fn run(&self, store: &Store<Article>) -> Vec<Row<Article>> {
        let mut rows = store.rows();

        match self {
            ArticleQuery::All => {}
            ArticleQuery::Published => rows.retain(|row| !row.entity.draft),
            ArticleQuery::PublishedWithAnyTag(tags) => rows.retain(|row| {
                !row.entity.draft && row.entity.tags.iter().any(|tag| tags.contains(tag))
            }),
            ArticleQuery::PublishedInMonth { year, month } => {
                let range = month_range(*year, *month);
                rows.retain(|row| {
                    !row.entity.draft
                        && range.is_some_and(|(start, end)| {
                            let day = row.entity.published_date.date_naive();
                            start <= day && day < end
                        })
                });
            }
        }

        rows.sort_by(|a, b| b.entity.published_date.cmp(&a.entity.published_date));
        rows
    }
}

/// `[first-of-month, first-of-next-month)`, rolling December into the
/// next year. None for an impossible year/month pair.
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;

    Some((start, end))
}

/// A tag with its frequency and tag-cloud weight class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
    pub css_class: &'static str,
}

/// Count tags across the given articles and weight each for display.
/// Ordered by count descending, ties broken by tag name.
pub fn tag_counts(published: &[Row<Article>]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in published {
        for tag in &row.entity.tags {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    let Some(maximum) = counts.values().copied().max() else {
        return Vec::new();
    };

    let mut result: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
            css_class: tier(count * 100 / maximum),
        })
        .collect();

    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    result
}

fn tier(percent: usize) -> &'static str {
    match percent {
        0..=20 => "tiny",
        21..=40 => "small",
        41..=60 => "medium",
        61..=80 => "large",
        _ => "huge",
    }
}

/// A calendar month and how many articles it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCount {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

impl DateCount {
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Bucket the given articles per calendar month, newest month first.
/// Counted per day first, then the day counts roll up into months.
pub fn month_counts(published: &[Row<Article>]) -> Vec<DateCount> {
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for row in published {
        *per_day
            .entry(row.entity.published_date.date_naive())
            .or_insert(0) += 1;
    }

    let mut per_month: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for (day, count) in per_day {
        *per_month.entry((day.year(), day.month())).or_insert(0) += count;
    }

    per_month
        .into_iter()
        .rev()
        .map(|((year, month), count)| DateCount { year, month, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article_on(title: &str, tags: &[&str], year: i32, month: u32, day: u32) -> Article {
        Article {
            title: title.to_string(),
            content: String::new(),
            published_date: Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            draft: false,
        }
    }

    fn draft_on(title: &str, tags: &[&str], year: i32, month: u32, day: u32) -> Article {
        Article {
            draft: true,
            ..article_on(title, tags, year, month, day)
        }
    }

    fn store_with(articles: Vec<Article>) -> Store<Article> {
        let store = Store::new("article");
        for article in articles {
            store.insert(None, article);
        }
        store
    }

    #[test]
    fn tag_weights_span_the_tiers() {
        let mut articles = Vec::new();
        for i in 0..10 {
            articles.push(article_on(&format!("a{i}"), &["a"], 2024, 1, 1 + i));
        }
        articles.push(article_on("b1", &["b"], 2024, 2, 1));
        articles.push(article_on("b2", &["b"], 2024, 2, 2));
        let store = store_with(articles);

        let counts = tag_counts(&ArticleQuery::Published.run(&store));

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].tag, "a");
        assert_eq!(counts[0].count, 10);
        assert_eq!(counts[0].css_class, "huge");
        assert_eq!(counts[1].tag, "b");
        assert_eq!(counts[1].count, 2);
        assert_eq!(counts[1].css_class, "tiny");
    }

    #[test]
    fn no_tags_means_no_cloud() {
        let store = store_with(vec![article_on("untagged", &[], 2024, 1, 1)]);
        assert!(tag_counts(&ArticleQuery::Published.run(&store)).is_empty());
    }

    #[test]
    fn equal_counts_order_by_tag_name() {
        let store = store_with(vec![article_on("x", &["zebra", "apple"], 2024, 1, 1)]);

        let tags: Vec<String> = tag_counts(&ArticleQuery::Published.run(&store))
            .into_iter()
            .map(|tc| tc.tag)
            .collect();

        assert_eq!(tags, vec!["apple", "zebra"]);
    }

    #[test]
    fn months_bucket_and_sort_descending() {
        let store = store_with(vec![
            article_on("jan a", &[], 2024, 1, 5),
            article_on("jan b", &[], 2024, 1, 5),
            article_on("jan c", &[], 2024, 1, 20),
            article_on("feb", &[], 2024, 2, 1),
        ]);

        let months = month_counts(&ArticleQuery::Published.run(&store));

        assert_eq!(
            months,
            vec![
                DateCount {
                    year: 2024,
                    month: 2,
                    count: 1
                },
                DateCount {
                    year: 2024,
                    month: 1,
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn december_rolls_into_the_next_year() {
        let store = store_with(vec![
            article_on("dec 1st", &[], 2024, 12, 1),
            article_on("dec 31st", &[], 2024, 12, 31),
            article_on("new year", &[], 2025, 1, 1),
        ]);

        let titles: Vec<String> = ArticleQuery::PublishedInMonth {
            year: 2024,
            month: 12,
        }
        .run(&store)
        .into_iter()
        .map(|row| row.entity.title)
        .collect();

        assert_eq!(titles, vec!["dec 31st", "dec 1st"]);
    }

    #[test]
    fn impossible_months_match_nothing() {
        let store = store_with(vec![article_on("jan", &[], 2024, 1, 1)]);

        assert!(month_range(2024, 13).is_none());
        assert!(ArticleQuery::PublishedInMonth {
            year: 2024,
            month: 13
        }
        .run(&store)
        .is_empty());
    }

    #[test]
    fn drafts_stay_out_of_public_views() {
        let store = store_with(vec![
            article_on("live", &["rust"], 2024, 1, 1),
            draft_on("hidden", &["rust"], 2024, 1, 2),
        ]);

        let published = ArticleQuery::Published.run(&store);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].entity.title, "live");

        assert_eq!(tag_counts(&published)[0].count, 1);
        assert_eq!(month_counts(&published)[0].count, 1);

        let by_tag = ArticleQuery::PublishedWithAnyTag(vec!["rust".to_string()]).run(&store);
        assert_eq!(by_tag.len(), 1);

        assert_eq!(ArticleQuery::All.run(&store).len(), 2);
    }

    #[test]
    fn tag_search_wins_over_month_search() {
        let query = ArticleQuery::from_params("rust", Some(2024), Some(1), ArticleQuery::Published);
        assert!(matches!(query, ArticleQuery::PublishedWithAnyTag(_)));

        let query = ArticleQuery::from_params("", Some(2024), Some(1), ArticleQuery::Published);
        assert!(matches!(query, ArticleQuery::PublishedInMonth { .. }));

        let query = ArticleQuery::from_params("", None, None, ArticleQuery::Published);
        assert!(matches!(query, ArticleQuery::Published));
    }

    #[test]
    fn publishing_is_sticky() {
        let mut article = Article::placeholder();
        assert!(article.draft);

        // Saving while still a draft keeps it a draft.
        article.apply_edit("t".into(), "c".into(), vec![], true);
        assert!(article.draft);

        // The publish decision flips it.
        article.apply_edit("t".into(), "c".into(), vec![], false);
        assert!(!article.draft);

        // Asking for draft again does not un-publish.
        article.apply_edit("t".into(), "c".into(), vec![], true);
        assert!(!article.draft);
    }
}
