// src/catalog.rs
//! Feed source catalog: ordered categories, each holding ordered sources.
//!
//! The catalog is configuration: loaded once per run, never mutated. The
//! built-in seed mirrors the production feed set; a TOML config file can
//! replace it wholesale.

use serde::Deserialize;

/// One feed source. `limit` caps how many entries a single fetch may
/// contribute; values below 1 are clamped during config validation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
    #[serde(default = "default_source_limit")]
    pub limit: usize,
}

fn default_source_limit() -> usize {
    5
}

/// A named group of sources. Declaration order is meaningful: the grouped
/// briefing renders categories and sources in this order.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    #[serde(default, rename = "category")]
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Iterate `(category, source)` pairs in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = (&Category, &Source)> {
        self.categories
            .iter()
            .flat_map(|c| c.sources.iter().map(move |s| (c, s)))
    }

    pub fn source_count(&self) -> usize {
        self.categories.iter().map(|c| c.sources.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.source_count() == 0
    }

    /// Built-in feed set used when no config file is present.
    pub fn default_seed() -> Self {
        let mut categories = Vec::new();

        for (name, sources) in [
            (
                "技术资讯",
                &[
                    ("Hacker News", "https://hnrss.org/frontpage"),
                    ("极客公园", "https://www.geekpark.net/feed"),
                    ("36氪", "https://36kr.com/feed/"),
                    ("钛媒体", "https://www.tmtpost.com/feed"),
                    ("InfoQ", "https://www.infoq.com/feed/"),
                    ("TechCrunch", "https://techcrunch.com/feed/"),
                    ("The Verge", "https://www.theverge.com/rss/index.xml"),
                ][..],
            ),
            (
                "投资/金融",
                &[
                    ("华尔街见闻", "https://wallstreetcn.com/rss"),
                    ("财新网", "http://www.caixin.com/atom.xml"),
                    ("经济观察报", "https://www.eeo.com.cn/feed/"),
                    ("Bloomberg", "https://feeds.bloomberg.com/markets/news.rss"),
                ][..],
            ),
            (
                "AI/科技前沿",
                &[
                    ("OpenAI Blog", "https://openai.com/blog/rss.xml"),
                    ("Anthropic Blog", "https://www.anthropic.com/rss.xml"),
                    ("MIT Tech Review", "https://www.technologyreview.com/feed/"),
                    ("Wired Tech", "https://www.wired.com/feed/category/tech/latest/rss"),
                ][..],
            ),
        ] {
            categories.push(Category {
                name: name.to_string(),
                sources: sources
                    .iter()
                    .map(|(n, u)| Source {
                        name: (*n).to_string(),
                        url: (*u).to_string(),
                        limit: default_source_limit(),
                    })
                    .collect(),
            });
        }

        Self { categories }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_ordered_and_nonempty() {
        let cat = Catalog::default_seed();
        assert_eq!(cat.categories.len(), 3);
        assert_eq!(cat.categories[0].name, "技术资讯");
        assert!(cat.source_count() > 10);

        let first = cat.sources().next().unwrap();
        assert_eq!(first.1.name, "Hacker News");
        assert_eq!(first.1.limit, 5);
    }

    #[test]
    fn catalog_parses_from_toml() {
        let toml_str = r#"
[[category]]
name = "测试"

[[category.sources]]
name = "Feed A"
url = "https://a.example/rss"
limit = 3

[[category.sources]]
name = "Feed B"
url = "https://b.example/rss"
"#;
        let cat: Catalog = toml::from_str(toml_str).unwrap();
        assert_eq!(cat.source_count(), 2);
        assert_eq!(cat.categories[0].sources[0].limit, 3);
        // missing limit falls back to the default
        assert_eq!(cat.categories[0].sources[1].limit, 5);
    }
}
