use std::collections::HashSet;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use scraper::{Html, Selector};
use serde::Serialize;
use tokio::time::sleep;

const DOMAIN: &str = "https://news.nifty.com";
const POLITE_DELAY: Duration = Duration::from_secs(3);
const START_PAGES: u32 = 4;

/// One news category's crawl configuration: where to find its listing pages
/// and the path prefix an article link must carry to belong to it.
struct CategoryConfig {
    name: &'static str,
    listing_base: &'static str,
    article_prefix: &'static str,
}

const CATEGORIES: &[CategoryConfig] = &[
    CategoryConfig {
        name: "society",
        listing_base: "https://news.nifty.com/domestic/society/",
        article_prefix: "/article/domestic/society/",
    },
    CategoryConfig {
        name: "government",
        listing_base: "https://news.nifty.com/domestic/government/",
        article_prefix: "/article/domestic/government/",
    },
    CategoryConfig {
        name: "sports",
        listing_base: "https://news.nifty.com/sports/athletic/",
        article_prefix: "/article/sports/athletic/",
    },
    CategoryConfig {
        name: "technology",
        listing_base: "https://news.nifty.com/technology/techall/",
        article_prefix: "/article/technology/techall/",
    },
    CategoryConfig {
        name: "entame",
        listing_base: "https://news.nifty.com/entame/showbizd/",
        article_prefix: "/article/entame/showbizd/",
    },
    CategoryConfig {
        name: "movie",
        listing_base: "https://news.nifty.com/entame/movie/",
        article_prefix: "/article/entame/movie/",
    },
    CategoryConfig {
        name: "music",
        listing_base: "https://news.nifty.com/entame/music/",
        article_prefix: "/article/entame/music/",
    },
    CategoryConfig {
        name: "anime",
        listing_base: "https://news.nifty.com/entame/anime/",
        article_prefix: "/article/entame/anime/",
    },
    CategoryConfig {
        name: "gourmet",
        listing_base: "https://news.nifty.com/item/gourmet/",
        article_prefix: "/article/item/gourmet/",
    },
];

#[derive(Serialize)]
struct Article {
    id: String,
    category: String,
    url: String,
    title: String,
    body: String,
}

/// Politely scrape news.nifty.com into `<output_path>/<category>/<id>.json`
/// files, one per article, skipping ids already on disk (spec §6's crawler
/// collaborator).
#[derive(Parser)]
#[command(name = "crawler")]
struct Cli {
    /// Maximum number of articles to fetch per category.
    #[arg(long, default_value_t = 100)]
    article_nums: usize,

    /// Output directory.
    #[arg(short = 'o', long = "output_path", default_value = "output")]
    output_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .context("installing Ctrl+C handler")?;

    let client = reqwest::Client::builder()
        .user_agent("news-crawler/0.1")
        .timeout(Duration::from_secs(10))
        .build()?;

    for category in CATEGORIES {
        if interrupted.load(Ordering::SeqCst) {
            println!("\nスクレイピングを終了します");
            return Ok(());
        }
        if let Err(err) =
            crawl_category(&client, category, &cli.output_path, cli.article_nums, &interrupted)
                .await
        {
            tracing::warn!(category = category.name, %err, "category crawl failed");
        }
    }
    Ok(())
}

async fn crawl_category(
    client: &reqwest::Client,
    category: &CategoryConfig,
    output_root: &PathBuf,
    article_nums: usize,
    interrupted: &AtomicBool,
) -> Result<()> {
    println!("\ncategory: {}", category.name);
    let output_dir = output_root.join(category.name);
    create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let urls = collect_article_urls(client, category, interrupted).await?;

    let article_selector = Selector::parse("div.article_body").expect("valid selector");
    let title_selector = Selector::parse("title").expect("valid selector");

    let mut fetched = 0usize;
    for url in urls {
        if interrupted.load(Ordering::SeqCst) || fetched >= article_nums {
            break;
        }

        let full_url = if url.starts_with(DOMAIN) {
            url.clone()
        } else {
            format!("{DOMAIN}{url}")
        };
        let id = article_id(&full_url);
        let file_path = output_dir.join(format!("{id}.json"));
        if file_path.exists() {
            println!("  Article page URL: {full_url} -> Already exists");
            continue;
        }

        print!("  Article page URL: {full_url}");
        sleep(POLITE_DELAY).await;
        let html = match fetch(client, &full_url).await {
            Some(html) => html,
            None => {
                println!(" -> Failure");
                continue;
            }
        };
        fetched += 1;
        println!(" -> Success ({fetched} / {article_nums})");

        let document = Html::parse_document(&html);
        let title = document
            .select(&title_selector)
            .next()
            .map(|node| node.text().collect::<String>())
            .unwrap_or_default();
        let body = document
            .select(&article_selector)
            .next()
            .map(|node| node.text().collect::<String>())
            .unwrap_or_default();

        let article = Article {
            id: id.clone(),
            category: category.name.to_string(),
            url: full_url,
            title: title.trim().to_string(),
            body: body.trim().to_string(),
        };
        let json = serde_json::to_string_pretty(&article).context("serializing article")?;
        std::fs::write(&file_path, json)
            .with_context(|| format!("writing {}", file_path.display()))?;
    }
    Ok(())
}

async fn collect_article_urls(
    client: &reqwest::Client,
    category: &CategoryConfig,
    interrupted: &AtomicBool,
) -> Result<Vec<String>> {
    let link_selector = Selector::parse("ul.widget_boxlist_set a").expect("valid selector");
    let mut urls = HashSet::new();

    for page in 1..=START_PAGES {
        if interrupted.load(Ordering::SeqCst) {
            break;
        }
        let listing_url = format!("{}{page}", category.listing_base);
        print!("Top page URL: {listing_url}");
        sleep(POLITE_DELAY).await;
        let html = match fetch(client, &listing_url).await {
            Some(html) => html,
            None => {
                println!(" -> Failure");
                break;
            }
        };
        println!(" -> Success");

        let document = Html::parse_document(&html);
        for link in document.select(&link_selector) {
            if let Some(href) = link.value().attr("href") {
                if href.starts_with(category.article_prefix) && href.len() > category.article_prefix.len() {
                    urls.insert(href.to_string());
                }
            }
        }
    }

    let mut urls: Vec<String> = urls.into_iter().collect();
    urls.sort();
    Ok(urls)
}

async fn fetch(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = client.get(url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.text().await.ok()
}

/// The article id is the last non-empty path segment of its URL, mirroring
/// `original_source/crawler.py`'s `get_article_id`.
fn article_id(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
