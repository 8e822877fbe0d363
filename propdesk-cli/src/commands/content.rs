//! Content commands - news, blogs and FAQs

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use propdesk_core::services::content::category_names;
use propdesk_core::services::{ArticleInput, FaqInput, ImageUpload};
use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, Column};

const ARTICLE_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Title", "title"),
    ("Category", "category"),
    ("Status", "status"),
    ("Created", "createdAt"),
];

const FAQ_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Question", "question"),
    ("Category", "category"),
    ("Order", "order"),
];

/// Fields of a news article or blog post
#[derive(Args, Debug, Clone)]
pub struct ArticleArgs {
    #[arg(long)]
    title: String,
    /// Body text, or @path to read it from a file
    #[arg(long)]
    content: String,
    #[arg(long)]
    category: Option<String>,
    /// Tags, comma separated
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
    /// Cover image file
    #[arg(long)]
    image: Option<PathBuf>,
    /// Publish immediately instead of saving a draft
    #[arg(long)]
    publish: bool,
}

impl ArticleArgs {
    fn into_input(self) -> Result<ArticleInput> {
        let content = match self.content.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path)?,
            None => self.content,
        };
        let image = self.image.as_deref().map(ImageUpload::from_path).transpose()?;
        Ok(ArticleInput {
            title: self.title,
            content,
            category: self.category,
            tags: self.tags,
            published: self.publish,
            image,
        })
    }
}

/// Fields of a FAQ entry
#[derive(Args, Debug, Clone)]
pub struct FaqArgs {
    #[arg(long)]
    question: String,
    #[arg(long)]
    answer: String,
    #[arg(long)]
    category: Option<String>,
    /// Position in the FAQ list
    #[arg(long)]
    order: Option<u32>,
}

impl From<FaqArgs> for FaqInput {
    fn from(args: FaqArgs) -> Self {
        FaqInput {
            question: args.question,
            answer: args.answer,
            category: args.category,
            order: args.order,
        }
    }
}

#[derive(Subcommand)]
pub enum ContentCommands {
    /// List news articles
    News {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        category: Option<String>,
    },
    /// Create a news article
    NewsCreate {
        #[command(flatten)]
        article: ArticleArgs,
        #[arg(long)]
        json: bool,
    },
    /// Replace a news article
    NewsUpdate {
        id: String,
        #[command(flatten)]
        article: ArticleArgs,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a news article
    NewsDelete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// News categories
    NewsCategories {
        #[arg(long)]
        json: bool,
    },
    /// News statistics
    NewsStats {
        #[arg(long)]
        json: bool,
    },
    /// List blog posts
    Blogs {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        category: Option<String>,
    },
    /// Create a blog post
    BlogCreate {
        #[command(flatten)]
        article: ArticleArgs,
        #[arg(long)]
        json: bool,
    },
    /// Replace a blog post
    BlogUpdate {
        id: String,
        #[command(flatten)]
        article: ArticleArgs,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a blog post
    BlogDelete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Blog categories
    BlogCategories {
        #[arg(long)]
        json: bool,
    },
    /// List FAQs
    Faqs {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one FAQ
    Faq {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a FAQ
    FaqCreate {
        #[command(flatten)]
        faq: FaqArgs,
        #[arg(long)]
        json: bool,
    },
    /// Replace a FAQ
    FaqUpdate {
        id: String,
        #[command(flatten)]
        faq: FaqArgs,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a FAQ
    FaqDelete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

fn print_categories(title: &str, categories: &[serde_json::Value]) {
    let names = category_names(categories);
    if names.is_empty() {
        output::info(&format!("No {} yet", title.to_lowercase()));
        return;
    }
    let mut table = output::create_table();
    table.set_header(vec![title]);
    for name in names {
        table.add_row(vec![name]);
    }
    println!("{}", table);
}

pub async fn run(command: ContentCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.content_service;
    let query = ListQuery::new(ctx.config.page_size);

    match command {
        ContentCommands::News { list, category } => {
            let query = list.query(&ctx).filter_opt("category", category.as_deref());
            let page = with_spinner("Loading news...", svc.news(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("News", &page, ARTICLE_COLUMNS);
        }
        ContentCommands::NewsCreate { article, json } => {
            let created = svc.create_news(article.into_input()?).await?;
            if json {
                return print_json(&created);
            }
            output::success("✓ News article created");
        }
        ContentCommands::NewsUpdate {
            id,
            article,
            force,
            json,
        } => {
            let input = article.into_input()?;
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "content news-update",
                    resource: "news",
                    id: &id,
                    prompt: format!("Replace news article {}?", id),
                },
                force,
                json,
                || svc.update_news(&id, input),
                || svc.news(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("News", &page, ARTICLE_COLUMNS);
            }
        }
        ContentCommands::NewsDelete { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "content news-delete",
                    resource: "news",
                    id: &id,
                    prompt: format!("Delete news article {}?", id),
                },
                force,
                json,
                || svc.delete_news(&id),
                || svc.news(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("News", &page, ARTICLE_COLUMNS);
            }
        }
        ContentCommands::NewsCategories { json } => {
            let categories = svc.news_categories().await?;
            if json {
                return print_json(&categories);
            }
            print_categories("Categories", &categories);
        }
        ContentCommands::NewsStats { json } => {
            let stats = with_spinner("Loading news stats...", svc.news_stats()).await?;
            if json {
                return print_json(&stats);
            }
            output::print_stats("News", &stats);
        }
        ContentCommands::Blogs { list, category } => {
            let query = list.query(&ctx).filter_opt("category", category.as_deref());
            let page = with_spinner("Loading blogs...", svc.blogs(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Blogs", &page, ARTICLE_COLUMNS);
        }
        ContentCommands::BlogCreate { article, json } => {
            let created = svc.create_blog(article.into_input()?).await?;
            if json {
                return print_json(&created);
            }
            output::success("✓ Blog post created");
        }
        ContentCommands::BlogUpdate {
            id,
            article,
            force,
            json,
        } => {
            let input = article.into_input()?;
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "content blog-update",
                    resource: "blog",
                    id: &id,
                    prompt: format!("Replace blog post {}?", id),
                },
                force,
                json,
                || svc.update_blog(&id, input),
                || svc.blogs(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Blogs", &page, ARTICLE_COLUMNS);
            }
        }
        ContentCommands::BlogDelete { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "content blog-delete",
                    resource: "blog",
                    id: &id,
                    prompt: format!("Delete blog post {}?", id),
                },
                force,
                json,
                || svc.delete_blog(&id),
                || svc.blogs(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Blogs", &page, ARTICLE_COLUMNS);
            }
        }
        ContentCommands::BlogCategories { json } => {
            let categories = svc.blog_categories().await?;
            if json {
                return print_json(&categories);
            }
            print_categories("Categories", &categories);
        }
        ContentCommands::Faqs { list } => {
            let page = with_spinner("Loading FAQs...", svc.faqs(&list.query(&ctx))).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("FAQs", &page, FAQ_COLUMNS);
        }
        ContentCommands::Faq { id, json } => {
            let faq = svc.faq(&id).await?;
            if json {
                return print_json(&faq);
            }
            output::print_record(&faq);
        }
        ContentCommands::FaqCreate { faq, json } => {
            let created = svc.create_faq(&faq.into()).await?;
            if json {
                return print_json(&created);
            }
            output::success("✓ FAQ created");
        }
        ContentCommands::FaqUpdate {
            id,
            faq,
            force,
            json,
        } => {
            let input = FaqInput::from(faq);
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "content faq-update",
                    resource: "faq",
                    id: &id,
                    prompt: format!("Replace FAQ {}?", id),
                },
                force,
                json,
                || svc.update_faq(&id, &input),
                || svc.faq(&id),
            )
            .await?;
            if let (Some(faq), false) = (refreshed, json) {
                output::print_record(&faq);
            }
        }
        ContentCommands::FaqDelete { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "content faq-delete",
                    resource: "faq",
                    id: &id,
                    prompt: format!("Delete FAQ {}?", id),
                },
                force,
                json,
                || svc.delete_faq(&id),
                || svc.faqs(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("FAQs", &page, FAQ_COLUMNS);
            }
        }
    }

    Ok(())
}
