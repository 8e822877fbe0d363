//! Content service - news, blogs and FAQs
//!
//! FAQ routes exist in both plural (`/content/admin/faqs`) and singular
//! (`/content/admin/faq`) form depending on the backend release. Every FAQ
//! call tries the plural route first and falls back to the singular one on
//! 404. A single FAQ that neither route serves is looked up in the list.

use std::path::Path;

use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::api::ApiClient;
use crate::domain::fields::record_id;
use crate::domain::result::{Error, Result};
use crate::domain::validation::require;
use crate::domain::{ListQuery, Page};
use crate::ports::FormPart;

pub const NEWS_PATH: &str = "/news/admin";
pub const BLOGS_PATH: &str = "/blogs/admin";
pub const FAQ_ROUTES: [&str; 2] = ["/content/admin/faqs", "/content/admin/faq"];

/// An image attached to a news article or blog post
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl ImageUpload {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        let mime = match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("png") => Some("image/png"),
            Some("jpg") | Some("jpeg") => Some("image/jpeg"),
            Some("gif") => Some("image/gif"),
            Some("webp") => Some("image/webp"),
            _ => None,
        };
        Ok(Self {
            file_name,
            bytes,
            mime: mime.map(String::from),
        })
    }

    fn into_part(self) -> FormPart {
        FormPart::File {
            name: "image".to_string(),
            file_name: self.file_name,
            bytes: self.bytes,
            mime: self.mime,
        }
    }
}

/// Fields of a news article or blog post
#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub image: Option<ImageUpload>,
}

impl ArticleInput {
    /// Validate and render as multipart form parts
    pub fn into_parts(self) -> Result<Vec<FormPart>> {
        let title = require("Title", &self.title)?.to_string();
        let content = require("Content", &self.content)?.to_string();

        let mut parts = vec![
            FormPart::text("title", title),
            FormPart::text("content", content),
            FormPart::text("status", if self.published { "published" } else { "draft" }),
        ];
        if let Some(category) = self.category.filter(|c| !c.trim().is_empty()) {
            parts.push(FormPart::text("category", category.trim()));
        }
        if !self.tags.is_empty() {
            parts.push(FormPart::text("tags", self.tags.join(",")));
        }
        if let Some(image) = self.image {
            parts.push(image.into_part());
        }
        Ok(parts)
    }
}

/// A FAQ entry
#[derive(Debug, Clone, Default)]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub order: Option<u32>,
}

impl FaqInput {
    pub fn to_body(&self) -> Result<JsonValue> {
        let mut body = json!({
            "question": require("Question", &self.question)?,
            "answer": require("Answer", &self.answer)?,
        });
        if let Some(category) = self.category.as_deref() {
            body["category"] = json!(category);
        }
        if let Some(order) = self.order {
            body["order"] = json!(order);
        }
        Ok(body)
    }
}

/// News, blogs and FAQs
#[derive(Clone)]
pub struct ContentService {
    client: ApiClient,
}

impl ContentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // === News ===

    /// News articles (`category`, `status`, `search`)
    pub async fn news(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(NEWS_PATH, query).await
    }

    pub async fn create_news(&self, input: ArticleInput) -> Result<JsonValue> {
        self.client
            .post_multipart(NEWS_PATH, input.into_parts()?)
            .await
    }

    pub async fn update_news(&self, id: &str, input: ArticleInput) -> Result<JsonValue> {
        self.client
            .put_multipart(&format!("{}/{}", NEWS_PATH, id), input.into_parts()?)
            .await
    }

    pub async fn delete_news(&self, id: &str) -> Result<JsonValue> {
        self.client.delete(&format!("{}/{}", NEWS_PATH, id)).await
    }

    pub async fn news_categories(&self) -> Result<Vec<JsonValue>> {
        self.client
            .get_list(&format!("{}/categories", NEWS_PATH), Vec::new())
            .await
    }

    pub async fn news_stats(&self) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/stats", NEWS_PATH))
            .await
    }

    // === Blogs ===

    pub async fn blogs(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(BLOGS_PATH, query).await
    }

    pub async fn create_blog(&self, input: ArticleInput) -> Result<JsonValue> {
        self.client
            .post_multipart(BLOGS_PATH, input.into_parts()?)
            .await
    }

    pub async fn update_blog(&self, id: &str, input: ArticleInput) -> Result<JsonValue> {
        self.client
            .put_multipart(&format!("{}/{}", BLOGS_PATH, id), input.into_parts()?)
            .await
    }

    pub async fn delete_blog(&self, id: &str) -> Result<JsonValue> {
        self.client.delete(&format!("{}/{}", BLOGS_PATH, id)).await
    }

    pub async fn blog_categories(&self) -> Result<Vec<JsonValue>> {
        self.client
            .get_list(&format!("{}/categories", BLOGS_PATH), Vec::new())
            .await
    }

    // === FAQs ===

    /// FAQ list. Falls back from the plural to the singular route; when
    /// both are missing the 404 policy decides between empty and error.
    pub async fn faqs(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        let mut last_err = None;
        for route in FAQ_ROUTES {
            match self.client.get(route, query.to_pairs()).await {
                Ok(body) => return Ok(Page::from_response(&body, query.page, query.limit)),
                Err(e) if e.is_not_found() => {
                    debug!(route, "FAQ route missing, trying next");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        if FAQ_ROUTES.iter().any(|r| self.client.not_found_is_empty(r)) {
            return Ok(Page::empty(query.limit));
        }
        Err(last_err.unwrap_or_else(|| Error::not_found("FAQ routes")))
    }

    /// One FAQ: by-id routes first, then a lookup in the full list
    pub async fn faq(&self, id: &str) -> Result<JsonValue> {
        for route in FAQ_ROUTES {
            match self.client.get_object(&format!("{}/{}", route, id)).await {
                Ok(faq) => return Ok(faq),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }

        let all = self.faqs(&ListQuery::new(super::AGGREGATE_LIMIT)).await?;
        all.items
            .into_iter()
            .find(|faq| record_id(faq).as_deref() == Some(id))
            .ok_or_else(|| Error::not_found(format!("FAQ {}", id)))
    }

    pub async fn create_faq(&self, input: &FaqInput) -> Result<JsonValue> {
        let body = input.to_body()?;
        self.with_faq_route("", |client, path| {
            let body = body.clone();
            async move { client.post(&path, body).await }
        })
        .await
    }

    pub async fn update_faq(&self, id: &str, input: &FaqInput) -> Result<JsonValue> {
        let body = input.to_body()?;
        self.with_faq_route(id, |client, path| {
            let body = body.clone();
            async move { client.put(&path, body).await }
        })
        .await
    }

    pub async fn delete_faq(&self, id: &str) -> Result<JsonValue> {
        self.with_faq_route(id, |client, path| async move { client.delete(&path).await })
            .await
    }

    /// Run a FAQ mutation against the plural route, then the singular one
    /// if the first answers 404
    async fn with_faq_route<F, Fut>(&self, id: &str, call: F) -> Result<JsonValue>
    where
        F: Fn(ApiClient, String) -> Fut,
        Fut: std::future::Future<Output = Result<JsonValue>>,
    {
        let mut last_err = None;
        for route in FAQ_ROUTES {
            let path = if id.is_empty() {
                route.to_string()
            } else {
                format!("{}/{}", route, id)
            };
            match call(self.client.clone(), path).await {
                Err(e) if e.is_not_found() => last_err = Some(e),
                other => return other,
            }
        }
        Err(last_err.unwrap_or_else(|| Error::not_found("FAQ routes")))
    }
}

/// Flatten a categories response to display names
pub fn category_names(categories: &[JsonValue]) -> Vec<String> {
    categories
        .iter()
        .filter_map(|c| match c {
            JsonValue::String(s) => Some(s.clone()),
            other => other
                .get("name")
                .and_then(|n| n.as_str())
                .map(String::from),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_parts() {
        let input = ArticleInput {
            title: "Payout day".into(),
            content: "Payouts run Friday".into(),
            category: Some("announcements".into()),
            tags: vec!["payout".into(), "schedule".into()],
            published: true,
            image: Some(ImageUpload {
                file_name: "cover.png".into(),
                bytes: vec![1, 2, 3],
                mime: Some("image/png".into()),
            }),
        };
        let parts = input.into_parts().unwrap();
        let names: Vec<&str> = parts.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["title", "content", "status", "category", "tags", "image"]);
        assert_eq!(parts[2], FormPart::text("status", "published"));
        assert_eq!(parts[4], FormPart::text("tags", "payout,schedule"));
    }

    #[test]
    fn test_article_requires_title() {
        let input = ArticleInput {
            content: "body".into(),
            ..Default::default()
        };
        assert!(input.into_parts().is_err());
    }

    #[test]
    fn test_category_names() {
        let categories = vec![json!("Markets"), json!({"name": "Platform"}), json!({"slug": "x"})];
        assert_eq!(category_names(&categories), vec!["Markets", "Platform"]);
    }

    #[test]
    fn test_faq_body() {
        let input = FaqInput {
            question: "How do payouts work?".into(),
            answer: "Bi-weekly.".into(),
            order: Some(2),
            ..Default::default()
        };
        let body = input.to_body().unwrap();
        assert_eq!(body["order"], 2);
        assert!(FaqInput::default().to_body().is_err());
    }
}
