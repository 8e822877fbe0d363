//! Course service - education courses and their videos

use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::result::{Error, Result};
use crate::domain::validation::require;
use crate::domain::{ListQuery, Page};

const COURSES_PATH: &str = "/courses/admin";

/// Fields of a course
#[derive(Debug, Clone, Default)]
pub struct CourseInput {
    pub title: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub published: bool,
}

impl CourseInput {
    pub fn to_body(&self) -> Result<JsonValue> {
        let mut body = json!({
            "title": require("Title", &self.title)?,
            "isPublished": self.published,
        });
        if let Some(description) = self.description.as_deref() {
            body["description"] = json!(description);
        }
        if let Some(level) = self.level.as_deref() {
            body["level"] = json!(level);
        }
        Ok(body)
    }
}

/// A video added to a course
#[derive(Debug, Clone, Default)]
pub struct VideoInput {
    pub title: String,
    pub url: String,
    pub duration_secs: Option<u32>,
}

impl VideoInput {
    pub fn to_body(&self) -> Result<JsonValue> {
        let url = require("Video URL", &self.url)?;
        url::Url::parse(url).map_err(|e| Error::validation(format!("Invalid video URL: {}", e)))?;
        let mut body = json!({
            "title": require("Title", &self.title)?,
            "videoUrl": url,
        });
        if let Some(duration) = self.duration_secs {
            body["duration"] = json!(duration);
        }
        Ok(body)
    }
}

#[derive(Clone)]
pub struct CourseService {
    client: ApiClient,
}

impl CourseService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(COURSES_PATH, query).await
    }

    pub async fn get(&self, id: &str) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/{}", COURSES_PATH, id))
            .await
    }

    pub async fn create(&self, input: &CourseInput) -> Result<JsonValue> {
        self.client.post(COURSES_PATH, input.to_body()?).await
    }

    pub async fn update(&self, id: &str, input: &CourseInput) -> Result<JsonValue> {
        self.client
            .put(&format!("{}/{}", COURSES_PATH, id), input.to_body()?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<JsonValue> {
        self.client.delete(&format!("{}/{}", COURSES_PATH, id)).await
    }

    pub async fn videos(&self, course_id: &str) -> Result<Vec<JsonValue>> {
        self.client
            .get_list(&format!("{}/{}/videos", COURSES_PATH, course_id), Vec::new())
            .await
    }

    pub async fn add_video(&self, course_id: &str, input: &VideoInput) -> Result<JsonValue> {
        self.client
            .post(
                &format!("{}/{}/videos", COURSES_PATH, course_id),
                input.to_body()?,
            )
            .await
    }

    pub async fn delete_video(&self, course_id: &str, video_id: &str) -> Result<JsonValue> {
        self.client
            .delete(&format!("{}/{}/videos/{}", COURSES_PATH, course_id, video_id))
            .await
    }

    /// Set the playback order; `video_ids` must name every video once
    pub async fn reorder(&self, course_id: &str, video_ids: &[String]) -> Result<JsonValue> {
        if video_ids.is_empty() {
            return Err(Error::validation("At least one video ID is required"));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = video_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(Error::validation(format!("Video {} listed twice", dup)));
        }
        self.client
            .put(
                &format!("{}/{}/videos/reorder", COURSES_PATH, course_id),
                json!({ "videoIds": video_ids }),
            )
            .await
    }

    pub async fn stats(&self) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/stats", COURSES_PATH))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_body_requires_valid_url() {
        let mut input = VideoInput {
            title: "Risk basics".into(),
            url: "https://cdn.example.com/v/1.mp4".into(),
            duration_secs: Some(620),
        };
        let body = input.to_body().unwrap();
        assert_eq!(body["videoUrl"], "https://cdn.example.com/v/1.mp4");
        assert_eq!(body["duration"], 620);

        input.url = "not a url".into();
        assert!(input.to_body().is_err());
    }

    #[test]
    fn test_course_body() {
        let input = CourseInput {
            title: "Intro".into(),
            published: true,
            ..Default::default()
        };
        assert_eq!(input.to_body().unwrap()["isPublished"], true);
        assert!(CourseInput::default().to_body().is_err());
    }
}
