//! Course commands - education courses and their videos

use anyhow::Result;
use clap::Subcommand;

use propdesk_core::services::{CourseInput, VideoInput};
use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, Column};

const COURSE_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Title", "title"),
    ("Level", "level"),
    ("Published", "isPublished"),
    ("Created", "createdAt"),
];

const VIDEO_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Title", "title"),
    ("URL", "videoUrl"),
    ("Duration (s)", "duration"),
];

#[derive(Subcommand)]
pub enum CoursesCommands {
    /// List courses
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one course
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a course
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// beginner, intermediate or advanced
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        publish: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a course
    Delete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Videos of a course, in playback order
    Videos {
        course_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Add a video to a course
    AddVideo {
        course_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        /// Length in seconds
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Remove a video from a course
    DeleteVideo {
        course_id: String,
        video_id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Set the playback order of a course's videos
    Reorder {
        course_id: String,
        /// Every video ID, in the new order
        #[arg(required = true)]
        video_ids: Vec<String>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Course statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn print_videos(videos: &[serde_json::Value]) {
    if videos.is_empty() {
        output::info("No videos yet");
        return;
    }
    println!("{}", output::records_table(videos, VIDEO_COLUMNS));
}

pub async fn run(command: CoursesCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.course_service;
    let query = ListQuery::new(ctx.config.page_size);

    match command {
        CoursesCommands::List { list } => {
            let page = with_spinner("Loading courses...", svc.list(&list.query(&ctx))).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Courses", &page, COURSE_COLUMNS);
        }
        CoursesCommands::Show { id, json } => {
            let course = svc.get(&id).await?;
            if json {
                return print_json(&course);
            }
            output::print_record(&course);
        }
        CoursesCommands::Create {
            title,
            description,
            level,
            publish,
            json,
        } => {
            let input = CourseInput {
                title,
                description,
                level,
                published: publish,
            };
            let created = svc.create(&input).await?;
            if json {
                return print_json(&created);
            }
            output::success(&format!("✓ Course {} created", input.title.trim()));
        }
        CoursesCommands::Delete { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "courses delete",
                    resource: "course",
                    id: &id,
                    prompt: format!("Delete course {} and its videos?", id),
                },
                force,
                json,
                || svc.delete(&id),
                || svc.list(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Courses", &page, COURSE_COLUMNS);
            }
        }
        CoursesCommands::Videos { course_id, json } => {
            let videos = with_spinner("Loading videos...", svc.videos(&course_id)).await?;
            if json {
                return print_json(&videos);
            }
            print_videos(&videos);
        }
        CoursesCommands::AddVideo {
            course_id,
            title,
            url,
            duration,
            json,
        } => {
            let input = VideoInput {
                title,
                url,
                duration_secs: duration,
            };
            let created = svc.add_video(&course_id, &input).await?;
            if json {
                return print_json(&created);
            }
            output::success(&format!("✓ Video {} added", input.title.trim()));
        }
        CoursesCommands::DeleteVideo {
            course_id,
            video_id,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "courses delete-video",
                    resource: "video",
                    id: &video_id,
                    prompt: format!("Remove video {} from course {}?", video_id, course_id),
                },
                force,
                json,
                || svc.delete_video(&course_id, &video_id),
                || svc.videos(&course_id),
            )
            .await?;
            if let (Some(videos), false) = (refreshed, json) {
                print_videos(&videos);
            }
        }
        CoursesCommands::Reorder {
            course_id,
            video_ids,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "courses reorder",
                    resource: "course",
                    id: &course_id,
                    prompt: format!("Reorder {} videos of course {}?", video_ids.len(), course_id),
                },
                force,
                json,
                || svc.reorder(&course_id, &video_ids),
                || svc.videos(&course_id),
            )
            .await?;
            if let (Some(videos), false) = (refreshed, json) {
                print_videos(&videos);
            }
        }
        CoursesCommands::Stats { json } => {
            let stats = with_spinner("Loading course stats...", svc.stats()).await?;
            if json {
                return print_json(&stats);
            }
            output::print_stats("Courses", &stats);
        }
    }

    Ok(())
}
