//! Page structure generation from a free-text instruction
//!
//! Deterministic keyword expansion, not a language model: the first
//! sentence becomes the title, and mentions of video/audio/link content
//! add the matching section stubs. The admin edits and saves the result
//! like any other draft.

use chrono::Utc;
use sqlx::types::Json;
use thiserror::Error;
use tracing::info;

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::domains::pages::{ContentBody, ContentItem, Page, PageSection};
use crate::domains::sheets::slugify;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Instruction is empty")]
    EmptyInstruction,
}

/// Build the page skeleton for an instruction
pub fn build_template(instruction: &str) -> Page {
    let title = instruction
        .split(['。', '\n'])
        .next()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .unwrap_or("新規ページ")
        .to_string();

    let mut sections = vec![PageSection {
        id: "intro".to_string(),
        title: "概要".to_string(),
        items: vec![ContentItem {
            id: "intro-text".to_string(),
            title: None,
            body: ContentBody::Text {
                text: format!("{title}の要点とゴールをまとめます。"),
            },
        }],
    }];

    if instruction.contains("動画") {
        sections.push(PageSection {
            id: "videos".to_string(),
            title: "動画コンテンツ".to_string(),
            items: vec![ContentItem {
                id: "video-1".to_string(),
                title: Some("メイン動画".to_string()),
                body: ContentBody::Video {
                    url: Some("https://www.youtube.com/embed/".to_string()),
                    storage_path: None,
                },
            }],
        });
    }
    if instruction.contains("音声") {
        sections.push(PageSection {
            id: "audio".to_string(),
            title: "音声コンテンツ".to_string(),
            items: vec![ContentItem {
                id: "audio-1".to_string(),
                title: Some("補足音声".to_string()),
                body: ContentBody::Audio {
                    url: Some(String::new()),
                    storage_path: None,
                },
            }],
        });
    }
    if instruction.contains("リンク") || instruction.contains("URL") {
        sections.push(PageSection {
            id: "links".to_string(),
            title: "参考リンク".to_string(),
            items: vec![ContentItem {
                id: "link-1".to_string(),
                title: Some("参考リンク".to_string()),
                body: ContentBody::Url {
                    url: "https://example.com".to_string(),
                },
            }],
        });
    }

    let now = Utc::now();
    Page {
        slug: slugify(&title),
        title,
        description: Some("AI指示から生成したページ構成です。".to_string()),
        published: false,
        sections: Json(sections),
        ord: None,
        parent_slug: None,
        source_key: None,
        detail_pages: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub async fn generate_page(
    auth: &AuthUser,
    instruction: &str,
    deps: &ServerDeps,
) -> Result<Page, GenerateError> {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(GenerateError::EmptyInstruction);
    }

    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManagePages)
        .check(deps)
        .await?;

    let page = build_template(instruction);
    info!(slug = %page.slug, sections = page.sections.0.len(), "Page structure generated");
    Ok(page)
}
