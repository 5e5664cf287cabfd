use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::chapters::build_chapters;
use crate::commands::split::extract_chapters;
use crate::pdf::outline::{chapter_bookmarks, extract_outline, flatten_outline};
use crate::pdf::PdfDocument;
use crate::selection::expand_selection;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChapterSplitRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Chapters to extract (e.g., '1,3,5-7'); all chapters if omitted")]
    pub chapters: Option<String>,
    #[schemars(description = "Output directory for chapter files (default: 'chapters')")]
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "chapters".to_string()
}

#[derive(Debug, Clone)]
pub struct ChapterServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl ChapterServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for ChapterServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ChapterServer {
    #[tool(description = "Get PDF metadata including title, author, creator, producer, creation date, and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.get_info();
                let result = PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    title: info.title,
                    author: info.author,
                    creator: info.creator,
                    producer: info.producer,
                    creation_date: info.creation_date,
                    subject: info.subject,
                    keywords: info.keywords,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Get the bookmark outline of a PDF as structured data")]
    fn pdf_outline(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        let doc = match PdfDocument::open(&path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };

        match extract_outline(&doc.doc) {
            Ok(entries) => {
                let result: Vec<OutlineEntryResult> = flatten_outline(&entries)
                    .into_iter()
                    .map(|e| OutlineEntryResult {
                        title: e.title,
                        page: e.page,
                        level: e.level,
                    })
                    .collect();
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "List the chapters a PDF would be split into, with page ranges and output filenames")]
    fn chapter_list(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match list_chapters(&path) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Split a PDF into one file per top-level bookmark. Use chapter selection syntax like '1,3,5-7' to restrict the set.")]
    fn chapter_split(&self, Parameters(req): Parameters<ChapterSplitRequest>) -> String {
        match run_split(&req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn list_chapters(path: &str) -> Result<Vec<ChapterInfoResult>> {
    let doc = PdfDocument::open(path)?;

    let bookmarks = chapter_bookmarks(&doc.doc)?;
    if bookmarks.is_empty() {
        anyhow::bail!("No bookmarks found in {}", doc.path);
    }

    let (chapters, _) = build_chapters(&bookmarks, doc.page_count());

    Ok(chapters
        .iter()
        .map(|c| ChapterInfoResult {
            number: c.number,
            title: c.title.clone(),
            start_page: c.start_page,
            end_page: c.end_page,
            page_count: c.page_count(),
            filename: c.filename(),
        })
        .collect())
}

fn run_split(req: &ChapterSplitRequest) -> Result<SplitRunResult> {
    let doc = PdfDocument::open(&req.path)?;

    let bookmarks = chapter_bookmarks(&doc.doc)?;
    if bookmarks.is_empty() {
        anyhow::bail!("No bookmarks found in {}", doc.path);
    }

    let (chapters, mut warnings) = build_chapters(&bookmarks, doc.page_count());

    let (selected, selection_warnings) =
        expand_selection(req.chapters.as_deref(), chapters.len() as u32);
    warnings.extend(selection_warnings);
    if selected.is_empty() {
        anyhow::bail!(
            "Selection {:?} matches no chapters",
            req.chapters.as_deref().unwrap_or_default()
        );
    }

    std::fs::create_dir_all(&req.output_dir)?;

    let outcomes = extract_chapters(&doc, &chapters, &selected, Path::new(&req.output_dir));

    Ok(SplitRunResult {
        output_dir: req.output_dir.clone(),
        warnings,
        chapters: outcomes
            .into_iter()
            .map(|o| ChapterSplitResult {
                number: o.number,
                title: o.title,
                page_count: o.page_count,
                filename: o.filename,
                error: o.error,
            })
            .collect(),
    })
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct OutlineEntryResult {
    pub title: String,
    pub page: Option<u32>,
    pub level: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChapterInfoResult {
    pub number: u32,
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
    pub page_count: u32,
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChapterSplitResult {
    pub number: u32,
    pub title: String,
    pub page_count: u32,
    pub filename: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitRunResult {
    pub output_dir: String,
    pub warnings: Vec<String>,
    pub chapters: Vec<ChapterSplitResult>,
}

impl ServerHandler for ChapterServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF chapter splitting tools. Use pdf_info to get document metadata, \
                 pdf_outline for the bookmark tree, chapter_list to preview the chapters \
                 a document splits into, and chapter_split to write one PDF per chapter."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = ChapterServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
