use crate::config::Settings;
use crate::llm_adapter::LlmAdapterRegistry;
use crate::response_parser::{self, Brief};
use crate::types::Result;
use crate::utils::text::truncate_chars;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

pub const PROMPT_CONTENT_CHARS: usize = 6000;
pub const PREVIEW_CHARS: usize = 280;
pub const CATEGORY_SCAN_CHARS: usize = 600;
pub const FALLBACK_SENTENCES: usize = 3;
pub const PLACEHOLDER_SUMMARY: &str = "本文暂无可用摘要，请查看原文。";
pub const DEFAULT_CATEGORY: &str = "新闻";

/// Keyword groups in priority order; the first group with a hit wins.
const CATEGORY_RULES: [(&[&str], &str); 5] = [
    (&["security", "vulnerability", "漏洞", "攻击"], "安全更新"),
    (&["tutorial", "guide", "how to", "指南", "教程"], "技术分享"),
    (&["beta", "launch", "new", "update", "发布", "上线"], "功能更新"),
    (&["report", "trend", "analysis", "洞察", "报告"], "趋势洞察"),
    (&["event", "webinar", "conference", "活动", "峰会"], "活动预告"),
];

/// Produces a [`Brief`] for every article, whatever the provider situation.
pub struct Summarizer {
    registry: LlmAdapterRegistry,
}

impl Summarizer {
    pub fn new(registry: LlmAdapterRegistry) -> Self {
        Self { registry }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(LlmAdapterRegistry::from_settings(settings)?))
    }

    /// Summarizer that only ever uses the heuristic fallback.
    pub fn heuristic_only() -> Self {
        Self::new(LlmAdapterRegistry::new())
    }

    /// Try each provider in order, accepting the first response that parses
    /// into a structured brief; otherwise fall back to the heuristic.
    pub async fn summarize(&self, title: &str, content: &str) -> Brief {
        let prompt = build_prompt(title, content);

        for provider in self.registry.providers() {
            let name = provider.provider_name();
            match provider.complete(&prompt).await {
                Ok(raw) => match response_parser::parse(&raw) {
                    Some(brief) => {
                        info!("Summarized \"{}\" with {}", title, name);
                        return brief;
                    }
                    None => warn!("{} returned an unstructured response, trying next provider", name),
                },
                Err(e) => warn!("{} failed: {}", name, e),
            }
        }

        debug!("Using heuristic summary for \"{}\"", title);
        heuristic_brief(title, content)
    }
}

pub fn build_prompt(title: &str, content: &str) -> String {
    format!(
        "请阅读以下博客文章内容，用简洁的中文撰写一段 3-5 句的摘要，突出核心问题、解决方案和影响。\
         请输出 JSON，包含两个字段：category（2-6 字的中文标签，概括文章类型，\
         例如“技术分享”“功能更新”“新闻”等），summary（摘要正文，不包含 Markdown 或多余引号）。\
         文章标题：{}\n\n正文：\n{}",
        title,
        truncate_chars(content, PROMPT_CONTENT_CHARS)
    )
}

/// Deterministic brief used when no provider produced one.
pub fn heuristic_brief(title: &str, content: &str) -> Brief {
    let sentences = split_sentences(content);
    let mut preview = sentences
        .iter()
        .take(FALLBACK_SENTENCES)
        .copied()
        .collect::<String>()
        .trim()
        .to_string();

    if preview.is_empty() {
        preview = truncate_chars(content, PREVIEW_CHARS).trim().to_string();
    }
    if preview.is_empty() {
        preview = PLACEHOLDER_SUMMARY.to_string();
    }

    Brief::new(infer_category(title, content), preview)
}

fn sentence_break() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[。！？]\s+").expect("valid sentence pattern"))
}

/// Split after `。`, `！` or `？` when followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for found in sentence_break().find_iter(text) {
        let terminal_len = text[found.start()..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        sentences.push(&text[start..found.start() + terminal_len]);
        start = found.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

pub fn infer_category(title: &str, content: &str) -> String {
    let haystack = format!("{}\n{}", title, truncate_chars(content, CATEGORY_SCAN_CHARS)).to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| haystack.contains(keyword)))
        .map_or(DEFAULT_CATEGORY, |(_, category)| *category)
        .to_string()
}
