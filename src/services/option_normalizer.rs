//! 选择题选项整理
//!
//! 把富文本题干整理成有序的选项列表。判断标准是"看起来像带字母编号的选项"：
//! 去掉首尾空白后以单个大写字母开头，紧跟 `)`、`.` 或空白。
//!
//! 扫描顺序：
//! 1. 块级元素（`<p>`、`<li>`、`<div>` ...），块内的 `<br>` 拆成多行
//! 2. 没有块级元素命中时，按换行拆分纯文本
//! 3. 两者都没有命中时返回空列表，由调用方把题干当普通文本输出
//!
//! 不符合格式的内容会被丢弃，丢弃的内容记录在 [`OptionScan::dropped`] 中并打印警告。

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

fn option_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][).\s]").expect("valid option pattern"))
}

fn block_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?is)<(?:p|li|div|h[1-6]|td|pre)\b[^>]*>(.*?)</(?:p|li|div|h[1-6]|td|pre)\s*>",
        )
        .expect("valid block pattern")
    })
}

fn line_break_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(?:p|li|div|h[1-6]|td|pre|tr|ul|ol)\s*>")
            .expect("valid line break pattern")
    })
}

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

/// 选项来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSource {
    /// 来自块级元素
    Blocks,
    /// 来自纯文本按行拆分
    Lines,
    /// 没有找到任何选项
    None,
}

/// 扫描结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionScan {
    pub options: Vec<String>,
    /// 被丢弃的非空块/行
    pub dropped: Vec<String>,
    pub source: ScanSource,
}

/// 判断一段文本是否像带字母编号的选项
pub fn looks_like_option(text: &str) -> bool {
    option_pattern().is_match(text.trim())
}

/// 整理选项，只返回选项列表
pub fn normalize_options(raw_body: &str) -> Vec<String> {
    scan_options(raw_body).options
}

/// 整理选项，同时返回被丢弃的内容
pub fn scan_options(raw_body: &str) -> OptionScan {
    let blocks: Vec<String> = block_pattern()
        .captures_iter(raw_body)
        .flat_map(|caps| split_lines(&flatten_text(&caps[1])))
        .collect();

    if let Some(scan) = classify(blocks, ScanSource::Blocks) {
        return scan;
    }

    let lines = split_lines(&flatten_text(raw_body));

    if let Some(scan) = classify(lines, ScanSource::Lines) {
        return scan;
    }

    OptionScan {
        options: Vec::new(),
        dropped: Vec::new(),
        source: ScanSource::None,
    }
}

/// 把候选项分成选项和丢弃项；一个选项都没有时返回 None
fn classify(candidates: Vec<String>, source: ScanSource) -> Option<OptionScan> {
    let (options, dropped): (Vec<String>, Vec<String>) = candidates
        .into_iter()
        .partition(|text| looks_like_option(text));

    if options.is_empty() {
        return None;
    }

    for text in &dropped {
        warn!("⚠️ 选项整理丢弃了不符合格式的内容: {:?}", text);
    }

    Some(OptionScan {
        options,
        dropped,
        source,
    })
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// 块级结束标签和 `<br>` 转成换行，再去掉其余标签
fn flatten_text(raw_body: &str) -> String {
    let with_breaks = line_break_pattern().replace_all(raw_body, "\n");
    decode_entities(&tag_pattern().replace_all(&with_breaks, ""))
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_fallback() {
        let scan = scan_options("A) Paris\nB) Berlin\nC) Rome");
        assert_eq!(scan.options, vec!["A) Paris", "B) Berlin", "C) Rome"]);
        assert_eq!(scan.source, ScanSource::Lines);
        assert!(scan.dropped.is_empty());
    }

    #[test]
    fn test_block_elements_in_document_order() {
        let body = "<p>Welche Stadt ist die Hauptstadt?</p>\
                    <ul><li>A) Paris</li><li>B. <b>Berlin</b></li><li>C Rom</li></ul>";
        let scan = scan_options(body);

        assert_eq!(scan.options, vec!["A) Paris", "B. Berlin", "C Rom"]);
        assert_eq!(scan.dropped, vec!["Welche Stadt ist die Hauptstadt?"]);
        assert_eq!(scan.source, ScanSource::Blocks);
    }

    #[test]
    fn test_line_breaks_inside_block_split_options() {
        let scan = scan_options("<p>A) Paris<br>B) Berlin<br>C) Rome</p>");
        assert_eq!(scan.options, vec!["A) Paris", "B) Berlin", "C) Rome"]);
        assert_eq!(scan.source, ScanSource::Blocks);

        let scan = scan_options("<p>Frage:<br>A) eins<br/>B) zwei</p>");
        assert_eq!(scan.options, vec!["A) eins", "B) zwei"]);
        assert_eq!(scan.dropped, vec!["Frage:"]);
    }

    #[test]
    fn test_blocks_without_options_fall_back_to_lines() {
        let body = "<p>Frage:</p>\nA) eins\nB) zwei";
        let scan = scan_options(body);

        assert_eq!(scan.options, vec!["A) eins", "B) zwei"]);
        assert_eq!(scan.source, ScanSource::Lines);
        assert_eq!(scan.dropped, vec!["Frage:"]);
    }

    #[test]
    fn test_no_options_found() {
        let scan = scan_options("Beschreiben Sie das OSI-Modell.\n1) erstens");
        assert!(scan.options.is_empty());
        assert_eq!(scan.source, ScanSource::None);

        assert!(normalize_options("").is_empty());
        assert!(normalize_options("<p></p>").is_empty());
    }

    #[test]
    fn test_lowercase_and_digits_are_not_options() {
        assert!(!looks_like_option("a) klein"));
        assert!(!looks_like_option("1) Zahl"));
        assert!(!looks_like_option("AB) zwei Buchstaben"));
        assert!(looks_like_option("  D. mit Einrückung"));
    }

    #[test]
    fn test_entities_are_decoded() {
        let options = normalize_options("<li>A) Tom &amp; Jerry</li>");
        assert_eq!(options, vec!["A) Tom & Jerry"]);
    }

    #[test]
    fn test_canonical_list_is_stable() {
        let first = normalize_options("A) Paris\nB) Berlin");
        let canonical: String = first
            .iter()
            .map(|option| format!("<li>{}</li>", option))
            .collect();
        assert_eq!(normalize_options(&format!("<ol>{}</ol>", canonical)), first);
    }
}
