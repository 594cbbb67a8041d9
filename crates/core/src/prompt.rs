//! # 提示词构建
//!
//! 将结构化请求映射为发送给文本生成服务的提示词。全部为纯函数，
//! 输出只取决于输入。

/// SEO 提示词中嵌入的 HTML 片段最大字符数
pub const SEO_SNIPPET_MAX_CHARS: usize = 3000;

/// 抓取网页时读取的最大字节数，足以容纳 `SEO_SNIPPET_MAX_CHARS` 个完整的 UTF-8 字符
pub const SEO_PAGE_MAX_BYTES: usize = (SEO_SNIPPET_MAX_CHARS + 1) * 4;

/// # Summary
/// 截取前 `max_chars` 个字符 (按 Unicode 标量值计数，不会切断多字节字符)。
///
/// # Invariants
/// - 幂等：对结果再次截取得到相同结果。
pub fn truncate_snippet(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// 股票分析提示词
pub fn build_stock_analysis_prompt(date: &str, symbol: &str) -> String {
    format!(
        "{} 기준으로 종목 코드 {}에 대한 주식 시장 분석과 투자 유의사항을 알려줘.",
        date, symbol
    )
}

/// 博客写作提示词 (引言、正文、结论三段式，带小标题)
pub fn build_blog_prompt(topic: &str) -> String {
    format!(
        "'{}'이라는 주제로 블로그 글을 작성해줘. \
         서론, 본론, 결론 구조로 나누고, 친근하면서도 정보성 있게 써줘. \
         소제목도 적절히 넣고, 문단은 자연스럽게 나눠줘.",
        topic
    )
}

/// # Summary
/// SEO 评估提示词。
///
/// # Logic
/// 1. 将 HTML 截取到前 3000 个字符。
/// 2. 嵌入固定的评估模板：百分制总分、待改进要素列表、总体总结。
pub fn build_seo_prompt(html: &str) -> String {
    let snippet = truncate_snippet(html, SEO_SNIPPET_MAX_CHARS);
    format!(
        "아래 HTML은 사용자가 입력한 웹페이지입니다.\n\
         네이버 웹마스터 가이드에 따라 SEO 요소들을 점검하고, 다음 항목들을 포함해 평가해줘:\n\
         1. 전체 SEO 점수 (100점 만점 기준)\n\
         2. 개선이 필요한 요소 리스트 (meta 태그, 제목, OpenGraph, robots.txt 등)\n\
         3. 전반적인 요약\n\
         아래는 HTML입니다:\n```html\n{}\n```",
        snippet
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded_snippet(prompt: &str) -> &str {
        let start = prompt.find("```html\n").map(|i| i + "```html\n".len()).unwrap();
        let end = prompt.rfind("\n```").unwrap();
        &prompt[start..end]
    }

    #[test]
    fn test_seo_prompt_truncates_long_html() {
        let html = "a".repeat(5000);
        let prompt = build_seo_prompt(&html);
        assert_eq!(embedded_snippet(&prompt).chars().count(), 3000);
    }

    #[test]
    fn test_seo_prompt_keeps_short_html() {
        let html = "<html><head><title>t</title></head></html>";
        let prompt = build_seo_prompt(html);
        assert_eq!(embedded_snippet(&prompt), html);
    }

    #[test]
    fn test_seo_prompt_exact_boundary() {
        let html = "b".repeat(3000);
        assert_eq!(embedded_snippet(&build_seo_prompt(&html)).len(), 3000);
        let html = "b".repeat(3001);
        assert_eq!(embedded_snippet(&build_seo_prompt(&html)).len(), 3000);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let html = "한".repeat(3500);
        let cut = truncate_snippet(&html, SEO_SNIPPET_MAX_CHARS);
        assert_eq!(cut.chars().count(), 3000);
        assert_eq!(cut.len(), 9000);
        // 幂等
        assert_eq!(truncate_snippet(cut, SEO_SNIPPET_MAX_CHARS), cut);
    }

    #[test]
    fn test_prompts_are_deterministic() {
        assert_eq!(
            build_stock_analysis_prompt("20240102", "005930"),
            build_stock_analysis_prompt("20240102", "005930")
        );
        let prompt = build_stock_analysis_prompt("20240102", "005930");
        assert!(prompt.starts_with("20240102 기준으로 종목 코드 005930에"));

        let blog = build_blog_prompt("coffee");
        assert!(blog.starts_with("'coffee'이라는 주제로"));
        assert!(blog.contains("서론, 본론, 결론"));
        assert!(blog.contains("소제목"));
    }
}
