// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 将换行及连续空白折叠为单个空格
///
/// arXiv 的标题与摘要按 72 列硬换行，写入 CSV 或报告前需要展平。
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按字符数截断，超出时追加 `...`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// 取第一句话（以 `. ` / `? ` / `! ` 结尾），没有句号时返回全文
pub fn first_sentence(text: &str) -> &str {
    let bytes = text.as_bytes();
    for (i, window) in bytes.windows(2).enumerate() {
        if matches!(window[0], b'.' | b'?' | b'!') && window[1] == b' ' {
            return &text[..=i];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("Large Language\n  Models as\tAgents "),
            "Large Language Models as Agents"
        );
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 70), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        // multi-byte characters are not split
        assert_eq!(truncate_chars("논문논문", 2), "논문...");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(
            first_sentence("We propose X. It beats Y."),
            "We propose X."
        );
        assert_eq!(first_sentence("No terminator here"), "No terminator here");
        assert_eq!(first_sentence("Version 2.0 is out. Done."), "Version 2.0 is out.");
    }
}
