//! 题号生成
//!
//! 顶层题目: `"1"`, `"2"`, ...；子题目: `"<父题号>.<字母>"`，例如 `"1.a"`。

/// 顶层题号（`position` 从 1 开始）
pub fn top_level_label(position: usize) -> String {
    position.to_string()
}

/// 子题号（`position` 从 1 开始）
pub fn child_label(parent: &str, position: usize) -> String {
    format!("{}.{}", parent, letter(position))
}

/// 1 → "a", 26 → "z", 27 → "aa", 28 → "ab" ...
///
/// 双射 26 进制，任何正整数都有唯一的字母编号。`position` 为 0 时返回空串。
pub fn letter(position: usize) -> String {
    let mut n = position;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_sequence() {
        assert_eq!(letter(1), "a");
        assert_eq!(letter(2), "b");
        assert_eq!(letter(26), "z");
        assert_eq!(letter(27), "aa");
        assert_eq!(letter(52), "az");
        assert_eq!(letter(53), "ba");
        assert_eq!(letter(0), "");
    }

    #[test]
    fn test_labels() {
        assert_eq!(top_level_label(3), "3");
        assert_eq!(child_label("1", 2), "1.b");
        assert_eq!(child_label("1.b", 1), "1.b.a");
    }
}
