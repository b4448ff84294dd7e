//! 分值汇总
//!
//! 有子题目的题目，其有效分值永远等于子题目有效分值之和，
//! 作者录入的 `points` 只在没有子题目时生效。分值只在这里计算，从不缓存。
//! 求和按饱和加法进行；超出 `i64` 范围的输入由 [`crate::services::validate_exam`] 拒绝。

use crate::models::Question;

/// 有效分值
pub fn effective_points(question: &Question) -> i64 {
    if !question.has_children() {
        question.points
    } else {
        question
            .children
            .iter()
            .map(effective_points)
            .fold(0, i64::saturating_add)
    }
}

/// 题目标题中的分值说明
///
/// - 叶子题目: `"(5 Punkte)"`
/// - 有子题目: `"(10 + 10 = 20 Punkte)"`
pub fn points_caption(question: &Question) -> String {
    if !question.has_children() {
        return format!("({} Punkte)", question.points);
    }

    let parts: Vec<String> = question
        .children
        .iter()
        .map(|child| effective_points(child).to_string())
        .collect();
    format!(
        "({} = {} Punkte)",
        parts.join(" + "),
        effective_points(question)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_uses_stored_points() {
        assert_eq!(effective_points(&Question::open("a", 7, 2)), 7);
        assert_eq!(effective_points(&Question::open("a", -3, 2)), -3);
    }

    #[test]
    fn test_parent_ignores_stored_points() {
        let parent = Question::open("p", 99, 0)
            .with_child(Question::open("a", 10, 1))
            .with_child(Question::open("b", 10, 1));

        assert_eq!(effective_points(&parent), 20);
        assert_eq!(points_caption(&parent), "(10 + 10 = 20 Punkte)");
    }

    #[test]
    fn test_nested_aggregation() {
        let inner = Question::open("inner", 50, 0)
            .with_child(Question::open("x", 1, 0))
            .with_child(Question::open("y", 2, 0));
        let outer = Question::open("outer", 0, 0)
            .with_child(inner)
            .with_child(Question::true_false("z", 4));

        assert_eq!(effective_points(&outer), 7);
        assert_eq!(points_caption(&outer), "(3 + 4 = 7 Punkte)");
    }

    #[test]
    fn test_extreme_points_do_not_panic() {
        let parent = Question::open("p", 0, 0)
            .with_child(Question::open("a", i64::MAX, 0))
            .with_child(Question::open("b", 1, 0));
        assert_eq!(effective_points(&parent), i64::MAX);
    }

    #[test]
    fn test_leaf_caption() {
        assert_eq!(points_caption(&Question::open("a", 5, 0)), "(5 Punkte)");
    }
}
