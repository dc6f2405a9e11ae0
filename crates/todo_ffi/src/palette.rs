//! UI-owned priority colors for the dropdown and list rows.

use todo_core::Priority;

/// Material 500 tint for `priority` as `#RRGGBB`.
pub fn priority_color_hex(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#F44336",
        Priority::Medium => "#FFEB3B",
        Priority::Low => "#4CAF50",
    }
}

#[cfg(test)]
mod tests {
    use super::priority_color_hex;
    use todo_core::Priority;

    #[test]
    fn each_priority_has_a_distinct_color() {
        let colors: Vec<_> = Priority::ALL.into_iter().map(priority_color_hex).collect();
        assert_eq!(colors, vec!["#F44336", "#FFEB3B", "#4CAF50"]);
    }
}
