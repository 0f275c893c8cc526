mod json;
mod report;

pub use json::plan_json;
pub use report::{render_report, LIMITATION_NOTE};

use std::io::{self, IsTerminal};

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color_with_detector<F>(use_color: Option<bool>, is_terminal: F) -> bool
where
    F: Fn() -> bool,
{
    match use_color {
        Some(explicit_color) => explicit_color,
        None => std::env::var_os("NO_COLOR").is_none() && is_terminal(),
    }
}

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color(use_color: Option<bool>) -> bool {
    should_use_color_with_detector(use_color, || io::stdout().is_terminal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Conflict, Plan, PlannedMove};
    use std::path::PathBuf;

    fn create_test_plan() -> Plan {
        Plan {
            valid_moves: vec![
                PlannedMove {
                    src: PathBuf::from("IMG_0001.jpg"),
                    dest: PathBuf::from("trip/0001.jpg"),
                },
                PlannedMove {
                    src: PathBuf::from("notes draft.txt"),
                    dest: PathBuf::from("notes final.txt"),
                },
            ],
            conflicts: vec![Conflict {
                sources: vec![PathBuf::from("a1"), PathBuf::from("a2")],
                dest: PathBuf::from("a3"),
            }],
        }
    }

    #[test]
    fn test_explicit_color_wins() {
        assert!(should_use_color_with_detector(Some(true), || false));
        assert!(!should_use_color_with_detector(Some(false), || true));
    }

    #[test]
    fn test_auto_color_follows_terminal() {
        if std::env::var_os("NO_COLOR").is_some() {
            return;
        }
        assert!(should_use_color_with_detector(None, || true));
        assert!(!should_use_color_with_detector(None, || false));
    }

    #[test]
    fn test_render_report_no_color() {
        let result = render_report(&create_test_plan(), false);

        assert!(result.contains("IMG_0001.jpg → trip/0001.jpg"));
        assert!(result.contains("'notes draft.txt' → 'notes final.txt'"));
        assert!(result.contains("a3"));
        assert!(result.contains(LIMITATION_NOTE));
        assert!(!result.contains('\u{1b}'));
    }

    #[test]
    fn test_render_report_with_color() {
        let result = render_report(&create_test_plan(), true);
        assert!(result.contains('\u{1b}'));
    }

    #[test]
    fn test_plan_json() {
        let json = plan_json(&create_test_plan());

        assert_eq!(json["valid_moves"].as_array().unwrap().len(), 2);
        assert_eq!(json["valid_moves"][0]["src"], "IMG_0001.jpg");
        assert_eq!(json["conflicts"][0]["dest"], "a3");
        assert_eq!(json["has_conflicts"], true);
    }
}
