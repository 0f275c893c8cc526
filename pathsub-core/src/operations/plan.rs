use crate::output::PlanResult;
use crate::pattern::{MapperOptions, PathMapper};
use crate::plan::make_plan;
use crate::preview::should_use_color;
use std::path::PathBuf;

/// Plan operation - returns structured data without touching the filesystem
pub fn plan_operation(
    options: &MapperOptions,
    paths: &[PathBuf],
    use_color: Option<bool>,
) -> anyhow::Result<PlanResult> {
    let mapper = PathMapper::new(options)?;
    let plan = make_plan(|path| mapper.map_path(path), paths);

    tracing::debug!(
        "Planned {} moves, {} conflicts",
        plan.valid_moves.len(),
        plan.conflicts.len()
    );

    Ok(PlanResult {
        search: options.search.clone(),
        replace: options.replace.clone(),
        plan,
        use_color: should_use_color(use_color),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(search: &str, replace: &str) -> MapperOptions {
        MapperOptions {
            search: search.to_string(),
            replace: replace.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_operation() {
        let paths = vec![PathBuf::from("a1"), PathBuf::from("b1"), PathBuf::from("c")];
        let result = plan_operation(&options("1", "2"), &paths, Some(false)).unwrap();

        assert_eq!(result.plan.valid_moves.len(), 2);
        assert_eq!(result.exit_code(), 0);
        assert!(!result.use_color);
    }

    #[test]
    fn test_plan_operation_conflicts() {
        let paths = vec![PathBuf::from("a1"), PathBuf::from("a2")];
        let result = plan_operation(&options(r"\d", "x"), &paths, Some(false)).unwrap();

        assert!(result.has_conflicts());
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_plan_operation_invalid_pattern() {
        let paths = vec![PathBuf::from("a")];
        assert!(plan_operation(&options("[", "x"), &paths, Some(false)).is_err());
    }
}
