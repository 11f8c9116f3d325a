use regex::Regex;
use std::fs;
use std::path::Path;

/// Looks up a task description in `<plans_dir>/<plan_id>/tasks.md`.
///
/// Tasks are markdown checkboxes like `- [ ] 2.1 Task name` (checked or
/// not) followed by optional indented detail bullets. Returns `None` when
/// the file is missing, unreadable, or the task id does not appear.
pub fn lookup_task_description(plans_dir: &Path, plan_id: &str, task_id: &str) -> Option<String> {
    let tasks_path = plans_dir.join(plan_id).join("tasks.md");
    let content = fs::read_to_string(tasks_path).ok()?;

    let pattern = format!(
        r"- \[[ x]\] {} (.+)\n((?:[ \t]{{2,}}-.+\n)*)",
        regex::escape(task_id)
    );
    let task_pattern = Regex::new(&pattern).ok()?;

    let captures = task_pattern.captures(&content)?;
    let title = captures.get(1)?.as_str().trim();
    let details = captures.get(2).map_or("", |detail| detail.as_str()).trim();

    let combined = format!("{title} {details}");
    Some(combined.trim_end().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TASKS: &str = "\
# Plan 0041

- [x] 1.1 Set up project scaffolding
  - create directories
- [ ] 2.1 Validate eventTypes structure
  - check workflow triggers
  - confirm schema fields
- [ ] 2.2 Review react components
";

    fn plan_dir(content: &str) -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        let plan = dir.path().join("0041");
        fs::create_dir_all(&plan).expect("plan dir");
        fs::write(plan.join("tasks.md"), content).expect("tasks.md");
        dir
    }

    #[test]
    fn test_lookup_finds_task_with_details() {
        let dir = plan_dir(TASKS);
        let description = lookup_task_description(dir.path(), "0041", "2.1")
            .expect("task present");

        assert!(description.starts_with("Validate eventTypes structure"));
        assert!(description.contains("check workflow triggers"));
    }

    #[test]
    fn test_lookup_finds_checked_task() {
        let dir = plan_dir(TASKS);
        let description = lookup_task_description(dir.path(), "0041", "1.1")
            .expect("checked task present");
        assert!(description.starts_with("Set up project scaffolding"));
    }

    #[test]
    fn test_lookup_task_without_details() {
        let dir = plan_dir(TASKS);
        let description = lookup_task_description(dir.path(), "0041", "2.2")
            .expect("task present");
        assert_eq!(description, "Review react components");
    }

    #[test]
    fn test_lookup_missing_task_returns_none() {
        let dir = plan_dir(TASKS);
        assert!(lookup_task_description(dir.path(), "0041", "9.9").is_none());
    }

    #[test]
    fn test_lookup_missing_plan_returns_none() {
        let dir = plan_dir(TASKS);
        assert!(lookup_task_description(dir.path(), "0042", "2.1").is_none());
    }

    #[test]
    fn test_task_id_is_escaped_in_pattern() {
        // A dot in the task id must not act as a regex wildcard.
        let dir = plan_dir("- [ ] 2x1 Wrong task\n- [ ] 2.1 Right task\n");
        let description = lookup_task_description(dir.path(), "0041", "2.1")
            .expect("task present");
        assert_eq!(description, "Right task");
    }
}
