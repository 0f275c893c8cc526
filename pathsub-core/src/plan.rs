use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A rename with a target no other input path maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub src: PathBuf,
    pub dest: PathBuf,
}

/// Two or more distinct sources that would end up at the same path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub sources: Vec<PathBuf>,
    pub dest: PathBuf,
}

/// Filesystem-free preview of a rename batch.
///
/// Only collisions between paths in the batch itself are detected. A target
/// that already exists on disk, or two names the filesystem treats as equal
/// (case-insensitivity, Unicode normalization), only show up when the batch
/// is actually committed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub valid_moves: Vec<PlannedMove>,
    pub conflicts: Vec<Conflict>,
}

impl Plan {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.valid_moves.is_empty() && self.conflicts.is_empty()
    }
}

/// Sources mapped to one leaf name inside one target directory.
#[derive(Debug)]
struct TargetNameRecord {
    target: PathBuf,
    sources: Vec<PathBuf>,
}

#[derive(Debug, Default)]
struct DirectoryRecord {
    leaf_index: HashMap<OsString, usize>,
    names: Vec<TargetNameRecord>,
}

/// Partition the renames `map_path` implies for `paths` into valid moves and
/// same-target conflicts. Paths that map to themselves are left out.
pub fn make_plan<F, I, P>(map_path: F, paths: I) -> Plan
where
    F: Fn(&Path) -> PathBuf,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut dir_index: HashMap<PathBuf, usize> = HashMap::new();
    let mut dirs: Vec<DirectoryRecord> = Vec::new();
    let mut seen: HashSet<OsString> = HashSet::new();

    for path in paths {
        let src = path.as_ref();
        let target = map_path(src);
        // Exact spelling, so `a` and `a/` differ
        if target.as_os_str() == src.as_os_str() {
            continue;
        }
        if !seen.insert(src.as_os_str().to_os_string()) {
            // Listed twice, still one source
            continue;
        }

        let (dir, leaf) = split_target(&target);

        let dir_slot = match dir_index.get(&dir) {
            Some(&slot) => slot,
            None => {
                dirs.push(DirectoryRecord::default());
                dir_index.insert(dir, dirs.len() - 1);
                dirs.len() - 1
            },
        };
        let record = &mut dirs[dir_slot];

        let name_slot = match record.leaf_index.get(&leaf) {
            Some(&slot) => slot,
            None => {
                record.names.push(TargetNameRecord {
                    target: target.clone(),
                    sources: Vec::new(),
                });
                record.leaf_index.insert(leaf, record.names.len() - 1);
                record.names.len() - 1
            },
        };
        record.names[name_slot].sources.push(src.to_path_buf());
    }

    let mut plan = Plan::default();
    for record in dirs {
        for mut name in record.names {
            if name.sources.len() == 1 {
                plan.valid_moves.push(PlannedMove {
                    src: name.sources.remove(0),
                    dest: name.target,
                });
            } else {
                plan.conflicts.push(Conflict {
                    sources: name.sources,
                    dest: name.target,
                });
            }
        }
    }

    plan
}

fn split_target(target: &Path) -> (PathBuf, OsString) {
    match (target.parent(), target.file_name()) {
        (Some(parent), Some(name)) => (parent.to_path_buf(), name.to_os_string()),
        // Roots and `..`-terminated paths have no leaf of their own
        _ => (target.to_path_buf(), OsString::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn replace_digits(path: &Path) -> PathBuf {
        PathBuf::from(
            path.to_string_lossy()
                .replace('1', "3")
                .replace('2', "3"),
        )
    }

    #[test]
    fn test_without_conflicts() {
        let map_path = |p: &Path| PathBuf::from(p.to_string_lossy().replace('1', "2"));

        let plan = make_plan(map_path, ["a", "b1", "c1"]);

        assert!(!plan.has_conflicts());
        assert_eq!(
            plan.valid_moves,
            vec![
                PlannedMove {
                    src: "b1".into(),
                    dest: "b2".into()
                },
                PlannedMove {
                    src: "c1".into(),
                    dest: "c2".into()
                },
            ]
        );
        assert!(plan.conflicts.is_empty());
    }

    #[test]
    fn test_with_conflicts() {
        let plan = make_plan(replace_digits, ["a", "b1", "b2", "c1"]);

        assert!(plan.has_conflicts());
        assert_eq!(
            plan.valid_moves,
            vec![PlannedMove {
                src: "c1".into(),
                dest: "c3".into()
            }]
        );
        assert_eq!(
            plan.conflicts,
            vec![Conflict {
                sources: vec!["b1".into(), "b2".into()],
                dest: "b3".into(),
            }]
        );
    }

    #[test]
    fn test_groups_by_directory_first() {
        let map_path = |p: &Path| PathBuf::from(p.to_string_lossy().replace("src", "out"));

        let plan = make_plan(map_path, ["src/a", "x/src", "src/b"]);

        let dests: Vec<_> = plan.valid_moves.iter().map(|m| m.dest.clone()).collect();
        assert_eq!(
            dests,
            vec![
                PathBuf::from("out/a"),
                PathBuf::from("out/b"),
                PathBuf::from("x/out")
            ]
        );
    }

    #[test]
    fn test_duplicate_inputs_count_once() {
        let plan = make_plan(replace_digits, ["b1", "b1"]);

        assert!(!plan.has_conflicts());
        assert_eq!(plan.valid_moves.len(), 1);
    }

    #[test]
    fn test_unchanged_paths_are_skipped() {
        let plan = make_plan(|p: &Path| p.to_path_buf(), ["x", "y"]);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_paths_compare_by_exact_spelling() {
        let plan = make_plan(|p: &Path| PathBuf::from(format!("{}/", p.display())), ["a"]);
        assert_eq!(plan.valid_moves.len(), 1);
        assert_eq!(plan.valid_moves[0].dest.as_os_str(), "a/");

        // `a` and `a/` are two sources, not one listed twice
        let plan = make_plan(|_: &Path| PathBuf::from("b"), ["a", "a/"]);
        assert!(plan.valid_moves.is_empty());
        assert_eq!(plan.conflicts.len(), 1);
        assert_eq!(plan.conflicts[0].sources.len(), 2);
        assert_eq!(plan.conflicts[0].sources[1].as_os_str(), "a/");
    }

    #[test]
    fn test_existing_unrelated_target_is_not_a_conflict() {
        // `b3` is also an input but maps to itself, so the planner cannot tell
        let plan = make_plan(replace_digits, ["b1", "b3"]);

        assert!(!plan.has_conflicts());
        assert_eq!(plan.valid_moves.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_plan_partitions_changed_paths(
            names in proptest::collection::vec("[ab]{1,2}/[abc12]{1,3}", 0..12)
        ) {
            let plan = make_plan(replace_digits, &names);

            let changed: HashSet<PathBuf> = names
                .iter()
                .map(PathBuf::from)
                .filter(|p| replace_digits(p) != *p)
                .collect();

            let mut placed: Vec<PathBuf> = plan.valid_moves.iter().map(|m| m.src.clone()).collect();
            for conflict in &plan.conflicts {
                prop_assert!(conflict.sources.len() >= 2);
                let distinct: HashSet<_> = conflict.sources.iter().collect();
                prop_assert_eq!(distinct.len(), conflict.sources.len());
                placed.extend(conflict.sources.iter().cloned());
            }

            // Every changed path lands in exactly one place
            prop_assert_eq!(placed.len(), changed.len());
            let placed_set: HashSet<PathBuf> = placed.into_iter().collect();
            prop_assert_eq!(placed_set, changed);

            let dests: HashSet<_> = plan.valid_moves.iter().map(|m| &m.dest).collect();
            prop_assert_eq!(dests.len(), plan.valid_moves.len());
        }
    }
}
