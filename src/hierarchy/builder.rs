use std::collections::{HashSet, VecDeque};

use crate::system::table::ProcessTable;

use super::Hierarchy;

/// Builds the hierarchy of every process whose name equals `name`.
///
/// A name with no matching process yields an empty hierarchy. Processes that
/// exit while the walk is in progress are dropped together with their subtree.
pub fn build_hierarchy<T: ProcessTable + ?Sized>(table: &mut T, name: &str) -> Hierarchy {
    let _span = tracing::debug_span!("hierarchy.build", name).entered();

    let roots: Vec<u32> = table
        .processes()
        .into_iter()
        .filter(|record| record.name == name)
        .map(|record| record.pid)
        .collect();

    let mut hierarchy = Hierarchy::new(name);
    for root in roots {
        match collect_descendants(table, root) {
            Some(descendants) => hierarchy.insert(root, descendants),
            None => tracing::warn!(pid = root, name, "root process exited before expansion"),
        }
    }

    tracing::debug!(
        roots = hierarchy.root_count(),
        descendants = hierarchy.descendant_count(),
        "hierarchy built"
    );
    hierarchy
}

/// Breadth-first walk below `root`. `None` if `root` itself is gone.
fn collect_descendants<T: ProcessTable + ?Sized>(table: &mut T, root: u32) -> Option<Vec<u32>> {
    let direct = table.children(root)?;

    let mut seen = HashSet::from([root]);
    let mut queue: VecDeque<u32> = direct.into_iter().filter(|pid| seen.insert(*pid)).collect();
    let mut descendants = Vec::with_capacity(queue.len());

    while let Some(pid) = queue.pop_front() {
        let Some(children) = table.children(pid) else {
            tracing::warn!(pid, root, "process exited during expansion, dropping its subtree");
            continue;
        };
        descendants.push(pid);
        queue.extend(children.into_iter().filter(|child| seen.insert(*child)));
    }

    Some(descendants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::process::ProcessRecord;
    use crate::system::table::StaticProcessTable;

    fn rec(pid: u32, ppid: u32, name: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid,
            name: name.to_string(),
            command_line: format!("{name} --run"),
            created_at: 1_700_000_000,
            priority: Some(0),
            username: Some("tester".into()),
        }
    }

    #[test]
    fn collects_transitive_descendants() {
        let mut table = StaticProcessTable::new(vec![
            rec(1, 0, "init"),
            rec(100, 1, "demo"),
            rec(101, 100, "worker"),
            rec(102, 100, "worker"),
            rec(103, 101, "helper"),
        ]);
        let h = build_hierarchy(&mut table, "demo");
        assert_eq!(h.root_count(), 1);
        assert_eq!(h.descendants(100), Some(&[101, 102, 103][..]));
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let mut table = StaticProcessTable::new(vec![rec(1, 0, "init")]);
        let h = build_hierarchy(&mut table, "missing");
        assert!(h.is_empty());
        assert_eq!(h.name, "missing");
    }

    #[test]
    fn name_match_is_exact() {
        let mut table = StaticProcessTable::new(vec![rec(10, 1, "demo"), rec(11, 1, "demo2")]);
        let h = build_hierarchy(&mut table, "demo");
        assert_eq!(h.roots().collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn cycles_terminate() {
        // pid reuse can make two processes claim each other as parent
        let mut table = StaticProcessTable::new(vec![rec(5, 6, "demo"), rec(6, 5, "other")]);
        let h = build_hierarchy(&mut table, "demo");
        assert_eq!(h.descendants(5), Some(&[6][..]));
    }

    #[test]
    fn exited_root_is_dropped() {
        let mut table =
            StaticProcessTable::new(vec![rec(100, 1, "demo"), rec(200, 1, "demo")]).exit_after_scan(100);
        let h = build_hierarchy(&mut table, "demo");
        assert_eq!(h.roots().collect::<Vec<_>>(), vec![200]);
    }
}
