use std::collections::BTreeMap;
use std::fmt::Write as _;
use winter_protocol::{ChangeSet, VersionReport};

/// Human-readable outcome of `winter version`.
pub fn render_version(report: &VersionReport, detailed: bool) -> String {
    let mut out = String::new();

    if !report.confident {
        let _ = writeln!(
            out,
            "We could not accurately determine your Winter CMS build due to the number of \
             modifications. The closest detected build is Winter CMS build {}.",
            report.build
        );
    } else if report.modified {
        let _ = writeln!(
            out,
            "Detected a modified version of Winter CMS build {}.",
            report.build
        );
    } else {
        let _ = writeln!(out, "Detected Winter CMS build {}.", report.build);
    }

    if detailed && report.modified {
        out.push('\n');
        out.push_str("We have detected the following modifications:\n");
        if let Some(changes) = &report.changes {
            render_changes(&mut out, changes);
        }
    }

    out
}

fn render_changes(out: &mut String, changes: &ChangeSet) {
    render_section(out, "Files added:", changes.added.keys());
    render_section(out, "Files modified:", changes.modified.keys());
    render_section(out, "Files removed:", changes.removed.iter());
}

fn render_section<'a>(
    out: &mut String,
    title: &str,
    files: impl ExactSizeIterator<Item = &'a String>,
) {
    if files.len() == 0 {
        return;
    }
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    for file in files {
        let _ = writeln!(out, " - {file}");
    }
}

/// `key  value` lines, one per entry, with keys padded to a common width.
pub fn render_map(map: &BTreeMap<String, String>) -> String {
    let width = map.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in map {
        let _ = writeln!(out, "{key:<width$}  {value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report(modified: bool, confident: bool) -> VersionReport {
        VersionReport {
            schema_version: 1,
            build: "1.2.3".to_string(),
            modified,
            confident,
            score: modified.then_some(75.0),
            changes: None,
        }
    }

    #[test]
    fn headline_follows_modification_and_confidence() {
        assert_eq!(
            render_version(&report(false, true), false),
            "Detected Winter CMS build 1.2.3.\n"
        );
        assert_eq!(
            render_version(&report(true, true), false),
            "Detected a modified version of Winter CMS build 1.2.3.\n"
        );
        assert!(render_version(&report(true, false), false)
            .contains("The closest detected build is Winter CMS build 1.2.3."));
    }

    #[test]
    fn detailed_output_lists_only_non_empty_sections() {
        let mut modified = report(true, true);
        let mut changes = ChangeSet::default();
        changes
            .added
            .insert("/modules/system/new.php".to_string(), "N".to_string());
        changes.removed.insert("/modules/cms/old.php".to_string());
        modified.changes = Some(changes);

        let rendered = render_version(&modified, true);
        assert_eq!(
            rendered,
            "Detected a modified version of Winter CMS build 1.2.3.\n\
             \n\
             We have detected the following modifications:\n\
             \n\
             Files added:\n - /modules/system/new.php\n\
             \n\
             Files removed:\n - /modules/cms/old.php\n"
        );
    }

    #[test]
    fn maps_are_aligned() {
        let mut map = BTreeMap::new();
        map.insert("cms".to_string(), "c1".to_string());
        map.insert("system".to_string(), "s1".to_string());
        assert_eq!(render_map(&map), "cms     c1\nsystem  s1\n");
    }
}
