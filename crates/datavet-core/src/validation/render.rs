//! Report rendering
//!
//! A report reads
//!
//! ```text
//! invalid data (3 differences): [
//!     Missing('A'),
//!     Extra('B'),
//!     Extra('C'),
//! ]
//! ```
//!
//! List differences are sorted by their arguments; mapping keys are sorted
//! and the differences of each key are sorted as a bracketed list. Both
//! orders use [`Value::safe_cmp`], so mixed types never fail to sort.

use crate::validation::error::{DiffGroup, Differences, ValidationError};
use datavet_core_types::{Difference, Value};
use std::fmt;

const INDENT: &str = "    ";
const ELLIPSIS_LINE: &str = "    ...";

fn sorted(diffs: &[Difference]) -> Vec<&Difference> {
    let mut refs: Vec<&Difference> = diffs.iter().collect();
    refs.sort_by(|a, b| a.display_cmp(b));
    refs
}

fn group_repr(group: &DiffGroup) -> String {
    match group {
        DiffGroup::Single(diff) => diff.to_string(),
        DiffGroup::List(diffs) => {
            let items: Vec<String> = sorted(diffs).iter().map(|d| d.to_string()).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn report_lines(differences: &Differences) -> Box<dyn Iterator<Item = String> + '_> {
    match differences {
        Differences::List(diffs) => Box::new(
            sorted(diffs)
                .into_iter()
                .map(|diff| format!("{INDENT}{diff},")),
        ),
        Differences::Mapping(groups) => {
            let mut keys: Vec<&Value> = groups.keys().collect();
            keys.sort_by(|a, b| a.safe_cmp(b));
            Box::new(keys.into_iter().filter_map(move |key| {
                groups
                    .get(key)
                    .map(|group| format!("{INDENT}{key}: {},", group_repr(group)))
            }))
        }
    }
}

/// Write the multi-line report for `err`.
///
/// When a truncation callback is set it is consulted before keeping each
/// line, with the running line and character counts including that line.
/// Once it returns true that line and the rest are only counted, the closing bracket becomes an ellipsis and
/// the truncation notice is appended after a blank line.
pub(crate) fn write_report(err: &ValidationError, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let differences = err.differences();
    let (begin, close) = if differences.is_mapping() {
        ("{", "}")
    } else {
        ("[", "]")
    };

    let mut lines = report_lines(differences);
    let mut kept: Vec<String> = Vec::new();
    let mut line_count = 0usize;
    let mut char_count = 0usize;
    let mut truncated = false;

    while let Some(line) = lines.next() {
        line_count += 1;
        char_count += line.chars().count();
        if let Some(should_truncate) = err.truncation() {
            if should_truncate(line_count, char_count) {
                line_count += lines.by_ref().count();
                truncated = true;
                break;
            }
        }
        kept.push(line);
    }

    let plural = if line_count == 1 { "" } else { "s" };
    match err.description() {
        Some(description) => write!(
            f,
            "{description} ({line_count} difference{plural}): {begin}"
        )?,
        None => write!(f, "{line_count} difference{plural}: {begin}")?,
    }
    write!(f, "\n{}\n", kept.join("\n"))?;
    if truncated {
        f.write_str(ELLIPSIS_LINE)?;
        if let Some(notice) = err.truncation_notice() {
            write!(f, "\n\n{notice}")?;
        }
        Ok(())
    } else {
        f.write_str(close)
    }
}

/// Constructor-style repr of a differences container.
pub(crate) fn write_differences_repr(
    differences: &Differences,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match differences {
        Differences::List(diffs) => {
            let items: Vec<String> = diffs.iter().map(|d| d.to_string()).collect();
            write!(f, "[{}]", items.join(", "))
        }
        Differences::Mapping(groups) => {
            let items: Vec<String> = groups
                .iter()
                .map(|(key, group)| match group {
                    DiffGroup::Single(diff) => format!("{key}: {diff}"),
                    DiffGroup::List(diffs) => {
                        let inner: Vec<String> = diffs.iter().map(|d| d.to_string()).collect();
                        format!("{key}: [{}]", inner.join(", "))
                    }
                })
                .collect();
            write!(f, "{{{}}}", items.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_list_report_is_sorted() {
        let err = ValidationError::new(vec![
            Difference::extra("C"),
            Difference::missing("A"),
            Difference::extra("B"),
        ])
        .unwrap()
        .with_description("invalid data");
        assert_eq!(
            err.to_string(),
            "invalid data (3 differences): [\n    Missing('A'),\n    Extra('B'),\n    Extra('C'),\n]"
        );
    }

    #[test]
    fn test_single_difference_without_description() {
        let err = ValidationError::new(Difference::missing("A")).unwrap();
        assert_eq!(err.to_string(), "1 difference: [\n    Missing('A'),\n]");
    }

    #[test]
    fn test_mapping_report() {
        let groups = BTreeMap::from([
            (Value::from("B"), DiffGroup::List(vec![Difference::extra("z"), Difference::missing("y")])),
            (Value::from("A"), DiffGroup::Single(Difference::missing("x"))),
        ]);
        let err = ValidationError::new(groups)
            .unwrap()
            .with_description("invalid data");
        assert_eq!(
            err.to_string(),
            "invalid data (2 differences): {\n    'A': Missing('x'),\n    'B': [Missing('y'), Extra('z')],\n}"
        );
    }

    #[test]
    fn test_truncation() {
        let err = ValidationError::new(vec![
            Difference::missing("A"),
            Difference::missing("B"),
            Difference::missing("C"),
        ])
        .unwrap()
        .with_description("invalid data")
        .with_truncation(|lines, _chars| lines >= 2)
        .with_truncation_notice("Diff is too long.");
        assert_eq!(
            err.to_string(),
            "invalid data (3 differences): [\n    Missing('A'),\n    ...\n\nDiff is too long."
        );
    }
}
