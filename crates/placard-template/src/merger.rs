//! Run-fragment merger.
//!
//! Word splits text into runs at arbitrary points (spell checking, editing
//! history, formatting changes), so a token like `{{fecha_evento}}` may end
//! up as `{{fec` + `ha_ev` + `ento}}`. The merger scans the runs of one
//! paragraph left to right, grows a scan group until its buffer holds a
//! complete token (and does not end in the start of another one),
//! substitutes, and writes the result into the first run of the group.
//!
//! ```text
//! runs:    [ "Fecha: " ][ "{{fec" ][ "ha_ev" ][ "ento}}" ][ <br> ][ "!" ]
//! group:   [--------------- one scan group ----------------]
//! result:  [ "Fecha: 12 May" ][ "" ][ "" ][ "" ][ <br> ][ "!" ]
//! ```
//!
//! Runs with empty text and special content (breaks, drawings) close the
//! current group and are never part of one.

use crate::marker::MarkerSet;
use crate::run::MutableTextRun;

/// Substitute every complete marker token in `runs`, including tokens split
/// across run boundaries.
///
/// Returns the number of runs whose text was rewritten. A paragraph whose
/// concatenated text holds no token is not touched at all.
pub fn merge_runs<R: MutableTextRun>(runs: &mut [R], markers: &MarkerSet) -> usize {
    if runs.is_empty() || markers.is_empty() {
        return 0;
    }

    let full: String = runs.iter().map(MutableTextRun::text).collect();
    if !markers.contains_any(&full) {
        return 0;
    }

    let mut rewritten = 0;
    let mut index = 0;

    while index < runs.len() {
        if is_barrier(&runs[index]) {
            index += 1;
            continue;
        }

        let start = index;
        let mut buffer = String::new();
        loop {
            buffer.push_str(&runs[index].text());
            index += 1;
            let complete =
                markers.contains_any(&buffer) && !markers.ends_with_partial_token(&buffer);
            if complete || index >= runs.len() || is_barrier(&runs[index]) {
                break;
            }
        }

        // An incomplete token leaves the group exactly as it was
        if let Some(value) = markers.substitute(&buffer) {
            rewritten += write_group(&mut runs[start..index], &value);
        }
    }

    tracing::trace!(runs = runs.len(), rewritten, "Merged paragraph runs");
    rewritten
}

/// Empty run carrying a break or drawing that must survive verbatim.
fn is_barrier<R: MutableTextRun>(run: &R) -> bool {
    run.has_special_content() && run.text().is_empty()
}

/// Concentrate `value` in the first run of `group` and clear the others.
fn write_group<R: MutableTextRun>(group: &mut [R], value: &str) -> usize {
    let Some((first, rest)) = group.split_first_mut() else {
        return 0;
    };

    let mut rewritten = 0;
    if first.text() != value {
        first.set_text(value);
        rewritten += 1;
    }
    for run in rest {
        if !run.text().is_empty() {
            run.set_text("");
            rewritten += 1;
        }
    }
    rewritten
}
