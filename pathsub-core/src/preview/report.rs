use crate::operation::quote;
use crate::plan::Plan;
use nu_ansi_term::{Color, Style};
use std::fmt::Write;

/// Printed after every dry-run report: the plan only compares the listed
/// paths with each other.
pub const LIMITATION_NOTE: &str = "Note: conflicts are only detected between the paths given. \
Existing files, case-insensitive names or Unicode normalization may still cause a conflict \
when the changes are made.";

/// Render valid moves as `src → target`, then each conflict as a header
/// naming the shared target followed by its sources, one per line.
pub fn render_report(plan: &Plan, use_color: bool) -> String {
    let mut output = String::new();

    let (src_style, dest_style, arrow_style, header_style) = if use_color {
        (
            Style::new().fg(Color::Red),
            Style::new().fg(Color::Green),
            Style::new().dimmed(),
            Style::new().fg(Color::Yellow).bold(),
        )
    } else {
        (Style::new(), Style::new(), Style::new(), Style::new())
    };

    if plan.is_empty() {
        writeln!(output, "No paths would change.").unwrap();
    }

    for planned in &plan.valid_moves {
        writeln!(
            output,
            "{} {} {}",
            src_style.paint(quote(&planned.src)),
            arrow_style.paint("→"),
            dest_style.paint(quote(&planned.dest))
        )
        .unwrap();
    }

    for conflict in &plan.conflicts {
        writeln!(output).unwrap();
        writeln!(
            output,
            "{}",
            header_style.paint(format!(
                "# The following paths would all be moved to {}:",
                quote(&conflict.dest)
            ))
        )
        .unwrap();
        for src in &conflict.sources {
            writeln!(output, "{}", src_style.paint(quote(src))).unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(output, "{}", LIMITATION_NOTE).unwrap();

    output
}
