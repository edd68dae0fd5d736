use anyhow::Context;
use contracts::dashboards::d410_marketing_tests::{Frame, Interaction};
use std::io::{BufRead, Write};

use super::session::MarketingDashboard;

/// Line protocol over one session: the first frame carries the full table,
/// then one view frame per accepted interaction line.
///
/// Lines that are not UTF-8 or not a valid interaction are logged and
/// skipped. Only I/O failures on the streams end the loop.
pub fn run_session(
    dashboard: &mut MarketingDashboard,
    mut input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    let session = dashboard.open_session();

    write_frame(&mut output, &Frame::Table(dashboard.table_data()))?;
    let view = dashboard.process_interaction(session, Interaction::Refresh)?;
    write_frame(&mut output, &Frame::View(Box::new(view)))?;

    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("reading interaction")?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::warn!("Ignoring interaction line {}: not UTF-8 ({})", line_no, e);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        let interaction: Interaction = match serde_json::from_str(line) {
            Ok(interaction) => interaction,
            Err(e) => {
                tracing::warn!("Ignoring malformed interaction {:?}: {}", line, e);
                continue;
            }
        };

        let view = dashboard.process_interaction(session, interaction)?;
        write_frame(&mut output, &Frame::View(Box::new(view)))?;
    }

    dashboard.close_session(session)?;
    Ok(())
}

fn write_frame(out: &mut impl Write, frame: &Frame) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, frame)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_marketing_tests::loader::parse_table;
    use std::sync::Arc;

    const FIXTURE: &str = "\
Example,Test Type,Impressions
a1,A,100
b1,B,300
";

    fn run(input: &[u8]) -> Vec<Frame> {
        let mut dashboard =
            MarketingDashboard::new(Arc::new(parse_table(FIXTURE, "fixture").unwrap()));
        let mut output = Vec::new();
        run_session(&mut dashboard, input, &mut output).unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn row_counts(frames: &[Frame]) -> Vec<usize> {
        frames
            .iter()
            .filter_map(|f| match f {
                Frame::View(view) => Some(view.summary.row_count),
                Frame::Table(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_first_frame_is_full_table() {
        let frames = run(b"");
        assert!(matches!(&frames[0], Frame::Table(table) if table.rows.len() == 2));
        assert_eq!(row_counts(&frames), vec![2]);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let input = b"{\"action\":\"toggle\",\"category\":\"B\"}\n\xff\xfe\n{\"action\":\"refresh\"}\n";
        let frames = run(input);
        assert_eq!(frames.len(), 4);
        assert_eq!(row_counts(&frames), vec![2, 1, 1]);
    }

    #[test]
    fn test_malformed_json_and_blank_lines_are_skipped() {
        let input = b"not json\n\n{\"action\":\"toggle\",\"category\":\"A\"}";
        let frames = run(input);
        assert_eq!(row_counts(&frames), vec![2, 1]);
    }
}
