//! Terminal rendering for persisted draws and statistics.

use std::io::{self, Write};

use fc3d_core::{DigitStats, DrawResult, DrawType, LatestView, Snapshot};

const BAR_WIDTH: usize = 30;

// ── Public API ──

/// Print the latest draw as a vertical card.
pub fn print_latest_card(out: &mut impl Write, view: &LatestView) -> io::Result<()> {
    let draw = &view.latest;
    writeln!(out, "=== 第 {} 期 ===", draw.period())?;
    writeln!(out, "{}", balls(draw))?;
    writeln!(out)?;
    writeln!(out, "  {:<12} {}", "date", draw.date())?;
    writeln!(out, "  {:<12} {}", "sum", draw.sum())?;
    writeln!(out, "  {:<12} {}", "span", draw.span())?;
    writeln!(
        out,
        "  {:<12} {} ({})",
        "type",
        draw.draw_type().as_str(),
        draw.draw_type().label_zh()
    )?;
    if let Some(note) = draw.note() {
        writeln!(out, "  {:<12} {}", "note", note)?;
    }
    writeln!(
        out,
        "  {:<12} {}",
        "updated",
        view.update_time.format("%Y-%m-%d %H:%M:%S")
    )?;
    Ok(())
}

/// Records whose period contains `search` (all when `None`), newest first,
/// at most `limit`.
pub fn filter_history<'a>(
    snapshot: &'a Snapshot,
    search: Option<&str>,
    limit: usize,
) -> Vec<&'a DrawResult> {
    snapshot
        .data
        .iter()
        .filter(|d| search.is_none_or(|s| d.period().contains(s)))
        .take(limit)
        .collect()
}

/// Print one line per draw.
pub fn print_history(out: &mut impl Write, rows: &[&DrawResult]) -> io::Result<()> {
    if rows.is_empty() {
        writeln!(out, "(no matching draws)")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<9} {:<10}  {:<7} {:>3} {:>4}  {}",
        "period", "date", "numbers", "sum", "span", "type"
    )?;
    for draw in rows {
        writeln!(
            out,
            "{:<9} {:<10}  {:<7} {:>3} {:>4}  {}{}",
            draw.period(),
            draw.date().to_string(),
            balls(draw),
            draw.sum(),
            draw.span(),
            draw.draw_type().label_zh(),
            if draw.is_degraded() { "  (placeholder)" } else { "" },
        )?;
    }
    Ok(())
}

/// Print frequency bars, hot and cold digits, and the type distribution.
pub fn print_stats(out: &mut impl Write, stats: &DigitStats) -> io::Result<()> {
    writeln!(out, "Last {} draws", stats.draws)?;
    if stats.draws == 0 {
        return Ok(());
    }
    writeln!(out)?;

    writeln!(out, "Digit frequency")?;
    let max = stats.frequency.iter().copied().max().unwrap_or(0).max(1);
    for (digit, &count) in stats.frequency.iter().enumerate() {
        let len = count * BAR_WIDTH / max;
        writeln!(out, "  {digit} {:<width$} {count}", "#".repeat(len), width = BAR_WIDTH)?;
    }
    writeln!(out)?;

    writeln!(out, "  {:<12} {}", "hot", join_digits(&stats.hot))?;
    writeln!(out, "  {:<12} {}", "cold", join_digits(&stats.cold))?;
    writeln!(out, "  {:<12} {:.2}", "mean sum", stats.mean_sum)?;
    writeln!(out, "  {:<12} {:.2}", "mean span", stats.mean_span)?;
    writeln!(out)?;

    writeln!(out, "Types")?;
    for t in DrawType::ALL {
        let count = stats.type_counts.get(&t).copied().unwrap_or(0);
        writeln!(out, "  {:<12} {}", format!("{} {}", t.label_zh(), t.as_str()), count)?;
    }
    Ok(())
}

/// Print the 3D and five-code picks with the number of draws behind them.
pub fn print_prediction(
    out: &mut impl Write,
    draws: usize,
    pick_3d: &[u8],
    pick_5_code: &[u8],
) -> io::Result<()> {
    writeln!(out, "Picks from the last {draws} draws (not a forecast)")?;
    writeln!(out, "  {:<12} {}", "3D", join_digits(pick_3d))?;
    writeln!(out, "  {:<12} {}", "5-code", join_digits(pick_5_code))?;
    Ok(())
}

// ── Helpers ──

fn balls(draw: &DrawResult) -> String {
    join_digits(&draw.numbers())
}

fn join_digits(digits: &[u8]) -> String {
    digits
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draw(p: &str, n: [u8; 3]) -> DrawResult {
        DrawResult::new(p, n, NaiveDate::from_ymd_opt(2025, 9, 8).unwrap()).unwrap()
    }

    fn snapshot() -> Snapshot {
        let ts = NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        Snapshot::new(
            vec![
                draw("2025242", [5, 0, 8]),
                draw("2025241", [3, 3, 7]),
                draw("2025142", [2, 3, 4]),
            ],
            ts,
        )
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn card_shows_fields() {
        let snap = snapshot();
        let view = LatestView::new(snap.data[0].clone(), snap.update_time);
        let text = render(|out| print_latest_card(out, &view));
        assert!(text.starts_with("=== 第 2025242 期 ==="));
        assert!(text.contains("5 0 8"));
        assert!(text.contains("Mixed (组六)"));
        assert!(text.contains("2025-09-08 22:00:00"));
        assert!(!text.contains("note"));
    }

    #[test]
    fn history_search_and_limit() {
        let snap = snapshot();
        let all = filter_history(&snap, None, 10);
        assert_eq!(all.len(), 3);
        let hits = filter_history(&snap, Some("242"), 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].period(), "2025242");
        let hits = filter_history(&snap, Some("142"), 10);
        assert_eq!(hits[0].period(), "2025142");
        assert_eq!(filter_history(&snap, None, 2).len(), 2);
    }

    #[test]
    fn history_rows() {
        let snap = snapshot();
        let rows = filter_history(&snap, None, 10);
        let text = render(|out| print_history(out, &rows));
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().nth(2).unwrap().contains("对子"));
        let text = render(|out| print_history(out, &[]));
        assert!(text.contains("no matching"));
    }

    #[test]
    fn stats_render() {
        let snap = snapshot();
        let stats = fc3d_core::analyse(&snap.data, 30);
        let text = render(|out| print_stats(out, &stats));
        assert!(text.starts_with("Last 3 draws"));
        assert!(text.contains("  3 ##############################"));
        assert!(text.contains("顺子 Straight"));
    }

    #[test]
    fn prediction_render() {
        let text = render(|out| print_prediction(out, 30, &[1, 4, 7], &[0, 1, 4, 7, 9]));
        assert!(text.starts_with("Picks from the last 30 draws"));
        assert!(text.contains("3D           1 4 7"));
        assert!(text.contains("5-code       0 1 4 7 9"));
    }
}
